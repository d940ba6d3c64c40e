use eframe::egui::{self, RichText};
use log::warn;

use crate::api::models::AssetData;
use crate::util::format_size;

use super::ThemePalette;

const ASSET_HOST: &str = "https://resources.download.minecraft.net";

/// Direct content URL of an asset: the host shards files by the first two
/// hex characters of the hash.
#[must_use]
pub fn asset_download_url(hash: &str) -> String {
    let shard = hash.get(..2).unwrap_or(hash);
    format!("{ASSET_HOST}/{shard}/{hash}")
}

/// Render the header common to every asset (path, download link, hash,
/// size), then hand off to the first renderer strategy that supports the
/// asset's filename.
pub fn show(ui: &mut egui::Ui, colors: &ThemePalette, path: &str, data: &AssetData) {
    ui.heading(path);
    ui.hyperlink_to("Download", asset_download_url(&data.hash));
    ui.label(RichText::new(format!("Hash: {}", data.hash)).color(colors.text_muted));
    ui.label(RichText::new(format!("Size: {}", format_size(data.size))).color(colors.text_muted));
    ui.separator();
    renderer_for(path).render(ui, data);
}

/// A preview policy for one category of asset file. Strategies are probed
/// in a fixed order and the first match renders.
trait AssetRenderer: Sync {
    fn label(&self) -> &'static str;

    fn supports(&self, filename: &str) -> bool;

    fn render(&self, ui: &mut egui::Ui, data: &AssetData);
}

static ASSET_RENDERERS: [&dyn AssetRenderer; 4] = [
    &ImageRenderer,
    &AudioRenderer,
    &TextRenderer,
    &FallbackRenderer,
];

fn renderer_for(path: &str) -> &'static dyn AssetRenderer {
    ASSET_RENDERERS
        .iter()
        .copied()
        .find(|renderer| renderer.supports(path))
        .unwrap_or(&FallbackRenderer)
}

struct ImageRenderer;

impl AssetRenderer for ImageRenderer {
    fn label(&self) -> &'static str {
        "image"
    }

    fn supports(&self, filename: &str) -> bool {
        filename.ends_with(".png")
    }

    fn render(&self, ui: &mut egui::Ui, data: &AssetData) {
        ui.add(egui::Image::from_uri(asset_download_url(&data.hash)).shrink_to_fit());
    }
}

struct AudioRenderer;

impl AssetRenderer for AudioRenderer {
    fn label(&self) -> &'static str {
        "audio"
    }

    fn supports(&self, filename: &str) -> bool {
        filename.ends_with(".ogg")
    }

    fn render(&self, ui: &mut egui::Ui, data: &AssetData) {
        let url = asset_download_url(&data.hash);
        ui.horizontal(|ui| {
            if ui.button("Play").clicked()
                && let Err(err) = open::that(&url)
            {
                warn!("viewer: could not hand {url} to the system player: {err}");
            }
            ui.hyperlink_to("Open in player", url);
        });
    }
}

struct TextRenderer;

impl AssetRenderer for TextRenderer {
    fn label(&self) -> &'static str {
        "text"
    }

    fn supports(&self, filename: &str) -> bool {
        filename.ends_with(".json") || filename.ends_with(".lang")
    }

    fn render(&self, ui: &mut egui::Ui, data: &AssetData) {
        // The asset host only serves direct downloads; the content is not
        // fetched programmatically.
        ui.horizontal_wrapped(|ui| {
            ui.spacing_mut().item_spacing.x = 0.0;
            ui.label("Text files can't be previewed here. You can still ");
            ui.hyperlink_to("download the file", asset_download_url(&data.hash));
            ui.label(".");
        });
    }
}

struct FallbackRenderer;

impl AssetRenderer for FallbackRenderer {
    fn label(&self) -> &'static str {
        "fallback"
    }

    fn supports(&self, _filename: &str) -> bool {
        true
    }

    fn render(&self, ui: &mut egui::Ui, _data: &AssetData) {
        ui.label("This file format is not supported");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_sharded_download_urls() {
        assert_eq!(
            asset_download_url("abcdef123"),
            "https://resources.download.minecraft.net/ab/abcdef123"
        );
    }

    #[test]
    fn picks_the_first_matching_renderer() {
        assert_eq!(renderer_for("icons/foo.png").label(), "image");
        assert_eq!(renderer_for("sounds/bar.ogg").label(), "audio");
        assert_eq!(renderer_for("lang/en.json").label(), "text");
        assert_eq!(renderer_for("lang/en_us.lang").label(), "text");
        assert_eq!(renderer_for("data/readme.txt").label(), "fallback");
    }

    #[test]
    fn fallback_matches_everything() {
        assert!(FallbackRenderer.supports(""));
        assert!(FallbackRenderer.supports("anything.at.all"));
    }

    #[test]
    fn suffix_tests_are_exact() {
        assert!(!ImageRenderer.supports("foo.png.bak"));
        assert!(!AudioRenderer.supports("bar.oggs"));
        assert!(!TextRenderer.supports("en.jsonl"));
    }
}

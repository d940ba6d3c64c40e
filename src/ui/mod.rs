use std::sync::Arc;

use eframe::egui::{
    self, Align, Color32, Frame, Layout, Margin, RichText, Rounding, Stroke, Vec2,
    epaint::Shadow,
};
use log::{debug, error, info, warn};
use tokio::runtime::{Builder, Runtime};
use tokio::sync::mpsc;

use crate::api::{
    self,
    models::{AssetData, AssetsManifest, ManifestVersion, VersionType, VersionsManifest},
};

mod selector;
pub mod viewer;

use self::selector::{ListSelector, ListSelectorFilter};

const SELECT_VERSION_PLACEHOLDER: &str = "Select a version";
const SELECT_ASSET_PROMPT: &str = "Select an asset";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Theme {
    Dark,
    Light,
}

impl Theme {
    const fn palette(self) -> ThemePalette {
        match self {
            Theme::Dark => ThemePalette::dark(),
            Theme::Light => ThemePalette::light(),
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Theme::Dark => "Dark",
            Theme::Light => "Light",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemePalette {
    bg: Color32,
    panel: Color32,
    surface: Color32,
    sunken_surface: Color32,
    border: Color32,
    border_strong: Color32,
    pub text_primary: Color32,
    pub text_muted: Color32,
    pub text_faint: Color32,
    accent: Color32,
    accent_soft: Color32,
    accent_glow: Color32,
    danger: Color32,
}

impl ThemePalette {
    const fn dark() -> Self {
        Self {
            bg: Color32::from_rgb(11, 14, 19),
            panel: Color32::from_rgb(17, 22, 29),
            surface: Color32::from_rgb(24, 31, 39),
            sunken_surface: Color32::from_rgb(14, 18, 24),
            border: Color32::from_rgb(45, 57, 72),
            border_strong: Color32::from_rgb(63, 79, 97),
            text_primary: Color32::from_rgb(228, 235, 244),
            text_muted: Color32::from_rgb(167, 182, 197),
            text_faint: Color32::from_rgb(129, 143, 158),
            accent: Color32::from_rgb(92, 219, 195),
            accent_soft: Color32::from_rgb(63, 140, 125),
            accent_glow: Color32::from_rgb(151, 239, 217),
            danger: Color32::from_rgb(239, 117, 117),
        }
    }

    const fn light() -> Self {
        Self {
            bg: Color32::from_rgb(240, 245, 252),
            panel: Color32::from_rgb(226, 234, 243),
            surface: Color32::from_rgb(245, 249, 255),
            sunken_surface: Color32::from_rgb(217, 225, 236),
            border: Color32::from_rgb(195, 205, 221),
            border_strong: Color32::from_rgb(172, 186, 206),
            text_primary: Color32::from_rgb(28, 38, 52),
            text_muted: Color32::from_rgb(80, 99, 121),
            text_faint: Color32::from_rgb(116, 135, 155),
            accent: Color32::from_rgb(27, 170, 152),
            accent_soft: Color32::from_rgb(152, 223, 212),
            accent_glow: Color32::from_rgb(16, 190, 173),
            danger: Color32::from_rgb(219, 83, 83),
        }
    }
}

fn section_frame(colors: &ThemePalette) -> Frame {
    Frame::none()
        .fill(colors.surface)
        .stroke(Stroke::new(1.0, colors.border))
        .rounding(Rounding::same(14))
        .inner_margin(Margin::same(14))
}

fn apply_theme(ctx: &egui::Context, colors: &ThemePalette) {
    let is_dark = colors == &ThemePalette::dark();
    let mut visuals = if is_dark {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    };
    visuals.panel_fill = colors.bg;
    visuals.window_fill = visuals.panel_fill;
    visuals.override_text_color = Some(colors.text_primary);
    visuals.hyperlink_color = colors.accent_glow;
    visuals.widgets.noninteractive.corner_radius = Rounding::same(10);
    visuals.widgets.inactive.corner_radius = Rounding::same(10);
    visuals.widgets.hovered.corner_radius = Rounding::same(10);
    visuals.widgets.active.corner_radius = Rounding::same(10);
    visuals.widgets.noninteractive.bg_fill = colors.surface;
    visuals.widgets.inactive.bg_fill = colors.surface;
    visuals.widgets.hovered.bg_fill = colors.accent_glow;
    visuals.widgets.active.bg_fill = colors.accent_soft;
    visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, colors.border);
    visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, colors.border);
    visuals.widgets.hovered.bg_stroke = Stroke::new(1.5, colors.accent_glow);
    visuals.widgets.active.bg_stroke = Stroke::new(1.5, colors.accent);
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, colors.text_muted);
    visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, colors.text_muted);
    visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, colors.text_primary);
    visuals.widgets.active.fg_stroke = Stroke::new(1.0, colors.text_primary);
    visuals.selection.bg_fill = colors.accent_soft;
    visuals.selection.stroke = Stroke::new(1.0, colors.accent_glow);
    visuals.faint_bg_color = colors.sunken_surface;
    visuals.extreme_bg_color = colors.sunken_surface;
    visuals.code_bg_color = colors.sunken_surface;
    visuals.window_corner_radius = Rounding::same(14);
    let shadow_color = if is_dark {
        Color32::from_black_alpha(100)
    } else {
        Color32::from_black_alpha(45)
    };
    visuals.window_shadow = Shadow {
        offset: [0, 6],
        blur: 18,
        spread: 0,
        color: shadow_color,
    };
    visuals.popup_shadow = visuals.window_shadow;

    if is_dark {
        visuals.widgets.hovered.bg_fill = colors.accent_soft;
        visuals.widgets.hovered.bg_stroke = Stroke::new(1.3, colors.accent);
        visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, colors.border_strong);
    }

    ctx.set_visuals(visuals);
}

fn build_runtime() -> Arc<Runtime> {
    match Runtime::new() {
        Ok(rt) => Arc::new(rt),
        Err(err) => {
            warn!(
                "ui: failed to create multithreaded runtime ({}); trying single-threaded runtime",
                err
            );
            match Builder::new_current_thread().enable_all().build() {
                Ok(rt) => Arc::new(rt),
                Err(fallback_err) => {
                    error!(
                        "ui: failed to create any Tokio runtime ({}); terminating browser",
                        fallback_err
                    );
                    std::process::exit(1);
                }
            }
        }
    }
}

/// One selectable row of the assets list: an entry of the asset-index map
/// paired with its path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetEntry {
    pub path: String,
    pub data: AssetData,
}

#[derive(Debug)]
enum VersionsUpdate {
    Loaded(VersionsManifest),
    Error(String),
}

#[derive(Debug)]
enum AssetsUpdate {
    Loaded {
        version_id: String,
        manifest: AssetsManifest,
    },
    Error {
        version_id: String,
        error: String,
    },
}

fn versions_placeholder(error: Option<&str>) -> Option<String> {
    error.map(|err| format!("Failed to load versions manifest: {err}"))
}

fn assets_placeholder(error: Option<&str>, version_id: Option<&str>) -> String {
    match error {
        Some(err) => format!(
            "Failed to load assets manifest of version {}: {}",
            version_id.unwrap_or("?"),
            err
        ),
        None => SELECT_VERSION_PLACEHOLDER.to_owned(),
    }
}

/// The versions offered for selection: releases and snapshots only; old
/// alpha and beta entries stay in the decoded manifest but are not shown.
fn selectable_versions(manifest: Option<&VersionsManifest>) -> Vec<ManifestVersion> {
    manifest
        .map(|manifest| {
            manifest
                .versions
                .iter()
                .filter(|version| {
                    matches!(
                        version.version_type,
                        VersionType::Release | VersionType::Snapshot
                    )
                })
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

fn snapshot_filter() -> ListSelectorFilter<ManifestVersion> {
    ListSelectorFilter::new("Hide snapshots", |state, version: &ManifestVersion| {
        if state {
            version.version_type != VersionType::Snapshot
        } else {
            true
        }
    })
}

pub struct BrowserApp {
    runtime: Arc<Runtime>,
    client: reqwest::Client,
    egui_ctx: egui::Context,
    theme: Theme,
    versions_manifest: Option<VersionsManifest>,
    versions_error: Option<String>,
    versions_loading: bool,
    selected_version: Option<ManifestVersion>,
    asset_entries: Vec<AssetEntry>,
    assets_error: Option<String>,
    assets_loading: bool,
    selected_asset: Option<AssetEntry>,
    version_selector: ListSelector<ManifestVersion>,
    asset_selector: ListSelector<AssetEntry>,
    versions_rx: mpsc::UnboundedReceiver<VersionsUpdate>,
    versions_tx: mpsc::UnboundedSender<VersionsUpdate>,
    assets_rx: mpsc::UnboundedReceiver<AssetsUpdate>,
    assets_tx: mpsc::UnboundedSender<AssetsUpdate>,
}

impl BrowserApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        egui_extras::install_image_loaders(&cc.egui_ctx);
        let runtime = build_runtime();
        let (versions_tx, versions_rx) = mpsc::unbounded_channel();
        let (assets_tx, assets_rx) = mpsc::unbounded_channel();

        let mut app = Self {
            runtime,
            client: api::http_client(),
            egui_ctx: cc.egui_ctx.clone(),
            theme: Theme::Dark,
            versions_manifest: None,
            versions_error: None,
            versions_loading: false,
            selected_version: None,
            asset_entries: Vec::new(),
            assets_error: None,
            assets_loading: false,
            selected_asset: None,
            version_selector: ListSelector::new(vec![snapshot_filter()]),
            asset_selector: ListSelector::new(Vec::new()),
            versions_rx,
            versions_tx,
            assets_rx,
            assets_tx,
        };

        app.start_versions_fetch();
        app
    }

    fn colors(&self) -> ThemePalette {
        self.theme.palette()
    }

    fn start_versions_fetch(&mut self) {
        if self.versions_loading {
            return;
        }
        self.versions_loading = true;
        let client = self.client.clone();
        let tx = self.versions_tx.clone();
        let ctx = self.egui_ctx.clone();
        let rt = self.runtime.clone();
        rt.spawn(async move {
            let update = match api::fetch_versions_manifest(&client).await {
                Ok(manifest) => VersionsUpdate::Loaded(manifest),
                Err(err) => VersionsUpdate::Error(err.to_string()),
            };
            let _ = tx.send(update);
            ctx.request_repaint();
        });
    }

    // Not guarded by `assets_loading`: a new selection always starts its own
    // fetch; stale resolutions are dropped by the version-id tag in
    // sync_assets_updates.
    fn start_assets_fetch(&mut self, version: ManifestVersion) {
        self.assets_loading = true;
        let client = self.client.clone();
        let tx = self.assets_tx.clone();
        let ctx = self.egui_ctx.clone();
        let rt = self.runtime.clone();
        rt.spawn(async move {
            let update = match api::fetch_assets_manifest(&client, &version).await {
                Ok(manifest) => AssetsUpdate::Loaded {
                    version_id: version.id,
                    manifest,
                },
                Err(err) => AssetsUpdate::Error {
                    version_id: version.id,
                    error: err.to_string(),
                },
            };
            let _ = tx.send(update);
            ctx.request_repaint();
        });
    }

    fn sync_versions_updates(&mut self) {
        while let Ok(update) = self.versions_rx.try_recv() {
            self.versions_loading = false;
            match update {
                VersionsUpdate::Loaded(manifest) => {
                    info!(
                        "versions manifest loaded: {} versions, latest release {}",
                        manifest.versions.len(),
                        manifest.latest.release
                    );
                    self.versions_manifest = Some(manifest);
                    self.versions_error = None;
                }
                VersionsUpdate::Error(err) => {
                    error!("versions manifest load failed: {err}");
                    self.versions_manifest = None;
                    self.versions_error = Some(err);
                }
            }
        }
    }

    fn sync_assets_updates(&mut self) {
        while let Ok(update) = self.assets_rx.try_recv() {
            let current = self.selected_version.as_ref().map(|v| v.id.as_str());
            match update {
                AssetsUpdate::Loaded {
                    version_id,
                    manifest,
                } => {
                    if current != Some(version_id.as_str()) {
                        debug!("assets: discarding stale manifest for {version_id}");
                        continue;
                    }
                    self.assets_loading = false;
                    info!(
                        "assets manifest loaded for {version_id}: {} entries",
                        manifest.objects.len()
                    );
                    let mut entries: Vec<AssetEntry> = manifest
                        .objects
                        .into_iter()
                        .map(|(path, data)| AssetEntry { path, data })
                        .collect();
                    // The index is an unordered map; give the list a stable order.
                    entries.sort_by(|a, b| a.path.cmp(&b.path));
                    self.asset_entries = entries;
                    self.assets_error = None;
                }
                AssetsUpdate::Error { version_id, error } => {
                    if current != Some(version_id.as_str()) {
                        debug!("assets: discarding stale error for {version_id}");
                        continue;
                    }
                    self.assets_loading = false;
                    error!("assets manifest load failed for {version_id}: {error}");
                    self.asset_entries.clear();
                    self.assets_error = Some(error);
                }
            }
        }
    }

    fn select_version(&mut self, version: ManifestVersion) {
        debug!("version selected: {}", version.id);
        self.selected_version = Some(version.clone());
        self.start_assets_fetch(version);
    }

    fn render_versions_column(&mut self, ui: &mut egui::Ui, colors: &ThemePalette) {
        section_frame(colors).show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Versions");
                if self.versions_loading {
                    ui.add(egui::Spinner::new());
                }
            });
            ui.separator();

            let elements = selectable_versions(self.versions_manifest.as_ref());
            let placeholder = versions_placeholder(self.versions_error.as_deref());
            let clicked = ui
                .push_id("versions_selector", |ui| {
                    self.version_selector.show(
                        ui,
                        &elements,
                        |version| version.id.clone(),
                        placeholder.as_deref(),
                    )
                })
                .inner;
            if let Some(version) = clicked {
                self.select_version(version);
            }
        });
    }

    fn render_assets_column(&mut self, ui: &mut egui::Ui, colors: &ThemePalette) {
        section_frame(colors).show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Assets");
                if self.assets_loading {
                    ui.add(egui::Spinner::new());
                }
                if let Some(version) = &self.selected_version {
                    ui.label(RichText::new(&version.id).color(colors.text_faint).small());
                }
            });
            ui.separator();

            let placeholder = assets_placeholder(
                self.assets_error.as_deref(),
                self.selected_version.as_ref().map(|v| v.id.as_str()),
            );
            let clicked = ui
                .push_id("assets_selector", |ui| {
                    self.asset_selector.show(
                        ui,
                        &self.asset_entries,
                        |entry| entry.path.clone(),
                        Some(&placeholder),
                    )
                })
                .inner;
            if let Some(entry) = clicked {
                debug!("asset selected: {}", entry.path);
                self.selected_asset = Some(entry);
            }
        });
    }

    fn render_viewer_column(&mut self, ui: &mut egui::Ui, colors: &ThemePalette) {
        section_frame(colors).show(ui, |ui| match &self.selected_asset {
            Some(entry) => {
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        viewer::show(ui, colors, &entry.path, &entry.data);
                    });
            }
            None => {
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new(SELECT_ASSET_PROMPT).color(colors.text_faint));
                });
            }
        });
    }
}

impl eframe::App for BrowserApp {
    fn update(&mut self, ctx: &eframe::egui::Context, _frame: &mut eframe::Frame) {
        self.sync_versions_updates();
        self.sync_assets_updates();
        let colors = self.colors();
        apply_theme(ctx, &colors);

        egui::TopBottomPanel::top("top_bar")
            .frame(
                Frame::none()
                    .fill(colors.panel)
                    .stroke(Stroke::new(1.0, colors.border))
                    .inner_margin(Margin::symmetric(16, 12)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.heading(RichText::new("MC Assets Browser").color(colors.accent));
                        ui.label(
                            RichText::new(
                                "Browse and preview the assets bundled with each Minecraft release",
                            )
                            .color(colors.text_muted),
                        );
                    });
                    ui.allocate_ui_with_layout(
                        ui.available_size_before_wrap(),
                        Layout::right_to_left(Align::Center),
                        |ui| {
                            egui::ComboBox::from_id_source("theme_combo")
                                .selected_text(self.theme.label())
                                .show_ui(ui, |ui| {
                                    ui.selectable_value(
                                        &mut self.theme,
                                        Theme::Dark,
                                        Theme::Dark.label(),
                                    );
                                    ui.selectable_value(
                                        &mut self.theme,
                                        Theme::Light,
                                        Theme::Light.label(),
                                    );
                                });
                        },
                    );
                });
            });

        egui::CentralPanel::default()
            .frame(
                Frame::none()
                    .fill(colors.bg)
                    .inner_margin(Margin::symmetric(14, 12)),
            )
            .show(ctx, |ui| {
                let full_width = ui.available_width();
                let full_height = ui.available_height();
                let gutter = 12.0;
                let versions_width = ((full_width - 2.0 * gutter) * 0.16).max(150.0);
                let assets_width = (full_width - 2.0 * gutter) * 0.30;
                let viewer_width =
                    (full_width - 2.0 * gutter - versions_width - assets_width).max(0.0);

                ui.horizontal_top(|ui| {
                    ui.allocate_ui_with_layout(
                        Vec2::new(versions_width, full_height),
                        Layout::top_down(Align::LEFT),
                        |ui| self.render_versions_column(ui, &colors),
                    );
                    ui.add_space(gutter);
                    ui.allocate_ui_with_layout(
                        Vec2::new(assets_width, full_height),
                        Layout::top_down(Align::LEFT),
                        |ui| self.render_assets_column(ui, &colors),
                    );
                    ui.add_space(gutter);
                    ui.allocate_ui_with_layout(
                        Vec2::new(viewer_width, full_height),
                        Layout::top_down(Align::LEFT),
                        |ui| self.render_viewer_column(ui, &colors),
                    );
                });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::ManifestLatest;

    fn version(id: &str, version_type: VersionType) -> ManifestVersion {
        ManifestVersion {
            id: id.to_owned(),
            version_type,
            url: format!("https://piston-meta.mojang.com/v1/packages/aa/{id}.json"),
            time: "2024-06-13T08:32:38+00:00".to_owned(),
            release_time: "2024-06-13T08:24:03+00:00".to_owned(),
            sha1: "59353fb40c36d304f2035d51e7d6e6baa98dc05c".to_owned(),
            compliance_level: 1,
        }
    }

    fn manifest(versions: Vec<ManifestVersion>) -> VersionsManifest {
        VersionsManifest {
            latest: ManifestLatest {
                release: versions.first().map(|v| v.id.clone()).unwrap_or_default(),
                snapshot: String::new(),
            },
            versions,
        }
    }

    #[test]
    fn versions_placeholder_interpolates_the_error() {
        assert_eq!(versions_placeholder(None), None);
        let text = versions_placeholder(Some("request failed: timed out")).unwrap();
        assert!(text.contains("Failed to load versions manifest"));
        assert!(text.contains("request failed: timed out"));
    }

    #[test]
    fn assets_placeholder_prompts_until_an_error_arrives() {
        assert_eq!(assets_placeholder(None, None), SELECT_VERSION_PLACEHOLDER);
        assert_eq!(
            assets_placeholder(None, Some("1.21")),
            SELECT_VERSION_PLACEHOLDER
        );
        let text = assets_placeholder(Some("invalid JSON: eof"), Some("1.21"));
        assert!(text.contains("assets manifest of version 1.21"));
        assert!(text.contains("invalid JSON: eof"));
    }

    #[test]
    fn only_releases_and_snapshots_are_selectable() {
        let manifest = manifest(vec![
            version("1.21", VersionType::Release),
            version("24w33a", VersionType::Snapshot),
            version("b1.8.1", VersionType::OldBeta),
            version("a1.0.4", VersionType::OldAlpha),
        ]);
        let ids: Vec<String> = selectable_versions(Some(&manifest))
            .into_iter()
            .map(|v| v.id)
            .collect();
        assert_eq!(ids, ["1.21", "24w33a"]);
        assert!(selectable_versions(None).is_empty());
    }

    #[test]
    fn snapshot_filter_excludes_snapshots_only_while_enabled() {
        let filter = snapshot_filter();
        let release = version("1.21", VersionType::Release);
        let snapshot = version("24w33a", VersionType::Snapshot);
        assert!(filter.accepts(false, &release));
        assert!(filter.accepts(false, &snapshot));
        assert!(filter.accepts(true, &release));
        assert!(!filter.accepts(true, &snapshot));
    }
}

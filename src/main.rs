use clap::Parser;
use env_logger::Env;

mod api;
mod ui;
mod util;

#[derive(Parser, Debug)]
#[command(
    name = "MC Assets Browser",
    author,
    version,
    about = "Browse and preview the assets bundled with each Minecraft release"
)]
struct Cli {
    /// Print the browser version and exit without starting the UI.
    #[arg(long)]
    version_only: bool,
}

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if cli.version_only {
        println!("MC Assets Browser {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_icon(app_icon())
            .with_inner_size(eframe::egui::vec2(1240.0, 760.0)),
        ..Default::default()
    };
    eframe::run_native(
        "MC Assets Browser",
        options,
        Box::new(|cc| Ok(Box::new(ui::BrowserApp::new(cc)))),
    )
}

fn app_icon() -> eframe::egui::IconData {
    // Simple 2x2 icon: dark background with a cyan accent.
    let rgba: Vec<u8> = vec![
        20, 24, 32, 255, 30, 196, 220, 255, //
        20, 24, 32, 255, 20, 150, 180, 255,
    ];
    eframe::egui::IconData {
        rgba,
        width: 2,
        height: 2,
    }
}

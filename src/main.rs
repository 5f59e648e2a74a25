use channel_gate::channels::load_channels;
use channel_gate::gui::GateApp;
use channel_gate::logging;
use channel_gate::render::render_html;
use channel_gate::settings::{Settings, SETTINGS_FILE};

use eframe::egui;

fn main() -> anyhow::Result<()> {
    let loaded = Settings::load(SETTINGS_FILE);
    let settings = loaded.as_ref().cloned().unwrap_or_default();
    let _log_guard = logging::init(settings.debug_logging, settings.log_file.as_deref());
    if let Err(e) = &loaded {
        tracing::error!("failed to load {SETTINGS_FILE}: {e}; using defaults");
    }

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--export-html" {
            let Some(path) = args.next() else {
                anyhow::bail!("--export-html requires an output path");
            };
            let loaded = load_channels(&settings.channels, &settings.channels_url);
            std::fs::write(&path, render_html(&loaded.channels))?;
            tracing::info!("channel list written to {path}");
            return Ok(());
        }
    }

    let channels = load_channels(&settings.channels, &settings.channels_url);
    let (width, height) = settings.window_size;
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([width as f32, height as f32])
            .with_min_inner_size([320.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Channel Gate",
        native_options,
        Box::new(move |cc| Box::new(GateApp::new(&cc.egui_ctx, &settings, channels))),
    )
    .map_err(|e| anyhow::anyhow!("failed to run the window: {e}"))
}

use channel_gate::channels::{default_channels, LoadedChannels};
use channel_gate::gui::GateApp;
use channel_gate::settings::Settings;
use eframe::egui;
use once_cell::sync::Lazy;
use std::sync::Mutex;
use tempfile::tempdir;

static TEST_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

#[test]
fn app_starts_without_sdk_or_host() {
    let _lock = TEST_MUTEX.lock().unwrap();
    let dir = tempdir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();

    let ctx = egui::Context::default();
    let settings = Settings::default();
    let channels = LoadedChannels {
        channels: default_channels(),
        link_override: None,
    };
    assert!(std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        GateApp::new(&ctx, &settings, channels)
    }))
    .is_ok());
}

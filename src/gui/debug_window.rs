use crate::ad::detect::SdkProbe;
use crate::ad::sdk::SdkLoader;
use crate::controller::Controller;
use crate::debug_console;
use eframe::egui;
use std::time::Instant;

#[derive(Default)]
pub struct DebugWindow {
    pub open: bool,
    report: Option<String>,
}

impl DebugWindow {
    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn ui(
        &mut self,
        ctx: &egui::Context,
        controller: &mut Controller,
        probe: &dyn SdkProbe,
        loader: &SdkLoader,
        sdk_url: &str,
    ) {
        if !self.open {
            return;
        }
        let mut open_val = self.open;
        egui::Window::new("Debug")
            .open(&mut open_val)
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if ui.button("Test ad").clicked() {
                        debug_console::test_ad(controller, Instant::now());
                    }
                    if ui.button("Skip to Get").clicked() {
                        debug_console::skip_to_get(controller);
                    }
                });
                ui.horizontal(|ui| {
                    if ui.button("Check SDK").clicked() {
                        self.report = Some(debug_console::check_sdk(controller, probe).to_string());
                    }
                    if ui.button("Reload SDK").clicked() {
                        debug_console::reload_sdk(controller, loader, sdk_url, Instant::now());
                        self.report = Some("SDK reload attempted".into());
                    }
                });
                if let Some(report) = &self.report {
                    ui.separator();
                    ui.monospace(report.as_str());
                }
            });
        self.open = open_val;
    }
}

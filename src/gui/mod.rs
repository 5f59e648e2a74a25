mod cards;
mod countdown;
mod debug_window;

pub use debug_window::DebugWindow;

use crate::ad::sdk::{LibrarySdkProbe, SdkLoader, SdkPresenter, SdkSlot};
use crate::bootstrap::Bootstrap;
use crate::channels::LoadedChannels;
use crate::controller::Controller;
use crate::host::{self, HostBridge};
use crate::launcher::{open_channel_link, SystemOpener};
use crate::notice::{append_notice_log, Notice, NoticeLevel, NOTICE_LOG_FILE};
use crate::render::icon_glyph;
use crate::settings::Settings;
use crate::view::{CtaButton, CtaStyle, PageView, StepIndicator};
use eframe::egui::{self, Color32, RichText};
use egui_toast::{Toast, ToastKind, ToastOptions, Toasts};
use std::time::{Duration, Instant};

const REPAINT_INTERVAL: Duration = Duration::from_millis(100);
const WATCH_COLOR: Color32 = Color32::from_rgb(0x00, 0x88, 0xcc);
const GET_COLOR: Color32 = Color32::from_rgb(0xff, 0x57, 0x22);
const DONE_COLOR: Color32 = Color32::from_rgb(0x4c, 0xaf, 0x50);

/// Host bridge backed by the window's viewport commands.
pub struct ViewportHost {
    ctx: egui::Context,
}

impl ViewportHost {
    pub fn new(ctx: egui::Context) -> Self {
        Self { ctx }
    }
}

impl HostBridge for ViewportHost {
    fn is_present(&self) -> bool {
        host::host_env_present()
    }

    fn expand(&mut self) {
        self.ctx
            .send_viewport_cmd(egui::ViewportCommand::Maximized(true));
    }

    fn ready(&mut self) {
        self.ctx.send_viewport_cmd(egui::ViewportCommand::Focus);
        tracing::debug!("host notified that the widget is ready");
    }
}

pub struct GateApp {
    controller: Controller,
    probe: LibrarySdkProbe,
    loader: SdkLoader,
    opener: SystemOpener,
    toasts: Toasts,
    enable_toasts: bool,
    toast_duration: f32,
    debug_enabled: bool,
    debug_window: DebugWindow,
    sdk_url: String,
}

fn push_toast(toasts: &mut Toasts, enabled: bool, duration: f32, notice: &Notice) {
    append_notice_log(NOTICE_LOG_FILE, notice);
    if !enabled {
        return;
    }
    let kind = match notice.level {
        NoticeLevel::Info => ToastKind::Info,
        NoticeLevel::Warning => ToastKind::Warning,
        NoticeLevel::Error => ToastKind::Error,
    };
    toasts.add(Toast {
        text: notice.text.clone().into(),
        kind,
        options: ToastOptions::default().duration_in_seconds(duration as f64),
    });
}

impl GateApp {
    pub fn new(ctx: &egui::Context, settings: &Settings, channels: LoadedChannels) -> Self {
        let slot = SdkSlot::default();
        let loader = SdkLoader::new(slot.clone(), settings.sdk.library.clone());
        loader.spawn_load();
        let symbol = settings.sdk_symbol();
        let probe = LibrarySdkProbe::new(
            slot.clone(),
            &settings.sdk.url,
            &settings.sdk.provider_domain,
            &symbol,
        );
        let presenter = SdkPresenter::new(slot, symbol);

        let mut host = ViewportHost::new(ctx.clone());
        let (controller, notices) = Bootstrap { settings, channels }.run(
            &mut host,
            &probe,
            Box::new(presenter),
            Instant::now(),
        );

        let mut app = Self {
            controller,
            probe,
            loader,
            opener: SystemOpener,
            toasts: Toasts::new().anchor(egui::Align2::RIGHT_TOP, [10.0, 10.0]),
            enable_toasts: settings.enable_toasts,
            toast_duration: settings.toast_duration,
            debug_enabled: settings.debug_console,
            debug_window: DebugWindow::default(),
            sdk_url: settings.sdk.url.clone(),
        };
        app.push_notices(notices);
        app
    }

    fn push_notices(&mut self, notices: Vec<Notice>) {
        for notice in &notices {
            push_toast(
                &mut self.toasts,
                self.enable_toasts,
                self.toast_duration,
                notice,
            );
        }
    }
}

impl eframe::App for GateApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.debug_enabled && ctx.input(|i| i.key_pressed(egui::Key::F12)) {
            self.debug_window.toggle();
        }

        let notices = self
            .controller
            .tick(Instant::now(), &self.probe, &mut self.opener);
        self.push_notices(notices);

        let mut cta_clicked = false;
        let mut card_link = None;
        let view = self.controller.view();
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(8.0);
                ui.heading("Unlock your link");
                ui.add_space(12.0);
            });
            steps(ui, view);
            ui.add_space(12.0);
            if let Some(cta) = view.cta.as_ref() {
                ui.vertical_centered(|ui| {
                    cta_clicked = cta_button(ui, cta).clicked();
                });
            }
            ui.add_space(16.0);
            ui.separator();
            egui::ScrollArea::vertical().show(ui, |ui| {
                if let Some(loading) = view.loading.as_ref() {
                    cards::loading(ui, loading);
                }
                if let Some(list) = view.channel_list.as_ref() {
                    card_link = cards::channel_list(ui, list);
                }
            });
        });
        if let Some(overlay) = view.countdown.as_ref() {
            countdown::overlay(ctx, overlay);
        }

        if cta_clicked {
            let outcome = self.controller.on_cta_click(Instant::now());
            tracing::debug!(?outcome, "call-to-action clicked");
        }
        if let Some(link) = card_link {
            if let Err(e) = open_channel_link(&link) {
                tracing::error!("failed to open channel link {link}: {e}");
                let notice = Notice::error(format!("Could not open link: {e}"));
                self.push_notices(vec![notice]);
            }
        }

        self.debug_window.ui(
            ctx,
            &mut self.controller,
            &self.probe,
            &self.loader,
            &self.sdk_url,
        );
        self.toasts.show(ctx);

        if self.controller.wants_repaint() {
            ctx.request_repaint_after(REPAINT_INTERVAL);
        }
    }
}

fn steps(ui: &mut egui::Ui, view: &PageView) {
    ui.horizontal(|ui| {
        if let Some(step) = view.step_watch.as_ref() {
            step_label(ui, "1", "Watch Ad", step);
        }
        if let Some(step) = view.step_get.as_ref() {
            ui.add_space(16.0);
            step_label(ui, "2", "Get Link", step);
        }
    });
}

fn step_label(ui: &mut egui::Ui, number: &str, title: &str, step: &StepIndicator) {
    let color = if step.completed {
        DONE_COLOR
    } else if step.active {
        WATCH_COLOR
    } else {
        ui.visuals().weak_text_color()
    };
    let marker = if step.completed { "✔" } else { number };
    ui.label(RichText::new(format!("{marker} {title}")).color(color).strong());
}

fn cta_button(ui: &mut egui::Ui, cta: &CtaButton) -> egui::Response {
    let fill = match cta.style {
        CtaStyle::Watch => WATCH_COLOR,
        CtaStyle::Get => GET_COLOR,
    };
    let glyph = icon_glyph(&cta.icon);
    let text = if cta.label.starts_with(glyph) {
        cta.label.clone()
    } else {
        format!("{glyph} {}", cta.label)
    };
    let button = egui::Button::new(RichText::new(text).size(18.0).color(Color32::WHITE))
        .fill(fill)
        .min_size(egui::vec2(220.0, 44.0));
    let response = ui.add_enabled(cta.enabled, button);
    if cta.confirming {
        ui.label(RichText::new("✔ Opening...").color(DONE_COLOR));
    }
    response
}

use crate::countdown::RING_RADIUS;
use crate::view::{CountdownOverlay, MessageTone};
use eframe::egui::{self, Align2, Color32, FontId, Pos2, Shape, Stroke};

const RING_WIDTH: f32 = 6.0;
const WARNING_COLOR: Color32 = Color32::from_rgb(0xff, 0x98, 0x00);
const RING_COLOR: Color32 = Color32::from_rgb(0x00, 0x88, 0xcc);

/// Draw the ad timer overlay on top of the page when it is visible.
pub fn overlay(ctx: &egui::Context, overlay: &CountdownOverlay) {
    if !overlay.visible {
        return;
    }
    let Some(countdown) = overlay.countdown.as_ref() else {
        return;
    };
    egui::Area::new(egui::Id::new("ad_timer"))
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .order(egui::Order::Foreground)
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    let size = egui::vec2(RING_RADIUS * 2.0 + 24.0, RING_RADIUS * 2.0 + 24.0);
                    let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
                    let painter = ui.painter();
                    let center = rect.center();
                    painter.circle_stroke(
                        center,
                        RING_RADIUS,
                        Stroke::new(RING_WIDTH, ui.visuals().faint_bg_color),
                    );
                    painter.add(progress_arc(center, countdown.progress()));
                    painter.text(
                        center,
                        Align2::CENTER_CENTER,
                        countdown.remaining().to_string(),
                        FontId::proportional(28.0),
                        ui.visuals().strong_text_color(),
                    );
                    let color = match overlay.tone {
                        MessageTone::Normal => ui.visuals().text_color(),
                        MessageTone::Warning => WARNING_COLOR,
                    };
                    ui.colored_label(color, overlay.message.as_str());
                });
            });
        });
}

fn progress_arc(center: Pos2, progress: f32) -> Shape {
    let progress = progress.clamp(0.0, 1.0);
    if progress <= 0.0 {
        return Shape::Noop;
    }
    let segments = (64.0 * progress).ceil().max(2.0) as usize;
    let start = -std::f32::consts::FRAC_PI_2;
    let sweep = std::f32::consts::TAU * progress;
    let points = (0..=segments)
        .map(|i| {
            let angle = start + sweep * i as f32 / segments as f32;
            center + RING_RADIUS * egui::vec2(angle.cos(), angle.sin())
        })
        .collect();
    Shape::line(points, Stroke::new(RING_WIDTH, RING_COLOR))
}

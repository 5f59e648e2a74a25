use crate::render::{icon_glyph, parse_hex, CardView};
use crate::view::{ChannelListRegion, ListItem, LoadingPlaceholder};
use eframe::egui::{self, Align2, Color32, FontId, Mesh, Pos2, Rect, Sense, Shape, Stroke};

const CARD_HEIGHT: f32 = 68.0;
const ICON_SIZE: f32 = 44.0;

pub(crate) fn hex_color(hex: &str) -> Color32 {
    parse_hex(hex)
        .map(|(r, g, b)| Color32::from_rgb(r, g, b))
        .unwrap_or(Color32::from_rgb(0x00, 0x88, 0xcc))
}

/// Draw the channel list. Returns the link of a clicked card.
pub fn channel_list(ui: &mut egui::Ui, region: &ChannelListRegion) -> Option<String> {
    let mut clicked = None;
    for item in &region.items {
        match item {
            ListItem::Card(card) => {
                if channel_card(ui, card).clicked() {
                    clicked = Some(card.link.clone());
                }
            }
            ListItem::Placeholder(message) => {
                ui.vertical_centered(|ui| {
                    ui.add_space(12.0);
                    ui.weak(message.as_str());
                });
            }
        }
        ui.add_space(8.0);
    }
    clicked
}

pub fn loading(ui: &mut egui::Ui, placeholder: &LoadingPlaceholder) {
    if placeholder.visible {
        ui.vertical_centered(|ui| {
            ui.spinner();
            ui.weak("Loading channels...");
        });
    }
}

fn channel_card(ui: &mut egui::Ui, card: &CardView) -> egui::Response {
    let width = ui.available_width();
    let (rect, response) = ui.allocate_exact_size(egui::vec2(width, CARD_HEIGHT), Sense::click());
    let visuals = ui.style().interact(&response);
    let painter = ui.painter_at(rect);
    painter.rect(
        rect,
        10.0,
        ui.visuals().faint_bg_color,
        Stroke::new(1.0, visuals.bg_stroke.color),
    );

    let icon_rect = Rect::from_min_size(
        Pos2::new(rect.left() + 12.0, rect.center().y - ICON_SIZE / 2.0),
        egui::vec2(ICON_SIZE, ICON_SIZE),
    );
    painter.add(diagonal_gradient(
        icon_rect,
        hex_color(&card.accent),
        hex_color(&card.accent_dark),
    ));
    painter.text(
        icon_rect.center(),
        Align2::CENTER_CENTER,
        icon_glyph(&card.icon),
        FontId::proportional(22.0),
        Color32::WHITE,
    );

    let text_left = icon_rect.right() + 12.0;
    let text_color = ui.visuals().strong_text_color();
    painter.text(
        Pos2::new(text_left, rect.center().y - 10.0),
        Align2::LEFT_CENTER,
        &card.name,
        FontId::proportional(16.0),
        text_color,
    );
    painter.text(
        Pos2::new(text_left, rect.center().y + 11.0),
        Align2::LEFT_CENTER,
        &card.description,
        FontId::proportional(13.0),
        ui.visuals().weak_text_color(),
    );
    painter.text(
        Pos2::new(rect.right() - 16.0, rect.center().y),
        Align2::CENTER_CENTER,
        icon_glyph("fas fa-chevron-right"),
        FontId::proportional(18.0),
        visuals.fg_stroke.color,
    );

    response
        .on_hover_cursor(egui::CursorIcon::PointingHand)
        .on_hover_text(card.link.as_str())
}

/// 135° gradient: `from` at the top left, `to` at the bottom right.
fn diagonal_gradient(rect: Rect, from: Color32, to: Color32) -> Shape {
    let mid = lerp_color(from, to, 0.5);
    let mut mesh = Mesh::default();
    mesh.colored_vertex(rect.left_top(), from);
    mesh.colored_vertex(rect.right_top(), mid);
    mesh.colored_vertex(rect.right_bottom(), to);
    mesh.colored_vertex(rect.left_bottom(), mid);
    mesh.add_triangle(0, 1, 2);
    mesh.add_triangle(0, 2, 3);
    Shape::mesh(mesh)
}

fn lerp_color(a: Color32, b: Color32, t: f32) -> Color32 {
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    Color32::from_rgb(mix(a.r(), b.r()), mix(a.g(), b.g()), mix(a.b(), b.b()))
}

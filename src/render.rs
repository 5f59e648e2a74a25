//! Channel list rendering.
//!
//! [`render`] projects a channel list onto any [`CardSurface`]. It owns no
//! state and only reads the list.

use crate::channels::ChannelEntry;
use crate::view::NO_CHANNELS_MESSAGE;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt::Write as _;

/// Luminance reduction applied to the second gradient stop.
pub const GRADIENT_DARKEN_PERCENT: u32 = 20;

/// Everything needed to draw one channel card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub link: String,
    pub accent: String,
    pub accent_dark: String,
}

impl CardView {
    pub fn from_entry(entry: &ChannelEntry) -> Self {
        let accent = entry.color().to_string();
        Self {
            id: entry.id,
            name: entry.name().to_string(),
            description: entry.description().to_string(),
            icon: entry.icon().to_string(),
            link: entry.link().to_string(),
            accent_dark: darken_color(&accent, GRADIENT_DARKEN_PERCENT),
            accent,
        }
    }
}

/// Target of a render pass.
pub trait CardSurface {
    fn clear(&mut self);
    fn card(&mut self, card: CardView);
    fn placeholder(&mut self, message: &str);
}

/// Replace the surface contents with one card per channel, in order, or a
/// single placeholder when there are none.
pub fn render<S: CardSurface + ?Sized>(channels: &[ChannelEntry], surface: &mut S) {
    surface.clear();
    if channels.is_empty() {
        surface.placeholder(NO_CHANNELS_MESSAGE);
        return;
    }
    for entry in channels {
        surface.card(CardView::from_entry(entry));
    }
    tracing::debug!("rendered {} channel(s)", channels.len());
}

/// Darken a `#rrggbb` colour by `percent`, flooring each component.
///
/// Input that is not six hex digits is returned unchanged.
pub fn darken_color(hex: &str, percent: u32) -> String {
    let Some((r, g, b)) = parse_hex(hex) else {
        return hex.to_string();
    };
    let keep = 100 - percent.min(100);
    let scale = |v: u8| (u32::from(v) * keep / 100) as u8;
    format!("#{:02x}{:02x}{:02x}", scale(r), scale(g), scale(b))
}

/// Parse `#rrggbb` (the `#` is optional) into components.
pub fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let s = hex.trim().trim_start_matches('#');
    if s.len() != 6 || !s.is_ascii() {
        return None;
    }
    Some((
        u8::from_str_radix(&s[0..2], 16).ok()?,
        u8::from_str_radix(&s[2..4], 16).ok()?,
        u8::from_str_radix(&s[4..6], 16).ok()?,
    ))
}

/// Escape text for use in HTML content or a quoted attribute.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

static ICON_GLYPHS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("fa-robot", "🤖"),
        ("fa-users", "👥"),
        ("fa-telegram-plane", "✈"),
        ("fa-telegram", "✈"),
        ("fa-fire", "🔥"),
        ("fa-play-circle", "▶"),
        ("fa-play", "▶"),
        ("fa-chevron-right", "⏵"),
        ("fa-link", "🔗"),
        ("fa-star", "⭐"),
        ("fa-gift", "🎁"),
        ("fa-bell", "🔔"),
    ])
});

/// Glyph used to draw an icon token such as `fas fa-robot`.
pub fn icon_glyph(token: &str) -> &'static str {
    token
        .split_whitespace()
        .find_map(|class| ICON_GLYPHS.get(class).copied())
        .unwrap_or("📢")
}

/// Builds the markup of the channel list for plain web pages.
#[derive(Debug, Default)]
pub struct HtmlSurface {
    html: String,
}

impl HtmlSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_html(self) -> String {
        self.html
    }
}

impl CardSurface for HtmlSurface {
    fn clear(&mut self) {
        self.html.clear();
    }

    fn card(&mut self, card: CardView) {
        let _ = write!(
            self.html,
            concat!(
                "<a class=\"channel-card\" href=\"{link}\" target=\"_blank\" rel=\"noopener noreferrer\">\n",
                "  <div class=\"channel-icon\" style=\"background: linear-gradient(135deg, {accent}, {dark})\">\n",
                "    <i class=\"{icon}\"></i>\n",
                "  </div>\n",
                "  <div class=\"channel-info\">\n",
                "    <div class=\"channel-name\">{name}</div>\n",
                "    <div class=\"channel-description\">{desc}</div>\n",
                "  </div>\n",
                "  <div class=\"channel-arrow\">\n",
                "    <i class=\"fas fa-chevron-right\"></i>\n",
                "  </div>\n",
                "</a>\n",
            ),
            link = escape_html(&card.link),
            accent = escape_html(&card.accent),
            dark = escape_html(&card.accent_dark),
            icon = escape_html(&card.icon),
            name = escape_html(&card.name),
            desc = escape_html(&card.description),
        );
    }

    fn placeholder(&mut self, message: &str) {
        let _ = write!(
            self.html,
            "<div class=\"loading-state\">\n  <p>{}</p>\n</div>\n",
            escape_html(message)
        );
    }
}

/// Render `channels` to an HTML fragment.
pub fn render_html(channels: &[ChannelEntry]) -> String {
    let mut surface = HtmlSurface::new();
    render(channels, &mut surface);
    surface.into_html()
}

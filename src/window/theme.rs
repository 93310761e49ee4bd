//! Panel theme and styling
//!
//! Follows the host application's skin: the host sends its panel background
//! color and base font size, and the panel picks a light or dark palette to
//! match.

use egui::{Color32, FontFamily, FontId, Rounding, Stroke, TextStyle, Visuals};
use serde::Deserialize;

/// Palette used by the panel widgets
pub struct ThemeColors;

impl ThemeColors {
    // Host default (Illustrator dark skin)
    pub const BG_DARK: Color32 = Color32::from_rgb(50, 50, 50);

    pub const ACCENT_PRIMARY: Color32 = Color32::from_rgb(20, 115, 230);
    pub const ACCENT_WARNING: Color32 = Color32::from_rgb(230, 134, 25);

    pub const TEXT_ON_DARK: Color32 = Color32::from_rgb(225, 225, 225);
    pub const TEXT_ON_LIGHT: Color32 = Color32::from_rgb(40, 40, 40);
}

/// Skin description carried by the theme-changed event
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ThemeSettings {
    #[serde(default)]
    pub panel_background: Option<[u8; 3]>,
    #[serde(default)]
    pub base_font_size: Option<f32>,
}

impl ThemeSettings {
    pub fn from_payload(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }

    pub fn background(&self) -> Color32 {
        self.panel_background
            .map(|[r, g, b]| Color32::from_rgb(r, g, b))
            .unwrap_or(ThemeColors::BG_DARK)
    }

    /// Whether the background calls for light text
    pub fn is_dark(&self) -> bool {
        relative_luminance(self.background()) < 0.5
    }

    pub fn font_size(&self) -> f32 {
        self.base_font_size.unwrap_or(13.0).clamp(8.0, 32.0)
    }
}

/// Perceived brightness in 0.0 - 1.0
fn relative_luminance(color: Color32) -> f32 {
    (0.299 * color.r() as f32 + 0.587 * color.g() as f32 + 0.114 * color.b() as f32) / 255.0
}

/// Apply the host skin to egui
pub fn apply_theme(ctx: &egui::Context, settings: &ThemeSettings) {
    let mut style = (*ctx.style()).clone();

    let dark = settings.is_dark();
    let background = settings.background();
    let text = if dark {
        ThemeColors::TEXT_ON_DARK
    } else {
        ThemeColors::TEXT_ON_LIGHT
    };

    let mut visuals = if dark { Visuals::dark() } else { Visuals::light() };
    visuals.window_fill = background;
    visuals.panel_fill = background;
    visuals.override_text_color = Some(text);

    for widget in [
        &mut visuals.widgets.noninteractive,
        &mut visuals.widgets.inactive,
        &mut visuals.widgets.hovered,
        &mut visuals.widgets.active,
    ] {
        widget.rounding = Rounding::same(4.0);
    }
    visuals.widgets.active.bg_fill = ThemeColors::ACCENT_PRIMARY;
    visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, ThemeColors::ACCENT_PRIMARY);
    visuals.selection.stroke = Stroke::new(1.0, ThemeColors::ACCENT_PRIMARY);

    style.visuals = visuals;

    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(12.0, 4.0);

    let size = settings.font_size();
    style.text_styles = [
        (TextStyle::Small, FontId::new(size - 2.0, FontFamily::Proportional)),
        (TextStyle::Body, FontId::new(size, FontFamily::Proportional)),
        (TextStyle::Monospace, FontId::new(size, FontFamily::Monospace)),
        (TextStyle::Button, FontId::new(size, FontFamily::Proportional)),
        (TextStyle::Heading, FontId::new(size + 5.0, FontFamily::Proportional)),
    ]
    .into();

    ctx.set_style(style);
}

/// Helper to create a color with modified alpha
pub fn color_with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

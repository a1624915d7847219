//! Application theme

use egui::{Color32, Context, Rounding, Stroke, Style, Visuals};

/// Theme configuration
pub struct Theme {
    pub name: String,
    pub dark_mode: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "Sunburst Dark".to_string(),
            dark_mode: true,
        }
    }
}

/// Apply the application theme. Dark, low-chroma chrome so the arc palette
/// carries the color.
pub fn apply_theme(ctx: &Context, _theme: &Theme) {
    let mut style = Style::default();
    let mut visuals = Visuals::dark();

    let bg_color = Color32::from_rgb(20, 20, 22);
    let panel_bg = Color32::from_rgb(28, 28, 31);
    let widget_bg = Color32::from_rgb(38, 38, 42);
    let hover_color = Color32::from_rgb(48, 48, 54);
    let active_color = Color32::from_rgb(58, 58, 66);
    let text_color = Color32::from_rgb(222, 222, 222);

    visuals.window_fill = panel_bg;
    visuals.panel_fill = panel_bg;
    visuals.extreme_bg_color = bg_color;
    visuals.faint_bg_color = widget_bg;

    visuals.widgets.noninteractive.bg_fill = widget_bg;
    visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, Color32::from_rgb(55, 55, 60));
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, text_color);
    visuals.widgets.noninteractive.rounding = Rounding::same(3.0);

    visuals.widgets.inactive.bg_fill = widget_bg;
    visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, Color32::from_rgb(65, 65, 70));
    visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, text_color);
    visuals.widgets.inactive.rounding = Rounding::same(3.0);

    visuals.widgets.hovered.bg_fill = hover_color;
    visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, accent_color());
    visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, text_color);
    visuals.widgets.hovered.rounding = Rounding::same(3.0);

    visuals.widgets.active.bg_fill = active_color;
    visuals.widgets.active.bg_stroke = Stroke::new(1.0, accent_color());
    visuals.widgets.active.fg_stroke = Stroke::new(1.0, text_color);
    visuals.widgets.active.rounding = Rounding::same(3.0);

    visuals.selection.bg_fill = accent_color().gamma_multiply(0.4);
    visuals.selection.stroke = Stroke::new(1.0, accent_color());
    visuals.hyperlink_color = accent_color();

    style.visuals = visuals;
    ctx.set_style(style);
}

pub fn accent_color() -> Color32 {
    Color32::from_rgb(90, 140, 240)
}

pub fn error_color() -> Color32 {
    Color32::from_rgb(240, 90, 90)
}

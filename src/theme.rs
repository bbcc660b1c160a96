//! Chart palette shared by the SVG renderer and the egui dashboard

/// RGB colour usable both as an SVG attribute and as an egui colour
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// `#rrggbb` form for SVG attributes
    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

#[cfg(feature = "wasm")]
impl From<Rgb> for egui::Color32 {
    fn from(c: Rgb) -> Self {
        egui::Color32::from_rgb(c.0, c.1, c.2)
    }
}

pub mod colors {
    use super::Rgb;

    // === Backgrounds ===
    pub const BG_PRIMARY: Rgb = Rgb(255, 255, 255);        // #FFFFFF - page
    pub const BG_ELEVATED: Rgb = Rgb(246, 246, 246);       // #F6F6F6 - panels

    // === Text ===
    pub const TEXT_PRIMARY: Rgb = Rgb(17, 17, 17);         // #111111
    pub const TEXT_SECONDARY: Rgb = Rgb(85, 85, 85);       // #555555 - axis titles
    pub const TEXT_MUTED: Rgb = Rgb(136, 136, 136);        // #888888 - captions

    // === Axes ===
    pub const AXIS: Rgb = Rgb(0, 0, 0);

    // === Marks ===
    pub const BAR: Rgb = Rgb(220, 20, 60);                 // crimson
    pub const POINT: Rgb = Rgb(70, 130, 180);              // steelblue
    pub const HIGHLIGHT: Rgb = Rgb(255, 140, 0);           // darkorange
    pub const ANNOTATION: Rgb = Rgb(178, 34, 34);          // firebrick
}

/// Light egui visuals matching the exported SVG charts
#[cfg(feature = "wasm")]
pub fn story_visuals() -> egui::Visuals {
    use colors::*;

    let mut visuals = egui::Visuals::light();

    visuals.panel_fill = BG_PRIMARY.into();
    visuals.window_fill = BG_PRIMARY.into();
    visuals.extreme_bg_color = BG_PRIMARY.into();
    visuals.faint_bg_color = BG_ELEVATED.into();

    visuals.override_text_color = Some(TEXT_PRIMARY.into());

    visuals.widgets.inactive.fg_stroke = egui::Stroke::new(1.0, TEXT_SECONDARY);
    visuals.widgets.hovered.fg_stroke = egui::Stroke::new(1.0, TEXT_PRIMARY);

    visuals.selection.bg_fill = egui::Color32::from(POINT).gamma_multiply(0.3);
    visuals.selection.stroke = egui::Stroke::new(1.0, TEXT_PRIMARY);

    // No shadows - flat design
    visuals.window_shadow = egui::Shadow::NONE;
    visuals.popup_shadow = egui::Shadow::NONE;

    visuals
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex() {
        assert_eq!(colors::BAR.hex(), "#dc143c");
        assert_eq!(colors::POINT.hex(), "#4682b4");
    }
}

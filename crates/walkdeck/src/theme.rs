use eframe::egui::Color32;

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub background: Color32,
    pub foreground: Color32,
    pub heading_color: Color32,
    pub accent: Color32,
    pub panel_background: Color32,
    pub viewport_background: Color32,
    pub bar_idle: Color32,
    pub dot_color: Color32,
    pub title_size: f32,
    pub body_size: f32,
    pub timeline_label_size: f32,
    pub timeline_duration_size: f32,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            background: Color32::from_rgb(0x14, 0x14, 0x18),
            foreground: Color32::from_rgb(0xC8, 0xC8, 0xC8),
            heading_color: Color32::WHITE,
            accent: Color32::from_rgb(0x3D, 0xD6, 0x8C),
            panel_background: Color32::from_rgb(0x1E, 0x1E, 0x24),
            viewport_background: Color32::from_rgb(0x0A, 0x0A, 0x0C),
            bar_idle: Color32::from_rgb(0x3A, 0x3A, 0x42),
            dot_color: Color32::from_rgb(0x6A, 0x6A, 0x74),
            title_size: 30.0,
            body_size: 18.0,
            timeline_label_size: 13.0,
            timeline_duration_size: 11.0,
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            background: Color32::WHITE,
            foreground: Color32::from_rgb(0x1A, 0x1A, 0x2E),
            heading_color: Color32::from_rgb(0x16, 0x21, 0x3E),
            accent: Color32::from_rgb(0x0E, 0x8A, 0x4D),
            panel_background: Color32::from_rgb(0xF2, 0xF2, 0xF5),
            viewport_background: Color32::from_rgb(0xE4, 0xE4, 0xE9),
            bar_idle: Color32::from_rgb(0xD0, 0xD0, 0xD8),
            dot_color: Color32::from_rgb(0x9A, 0x9A, 0xA4),
            title_size: 30.0,
            body_size: 18.0,
            timeline_label_size: 13.0,
            timeline_duration_size: 11.0,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "dark" => Self::dark(),
            _ => Self::light(),
        }
    }

    /// Apply opacity to a color
    pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
        Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), (opacity * 255.0) as u8)
    }

    /// Distinct colors for timeline stages, assigned by first appearance.
    pub fn stage_palette(&self) -> Vec<Color32> {
        if self.name == "dark" {
            vec![
                Color32::from_rgb(0x5C, 0xB8, 0xFF), // bright blue
                Color32::from_rgb(0xFF, 0x7E, 0x67), // coral
                Color32::from_rgb(0x5C, 0xDB, 0x95), // mint green
                Color32::from_rgb(0xE8, 0xA8, 0x38), // amber
                Color32::from_rgb(0xC0, 0x7E, 0xF1), // purple
                Color32::from_rgb(0x4E, 0xD4, 0xD4), // teal
            ]
        } else {
            vec![
                Color32::from_rgb(0x1A, 0x6B, 0xB5), // deep blue
                Color32::from_rgb(0xC7, 0x3E, 0x1D), // brick red
                Color32::from_rgb(0x1E, 0x8A, 0x5A), // forest green
                Color32::from_rgb(0xB8, 0x7B, 0x0A), // dark amber
                Color32::from_rgb(0x7B, 0x3F, 0xA0), // purple
                Color32::from_rgb(0x18, 0x8A, 0x8D), // teal
            ]
        }
    }
}

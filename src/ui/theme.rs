use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: &'static str,
    pub header_accent_bg: Color,
    pub header_accent_fg: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
    pub border: Color,
    pub overlay_border: Color,
    pub surface_bg: Color,
    pub statusbar_bg: Color,
    pub pill_key_fg: Color,
    pub pill_key_bg: Color,
    pub pill_desc_fg: Color,
    pub status_ok: Color,
    pub status_err: Color,
    pub status_busy: Color,
    pub memory_high: Color,
    pub accent: Color,
}

impl Theme {
    pub fn from_config(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }

    pub fn dark() -> Self {
        Theme {
            name: "dark",
            header_accent_bg: Color::Rgb(203, 166, 247),
            header_accent_fg: Color::Rgb(30, 30, 46),
            text_primary: Color::Rgb(205, 214, 244),
            text_secondary: Color::Rgb(166, 173, 200),
            text_muted: Color::Rgb(108, 112, 134),
            selection_bg: Color::Rgb(69, 71, 90),
            selection_fg: Color::Rgb(245, 224, 220),
            border: Color::Rgb(88, 91, 112),
            overlay_border: Color::Rgb(137, 180, 250),
            surface_bg: Color::Rgb(30, 30, 46),
            statusbar_bg: Color::Rgb(24, 24, 37),
            pill_key_fg: Color::Rgb(30, 30, 46),
            pill_key_bg: Color::Rgb(137, 180, 250),
            pill_desc_fg: Color::Rgb(186, 194, 222),
            status_ok: Color::Rgb(166, 227, 161),
            status_err: Color::Rgb(243, 139, 168),
            status_busy: Color::Rgb(249, 226, 175),
            memory_high: Color::Rgb(250, 179, 135),
            accent: Color::Rgb(203, 166, 247),
        }
    }

    pub fn light() -> Self {
        Theme {
            name: "light",
            header_accent_bg: Color::Rgb(136, 57, 239),
            header_accent_fg: Color::Rgb(239, 241, 245),
            text_primary: Color::Rgb(76, 79, 105),
            text_secondary: Color::Rgb(92, 95, 119),
            text_muted: Color::Rgb(140, 143, 161),
            selection_bg: Color::Rgb(204, 208, 218),
            selection_fg: Color::Rgb(76, 79, 105),
            border: Color::Rgb(172, 176, 190),
            overlay_border: Color::Rgb(30, 102, 245),
            surface_bg: Color::Rgb(239, 241, 245),
            statusbar_bg: Color::Rgb(230, 233, 239),
            pill_key_fg: Color::Rgb(239, 241, 245),
            pill_key_bg: Color::Rgb(30, 102, 245),
            pill_desc_fg: Color::Rgb(76, 79, 105),
            status_ok: Color::Rgb(64, 160, 43),
            status_err: Color::Rgb(210, 15, 57),
            status_busy: Color::Rgb(223, 142, 29),
            memory_high: Color::Rgb(254, 100, 11),
            accent: Color::Rgb(136, 57, 239),
        }
    }
}

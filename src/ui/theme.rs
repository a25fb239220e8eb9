use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Theme color palette defining all colors used in the application.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub primary: ColorSpec,
    pub accent: ColorSpec,

    // Text colors
    pub text: ColorSpec,
    pub text_muted: ColorSpec,

    // Background colors
    pub background: ColorSpec,
    pub surface: ColorSpec,

    // Status colors
    pub success: ColorSpec,
    pub warning: ColorSpec,
    pub error: ColorSpec,
    pub info: ColorSpec,

    // UI element colors
    pub border_active: ColorSpec,
    pub border_normal: ColorSpec,
    pub highlight_bg: ColorSpec,
    pub highlight_fg: ColorSpec,
}

/// Color specification that can be serialized/deserialized.
///
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorSpec {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorSpec {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        ColorSpec { r, g, b }
    }

    pub fn to_color(&self) -> Color {
        Color::Rgb(self.r, self.g, self.b)
    }
}

const fn rgb(r: u8, g: u8, b: u8) -> ColorSpec {
    ColorSpec::rgb(r, g, b)
}

impl Default for Theme {
    /// Rose Pine Dawn, the light mode default.
    fn default() -> Self {
        Self::rose_pine_dawn()
    }
}

impl Theme {
    pub fn rose_pine_dawn() -> Self {
        Theme {
            name: "rose-pine-dawn".to_string(),
            primary: rgb(144, 122, 169),
            accent: rgb(180, 99, 122),
            text: rgb(87, 82, 121),
            text_muted: rgb(152, 147, 165),
            background: rgb(250, 244, 237),
            surface: rgb(255, 250, 243),
            success: rgb(40, 105, 131),
            warning: rgb(234, 157, 52),
            error: rgb(180, 99, 122),
            info: rgb(86, 148, 159),
            border_active: rgb(144, 122, 169),
            border_normal: rgb(152, 147, 165),
            highlight_bg: rgb(223, 218, 217),
            highlight_fg: rgb(87, 82, 121),
        }
    }

    pub fn rose_pine() -> Self {
        Theme {
            name: "rose-pine".to_string(),
            primary: rgb(196, 167, 231),
            accent: rgb(235, 111, 146),
            text: rgb(224, 222, 244),
            text_muted: rgb(110, 106, 134),
            background: rgb(25, 23, 36),
            surface: rgb(31, 29, 46),
            success: rgb(49, 116, 143),
            warning: rgb(246, 193, 119),
            error: rgb(235, 111, 146),
            info: rgb(156, 207, 216),
            border_active: rgb(196, 167, 231),
            border_normal: rgb(144, 140, 170),
            highlight_bg: rgb(64, 61, 82),
            highlight_fg: rgb(224, 222, 244),
        }
    }

    pub fn dracula() -> Self {
        Theme {
            name: "dracula".to_string(),
            primary: rgb(189, 147, 249),
            accent: rgb(255, 121, 198),
            text: rgb(248, 248, 242),
            text_muted: rgb(98, 114, 164),
            background: rgb(40, 42, 54),
            surface: rgb(68, 71, 90),
            success: rgb(80, 250, 123),
            warning: rgb(255, 184, 108),
            error: rgb(255, 85, 85),
            info: rgb(139, 233, 253),
            border_active: rgb(189, 147, 249),
            border_normal: rgb(98, 114, 164),
            highlight_bg: rgb(68, 71, 90),
            highlight_fg: rgb(248, 248, 242),
        }
    }

    pub fn catppuccin_latte() -> Self {
        Theme {
            name: "catppuccin-latte".to_string(),
            primary: rgb(136, 57, 239),
            accent: rgb(234, 118, 203),
            text: rgb(76, 79, 105),
            text_muted: rgb(108, 111, 133),
            background: rgb(239, 241, 245),
            surface: rgb(230, 233, 239),
            success: rgb(64, 160, 43),
            warning: rgb(223, 142, 29),
            error: rgb(210, 15, 57),
            info: rgb(32, 159, 181),
            border_active: rgb(136, 57, 239),
            border_normal: rgb(108, 111, 133),
            highlight_bg: rgb(204, 208, 218),
            highlight_fg: rgb(76, 79, 105),
        }
    }

    pub fn catppuccin_mocha() -> Self {
        Theme {
            name: "catppuccin-mocha".to_string(),
            primary: rgb(203, 166, 247),
            accent: rgb(250, 179, 135),
            text: rgb(205, 214, 244),
            text_muted: rgb(127, 132, 156),
            background: rgb(30, 30, 46),
            surface: rgb(24, 24, 37),
            success: rgb(166, 227, 161),
            warning: rgb(249, 226, 175),
            error: rgb(243, 139, 168),
            info: rgb(137, 180, 250),
            border_active: rgb(203, 166, 247),
            border_normal: rgb(108, 112, 134),
            highlight_bg: rgb(49, 50, 68),
            highlight_fg: rgb(205, 214, 244),
        }
    }

    /// Tokyo Night, the dark mode default.
    ///
    pub fn tokyo_night() -> Self {
        Theme {
            name: "tokyo-night".to_string(),
            primary: rgb(122, 162, 247),
            accent: rgb(187, 154, 247),
            text: rgb(192, 202, 245),
            text_muted: rgb(86, 95, 137),
            background: rgb(26, 27, 38),
            surface: rgb(36, 40, 59),
            success: rgb(158, 206, 106),
            warning: rgb(224, 175, 104),
            error: rgb(247, 118, 142),
            info: rgb(125, 207, 255),
            border_active: rgb(122, 162, 247),
            border_normal: rgb(65, 72, 104),
            highlight_bg: rgb(41, 46, 66),
            highlight_fg: rgb(192, 202, 245),
        }
    }

    pub fn tokyo_night_day() -> Self {
        Theme {
            name: "tokyo-night-day".to_string(),
            primary: rgb(46, 125, 233),
            accent: rgb(152, 84, 241),
            text: rgb(55, 96, 191),
            text_muted: rgb(132, 140, 181),
            background: rgb(225, 226, 231),
            surface: rgb(208, 213, 227),
            success: rgb(88, 117, 57),
            warning: rgb(140, 108, 62),
            error: rgb(245, 42, 101),
            info: rgb(0, 113, 151),
            border_active: rgb(46, 125, 233),
            border_normal: rgb(132, 140, 181),
            highlight_bg: rgb(196, 200, 218),
            highlight_fg: rgb(55, 96, 191),
        }
    }

    /// Get a theme by name.
    ///
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "rose-pine-dawn" => Some(Self::rose_pine_dawn()),
            "rose-pine" => Some(Self::rose_pine()),
            "dracula" => Some(Self::dracula()),
            "catppuccin-latte" => Some(Self::catppuccin_latte()),
            "catppuccin-mocha" => Some(Self::catppuccin_mocha()),
            "tokyo-night" => Some(Self::tokyo_night()),
            "tokyo-night-day" => Some(Self::tokyo_night_day()),
            _ => None,
        }
    }

    /// Get list of all available theme names.
    ///
    pub fn available_themes() -> Vec<&'static str> {
        vec![
            "rose-pine-dawn",
            "rose-pine",
            "dracula",
            "catppuccin-latte",
            "catppuccin-mocha",
            "tokyo-night",
            "tokyo-night-day",
        ]
    }

    /// Badge color for an issue status.
    ///
    pub fn status_color(&self, status: &str) -> Color {
        match status {
            "Done" => self.success,
            "In Progress" => self.warning,
            "In Review" => self.accent,
            "Todo" => self.info,
            _ => self.text_muted,
        }
        .to_color()
    }

    /// Badge color for an issue priority.
    ///
    pub fn priority_color(&self, priority: &str) -> Color {
        match priority {
            "Urgent" => self.error,
            "High" => self.warning,
            "Medium" => self.info,
            _ => self.text_muted,
        }
        .to_color()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_available_theme_resolves_by_name() {
        for name in Theme::available_themes() {
            let theme = Theme::from_name(name).unwrap();
            assert_eq!(theme.name, name);
        }
        assert!(Theme::from_name("solarized").is_none());
    }

    #[test]
    fn badge_colors() {
        let theme = Theme::tokyo_night();
        assert_eq!(theme.status_color("Done"), theme.success.to_color());
        assert_eq!(theme.priority_color("Urgent"), theme.error.to_color());
        assert_eq!(theme.status_color("Unknown"), theme.text_muted.to_color());
    }
}

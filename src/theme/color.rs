use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Base color palette
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorPalette {
    // Base colors
    pub background: Color,
    pub foreground: Color,
    pub surface: Color,
    pub overlay: Color,

    // Text colors
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,

    // UI element colors
    pub border: Color,
    pub border_focused: Color,
    pub selection: Color,
    pub selection_text: Color,

    // Status colors
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,

    // Special purpose colors
    pub accent: Color,
    pub highlight: Color,
}

/// Complete theme color scheme
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeColors {
    pub palette: ColorPalette,
    pub dashboard: DashboardColors,
}

/// Colors specific to dashboard widgets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardColors {
    pub stat_value: Color,
    pub stat_label: Color,
    pub price: Color,
    pub best_price: Color,
    pub savings: Color,
    pub price_up: Color,
    pub price_down: Color,
}

impl DashboardColors {
    fn from_palette(palette: &ColorPalette) -> Self {
        Self {
            stat_value: palette.accent,
            stat_label: palette.text_secondary,
            price: palette.success,
            best_price: palette.success,
            savings: palette.highlight,
            price_up: palette.error,
            price_down: palette.success,
        }
    }
}

impl ThemeColors {
    fn from_palette(palette: ColorPalette) -> Self {
        Self {
            dashboard: DashboardColors::from_palette(&palette),
            palette,
        }
    }

    /// Dark scheme with the dashboard's purple accent
    pub fn dark() -> Self {
        Self::from_palette(ColorPalette {
            background: Color::Rgb(16, 16, 20),
            foreground: Color::Rgb(224, 224, 230),
            surface: Color::Rgb(24, 24, 28),
            overlay: Color::Rgb(32, 32, 36),

            text_primary: Color::Rgb(224, 224, 230),
            text_secondary: Color::Rgb(160, 160, 168),
            text_muted: Color::Rgb(112, 112, 120),

            border: Color::Rgb(64, 64, 72),
            border_focused: Color::Rgb(102, 126, 234),
            selection: Color::Rgb(102, 126, 234),
            selection_text: Color::Rgb(16, 16, 20),

            success: Color::Rgb(76, 175, 80),
            warning: Color::Rgb(255, 193, 7),
            error: Color::Rgb(244, 67, 54),
            info: Color::Rgb(33, 150, 243),

            accent: Color::Rgb(102, 126, 234),
            highlight: Color::Rgb(255, 235, 59),
        })
    }

    pub fn light() -> Self {
        Self::from_palette(ColorPalette {
            background: Color::Rgb(250, 250, 252),
            foreground: Color::Rgb(32, 32, 40),
            surface: Color::Rgb(242, 242, 245),
            overlay: Color::Rgb(234, 234, 238),

            text_primary: Color::Rgb(32, 32, 40),
            text_secondary: Color::Rgb(96, 96, 104),
            text_muted: Color::Rgb(144, 144, 152),

            border: Color::Rgb(208, 208, 216),
            border_focused: Color::Rgb(118, 75, 162),
            selection: Color::Rgb(118, 75, 162),
            selection_text: Color::Rgb(250, 250, 252),

            success: Color::Rgb(46, 125, 50),
            warning: Color::Rgb(255, 149, 0),
            error: Color::Rgb(211, 47, 47),
            info: Color::Rgb(0, 122, 255),

            accent: Color::Rgb(118, 75, 162),
            highlight: Color::Rgb(191, 144, 0),
        })
    }

    pub fn high_contrast() -> Self {
        Self::from_palette(ColorPalette {
            background: Color::Black,
            foreground: Color::White,
            surface: Color::Rgb(32, 32, 32),
            overlay: Color::Rgb(48, 48, 48),

            text_primary: Color::White,
            text_secondary: Color::Rgb(200, 200, 200),
            text_muted: Color::Rgb(160, 160, 160),

            border: Color::Rgb(128, 128, 128),
            border_focused: Color::Yellow,
            selection: Color::Yellow,
            selection_text: Color::Black,

            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            info: Color::Cyan,

            accent: Color::Yellow,
            highlight: Color::Magenta,
        })
    }
}

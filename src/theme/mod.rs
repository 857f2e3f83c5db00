pub mod color;

use ratatui::style::{Modifier, Style};
use serde::{Deserialize, Serialize};

pub use color::{ColorPalette, DashboardColors, ThemeColors};

/// Main theme structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            colors: ThemeColors::dark(),
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            colors: ThemeColors::light(),
        }
    }

    /// High contrast theme for better accessibility
    pub fn high_contrast() -> Self {
        Self {
            name: "high-contrast".to_string(),
            colors: ThemeColors::high_contrast(),
        }
    }

    /// Names accepted by [`Theme::from_name`]
    pub fn available() -> [&'static str; 3] {
        ["dark", "light", "high-contrast"]
    }

    /// Look up a theme by configuration name, falling back to dark
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "light" => Self::light(),
            "high-contrast" | "high_contrast" | "contrast" => Self::high_contrast(),
            "dark" => Self::dark(),
            other => {
                tracing::warn!("Unknown theme '{}', using dark", other);
                Self::dark()
            }
        }
    }

    /// Screen background and default text
    pub fn base(&self) -> Style {
        Style::default()
            .fg(self.colors.palette.foreground)
            .bg(self.colors.palette.background)
    }

    /// Background of dialogs drawn over the page
    pub fn overlay(&self) -> Style {
        Style::default()
            .fg(self.colors.palette.foreground)
            .bg(self.colors.palette.overlay)
    }

    /// Border style for a pane, highlighted when focused
    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.colors.palette.border_focused)
        } else {
            Style::default().fg(self.colors.palette.border)
        }
    }

    pub fn text(&self) -> Style {
        Style::default().fg(self.colors.palette.text_primary)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.colors.palette.text_muted)
    }

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.colors.palette.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn selection(&self) -> Style {
        Style::default()
            .fg(self.colors.palette.selection_text)
            .bg(self.colors.palette.selection)
            .add_modifier(Modifier::BOLD)
    }

    pub fn price(&self) -> Style {
        Style::default()
            .fg(self.colors.dashboard.price)
            .add_modifier(Modifier::BOLD)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(Theme::from_name("Light").name, "light");
        assert_eq!(Theme::from_name("high_contrast").name, "high-contrast");
        assert_eq!(Theme::from_name("neon").name, "dark");
        for name in Theme::available() {
            assert_eq!(Theme::from_name(name).name, name);
        }
    }

    #[test]
    fn test_base_and_overlay_differ() {
        for name in Theme::available() {
            let theme = Theme::from_name(name);
            assert_eq!(theme.base().bg, Some(theme.colors.palette.background));
            assert_eq!(theme.overlay().bg, Some(theme.colors.palette.overlay));
            assert_ne!(theme.base().bg, theme.overlay().bg);
        }
    }
}

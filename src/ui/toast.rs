/// Toast notification system for user feedback
///
/// Provides non-intrusive, temporary notifications that appear at the top-right
/// of the screen and automatically dismiss after a configurable duration.

use crate::tea::message::ToastLevel;
use crate::theme::Theme;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use std::collections::VecDeque;
use tokio::time::{Duration, Instant};

/// Maximum number of toasts to display simultaneously
const MAX_VISIBLE_TOASTS: usize = 5;

/// Default lifetime of a toast
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_secs(5);

/// Toast notification item
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub level: ToastLevel,
    pub created_at: Instant,
    pub duration: Duration,
}

impl Toast {
    /// Create a toast with custom duration
    pub fn with_duration(message: String, level: ToastLevel, duration: Duration) -> Self {
        Self {
            message,
            level,
            created_at: Instant::now(),
            duration,
        }
    }

    /// Check if toast has expired
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.duration
    }

    /// Get remaining time as percentage (1.0 = full time, 0.0 = expired)
    pub fn remaining_percentage(&self) -> f64 {
        let elapsed = self.created_at.elapsed();
        if elapsed >= self.duration {
            0.0
        } else {
            1.0 - (elapsed.as_secs_f64() / self.duration.as_secs_f64())
        }
    }

    /// Get toast icon based on level
    pub fn icon(&self) -> &'static str {
        match self.level {
            ToastLevel::Info => "ℹ",
            ToastLevel::Success => "✓",
            ToastLevel::Warning => "⚠",
            ToastLevel::Error => "✗",
        }
    }

    /// Accent and background colors for the level
    pub fn colors(&self, theme: &Theme) -> (Color, Color) {
        let palette = &theme.colors.palette;
        let accent = match self.level {
            ToastLevel::Info => palette.info,
            ToastLevel::Success => palette.success,
            ToastLevel::Warning => palette.warning,
            ToastLevel::Error => palette.error,
        };
        (accent, palette.surface)
    }
}

/// Toast notification manager
#[derive(Debug, Clone)]
pub struct ToastManager {
    toasts: VecDeque<Toast>,
    default_duration: Duration,
}

impl Default for ToastManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ToastManager {
    /// Create a new toast manager
    pub fn new() -> Self {
        Self::with_duration(DEFAULT_TOAST_DURATION)
    }

    /// Create a manager whose toasts live for `duration`
    pub fn with_duration(duration: Duration) -> Self {
        Self {
            toasts: VecDeque::new(),
            default_duration: duration,
        }
    }

    /// Add a new toast notification
    pub fn add_toast(&mut self, toast: Toast) {
        // Oldest goes first at capacity
        if self.toasts.len() >= MAX_VISIBLE_TOASTS {
            self.toasts.pop_front();
        }

        self.toasts.push_back(toast);
    }

    /// Add a simple toast with message and level
    pub fn show(&mut self, message: String, level: ToastLevel) {
        let toast = Toast::with_duration(message, level, self.default_duration);
        self.add_toast(toast);
    }

    /// Remove expired toasts
    pub fn update(&mut self) {
        self.toasts.retain(|toast| !toast.is_expired());
    }

    /// Get current toasts
    pub fn toasts(&self) -> &VecDeque<Toast> {
        &self.toasts
    }

    /// Check if there are any active toasts
    pub fn has_toasts(&self) -> bool {
        !self.toasts.is_empty()
    }

    /// Clear all toasts
    pub fn clear(&mut self) {
        self.toasts.clear();
    }
}

/// Convenience functions for common toast types
impl ToastManager {
    /// Show an info toast
    pub fn info<S: Into<String>>(&mut self, message: S) {
        self.show(message.into(), ToastLevel::Info);
    }

    /// Show a success toast
    pub fn success<S: Into<String>>(&mut self, message: S) {
        self.show(message.into(), ToastLevel::Success);
    }

    /// Show an error toast
    pub fn error<S: Into<String>>(&mut self, message: S) {
        self.show(message.into(), ToastLevel::Error);
    }
}

/// Toast renderer for displaying notifications
pub struct ToastRenderer;

impl ToastRenderer {
    /// Height per toast including borders
    const TOAST_HEIGHT: u16 = 4;

    /// Render toast notifications in the top-right corner
    pub fn render(frame: &mut Frame, area: Rect, toasts: &VecDeque<Toast>, theme: &Theme) {
        if toasts.is_empty() {
            return;
        }

        let toast_width = area.width.min(50);
        let toast_area = Rect {
            x: area.x + area.width.saturating_sub(toast_width).saturating_sub(2),
            y: area.y + 1,
            width: toast_width,
            height: area.height.saturating_sub(2),
        };

        // Newest on top
        let mut current_y = toast_area.y;
        for toast in toasts.iter().rev() {
            if current_y + Self::TOAST_HEIGHT > toast_area.y + toast_area.height {
                break;
            }

            let individual_toast_area = Rect {
                x: toast_area.x,
                y: current_y,
                width: toast_area.width,
                height: Self::TOAST_HEIGHT,
            };

            Self::render_individual_toast(frame, individual_toast_area, toast, theme);
            current_y += Self::TOAST_HEIGHT + 1;
        }
    }

    /// Render an individual toast notification
    fn render_individual_toast(frame: &mut Frame, area: Rect, toast: &Toast, theme: &Theme) {
        frame.render_widget(Clear, area);

        let (accent_color, bg_color) = toast.colors(theme);
        let text_color = theme.colors.palette.text_primary;

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(accent_color))
            .style(Style::default().bg(bg_color));

        let inner_area = block.inner(area);
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(inner_area);

        frame.render_widget(block, area);

        let icon_paragraph = Paragraph::new(toast.icon())
            .style(Style::default().fg(accent_color).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center);
        frame.render_widget(icon_paragraph, chunks[0]);

        let message_lines: Vec<Line> = toast
            .message
            .lines()
            .map(|line| Line::from(Span::styled(line, Style::default().fg(text_color))))
            .collect();
        let content_paragraph = Paragraph::new(message_lines)
            .wrap(Wrap { trim: true })
            .alignment(Alignment::Left);
        frame.render_widget(content_paragraph, chunks[1]);

        Self::render_progress_bar(frame, area, toast, accent_color);
    }

    /// Render progress bar showing remaining time
    fn render_progress_bar(frame: &mut Frame, area: Rect, toast: &Toast, color: Color) {
        let progress_area = Rect {
            x: area.x + 1,
            y: area.y + area.height - 1,
            width: area.width.saturating_sub(2),
            height: 1,
        };

        let filled_width = ((progress_area.width as f64) * toast.remaining_percentage()) as usize;
        let progress_paragraph = Paragraph::new("▔".repeat(filled_width)).style(Style::default().fg(color));
        frame.render_widget(progress_paragraph, progress_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_creation() {
        let mut manager = ToastManager::new();
        manager.info("Test message");
        let toast = &manager.toasts()[0];
        assert_eq!(toast.message, "Test message");
        assert_eq!(toast.level, ToastLevel::Info);
        assert_eq!(toast.duration, DEFAULT_TOAST_DURATION);
        assert!(!toast.is_expired());
    }

    #[test]
    fn test_toast_manager() {
        let mut manager = ToastManager::new();
        assert!(!manager.has_toasts());

        manager.info("Cargando productos");
        manager.success("¡Alerta creada exitosamente!");
        manager.show("No se pudo abrir el enlace".to_string(), ToastLevel::Warning);
        manager.error("Error cargando productos");
        assert_eq!(manager.toasts().len(), 4);
        assert_eq!(manager.toasts()[2].icon(), "⚠");

        manager.clear();
        assert!(!manager.has_toasts());
    }

    #[test]
    fn test_max_visible_toasts() {
        let mut manager = ToastManager::new();
        for n in 1..=MAX_VISIBLE_TOASTS + 2 {
            manager.info(format!("Toast {n}"));
        }

        assert_eq!(manager.toasts().len(), MAX_VISIBLE_TOASTS);
        assert_eq!(manager.toasts()[0].message, "Toast 3");
    }

    #[test]
    fn test_expired_toasts_are_removed() {
        let mut manager = ToastManager::with_duration(Duration::from_millis(10));
        manager.error("Error cargando productos");
        std::thread::sleep(Duration::from_millis(30));
        manager.update();
        assert!(!manager.has_toasts());
    }

    #[test]
    fn test_toast_progress() {
        let toast = Toast::with_duration("Test".to_string(), ToastLevel::Info, Duration::from_secs(2));
        std::thread::sleep(Duration::from_millis(100));
        assert!(toast.remaining_percentage() < 1.0);
        assert!(toast.remaining_percentage() > 0.8);
    }
}

pub mod alert_form;
pub mod filters;
pub mod modal;
pub mod product_table;
pub mod stats;
pub mod toast;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

use crate::tea::message::FocusTarget;
use crate::tea::Model;
use crate::theme::Theme;

pub use toast::{Toast, ToastManager, ToastRenderer};

/// Render the whole dashboard for the current model
pub fn render(frame: &mut Frame, model: &Model, theme: &Theme) {
    let area = frame.size();
    frame.render_widget(Block::default().style(theme.base()), area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(4), // Stats counters
            Constraint::Length(3), // Filters
            Constraint::Min(5),    // Products + alert form
            Constraint::Length(1), // Key hints
        ])
        .split(area);

    render_title(frame, rows[0], model, theme);
    stats::render(frame, rows[1], model.stats.as_ref(), model.loading.stats, theme);
    filters::render(frame, rows[2], model, theme);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(38)])
        .split(rows[3]);
    product_table::render(frame, body[0], model, theme);
    alert_form::render(frame, body[1], model, theme);

    render_hints(frame, rows[4], model, theme);

    if let Some(modal) = &model.modal {
        modal::render(frame, area, modal, theme);
    }

    ToastRenderer::render(frame, area, model.toasts.toasts(), theme);
}

fn render_title(frame: &mut Frame, area: Rect, model: &Model, theme: &Theme) {
    let mut spans = vec![Span::styled(" 🛒 WongPrime Dashboard", theme.title())];
    if model.loading.any() {
        spans.push(Span::styled("  ⟳ cargando...", theme.muted()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Key hints for the current context
pub fn key_hints(model: &Model) -> &'static str {
    if model.modal.is_some() {
        return "Esc cerrar · j/k desplazar · a crear alerta · o abrir tienda";
    }
    match model.focus {
        FocusTarget::Search => "Escribir para buscar · Enter aplicar · Esc limpiar · Tab siguiente",
        FocusTarget::Category | FocusTarget::Brand => "←/→ cambiar filtro · x quitar filtros · Tab siguiente",
        FocusTarget::Products => {
            "j/k mover · Enter detalle · c comparar · a alerta · / buscar · r recargar · e exportar · ? ayuda · q salir"
        }
        FocusTarget::AlertForm => "↑/↓ campo · Enter enviar · Ctrl+U limpiar campo · Esc volver",
    }
}

fn render_hints(frame: &mut Frame, area: Rect, model: &Model, theme: &Theme) {
    let hints = Paragraph::new(key_hints(model))
        .style(Style::default().fg(theme.colors.palette.text_muted))
        .alignment(Alignment::Center);
    frame.render_widget(hints, area);
}

/// Rectangle of the given percentage size centered in `area`
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::tea::message::FocusTarget;
use crate::tea::Model;
use crate::theme::Theme;

/// Label shown when no category / brand is selected
pub const ALL_OPTIONS: &str = "Todas";

/// Render the search box and the category / brand selectors
pub fn render(frame: &mut Frame, area: Rect, model: &Model, theme: &Theme) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(50),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let search_focused = model.focus == FocusTarget::Search && model.modal.is_none();
    let mut search_spans = vec![Span::styled(model.filters.search.as_str(), theme.text())];
    if search_focused {
        search_spans.push(Span::styled("▏", theme.title()));
    } else if model.filters.search.is_empty() {
        search_spans.push(Span::styled("Buscar productos...", theme.muted()));
    }
    let search = Paragraph::new(Line::from(search_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Buscar ")
            .border_style(theme.border_style(search_focused)),
    );
    frame.render_widget(search, columns[0]);

    render_selector(
        frame,
        columns[1],
        " Categoría ",
        model.selected_category(),
        model.focus == FocusTarget::Category,
        theme,
    );
    render_selector(
        frame,
        columns[2],
        " Marca ",
        model.selected_brand(),
        model.focus == FocusTarget::Brand,
        theme,
    );
}

/// Text shown inside a selector
pub fn selector_label(value: Option<&str>) -> String {
    format!("◂ {} ▸", value.unwrap_or(ALL_OPTIONS))
}

fn render_selector(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    value: Option<&str>,
    focused: bool,
    theme: &Theme,
) {
    let style = if focused { theme.title() } else { theme.text() };
    let selector = Paragraph::new(Span::styled(selector_label(value), style)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title.to_string())
            .border_style(theme.border_style(focused)),
    );
    frame.render_widget(selector, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_label() {
        assert_eq!(selector_label(None), "◂ Todas ▸");
        assert_eq!(selector_label(Some("Salud")), "◂ Salud ▸");
    }
}

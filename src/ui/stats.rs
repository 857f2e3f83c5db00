use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::api::Stats;
use crate::theme::Theme;

/// Label and value of each counter, in display order
pub fn counters(stats: Option<&Stats>, loading: bool) -> [(&'static str, String); 4] {
    let value = |count: Option<i64>| match count {
        Some(v) => v.to_string(),
        None if loading => "…".to_string(),
        None => "-".to_string(),
    };
    [
        ("Productos", value(stats.map(|s| s.total_products))),
        ("Tiendas", value(stats.map(|s| s.total_stores))),
        ("Categorías", value(stats.map(|s| s.total_categories))),
        ("Alertas Activas", value(stats.map(|s| s.active_alerts))),
    ]
}

/// Render the statistics counters row
pub fn render(frame: &mut Frame, area: Rect, stats: Option<&Stats>, loading: bool, theme: &Theme) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for ((label, value), column) in counters(stats, loading).into_iter().zip(columns.iter()) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style(false));
        let lines = vec![
            Line::from(Span::styled(
                value,
                Style::default()
                    .fg(theme.colors.dashboard.stat_value)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                label,
                Style::default().fg(theme.colors.dashboard.stat_label),
            )),
        ];
        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, *column);
    }
}

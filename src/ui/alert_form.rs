use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tea::message::FocusTarget;
use crate::tea::model::AlertField;
use crate::tea::Model;
use crate::theme::Theme;

const FIELDS: [AlertField; 3] = [AlertField::ProductId, AlertField::Email, AlertField::TargetPrice];

/// Render the price alert form
pub fn render(frame: &mut Frame, area: Rect, model: &Model, theme: &Theme) {
    let focused = model.focus == FocusTarget::AlertForm && model.modal.is_none();
    let form = &model.alert_form;

    let mut lines = Vec::new();
    for field in FIELDS {
        let active = focused && form.field == field;
        let label_style = if active { theme.title() } else { theme.muted() };
        lines.push(Line::from(Span::styled(field.label(), label_style)));

        let value = form.value(field);
        let mut spans = vec![Span::styled(if active { "> " } else { "  " }, label_style)];
        if value.is_empty() && !active {
            spans.push(Span::styled("…", theme.muted()));
        } else {
            spans.push(Span::styled(value.to_string(), theme.text()));
        }
        if active {
            spans.push(Span::styled("▏", theme.title()));
        }
        lines.push(Line::from(spans));
        lines.push(Line::default());
    }

    let hint = if model.loading.alert {
        "Creando alerta..."
    } else if focused {
        "Enter: Crear Alerta"
    } else {
        "Tab hasta aquí o 'a' en un producto"
    };
    lines.push(Line::from(Span::styled(
        hint,
        theme.muted().add_modifier(Modifier::ITALIC),
    )));

    let form_widget = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" 🔔 Alerta de Precio ")
            .border_style(theme.border_style(focused)),
    );
    frame.render_widget(form_widget, area);
}

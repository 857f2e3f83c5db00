use ratatui::{
    layout::{Alignment, Constraint, Rect},
    text::Span,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::format;
use crate::tea::message::FocusTarget;
use crate::tea::Model;
use crate::theme::Theme;

/// Shown when the listing comes back empty
pub const EMPTY_MESSAGE: &str = "No se encontraron productos";

const HEADERS: [&str; 5] = ["Producto", "Marca", "Categoría", "Mejor precio", "Acciones"];
const ACTIONS: &str = "⏎ detalle · c comparar";

/// Cell texts for every product row
pub fn rows(model: &Model) -> Vec<[String; 5]> {
    model
        .products
        .iter()
        .map(|product| {
            [
                product.name.clone(),
                format::or_dash(product.brand.as_deref()).to_string(),
                format::or_dash(product.category.as_deref()).to_string(),
                format::optional_price(model.best_price(product.id)),
                ACTIONS.to_string(),
            ]
        })
        .collect()
}

/// Render the product table
pub fn render(frame: &mut Frame, area: Rect, model: &Model, theme: &Theme) {
    let focused = model.focus == FocusTarget::Products && model.modal.is_none();
    let title = if model.loading.products {
        " Productos (cargando...) ".to_string()
    } else {
        format!(" Productos ({}) ", model.products.len())
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(theme.border_style(focused));

    if model.products.is_empty() {
        let empty = Paragraph::new(Span::styled(EMPTY_MESSAGE, theme.muted()))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(HEADERS.iter().map(|h| Cell::from(*h)))
        .style(theme.title())
        .bottom_margin(1);

    let body: Vec<Row> = rows(model)
        .into_iter()
        .map(|[name, brand, category, price, actions]| {
            Row::new(vec![
                Cell::from(name).style(theme.text()),
                Cell::from(brand).style(theme.text()),
                Cell::from(category).style(theme.text()),
                Cell::from(price).style(theme.price()),
                Cell::from(actions).style(theme.muted()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Percentage(36),
        Constraint::Percentage(16),
        Constraint::Percentage(18),
        Constraint::Percentage(12),
        Constraint::Percentage(18),
    ];

    let table = Table::new(body, widths)
        .header(header)
        .block(block)
        .highlight_style(theme.selection())
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(model.selected.min(model.products.len() - 1)));
    frame.render_stateful_widget(table, area, &mut state);
}

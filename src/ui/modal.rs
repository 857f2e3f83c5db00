//! Overlay dialogs: product detail, store comparison and the key help.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::api::{PriceHistoryEntry, ProductDetail, Store, StoreComparison};
use crate::format;
use crate::tea::model::Modal;
use crate::theme::Theme;
use crate::ui::centered_rect;

/// Marker shown next to the cheapest store
pub const BEST_PRICE_MARK: &str = "✓ Mejor Precio";

/// Most recent history rows shown in the detail dialog, newest first
const HISTORY_ROWS: usize = 15;

pub fn render(frame: &mut Frame, area: Rect, modal: &Modal, theme: &Theme) {
    let (title, lines, size) = match modal {
        Modal::ProductDetail { detail, history, .. } => {
            (" Detalle del Producto ", detail_lines(detail, history, theme), (70, 80))
        }
        Modal::Comparison { comparison, .. } => {
            (" Comparación de Precios ", comparison_lines(comparison, theme), (60, 60))
        }
        Modal::Help => (" Ayuda ", help_lines(theme), (60, 70)),
    };

    let popup = centered_rect(size.0, size.1, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_style(theme.title())
        .border_style(theme.border_style(true))
        .style(theme.overlay());

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((modal.scroll(), 0));
    frame.render_widget(paragraph, popup);
}

fn heading(text: &str, theme: &Theme) -> Line<'static> {
    Line::from(Span::styled(text.to_string(), theme.title()))
}

fn field(label: &str, value: String, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label}: "), theme.muted()),
        Span::styled(value, theme.text()),
    ])
}

/// Lines of the product detail dialog
pub fn detail_lines(
    detail: &ProductDetail,
    history: &[PriceHistoryEntry],
    theme: &Theme,
) -> Vec<Line<'static>> {
    let product = &detail.product;
    let mut lines = vec![
        Line::from(Span::styled(
            product.name.clone(),
            theme.title().add_modifier(Modifier::UNDERLINED),
        )),
        field("ID", product.id.to_string(), theme),
    ];
    if let Some(brand) = product.brand.as_deref().filter(|b| !b.is_empty()) {
        lines.push(field("Marca", brand.to_string(), theme));
    }
    if let Some(category) = product.category.as_deref().filter(|c| !c.is_empty()) {
        lines.push(field("Categoría", category.to_string(), theme));
    }
    if let Some(description) = product.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(Line::from(Span::styled(description.to_string(), theme.muted())));
    }

    lines.push(Line::default());
    lines.push(heading("Precios actuales", theme));
    if detail.current_prices.is_empty() {
        lines.push(Line::from(Span::styled("Sin precios registrados", theme.muted())));
    }
    let cheapest = detail.cheapest().map(|p| p.price);
    for record in &detail.current_prices {
        let is_best = cheapest == Some(record.price);
        let price_style = if is_best {
            Style::default()
                .fg(theme.colors.dashboard.best_price)
                .add_modifier(Modifier::BOLD)
        } else {
            theme.price()
        };
        let mut spans = vec![
            Span::styled(format!("  {:<12}", record.store), theme.text()),
            Span::styled(format::price(record.price), price_style),
        ];
        if let Some(stock) = record.stock.filter(|s| *s > 0) {
            spans.push(Span::styled(format!("  stock: {stock}"), theme.muted()));
        }
        if let Some(rating) = record.rating {
            spans.push(Span::styled(format!("  ★ {rating:.1}"), theme.muted()));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::default());
    lines.push(heading("Histórico de precios", theme));
    if history.is_empty() {
        lines.push(Line::from(Span::styled("Sin histórico disponible", theme.muted())));
    }
    for entry in history.iter().take(HISTORY_ROWS) {
        let change_style = match entry.change_percent {
            Some(v) if v > 0.0 => Style::default().fg(theme.colors.dashboard.price_up),
            Some(v) if v < 0.0 => Style::default().fg(theme.colors.dashboard.price_down),
            _ => theme.muted(),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  {}  ", format::timestamp(&entry.date)), theme.muted()),
            Span::styled(format!("{:<12}", entry.store), theme.text()),
            Span::styled(format!("{:>10}", format::price(entry.price)), theme.price()),
            Span::styled(format!("  {}", format::change_percent(entry.change_percent)), change_style),
        ]));
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "a: Crear Alerta para este Producto · o: abrir tienda · Esc: cerrar",
        theme.muted(),
    )));
    lines
}

/// Savings banner, only when there is something to save
pub fn savings_banner(comparison: &StoreComparison) -> Option<String> {
    let savings = comparison.savings().filter(|s| *s > 0.0)?;
    let store = comparison.winning_store()?;
    Some(format!(
        "💰 Ahorro potencial comprando en {}: {}",
        store,
        format::price(savings)
    ))
}

/// Lines of the store comparison dialog
pub fn comparison_lines(comparison: &StoreComparison, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            comparison.product.clone(),
            theme.title().add_modifier(Modifier::UNDERLINED),
        )),
        field("Marca", format::or_dash(comparison.brand.as_deref()).to_string(), theme),
        Line::default(),
    ];

    let winner = comparison.winning_store();
    for store in Store::ALL {
        let price = comparison.price_for(store);
        let is_best = price.is_some() && winner == Some(store);
        let mut spans = vec![
            Span::styled(format!("  {:<12}", store.name()), theme.text()),
            Span::styled(
                format!("{:>10}", format::optional_price(price)),
                if is_best {
                    Style::default()
                        .fg(theme.colors.dashboard.best_price)
                        .add_modifier(Modifier::BOLD)
                } else {
                    theme.price()
                },
            ),
        ];
        if is_best {
            spans.push(Span::styled(
                format!("  {BEST_PRICE_MARK}"),
                Style::default().fg(theme.colors.dashboard.best_price),
            ));
        }
        lines.push(Line::from(spans));
    }

    if let Some(banner) = savings_banner(comparison) {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            banner,
            Style::default()
                .fg(theme.colors.dashboard.savings)
                .add_modifier(Modifier::BOLD),
        )));
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "a: crear alerta · Esc: cerrar",
        theme.muted(),
    )));
    lines
}

const HELP: &[(&str, &str)] = &[
    ("j/k ↑/↓", "Moverse por la tabla"),
    ("g/G", "Primer / último producto"),
    ("Enter", "Ver detalle del producto"),
    ("c", "Comparar precios entre tiendas"),
    ("a", "Crear alerta para el producto"),
    ("/", "Buscar productos"),
    ("Tab", "Siguiente panel"),
    ("←/→", "Cambiar categoría o marca"),
    ("x", "Quitar filtros"),
    ("r", "Recargar datos"),
    ("e", "Exportar reporte HTML"),
    ("o", "Abrir la tienda más barata"),
    ("Esc", "Descartar notificaciones"),
    ("?", "Mostrar esta ayuda"),
    ("q", "Salir"),
];

pub fn help_lines(theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = vec![heading("Atajos de teclado", theme), Line::default()];
    lines.extend(HELP.iter().map(|(keys, action)| {
        Line::from(vec![
            Span::styled(format!("  {keys:<10}"), theme.title()),
            Span::styled(action.to_string(), theme.text()),
        ])
    }));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{PriceRecord, Product};
    use chrono::NaiveDate;

    fn text(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn comparison() -> StoreComparison {
        StoreComparison {
            product_id: 4,
            product: "Aceite Primor 1L".into(),
            brand: Some("Primor".into()),
            category: None,
            price_wong: Some(10.9),
            price_metro: Some(9.9),
            price_plaza_vea: None,
            min_price: None,
            max_price: None,
            best_store: None,
            max_savings: None,
        }
    }

    #[test]
    fn test_comparison_marks_best_store() {
        let theme = Theme::default();
        let rendered = text(&comparison_lines(&comparison(), &theme));
        let metro = rendered.lines().find(|l| l.contains("Metro")).unwrap();
        assert!(metro.contains(BEST_PRICE_MARK));
        let plaza = rendered.lines().find(|l| l.contains("Plaza Vea")).unwrap();
        assert!(plaza.contains('-'));
        assert!(!plaza.contains(BEST_PRICE_MARK));
        assert!(rendered.contains("💰 Ahorro potencial comprando en Metro: S/ 1.00"));
    }

    #[test]
    fn test_no_banner_without_savings() {
        let mut cmp = comparison();
        cmp.max_savings = Some(0.0);
        assert!(savings_banner(&cmp).is_none());

        cmp.price_wong = None;
        cmp.price_metro = None;
        cmp.max_savings = None;
        assert!(savings_banner(&cmp).is_none());
    }

    #[test]
    fn test_detail_omits_missing_fields() {
        let detail = ProductDetail {
            product: Product {
                id: 8,
                name: "Galletas Soda".into(),
                description: None,
                image_url: None,
                brand: None,
                category: Some("Snacks".into()),
                created_at: None,
                updated_at: None,
            },
            current_prices: vec![PriceRecord {
                id: None,
                price: 2.5,
                store: "Wong".into(),
                stock: Some(12),
                rating: None,
                url: None,
                date: None,
            }],
        };
        let history = vec![PriceHistoryEntry {
            date: NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            price: 2.5,
            store: "Wong".into(),
            change_percent: Some(-3.85),
        }];

        let rendered = text(&detail_lines(&detail, &history, &Theme::default()));
        assert!(!rendered.contains("Marca:"));
        assert!(rendered.contains("Categoría: Snacks"));
        assert!(rendered.contains("stock: 12"));
        assert!(rendered.contains("2024-05-01 09:00"));
        assert!(rendered.contains("-3.85%"));
        assert!(rendered.contains("a: Crear Alerta para este Producto"));
    }

    fn detail(stock: Option<i64>) -> ProductDetail {
        ProductDetail {
            product: Product {
                id: 3,
                name: "Arroz Costeño 5kg".into(),
                description: None,
                image_url: None,
                brand: None,
                category: None,
                created_at: None,
                updated_at: None,
            },
            current_prices: vec![PriceRecord {
                id: None,
                price: 21.9,
                store: "Metro".into(),
                stock,
                rating: None,
                url: None,
                date: None,
            }],
        }
    }

    #[test]
    fn test_history_keeps_newest_rows() {
        // API order: newest first
        let history: Vec<PriceHistoryEntry> = (1..=30)
            .rev()
            .map(|day| PriceHistoryEntry {
                date: NaiveDate::from_ymd_opt(2024, 6, day)
                    .unwrap()
                    .and_hms_opt(6, 0, 0)
                    .unwrap(),
                price: 21.9,
                store: "Metro".into(),
                change_percent: None,
            })
            .collect();

        let rendered = text(&detail_lines(&detail(None), &history, &Theme::default()));
        assert!(rendered.contains("2024-06-30 06:00"));
        assert!(rendered.contains("2024-06-16 06:00"));
        assert!(!rendered.contains("2024-06-15 06:00"));
        assert!(!rendered.contains("2024-06-01 06:00"));

        let newest = rendered.find("2024-06-30").unwrap();
        let older = rendered.find("2024-06-29").unwrap();
        assert!(newest < older);
    }

    #[test]
    fn test_zero_stock_is_hidden() {
        let rendered = text(&detail_lines(&detail(Some(0)), &[], &Theme::default()));
        assert!(!rendered.contains("stock:"));

        let rendered = text(&detail_lines(&detail(Some(5)), &[], &Theme::default()));
        assert!(rendered.contains("stock: 5"));
    }
}

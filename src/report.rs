//! HTML snapshot of the dashboard: statistics counters plus the product table.
//!
//! Every piece of API-provided text goes through `ammonia::clean_text` before
//! it is placed in the page.

use ammonia::clean_text;
use chrono::{Local, NaiveDateTime};
use std::collections::HashMap;
use std::fmt::Write as _;

use crate::api::{Product, Stats};
use crate::format;
use crate::tea::Model;

const STYLE: &str = "body{font-family:sans-serif;margin:2rem;color:#222}\
h1{color:#c8102e}\
.stats{display:flex;gap:1rem;margin-bottom:2rem}\
.stat{border:1px solid #ddd;border-radius:8px;padding:1rem 1.5rem;text-align:center}\
.stat .value{font-size:1.8rem;font-weight:bold}\
table{border-collapse:collapse;width:100%}\
th,td{border-bottom:1px solid #eee;padding:.5rem;text-align:left}\
th{background:#f7f7f7}\
.empty{color:#888;font-style:italic}";

/// Data captured for one export
#[derive(Debug, Clone)]
pub struct DashboardReport {
    pub stats: Option<Stats>,
    pub products: Vec<Product>,
    pub best_prices: HashMap<i64, f64>,
    pub generated_at: NaiveDateTime,
}

impl DashboardReport {
    pub fn new(stats: Option<Stats>, products: Vec<Product>, best_prices: HashMap<i64, f64>) -> Self {
        Self {
            stats,
            products,
            best_prices,
            generated_at: Local::now().naive_local(),
        }
    }

    /// Snapshot what the dashboard is currently showing
    pub fn from_model(model: &Model) -> Self {
        Self::new(
            model.stats.clone(),
            model.products.clone(),
            model.best_prices.clone(),
        )
    }

    /// Default file name, stamped with the generation time
    pub fn file_name(&self) -> String {
        format!(
            "wongprime-report-{}.html",
            self.generated_at.format("%Y%m%d-%H%M%S")
        )
    }

    pub fn render_html(&self) -> String {
        let mut html = String::new();
        let _ = write!(
            html,
            "<!DOCTYPE html>\n<html lang=\"es\">\n<head>\n<meta charset=\"utf-8\">\n\
             <title>WongPrime - Reporte</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
             <h1>WongPrime Dashboard</h1>\n<p>Generado: {}</p>\n",
            format::timestamp(&self.generated_at)
        );

        html.push_str("<div class=\"stats\">\n");
        let stats = self.stats.clone().unwrap_or_default();
        for (label, value) in [
            ("Productos", stats.total_products),
            ("Tiendas", stats.total_stores),
            ("Categorías", stats.total_categories),
            ("Alertas Activas", stats.active_alerts),
        ] {
            let _ = writeln!(
                html,
                "<div class=\"stat\"><div class=\"value\">{value}</div><div>{label}</div></div>"
            );
        }
        html.push_str("</div>\n");

        if let Some(last) = stats.last_scrape {
            let _ = writeln!(html, "<p>Último scraping: {}</p>", format::timestamp(&last));
        }

        html.push_str(
            "<table>\n<thead><tr><th>ID</th><th>Producto</th><th>Marca</th>\
             <th>Categoría</th><th>Mejor precio</th></tr></thead>\n<tbody>\n",
        );
        if self.products.is_empty() {
            html.push_str(
                "<tr><td colspan=\"5\" class=\"empty\">No se encontraron productos</td></tr>\n",
            );
        }
        for product in &self.products {
            let _ = writeln!(
                html,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                product.id,
                clean_text(&product.name),
                clean_text(format::or_dash(product.brand.as_deref())),
                clean_text(format::or_dash(product.category.as_deref())),
                format::optional_price(self.best_prices.get(&product.id).copied()),
            );
        }
        html.push_str("</tbody>\n</table>\n</body>\n</html>\n");
        html
    }
}

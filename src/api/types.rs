//! Records exchanged with the WongPrime REST API.
//!
//! Field names on the wire are Spanish; they are mapped to English names
//! here through serde renames.

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::error::{ApiError, ApiResult};

/// Default page size used by the dashboard product listing
pub const DEFAULT_PAGE_SIZE: u32 = 50;
/// Largest page the server accepts
pub const MAX_PAGE_SIZE: u32 = 100;
/// Default price history window in days
pub const DEFAULT_HISTORY_DAYS: u32 = 30;
/// Largest history window the server accepts
pub const MAX_HISTORY_DAYS: u32 = 365;

/// Timestamp parsing that accepts both RFC 3339 and naive ISO-8601 values
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(value: &str) -> Option<NaiveDateTime> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Some(dt.naive_utc());
        }
        NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f"))
            .ok()
    }

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format("%Y-%m-%dT%H:%M:%S").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }

    pub mod option {
        use chrono::NaiveDateTime;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<NaiveDateTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(dt) => super::serialize(dt, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveDateTime>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) => super::parse(&raw)
                    .map(Some)
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}"))),
                None => Ok(None),
            }
        }
    }
}

/// Stores tracked by the comparison view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Store {
    Wong,
    Metro,
    PlazaVea,
}

impl Store {
    /// All compared stores in display order
    pub const ALL: [Store; 3] = [Store::Wong, Store::Metro, Store::PlazaVea];

    /// Name as reported by the API
    pub fn name(&self) -> &'static str {
        match self {
            Store::Wong => "Wong",
            Store::Metro => "Metro",
            Store::PlazaVea => "Plaza Vea",
        }
    }

    /// Parse an API store name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|store| store.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Product as returned by the listing endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    #[serde(rename = "url_imagen", default)]
    pub image_url: Option<String>,
    #[serde(rename = "marca", default)]
    pub brand: Option<String>,
    #[serde(rename = "categoria", default)]
    pub category: Option<String>,
    #[serde(rename = "fecha_creacion", default, with = "timestamp::option")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(rename = "ultima_actualizacion", default, with = "timestamp::option")]
    pub updated_at: Option<NaiveDateTime>,
}

/// Current price of a product at one store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(rename = "precio")]
    pub price: f64,
    #[serde(rename = "tienda")]
    pub store: String,
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(rename = "fecha", default, with = "timestamp::option")]
    pub date: Option<NaiveDateTime>,
}

/// Product with its latest price at every store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    #[serde(rename = "precios_actuales", default)]
    pub current_prices: Vec<PriceRecord>,
}

impl ProductDetail {
    /// Cheapest current price record, if any
    pub fn cheapest(&self) -> Option<&PriceRecord> {
        self.current_prices
            .iter()
            .filter(|p| p.price.is_finite())
            .min_by(|a, b| a.price.total_cmp(&b.price))
    }
}

/// One point of a product's price history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistoryEntry {
    #[serde(rename = "fecha", with = "timestamp")]
    pub date: NaiveDateTime,
    #[serde(rename = "precio")]
    pub price: f64,
    #[serde(rename = "tienda")]
    pub store: String,
    #[serde(rename = "variacion_porcentual", default)]
    pub change_percent: Option<f64>,
}

/// Cross-store price summary for one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreComparison {
    #[serde(rename = "producto_id")]
    pub product_id: i64,
    #[serde(rename = "producto")]
    pub product: String,
    #[serde(rename = "marca", default)]
    pub brand: Option<String>,
    #[serde(rename = "categoria", default)]
    pub category: Option<String>,
    #[serde(rename = "precio_wong", default)]
    pub price_wong: Option<f64>,
    #[serde(rename = "precio_metro", default)]
    pub price_metro: Option<f64>,
    #[serde(rename = "precio_plaza_vea", default)]
    pub price_plaza_vea: Option<f64>,
    #[serde(rename = "precio_minimo", default)]
    pub min_price: Option<f64>,
    #[serde(rename = "precio_maximo", default)]
    pub max_price: Option<f64>,
    #[serde(rename = "mejor_tienda", default)]
    pub best_store: Option<String>,
    #[serde(rename = "ahorro_maximo", default)]
    pub max_savings: Option<f64>,
}

impl StoreComparison {
    /// Price reported for a given store
    pub fn price_for(&self, store: Store) -> Option<f64> {
        match store {
            Store::Wong => self.price_wong,
            Store::Metro => self.price_metro,
            Store::PlazaVea => self.price_plaza_vea,
        }
    }

    fn known_prices(&self) -> impl Iterator<Item = (Store, f64)> + '_ {
        Store::ALL
            .into_iter()
            .filter_map(|store| self.price_for(store).map(|price| (store, price)))
    }

    /// Store with the best price.
    ///
    /// Uses the server's verdict when it names a known store, otherwise the
    /// first store holding the lowest price.
    pub fn winning_store(&self) -> Option<Store> {
        if let Some(store) = self.best_store.as_deref().and_then(Store::from_name) {
            return Some(store);
        }

        let mut best: Option<(Store, f64)> = None;
        for (store, price) in self.known_prices() {
            match best {
                Some((_, current)) if current <= price => {}
                _ => best = Some((store, price)),
            }
        }
        best.map(|(store, _)| store)
    }

    /// Lowest known price across stores
    pub fn lowest_price(&self) -> Option<f64> {
        self.min_price.or_else(|| {
            self.known_prices()
                .map(|(_, price)| price)
                .min_by(|a, b| a.total_cmp(b))
        })
    }

    /// Savings from buying at the best store instead of the most expensive one
    pub fn savings(&self) -> Option<f64> {
        if self.max_savings.is_some() {
            return self.max_savings;
        }

        let prices: Vec<f64> = self.known_prices().map(|(_, price)| price).collect();
        let min = prices.iter().copied().min_by(|a, b| a.total_cmp(b))?;
        let max = prices.iter().copied().max_by(|a, b| a.total_cmp(b))?;
        Some(((max - min) * 100.0).round() / 100.0)
    }
}

/// Catalog row (category, brand or store); extra columns are ignored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedEntry {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(rename = "nombre")]
    pub name: String,
}

pub type Category = NamedEntry;
pub type Brand = NamedEntry;
pub type StoreEntry = NamedEntry;

/// Dashboard statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(rename = "total_productos")]
    pub total_products: i64,
    #[serde(rename = "total_tiendas")]
    pub total_stores: i64,
    #[serde(rename = "total_categorias")]
    pub total_categories: i64,
    #[serde(rename = "total_alertas_activas")]
    pub active_alerts: i64,
    #[serde(rename = "ultimo_scraping", default, with = "timestamp::option")]
    pub last_scrape: Option<NaiveDateTime>,
    #[serde(rename = "productos_por_tienda", default)]
    pub products_per_store: BTreeMap<String, i64>,
    #[serde(rename = "productos_por_categoria", default)]
    pub products_per_category: BTreeMap<String, i64>,
}

/// Price alert request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAlert {
    #[serde(rename = "producto_id")]
    pub product_id: i64,
    pub email: String,
    #[serde(rename = "precio_objetivo")]
    pub target_price: f64,
}

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
});

impl NewAlert {
    pub fn new<S: Into<String>>(product_id: i64, email: S, target_price: f64) -> Self {
        Self {
            product_id,
            email: email.into(),
            target_price,
        }
    }

    /// Reject requests the server would refuse anyway
    pub fn validate(&self) -> ApiResult<()> {
        if self.product_id <= 0 {
            return Err(ApiError::validation("product id must be a positive number"));
        }
        if !EMAIL.is_match(self.email.trim()) {
            return Err(ApiError::validation(format!(
                "'{}' is not a valid email address",
                self.email
            )));
        }
        if !self.target_price.is_finite() || self.target_price <= 0.0 {
            return Err(ApiError::validation("target price must be greater than 0"));
        }
        Ok(())
    }
}

/// Stored price alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: i64,
    #[serde(rename = "producto_id")]
    pub product_id: i64,
    pub email: String,
    #[serde(rename = "precio_objetivo")]
    pub target_price: f64,
    #[serde(rename = "activa", default)]
    pub active: bool,
    #[serde(rename = "notificado", default)]
    pub notified: bool,
    #[serde(rename = "fecha_creacion", default, with = "timestamp::option")]
    pub created_at: Option<NaiveDateTime>,
}

/// Generic acknowledgement returned by mutating endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
    #[serde(default = "default_true")]
    pub success: bool,
}

fn default_true() -> bool {
    true
}

/// Service health report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
}

/// Filters for the product listing
#[derive(Debug, Clone, PartialEq)]
pub struct ProductQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub skip: u32,
    pub limit: u32,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            search: None,
            category: None,
            brand: None,
            skip: 0,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl ProductQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: Option<&str>) -> Self {
        self.search = non_empty(term);
        self
    }

    pub fn category(mut self, category: Option<&str>) -> Self {
        self.category = non_empty(category);
        self
    }

    pub fn brand(mut self, brand: Option<&str>) -> Self {
        self.brand = non_empty(brand);
        self
    }

    pub fn skip(mut self, skip: u32) -> Self {
        self.skip = skip;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Query string pairs; empty filters are omitted and the limit is clamped
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("limit", self.limit.clamp(1, MAX_PAGE_SIZE).to_string())];
        if self.skip > 0 {
            pairs.push(("skip", self.skip.to_string()));
        }
        if let Some(term) = non_empty(self.search.as_deref()) {
            pairs.push(("buscar", term));
        }
        if let Some(category) = non_empty(self.category.as_deref()) {
            pairs.push(("categoria", category));
        }
        if let Some(brand) = non_empty(self.brand.as_deref()) {
            pairs.push(("marca", brand));
        }
        pairs
    }
}

/// Options for the price history endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryQuery {
    pub days: u32,
    pub store: Option<String>,
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self {
            days: DEFAULT_HISTORY_DAYS,
            store: None,
        }
    }
}

impl HistoryQuery {
    pub fn days(days: u32) -> Self {
        Self {
            days,
            store: None,
        }
    }

    pub fn store(mut self, store: Option<&str>) -> Self {
        self.store = non_empty(store);
        self
    }

    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("dias", self.days.clamp(1, MAX_HISTORY_DAYS).to_string())];
        if let Some(store) = non_empty(self.store.as_deref()) {
            pairs.push(("tienda", store));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comparison() -> StoreComparison {
        StoreComparison {
            product_id: 7,
            product: "Leche Gloria".to_string(),
            brand: Some("Gloria".to_string()),
            category: None,
            price_wong: Some(4.5),
            price_metro: Some(4.2),
            price_plaza_vea: None,
            min_price: None,
            max_price: None,
            best_store: None,
            max_savings: None,
        }
    }

    #[test]
    fn test_product_deserializes_wire_names() {
        let json = r#"{
            "id": 12,
            "nombre": "Shampoo Sedal 340ml",
            "descripcion": null,
            "url_imagen": null,
            "marca": "Sedal",
            "categoria": null,
            "fecha_creacion": "2024-05-01T10:15:30.123000",
            "ultima_actualizacion": "2024-05-02T08:00:00Z"
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, 12);
        assert_eq!(product.name, "Shampoo Sedal 340ml");
        assert_eq!(product.brand.as_deref(), Some("Sedal"));
        assert!(product.category.is_none());
        assert!(product.created_at.is_some());
        assert!(product.updated_at.is_some());
    }

    #[test]
    fn test_product_detail_flattens_product() {
        let json = r#"{
            "id": 3,
            "nombre": "Arroz Costeño",
            "precios_actuales": [
                {"id": 1, "precio": 5.9, "tienda": "Wong", "stock": 10, "fecha": "2024-05-01T00:00:00"},
                {"id": 2, "precio": 5.4, "tienda": "Metro", "stock": null, "fecha": "2024-05-01T00:00:00"}
            ]
        }"#;

        let detail: ProductDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.product.id, 3);
        assert_eq!(detail.current_prices.len(), 2);
        assert_eq!(detail.cheapest().map(|p| p.store.as_str()), Some("Metro"));
    }

    #[test]
    fn test_stats_deserializes() {
        let json = r#"{
            "total_productos": 120,
            "total_tiendas": 3,
            "total_categorias": 8,
            "total_alertas_activas": 4,
            "ultimo_scraping": null,
            "productos_por_tienda": {"Wong": 100, "Metro": 80},
            "productos_por_categoria": {}
        }"#;

        let stats: Stats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.total_products, 120);
        assert_eq!(stats.active_alerts, 4);
        assert!(stats.last_scrape.is_none());
        assert_eq!(stats.products_per_store.get("Wong"), Some(&100));
    }

    #[test]
    fn test_catalog_rows_ignore_extra_columns() {
        let json = r#"[{"id": 1, "nombre": "Salud", "activo": true, "url": "/salud"}]"#;
        let categories: Vec<Category> = serde_json::from_str(json).unwrap();
        assert_eq!(categories[0].name, "Salud");
        assert_eq!(categories[0].id, Some(1));
    }

    #[test]
    fn test_comparison_computes_best_store_when_missing() {
        let cmp = comparison();
        assert_eq!(cmp.winning_store(), Some(Store::Metro));
        assert_eq!(cmp.lowest_price(), Some(4.2));
        assert_eq!(cmp.savings(), Some(0.3));
    }

    #[test]
    fn test_comparison_prefers_server_verdict() {
        let mut cmp = comparison();
        cmp.best_store = Some("Wong".to_string());
        cmp.max_savings = Some(1.25);
        assert_eq!(cmp.winning_store(), Some(Store::Wong));
        assert_eq!(cmp.savings(), Some(1.25));

        cmp.best_store = Some("Tottus".to_string());
        assert_eq!(cmp.winning_store(), Some(Store::Metro));
    }

    #[test]
    fn test_comparison_without_prices() {
        let mut cmp = comparison();
        cmp.price_wong = None;
        cmp.price_metro = None;
        assert_eq!(cmp.winning_store(), None);
        assert_eq!(cmp.lowest_price(), None);
        assert_eq!(cmp.savings(), None);
    }

    #[test]
    fn test_store_names() {
        assert_eq!(Store::from_name("plaza vea"), Some(Store::PlazaVea));
        assert_eq!(Store::from_name(" Wong "), Some(Store::Wong));
        assert_eq!(Store::from_name("Tottus"), None);
        assert_eq!(Store::PlazaVea.to_string(), "Plaza Vea");
    }

    #[test]
    fn test_alert_validation() {
        assert!(NewAlert::new(5, "ana@example.pe", 12.5).validate().is_ok());
        assert!(NewAlert::new(0, "ana@example.pe", 12.5).validate().is_err());
        assert!(NewAlert::new(5, "not-an-email", 12.5).validate().is_err());
        assert!(NewAlert::new(5, "ana@example.pe", 0.0).validate().is_err());
        assert!(NewAlert::new(5, "ana@example.pe", f64::NAN).validate().is_err());
    }

    #[test]
    fn test_alert_serializes_wire_names() {
        let body = serde_json::to_value(NewAlert::new(9, "luis@mail.com", 3.5)).unwrap();
        assert_eq!(body["producto_id"], 9);
        assert_eq!(body["email"], "luis@mail.com");
        assert_eq!(body["precio_objetivo"], 3.5);
    }

    #[test]
    fn test_product_query_pairs() {
        let query = ProductQuery::new()
            .search(Some("  leche "))
            .category(Some(""))
            .brand(Some("Gloria"));
        assert_eq!(
            query.to_pairs(),
            vec![
                ("limit", "50".to_string()),
                ("buscar", "leche".to_string()),
                ("marca", "Gloria".to_string()),
            ]
        );

        let clamped = ProductQuery::new().limit(500).skip(20);
        assert_eq!(
            clamped.to_pairs(),
            vec![("limit", "100".to_string()), ("skip", "20".to_string())]
        );
    }

    #[test]
    fn test_history_query_pairs() {
        assert_eq!(HistoryQuery::default().to_pairs(), vec![("dias", "30".to_string())]);
        assert_eq!(
            HistoryQuery::days(1000).store(Some("Metro")).to_pairs(),
            vec![("dias", "365".to_string()), ("tienda", "Metro".to_string())]
        );
    }
}

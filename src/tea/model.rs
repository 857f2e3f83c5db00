/// Dashboard model following TEA pattern
///
/// Holds the last-fetched API data plus everything the page needs to render:
/// filter inputs, table selection, open modal, alert form and toasts.

use crate::api::{
    Brand, Category, NewAlert, PriceHistoryEntry, Product, ProductDetail, ProductQuery, Stats,
    StoreComparison,
};
use crate::config::DashboardConfig;
use crate::tea::message::FocusTarget;
use crate::ui::toast::ToastManager;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Main application model containing all state
#[derive(Debug, Clone)]
pub struct Model {
    /// Whether the application should quit
    pub should_quit: bool,

    /// Terminal dimensions
    pub terminal_size: (u16, u16),

    /// Counters row
    pub stats: Option<Stats>,

    /// Filter choices
    pub categories: Vec<Category>,
    pub brands: Vec<Brand>,

    /// Current product page
    pub products: Vec<Product>,

    /// Sequence number of the newest product listing request
    pub products_request: u64,

    /// Selected row in the product table
    pub selected: usize,

    /// Lowest price seen per product id, filled from detail and comparison
    pub best_prices: HashMap<i64, f64>,

    pub filters: FilterState,
    pub focus: FocusTarget,
    pub modal: Option<Modal>,
    pub alert_form: AlertForm,
    pub loading: LoadingState,
    pub toasts: ToastManager,
    pub settings: ModelSettings,
}

/// Product listing filters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    pub search: String,
    /// Index into `Model::categories`
    pub category: Option<usize>,
    /// Index into `Model::brands`
    pub brand: Option<usize>,
}

/// Requests currently in flight
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadingState {
    pub stats: bool,
    pub products: bool,
    pub detail: bool,
    pub comparison: bool,
    pub alert: bool,
    pub report: bool,
}

impl LoadingState {
    pub fn any(&self) -> bool {
        self.stats || self.products || self.detail || self.comparison || self.alert || self.report
    }
}

/// Modal dialogs
#[derive(Debug, Clone)]
pub enum Modal {
    ProductDetail {
        detail: Box<ProductDetail>,
        history: Vec<PriceHistoryEntry>,
        scroll: u16,
    },
    Comparison {
        comparison: StoreComparison,
        scroll: u16,
    },
    Help,
}

impl Modal {
    pub fn scroll_by(&mut self, delta: i16) {
        if let Modal::ProductDetail { scroll, .. } | Modal::Comparison { scroll, .. } = self {
            *scroll = scroll.saturating_add_signed(delta);
        }
    }

    pub fn scroll(&self) -> u16 {
        match self {
            Modal::ProductDetail { scroll, .. } | Modal::Comparison { scroll, .. } => *scroll,
            Modal::Help => 0,
        }
    }
}

/// Alert form fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlertField {
    #[default]
    ProductId,
    Email,
    TargetPrice,
}

impl AlertField {
    pub fn next(self) -> Self {
        match self {
            AlertField::ProductId => AlertField::Email,
            AlertField::Email => AlertField::TargetPrice,
            AlertField::TargetPrice => AlertField::ProductId,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            AlertField::ProductId => AlertField::TargetPrice,
            AlertField::Email => AlertField::ProductId,
            AlertField::TargetPrice => AlertField::Email,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AlertField::ProductId => "ID Producto",
            AlertField::Email => "Email",
            AlertField::TargetPrice => "Precio objetivo (S/)",
        }
    }
}

/// Price alert form state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertForm {
    pub product_id: String,
    pub email: String,
    pub target_price: String,
    pub field: AlertField,
}

impl AlertForm {
    pub fn value(&self, field: AlertField) -> &str {
        match field {
            AlertField::ProductId => &self.product_id,
            AlertField::Email => &self.email,
            AlertField::TargetPrice => &self.target_price,
        }
    }

    /// Append a character to the active field, ignoring characters the field cannot hold
    pub fn push(&mut self, c: char) {
        match self.field {
            AlertField::ProductId if c.is_ascii_digit() => self.product_id.push(c),
            AlertField::Email if !c.is_whitespace() => self.email.push(c),
            AlertField::TargetPrice if c.is_ascii_digit() => self.target_price.push(c),
            AlertField::TargetPrice if (c == '.' || c == ',') && !self.target_price.contains('.') => {
                self.target_price.push('.')
            }
            _ => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.field {
            AlertField::ProductId => self.product_id.pop(),
            AlertField::Email => self.email.pop(),
            AlertField::TargetPrice => self.target_price.pop(),
        };
    }

    pub fn clear_field(&mut self) {
        match self.field {
            AlertField::ProductId => self.product_id.clear(),
            AlertField::Email => self.email.clear(),
            AlertField::TargetPrice => self.target_price.clear(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Build the request body, or explain which field is wrong
    pub fn to_request(&self) -> Result<NewAlert, String> {
        let product_id: i64 = self
            .product_id
            .trim()
            .parse()
            .map_err(|_| "Ingrese el ID del producto".to_string())?;
        let target_price: f64 = self
            .target_price
            .trim()
            .parse()
            .map_err(|_| "Ingrese un precio objetivo válido".to_string())?;
        let alert = NewAlert::new(product_id, self.email.trim(), target_price);
        alert.validate().map_err(|e| e.to_string())?;
        Ok(alert)
    }
}

/// Settings copied from the configuration file
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSettings {
    pub page_size: u32,
    pub history_days: u32,
    pub toast_duration: Duration,
    pub report_dir: PathBuf,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self::from_config(&DashboardConfig::default())
    }
}

impl ModelSettings {
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self {
            page_size: config.dashboard.page_size,
            history_days: config.dashboard.history_days,
            toast_duration: config.toast_duration(),
            report_dir: PathBuf::from("."),
        }
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new(ModelSettings::default())
    }
}

impl Model {
    pub fn new(settings: ModelSettings) -> Self {
        Self {
            should_quit: false,
            terminal_size: (0, 0),
            stats: None,
            categories: Vec::new(),
            brands: Vec::new(),
            products: Vec::new(),
            products_request: 0,
            selected: 0,
            best_prices: HashMap::new(),
            filters: FilterState::default(),
            focus: FocusTarget::Products,
            modal: None,
            alert_form: AlertForm::default(),
            loading: LoadingState::default(),
            toasts: ToastManager::with_duration(settings.toast_duration),
            settings,
        }
    }

    pub fn selected_product(&self) -> Option<&Product> {
        self.products.get(self.selected)
    }

    pub fn selected_category(&self) -> Option<&str> {
        self.filters
            .category
            .and_then(|i| self.categories.get(i))
            .map(|c| c.name.as_str())
    }

    pub fn selected_brand(&self) -> Option<&str> {
        self.filters
            .brand
            .and_then(|i| self.brands.get(i))
            .map(|b| b.name.as_str())
    }

    /// Listing query for the current filters
    pub fn product_query(&self) -> ProductQuery {
        ProductQuery::new()
            .search(Some(self.filters.search.as_str()))
            .category(self.selected_category())
            .brand(self.selected_brand())
            .limit(self.settings.page_size)
    }

    /// Lowest known price for a product, if any view has revealed one
    pub fn best_price(&self, product_id: i64) -> Option<f64> {
        self.best_prices.get(&product_id).copied()
    }

    pub fn is_text_input_focused(&self) -> bool {
        self.modal.is_none() && matches!(self.focus, FocusTarget::Search | FocusTarget::AlertForm)
    }
}

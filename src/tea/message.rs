/// Central message type for the dashboard following TEA pattern
///
/// User intents, fetch results and timer events all flow through this
/// message system; `update` is the only place where the model changes.

use crate::api::{Alert, Brand, Category, PriceHistoryEntry, Product, ProductDetail, Stats, StoreComparison};
use std::path::PathBuf;

/// Main application message type
#[derive(Debug, Clone)]
pub enum Message {
    /// System-level messages
    System(SystemMessage),

    /// UI interaction messages
    UI(UIMessage),

    /// Results of API requests
    Data(DataMessage),

    /// Notification messages
    Notification(NotificationMessage),
}

/// System-level messages for application lifecycle
#[derive(Debug, Clone)]
pub enum SystemMessage {
    /// Application should quit
    Quit,

    /// Load the initial page data
    Initialize,

    /// Tick for periodic updates
    Tick,

    /// Resize terminal
    Resize(u16, u16),
}

/// Panes that can hold keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    Search,
    Category,
    Brand,
    Products,
    AlertForm,
}

impl FocusTarget {
    const ORDER: [FocusTarget; 5] = [
        FocusTarget::Search,
        FocusTarget::Category,
        FocusTarget::Brand,
        FocusTarget::Products,
        FocusTarget::AlertForm,
    ];

    pub fn next(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + 1) % Self::ORDER.len()]
    }

    pub fn previous(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// UI-related messages for interface interactions
#[derive(Debug, Clone)]
pub enum UIMessage {
    /// Move focus forward / backward
    FocusNext,
    FocusPrevious,
    Focus(FocusTarget),

    /// Product table navigation
    SelectNext,
    SelectPrevious,
    SelectFirst,
    SelectLast,

    /// Text input into the focused field
    Input(char),
    Backspace,
    ClearInput,

    /// Step through filter choices (`true` = forward)
    CycleCategory(bool),
    CycleBrand(bool),

    /// Reload products with the current filters
    ApplyFilters,
    ClearFilters,

    /// Open modals for the selected product
    OpenDetail,
    OpenComparison,
    CloseModal,
    ToggleHelp,
    ScrollModal(i16),

    /// Prefill the alert form
    AlertForSelected,
    AlertForProduct(i64),
    AlertFieldNext,
    AlertFieldPrevious,
    SubmitAlert,
    ResetAlertForm,

    /// Open the cheapest store page of the product in the detail modal
    OpenStoreLink,

    /// Reload statistics and products
    Refresh,

    /// Save the dashboard as an HTML page
    ExportReport,
}

/// Results of fetch operations
#[derive(Debug, Clone)]
pub enum DataMessage {
    StatsLoaded(Result<Stats, String>),
    CategoriesLoaded(Result<Vec<Category>, String>),
    BrandsLoaded(Result<Vec<Brand>, String>),
    /// Listing reply tagged with the request that produced it
    ProductsLoaded {
        request: u64,
        result: Result<Vec<Product>, String>,
    },
    DetailLoaded(Result<(Box<ProductDetail>, Vec<PriceHistoryEntry>), String>),
    ComparisonLoaded(Result<StoreComparison, String>),
    AlertCreated(Result<Alert, String>),
    ReportExported(Result<PathBuf, String>),
}

/// Notification messages
#[derive(Debug, Clone)]
pub enum NotificationMessage {
    /// Show toast notification
    ShowToast(String, ToastLevel),

    /// Remove all toasts
    ClearToasts,
}

/// Toast notification levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Warning,
    Error,
}

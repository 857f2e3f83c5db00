//! Client for the WongPrime price comparison REST API
//!
//! The dashboard only consumes this API; every operation is a single request
//! whose JSON body maps onto the records in [`types`].

pub mod client;
pub mod error;
pub mod types;

pub use client::{ApiClient, DEFAULT_BASE_URL};
pub use error::{ApiError, ApiResult};
pub use types::{
    Alert, Brand, Category, Health, HistoryQuery, MessageResponse, NamedEntry, NewAlert,
    PriceHistoryEntry, PriceRecord, Product, ProductDetail, ProductQuery, Stats, Store,
    StoreComparison, StoreEntry, DEFAULT_HISTORY_DAYS, DEFAULT_PAGE_SIZE, MAX_HISTORY_DAYS,
    MAX_PAGE_SIZE,
};

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod events;
pub mod format;
pub mod report;
pub mod tea;
pub mod theme;
pub mod ui;

pub use app::App;

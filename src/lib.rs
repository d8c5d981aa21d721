pub mod app;
pub mod assets;
pub mod builders;
pub mod chart;
pub mod currency;
pub mod dashboard;
pub mod errors;
pub mod handlers;
pub mod loader;
pub mod models;
pub mod page;
pub mod registry;
pub mod render;
pub mod sanitize;
pub mod settings;
pub mod state;
pub mod storage;
pub mod ui;
pub mod views;

#[cfg(test)]
mod testing;

pub use app::router;
pub use dashboard::{Dashboard, PassReport, Timings};
pub use settings::Settings;
pub use state::AppState;
pub use storage::load_snapshot;

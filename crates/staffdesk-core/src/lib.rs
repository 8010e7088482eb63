pub mod config;
pub mod events;
pub mod generation;
pub mod grid;
pub mod logging;
pub mod preferences;
pub mod routes;
pub mod services;
pub mod utils;
pub mod viewmodel;

#[cfg(test)]
mod test_support;

pub use config::Settings;
pub use events::AppEvent;
pub use generation::{RequestTracker, Ticket};
pub use grid::{DataGrid, GridRow};
pub use preferences::ThemePreference;
pub use routes::Route;
pub use utils::error::{AppError, Result};

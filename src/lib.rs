//! A terminal dashboard for browsing issues.
//!
//! Issues are fetched through a cached data layer, narrowed by search and
//! filters, then sorted, grouped and paged. The view state persists across
//! runs and part of it travels in a shareable link.

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod issues;
pub mod logger;
pub mod pipeline;
pub mod state;
pub mod ui;

pub use app::App;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::Link;

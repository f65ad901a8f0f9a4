//! HTTP API handlers for fielddex-sv

pub mod health;
pub mod lookup;
pub mod predict;
pub mod ui;

pub use health::health_routes;
pub use lookup::{get_species, get_usage};
pub use predict::predict;
pub use ui::{serve_app_js, serve_index};

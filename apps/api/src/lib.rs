//! Pulse API: QR-code feedback collection for businesses.
//!
//! A business registers, builds a feedback form, prints QR codes that
//! point at it, and reads the resulting submissions and sentiment
//! analytics back out. Everything is served from one Axum router; see
//! [`routes::build_router`].

pub mod analytics;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod feedback;
pub mod forms;
pub mod locations;
pub mod models;
pub mod qr_codes;
pub mod routes;
pub mod schema;
pub mod state;
pub mod storage;

pub use routes::build_router;
pub use state::AppState;

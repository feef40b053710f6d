//! Cardex Lending Library Tracker
//!
//! A small REST JSON API for tracking a lending library: books, members,
//! and the borrow/return ledger that keeps book availability consistent.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult, RejectReason};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

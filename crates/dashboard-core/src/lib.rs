//! Shared types for the cricket dashboard: typed match records, the error
//! type, CLI settings, timestamp parsing and text formatting helpers.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{DashboardError, Result};

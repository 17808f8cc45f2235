//! A Google Sheets client built around an A1-notation address and range model.
//!
//! [`grid`] holds the pure value types; [`sheets`] talks to the API and
//! [`models`] holds snapshots of what it returns.

pub mod config;
pub mod error;
pub mod export;
pub mod grid;
pub mod models;
pub mod sheets;

pub use error::{AppError, Result};
pub use grid::{Address, GridRange};

mod auth;
mod client;
pub mod requests;

pub use client::SheetsClient;

// Re-export clear_tokens for CLI usage
pub use auth::clear_tokens as clear_sheets_tokens;

use crate::error::Result;
use crate::grid::GridRange;
use crate::models::Spreadsheet;
use async_trait::async_trait;
use google_sheets4::api::{Request, Response};

/// Remote calls against the Sheets and Drive APIs.
///
/// `key` is always the spreadsheet id.
#[async_trait]
pub trait SheetOperations {
    async fn get_spreadsheet(&self, key: &str) -> Result<Spreadsheet>;

    /// Id of the first spreadsheet visible to the caller with this exact title.
    async fn find_spreadsheet(&self, title: &str) -> Result<Option<String>>;

    async fn get_values(&self, key: &str, range: &GridRange) -> Result<Vec<Vec<String>>>;

    async fn update_values(
        &self,
        key: &str,
        range: &GridRange,
        values: &[Vec<String>],
    ) -> Result<()>;

    async fn clear_values(&self, key: &str, range: &GridRange) -> Result<()>;

    /// Send all `requests` in a single call. Replies come back in request order.
    async fn batch_update(&self, key: &str, requests: Vec<Request>) -> Result<Vec<Response>>;
}

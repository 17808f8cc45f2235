use super::SheetOperations;
use crate::config::GoogleConfig;
use crate::error::{AppError, Result};
use crate::grid::GridRange;
use crate::models::Spreadsheet;
use crate::sheets::auth::create_and_verify_authenticator;
use async_trait::async_trait;
use google_drive3::api::DriveHub;
use google_sheets4::api::{
    BatchUpdateSpreadsheetRequest, ClearValuesRequest, Request, Response, Scope, Sheets,
    ValueRange,
};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use serde_json::Value;
use tracing::{debug, instrument};

// Read and write spreadsheets
pub(crate) const SHEETS_SCOPE: Scope = Scope::Spreadsheet;

// Search spreadsheets by title
pub(crate) const DRIVE_SCOPE: google_drive3::api::Scope =
    google_drive3::api::Scope::MetadataReadonly;

pub struct SheetsClient {
    hub: Sheets<HttpsConnector<HttpConnector>>,
    drive: DriveHub<HttpsConnector<HttpConnector>>,
}

impl SheetsClient {
    /// Create a new SheetsClient with authenticated access
    #[instrument(name = "Authenticating to Google Sheets", skip_all)]
    pub async fn new(config: &GoogleConfig) -> Result<Self> {
        let auth = create_and_verify_authenticator(config).await?;

        let connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()?
            .https_or_http()
            .enable_http1()
            .build();

        let client = Client::builder(hyper_util::rt::TokioExecutor::new()).build(connector);

        let hub = Sheets::new(client.clone(), auth.clone());
        let drive = DriveHub::new(client, auth);

        Ok(Self { hub, drive })
    }
}

// Cells may come back as strings, numbers or booleans depending on the
// render option, so go through `Value` rather than the field type.
fn rows_from_api<T: serde::Serialize>(values: Option<T>) -> Result<Vec<Vec<String>>> {
    let Some(values) = values else {
        return Ok(Vec::new());
    };
    let rows: Vec<Vec<Value>> = serde_json::from_value(serde_json::to_value(values)?)?;
    Ok(rows
        .into_iter()
        .map(|row| row.into_iter().map(cell_text).collect())
        .collect())
}

fn cell_text(cell: Value) -> String {
    match cell {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn value_range(label: &str, values: &[Vec<String>]) -> Result<ValueRange> {
    Ok(ValueRange {
        major_dimension: Some("ROWS".to_string()),
        range: Some(label.to_string()),
        values: Some(serde_json::from_value(serde_json::to_value(values)?)?),
    })
}

#[async_trait]
impl SheetOperations for SheetsClient {
    #[instrument(name = "Fetching spreadsheet", skip(self))]
    async fn get_spreadsheet(&self, key: &str) -> Result<Spreadsheet> {
        let (_, spreadsheet) = self
            .hub
            .spreadsheets()
            .get(key)
            .include_grid_data(false)
            .add_scope(SHEETS_SCOPE)
            .doit()
            .await
            .map_err(|e| AppError::Sheets(format!("Failed to get spreadsheet: {}", e)))?;

        let spreadsheet = Spreadsheet::try_from(spreadsheet)?;
        debug!(
            title = %spreadsheet.title,
            worksheets = spreadsheet.worksheets.len(),
            "Fetched spreadsheet"
        );

        Ok(spreadsheet)
    }

    #[instrument(name = "Finding spreadsheet", skip(self))]
    async fn find_spreadsheet(&self, title: &str) -> Result<Option<String>> {
        let query = format!(
            "name='{}' and mimeType='application/vnd.google-apps.spreadsheet' and trashed=false",
            title.replace('\'', "\\'")
        );

        let (_, file_list) = self
            .drive
            .files()
            .list()
            .q(&query)
            .spaces("drive")
            .page_size(1)
            .add_scope(DRIVE_SCOPE)
            .doit()
            .await
            .map_err(|e| AppError::Sheets(format!("Failed to search spreadsheet: {}", e)))?;

        let spreadsheet_id = file_list
            .files
            .and_then(|files| files.into_iter().next())
            .and_then(|file| file.id);
        debug!(?spreadsheet_id, "Searched spreadsheets");

        Ok(spreadsheet_id)
    }

    #[instrument(name = "Fetching values", skip(self, range), fields(range = ?range.label().ok()))]
    async fn get_values(&self, key: &str, range: &GridRange) -> Result<Vec<Vec<String>>> {
        let label = range.label()?;
        let (_, response) = self
            .hub
            .spreadsheets()
            .values_get(key, &label)
            .major_dimension("ROWS")
            .value_render_option("FORMATTED_VALUE")
            .add_scope(SHEETS_SCOPE)
            .doit()
            .await
            .map_err(|e| AppError::Sheets(format!("Failed to read '{}': {}", label, e)))?;

        let rows = rows_from_api(response.values)?;
        debug!(rows = rows.len(), "Fetched values");

        Ok(rows)
    }

    #[instrument(name = "Writing values", skip(self, range, values), fields(range = ?range.label().ok()))]
    async fn update_values(
        &self,
        key: &str,
        range: &GridRange,
        values: &[Vec<String>],
    ) -> Result<()> {
        let label = range.label()?;
        let request = value_range(&label, values)?;

        let (_, response) = self
            .hub
            .spreadsheets()
            .values_update(request, key, &label)
            .value_input_option("USER_ENTERED")
            .add_scope(SHEETS_SCOPE)
            .doit()
            .await
            .map_err(|e| AppError::Sheets(format!("Failed to write '{}': {}", label, e)))?;
        debug!(updated_cells = ?response.updated_cells, "Wrote values");

        Ok(())
    }

    #[instrument(name = "Clearing values", skip(self, range), fields(range = ?range.label().ok()))]
    async fn clear_values(&self, key: &str, range: &GridRange) -> Result<()> {
        let label = range.label()?;

        self.hub
            .spreadsheets()
            .values_clear(ClearValuesRequest::default(), key, &label)
            .add_scope(SHEETS_SCOPE)
            .doit()
            .await
            .map_err(|e| AppError::Sheets(format!("Failed to clear '{}': {}", label, e)))?;

        Ok(())
    }

    #[instrument(name = "Sending batch update", skip(self, requests), fields(requests = requests.len()))]
    async fn batch_update(&self, key: &str, requests: Vec<Request>) -> Result<Vec<Response>> {
        let batch_update = BatchUpdateSpreadsheetRequest {
            requests: Some(requests),
            ..Default::default()
        };

        let (_, response) = self
            .hub
            .spreadsheets()
            .batch_update(batch_update, key)
            .add_scope(SHEETS_SCOPE)
            .doit()
            .await
            .map_err(|e| AppError::Sheets(format!("Failed to apply batch update: {}", e)))?;

        Ok(response.replies.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rows_from_api_stringifies_cells() {
        let values = json!([["a", 1, true], [], [null, 2.5]]);
        let rows = rows_from_api(Some(values)).unwrap();
        assert_eq!(
            rows,
            vec![
                vec!["a".to_string(), "1".to_string(), "true".to_string()],
                vec![],
                vec![String::new(), "2.5".to_string()],
            ]
        );
        assert!(rows_from_api::<Value>(None).unwrap().is_empty());
    }

    #[test]
    fn test_value_range() {
        let values = vec![vec!["x".to_string(), "=A1".to_string()]];
        let request = value_range("'Sheet1'!A1:B1", &values).unwrap();
        assert_eq!(request.range.as_deref(), Some("'Sheet1'!A1:B1"));
        assert_eq!(request.major_dimension.as_deref(), Some("ROWS"));
        assert_eq!(
            serde_json::to_value(request.values).unwrap(),
            json!([["x", "=A1"]])
        );
    }
}

use crate::error::{AppError, Result};
use crate::grid::{GridRange, SheetDimensions};
use crate::models::Worksheet;

/// A named range of a spreadsheet.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedRange {
    pub id: String,
    pub name: String,
    pub range: GridRange,
}

impl NamedRange {
    /// Parse the API resource, binding its range to the matching worksheet.
    pub fn from_api(api: &google_sheets4::api::NamedRange, worksheets: &[Worksheet]) -> Result<Self> {
        let id = api
            .named_range_id
            .clone()
            .ok_or_else(|| AppError::Sheets("Named range has no id".to_string()))?;
        let name = api.name.clone().unwrap_or_default();
        let api_range = api.range.clone().unwrap_or_default();

        // The API leaves out a sheetId of 0.
        let sheet_id = api_range.sheet_id.unwrap_or(0);
        let sheet = worksheets
            .iter()
            .find(|ws| ws.sheet_id() == sheet_id)
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "worksheet {sheet_id} referenced by named range {name:?}"
                ))
            })?;

        let mut range = GridRange::whole_sheet(sheet);
        range.set_api(&api_range)?;

        Ok(Self { id, name, range })
    }
}

/// A protected range on one worksheet.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtectedRange {
    pub id: Option<i32>,
    pub description: Option<String>,
    pub warning_only: bool,
    pub named_range_id: Option<String>,
    pub range: GridRange,
}

impl ProtectedRange {
    pub fn from_api(api: &google_sheets4::api::ProtectedRange, worksheet: &Worksheet) -> Result<Self> {
        let mut range = GridRange::whole_sheet(worksheet);
        if let Some(api_range) = &api.range {
            range.set_api(api_range)?;
        }

        Ok(Self {
            id: api.protected_range_id,
            description: api.description.clone(),
            warning_only: api.warning_only.unwrap_or(false),
            named_range_id: api.named_range_id.clone(),
            range,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::worksheet::test_helpers::mock_worksheet;
    use google_sheets4::api::GridRange as ApiGridRange;

    #[test]
    fn test_named_range_binds_to_sheet() {
        let sheets = vec![mock_worksheet(0, "First", 10, 5), mock_worksheet(9, "Second", 20, 4)];
        let api = google_sheets4::api::NamedRange {
            named_range_id: Some("nr1".to_string()),
            name: Some("Totals".to_string()),
            range: Some(ApiGridRange {
                sheet_id: Some(9),
                start_column_index: Some(1),
                end_column_index: Some(2),
                ..Default::default()
            }),
            ..Default::default()
        };

        let named = NamedRange::from_api(&api, &sheets).unwrap();
        assert_eq!(named.id, "nr1");
        assert_eq!(named.name, "Totals");
        assert_eq!(named.range.label().unwrap(), "'Second'!B:B");
        assert_eq!(named.range.height().unwrap(), 20);
    }

    #[test]
    fn test_named_range_missing_sheet_id_is_first_sheet() {
        let sheets = vec![mock_worksheet(0, "First", 10, 5)];
        let api = google_sheets4::api::NamedRange {
            named_range_id: Some("nr2".to_string()),
            name: Some("Corner".to_string()),
            range: Some(ApiGridRange {
                start_row_index: Some(0),
                end_row_index: Some(1),
                start_column_index: Some(0),
                end_column_index: Some(1),
                ..Default::default()
            }),
            ..Default::default()
        };

        let named = NamedRange::from_api(&api, &sheets).unwrap();
        assert_eq!(named.range.label().unwrap(), "'First'!A1:A1");
    }

    #[test]
    fn test_named_range_keeps_partially_open_span() {
        let sheets = vec![mock_worksheet(0, "First", 10, 5)];
        let api = google_sheets4::api::NamedRange {
            named_range_id: Some("nr4".to_string()),
            name: Some("Block".to_string()),
            range: Some(ApiGridRange {
                start_column_index: Some(2),
                end_row_index: Some(3),
                end_column_index: Some(5),
                ..Default::default()
            }),
            ..Default::default()
        };

        let named = NamedRange::from_api(&api, &sheets).unwrap();
        assert_eq!(named.range.label().unwrap(), "'First'!C1:E3");
        assert_eq!(named.range.height().unwrap(), 3);
        assert_eq!(named.range.to_api().unwrap().end_row_index, Some(3));
    }

    #[test]
    fn test_named_range_unknown_sheet() {
        let api = google_sheets4::api::NamedRange {
            named_range_id: Some("nr3".to_string()),
            range: Some(ApiGridRange {
                sheet_id: Some(77),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(matches!(
            NamedRange::from_api(&api, &[]),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_protected_range_defaults() {
        let ws = mock_worksheet(0, "First", 10, 5);
        let api = google_sheets4::api::ProtectedRange {
            protected_range_id: Some(12),
            description: Some("locked".to_string()),
            ..Default::default()
        };

        let protected = ProtectedRange::from_api(&api, &ws).unwrap();
        assert_eq!(protected.id, Some(12));
        assert!(!protected.warning_only);
        assert_eq!(protected.range, ws.cell_range());
    }
}

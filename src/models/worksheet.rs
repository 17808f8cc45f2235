use crate::error::{AppError, Result};
use crate::grid::{GridRange, SheetDimensions};
use crate::models::named::ProtectedRange;
use google_sheets4::api::Sheet;

/// Snapshot of a worksheet's properties as last fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct Worksheet {
    pub id: i32,
    pub title: String,
    pub index: i32,
    pub rows: u32,
    pub cols: u32,
    pub frozen_rows: u32,
    pub frozen_cols: u32,
    pub protected_ranges: Vec<ProtectedRange>,
}

impl Worksheet {
    /// A range on this sheet parsed from `label`, e.g. `"A1:C3"` or `"Sheet1!B:B"`.
    pub fn range(&self, label: &str) -> Result<GridRange> {
        GridRange::parse_on(self, label)
    }

    /// The whole sheet as a range.
    pub fn cell_range(&self) -> GridRange {
        GridRange::whole_sheet(self)
    }
}

impl SheetDimensions for Worksheet {
    fn sheet_id(&self) -> i32 {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn rows(&self) -> u32 {
        self.rows
    }

    fn cols(&self) -> u32 {
        self.cols
    }
}

impl TryFrom<&Sheet> for Worksheet {
    type Error = AppError;

    fn try_from(sheet: &Sheet) -> Result<Self> {
        let props = sheet
            .properties
            .as_ref()
            .ok_or_else(|| AppError::Sheets("Sheet has no properties".to_string()))?;
        let title = props
            .title
            .clone()
            .ok_or_else(|| AppError::Sheets("Sheet has no title".to_string()))?;
        // The API leaves out a sheetId of 0.
        let id = props.sheet_id.unwrap_or(0);
        let grid = props.grid_properties.as_ref();
        let count = |value: Option<i32>| value.and_then(|v| u32::try_from(v).ok()).unwrap_or(0);

        let mut worksheet = Worksheet {
            id,
            title,
            index: props.index.unwrap_or(0),
            rows: count(grid.and_then(|g| g.row_count)),
            cols: count(grid.and_then(|g| g.column_count)),
            frozen_rows: count(grid.and_then(|g| g.frozen_row_count)),
            frozen_cols: count(grid.and_then(|g| g.frozen_column_count)),
            protected_ranges: Vec::new(),
        };

        worksheet.protected_ranges = sheet
            .protected_ranges
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|p| ProtectedRange::from_api(p, &worksheet))
            .collect::<Result<_>>()?;

        Ok(worksheet)
    }
}

#[cfg(test)]
pub(crate) mod test_helpers {
    use super::*;

    pub(crate) fn mock_worksheet(id: i32, title: &str, rows: u32, cols: u32) -> Worksheet {
        Worksheet {
            id,
            title: title.to_string(),
            index: 0,
            rows,
            cols,
            frozen_rows: 0,
            frozen_cols: 0,
            protected_ranges: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use google_sheets4::api::{GridProperties, GridRange as ApiGridRange, SheetProperties};

    fn api_sheet() -> Sheet {
        Sheet {
            properties: Some(SheetProperties {
                sheet_id: Some(42),
                title: Some("Sheet1".to_string()),
                index: Some(1),
                grid_properties: Some(GridProperties {
                    row_count: Some(1000),
                    column_count: Some(26),
                    frozen_row_count: Some(1),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            protected_ranges: Some(vec![google_sheets4::api::ProtectedRange {
                protected_range_id: Some(5),
                warning_only: Some(true),
                range: Some(ApiGridRange {
                    sheet_id: Some(42),
                    start_row_index: Some(0),
                    end_row_index: Some(1),
                    ..Default::default()
                }),
                ..Default::default()
            }]),
            ..Default::default()
        }
    }

    #[test]
    fn test_from_api_sheet() {
        let ws = Worksheet::try_from(&api_sheet()).unwrap();
        assert_eq!(ws.id, 42);
        assert_eq!(ws.title, "Sheet1");
        assert_eq!(ws.index, 1);
        assert_eq!((ws.rows, ws.cols), (1000, 26));
        assert_eq!(ws.frozen_rows, 1);
        assert_eq!(ws.frozen_cols, 0);

        let protected = &ws.protected_ranges[0];
        assert_eq!(protected.id, Some(5));
        assert_eq!(protected.range.label().unwrap(), "'Sheet1'!1:1");
    }

    #[test]
    fn test_missing_title_is_an_error() {
        let sheet = Sheet {
            properties: Some(SheetProperties::default()),
            ..Default::default()
        };
        assert!(matches!(
            Worksheet::try_from(&sheet),
            Err(AppError::Sheets(_))
        ));
    }

    #[test]
    fn test_missing_sheet_id_means_zero() {
        let sheet = Sheet {
            properties: Some(SheetProperties {
                title: Some("First".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(Worksheet::try_from(&sheet).unwrap().id, 0);
    }

    #[test]
    fn test_ranges_are_bound() {
        let ws = test_helpers::mock_worksheet(3, "Data", 100, 26);
        let range = ws.range("Data!A:B").unwrap();
        assert_eq!(range.sheet_id(), Some(3));
        assert_eq!(range.height().unwrap(), 100);

        assert!(ws.range("Other!A1").is_err());

        let whole = ws.cell_range();
        assert_eq!(whole.width().unwrap(), 26);
        assert_eq!(whole.label().unwrap(), "'Data'");
    }
}

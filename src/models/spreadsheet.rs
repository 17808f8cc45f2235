use crate::error::{AppError, Result};
use crate::models::{NamedRange, Worksheet};

/// Snapshot of a spreadsheet's metadata: its worksheets and named ranges.
#[derive(Debug, Clone, PartialEq)]
pub struct Spreadsheet {
    pub id: String,
    pub title: String,
    pub url: String,
    pub worksheets: Vec<Worksheet>,
    pub named_ranges: Vec<NamedRange>,
}

impl Spreadsheet {
    pub fn worksheet_by_title(&self, title: &str) -> Result<&Worksheet> {
        self.worksheets
            .iter()
            .find(|ws| ws.title == title)
            .ok_or_else(|| AppError::NotFound(format!("worksheet titled {title:?}")))
    }

    pub fn worksheet_by_id(&self, id: i32) -> Result<&Worksheet> {
        self.worksheets
            .iter()
            .find(|ws| ws.id == id)
            .ok_or_else(|| AppError::NotFound(format!("worksheet with id {id}")))
    }

    /// Worksheet at the given tab position (0-based).
    pub fn worksheet_by_index(&self, index: i32) -> Result<&Worksheet> {
        self.worksheets
            .iter()
            .find(|ws| ws.index == index)
            .ok_or_else(|| AppError::NotFound(format!("worksheet at index {index}")))
    }

    /// The first tab.
    pub fn sheet1(&self) -> Result<&Worksheet> {
        self.worksheet_by_index(0)
    }

    pub fn named_range(&self, name: &str) -> Result<&NamedRange> {
        self.named_ranges
            .iter()
            .find(|nr| nr.name == name)
            .ok_or_else(|| AppError::NotFound(format!("named range {name:?}")))
    }
}

impl TryFrom<google_sheets4::api::Spreadsheet> for Spreadsheet {
    type Error = AppError;

    fn try_from(api: google_sheets4::api::Spreadsheet) -> Result<Self> {
        let id = api
            .spreadsheet_id
            .ok_or_else(|| AppError::Sheets("Spreadsheet has no id".to_string()))?;
        let url = api
            .spreadsheet_url
            .unwrap_or_else(|| format!("https://docs.google.com/spreadsheets/d/{}", id));
        let title = api.properties.and_then(|p| p.title).unwrap_or_default();

        let worksheets = api
            .sheets
            .unwrap_or_default()
            .iter()
            .map(Worksheet::try_from)
            .collect::<Result<Vec<_>>>()?;

        let named_ranges = api
            .named_ranges
            .unwrap_or_default()
            .iter()
            .map(|nr| NamedRange::from_api(nr, &worksheets))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            id,
            title,
            url,
            worksheets,
            named_ranges,
        })
    }
}

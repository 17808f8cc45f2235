/// The parts of a worksheet a [`GridRange`](super::GridRange) needs: its identity
/// for labels and wire JSON, and its size for resolving unbounded edges.
pub trait SheetDimensions {
    fn sheet_id(&self) -> i32;

    fn title(&self) -> &str;

    /// Number of rows in the sheet grid.
    fn rows(&self) -> u32;

    /// Number of columns in the sheet grid.
    fn cols(&self) -> u32;
}

/// Owned snapshot of a worksheet's identity and size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRef {
    pub id: i32,
    pub title: String,
    pub rows: u32,
    pub cols: u32,
}

impl SheetRef {
    pub fn new(id: i32, title: impl Into<String>, rows: u32, cols: u32) -> Self {
        Self {
            id,
            title: title.into(),
            rows,
            cols,
        }
    }

    pub fn of<D: SheetDimensions + ?Sized>(sheet: &D) -> Self {
        Self {
            id: sheet.sheet_id(),
            title: sheet.title().to_string(),
            rows: sheet.rows(),
            cols: sheet.cols(),
        }
    }
}

impl SheetDimensions for SheetRef {
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

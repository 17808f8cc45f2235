pub mod datarange;
pub mod named;
pub mod spreadsheet;
pub mod worksheet;

pub use datarange::{DataRange, SyncMode};
pub use named::{NamedRange, ProtectedRange};
pub use spreadsheet::Spreadsheet;
pub use worksheet::Worksheet;

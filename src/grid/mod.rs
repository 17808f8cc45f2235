//! Cell addresses and grid ranges in A1 notation.
//!
//! Pure value types: nothing here performs I/O or logs. Sheet sizes needed to
//! resolve unbounded ranges are passed in through [`SheetDimensions`].

mod address;
pub mod codec;
mod range;
mod sheet;
mod wire;

pub use address::{Address, ToAddress};
pub use range::{Cells, GridRange};
pub use sheet::{SheetDimensions, SheetRef};
pub use wire::WireGridRange;

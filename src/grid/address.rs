use super::codec::{self, column_to_letters};
use crate::error::{AppError, Result};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Sub};
use std::str::FromStr;

/// A single cell coordinate. Rows and columns are 1-based.
///
/// An address built with `allow_unbound` may leave out the row (`"C"`, every row
/// of column C), the column (`"5"`, every column of row 5), or both (the whole
/// sheet). Without it both components are required.
///
/// Two addresses are equal when their labels are equal; the `allow_unbound` flag
/// takes no part in comparison.
#[derive(Debug, Clone, Copy)]
pub struct Address {
    row: Option<u32>,
    col: Option<u32>,
    allow_unbound: bool,
}

impl Address {
    /// A fully bound address.
    pub fn new(row: u32, col: u32) -> Result<Self> {
        Self::from_coordinates(Some(row), Some(col), false)
    }

    /// An address with neither component set.
    pub fn unbounded() -> Self {
        Self {
            row: None,
            col: None,
            allow_unbound: true,
        }
    }

    pub fn from_coordinates(row: Option<u32>, col: Option<u32>, allow_unbound: bool) -> Result<Self> {
        validate(row, col, allow_unbound)?;
        Ok(Self {
            row,
            col,
            allow_unbound,
        })
    }

    /// Parse an A1-style label such as `"B3"`.
    pub fn from_label(label: &str, allow_unbound: bool) -> Result<Self> {
        let parts = codec::parse_cell_label(label).ok_or_else(|| {
            AppError::IncorrectLabelFormat(format!("Not a valid cell label format: {label:?}"))
        })?;

        if !allow_unbound && (parts.row.is_none() || parts.col.is_none()) {
            return Err(AppError::IncorrectLabelFormat(format!(
                "Cell label {label:?} must name both a column and a row"
            )));
        }

        Self::from_coordinates(parts.row, parts.col, allow_unbound)
    }

    pub fn row(&self) -> Option<u32> {
        self.row
    }

    pub fn col(&self) -> Option<u32> {
        self.col
    }

    pub fn allows_unbound(&self) -> bool {
        self.allow_unbound
    }

    /// The `(row, col)` pair, unbound components preserved as `None`.
    pub fn index(&self) -> (Option<u32>, Option<u32>) {
        (self.row, self.col)
    }

    /// Both components, or `None` if either is unbound.
    pub fn bounded(&self) -> Option<(u32, u32)> {
        Some((self.row?, self.col?))
    }

    /// Neither row nor column is set.
    pub fn is_unbounded(&self) -> bool {
        self.row.is_none() && self.col.is_none()
    }

    pub fn is_bounded(&self) -> bool {
        self.row.is_some() && self.col.is_some()
    }

    /// Replace the row. The address is left untouched if the result is invalid.
    pub fn set_row(&mut self, row: Option<u32>) -> Result<()> {
        validate(row, self.col, self.allow_unbound)?;
        self.row = row;
        Ok(())
    }

    /// Replace the column. The address is left untouched if the result is invalid.
    pub fn set_col(&mut self, col: Option<u32>) -> Result<()> {
        validate(self.row, col, self.allow_unbound)?;
        self.col = col;
        Ok(())
    }

    pub fn label(&self) -> String {
        let col = self.col.map(column_to_letters).unwrap_or_default();
        let row = self.row.map(|r| r.to_string()).unwrap_or_default();
        format!("{col}{row}")
    }

    /// Build a bound address from components already known to be at least 1.
    pub(super) fn from_bounded(row: u32, col: u32) -> Self {
        debug_assert!(row >= 1 && col >= 1);
        Self {
            row: Some(row),
            col: Some(col),
            allow_unbound: false,
        }
    }

    /// Unbound-capable address from components already known to be at least 1.
    pub(super) fn partial(row: Option<u32>, col: Option<u32>) -> Self {
        debug_assert!(row != Some(0) && col != Some(0));
        Self {
            row,
            col,
            allow_unbound: true,
        }
    }

    /// Same coordinates, but permitted to become partially unbound later.
    pub(crate) fn into_unbound_capable(self) -> Self {
        Self {
            allow_unbound: true,
            ..self
        }
    }

    /// Shift by `(rows, cols)`. Both components must be bound and the result must
    /// stay at or above 1.
    pub fn offset(&self, rows: i64, cols: i64) -> Result<Self> {
        let (row, col) = self.bounded().ok_or_else(|| {
            AppError::InvalidCoordinate(format!(
                "Cannot offset partially unbound address {}",
                self.label()
            ))
        })?;
        let shift = |value: u32, delta: i64| {
            i64::from(value)
                .checked_add(delta)
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| {
                    AppError::InvalidCoordinate(format!(
                        "Offset ({rows}, {cols}) moves {} out of range",
                        self.label()
                    ))
                })
        };
        Self::new(shift(row, rows)?, shift(col, cols)?)
    }
}

fn validate(row: Option<u32>, col: Option<u32>, allow_unbound: bool) -> Result<()> {
    if !allow_unbound && (row.is_none() || col.is_none()) {
        return Err(AppError::InvalidCoordinate(
            "Address cannot be unbounded unless unbound addresses are allowed".to_string(),
        ));
    }
    if row == Some(0) || col == Some(0) {
        return Err(AppError::InvalidCoordinate(format!(
            "Address coordinates must be at least 1: ({row:?}, {col:?})"
        )));
    }
    Ok(())
}

impl Default for Address {
    fn default() -> Self {
        Address::unbounded()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for Address {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_label(s, false)
    }
}

impl TryFrom<(u32, u32)> for Address {
    type Error = AppError;

    fn try_from((row, col): (u32, u32)) -> Result<Self> {
        Self::new(row, col)
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.index() == other.index()
    }
}

impl Eq for Address {}

impl Hash for Address {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index().hash(state);
    }
}

impl PartialEq<(u32, u32)> for Address {
    fn eq(&self, other: &(u32, u32)) -> bool {
        self.bounded() == Some(*other)
    }
}

impl PartialEq<(Option<u32>, Option<u32>)> for Address {
    fn eq(&self, other: &(Option<u32>, Option<u32>)) -> bool {
        self.index() == *other
    }
}

impl PartialEq<str> for Address {
    fn eq(&self, other: &str) -> bool {
        self.label() == other
    }
}

impl PartialEq<&str> for Address {
    fn eq(&self, other: &&str) -> bool {
        self.label() == *other
    }
}

impl Add<(i64, i64)> for Address {
    type Output = Result<Address>;

    fn add(self, (rows, cols): (i64, i64)) -> Self::Output {
        self.offset(rows, cols)
    }
}

impl Sub<(i64, i64)> for Address {
    type Output = Result<Address>;

    fn sub(self, (rows, cols): (i64, i64)) -> Self::Output {
        let negate = |v: i64| {
            v.checked_neg().ok_or_else(|| {
                AppError::InvalidCoordinate(format!("Offset {v} cannot be negated"))
            })
        };
        self.offset(negate(rows)?, negate(cols)?)
    }
}

impl Add<Address> for Address {
    type Output = Result<Address>;

    fn add(self, other: Address) -> Self::Output {
        let (rows, cols) = other.bounded().ok_or_else(|| {
            AppError::InvalidCoordinate(format!("Cannot add unbound address {}", other.label()))
        })?;
        self.offset(i64::from(rows), i64::from(cols))
    }
}

impl Sub<Address> for Address {
    type Output = Result<Address>;

    fn sub(self, other: Address) -> Self::Output {
        let (rows, cols) = other.bounded().ok_or_else(|| {
            AppError::InvalidCoordinate(format!(
                "Cannot subtract unbound address {}",
                other.label()
            ))
        })?;
        self.offset(-i64::from(rows), -i64::from(cols))
    }
}

/// Anything that can stand in for an [`Address`] where a range corner is expected.
pub trait ToAddress {
    fn to_address(&self, allow_unbound: bool) -> Result<Address>;
}

impl ToAddress for Address {
    fn to_address(&self, allow_unbound: bool) -> Result<Address> {
        Address::from_coordinates(self.row, self.col, allow_unbound)
    }
}

impl ToAddress for str {
    fn to_address(&self, allow_unbound: bool) -> Result<Address> {
        Address::from_label(self, allow_unbound)
    }
}

impl ToAddress for &str {
    fn to_address(&self, allow_unbound: bool) -> Result<Address> {
        Address::from_label(self, allow_unbound)
    }
}

impl ToAddress for String {
    fn to_address(&self, allow_unbound: bool) -> Result<Address> {
        Address::from_label(self, allow_unbound)
    }
}

impl ToAddress for (u32, u32) {
    fn to_address(&self, allow_unbound: bool) -> Result<Address> {
        Address::from_coordinates(Some(self.0), Some(self.1), allow_unbound)
    }
}

impl ToAddress for (Option<u32>, Option<u32>) {
    fn to_address(&self, allow_unbound: bool) -> Result<Address> {
        Address::from_coordinates(self.0, self.1, allow_unbound)
    }
}

impl<T: ToAddress> ToAddress for Option<T> {
    fn to_address(&self, allow_unbound: bool) -> Result<Address> {
        match self {
            Some(inner) => inner.to_address(allow_unbound),
            None => Address::from_coordinates(None, None, allow_unbound),
        }
    }
}

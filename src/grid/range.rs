use super::address::{Address, ToAddress};
use super::codec::{quote_sheet_title, split_sheet_prefix};
use super::sheet::{SheetDimensions, SheetRef};
use super::wire::WireGridRange;
use crate::error::{AppError, Result};
use serde::Deserialize;
use std::str::FromStr;

/// Where a range's sheet identity comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SheetBinding {
    Detached {
        id: Option<i32>,
        title: Option<String>,
    },
    Attached(SheetRef),
}

impl Default for SheetBinding {
    fn default() -> Self {
        SheetBinding::Detached {
            id: None,
            title: None,
        }
    }
}

/// How unboundedness on one corner affects the other when corners are set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpenAxes {
    /// An axis missing on either corner is dropped from both.
    Shared,
    /// Each corner keeps exactly the components it was given.
    AsGiven,
}

enum BoundsViolation {
    AxisMismatch,
    Reversed(String),
}

/// A rectangular span of cells on one sheet.
///
/// Corners are 1-based and inclusive. Either axis may be unbounded on both
/// corners at once (`A:B` is every row of columns A to B, `2:4` every column of
/// rows 2 to 4), and both corners may be fully unbounded (the whole sheet). A
/// range may also carry only one corner; the missing corner then stands for the
/// matching edge of the sheet.
///
/// Unbounded edges are resolved against sheet dimensions only on request
/// ([`GridRange::resolve`], [`GridRange::get_bounded_indexes`]); nothing is
/// cached.
#[derive(Debug, Clone, Default)]
pub struct GridRange {
    start: Address,
    end: Address,
    sheet: SheetBinding,
}

impl GridRange {
    /// A range between two corners, not yet tied to any sheet.
    pub fn new(start: impl ToAddress, end: impl ToAddress) -> Result<Self> {
        let mut range = Self::default();
        range.set_indexes(start, end)?;
        Ok(range)
    }

    /// The whole of `sheet`.
    pub fn whole_sheet<D: SheetDimensions + ?Sized>(sheet: &D) -> Self {
        Self {
            sheet: SheetBinding::Attached(SheetRef::of(sheet)),
            ..Self::default()
        }
    }

    /// Parse a label such as `'Sheet1'!A1:D4`, `A:B` or `2:4`.
    ///
    /// A label without a colon names a single cell, row or column.
    pub fn from_label(label: &str) -> Result<Self> {
        let mut range = Self::default();
        range.set_label(label)?;
        Ok(range)
    }

    /// Parse `label` in the context of `sheet`. A sheet prefix in the label must
    /// match the sheet's title.
    pub fn parse_on<D: SheetDimensions + ?Sized>(sheet: &D, label: &str) -> Result<Self> {
        let mut range = Self::whole_sheet(sheet);
        range.set_label(label)?;
        Ok(range)
    }

    /// Build from the API's wire representation.
    pub fn from_wire(wire: &WireGridRange) -> Result<Self> {
        let mut range = Self::default();
        range.set_wire(wire)?;
        Ok(range)
    }

    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let mut range = Self::default();
        range.set_json(value)?;
        Ok(range)
    }

    pub fn with_worksheet<D: SheetDimensions + ?Sized>(mut self, sheet: &D) -> Self {
        self.set_worksheet(sheet);
        self
    }

    /// Top-left corner. An axis the start leaves open but the end bounds
    /// starts at the first row or column.
    pub fn start(&self) -> Address {
        let first = |own: Option<u32>, other: Option<u32>| own.or(other.map(|_| 1));
        Address::partial(
            first(self.start.row(), self.end.row()),
            first(self.start.col(), self.end.col()),
        )
    }

    /// Bottom-right corner. An axis the end leaves open but the start bounds
    /// runs to the last row or column of the bound sheet, which must then be
    /// present.
    pub fn end(&self) -> Result<Address> {
        let open_row = self.end.row().is_none() && self.start.row().is_some();
        let open_col = self.end.col().is_none() && self.start.col().is_some();
        if !open_row && !open_col {
            return Ok(self.end);
        }

        let sheet = self.worksheet().ok_or_else(|| {
            AppError::UnresolvableRange(format!(
                "a worksheet is required to find the end of a range starting at {}",
                self.start.label()
            ))
        })?;
        Address::from_coordinates(
            self.end.row().or(self.start.row().map(|_| sheet.rows)),
            self.end.col().or(self.start.col().map(|_| sheet.cols)),
            true,
        )
    }

    pub fn indexes(&self) -> Result<(Address, Address)> {
        Ok((self.start(), self.end()?))
    }

    pub fn set_start(&mut self, start: impl ToAddress) -> Result<()> {
        let start = start.to_address(true)?;
        self.set_corners(start, self.end, OpenAxes::Shared)
    }

    pub fn set_end(&mut self, end: impl ToAddress) -> Result<()> {
        let end = end.to_address(true)?;
        self.set_corners(self.start, end, OpenAxes::Shared)
    }

    pub fn set_indexes(&mut self, start: impl ToAddress, end: impl ToAddress) -> Result<()> {
        let start = start.to_address(true)?;
        let end = end.to_address(true)?;
        self.set_corners(start, end, OpenAxes::Shared)
    }

    /// Label in A1 notation, prefixed by the quoted sheet title when known.
    ///
    /// A whole-sheet range is just the sheet prefix. Fails when only the start
    /// corner is set and no worksheet is bound to supply the end.
    pub fn label(&self) -> Result<String> {
        let title = self.sheet_title().map(quote_sheet_title);
        if self.start.is_unbounded() && self.end.is_unbounded() {
            return Ok(title.unwrap_or_default());
        }

        let corners = format!("{}:{}", self.start().label(), self.end()?.label());
        Ok(match title {
            Some(title) => format!("{title}!{corners}"),
            None => corners,
        })
    }

    /// Replace corners and, if the label has one, the sheet title.
    pub fn set_label(&mut self, label: &str) -> Result<()> {
        let (title, corners) = split_sheet_prefix(label);
        let (start, end) = match corners.split_once(':') {
            Some((start, end)) => (
                Address::from_label(start, true)?,
                Address::from_label(end, true)?,
            ),
            None => {
                let single = Address::from_label(corners, true)?;
                (single, single)
            }
        };

        if let Some(title) = &title {
            self.check_title(title)?;
        }
        self.set_corners(start, end, OpenAxes::Shared)?;
        if let Some(title) = title {
            self.set_sheet_title(&title)?;
        }
        Ok(())
    }

    pub fn sheet_id(&self) -> Option<i32> {
        match &self.sheet {
            SheetBinding::Attached(sheet) => Some(sheet.id),
            SheetBinding::Detached { id, .. } => *id,
        }
    }

    pub fn sheet_title(&self) -> Option<&str> {
        match &self.sheet {
            SheetBinding::Attached(sheet) if sheet.title.is_empty() => None,
            SheetBinding::Attached(sheet) => Some(&sheet.title),
            SheetBinding::Detached { title, .. } => title.as_deref(),
        }
    }

    /// The worksheet this range is bound to, if any.
    pub fn worksheet(&self) -> Option<&SheetRef> {
        match &self.sheet {
            SheetBinding::Attached(sheet) => Some(sheet),
            SheetBinding::Detached { .. } => None,
        }
    }

    /// Set the sheet id of a detached range. A bound range accepts only its own id.
    pub fn set_sheet_id(&mut self, value: i32) -> Result<()> {
        match &mut self.sheet {
            SheetBinding::Attached(sheet) if sheet.id == value => Ok(()),
            SheetBinding::Attached(sheet) => Err(AppError::SheetBindingConflict(format!(
                "range is bound to sheet id {}, not {value}",
                sheet.id
            ))),
            SheetBinding::Detached { id, .. } => {
                *id = Some(value);
                Ok(())
            }
        }
    }

    /// Set the sheet title of a detached range. Empty titles are ignored and a
    /// bound range accepts only its own title.
    pub fn set_sheet_title(&mut self, value: &str) -> Result<()> {
        if value.is_empty() {
            return Ok(());
        }
        self.check_title(value)?;
        if let SheetBinding::Detached { title, .. } = &mut self.sheet {
            *title = Some(value.to_string());
        }
        Ok(())
    }

    fn check_title(&self, value: &str) -> Result<()> {
        match &self.sheet {
            SheetBinding::Attached(sheet) if !value.is_empty() && sheet.title != value => {
                Err(AppError::SheetBindingConflict(format!(
                    "range is bound to sheet {:?}, not {value:?}",
                    sheet.title
                )))
            }
            _ => Ok(()),
        }
    }

    /// Bind to `sheet`, taking its id, title and size.
    pub fn set_worksheet<D: SheetDimensions + ?Sized>(&mut self, sheet: &D) {
        self.sheet = SheetBinding::Attached(SheetRef::of(sheet));
    }

    /// Wire representation. Start indexes are 0-based, end indexes exclusive.
    /// Only the components a corner actually holds are written.
    pub fn to_wire(&self) -> Result<WireGridRange> {
        let sheet_id = self.sheet_id().ok_or(AppError::MissingSheetBinding)?;

        Ok(WireGridRange {
            sheet_id: Some(sheet_id),
            start_row_index: self.start.row().map(|r| to_api_index(r - 1)).transpose()?,
            start_column_index: self.start.col().map(|c| to_api_index(c - 1)).transpose()?,
            end_row_index: self.end.row().map(to_api_index).transpose()?,
            end_column_index: self.end.col().map(to_api_index).transpose()?,
        })
    }

    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self.to_wire()?)?)
    }

    pub fn to_api(&self) -> Result<google_sheets4::api::GridRange> {
        Ok(self.to_wire()?.into())
    }

    /// Apply a wire range. Each absent index leaves just that side unbounded and
    /// an absent `sheetId` leaves the current id alone.
    pub fn set_wire(&mut self, wire: &WireGridRange) -> Result<()> {
        let start = Address::from_coordinates(
            wire.start_row_index.map(from_api_start).transpose()?,
            wire.start_column_index.map(from_api_start).transpose()?,
            true,
        )?;
        let end = Address::from_coordinates(
            wire.end_row_index.map(from_api_end).transpose()?,
            wire.end_column_index.map(from_api_end).transpose()?,
            true,
        )?;

        if let Some(id) = wire.sheet_id {
            if let Some(bound) = self.worksheet() {
                if bound.id != id {
                    return Err(AppError::SheetBindingConflict(format!(
                        "range is bound to sheet id {}, not {id}",
                        bound.id
                    )));
                }
            }
        }
        self.set_corners(start, end, OpenAxes::AsGiven)?;
        if let Some(id) = wire.sheet_id {
            self.set_sheet_id(id)?;
        }
        Ok(())
    }

    pub fn set_json(&mut self, value: &serde_json::Value) -> Result<()> {
        let wire = WireGridRange::deserialize(value)?;
        self.set_wire(&wire)
    }

    pub fn set_api(&mut self, api: &google_sheets4::api::GridRange) -> Result<()> {
        self.set_wire(&WireGridRange::from(api))
    }

    /// Resolve unbounded edges against `sheet`: missing start components become
    /// 1, missing end components the sheet's row or column count.
    pub fn resolve<D: SheetDimensions + ?Sized>(&self, sheet: &D) -> Result<(Address, Address)> {
        self.bounded_with(Some((sheet.rows(), sheet.cols())))
    }

    /// Like [`GridRange::resolve`], using the bound worksheet. Fails if an edge
    /// is unbounded and no worksheet is bound.
    pub fn get_bounded_indexes(&self) -> Result<(Address, Address)> {
        self.bounded_with(self.worksheet().map(|s| (s.rows, s.cols)))
    }

    fn bounded_with(&self, dims: Option<(u32, u32)>) -> Result<(Address, Address)> {
        let unresolved = || {
            AppError::UnresolvableRange(
                "a worksheet is required to resolve an unbounded range".to_string(),
            )
        };

        let start_row = self.start.row().unwrap_or(1);
        let start_col = self.start.col().unwrap_or(1);
        let end_row = match self.end.row() {
            Some(row) => row,
            None => dims.ok_or_else(unresolved)?.0,
        };
        let end_col = match self.end.col() {
            Some(col) => col,
            None => dims.ok_or_else(unresolved)?.1,
        };

        if start_row > end_row || start_col > end_col {
            return Err(AppError::UnresolvableRange(format!(
                "range does not fit the sheet: ({start_row}, {start_col}) to ({end_row}, {end_col})"
            )));
        }

        Ok((
            Address::from_bounded(start_row, start_col),
            Address::from_bounded(end_row, end_col),
        ))
    }

    pub fn height(&self) -> Result<u32> {
        let (start, end) = self.get_bounded_indexes()?;
        Ok(bound(end.row()) - bound(start.row()) + 1)
    }

    pub fn width(&self) -> Result<u32> {
        let (start, end) = self.get_bounded_indexes()?;
        Ok(bound(end.col()) - bound(start.col()) + 1)
    }

    /// Whether the bound `address` lies inside the (resolved) rectangle.
    pub fn contains(&self, address: &Address) -> Result<bool> {
        let (row, col) = address.bounded().ok_or_else(|| {
            AppError::InvalidCoordinate(format!(
                "containment needs a bound address, got {}",
                address.label()
            ))
        })?;
        let (start, end) = self.get_bounded_indexes()?;
        Ok((bound(start.row())..=bound(end.row())).contains(&row)
            && (bound(start.col())..=bound(end.col())).contains(&col))
    }

    /// [`GridRange::contains`] for anything coercible to an address. Values that
    /// are not addresses fail with [`AppError::InvalidCoordinate`].
    pub fn includes<A: ToAddress + ?Sized>(&self, item: &A) -> Result<bool> {
        let address = item.to_address(false).map_err(|e| match e {
            AppError::IncorrectLabelFormat(msg) => AppError::InvalidCoordinate(format!(
                "a grid range can only contain an address: {msg}"
            )),
            other => other,
        })?;
        self.contains(&address)
    }

    /// Every address in the resolved rectangle, row by row.
    pub fn cells(&self) -> Result<Cells> {
        let (start, end) = self.get_bounded_indexes()?;
        Ok(Cells {
            start_col: bound(start.col()),
            end_col: bound(end.col()),
            end_row: bound(end.row()),
            next: Some((bound(start.row()), bound(start.col()))),
        })
    }

    fn set_corners(&mut self, start: Address, end: Address, open: OpenAxes) -> Result<()> {
        match normalize(start, end, open) {
            Ok((start, end)) => {
                self.start = start;
                self.end = end;
                Ok(())
            }
            Err(BoundsViolation::AxisMismatch) => {
                self.start = Address::unbounded();
                self.end = Address::unbounded();
                Err(AppError::InconsistentRangeBounds(format!(
                    "{} and {} are unbounded on different axes",
                    start.label(),
                    end.label()
                )))
            }
            Err(BoundsViolation::Reversed(msg)) => Err(AppError::InconsistentRangeBounds(msg)),
        }
    }
}

/// Enforce same-axis unboundedness and start <= end on bound axes.
///
/// With [`OpenAxes::Shared`], an axis unbounded on one corner is made unbounded
/// on the other too. A fully unbounded corner leaves the other corner as is.
fn normalize(
    start: Address,
    end: Address,
    open: OpenAxes,
) -> std::result::Result<(Address, Address), BoundsViolation> {
    let mut start = start.into_unbound_capable();
    let mut end = end.into_unbound_capable();
    if start.is_unbounded() || end.is_unbounded() {
        return Ok((start, end));
    }

    let rows_only = |a: &Address| a.row().is_some() && a.col().is_none();
    let cols_only = |a: &Address| a.row().is_none() && a.col().is_some();
    if (rows_only(&start) && cols_only(&end)) || (cols_only(&start) && rows_only(&end)) {
        return Err(BoundsViolation::AxisMismatch);
    }

    if open == OpenAxes::Shared {
        if start.row().is_none() || end.row().is_none() {
            start = Address::partial(None, start.col());
            end = Address::partial(None, end.col());
        } else if start.col().is_none() || end.col().is_none() {
            start = Address::partial(start.row(), None);
            end = Address::partial(end.row(), None);
        }
    }

    if let (Some(a), Some(b)) = (start.row(), end.row()) {
        if a > b {
            return Err(BoundsViolation::Reversed(format!(
                "start row {a} is after end row {b}"
            )));
        }
    }
    if let (Some(a), Some(b)) = (start.col(), end.col()) {
        if a > b {
            return Err(BoundsViolation::Reversed(format!(
                "start column {a} is after end column {b}"
            )));
        }
    }

    Ok((start, end))
}

fn bound(component: Option<u32>) -> u32 {
    component.unwrap_or(1)
}

fn to_api_index(value: u32) -> Result<i32> {
    i32::try_from(value)
        .map_err(|_| AppError::InvalidCoordinate(format!("{value} does not fit an API index")))
}

fn from_api_start(index: i32) -> Result<u32> {
    u32::try_from(index)
        .ok()
        .and_then(|i| i.checked_add(1))
        .ok_or_else(|| AppError::InvalidCoordinate(format!("invalid start index {index}")))
}

fn from_api_end(index: i32) -> Result<u32> {
    u32::try_from(index)
        .map_err(|_| AppError::InvalidCoordinate(format!("invalid end index {index}")))
}

impl PartialEq for GridRange {
    /// Ranges are equal when they name the same cells on the same sheet, so a
    /// synthesized corner matches an explicit one.
    fn eq(&self, other: &Self) -> bool {
        let ends_match = match (self.end(), other.end()) {
            (Ok(a), Ok(b)) => a == b,
            _ => self.end == other.end,
        };
        self.start() == other.start()
            && ends_match
            && self.sheet_id() == other.sheet_id()
            && self.sheet_title() == other.sheet_title()
    }
}

impl FromStr for GridRange {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_label(s)
    }
}

impl TryFrom<&serde_json::Value> for GridRange {
    type Error = AppError;

    fn try_from(value: &serde_json::Value) -> Result<Self> {
        Self::from_json(value)
    }
}

impl TryFrom<&google_sheets4::api::GridRange> for GridRange {
    type Error = AppError;

    fn try_from(api: &google_sheets4::api::GridRange) -> Result<Self> {
        Self::from_wire(&WireGridRange::from(api))
    }
}

/// Row-major iterator over the addresses of a resolved [`GridRange`].
///
/// Cloning restarts nothing; call [`GridRange::cells`] again for a fresh pass.
#[derive(Debug, Clone)]
pub struct Cells {
    start_col: u32,
    end_col: u32,
    end_row: u32,
    next: Option<(u32, u32)>,
}

impl Iterator for Cells {
    type Item = Address;

    fn next(&mut self) -> Option<Address> {
        let (row, col) = self.next?;
        self.next = if col < self.end_col {
            Some((row, col + 1))
        } else if row < self.end_row {
            Some((row + 1, self.start_col))
        } else {
            None
        };
        Some(Address::from_bounded(row, col))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.next {
            Some((row, col)) => {
                let width = u64::from(self.end_col - self.start_col + 1);
                u64::from(self.end_row - row) * width + u64::from(self.end_col - col + 1)
            }
            None => 0,
        };
        let remaining = usize::try_from(remaining).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Cells {}

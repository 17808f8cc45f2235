//! Builders for `spreadsheets.batchUpdate` requests over a [`GridRange`].
//!
//! Every builder that takes a range needs its sheet id and fails with
//! [`AppError::MissingSheetBinding`](crate::error::AppError::MissingSheetBinding)
//! without one.

use crate::error::{AppError, Result};
use crate::grid::GridRange;
use google_sheets4::FieldMask;
use google_sheets4::api::{
    AddNamedRangeRequest, AddProtectedRangeRequest, Border, CellData, CellFormat, Color,
    DeleteNamedRangeRequest, DeleteProtectedRangeRequest, GridProperties, MergeCellsRequest,
    NamedRange, ProtectedRange, RepeatCellRequest, Request, SheetProperties, SortRangeRequest,
    SortSpec, TextFormat, UnmergeCellsRequest, UpdateBordersRequest, UpdateNamedRangeRequest,
    UpdateSheetPropertiesRequest,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeType {
    All,
    Columns,
    Rows,
}

impl MergeType {
    fn as_api_str(self) -> &'static str {
        match self {
            MergeType::All => "MERGE_ALL",
            MergeType::Columns => "MERGE_COLUMNS",
            MergeType::Rows => "MERGE_ROWS",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    fn as_api_str(self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASCENDING",
            SortOrder::Descending => "DESCENDING",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BorderStyle {
    Dotted,
    Dashed,
    #[default]
    Solid,
    SolidMedium,
    SolidThick,
    Double,
    /// Removes the border.
    None,
}

impl BorderStyle {
    fn as_api_str(self) -> &'static str {
        match self {
            BorderStyle::Dotted => "DOTTED",
            BorderStyle::Dashed => "DASHED",
            BorderStyle::Solid => "SOLID",
            BorderStyle::SolidMedium => "SOLID_MEDIUM",
            BorderStyle::SolidThick => "SOLID_THICK",
            BorderStyle::Double => "DOUBLE",
            BorderStyle::None => "NONE",
        }
    }
}

/// Which edges of a range a border update touches. Unselected edges are left
/// as they are.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BorderSides {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
    pub inner_horizontal: bool,
    pub inner_vertical: bool,
}

impl BorderSides {
    pub fn outer() -> Self {
        Self {
            top: true,
            bottom: true,
            left: true,
            right: true,
            ..Default::default()
        }
    }

    pub fn all() -> Self {
        Self {
            inner_horizontal: true,
            inner_vertical: true,
            ..Self::outer()
        }
    }
}

/// Copy the given `fields` of `cell` onto every cell of `range`.
pub fn repeat_cell(range: &GridRange, cell: CellData, fields: &[&str]) -> Result<Request> {
    Ok(Request {
        repeat_cell: Some(RepeatCellRequest {
            range: Some(range.to_api()?),
            cell: Some(cell),
            fields: Some(FieldMask::new(fields)),
        }),
        ..Default::default()
    })
}

/// Make the text in `range` bold.
pub fn bold(range: &GridRange) -> Result<Request> {
    let cell = CellData {
        user_entered_format: Some(CellFormat {
            text_format: Some(TextFormat {
                bold: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        }),
        ..Default::default()
    };
    repeat_cell(range, cell, &["userEnteredFormat.textFormat.bold"])
}

pub fn merge_cells(range: &GridRange, merge_type: MergeType) -> Result<Request> {
    Ok(Request {
        merge_cells: Some(MergeCellsRequest {
            range: Some(range.to_api()?),
            merge_type: Some(merge_type.as_api_str().to_string()),
        }),
        ..Default::default()
    })
}

pub fn unmerge_cells(range: &GridRange) -> Result<Request> {
    Ok(Request {
        unmerge_cells: Some(UnmergeCellsRequest {
            range: Some(range.to_api()?),
        }),
        ..Default::default()
    })
}

pub fn add_named_range(name: &str, range: &GridRange) -> Result<Request> {
    Ok(Request {
        add_named_range: Some(AddNamedRangeRequest {
            named_range: Some(NamedRange {
                name: Some(name.to_string()),
                range: Some(range.to_api()?),
                ..Default::default()
            }),
        }),
        ..Default::default()
    })
}

/// Rename an existing named range, keeping its span.
pub fn rename_named_range(id: &str, name: &str) -> Request {
    Request {
        update_named_range: Some(UpdateNamedRangeRequest {
            named_range: Some(NamedRange {
                named_range_id: Some(id.to_string()),
                name: Some(name.to_string()),
                ..Default::default()
            }),
            fields: Some(FieldMask::new(&["name"])),
        }),
        ..Default::default()
    }
}

pub fn delete_named_range(id: &str) -> Request {
    Request {
        delete_named_range: Some(DeleteNamedRangeRequest {
            named_range_id: Some(id.to_string()),
        }),
        ..Default::default()
    }
}

pub fn add_protected_range(
    range: &GridRange,
    description: Option<&str>,
    warning_only: bool,
) -> Result<Request> {
    Ok(Request {
        add_protected_range: Some(AddProtectedRangeRequest {
            protected_range: Some(ProtectedRange {
                range: Some(range.to_api()?),
                description: description.map(str::to_string),
                warning_only: Some(warning_only),
                ..Default::default()
            }),
        }),
        ..Default::default()
    })
}

pub fn delete_protected_range(id: i32) -> Request {
    Request {
        delete_protected_range: Some(DeleteProtectedRangeRequest {
            protected_range_id: Some(id),
        }),
        ..Default::default()
    }
}

/// Sort the rows of `range` by a sheet column (1-based, as in [`crate::grid::Address`]).
pub fn sort_range(range: &GridRange, column: u32, order: SortOrder) -> Result<Request> {
    let dimension_index = column
        .checked_sub(1)
        .and_then(|c| i32::try_from(c).ok())
        .ok_or_else(|| AppError::InvalidCoordinate(format!("invalid sort column {column}")))?;

    Ok(Request {
        sort_range: Some(SortRangeRequest {
            range: Some(range.to_api()?),
            sort_specs: Some(vec![SortSpec {
                dimension_index: Some(dimension_index),
                sort_order: Some(order.as_api_str().to_string()),
                ..Default::default()
            }]),
        }),
        ..Default::default()
    })
}

pub fn update_borders(
    range: &GridRange,
    sides: BorderSides,
    style: BorderStyle,
    color: Color,
) -> Result<Request> {
    let border = Border {
        style: Some(style.as_api_str().to_string()),
        color: Some(color),
        ..Default::default()
    };
    let side = |selected: bool| selected.then(|| border.clone());

    Ok(Request {
        update_borders: Some(UpdateBordersRequest {
            range: Some(range.to_api()?),
            top: side(sides.top),
            bottom: side(sides.bottom),
            left: side(sides.left),
            right: side(sides.right),
            inner_horizontal: side(sides.inner_horizontal),
            inner_vertical: side(sides.inner_vertical),
        }),
        ..Default::default()
    })
}

/// Freeze the first `count` rows of a sheet.
pub fn freeze_rows(sheet_id: i32, count: i32) -> Request {
    Request {
        update_sheet_properties: Some(UpdateSheetPropertiesRequest {
            properties: Some(SheetProperties {
                sheet_id: Some(sheet_id),
                grid_properties: Some(GridProperties {
                    frozen_row_count: Some(count),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            fields: Some(FieldMask::new(&["gridProperties.frozenRowCount"])),
        }),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::SheetRef;

    fn range(label: &str) -> GridRange {
        GridRange::parse_on(&SheetRef::new(123, "Sheet1", 100, 26), label).unwrap()
    }

    #[test]
    fn test_bold() {
        let req = bold(&range("1:1")).unwrap();
        let repeat_cell = req.repeat_cell.unwrap();
        let api_range = repeat_cell.range.unwrap();
        assert_eq!(api_range.sheet_id, Some(123));
        assert_eq!(api_range.start_row_index, Some(0));
        assert_eq!(api_range.end_row_index, Some(1));
        assert_eq!(api_range.start_column_index, None);
        assert!(
            repeat_cell
                .cell
                .unwrap()
                .user_entered_format
                .unwrap()
                .text_format
                .unwrap()
                .bold
                .unwrap()
        );
    }

    #[test]
    fn test_builders_need_sheet_id() {
        let detached = GridRange::new("A1", "B2").unwrap();
        assert!(matches!(bold(&detached), Err(AppError::MissingSheetBinding)));
        assert!(matches!(
            merge_cells(&detached, MergeType::All),
            Err(AppError::MissingSheetBinding)
        ));
        assert!(matches!(
            add_named_range("x", &detached),
            Err(AppError::MissingSheetBinding)
        ));
    }

    #[test]
    fn test_merge_cells() {
        let req = merge_cells(&range("A1:B2"), MergeType::Rows).unwrap();
        let merge = req.merge_cells.unwrap();
        assert_eq!(merge.merge_type.as_deref(), Some("MERGE_ROWS"));
        let api_range = merge.range.unwrap();
        assert_eq!(api_range.end_row_index, Some(2));
        assert_eq!(api_range.end_column_index, Some(2));

        let req = unmerge_cells(&range("A1:B2")).unwrap();
        assert!(req.unmerge_cells.unwrap().range.is_some());
    }

    #[test]
    fn test_named_range_requests() {
        let req = add_named_range("Totals", &range("C:C")).unwrap();
        let named = req.add_named_range.unwrap().named_range.unwrap();
        assert_eq!(named.name.as_deref(), Some("Totals"));
        assert_eq!(named.range.unwrap().start_column_index, Some(2));

        let req = rename_named_range("nr1", "Sums");
        let named = req.update_named_range.unwrap().named_range.unwrap();
        assert_eq!(named.named_range_id.as_deref(), Some("nr1"));

        let req = delete_named_range("nr1");
        assert_eq!(
            req.delete_named_range.unwrap().named_range_id.as_deref(),
            Some("nr1")
        );
    }

    #[test]
    fn test_protected_range_requests() {
        let req = add_protected_range(&range("A:C"), Some("Managed"), true).unwrap();
        let protected = req.add_protected_range.unwrap().protected_range.unwrap();
        assert_eq!(protected.warning_only, Some(true));
        assert_eq!(protected.description.as_deref(), Some("Managed"));
        let api_range = protected.range.unwrap();
        assert_eq!(api_range.start_column_index, Some(0));
        assert_eq!(api_range.end_column_index, Some(3));

        let req = delete_protected_range(222);
        assert_eq!(
            req.delete_protected_range.unwrap().protected_range_id,
            Some(222)
        );
    }

    #[test]
    fn test_sort_range() {
        let req = sort_range(&range("A2:D20"), 3, SortOrder::Descending).unwrap();
        let sort = req.sort_range.unwrap();
        assert_eq!(sort.range.unwrap().start_row_index, Some(1));
        let specs = sort.sort_specs.unwrap();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].dimension_index, Some(2));
        assert_eq!(specs[0].sort_order.as_deref(), Some("DESCENDING"));

        assert!(matches!(
            sort_range(&range("A2:D20"), 0, SortOrder::Ascending),
            Err(AppError::InvalidCoordinate(_))
        ));
    }

    #[test]
    fn test_update_borders_only_selected_sides() {
        let black = Color {
            red: Some(0.0),
            green: Some(0.0),
            blue: Some(0.0),
            alpha: Some(1.0),
        };
        let req = update_borders(&range("B2:C3"), BorderSides::outer(), BorderStyle::Dashed, black)
            .unwrap();
        let borders = req.update_borders.unwrap();
        assert_eq!(
            borders.top.unwrap().style.as_deref(),
            Some("DASHED")
        );
        assert!(borders.left.is_some());
        assert!(borders.inner_horizontal.is_none());
        assert!(borders.inner_vertical.is_none());

        let req = update_borders(
            &range("B2:C3"),
            BorderSides::all(),
            BorderStyle::None,
            Color::default(),
        )
        .unwrap();
        let borders = req.update_borders.unwrap();
        assert_eq!(
            borders.inner_vertical.unwrap().style.as_deref(),
            Some("NONE")
        );
    }

    #[test]
    fn test_freeze_rows() {
        let req = freeze_rows(123, 1);
        let props = req.update_sheet_properties.unwrap().properties.unwrap();
        assert_eq!(props.sheet_id, Some(123));
        assert_eq!(props.grid_properties.unwrap().frozen_row_count, Some(1));
    }
}

use serde::{Deserialize, Serialize};

/// The `GridRange` resource as the Sheets API sends it: 0-based indexes with
/// exclusive ends, each key absent when that side is unbounded.
///
/// <https://developers.google.com/sheets/api/reference/rest/v4/spreadsheets/other#GridRange>
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireGridRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_row_index: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_column_index: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_row_index: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_column_index: Option<i32>,
}

impl From<WireGridRange> for google_sheets4::api::GridRange {
    fn from(wire: WireGridRange) -> Self {
        google_sheets4::api::GridRange {
            sheet_id: wire.sheet_id,
            start_row_index: wire.start_row_index,
            end_row_index: wire.end_row_index,
            start_column_index: wire.start_column_index,
            end_column_index: wire.end_column_index,
        }
    }
}

impl From<&google_sheets4::api::GridRange> for WireGridRange {
    fn from(api: &google_sheets4::api::GridRange) -> Self {
        WireGridRange {
            sheet_id: api.sheet_id,
            start_row_index: api.start_row_index,
            start_column_index: api.start_column_index,
            end_row_index: api.end_row_index,
            end_column_index: api.end_column_index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unbounded_keys_are_omitted() {
        let wire = WireGridRange {
            sheet_id: Some(3),
            start_row_index: Some(1),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&wire).unwrap(),
            json!({"sheetId": 3, "startRowIndex": 1})
        );
    }

    #[test]
    fn test_missing_keys_deserialize_as_none() {
        let wire: WireGridRange =
            serde_json::from_value(json!({"sheetId": 0, "endColumnIndex": 2})).unwrap();
        assert_eq!(wire.sheet_id, Some(0));
        assert_eq!(wire.end_column_index, Some(2));
        assert_eq!(wire.start_row_index, None);
    }

    #[test]
    fn test_api_conversion() {
        let wire = WireGridRange {
            sheet_id: Some(9),
            start_row_index: Some(0),
            end_row_index: Some(4),
            start_column_index: None,
            end_column_index: None,
        };
        let api: google_sheets4::api::GridRange = wire.clone().into();
        assert_eq!(api.end_row_index, Some(4));
        assert_eq!(WireGridRange::from(&api), wire);
    }
}

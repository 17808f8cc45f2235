use crate::error::{AppError, Result};
use crate::grid::GridRange;
use crate::models::NamedRange;
use crate::sheets::SheetOperations;
use crate::sheets::requests::{self, BorderSides, BorderStyle, MergeType, SortOrder};
use google_sheets4::api::{CellData, Color, Request, Response};
use tracing::{debug, instrument};

/// Whether [`DataRange::commit`] may push to the spreadsheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncMode {
    #[default]
    Linked,
    Detached,
}

/// A local mirror of one range's values with a queue of pending changes.
///
/// Mutators only touch local state. Nothing reaches the spreadsheet until
/// [`DataRange::commit`] is called on a linked range.
#[derive(Debug, Clone)]
pub struct DataRange {
    spreadsheet_id: String,
    range: GridRange,
    values: Vec<Vec<String>>,
    mode: SyncMode,
    name: Option<String>,
    named_range_id: Option<String>,
    protected_range_id: Option<i32>,
    values_dirty: bool,
    pending: Vec<Request>,
}

impl DataRange {
    /// `range` must carry a sheet id.
    pub fn new(spreadsheet_id: impl Into<String>, range: GridRange) -> Result<Self> {
        if range.sheet_id().is_none() {
            return Err(AppError::MissingSheetBinding);
        }

        Ok(Self {
            spreadsheet_id: spreadsheet_id.into(),
            range,
            values: Vec::new(),
            mode: SyncMode::Linked,
            name: None,
            named_range_id: None,
            protected_range_id: None,
            values_dirty: false,
            pending: Vec::new(),
        })
    }

    pub fn from_named_range(spreadsheet_id: impl Into<String>, named: &NamedRange) -> Result<Self> {
        let mut data_range = Self::new(spreadsheet_id, named.range.clone())?;
        data_range.name = Some(named.name.clone());
        data_range.named_range_id = Some(named.id.clone());
        Ok(data_range)
    }

    pub fn range(&self) -> &GridRange {
        &self.range
    }

    pub fn values(&self) -> &[Vec<String>] {
        &self.values
    }

    pub fn mode(&self) -> SyncMode {
        self.mode
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn named_range_id(&self) -> Option<&str> {
        self.named_range_id.as_deref()
    }

    pub fn protected_range_id(&self) -> Option<i32> {
        self.protected_range_id
    }

    pub fn is_protected(&self) -> bool {
        self.protected_range_id.is_some() || self.pending.iter().any(is_add_protection)
    }

    /// True when local values or requests have not been committed yet.
    pub fn has_pending(&self) -> bool {
        self.values_dirty || !self.pending.is_empty()
    }

    pub fn link(&mut self) {
        self.mode = SyncMode::Linked;
    }

    pub fn unlink(&mut self) {
        self.mode = SyncMode::Detached;
    }

    /// Replace the local values. Rows and columns beyond the range's size are
    /// rejected; shorter input leaves the remaining cells untouched remotely.
    pub fn set_values(&mut self, values: Vec<Vec<String>>) -> Result<()> {
        let height = self.range.height()?;
        let width = self.range.width()?;

        if values.len() > height as usize {
            return Err(AppError::InconsistentRangeBounds(format!(
                "{} rows of values do not fit in a range {} rows high",
                values.len(),
                height
            )));
        }
        if let Some(row) = values.iter().find(|row| row.len() > width as usize) {
            return Err(AppError::InconsistentRangeBounds(format!(
                "a row of {} values does not fit in a range {} columns wide",
                row.len(),
                width
            )));
        }

        self.values = values;
        self.values_dirty = true;
        Ok(())
    }

    pub fn apply_format(&mut self, cell: CellData, fields: &[&str]) -> Result<()> {
        self.pending.push(requests::repeat_cell(&self.range, cell, fields)?);
        Ok(())
    }

    pub fn merge(&mut self, merge_type: MergeType) -> Result<()> {
        self.pending.push(requests::merge_cells(&self.range, merge_type)?);
        Ok(())
    }

    pub fn unmerge(&mut self) -> Result<()> {
        self.pending.push(requests::unmerge_cells(&self.range)?);
        Ok(())
    }

    /// Sort the range's rows by a sheet column (1-based).
    pub fn sort(&mut self, column: u32, order: SortOrder) -> Result<()> {
        self.pending.push(requests::sort_range(&self.range, column, order)?);
        Ok(())
    }

    pub fn update_borders(
        &mut self,
        sides: BorderSides,
        style: BorderStyle,
        color: Color,
    ) -> Result<()> {
        self.pending.push(requests::update_borders(&self.range, sides, style, color)?);
        Ok(())
    }

    /// Queue protection of the range. Does nothing if it is already protected.
    pub fn protect(&mut self, description: Option<&str>, warning_only: bool) -> Result<()> {
        if self.is_protected() {
            return Ok(());
        }
        self.pending.push(requests::add_protected_range(
            &self.range,
            description,
            warning_only,
        )?);
        Ok(())
    }

    pub fn unprotect(&mut self) {
        match self.protected_range_id.take() {
            Some(id) => self.pending.push(requests::delete_protected_range(id)),
            None => self.pending.retain(|r| !is_add_protection(r)),
        }
    }

    /// Name the range, renaming it if it already has a remote name.
    pub fn set_name(&mut self, name: &str) -> Result<()> {
        let request = match &self.named_range_id {
            Some(id) => requests::rename_named_range(id, name),
            None => {
                self.pending.retain(|r| !is_add_name(r));
                requests::add_named_range(name, &self.range)?
            }
        };
        self.pending.push(request);
        self.name = Some(name.to_string());
        Ok(())
    }

    pub fn remove_name(&mut self) {
        match self.named_range_id.take() {
            Some(id) => self.pending.push(requests::delete_named_range(&id)),
            None => self.pending.retain(|r| !is_add_name(r)),
        }
        self.name = None;
    }

    /// Push local values, then every queued request in a single batch update.
    ///
    /// Fails without touching the queue when the range is detached or a remote
    /// call fails.
    #[instrument(name = "Committing data range", skip_all, fields(range = ?self.range.label().ok()))]
    pub async fn commit<C: SheetOperations + Sync>(&mut self, client: &C) -> Result<()> {
        if self.mode == SyncMode::Detached {
            return Err(AppError::DetachedRange);
        }

        if self.values_dirty {
            client
                .update_values(&self.spreadsheet_id, &self.range, &self.values)
                .await?;
            self.values_dirty = false;
        }

        if !self.pending.is_empty() {
            let replies = client
                .batch_update(&self.spreadsheet_id, self.pending.clone())
                .await?;
            debug!(requests = self.pending.len(), "Committed requests");
            self.pending.clear();
            self.absorb_replies(replies);
        }

        Ok(())
    }

    /// Replace the local values with the remote ones, dropping uncommitted
    /// values. Queued requests are kept.
    #[instrument(name = "Fetching data range", skip_all, fields(range = ?self.range.label().ok()))]
    pub async fn fetch<C: SheetOperations + Sync>(&mut self, client: &C) -> Result<()> {
        self.values = client.get_values(&self.spreadsheet_id, &self.range).await?;
        self.values_dirty = false;
        Ok(())
    }

    fn absorb_replies(&mut self, replies: Vec<Response>) {
        for reply in replies {
            if let Some(id) = reply
                .add_named_range
                .and_then(|r| r.named_range)
                .and_then(|nr| nr.named_range_id)
            {
                self.named_range_id = Some(id);
            }
            if let Some(id) = reply
                .add_protected_range
                .and_then(|r| r.protected_range)
                .and_then(|pr| pr.protected_range_id)
            {
                self.protected_range_id = Some(id);
            }
        }
    }
}

fn is_add_name(request: &Request) -> bool {
    request.add_named_range.is_some()
}

fn is_add_protection(request: &Request) -> bool {
    request.add_protected_range.is_some()
}


#[cfg(test)]
mod tests {
    use super::mocks::MockSheetsClient;
    use super::*;
    use crate::models::worksheet::test_helpers::mock_worksheet;
    use google_sheets4::api::{
        AddNamedRangeResponse, AddProtectedRangeResponse, NamedRange as ApiNamedRange,
        ProtectedRange as ApiProtectedRange,
    };

    fn data_range(label: &str) -> DataRange {
        let ws = mock_worksheet(7, "Sheet1", 100, 26);
        DataRange::new("key", ws.range(label).unwrap()).unwrap()
    }

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_new_requires_sheet_id() {
        let range = GridRange::new("A1", "B2").unwrap();
        assert!(matches!(
            DataRange::new("key", range),
            Err(AppError::MissingSheetBinding)
        ));
    }

    #[test]
    fn test_set_values_checks_size() {
        let mut dr = data_range("A1:B2");
        assert!(!dr.has_pending());

        dr.set_values(vec![row(&["a", "b"]), row(&["c"])]).unwrap();
        assert!(dr.has_pending());
        assert_eq!(dr.values()[1], row(&["c"]));

        let too_tall = vec![row(&["a"]), row(&["b"]), row(&["c"])];
        assert!(matches!(
            dr.set_values(too_tall),
            Err(AppError::InconsistentRangeBounds(_))
        ));
        let too_wide = vec![row(&["a", "b", "c"])];
        assert!(matches!(
            dr.set_values(too_wide),
            Err(AppError::InconsistentRangeBounds(_))
        ));
        assert_eq!(dr.values()[0], row(&["a", "b"]));
    }

    #[test]
    fn test_protect_is_idempotent() {
        let mut dr = data_range("A1:B2");
        dr.protect(Some("locked"), false).unwrap();
        dr.protect(Some("locked"), false).unwrap();
        assert!(dr.is_protected());
        assert_eq!(dr.pending.len(), 1);

        dr.unprotect();
        assert!(!dr.is_protected());
        assert!(!dr.has_pending());
    }

    #[test]
    fn test_name_before_commit_replaces_pending_add() {
        let mut dr = data_range("A1:B2");
        dr.set_name("First").unwrap();
        dr.set_name("Second").unwrap();
        assert_eq!(dr.name(), Some("Second"));
        assert_eq!(dr.pending.len(), 1);

        dr.remove_name();
        assert_eq!(dr.name(), None);
        assert!(!dr.has_pending());
    }

    #[tokio::test]
    async fn test_commit_pushes_values_then_requests() {
        let client = MockSheetsClient::default();
        let mut dr = data_range("A1:B2");
        dr.set_values(vec![row(&["1", "2"])]).unwrap();
        dr.merge(MergeType::All).unwrap();

        dr.commit(&client).await.unwrap();

        let written = client.written.lock().unwrap();
        assert_eq!(
            *written,
            vec![("'Sheet1'!A1:B2".to_string(), vec![row(&["1", "2"])])]
        );
        let batches = client.batches.lock().unwrap();
        assert_eq!(batches.len(), 1);
        assert!(batches[0][0].merge_cells.is_some());
        assert!(!dr.has_pending());
    }

    #[tokio::test]
    async fn test_commit_without_changes_makes_no_calls() {
        let client = MockSheetsClient::default();
        let mut dr = data_range("A1:B2");
        dr.commit(&client).await.unwrap();
        assert!(client.written.lock().unwrap().is_empty());
        assert!(client.batches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_detached_commit_keeps_queue() {
        let client = MockSheetsClient::default();
        let mut dr = data_range("A1:B2");
        dr.unlink();
        dr.set_values(vec![row(&["x"])]).unwrap();
        dr.unmerge().unwrap();

        let err = dr.commit(&client).await.unwrap_err();
        assert!(matches!(err, AppError::DetachedRange));
        assert!(dr.has_pending());
        assert!(client.written.lock().unwrap().is_empty());
        assert!(client.batches.lock().unwrap().is_empty());

        dr.link();
        dr.commit(&client).await.unwrap();
        assert_eq!(client.written.lock().unwrap().len(), 1);
        assert_eq!(client.batches.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_commit_records_reply_ids() {
        let client = MockSheetsClient {
            replies: vec![
                Response {
                    add_named_range: Some(AddNamedRangeResponse {
                        named_range: Some(ApiNamedRange {
                            named_range_id: Some("nr9".to_string()),
                            ..Default::default()
                        }),
                    }),
                    ..Default::default()
                },
                Response {
                    add_protected_range: Some(AddProtectedRangeResponse {
                        protected_range: Some(ApiProtectedRange {
                            protected_range_id: Some(31),
                            ..Default::default()
                        }),
                    }),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let mut dr = data_range("C:C");
        dr.set_name("Totals").unwrap();
        dr.protect(None, true).unwrap();
        dr.commit(&client).await.unwrap();

        assert_eq!(dr.named_range_id(), Some("nr9"));
        assert_eq!(dr.protected_range_id(), Some(31));

        // Once the name exists remotely, renaming updates it in place.
        dr.set_name("Sums").unwrap();
        assert!(dr.pending[0].update_named_range.is_some());
        dr.remove_name();
        assert!(dr.pending[1].delete_named_range.is_some());
        dr.unprotect();
        assert_eq!(
            dr.pending[2]
                .delete_protected_range
                .as_ref()
                .and_then(|r| r.protected_range_id),
            Some(31)
        );
    }

    #[tokio::test]
    async fn test_commit_sends_sort_and_borders_in_order() {
        let client = MockSheetsClient::default();
        let mut dr = data_range("A2:D20");
        dr.sort(2, SortOrder::Ascending).unwrap();
        dr.update_borders(BorderSides::all(), BorderStyle::Solid, Color::default())
            .unwrap();
        assert!(matches!(
            dr.sort(0, SortOrder::Descending),
            Err(AppError::InvalidCoordinate(_))
        ));

        dr.commit(&client).await.unwrap();

        let batches = client.batches.lock().unwrap();
        assert_eq!(batches.len(), 1);
        let sort = batches[0][0].sort_range.as_ref().unwrap();
        assert_eq!(
            sort.sort_specs.as_ref().unwrap()[0].dimension_index,
            Some(1)
        );
        assert_eq!(sort.range.as_ref().unwrap().sheet_id, Some(7));
        let borders = batches[0][1].update_borders.as_ref().unwrap();
        assert!(borders.top.is_some() && borders.inner_vertical.is_some());
        assert!(!dr.has_pending());
    }

    #[tokio::test]
    async fn test_fetch_replaces_local_values() {
        let client = MockSheetsClient {
            remote_values: vec![row(&["remote"])],
            ..Default::default()
        };
        let mut dr = data_range("A1:B2");
        dr.set_values(vec![row(&["local"])]).unwrap();
        dr.fetch(&client).await.unwrap();

        assert_eq!(dr.values(), &[row(&["remote"])]);
        assert!(!dr.has_pending());
    }

    #[test]
    fn test_from_named_range() {
        let ws = mock_worksheet(7, "Sheet1", 100, 26);
        let named = NamedRange {
            id: "nr1".to_string(),
            name: "Header".to_string(),
            range: ws.range("1:1").unwrap(),
        };
        let mut dr = DataRange::from_named_range("key", &named).unwrap();
        assert_eq!(dr.name(), Some("Header"));
        dr.set_name("Top").unwrap();
        assert!(dr.pending[0].update_named_range.is_some());
    }
}

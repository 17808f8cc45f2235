use clap::Subcommand;
use gridsheets::error::Result;
use gridsheets::grid::{GridRange, SheetRef};
use tracing::info;

#[derive(Subcommand, Debug)]
pub enum RangeCommand {
    /// Parse a label and show its wire form and resolved corners
    Inspect {
        /// A1 label, e.g. "'Sheet1'!A1:C3", "A:B" or "2:4"
        label: String,

        /// Sheet id to use for the wire form
        #[arg(long)]
        sheet_id: Option<i32>,

        /// Sheet row count, used to resolve unbounded edges
        #[arg(long, requires = "cols")]
        rows: Option<u32>,

        /// Sheet column count, used to resolve unbounded edges
        #[arg(long, requires = "rows")]
        cols: Option<u32>,
    },
}

impl RangeCommand {
    pub fn execute(&self) -> Result<()> {
        match self {
            RangeCommand::Inspect {
                label,
                sheet_id,
                rows,
                cols,
            } => inspect(label, *sheet_id, rows.zip(*cols)),
        }
    }
}

fn inspect(label: &str, sheet_id: Option<i32>, size: Option<(u32, u32)>) -> Result<()> {
    let mut range = GridRange::from_label(label)?;
    let parsed = range.label()?;
    info!(label = %parsed, "Parsed range");

    if let Some(id) = sheet_id {
        range.set_sheet_id(id)?;
        let json = range.to_json()?;
        info!(json = %json, "Wire range");
    }

    if let Some((rows, cols)) = size {
        let sheet = SheetRef::new(
            sheet_id.unwrap_or_default(),
            range.sheet_title().unwrap_or_default(),
            rows,
            cols,
        );
        range.set_worksheet(&sheet);
        let (start, end) = range.get_bounded_indexes()?;
        let (height, width) = (range.height()?, range.width()?);
        info!(
            start = %start,
            end = %end,
            height,
            width,
            "Resolved range"
        );
    }

    Ok(())
}

use clap::Subcommand;
use gridsheets::config::Config;
use gridsheets::error::{AppError, Result};
use gridsheets::export::write_csv;
use gridsheets::grid::GridRange;
use gridsheets::sheets::{SheetOperations, SheetsClient};
use tracing::{debug, info};

#[derive(Subcommand, Debug)]
pub enum ValuesCommand {
    /// Fetch the values of a range and write them to stdout as CSV
    Get {
        /// A1 label; without a sheet prefix the first sheet is used
        label: String,

        /// Spreadsheet key, defaults to client.default_spreadsheet
        #[arg(long, conflicts_with = "title")]
        spreadsheet: Option<String>,

        /// Look the spreadsheet up by its title instead
        #[arg(long)]
        title: Option<String>,
    },
}

impl ValuesCommand {
    pub async fn execute(&self) -> Result<()> {
        match self {
            ValuesCommand::Get {
                label,
                spreadsheet,
                title,
            } => get_values(label, spreadsheet.as_deref(), title.as_deref()).await,
        }
    }
}

async fn get_values(label: &str, spreadsheet: Option<&str>, title: Option<&str>) -> Result<()> {
    let config = Config::load()?;
    let client = SheetsClient::new(&config.google).await?;

    let key = match (spreadsheet, title) {
        (Some(key), _) => key.to_string(),
        (None, Some(title)) => client
            .find_spreadsheet(title)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("spreadsheet titled {title:?}")))?,
        (None, None) => config.client.default_spreadsheet.clone().ok_or_else(|| {
            AppError::Config(
                "No spreadsheet given and client.default_spreadsheet is not set".to_string(),
            )
        })?,
    };

    let spreadsheet = client.get_spreadsheet(&key).await?;
    let mut range = GridRange::from_label(label)?;
    let worksheet = match range.sheet_title() {
        Some(title) => spreadsheet.worksheet_by_title(title)?,
        None => spreadsheet.sheet1()?,
    };
    range.set_worksheet(worksheet);
    let bound = range.label()?;
    debug!(label = %bound, "Bound range");

    let values = client.get_values(&key, &range).await?;
    write_csv(&values, std::io::stdout().lock())?;
    info!(rows = values.len(), url = %spreadsheet.url, "Fetched values");

    Ok(())
}

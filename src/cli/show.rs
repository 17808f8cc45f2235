use clap::Subcommand;
use gridsheets::config::Config;
use gridsheets::error::Result;
use tracing::info;

#[derive(Subcommand, Debug)]
pub enum ShowResource {
    /// Show configuration and cache paths
    Paths,
    /// Show how the loaded configuration will authenticate
    Config,
}

impl ShowResource {
    pub async fn execute(&self) -> Result<()> {
        match self {
            ShowResource::Paths => show_paths(),
            ShowResource::Config => show_config(),
        }
    }
}

fn show_paths() -> Result<()> {
    let config_path = Config::config_file()?;
    let cache_dir = Config::cache_dir()?;

    info!(path = ?config_path, exists = config_path.exists(), "Config path");
    info!(path = ?cache_dir, "Cache path");

    Ok(())
}

fn show_config() -> Result<()> {
    let config = Config::load()?;

    match &config.google.service_account_file {
        Some(path) => info!(key = ?path, "Authenticating with service account"),
        None => info!(client_id = %config.google.client_id, "Authenticating with installed app"),
    }
    info!(
        default_spreadsheet = ?config.client.default_spreadsheet,
        "Client settings"
    );

    Ok(())
}

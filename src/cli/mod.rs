mod auth;
mod range;
mod show;
mod values;

use clap::{Parser, Subcommand};
use gridsheets::error::Result;

pub use auth::AuthProvider;
pub use range::RangeCommand;
pub use show::ShowResource;
pub use values::ValuesCommand;

#[derive(Parser, Debug)]
#[command(name = "gridsheets")]
#[command(about = "Inspect A1 ranges and read values from Google Sheets", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub async fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Show { resource } => resource.execute().await,
            Commands::Auth { provider, reset } => provider.execute(*reset).await,
            Commands::Range { command } => command.execute(),
            Commands::Values { command } => command.execute().await,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Show {
        #[command(subcommand)]
        resource: ShowResource,
    },
    /// Authenticate with a provider
    Auth {
        #[command(subcommand)]
        provider: AuthProvider,

        /// Clear cached tokens before authenticating
        #[arg(long, global = true)]
        reset: bool,
    },
    /// Work with A1 ranges offline
    Range {
        #[command(subcommand)]
        command: RangeCommand,
    },
    /// Read cell values
    Values {
        #[command(subcommand)]
        command: ValuesCommand,
    },
}

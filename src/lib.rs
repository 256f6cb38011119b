pub mod contract;
pub mod decode;
pub mod fetch;
pub mod resolver;
pub mod settings;
pub mod sheet_sync;
pub mod sheets_client;
pub mod synchronise;
pub mod table;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use decode::ExcelDecoder;
use fetch::HttpFetcher;
use settings::Settings;
use sheets_client::GoogleSheetsClient;
use synchronise::synchronise;

/// CLI for basket-sheets: collect team game schedules into a shared
/// spreadsheet.
#[derive(Parser)]
#[clap(
    name = "basket-sheets",
    version,
    about = "Collect BasketPlan team game schedules into a shared Google spreadsheet"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch every configured team's games and synchronise the spreadsheet
    Sync {
        /// Path to the settings JSON file
        #[clap(long, default_value = "settings.json")]
        settings: PathBuf,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Sync { settings: path } => {
            let mut settings = Settings::load(&path)?;
            let api = GoogleSheetsClient::new_from_env()?;
            let fetcher = HttpFetcher::new();
            let decoder = ExcelDecoder;

            println!("Synchronise starting...");
            match synchronise(&api, &fetcher, &decoder, &mut settings).await {
                Ok(report) => {
                    println!("Synchronise complete.\nReport:");
                    println!("{report:#?}");
                    println!(
                        "Google Sheet updated: https://docs.google.com/spreadsheets/d/{}",
                        report.spreadsheet_id
                    );
                    Ok(())
                }
                Err(e) => {
                    eprintln!("[ERROR] Synchronisation failed: {e}");
                    Err(anyhow::Error::new(e))
                }
            }
        }
    }
}

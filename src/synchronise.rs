//! Top-level pipeline: fetch each team's schedule, synchronise its sheet,
//! then build and synchronise the combined view.
//!
//! Teams are processed strictly sequentially in the order they are declared
//! in settings. A failure while handling one team (fetch, decode, or sheet
//! sync) is logged and that team is skipped; a failure resolving/creating
//! the destination or writing the combined sheet aborts the run.

use thiserror::Error;
use tracing::{error, info, warn};

use crate::contract::{Decoder, Fetcher, SheetsApi};
use crate::resolver::{self, ResolveError};
use crate::settings::{Settings, SettingsError};
use crate::sheet_sync::{self, sheet_title, SyncError};
use crate::table::{Cell, Table};

/// Title of the combined sheet holding every team's rows.
pub const ALL_SHEET: &str = "All";

/// Column tagging each row with the team it belongs to.
pub const TEAM_COLUMN: &str = "Team";

/// Derived ISO week number column.
pub const WEEK_COLUMN: &str = "Week";

/// Temporal column the export carries; drives week derivation and the
/// combined view's sort order.
pub const DATE_COLUMN: &str = "Datum";

#[derive(Debug, Error)]
pub enum CollectError {
    #[error("invalid settings: {0}")]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("failed to sync combined sheet: {0}")]
    Combined(#[source] SyncError),
}

/// Outcome of one team's sheet sync.
#[derive(Debug)]
pub struct TeamReport {
    pub team: String,
    pub sheet: String,
    pub rows: usize,
    pub cells_written: u64,
}

/// Outcome of the combined-view sync.
#[derive(Debug)]
pub struct CombinedReport {
    pub rows: usize,
    pub cells_written: u64,
}

/// What the run accomplished, for operator visibility.
#[derive(Debug)]
pub struct SyncReport {
    pub spreadsheet_id: String,
    pub teams: Vec<TeamReport>,
    pub combined: Option<CombinedReport>,
}

/// Runs the full collection pipeline against the given collaborators.
pub async fn synchronise<A, F, D>(
    api: &A,
    fetcher: &F,
    decoder: &D,
    settings: &mut Settings,
) -> Result<SyncReport, CollectError>
where
    A: SheetsApi,
    F: Fetcher,
    D: Decoder,
{
    settings.validate()?;

    let spreadsheet_id = resolver::resolve(api, settings).await?;
    resolver::share_all(api, settings, &spreadsheet_id).await;

    let teams: Vec<(String, String)> = settings
        .teams
        .iter()
        .map(|(name, team)| (name.clone(), team.id.clone()))
        .collect();

    let mut all_games: Vec<Table> = Vec::new();
    let mut team_reports: Vec<TeamReport> = Vec::new();

    for (team, team_id) in teams {
        info!(team = %team, "processing team");

        if team_id.trim().is_empty() {
            warn!(team = %team, "skipping team: no team id provided");
            continue;
        }

        let bytes = match fetcher.fetch_team_games(&team_id).await {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(team = %team, error = %e, "download failed; skipping team");
                continue;
            }
        };

        let mut table = match decoder.decode(&bytes) {
            Ok(table) => table,
            Err(e) => {
                error!(team = %team, error = %e, "decode failed; skipping team");
                continue;
            }
        };

        table.push_const_column(TEAM_COLUMN, Cell::Text(team.clone()));
        table.derive_week(DATE_COLUMN, WEEK_COLUMN);

        // Accumulated before the sheet write, so a failed per-team sync
        // still contributes its rows to the combined view.
        all_games.push(table.clone());

        let sheet = sheet_title(&team);
        match sheet_sync::sync_sheet(api, &spreadsheet_id, &sheet, &table).await {
            Ok(cells_written) => {
                info!(team = %team, sheet = %sheet, "added sheet for team");
                team_reports.push(TeamReport {
                    team,
                    sheet,
                    rows: table.len(),
                    cells_written,
                });
            }
            Err(e) => {
                error!(team = %team, error = %e, "sheet sync failed; skipping team");
            }
        }
    }

    let mut combined_report = None;
    if !all_games.is_empty() {
        info!("creating combined sheet with all games");
        let mut combined = Table::concat(all_games);
        combined.sort_by_column(DATE_COLUMN);
        let cells_written = sheet_sync::sync_sheet(api, &spreadsheet_id, ALL_SHEET, &combined)
            .await
            .map_err(CollectError::Combined)?;
        info!(rows = combined.len(), "added combined sheet");
        combined_report = Some(CombinedReport {
            rows: combined.len(),
            cells_written,
        });
    }

    Ok(SyncReport {
        spreadsheet_id,
        teams: team_reports,
        combined: combined_report,
    })
}

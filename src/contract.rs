//! Collaborator seams for the collection pipeline.
//!
//! Three traits cover everything remote: [`SheetsApi`] is the destination
//! spreadsheet backend, [`Fetcher`] pulls the raw export bytes for one team,
//! and [`Decoder`] turns those bytes into a typed [`Table`]. All three are
//! annotated for `mockall` so tests can drive the pipeline deterministically
//! without network access.
//!
//! "Not found" outcomes are modelled as the [`Probe`] value, not as errors:
//! only transport- and status-class failures travel through [`ApiError`],
//! which lets call sites decide fallback versus abort explicitly.

use async_trait::async_trait;
use mockall::automock;
use serde_json::Value;
use thiserror::Error;

use crate::table::Table;

/// Outcome of a cheap existence probe against the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    Found,
    NotFound,
}

/// A spreadsheet located by name search.
#[derive(Debug, Clone)]
pub struct SpreadsheetRef {
    pub id: String,
    pub name: String,
}

/// Failure of a destination API call. `NotFound` is deliberately absent:
/// probes report it through [`Probe`] instead.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("destination API returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("transport error talking to destination API: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Failure fetching a team's export.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("export endpoint returned status {status} for team id {team_id}")]
    Status { team_id: String, status: u16 },

    #[error("transport error fetching team games: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Failure decoding fetched bytes into a table.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to open workbook: {0}")]
    Workbook(#[from] calamine::XlsxError),

    #[error("workbook contains no worksheet")]
    NoWorksheet,

    #[error("worksheet has no header row")]
    NoHeader,
}

/// Destination spreadsheet backend.
///
/// Implemented by the real Google Sheets/Drive client and by test mocks.
/// Every operation is a blocking-from-the-caller's-perspective remote call;
/// the pipeline awaits them strictly sequentially.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait SheetsApi: Send + Sync {
    /// Cheap existence probe for a spreadsheet id.
    async fn probe_spreadsheet(&self, spreadsheet_id: &str) -> Result<Probe, ApiError>;

    /// Searches for non-trashed spreadsheets whose name equals `name`.
    async fn find_spreadsheets_by_name(&self, name: &str)
        -> Result<Vec<SpreadsheetRef>, ApiError>;

    /// Creates a new spreadsheet and returns its id.
    async fn create_spreadsheet(&self, title: &str) -> Result<String, ApiError>;

    /// Probes for a named sheet inside a spreadsheet.
    async fn probe_sheet(&self, spreadsheet_id: &str, sheet: &str) -> Result<Probe, ApiError>;

    /// Adds an empty sheet with the given title.
    async fn create_sheet(&self, spreadsheet_id: &str, sheet: &str) -> Result<(), ApiError>;

    /// Reads the current header row of a sheet, if any values exist there.
    async fn read_header_row(
        &self,
        spreadsheet_id: &str,
        sheet: &str,
    ) -> Result<Option<Vec<String>>, ApiError>;

    /// Clears a bounded rectangular region of a sheet, e.g. `A1:Z50000`.
    async fn clear_region(
        &self,
        spreadsheet_id: &str,
        sheet: &str,
        range: &str,
    ) -> Result<(), ApiError>;

    /// Writes `rows` left-aligned at `origin` with literal (non-formula)
    /// value semantics. Returns the number of cells written.
    async fn write_region(
        &self,
        spreadsheet_id: &str,
        sheet: &str,
        origin: &str,
        rows: Vec<Vec<Value>>,
    ) -> Result<u64, ApiError>;

    /// Grants write access to an address, without sending a notification.
    async fn grant_write_access(&self, spreadsheet_id: &str, email: &str) -> Result<(), ApiError>;
}

/// Fetches the raw schedule export for one team.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch_team_games(&self, team_id: &str) -> Result<Vec<u8>, FetchError>;
}

/// Decodes a fetched export into a typed table.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait Decoder: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<Table, DecodeError>;
}

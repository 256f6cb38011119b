//! Real [`SheetsApi`] implementation against the Google Sheets v4 and
//! Drive v3 REST endpoints.
//!
//! The client carries a bearer access token taken from the environment; how
//! that token is minted (service account, OAuth flow) is outside this
//! crate. HTTP 404 on a spreadsheet probe and 400/404 on a ranged sheet
//! probe classify as [`Probe::NotFound`]; every other non-success status is
//! an [`ApiError::Status`].

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::contract::{ApiError, Probe, SheetsApi, SpreadsheetRef};

const SHEETS_BASE: &str = "https://sheets.googleapis.com/v4";
const DRIVE_BASE: &str = "https://www.googleapis.com/drive/v3";
const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";

const TOKEN_ENV: &str = "GOOGLE_ACCESS_TOKEN";

#[derive(Debug, Error)]
#[error("{TOKEN_ENV} environment variable not set")]
pub struct MissingToken;

pub struct GoogleSheetsClient {
    http: reqwest::Client,
    token: String,
}

impl GoogleSheetsClient {
    pub fn new(token: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            token,
        }
    }

    pub fn new_from_env() -> Result<Self, MissingToken> {
        let token = std::env::var(TOKEN_ENV).map_err(|_| MissingToken)?;
        Ok(Self::new(token))
    }

    fn get(&self, url: String) -> reqwest::RequestBuilder {
        self.http.get(url).bearer_auth(&self.token)
    }

    fn post(&self, url: String) -> reqwest::RequestBuilder {
        self.http.post(url).bearer_auth(&self.token)
    }

    fn put(&self, url: String) -> reqwest::RequestBuilder {
        self.http.put(url).bearer_auth(&self.token)
    }
}

#[derive(Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Deserialize)]
struct DriveFile {
    id: String,
    name: String,
}

#[derive(Deserialize)]
struct CreatedSpreadsheet {
    #[serde(rename = "spreadsheetId")]
    spreadsheet_id: String,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Deserialize)]
struct UpdateResult {
    #[serde(rename = "updatedCells", default)]
    updated_cells: u64,
}

/// Turns a non-success response into `ApiError::Status` with the body as
/// the message.
async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

/// Probe variant of [`check`]: the listed statuses report `NotFound`
/// instead of failing.
async fn check_probe(
    response: reqwest::Response,
    not_found: &[u16],
) -> Result<Probe, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(Probe::Found);
    }
    if not_found.contains(&status.as_u16()) {
        return Ok(Probe::NotFound);
    }
    let message = response.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl SheetsApi for GoogleSheetsClient {
    async fn probe_spreadsheet(&self, spreadsheet_id: &str) -> Result<Probe, ApiError> {
        let response = self
            .get(format!("{SHEETS_BASE}/spreadsheets/{spreadsheet_id}"))
            .query(&[("fields", "spreadsheetId")])
            .send()
            .await?;
        check_probe(response, &[403, 404]).await
    }

    async fn find_spreadsheets_by_name(
        &self,
        name: &str,
    ) -> Result<Vec<SpreadsheetRef>, ApiError> {
        let query = format!(
            "name='{}' and mimeType='{SPREADSHEET_MIME}' and trashed=false",
            name.replace('\'', "\\'")
        );
        let response = self
            .get(format!("{DRIVE_BASE}/files"))
            .query(&[("q", query.as_str()), ("spaces", "drive")])
            .send()
            .await?;
        let list: FileList = check(response).await?.json().await?;
        Ok(list
            .files
            .into_iter()
            .map(|f| SpreadsheetRef {
                id: f.id,
                name: f.name,
            })
            .collect())
    }

    async fn create_spreadsheet(&self, title: &str) -> Result<String, ApiError> {
        let body = json!({ "properties": { "title": title } });
        let response = self
            .post(format!("{SHEETS_BASE}/spreadsheets"))
            .json(&body)
            .send()
            .await?;
        let created: CreatedSpreadsheet = check(response).await?.json().await?;
        Ok(created.spreadsheet_id)
    }

    async fn probe_sheet(&self, spreadsheet_id: &str, sheet: &str) -> Result<Probe, ApiError> {
        let response = self
            .get(format!("{SHEETS_BASE}/spreadsheets/{spreadsheet_id}"))
            .query(&[
                ("ranges", format!("{sheet}!A1")),
                ("fields", "spreadsheetId".to_string()),
            ])
            .send()
            .await?;
        // A ranged get against a missing sheet reports 400, not 404.
        check_probe(response, &[400, 404]).await
    }

    async fn create_sheet(&self, spreadsheet_id: &str, sheet: &str) -> Result<(), ApiError> {
        let body = json!({
            "requests": [{ "addSheet": { "properties": { "title": sheet } } }]
        });
        let response = self
            .post(format!(
                "{SHEETS_BASE}/spreadsheets/{spreadsheet_id}:batchUpdate"
            ))
            .json(&body)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    async fn read_header_row(
        &self,
        spreadsheet_id: &str,
        sheet: &str,
    ) -> Result<Option<Vec<String>>, ApiError> {
        let response = self
            .get(format!(
                "{SHEETS_BASE}/spreadsheets/{spreadsheet_id}/values/{sheet}!A1:Z1"
            ))
            .send()
            .await?;
        let range: ValueRange = check(response).await?.json().await?;
        let Some(first) = range.values.into_iter().next() else {
            return Ok(None);
        };
        let header = first
            .into_iter()
            .map(|v| match v {
                Value::String(s) => s,
                other => other.to_string(),
            })
            .collect();
        Ok(Some(header))
    }

    async fn clear_region(
        &self,
        spreadsheet_id: &str,
        sheet: &str,
        range: &str,
    ) -> Result<(), ApiError> {
        let response = self
            .post(format!(
                "{SHEETS_BASE}/spreadsheets/{spreadsheet_id}/values/{sheet}!{range}:clear"
            ))
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    async fn write_region(
        &self,
        spreadsheet_id: &str,
        sheet: &str,
        origin: &str,
        rows: Vec<Vec<Value>>,
    ) -> Result<u64, ApiError> {
        let body = json!({ "values": rows });
        let response = self
            .put(format!(
                "{SHEETS_BASE}/spreadsheets/{spreadsheet_id}/values/{sheet}!{origin}"
            ))
            .query(&[("valueInputOption", "RAW")])
            .json(&body)
            .send()
            .await?;
        let result: UpdateResult = check(response).await?.json().await?;
        Ok(result.updated_cells)
    }

    async fn grant_write_access(
        &self,
        spreadsheet_id: &str,
        email: &str,
    ) -> Result<(), ApiError> {
        let body = json!({
            "type": "user",
            "role": "writer",
            "emailAddress": email,
        });
        let response = self
            .post(format!("{DRIVE_BASE}/files/{spreadsheet_id}/permissions"))
            .query(&[("sendNotificationEmail", "false"), ("fields", "id")])
            .json(&body)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }
}

//! HTTP implementation of the [`Fetcher`] seam against the BasketPlan
//! export endpoint.

use async_trait::async_trait;
use tracing::info;

use crate::contract::{FetchError, Fetcher};

const EXPORT_URL: &str = "https://www.basketplan.ch/exportTeamGames.do";

pub struct HttpFetcher {
    http: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_team_games(&self, team_id: &str) -> Result<Vec<u8>, FetchError> {
        info!(team_id, url = EXPORT_URL, "downloading team games export");
        let response = self
            .http
            .get(EXPORT_URL)
            .query(&[("teamId", team_id)])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                team_id: team_id.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

//! Destination resolution: find-or-create the one canonical spreadsheet.
//!
//! Three tiers, each short-circuiting on success: probe the cached id, then
//! search by display name, then create. A stale cached id (spreadsheet
//! deleted, access revoked) must never cause a duplicate spreadsheet on the
//! next run, so every successful fallback persists the discovered id back
//! into settings before returning.

use thiserror::Error;
use tracing::{info, warn};

use crate::contract::{ApiError, Probe, SheetsApi};
use crate::settings::{Settings, SettingsError};

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("failed to create spreadsheet '{name}': {source}")]
    Create {
        name: String,
        #[source]
        source: ApiError,
    },

    #[error("failed to persist resolved spreadsheet id: {0}")]
    Persist(#[from] SettingsError),
}

/// Resolves the canonical spreadsheet id, creating the spreadsheet if it
/// cannot be found. Fails only if creation itself fails (or the resolved id
/// cannot be persisted).
pub async fn resolve<A: SheetsApi>(
    api: &A,
    settings: &mut Settings,
) -> Result<String, ResolveError> {
    let name = settings.google_sheets.spreadsheet_name.clone();

    // Tier 1: cached id. Success here is the fast path and writes nothing.
    if let Some(id) = settings.google_sheets.spreadsheet_id.clone() {
        match api.probe_spreadsheet(&id).await {
            Ok(Probe::Found) => {
                info!(spreadsheet_id = %id, "using spreadsheet id from settings");
                return Ok(id);
            }
            Ok(Probe::NotFound) => {
                warn!(spreadsheet_id = %id, "spreadsheet id from settings not found or not accessible");
            }
            Err(e) => {
                warn!(spreadsheet_id = %id, error = %e, "spreadsheet probe failed; treating as not found");
            }
        }
    }

    // Tier 2: search by name. First match wins; search failures fall through
    // to creation.
    match api.find_spreadsheets_by_name(&name).await {
        Ok(matches) => {
            if let Some(found) = matches.first() {
                let id = found.id.clone();
                info!(name = %name, spreadsheet_id = %id, "found existing spreadsheet by name");
                settings.google_sheets.spreadsheet_id = Some(id.clone());
                settings.google_sheets.spreadsheet_name = name;
                settings.save()?;
                return Ok(id);
            }
        }
        Err(e) => {
            warn!(name = %name, error = %e, "spreadsheet search failed; falling through to creation");
        }
    }

    // Tier 3: create. The only fatal tier.
    info!(name = %name, "creating new spreadsheet");
    let id = api
        .create_spreadsheet(&name)
        .await
        .map_err(|source| ResolveError::Create {
            name: name.clone(),
            source,
        })?;
    settings.google_sheets.spreadsheet_id = Some(id.clone());
    settings.google_sheets.spreadsheet_name = name;
    settings.save()?;
    info!(spreadsheet_id = %id, "created spreadsheet");
    Ok(id)
}

/// Grants write access to every configured address. Best-effort: a failed
/// grant is logged and the remaining addresses are still attempted.
pub async fn share_all<A: SheetsApi>(api: &A, settings: &Settings, spreadsheet_id: &str) {
    for email in &settings.google_sheets.write_privilege {
        match api.grant_write_access(spreadsheet_id, email).await {
            Ok(()) => info!(email = %email, "shared spreadsheet"),
            Err(e) => {
                warn!(email = %email, error = %e, "failed to share spreadsheet; continuing");
            }
        }
    }
}

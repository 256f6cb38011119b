use std::fs;
use std::path::PathBuf;

use basket_sheets::settings::{Settings, SettingsError};
use tempfile::tempdir;

fn write_settings(dir: &tempfile::TempDir, json: &str) -> PathBuf {
    let path = dir.path().join("settings.json");
    fs::write(&path, json).unwrap();
    path
}

#[test]
fn load_applies_destination_defaults() {
    let dir = tempdir().unwrap();
    let path = write_settings(&dir, r#"{ "teams": { "Men1": { "id": "100" } } }"#);

    let settings = Settings::load(&path).unwrap();
    assert_eq!(settings.teams.len(), 1);
    assert_eq!(settings.google_sheets.spreadsheet_id, None);
    assert_eq!(settings.google_sheets.spreadsheet_name, "BasketPlan Games");
    assert!(settings.google_sheets.write_privilege.is_empty());
}

#[test]
fn load_rejects_malformed_json() {
    let dir = tempdir().unwrap();
    let path = write_settings(&dir, "{ not json");
    assert!(matches!(
        Settings::load(&path),
        Err(SettingsError::Parse { .. })
    ));
}

#[test]
fn save_preserves_team_order_and_uses_two_space_indent() {
    let dir = tempdir().unwrap();
    let path = write_settings(
        &dir,
        r#"{ "teams": { "Zebra": { "id": "1" }, "Alpha": { "id": "2" } } }"#,
    );

    let mut settings = Settings::load(&path).unwrap();
    settings.google_sheets.spreadsheet_id = Some("sheet-1".to_string());
    settings.save().unwrap();

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("  \"teams\""), "expected 2-space indent");
    assert!(written.find("Zebra").unwrap() < written.find("Alpha").unwrap());

    let reloaded = Settings::load(&path).unwrap();
    let names: Vec<_> = reloaded.teams.keys().cloned().collect();
    assert_eq!(names, vec!["Zebra", "Alpha"]);
    assert_eq!(
        reloaded.google_sheets.spreadsheet_id.as_deref(),
        Some("sheet-1")
    );
}

#[test]
fn validate_rejects_empty_team_list() {
    let dir = tempdir().unwrap();
    let path = write_settings(&dir, r#"{ "teams": {} }"#);
    let settings = Settings::load(&path).unwrap();
    assert!(matches!(settings.validate(), Err(SettingsError::NoTeams)));
}

#[test]
fn validate_rejects_sheet_title_collisions_after_truncation() {
    let dir = tempdir().unwrap();
    // Both names share the same first 24 characters.
    let path = write_settings(
        &dir,
        r#"{ "teams": {
            "Regionalauswahl U16 Herren A": { "id": "1" },
            "Regionalauswahl U16 Herren B": { "id": "2" }
        } }"#,
    );
    let settings = Settings::load(&path).unwrap();
    assert!(matches!(
        settings.validate(),
        Err(SettingsError::SheetTitleCollision { .. })
    ));
}

#[test]
fn validate_rejects_team_named_like_combined_sheet() {
    let dir = tempdir().unwrap();
    let path = write_settings(&dir, r#"{ "teams": { "All": { "id": "1" } } }"#);
    let settings = Settings::load(&path).unwrap();
    assert!(matches!(
        settings.validate(),
        Err(SettingsError::ReservedSheetTitle { .. })
    ));
}

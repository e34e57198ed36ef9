/*!
 * Tests for configuration loading and validation
 */

use anyhow::Result;
use linguatec_lexicon::app_config::{Config, LogLevel};
use crate::common;

/// A missing config file is created with the defaults
#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let config = Config::load_or_create(&path)?;

    assert!(path.exists());
    assert_eq!(config.api.default_limit, 30);
    let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    assert_eq!(written["server"]["port"], 8000);
    Ok(())
}

/// Partial files keep the defaults for omitted sections
#[test]
fn test_loadOrCreate_withPartialFile_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{"api": {"max_limit": 50}, "log_level": "debug"}"#,
    )?;

    let config = Config::load_or_create(&path)?;

    assert_eq!(config.api.max_limit, 50);
    assert_eq!(config.api.default_limit, 30);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.import.office_command, "libreoffice");
    Ok(())
}

/// Invalid JSON is reported, not replaced
#[test]
fn test_loadOrCreate_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;

    assert!(Config::load_or_create(&path).is_err());
    assert_eq!(std::fs::read_to_string(&path)?, "{ not json");
    Ok(())
}

#[test]
fn test_validate_withDefaultAboveMax_shouldFail() {
    let mut config = Config::default();
    config.api.default_limit = 200;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withBadDefaultLexicon_shouldFail() {
    let mut config = Config::default();
    config.import.default_lexicon = "spanish".to_string();
    assert!(config.validate().is_err());
}

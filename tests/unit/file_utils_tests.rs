/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use linguatec_lexicon::file_utils::{FileManager, FileType};
use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_fileExists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "data.csv", "term")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::file_exists(temp_dir.path()));
    Ok(())
}

#[test]
fn test_dirExists_withNonExistentDir_shouldReturnFalse() {
    assert!(!FileManager::dir_exists("./non_existent_directory_12345"));
}

/// ensure_dir creates nested directories and tolerates existing ones
#[test]
fn test_ensureDir_withNestedPath_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("exports").join("2024");

    FileManager::ensure_dir(&nested)?;
    FileManager::ensure_dir(&nested)?;

    assert!(FileManager::dir_exists(&nested));
    Ok(())
}

#[test]
fn test_detectFileType_withOdsAndCsv_shouldClassify() {
    assert_eq!(FileManager::detect_file_type("lexico.ods"), FileType::Spreadsheet);
    assert_eq!(FileManager::detect_file_type("lexico.xls"), FileType::Spreadsheet);
    assert_eq!(FileManager::detect_file_type("lexico.CSV"), FileType::Csv);
    assert_eq!(FileManager::detect_file_type("lexico.pdf"), FileType::Unknown);
}

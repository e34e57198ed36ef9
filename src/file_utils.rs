use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

// @module: File and directory utilities

/// Spreadsheet extensions readable by the importers
pub const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @generates: Sibling .ods path of a spreadsheet
    pub fn ods_path_for<P: AsRef<Path>>(input_file: P) -> PathBuf {
        input_file.as_ref().with_extension("ods")
    }

    // @generates: terms-<code>-<date>.csv in the output directory
    pub fn terms_export_path<P: AsRef<Path>>(output_dir: P, lexicon_code: &str, date: NaiveDate) -> PathBuf {
        output_dir
            .as_ref()
            .join(format!("terms-{}-{}.csv", lexicon_code, date.format("%Y-%m-%d")))
    }

    /// Detect the input type from the file extension
    pub fn detect_file_type<P: AsRef<Path>>(path: P) -> FileType {
        let ext = path
            .as_ref()
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if SPREADSHEET_EXTENSIONS.contains(&ext.as_str()) {
            FileType::Spreadsheet
        } else if ext == "csv" {
            FileType::Csv
        } else {
            FileType::Unknown
        }
    }
}

/// Enum representing different input file types
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FileType {
    /// Workbook readable by calamine
    Spreadsheet,
    /// Comma or semicolon separated values
    Csv,
    /// Unknown file type
    Unknown,
}

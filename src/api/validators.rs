/*!
 * Upload validators.
 *
 * Editors post a spreadsheet before handing it over for import; it is run
 * through the importer in dry-run mode and the row errors are returned.
 * Nothing is ever persisted.
 */

use actix_web::{get, post, web, HttpResponse};
use anyhow::Context;
use log::info;
use serde::{Deserialize, Serialize};
use std::io::Write;

use super::error::{ApiError, ApiResult};
use super::ApiState;
use crate::errors::{ImportError, LexiconError};
use crate::file_utils::SPREADSHEET_EXTENSIONS;
use crate::import::{
    DataImportOptions, DataImporter, ErrorLine, ImportReport, VariationImportOptions,
    VariationImporter, Workbook,
};
use crate::lexicon_code::LexiconCode;

pub const DATA_VALIDATOR_TITLE: &str = "Data validator";
pub const VARIATION_VALIDATOR_TITLE: &str = "Diatopic variation validator";

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0];
const ODS_MIMETYPE: &[u8] = b"application/vnd.oasis.opendocument.spreadsheet";

#[derive(Debug, Deserialize)]
pub struct ValidatorParams {
    pub lexicon: Option<String>,
    pub variation: Option<String>,
    /// Original file name, used to pick the reader
    pub filename: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidatorInfo {
    pub title: String,
    pub extensions: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidationResult {
    pub title: String,
    pub valid: bool,
    pub errors: Vec<ErrorLine>,
}

fn info_response(title: &str) -> HttpResponse {
    let mut extensions: Vec<String> = SPREADSHEET_EXTENSIONS.iter().map(|e| e.to_string()).collect();
    extensions.push("csv".to_string());
    HttpResponse::Ok().json(ValidatorInfo {
        title: title.to_string(),
        extensions,
    })
}

/// File extension for an upload, from its name or its magic bytes
pub fn upload_extension(filename: Option<&str>, content: &[u8]) -> String {
    let named = filename
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_lowercase())
        .filter(|ext| ext == "csv" || SPREADSHEET_EXTENSIONS.contains(&ext.as_str()));
    if let Some(ext) = named {
        return ext;
    }

    if content.starts_with(ZIP_MAGIC) {
        let is_ods = content
            .windows(ODS_MIMETYPE.len())
            .take(128)
            .any(|w| w == ODS_MIMETYPE);
        let ext = if is_ods { "ods" } else { "xlsx" };
        ext.to_string()
    } else if content.starts_with(OLE_MAGIC) {
        "xls".to_string()
    } else {
        "csv".to_string()
    }
}

fn lexicon_code(params: &ValidatorParams, state: &ApiState) -> ApiResult<LexiconCode> {
    let code = params
        .lexicon
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(&state.config.import.default_lexicon);
    code.parse()
        .map_err(|e: LexiconError| ApiError::BadRequest(e.to_string()))
}

/// Store the upload in a temp file and open it as a workbook
fn open_upload(filename: Option<&str>, body: &[u8]) -> ApiResult<Workbook> {
    let suffix = format!(".{}", upload_extension(filename, body));
    let mut file = tempfile::Builder::new()
        .prefix("upload-")
        .suffix(&suffix)
        .tempfile()
        .context("Failed to create temporary upload file")?;
    file.write_all(body).context("Failed to store upload")?;
    file.flush().context("Failed to store upload")?;

    Workbook::open(file.path()).map_err(|e| ApiError::BadRequest(e.to_string()))
}

/// Map importer failures that are the client's fault to 400
fn import_failure(error: anyhow::Error) -> ApiError {
    match error.downcast_ref::<LexiconError>() {
        Some(e) => ApiError::BadRequest(e.to_string()),
        None => match error.downcast_ref::<ImportError>() {
            Some(e) => ApiError::BadRequest(e.to_string()),
            None => ApiError::Internal(error),
        },
    }
}

/// Parse the upload and run the importer off the async workers
async fn run_validation<F>(filename: Option<String>, body: web::Bytes, run: F) -> ApiResult<ImportReport>
where
    F: FnOnce(&Workbook) -> anyhow::Result<ImportReport> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let workbook = open_upload(filename.as_deref(), &body)?;
        run(&workbook).map_err(import_failure)
    })
    .await
    .context("Validation task panicked")?
}

fn result_response(title: &str, report: &ImportReport) -> HttpResponse {
    HttpResponse::Ok().json(ValidationResult {
        title: title.to_string(),
        valid: report.is_valid(),
        errors: report.error_lines(),
    })
}

#[get("/datavalidator/")]
pub async fn data_validator_info() -> HttpResponse {
    info_response(DATA_VALIDATOR_TITLE)
}

#[post("/datavalidator/")]
pub async fn validate_data(
    state: web::Data<ApiState>,
    params: web::Query<ValidatorParams>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let options = DataImportOptions {
        lexicon_code: lexicon_code(&params, &state)?,
        dry_run: true,
        allow_partial: false,
    };
    let db = state.repository.db().clone();
    let config = state.config.import.clone();
    let report = run_validation(params.filename.clone(), body, move |workbook| {
        DataImporter::new(&config).run(&db, workbook, &options)
    })
    .await?;

    info!("Validated upload: {} error(s)", report.errors.len());
    Ok(result_response(DATA_VALIDATOR_TITLE, &report))
}

#[get("/diatopic-variation-validator/")]
pub async fn variation_validator_info() -> HttpResponse {
    info_response(VARIATION_VALIDATOR_TITLE)
}

#[post("/diatopic-variation-validator/")]
pub async fn validate_variation(
    state: web::Data<ApiState>,
    params: web::Query<ValidatorParams>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let options = VariationImportOptions {
        lexicon_code: lexicon_code(&params, &state)?,
        variation: params
            .variation
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string),
        dry_run: true,
    };
    let db = state.repository.db().clone();
    let config = state.config.import.clone();
    let report = run_validation(params.filename.clone(), body, move |workbook| {
        VariationImporter::new(&config).run(&db, workbook, &options)
    })
    .await?;

    info!("Validated variation upload: {} error(s)", report.errors.len());
    Ok(result_response(VARIATION_VALIDATOR_TITLE, &report))
}

/*!
 * Tests for error types and conversions
 */

use linguatec_lexicon::errors::{AppError, ExportError, ImportError, LexiconError};

#[test]
fn test_importError_rejected_shouldSayNothingWasImported() {
    let err = ImportError::Rejected(3);
    assert_eq!(
        err.to_string(),
        "Import rejected: 3 validation error(s), no data was imported"
    );
}

#[test]
fn test_exportError_fileExists_shouldNameTheFile() {
    let err = ExportError::FileExists("out.csv".to_string());
    assert_eq!(err.to_string(), "A csv with that name already exists: out.csv");
}

#[test]
fn test_appError_fromImportError_shouldWrap() {
    let err: AppError = ImportError::from(LexiconError::LexiconNotFound("es-fr".to_string())).into();
    assert_eq!(
        err.to_string(),
        "Import error: There is not a lexicon with that code: es-fr"
    );
}

#[test]
fn test_appError_fromIoError_shouldBeFileError() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    assert!(matches!(AppError::from(io), AppError::File(_)));
}

#[test]
fn test_anyhow_downcast_shouldRecoverDomainError() {
    let err: anyhow::Error = LexiconError::VariationNotFound("ansotano".to_string()).into();
    assert!(matches!(
        err.downcast_ref::<LexiconError>(),
        Some(LexiconError::VariationNotFound(_))
    ));
}

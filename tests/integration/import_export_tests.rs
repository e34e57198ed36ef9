/*!
 * Integration tests: spreadsheet import followed by CSV export
 */

use anyhow::Result;
use linguatec_lexicon::import::{DataImportOptions, VariationImportOptions};
use linguatec_lexicon::LexiconCode;
use crate::common;

fn es_ar() -> LexiconCode {
    LexiconCode::new("es", "ar")
}

/// export-data writes back exactly the layout import-data read
#[test]
fn test_exportData_afterImport_shouldMatchInputByteForByte() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = common::seeded_controller(temp_dir.path())?;
    let input = common::create_test_file(temp_dir.path(), "data.csv", common::DATA_CSV)?;
    let options = DataImportOptions {
        lexicon_code: es_ar(),
        dry_run: false,
        allow_partial: false,
    };
    controller.import_data(&input, &options)?;

    let output = temp_dir.path().join("export.csv");
    let lines = controller.export_data(&es_ar(), &output)?;

    assert_eq!(lines, 4);
    assert_eq!(std::fs::read_to_string(&output)?, common::DATA_CSV);
    Ok(())
}

/// An exported lexicon imports cleanly into another lexicon
#[test]
fn test_importData_ofExport_shouldRecreateLexicon() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = common::seeded_controller(temp_dir.path())?;
    controller.create_lexicon("es-an", &LexiconCode::new("es", "an"), "")?;
    let input = common::create_test_file(temp_dir.path(), "data.csv", common::DATA_CSV)?;
    controller.import_data(
        &input,
        &DataImportOptions {
            lexicon_code: es_ar(),
            dry_run: false,
            allow_partial: false,
        },
    )?;

    let output = temp_dir.path().join("export.csv");
    controller.export_data(&es_ar(), &output)?;
    let report = controller.import_data(
        &output,
        &DataImportOptions {
            lexicon_code: LexiconCode::new("es", "an"),
            dry_run: false,
            allow_partial: false,
        },
    )?;

    assert!(report.committed, "{:?}", report.error_lines());
    assert_eq!(report.entries, 4);
    assert_eq!(report.conjugations, 1);
    Ok(())
}

#[test]
fn test_exportVariation_afterImport_shouldListVariationEntries() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = common::seeded_controller(temp_dir.path())?;
    let data = common::create_test_file(temp_dir.path(), "data.csv", common::DATA_CSV)?;
    controller.import_data(
        &data,
        &DataImportOptions {
            lexicon_code: es_ar(),
            dry_run: false,
            allow_partial: false,
        },
    )?;
    controller.create_region("Chistau")?;
    controller.create_variation("chistabino", "chis.", "Chistau")?;
    let input = common::create_test_file(
        temp_dir.path(),
        "chis.csv",
        "term;gramcats;translation\nbien;adv. m.;bien\ncantar;;cantare\n",
    )?;
    controller.import_variation(
        &input,
        &VariationImportOptions {
            lexicon_code: es_ar(),
            variation: Some("chistabino".to_string()),
            dry_run: false,
        },
    )?;

    let output = temp_dir.path().join("chis-export.csv");
    controller.export_variation(&es_ar(), "chistabino", &output)?;

    assert_eq!(
        std::fs::read_to_string(&output)?,
        "term;gramcats;translation\nbien;adv. m.;bien\ncantar;v. tr., v. intr.;cantare\n"
    );
    Ok(())
}

#[test]
fn test_exportTerms_shouldWriteDatedFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = common::seeded_controller(temp_dir.path())?;
    let data = common::create_test_file(temp_dir.path(), "data.csv", common::DATA_CSV)?;
    controller.import_data(
        &data,
        &DataImportOptions {
            lexicon_code: es_ar(),
            dry_run: false,
            allow_partial: false,
        },
    )?;

    let path = controller.export_terms(&es_ar(), temp_dir.path())?;
    let file_name = path.file_name().unwrap().to_string_lossy().to_string();

    assert!(file_name.starts_with("terms-es-ar-"));
    assert_eq!(
        std::fs::read_to_string(&path)?,
        "id,slug,term\n1,abad,abad\n2,bien,bien\n3,cantar,cantar\n"
    );

    // same day, same name
    assert!(controller.export_terms(&es_ar(), temp_dir.path()).is_err());
    Ok(())
}

#[test]
fn test_exportVariation_withUnknownLexicon_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = common::seeded_controller(temp_dir.path())?;

    let err = controller
        .export_variation(&LexiconCode::new("es", "fr"), "chistabino", &temp_dir.path().join("x.csv"))
        .unwrap_err();

    assert_eq!(err.to_string(), "There is not a lexicon with that code: es-fr");
    assert!(!temp_dir.path().join("x.csv").exists());
    Ok(())
}

/// Words imported through the CLI path are visible to the API repository
#[test]
fn test_repositorySearch_afterImport_shouldFindWord() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = common::seeded_controller(temp_dir.path())?;
    let data = common::create_test_file(temp_dir.path(), "data.csv", common::DATA_CSV)?;
    controller.import_data(
        &data,
        &DataImportOptions {
            lexicon_code: es_ar(),
            dry_run: false,
            allow_partial: false,
        },
    )?;
    let repository = common::repository_for(&controller);

    let page = tokio_test::block_on(async { repository.search("CANTAR", Some(es_ar()), 30, 0).await })?;

    assert_eq!(page.count, 1);
    assert_eq!(page.items[0].entries.len(), 1);
    Ok(())
}

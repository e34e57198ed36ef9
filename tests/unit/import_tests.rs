/*!
 * Tests for the importers driven through the controller
 */

use anyhow::Result;
use linguatec_lexicon::import::{DataImportOptions, MonoImportOptions, VariationImportOptions};
use linguatec_lexicon::LexiconCode;
use crate::common;

fn data_options(dry_run: bool) -> DataImportOptions {
    DataImportOptions {
        lexicon_code: LexiconCode::new("es", "ar"),
        dry_run,
        allow_partial: false,
    }
}

/// A valid sheet produces the expected counts
#[test]
fn test_importData_withValidCsv_shouldPersistEverything() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = common::seeded_controller(temp_dir.path())?;
    let input = common::create_test_file(temp_dir.path(), "data.csv", common::DATA_CSV)?;

    let report = controller.import_data(&input, &data_options(false))?;

    assert!(report.committed, "{:?}", report.error_lines());
    assert_eq!(report.words, 3);
    assert_eq!(report.entries, 4);
    assert_eq!(report.examples, 3);
    assert_eq!(report.conjugations, 1);

    let stats = controller.stats()?;
    assert_eq!(stats.word_count, 3);
    assert_eq!(stats.entry_count, 4);
    Ok(())
}

/// Dry runs validate but persist nothing
#[test]
fn test_importData_withDryRun_shouldPersistNothing() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = common::seeded_controller(temp_dir.path())?;
    let input = common::create_test_file(temp_dir.path(), "data.csv", common::DATA_CSV)?;

    let report = controller.import_data(&input, &data_options(true))?;

    assert!(report.is_valid());
    assert!(!report.committed);
    assert_eq!(report.words, 3);
    assert_eq!(controller.stats()?.word_count, 0);
    Ok(())
}

/// Importing the same file twice fails on every term
#[test]
fn test_importData_twice_shouldReportExistingTerms() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = common::seeded_controller(temp_dir.path())?;
    let input = common::create_test_file(temp_dir.path(), "data.csv", common::DATA_CSV)?;

    controller.import_data(&input, &data_options(false))?;
    let report = controller.import_data(&input, &data_options(false))?;

    assert!(!report.committed);
    assert_eq!(report.errors.len(), 4);
    assert!(report
        .error_lines()
        .iter()
        .all(|line| line.message == "Term already exists in lexicon"));
    assert_eq!(controller.stats()?.entry_count, 4);
    Ok(())
}

/// Row errors carry row number, term and column
#[test]
fn test_importData_withInvalidRows_shouldReportEachColumn() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = common::seeded_controller(temp_dir.path())?;
    let input = common::create_test_file(
        temp_dir.path(),
        "bad.csv",
        "term;gramcats;translation;examples;conjugation
abeja;;abella;;
abrir;v. tr., xx.;ubrir;;
;s. f.;;;
",
    )?;

    let report = controller.import_data(&input, &data_options(false))?;
    let lines = report.error_lines();

    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0].word, "#2: abeja");
    assert_eq!(lines[0].column, "gramcats");
    assert_eq!(lines[0].message, "Gramatical category is empty");
    assert_eq!(lines[1].message, "'xx.' is an invalid gramatical category");
    assert_eq!(lines[2].word, "#4: ");
    assert_eq!(lines[2].message, "Term is required");
    assert_eq!(lines[3].message, "Translation is required");
    assert_eq!(controller.stats()?.word_count, 0);
    Ok(())
}

/// Incomplete conjugations are accepted only with allow_partial
#[test]
fn test_importData_withPartialConjugation_shouldNeedAllowPartial() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = common::seeded_controller(temp_dir.path())?;
    let input = common::create_test_file(
        temp_dir.path(),
        "verbs.csv",
        "term;gramcats;translation;examples;conjugation
abrir;v. tr.;ubrir;;\"infinitivo: ubrir; gerundio: ubrindo\"
",
    )?;

    let report = controller.import_data(&input, &data_options(true))?;
    assert_eq!(
        report.error_lines()[0].message,
        "Verbal conjugation is incomplete (missing: participio, indicativo, subjuntivo, imperativo)"
    );

    let mut options = data_options(false);
    options.allow_partial = true;
    let report = controller.import_data(&input, &options)?;
    assert!(report.committed);
    Ok(())
}

#[test]
fn test_importData_withUnsupportedFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = common::seeded_controller(temp_dir.path())?;
    let input = common::create_test_file(temp_dir.path(), "data.txt", "term")?;

    let err = controller.import_data(&input, &data_options(false)).unwrap_err();
    assert!(err.to_string().starts_with("Unsupported input file type"));
    Ok(())
}

#[test]
fn test_importMono_withCsv_shouldStoreEtimolAndDefinitions() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = common::seeded_controller(temp_dir.path())?;
    controller.create_lexicon("ar-ar", &LexiconCode::new("ar", "ar"), "Aragonés")?;
    let input = common::create_test_file(
        temp_dir.path(),
        "mono.csv",
        "term;url;etimol;;definition;;definition2
abadía;;Del lat. abbatia;;Monesterio;;Ilesia abacial
abano;;;;Ventalle;;
",
    )?;
    let options = MonoImportOptions {
        lexicon_code: LexiconCode::new("ar", "ar"),
        truncate: false,
        dry_run: false,
    };

    let report = controller.import_mono(&input, &options, false)?;

    assert!(report.committed, "{:?}", report.error_lines());
    assert_eq!(report.words, 2);
    assert_eq!(report.entries, 3);
    Ok(())
}

#[test]
fn test_importGramcat_withPurge_shouldReplaceCategories() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = common::seeded_controller(temp_dir.path())?;
    let input = common::create_test_file(temp_dir.path(), "few.csv", "interj.,interjección\n")?;

    let report = controller.import_gramcat(&input, true)?;

    assert_eq!(report.gramcats, 1);
    assert_eq!(controller.stats()?.gramcat_count, 1);
    Ok(())
}

/// Variation rows need the common entries imported first
#[test]
fn test_importVariation_afterData_shouldAddRegionalEntries() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = common::seeded_controller(temp_dir.path())?;
    let data = common::create_test_file(temp_dir.path(), "data.csv", common::DATA_CSV)?;
    controller.import_data(&data, &data_options(false))?;

    controller.create_region("Ribagorza")?;
    controller.create_variation("benasqués", "ben.", "Ribagorza")?;
    let input = common::create_test_file(
        temp_dir.path(),
        "ben.csv",
        "term;gramcats;translation
abad;;abat
cantar;v. tr.;cantá
",
    )?;
    let options = VariationImportOptions {
        lexicon_code: LexiconCode::new("es", "ar"),
        variation: Some("benasqués".to_string()),
        dry_run: false,
    };

    let report = controller.import_variation(&input, &options)?;

    assert!(report.committed, "{:?}", report.error_lines());
    assert_eq!(report.entries, 2);
    assert_eq!(controller.stats()?.entry_count, 6);
    Ok(())
}

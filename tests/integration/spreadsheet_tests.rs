/*!
 * Integration tests reading real xlsx and ods files from tests/fixtures
 */

use anyhow::Result;
use std::path::{Path, PathBuf};

use linguatec_lexicon::import::ods::{read_content_xml, RichTable};
use linguatec_lexicon::import::{DataImportOptions, MonoImportOptions};
use linguatec_lexicon::{LexiconCode, Workbook};
use crate::common;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

/// Copy a fixture into a scratch dir so side files never land in the source tree
fn scratch_fixture(dir: &Path, name: &str) -> Result<PathBuf> {
    let target = dir.join(name);
    std::fs::copy(fixture(name), &target)?;
    Ok(target)
}

fn es_ar() -> LexiconCode {
    LexiconCode::new("es", "ar")
}

#[test]
fn test_workbookOpen_withXlsx_shouldReadEverySheet() -> Result<()> {
    let workbook = Workbook::open(fixture("sample-input.xlsx"))?;

    let names: Vec<&str> = workbook.sheets.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
    assert_eq!(workbook.data_row_count(), 4);

    let b = &workbook.sheets[1];
    assert_eq!(b.rows[0].cell(0), Some("term"));
    assert_eq!(b.rows[2].number, 3);
    assert_eq!(b.rows[2].cell(3), Some("Fer o bien // Un bien común"));
    // trailing empty cells of the sheet range read as None
    assert_eq!(b.rows[1].cell(3), None);
    Ok(())
}

/// Ranges not starting at A1 keep spreadsheet row numbers and columns
#[test]
fn test_workbookOpen_withOffsetRange_shouldKeepPositions() -> Result<()> {
    let workbook = Workbook::open(fixture("layout.xlsx"))?;
    let sheet = &workbook.sheets[0];

    assert_eq!(sheet.name, "numeros");
    assert_eq!(sheet.rows[0].number, 2);
    assert_eq!(sheet.rows[0].cell(0), None);
    assert_eq!(sheet.rows[0].cell(1), Some("tres"));
    assert_eq!(sheet.rows[0].cell(2), Some("3"));
    assert_eq!(sheet.rows[0].cell(3), Some("2.5"));

    let cuatro = sheet.rows.iter().find(|r| r.number == 4).unwrap();
    assert_eq!(cuatro.cell(1), Some("cuatro"));
    assert_eq!(cuatro.cell(2), Some("4"));
    Ok(())
}

/// An xlsx import exports to the same layout as the equivalent CSV
#[test]
fn test_importData_withXlsx_shouldImportEverySheet() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = common::seeded_controller(temp_dir.path())?;

    let report = controller.import_data(
        &fixture("sample-input.xlsx"),
        &DataImportOptions {
            lexicon_code: es_ar(),
            dry_run: false,
            allow_partial: false,
        },
    )?;

    assert!(report.committed);
    assert_eq!(report.words, 3);
    assert_eq!(report.entries, 4);
    assert_eq!(report.examples, 3);
    assert_eq!(report.conjugations, 1);

    let output = temp_dir.path().join("export.csv");
    controller.export_data(&es_ar(), &output)?;
    assert_eq!(std::fs::read_to_string(&output)?, common::DATA_CSV);
    Ok(())
}

#[test]
fn test_readContentXml_withOds_shouldReturnDocument() -> Result<()> {
    let content = read_content_xml(&fixture("sample-mono.ods"))?;
    assert!(content.contains("<office:document-content"));
    assert!(content.contains("abbatia"));
    Ok(())
}

#[test]
fn test_readContentXml_withXlsx_shouldFail() {
    assert!(read_content_xml(&fixture("sample-input.xlsx")).is_err());
}

/// An .ods input is its own conversion target, so no office suite runs
#[test]
fn test_richTableLoad_withOds_shouldRenderItalics() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = scratch_fixture(temp_dir.path(), "sample-mono.ods")?;

    let table = RichTable::load("/nonexistent/office", &input)?;
    assert_eq!(table.cell(1, 0), Some("term"));
    assert_eq!(table.cell(2, 2), Some("Del lat. <i>abbatia</i>"));
    assert_eq!(table.cell(3, 2), Some("Der. de abanar"));
    Ok(())
}

#[test]
fn test_importMono_withRichEtimol_shouldStoreItalicMarkup() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = common::seeded_controller(temp_dir.path())?;
    let input = scratch_fixture(temp_dir.path(), "sample-mono.ods")?;

    let report = controller.import_mono(
        &input,
        &MonoImportOptions {
            lexicon_code: es_ar(),
            truncate: false,
            dry_run: false,
        },
        true,
    )?;
    assert_eq!(report.words, 2);
    assert_eq!(report.entries, 3);

    let repository = common::repository_for(&controller);
    let page = tokio_test::block_on(repository.search("abadía", Some(es_ar()), 30, 0))?;
    assert_eq!(page.count, 1);

    let word = &page.items[0];
    assert_eq!(word.etimol, "Del lat. <i>abbatia</i>");
    let definitions: Vec<&str> = word.entries.iter().map(|e| e.translation.as_str()).collect();
    assert_eq!(definitions, vec!["Monesterio", "Ilesia abacial"]);
    Ok(())
}

#[test]
fn test_importMono_withoutRichEtimol_shouldStorePlainText() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = common::seeded_controller(temp_dir.path())?;

    controller.import_mono(
        &fixture("sample-mono.ods"),
        &MonoImportOptions {
            lexicon_code: es_ar(),
            truncate: false,
            dry_run: false,
        },
        false,
    )?;

    let repository = common::repository_for(&controller);
    let page = tokio_test::block_on(repository.search("abadía", Some(es_ar()), 30, 0))?;
    assert_eq!(page.items[0].etimol, "Del lat. abbatia");
    Ok(())
}

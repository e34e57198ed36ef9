/*!
 * Integration tests for the upload validators
 */

use actix_web::{test, web, App};
use serde_json::Value;

use linguatec_lexicon::api::{self, ApiState};
use linguatec_lexicon::Config;
use crate::common;

fn state() -> web::Data<ApiState> {
    let temp_dir = common::create_temp_dir().unwrap();
    let controller = common::seeded_controller(temp_dir.path()).unwrap();
    web::Data::new(ApiState {
        repository: common::repository_for(&controller),
        config: Config::default(),
    })
}

#[actix_web::test]
async fn test_dataValidator_get_shouldDescribeUpload() {
    let app = test::init_service(App::new().app_data(state()).configure(api::configure)).await;

    let req = test::TestRequest::get().uri("/datavalidator/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["title"], "Data validator");
    let extensions: Vec<&str> = body["extensions"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert!(extensions.contains(&"xlsx"));
    assert!(extensions.contains(&"csv"));
}

#[actix_web::test]
async fn test_dataValidator_withValidUpload_shouldReportNoErrors() {
    let state = state();
    let app = test::init_service(App::new().app_data(state.clone()).configure(api::configure)).await;

    let req = test::TestRequest::post()
        .uri("/datavalidator/?lexicon=es-ar")
        .set_payload(common::DATA_CSV)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["valid"], true);
    assert_eq!(body["errors"].as_array().unwrap().len(), 0);
    // validation never writes
    assert_eq!(state.repository.db().stats().unwrap().word_count, 0);
}

#[actix_web::test]
async fn test_dataValidator_withDuplicatedRows_shouldListErrors() {
    let app = test::init_service(App::new().app_data(state()).configure(api::configure)).await;

    let req = test::TestRequest::post()
        .uri("/datavalidator/?filename=upload.csv")
        .set_payload("term;gramcats;translation\nabad;s. m.;abad\nabad;s. m.;abad\n")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["title"], "Data validator");
    assert_eq!(body["valid"], false);
    assert_eq!(body["errors"][0]["word"], "#3: abad");
    assert_eq!(
        body["errors"][0]["message"],
        "Duplicated term, gramatical category and translation"
    );
}

#[actix_web::test]
async fn test_dataValidator_withUnknownLexicon_shouldBeBadRequest() {
    let app = test::init_service(App::new().app_data(state()).configure(api::configure)).await;

    let req = test::TestRequest::post()
        .uri("/datavalidator/?lexicon=es-fr")
        .set_payload(common::DATA_CSV)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "There is not a lexicon with that code: es-fr");
}

/// Without a variation the rows are still checked against the lexicon
#[actix_web::test]
async fn test_variationValidator_withoutVariation_shouldValidateRows() {
    let app = test::init_service(App::new().app_data(state()).configure(api::configure)).await;

    let req = test::TestRequest::post()
        .uri("/diatopic-variation-validator/?lexicon=es-ar")
        .set_payload("term;gramcats;translation\nabad;;abat\n")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["title"], "Diatopic variation validator");
    assert_eq!(body["errors"][0]["column"], "term");
    assert_eq!(body["errors"][0]["message"], "Word not found in lexicon");
}

/// A blank line inside a CSV upload is a gap, and later rows keep their numbers
#[actix_web::test]
async fn test_variationValidator_withBlankCsvLine_shouldReportEmptyRow() {
    let app = test::init_service(App::new().app_data(state()).configure(api::configure)).await;

    let req = test::TestRequest::post()
        .uri("/diatopic-variation-validator/?lexicon=es-ar&filename=ben.csv")
        .set_payload("term;gramcats;translation\nbien;;bien\n\nnoexiste;;x\n")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 3);
    assert_eq!(errors[1]["word"], "#3: ");
    assert_eq!(errors[1]["message"], "Row is empty");
    assert_eq!(errors[2]["word"], "#4: noexiste");
    assert_eq!(errors[2]["message"], "Word not found in lexicon");
}

/// A zip upload without a filename is sniffed as xlsx and parsed off the async workers
#[actix_web::test]
async fn test_dataValidator_withXlsxUpload_shouldReportNoErrors() {
    let app = test::init_service(App::new().app_data(state()).configure(api::configure)).await;
    let payload = std::fs::read(
        std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/sample-input.xlsx"),
    )
    .unwrap();

    let req = test::TestRequest::post()
        .uri("/datavalidator/?lexicon=es-ar")
        .set_payload(payload)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["valid"], true);
    assert_eq!(body["errors"].as_array().unwrap().len(), 0);
}

#[actix_web::test]
async fn test_dataValidator_withCorruptSpreadsheet_shouldBeBadRequest() {
    let app = test::init_service(App::new().app_data(state()).configure(api::configure)).await;

    let req = test::TestRequest::post()
        .uri("/datavalidator/?lexicon=es-ar&filename=broken.xlsx")
        .set_payload(&b"PK\x03\x04garbage"[..])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .starts_with("Failed to read spreadsheet"));
}

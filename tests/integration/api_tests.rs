/*!
 * Integration tests for the REST API
 */

use actix_web::{test, web, App};
use serde_json::Value;

use linguatec_lexicon::api::{self, ApiState};
use linguatec_lexicon::import::DataImportOptions;
use linguatec_lexicon::{Config, LexiconCode};
use crate::common;

/// State with the sample data imported
fn seeded_state() -> web::Data<ApiState> {
    let temp_dir = common::create_temp_dir().unwrap();
    let controller = common::seeded_controller(temp_dir.path()).unwrap();
    let input = common::create_test_file(temp_dir.path(), "data.csv", common::DATA_CSV).unwrap();
    controller
        .import_data(
            &input,
            &DataImportOptions {
                lexicon_code: LexiconCode::new("es", "ar"),
                dry_run: false,
                allow_partial: false,
            },
        )
        .unwrap();

    web::Data::new(ApiState {
        repository: common::repository_for(&controller),
        config: Config::default(),
    })
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(App::new().app_data($state.clone()).configure(api::configure)).await
    };
}

#[actix_web::test]
async fn test_listWords_withLimit_shouldPaginate() {
    let state = seeded_state();
    let app = app!(state);

    let req = test::TestRequest::get().uri("/api/words/?limit=2").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["count"], 3);
    assert_eq!(body["results"].as_array().unwrap().len(), 2);
    assert_eq!(body["results"][0]["term"], "abad");
    assert!(body["next"]
        .as_str()
        .unwrap()
        .ends_with("/api/words/?limit=2&offset=2"));
    assert!(body["previous"].is_null());
}

#[actix_web::test]
async fn test_getWord_shouldIncludeEntries() {
    let state = seeded_state();
    let app = app!(state);

    let req = test::TestRequest::get().uri("/api/words/2/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["term"], "bien");
    assert_eq!(body["lexicon"], "es-ar");
    let entries = body["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1]["gramcats"][0], "s. m.");
    assert_eq!(entries[1]["examples"][1], "Un bien común");
}

#[actix_web::test]
async fn test_getWord_withUnknownId_shouldReturnNotFound() {
    let state = seeded_state();
    let app = app!(state);

    let req = test::TestRequest::get().uri("/api/words/999/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "Not found.");
}

#[actix_web::test]
async fn test_search_withDifferentCase_shouldMatchExactly() {
    let state = seeded_state();
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/api/words/search/?q=%20BIEN%20&l=es-ar")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["term"], "bien");
    assert!(body["next"].is_null());
}

#[actix_web::test]
async fn test_search_withPrefixOrUnknownLexicon_shouldFallBack() {
    let state = seeded_state();
    let app = app!(state);

    let req = test::TestRequest::get().uri("/api/words/search/?q=can").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["results"][0]["term"], "cantar");

    let req = test::TestRequest::get().uri("/api/words/search/?q=cantar&l=fr-es").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 0);
    assert_eq!(body["results"].as_array().unwrap().len(), 0);

    let req = test::TestRequest::get().uri("/api/words/search/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 0);
}

/// Many matches are served in pages
#[actix_web::test]
async fn test_searchAndNear_withManyMatches_shouldPaginate() {
    let temp_dir = common::create_temp_dir().unwrap();
    let controller = common::seeded_controller(temp_dir.path()).unwrap();
    let mut csv = String::from("term;gramcats;translation\n");
    for i in 0..40 {
        csv.push_str(&format!("casa{};s. f.;casa\n", i));
    }
    let input = common::create_test_file(temp_dir.path(), "casas.csv", &csv).unwrap();
    controller
        .import_data(
            &input,
            &DataImportOptions {
                lexicon_code: LexiconCode::new("es", "ar"),
                dry_run: false,
                allow_partial: false,
            },
        )
        .unwrap();
    let state = web::Data::new(ApiState {
        repository: common::repository_for(&controller),
        config: Config::default(),
    });
    let app = app!(state);

    let req = test::TestRequest::get().uri("/api/words/search/?q=casa").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 40);
    assert_eq!(body["results"].as_array().unwrap().len(), 30);
    assert!(body["next"]
        .as_str()
        .unwrap()
        .ends_with("/api/words/search/?q=casa&limit=30&offset=30"));

    let req = test::TestRequest::get()
        .uri("/api/words/near/?q=casa1&limit=5")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 40);
    assert_eq!(body["results"].as_array().unwrap().len(), 5);
    assert_eq!(body["results"][0]["term"], "casa1");
    assert!(body["previous"].is_null());
}

#[actix_web::test]
async fn test_near_withMisspelling_shouldSuggestClosestFirst() {
    let state = seeded_state();
    let app = app!(state);

    let req = test::TestRequest::get().uri("/api/words/near/?q=cantat").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["results"][0]["term"], "cantar");
    assert_eq!(body["results"][0]["lexicon"], "es-ar");
    assert!(body["results"][0].get("similarity").is_none());
}

#[actix_web::test]
async fn test_gramcats_showAndList() {
    let state = seeded_state();
    let app = app!(state);

    let req = test::TestRequest::get().uri("/api/gramcats/show/?abbr=adj.").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["title"], "adjetivo");

    let req = test::TestRequest::get().uri("/api/gramcats/show/?abbr=zz.").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    let req = test::TestRequest::get().uri("/api/gramcats/?limit=500").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 6);
    assert_eq!(body["results"][0]["abbreviation"], "adj.");
    assert!(body["next"].is_null());
}

#[actix_web::test]
async fn test_lexicons_listAndDetail() {
    let state = seeded_state();
    let app = app!(state);

    let req = test::TestRequest::get().uri("/api/lexicons/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["src_language"], "es");
    assert_eq!(body["results"][0]["code"], "es-ar");

    let req = test::TestRequest::get().uri("/api/lexicons/1/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["name"], "es-ar");

    let req = test::TestRequest::get().uri("/api/lexicons/7/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

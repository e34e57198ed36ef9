/*!
 * Read-only REST API and upload validators.
 *
 * Routes:
 * - `/api/lexicons/`, `/api/words/`, `/api/gramcats/` (paginated lists and details)
 * - `/api/words/near/`, `/api/words/search/`, `/api/gramcats/show/`
 * - `/datavalidator/`, `/diatopic-variation-validator/`
 */

use actix_web::dev::Server;
use actix_web::{web, App, HttpResponse, HttpServer};
use log::info;
use serde_json::json;

use crate::app_config::Config;
use crate::database::Repository;

pub mod error;
pub mod handlers;
pub mod pagination;
pub mod validators;

pub use error::{ApiError, ApiResult};
pub use pagination::{PageParams, PaginatedResponse};

/// Shared state of the HTTP workers
pub struct ApiState {
    pub repository: Repository,
    pub config: Config,
}

/// Register every route; used by the server and by tests
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(handlers::list_lexicons)
            .service(handlers::get_lexicon)
            .service(handlers::list_words)
            // fixed paths go before `/words/{id}/`
            .service(handlers::near_words)
            .service(handlers::search_words)
            .service(handlers::get_word)
            .service(handlers::list_gramcats)
            .service(handlers::show_gramcat)
            .service(handlers::get_gramcat),
    )
    .service(validators::data_validator_info)
    .service(validators::validate_data)
    .service(validators::variation_validator_info)
    .service(validators::validate_variation);
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({ "detail": "Not found." }))
}

/// Start the HTTP server
pub fn start_server(repository: Repository, config: Config) -> std::io::Result<Server> {
    let host = config.server.host.clone();
    let port = config.server.port;
    let state = web::Data::new(ApiState { repository, config });

    info!("Listening on http://{}:{}", host, port);
    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(web::PayloadConfig::new(UPLOAD_LIMIT))
            .configure(configure)
            .default_service(web::to(not_found))
    })
    .bind((host.as_str(), port))?
    .run();

    Ok(server)
}

/// Largest accepted upload body
pub const UPLOAD_LIMIT: usize = 16 * 1024 * 1024;

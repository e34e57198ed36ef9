use actix_web::{get, web, HttpRequest, HttpResponse};
use serde::Deserialize;

use super::error::{ApiError, ApiResult};
use super::pagination::{PageParams, PaginatedResponse};
use super::ApiState;
use crate::database::models::WordDetail;
use crate::database::Page;
use crate::lexicon_code::LexiconCode;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub l: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NearParams {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ShowGramcatParams {
    pub abbr: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[get("/lexicons/")]
pub async fn list_lexicons(
    state: web::Data<ApiState>,
    req: HttpRequest,
    params: web::Query<PageParams>,
) -> ApiResult<HttpResponse> {
    let window = params.window(&state.config.api);
    let page = state.repository.lexicons_page(window.limit, window.offset).await?;
    Ok(HttpResponse::Ok().json(PaginatedResponse::new(page, window, &req.full_url())))
}

#[get("/lexicons/{id}/")]
pub async fn get_lexicon(state: web::Data<ApiState>, id: web::Path<i64>) -> ApiResult<HttpResponse> {
    let lexicon = state.repository.lexicon(*id).await?.ok_or(ApiError::NotFound)?;
    Ok(HttpResponse::Ok().json(lexicon))
}

#[get("/words/")]
pub async fn list_words(
    state: web::Data<ApiState>,
    req: HttpRequest,
    params: web::Query<PageParams>,
) -> ApiResult<HttpResponse> {
    let window = params.window(&state.config.api);
    let page = state.repository.words_page(window.limit, window.offset).await?;
    Ok(HttpResponse::Ok().json(PaginatedResponse::new(page, window, &req.full_url())))
}

/// Words similar to `q`, for "did you mean" suggestions
#[get("/words/near/")]
pub async fn near_words(
    state: web::Data<ApiState>,
    req: HttpRequest,
    params: web::Query<NearParams>,
    page_params: web::Query<PageParams>,
) -> ApiResult<HttpResponse> {
    let window = page_params.window(&state.config.api);
    let page = match non_empty(&params.q) {
        Some(query) => {
            state
                .repository
                .near(query, state.config.api.near_threshold, window.limit, window.offset)
                .await?
        }
        None => Page::empty(),
    };
    Ok(HttpResponse::Ok().json(PaginatedResponse::new(page, window, &req.full_url())))
}

/// Exact (case-insensitive) term lookup, falling back to a prefix match
///
/// `l` restricts the search to one lexicon code; an unknown or malformed code
/// matches nothing.
#[get("/words/search/")]
pub async fn search_words(
    state: web::Data<ApiState>,
    req: HttpRequest,
    params: web::Query<SearchParams>,
    page_params: web::Query<PageParams>,
) -> ApiResult<HttpResponse> {
    let window = page_params.window(&state.config.api);
    let empty = || PaginatedResponse::new(Page::<WordDetail>::empty(), window, &req.full_url());

    let Some(query) = non_empty(&params.q) else {
        return Ok(HttpResponse::Ok().json(empty()));
    };

    let lexicon = match non_empty(&params.l) {
        Some(code) => match code.parse::<LexiconCode>() {
            Ok(code) => Some(code),
            Err(_) => return Ok(HttpResponse::Ok().json(empty())),
        },
        None => None,
    };

    let page = state
        .repository
        .search(query, lexicon, window.limit, window.offset)
        .await?;
    Ok(HttpResponse::Ok().json(PaginatedResponse::new(page, window, &req.full_url())))
}

#[get("/words/{id}/")]
pub async fn get_word(state: web::Data<ApiState>, id: web::Path<i64>) -> ApiResult<HttpResponse> {
    let word = state.repository.word(*id).await?.ok_or(ApiError::NotFound)?;
    Ok(HttpResponse::Ok().json(word))
}

#[get("/gramcats/")]
pub async fn list_gramcats(
    state: web::Data<ApiState>,
    req: HttpRequest,
    params: web::Query<PageParams>,
) -> ApiResult<HttpResponse> {
    let window = params.window(&state.config.api);
    let page = state.repository.gramcats_page(window.limit, window.offset).await?;
    Ok(HttpResponse::Ok().json(PaginatedResponse::new(page, window, &req.full_url())))
}

#[get("/gramcats/show/")]
pub async fn show_gramcat(
    state: web::Data<ApiState>,
    params: web::Query<ShowGramcatParams>,
) -> ApiResult<HttpResponse> {
    let abbreviation = non_empty(&params.abbr).ok_or(ApiError::NotFound)?;
    let gramcat = state
        .repository
        .gramcat_by_abbreviation(abbreviation)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(HttpResponse::Ok().json(gramcat))
}

#[get("/gramcats/{id}/")]
pub async fn get_gramcat(state: web::Data<ApiState>, id: web::Path<i64>) -> ApiResult<HttpResponse> {
    let gramcat = state.repository.gramcat(*id).await?.ok_or(ApiError::NotFound)?;
    Ok(HttpResponse::Ok().json(gramcat))
}

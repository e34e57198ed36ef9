/*!
 * Limit/offset pagination.
 *
 * List responses carry the total count and absolute links to the
 * neighbouring pages, built from the request URL so other query parameters
 * are kept.
 */

use serde::{Deserialize, Serialize};
use url::Url;

use crate::app_config::ApiConfig;
use crate::database::Page;

/// Raw `limit`/`offset` query parameters; invalid values fall back to defaults
#[derive(Debug, Deserialize, Default)]
pub struct PageParams {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// Resolved page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub limit: usize,
    pub offset: usize,
}

impl PageParams {
    pub fn window(&self, config: &ApiConfig) -> PageWindow {
        let limit = self
            .limit
            .as_deref()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|limit| *limit > 0)
            .map_or(config.default_limit, |limit| limit.min(config.max_limit));

        let offset = self
            .offset
            .as_deref()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);

        PageWindow { limit, offset }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub count: usize,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> PaginatedResponse<T> {
    pub fn new(page: Page<T>, window: PageWindow, request_url: &Url) -> Self {
        let PageWindow { limit, offset } = window;

        let next = (offset + limit < page.count)
            .then(|| with_window(request_url, limit, Some(offset + limit)));

        let previous = (offset > 0).then(|| {
            let previous_offset = offset.saturating_sub(limit);
            with_window(request_url, limit, (previous_offset > 0).then_some(previous_offset))
        });

        Self {
            count: page.count,
            next,
            previous,
            results: page.items,
        }
    }
}

/// Request URL with `limit` set and `offset` replaced (or dropped)
fn with_window(url: &Url, limit: usize, offset: Option<usize>) -> String {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "limit" && key != "offset")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut url = url.clone();
    {
        let mut query = url.query_pairs_mut();
        query.clear();
        query.extend_pairs(kept);
        query.append_pair("limit", &limit.to_string());
        if let Some(offset) = offset {
            query.append_pair("offset", &offset.to_string());
        }
    }
    url.to_string()
}

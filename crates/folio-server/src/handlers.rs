//! HTTP request handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Redirect, Response};

use crate::state::{AppState, HOME};

const CACHE_CONTROL: &str = "max-age=86400";
const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

fn html(status: StatusCode, body: Bytes) -> Response {
    (
        status,
        [
            (header::CONTENT_TYPE, HTML_CONTENT_TYPE),
            (header::CACHE_CONTROL, CACHE_CONTROL),
        ],
        body,
    )
        .into_response()
}

fn page_or_not_found(state: &AppState, page: Option<Bytes>) -> Response {
    match page {
        Some(body) => html(StatusCode::OK, body),
        None => not_found_response(state),
    }
}

fn not_found_response(state: &AppState) -> Response {
    let body = state
        .not_found_page()
        .unwrap_or_else(|| Bytes::from_static(b"<h1>Not Found</h1>"));
    html(StatusCode::NOT_FOUND, body)
}

/// GET /
pub(crate) async fn home(State(state): State<Arc<AppState>>) -> Response {
    page_or_not_found(&state, state.top_level_page(HOME))
}

/// GET /{page}
pub(crate) async fn top_level(
    State(state): State<Arc<AppState>>,
    Path(page): Path<String>,
) -> Response {
    // Home lives at `/` only
    let body = if page == HOME {
        None
    } else {
        state.top_level_page(&page)
    };
    page_or_not_found(&state, body)
}

/// GET /posts/{*post}
pub(crate) async fn post(
    State(state): State<Arc<AppState>>,
    Path(post): Path<String>,
) -> Response {
    page_or_not_found(&state, state.post(&post))
}

/// Permanent redirect from a legacy slug to its `/posts` location.
pub(crate) async fn redirect_legacy(uri: Uri) -> Redirect {
    Redirect::permanent(&format!("/posts{}", uri.path()))
}

/// Fallback for unmatched paths.
pub(crate) async fn fallback(State(state): State<Arc<AppState>>) -> Response {
    not_found_response(&state)
}

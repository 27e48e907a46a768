//! JSON content API

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use super::ServerState;

#[derive(Debug, Deserialize)]
pub struct ContentQuery {
    slug: Option<String>,
    list: Option<String>,
}

/// `GET /api/content?list=1` or `GET /api/content?slug=<slug>`
pub async fn content(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<ContentQuery>,
) -> Response {
    if query.list.as_deref() == Some("1") {
        return Json(state.all_posts().await).into_response();
    }

    match query.slug.as_deref().filter(|s| !s.is_empty()) {
        Some(slug) => match state.loader.get_post_by_slug(slug).await {
            Some(post) => Json(post).into_response(),
            None => error(StatusCode::NOT_FOUND, "Not found"),
        },
        None => error(StatusCode::BAD_REQUEST, "Bad request"),
    }
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

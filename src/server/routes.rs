use crate::pipeline::{EpisodeQuery, MovieQuery, MovieLookupError, ShowLookupError};
use crate::server::error::PassthroughError;
use crate::server::AppContext;
use crate::skiptimes::SkipTimesError;
use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

/// Routes behind the optional domain allowlist.
pub fn api_routes() -> Router<AppContext> {
    Router::new()
        .route("/", get(index))
        .route("/fetch_movie_data", get(fetch_movie_data))
        .route("/tv_shows/fetch_tv_show_data", get(fetch_tv_show_data))
        .route("/tmdb/*path", get(tmdb_passthrough))
}

/// Routes that are always public.
pub fn public_routes() -> Router<AppContext> {
    Router::new().route("/skiptimes/:file", get(skip_times))
}

async fn index() -> Json<Value> {
    Json(json!({ "message": "Your API is ready!" }))
}

// An unparsable query string is treated the same as a missing parameter.
async fn fetch_movie_data(
    State(ctx): State<AppContext>,
    params: Option<Query<Vec<(String, String)>>>,
) -> Result<Json<Value>, MovieLookupError> {
    let params = params.map(|Query(p)| p).unwrap_or_default();
    ctx.resolver
        .resolve_movie(&MovieQuery::from_pairs(&params))
        .await
        .map(Json)
}

async fn fetch_tv_show_data(
    State(ctx): State<AppContext>,
    params: Option<Query<Vec<(String, String)>>>,
) -> Result<Json<Value>, ShowLookupError> {
    let params = params.map(|Query(p)| p).unwrap_or_default();
    ctx.resolver
        .resolve_episode(&EpisodeQuery::from_pairs(&params))
        .await
        .map(Json)
}

async fn tmdb_passthrough(
    State(ctx): State<AppContext>,
    Path(path): Path<String>,
    params: Option<Query<Vec<(String, String)>>>,
) -> Result<Json<Value>, PassthroughError> {
    let params = params.map(|Query(p)| p).unwrap_or_default();
    ctx.resolver
        .tmdb()
        .passthrough(&path, &params)
        .await
        .map(Json)
        .map_err(PassthroughError::from)
}

async fn skip_times(
    State(ctx): State<AppContext>,
    Path(file): Path<String>,
) -> Result<impl IntoResponse, SkipTimesError> {
    let vtt = ctx.skiptimes.vtt_for(&file).await?;
    Ok(([(header::CONTENT_TYPE, "text/vtt")], vtt))
}

//! HTTP routes of the catalog service

use crate::dto::{
    InfoResponse, ListSongsParams, LyricsParams, LyricsResponse, NewSongRequest, SongListResponse,
    SongResponse, UpdateSongRequest,
};
use crate::error::Result;
use crate::CatalogService;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use std::time::Duration;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

/// Build the API router.
///
/// Requests taking longer than `request_timeout` are answered with 408.
pub fn create_router(service: CatalogService, request_timeout: Duration) -> Router {
    Router::new()
        .route("/info", get(info))
        .route("/songs", get(list_songs).post(add_song))
        .route("/songs/:song_name", axum::routing::put(update_song).delete(delete_song))
        .route("/songs/:song_name/lyrics", get(song_lyrics))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(service)
}

async fn info(State(service): State<CatalogService>) -> Json<InfoResponse> {
    Json(service.info())
}

async fn list_songs(
    State(service): State<CatalogService>,
    Query(params): Query<ListSongsParams>,
) -> Result<Json<SongListResponse>> {
    Ok(Json(service.list_songs(&params).await?))
}

async fn add_song(
    State(service): State<CatalogService>,
    payload: std::result::Result<Json<NewSongRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SongResponse>)> {
    let Json(request) = payload?;
    let song = service.add_song(request).await?;
    Ok((StatusCode::CREATED, Json(song)))
}

async fn update_song(
    State(service): State<CatalogService>,
    Path(song_name): Path<String>,
    payload: std::result::Result<Json<UpdateSongRequest>, JsonRejection>,
) -> Result<Json<SongResponse>> {
    let Json(request) = payload?;
    Ok(Json(service.update_song(&song_name, request).await?))
}

async fn delete_song(
    State(service): State<CatalogService>,
    Path(song_name): Path<String>,
) -> Result<StatusCode> {
    service.delete_song(&song_name).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn song_lyrics(
    State(service): State<CatalogService>,
    Path(song_name): Path<String>,
    Query(params): Query<LyricsParams>,
) -> Result<Json<LyricsResponse>> {
    Ok(Json(service.lyrics(&song_name, &params).await?))
}

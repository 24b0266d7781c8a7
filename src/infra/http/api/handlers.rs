//! Posts handlers

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use postboard_api_types::{DeleteResponse, PostPatch, SearchQuery};

use super::error::ApiError;
use super::state::ApiState;

pub async fn list_posts(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let posts = state
        .posts
        .list()
        .await
        .map_err(|err| ApiError::from_service("infra::http::api::list_posts", err))?;
    Ok(Json(posts))
}

pub async fn create_post(
    State(state): State<ApiState>,
    payload: Result<Json<PostPatch>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    const SOURCE: &str = "infra::http::api::create_post";
    let Json(patch) =
        payload.map_err(|rejection| ApiError::bad_request(SOURCE, rejection.body_text()))?;

    let post = state
        .posts
        .create(patch)
        .await
        .map_err(|err| ApiError::from_service(SOURCE, err))?;
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn get_post(
    State(state): State<ApiState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    const SOURCE: &str = "infra::http::api::get_post";
    let id = post_id(SOURCE, path)?;

    let post = state
        .posts
        .get(id)
        .await
        .map_err(|err| ApiError::from_service(SOURCE, err))?;
    Ok(Json(post))
}

pub async fn update_post(
    State(state): State<ApiState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<PostPatch>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    const SOURCE: &str = "infra::http::api::update_post";
    let id = post_id(SOURCE, path)?;
    let Json(patch) =
        payload.map_err(|rejection| ApiError::bad_request(SOURCE, rejection.body_text()))?;

    let post = state
        .posts
        .update(id, patch)
        .await
        .map_err(|err| ApiError::from_service(SOURCE, err))?;
    Ok(Json(post))
}

pub async fn delete_post(
    State(state): State<ApiState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    const SOURCE: &str = "infra::http::api::delete_post";
    let id = post_id(SOURCE, path)?;

    let deleted = state
        .posts
        .delete(id)
        .await
        .map_err(|err| ApiError::from_service(SOURCE, err))?;
    if !deleted {
        return Err(ApiError::not_found(SOURCE, "Post not found."));
    }

    Ok(Json(DeleteResponse {
        message: format!("Post with id {id} has been deleted successfully."),
    }))
}

pub async fn search_posts(
    State(state): State<ApiState>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let posts = state
        .posts
        .search(&query)
        .await
        .map_err(|err| ApiError::from_service("infra::http::api::search_posts", err))?;
    Ok(Json(posts))
}

/// Ids that are not integers answer `400` with an error body.
fn post_id(
    source: &'static str,
    path: Result<Path<i64>, PathRejection>,
) -> Result<i64, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|rejection| ApiError::bad_request(source, rejection.body_text()))
}

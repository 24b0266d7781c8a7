//! Host page handlers. Every action runs one controller operation and sends
//! the browser back to the page.

use axum::Form;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;

use postboard_api_types::SearchQuery;

use crate::domain::posts::PostFields;
use crate::presentation::views::{BoardTemplate, render_template_response};

use super::state::FrontendState;

#[derive(Debug, Deserialize)]
pub struct BaseUrlForm {
    pub api_base_url: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct PostForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl From<PostForm> for PostFields {
    fn from(form: PostForm) -> Self {
        PostFields::new(form.title, form.content)
    }
}

fn back_to_board() -> Redirect {
    Redirect::to("/")
}

pub async fn board(State(state): State<FrontendState>) -> Response {
    let view = state.controller.take_view().await;
    render_template_response(BoardTemplate { view: view.into() }, StatusCode::OK)
}

pub async fn set_base_url(
    State(state): State<FrontendState>,
    Form(form): Form<BaseUrlForm>,
) -> impl IntoResponse {
    if state.controller.set_api_base_url(&form.api_base_url).await {
        state.controller.load_posts().await;
    }
    back_to_board()
}

pub async fn load_posts(State(state): State<FrontendState>) -> impl IntoResponse {
    state.controller.load_posts().await;
    back_to_board()
}

pub async fn add_post(
    State(state): State<FrontendState>,
    Form(form): Form<PostForm>,
) -> impl IntoResponse {
    state.controller.add_post(form.into()).await;
    back_to_board()
}

pub async fn edit_post(
    State(state): State<FrontendState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    state.controller.edit_post(id).await;
    back_to_board()
}

pub async fn delete_post(
    State(state): State<FrontendState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    state.controller.delete_post(id).await;
    back_to_board()
}

pub async fn update_post(
    State(state): State<FrontendState>,
    Form(form): Form<PostForm>,
) -> impl IntoResponse {
    state.controller.update_post(form.into()).await;
    back_to_board()
}

pub async fn cancel_edit(State(state): State<FrontendState>) -> impl IntoResponse {
    state.controller.cancel_edit().await;
    back_to_board()
}

pub async fn search_posts(
    State(state): State<FrontendState>,
    Form(form): Form<PostForm>,
) -> impl IntoResponse {
    let query = SearchQuery {
        title: Some(form.title).filter(|value| !value.is_empty()),
        content: Some(form.content).filter(|value| !value.is_empty()),
    };
    state.controller.search_posts(query).await;
    back_to_board()
}

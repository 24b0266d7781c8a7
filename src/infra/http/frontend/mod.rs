pub mod handlers;
pub mod state;

pub use state::FrontendState;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

use crate::infra::http::middleware::{log_responses, set_request_context};

pub fn build_frontend_router(state: FrontendState) -> Router {
    Router::new()
        .route("/", get(handlers::board))
        .route("/actions/base-url", post(handlers::set_base_url))
        .route("/actions/load", post(handlers::load_posts))
        .route("/actions/posts", post(handlers::add_post))
        .route("/actions/posts/{id}/edit", post(handlers::edit_post))
        .route("/actions/posts/{id}/delete", post(handlers::delete_post))
        .route("/actions/edit", post(handlers::update_post))
        .route("/actions/edit/cancel", post(handlers::cancel_edit))
        .route("/actions/search", post(handlers::search_posts))
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(set_request_context))
        .with_state(state)
}

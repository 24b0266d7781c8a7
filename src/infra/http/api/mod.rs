pub mod error;
pub mod handlers;
pub mod state;

pub use state::ApiState;

use axum::{Router, middleware as axum_middleware, routing::get};

use crate::infra::http::middleware::{log_responses, set_request_context};

pub fn build_api_router(state: ApiState) -> Router {
    Router::new()
        .route(
            "/api/posts",
            get(handlers::list_posts).post(handlers::create_post),
        )
        .route("/api/posts/search", get(handlers::search_posts))
        .route(
            "/api/posts/{id}",
            get(handlers::get_post)
                .put(handlers::update_post)
                .delete(handlers::delete_post),
        )
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(set_request_context))
        .with_state(state)
}

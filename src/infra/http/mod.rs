pub mod api;
pub mod client;
pub mod frontend;
mod middleware;

pub use api::{ApiState, build_api_router};
pub use client::HttpPostsGateway;
pub use frontend::{FrontendState, build_frontend_router};

//! The posts API as consumed by the front end.

use async_trait::async_trait;
use thiserror::Error;

use postboard_api_types::{PostPayload, SearchQuery};

use crate::domain::error::DomainError;
use crate::domain::posts::{ApiBase, Post};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request URL: {0}")]
    Url(#[from] DomainError),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("server responded with status {status}")]
    Status { status: u16, error: Option<String> },
    #[error("failed to decode response body: {0}")]
    Decode(String),
}

impl GatewayError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    pub fn decode(err: impl std::fmt::Display) -> Self {
        Self::Decode(err.to_string())
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Every endpoint the front end talks to. The base URL is passed per call
/// because the user may change it between actions.
#[async_trait]
pub trait PostsGateway: Send + Sync {
    async fn list_posts(&self, base: &ApiBase) -> Result<Vec<Post>, GatewayError>;

    async fn get_post(&self, base: &ApiBase, id: i64) -> Result<Post, GatewayError>;

    async fn create_post(&self, base: &ApiBase, payload: &PostPayload)
    -> Result<(), GatewayError>;

    async fn update_post(
        &self,
        base: &ApiBase,
        id: i64,
        payload: &PostPayload,
    ) -> Result<(), GatewayError>;

    async fn delete_post(&self, base: &ApiBase, id: i64) -> Result<(), GatewayError>;

    async fn search_posts(
        &self,
        base: &ApiBase,
        query: &SearchQuery,
    ) -> Result<Vec<Post>, GatewayError>;
}

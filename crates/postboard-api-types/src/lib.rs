//! Wire shapes shared by the posts API and its clients.

use serde::{Deserialize, Serialize};

/// A post as returned by every read endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
}

/// Body sent by clients on create and update.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PostPayload {
    pub title: String,
    pub content: String,
}

/// Body accepted by the server on create and update. Both fields are optional
/// on the wire; create rejects missing values, update keeps the stored ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PostPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Error body carried by non-2xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApiErrorBody {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// Query string of `GET /posts/search`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SearchQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

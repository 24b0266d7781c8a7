//! reqwest-backed access to the posts API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use postboard_api_types::{ApiErrorBody, PostPayload, SearchQuery};

use crate::application::gateway::{GatewayError, PostsGateway};
use crate::domain::posts::{ApiBase, Post};
use crate::infra::error::InfraError;

#[derive(Clone, Debug)]
pub struct HttpPostsGateway {
    client: Client,
}

impl HttpPostsGateway {
    /// `timeout` of `None` leaves requests unbounded.
    pub fn new(timeout: Option<Duration>) -> Result<Self, InfraError> {
        let mut builder = Client::builder().user_agent(Self::user_agent());
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| InfraError::http_client(err.to_string()))?;
        Ok(Self { client })
    }

    pub fn user_agent() -> &'static str {
        concat!("postboard/", env!("CARGO_PKG_VERSION"))
    }

    async fn send(request: RequestBuilder) -> Result<Response, GatewayError> {
        request.send().await.map_err(GatewayError::transport)
    }

    async fn handle<T: DeserializeOwned>(resp: Response) -> Result<T, GatewayError> {
        let status = resp.status();
        let bytes = resp.bytes().await.map_err(GatewayError::transport)?;
        if !status.is_success() {
            return Err(status_error(status, &bytes));
        }
        serde_json::from_slice(&bytes).map_err(GatewayError::decode)
    }

    async fn handle_unit(resp: Response) -> Result<(), GatewayError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        let bytes = resp.bytes().await.unwrap_or_default();
        Err(status_error(status, &bytes))
    }
}

/// The `error` field is read when the body carries one; anything else is
/// reported by status alone.
fn status_error(status: StatusCode, body: &[u8]) -> GatewayError {
    let error = serde_json::from_slice::<ApiErrorBody>(body)
        .ok()
        .map(|body| body.error);
    GatewayError::Status {
        status: status.as_u16(),
        error,
    }
}

#[async_trait]
impl PostsGateway for HttpPostsGateway {
    async fn list_posts(&self, base: &ApiBase) -> Result<Vec<Post>, GatewayError> {
        let resp = Self::send(self.client.get(base.posts()?)).await?;
        Self::handle(resp).await
    }

    async fn get_post(&self, base: &ApiBase, id: i64) -> Result<Post, GatewayError> {
        let resp = Self::send(self.client.get(base.post(id)?)).await?;
        Self::handle(resp).await
    }

    async fn create_post(
        &self,
        base: &ApiBase,
        payload: &PostPayload,
    ) -> Result<(), GatewayError> {
        let resp = Self::send(self.client.post(base.posts()?).json(payload)).await?;
        Self::handle_unit(resp).await
    }

    async fn update_post(
        &self,
        base: &ApiBase,
        id: i64,
        payload: &PostPayload,
    ) -> Result<(), GatewayError> {
        let resp = Self::send(self.client.put(base.post(id)?).json(payload)).await?;
        Self::handle_unit(resp).await
    }

    async fn delete_post(&self, base: &ApiBase, id: i64) -> Result<(), GatewayError> {
        let resp = Self::send(self.client.delete(base.post(id)?)).await?;
        Self::handle_unit(resp).await
    }

    async fn search_posts(
        &self,
        base: &ApiBase,
        query: &SearchQuery,
    ) -> Result<Vec<Post>, GatewayError> {
        let resp = Self::send(self.client.get(base.search(query)?)).await?;
        Self::handle(resp).await
    }
}

#[cfg(test)]
mod tests {
    use httpmock::MockServer;
    use serde_json::json;

    use super::*;

    fn gateway() -> HttpPostsGateway {
        HttpPostsGateway::new(None).expect("gateway")
    }

    fn base(server: &MockServer) -> ApiBase {
        ApiBase::parse(&server.url("/api")).expect("base")
    }

    #[tokio::test]
    async fn list_parses_posts() -> Result<(), GatewayError> {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("GET").path("/api/posts");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"[{"id":1,"title":"A","content":"B"}]"#);
        });

        let posts = gateway().list_posts(&base(&server)).await?;
        mock.assert();
        assert_eq!(
            posts,
            vec![Post {
                id: 1,
                title: "A".into(),
                content: "B".into(),
            }]
        );
        Ok(())
    }

    #[tokio::test]
    async fn create_sends_exactly_title_and_content() -> Result<(), GatewayError> {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("POST")
                .path("/api/posts")
                .header("content-type", "application/json")
                .json_body(json!({"title": "T", "content": "C"}));
            then.status(201)
                .header("content-type", "application/json")
                .body(r#"{"id":9,"title":"T","content":"C"}"#);
        });

        let payload = PostPayload {
            title: "T".into(),
            content: "C".into(),
        };
        gateway().create_post(&base(&server), &payload).await?;
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn failure_carries_server_error_text() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("PUT").path("/api/posts/5");
            then.status(404)
                .header("content-type", "application/json")
                .body(r#"{"error":"not found"}"#);
        });

        let payload = PostPayload {
            title: "T".into(),
            content: "C".into(),
        };
        let err = gateway()
            .update_post(&base(&server), 5, &payload)
            .await
            .expect_err("404 must fail");
        assert!(matches!(
            err,
            GatewayError::Status { status: 404, error: Some(ref e) } if e == "not found"
        ));
    }

    #[tokio::test]
    async fn failure_without_error_body_reports_status_only() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("DELETE").path("/api/posts/3");
            then.status(500).body("boom");
        });

        let err = gateway()
            .delete_post(&base(&server), 3)
            .await
            .expect_err("500 must fail");
        assert!(matches!(
            err,
            GatewayError::Status {
                status: 500,
                error: None
            }
        ));
    }

    #[tokio::test]
    async fn malformed_list_body_is_a_decode_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/api/posts");
            then.status(200).body("<html>not json</html>");
        });

        let err = gateway()
            .list_posts(&base(&server))
            .await
            .expect_err("decode must fail");
        assert!(matches!(err, GatewayError::Decode(_)));
    }

    #[tokio::test]
    async fn search_sends_non_empty_queries() -> Result<(), GatewayError> {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("GET")
                .path("/api/posts/search")
                .query_param("title", "flask");
            then.status(200)
                .header("content-type", "application/json")
                .body("[]");
        });

        let query = SearchQuery {
            title: Some("flask".into()),
            content: Some(String::new()),
        };
        let posts = gateway().search_posts(&base(&server), &query).await?;
        mock.assert();
        assert!(posts.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        let base = ApiBase::parse("http://127.0.0.1:1/api").expect("base");
        let err = gateway()
            .list_posts(&base)
            .await
            .expect_err("nothing listens on port 1");
        assert!(matches!(err, GatewayError::Transport(_)));
    }
}

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use httpmock::MockServer;
use tower::ServiceExt;

use postboard::application::controller::PostListController;
use postboard::application::inflight::InFlightActions;
use postboard::domain::posts::ApiBase;
use postboard::infra::http::{FrontendState, HttpPostsGateway, build_frontend_router};

fn router(server: &MockServer) -> Router {
    let gateway = HttpPostsGateway::new(None).expect("gateway");
    let controller = PostListController::new(
        Arc::new(gateway),
        ApiBase::parse(&server.url("/api")).expect("base"),
        InFlightActions::disabled(),
    );
    build_frontend_router(FrontendState { controller })
}

async fn post_form(router: &Router, uri: &str, form: &str) -> StatusCode {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .expect("request");
    let response = router.clone().oneshot(request).await.expect("response");
    let status = response.status();
    if status == StatusCode::SEE_OTHER {
        assert_eq!(
            response
                .headers()
                .get(header::LOCATION)
                .and_then(|value| value.to_str().ok()),
            Some("/")
        );
    }
    status
}

async fn page(router: &Router) -> String {
    let request = Request::builder()
        .uri("/")
        .body(Body::empty())
        .expect("request");
    let response = router.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}

#[tokio::test]
async fn load_action_redirects_and_page_lists_posts() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/api/posts");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"[{"id":1,"title":"<b>A</b>","content":"B"}]"#);
    });

    let router = router(&server);
    assert_eq!(
        post_form(&router, "/actions/load", "").await,
        StatusCode::SEE_OTHER
    );

    let html = page(&router).await;
    assert!(html.contains(r#"<div class="post""#));
    assert!(!html.contains("<b>A</b>"));
    assert!(html.contains("<h2>&#60;b&#62;A&#60;/b&#62;</h2>"));
    assert!(html.contains("/actions/posts/1/edit"));
    assert!(html.contains("/actions/posts/1/delete"));
    assert!(html.contains(r#"id="edit-container" style="display: none""#));
}

#[tokio::test]
async fn notices_show_once() {
    let server = MockServer::start();
    let router = router(&server);

    assert_eq!(
        post_form(&router, "/actions/posts", "title=&content=x").await,
        StatusCode::SEE_OTHER
    );

    let first = page(&router).await;
    assert!(first.contains("Title and content are required."));
    let second = page(&router).await;
    assert!(!second.contains("Title and content are required."));
}

#[tokio::test]
async fn edit_action_opens_the_form() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/api/posts/3");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"id":3,"title":"Flask tutorial","content":"Learn"}"#);
    });

    let router = router(&server);
    assert_eq!(
        post_form(&router, "/actions/posts/3/edit", "").await,
        StatusCode::SEE_OTHER
    );

    let html = page(&router).await;
    assert!(!html.contains(r#"id="edit-container" style="display: none""#));
    assert!(html.contains(r#"value="Flask tutorial""#));

    post_form(&router, "/actions/edit/cancel", "").await;
    let html = page(&router).await;
    assert!(html.contains(r#"id="edit-container" style="display: none""#));
}

#[tokio::test]
async fn bad_base_url_is_refused() {
    let server = MockServer::start();
    let router = router(&server);

    post_form(&router, "/actions/base-url", "api_base_url=not+a+url").await;

    let html = page(&router).await;
    assert!(html.contains("Invalid API base URL."));
    assert!(!html.contains("not a url"));
}

//! The post list controller: one network round trip per user action, a full
//! list reload after every successful mutation, and an explicit edit session.

mod view;


use std::sync::Arc;

use metrics::counter;
use postboard_api_types::SearchQuery;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::application::gateway::{GatewayError, PostsGateway};
use crate::application::inflight::{ActionGuard, ActionKind, InFlightActions};
use crate::domain::posts::{ApiBase, EditSession, PostFields};

pub use view::{Notice, NoticeKind, PostCard, PostControl, PostListView};

pub const REQUIRED_FIELDS: &str = "Title and content are required.";
pub const LOAD_FAILED: &str = "Failed to load posts.";
pub const DELETE_FAILED: &str = "Failed to delete post.";
pub const EDIT_LOAD_FAILED: &str = "Failed to load post.";
pub const SEARCH_FAILED: &str = "Failed to search posts.";
pub const NO_EDIT_SESSION: &str = "No post is being edited.";
pub const INVALID_BASE_URL: &str = "Invalid API base URL.";
pub const ACTION_IN_PROGRESS: &str = "That action is already in progress.";

const ACTIONS_METRIC: &str = "postboard_actions_total";

/// Shared handle: clones drive the same view. The view lock is never held
/// while a request is outstanding, so concurrent actions interleave and the
/// last response to land wins.
#[derive(Clone)]
pub struct PostListController {
    gateway: Arc<dyn PostsGateway>,
    view: Arc<Mutex<PostListView>>,
    inflight: InFlightActions,
}

impl PostListController {
    pub fn new(
        gateway: Arc<dyn PostsGateway>,
        api_base: ApiBase,
        inflight: InFlightActions,
    ) -> Self {
        debug!(api_base = %api_base, dedupe = inflight.is_enabled(), "post list controller ready");
        Self {
            gateway,
            view: Arc::new(Mutex::new(PostListView::new(api_base))),
            inflight,
        }
    }

    pub async fn snapshot(&self) -> PostListView {
        self.view.lock().await.clone()
    }

    /// Snapshot for rendering. Queued notices are handed over and cleared.
    pub async fn take_view(&self) -> PostListView {
        let mut view = self.view.lock().await;
        let snapshot = view.clone();
        view.notices.clear();
        snapshot
    }

    /// Returns `false` when the input is rejected and the old base kept.
    pub async fn set_api_base_url(&self, raw: &str) -> bool {
        match ApiBase::parse(raw) {
            Ok(base) => {
                info!(api_base = %base, "api base url changed");
                self.view.lock().await.api_base = base;
                true
            }
            Err(err) => {
                warn!(error = %err, "rejected api base url");
                self.notify(Notice::validation(INVALID_BASE_URL)).await;
                false
            }
        }
    }

    pub async fn load_posts(&self) {
        let Some(_guard) = self.begin(ActionKind::Load).await else {
            return;
        };
        let outcome = if self.reload_list().await {
            "ok"
        } else {
            "failed"
        };
        record(ActionKind::Load, outcome);
    }

    pub async fn add_post(&self, fields: PostFields) {
        let Some(_guard) = self.begin(ActionKind::Add).await else {
            return;
        };

        self.view.lock().await.new_post = fields.clone();
        let Ok(payload) = fields.validate() else {
            self.reject(ActionKind::Add, REQUIRED_FIELDS).await;
            return;
        };

        let base = self.api_base().await;
        match self.gateway.create_post(&base, &payload).await {
            Ok(()) => {
                info!(action = "add", "post created");
                self.view.lock().await.new_post.clear();
                record(ActionKind::Add, "ok");
                self.reload_list().await;
            }
            Err(err) => self.fail(ActionKind::Add, &err, server_notice(&err)).await,
        }
    }

    pub async fn delete_post(&self, id: i64) {
        let Some(_guard) = self.begin(ActionKind::Delete).await else {
            return;
        };

        let base = self.api_base().await;
        match self.gateway.delete_post(&base, id).await {
            Ok(()) => {
                info!(action = "delete", post_id = id, "post deleted");
                record(ActionKind::Delete, "ok");
                self.reload_list().await;
            }
            Err(err) => self.fail(ActionKind::Delete, &err, DELETE_FAILED.into()).await,
        }
    }

    /// Opens the edit form for `id`, replacing any session already open.
    pub async fn edit_post(&self, id: i64) {
        let Some(_guard) = self.begin(ActionKind::Edit).await else {
            return;
        };

        let base = self.api_base().await;
        match self.gateway.get_post(&base, id).await {
            Ok(post) => {
                debug!(action = "edit", post_id = id, "edit session opened");
                self.view.lock().await.edit = Some(EditSession::open(post));
                record(ActionKind::Edit, "ok");
            }
            Err(err) => self.fail(ActionKind::Edit, &err, EDIT_LOAD_FAILED.into()).await,
        }
    }

    /// Saves the edit form. The session's post id is captured before the
    /// request goes out; a session opened meanwhile for another post survives
    /// the success path.
    pub async fn update_post(&self, fields: PostFields) {
        let Some(_guard) = self.begin(ActionKind::Update).await else {
            return;
        };

        let post_id = self.view.lock().await.edit.as_mut().map(|session| {
            session.fields = fields.clone();
            session.post_id
        });
        let Some(post_id) = post_id else {
            self.reject(ActionKind::Update, NO_EDIT_SESSION).await;
            return;
        };

        let Ok(payload) = fields.validate() else {
            self.reject(ActionKind::Update, REQUIRED_FIELDS).await;
            return;
        };

        let base = self.api_base().await;
        match self.gateway.update_post(&base, post_id, &payload).await {
            Ok(()) => {
                info!(action = "update", post_id, "post updated");
                {
                    let mut view = self.view.lock().await;
                    if view.editing_post_id() == Some(post_id) {
                        view.edit = None;
                    }
                }
                record(ActionKind::Update, "ok");
                self.reload_list().await;
            }
            Err(err) => self.fail(ActionKind::Update, &err, server_notice(&err)).await,
        }
    }

    pub async fn cancel_edit(&self) {
        let closed = self.view.lock().await.edit.take();
        debug!(
            post_id = closed.as_ref().map(|session| session.post_id),
            "edit session cancelled"
        );
    }

    /// Replaces the rendered list with the posts matching `query`.
    pub async fn search_posts(&self, query: SearchQuery) {
        let Some(_guard) = self.begin(ActionKind::Search).await else {
            return;
        };

        let base = self.api_base().await;
        match self.gateway.search_posts(&base, &query).await {
            Ok(posts) => {
                info!(action = "search", matches = posts.len(), "search rendered");
                let mut view = self.view.lock().await;
                view.replace_posts(posts);
                view.search = Some(query);
                drop(view);
                record(ActionKind::Search, "ok");
            }
            Err(err) => self.fail(ActionKind::Search, &err, SEARCH_FAILED.into()).await,
        }
    }

    /// Fetches the full list and re-renders it. Reloads that follow a
    /// mutation come through here directly and skip the in-flight guard.
    async fn reload_list(&self) -> bool {
        let base = self.api_base().await;
        match self.gateway.list_posts(&base).await {
            Ok(posts) => {
                debug!(count = posts.len(), "post list rendered");
                let mut view = self.view.lock().await;
                view.replace_posts(posts);
                view.search = None;
                true
            }
            Err(err) => {
                warn!(action = "load", error = %err, status = err.status(), "failed to load posts");
                self.notify(Notice::error(LOAD_FAILED)).await;
                false
            }
        }
    }

    async fn begin(&self, kind: ActionKind) -> Option<ActionGuard> {
        debug!(action = %kind, "action started");
        match self.inflight.acquire(kind) {
            Ok(guard) => Some(guard),
            Err(err) => {
                debug!(error = %err, "action refused");
                self.notify(Notice::error(ACTION_IN_PROGRESS)).await;
                record(kind, "busy");
                None
            }
        }
    }

    async fn reject(&self, kind: ActionKind, message: &str) {
        debug!(action = %kind, reason = message, "action rejected before sending");
        self.notify(Notice::validation(message)).await;
        record(kind, "rejected");
    }

    async fn fail(&self, kind: ActionKind, err: &GatewayError, message: String) {
        warn!(action = %kind, error = %err, status = err.status(), "action failed");
        self.notify(Notice::error(message)).await;
        record(kind, "failed");
    }

    async fn notify(&self, notice: Notice) {
        self.view.lock().await.notices.push(notice);
    }

    async fn api_base(&self) -> ApiBase {
        self.view.lock().await.api_base.clone()
    }
}

/// Notice text for a failed create or update, preferring the server's own
/// `error` message.
pub fn server_notice(err: &GatewayError) -> String {
    match err {
        GatewayError::Status {
            error: Some(message),
            ..
        } => format!("Error: {message}"),
        GatewayError::Status {
            status,
            error: None,
        } => format!("Error: request failed with status {status}"),
        GatewayError::Transport(_) => "Error: could not reach the API.".to_string(),
        GatewayError::Decode(_) => "Error: unexpected response from the API.".to_string(),
        GatewayError::Url(_) => "Error: invalid request URL.".to_string(),
    }
}

fn record(kind: ActionKind, outcome: &'static str) {
    counter!(ACTIONS_METRIC, "action" => kind.as_str(), "outcome" => outcome).increment(1);
}

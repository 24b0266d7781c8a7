use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::application::controller::{Notice, PostCard, PostListView};
use crate::application::error::HttpError;

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

#[derive(Template)]
#[template(path = "board.html")]
pub struct BoardTemplate {
    pub view: BoardView,
}

/// The page, flattened into the strings each named slot shows.
#[derive(Debug, Clone)]
pub struct BoardView {
    pub api_base_url: String,
    pub new_title: String,
    pub new_content: String,
    pub edit_visible: bool,
    pub edit_title: String,
    pub edit_content: String,
    pub search_active: bool,
    pub search_title: String,
    pub search_content: String,
    pub posts: Vec<PostCardView>,
    pub notices: Vec<NoticeView>,
}

#[derive(Debug, Clone)]
pub struct PostCardView {
    pub title: String,
    pub content: String,
    pub controls: Vec<ControlView>,
}

#[derive(Debug, Clone)]
pub struct ControlView {
    pub label: &'static str,
    pub action: String,
}

#[derive(Debug, Clone)]
pub struct NoticeView {
    pub kind: &'static str,
    pub text: String,
}

impl From<PostListView> for BoardView {
    fn from(view: PostListView) -> Self {
        let (edit_visible, edit_title, edit_content) = match view.edit {
            Some(session) => (true, session.fields.title, session.fields.content),
            None => (false, String::new(), String::new()),
        };
        let search_active = view.search.is_some();
        let search = view.search.unwrap_or_default();

        Self {
            api_base_url: view.api_base.to_string(),
            new_title: view.new_post.title,
            new_content: view.new_post.content,
            edit_visible,
            edit_title,
            edit_content,
            search_active,
            search_title: search.title.unwrap_or_default(),
            search_content: search.content.unwrap_or_default(),
            posts: view.posts.into_iter().map(PostCardView::from).collect(),
            notices: view.notices.into_iter().map(NoticeView::from).collect(),
        }
    }
}

impl From<PostCard> for PostCardView {
    fn from(card: PostCard) -> Self {
        let controls = card
            .controls
            .iter()
            .map(|control| ControlView {
                label: control.label(),
                action: control.action_path(card.id),
            })
            .collect();
        Self {
            title: card.title,
            content: card.content,
            controls,
        }
    }
}

impl From<Notice> for NoticeView {
    fn from(notice: Notice) -> Self {
        Self {
            kind: notice.kind.as_str(),
            text: notice.text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::posts::{ApiBase, EditSession, Post};

    fn list_view() -> PostListView {
        PostListView::new(ApiBase::parse("http://127.0.0.1:5002/api").expect("base"))
    }

    fn render(view: PostListView) -> String {
        BoardTemplate { view: view.into() }
            .render()
            .expect("board renders")
    }

    #[test]
    fn renders_one_card_per_post_with_both_controls() {
        let mut view = list_view();
        view.posts = vec![PostCard::from(Post {
            id: 1,
            title: "A".into(),
            content: "B".into(),
        })];

        let html = render(view);
        assert_eq!(html.matches(r#"<div class="post">"#).count(), 1);
        assert!(html.contains("<h2>A</h2>"));
        assert!(html.contains("<p>B</p>"));
        assert!(html.contains(">Edit</button>"));
        assert!(html.contains(">Delete</button>"));
        assert!(html.contains("posts/1/edit"));
        assert!(html.contains("posts/1/delete"));
    }

    #[test]
    fn edit_container_hidden_without_session() {
        let html = render(list_view());
        assert!(html.contains(r#"<div id="edit-container" style="display: none">"#));
    }

    #[test]
    fn edit_container_shows_session_fields() {
        let mut view = list_view();
        view.edit = Some(EditSession::open(Post {
            id: 4,
            title: "Draft".into(),
            content: "Words".into(),
        }));

        let html = render(view);
        assert!(html.contains(r#"<div id="edit-container">"#));
        assert!(html.contains(r#"value="Draft""#));
        assert!(html.contains(">Words</textarea>"));
    }

    #[test]
    fn post_text_is_escaped() {
        let mut view = list_view();
        view.posts = vec![PostCard::from(Post {
            id: 2,
            title: "<script>alert(1)</script>".into(),
            content: "a & b".into(),
        })];

        let html = render(view);
        assert!(!html.contains("<script>"));
        assert!(html.contains("<h2>&#60;script&#62;alert(1)&#60;/script&#62;</h2>"));
        assert!(html.contains("<p>a &#38; b</p>"));
    }

    #[test]
    fn notices_render_as_alerts() {
        let mut view = list_view();
        view.notices = vec![Notice::error("Error: not found")];

        let html = render(view);
        assert!(html.contains(r#"<p class="notice notice-error" role="alert">Error: not found</p>"#));
    }
}

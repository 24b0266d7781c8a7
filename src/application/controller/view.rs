use postboard_api_types::SearchQuery;

use crate::domain::posts::{ApiBase, EditSession, Post, PostFields};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Validation,
    Error,
}

impl NoticeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Error => "error",
        }
    }
}

/// A user-visible message, shown once by the host page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn validation(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Validation,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostControl {
    Edit,
    Delete,
}

impl PostControl {
    pub fn label(self) -> &'static str {
        match self {
            Self::Edit => "Edit",
            Self::Delete => "Delete",
        }
    }

    pub fn action_path(self, id: i64) -> String {
        match self {
            Self::Edit => format!("/actions/posts/{id}/edit"),
            Self::Delete => format!("/actions/posts/{id}/delete"),
        }
    }
}

/// One entry of the rendered post list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostCard {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub controls: Vec<PostControl>,
}

impl From<Post> for PostCard {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            controls: vec![PostControl::Edit, PostControl::Delete],
        }
    }
}

/// Everything the host page shows, slot by slot.
#[derive(Debug, Clone)]
pub struct PostListView {
    pub api_base: ApiBase,
    pub new_post: PostFields,
    pub edit: Option<EditSession>,
    pub posts: Vec<PostCard>,
    pub search: Option<SearchQuery>,
    pub notices: Vec<Notice>,
}

impl PostListView {
    pub fn new(api_base: ApiBase) -> Self {
        Self {
            api_base,
            new_post: PostFields::default(),
            edit: None,
            posts: Vec::new(),
            search: None,
            notices: Vec::new(),
        }
    }

    pub fn edit_form_visible(&self) -> bool {
        self.edit.is_some()
    }

    pub fn editing_post_id(&self) -> Option<i64> {
        self.edit.as_ref().map(|session| session.post_id)
    }

    /// Throw away the rendered list and render `posts` in its place.
    pub(super) fn replace_posts(&mut self, posts: Vec<Post>) {
        self.posts = posts.into_iter().map(PostCard::from).collect();
    }
}

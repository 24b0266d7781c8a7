//! Posts as the front end sees them: form input, the edit session, and the
//! address of the API that owns them.

use postboard_api_types::{PostPayload, SearchQuery};
use url::Url;

use crate::domain::error::DomainError;

pub use postboard_api_types::Post;

/// Title and content as typed into a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFields {
    pub title: String,
    pub content: String,
}

impl PostFields {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Presence check only. Whitespace counts as content.
    pub fn validate(&self) -> Result<PostPayload, DomainError> {
        if self.title.is_empty() || self.content.is_empty() {
            return Err(DomainError::validation("title and content are required"));
        }

        Ok(PostPayload {
            title: self.title.clone(),
            content: self.content.clone(),
        })
    }

    pub fn clear(&mut self) {
        self.title.clear();
        self.content.clear();
    }
}

impl From<Post> for PostFields {
    fn from(post: Post) -> Self {
        Self {
            title: post.title,
            content: post.content,
        }
    }
}

/// The post currently open in the edit form. The form is visible exactly
/// while a session exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub post_id: i64,
    pub fields: PostFields,
}

impl EditSession {
    pub fn open(post: Post) -> Self {
        Self {
            post_id: post.id,
            fields: post.into(),
        }
    }
}

/// Root address of the posts API, e.g. `http://127.0.0.1:5002/api`.
///
/// Endpoints are formed by appending to the base as text, so any path the
/// base carries is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiBase {
    base: String,
}

impl ApiBase {
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let trimmed = input.trim();
        let url = Url::parse(trimmed)
            .map_err(|err| DomainError::invalid_base_url(trimmed, err.to_string()))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(DomainError::invalid_base_url(
                trimmed,
                "scheme must be http or https",
            ));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(DomainError::invalid_base_url(
                trimmed,
                "query and fragment are not allowed",
            ));
        }

        let base = url.as_str().trim_end_matches('/').to_string();
        Ok(Self { base })
    }

    pub fn as_str(&self) -> &str {
        &self.base
    }

    /// `{base}/posts`
    pub fn posts(&self) -> Result<Url, DomainError> {
        self.endpoint("/posts")
    }

    /// `{base}/posts/{id}`
    pub fn post(&self, id: i64) -> Result<Url, DomainError> {
        self.endpoint(&format!("/posts/{id}"))
    }

    /// `{base}/posts/search` with the non-empty query values attached.
    pub fn search(&self, query: &SearchQuery) -> Result<Url, DomainError> {
        let mut url = self.endpoint("/posts/search")?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(title) = query.title.as_deref().filter(|v| !v.is_empty()) {
                pairs.append_pair("title", title);
            }
            if let Some(content) = query.content.as_deref().filter(|v| !v.is_empty()) {
                pairs.append_pair("content", content);
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }

    fn endpoint(&self, path: &str) -> Result<Url, DomainError> {
        let raw = format!("{}{path}", self.base);
        Url::parse(&raw).map_err(|err| DomainError::invalid_base_url(raw, err.to_string()))
    }
}

impl std::fmt::Display for ApiBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_fields_fail_validation() {
        assert!(PostFields::new("", "x").validate().is_err());
        assert!(PostFields::new("x", "").validate().is_err());
        assert!(PostFields::new("", "").validate().is_err());
    }

    #[test]
    fn whitespace_passes_presence_check() {
        let payload = PostFields::new(" ", "body").validate().expect("valid");
        assert_eq!(payload.title, " ");
        assert_eq!(payload.content, "body");
    }

    #[test]
    fn base_keeps_path_and_drops_trailing_slash() {
        let base = ApiBase::parse("http://127.0.0.1:5002/api/").expect("base");
        assert_eq!(base.as_str(), "http://127.0.0.1:5002/api");
        assert_eq!(
            base.posts().expect("url").as_str(),
            "http://127.0.0.1:5002/api/posts"
        );
        assert_eq!(
            base.post(42).expect("url").as_str(),
            "http://127.0.0.1:5002/api/posts/42"
        );
    }

    #[test]
    fn base_rejects_non_http_schemes_and_garbage() {
        assert!(ApiBase::parse("ftp://example.com").is_err());
        assert!(ApiBase::parse("not a url").is_err());
        assert!(ApiBase::parse("").is_err());
        assert!(ApiBase::parse("http://example.com/api?x=1").is_err());
    }

    #[test]
    fn search_url_skips_empty_queries() {
        let base = ApiBase::parse("http://localhost:5002/api").expect("base");
        let url = base
            .search(&SearchQuery {
                title: Some("Flask Tips".into()),
                content: Some(String::new()),
            })
            .expect("url");
        assert_eq!(
            url.as_str(),
            "http://localhost:5002/api/posts/search?title=Flask+Tips"
        );

        let bare = base.search(&SearchQuery::default()).expect("url");
        assert_eq!(bare.as_str(), "http://localhost:5002/api/posts/search");
    }

    #[test]
    fn edit_session_copies_post_fields() {
        let session = EditSession::open(Post {
            id: 3,
            title: "T".into(),
            content: "C".into(),
        });
        assert_eq!(session.post_id, 3);
        assert_eq!(session.fields, PostFields::new("T", "C"));
    }
}

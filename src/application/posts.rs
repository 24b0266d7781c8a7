//! Post operations behind the REST API.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use postboard_api_types::{PostPatch, SearchQuery};

use crate::application::repos::{NewPost, PostsRepo, RepoError};
use crate::domain::posts::Post;

#[derive(Debug, Error)]
pub enum PostServiceError {
    #[error("Both 'title' and 'content' are required.")]
    MissingFields,
    #[error("Post with id {id} not found.")]
    NotFound { id: i64 },
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Clone)]
pub struct PostService {
    repo: Arc<dyn PostsRepo>,
}

impl PostService {
    pub fn new(repo: Arc<dyn PostsRepo>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<Post>, PostServiceError> {
        Ok(self.repo.list_posts().await?)
    }

    pub async fn get(&self, id: i64) -> Result<Post, PostServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(PostServiceError::NotFound { id })
    }

    /// Missing and empty fields are treated alike.
    pub async fn create(&self, patch: PostPatch) -> Result<Post, PostServiceError> {
        let title = patch.title.filter(|value| !value.is_empty());
        let content = patch.content.filter(|value| !value.is_empty());
        let (Some(title), Some(content)) = (title, content) else {
            return Err(PostServiceError::MissingFields);
        };

        let post = self.repo.create_post(NewPost { title, content }).await?;
        info!(post_id = post.id, "post created");
        Ok(post)
    }

    pub async fn update(&self, id: i64, patch: PostPatch) -> Result<Post, PostServiceError> {
        let post = self
            .repo
            .update_post(id, patch)
            .await?
            .ok_or(PostServiceError::NotFound { id })?;
        info!(post_id = id, "post updated");
        Ok(post)
    }

    /// `Ok(false)` when nothing was stored under `id`.
    pub async fn delete(&self, id: i64) -> Result<bool, PostServiceError> {
        let deleted = self.repo.delete_post(id).await?;
        if deleted {
            info!(post_id = id, "post deleted");
        }
        Ok(deleted)
    }

    /// Case-insensitive substring match. A post matches when the title query
    /// is found in its title or the content query in its content; empty
    /// queries match nothing.
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<Post>, PostServiceError> {
        let title = lowered(query.title.as_deref());
        let content = lowered(query.content.as_deref());

        let posts = self.repo.list_posts().await?;
        Ok(posts
            .into_iter()
            .filter(|post| {
                let by_title = title
                    .as_deref()
                    .is_some_and(|needle| post.title.to_lowercase().contains(needle));
                let by_content = content
                    .as_deref()
                    .is_some_and(|needle| post.content.to_lowercase().contains(needle));
                by_title || by_content
            })
            .collect())
    }
}

fn lowered(value: Option<&str>) -> Option<String> {
    value
        .filter(|value| !value.is_empty())
        .map(str::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::InMemoryPostsRepo;

    fn service() -> PostService {
        PostService::new(Arc::new(InMemoryPostsRepo::seeded()))
    }

    fn patch(title: Option<&str>, content: Option<&str>) -> PostPatch {
        PostPatch {
            title: title.map(str::to_string),
            content: content.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn create_assigns_next_id() {
        let service = service();
        let post = service
            .create(patch(Some("Fourth"), Some("Body")))
            .await
            .expect("create");
        assert_eq!(post.id, 4);
        assert_eq!(service.list().await.expect("list").len(), 4);
    }

    #[tokio::test]
    async fn create_rejects_missing_or_empty_fields() {
        let service = service();
        for input in [
            patch(None, Some("x")),
            patch(Some("x"), None),
            patch(Some(""), Some("x")),
        ] {
            let err = service.create(input).await.expect_err("must fail");
            assert!(matches!(err, PostServiceError::MissingFields));
        }
        assert_eq!(
            PostServiceError::MissingFields.to_string(),
            "Both 'title' and 'content' are required."
        );
    }

    #[tokio::test]
    async fn update_keeps_absent_fields() {
        let service = service();
        let post = service
            .update(2, patch(Some("Renamed"), None))
            .await
            .expect("update");
        assert_eq!(post.title, "Renamed");
        assert_eq!(post.content, "This is the second post.");
    }

    #[tokio::test]
    async fn unknown_ids_are_reported() {
        let service = service();
        assert!(matches!(
            service.get(42).await,
            Err(PostServiceError::NotFound { id: 42 })
        ));
        assert!(matches!(
            service.update(42, PostPatch::default()).await,
            Err(PostServiceError::NotFound { id: 42 })
        ));
        assert!(!service.delete(42).await.expect("delete"));
    }

    #[tokio::test]
    async fn search_ors_title_and_content_case_insensitively() {
        let service = service();
        let by_title = service
            .search(&SearchQuery {
                title: Some("FLASK".into()),
                content: None,
            })
            .await
            .expect("search");
        assert_eq!(by_title.iter().map(|p| p.id).collect::<Vec<_>>(), vec![3]);

        let either = service
            .search(&SearchQuery {
                title: Some("flask".into()),
                content: Some("first".into()),
            })
            .await
            .expect("search");
        assert_eq!(either.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 3]);

        let none = service
            .search(&SearchQuery::default())
            .await
            .expect("search");
        assert!(none.is_empty());
    }
}

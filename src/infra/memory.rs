//! Process-local post storage backing the REST API.

use async_trait::async_trait;
use tokio::sync::RwLock;

use postboard_api_types::PostPatch;

use crate::application::repos::{NewPost, PostsRepo, RepoError};
use crate::domain::posts::Post;

const SEED_POSTS: [(i64, &str, &str); 3] = [
    (1, "First post", "This is the first post."),
    (2, "Second post", "This is the second post."),
    (
        3,
        "Flask tutorial",
        "Learn how to use Flask in this post.",
    ),
];

#[derive(Debug, Default)]
pub struct InMemoryPostsRepo {
    posts: RwLock<Vec<Post>>,
}

impl InMemoryPostsRepo {
    pub fn new(posts: Vec<Post>) -> Self {
        Self {
            posts: RwLock::new(posts),
        }
    }

    /// Starts with the three sample posts.
    pub fn seeded() -> Self {
        Self::new(
            SEED_POSTS
                .iter()
                .map(|(id, title, content)| Post {
                    id: *id,
                    title: (*title).to_string(),
                    content: (*content).to_string(),
                })
                .collect(),
        )
    }
}

#[async_trait]
impl PostsRepo for InMemoryPostsRepo {
    async fn list_posts(&self) -> Result<Vec<Post>, RepoError> {
        Ok(self.posts.read().await.clone())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError> {
        Ok(self
            .posts
            .read()
            .await
            .iter()
            .find(|post| post.id == id)
            .cloned())
    }

    async fn create_post(&self, post: NewPost) -> Result<Post, RepoError> {
        let mut posts = self.posts.write().await;
        let next_id = posts
            .iter()
            .map(|post| post.id)
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or_else(|| RepoError::Persistence("post id space exhausted".to_string()))?;
        let stored = Post {
            id: next_id,
            title: post.title,
            content: post.content,
        };
        posts.push(stored.clone());
        Ok(stored)
    }

    async fn update_post(&self, id: i64, patch: PostPatch) -> Result<Option<Post>, RepoError> {
        let mut posts = self.posts.write().await;
        let Some(post) = posts.iter_mut().find(|post| post.id == id) else {
            return Ok(None);
        };
        if let Some(title) = patch.title {
            post.title = title;
        }
        if let Some(content) = patch.content {
            post.content = content;
        }
        Ok(Some(post.clone()))
    }

    async fn delete_post(&self, id: i64) -> Result<bool, RepoError> {
        let mut posts = self.posts.write().await;
        let before = posts.len();
        posts.retain(|post| post.id != id);
        Ok(posts.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_store_starts_ids_at_one() {
        let repo = InMemoryPostsRepo::default();
        let post = repo
            .create_post(NewPost {
                title: "t".into(),
                content: "c".into(),
            })
            .await
            .expect("create");
        assert_eq!(post.id, 1);
    }

    #[tokio::test]
    async fn create_fails_once_ids_run_out() {
        let repo = InMemoryPostsRepo::new(vec![Post {
            id: i64::MAX,
            title: "last".into(),
            content: "one".into(),
        }]);
        let err = repo
            .create_post(NewPost {
                title: "t".into(),
                content: "c".into(),
            })
            .await
            .expect_err("no id left");
        assert!(matches!(err, RepoError::Persistence(_)));
        assert_eq!(repo.list_posts().await.expect("list").len(), 1);
    }

    #[tokio::test]
    async fn ids_follow_the_highest_not_the_count() {
        let repo = InMemoryPostsRepo::seeded();
        assert!(repo.delete_post(2).await.expect("delete"));
        let post = repo
            .create_post(NewPost {
                title: "t".into(),
                content: "c".into(),
            })
            .await
            .expect("create");
        assert_eq!(post.id, 4);
    }
}

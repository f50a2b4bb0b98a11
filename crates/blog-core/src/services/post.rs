use std::sync::Arc;

use uuid::Uuid;

use super::or_not_found;
use crate::domain::Post;
use crate::error::{DomainError, RepoError};
use crate::ports::{PostRepository, ThemeRepository};

/// Post store.
///
/// Holds the theme repository only to resolve `theme_id` references.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    themes: Arc<dyn ThemeRepository>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>, themes: Arc<dyn ThemeRepository>) -> Self {
        Self { posts, themes }
    }

    pub async fn create(
        &self,
        title: String,
        text: String,
        theme_id: Option<Uuid>,
    ) -> Result<Post, DomainError> {
        let post = Post::new(title, text, theme_id);
        post.validate()?;
        self.ensure_theme_exists(theme_id).await?;

        let saved = self
            .posts
            .insert(post)
            .await
            .map_err(|err| write_failure(err, theme_id))?;
        tracing::info!(post_id = %saved.id, theme_id = ?saved.theme_id, "Post created");
        Ok(saved)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))
    }

    /// All posts, newest first.
    pub async fn find_all(&self) -> Result<Vec<Post>, DomainError> {
        let mut posts = self.posts.find_all().await?;
        newest_first(&mut posts);
        Ok(posts)
    }

    /// Case-insensitive substring search on the title.
    pub async fn find_by_title_containing(&self, fragment: &str) -> Result<Vec<Post>, DomainError> {
        let mut posts = self.posts.find_by_title_containing(fragment).await?;
        newest_first(&mut posts);
        Ok(posts)
    }

    /// Posts filed under any of `theme_ids`, newest first.
    pub async fn find_by_theme_ids(&self, theme_ids: &[Uuid]) -> Result<Vec<Post>, DomainError> {
        if theme_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut posts = self.posts.find_by_theme_ids(theme_ids).await?;
        newest_first(&mut posts);
        Ok(posts)
    }

    /// Full-record update. `date` is re-stamped regardless of what the caller sent.
    pub async fn update(&self, mut post: Post) -> Result<Post, DomainError> {
        post.validate()?;

        let current = self.find_by_id(post.id).await?;
        self.ensure_theme_exists(post.theme_id).await?;
        post.touch(current.date);

        let id = post.id;
        let theme_id = post.theme_id;
        let saved = self.posts.update(post).await.map_err(|err| match err {
            RepoError::NotFound => DomainError::not_found("Post", id),
            other => write_failure(other, theme_id),
        })?;
        tracing::info!(post_id = %id, "Post updated");
        Ok(saved)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        self.posts.delete(id).await.map_err(or_not_found("Post", id))?;
        tracing::info!(post_id = %id, "Post deleted");
        Ok(())
    }

    async fn ensure_theme_exists(&self, theme_id: Option<Uuid>) -> Result<(), DomainError> {
        let Some(theme_id) = theme_id else {
            return Ok(());
        };

        match self.themes.find_by_id(theme_id).await? {
            Some(_) => Ok(()),
            None => {
                tracing::debug!(theme_id = %theme_id, "Rejecting post for unknown theme");
                Err(DomainError::ForeignKeyViolation { theme_id })
            }
        }
    }
}

/// A constraint failure on a post with a theme means the theme disappeared
/// after `ensure_theme_exists` saw it.
fn write_failure(err: RepoError, theme_id: Option<Uuid>) -> DomainError {
    match (err, theme_id) {
        (RepoError::Constraint(_), Some(theme_id)) => {
            tracing::debug!(theme_id = %theme_id, "Theme vanished before the post was written");
            DomainError::ForeignKeyViolation { theme_id }
        }
        (other, _) => other.into(),
    }
}

fn newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.date.cmp(&a.date));
}

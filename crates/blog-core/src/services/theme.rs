use std::sync::Arc;

use uuid::Uuid;

use super::or_not_found;
use crate::domain::Theme;
use crate::error::DomainError;
use crate::ports::ThemeRepository;

/// Theme store.
#[derive(Clone)]
pub struct ThemeService {
    repo: Arc<dyn ThemeRepository>,
}

impl ThemeService {
    pub fn new(repo: Arc<dyn ThemeRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, description: String) -> Result<Theme, DomainError> {
        let theme = Theme::new(description);
        theme.validate()?;

        let saved = self.repo.insert(theme).await?;
        tracing::info!(theme_id = %saved.id, "Theme created");
        Ok(saved)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Theme, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Theme", id))
    }

    /// All themes, ordered by description.
    pub async fn find_all(&self) -> Result<Vec<Theme>, DomainError> {
        let mut themes = self.repo.find_all().await?;
        sort_by_description(&mut themes);
        Ok(themes)
    }

    /// Case-insensitive substring search on the description.
    pub async fn find_by_description_containing(
        &self,
        fragment: &str,
    ) -> Result<Vec<Theme>, DomainError> {
        let mut themes = self.repo.find_by_description_containing(fragment).await?;
        sort_by_description(&mut themes);
        Ok(themes)
    }

    /// Overwrite the description of an existing theme.
    pub async fn update(&self, theme: Theme) -> Result<Theme, DomainError> {
        theme.validate()?;

        let id = theme.id;
        let saved = self.repo.update(theme).await.map_err(or_not_found("Theme", id))?;
        tracing::info!(theme_id = %id, "Theme updated");
        Ok(saved)
    }

    /// Delete a theme and, in the same transaction, every post under it.
    ///
    /// Returns how many posts went with it.
    pub async fn delete(&self, id: Uuid) -> Result<u64, DomainError> {
        let removed_posts = self
            .repo
            .delete_with_posts(id)
            .await
            .map_err(or_not_found("Theme", id))?;

        tracing::info!(theme_id = %id, removed_posts, "Theme deleted");
        Ok(removed_posts)
    }
}

fn sort_by_description(themes: &mut [Theme]) {
    themes.sort_by_cached_key(|t| t.description.to_lowercase());
}

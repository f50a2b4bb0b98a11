use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Post, Theme, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Load every entity. No particular order.
    async fn find_all(&self) -> Result<Vec<T>, RepoError>;

    /// Persist a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity. `RepoError::NotFound` if its ID is unknown.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID. `RepoError::NotFound` if its ID is unknown.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Theme repository.
#[async_trait]
pub trait ThemeRepository: BaseRepository<Theme, Uuid> {
    /// Themes whose description contains `fragment`, ignoring case.
    async fn find_by_description_containing(&self, fragment: &str)
    -> Result<Vec<Theme>, RepoError>;

    /// Delete a theme together with every post filed under it, atomically.
    ///
    /// Returns the number of posts removed. `RepoError::NotFound` (with
    /// nothing removed) if the theme does not exist.
    async fn delete_with_posts(&self, id: Uuid) -> Result<u64, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Posts whose title contains `fragment`, ignoring case.
    async fn find_by_title_containing(&self, fragment: &str) -> Result<Vec<Post>, RepoError>;

    /// Posts filed under any of the given themes.
    async fn find_by_theme_ids(&self, theme_ids: &[Uuid]) -> Result<Vec<Post>, RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

//! In-memory repositories - used when no database is configured, and in tests.
//!
//! All tables sit behind a single async `RwLock`, so a multi-table write such
//! as a theme's cascade delete is atomic with respect to every other
//! operation. The write paths check the same constraints the SQL schema does
//! (primary keys, the post -> theme foreign key, unique user e-mail).
//! Data is lost on process restart.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use blog_core::domain::{Post, Theme, User};
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, PostRepository, ThemeRepository, UserRepository};

use super::mask_email;

#[derive(Default)]
pub struct Tables {
    themes: HashMap<Uuid, Theme>,
    posts: HashMap<Uuid, Post>,
    users: HashMap<Uuid, User>,
}

impl Tables {
    /// Remove every post filed under `theme_id`, returning how many went.
    fn remove_posts_of(&mut self, theme_id: Uuid) -> u64 {
        let before = self.posts.len();
        self.posts.retain(|_, p| p.theme_id != Some(theme_id));
        (before - self.posts.len()) as u64
    }
}

/// A record type stored in [`Tables`].
pub trait Row: Clone + Send + Sync + 'static {
    fn id(&self) -> Uuid;
    fn table(tables: &Tables) -> &HashMap<Uuid, Self>;
    fn table_mut(tables: &mut Tables) -> &mut HashMap<Uuid, Self>;

    /// Constraints other than the primary key, checked on insert and update.
    fn check_constraints(&self, _tables: &Tables) -> Result<(), RepoError> {
        Ok(())
    }

    /// Dependent rows to remove after this one is deleted.
    fn cascade(_tables: &mut Tables, _id: Uuid) {}
}

impl Row for Theme {
    fn id(&self) -> Uuid {
        self.id
    }

    fn table(tables: &Tables) -> &HashMap<Uuid, Self> {
        &tables.themes
    }

    fn table_mut(tables: &mut Tables) -> &mut HashMap<Uuid, Self> {
        &mut tables.themes
    }

    fn cascade(tables: &mut Tables, id: Uuid) {
        tables.remove_posts_of(id);
    }
}

impl Row for Post {
    fn id(&self) -> Uuid {
        self.id
    }

    fn table(tables: &Tables) -> &HashMap<Uuid, Self> {
        &tables.posts
    }

    fn table_mut(tables: &mut Tables) -> &mut HashMap<Uuid, Self> {
        &mut tables.posts
    }

    fn check_constraints(&self, tables: &Tables) -> Result<(), RepoError> {
        match self.theme_id {
            Some(theme_id) if !tables.themes.contains_key(&theme_id) => Err(
                RepoError::Constraint(format!("Referenced theme {theme_id} does not exist")),
            ),
            _ => Ok(()),
        }
    }
}

impl Row for User {
    fn id(&self) -> Uuid {
        self.id
    }

    fn table(tables: &Tables) -> &HashMap<Uuid, Self> {
        &tables.users
    }

    fn table_mut(tables: &mut Tables) -> &mut HashMap<Uuid, Self> {
        &mut tables.users
    }

    fn check_constraints(&self, tables: &Tables) -> Result<(), RepoError> {
        let taken = tables
            .users
            .values()
            .any(|u| u.email == self.email && u.id != self.id);
        if taken {
            return Err(RepoError::Constraint("Email already exists".to_string()));
        }
        Ok(())
    }
}

/// Shared in-memory storage. Cheap to clone; clones see the same data.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn themes(&self) -> InMemoryThemeRepository {
        InMemoryRepository::new(self.clone())
    }

    pub fn posts(&self) -> InMemoryPostRepository {
        InMemoryRepository::new(self.clone())
    }

    pub fn users(&self) -> InMemoryUserRepository {
        InMemoryRepository::new(self.clone())
    }
}

/// Generic in-memory repository over one table of an [`InMemoryStore`].
pub struct InMemoryRepository<T> {
    store: InMemoryStore,
    _row: PhantomData<fn() -> T>,
}

impl<T> InMemoryRepository<T> {
    fn new(store: InMemoryStore) -> Self {
        Self {
            store,
            _row: PhantomData,
        }
    }

    /// Rows of this table matching `pred`.
    async fn select(&self, pred: impl Fn(&T) -> bool) -> Vec<T>
    where
        T: Row,
    {
        let tables = self.store.tables.read().await;
        T::table(&tables)
            .values()
            .filter(|row| pred(row))
            .cloned()
            .collect()
    }
}

/// In-memory theme repository.
pub type InMemoryThemeRepository = InMemoryRepository<Theme>;

/// In-memory post repository.
pub type InMemoryPostRepository = InMemoryRepository<Post>;

/// In-memory user repository.
pub type InMemoryUserRepository = InMemoryRepository<User>;

#[async_trait]
impl<T: Row> BaseRepository<T, Uuid> for InMemoryRepository<T> {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(T::table(&tables).get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<T>, RepoError> {
        Ok(self.select(|_| true).await)
    }

    async fn insert(&self, entity: T) -> Result<T, RepoError> {
        let mut tables = self.store.tables.write().await;
        if T::table(&tables).contains_key(&entity.id()) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        entity.check_constraints(&tables)?;

        T::table_mut(&mut tables).insert(entity.id(), entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: T) -> Result<T, RepoError> {
        let mut tables = self.store.tables.write().await;
        if !T::table(&tables).contains_key(&entity.id()) {
            return Err(RepoError::NotFound);
        }
        entity.check_constraints(&tables)?;

        T::table_mut(&mut tables).insert(entity.id(), entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        if T::table_mut(&mut tables).remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        T::cascade(&mut tables, id);
        Ok(())
    }
}

#[async_trait]
impl ThemeRepository for InMemoryThemeRepository {
    async fn find_by_description_containing(
        &self,
        fragment: &str,
    ) -> Result<Vec<Theme>, RepoError> {
        let needle = fragment.to_lowercase();
        Ok(self
            .select(|t| t.description.to_lowercase().contains(&needle))
            .await)
    }

    async fn delete_with_posts(&self, id: Uuid) -> Result<u64, RepoError> {
        let mut tables = self.store.tables.write().await;
        if tables.themes.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        Ok(tables.remove_posts_of(id))
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_title_containing(&self, fragment: &str) -> Result<Vec<Post>, RepoError> {
        let needle = fragment.to_lowercase();
        Ok(self
            .select(|p| p.title.to_lowercase().contains(&needle))
            .await)
    }

    async fn find_by_theme_ids(&self, theme_ids: &[Uuid]) -> Result<Vec<Post>, RepoError> {
        Ok(self
            .select(|p| p.theme_id.is_some_and(|id| theme_ids.contains(&id)))
            .await)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");
        Ok(self.select(|u| u.email == email).await.into_iter().next())
    }
}

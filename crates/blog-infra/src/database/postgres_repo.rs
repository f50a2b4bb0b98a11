//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, TransactionTrait};
use uuid::Uuid;

use blog_core::domain::{Post, Theme, User};
use blog_core::error::RepoError;
use blog_core::ports::{PostRepository, ThemeRepository, UserRepository};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::theme::{self, Entity as ThemeEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, query_err, write_err};
use super::{escape_like, mask_email};

/// PostgreSQL theme repository.
pub type PostgresThemeRepository = PostgresBaseRepository<ThemeEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// `LOWER(column) LIKE '%fragment%'`, with the fragment lowercased on our side.
///
/// Accented letters match across case only under a UTF-8 database `LC_CTYPE`.
pub(crate) fn contains_ignore_case<C: ColumnTrait>(column: C, fragment: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&fragment.to_lowercase()));
    Expr::expr(Func::lower(Expr::col(column))).like(LikeExpr::new(pattern).escape('\\'))
}

#[async_trait]
impl ThemeRepository for PostgresThemeRepository {
    async fn find_by_description_containing(
        &self,
        fragment: &str,
    ) -> Result<Vec<Theme>, RepoError> {
        let result = ThemeEntity::find()
            .filter(contains_ignore_case(theme::Column::Description, fragment))
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn delete_with_posts(&self, id: Uuid) -> Result<u64, RepoError> {
        let txn = self.db.begin().await.map_err(query_err)?;

        let posts = PostEntity::delete_many()
            .filter(post::Column::ThemeId.eq(id))
            .exec(&txn)
            .await
            .map_err(write_err)?;

        let themes = ThemeEntity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(write_err)?;

        if themes.rows_affected == 0 {
            txn.rollback().await.map_err(query_err)?;
            return Err(RepoError::NotFound);
        }

        txn.commit().await.map_err(query_err)?;
        tracing::debug!(theme_id = %id, posts = posts.rows_affected, "Cascade delete committed");

        Ok(posts.rows_affected)
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_title_containing(&self, fragment: &str) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(contains_ignore_case(post::Column::Title, fragment))
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_theme_ids(&self, theme_ids: &[Uuid]) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::ThemeId.is_in(theme_ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }
}

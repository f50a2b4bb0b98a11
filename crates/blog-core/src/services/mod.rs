//! Stores - the operations the API exposes, on top of the repository ports.
//!
//! Stores own validation, write timestamps and cross-entity checks. The
//! repositories below them only persist.

mod post;
mod theme;
mod user;

pub use post::PostService;
pub use theme::ThemeService;
pub use user::{UserInput, UserService};

use uuid::Uuid;

use crate::error::{DomainError, RepoError};

/// Map a repository miss onto the entity the caller asked for.
fn or_not_found(entity_type: &'static str, id: Uuid) -> impl FnOnce(RepoError) -> DomainError {
    move |err| match err {
        RepoError::NotFound => DomainError::not_found(entity_type, id),
        other => other.into(),
    }
}

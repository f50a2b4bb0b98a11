use std::sync::Arc;

use uuid::Uuid;

use super::or_not_found;
use crate::domain::{User, advance_past};
use crate::error::{DomainError, RepoError};
use crate::ports::{PasswordService, UserRepository};

/// Fields a client supplies when registering or updating an account.
#[derive(Debug, Clone)]
pub struct UserInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub photo: Option<String>,
}

impl UserInput {
    fn validate(&self) -> Result<(), DomainError> {
        User::validate_profile(&self.name, &self.email, self.photo.as_deref())?;
        User::validate_password(&self.password)
    }
}

/// User store.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, passwords: Arc<dyn PasswordService>) -> Self {
        Self { users, passwords }
    }

    pub async fn register(&self, input: UserInput) -> Result<User, DomainError> {
        input.validate()?;

        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(DomainError::Duplicate("Email already registered".to_string()));
        }

        let password_hash = self.hash(&input.password)?;
        let user = User::new(input.name, input.email, password_hash, input.photo);

        let saved = self.users.insert(user).await.map_err(duplicate_email)?;
        tracing::info!(user_id = %saved.id, "User registered");
        Ok(saved)
    }

    /// Check a login/password pair against the stored hash.
    ///
    /// Unknown login and wrong password are indistinguishable to the caller.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, DomainError> {
        let Some(user) = self.users.find_by_email(email).await? else {
            return Err(DomainError::Unauthorized);
        };

        let valid = self
            .passwords
            .verify(password, &user.password_hash)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if !valid {
            tracing::debug!(user_id = %user.id, "Password verification failed");
            return Err(DomainError::Unauthorized);
        }
        Ok(user)
    }

    pub async fn update(&self, id: Uuid, input: UserInput) -> Result<User, DomainError> {
        input.validate()?;

        let current = self.find_by_id(id).await?;
        if let Some(owner) = self.users.find_by_email(&input.email).await? {
            if owner.id != id {
                return Err(DomainError::Duplicate("Email already registered".to_string()));
            }
        }

        let user = User {
            id,
            name: input.name,
            email: input.email,
            password_hash: self.hash(&input.password)?,
            photo: input.photo,
            created_at: current.created_at,
            updated_at: advance_past(current.updated_at),
        };

        let saved = self.users.update(user).await.map_err(|e| match e {
            RepoError::Constraint(_) => duplicate_email(e),
            other => or_not_found("User", id)(other),
        })?;
        tracing::info!(user_id = %id, "User updated");
        Ok(saved)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))
    }

    /// All users, ordered by name.
    pub async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        let mut users = self.users.find_all().await?;
        users.sort_by_cached_key(|u| u.name.to_lowercase());
        Ok(users)
    }

    fn hash(&self, password: &str) -> Result<String, DomainError> {
        self.passwords
            .hash(password)
            .map_err(|e| DomainError::Internal(e.to_string()))
    }
}

/// The unique index on email is the only constraint a user write can trip.
fn duplicate_email(err: RepoError) -> DomainError {
    match err {
        RepoError::Constraint(_) => DomainError::Duplicate("Email already registered".to_string()),
        other => other.into(),
    }
}

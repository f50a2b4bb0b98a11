use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{clock, validation};
use crate::error::DomainError;

/// User entity - an account that can sign in to the blog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    /// Login name.
    pub email: String,
    pub password_hash: String,
    pub photo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub const NAME_MAX_LEN: usize = 255;
    pub const EMAIL_MAX_LEN: usize = 255;
    pub const PHOTO_MAX_LEN: usize = 5000;
    pub const PASSWORD_MIN_LEN: usize = 8;

    /// Create a new user with generated ID and timestamps.
    pub fn new(name: String, email: String, password_hash: String, photo: Option<String>) -> Self {
        let now = clock::now();
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            photo,
            created_at: now,
            updated_at: now,
        }
    }

    /// Validate the public profile fields.
    pub fn validate_profile(name: &str, email: &str, photo: Option<&str>) -> Result<(), DomainError> {
        validation::not_blank("name", name)?;
        validation::at_most("name", name, Self::NAME_MAX_LEN)?;
        validation::at_most("email", email, Self::EMAIL_MAX_LEN)?;
        if !looks_like_email(email) {
            return Err(DomainError::validation("email must be a valid e-mail address"));
        }
        if let Some(photo) = photo {
            validation::at_most("photo", photo, Self::PHOTO_MAX_LEN)?;
        }
        Ok(())
    }

    pub fn validate_password(password: &str) -> Result<(), DomainError> {
        if password.chars().count() < Self::PASSWORD_MIN_LEN {
            return Err(DomainError::validation(format!(
                "password must be at least {} characters",
                Self::PASSWORD_MIN_LEN
            )));
        }
        Ok(())
    }
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

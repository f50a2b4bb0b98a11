use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation;
use crate::error::DomainError;

/// Theme entity - a topical category posts can belong to.
///
/// The set of posts under a theme is derived from `Post::theme_id` and is not
/// part of this record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub id: Uuid,
    pub description: String,
}

impl Theme {
    pub const DESCRIPTION_MAX_LEN: usize = 255;

    /// Create a new theme with a generated ID. Does not validate.
    pub fn new(description: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            description,
        }
    }

    /// Description must be present and must not start with a digit.
    pub fn validate(&self) -> Result<(), DomainError> {
        validation::not_blank("description", &self.description)?;
        validation::at_most("description", &self.description, Self::DESCRIPTION_MAX_LEN)?;

        if self
            .description
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit())
        {
            return Err(DomainError::validation(
                "description must not start with a digit",
            ));
        }

        Ok(())
    }
}

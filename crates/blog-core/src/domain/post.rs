use std::ops::RangeInclusive;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{clock, validation};
use crate::error::DomainError;

/// Post entity - a blog entry, optionally filed under a theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    /// Time of the last write.
    pub date: DateTime<Utc>,
    pub theme_id: Option<Uuid>,
}

impl Post {
    pub const TITLE_LEN: RangeInclusive<usize> = 5..=100;
    pub const TEXT_LEN: RangeInclusive<usize> = 5..=1000;

    /// Create a new post stamped with the current time. Does not validate.
    pub fn new(title: String, text: String, theme_id: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            text,
            date: clock::now(),
            theme_id,
        }
    }

    /// Check title and text lengths. The theme reference is checked by the store.
    pub fn validate(&self) -> Result<(), DomainError> {
        validation::not_blank("title", &self.title)?;
        validation::length_within("title", &self.title, Self::TITLE_LEN)?;
        validation::not_blank("text", &self.text)?;
        validation::length_within("text", &self.text, Self::TEXT_LEN)?;
        Ok(())
    }

    /// Re-stamp `date` for a write, strictly after `previous`.
    pub fn touch(&mut self, previous: DateTime<Utc>) {
        self.date = clock::advance_past(previous);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(title_len: usize, text_len: usize) -> Post {
        Post::new("t".repeat(title_len), "x".repeat(text_len), None)
    }

    #[test]
    fn test_title_bounds() {
        assert!(post(4, 10).validate().is_err());
        assert!(post(5, 10).validate().is_ok());
        assert!(post(100, 10).validate().is_ok());
        assert!(post(101, 10).validate().is_err());
    }

    #[test]
    fn test_text_bounds() {
        assert!(post(10, 4).validate().is_err());
        assert!(post(10, 5).validate().is_ok());
        assert!(post(10, 1000).validate().is_ok());
        assert!(post(10, 1001).validate().is_err());
    }

    #[test]
    fn test_blank_title_is_rejected() {
        let post = Post::new("       ".to_string(), "valid text".to_string(), None);
        assert!(matches!(post.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_touch_moves_date_forward() {
        let mut post = post(10, 10);
        let before = post.date;
        post.touch(before);
        assert!(post.date > before);
    }
}

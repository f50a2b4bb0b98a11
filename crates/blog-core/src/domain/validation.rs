use std::ops::RangeInclusive;

use crate::error::DomainError;

/// Field must contain something other than whitespace.
pub(crate) fn not_blank(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} must not be blank")));
    }
    Ok(())
}

/// Length in characters, not bytes: "Educação" is 8 long.
pub(crate) fn length_within(
    field: &str,
    value: &str,
    bounds: RangeInclusive<usize>,
) -> Result<(), DomainError> {
    let len = value.chars().count();
    if !bounds.contains(&len) {
        return Err(DomainError::validation(format!(
            "{field} must have between {} and {} characters (got {len})",
            bounds.start(),
            bounds.end()
        )));
    }
    Ok(())
}

pub(crate) fn at_most(field: &str, value: &str, max: usize) -> Result<(), DomainError> {
    length_within(field, value, 0..=max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_counts_characters() {
        assert!(length_within("title", "ação!", 5..=5).is_ok());
        assert!(length_within("title", "ação", 5..=5).is_err());
    }

    #[test]
    fn test_not_blank_rejects_whitespace() {
        assert!(not_blank("name", " \t\n").is_err());
        assert!(not_blank("name", " a ").is_ok());
    }
}

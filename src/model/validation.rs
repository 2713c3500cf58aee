use thiserror::Error;

use super::spec::FieldSpec;

/// A failed validation rule, carrying the user-facing message as `Display`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("This field is required")]
    Required,
    #[error("Must be at least {0} characters long")]
    TooShort(usize),
    #[error("Must not exceed {0} characters")]
    TooLong(usize),
    #[error("{0}")]
    Pattern(&'static str),
    #[error("{0}")]
    WordCount(&'static str),
}

/// Validates a raw field value against its spec.
///
/// The value is trimmed first, and rules apply in strict precedence: required,
/// minimum length, maximum length, pattern, word count. The first failing rule
/// wins, so an empty required field reports "required" and never "too short".
/// Empty optional fields always pass. Lengths count `char`s.
pub fn validate(spec: &FieldSpec, raw: &str) -> Result<(), ValidationError> {
    let value = raw.trim();
    if value.is_empty() {
        return if spec.required {
            Err(ValidationError::Required)
        } else {
            Ok(())
        };
    }

    let len = value.chars().count();
    if let Some(min) = spec.min_len
        && len < min
    {
        return Err(ValidationError::TooShort(min));
    }
    if let Some(max) = spec.max_len
        && len > max
    {
        return Err(ValidationError::TooLong(max));
    }
    if let Some(pattern) = spec.pattern
        && !pattern.regex.is_match(value)
    {
        return Err(ValidationError::Pattern(pattern.message));
    }
    if let Some(rule) = spec.word_rule
        && value.split_whitespace().count() < rule.min_words
    {
        return Err(ValidationError::WordCount(rule.message));
    }
    Ok(())
}

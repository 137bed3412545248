//! Field validation for feedback submissions.
//!
//! Every field is validated independently so all messages can be shown at
//! once. Within a field the first violated rule wins. Lengths are counted in
//! characters after trimming.

use crate::core::email::is_valid_email;
use crate::core::types::{FeedbackInput, Field, FieldErrors, NewFeedback, RATING_MIN, Rating};

pub const NAME_MAX_CHARS: usize = 100;
pub const EMAIL_MAX_CHARS: usize = 255;
pub const COMMENTS_MAX_CHARS: usize = 1000;

pub const NAME_REQUIRED: &str = "Name is required";
pub const NAME_TOO_LONG: &str = "Name must be less than 100 characters";
pub const EMAIL_INVALID: &str = "Invalid email address";
pub const EMAIL_TOO_LONG: &str = "Email must be less than 255 characters";
pub const RATING_REQUIRED: &str = "Please select a rating";
pub const RATING_OUT_OF_RANGE: &str = "Rating must be between 1 and 5";
pub const COMMENTS_TOO_LONG: &str = "Comments must be less than 1000 characters";

/// Validate raw input into a normalized payload.
///
/// Returns every field error on failure; never a partial payload.
pub fn validate(input: &FeedbackInput) -> Result<NewFeedback, FieldErrors> {
    let name = check_name(&input.name);
    let email = check_email(&input.email);
    let rating = check_rating(input.rating);
    let comments = check_comments(input.comments.as_deref());

    match (name, email, rating, comments) {
        (Ok(name), Ok(email), Ok(rating), Ok(comments)) => Ok(NewFeedback {
            name,
            email,
            rating,
            comments,
        }),
        (name, email, rating, comments) => {
            let mut errors = FieldErrors::default();
            if let Err(msg) = name {
                errors.insert(Field::Name, msg);
            }
            if let Err(msg) = email {
                errors.insert(Field::Email, msg);
            }
            if let Err(msg) = rating {
                errors.insert(Field::Rating, msg);
            }
            if let Err(msg) = comments {
                errors.insert(Field::Comments, msg);
            }
            Err(errors)
        }
    }
}

/// Validate a single field, returning its message if invalid.
pub fn validate_field(input: &FeedbackInput, field: Field) -> Option<&'static str> {
    match field {
        Field::Name => check_name(&input.name).err(),
        Field::Email => check_email(&input.email).err(),
        Field::Rating => check_rating(input.rating).err(),
        Field::Comments => check_comments(input.comments.as_deref()).err(),
    }
}

fn check_name(raw: &str) -> Result<String, &'static str> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(NAME_REQUIRED);
    }
    if name.chars().count() > NAME_MAX_CHARS {
        return Err(NAME_TOO_LONG);
    }
    Ok(name.to_string())
}

fn check_email(raw: &str) -> Result<String, &'static str> {
    let email = raw.trim();
    if !is_valid_email(email) {
        return Err(EMAIL_INVALID);
    }
    if email.chars().count() > EMAIL_MAX_CHARS {
        return Err(EMAIL_TOO_LONG);
    }
    Ok(email.to_string())
}

fn check_rating(raw: Option<i64>) -> Result<Rating, &'static str> {
    let value = raw.ok_or(RATING_REQUIRED)?;
    if value < i64::from(RATING_MIN) {
        return Err(RATING_REQUIRED);
    }
    Rating::new(value).ok_or(RATING_OUT_OF_RANGE)
}

/// Empty or whitespace-only comments normalize to `None`.
fn check_comments(raw: Option<&str>) -> Result<Option<String>, &'static str> {
    let comments = raw.map(str::trim).unwrap_or_default();
    if comments.chars().count() > COMMENTS_MAX_CHARS {
        return Err(COMMENTS_TOO_LONG);
    }
    if comments.is_empty() {
        return Ok(None);
    }
    Ok(Some(comments.to_string()))
}

//! Shared types for feedback submissions.
//!
//! These types define the contract between the form, the listing and the
//! store. Wire names match the columns of the remote `feedbacks` table.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lowest selectable rating.
pub const RATING_MIN: u8 = 1;
/// Highest selectable rating.
pub const RATING_MAX: u8 = 5;

/// A form field that can carry a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Email,
    Rating,
    Comments,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Name, Field::Email, Field::Rating, Field::Comments];

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Rating => "rating",
            Field::Comments => "comments",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw form values as entered, before trimming or validation.
///
/// `rating` is `None` until the user picks one; there is no default.
/// `comments` is `None` when the field was omitted entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackInput {
    pub name: String,
    pub email: String,
    pub rating: Option<i64>,
    pub comments: Option<String>,
}

/// A rating in `RATING_MIN..=RATING_MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    /// Returns `None` when `value` is outside the selectable range.
    pub fn new(value: i64) -> Option<Self> {
        if (i64::from(RATING_MIN)..=i64::from(RATING_MAX)).contains(&value) {
            Some(Self(value as u8))
        } else {
            None
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated, normalized payload for a single create call.
///
/// Text fields are trimmed. `comments` is never `Some("")`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFeedback {
    pub name: String,
    pub email: String,
    pub rating: Rating,
    pub comments: Option<String>,
}

/// A stored submission with store-assigned identity and timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub rating: Rating,
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl FeedbackRecord {
    /// Attach store-assigned fields to a validated payload.
    pub fn from_new(id: String, created_at: DateTime<Utc>, feedback: &NewFeedback) -> Self {
        Self {
            id,
            name: feedback.name.clone(),
            email: feedback.email.clone(),
            rating: feedback.rating,
            comments: feedback.comments.clone(),
            created_at,
        }
    }
}

/// Per-field validation messages, at most one per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn remove(&mut self, field: Field) -> Option<String> {
        self.0.remove(&field)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Errors in field order (name, email, rating, comments).
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }
}

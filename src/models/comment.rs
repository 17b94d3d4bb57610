//! Module containing the comment model as served by the storefront and the payloads sent back
use chrono::{DateTime, Utc};
use validator::Validate;

use crate::models::validation_rules::*;
use crate::models::{Locale, Message, ModerationState, UserId};
use crate::models::types::CommentId;

/// Polymorphic reference to the entity being commented on (a product, a blog post, ...)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Commentable {
    pub commentable_type: String,
    pub commentable_id: i32,
}

impl Commentable {
    pub fn new(commentable_type: impl Into<String>, commentable_id: i32) -> Self {
        Self {
            commentable_type: commentable_type.into(),
            commentable_id,
        }
    }
}

/// Denormalized author shown next to a comment
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: UserId,
    #[serde(default)]
    pub name: Option<String>,
}

/// Payload for querying comments
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub body: String,
    #[serde(default)]
    pub parent_id: Option<CommentId>,
    pub author_id: UserId,
    #[serde(default, alias = "user")]
    pub author: Option<Author>,
    pub commentable_id: i32,
    pub commentable_type: String,
    #[serde(default, deserialize_with = "loose::boolean")]
    pub approved: bool,
    #[serde(default, deserialize_with = "loose::boolean")]
    pub seen: bool,
    #[serde(default, deserialize_with = "loose::boolean")]
    pub status: bool,
    #[serde(default, deserialize_with = "loose::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "loose::timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "loose::timestamp")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Comment {
    /// Public threads show a comment only once it is both approved and active
    pub fn is_visible(&self) -> bool {
        self.approved && self.status
    }

    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn commentable(&self) -> Commentable {
        Commentable::new(self.commentable_type.clone(), self.commentable_id)
    }

    /// Author name with a localized fallback for missing or blank names
    pub fn author_name(&self, locale: Locale) -> String {
        self.author
            .as_ref()
            .and_then(|author| author.name.as_ref())
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .map(|name| name.to_string())
            .unwrap_or_else(|| Message::AnonymousAuthor.text(locale).to_string())
    }

    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.author_id == user_id
    }

    pub fn moderation_state(&self) -> ModerationState {
        ModerationState::from(self)
    }

    /// First `len` characters of the body on a single line
    pub fn excerpt(&self, len: usize) -> String {
        let flat = self.body.split_whitespace().collect::<Vec<_>>().join(" ");
        if flat.chars().count() > len {
            let mut cut = flat.chars().take(len).collect::<String>();
            cut.push('…');
            cut
        } else {
            flat
        }
    }
}

/// Payload for creating comments
#[derive(Serialize, Deserialize, Validate, Clone, Debug, PartialEq)]
pub struct NewComment {
    #[validate(custom = "validate_body")]
    pub body: String,
    #[validate(custom = "validate_commentable_type")]
    pub commentable_type: String,
    #[validate(range(min = "1", max = "2147483647"))]
    pub commentable_id: i32,
    pub parent_id: Option<CommentId>,
}

/// Payload for updating comments, absent fields are left untouched
#[derive(Default, Serialize, Deserialize, Validate, Clone, Debug, PartialEq)]
pub struct UpdateComment {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_body")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seen: Option<bool>,
}

impl UpdateComment {
    pub fn is_empty(&self) -> bool {
        self.body.is_none() && self.approved.is_none() && self.status.is_none() && self.seen.is_none()
    }
}

/// Deserializers normalizing the loosely typed fields the storefront emits
mod loose {
    use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
    use serde::de::{self, Deserialize, Deserializer};
    use serde_json::Value;

    const STOREFRONT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    /// Accepts booleans, numbers (zero is false), "0"/"1"/"true"/"false" strings and null
    pub fn boolean<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Bool(value) => Ok(value),
            Value::Number(number) => Ok(number.as_f64().map(|n| n != 0.0).unwrap_or(false)),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "" | "0" | "false" => Ok(false),
                "1" | "true" => Ok(true),
                other => Err(de::Error::custom(format!("Unrecognized boolean value: {}", other))),
            },
            Value::Null => Ok(false),
            other => Err(de::Error::custom(format!("Unexpected value for a boolean flag: {}", other))),
        }
    }

    pub fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(ref s) if s.trim().is_empty() => Ok(None),
            Some(s) => DateTime::parse_from_rfc3339(&s)
                .map(|date| date.with_timezone(&Utc))
                .or_else(|_| NaiveDateTime::parse_from_str(&s, STOREFRONT_TIMESTAMP_FORMAT).map(|naive| Utc.from_utc_datetime(&naive)))
                .map(Some)
                .map_err(|_| de::Error::custom(format!("Unrecognized timestamp: {}", s))),
        }
    }
}

use std::borrow::Cow;
use std::collections::HashMap;

use regex::Regex;
use validator::ValidationError;

/// Maximum number of characters accepted in a comment body
pub const MAX_BODY_LENGTH: usize = 2000;

pub fn validate_not_blank(text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        Err(ValidationError {
            code: Cow::from("blank"),
            message: Some(Cow::from("Value must contain at least one non-whitespace character.")),
            params: HashMap::new(),
        })
    } else {
        Ok(())
    }
}

/// Comment bodies must not be blank and are capped by characters, not bytes
pub fn validate_body(body: &str) -> Result<(), ValidationError> {
    validate_not_blank(body)?;

    if body.chars().count() > MAX_BODY_LENGTH {
        let mut params = HashMap::new();
        params.insert(Cow::from("max"), json!(MAX_BODY_LENGTH));
        Err(ValidationError {
            code: Cow::from("length"),
            message: Some(Cow::from("Comment body is too long.")),
            params,
        })
    } else {
        Ok(())
    }
}

/// Accepts plain morph aliases (`product`) and namespaced model classes (`App\Models\Product`)
pub fn validate_commentable_type(commentable_type: &str) -> Result<(), ValidationError> {
    lazy_static! {
        static ref COMMENTABLE_TYPE_RE: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9_\\]*$").unwrap();
    }

    if COMMENTABLE_TYPE_RE.is_match(commentable_type) {
        Ok(())
    } else {
        Err(ValidationError {
            code: Cow::from("commentable_type"),
            message: Some(Cow::from("Incorrect commentable type format")),
            params: HashMap::new(),
        })
    }
}

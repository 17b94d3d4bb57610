use std::collections::HashMap;

use failure::Error as FailureError;
use validator::ValidationErrors;

use crate::models::{Locale, Message};

/// Field errors reported by the storefront, first message per field
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldErrors(pub HashMap<String, String>);

impl FieldErrors {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(|s| s.as_str())
    }
}

#[derive(Debug, Fail)]
pub enum Error {
    #[fail(display = "Validation error: {}", _0)]
    Validate(ValidationErrors),
    #[fail(display = "Rejected by server: {:?}", _0)]
    Rejected(FieldErrors),
    #[fail(display = "Request already in flight")]
    Busy,
    #[fail(display = "Nothing is selected")]
    EmptySelection,
    #[fail(display = "Action was not confirmed")]
    NotConfirmed,
    #[fail(display = "Server is refusing to fullfil the request")]
    Forbidden,
    #[fail(display = "Not found")]
    NotFound,
    #[fail(display = "Server responded with {}: {}", _0, _1)]
    Api(u16, String),
    #[fail(display = "Network error: {}", _0)]
    Network(String),
    #[fail(display = "Parse error: {}", _0)]
    Parse(String),
}

impl Error {
    /// Message shown to the user when the error surfaces as a notification
    pub fn message(&self) -> Message {
        match *self {
            Error::Validate(_) => Message::InvalidBody,
            Error::EmptySelection => Message::SelectAtLeastOne,
            Error::Forbidden => Message::NotAllowed,
            Error::NotFound => Message::NotFound,
            Error::Busy => Message::Submitting,
            Error::Rejected(_) | Error::NotConfirmed | Error::Api(..) | Error::Network(_) | Error::Parse(_) => Message::GenericFailure,
        }
    }
}

/// Finds the kind of the error anywhere in the context chain
pub fn kind_of(err: &FailureError) -> Option<&Error> {
    err.iter_chain().filter_map(|cause| cause.downcast_ref::<Error>()).next()
}

/// Localized text for an error that reached the controller layer
pub fn describe(err: &FailureError, locale: Locale) -> &'static str {
    kind_of(err).map(Error::message).unwrap_or(Message::GenericFailure).text(locale)
}

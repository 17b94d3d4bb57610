//! Non-blocking notifications (toasts) produced by panel actions
use std::fmt;

use crate::models::{Locale, Message};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Info,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub text: String,
}

impl Notification {
    pub fn success(message: Message, locale: Locale) -> Self {
        Self {
            kind: NotificationKind::Success,
            text: message.text(locale).to_string(),
        }
    }

    pub fn info(message: Message, locale: Locale) -> Self {
        Self {
            kind: NotificationKind::Info,
            text: message.text(locale).to_string(),
        }
    }

    pub fn error(message: Message, locale: Locale) -> Self {
        Self {
            kind: NotificationKind::Error,
            text: message.text(locale).to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NotificationKind::Error
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let marker = match self.kind {
            NotificationKind::Success => "✔",
            NotificationKind::Info => "ℹ",
            NotificationKind::Error => "✘",
        };
        write!(f, "{} {}", marker, self.text)
    }
}

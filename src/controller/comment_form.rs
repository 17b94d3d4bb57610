//! Comment form, collects a new comment or a reply and queues it for moderation
use std::collections::HashMap;

use failure::Error as FailureError;
use futures::Future;
use uuid::Uuid;
use validator::Validate;

use crate::errors::{self, Error};
use crate::models::*;
use crate::services::CommentsService;

pub const BODY_FIELD: &str = "body";

#[derive(Clone, Debug)]
pub struct CommentForm {
    body: String,
    target: Commentable,
    parent_id: Option<CommentId>,
    errors: HashMap<&'static str, String>,
    busy: bool,
    idempotency_key: Option<Uuid>,
}

impl CommentForm {
    /// Form for a new top-level comment
    pub fn new(target: Commentable) -> Self {
        Self {
            body: String::new(),
            target,
            parent_id: None,
            errors: HashMap::new(),
            busy: false,
            idempotency_key: None,
        }
    }

    /// Form for a reply to `parent_id`
    pub fn reply(target: Commentable, parent_id: CommentId) -> Self {
        Self {
            parent_id: Some(parent_id),
            ..Self::new(target)
        }
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Input is capped, characters past the limit are dropped
    pub fn set_body(&mut self, body: &str) {
        self.body = body.chars().take(MAX_BODY_LENGTH).collect();
        self.errors.remove(BODY_FIELD);
    }

    pub fn remaining_chars(&self) -> usize {
        MAX_BODY_LENGTH - self.body.chars().count()
    }

    pub fn target(&self) -> &Commentable {
        &self.target
    }

    pub fn parent_id(&self) -> Option<CommentId> {
        self.parent_id
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Inline error next to a field
    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(|s| s.as_str())
    }

    /// Label of the submit control
    pub fn submit_label(&self, locale: Locale) -> &'static str {
        if self.busy {
            Message::Submitting.text(locale)
        } else {
            match locale {
                Locale::Persian => "ارسال دیدگاه",
                Locale::English => "Submit",
            }
        }
    }

    /// Validates the form and marks it busy. The idempotency key is kept across failed attempts.
    pub fn begin_submit(&mut self, locale: Locale) -> Result<(NewComment, Uuid), FailureError> {
        if self.busy {
            return Err(Error::Busy.into());
        }

        let payload = NewComment {
            body: self.body.trim().to_string(),
            commentable_type: self.target.commentable_type.clone(),
            commentable_id: self.target.commentable_id,
            parent_id: self.parent_id,
        };
        if let Err(e) = payload.validate() {
            let message = if self.body.trim().is_empty() {
                Message::EmptyBody
            } else if self.body.chars().count() > MAX_BODY_LENGTH {
                Message::BodyTooLong
            } else {
                Message::InvalidBody
            };
            self.errors.insert(BODY_FIELD, message.text(locale).to_string());
            return Err(Error::Validate(e).into());
        }

        self.errors.clear();
        self.busy = true;
        let key = *self.idempotency_key.get_or_insert_with(Uuid::new_v4);
        Ok((payload, key))
    }

    /// Settles a submission started with `begin_submit`. Returns the notification to show,
    /// `None` when the failure is displayed inline instead.
    pub fn finish_submit(&mut self, result: Result<(), FailureError>, locale: Locale) -> Option<Notification> {
        self.busy = false;
        match result {
            Ok(()) => {
                self.body.clear();
                self.errors.clear();
                self.idempotency_key = None;
                Some(Notification::success(Message::SubmittedForModeration, locale))
            }
            Err(e) => {
                let field_error = match errors::kind_of(&e) {
                    Some(Error::Rejected(field_errors)) => field_errors.get(BODY_FIELD).map(|s| s.to_string()),
                    _ => None,
                };
                match field_error {
                    Some(message) => {
                        self.errors.insert(BODY_FIELD, message);
                        None
                    }
                    None => {
                        error!("Comment submission failed: {}", e);
                        Some(Notification::error(Message::GenericFailure, locale))
                    }
                }
            }
        }
    }

    /// Runs one submission attempt, `on_success` is invoked once the comment is queued
    pub fn submit<F: FnOnce()>(&mut self, service: &dyn CommentsService, locale: Locale, on_success: F) -> Option<Notification> {
        let (payload, key) = match self.begin_submit(locale) {
            Ok(submission) => submission,
            Err(e) => {
                debug!("Comment submission blocked: {}", e);
                return None;
            }
        };

        let result = service.create(payload, key).wait();
        let succeeded = result.is_ok();
        let notification = self.finish_submit(result, locale);
        if succeeded {
            on_success();
        }
        notification
    }
}

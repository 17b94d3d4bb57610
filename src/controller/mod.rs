//! `Controller` is a top layer that holds the state of the comment panels
//! (threads, forms, the moderation console) and turns user actions into
//! `Service` calls. Outcomes are reported as localized notifications,
//! the panels never block on a failed request.

pub mod comment_form;
pub mod context;
pub mod edit_dialog;
pub mod moderation;
pub mod own_comments;
pub mod thread;

pub use self::comment_form::CommentForm;
pub use self::context::*;
pub use self::edit_dialog::EditDialog;
pub use self::moderation::ModerationConsole;
pub use self::own_comments::OwnComments;
pub use self::thread::{CommentThread, ThreadView};

/// Interactive yes/no prompt shown before destructive actions
pub trait Confirm {
    fn confirm(&self, question: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, question: &str) -> bool {
        self(question)
    }
}

//! User panel listing the comments written by the signed in viewer
use failure::Error as FailureError;
use futures::Future;

use super::context::{DynamicContext, Viewer};
use super::Confirm;
use crate::errors::Error;
use crate::models::*;
use crate::services::CommentsService;

pub struct OwnComments {
    context: DynamicContext,
    page: Page<Comment>,
}

impl OwnComments {
    pub fn new(context: DynamicContext) -> Self {
        Self {
            context,
            page: Page::default(),
        }
    }

    pub fn page(&self) -> &Page<Comment> {
        &self.page
    }

    /// Loads one page of the viewer's comments
    pub fn load(&mut self, service: &dyn CommentsService, page: u32) -> Result<(), FailureError> {
        let filter = CommentsFilter::for_user(self.viewer()?.id).with_page(page);
        self.page = service.list(filter).wait()?;
        Ok(())
    }

    /// Replaces the body of an own comment, the comment goes back to moderation on the server
    pub fn edit(&mut self, service: &dyn CommentsService, comment_id: CommentId, body: &str) -> Result<Notification, FailureError> {
        self.check_access(comment_id)?;
        let payload = UpdateComment {
            body: Some(body.trim().to_string()),
            ..Default::default()
        };
        service.update(comment_id, payload).wait()?;
        self.reload(service)?;
        Ok(Notification::success(Message::CommentUpdated, self.context.locale))
    }

    pub fn delete(&mut self, service: &dyn CommentsService, comment_id: CommentId, confirm: &dyn Confirm) -> Result<Notification, FailureError> {
        self.check_access(comment_id)?;
        if !confirm.confirm(Message::ConfirmDelete.text(self.context.locale)) {
            return Err(Error::NotConfirmed.into());
        }
        service.delete(comment_id).wait()?;
        self.reload(service)?;
        Ok(Notification::success(Message::CommentDeleted, self.context.locale))
    }

    pub fn render(&self) -> String {
        let locale = self.context.locale;
        if self.page.is_empty() {
            return format!("{}\n", Message::NoComments.text(locale));
        }
        self.page
            .data
            .iter()
            .map(|comment| {
                let approval = if comment.approved { Message::Approved } else { Message::Unapproved };
                format!("#{} {}: {}\n", comment.id, approval.text(locale), comment.body)
            })
            .collect()
    }

    fn reload(&mut self, service: &dyn CommentsService) -> Result<(), FailureError> {
        let page = self.page.current_page;
        self.load(service, page)
    }

    fn viewer(&self) -> Result<&Viewer, FailureError> {
        self.context.viewer.as_ref().ok_or_else(|| Error::Forbidden.into())
    }

    fn check_access(&self, comment_id: CommentId) -> Result<(), FailureError> {
        self.viewer()?;
        let comment = self
            .page
            .data
            .iter()
            .find(|comment| comment.id == comment_id)
            .ok_or_else(|| FailureError::from(Error::NotFound))?;
        if self.context.can_modify(comment) {
            Ok(())
        } else {
            warn!("Viewer tried to modify comment {} of user {}.", comment.id, comment.author_id);
            Err(Error::Forbidden.into())
        }
    }
}

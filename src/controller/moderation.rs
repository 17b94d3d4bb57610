//! Moderation console, the admin table of comments with filters, selection and bulk actions.
//!
//! The console never patches its rows in place. Every successful mutation is
//! followed by a refresh of the current page, so what is shown is always what
//! the storefront returned last.
use std::collections::BTreeSet;

use failure::Error as FailureError;
use futures::Future;

use super::context::DynamicContext;
use super::edit_dialog::EditDialog;
use super::Confirm;
use crate::errors::{self, Error};
use crate::models::*;
use crate::services::CommentsService;

const EXCERPT_LENGTH: usize = 40;

pub struct ModerationConsole {
    context: DynamicContext,
    filter: CommentsFilter,
    page: Page<Comment>,
    selected: BTreeSet<CommentId>,
    edit: Option<EditDialog>,
}

impl ModerationConsole {
    pub fn new(context: DynamicContext) -> Self {
        Self {
            context,
            filter: CommentsFilter::default(),
            page: Page::default(),
            selected: BTreeSet::new(),
            edit: None,
        }
    }

    pub fn filter(&self) -> &CommentsFilter {
        &self.filter
    }

    pub fn page(&self) -> &Page<Comment> {
        &self.page
    }

    pub fn selected(&self) -> Vec<CommentId> {
        self.selected.iter().cloned().collect()
    }

    pub fn is_selected(&self, comment_id: CommentId) -> bool {
        self.selected.contains(&comment_id)
    }

    pub fn edit_dialog(&self) -> Option<&EditDialog> {
        self.edit.as_ref()
    }

    pub fn edit_dialog_mut(&mut self) -> Option<&mut EditDialog> {
        self.edit.as_mut()
    }

    /// Re-fetches the current page with the current filters. When removals shrank
    /// the listing below the current page, moves back to the new last page.
    pub fn refresh(&mut self, service: &dyn CommentsService) -> Result<(), FailureError> {
        let mut page = service.list(self.filter.clone()).wait()?;
        if page.data.is_empty() && page.current_page > page.last_page.max(1) {
            debug!("Page {} is past the last page {}, moving back.", page.current_page, page.last_page);
            self.filter = self.filter.with_page(page.last_page.max(1));
            page = service.list(self.filter.clone()).wait()?;
        }
        let visible = page.data.iter().map(|comment| comment.id).collect::<BTreeSet<_>>();
        self.selected = self.selected.intersection(&visible).cloned().collect();
        self.page = page;
        Ok(())
    }

    /// New filters start from the first page with nothing selected
    pub fn apply_filter(&mut self, service: &dyn CommentsService, filter: CommentsFilter) -> Result<(), FailureError> {
        self.filter = filter.with_page(1);
        self.selected.clear();
        self.refresh(service)
    }

    /// Moves to another page keeping the filters, out of range pages are clamped
    pub fn go_to_page(&mut self, service: &dyn CommentsService, page: u32) -> Result<(), FailureError> {
        let page = self.page.clamp(page);
        self.filter = self.filter.with_page(page);
        self.selected.clear();
        self.refresh(service)
    }

    /// Flips selection of a row on the current page, returns whether it is selected now
    pub fn toggle_select(&mut self, comment_id: CommentId) -> bool {
        if self.selected.remove(&comment_id) {
            return false;
        }
        if self.page.data.iter().any(|comment| comment.id == comment_id) {
            self.selected.insert(comment_id);
            true
        } else {
            false
        }
    }

    /// Selects every visible row unless all of them are already selected, then clears
    pub fn toggle_select_all(&mut self) {
        let visible = self.page.data.iter().map(|comment| comment.id).collect::<BTreeSet<_>>();
        if !visible.is_empty() && visible.is_subset(&self.selected) {
            self.selected.clear();
        } else {
            self.selected = visible;
        }
    }

    /// Applies one action to all selected rows. Returns `None` when a delete was declined.
    pub fn bulk(&mut self, service: &dyn CommentsService, action: BulkAction, confirm: &dyn Confirm) -> Option<Notification> {
        let locale = self.context.locale;
        if self.selected.is_empty() {
            return Some(Notification::info(Message::SelectAtLeastOne, locale));
        }
        if action == BulkAction::Delete && !confirm.confirm(Message::ConfirmBulkDelete.text(locale)) {
            debug!("Bulk delete of {} comments declined.", self.selected.len());
            return None;
        }

        let payload = BulkUpdate {
            ids: self.selected(),
            action,
        };
        match service.bulk_update(payload).wait() {
            Ok(()) => {
                self.selected.clear();
                Some(self.after_mutation(service, Message::BulkApplied))
            }
            Err(e) => Some(self.failure(e)),
        }
    }

    /// Opens the edit dialog for a row on the current page
    pub fn open_edit(&mut self, comment_id: CommentId) -> Result<(), FailureError> {
        let dialog = EditDialog::open(self.find(comment_id)?);
        self.edit = Some(dialog);
        Ok(())
    }

    pub fn close_edit(&mut self) {
        self.edit = None;
    }

    /// Saves the open dialog. Validation errors stay inline in the dialog and return `None`.
    pub fn save_edit(&mut self, service: &dyn CommentsService) -> Option<Notification> {
        let locale = self.context.locale;
        let (comment_id, changes, blank) = match self.edit {
            Some(ref dialog) => (dialog.comment_id, dialog.changes(), dialog.body.trim().is_empty()),
            None => return None,
        };
        if changes.is_empty() {
            debug!("Edit of comment {} has no changes.", comment_id);
            self.edit = None;
            return None;
        }

        match service.update(comment_id, changes).wait() {
            Ok(()) => {
                self.edit = None;
                Some(self.after_mutation(service, Message::CommentUpdated))
            }
            Err(e) => {
                let inline = match errors::kind_of(&e) {
                    Some(Error::Validate(_)) if blank => Some(Message::EmptyBody.text(locale).to_string()),
                    Some(Error::Validate(_)) => Some(Message::InvalidBody.text(locale).to_string()),
                    Some(Error::Rejected(field_errors)) => field_errors.get("body").map(|s| s.to_string()),
                    _ => None,
                };
                match inline {
                    Some(message) => {
                        if let Some(ref mut dialog) = self.edit {
                            dialog.error = Some(message);
                        }
                        None
                    }
                    None => Some(self.failure(e)),
                }
            }
        }
    }

    /// Deletes one comment after confirmation, `None` when declined
    pub fn delete(&mut self, service: &dyn CommentsService, comment_id: CommentId, confirm: &dyn Confirm) -> Option<Notification> {
        let locale = self.context.locale;
        if !confirm.confirm(Message::ConfirmDelete.text(locale)) {
            return None;
        }
        match service.delete(comment_id).wait() {
            Ok(()) => {
                self.selected.remove(&comment_id);
                Some(self.after_mutation(service, Message::CommentDeleted))
            }
            Err(e) => Some(self.failure(e)),
        }
    }

    pub fn toggle_approval(&mut self, service: &dyn CommentsService, comment_id: CommentId) -> Notification {
        let state = match self.find(comment_id) {
            Ok(comment) => comment.moderation_state(),
            Err(e) => return self.failure(e),
        };
        let approved = match state.toggle_approval_action().map(|action| state.apply(action)) {
            Some(Ok(ModerationState::Active { approved, .. })) => approved,
            Some(Ok(ModerationState::Removed)) | None => return self.failure(Error::NotFound.into()),
            Some(Err(e)) => return self.failure(e.into()),
        };
        self.update(
            service,
            comment_id,
            UpdateComment {
                approved: Some(approved),
                ..Default::default()
            },
        )
    }

    /// Flips the active flag, inactive comments are hidden from public threads
    pub fn toggle_status(&mut self, service: &dyn CommentsService, comment_id: CommentId) -> Notification {
        let status = match self.find(comment_id) {
            Ok(comment) => comment.status,
            Err(e) => return self.failure(e),
        };
        self.update(
            service,
            comment_id,
            UpdateComment {
                status: Some(!status),
                ..Default::default()
            },
        )
    }

    pub fn mark_seen(&mut self, service: &dyn CommentsService, comment_id: CommentId) -> Notification {
        let applied = self
            .find(comment_id)
            .and_then(|comment| comment.moderation_state().apply(BulkAction::MarkSeen).map_err(From::from));
        if let Err(e) = applied {
            return self.failure(e);
        }
        self.update(
            service,
            comment_id,
            UpdateComment {
                seen: Some(true),
                ..Default::default()
            },
        )
    }

    pub fn render(&self) -> String {
        let locale = self.context.locale;
        let mut out = String::new();
        if self.page.is_empty() {
            out.push_str(Message::NoComments.text(locale));
            out.push('\n');
        }
        for comment in &self.page.data {
            let marker = if self.is_selected(comment.id) { "[x]" } else { "[ ]" };
            let approval = if comment.approved { Message::Approved } else { Message::Unapproved };
            let seen = if comment.seen { Message::Seen } else { Message::Unseen };
            let status = if comment.status { Message::Active } else { Message::Inactive };
            out.push_str(&format!(
                "{} #{} {} | {} | {}, {}, {}\n",
                marker,
                comment.id,
                comment.author_name(locale),
                comment.excerpt(EXCERPT_LENGTH),
                approval.text(locale),
                seen.text(locale),
                status.text(locale),
            ));
        }

        let links = self
            .page
            .links()
            .into_iter()
            .map(|link| if link.active { format!("[{}]", link.number) } else { link.number.to_string() })
            .collect::<Vec<_>>();
        let previous = if self.page.has_previous() { "« " } else { "" };
        let next = if self.page.has_next() { " »" } else { "" };
        out.push_str(&format!("{}{}{} ({})\n", previous, links.join(" "), next, self.page.total));
        out
    }

    fn find(&self, comment_id: CommentId) -> Result<&Comment, FailureError> {
        self.page
            .data
            .iter()
            .find(|comment| comment.id == comment_id)
            .ok_or_else(|| Error::NotFound.into())
    }

    fn update(&mut self, service: &dyn CommentsService, comment_id: CommentId, payload: UpdateComment) -> Notification {
        match service.update(comment_id, payload).wait() {
            Ok(()) => self.after_mutation(service, Message::CommentUpdated),
            Err(e) => self.failure(e),
        }
    }

    fn after_mutation(&mut self, service: &dyn CommentsService, message: Message) -> Notification {
        let locale = self.context.locale;
        match self.refresh(service) {
            Ok(()) => Notification::success(message, locale),
            Err(e) => self.failure(e),
        }
    }

    fn failure(&self, e: FailureError) -> Notification {
        error!("Moderation action failed: {}", e);
        let locale = self.context.locale;
        Notification {
            kind: NotificationKind::Error,
            text: errors::describe(&e, locale).to_string(),
        }
    }
}

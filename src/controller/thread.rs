//! Comment thread, a two level view of the approved comments of one commentable
use std::collections::HashSet;

use failure::Error as FailureError;
use futures::Future;

use super::comment_form::{CommentForm, BODY_FIELD};
use super::context::DynamicContext;
use crate::errors::Error;
use crate::models::*;
use crate::services::CommentsService;

/// Visible comments of one commentable split into top-level comments and their replies
#[derive(Clone, Debug, Default)]
pub struct CommentThread {
    visible: Vec<Comment>,
}

impl CommentThread {
    /// Keeps approved and active comments in the order they were received
    pub fn build(comments: &[Comment]) -> Self {
        Self {
            visible: comments.iter().filter(|comment| comment.is_visible()).cloned().collect(),
        }
    }

    pub fn top_level(&self) -> Vec<&Comment> {
        self.visible.iter().filter(|comment| comment.is_top_level()).collect()
    }

    pub fn replies(&self, parent_id: CommentId) -> Vec<&Comment> {
        self.visible.iter().filter(|comment| comment.parent_id == Some(parent_id)).collect()
    }

    pub fn find_top_level(&self, comment_id: CommentId) -> Option<&Comment> {
        self.visible.iter().find(|comment| comment.id == comment_id && comment.is_top_level())
    }

    pub fn is_empty(&self) -> bool {
        self.top_level().is_empty()
    }
}

/// Thread together with its interaction state. Nothing here is persisted.
pub struct ThreadView {
    context: DynamicContext,
    commentable: Commentable,
    thread: CommentThread,
    expanded: HashSet<CommentId>,
    replying_to: Option<CommentId>,
    reply_form: Option<CommentForm>,
    comment_form: CommentForm,
}

impl ThreadView {
    pub fn new(comments: &[Comment], commentable: Commentable, context: DynamicContext) -> Self {
        Self {
            context,
            thread: CommentThread::build(comments),
            comment_form: CommentForm::new(commentable.clone()),
            commentable,
            expanded: HashSet::new(),
            replying_to: None,
            reply_form: None,
        }
    }

    /// Replaces the comments with fresh page data, view state is kept
    pub fn reload(&mut self, comments: &[Comment]) {
        self.thread = CommentThread::build(comments);
    }

    /// Fetches every page of comments of the commentable from the storefront.
    /// Rows shifted onto a later page between requests are kept once.
    pub fn fetch(&mut self, service: &dyn CommentsService) -> Result<(), FailureError> {
        let filter = CommentsFilter::for_commentable(self.commentable.clone());
        let mut comments: Vec<Comment> = vec![];
        let mut seen = HashSet::new();
        let mut page_number = 1;
        loop {
            let page = service.list(filter.with_page(page_number)).wait()?;
            for comment in page.data {
                if seen.insert(comment.id) {
                    comments.push(comment);
                }
            }
            if page_number >= page.last_page {
                break;
            }
            page_number += 1;
        }
        debug!("Fetched {} comments of {} {} in {} pages.", comments.len(), self.commentable.commentable_type, self.commentable.commentable_id, page_number);
        self.reload(&comments);
        Ok(())
    }

    pub fn thread(&self) -> &CommentThread {
        &self.thread
    }

    pub fn commentable(&self) -> &Commentable {
        &self.commentable
    }

    pub fn is_expanded(&self, comment_id: CommentId) -> bool {
        self.expanded.contains(&comment_id)
    }

    /// Flips expand state of one comment, returns the new state
    pub fn toggle(&mut self, comment_id: CommentId) -> bool {
        if self.expanded.remove(&comment_id) {
            false
        } else {
            self.expanded.insert(comment_id);
            true
        }
    }

    pub fn expand_all(&mut self) {
        let ids = self.thread.top_level().iter().map(|comment| comment.id).collect::<Vec<_>>();
        self.expanded.extend(ids);
    }

    pub fn replying_to(&self) -> Option<CommentId> {
        self.replying_to
    }

    /// Opens the reply form under a top-level comment, closing any other reply form
    pub fn open_reply(&mut self, comment_id: CommentId) -> Result<(), FailureError> {
        if self.thread.find_top_level(comment_id).is_none() {
            return Err(Error::NotFound.into());
        }
        self.replying_to = Some(comment_id);
        self.reply_form = Some(CommentForm::reply(self.commentable.clone(), comment_id));
        Ok(())
    }

    pub fn close_reply(&mut self) {
        self.replying_to = None;
        self.reply_form = None;
    }

    pub fn reply_form_mut(&mut self) -> Option<&mut CommentForm> {
        self.reply_form.as_mut()
    }

    pub fn comment_form(&self) -> &CommentForm {
        &self.comment_form
    }

    pub fn comment_form_mut(&mut self) -> &mut CommentForm {
        &mut self.comment_form
    }

    /// Submits the open reply form, the form is closed once the reply is queued
    pub fn submit_reply(&mut self, service: &dyn CommentsService) -> Option<Notification> {
        let locale = self.context.locale;
        let mut succeeded = false;
        let notification = match self.reply_form {
            Some(ref mut form) => form.submit(service, locale, || succeeded = true),
            None => return None,
        };
        if succeeded {
            self.close_reply();
        }
        notification
    }

    pub fn submit_comment(&mut self, service: &dyn CommentsService) -> Option<Notification> {
        let locale = self.context.locale;
        self.comment_form.submit(service, locale, || ())
    }

    pub fn render(&self) -> String {
        let locale = self.context.locale;
        let mut out = String::new();

        let top_level = self.thread.top_level();
        if top_level.is_empty() {
            out.push_str(Message::NoComments.text(locale));
            out.push('\n');
            out.push_str(Message::BeFirstToComment.text(locale));
            out.push('\n');
            out.push_str(&render_form(&self.comment_form, ""));
            return out;
        }

        for comment in top_level {
            out.push_str(&self.render_comment(comment, ""));
            let replies = self.thread.replies(comment.id);
            if !replies.is_empty() {
                let marker = if self.is_expanded(comment.id) { "[-]" } else { "[+]" };
                out.push_str(&format!("  {} {} {}\n", marker, replies.len(), Message::Replies.text(locale)));
                if self.is_expanded(comment.id) {
                    for reply in replies {
                        out.push_str(&self.render_comment(reply, "    ↳ "));
                    }
                }
            }
            if self.replying_to == Some(comment.id) {
                if let Some(ref form) = self.reply_form {
                    out.push_str(&render_form(form, "    "));
                }
            }
        }
        out.push_str(&render_form(&self.comment_form, ""));
        out
    }

    fn render_comment(&self, comment: &Comment, indent: &str) -> String {
        let locale = self.context.locale;
        let date = comment
            .created_at
            .map(|date| date.format(" (%Y-%m-%d)").to_string())
            .unwrap_or_default();
        let editable = if self.context.can_modify(comment) { " ✎" } else { "" };
        format!("{}#{} {}{}{}: {}\n", indent, comment.id, comment.author_name(locale), date, editable, comment.body)
    }
}

fn render_form(form: &CommentForm, indent: &str) -> String {
    let mut out = format!("{}> {}\n", indent, form.body());
    if let Some(error) = form.error(BODY_FIELD) {
        out.push_str(&format!("{}! {}\n", indent, error));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::context::Viewer;
    use crate::providers::tests::*;
    use crate::services::tests::create_service;

    fn ids(comments: Vec<&Comment>) -> Vec<i32> {
        comments.into_iter().map(|comment| comment.id.0).collect()
    }

    fn create_view(comments: &[Comment]) -> ThreadView {
        ThreadView::new(comments, Commentable::new("product", 12), DynamicContext::default())
    }

    #[test]
    fn test_partition_example() {
        let comments = vec![
            create_comment(1, None, true, true),
            create_comment(2, Some(1), true, true),
            create_comment(3, None, false, true),
        ];
        let thread = CommentThread::build(&comments);
        assert_eq!(ids(thread.top_level()), vec![1]);
        assert_eq!(ids(thread.replies(CommentId(1))), vec![2]);
        assert!(thread.find_top_level(CommentId(3)).is_none());
    }

    #[test]
    fn test_partition_keeps_order_and_drops_inactive() {
        let comments = vec![
            create_comment(5, None, true, true),
            create_comment(9, Some(5), true, true),
            create_comment(2, None, true, false),
            create_comment(7, Some(5), true, true),
            create_comment(8, Some(5), false, true),
            create_comment(4, None, true, true),
            create_comment(6, Some(2), true, true),
        ];
        let thread = CommentThread::build(&comments);
        assert_eq!(ids(thread.top_level()), vec![5, 4]);
        assert_eq!(ids(thread.replies(CommentId(5))), vec![9, 7]);
        assert!(thread.replies(CommentId(4)).is_empty());
    }

    #[test]
    fn test_nested_replies_are_not_rendered() {
        let comments = vec![
            create_comment(1, None, true, true),
            create_comment(2, Some(1), true, true),
            create_comment(3, Some(2), true, true),
        ];
        let mut view = create_view(&comments);
        view.expand_all();
        let rendered = view.render();
        assert!(rendered.contains("#2 "));
        assert!(!rendered.contains("#3 "));
        assert!(view.open_reply(CommentId(2)).is_err());
    }

    #[test]
    fn test_toggle_is_independent() {
        let comments = vec![create_comment(1, None, true, true), create_comment(2, None, true, true)];
        let mut view = create_view(&comments);
        assert!(!view.is_expanded(CommentId(1)));
        assert!(view.toggle(CommentId(1)));
        assert!(view.is_expanded(CommentId(1)));
        assert!(!view.is_expanded(CommentId(2)));
        assert!(!view.toggle(CommentId(1)));
        assert!(!view.is_expanded(CommentId(1)));
    }

    #[test]
    fn test_single_reply_slot() {
        let comments = vec![create_comment(1, None, true, true), create_comment(2, None, true, true)];
        let mut view = create_view(&comments);
        view.open_reply(CommentId(1)).unwrap();
        view.reply_form_mut().unwrap().set_body("draft");
        view.open_reply(CommentId(2)).unwrap();
        assert_eq!(view.replying_to(), Some(CommentId(2)));
        assert_eq!(view.reply_form_mut().unwrap().body(), "");
        assert_eq!(view.reply_form_mut().unwrap().parent_id(), Some(CommentId(2)));
        assert!(view.open_reply(CommentId(42)).is_err());
        assert_eq!(view.replying_to(), Some(CommentId(2)));
    }

    #[test]
    fn test_successful_reply_closes_slot() {
        let provider = CommentsProviderMock::default();
        let service = create_service(provider.clone());
        let mut view = create_view(&[create_comment(1, None, true, true)]);
        view.open_reply(CommentId(1)).unwrap();
        view.reply_form_mut().unwrap().set_body("پاسخ");
        let notification = view.submit_reply(&service).unwrap();
        assert!(!notification.is_error());
        assert_eq!(view.replying_to(), None);
        assert_eq!(provider.mutations().len(), 1);
    }

    #[test]
    fn test_failed_reply_keeps_slot() {
        let provider = CommentsProviderMock::default();
        provider.fail_with(Some(MockFailure::Network));
        let service = create_service(provider.clone());
        let mut view = create_view(&[create_comment(1, None, true, true)]);
        view.open_reply(CommentId(1)).unwrap();
        view.reply_form_mut().unwrap().set_body("پاسخ");
        assert!(view.submit_reply(&service).unwrap().is_error());
        assert_eq!(view.replying_to(), Some(CommentId(1)));
        assert_eq!(view.reply_form_mut().unwrap().body(), "پاسخ");
    }

    #[test]
    fn test_empty_state() {
        let view = create_view(&[create_comment(1, None, false, true)]);
        assert!(view.thread().is_empty());
        let rendered = view.render();
        assert!(rendered.contains(Message::NoComments.text(Locale::Persian)));
        assert!(rendered.contains(Message::BeFirstToComment.text(Locale::Persian)));
    }

    #[test]
    fn test_render_marks_own_comments_and_missing_authors() {
        let mut mine = create_comment(1, None, true, true);
        mine.author = None;
        let mut theirs = create_comment(2, None, true, true);
        theirs.author_id = UserId(99);
        let context = DynamicContext::new(
            Some(Viewer {
                id: MOCK_VIEWER_ID,
                name: None,
                is_admin: false,
            }),
            Locale::English,
        );
        let view = ThreadView::new(&[mine, theirs], Commentable::new("product", 12), context);
        let rendered = view.render();
        assert!(rendered.contains("#1 Anonymous user ✎: comment 1"));
        assert!(rendered.contains("#2 Sara: comment 2"));
    }

    #[test]
    fn test_fetch_uses_commentable_filter() {
        let provider = CommentsProviderMock::with_comments(vec![create_comment(1, None, true, true)]);
        let service = create_service(provider.clone());
        let mut view = create_view(&[]);
        view.fetch(&service).unwrap();
        assert_eq!(ids(view.thread().top_level()), vec![1]);
        let filter = CommentsFilter::for_commentable(Commentable::new("product", 12));
        assert_eq!(
            provider.calls(),
            vec![
                ProviderCall::List(filter.with_page(1)),
                ProviderCall::List(filter.with_page(2)),
                ProviderCall::List(filter.with_page(3)),
            ]
        );
    }

    #[test]
    fn test_empty_state_shows_comment_form() {
        let provider = CommentsProviderMock::default();
        let service = create_service(provider.clone());
        let mut view = create_view(&[]);
        view.comment_form_mut().set_body("   ");
        assert!(view.submit_comment(&service).is_none());

        let rendered = view.render();
        assert!(rendered.contains(Message::BeFirstToComment.text(Locale::Persian)));
        assert!(rendered.contains(&format!("! {}", Message::EmptyBody.text(Locale::Persian))));

        view.comment_form_mut().set_body("اولین دیدگاه");
        assert!(view.render().contains("> اولین دیدگاه"));
        assert!(provider.calls().is_empty());
    }
}

//! Moderation filters, bulk actions and the administrative status of a single comment
use std::fmt;
use std::str::FromStr;

use validator::Validate;

use crate::models::{Comment, CommentId, Commentable, UserId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalFilter {
    All,
    Approved,
    Unapproved,
}

impl Default for ApprovalFilter {
    fn default() -> Self {
        ApprovalFilter::All
    }
}

impl ApprovalFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            ApprovalFilter::All => "all",
            ApprovalFilter::Approved => "approved",
            ApprovalFilter::Unapproved => "unapproved",
        }
    }

    pub fn matches(self, comment: &Comment) -> bool {
        match self {
            ApprovalFilter::All => true,
            ApprovalFilter::Approved => comment.approved,
            ApprovalFilter::Unapproved => !comment.approved,
        }
    }
}

impl FromStr for ApprovalFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_ref() {
            "" | "all" => Ok(ApprovalFilter::All),
            "approved" => Ok(ApprovalFilter::Approved),
            "unapproved" => Ok(ApprovalFilter::Unapproved),
            other => Err(format!("Unknown approval filter: {}", other)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeenFilter {
    All,
    Seen,
    Unseen,
}

impl Default for SeenFilter {
    fn default() -> Self {
        SeenFilter::All
    }
}

impl SeenFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            SeenFilter::All => "all",
            SeenFilter::Seen => "seen",
            SeenFilter::Unseen => "unseen",
        }
    }

    pub fn matches(self, comment: &Comment) -> bool {
        match self {
            SeenFilter::All => true,
            SeenFilter::Seen => comment.seen,
            SeenFilter::Unseen => !comment.seen,
        }
    }
}

impl FromStr for SeenFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_ref() {
            "" | "all" => Ok(SeenFilter::All),
            "seen" => Ok(SeenFilter::Seen),
            "unseen" => Ok(SeenFilter::Unseen),
            other => Err(format!("Unknown seen filter: {}", other)),
        }
    }
}

/// Filters of the comments table, round-tripped to the server as query parameters
#[derive(Clone, Debug, PartialEq, Default)]
pub struct CommentsFilter {
    pub search: Option<String>,
    pub approval: ApprovalFilter,
    pub seen: SeenFilter,
    pub page: u32,
    pub commentable: Option<Commentable>,
    pub user_id: Option<UserId>,
}

impl CommentsFilter {
    pub fn for_commentable(commentable: Commentable) -> Self {
        Self {
            commentable: Some(commentable),
            ..Default::default()
        }
    }

    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            ..Default::default()
        }
    }

    pub fn with_page(&self, page: u32) -> Self {
        Self { page, ..self.clone() }
    }

    /// Query parameters, `all` filters, blank search and the first page are omitted
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![];
        if let Some(search) = self.search.as_ref().map(|s| s.trim()).filter(|s| !s.is_empty()) {
            query.push(("search", search.to_string()));
        }
        if self.approval != ApprovalFilter::All {
            query.push(("status", self.approval.as_str().to_string()));
        }
        if self.seen != SeenFilter::All {
            query.push(("seen", self.seen.as_str().to_string()));
        }
        if let Some(ref commentable) = self.commentable {
            query.push(("commentable_type", commentable.commentable_type.clone()));
            query.push(("commentable_id", commentable.commentable_id.to_string()));
        }
        if let Some(user_id) = self.user_id {
            query.push(("user_id", user_id.to_string()));
        }
        if self.page > 1 {
            query.push(("page", self.page.to_string()));
        }
        query
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkAction {
    Approve,
    Disapprove,
    MarkSeen,
    Delete,
}

impl fmt::Display for BulkAction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let tag = match *self {
            BulkAction::Approve => "approve",
            BulkAction::Disapprove => "disapprove",
            BulkAction::MarkSeen => "mark_seen",
            BulkAction::Delete => "delete",
        };
        write!(f, "{}", tag)
    }
}

impl FromStr for BulkAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_ref() {
            "approve" => Ok(BulkAction::Approve),
            "disapprove" => Ok(BulkAction::Disapprove),
            "mark_seen" => Ok(BulkAction::MarkSeen),
            "delete" => Ok(BulkAction::Delete),
            other => Err(format!("Unknown bulk action: {}", other)),
        }
    }
}

/// Payload for `POST /comments/bulk-update`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
pub struct BulkUpdate {
    #[validate(length(min = "1"))]
    pub ids: Vec<CommentId>,
    pub action: BulkAction,
}

/// Administrative status of one comment as observed by the console
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModerationState {
    Active { approved: bool, seen: bool },
    Removed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Fail)]
#[fail(display = "Can not apply {} to a removed comment", action)]
pub struct TransitionError {
    pub action: BulkAction,
}

impl ModerationState {
    /// Approval flips both ways, seen only moves forward and removal is terminal.
    /// Actions that leave the state unchanged are accepted.
    pub fn apply(self, action: BulkAction) -> Result<ModerationState, TransitionError> {
        match self {
            ModerationState::Removed => Err(TransitionError { action }),
            ModerationState::Active { approved, seen } => Ok(match action {
                BulkAction::Approve => ModerationState::Active { approved: true, seen },
                BulkAction::Disapprove => ModerationState::Active { approved: false, seen },
                BulkAction::MarkSeen => ModerationState::Active { approved, seen: true },
                BulkAction::Delete => ModerationState::Removed,
            }),
        }
    }

    /// Action moving the approval flag to the opposite value
    pub fn toggle_approval_action(self) -> Option<BulkAction> {
        match self {
            ModerationState::Active { approved: true, .. } => Some(BulkAction::Disapprove),
            ModerationState::Active { approved: false, .. } => Some(BulkAction::Approve),
            ModerationState::Removed => None,
        }
    }
}

impl<'a> From<&'a Comment> for ModerationState {
    fn from(comment: &'a Comment) -> Self {
        if comment.deleted_at.is_some() {
            ModerationState::Removed
        } else {
            ModerationState::Active {
                approved: comment.approved,
                seen: comment.seen,
            }
        }
    }
}

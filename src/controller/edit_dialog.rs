//! Edit dialog of the moderation console
use crate::models::*;

/// Dialog state, pre-filled from the record it was opened for
#[derive(Clone, Debug, PartialEq)]
pub struct EditDialog {
    pub comment_id: CommentId,
    pub body: String,
    pub approved: bool,
    pub status: bool,
    pub error: Option<String>,
    opened_with: (String, bool, bool),
}

impl EditDialog {
    pub fn open(comment: &Comment) -> Self {
        Self {
            comment_id: comment.id,
            body: comment.body.clone(),
            approved: comment.approved,
            status: comment.status,
            error: None,
            opened_with: (comment.body.clone(), comment.approved, comment.status),
        }
    }

    pub fn set_body(&mut self, body: &str) {
        self.body = body.chars().take(MAX_BODY_LENGTH).collect();
        self.error = None;
    }

    /// Fields that differ from the record the dialog was opened with
    pub fn changes(&self) -> UpdateComment {
        let (ref body, approved, status) = self.opened_with;
        let trimmed = self.body.trim();
        UpdateComment {
            body: if trimmed != body.as_str() { Some(trimmed.to_string()) } else { None },
            approved: if self.approved != approved { Some(self.approved) } else { None },
            status: if self.status != status { Some(self.status) } else { None },
            seen: None,
        }
    }

    pub fn is_dirty(&self) -> bool {
        !self.changes().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::tests::create_comment;

    #[test]
    fn test_prefilled_from_record() {
        let comment = create_comment(7, None, false, true);
        let dialog = EditDialog::open(&comment);
        assert_eq!(dialog.comment_id, CommentId(7));
        assert_eq!(dialog.body, "comment 7");
        assert!(!dialog.approved);
        assert!(dialog.status);
        assert!(!dialog.is_dirty());
    }

    #[test]
    fn test_changes_hold_only_edited_fields() {
        let mut dialog = EditDialog::open(&create_comment(7, None, false, true));
        dialog.approved = true;
        dialog.set_body(" comment 7 ");
        assert_eq!(
            dialog.changes(),
            UpdateComment {
                approved: Some(true),
                ..Default::default()
            }
        );

        dialog.set_body("edited");
        dialog.status = false;
        let changes = dialog.changes();
        assert_eq!(changes.body, Some("edited".to_string()));
        assert_eq!(changes.status, Some(false));
    }
}

//! Comments provider, talks to the storefront comments API over HTTP
use std::collections::HashMap;
use std::time::Duration;

use failure::Error as FailureError;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use uuid::Uuid;

use crate::config;
use crate::errors::{Error, FieldErrors};
use crate::models::*;

pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

pub trait CommentsProvider {
    /// Returns one page of comments matching the filter
    fn list(&self, filter: &CommentsFilter) -> Result<Page<Comment>, FailureError>;
    /// Queues new comment for moderation
    fn create(&self, payload: &NewComment, idempotency_key: Uuid) -> Result<(), FailureError>;
    /// Updates specific comment
    fn update(&self, comment_id: CommentId, payload: &UpdateComment) -> Result<(), FailureError>;
    /// Deletes specific comment
    fn delete(&self, comment_id: CommentId) -> Result<(), FailureError>;
    /// Applies one action to every listed comment
    fn bulk_update(&self, payload: &BulkUpdate) -> Result<(), FailureError>;
}

pub struct CommentsProviderImpl {
    client: Client,
    url: String,
    token: Option<String>,
}

impl CommentsProviderImpl {
    pub fn with_config(config: &config::Api) -> Result<CommentsProviderImpl, FailureError> {
        let mut builder = Client::builder();
        if let Some(timeout_s) = config.timeout_s {
            builder = builder.timeout(Duration::from_secs(timeout_s));
        }
        let client = builder.build()?;

        Ok(CommentsProviderImpl {
            client,
            url: config.url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token {
            Some(ref token) => request.header(AUTHORIZATION, format!("Bearer {}", token)),
            None => request,
        }
    }

    fn send(&self, request: RequestBuilder) -> Result<Response, FailureError> {
        let response = self
            .authorized(request)
            .header("Accept", "application/json")
            .send()
            .map_err(|e| Error::Network(e.to_string()))?;
        check_status(response)
    }
}

impl CommentsProvider for CommentsProviderImpl {
    fn list(&self, filter: &CommentsFilter) -> Result<Page<Comment>, FailureError> {
        let url = format!("{}/comments", self.url);
        debug!("Fetching comments from {} with {:?}.", url, filter);
        let mut response = self.send(self.client.get(url.as_str()).query(&filter.to_query()))?;
        let page: Page<Comment> = response.json().map_err(|e| Error::Parse(e.to_string()))?;
        Ok(page)
    }

    fn create(&self, payload: &NewComment, idempotency_key: Uuid) -> Result<(), FailureError> {
        let url = format!("{}/comments", self.url);
        debug!("Submitting comment on {} {} (key {}).", payload.commentable_type, payload.commentable_id, idempotency_key);
        self.send(
            self.client
                .post(url.as_str())
                .header(IDEMPOTENCY_KEY_HEADER, idempotency_key.to_string())
                .json(payload),
        )?;
        Ok(())
    }

    fn update(&self, comment_id: CommentId, payload: &UpdateComment) -> Result<(), FailureError> {
        let url = format!("{}/comments/{}", self.url, comment_id);
        debug!("Updating comment {} with {:?}.", comment_id, payload);
        self.send(self.client.patch(url.as_str()).json(payload))?;
        Ok(())
    }

    fn delete(&self, comment_id: CommentId) -> Result<(), FailureError> {
        let url = format!("{}/comments/{}", self.url, comment_id);
        debug!("Deleting comment {}.", comment_id);
        self.send(self.client.delete(url.as_str()))?;
        Ok(())
    }

    fn bulk_update(&self, payload: &BulkUpdate) -> Result<(), FailureError> {
        let url = format!("{}/comments/bulk-update", self.url);
        debug!("Applying {} to comments {:?}.", payload.action, payload.ids);
        self.send(self.client.post(url.as_str()).json(payload))?;
        Ok(())
    }
}

fn check_status(mut response: Response) -> Result<Response, FailureError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    warn!("Storefront responded with {}: {}", status, body);
    let err = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Forbidden,
        StatusCode::NOT_FOUND => Error::NotFound,
        StatusCode::UNPROCESSABLE_ENTITY => match parse_field_errors(&body) {
            Some(errors) => Error::Rejected(errors),
            None => Error::Api(status.as_u16(), body),
        },
        _ => Error::Api(status.as_u16(), body),
    };
    Err(err.into())
}

/// Reads `{ "errors": { "body": ["..."] } }` as well as the flat `{ "body": "..." }` shape
pub fn parse_field_errors(body: &str) -> Option<FieldErrors> {
    let value = serde_json::from_str::<Value>(body).ok()?;
    let fields = match value {
        Value::Object(mut flat) => match flat.remove("errors") {
            Some(Value::Object(errors)) => errors,
            _ => flat,
        },
        _ => return None,
    };

    let errors = fields
        .into_iter()
        .filter(|(field, _)| field != "message")
        .filter_map(|(field, messages)| first_message(&messages).map(|message| (field, message)))
        .collect::<HashMap<_, _>>();

    if errors.is_empty() {
        None
    } else {
        Some(FieldErrors(errors))
    }
}

fn first_message(value: &Value) -> Option<String> {
    match *value {
        Value::String(ref message) => Some(message.clone()),
        Value::Array(ref messages) => messages.iter().filter_map(first_message).next(),
        _ => None,
    }
}

#[cfg(test)]
pub mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[test]
    fn test_parse_nested_field_errors() {
        let errors = parse_field_errors(r#"{"message":"The given data was invalid.","errors":{"body":["متن الزامی است."]}}"#).unwrap();
        assert_eq!(errors.get("body"), Some("متن الزامی است."));
        assert_eq!(errors.0.len(), 1);
    }

    #[test]
    fn test_parse_flat_field_errors() {
        let errors = parse_field_errors(r#"{"body":"too short"}"#).unwrap();
        assert_eq!(errors.get("body"), Some("too short"));
    }

    #[test]
    fn test_parse_unrecognized_errors() {
        assert!(parse_field_errors("<html>oops</html>").is_none());
        assert!(parse_field_errors(r#"{"message":"Server Error"}"#).is_none());
        assert!(parse_field_errors(r#"[1,2]"#).is_none());
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let provider = CommentsProviderImpl::with_config(&config::Api {
            url: "http://localhost/api/".to_string(),
            token: None,
            thread_count: 1,
            timeout_s: Some(5),
        })
        .unwrap();
        assert_eq!(provider.url, "http://localhost/api");
    }

    pub static MOCK_VIEWER_ID: UserId = UserId(1);

    #[derive(Clone, Debug, PartialEq)]
    pub enum ProviderCall {
        List(CommentsFilter),
        Create(NewComment, Uuid),
        Update(CommentId, UpdateComment),
        Delete(CommentId),
        BulkUpdate(BulkUpdate),
    }

    #[derive(Clone, Debug, PartialEq)]
    pub enum MockFailure {
        Rejected(&'static str, &'static str),
        Network,
        Forbidden,
    }

    impl MockFailure {
        fn to_error(&self) -> FailureError {
            match *self {
                MockFailure::Rejected(field, message) => {
                    let mut errors = FieldErrors::default();
                    errors.0.insert(field.to_string(), message.to_string());
                    Error::Rejected(errors).into()
                }
                MockFailure::Network => Error::Network("connection reset".to_string()).into(),
                MockFailure::Forbidden => Error::Forbidden.into(),
            }
        }
    }

    /// In-memory storefront recording every call it receives
    #[derive(Clone, Default)]
    pub struct CommentsProviderMock {
        pub calls: Arc<Mutex<Vec<ProviderCall>>>,
        pub comments: Arc<Mutex<Vec<Comment>>>,
        pub failure: Arc<Mutex<Option<MockFailure>>>,
    }

    impl CommentsProviderMock {
        pub fn with_comments(comments: Vec<Comment>) -> Self {
            let mock = Self::default();
            *mock.comments.lock().unwrap() = comments;
            mock
        }

        pub fn fail_with(&self, failure: Option<MockFailure>) {
            *self.failure.lock().unwrap() = failure;
        }

        pub fn calls(&self) -> Vec<ProviderCall> {
            self.calls.lock().unwrap().clone()
        }

        pub fn mutations(&self) -> Vec<ProviderCall> {
            self.calls()
                .into_iter()
                .filter(|call| match *call {
                    ProviderCall::List(_) => false,
                    _ => true,
                })
                .collect()
        }

        fn record(&self, call: ProviderCall) -> Result<(), FailureError> {
            self.calls.lock().unwrap().push(call);
            match *self.failure.lock().unwrap() {
                Some(ref failure) => Err(failure.to_error()),
                None => Ok(()),
            }
        }

        fn apply(&self, ids: &[CommentId], action: BulkAction) {
            let mut comments = self.comments.lock().unwrap();
            if action == BulkAction::Delete {
                comments.retain(|comment| !ids.contains(&comment.id));
                return;
            }
            for comment in comments.iter_mut().filter(|comment| ids.contains(&comment.id)) {
                match action {
                    BulkAction::Approve => comment.approved = true,
                    BulkAction::Disapprove => comment.approved = false,
                    BulkAction::MarkSeen => comment.seen = true,
                    BulkAction::Delete => {}
                }
            }
        }
    }

    impl CommentsProvider for CommentsProviderMock {
        fn list(&self, filter: &CommentsFilter) -> Result<Page<Comment>, FailureError> {
            self.record(ProviderCall::List(filter.clone()))?;
            let data = self
                .comments
                .lock()
                .unwrap()
                .iter()
                .filter(|comment| filter.approval.matches(comment) && filter.seen.matches(comment))
                .filter(|comment| filter.user_id.map_or(true, |user_id| comment.author_id == user_id))
                .filter(|comment| filter.commentable.as_ref().map_or(true, |c| comment.commentable() == *c))
                .cloned()
                .collect::<Vec<_>>();
            let total = data.len() as u64;
            Ok(Page {
                data,
                current_page: filter.page.max(1),
                last_page: 3,
                per_page: 15,
                total,
            })
        }

        fn create(&self, payload: &NewComment, idempotency_key: Uuid) -> Result<(), FailureError> {
            self.record(ProviderCall::Create(payload.clone(), idempotency_key))
        }

        fn update(&self, comment_id: CommentId, payload: &UpdateComment) -> Result<(), FailureError> {
            self.record(ProviderCall::Update(comment_id, payload.clone()))?;
            let mut comments = self.comments.lock().unwrap();
            if let Some(comment) = comments.iter_mut().find(|comment| comment.id == comment_id) {
                if let Some(ref body) = payload.body {
                    comment.body = body.clone();
                }
                comment.approved = payload.approved.unwrap_or(comment.approved);
                comment.status = payload.status.unwrap_or(comment.status);
                comment.seen = payload.seen.unwrap_or(comment.seen);
            }
            Ok(())
        }

        fn delete(&self, comment_id: CommentId) -> Result<(), FailureError> {
            self.record(ProviderCall::Delete(comment_id))?;
            self.apply(&[comment_id], BulkAction::Delete);
            Ok(())
        }

        fn bulk_update(&self, payload: &BulkUpdate) -> Result<(), FailureError> {
            self.record(ProviderCall::BulkUpdate(payload.clone()))?;
            self.apply(&payload.ids, payload.action);
            Ok(())
        }
    }

    pub fn create_comment(id: i32, parent_id: Option<i32>, approved: bool, status: bool) -> Comment {
        Comment {
            id: CommentId(id),
            body: format!("comment {}", id),
            parent_id: parent_id.map(CommentId),
            author_id: MOCK_VIEWER_ID,
            author: Some(Author {
                id: MOCK_VIEWER_ID,
                name: Some("Sara".to_string()),
            }),
            commentable_id: 12,
            commentable_type: "product".to_string(),
            approved,
            seen: false,
            status,
            created_at: None,
            updated_at: None,
            deleted_at: None,
        }
    }
}

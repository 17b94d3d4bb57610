//! Comments Services, presents listing, submission and moderation operations with comments
use failure::Error as FailureError;
use futures::future;
use uuid::Uuid;
use validator::Validate;

use super::types::ServiceFuture;
use super::Service;
use crate::errors::Error;
use crate::models::*;

pub trait CommentsService {
    /// Returns one page of comments matching the filter
    fn list(&self, filter: CommentsFilter) -> ServiceFuture<Page<Comment>>;
    /// Queues new comment for moderation
    fn create(&self, payload: NewComment, idempotency_key: Uuid) -> ServiceFuture<()>;
    /// Updates specific comment
    fn update(&self, comment_id: CommentId, payload: UpdateComment) -> ServiceFuture<()>;
    /// Deletes specific comment
    fn delete(&self, comment_id: CommentId) -> ServiceFuture<()>;
    /// Applies one action to every selected comment
    fn bulk_update(&self, payload: BulkUpdate) -> ServiceFuture<()>;
}

impl CommentsService for Service {
    fn list(&self, filter: CommentsFilter) -> ServiceFuture<Page<Comment>> {
        self.spawn_on_pool(move |provider| {
            provider
                .list(&filter)
                .map_err(|e| e.context("Service Comments, list endpoint error occured.").into())
        })
    }

    fn create(&self, payload: NewComment, idempotency_key: Uuid) -> ServiceFuture<()> {
        if let Err(e) = payload.validate() {
            return Box::new(future::err::<(), FailureError>(Error::Validate(e).into()));
        }

        self.spawn_on_pool(move |provider| {
            provider
                .create(&payload, idempotency_key)
                .map_err(|e| e.context("Service Comments, create endpoint error occured.").into())
        })
    }

    fn update(&self, comment_id: CommentId, payload: UpdateComment) -> ServiceFuture<()> {
        if let Err(e) = payload.validate() {
            return Box::new(future::err::<(), FailureError>(Error::Validate(e).into()));
        }
        if payload.is_empty() {
            debug!("Nothing to update in comment {}.", comment_id);
            return Box::new(future::ok::<(), FailureError>(()));
        }

        self.spawn_on_pool(move |provider| {
            provider
                .update(comment_id, &payload)
                .map_err(|e| e.context("Service Comments, update endpoint error occured.").into())
        })
    }

    fn delete(&self, comment_id: CommentId) -> ServiceFuture<()> {
        self.spawn_on_pool(move |provider| {
            provider
                .delete(comment_id)
                .map_err(|e| e.context("Service Comments, delete endpoint error occured.").into())
        })
    }

    fn bulk_update(&self, payload: BulkUpdate) -> ServiceFuture<()> {
        if payload.ids.is_empty() {
            return Box::new(future::err::<(), FailureError>(Error::EmptySelection.into()));
        }
        if let Err(e) = payload.validate() {
            return Box::new(future::err::<(), FailureError>(Error::Validate(e).into()));
        }

        self.spawn_on_pool(move |provider| {
            provider
                .bulk_update(&payload)
                .map_err(|e| e.context("Service Comments, bulk_update endpoint error occured.").into())
        })
    }
}

//! Driven port for the `likes` document collection.

use async_trait::async_trait;

use crate::domain::{LikeRecord, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by like record adapters.
    pub enum LikeRepositoryError {
        /// The store could not be reached.
        Connection { message: String } => "like repository connection failed: {message}",
        /// A read or write failed while executing.
        Query { message: String } => "like repository query failed: {message}",
    }
}

/// One [`LikeRecord`] per user, keyed by the owning user's id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LikeRepository: Send + Sync {
    /// Every like record.
    async fn list_all(&self) -> Result<Vec<LikeRecord>, LikeRepositoryError>;

    /// The record owned by `user_id`, if one was created.
    async fn find_by_user(&self, user_id: &UserId)
    -> Result<Option<LikeRecord>, LikeRepositoryError>;

    /// Insert a new record.
    async fn create(&self, record: &LikeRecord) -> Result<(), LikeRepositoryError>;

    /// Replace the liked set of an existing record.
    async fn update(&self, record: &LikeRecord) -> Result<(), LikeRepositoryError>;
}

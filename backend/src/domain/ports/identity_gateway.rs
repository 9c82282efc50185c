//! Driven port for the external identity provider.
//!
//! The gateway owns credentials: registration and login go through it, and
//! nothing else in the crate ever sees a password hash. Every sign-in and
//! sign-out is broadcast to subscribers.

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::broadcast;

use crate::domain::{Credentials, UserId};

use super::define_port_error;

define_port_error! {
    /// Failures reported by the identity provider. Messages are shown to
    /// users as-is.
    pub enum IdentityError {
        /// The e-mail already has an account.
        EmailTaken { message: String } => "{message}",
        /// The e-mail/password pair was rejected.
        InvalidCredentials { message: String } => "{message}",
        /// The provider could not be reached or failed internally.
        Unavailable { message: String } => "{message}",
    }
}

/// Direction of an identity transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityChangeKind {
    SignedIn,
    SignedOut,
}

/// Notification emitted on every sign-in or sign-out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityChange {
    pub user_id: UserId,
    pub kind: IdentityChangeKind,
}

impl IdentityChange {
    /// The user now considered current, or `None` after a sign-out.
    pub fn current_user(&self) -> Option<&UserId> {
        match self.kind {
            IdentityChangeKind::SignedIn => Some(&self.user_id),
            IdentityChangeKind::SignedOut => None,
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityGateway: Send + Sync {
    /// Create an account and sign it in.
    async fn register(&self, credentials: &Credentials) -> Result<UserId, IdentityError>;

    /// Verify credentials and sign the account in.
    async fn login(&self, credentials: &Credentials) -> Result<UserId, IdentityError>;

    /// Sign `user_id` out.
    async fn logout(&self, user_id: &UserId) -> Result<(), IdentityError>;

    /// Receive every subsequent identity change.
    fn subscribe(&self) -> broadcast::Receiver<IdentityChange>;
}

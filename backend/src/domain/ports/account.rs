//! Driving ports for registration, login, and the signed-in header state.

use async_trait::async_trait;

use crate::domain::{Credentials, Error, Registration, User, UserId};

#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Register a new account and its user record.
    async fn register(&self, registration: Registration) -> Result<User, Error>;

    /// Sign in with existing credentials.
    async fn login(&self, credentials: Credentials) -> Result<User, Error>;

    /// Sign `user_id` out.
    async fn logout(&self, user_id: &UserId) -> Result<(), Error>;
}

#[async_trait]
pub trait AccountQuery: Send + Sync {
    /// The user record behind a session, if it still exists.
    async fn current_user(&self, user_id: &UserId) -> Result<Option<User>, Error>;
}

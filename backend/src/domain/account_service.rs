//! Account domain service.
//!
//! Registration and login go through the identity gateway; the `users`
//! collection only stores the public profile.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    AccountCommand, AccountQuery, IdentityError, IdentityGateway, UserPersistenceError,
    UserRepository,
};
use crate::domain::{Credentials, Error, Registration, User, UserId};

/// Service implementing [`AccountCommand`] and [`AccountQuery`].
#[derive(Clone)]
pub struct AccountService<G, U> {
    identity: Arc<G>,
    users: Arc<U>,
}

impl<G, U> AccountService<G, U> {
    /// Create a new service from the identity gateway and user collection.
    pub fn new(identity: Arc<G>, users: Arc<U>) -> Self {
        Self { identity, users }
    }
}

/// Gateway messages are user-facing and kept verbatim.
fn map_identity_error(error: IdentityError) -> Error {
    match error {
        IdentityError::EmailTaken { message } => Error::conflict(message),
        IdentityError::InvalidCredentials { message } => Error::unauthorized(message),
        IdentityError::Unavailable { message } => Error::service_unavailable(message),
    }
}

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { email } => email_taken(&email),
    }
}

fn email_taken(email: &str) -> Error {
    Error::conflict(format!("an account for {email} already exists"))
}

#[async_trait]
impl<G, U> AccountCommand for AccountService<G, U>
where
    G: IdentityGateway,
    U: UserRepository,
{
    async fn register(&self, registration: Registration) -> Result<User, Error> {
        let credentials = registration.credentials();
        if self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_error)?
            .is_some()
        {
            return Err(email_taken(credentials.email().as_ref()));
        }

        let user_id = self
            .identity
            .register(credentials)
            .await
            .map_err(map_identity_error)?;
        let user = User::new(
            user_id,
            registration.username().clone(),
            credentials.email().clone(),
        );
        self.users.create(&user).await.map_err(map_user_error)?;
        info!(user = %user.id(), "account registered");
        Ok(user)
    }

    async fn login(&self, credentials: Credentials) -> Result<User, Error> {
        let user_id = self
            .identity
            .login(&credentials)
            .await
            .map_err(map_identity_error)?;
        self.users
            .find_by_id(&user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("no profile stored for user {user_id}")))
    }

    async fn logout(&self, user_id: &UserId) -> Result<(), Error> {
        self.identity
            .logout(user_id)
            .await
            .map_err(map_identity_error)
    }
}

#[async_trait]
impl<G, U> AccountQuery for AccountService<G, U>
where
    G: IdentityGateway,
    U: UserRepository,
{
    async fn current_user(&self, user_id: &UserId) -> Result<Option<User>, Error> {
        self.users.find_by_id(user_id).await.map_err(map_user_error)
    }
}

//! Local identity provider.
//!
//! Stands in for a hosted authentication service: accounts are e-mail and
//! Argon2 password hash pairs kept in `credentials.json` beside the document
//! collections. Sign-ins and sign-outs are broadcast to subscribers.

use std::sync::Arc;

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use async_trait::async_trait;
use camino::Utf8Path;
use cap_std::fs::Dir;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::domain::ports::{IdentityChange, IdentityChangeKind, IdentityError, IdentityGateway};
use crate::domain::{Credentials, Email, UserId};
use crate::outbound::local_storage::{
    DocumentStoreError, open_data_dir, read_collection, write_collection,
};

const CREDENTIALS_FILE: &str = "credentials.json";
const EVENT_CAPACITY: usize = 64;

const EMAIL_TAKEN: &str = "An account with this email already exists";
const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Account {
    email: Email,
    user_id: UserId,
    password_hash: String,
}

/// [`IdentityGateway`] backed by a local credentials file.
pub struct LocalIdentityGateway {
    dir: Option<Arc<Dir>>,
    accounts: RwLock<Vec<Account>>,
    events: broadcast::Sender<IdentityChange>,
}

impl LocalIdentityGateway {
    /// A gateway whose accounts vanish with the process.
    pub fn in_memory() -> Self {
        Self::with_accounts(None, Vec::new())
    }

    /// Open the credentials file under `path`, creating the directory if
    /// needed.
    pub fn open(path: &Utf8Path) -> Result<Self, DocumentStoreError> {
        let dir = open_data_dir(path)?;
        let accounts = read_collection(&dir, CREDENTIALS_FILE)?;
        Ok(Self::with_accounts(Some(Arc::new(dir)), accounts))
    }

    fn with_accounts(dir: Option<Arc<Dir>>, accounts: Vec<Account>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            dir,
            accounts: RwLock::new(accounts),
            events,
        }
    }

    async fn find(&self, email: &Email) -> Option<Account> {
        let accounts = self.accounts.read().await;
        accounts.iter().find(|account| account.email == *email).cloned()
    }

    async fn insert(&self, account: Account) -> Result<(), IdentityError> {
        let mut accounts = self.accounts.write().await;
        if accounts.iter().any(|existing| existing.email == account.email) {
            return Err(IdentityError::email_taken(EMAIL_TAKEN));
        }
        let mut next = accounts.clone();
        next.push(account);
        if let Some(dir) = &self.dir {
            write_collection(dir, CREDENTIALS_FILE, &next)
                .await
                .map_err(|err| IdentityError::unavailable(err.to_string()))?;
        }
        *accounts = next;
        Ok(())
    }

    fn announce(&self, user_id: &UserId, kind: IdentityChangeKind) {
        let change = IdentityChange {
            user_id: user_id.clone(),
            kind,
        };
        // No receivers is fine.
        if self.events.send(change).is_err() {
            debug!("identity change dropped: no subscribers");
        }
    }
}

fn hash_password(password: &str) -> Result<String, IdentityError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| IdentityError::unavailable(format!("failed to hash password: {err}")))
}

fn verify_password(password: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(err) => {
            warn!(error = %err, "stored password hash is malformed");
            false
        }
    }
}

/// Run Argon2 off the async workers.
async fn blocking<T, F>(work: F) -> Result<T, IdentityError>
where
    F: FnOnce() -> Result<T, IdentityError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| IdentityError::unavailable(format!("password task failed: {err}")))?
}

#[async_trait]
impl IdentityGateway for LocalIdentityGateway {
    async fn register(&self, credentials: &Credentials) -> Result<UserId, IdentityError> {
        if self.find(credentials.email()).await.is_some() {
            return Err(IdentityError::email_taken(EMAIL_TAKEN));
        }

        let password = Zeroizing::new(credentials.password().to_owned());
        let password_hash = blocking(move || hash_password(&password)).await?;
        let user_id = UserId::random();
        self.insert(Account {
            email: credentials.email().clone(),
            user_id: user_id.clone(),
            password_hash,
        })
        .await?;

        self.announce(&user_id, IdentityChangeKind::SignedIn);
        Ok(user_id)
    }

    async fn login(&self, credentials: &Credentials) -> Result<UserId, IdentityError> {
        let Some(account) = self.find(credentials.email()).await else {
            return Err(IdentityError::invalid_credentials(INVALID_CREDENTIALS));
        };

        let password = Zeroizing::new(credentials.password().to_owned());
        let stored = account.password_hash;
        let verified = blocking(move || Ok(verify_password(&password, &stored))).await?;
        if !verified {
            return Err(IdentityError::invalid_credentials(INVALID_CREDENTIALS));
        }

        self.announce(&account.user_id, IdentityChangeKind::SignedIn);
        Ok(account.user_id)
    }

    async fn logout(&self, user_id: &UserId) -> Result<(), IdentityError> {
        self.announce(user_id, IdentityChangeKind::SignedOut);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<IdentityChange> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn credentials(password: &str) -> Credentials {
        Credentials::try_from_parts("ada@example.com", password).expect("valid")
    }

    #[fixture]
    fn gateway() -> LocalIdentityGateway {
        LocalIdentityGateway::in_memory()
    }

    #[rstest]
    #[tokio::test]
    async fn register_then_login_returns_same_user(gateway: LocalIdentityGateway) {
        let registered = gateway.register(&credentials("s3cret")).await.expect("register");
        let logged_in = gateway.login(&credentials("s3cret")).await.expect("login");
        assert_eq!(registered, logged_in);
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_email_is_rejected(gateway: LocalIdentityGateway) {
        gateway.register(&credentials("one")).await.expect("register");
        let err = gateway
            .register(&credentials("two"))
            .await
            .expect_err("duplicate");
        assert_eq!(err, IdentityError::email_taken(EMAIL_TAKEN));
    }

    #[rstest]
    #[case("wrong")]
    #[case("S3CRET")]
    #[tokio::test]
    async fn wrong_password_is_rejected(gateway: LocalIdentityGateway, #[case] attempt: &str) {
        gateway.register(&credentials("s3cret")).await.expect("register");
        let err = gateway
            .login(&credentials(attempt))
            .await
            .expect_err("bad password");
        assert_eq!(err.to_string(), INVALID_CREDENTIALS);
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_email_is_rejected(gateway: LocalIdentityGateway) {
        let err = gateway
            .login(&credentials("s3cret"))
            .await
            .expect_err("unknown account");
        assert!(matches!(err, IdentityError::InvalidCredentials { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn changes_are_broadcast(gateway: LocalIdentityGateway) {
        let mut changes = gateway.subscribe();
        let user_id = gateway.register(&credentials("s3cret")).await.expect("register");
        gateway.logout(&user_id).await.expect("logout");

        let signed_in = changes.recv().await.expect("sign-in event");
        assert_eq!(signed_in.current_user(), Some(&user_id));
        let signed_out = changes.recv().await.expect("sign-out event");
        assert_eq!(signed_out.kind, IdentityChangeKind::SignedOut);
        assert_eq!(signed_out.current_user(), None);
    }

    #[tokio::test]
    async fn credentials_file_stores_only_hashes() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = Utf8Path::from_path(tmp.path()).expect("utf8 path");
        let user_id = {
            let gateway = LocalIdentityGateway::open(path).expect("open");
            gateway.register(&credentials("s3cret")).await.expect("register")
        };

        let contents =
            std::fs::read_to_string(tmp.path().join(CREDENTIALS_FILE)).expect("read credentials");
        assert!(!contents.contains("s3cret"));
        assert!(contents.contains("$argon2"));

        let reopened = LocalIdentityGateway::open(path).expect("reopen");
        assert_eq!(
            reopened.login(&credentials("s3cret")).await.expect("login"),
            user_id
        );
    }
}

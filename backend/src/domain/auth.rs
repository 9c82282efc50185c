//! Login and registration inputs.
//!
//! Inbound adapters build these from raw form values before talking to a
//! port, so the identity gateway only ever sees validated shapes.

use std::fmt;

use zeroize::Zeroizing;

use crate::domain::{Email, UserValidationError, Username};

/// Validation failures for login and registration payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthValidationError {
    EmptyUsername,
    EmptyEmail,
    InvalidEmail,
    EmptyPassword,
    Username(UserValidationError),
}

impl AuthValidationError {
    /// Wire name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyUsername | Self::Username(_) => "username",
            Self::EmptyEmail | Self::InvalidEmail => "email",
            Self::EmptyPassword => "password",
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyUsername => "empty_username",
            Self::EmptyEmail => "empty_email",
            Self::InvalidEmail => "invalid_email",
            Self::EmptyPassword => "empty_password",
            Self::Username(_) => "invalid_username",
        }
    }
}

impl fmt::Display for AuthValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must look like name@domain"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::Username(inner) => write!(f, "{inner}"),
        }
    }
}

impl std::error::Error for AuthValidationError {}

fn map_email_error(error: UserValidationError) -> AuthValidationError {
    match error {
        UserValidationError::EmptyEmail => AuthValidationError::EmptyEmail,
        _ => AuthValidationError::InvalidEmail,
    }
}

/// Validated e-mail/password pair.
///
/// ## Invariants
/// - `email` is trimmed and well-formed.
/// - `password` is non-empty and kept verbatim, including whitespace.
///
/// # Examples
/// ```
/// use bandstand::domain::Credentials;
///
/// let creds = Credentials::try_from_parts(" ada@example.com ", "s3cret").unwrap();
/// assert_eq!(creds.email().as_ref(), "ada@example.com");
/// assert_eq!(creds.password(), "s3cret");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    email: Email,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Build credentials from raw inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, AuthValidationError> {
        let email = Email::new(email).map_err(map_email_error)?;
        if password.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Login e-mail.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Password as provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated registration form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    username: Username,
    credentials: Credentials,
}

impl Registration {
    /// Build a registration from raw inputs. Fields are checked in form
    /// order: username, e-mail, password.
    ///
    /// A whitespace-only password is rejected as empty; any other password
    /// is stored verbatim.
    pub fn try_from_parts(
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, AuthValidationError> {
        let username = Username::new(username).map_err(|error| match error {
            UserValidationError::EmptyUsername => AuthValidationError::EmptyUsername,
            other => AuthValidationError::Username(other),
        })?;
        let email = Email::new(email).map_err(map_email_error)?;
        if password.trim().is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }
        let credentials = Credentials {
            email,
            password: Zeroizing::new(password.to_owned()),
        };
        Ok(Self {
            username,
            credentials,
        })
    }

    /// Chosen username.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Credentials handed to the identity gateway.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

//! Account API handlers.
//!
//! ```text
//! POST /api/v1/register {"username":"ada","email":"ada@example.com","password":"..."}
//! POST /api/v1/login {"email":"ada@example.com","password":"..."}
//! POST /api/v1/logout
//! GET  /api/v1/users/me
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use zeroize::Zeroize;

use crate::domain::error::ErrorDto;
use crate::domain::{ApiResult, Credentials, Error, Registration, User};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::map_auth_validation_error;

/// Body of `POST /api/v1/register`.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = Error;

    fn try_from(mut value: RegisterRequest) -> Result<Self, Self::Error> {
        let registration =
            Self::try_from_parts(&value.username, &value.email, &value.password)
                .map_err(map_auth_validation_error);
        value.password.zeroize();
        registration
    }
}

/// Body of `POST /api/v1/login`.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for Credentials {
    type Error = Error;

    fn try_from(mut value: LoginRequest) -> Result<Self, Self::Error> {
        let credentials = Self::try_from_parts(&value.email, &value.password)
            .map_err(map_auth_validation_error);
        value.password.zeroize();
        credentials
    }
}

/// Signed-in user as shown in the page header.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: *user.id().as_uuid(),
            username: user.username().to_string(),
            email: user.email().to_string(),
        }
    }
}

/// Create an account and sign it in.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Missing or invalid field", body = ErrorDto),
        (status = 409, description = "E-mail already registered", body = ErrorDto),
        (status = 503, description = "Identity provider unavailable", body = ErrorDto)
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = Registration::try_from(payload.into_inner())?;
    let user = state.accounts.register(registration).await?;
    session.persist_user(user.id())?;
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = UserResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Missing or invalid field", body = ErrorDto),
        (status = 401, description = "Invalid credentials", body = ErrorDto),
        (status = 503, description = "Identity provider unavailable", body = ErrorDto)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let credentials = Credentials::try_from(payload.into_inner())?;
    let user = state.accounts.login(credentials).await?;
    session.persist_user(user.id())?;
    Ok(web::Json(user.into()))
}

/// End the session. Succeeds without a session too.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses(
        (status = 204, description = "Signed out"),
        (status = 503, description = "Identity provider unavailable", body = ErrorDto)
    ),
    tags = ["users"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    if let Some(user_id) = session.user_id()? {
        state.accounts.logout(&user_id).await?;
    }
    session.forget_user();
    Ok(HttpResponse::NoContent().finish())
}

/// The signed-in user.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Not signed in", body = ErrorDto)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserResponse>> {
    let user_id = session.require_user_id()?;
    match state.accounts_query.current_user(&user_id).await? {
        Some(user) => Ok(web::Json(user.into())),
        None => {
            // The account vanished under a live cookie.
            session.forget_user();
            Err(Error::unauthorized("login required"))
        }
    }
}

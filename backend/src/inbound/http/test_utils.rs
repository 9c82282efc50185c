//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::json;

use crate::domain::{AccountService, CatalogService, LikeSyncService};
use crate::inbound::http::configure;
use crate::inbound::http::state::HttpState;
use crate::outbound::identity::LocalIdentityGateway;
use crate::outbound::local_storage::LocalDocumentStore;

/// Password used by [`register_and_sign_in`].
pub const TEST_PASSWORD: &str = "s3cret-pass";

/// Session middleware with a fresh key, the cookie named `session`, and the
/// `Secure` flag off for plain HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The `session` cookie set by `response`.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// Real services over the in-memory store and identity gateway.
pub fn in_memory_state() -> HttpState {
    let store = Arc::new(LocalDocumentStore::in_memory());
    let gateway = Arc::new(LocalIdentityGateway::in_memory());
    let catalog = Arc::new(CatalogService::new(store.clone(), store.clone()));
    let likes = Arc::new(LikeSyncService::new(store.clone(), store.clone()));
    let accounts = Arc::new(AccountService::new(gateway, store));
    HttpState::new(catalog.clone(), catalog, likes, accounts.clone(), accounts)
}

/// The `/api/v1` surface over [`in_memory_state`].
pub fn test_app() -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(in_memory_state()))
        .wrap(test_session_middleware())
        .service(web::scope("/api/v1").configure(configure))
}

/// Register an account for `email` and return its session cookie.
pub async fn register_and_sign_in<S, B>(app: &S, email: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let username = email.split('@').next().unwrap_or(email);
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/register")
            .set_json(json!({
                "username": username,
                "email": email,
                "password": TEST_PASSWORD,
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    session_cookie(&res)
}

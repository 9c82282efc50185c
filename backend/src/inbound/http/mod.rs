//! HTTP inbound adapter exposing REST endpoints.

pub mod bands;
pub mod error;
pub mod health;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod theme;
pub mod users;
pub mod validation;

use actix_web::web;

use crate::domain::Error;

/// Register every `/api/v1` handler on `cfg`.
///
/// Malformed JSON bodies and query strings are reported with the shared
/// error schema. `/bands/genres` is registered ahead of `/bands/{name}` so
/// the literal segment wins.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("invalid request body: {err}")).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("invalid query string: {err}")).into()
    }))
    .service(bands::list_bands)
    .service(bands::list_genres)
    .service(bands::get_band)
    .service(bands::add_band)
    .service(bands::toggle_like)
    .service(users::register)
    .service(users::login)
    .service(users::logout)
    .service(users::current_user)
    .service(theme::get_theme)
    .service(theme::set_theme);
}

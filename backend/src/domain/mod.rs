//! Domain primitives, services and ports.
//!
//! Purpose: Define strongly typed catalogue entities and the services that
//! act on them, independent of actix and of any particular store. Keep types
//! immutable outside their documented mutators and record invariants and
//! serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Band, BandDraft, LikeRecord, User: catalogue records.
//! - apply_view / ViewOptions: the catalogue query engine.
//! - CatalogService, LikeSyncService, AccountService: driving port
//!   implementations.

pub mod account_service;
pub mod auth;
pub mod band;
pub mod catalog_query;
pub mod catalog_service;
pub mod error;
pub mod like_reconciliation;
pub mod like_service;
pub mod likes;
pub mod ports;
pub mod sample_catalog;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::auth::{AuthValidationError, Credentials, Registration};
pub use self::band::{
    Band, BandDraft, BandId, BandName, BandValidationError, SHORT_DESCRIPTION_LEN, YEAR_MAX,
    YEAR_MIN,
};
pub use self::catalog_query::{
    ALL_GENRES, CatalogEntry, GenreFilter, ViewOptions, annotate, apply_view, distinct_genres,
};
pub use self::catalog_service::CatalogService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::like_reconciliation::reconcile_like_counters;
pub use self::like_service::LikeSyncService;
pub use self::likes::LikeRecord;
pub use self::sample_catalog::{sample_drafts, seed_sample_catalog};
pub use self::trace_id::TraceId;
pub use self::user::{Email, USERNAME_MAX, User, UserId, UserValidationError, Username};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use bandstand::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::unauthorized("sign in to add bands"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;

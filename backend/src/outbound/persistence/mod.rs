//! PostgreSQL document store adapters using Diesel.
//!
//! Each collection (`bands`, `likes`, `users`) maps to one table. The
//! adapters only translate between rows and domain records; uniqueness is
//! enforced by table constraints and surfaced as the ports' duplicate
//! variants.
//!
//! ```ignore
//! use bandstand::outbound::persistence::{DbPool, DieselBandRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/bandstand")).await?;
//! let bands = DieselBandRepository::new(pool);
//! ```

mod diesel_band_repository;
mod diesel_basic_error_mapping;
mod diesel_like_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_band_repository::DieselBandRepository;
pub use diesel_like_repository::DieselLikeRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_migrations, run_migrations_async};
pub use pool::{DbPool, PoolConfig, PoolError};

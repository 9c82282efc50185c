//! Outbound adapters implementing domain ports.
//!
//! - **local_storage**: JSON documents in a directory (or memory only).
//! - **persistence**: PostgreSQL tables through Diesel.
//! - **identity**: the local Argon2 identity provider.
//!
//! Adapters translate between domain records and storage shapes and hold no
//! business logic.

pub mod identity;
pub mod local_storage;
pub mod persistence;

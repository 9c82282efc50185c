//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`IdentityGateway`]) are implemented by
//! outbound adapters; driving ports ([`BandCatalogQuery`], [`LikeCommand`],
//! ...) are implemented by domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account;
mod band_catalog;
mod band_repository;
mod identity_gateway;
mod like_command;
mod like_repository;
mod user_repository;

pub use account::{AccountCommand, AccountQuery};
pub use band_catalog::{BandCatalogCommand, BandCatalogQuery};
#[cfg(test)]
pub use band_repository::MockBandRepository;
pub use band_repository::{BandPatch, BandRepository, BandRepositoryError};
#[cfg(test)]
pub use identity_gateway::MockIdentityGateway;
pub use identity_gateway::{IdentityChange, IdentityChangeKind, IdentityError, IdentityGateway};
pub use like_command::{LikeCommand, LikeToggle};
#[cfg(test)]
pub use like_repository::MockLikeRepository;
pub use like_repository::{LikeRepository, LikeRepositoryError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};

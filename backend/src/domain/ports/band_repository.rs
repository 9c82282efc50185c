//! Driven port for the `bands` document collection.

use async_trait::async_trait;

use crate::domain::{Band, BandDraft, BandId, BandName};

use super::define_port_error;

define_port_error! {
    /// Errors raised by band collection adapters.
    pub enum BandRepositoryError {
        /// The store could not be reached.
        Connection { message: String } => "band repository connection failed: {message}",
        /// A read or write failed while executing.
        Query { message: String } => "band repository query failed: {message}",
        /// A band with the same name already exists.
        DuplicateName { name: String } => "band '{name}' already exists",
    }
}

/// Partial update applied by [`BandRepository::update`]. `None` fields are
/// left untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BandPatch {
    pub likes: Option<u32>,
}

impl BandPatch {
    /// Patch that only rewrites the likes counter.
    pub fn likes(likes: u32) -> Self {
        Self { likes: Some(likes) }
    }
}

/// Collection-level operations over bands.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BandRepository: Send + Sync {
    /// Every band, in collection (insertion) order.
    async fn list_all(&self) -> Result<Vec<Band>, BandRepositoryError>;

    /// Store a new band with zero likes and return its identifier.
    ///
    /// Fails with [`BandRepositoryError::DuplicateName`] when the name is
    /// taken.
    async fn create(&self, draft: &BandDraft) -> Result<BandId, BandRepositoryError>;

    /// Look a band up by its exact (case-sensitive) name.
    async fn find_by_name(&self, name: &BandName) -> Result<Option<Band>, BandRepositoryError>;

    /// Apply a partial update to the band with `id`.
    async fn update(&self, id: &BandId, patch: BandPatch) -> Result<(), BandRepositoryError>;
}

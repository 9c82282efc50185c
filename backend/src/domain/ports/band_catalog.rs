//! Driving ports for browsing and extending the band catalogue.
//!
//! Inbound adapters call these without knowing which document store backs
//! them.

use async_trait::async_trait;

use crate::domain::{Band, BandDraft, BandName, CatalogEntry, Error, UserId, ViewOptions};

/// Read side of the catalogue.
#[async_trait]
pub trait BandCatalogQuery: Send + Sync {
    /// Recompute the catalogue view for `options`. Entries carry the like
    /// state of `viewer` when one is signed in.
    async fn browse(
        &self,
        viewer: Option<&UserId>,
        options: &ViewOptions,
    ) -> Result<Vec<CatalogEntry>, Error>;

    /// Details of the band named exactly `name`.
    async fn band_details(
        &self,
        viewer: Option<&UserId>,
        name: &BandName,
    ) -> Result<CatalogEntry, Error>;

    /// Distinct genres in catalogue order, for the genre selector.
    async fn genres(&self) -> Result<Vec<String>, Error>;
}

/// Write side of the catalogue.
#[async_trait]
pub trait BandCatalogCommand: Send + Sync {
    /// Add a band submitted by `author`. Rejects duplicate names with a
    /// conflict and writes nothing.
    async fn add_band(&self, author: &UserId, draft: BandDraft) -> Result<Band, Error>;
}

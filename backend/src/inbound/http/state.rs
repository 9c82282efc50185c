//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data` and only depend on
//! driving ports, so they stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, AccountQuery, BandCatalogCommand, BandCatalogQuery, LikeCommand,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub catalog: Arc<dyn BandCatalogQuery>,
    pub catalog_command: Arc<dyn BandCatalogCommand>,
    pub likes: Arc<dyn LikeCommand>,
    pub accounts: Arc<dyn AccountCommand>,
    pub accounts_query: Arc<dyn AccountQuery>,
}

impl HttpState {
    /// Bundle one implementation per port.
    pub fn new(
        catalog: Arc<dyn BandCatalogQuery>,
        catalog_command: Arc<dyn BandCatalogCommand>,
        likes: Arc<dyn LikeCommand>,
        accounts: Arc<dyn AccountCommand>,
        accounts_query: Arc<dyn AccountQuery>,
    ) -> Self {
        Self {
            catalog,
            catalog_command,
            likes,
            accounts,
            accounts_query,
        }
    }
}

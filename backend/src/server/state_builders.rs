//! Builders wiring storage adapters into HTTP state, plus the startup
//! catalogue tasks that run before the server accepts traffic.

use std::io;
use std::sync::Arc;

use tracing::info;

use bandstand::domain::ports::{BandRepository, IdentityGateway, LikeRepository, UserRepository};
use bandstand::domain::{
    AccountService, CatalogService, LikeSyncService, reconcile_like_counters, seed_sample_catalog,
};
use bandstand::inbound::http::state::HttpState;
use bandstand::outbound::identity::LocalIdentityGateway;
use bandstand::outbound::local_storage::LocalDocumentStore;
use bandstand::outbound::persistence::{
    DbPool, DieselBandRepository, DieselLikeRepository, DieselUserRepository, PoolConfig,
    run_migrations_async,
};
use bandstand::settings::{BandstandSettings, StorageBackend};

/// Everything the server needs from the storage layer.
pub(crate) struct Backends {
    pub(crate) http_state: HttpState,
    pub(crate) identity: Arc<LocalIdentityGateway>,
}

/// Startup catalogue tasks selected by configuration.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct StartupTasks {
    pub(crate) seed_samples: bool,
    pub(crate) reconcile_likes: bool,
}

impl From<&BandstandSettings> for StartupTasks {
    fn from(settings: &BandstandSettings) -> Self {
        Self {
            seed_samples: settings.seed_samples,
            reconcile_likes: settings.reconcile_likes,
        }
    }
}

/// Compose the driving ports over one set of repositories.
pub(crate) fn build_http_state<B, L, U, G>(
    bands: Arc<B>,
    likes: Arc<L>,
    users: Arc<U>,
    identity: Arc<G>,
) -> HttpState
where
    B: BandRepository + 'static,
    L: LikeRepository + 'static,
    U: UserRepository + 'static,
    G: IdentityGateway + 'static,
{
    let catalog = Arc::new(CatalogService::new(bands.clone(), likes.clone()));
    let like_sync = Arc::new(LikeSyncService::new(bands, likes));
    let accounts = Arc::new(AccountService::new(identity, users));
    HttpState::new(catalog.clone(), catalog, like_sync, accounts.clone(), accounts)
}

/// Seed and reconcile before the first request.
pub(crate) async fn prepare_catalog<B, L>(
    bands: &B,
    likes: &L,
    tasks: StartupTasks,
) -> io::Result<()>
where
    B: BandRepository + ?Sized,
    L: LikeRepository + ?Sized,
{
    if tasks.seed_samples {
        seed_sample_catalog(bands).await.map_err(io::Error::other)?;
    } else {
        info!(reason = "disabled", "sample catalogue seeding skipped");
    }
    if tasks.reconcile_likes {
        reconcile_like_counters(bands, likes)
            .await
            .map_err(io::Error::other)?;
    }
    Ok(())
}

/// Open the configured store and identity provider.
///
/// The identity provider always keeps its credentials file in the data
/// directory; only the catalogue collections move to PostgreSQL.
pub(crate) async fn build_backends(settings: &BandstandSettings) -> io::Result<Backends> {
    let data_dir = settings.data_dir().map_err(io::Error::other)?;
    let identity = Arc::new(LocalIdentityGateway::open(&data_dir).map_err(io::Error::other)?);
    let tasks = StartupTasks::from(settings);

    let http_state = match settings.storage_backend().map_err(io::Error::other)? {
        StorageBackend::Local => {
            let store = Arc::new(LocalDocumentStore::open(&data_dir).map_err(io::Error::other)?);
            prepare_catalog(store.as_ref(), store.as_ref(), tasks).await?;
            build_http_state(store.clone(), store.clone(), store, identity.clone())
        }
        StorageBackend::Postgres => {
            let url = settings.database_url().map_err(io::Error::other)?;
            run_migrations_async(url.to_owned())
                .await
                .map_err(io::Error::other)?;
            let pool = DbPool::new(PoolConfig::new(url))
                .await
                .map_err(io::Error::other)?;
            let bands = Arc::new(DieselBandRepository::new(pool.clone()));
            let likes = Arc::new(DieselLikeRepository::new(pool.clone()));
            let users = Arc::new(DieselUserRepository::new(pool));
            prepare_catalog(bands.as_ref(), likes.as_ref(), tasks).await?;
            build_http_state(bands, likes, users, identity.clone())
        }
    };

    Ok(Backends {
        http_state,
        identity,
    })
}

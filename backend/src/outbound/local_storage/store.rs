//! [`LocalDocumentStore`]: the three catalogue collections in one process.

use std::sync::Arc;

use async_trait::async_trait;
use camino::Utf8Path;
use cap_std::fs::Dir;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::domain::ports::{
    BandPatch, BandRepository, BandRepositoryError, LikeRepository, LikeRepositoryError,
    UserPersistenceError, UserRepository,
};
use crate::domain::{Band, BandDraft, BandId, BandName, Email, LikeRecord, User, UserId};

use super::{DocumentStoreError, open_data_dir, read_collection, write_collection};

const BANDS_FILE: &str = "bands.json";
const LIKES_FILE: &str = "likes.json";
const USERS_FILE: &str = "users.json";

#[derive(Debug, Clone, Copy)]
enum Collection {
    Bands,
    Likes,
    Users,
}

#[derive(Debug, Clone, Default)]
struct Collections {
    bands: Vec<Band>,
    likes: Vec<LikeRecord>,
    users: Vec<User>,
}

/// Document store holding every collection in memory.
///
/// Each call takes the internal lock once; no lock spans several calls, so a
/// domain read-modify-write sequence can interleave with other requests.
/// Writes are applied to a copy, persisted on the blocking pool, then
/// published, so a failed write leaves both memory and disk unchanged.
pub struct LocalDocumentStore {
    dir: Option<Arc<Dir>>,
    state: RwLock<Collections>,
}

impl LocalDocumentStore {
    /// A store that never touches the file system.
    pub fn in_memory() -> Self {
        Self {
            dir: None,
            state: RwLock::new(Collections::default()),
        }
    }

    /// Open (creating if needed) a store persisted under `path`.
    pub fn open(path: &Utf8Path) -> Result<Self, DocumentStoreError> {
        let dir = open_data_dir(path)?;
        let state = Collections {
            bands: read_collection(&dir, BANDS_FILE)?,
            likes: read_collection(&dir, LIKES_FILE)?,
            users: read_collection(&dir, USERS_FILE)?,
        };
        info!(
            %path,
            bands = state.bands.len(),
            likes = state.likes.len(),
            users = state.users.len(),
            "opened local document store"
        );
        Ok(Self {
            dir: Some(Arc::new(dir)),
            state: RwLock::new(state),
        })
    }

    async fn read<T>(&self, view: impl FnOnce(&Collections) -> T) -> T {
        let guard = self.state.read().await;
        view(&guard)
    }

    async fn mutate<T, E>(
        &self,
        collection: Collection,
        apply: impl FnOnce(&mut Collections) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<DocumentStoreError>,
    {
        // Held across the write so writers stay ordered.
        let mut guard = self.state.write().await;
        let mut next = guard.clone();
        let value = apply(&mut next)?;
        self.persist(collection, &next).await?;
        *guard = next;
        Ok(value)
    }

    async fn persist(
        &self,
        collection: Collection,
        state: &Collections,
    ) -> Result<(), DocumentStoreError> {
        let Some(dir) = &self.dir else {
            return Ok(());
        };
        match collection {
            Collection::Bands => write_collection(dir, BANDS_FILE, &state.bands).await,
            Collection::Likes => write_collection(dir, LIKES_FILE, &state.likes).await,
            Collection::Users => write_collection(dir, USERS_FILE, &state.users).await,
        }?;
        debug!(?collection, "collection persisted");
        Ok(())
    }
}

impl From<DocumentStoreError> for BandRepositoryError {
    fn from(error: DocumentStoreError) -> Self {
        Self::query(error.to_string())
    }
}

impl From<DocumentStoreError> for LikeRepositoryError {
    fn from(error: DocumentStoreError) -> Self {
        Self::query(error.to_string())
    }
}

impl From<DocumentStoreError> for UserPersistenceError {
    fn from(error: DocumentStoreError) -> Self {
        Self::query(error.to_string())
    }
}

#[async_trait]
impl BandRepository for LocalDocumentStore {
    async fn list_all(&self) -> Result<Vec<Band>, BandRepositoryError> {
        Ok(self.read(|state| state.bands.clone()).await)
    }

    async fn create(&self, draft: &BandDraft) -> Result<BandId, BandRepositoryError> {
        self.mutate(Collection::Bands, |state| {
            if state.bands.iter().any(|band| band.name == draft.name) {
                return Err(BandRepositoryError::duplicate_name(draft.name.as_str()));
            }
            let id = BandId::random();
            state.bands.push(Band::from_draft(id, draft.clone()));
            Ok(id)
        })
        .await
    }

    async fn find_by_name(&self, name: &BandName) -> Result<Option<Band>, BandRepositoryError> {
        Ok(self.read(|state| state.bands.iter().find(|band| band.name == *name).cloned()).await)
    }

    async fn update(&self, id: &BandId, patch: BandPatch) -> Result<(), BandRepositoryError> {
        self.mutate(Collection::Bands, |state| {
            let band = state
                .bands
                .iter_mut()
                .find(|band| band.id == *id)
                .ok_or_else(|| BandRepositoryError::query(format!("band {id} does not exist")))?;
            if let Some(likes) = patch.likes {
                band.likes = likes;
            }
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl LikeRepository for LocalDocumentStore {
    async fn list_all(&self) -> Result<Vec<LikeRecord>, LikeRepositoryError> {
        Ok(self.read(|state| state.likes.clone()).await)
    }

    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<LikeRecord>, LikeRepositoryError> {
        let record = self
            .read(|state| {
                state
                    .likes
                    .iter()
                    .find(|record| record.user_id == *user_id)
                    .cloned()
            })
            .await;
        Ok(record)
    }

    async fn create(&self, record: &LikeRecord) -> Result<(), LikeRepositoryError> {
        self.mutate(Collection::Likes, |state| {
            if state.likes.iter().any(|r| r.user_id == record.user_id) {
                return Err(LikeRepositoryError::query(format!(
                    "like record for user {} already exists",
                    record.user_id
                )));
            }
            state.likes.push(record.clone());
            Ok(())
        })
        .await
    }

    async fn update(&self, record: &LikeRecord) -> Result<(), LikeRepositoryError> {
        self.mutate(Collection::Likes, |state| {
            let existing = state
                .likes
                .iter_mut()
                .find(|r| r.user_id == record.user_id)
                .ok_or_else(|| {
                    LikeRepositoryError::query(format!(
                        "no like record for user {}",
                        record.user_id
                    ))
                })?;
            existing.bands = record.bands.clone();
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl UserRepository for LocalDocumentStore {
    async fn create(&self, user: &User) -> Result<(), UserPersistenceError> {
        self.mutate(Collection::Users, |state| {
            if state.users.iter().any(|u| u.email() == user.email()) {
                return Err(UserPersistenceError::duplicate_email(user.email().as_ref()));
            }
            state.users.push(user.clone());
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.read(|state| state.users.iter().find(|u| u.id() == id).cloned()).await)
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.read(|state| state.users.iter().find(|u| u.email() == email).cloned()).await)
    }
}

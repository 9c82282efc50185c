//! Like synchronisation.
//!
//! A toggle touches two collections: the user's [`LikeRecord`] and the band's
//! counter. They are written one after the other, record first, with no
//! transaction spanning both. Counter drift left by a crash between the two
//! writes is repaired by [`crate::domain::reconcile_like_counters`].

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::catalog_service::{map_band_error, map_like_error};
use crate::domain::ports::{BandPatch, BandRepository, LikeCommand, LikeRepository, LikeToggle};
use crate::domain::{BandName, Error, LikeRecord, UserId};

/// Service implementing [`LikeCommand`].
#[derive(Clone)]
pub struct LikeSyncService<B, L> {
    bands: Arc<B>,
    likes: Arc<L>,
}

impl<B, L> LikeSyncService<B, L> {
    /// Create a new service over the given collections.
    pub fn new(bands: Arc<B>, likes: Arc<L>) -> Self {
        Self { bands, likes }
    }
}

#[async_trait]
impl<B, L> LikeCommand for LikeSyncService<B, L>
where
    B: BandRepository,
    L: LikeRepository,
{
    async fn toggle(&self, user_id: &UserId, band_name: &BandName) -> Result<LikeToggle, Error> {
        let band = self
            .bands
            .find_by_name(band_name)
            .await
            .map_err(map_band_error)?
            .ok_or_else(|| Error::not_found(format!("band '{band_name}' not found")))?;

        let existing = self
            .likes
            .find_by_user(user_id)
            .await
            .map_err(map_like_error)?;
        let is_new = existing.is_none();
        let mut record = existing.unwrap_or_else(|| LikeRecord::empty(user_id.clone()));

        let liked = record.toggle(band_name);
        let likes = if liked {
            band.likes.saturating_add(1)
        } else {
            band.likes.saturating_sub(1)
        };

        if is_new {
            self.likes.create(&record).await.map_err(map_like_error)?;
        } else {
            self.likes.update(&record).await.map_err(map_like_error)?;
        }
        self.bands
            .update(&band.id, BandPatch::likes(likes))
            .await
            .map_err(map_band_error)?;

        debug!(user = %user_id, band = %band_name, liked, likes, "like toggled");
        Ok(LikeToggle {
            band_name: band_name.clone(),
            liked,
            likes,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Toggle behaviour over mocked collections.
    use super::*;
    use crate::domain::ports::{
        LikeRepositoryError, MockBandRepository, MockLikeRepository,
    };
    use crate::domain::{Band, BandDraft, BandId, ErrorCode};
    use mockall::predicate::eq;
    use rstest::rstest;

    fn abba(likes: u32) -> Band {
        let draft = BandDraft::try_from_parts("ABBA", "1972", "Pop", "d", "i", "l")
            .expect("valid draft");
        Band {
            likes,
            ..Band::from_draft(BandId::random(), draft)
        }
    }

    fn name() -> BandName {
        BandName::new("ABBA").expect("valid")
    }

    fn band_repo(band: Band, expected_likes: u32) -> MockBandRepository {
        let id = band.id;
        let mut repo = MockBandRepository::new();
        repo.expect_find_by_name()
            .times(1)
            .return_once(move |_| Ok(Some(band)));
        repo.expect_update()
            .with(eq(id), eq(BandPatch::likes(expected_likes)))
            .times(1)
            .return_once(|_, _| Ok(()));
        repo
    }

    #[tokio::test]
    async fn first_like_creates_record_and_increments() {
        let user_id = UserId::random();
        let mut likes = MockLikeRepository::new();
        likes
            .expect_find_by_user()
            .times(1)
            .return_once(|_| Ok(None));
        likes
            .expect_create()
            .withf(|record| record.contains(&name()))
            .times(1)
            .return_once(|_| Ok(()));
        likes.expect_update().never();

        let service = LikeSyncService::new(Arc::new(band_repo(abba(5), 6)), Arc::new(likes));
        let outcome = service.toggle(&user_id, &name()).await.expect("toggle");

        assert!(outcome.liked);
        assert_eq!(outcome.likes, 6);
    }

    #[tokio::test]
    async fn second_like_removes_name_and_decrements() {
        let user_id = UserId::random();
        let mut record = LikeRecord::empty(user_id.clone());
        record.toggle(&name());

        let mut likes = MockLikeRepository::new();
        likes
            .expect_find_by_user()
            .times(1)
            .return_once(move |_| Ok(Some(record)));
        likes
            .expect_update()
            .withf(|record| record.bands.is_empty())
            .times(1)
            .return_once(|_| Ok(()));
        likes.expect_create().never();

        let service = LikeSyncService::new(Arc::new(band_repo(abba(6), 5)), Arc::new(likes));
        let outcome = service.toggle(&user_id, &name()).await.expect("toggle");

        assert!(!outcome.liked);
        assert_eq!(outcome.likes, 5);
    }

    #[rstest]
    #[tokio::test]
    async fn unlike_never_drops_counter_below_zero() {
        let user_id = UserId::random();
        let mut record = LikeRecord::empty(user_id.clone());
        record.toggle(&name());

        let mut likes = MockLikeRepository::new();
        likes
            .expect_find_by_user()
            .return_once(move |_| Ok(Some(record)));
        likes.expect_update().return_once(|_| Ok(()));

        let service = LikeSyncService::new(Arc::new(band_repo(abba(0), 0)), Arc::new(likes));
        let outcome = service.toggle(&user_id, &name()).await.expect("toggle");
        assert_eq!(outcome.likes, 0);
    }

    #[tokio::test]
    async fn unknown_band_aborts_without_writes() {
        let mut bands = MockBandRepository::new();
        bands
            .expect_find_by_name()
            .times(1)
            .return_once(|_| Ok(None));
        bands.expect_update().never();
        let mut likes = MockLikeRepository::new();
        likes.expect_find_by_user().never();
        likes.expect_create().never();
        likes.expect_update().never();

        let service = LikeSyncService::new(Arc::new(bands), Arc::new(likes));
        let err = service
            .toggle(&UserId::random(), &name())
            .await
            .expect_err("unknown band");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn record_write_failure_skips_counter_write() {
        let band = abba(5);
        let mut bands = MockBandRepository::new();
        bands
            .expect_find_by_name()
            .return_once(move |_| Ok(Some(band)));
        bands.expect_update().never();
        let mut likes = MockLikeRepository::new();
        likes.expect_find_by_user().return_once(|_| Ok(None));
        likes
            .expect_create()
            .return_once(|_| Err(LikeRepositoryError::connection("offline")));

        let service = LikeSyncService::new(Arc::new(bands), Arc::new(likes));
        let err = service
            .toggle(&UserId::random(), &name())
            .await
            .expect_err("store offline");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}

//! Catalogue domain service.
//!
//! Implements the browsing and band submission driving ports on top of the
//! band and like collections.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    BandCatalogCommand, BandCatalogQuery, BandRepository, BandRepositoryError, LikeRepository,
    LikeRepositoryError,
};
use crate::domain::{
    Band, BandDraft, BandName, CatalogEntry, Error, LikeRecord, UserId, ViewOptions, annotate,
    apply_view, distinct_genres,
};

/// Catalogue service implementing [`BandCatalogQuery`] and
/// [`BandCatalogCommand`].
#[derive(Clone)]
pub struct CatalogService<B, L> {
    bands: Arc<B>,
    likes: Arc<L>,
}

impl<B, L> CatalogService<B, L> {
    /// Create a new service over the given collections.
    pub fn new(bands: Arc<B>, likes: Arc<L>) -> Self {
        Self { bands, likes }
    }
}

pub(crate) fn map_band_error(error: BandRepositoryError) -> Error {
    match error {
        BandRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("band repository unavailable: {message}"))
        }
        BandRepositoryError::Query { message } => {
            Error::internal(format!("band repository error: {message}"))
        }
        BandRepositoryError::DuplicateName { name } => duplicate_name(&name),
    }
}

pub(crate) fn map_like_error(error: LikeRepositoryError) -> Error {
    match error {
        LikeRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("like repository unavailable: {message}"))
        }
        LikeRepositoryError::Query { message } => {
            Error::internal(format!("like repository error: {message}"))
        }
    }
}

fn duplicate_name(name: &str) -> Error {
    Error::conflict(format!("a band named '{name}' already exists")).with_details(json!({
        "field": "name",
        "code": "duplicate_name",
    }))
}

impl<B, L> CatalogService<B, L>
where
    B: BandRepository,
    L: LikeRepository,
{
    /// A signed-in viewer always gets a record, empty until their first like.
    async fn viewer_likes(&self, viewer: Option<&UserId>) -> Result<Option<LikeRecord>, Error> {
        let Some(user_id) = viewer else {
            return Ok(None);
        };
        let record = self
            .likes
            .find_by_user(user_id)
            .await
            .map_err(map_like_error)?
            .unwrap_or_else(|| LikeRecord::empty(user_id.clone()));
        Ok(Some(record))
    }
}

#[async_trait]
impl<B, L> BandCatalogQuery for CatalogService<B, L>
where
    B: BandRepository,
    L: LikeRepository,
{
    async fn browse(
        &self,
        viewer: Option<&UserId>,
        options: &ViewOptions,
    ) -> Result<Vec<CatalogEntry>, Error> {
        let bands = self.bands.list_all().await.map_err(map_band_error)?;
        let liked = self.viewer_likes(viewer).await?;
        let view = apply_view(bands, options, liked.as_ref());
        Ok(annotate(view, liked.as_ref()))
    }

    async fn band_details(
        &self,
        viewer: Option<&UserId>,
        name: &BandName,
    ) -> Result<CatalogEntry, Error> {
        let band = self
            .bands
            .find_by_name(name)
            .await
            .map_err(map_band_error)?
            .ok_or_else(|| Error::not_found(format!("band '{name}' not found")))?;
        let liked = self.viewer_likes(viewer).await?;
        let liked = liked.is_some_and(|record| record.contains(name));
        Ok(CatalogEntry { band, liked })
    }

    async fn genres(&self) -> Result<Vec<String>, Error> {
        let bands = self.bands.list_all().await.map_err(map_band_error)?;
        Ok(distinct_genres(&bands))
    }
}

#[async_trait]
impl<B, L> BandCatalogCommand for CatalogService<B, L>
where
    B: BandRepository,
    L: LikeRepository,
{
    async fn add_band(&self, author: &UserId, draft: BandDraft) -> Result<Band, Error> {
        if self
            .bands
            .find_by_name(&draft.name)
            .await
            .map_err(map_band_error)?
            .is_some()
        {
            return Err(duplicate_name(draft.name.as_str()));
        }

        let id = self.bands.create(&draft).await.map_err(map_band_error)?;
        let band = Band::from_draft(id, draft);
        info!(band = %band.name, author = %author, "band added to catalogue");
        Ok(band)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockBandRepository, MockLikeRepository};
    use crate::domain::{BandId, ErrorCode, GenreFilter};
    use rstest::rstest;

    fn band(name: &str, genre: &str, likes: u32) -> Band {
        let draft = BandDraft::try_from_parts(name, "2000", genre, "d", "i", "l")
            .expect("valid draft");
        Band {
            likes,
            ..Band::from_draft(BandId::random(), draft)
        }
    }

    fn make_service(
        bands: MockBandRepository,
        likes: MockLikeRepository,
    ) -> CatalogService<MockBandRepository, MockLikeRepository> {
        CatalogService::new(Arc::new(bands), Arc::new(likes))
    }

    #[tokio::test]
    async fn browse_anonymous_skips_like_lookup() {
        let mut bands = MockBandRepository::new();
        bands
            .expect_list_all()
            .times(1)
            .return_once(|| Ok(vec![band("Coldplay", "Rock", 2), band("ABBA", "Pop", 5)]));
        let mut likes = MockLikeRepository::new();
        likes.expect_find_by_user().never();

        let service = make_service(bands, likes);
        let options = ViewOptions {
            sort_by_likes: true,
            ..ViewOptions::default()
        };
        let entries = service.browse(None, &options).await.expect("browse succeeds");

        let names: Vec<&str> = entries.iter().map(|e| e.band.name.as_str()).collect();
        assert_eq!(names, ["ABBA", "Coldplay"]);
        assert!(entries.iter().all(|e| !e.liked));
    }

    #[tokio::test]
    async fn browse_marks_viewer_likes() {
        let user_id = UserId::random();
        let mut record = LikeRecord::empty(user_id.clone());
        record.toggle(&BandName::new("ABBA").expect("valid"));

        let mut bands = MockBandRepository::new();
        bands
            .expect_list_all()
            .times(1)
            .return_once(|| Ok(vec![band("Coldplay", "Rock", 2), band("ABBA", "Pop", 5)]));
        let mut likes = MockLikeRepository::new();
        likes
            .expect_find_by_user()
            .times(1)
            .return_once(move |_| Ok(Some(record)));

        let service = make_service(bands, likes);
        let options = ViewOptions {
            liked_only: true,
            genre: GenreFilter::All,
            ..ViewOptions::default()
        };
        let entries = service
            .browse(Some(&user_id), &options)
            .await
            .expect("browse succeeds");

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].band.name.as_str(), "ABBA");
        assert!(entries[0].liked);
    }

    #[tokio::test]
    async fn liked_only_is_empty_before_first_like() {
        let mut bands = MockBandRepository::new();
        bands
            .expect_list_all()
            .times(1)
            .return_once(|| Ok(vec![band("Coldplay", "Rock", 2), band("ABBA", "Pop", 5)]));
        let mut likes = MockLikeRepository::new();
        likes
            .expect_find_by_user()
            .times(1)
            .return_once(|_| Ok(None));

        let service = make_service(bands, likes);
        let options = ViewOptions {
            liked_only: true,
            ..ViewOptions::default()
        };
        let entries = service
            .browse(Some(&UserId::random()), &options)
            .await
            .expect("browse succeeds");

        assert!(entries.is_empty());
    }

    #[rstest]
    #[case(BandRepositoryError::connection("down"), ErrorCode::ServiceUnavailable)]
    #[case(BandRepositoryError::query("boom"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn browse_maps_repository_failures(
        #[case] failure: BandRepositoryError,
        #[case] expected: ErrorCode,
    ) {
        let mut bands = MockBandRepository::new();
        bands
            .expect_list_all()
            .times(1)
            .return_once(move || Err(failure));

        let service = make_service(bands, MockLikeRepository::new());
        let err = service
            .browse(None, &ViewOptions::default())
            .await
            .expect_err("failure surfaces");
        assert_eq!(err.code(), expected);
    }

    #[tokio::test]
    async fn band_details_returns_not_found_for_unknown_name() {
        let mut bands = MockBandRepository::new();
        bands
            .expect_find_by_name()
            .times(1)
            .return_once(|_| Ok(None));

        let service = make_service(bands, MockLikeRepository::new());
        let name = BandName::new("Nobody").expect("valid");
        let err = service
            .band_details(None, &name)
            .await
            .expect_err("unknown band");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn genres_are_distinct_in_catalogue_order() {
        let mut bands = MockBandRepository::new();
        bands.expect_list_all().times(1).return_once(|| {
            Ok(vec![
                band("A", "Rock", 0),
                band("B", "Pop", 0),
                band("C", "Rock", 0),
            ])
        });

        let service = make_service(bands, MockLikeRepository::new());
        assert_eq!(service.genres().await.expect("genres"), ["Rock", "Pop"]);
    }

    #[tokio::test]
    async fn add_band_creates_band_with_zero_likes() {
        let id = BandId::random();
        let mut bands = MockBandRepository::new();
        bands
            .expect_find_by_name()
            .times(1)
            .return_once(|_| Ok(None));
        bands
            .expect_create()
            .times(1)
            .return_once(move |_| Ok(id));

        let service = make_service(bands, MockLikeRepository::new());
        let draft = BandDraft::try_from_parts("Muse", "1994", "Rock", "d", "i", "l")
            .expect("valid draft");
        let band = service
            .add_band(&UserId::random(), draft)
            .await
            .expect("band added");

        assert_eq!(band.id, id);
        assert_eq!(band.likes, 0);
    }

    #[tokio::test]
    async fn add_band_rejects_duplicate_without_writing() {
        let existing = band("Coldplay", "Rock", 2);
        let mut bands = MockBandRepository::new();
        bands
            .expect_find_by_name()
            .times(1)
            .return_once(move |_| Ok(Some(existing)));
        bands.expect_create().never();

        let service = make_service(bands, MockLikeRepository::new());
        let draft = BandDraft::try_from_parts("Coldplay", "1996", "Rock", "d", "i", "l")
            .expect("valid draft");
        let err = service
            .add_band(&UserId::random(), draft)
            .await
            .expect_err("duplicate");

        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(
            err.details().and_then(|d| d.get("code")).and_then(|c| c.as_str()),
            Some("duplicate_name")
        );
    }

    #[tokio::test]
    async fn add_band_maps_racing_duplicate_to_conflict() {
        let mut bands = MockBandRepository::new();
        bands
            .expect_find_by_name()
            .times(1)
            .return_once(|_| Ok(None));
        bands
            .expect_create()
            .times(1)
            .return_once(|_| Err(BandRepositoryError::duplicate_name("Muse")));

        let service = make_service(bands, MockLikeRepository::new());
        let draft = BandDraft::try_from_parts("Muse", "1994", "Rock", "d", "i", "l")
            .expect("valid draft");
        let err = service
            .add_band(&UserId::random(), draft)
            .await
            .expect_err("duplicate");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }
}

//! PostgreSQL-backed [`BandRepository`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{BandPatch, BandRepository, BandRepositoryError};
use crate::domain::{Band, BandDraft, BandId, BandName};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{BandChangeset, BandRow, NewBandRow};
use super::pool::{DbPool, PoolError};
use super::schema::bands;

/// Diesel implementation of the band collection.
#[derive(Clone)]
pub struct DieselBandRepository {
    pool: DbPool,
}

impl DieselBandRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> BandRepositoryError {
    map_basic_pool_error(error, BandRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> BandRepositoryError {
    map_basic_diesel_error(
        error,
        BandRepositoryError::query,
        BandRepositoryError::connection,
    )
}

fn row_to_band(row: BandRow) -> Result<Band, BandRepositoryError> {
    let name = BandName::new(&row.name)
        .map_err(|err| BandRepositoryError::query(format!("stored band name invalid: {err}")))?;
    let likes = u32::try_from(row.likes).unwrap_or_else(|_| {
        warn!(band = %row.id, likes = row.likes, "negative like counter, reading as zero");
        0
    });
    Ok(Band {
        id: BandId::from_uuid(row.id),
        name,
        year: row.year,
        genre: row.genre,
        description: row.description,
        image: row.image,
        link: row.link,
        likes,
    })
}

fn likes_column(likes: u32) -> Result<i32, BandRepositoryError> {
    i32::try_from(likes)
        .map_err(|_| BandRepositoryError::query(format!("like counter {likes} out of range")))
}

#[async_trait]
impl BandRepository for DieselBandRepository {
    async fn list_all(&self) -> Result<Vec<Band>, BandRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<BandRow> = bands::table
            .order(bands::position.asc())
            .select(BandRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_band).collect()
    }

    async fn create(&self, draft: &BandDraft) -> Result<BandId, BandRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = BandId::random();
        let row = NewBandRow {
            id: *id.as_uuid(),
            name: draft.name.as_str(),
            year: draft.year,
            genre: &draft.genre,
            description: &draft.description,
            image: &draft.image,
            link: &draft.link,
        };
        diesel::insert_into(bands::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    BandRepositoryError::duplicate_name(draft.name.as_str())
                } else {
                    map_diesel_error(err)
                }
            })?;
        Ok(id)
    }

    async fn find_by_name(&self, name: &BandName) -> Result<Option<Band>, BandRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<BandRow> = bands::table
            .filter(bands::name.eq(name.as_str()))
            .select(BandRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_band).transpose()
    }

    async fn update(&self, id: &BandId, patch: BandPatch) -> Result<(), BandRepositoryError> {
        let changeset = BandChangeset {
            likes: patch.likes.map(likes_column).transpose()?,
        };
        if changeset.likes.is_none() {
            return Ok(());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(bands::table.find(id.as_uuid()))
            .set(&changeset)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Err(BandRepositoryError::query(format!("band {id} does not exist")));
        }
        Ok(())
    }
}

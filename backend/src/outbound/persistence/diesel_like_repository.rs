//! PostgreSQL-backed [`LikeRepository`].

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{LikeRepository, LikeRepositoryError};
use crate::domain::{BandName, LikeRecord, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{LikeRow, LikeUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::likes;

/// Diesel implementation of the like record collection.
#[derive(Clone)]
pub struct DieselLikeRepository {
    pool: DbPool,
}

impl DieselLikeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> LikeRepositoryError {
    map_basic_pool_error(error, LikeRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> LikeRepositoryError {
    map_basic_diesel_error(
        error,
        LikeRepositoryError::query,
        LikeRepositoryError::connection,
    )
}

fn row_to_record(row: LikeRow) -> Result<LikeRecord, LikeRepositoryError> {
    let bands: BTreeSet<BandName> = row
        .bands
        .iter()
        .map(BandName::new)
        .collect::<Result<_, _>>()
        .map_err(|err| LikeRepositoryError::query(format!("stored band name invalid: {err}")))?;
    Ok(LikeRecord {
        user_id: UserId::from_uuid(row.user_id),
        bands,
    })
}

fn band_names(record: &LikeRecord) -> Vec<String> {
    record.bands.iter().map(|name| name.as_str().to_owned()).collect()
}

#[async_trait]
impl LikeRepository for DieselLikeRepository {
    async fn list_all(&self) -> Result<Vec<LikeRecord>, LikeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<LikeRow> = likes::table
            .select(LikeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_record).collect()
    }

    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<LikeRecord>, LikeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<LikeRow> = likes::table
            .find(user_id.as_uuid())
            .select(LikeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_record).transpose()
    }

    async fn create(&self, record: &LikeRecord) -> Result<(), LikeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = LikeRow {
            user_id: *record.user_id.as_uuid(),
            bands: band_names(record),
        };
        diesel::insert_into(likes::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn update(&self, record: &LikeRecord) -> Result<(), LikeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let bands = band_names(record);
        let updated = diesel::update(likes::table.find(record.user_id.as_uuid()))
            .set(&LikeUpdate {
                bands: &bands,
                updated_at: Utc::now(),
            })
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Err(LikeRepositoryError::query(format!(
                "no like record for user {}",
                record.user_id
            )));
        }
        Ok(())
    }
}

//! Internal Diesel row structs.
//!
//! Never exposed to the domain; repositories convert rows at the boundary.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{bands, likes, users};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = bands)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BandRow {
    pub id: Uuid,
    pub name: String,
    pub year: i32,
    pub genre: String,
    pub description: String,
    pub image: String,
    pub link: String,
    pub likes: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bands)]
pub(crate) struct NewBandRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub year: i32,
    pub genre: &'a str,
    pub description: &'a str,
    pub image: &'a str,
    pub link: &'a str,
}

/// Changeset for [`crate::domain::ports::BandPatch`]; `None` columns are
/// skipped.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = bands)]
pub(crate) struct BandChangeset {
    pub likes: Option<i32>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = likes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LikeRow {
    pub user_id: Uuid,
    pub bands: Vec<String>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = likes)]
pub(crate) struct LikeUpdate<'a> {
    pub bands: &'a [String],
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub email: &'a str,
}

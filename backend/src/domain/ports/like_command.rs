//! Driving port for liking and unliking bands.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{BandName, Error, UserId};

/// Outcome of one like toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeToggle {
    pub band_name: BandName,
    /// Whether the band is liked after the toggle.
    pub liked: bool,
    /// Counter value written back to the band.
    pub likes: u32,
}

#[async_trait]
pub trait LikeCommand: Send + Sync {
    /// Flip `user_id`'s like on the band named `band_name`.
    async fn toggle(&self, user_id: &UserId, band_name: &BandName) -> Result<LikeToggle, Error>;
}

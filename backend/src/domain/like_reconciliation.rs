//! Repair of drifted like counters.
//!
//! Recomputes each band's counter from the like records and rewrites the
//! ones that disagree. Runs outside request handling, typically at startup.

use std::collections::HashMap;

use tracing::{info, warn};

use crate::domain::BandName;
use crate::domain::Error;
use crate::domain::catalog_service::{map_band_error, map_like_error};
use crate::domain::ports::{BandPatch, BandRepository, LikeRepository};

/// Rewrite counters so each equals the number of like records naming the
/// band. Returns how many bands were corrected.
pub async fn reconcile_like_counters<B, L>(bands: &B, likes: &L) -> Result<usize, Error>
where
    B: BandRepository + ?Sized,
    L: LikeRepository + ?Sized,
{
    let mut counts: HashMap<BandName, u32> = HashMap::new();
    for record in likes.list_all().await.map_err(map_like_error)? {
        for name in record.bands {
            *counts.entry(name).or_default() += 1;
        }
    }

    let mut corrected = 0;
    for band in bands.list_all().await.map_err(map_band_error)? {
        let actual = counts.get(&band.name).copied().unwrap_or(0);
        if band.likes != actual {
            warn!(band = %band.name, stored = band.likes, actual, "like counter drifted");
            bands
                .update(&band.id, BandPatch::likes(actual))
                .await
                .map_err(map_band_error)?;
            corrected += 1;
        }
    }
    info!(corrected, "like counters reconciled");
    Ok(corrected)
}

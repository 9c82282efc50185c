//! Starter catalogue written into an empty band collection.

use tracing::info;

use crate::domain::catalog_service::map_band_error;
use crate::domain::ports::BandRepository;
use crate::domain::{BandDraft, Error};

struct SampleBand {
    name: &'static str,
    year: &'static str,
    genre: &'static str,
    description: &'static str,
    image: &'static str,
    link: &'static str,
}

const SAMPLE_BANDS: [SampleBand; 2] = [
    SampleBand {
        name: "Imagine Dragons",
        year: "2008",
        genre: "Pop rock",
        description: "American band from Las Vegas known for the hits Believer, Demons and Thunder.",
        image: "images/default_band.png",
        link: "https://www.youtube.com/embed/7wtfhZwyrcc",
    },
    SampleBand {
        name: "Coldplay",
        year: "1996",
        genre: "Alternative rock",
        description: "British band with a melodic sound and the songs Yellow, Viva La Vida and Paradise.",
        image: "images/default_band.png",
        link: "https://www.youtube.com/embed/dvgZkm1xWPE",
    },
];

/// Drafts for the sample catalogue, in display order.
pub fn sample_drafts() -> Result<Vec<BandDraft>, Error> {
    SAMPLE_BANDS
        .iter()
        .map(|band| {
            BandDraft::try_from_parts(
                band.name,
                band.year,
                band.genre,
                band.description,
                band.image,
                band.link,
            )
            .map_err(|err| Error::internal(format!("invalid sample band '{}': {err}", band.name)))
        })
        .collect()
}

/// Insert the sample bands when the collection holds none. Returns the
/// number of bands written; a populated collection is left alone.
pub async fn seed_sample_catalog<B>(bands: &B) -> Result<usize, Error>
where
    B: BandRepository + ?Sized,
{
    if !bands.list_all().await.map_err(map_band_error)?.is_empty() {
        return Ok(0);
    }

    let drafts = sample_drafts()?;
    for draft in &drafts {
        bands.create(draft).await.map_err(map_band_error)?;
    }
    info!(count = drafts.len(), "seeded sample catalogue");
    Ok(drafts.len())
}

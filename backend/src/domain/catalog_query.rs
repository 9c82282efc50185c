//! Catalogue query engine.
//!
//! Pure functions computing the displayed band list from the full band
//! collection and an immutable [`ViewOptions`] value. Filters run in a fixed
//! order: liked-only, genre, search, then the optional sort by likes.

use std::collections::HashSet;

use serde::Serialize;

use crate::domain::{Band, LikeRecord};

/// Sentinel genre value meaning "no genre filter".
pub const ALL_GENRES: &str = "all";

/// Genre filter selected in the catalogue view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GenreFilter {
    /// Keep every genre.
    #[default]
    All,
    /// Keep only bands whose genre matches exactly.
    Exact(String),
}

impl GenreFilter {
    /// Parse a raw selector value; blank input and [`ALL_GENRES`] mean
    /// [`GenreFilter::All`].
    ///
    /// # Examples
    /// ```
    /// use bandstand::domain::GenreFilter;
    ///
    /// assert_eq!(GenreFilter::parse("all"), GenreFilter::All);
    /// assert_eq!(GenreFilter::parse("Rock"), GenreFilter::Exact("Rock".into()));
    /// ```
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() || raw == ALL_GENRES {
            Self::All
        } else {
            Self::Exact(raw.to_owned())
        }
    }

    fn admits(&self, band: &Band) -> bool {
        match self {
            Self::All => true,
            Self::Exact(genre) => band.genre == *genre,
        }
    }
}

/// Immutable view options for one recompute of the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewOptions {
    pub search: String,
    pub genre: GenreFilter,
    pub sort_by_likes: bool,
    pub liked_only: bool,
}

/// A band paired with the viewer's like state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub band: Band,
    pub liked: bool,
}

/// Compute the ordered band list for `options`.
///
/// `liked` is the viewer's like record; `liked_only` has no effect without
/// one. An empty result is a valid outcome.
///
/// # Examples
/// ```
/// use bandstand::domain::{apply_view, Band, BandDraft, BandId, GenreFilter, ViewOptions};
///
/// let rock = Band::from_draft(
///     BandId::random(),
///     BandDraft::try_from_parts("Coldplay", "1996", "Rock", "d", "i", "l").unwrap(),
/// );
/// let options = ViewOptions { genre: GenreFilter::parse("Pop"), ..ViewOptions::default() };
/// assert!(apply_view(vec![rock], &options, None).is_empty());
/// ```
pub fn apply_view(bands: Vec<Band>, options: &ViewOptions, liked: Option<&LikeRecord>) -> Vec<Band> {
    let needle = options.search.to_lowercase();
    let mut view: Vec<Band> = bands
        .into_iter()
        .filter(|band| match (options.liked_only, liked) {
            (true, Some(record)) => record.contains(&band.name),
            _ => true,
        })
        .filter(|band| options.genre.admits(band))
        .filter(|band| needle.is_empty() || band.name.as_str().to_lowercase().contains(&needle))
        .collect();

    if options.sort_by_likes {
        // Stable: equal counters keep collection order.
        view.sort_by(|a, b| b.likes.cmp(&a.likes));
    }
    view
}

/// Pair each band with whether `liked` contains it.
pub fn annotate(bands: Vec<Band>, liked: Option<&LikeRecord>) -> Vec<CatalogEntry> {
    bands
        .into_iter()
        .map(|band| {
            let liked = liked.is_some_and(|record| record.contains(&band.name));
            CatalogEntry { band, liked }
        })
        .collect()
}

/// Distinct genres in first-seen order.
pub fn distinct_genres(bands: &[Band]) -> Vec<String> {
    let mut seen = HashSet::new();
    bands
        .iter()
        .filter(|band| seen.insert(band.genre.as_str()))
        .map(|band| band.genre.clone())
        .collect()
}

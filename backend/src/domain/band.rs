//! Band catalogue entries.
//!
//! A [`Band`] is created from a validated [`BandDraft`] and afterwards only
//! its likes counter changes.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Descriptions longer than this are shortened on catalogue cards.
pub const SHORT_DESCRIPTION_LEN: usize = 100;

/// Earliest formation year accepted for a band.
pub const YEAR_MIN: i32 = 1000;
/// Latest formation year accepted for a band.
pub const YEAR_MAX: i32 = 9999;

/// Validation errors raised while building band components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandValidationError {
    EmptyName,
    InvalidYear,
    EmptyGenre,
    EmptyDescription,
    EmptyImage,
    EmptyLink,
}

impl BandValidationError {
    /// Wire name of the offending field.
    pub fn field(self) -> &'static str {
        match self {
            Self::EmptyName => "name",
            Self::InvalidYear => "year",
            Self::EmptyGenre => "genre",
            Self::EmptyDescription => "description",
            Self::EmptyImage => "image",
            Self::EmptyLink => "link",
        }
    }

    /// Stable machine-readable code.
    pub fn code(self) -> &'static str {
        match self {
            Self::InvalidYear => "invalid_year",
            _ => "missing_field",
        }
    }
}

impl fmt::Display for BandValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidYear => write!(f, "year must be between {YEAR_MIN} and {YEAR_MAX}"),
            other => write!(f, "{} must not be empty", other.field()),
        }
    }
}

impl std::error::Error for BandValidationError {}

/// Stable band identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BandId(Uuid);

impl BandId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for BandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique band name. Trimmed on construction; compared case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BandName(String);

impl BandName {
    /// Validate and construct a [`BandName`].
    pub fn new(name: impl AsRef<str>) -> Result<Self, BandValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(BandValidationError::EmptyName);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the name.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for BandName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for BandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<BandName> for String {
    fn from(value: BandName) -> Self {
        value.0
    }
}

impl TryFrom<String> for BandName {
    type Error = BandValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Catalogue entry for a musical group.
///
/// ## Invariants
/// - `name` is unique within the band collection.
/// - `likes` never drops below zero (it is unsigned and decrements saturate).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Band {
    pub id: BandId,
    pub name: BandName,
    pub year: i32,
    pub genre: String,
    pub description: String,
    pub image: String,
    pub link: String,
    #[serde(default)]
    pub likes: u32,
}

impl Band {
    /// Materialise a draft as a new band with zero likes.
    pub fn from_draft(id: BandId, draft: BandDraft) -> Self {
        let BandDraft {
            name,
            year,
            genre,
            description,
            image,
            link,
        } = draft;
        Self {
            id,
            name,
            year,
            genre,
            description,
            image,
            link,
            likes: 0,
        }
    }

    /// Description as shown on catalogue cards: at most
    /// [`SHORT_DESCRIPTION_LEN`] characters, then `...`.
    ///
    /// # Examples
    /// ```
    /// use bandstand::domain::{Band, BandDraft, BandId};
    ///
    /// let draft = BandDraft::try_from_parts("ABBA", "1972", "Pop", "Swedish pop", "abba.png", "https://abba.example")
    ///     .expect("valid draft");
    /// let band = Band::from_draft(BandId::random(), draft);
    /// assert_eq!(band.short_description(), "Swedish pop");
    /// ```
    pub fn short_description(&self) -> String {
        if self.description.chars().count() > SHORT_DESCRIPTION_LEN {
            let head: String = self.description.chars().take(SHORT_DESCRIPTION_LEN).collect();
            format!("{head}...")
        } else {
            self.description.clone()
        }
    }
}

/// Validated user submission for a new band.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandDraft {
    pub name: BandName,
    pub year: i32,
    pub genre: String,
    pub description: String,
    pub image: String,
    pub link: String,
}

fn required(value: &str, error: BandValidationError) -> Result<String, BandValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(error)
    } else {
        Ok(trimmed.to_owned())
    }
}

impl BandDraft {
    /// Validate raw form values. Every field is required; fields are checked
    /// in form order and the first failure is reported.
    pub fn try_from_parts(
        name: &str,
        year: &str,
        genre: &str,
        description: &str,
        image: &str,
        link: &str,
    ) -> Result<Self, BandValidationError> {
        let name = BandName::new(name)?;
        let year = year
            .trim()
            .parse::<i32>()
            .ok()
            .filter(|y| (YEAR_MIN..=YEAR_MAX).contains(y))
            .ok_or(BandValidationError::InvalidYear)?;
        Ok(Self {
            name,
            year,
            genre: required(genre, BandValidationError::EmptyGenre)?,
            description: required(description, BandValidationError::EmptyDescription)?,
            image: required(image, BandValidationError::EmptyImage)?,
            link: required(link, BandValidationError::EmptyLink)?,
        })
    }
}

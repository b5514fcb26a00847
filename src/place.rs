//! Place records fed into the classifier.
//!
//! [`PlaceCandidate`] is the classifier's input.  [`GooglePlace`] mirrors the
//! subset of a Google Places "place details" record the import pipeline
//! reads, and converts into a candidate.

use serde::{Deserialize, Deserializer, Serialize};

/// Highest Google Places price tier.
pub const MAX_PRICE_LEVEL: u8 = 4;

// ---------------------------------------------------------------------------
// PlaceCandidate
// ---------------------------------------------------------------------------

/// A raw place record to classify.
///
/// Only `name` is required when deserializing; every other field defaults
/// to empty / absent, which the heuristic treats as a neutral signal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceCandidate {
    /// Display name, Thai, English, or both.
    pub name: String,
    #[serde(default)]
    pub formatted_address: String,
    /// Provider category tags such as `"campground"` or `"lodging"`.
    #[serde(default)]
    pub category_tags: Vec<String>,
    /// Provider price tier `0..=4`.
    #[serde(default, deserialize_with = "clamped_price_level")]
    pub price_level: Option<u8>,
    /// Average rating `0.0..=5.0`.
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub photo_count: u32,
    #[serde(default)]
    pub user_ratings_total: Option<u32>,
}

impl PlaceCandidate {
    /// Start a candidate with just a name.
    ///
    /// ```
    /// use campsite_classifier::place::PlaceCandidate;
    ///
    /// let place = PlaceCandidate::new("Khao Yai Glamping")
    ///     .with_tags(["lodging"])
    ///     .with_price_level(3);
    /// assert_eq!(place.price_level, Some(3));
    /// ```
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.formatted_address = address.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.category_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set the price tier; values above 4 are clamped to 4.
    pub fn with_price_level(mut self, level: u8) -> Self {
        self.price_level = Some(level.min(MAX_PRICE_LEVEL));
        self
    }

    pub fn with_rating(mut self, rating: f32) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_photo_count(mut self, count: u32) -> Self {
        self.photo_count = count;
        self
    }

    pub fn with_user_ratings_total(mut self, total: u32) -> Self {
        self.user_ratings_total = Some(total);
        self
    }
}

fn clamped_price_level<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let level = Option::<u32>::deserialize(deserializer)?;
    Ok(level.map(|l| l.min(MAX_PRICE_LEVEL as u32) as u8))
}

// ---------------------------------------------------------------------------
// GooglePlace
// ---------------------------------------------------------------------------

/// Photo reference inside a Google Places record.  Only its presence is used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GooglePhoto {
    #[serde(default)]
    pub photo_reference: Option<String>,
}

/// Google Places "place details" record (snake_case, as the API returns it).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GooglePlace {
    #[serde(default)]
    pub place_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default, deserialize_with = "clamped_price_level")]
    pub price_level: Option<u8>,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub photos: Vec<GooglePhoto>,
    #[serde(default)]
    pub user_ratings_total: Option<u32>,
}

impl From<GooglePlace> for PlaceCandidate {
    fn from(place: GooglePlace) -> Self {
        Self {
            name: place.name,
            formatted_address: place.formatted_address.unwrap_or_default(),
            category_tags: place.types,
            price_level: place.price_level,
            rating: place.rating,
            photo_count: place.photos.len() as u32,
            user_ratings_total: place.user_ratings_total,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

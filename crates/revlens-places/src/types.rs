//! Google Places web service response types.
//!
//! Every response is wrapped in a `{"status": "OK", ...}` envelope;
//! [`ApiResponse`] captures that pattern generically.

use revlens_core::{PlaceInfo, RawReview, ReviewSet};
use serde::Deserialize;

/// Top-level envelope for Places API responses.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(flatten)]
    pub data: T,
}

// ---------------------------------------------------------------------------
// findplacefromtext
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct FindPlaceResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub place_id: String,
}

// ---------------------------------------------------------------------------
// details
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct DetailsResponse {
    #[serde(default)]
    pub result: Option<PlaceDetails>,
}

/// The requested subset of a place: name, address, aggregate rating and
/// up to five reviews in the order the API returns them.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceDetails {
    pub name: String,
    #[serde(default)]
    pub formatted_address: String,
    #[serde(default)]
    pub rating: Option<f64>,
    /// Omitted by the API when the place has no reviews.
    #[serde(default)]
    pub reviews: Vec<RawReview>,
}

impl PlaceDetails {
    /// Attach the place metadata to every review and build the set.
    #[must_use]
    pub fn into_review_set(self) -> ReviewSet {
        let place = PlaceInfo {
            name: self.name,
            address: self.formatted_address,
            rating: self.rating,
        };
        ReviewSet::new(place, self.reviews)
    }
}

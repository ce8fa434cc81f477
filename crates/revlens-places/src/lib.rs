//! Google Places review source.
//!
//! [`PlacesClient`] resolves a free-text location with `findplacefromtext`,
//! fetches the first candidate's details and turns them into a
//! [`revlens_core::ReviewSet`].

pub mod client;
pub mod error;
mod retry;
pub mod types;

pub use client::PlacesClient;
pub use error::PlacesError;
pub use types::PlaceDetails;

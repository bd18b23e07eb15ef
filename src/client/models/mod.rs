//! Listing API data models

mod listing;

pub use listing::{FetchOutcome, ListingEnvelope, ListingPage};

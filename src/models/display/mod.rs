//! Display model implementations for table, pretty and JSON output
//!
//! Airdrop records stay opaque JSON all the way through the feed; these models
//! pick out the fields worth showing in a terminal.

mod airdrop;
mod cache;
mod common;
mod feed;

pub use airdrop::AirdropDisplay;
pub use cache::CacheEntryDisplay;

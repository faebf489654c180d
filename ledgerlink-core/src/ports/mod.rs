//! Trait definitions for external collaborators

mod feed;
mod store;

pub use feed::{FeedProvider, FetchOutcome};
pub use store::{ApplyStats, LedgerStore};

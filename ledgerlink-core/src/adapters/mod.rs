//! Concrete implementations of the feed and store ports

pub mod csv_feed;
pub mod demo;
pub mod json_feed;
pub mod json_store;

pub use csv_feed::CsvFeedProvider;
pub use demo::{demo_account_map, DemoFeedProvider};
pub use json_feed::JsonFeedProvider;
pub use json_store::JsonLedgerStore;

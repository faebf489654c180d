//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with key-derivation logic - no I/O or external dependencies.

mod imported_id;
mod mapping;
mod record;
pub mod result;
mod source;

pub use imported_id::{merchant_slug, ContentKey, ImportedId, PENDING_PREFIX, SETTLED_PREFIX};
pub use mapping::AccountMap;
pub use record::{strip_pending_marker, LedgerRecord, Verdict, PENDING_MARKER};
pub use source::{SourceTransaction, TransactionState};

//! Business logic services

mod mapper;
mod reconcile;
mod sync;

pub use mapper::{MapOutcome, MapperService, SkippedSource};
pub use reconcile::{
    count_duplicates, filter_duplicates, filter_unique, ReconcileOptions, Reconciler,
};
pub use sync::{BatchStats, SyncResult, SyncService};

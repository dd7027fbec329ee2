//! Background refresh scheduling.
//!
//! This module provides the scheduler that loads a versioned store at
//! startup and keeps it current on a fixed interval.

mod outcome;
mod scheduler;
mod state;
mod status;

pub use outcome::{RefreshOutcome, RefreshStatus};
pub use scheduler::{RefreshHandle, RefreshScheduler};
pub use state::RefreshState;
pub use status::StoreStatus;

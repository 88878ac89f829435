//! Maintenance Commands
//!
//! Operator-attended housekeeping that runs outside request serving.
//! `purge` deletes generated migration artifacts after interactive
//! confirmation at every directory level.

pub mod error;
pub mod purge;

pub use error::{PurgeError, PurgeResult};
pub use purge::{PurgeCommand, PurgeOptions, PurgeReport};

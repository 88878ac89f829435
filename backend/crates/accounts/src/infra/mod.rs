//! Infrastructure Layer
//!
//! Database implementations and an in-process store for tests and
//! local runs.

pub mod memory;
pub mod postgres;

pub use memory::MemoryAccountsRepository;
pub use postgres::PgAccountsRepository;

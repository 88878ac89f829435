//! Infrastructure Layer

pub mod memory;
pub mod postgres;

pub use memory::MemoryDiaryRepository;
pub use postgres::PgDiaryRepository;

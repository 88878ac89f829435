//! Diary Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Diary entity, query scoper, repository traits
//! - `application/` - Permission-gated list/create/update/delete use cases
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! Every use case consults `kernel::permission::can` first. A missing
//! grant, a diary owned by someone else and a diary that does not exist
//! all answer 404.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

pub use application::config::DiaryConfig;
pub use error::{DiaryError, DiaryResult};
pub use infra::memory::MemoryDiaryRepository;
pub use infra::postgres::PgDiaryRepository;
pub use presentation::router::{diary_router, diary_router_generic};

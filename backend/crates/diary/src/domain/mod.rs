//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - The Diary entity and its validated form fields
//! - Value objects (DailyCheck)
//! - The query scoper deciding which diaries an actor may see
//! - Repository traits (interfaces)

use kernel::permission::Resource;

pub mod entities;
pub mod repository;
pub mod scope;
pub mod value_objects;

/// Capability target for every diary action
pub const DIARY: Resource = Resource::new("diary", "diary");

//! Presentation Layer

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::DiaryAppState;
pub use router::{diary_router, diary_router_generic};

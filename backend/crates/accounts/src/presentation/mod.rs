//! Presentation Layer
//!
//! HTTP handlers, DTOs, flash messages, router, and middleware.

pub mod dto;
pub mod flash;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::AccountsAppState;
pub use middleware::{RequestContextState, resolve_request_context};
pub use router::{accounts_router, accounts_router_generic};

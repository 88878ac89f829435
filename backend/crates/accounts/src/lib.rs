//! Accounts Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, email policy, repository traits
//! - `application/` - Use cases
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - HTTP handlers, DTOs, router, request-context middleware
//!
//! ## Features
//! - Signup with email: a generated one-time password is mailed before
//!   the account is stored
//! - Sign in/out with server-side sessions bound to the client fingerprint
//! - Profile change (email can be set once, then stays locked)
//! - Password change and password reset by email
//! - Role selector: one of the user's departments becomes the session role

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


pub use application::config::AccountsConfig;
pub use error::{AccountsError, AccountsResult};
pub use infra::memory::MemoryAccountsRepository;
pub use infra::postgres::PgAccountsRepository;
pub use presentation::middleware::{RequestContextState, resolve_request_context};
pub use presentation::router::{accounts_router, accounts_router_generic};

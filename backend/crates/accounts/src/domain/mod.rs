//! Domain Layer
//!
//! Contains entities, value objects, the signup email policy and
//! repository traits.

pub mod email_policy;
pub mod entity;
pub mod repository;
pub mod value_object;

pub use entity::{
    auth_session::AuthSession, department::Department, profile::Profile, user::User,
};
pub use repository::{AuthSessionRepository, DepartmentRepository, UserRepository};

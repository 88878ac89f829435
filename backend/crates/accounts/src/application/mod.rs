//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod password_change;
pub mod password_reset;
pub mod profile_change;
pub mod resolve_context;
pub mod session_token;
pub mod set_role;
pub mod sign_in;
pub mod sign_out;
pub mod signup_with_email;

pub use config::AccountsConfig;
pub use password_change::{PasswordChangeInput, PasswordChangeUseCase};
pub use password_reset::{PasswordResetConfirmInput, PasswordResetUseCase};
pub use profile_change::{ProfileChangeInput, ProfileChangeUseCase, ProfileView};
pub use resolve_context::ResolveContextUseCase;
pub use set_role::{RoleSelection, SetRoleUseCase};
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_out::SignOutUseCase;
pub use signup_with_email::{SignUpWithEmailInput, SignUpWithEmailOutput, SignUpWithEmailUseCase};

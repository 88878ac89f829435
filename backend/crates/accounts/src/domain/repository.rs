//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the
//! infrastructure layer. Method names are distinct across traits so a
//! single store can implement all of them.

use std::collections::BTreeSet;

use kernel::id::{DepartmentId, UserId};
use uuid::Uuid;

use crate::domain::entity::{
    auth_session::AuthSession, department::Department, profile::Profile, user::User,
};
use crate::domain::value_object::{email::Email, user_name::UserName};
use crate::error::AccountsResult;

#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Store a new user together with its empty profile
    ///
    /// A duplicate user name or email is reported as a field error.
    async fn create_user(&self, user: &User, profile: &Profile) -> AccountsResult<()>;

    async fn find_user_by_id(&self, user_id: &UserId) -> AccountsResult<Option<User>>;

    async fn find_user_by_name(&self, user_name: &UserName) -> AccountsResult<Option<User>>;

    async fn find_user_by_email(&self, email: &Email) -> AccountsResult<Option<User>>;

    async fn user_name_exists(&self, user_name: &UserName) -> AccountsResult<bool>;

    /// Whether another user (not `except`) already has this email
    async fn email_exists(&self, email: &Email, except: Option<&UserId>) -> AccountsResult<bool>;

    /// Persist password and login bookkeeping
    async fn update_user(&self, user: &User) -> AccountsResult<()>;

    async fn find_profile(&self, user_id: &UserId) -> AccountsResult<Option<Profile>>;

    /// Persist the profile form: names, email and phone number in one unit
    async fn save_profile(&self, user: &User, profile: &Profile) -> AccountsResult<()>;

    /// Granted permission codenames, e.g. `diary.view_diary`
    async fn permissions_for(&self, user_id: &UserId) -> AccountsResult<BTreeSet<String>>;

    async fn grant_permission(&self, user_id: &UserId, codename: &str) -> AccountsResult<()>;
}

#[trait_variant::make(DepartmentRepository: Send)]
pub trait LocalDepartmentRepository {
    async fn create_department(&self, department: &Department) -> AccountsResult<()>;

    async fn find_department_by_name(&self, name: &str) -> AccountsResult<Option<Department>>;

    /// Idempotent
    async fn add_member(&self, department_id: &DepartmentId, user_id: &UserId)
    -> AccountsResult<()>;

    /// Names of the departments on the user's profile, sorted
    async fn department_names_for(&self, user_id: &UserId) -> AccountsResult<Vec<String>>;
}

#[trait_variant::make(AuthSessionRepository: Send)]
pub trait LocalAuthSessionRepository {
    async fn create_session(&self, session: &AuthSession) -> AccountsResult<()>;

    /// Unexpired session by id; a fingerprint mismatch is an error
    async fn find_session(
        &self,
        session_id: Uuid,
        fingerprint_hash: &[u8],
    ) -> AccountsResult<Option<AuthSession>>;

    /// Persist expiry and last activity
    async fn update_session(&self, session: &AuthSession) -> AccountsResult<()>;

    async fn set_session_role(&self, session_id: Uuid, role: Option<&str>) -> AccountsResult<()>;

    async fn delete_session(&self, session_id: Uuid) -> AccountsResult<()>;

    async fn cleanup_expired(&self) -> AccountsResult<u64>;
}

/// Everything the accounts handlers need from one store
pub trait AccountsRepository:
    UserRepository + DepartmentRepository + AuthSessionRepository + Clone + Send + Sync + 'static
{
}

impl<T> AccountsRepository for T where
    T: UserRepository + DepartmentRepository + AuthSessionRepository + Clone + Send + Sync + 'static
{
}

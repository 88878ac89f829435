//! In-memory Repository
//!
//! Applies the same uniqueness rules as the database constraints so the
//! use cases behave identically against either store.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use kernel::id::{DepartmentId, UserId};
use uuid::Uuid;

use crate::domain::email_policy::{EMAIL_FIELD, EMAIL_TAKEN};
use crate::domain::entity::{
    auth_session::AuthSession, department::Department, profile::Profile, user::User,
};
use crate::domain::repository::{AuthSessionRepository, DepartmentRepository, UserRepository};
use crate::domain::value_object::{
    email::Email,
    user_name::{USER_NAME_TAKEN, UserName},
};
use crate::error::{AccountsError, AccountsResult};

#[derive(Debug, Default)]
struct State {
    users: HashMap<UserId, User>,
    profiles: HashMap<UserId, Profile>,
    permissions: HashMap<UserId, BTreeSet<String>>,
    departments: Vec<Department>,
    members: HashSet<(DepartmentId, UserId)>,
    sessions: HashMap<Uuid, AuthSession>,
}

impl State {
    fn email_taken(&self, email: &Email, except: Option<&UserId>) -> bool {
        self.users.values().any(|u| {
            u.email.as_ref() == Some(email) && Some(&u.user_id) != except
        })
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryAccountsRepository {
    state: Arc<Mutex<State>>,
}

impl MemoryAccountsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> AccountsResult<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| AccountsError::Internal("Memory store lock poisoned".to_string()))
    }
}

impl UserRepository for MemoryAccountsRepository {
    async fn create_user(&self, user: &User, profile: &Profile) -> AccountsResult<()> {
        let mut state = self.state()?;

        if state.users.values().any(|u| u.user_name == user.user_name) {
            return Err(AccountsError::field("username", USER_NAME_TAKEN));
        }
        if let Some(email) = &user.email
            && state.email_taken(email, None)
        {
            return Err(AccountsError::field(EMAIL_FIELD, EMAIL_TAKEN));
        }

        state.users.insert(user.user_id, user.clone());
        state.profiles.insert(user.user_id, profile.clone());
        Ok(())
    }

    async fn find_user_by_id(&self, user_id: &UserId) -> AccountsResult<Option<User>> {
        Ok(self.state()?.users.get(user_id).cloned())
    }

    async fn find_user_by_name(&self, user_name: &UserName) -> AccountsResult<Option<User>> {
        Ok(self
            .state()?
            .users
            .values()
            .find(|u| &u.user_name == user_name)
            .cloned())
    }

    async fn find_user_by_email(&self, email: &Email) -> AccountsResult<Option<User>> {
        Ok(self
            .state()?
            .users
            .values()
            .find(|u| u.email.as_ref() == Some(email))
            .cloned())
    }

    async fn user_name_exists(&self, user_name: &UserName) -> AccountsResult<bool> {
        Ok(self
            .state()?
            .users
            .values()
            .any(|u| &u.user_name == user_name))
    }

    async fn email_exists(&self, email: &Email, except: Option<&UserId>) -> AccountsResult<bool> {
        Ok(self.state()?.email_taken(email, except))
    }

    async fn update_user(&self, user: &User) -> AccountsResult<()> {
        let mut state = self.state()?;
        match state.users.get_mut(&user.user_id) {
            Some(stored) => {
                stored.password_hash = user.password_hash.clone();
                stored.is_active = user.is_active;
                stored.is_superuser = user.is_superuser;
                stored.last_login_at = user.last_login_at;
                stored.updated_at = user.updated_at;
                Ok(())
            }
            None => Err(AccountsError::Internal(format!(
                "User {} not found",
                user.user_id
            ))),
        }
    }

    async fn find_profile(&self, user_id: &UserId) -> AccountsResult<Option<Profile>> {
        Ok(self.state()?.profiles.get(user_id).cloned())
    }

    async fn save_profile(&self, user: &User, profile: &Profile) -> AccountsResult<()> {
        let mut state = self.state()?;

        if let Some(email) = &user.email
            && state.email_taken(email, Some(&user.user_id))
        {
            return Err(AccountsError::field(EMAIL_FIELD, EMAIL_TAKEN));
        }

        let Some(stored) = state.users.get_mut(&user.user_id) else {
            return Err(AccountsError::Internal(format!(
                "User {} not found",
                user.user_id
            )));
        };
        stored.first_name = user.first_name.clone();
        stored.last_name = user.last_name.clone();
        stored.email = user.email.clone();
        stored.updated_at = user.updated_at;

        state.profiles.insert(user.user_id, profile.clone());
        Ok(())
    }

    async fn permissions_for(&self, user_id: &UserId) -> AccountsResult<BTreeSet<String>> {
        Ok(self
            .state()?
            .permissions
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn grant_permission(&self, user_id: &UserId, codename: &str) -> AccountsResult<()> {
        self.state()?
            .permissions
            .entry(*user_id)
            .or_default()
            .insert(codename.to_string());
        Ok(())
    }
}

impl DepartmentRepository for MemoryAccountsRepository {
    async fn create_department(&self, department: &Department) -> AccountsResult<()> {
        let mut state = self.state()?;
        if state.departments.iter().any(|d| d.name == department.name) {
            return Err(AccountsError::field(
                "name",
                "Department with this Name already exists.",
            ));
        }
        state.departments.push(department.clone());
        Ok(())
    }

    async fn find_department_by_name(&self, name: &str) -> AccountsResult<Option<Department>> {
        Ok(self
            .state()?
            .departments
            .iter()
            .find(|d| d.name == name)
            .cloned())
    }

    async fn add_member(
        &self,
        department_id: &DepartmentId,
        user_id: &UserId,
    ) -> AccountsResult<()> {
        self.state()?.members.insert((*department_id, *user_id));
        Ok(())
    }

    async fn department_names_for(&self, user_id: &UserId) -> AccountsResult<Vec<String>> {
        let state = self.state()?;
        let mut names: Vec<String> = state
            .departments
            .iter()
            .filter(|d| state.members.contains(&(d.department_id, *user_id)))
            .map(|d| d.name.clone())
            .collect();
        names.sort();
        Ok(names)
    }
}

impl AuthSessionRepository for MemoryAccountsRepository {
    async fn create_session(&self, session: &AuthSession) -> AccountsResult<()> {
        self.state()?
            .sessions
            .insert(session.session_id, session.clone());
        Ok(())
    }

    async fn find_session(
        &self,
        session_id: Uuid,
        fingerprint_hash: &[u8],
    ) -> AccountsResult<Option<AuthSession>> {
        let state = self.state()?;
        let Some(session) = state.sessions.get(&session_id) else {
            return Ok(None);
        };
        if session.is_expired() {
            return Ok(None);
        }
        if session.client_fingerprint_hash != fingerprint_hash {
            tracing::warn!(session_id = %session_id, "Auth session fingerprint mismatch");
            return Err(AccountsError::SessionFingerprintMismatch);
        }
        Ok(Some(session.clone()))
    }

    async fn update_session(&self, session: &AuthSession) -> AccountsResult<()> {
        if let Some(stored) = self.state()?.sessions.get_mut(&session.session_id) {
            stored.expires_at_ms = session.expires_at_ms;
            stored.last_activity_at = session.last_activity_at;
        }
        Ok(())
    }

    async fn set_session_role(&self, session_id: Uuid, role: Option<&str>) -> AccountsResult<()> {
        if let Some(stored) = self.state()?.sessions.get_mut(&session_id) {
            stored.active_role = role.map(str::to_string);
        }
        Ok(())
    }

    async fn delete_session(&self, session_id: Uuid) -> AccountsResult<()> {
        self.state()?.sessions.remove(&session_id);
        Ok(())
    }

    async fn cleanup_expired(&self) -> AccountsResult<u64> {
        let now_ms = Utc::now().timestamp_millis();
        let mut state = self.state()?;
        let before = state.sessions.len();
        state.sessions.retain(|_, s| s.expires_at_ms >= now_ms);
        Ok((before - state.sessions.len()) as u64)
    }
}

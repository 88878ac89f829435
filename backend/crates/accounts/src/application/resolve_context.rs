//! Resolve Context Use Case
//!
//! Turns a session cookie into the per-request identity: the user,
//! their permission grants, their departments and the session role.

use std::sync::Arc;

use kernel::context::{Actor, RequestContext};

use crate::application::config::AccountsConfig;
use crate::application::session_token;
use crate::domain::repository::{AuthSessionRepository, DepartmentRepository, UserRepository};
use crate::error::{AccountsError, AccountsResult};

pub struct ResolveContextUseCase<R>
where
    R: UserRepository + DepartmentRepository + AuthSessionRepository + Clone + Sync + 'static,
{
    repo: Arc<R>,
    config: Arc<AccountsConfig>,
}

impl<R> ResolveContextUseCase<R>
where
    R: UserRepository + DepartmentRepository + AuthSessionRepository + Clone + Sync + 'static,
{
    pub fn new(repo: Arc<R>, config: Arc<AccountsConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(
        &self,
        session_token: &str,
        fingerprint_hash: &[u8],
    ) -> AccountsResult<RequestContext> {
        let session_id = session_token::parse(&self.config, session_token)?;

        let mut session = self
            .repo
            .find_session(session_id, fingerprint_hash)
            .await?
            .ok_or(AccountsError::SessionInvalid)?;

        if session.is_expired() {
            self.repo.delete_session(session_id).await?;
            return Err(AccountsError::SessionInvalid);
        }

        let user = self
            .repo
            .find_user_by_id(&session.user_id)
            .await?
            .filter(|user| user.can_login())
            .ok_or(AccountsError::SessionInvalid)?;

        let permissions = self.repo.permissions_for(&user.user_id).await?;
        let departments = self.repo.department_names_for(&user.user_id).await?;

        session.touch();
        let ttl_long = chrono::Duration::from_std(self.config.session_ttl_long)
            .map_err(|e| AccountsError::Internal(format!("Invalid session TTL: {e}")))?;
        session.extend_if_needed(ttl_long);

        // Activity bookkeeping does not hold up the request.
        let repo = self.repo.clone();
        let touched = session.clone();
        tokio::spawn(async move {
            if let Err(e) = repo.update_session(&touched).await {
                tracing::warn!(error = %e, "Failed to update session activity");
            }
        });

        let actor = Actor {
            user_id: user.user_id,
            user_name: user.user_name.as_str().to_string(),
            is_superuser: user.is_superuser,
            permissions,
            departments,
        };

        Ok(RequestContext::new(actor, session_id, session.active_role))
    }
}

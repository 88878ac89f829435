//! Set Role Use Case
//!
//! A user may act under any department on their profile. The choice is
//! stored on the session.

use std::sync::Arc;

use kernel::context::RequestContext;

use crate::domain::repository::AuthSessionRepository;
use crate::error::AccountsResult;

pub const NO_ACCESS_TO_ROLE: &str = "You have no access to this role.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleSelection {
    Accepted,
    /// Not one of the user's departments; the session is unchanged
    Denied,
}

pub struct SetRoleUseCase<S>
where
    S: AuthSessionRepository,
{
    session_repo: Arc<S>,
}

impl<S> SetRoleUseCase<S>
where
    S: AuthSessionRepository,
{
    pub fn new(session_repo: Arc<S>) -> Self {
        Self { session_repo }
    }

    pub async fn execute(&self, ctx: &RequestContext, role: &str) -> AccountsResult<RoleSelection> {
        if !ctx.actor.belongs_to(role) {
            tracing::debug!(user_id = %ctx.actor.user_id, role, "Role not granted");
            return Ok(RoleSelection::Denied);
        }

        self.session_repo
            .set_session_role(ctx.session_id, Some(role))
            .await?;

        tracing::info!(user_id = %ctx.actor.user_id, role, "Active role set");
        Ok(RoleSelection::Accepted)
    }
}

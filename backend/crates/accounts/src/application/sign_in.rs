//! Sign In Use Case
//!
//! Authenticates a user and creates a session.

use std::sync::Arc;

use platform::client::ClientFingerprint;
use platform::password::ClearTextPassword;

use crate::application::config::AccountsConfig;
use crate::application::session_token;
use crate::domain::entity::{auth_session::AuthSession, user::User};
use crate::domain::repository::{AuthSessionRepository, UserRepository};
use crate::domain::value_object::user_name::UserName;
use crate::error::{AccountsError, AccountsResult};

pub struct SignInInput {
    pub user_name: String,
    pub password: String,
    pub remember_me: bool,
}

pub struct SignInOutput {
    /// Value for the session cookie
    pub session_token: String,
    pub user: User,
}

pub struct SignInUseCase<U, S>
where
    U: UserRepository,
    S: AuthSessionRepository,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
    config: Arc<AccountsConfig>,
}

impl<U, S> SignInUseCase<U, S>
where
    U: UserRepository,
    S: AuthSessionRepository,
{
    pub fn new(user_repo: Arc<U>, session_repo: Arc<S>, config: Arc<AccountsConfig>) -> Self {
        Self {
            user_repo,
            session_repo,
            config,
        }
    }

    pub async fn execute(
        &self,
        input: SignInInput,
        fingerprint: ClientFingerprint,
        client_ip: Option<String>,
    ) -> AccountsResult<SignInOutput> {
        let user_name =
            UserName::new(&input.user_name).map_err(|_| AccountsError::InvalidCredentials)?;

        let mut user = self
            .user_repo
            .find_user_by_name(&user_name)
            .await?
            .ok_or(AccountsError::InvalidCredentials)?;

        let password = ClearTextPassword::for_verification(input.password);
        if !user.password_hash.verify(&password, self.config.pepper()) {
            return Err(AccountsError::InvalidCredentials);
        }

        if !user.can_login() {
            return Err(AccountsError::AccountDisabled);
        }

        user.record_login();
        self.user_repo.update_user(&user).await?;

        let ttl = chrono::Duration::from_std(self.config.session_ttl(input.remember_me))
            .map_err(|e| AccountsError::Internal(format!("Invalid session TTL: {e}")))?;

        let session = AuthSession::new(
            user.user_id,
            input.remember_me,
            fingerprint.hash_vec(),
            client_ip,
            fingerprint.user_agent.clone(),
            ttl,
        );
        self.session_repo.create_session(&session).await?;

        tracing::info!(
            user_id = %user.user_id,
            session_id = %session.session_id,
            remember_me = input.remember_me,
            "User signed in"
        );

        Ok(SignInOutput {
            session_token: session_token::issue(&self.config, session.session_id),
            user,
        })
    }
}

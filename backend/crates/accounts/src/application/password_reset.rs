//! Password Reset Use Case
//!
//! A reset request mails a signed link and changes nothing. The link
//! carries `user_id:expires_at:state`, where `state` is derived from the
//! stored password hash, so it stops working once it expires or once
//! any password change lands.

use std::sync::Arc;

use chrono::Utc;
use kernel::error::fields::NON_FIELD_ERRORS;
use kernel::id::UserId;
use platform::crypto;
use platform::mail::{Mailer, OutgoingMail};
use platform::password::{ClearTextPassword, HashedPassword};
use uuid::Uuid;

use crate::application::config::AccountsConfig;
use crate::application::password_change::PASSWORD_MISMATCH;
use crate::domain::email_policy::EMAIL_FIELD;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::email::Email;
use crate::error::{AccountsError, AccountsResult};

pub const EMAIL_UNKNOWN: &str = "No user registering with this Email.";

pub const RESET_LINK_INVALID: &str =
    "The password reset link was invalid, possibly because it has already been used.";

pub const CONFIRM_URL_PREFIX: &str = "/accounts/password-reset/confirm/";

pub struct PasswordResetConfirmInput {
    pub token: String,
    pub new_password1: String,
    pub new_password2: String,
}

pub struct PasswordResetUseCase<U, M>
where
    U: UserRepository,
    M: Mailer,
{
    user_repo: Arc<U>,
    mailer: Arc<M>,
    config: Arc<AccountsConfig>,
}

impl<U, M> PasswordResetUseCase<U, M>
where
    U: UserRepository,
    M: Mailer,
{
    pub fn new(user_repo: Arc<U>, mailer: Arc<M>, config: Arc<AccountsConfig>) -> Self {
        Self {
            user_repo,
            mailer,
            config,
        }
    }

    /// Mail a reset link to the registered address
    pub async fn request(&self, email: &str) -> AccountsResult<()> {
        let email = Email::new(email).map_err(|message| AccountsError::field(EMAIL_FIELD, message))?;

        let user = self
            .user_repo
            .find_user_by_email(&email)
            .await?
            .filter(User::can_login)
            .ok_or_else(|| AccountsError::field(EMAIL_FIELD, EMAIL_UNKNOWN))?;

        let token = self.issue(&user);
        let site = &self.config.site_name;
        let user_name = &user.user_name;
        let mail = OutgoingMail {
            subject: format!("[{site}] Password reset"),
            body: format!(
                "Hi {user_name},\n\
                 \n\
                 You're receiving this email because you requested a password reset\n\
                 for your account on {site}.\n\
                 \n\
                 Please go to the following page and choose a new password:\n\
                 {CONFIRM_URL_PREFIX}{token}\n\
                 \n\
                 Your account: {user_name}\n\
                 \n\
                 Sincerely,\n\
                 {site}\n",
            ),
            from: self.config.default_from_email.clone(),
            to: vec![email.as_str().to_string()],
        };
        self.mailer.send(&mail).await?;

        tracing::info!(user_id = %user.user_id, "Password reset link mailed");
        Ok(())
    }

    /// User a reset link is valid for
    pub async fn check(&self, token: &str) -> AccountsResult<User> {
        let invalid = || AccountsError::field(NON_FIELD_ERRORS, RESET_LINK_INVALID);

        let value = crypto::unsign(&self.config.session_secret, token).ok_or_else(invalid)?;
        let mut parts = value.splitn(3, ':');
        let (Some(user_id), Some(expires_at), Some(state)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };
        let user_id: Uuid = user_id.parse().map_err(|_| invalid())?;
        let expires_at: i64 = expires_at.parse().map_err(|_| invalid())?;

        if Utc::now().timestamp() >= expires_at {
            tracing::debug!(%user_id, "Password reset link expired");
            return Err(invalid());
        }

        let user = self
            .user_repo
            .find_user_by_id(&UserId::from_uuid(user_id))
            .await?
            .filter(User::can_login)
            .ok_or_else(invalid)?;

        if state != password_state(&user.password_hash) {
            return Err(invalid());
        }
        Ok(user)
    }

    /// Set the new password when the link is still valid
    pub async fn confirm(&self, input: PasswordResetConfirmInput) -> AccountsResult<()> {
        let mut user = self.check(&input.token).await?;

        if input.new_password1 != input.new_password2 {
            return Err(AccountsError::field("new_password2", PASSWORD_MISMATCH));
        }
        let password = ClearTextPassword::new(input.new_password1)
            .map_err(|e| AccountsError::field("new_password2", e.to_string()))?;

        user.set_password(password.hash(self.config.pepper())?);
        self.user_repo.update_user(&user).await?;

        tracing::info!(user_id = %user.user_id, "Password reset completed");
        Ok(())
    }

    fn issue(&self, user: &User) -> String {
        let expires_at = Utc::now().timestamp() + self.config.password_reset_ttl.as_secs() as i64;
        let value = format!(
            "{}:{}:{}",
            user.user_id,
            expires_at,
            password_state(&user.password_hash)
        );
        crypto::sign(&self.config.session_secret, &value)
    }
}

/// Changes whenever the stored hash changes (fresh salt on every set)
fn password_state(hash: &HashedPassword) -> String {
    crypto::to_base64_url(&crypto::sha256(hash.as_phc_string().as_bytes()))
}

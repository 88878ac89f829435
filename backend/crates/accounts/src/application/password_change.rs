//! Password Change Use Case

use std::sync::Arc;

use kernel::error::fields::FieldErrors;
use kernel::id::UserId;
use platform::password::ClearTextPassword;

use crate::application::config::AccountsConfig;
use crate::domain::repository::UserRepository;
use crate::error::{AccountsError, AccountsResult};

pub const OLD_PASSWORD_INCORRECT: &str =
    "Your old password was entered incorrectly. Please enter it again.";

pub const PASSWORD_MISMATCH: &str = "The two password fields didn’t match.";

pub struct PasswordChangeInput {
    pub old_password: String,
    pub new_password1: String,
    pub new_password2: String,
}

pub struct PasswordChangeUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AccountsConfig>,
}

impl<U> PasswordChangeUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AccountsConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, user_id: &UserId, input: PasswordChangeInput) -> AccountsResult<()> {
        let mut user = self
            .user_repo
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| AccountsError::Internal(format!("User {user_id} vanished")))?;

        let mut errors = FieldErrors::new();

        let old = ClearTextPassword::for_verification(input.old_password);
        if !user.password_hash.verify(&old, self.config.pepper()) {
            errors.add("old_password", OLD_PASSWORD_INCORRECT);
        }

        let new_password = if input.new_password1 != input.new_password2 {
            errors.add("new_password2", PASSWORD_MISMATCH);
            None
        } else {
            ClearTextPassword::new(input.new_password1)
                .map_err(|e| errors.add("new_password2", e.to_string()))
                .ok()
        };

        let (Some(new_password), true) = (new_password, errors.is_empty()) else {
            return Err(AccountsError::Validation(errors));
        };

        user.set_password(new_password.hash(self.config.pepper())?);
        self.user_repo.update_user(&user).await?;

        tracing::info!(user_id = %user.user_id, "Password changed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{profile::Profile, user::User};
    use crate::domain::value_object::{person_name::PersonName, user_name::UserName};
    use crate::infra::memory::MemoryAccountsRepository;

    async fn seed(repo: &MemoryAccountsRepository, password: &str) -> User {
        let user = User::new(
            UserName::new("grace").unwrap(),
            None,
            PersonName::default(),
            PersonName::default(),
            ClearTextPassword::for_verification(password.to_string())
                .hash(None)
                .unwrap(),
        );
        repo.create_user(&user, &Profile::new(user.user_id))
            .await
            .unwrap();
        user
    }

    fn input(old: &str, new1: &str, new2: &str) -> PasswordChangeInput {
        PasswordChangeInput {
            old_password: old.to_string(),
            new_password1: new1.to_string(),
            new_password2: new2.to_string(),
        }
    }

    #[tokio::test]
    async fn test_change_password() {
        let repo = MemoryAccountsRepository::new();
        let user = seed(&repo, "0ld-one-time").await;
        let uc = PasswordChangeUseCase::new(
            Arc::new(repo.clone()),
            Arc::new(AccountsConfig::with_random_secret()),
        );

        uc.execute(&user.user_id, input("0ld-one-time", "Firewall#Shift7", "Firewall#Shift7"))
            .await
            .unwrap();

        let stored = repo.find_user_by_id(&user.user_id).await.unwrap().unwrap();
        assert!(stored.password_hash.verify(
            &ClearTextPassword::for_verification("Firewall#Shift7".to_string()),
            None
        ));
    }

    #[tokio::test]
    async fn test_change_password_errors() {
        let repo = MemoryAccountsRepository::new();
        let user = seed(&repo, "0ld-one-time").await;
        let uc = PasswordChangeUseCase::new(
            Arc::new(repo.clone()),
            Arc::new(AccountsConfig::with_random_secret()),
        );

        let err = uc
            .execute(&user.user_id, input("wrong", "Firewall#Shift7", "Firewall#Shift8"))
            .await
            .unwrap_err();
        let AccountsError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.get("old_password"), [OLD_PASSWORD_INCORRECT.to_string()]);
        assert_eq!(errors.get("new_password2"), [PASSWORD_MISMATCH.to_string()]);

        let err = uc
            .execute(&user.user_id, input("0ld-one-time", "password123", "password123"))
            .await
            .unwrap_err();
        let AccountsError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert!(errors.contains("new_password2"));
        assert!(!errors.contains("old_password"));
    }
}

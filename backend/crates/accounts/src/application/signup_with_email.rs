//! Sign Up With Email Use Case
//!
//! The user supplies a name and an email; the password is generated and
//! mailed. The account is stored only after the mail went out.

use std::sync::Arc;

use kernel::error::fields::FieldErrors;
use platform::mail::{Mailer, OutgoingMail};
use platform::password::ClearTextPassword;

use crate::application::config::AccountsConfig;
use crate::domain::email_policy::{EMAIL_FIELD, EmailPolicy};
use crate::domain::entity::{profile::Profile, user::User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email,
    person_name::PersonName,
    user_name::{USER_NAME_TAKEN, UserName},
};
use crate::error::{AccountsError, AccountsResult};

pub struct SignUpWithEmailInput {
    pub user_name: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug)]
pub struct SignUpWithEmailOutput {
    pub user: User,
}

pub struct SignUpWithEmailUseCase<U, M>
where
    U: UserRepository,
    M: Mailer,
{
    user_repo: Arc<U>,
    mailer: Arc<M>,
    config: Arc<AccountsConfig>,
}

impl<U, M> SignUpWithEmailUseCase<U, M>
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

    pub async fn execute(&self, input: SignUpWithEmailInput) -> AccountsResult<SignUpWithEmailOutput> {
        let mut errors = FieldErrors::new();

        let user_name = match UserName::new(&input.user_name) {
            Ok(name) => {
                if self.user_repo.user_name_exists(&name).await? {
                    errors.add("username", USER_NAME_TAKEN);
                }
                Some(name)
            }
            Err(message) => {
                errors.add("username", message);
                None
            }
        };

        let first_name = PersonName::new(&input.first_name)
            .map_err(|message| errors.add("first_name", message))
            .ok();
        let last_name = PersonName::new(&input.last_name)
            .map_err(|message| errors.add("last_name", message))
            .ok();

        let email = match Email::new(&input.email) {
            Ok(email) => {
                let exists = self.user_repo.email_exists(&email, None).await?;
                let policy =
                    EmailPolicy::new(&self.config.email_endswith, &self.config.email_cant_endswith);
                errors.merge(policy.check(&email, exists));
                Some(email)
            }
            Err(message) => {
                errors.add(EMAIL_FIELD, message);
                None
            }
        };

        let (Some(user_name), Some(email), Some(first_name), Some(last_name), true) =
            (user_name, email, first_name, last_name, errors.is_empty())
        else {
            return Err(AccountsError::Validation(errors));
        };

        let password = ClearTextPassword::generate();
        let password_hash = password.hash(self.config.pepper())?;

        let user = User::new(
            user_name,
            Some(email.clone()),
            first_name,
            last_name,
            password_hash,
        );

        self.mailer
            .send(&self.notification(&user, &email, &password))
            .await?;

        self.user_repo
            .create_user(&user, &Profile::new(user.user_id))
            .await?;

        tracing::info!(
            user_id = %user.user_id,
            user_name = %user.user_name,
            "User signed up with email"
        );

        Ok(SignUpWithEmailOutput { user })
    }

    fn notification(&self, user: &User, email: &Email, password: &ClearTextPassword) -> OutgoingMail {
        let site = &self.config.site_name;
        let user_name = &user.user_name;

        OutgoingMail {
            subject: format!("[{site}] You have created an account."),
            body: format!(
                "Hi {user_name},\n\
                 \n\
                 You have created a new account on {site}.\n\
                 You could login and change it on {site} later.\n\
                 \n\
                 Your account: {user_name}\n\
                 Your password: {password}\n\
                 \n\
                 Sincerely,\n\
                 {site}\n",
                password = password.expose(),
            ),
            from: self.config.default_from_email.clone(),
            to: vec![email.as_str().to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repository::UserRepository;
    use crate::infra::memory::MemoryAccountsRepository;
    use platform::mail::MemoryMailer;
    use platform::password::ClearTextPassword;

    fn config() -> AccountsConfig {
        AccountsConfig {
            email_endswith: vec!["corp.com".to_string()],
            email_cant_endswith: vec!["@temp.corp.com".to_string()],
            default_from_email: "noreply@corp.com".to_string(),
            ..AccountsConfig::with_random_secret()
        }
    }

    fn input(user_name: &str, email: &str) -> SignUpWithEmailInput {
        SignUpWithEmailInput {
            user_name: user_name.to_string(),
            email: email.to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
        }
    }

    fn use_case(
        repo: &MemoryAccountsRepository,
        mailer: &MemoryMailer,
    ) -> SignUpWithEmailUseCase<MemoryAccountsRepository, MemoryMailer> {
        SignUpWithEmailUseCase::new(
            Arc::new(repo.clone()),
            Arc::new(mailer.clone()),
            Arc::new(config()),
        )
    }

    #[tokio::test]
    async fn test_signup_mails_password_then_stores_user() {
        let repo = MemoryAccountsRepository::new();
        let mailer = MemoryMailer::new();

        let output = use_case(&repo, &mailer)
            .execute(input("alice", "alice@corp.com"))
            .await
            .unwrap();

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        let mail = &sent[0];
        assert_eq!(mail.subject, "[Chief Firewall Admin] You have created an account.");
        assert_eq!(mail.from, "noreply@corp.com");
        assert_eq!(mail.to, vec!["alice@corp.com".to_string()]);
        assert!(mail.body.starts_with("Hi alice,\n\n"));
        assert!(mail.body.contains("Your account: alice\n"));

        let password_line = mail
            .body
            .lines()
            .find_map(|l| l.strip_prefix("Your password: "))
            .unwrap();
        assert_eq!(password_line.len(), 32);

        let stored = repo
            .find_user_by_id(&output.user.user_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.email.unwrap().as_str(), "alice@corp.com");
        assert!(stored.password_hash.verify(
            &ClearTextPassword::for_verification(password_line.to_string()),
            None
        ));
    }

    #[tokio::test]
    async fn test_mail_failure_persists_nothing() {
        let repo = MemoryAccountsRepository::new();
        let mailer = MemoryMailer::failing();

        let err = use_case(&repo, &mailer)
            .execute(input("alice", "alice@corp.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, AccountsError::Mail(_)));
        assert!(
            !repo
                .user_name_exists(&UserName::new("alice").unwrap())
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_policy_violations_collected() {
        let repo = MemoryAccountsRepository::new();
        let mailer = MemoryMailer::new();
        let uc = use_case(&repo, &mailer);
        uc.execute(input("taken", "first@corp.com")).await.unwrap();

        let err = uc
            .execute(input("taken", "x@temp.corp.com"))
            .await
            .unwrap_err();
        let AccountsError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.get("username"), [USER_NAME_TAKEN.to_string()]);
        assert_eq!(
            errors.get("email"),
            ["The Email address must not end with @temp.corp.com.".to_string()]
        );
        assert_eq!(mailer.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_email_and_bad_suffix() {
        let repo = MemoryAccountsRepository::new();
        let mailer = MemoryMailer::new();
        let uc = use_case(&repo, &mailer);
        uc.execute(input("alice", "alice@corp.com")).await.unwrap();

        let err = uc
            .execute(input("bob", "alice@corp.com"))
            .await
            .unwrap_err();
        let AccountsError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(
            errors.get("email"),
            ["A user with this Email already exists.".to_string()]
        );

        let err = uc
            .execute(input("carol", "carol@gmail.com"))
            .await
            .unwrap_err();
        let AccountsError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(
            errors.get("email"),
            ["The Email address must end with corp.com.".to_string()]
        );
    }

    #[tokio::test]
    async fn test_invalid_email_skips_policy() {
        let repo = MemoryAccountsRepository::new();
        let mailer = MemoryMailer::new();

        let err = use_case(&repo, &mailer)
            .execute(input("", "not-an-email"))
            .await
            .unwrap_err();
        let AccountsError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.get("email"), ["Enter a valid email address.".to_string()]);
        assert_eq!(errors.get("username"), ["This field is required.".to_string()]);
        assert!(mailer.sent().is_empty());
    }
}

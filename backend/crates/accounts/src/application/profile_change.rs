//! Profile Change Use Case
//!
//! Names and phone number are always editable. The email can be filled
//! in once; after that the submitted value is ignored.

use std::sync::Arc;

use kernel::error::fields::FieldErrors;
use kernel::id::UserId;
use serde::Serialize;

use crate::domain::email_policy::{EMAIL_FIELD, EMAIL_TAKEN};
use crate::domain::entity::{profile::Profile, user::User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email, person_name::PersonName, phone_number::PhoneNumber,
};
use crate::error::{AccountsError, AccountsResult};

pub const EMAIL_HELP: &str = "Email cannot be changed after setting.";

/// Current profile values, as shown on the form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// The email input is disabled
    pub email_locked: bool,
    pub phone_number: String,
}

impl ProfileView {
    fn new(user: &User, profile: &Profile) -> Self {
        Self {
            user_name: user.user_name.to_string(),
            first_name: user.first_name.to_string(),
            last_name: user.last_name.to_string(),
            email: user.email.as_ref().map(|e| e.to_string()).unwrap_or_default(),
            email_locked: user.is_email_locked(),
            phone_number: profile.phone_number.to_string(),
        }
    }
}

pub struct ProfileChangeInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
}

pub struct ProfileChangeUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> ProfileChangeUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    async fn load(&self, user_id: &UserId) -> AccountsResult<(User, Profile)> {
        let user = self
            .user_repo
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| AccountsError::Internal(format!("User {user_id} vanished")))?;
        let profile = self
            .user_repo
            .find_profile(user_id)
            .await?
            .unwrap_or_else(|| Profile::new(*user_id));
        Ok((user, profile))
    }

    pub async fn view(&self, user_id: &UserId) -> AccountsResult<ProfileView> {
        let (user, profile) = self.load(user_id).await?;
        Ok(ProfileView::new(&user, &profile))
    }

    pub async fn execute(
        &self,
        user_id: &UserId,
        input: ProfileChangeInput,
    ) -> AccountsResult<ProfileView> {
        let (mut user, mut profile) = self.load(user_id).await?;
        let mut errors = FieldErrors::new();

        let first_name = PersonName::new(&input.first_name)
            .map_err(|message| errors.add("first_name", message))
            .ok();
        let last_name = PersonName::new(&input.last_name)
            .map_err(|message| errors.add("last_name", message))
            .ok();
        let phone_number = PhoneNumber::new(&input.phone_number)
            .map_err(|message| errors.add("phone_number", message))
            .ok();

        let mut new_email = None;
        if !user.is_email_locked() && !input.email.trim().is_empty() {
            match Email::new(&input.email) {
                Ok(email) => {
                    if self.user_repo.email_exists(&email, Some(user_id)).await? {
                        errors.add(EMAIL_FIELD, EMAIL_TAKEN);
                    } else {
                        new_email = Some(email);
                    }
                }
                Err(message) => errors.add(EMAIL_FIELD, message),
            }
        }

        let (Some(first_name), Some(last_name), Some(phone_number), true) =
            (first_name, last_name, phone_number, errors.is_empty())
        else {
            return Err(AccountsError::Validation(errors));
        };

        user.rename(first_name, last_name);
        if let Some(email) = new_email {
            user.assign_email(email);
        }
        profile.phone_number = phone_number;

        self.user_repo.save_profile(&user, &profile).await?;

        tracing::info!(user_id = %user.user_id, "Profile changed");

        Ok(ProfileView::new(&user, &profile))
    }
}

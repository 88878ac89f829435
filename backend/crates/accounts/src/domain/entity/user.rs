//! User Entity

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use platform::password::HashedPassword;

use crate::domain::value_object::{email::Email, person_name::PersonName, user_name::UserName};

#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    /// Unique login handle
    pub user_name: UserName,
    /// Never changed through the profile once set
    pub email: Option<Email>,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub password_hash: HashedPassword,
    pub is_active: bool,
    pub is_superuser: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        user_name: UserName,
        email: Option<Email>,
        first_name: PersonName,
        last_name: PersonName,
        password_hash: HashedPassword,
    ) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            user_name,
            email,
            first_name,
            last_name,
            password_hash,
            is_active: true,
            is_superuser: false,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn can_login(&self) -> bool {
        self.is_active
    }

    pub fn record_login(&mut self) {
        let now = Utc::now();
        self.last_login_at = Some(now);
        self.updated_at = now;
    }

    pub fn set_password(&mut self, password_hash: HashedPassword) {
        self.password_hash = password_hash;
        self.updated_at = Utc::now();
    }

    pub fn is_email_locked(&self) -> bool {
        self.email.is_some()
    }

    /// Set the email unless one is already present
    ///
    /// Returns whether the email was assigned.
    pub fn assign_email(&mut self, email: Email) -> bool {
        if self.is_email_locked() {
            return false;
        }
        self.email = Some(email);
        self.updated_at = Utc::now();
        true
    }

    pub fn rename(&mut self, first_name: PersonName, last_name: PersonName) {
        self.first_name = first_name;
        self.last_name = last_name;
        self.updated_at = Utc::now();
    }
}

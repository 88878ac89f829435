//! Profile Entity
//!
//! One-to-one extension of a user; department memberships are managed
//! through `DepartmentRepository`.

use kernel::id::UserId;

use crate::domain::value_object::phone_number::PhoneNumber;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub user_id: UserId,
    pub phone_number: PhoneNumber,
}

impl Profile {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            phone_number: PhoneNumber::default(),
        }
    }
}

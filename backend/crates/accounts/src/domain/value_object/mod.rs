//! Value Objects
//!
//! Each constructor returns the user-facing message for the field it
//! guards, ready to be attached to `FieldErrors`.

pub mod email;
pub mod phone_number;
pub mod person_name;
pub mod user_name;

pub const REQUIRED: &str = "This field is required.";

pub(crate) fn too_long(max: usize, actual: usize) -> String {
    format!(
        "Ensure this value has at most {} characters (it has {}).",
        max, actual
    )
}

//! Signup email policy
//!
//! Required suffixes, forbidden suffixes and uniqueness are checked
//! independently so one submission can report every violation at once.

use kernel::error::fields::FieldErrors;

use crate::domain::value_object::email::Email;

pub const EMAIL_FIELD: &str = "email";

pub const EMAIL_TAKEN: &str = "A user with this Email already exists.";

/// Suffix rules for one validation pass
///
/// Borrows the configured lists; every call sees them unmodified.
#[derive(Debug, Clone, Copy)]
pub struct EmailPolicy<'a> {
    required: &'a [String],
    forbidden: &'a [String],
}

impl<'a> EmailPolicy<'a> {
    pub fn new(required: &'a [String], forbidden: &'a [String]) -> Self {
        Self {
            required,
            forbidden,
        }
    }

    /// Violations for `email`; `exists` is whether a user already has it
    pub fn check(&self, email: &Email, exists: bool) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if !self.required.is_empty() && !self.required.iter().any(|s| email.ends_with(s)) {
            errors.add(
                EMAIL_FIELD,
                format!(
                    "The Email address must end with {}.",
                    self.required.join(", ")
                ),
            );
        }

        if self.forbidden.iter().any(|s| email.ends_with(s)) {
            errors.add(
                EMAIL_FIELD,
                format!(
                    "The Email address must not end with {}.",
                    self.forbidden.join(", ")
                ),
            );
        }

        if exists {
            errors.add(EMAIL_FIELD, EMAIL_TAKEN);
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn email(s: &str) -> Email {
        Email::new(s).unwrap()
    }

    #[test]
    fn test_no_rules_no_errors() {
        let policy = EmailPolicy::new(&[], &[]);
        assert!(policy.check(&email("a@anything.org"), false).is_empty());
    }

    #[test]
    fn test_required_suffix() {
        let required = list(&["@corp.com", "@corp.net"]);
        let policy = EmailPolicy::new(&required, &[]);

        assert!(policy.check(&email("a@corp.net"), false).is_empty());

        let errors = policy.check(&email("a@gmail.com"), false);
        assert_eq!(
            errors.get(EMAIL_FIELD),
            ["The Email address must end with @corp.com, @corp.net.".to_string()]
        );
    }

    #[test]
    fn test_forbidden_suffix() {
        let forbidden = list(&["@temp.corp.com", "@old.corp.com"]);
        let policy = EmailPolicy::new(&[], &forbidden);

        let errors = policy.check(&email("a@old.corp.com"), false);
        assert_eq!(
            errors.get(EMAIL_FIELD),
            ["The Email address must not end with @temp.corp.com, @old.corp.com.".to_string()]
        );
    }

    #[test]
    fn test_all_checks_reported_together() {
        let required = list(&["@corp.com"]);
        let forbidden = list(&[".net"]);
        let policy = EmailPolicy::new(&required, &forbidden);

        let errors = policy.check(&email("dup@evil.net"), true);
        let messages = errors.get(EMAIL_FIELD);
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0], "The Email address must end with @corp.com.");
        assert_eq!(messages[1], "The Email address must not end with .net.");
        assert_eq!(messages[2], EMAIL_TAKEN);
    }

    #[test]
    fn test_suffixes_match_as_typed() {
        let required = list(&["@Corp.com"]);
        let forbidden = list(&["@Old.Corp.com"]);
        let policy = EmailPolicy::new(&required, &forbidden);

        assert!(policy.check(&email("a@Corp.com"), false).is_empty());
        assert_eq!(policy.check(&email("a@corp.com"), false).get(EMAIL_FIELD).len(), 1);

        let errors = policy.check(&email("a@Old.Corp.com"), false);
        assert_eq!(
            errors.get(EMAIL_FIELD),
            ["The Email address must not end with @Old.Corp.com.".to_string()]
        );
    }

    #[test]
    fn test_policy_inputs_not_mutated() {
        let required = list(&["@corp.com"]);
        let forbidden = list(&["@x.corp.com"]);
        let policy = EmailPolicy::new(&required, &forbidden);

        for _ in 0..3 {
            policy.check(&email("a@x.corp.com"), false);
        }
        assert_eq!(required, list(&["@corp.com"]));
        assert_eq!(forbidden, list(&["@x.corp.com"]));
    }
}

//! Session cookie tokens: `session_id.hmac`

use uuid::Uuid;

use crate::application::config::AccountsConfig;
use crate::error::{AccountsError, AccountsResult};

pub fn issue(config: &AccountsConfig, session_id: Uuid) -> String {
    platform::crypto::sign(&config.session_secret, &session_id.to_string())
}

/// Verify the signature and recover the session id
pub fn parse(config: &AccountsConfig, token: &str) -> AccountsResult<Uuid> {
    platform::crypto::unsign(&config.session_secret, token)
        .and_then(|id| id.parse().ok())
        .ok_or(AccountsError::SessionInvalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_parse() {
        let config = AccountsConfig::with_random_secret();
        let id = Uuid::new_v4();
        let token = issue(&config, id);
        assert_eq!(parse(&config, &token).unwrap(), id);

        let other = AccountsConfig::with_random_secret();
        assert!(matches!(
            parse(&other, &token),
            Err(AccountsError::SessionInvalid)
        ));
        assert!(parse(&config, "garbage").is_err());
        assert!(parse(&config, &platform::crypto::sign(&config.session_secret, "not-a-uuid")).is_err());
    }
}

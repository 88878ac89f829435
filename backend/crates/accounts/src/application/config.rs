//! Application Configuration

use std::time::Duration;

pub use platform::cookie::SameSite;
use platform::cookie::CookieConfig;

pub const DEFAULT_SITE_NAME: &str = "Chief Firewall Admin";

#[derive(Debug, Clone)]
pub struct AccountsConfig {
    pub session_cookie_name: String,
    /// HMAC key for session tokens, reset links and the flash cookie (32 bytes)
    pub session_secret: [u8; 32],
    /// Session TTL without "Remember Me"
    pub session_ttl_short: Duration,
    /// Session TTL with "Remember Me"
    pub session_ttl_long: Duration,
    /// Lifetime of a mailed password reset link
    pub password_reset_ttl: Duration,
    pub cookie_secure: bool,
    pub cookie_same_site: SameSite,
    /// Application-wide secret mixed into every password hash
    pub password_pepper: Option<Vec<u8>>,
    /// Signup emails must end with one of these (empty: no requirement)
    pub email_endswith: Vec<String>,
    /// Signup emails must not end with any of these
    pub email_cant_endswith: Vec<String>,
    pub default_from_email: String,
    pub site_name: String,
    pub flash_cookie_name: String,
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: "sessionid".to_string(),
            session_secret: [0u8; 32],
            session_ttl_short: Duration::from_secs(12 * 3600),
            session_ttl_long: Duration::from_secs(14 * 24 * 3600),
            password_reset_ttl: Duration::from_secs(3 * 24 * 3600),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            password_pepper: None,
            email_endswith: Vec::new(),
            email_cant_endswith: Vec::new(),
            default_from_email: "webmaster@localhost".to_string(),
            site_name: DEFAULT_SITE_NAME.to_string(),
            flash_cookie_name: "messages".to_string(),
        }
    }
}

impl AccountsConfig {
    /// Config with a random session secret
    pub fn with_random_secret() -> Self {
        Self {
            session_secret: platform::crypto::random_secret(),
            ..Default::default()
        }
    }

    /// Config for development (insecure cookies)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    pub fn session_ttl(&self, remember_me: bool) -> Duration {
        if remember_me {
            self.session_ttl_long
        } else {
            self.session_ttl_short
        }
    }

    /// Remember-me sessions outlive the browser; others end with it
    pub fn session_cookie(&self, remember_me: bool) -> CookieConfig {
        let cookie = self.cookie(&self.session_cookie_name);
        if remember_me {
            cookie.with_max_age(self.session_ttl_long.as_secs() as i64)
        } else {
            cookie
        }
    }

    pub fn flash_cookie(&self) -> CookieConfig {
        self.cookie(&self.flash_cookie_name)
    }

    fn cookie(&self, name: &str) -> CookieConfig {
        let mut cookie = CookieConfig::new(name);
        cookie.secure = self.cookie_secure;
        cookie.same_site = self.cookie_same_site;
        cookie
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_development_config() {
        let config = AccountsConfig::development();
        assert!(!config.cookie_secure);
        assert_ne!(config.session_secret, [0u8; 32]);
        assert_eq!(config.site_name, DEFAULT_SITE_NAME);
    }

    #[test]
    fn test_session_cookie_lifetime() {
        let config = AccountsConfig::development();
        assert_eq!(config.session_cookie(false).max_age_secs, None);
        assert_eq!(
            config.session_cookie(true).max_age_secs,
            Some(config.session_ttl_long.as_secs() as i64)
        );
        assert!(!config.session_cookie(true).secure);
    }
}

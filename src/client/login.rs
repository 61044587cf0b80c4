//! Login credentials

use crate::error::{Error, Result};
use crate::types::JsonValue;

const USERNAME_ALIASES: [&str; 4] = ["username", "user", "email", "u"];
const PASSWORD_ALIASES: [&str; 3] = ["password", "pass", "p"];
const REMEMBER_ALIASES: [&str; 2] = ["remember", "r"];
const SET_COOKIE_ALIASES: [&str; 2] = ["setCookie", "set_cookie"];

/// Credentials for `POST login`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginCredentials {
    /// Account email
    pub username: String,
    /// Account password
    pub password: String,
    /// Ask for a long-lived session
    pub remember: bool,
    /// Authenticate with a cookie instead of an API key
    pub set_cookie: bool,
}

impl LoginCredentials {
    /// Create credentials from a username and password
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    /// Set the remember flag
    #[must_use]
    pub fn remember(mut self, remember: bool) -> Self {
        self.remember = remember;
        self
    }

    /// Set the cookie flag
    #[must_use]
    pub fn set_cookie(mut self, set_cookie: bool) -> Self {
        self.set_cookie = set_cookie;
        self
    }

    /// Read credentials from an object accepting the usual key aliases
    ///
    /// `username|user|email|u`, `password|pass|p`, `remember|r` and
    /// `setCookie`; the first truthy alias wins.
    pub fn from_value(value: &JsonValue) -> Result<Self> {
        let JsonValue::Object(map) = value else {
            return Err(Error::invalid_arguments("login", "credentials must be an object"));
        };

        let text = |aliases: &[&str]| {
            aliases
                .iter()
                .filter_map(|key| map.get(*key))
                .find(|v| is_truthy(v))
                .map(|v| match v {
                    JsonValue::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .unwrap_or_default()
        };
        let flag = |aliases: &[&str]| {
            aliases
                .iter()
                .filter_map(|key| map.get(*key))
                .any(is_truthy)
        };

        let credentials = Self {
            username: text(&USERNAME_ALIASES[..]),
            password: text(&PASSWORD_ALIASES[..]),
            remember: flag(&REMEMBER_ALIASES[..]),
            set_cookie: flag(&SET_COOKIE_ALIASES[..]),
        };
        credentials.validate()?;
        Ok(credentials)
    }

    /// Both username and password must be present
    pub fn validate(&self) -> Result<()> {
        if self.username.is_empty() {
            return Err(Error::invalid_arguments("login", "missing username"));
        }
        if self.password.is_empty() {
            return Err(Error::invalid_arguments("login", "missing password"));
        }
        Ok(())
    }
}

/// API key returned by a successful login
pub(crate) fn extract_api_key(response: &JsonValue) -> Option<String> {
    ["apiKey", "token"]
        .iter()
        .filter_map(|key| response.get(*key))
        .find_map(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(_) | JsonValue::Object(_) => true,
    }
}

#[cfg(test)]
mod login_tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test_case(json!({"username": "a@b.se", "password": "pw"}) ; "username password")]
    #[test_case(json!({"user": "a@b.se", "pass": "pw"}) ; "user pass")]
    #[test_case(json!({"email": "a@b.se", "p": "pw"}) ; "email p")]
    #[test_case(json!({"u": "a@b.se", "password": "pw"}) ; "u password")]
    #[test_case(json!({"username": "", "email": "a@b.se", "pass": "pw"}) ; "empty alias skipped")]
    fn test_aliases_match_positional(value: JsonValue) {
        let from_object = LoginCredentials::from_value(&value).unwrap();
        assert_eq!(from_object, LoginCredentials::new("a@b.se", "pw"));
    }

    #[test]
    fn test_flags() {
        let credentials =
            LoginCredentials::from_value(&json!({"u": "x", "p": "y", "r": 1, "setCookie": true}))
                .unwrap();
        assert!(credentials.remember);
        assert!(credentials.set_cookie);
    }

    #[test]
    fn test_missing_credentials() {
        assert!(LoginCredentials::from_value(&json!({"user": "x"})).is_err());
        assert!(LoginCredentials::from_value(&json!({"pass": "y"})).is_err());
        assert!(LoginCredentials::from_value(&json!("x")).is_err());
        assert!(LoginCredentials::new("", "y").validate().is_err());
    }

    #[test]
    fn test_extract_api_key() {
        assert_eq!(
            extract_api_key(&json!({"apiKey": "k1"})),
            Some("k1".to_string())
        );
        assert_eq!(
            extract_api_key(&json!({"token": "k2"})),
            Some("k2".to_string())
        );
        assert_eq!(extract_api_key(&json!({"apiKey": ""})), None);
        assert_eq!(extract_api_key(&json!({})), None);
    }
}

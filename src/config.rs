// Client configuration
use crate::builders::Credentials;
use crate::error::{Result, UpsError};

pub const TEST_URL: &str = "https://wwwcie.ups.com";
pub const LIVE_URL: &str = "https://onlinetools.ups.com";

pub const LICENSE_NUMBER_VAR: &str = "UPS_LICENSE_NUMBER";
pub const USER_ID_VAR: &str = "UPS_USER_ID";
pub const PASSWORD_VAR: &str = "UPS_PASSWORD";
pub const TEST_MODE_VAR: &str = "UPS_TEST_MODE";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    // Send requests to the customer integration environment.
    pub test_mode: bool,
    pub credentials: Credentials,
    pub timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            test_mode: false,
            credentials: Credentials::default(),
            timeout_ms: 30000,
        }
    }
}

impl ClientConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            ..Default::default()
        }
    }

    pub fn test(credentials: Credentials) -> Self {
        Self {
            test_mode: true,
            ..Self::new(credentials)
        }
    }

    pub fn base_url(&self) -> &'static str {
        if self.test_mode {
            TEST_URL
        } else {
            LIVE_URL
        }
    }

    // Reads credentials from `UPS_LICENSE_NUMBER`, `UPS_USER_ID` and
    // `UPS_PASSWORD`; `UPS_TEST_MODE` set to `true` or `1` selects the test
    // endpoint.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| UpsError::Config(format!("{} is not set", key)))
        };

        let credentials = Credentials {
            license_number: required(LICENSE_NUMBER_VAR)?,
            user_id: required(USER_ID_VAR)?,
            password: required(PASSWORD_VAR)?,
        };
        let test_mode = lookup(TEST_MODE_VAR)
            .map(|value| matches!(value.trim().to_lowercase().as_str(), "true" | "1"))
            .unwrap_or(false);

        Ok(Self {
            test_mode,
            credentials,
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use test_case::test_case;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_default_is_live() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url(), LIVE_URL);
        assert_eq!(config.timeout_ms, 30000);
    }

    #[test]
    fn test_test_mode_url() {
        let config = ClientConfig::test(Credentials::default());
        assert_eq!(config.base_url(), "https://wwwcie.ups.com");
    }

    #[test_case(Some("true"), true; "true")]
    #[test_case(Some("1"), true; "one")]
    #[test_case(Some("TRUE"), true; "upper case")]
    #[test_case(Some("no"), false; "other value")]
    #[test_case(None, false; "unset")]
    fn test_from_lookup_test_mode(flag: Option<&str>, expected: bool) {
        let mut vars = vec![
            (LICENSE_NUMBER_VAR, "LIC"),
            (USER_ID_VAR, "user"),
            (PASSWORD_VAR, "pass"),
        ];
        if let Some(flag) = flag {
            vars.push((TEST_MODE_VAR, flag));
        }

        let config = ClientConfig::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.test_mode, expected);
        assert_eq!(config.credentials, Credentials::new("LIC", "user", "pass"));
    }

    #[test]
    fn test_from_lookup_missing_password() {
        let result = ClientConfig::from_lookup(lookup(&[
            (LICENSE_NUMBER_VAR, "LIC"),
            (USER_ID_VAR, "user"),
        ]));

        match result {
            Err(UpsError::Config(message)) => assert!(message.contains(PASSWORD_VAR)),
            other => panic!("expected config error, got {:?}", other),
        }
    }
}

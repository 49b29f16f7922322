//! Environment selection and client configuration.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

pub const PRODUCTION_BASE_URL: &str = "https://api.tremendous.com/v2";
pub const SANDBOX_BASE_URL: &str = "https://testflight.tremendous.com/api/v2";

pub const API_KEY_ENV: &str = "TREMENDOUS_API_KEY";
pub const ENVIRONMENT_ENV: &str = "TREMENDOUS_ENV";
pub const BASE_URL_ENV: &str = "TREMENDOUS_BASE_URL";

/// Which Tremendous backend requests target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Production,
    Sandbox,
}

impl Environment {
    pub fn base_url(&self) -> &'static str {
        match self {
            Environment::Production => PRODUCTION_BASE_URL,
            Environment::Sandbox => SANDBOX_BASE_URL,
        }
    }
}

impl FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "sandbox" | "testflight" => Ok(Environment::Sandbox),
            other => Err(Error::Config(format!("unknown environment: {other:?}"))),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Production => f.write_str("production"),
            Environment::Sandbox => f.write_str("sandbox"),
        }
    }
}

/// Everything needed to construct a `TremendousClient`.
///
/// `base_url` overrides the environment's root when set; it exists for
/// pointing the client at a local stand-in server.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_key: String,
    pub environment: Environment,
    pub base_url: Option<String>,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>, environment: Environment) -> Self {
        Self {
            api_key: api_key.into(),
            environment,
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Reads `TREMENDOUS_API_KEY` (required), `TREMENDOUS_ENV` (defaults to
    /// production) and `TREMENDOUS_BASE_URL` (optional override).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup(API_KEY_ENV)
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| Error::Config(format!("{API_KEY_ENV} is not set")))?;
        let environment = match lookup(ENVIRONMENT_ENV) {
            Some(raw) => raw.parse()?,
            None => Environment::default(),
        };
        let base_url = lookup(BASE_URL_ENV).filter(|u| !u.trim().is_empty());
        Ok(Self {
            api_key,
            environment,
            base_url,
        })
    }

    /// The root every request path is appended to, without a trailing slash.
    pub fn resolved_base_url(&self) -> String {
        self.base_url
            .as_deref()
            .unwrap_or(self.environment.base_url())
            .trim_end_matches('/')
            .to_string()
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("environment", &self.environment)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn environments_map_to_fixed_roots() {
        assert_eq!(Environment::Production.base_url(), "https://api.tremendous.com/v2");
        assert_eq!(
            Environment::Sandbox.base_url(),
            "https://testflight.tremendous.com/api/v2"
        );
    }

    #[test]
    fn environment_parses_aliases() {
        assert_eq!("sandbox".parse::<Environment>().unwrap(), Environment::Sandbox);
        assert_eq!("TestFlight".parse::<Environment>().unwrap(), Environment::Sandbox);
        assert_eq!("prod".parse::<Environment>().unwrap(), Environment::Production);
        assert!(matches!("staging".parse::<Environment>(), Err(Error::Config(_))));
    }

    #[test]
    fn from_env_requires_api_key() {
        let err = ClientConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains(API_KEY_ENV)));
    }

    #[test]
    fn from_env_defaults_to_production() {
        let cfg = ClientConfig::from_lookup(lookup(&[(API_KEY_ENV, "key")])).unwrap();
        assert_eq!(cfg.environment, Environment::Production);
        assert_eq!(cfg.resolved_base_url(), PRODUCTION_BASE_URL);
    }

    #[test]
    fn from_env_reads_environment_and_override() {
        let cfg = ClientConfig::from_lookup(lookup(&[
            (API_KEY_ENV, "key"),
            (ENVIRONMENT_ENV, "sandbox"),
            (BASE_URL_ENV, "http://127.0.0.1:3000/"),
        ]))
        .unwrap();
        assert_eq!(cfg.environment, Environment::Sandbox);
        assert_eq!(cfg.resolved_base_url(), "http://127.0.0.1:3000");
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let cfg = ClientConfig::new("super-secret", Environment::Sandbox);
        let text = format!("{cfg:?}");
        assert!(!text.contains("super-secret"));
        assert!(text.contains("redacted"));
    }
}

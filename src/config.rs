//! Runtime configuration.
//!
//! Built once at startup and handed to the [`Dispatcher`](crate::Dispatcher);
//! nothing reads it from a global afterwards.
//!
//! ```rust
//! use halyard::{Config, Environment};
//!
//! let config = Config::new(Environment::Production).server_name("edge/1");
//! assert!(config.environment().is_production());
//! ```

use std::fmt;
use std::str::FromStr;

/// Environment variable read by [`Config::from_env`].
pub const ENV_VAR: &str = "HALYARD_ENV";

/// Default `server` header value.
pub const SERVER_NAME: &str = concat!("halyard/", env!("CARGO_PKG_VERSION"));

/// The deployment environment. Only production changes behaviour: error
/// details are kept out of response bodies.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Environment {
    #[default]
    Development,
    Testing,
    Production,
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Testing     => "testing",
            Self::Production  => "production",
        }
    }

    pub fn is_production(self) -> bool {
        self == Self::Production
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "testing" | "test"    => Ok(Self::Testing),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(ConfigError::UnknownEnvironment(s.to_owned())),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when the configuration cannot be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnknownEnvironment(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownEnvironment(s) => write!(
                f,
                "unknown environment `{s}` (expected development, testing or production)"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Dispatcher configuration.
#[derive(Clone, Debug)]
pub struct Config {
    environment: Environment,
    server_name: String,
}

impl Config {
    pub fn new(environment: Environment) -> Self {
        Self { environment, server_name: SERVER_NAME.to_owned() }
    }

    /// Reads the environment from `HALYARD_ENV`. Unset means development.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let environment = match lookup(ENV_VAR) {
            Some(value) => value.parse()?,
            None => Environment::default(),
        };
        Ok(Self::new(environment))
    }

    /// Override the `server` header value.
    pub fn server_name(mut self, name: impl Into<String>) -> Self {
        self.server_name = name.into();
        self
    }

    pub fn environment(&self) -> Environment { self.environment }
    pub fn server_header(&self) -> &str { &self.server_name }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Environment::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_environment_aliases() {
        assert_eq!("prod".parse::<Environment>(), Ok(Environment::Production));
        assert_eq!(" Production ".parse::<Environment>(), Ok(Environment::Production));
        assert_eq!("test".parse::<Environment>(), Ok(Environment::Testing));
        assert_eq!("dev".parse::<Environment>(), Ok(Environment::Development));
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn unset_variable_means_development() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.environment(), Environment::Development);
        assert_eq!(config.server_header(), SERVER_NAME);
    }

    #[test]
    fn reads_the_variable() {
        let config = Config::from_lookup(|k| (k == ENV_VAR).then(|| "production".to_owned())).unwrap();
        assert!(config.environment().is_production());

        let err = Config::from_lookup(|_| Some("qa".to_owned())).unwrap_err();
        assert_eq!(err, ConfigError::UnknownEnvironment("qa".to_owned()));
    }
}

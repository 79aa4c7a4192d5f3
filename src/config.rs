//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::fmt;

use thiserror::Error;

use crate::auth::{CredentialError, PrincipalRegistry, DEFAULT_OWNER_ROLE};

/// Errors raised while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable held a value that could not be parsed
    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },

    /// A `CASHCARD_USERS` entry was not `user:secret:ROLE[|ROLE...]`
    #[error("Invalid user entry #{index} in CASHCARD_USERS (expected user:secret:ROLE[|ROLE])")]
    InvalidUserEntry { index: usize },

    /// Building the principal registry failed
    #[error(transparent)]
    Credentials(#[from] CredentialError),
}

/// A user declared in configuration, secret still in plaintext.
#[derive(Clone, PartialEq, Eq)]
pub struct UserEntry {
    pub username: String,
    pub secret: String,
    pub roles: Vec<String>,
}

impl fmt::Debug for UserEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserEntry")
            .field("username", &self.username)
            .field("secret", &"[REDACTED]")
            .field("roles", &self.roles)
            .finish()
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Role required on `/cashcards/**`
    pub owner_role: String,
    /// Whether the CSRF guard runs on unsafe methods
    pub csrf_protection: bool,
    /// Users able to authenticate
    pub users: Vec<UserEntry>,
    /// Argon2id memory cost in KiB
    pub hash_memory_kib: u32,
    /// Argon2id iteration count
    pub hash_iterations: u32,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `OWNER_ROLE` - Role required for cash card access (default: CARD-OWNER)
    /// - `CSRF_PROTECTION` - `true` to enable the CSRF guard (default: false)
    /// - `CASHCARD_USERS` - `user:secret:ROLE[|ROLE]` entries separated by `,` (default: none)
    /// - `PASSWORD_HASH_MEMORY_KIB` - Argon2id memory cost (default: 19456)
    /// - `PASSWORD_HASH_ITERATIONS` - Argon2id passes (default: 2)
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            server_port: parse_var("SERVER_PORT")?.unwrap_or(defaults.server_port),
            owner_role: env::var("OWNER_ROLE")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.owner_role),
            csrf_protection: parse_var("CSRF_PROTECTION")?.unwrap_or(defaults.csrf_protection),
            users: match env::var("CASHCARD_USERS") {
                Ok(raw) => parse_users(&raw)?,
                Err(_) => defaults.users,
            },
            hash_memory_kib: parse_var("PASSWORD_HASH_MEMORY_KIB")?
                .unwrap_or(defaults.hash_memory_kib),
            hash_iterations: parse_var("PASSWORD_HASH_ITERATIONS")?
                .unwrap_or(defaults.hash_iterations),
        })
    }

    /// Hashes every configured user into a principal registry.
    pub fn principal_registry(&self) -> Result<PrincipalRegistry, ConfigError> {
        let mut registry = PrincipalRegistry::new(self.hash_memory_kib, self.hash_iterations)?;
        for user in &self.users {
            registry.register(&user.username, &user.secret, user.roles.iter().cloned())?;
        }
        Ok(registry)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            owner_role: DEFAULT_OWNER_ROLE.to_string(),
            csrf_protection: false,
            users: Vec::new(),
            hash_memory_kib: argon2::Params::DEFAULT_M_COST,
            hash_iterations: argon2::Params::DEFAULT_T_COST,
        }
    }
}

/// Reads and parses an optional environment variable.
fn parse_var<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        Err(_) => Ok(None),
    }
}

/// Parses `user:secret:ROLE[|ROLE]` entries separated by commas.
///
/// The secret is everything between the first and last `:`.
pub fn parse_users(raw: &str) -> Result<Vec<UserEntry>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .enumerate()
        .map(|(index, entry)| {
            let invalid = || ConfigError::InvalidUserEntry { index };
            let (username, rest) = entry.split_once(':').ok_or_else(invalid)?;
            let (secret, roles) = rest.rsplit_once(':').ok_or_else(invalid)?;

            let roles: Vec<String> = roles
                .split('|')
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string)
                .collect();
            if username.is_empty() || secret.is_empty() || roles.is_empty() {
                return Err(invalid());
            }

            Ok(UserEntry {
                username: username.to_string(),
                secret: secret.to_string(),
                roles,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.owner_role, "CARD-OWNER");
        assert!(!config.csrf_protection);
        assert!(config.users.is_empty());
        assert_eq!(config.hash_memory_kib, 19 * 1024);
        assert_eq!(config.hash_iterations, 2);
    }

    #[test]
    fn test_parse_users() {
        let users = parse_users("sarah1:abc123:CARD-OWNER, hank:qrs456:NON-OWNER|AUDITOR").unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].username, "sarah1");
        assert_eq!(users[0].secret, "abc123");
        assert_eq!(users[0].roles, vec!["CARD-OWNER"]);
        assert_eq!(users[1].roles, vec!["NON-OWNER", "AUDITOR"]);
    }

    #[test]
    fn test_parse_users_secret_with_colon() {
        let users = parse_users("sarah1:a:b:CARD-OWNER").unwrap();
        assert_eq!(users[0].secret, "a:b");
    }

    #[test]
    fn test_parse_users_empty() {
        assert!(parse_users("").unwrap().is_empty());
        assert!(parse_users(" , ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_users_malformed() {
        assert!(matches!(
            parse_users("sarah1:abc123"),
            Err(ConfigError::InvalidUserEntry { index: 0 })
        ));
        assert!(matches!(
            parse_users("ok:s:R,:s:R"),
            Err(ConfigError::InvalidUserEntry { index: 1 })
        ));
        assert!(parse_users("sarah1:abc123:").is_err());
    }

    #[test]
    fn test_user_entry_debug_redacts_secret() {
        let users = parse_users("sarah1:abc123:CARD-OWNER").unwrap();
        assert!(!format!("{:?}", users[0]).contains("abc123"));
    }

    #[test]
    fn test_principal_registry_from_config() {
        let config = Config {
            users: parse_users("sarah1:abc123:CARD-OWNER").unwrap(),
            hash_memory_kib: argon2::Params::MIN_M_COST,
            hash_iterations: argon2::Params::MIN_T_COST,
            ..Config::default()
        };

        let registry = config.principal_registry().unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.authenticate("sarah1", "abc123").is_some());
    }
}

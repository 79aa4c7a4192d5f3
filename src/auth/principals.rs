//! Principal Registry
//!
//! Known users, their Argon2id password hashes and their roles. Plaintext
//! secrets only pass through [`PrincipalRegistry::register`] and
//! [`PrincipalRegistry::authenticate`]; nothing but PHC hash strings is kept.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use argon2::{
    password_hash::SaltString, Algorithm, Argon2, Params, PasswordHash, PasswordHasher,
    PasswordVerifier, Version,
};
use rand::rngs::OsRng;
use thiserror::Error;

/// Errors raised while building the registry.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// Argon2 rejected the cost parameters
    #[error("Invalid password hashing parameters: {0}")]
    InvalidParams(String),

    /// Hashing a secret failed
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// Username is empty or contains ':'
    #[error("Invalid username: {0:?}")]
    InvalidUsername(String),

    /// The same username was registered twice
    #[error("Duplicate username: {0}")]
    DuplicateUsername(String),
}

// == Principal ==
/// A registered user.
#[derive(Clone)]
pub struct Principal {
    username: String,
    password_hash: String,
    roles: BTreeSet<String>,
}

impl Principal {
    /// Login name
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns true if the principal holds `role`.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Principal")
            .field("username", &self.username)
            .field("password_hash", &"[HASH]")
            .field("roles", &self.roles)
            .finish()
    }
}

// == Principal Registry ==
/// Lookup table of principals keyed by username.
pub struct PrincipalRegistry {
    principals: HashMap<String, Principal>,
    hasher: Argon2<'static>,
    /// Verified against when the username is unknown so that a miss costs
    /// the same as a wrong password.
    decoy_hash: String,
}

impl PrincipalRegistry {
    // == Constructor ==
    /// Creates an empty registry hashing with the given Argon2id cost.
    ///
    /// # Arguments
    /// * `memory_kib` - Memory cost in KiB
    /// * `iterations` - Number of passes
    pub fn new(memory_kib: u32, iterations: u32) -> Result<Self, CredentialError> {
        let params = Params::new(memory_kib, iterations, Params::DEFAULT_P_COST, None)
            .map_err(|e| CredentialError::InvalidParams(e.to_string()))?;
        let hasher = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let decoy_hash = hash_secret(&hasher, "decoy-secret-never-matches")?;

        Ok(Self {
            principals: HashMap::new(),
            hasher,
            decoy_hash,
        })
    }

    // == Register ==
    /// Hashes `secret` and adds a principal with the given roles.
    pub fn register<I, R>(
        &mut self,
        username: &str,
        secret: &str,
        roles: I,
    ) -> Result<(), CredentialError>
    where
        I: IntoIterator<Item = R>,
        R: Into<String>,
    {
        if username.is_empty() || username.contains(':') {
            return Err(CredentialError::InvalidUsername(username.to_string()));
        }
        if self.principals.contains_key(username) {
            return Err(CredentialError::DuplicateUsername(username.to_string()));
        }

        let principal = Principal {
            username: username.to_string(),
            password_hash: hash_secret(&self.hasher, secret)?,
            roles: roles.into_iter().map(Into::<String>::into).collect(),
        };
        self.principals.insert(username.to_string(), principal);

        Ok(())
    }

    // == Authenticate ==
    /// Returns the principal if `username` exists and `secret` matches.
    pub fn authenticate(&self, username: &str, secret: &str) -> Option<&Principal> {
        match self.principals.get(username) {
            Some(principal) => {
                verify_secret(&self.hasher, &principal.password_hash, secret).then_some(principal)
            }
            None => {
                let _ = verify_secret(&self.hasher, &self.decoy_hash, secret);
                None
            }
        }
    }

    /// Number of registered principals.
    pub fn len(&self) -> usize {
        self.principals.len()
    }

    /// Returns true if no principals are registered.
    pub fn is_empty(&self) -> bool {
        self.principals.is_empty()
    }
}

impl fmt::Debug for PrincipalRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrincipalRegistry")
            .field("principals", &self.principals.values().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

fn hash_secret(hasher: &Argon2<'static>, secret: &str) -> Result<String, CredentialError> {
    let salt = SaltString::generate(OsRng);
    hasher
        .hash_password(secret.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CredentialError::HashingFailed(e.to_string()))
}

fn verify_secret(hasher: &Argon2<'static>, phc: &str, secret: &str) -> bool {
    match PasswordHash::new(phc) {
        Ok(parsed) => hasher.verify_password(secret.as_bytes(), &parsed).is_ok(),
        Err(_) => false,
    }
}

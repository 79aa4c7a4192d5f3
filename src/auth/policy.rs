//! Access Policy
//!
//! An ordered table of path prefixes and the role each one requires.
//! The first matching rule wins; paths that match no rule are public.

use crate::models::CASHCARDS_PATH;

/// Default role required on the cash card resource
pub const DEFAULT_OWNER_ROLE: &str = "CARD-OWNER";

// == Access Rule ==
/// A single `prefix -> role` rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRule {
    /// Path prefix, matched on whole segments
    pub prefix: String,
    /// Role a principal must hold
    pub required_role: String,
}

impl AccessRule {
    /// Creates a new rule.
    pub fn new(prefix: impl Into<String>, required_role: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            required_role: required_role.into(),
        }
    }

    /// Returns true if `path` is the prefix itself or lies below it.
    pub fn matches(&self, path: &str) -> bool {
        match path.strip_prefix(self.prefix.trim_end_matches('/')) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

// == Access Policy ==
/// Ordered list of access rules.
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    rules: Vec<AccessRule>,
}

impl AccessPolicy {
    /// Creates a policy from rules, checked in order.
    pub fn new(rules: Vec<AccessRule>) -> Self {
        Self { rules }
    }

    /// The policy for this service: everything under `/cashcards` requires
    /// `owner_role`.
    pub fn cashcards(owner_role: impl Into<String>) -> Self {
        Self::new(vec![AccessRule::new(CASHCARDS_PATH, owner_role)])
    }

    /// Role required for `path`, or None if the path is public.
    pub fn required_role(&self, path: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| rule.matches(path))
            .map(|rule| rule.required_role.as_str())
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> &[AccessRule] {
        &self.rules
    }
}

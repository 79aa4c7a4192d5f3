//! Access Gate middleware
//!
//! Runs in front of every route:
//! 1. Look up the role the access policy requires for the request path
//! 2. Public paths go straight through
//! 3. Otherwise decode `Authorization: Basic ...` and verify it against the
//!    principal registry (401 on failure)
//! 4. Check the principal holds the required role (403 on failure)
//! 5. Attach [`AuthenticatedPrincipal`] to the request and continue

use std::fmt;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderValue},
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::{debug, warn};

use super::{AccessPolicy, PrincipalRegistry};
use crate::error::{ApiError, Result};

/// Identity of the caller, available to handlers as an extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedPrincipal {
    /// Login name of the caller
    pub username: String,
}

/// Credentials decoded from a Basic authorization header.
pub struct BasicCredentials {
    pub username: String,
    pub secret: String,
}

impl fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl BasicCredentials {
    /// Decodes `Basic base64(username:secret)`.
    ///
    /// Returns None for any other scheme, bad base64, non-UTF-8 content or
    /// a missing `:` separator.
    pub fn from_header(value: &HeaderValue) -> Option<Self> {
        let value = value.to_str().ok()?;
        let (scheme, encoded) = value.trim().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("basic") {
            return None;
        }

        let decoded = STANDARD.decode(encoded.trim()).ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        let (username, secret) = decoded.split_once(':')?;

        Some(Self {
            username: username.to_string(),
            secret: secret.to_string(),
        })
    }
}

// == Access Gate ==
/// Admission control: an access policy plus the principals it checks against.
#[derive(Debug)]
pub struct AccessGate {
    policy: AccessPolicy,
    principals: PrincipalRegistry,
}

impl AccessGate {
    /// Creates a gate from a policy and a principal registry.
    pub fn new(policy: AccessPolicy, principals: PrincipalRegistry) -> Self {
        Self { policy, principals }
    }

    /// The policy this gate enforces.
    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    /// Number of principals able to authenticate.
    pub fn principal_count(&self) -> usize {
        self.principals.len()
    }

    /// Returns true if at least one principal can authenticate.
    pub fn has_principals(&self) -> bool {
        !self.principals.is_empty()
    }

    // == Admit ==
    /// Decides whether `credentials` may access a resource requiring `role`.
    ///
    /// Authentication and authorization failures are logged separately but
    /// surface only as their status codes.
    pub fn admit(
        &self,
        credentials: Option<&BasicCredentials>,
        role: &str,
        path: &str,
    ) -> Result<AuthenticatedPrincipal> {
        let Some(credentials) = credentials else {
            warn!(reason = "authentication", path, "missing or malformed credentials");
            return Err(ApiError::Unauthenticated);
        };

        let Some(principal) = self
            .principals
            .authenticate(&credentials.username, &credentials.secret)
        else {
            warn!(
                reason = "authentication",
                path,
                username = %credentials.username,
                "bad credentials"
            );
            return Err(ApiError::Unauthenticated);
        };

        if !principal.has_role(role) {
            warn!(
                reason = "authorization",
                path,
                username = principal.username(),
                required_role = role,
                "principal lacks required role"
            );
            return Err(ApiError::Forbidden);
        }

        debug!(path, username = principal.username(), "access granted");
        Ok(AuthenticatedPrincipal {
            username: principal.username().to_string(),
        })
    }
}

/// Access gate middleware function.
///
/// Password verification is CPU-bound, so it runs on the blocking pool.
pub async fn access_gate(
    State(gate): State<Arc<AccessGate>>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let path = request.uri().path().to_string();

    let Some(role) = gate.policy.required_role(&path).map(str::to_owned) else {
        return Ok(next.run(request).await);
    };

    let credentials = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(BasicCredentials::from_header);

    let principal = {
        let gate = gate.clone();
        tokio::task::spawn_blocking(move || gate.admit(credentials.as_ref(), &role, &path))
            .await
            .map_err(|e| ApiError::Internal(format!("access check aborted: {e}")))??
    };

    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::Params;

    fn basic(raw: &str) -> HeaderValue {
        HeaderValue::from_str(&format!("Basic {}", STANDARD.encode(raw))).unwrap()
    }

    fn gate() -> AccessGate {
        let mut principals = PrincipalRegistry::new(Params::MIN_M_COST, Params::MIN_T_COST).unwrap();
        principals
            .register("sarah1", "abc123", ["CARD-OWNER"])
            .unwrap();
        principals
            .register("hank-owns-no-cards", "qrs456", ["NON-OWNER"])
            .unwrap();
        AccessGate::new(AccessPolicy::cashcards("CARD-OWNER"), principals)
    }

    #[test]
    fn test_parse_basic_header() {
        let creds = BasicCredentials::from_header(&basic("sarah1:abc123")).unwrap();
        assert_eq!(creds.username, "sarah1");
        assert_eq!(creds.secret, "abc123");
    }

    #[test]
    fn test_parse_secret_with_colon() {
        let creds = BasicCredentials::from_header(&basic("sarah1:a:b")).unwrap();
        assert_eq!(creds.secret, "a:b");
    }

    #[test]
    fn test_parse_scheme_case_insensitive() {
        let value =
            HeaderValue::from_str(&format!("basic {}", STANDARD.encode("u:p"))).unwrap();
        assert!(BasicCredentials::from_header(&value).is_some());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        let bearer = HeaderValue::from_static("Bearer abc");
        let bad_b64 = HeaderValue::from_static("Basic !!!not-base64");
        let no_colon = basic("sarah1");
        let no_space = HeaderValue::from_static("Basic");

        assert!(BasicCredentials::from_header(&bearer).is_none());
        assert!(BasicCredentials::from_header(&bad_b64).is_none());
        assert!(BasicCredentials::from_header(&no_colon).is_none());
        assert!(BasicCredentials::from_header(&no_space).is_none());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let creds = BasicCredentials::from_header(&basic("sarah1:abc123")).unwrap();
        let output = format!("{:?}", creds);
        assert!(!output.contains("abc123"));
    }

    #[test]
    fn test_has_principals() {
        assert!(gate().has_principals());

        let empty = PrincipalRegistry::new(Params::MIN_M_COST, Params::MIN_T_COST).unwrap();
        let gate = AccessGate::new(AccessPolicy::cashcards("CARD-OWNER"), empty);
        assert!(!gate.has_principals());
        assert_eq!(gate.principal_count(), 0);
    }

    #[test]
    fn test_admit_owner() {
        let gate = gate();
        let creds = BasicCredentials::from_header(&basic("sarah1:abc123"));
        let principal = gate.admit(creds.as_ref(), "CARD-OWNER", "/cashcards").unwrap();
        assert_eq!(principal.username, "sarah1");
    }

    #[test]
    fn test_admit_missing_credentials() {
        let gate = gate();
        assert!(matches!(
            gate.admit(None, "CARD-OWNER", "/cashcards"),
            Err(ApiError::Unauthenticated)
        ));
    }

    #[test]
    fn test_admit_wrong_secret() {
        let gate = gate();
        let creds = BasicCredentials::from_header(&basic("sarah1:BAD-PASSWORD"));
        assert!(matches!(
            gate.admit(creds.as_ref(), "CARD-OWNER", "/cashcards"),
            Err(ApiError::Unauthenticated)
        ));
    }

    #[test]
    fn test_admit_missing_role() {
        let gate = gate();
        let creds = BasicCredentials::from_header(&basic("hank-owns-no-cards:qrs456"));
        assert!(matches!(
            gate.admit(creds.as_ref(), "CARD-OWNER", "/cashcards"),
            Err(ApiError::Forbidden)
        ));
    }
}

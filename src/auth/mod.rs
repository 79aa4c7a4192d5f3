//! Access Control Module
//!
//! Authentication and authorization in front of the cash card routes.
//!
//! # Components
//! - `policy`: which role each path prefix requires
//! - `principals`: known users with hashed secrets and roles
//! - `gate`: the middleware enforcing the policy
//! - `csrf`: optional CSRF guard for unsafe methods

pub mod csrf;
pub mod gate;
pub mod policy;
pub mod principals;

pub use csrf::csrf_guard;
pub use gate::{access_gate, AccessGate, AuthenticatedPrincipal, BasicCredentials};
pub use policy::{AccessPolicy, AccessRule, DEFAULT_OWNER_ROLE};
pub use principals::{CredentialError, Principal, PrincipalRegistry};

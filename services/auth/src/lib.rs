//! Authentication and authorization for the Ekklesia application
//!
//! Identity itself (credential verification, token issuance, OAuth flows)
//! is delegated to an external hosted provider. This crate consumes the
//! provider's session object, resolves the authenticated identity to its
//! roles from the store, and decides allow/deny through the permission
//! gate. The session manager is an explicit, constructed object owned by
//! the application entry point and passed by handle.

pub mod models;
pub mod permissions;
pub mod provider;
pub mod resolver;
pub mod session;
pub mod users;
pub mod validation;

pub use models::{AuthEvent, AuthSession, Identity, Role, SignOutScope};
pub use provider::{AuthProvider, HttpAuthProvider};
pub use resolver::{PgRoleResolver, RoleResolver};
pub use session::SessionManager;

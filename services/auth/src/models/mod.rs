//! Authentication models

pub mod role;
pub mod session;

// Re-export for convenience
pub use role::{PermissionValue, Role, UserRoleAssignment};
pub use session::{AuthEvent, AuthSession, Identity, SignOutScope};

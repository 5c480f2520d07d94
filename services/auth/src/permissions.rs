//! Permission gate
//!
//! Pure allow/deny decisions over a resolved role set. Two independent
//! gates exist and are kept separate on purpose: the fine-grained
//! permission-map check, and the coarse role-name check that alone gates
//! mutating actions on the entity collections.

use std::collections::HashMap;
use uuid::Uuid;

use crate::models::{PermissionValue, Role};

/// Role name granted every permission unconditionally
pub const SUPER_ADMIN_ROLE: &str = "super_admin";
/// Role name allowed to mutate entity collections
pub const ADMIN_ROLE: &str = "admin";
/// Name of the synthetic fallback role
pub const DEFAULT_ROLE: &str = "user";

/// Fine-grained check: allow if any role is the super admin, or any
/// role's permission map grants the requested key (boolean `true` or the
/// `"view"` capability). Absence of a matching role or key denies.
pub fn is_allowed(roles: &[Role], permission: &str) -> bool {
    if is_super_admin(roles) {
        return true;
    }

    roles.iter().any(|role| {
        role.permissions
            .get(permission)
            .map(PermissionValue::grants)
            .unwrap_or(false)
    })
}

pub fn is_super_admin(roles: &[Role]) -> bool {
    roles.iter().any(|role| role.name == SUPER_ADMIN_ROLE)
}

pub fn is_admin(roles: &[Role]) -> bool {
    roles.iter().any(|role| role.name == ADMIN_ROLE)
}

/// Coarse gate for create/update/delete on members, attendance,
/// donations, visitors, and equipment. Compares role names directly and
/// ignores the fine-grained permission map; the two gates are not
/// unified.
pub fn can_manage_records(roles: &[Role]) -> bool {
    is_admin(roles) || is_super_admin(roles)
}

/// Synthetic fallback role: a user with zero assignments keeps view
/// access to the dashboard, members, and attendance rather than being
/// locked out entirely.
pub fn default_role() -> Role {
    let mut permissions = HashMap::new();
    for key in ["dashboard", "members", "attendance"] {
        permissions.insert(
            key.to_string(),
            PermissionValue::Capability("view".to_string()),
        );
    }

    Role {
        id: Uuid::nil(),
        name: DEFAULT_ROLE.to_string(),
        description: "Default user role".to_string(),
        permissions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(name: &str, permissions: &[(&str, PermissionValue)]) -> Role {
        Role {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: String::new(),
            permissions: permissions
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        }
    }

    #[test]
    fn test_super_admin_allows_unknown_keys() {
        let roles = vec![role(SUPER_ADMIN_ROLE, &[])];
        assert!(is_allowed(&roles, "nonexistent_permission"));
        assert!(is_allowed(&roles, "members"));
    }

    #[test]
    fn test_empty_role_set_denies() {
        assert!(!is_allowed(&[], "members"));
        assert!(!can_manage_records(&[]));
    }

    #[test]
    fn test_explicit_grant_allows() {
        let roles = vec![role("staff", &[("members", PermissionValue::Flag(true))])];
        assert!(is_allowed(&roles, "members"));
        assert!(!is_allowed(&roles, "finances"));
    }

    #[test]
    fn test_view_capability_satisfies_check() {
        let roles = vec![role(
            "staff",
            &[("attendance", PermissionValue::Capability("view".to_string()))],
        )];
        assert!(is_allowed(&roles, "attendance"));
    }

    #[test]
    fn test_false_flag_denies() {
        let roles = vec![role("staff", &[("finances", PermissionValue::Flag(false))])];
        assert!(!is_allowed(&roles, "finances"));
    }

    #[test]
    fn test_coarse_gate_admin_names_only() {
        let viewer = vec![role("staff", &[("members", PermissionValue::Flag(true))])];
        assert!(!can_manage_records(&viewer));

        let admin = vec![role(ADMIN_ROLE, &[])];
        assert!(can_manage_records(&admin));

        let super_admin = vec![role(SUPER_ADMIN_ROLE, &[])];
        assert!(can_manage_records(&super_admin));
    }

    #[test]
    fn test_default_role_is_view_only() {
        let roles = vec![default_role()];
        assert!(is_allowed(&roles, "dashboard"));
        assert!(is_allowed(&roles, "members"));
        assert!(is_allowed(&roles, "attendance"));
        assert!(!is_allowed(&roles, "finances"));
        assert!(!can_manage_records(&roles));
    }
}

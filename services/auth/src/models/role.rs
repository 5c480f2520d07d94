//! Role model and related functionality

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// A single entry in a role's permission map.
///
/// The persisted map stores either a boolean grant or the literal
/// capability string `"view"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PermissionValue {
    Flag(bool),
    Capability(String),
}

impl PermissionValue {
    /// Whether this entry satisfies a check against its key. A boolean
    /// `true` grants the key; the `"view"` capability satisfies any check
    /// against the key as well.
    pub fn grants(&self) -> bool {
        match self {
            PermissionValue::Flag(allowed) => *allowed,
            PermissionValue::Capability(capability) => capability == "view",
        }
    }
}

/// Role entity. Administered externally; read-only here except for the
/// user-creation flow which assigns a role at creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub permissions: HashMap<String, PermissionValue>,
}

/// User/role assignment join row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRoleAssignment {
    pub user_id: Uuid,
    pub role_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_value_grants() {
        assert!(PermissionValue::Flag(true).grants());
        assert!(!PermissionValue::Flag(false).grants());
        assert!(PermissionValue::Capability("view".to_string()).grants());
        assert!(!PermissionValue::Capability("edit".to_string()).grants());
    }

    #[test]
    fn test_permission_map_deserializes_mixed_values() {
        let json = r#"{"dashboard": "view", "members": true, "finances": false}"#;
        let map: HashMap<String, PermissionValue> = serde_json::from_str(json).unwrap();

        assert_eq!(
            map.get("dashboard"),
            Some(&PermissionValue::Capability("view".to_string()))
        );
        assert_eq!(map.get("members"), Some(&PermissionValue::Flag(true)));
        assert_eq!(map.get("finances"), Some(&PermissionValue::Flag(false)));
    }
}

//! Canonical catalogue the in-memory backends start from.

use crate::model::{Permission, Role, User, UserStatus};

fn permission(id: &str, name: &str, description: &str) -> Permission {
    Permission {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
    }
}

pub fn permissions() -> Vec<Permission> {
    vec![
        permission("1", "users:read", "View users"),
        permission("2", "users:write", "Modify users"),
        permission("3", "roles:read", "View roles"),
        permission("4", "roles:write", "Modify roles"),
    ]
}

pub fn roles() -> Vec<Role> {
    vec![
        Role {
            id: "1".into(),
            name: "Admin".into(),
            description: "Full system access".into(),
            permissions: vec![
                permission("1", "users:read", "View users"),
                permission("2", "users:write", "Modify users"),
            ],
        },
        Role {
            id: "2".into(),
            name: "User".into(),
            description: "Limited access".into(),
            permissions: vec![permission("1", "users:read", "View users")],
        },
    ]
}

// Embedded roles are snapshots and lag the role catalogue.
pub fn users() -> Vec<User> {
    vec![
        User {
            id: "1".into(),
            name: "John Doe".into(),
            email: "john@example.com".into(),
            status: UserStatus::Active,
            roles: vec![Role {
                id: "1".into(),
                name: "Admin".into(),
                description: "Administrator".into(),
                permissions: vec![],
            }],
        },
        User {
            id: "2".into(),
            name: "Jane Smith".into(),
            email: "jane@example.com".into(),
            status: UserStatus::Active,
            roles: vec![Role {
                id: "2".into(),
                name: "User".into(),
                description: "Regular User".into(),
                permissions: vec![],
            }],
        },
    ]
}

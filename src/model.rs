//! Entity model shared by stores, views and the UI.
//!
//! Roles embed permissions and users embed roles *by value*: each embedded
//! record is a snapshot taken at write time and does not follow later edits
//! or deletions of the original.

use std::collections::HashSet;
use std::fmt;

use uuid::Uuid;

/// Comparable, searchable value of a single record field.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    /// Lowercased string form used for substring search.
    pub fn search_text(&self) -> String {
        self.to_string().to_lowercase()
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

/// Binds an entity type to its field keys, draft and patch shapes.
pub trait Record: Clone + fmt::Debug + Send + Sync + 'static {
    type Field: Copy + Eq + fmt::Debug + Send + Sync + 'static;
    /// Record without identity, as submitted by a create form.
    type Draft: Clone + fmt::Debug + Send + Sync + 'static;
    /// Shallow merge: `None` fields are left untouched.
    type Patch: Clone + fmt::Debug + Send + Sync + 'static;

    const KIND: &'static str;

    fn id(&self) -> &str;
    /// Unique, user-facing key. Duplicates are rejected as conflicts.
    fn name(&self) -> &str;
    fn draft_name(draft: &Self::Draft) -> &str;
    fn patch_name(patch: &Self::Patch) -> Option<&str>;
    fn from_draft(id: String, draft: Self::Draft) -> Self;
    fn apply_patch(&mut self, patch: Self::Patch);
    fn value(&self, field: Self::Field) -> FieldValue;
}

/// Fresh collision-resistant identity for a new record.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Keep the first occurrence of each id, preserving order.
fn dedup_by_id<T>(items: Vec<T>, id: impl Fn(&T) -> &str) -> Vec<T> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(id(item).to_string()))
        .collect()
}

// ---------------------------------------------------------------------------
// Permission
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Permission {
    pub id: String,
    pub name: String,
    pub description: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewPermission {
    pub name: String,
    pub description: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PermissionPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PermissionField {
    Id,
    Name,
    Description,
}

impl Record for Permission {
    type Field = PermissionField;
    type Draft = NewPermission;
    type Patch = PermissionPatch;

    const KIND: &'static str = "permission";

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn draft_name(draft: &NewPermission) -> &str {
        &draft.name
    }

    fn patch_name(patch: &PermissionPatch) -> Option<&str> {
        patch.name.as_deref()
    }

    fn from_draft(id: String, draft: NewPermission) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
        }
    }

    fn apply_patch(&mut self, patch: PermissionPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
    }

    fn value(&self, field: PermissionField) -> FieldValue {
        match field {
            PermissionField::Id => FieldValue::Text(self.id.clone()),
            PermissionField::Name => FieldValue::Text(self.name.clone()),
            PermissionField::Description => FieldValue::Text(self.description.clone()),
        }
    }
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Role {
    pub id: String,
    pub name: String,
    pub description: String,
    pub permissions: Vec<Permission>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewRole {
    pub name: String,
    pub description: String,
    pub permissions: Vec<Permission>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RolePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub permissions: Option<Vec<Permission>>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RoleField {
    Id,
    Name,
    Description,
    Permissions,
}

impl Role {
    pub fn permission_names(&self) -> Vec<String> {
        self.permissions.iter().map(|p| p.name.clone()).collect()
    }

    pub fn has_permission(&self, permission_id: &str) -> bool {
        self.permissions.iter().any(|p| p.id == permission_id)
    }
}

impl Record for Role {
    type Field = RoleField;
    type Draft = NewRole;
    type Patch = RolePatch;

    const KIND: &'static str = "role";

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn draft_name(draft: &NewRole) -> &str {
        &draft.name
    }

    fn patch_name(patch: &RolePatch) -> Option<&str> {
        patch.name.as_deref()
    }

    fn from_draft(id: String, draft: NewRole) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            permissions: dedup_by_id(draft.permissions, |p| p.id.as_str()),
        }
    }

    fn apply_patch(&mut self, patch: RolePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(permissions) = patch.permissions {
            self.permissions = dedup_by_id(permissions, |p| p.id.as_str());
        }
    }

    fn value(&self, field: RoleField) -> FieldValue {
        match field {
            RoleField::Id => FieldValue::Text(self.id.clone()),
            RoleField::Name => FieldValue::Text(self.name.clone()),
            RoleField::Description => FieldValue::Text(self.description.clone()),
            RoleField::Permissions => FieldValue::List(self.permission_names()),
        }
    }
}

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
}

impl UserStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            UserStatus::Active => UserStatus::Inactive,
            UserStatus::Inactive => UserStatus::Active,
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub status: UserStatus,
    pub roles: Vec<Role>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub status: UserStatus,
    pub roles: Vec<Role>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub status: Option<UserStatus>,
    pub roles: Option<Vec<Role>>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UserField {
    Id,
    Name,
    Email,
    Status,
    Roles,
}

impl User {
    pub fn role_names(&self) -> Vec<String> {
        self.roles.iter().map(|r| r.name.clone()).collect()
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

impl Record for User {
    type Field = UserField;
    type Draft = NewUser;
    type Patch = UserPatch;

    const KIND: &'static str = "user";

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn draft_name(draft: &NewUser) -> &str {
        &draft.name
    }

    fn patch_name(patch: &UserPatch) -> Option<&str> {
        patch.name.as_deref()
    }

    fn from_draft(id: String, draft: NewUser) -> Self {
        Self {
            id,
            name: draft.name,
            email: draft.email,
            status: draft.status,
            roles: dedup_by_id(draft.roles, |r| r.id.as_str()),
        }
    }

    fn apply_patch(&mut self, patch: UserPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(roles) = patch.roles {
            self.roles = dedup_by_id(roles, |r| r.id.as_str());
        }
    }

    fn value(&self, field: UserField) -> FieldValue {
        match field {
            UserField::Id => FieldValue::Text(self.id.clone()),
            UserField::Name => FieldValue::Text(self.name.clone()),
            UserField::Email => FieldValue::Text(self.email.clone()),
            UserField::Status => FieldValue::Text(self.status.to_string()),
            UserField::Roles => FieldValue::List(self.role_names()),
        }
    }
}

//! Create/edit dialogs for the three entities and the sign-in form.
//!
//! An [`EntityForm`] couples the generic [`FormState`] (text fields) with the
//! non-text inputs a dialog needs: the user status toggle and a checklist of
//! roles or permissions. Checked records are copied out of the catalogue at
//! submit time, so the saved entity embeds snapshots.

use std::collections::BTreeSet;

use regex::Regex;

use crate::error::{AdminError, AdminResult};
use crate::form::{FieldRules, FormState};
use crate::model::{
    NewPermission, NewRole, NewUser, Permission, PermissionPatch, Role, RolePatch, User,
    UserPatch, UserStatus,
};

pub const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
/// `resource:action`, lowercase.
pub const PERMISSION_PATTERN: &str = r"^[a-z][a-z0-9_-]*:[a-z][a-z0-9_*-]*$";

fn compile(pattern: &str) -> AdminResult<Regex> {
    Regex::new(pattern).map_err(|e| AdminError::Internal(format!("invalid pattern {pattern}: {e}")))
}

pub fn login_form() -> AdminResult<FormState> {
    Ok(FormState::new(
        [("email", ""), ("password", "")],
        [
            ("email", FieldRules::new().required().pattern(compile(EMAIL_PATTERN)?)),
            ("password", FieldRules::new().required()),
        ],
    ))
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EntityKind {
    User,
    Role,
    Permission,
}

impl EntityKind {
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::User => "User",
            EntityKind::Role => "Role",
            EntityKind::Permission => "Permission",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Choice {
    pub id: String,
    pub label: String,
    pub checked: bool,
}

/// One focusable line of a dialog.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FormRow {
    Text(&'static str),
    Status,
    Choice(usize),
}

#[derive(Clone, Debug)]
pub struct EntityForm {
    pub kind: EntityKind,
    /// Id of the record being edited; `None` when creating.
    pub editing: Option<String>,
    pub form: FormState,
    pub text_fields: Vec<&'static str>,
    pub status: UserStatus,
    original_status: UserStatus,
    pub choices: Vec<Choice>,
    original_checked: BTreeSet<String>,
    pub focus: usize,
}

impl EntityForm {
    fn build(
        kind: EntityKind,
        editing: Option<String>,
        fields: Vec<(&'static str, String, FieldRules)>,
        status: UserStatus,
        choices: Vec<Choice>,
    ) -> Self {
        let text_fields = fields.iter().map(|(name, _, _)| *name).collect();
        let initial: Vec<(&'static str, String)> =
            fields.iter().map(|(name, value, _)| (*name, value.clone())).collect();
        let rules = fields.into_iter().map(|(name, _, rules)| (name, rules));
        let original_checked = choices
            .iter()
            .filter(|c| c.checked)
            .map(|c| c.id.clone())
            .collect();
        Self {
            kind,
            editing,
            form: FormState::new(initial, rules),
            text_fields,
            status,
            original_status: status,
            choices,
            original_checked,
            focus: 0,
        }
    }

    pub fn permission(existing: Option<&Permission>) -> AdminResult<Self> {
        let (name, description) = existing
            .map(|p| (p.name.clone(), p.description.clone()))
            .unwrap_or_default();
        Ok(Self::build(
            EntityKind::Permission,
            existing.map(|p| p.id.clone()),
            vec![
                (
                    "name",
                    name,
                    FieldRules::new()
                        .required()
                        .pattern(compile(PERMISSION_PATTERN)?)
                        .max_length(64),
                ),
                ("description", description, FieldRules::new().required().max_length(200)),
            ],
            UserStatus::default(),
            Vec::new(),
        ))
    }

    pub fn role(existing: Option<&Role>, catalogue: &[Permission]) -> AdminResult<Self> {
        let (name, description) = existing
            .map(|r| (r.name.clone(), r.description.clone()))
            .unwrap_or_default();
        let choices = catalogue
            .iter()
            .map(|p| Choice {
                id: p.id.clone(),
                label: format!("{} - {}", p.name, p.description),
                checked: existing.is_some_and(|r| r.has_permission(&p.id)),
            })
            .collect();
        Ok(Self::build(
            EntityKind::Role,
            existing.map(|r| r.id.clone()),
            vec![
                ("name", name, FieldRules::new().required().min_length(2).max_length(32)),
                ("description", description, FieldRules::new().required().max_length(200)),
            ],
            UserStatus::default(),
            choices,
        ))
    }

    pub fn user(existing: Option<&User>, catalogue: &[Role]) -> AdminResult<Self> {
        let (name, email, status) = existing
            .map(|u| (u.name.clone(), u.email.clone(), u.status))
            .unwrap_or_default();
        let choices = catalogue
            .iter()
            .map(|r| Choice {
                id: r.id.clone(),
                label: format!("{} - {}", r.name, r.description),
                checked: existing.is_some_and(|u| u.roles.iter().any(|held| held.id == r.id)),
            })
            .collect();
        Ok(Self::build(
            EntityKind::User,
            existing.map(|u| u.id.clone()),
            vec![
                ("name", name, FieldRules::new().required().min_length(2).max_length(64)),
                ("email", email, FieldRules::new().required().pattern(compile(EMAIL_PATTERN)?)),
            ],
            status,
            choices,
        ))
    }

    pub fn title(&self) -> String {
        match self.editing {
            Some(_) => format!("Edit {}", self.kind.label()),
            None => format!("Add New {}", self.kind.label()),
        }
    }

    pub fn rows(&self) -> Vec<FormRow> {
        let mut rows: Vec<FormRow> = self.text_fields.iter().copied().map(FormRow::Text).collect();
        if self.kind == EntityKind::User {
            rows.push(FormRow::Status);
        }
        rows.extend((0..self.choices.len()).map(FormRow::Choice));
        rows
    }

    pub fn focused_row(&self) -> Option<FormRow> {
        self.rows().get(self.focus).copied()
    }

    fn blur_focused(&mut self) {
        if let Some(FormRow::Text(name)) = self.focused_row() {
            self.form.handle_blur(name);
        }
    }

    pub fn focus_next(&mut self) {
        self.blur_focused();
        let n = self.rows().len();
        if n > 0 {
            self.focus = (self.focus + 1) % n;
        }
    }

    pub fn focus_prev(&mut self) {
        self.blur_focused();
        let n = self.rows().len();
        if n > 0 {
            self.focus = (self.focus + n - 1) % n;
        }
    }

    pub fn type_char(&mut self, c: char) {
        if let Some(FormRow::Text(name)) = self.focused_row() {
            let mut value = self.form.value(name).to_string();
            value.push(c);
            self.form.handle_change(name, value);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(FormRow::Text(name)) = self.focused_row() {
            let mut value = self.form.value(name).to_string();
            value.pop();
            self.form.handle_change(name, value);
        }
    }

    /// Flip the status toggle or the focused checkbox.
    pub fn toggle(&mut self) {
        match self.focused_row() {
            Some(FormRow::Status) => self.status = self.status.toggled(),
            Some(FormRow::Choice(i)) => {
                if let Some(choice) = self.choices.get_mut(i) {
                    choice.checked = !choice.checked;
                }
            }
            Some(FormRow::Text(_)) | None => {}
        }
    }

    fn text(&self, name: &str) -> String {
        self.form.value(name).trim().to_string()
    }

    fn changed_text(&self, name: &str) -> Option<String> {
        self.form.is_dirty(name).then(|| self.text(name))
    }

    fn checked_ids(&self) -> BTreeSet<String> {
        self.choices
            .iter()
            .filter(|c| c.checked)
            .map(|c| c.id.clone())
            .collect()
    }

    fn choices_changed(&self) -> bool {
        self.checked_ids() != self.original_checked
    }

    /// Copies of the checked catalogue records, in catalogue order.
    fn checked_from<T: Clone>(&self, catalogue: &[T], id: impl Fn(&T) -> &str) -> Vec<T> {
        let checked = self.checked_ids();
        catalogue
            .iter()
            .filter(|item| checked.contains(id(item)))
            .cloned()
            .collect()
    }

    pub fn permission_draft(&self) -> NewPermission {
        NewPermission {
            name: self.text("name"),
            description: self.text("description"),
        }
    }

    pub fn permission_patch(&self) -> PermissionPatch {
        PermissionPatch {
            name: self.changed_text("name"),
            description: self.changed_text("description"),
        }
    }

    pub fn role_draft(&self, catalogue: &[Permission]) -> NewRole {
        NewRole {
            name: self.text("name"),
            description: self.text("description"),
            permissions: self.checked_from(catalogue, |p| p.id.as_str()),
        }
    }

    pub fn role_patch(&self, catalogue: &[Permission]) -> RolePatch {
        RolePatch {
            name: self.changed_text("name"),
            description: self.changed_text("description"),
            permissions: self
                .choices_changed()
                .then(|| self.checked_from(catalogue, |p| p.id.as_str())),
        }
    }

    pub fn user_draft(&self, catalogue: &[Role]) -> NewUser {
        NewUser {
            name: self.text("name"),
            email: self.text("email"),
            status: self.status,
            roles: self.checked_from(catalogue, |r| r.id.as_str()),
        }
    }

    pub fn user_patch(&self, catalogue: &[Role]) -> UserPatch {
        UserPatch {
            name: self.changed_text("name"),
            email: self.changed_text("email"),
            status: (self.status != self.original_status).then_some(self.status),
            roles: self
                .choices_changed()
                .then(|| self.checked_from(catalogue, |r| r.id.as_str())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::seed;

    fn type_str(form: &mut EntityForm, s: &str) {
        for c in s.chars() {
            form.type_char(c);
        }
    }

    #[test]
    fn role_draft_copies_checked_permissions() {
        let catalogue = seed::permissions();
        let mut form = EntityForm::role(None, &catalogue).unwrap();
        type_str(&mut form, "Auditor");
        form.focus_next();
        type_str(&mut form, "Read only");
        form.focus_next();
        form.toggle();
        form.focus_next();
        form.focus_next();
        form.toggle();
        assert!(form.form.check().is_ok());

        let draft = form.role_draft(&catalogue);
        assert_eq!(draft.name, "Auditor");
        let names: Vec<_> = draft.permissions.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["users:read", "roles:read"]);
    }

    #[test]
    fn blank_description_is_rejected() {
        let mut form = EntityForm::role(None, &seed::permissions()).unwrap();
        type_str(&mut form, "Ops");
        form.focus_next();
        type_str(&mut form, "   ");
        assert!(form.form.check().is_err());
        assert_eq!(form.form.error("description"), Some(crate::form::REQUIRED));
    }

    #[test]
    fn edit_patch_names_only_changed_fields() {
        let roles = seed::roles();
        let user = &seed::users()[0];
        let mut form = EntityForm::user(Some(user), &roles).unwrap();
        // focus: name, email, status
        form.focus_next();
        form.focus_next();
        form.toggle();
        let patch = form.user_patch(&roles);
        assert_eq!(patch.name, None);
        assert_eq!(patch.email, None);
        assert_eq!(patch.status, Some(UserStatus::Inactive));
        assert_eq!(patch.roles, None);
    }

    #[test]
    fn permission_name_must_look_like_resource_action() {
        let mut form = EntityForm::permission(None).unwrap();
        type_str(&mut form, "Users Read");
        assert_eq!(form.form.error("name"), Some(crate::form::INVALID_FORMAT));
        form.backspace();
        assert!(form.form.is_touched("name"));
    }

    #[test]
    fn rows_include_status_only_for_users() {
        let form = EntityForm::permission(None).unwrap();
        assert_eq!(form.rows(), vec![FormRow::Text("name"), FormRow::Text("description")]);
        let form = EntityForm::user(None, &seed::roles()).unwrap();
        assert_eq!(
            form.rows(),
            vec![
                FormRow::Text("name"),
                FormRow::Text("email"),
                FormRow::Status,
                FormRow::Choice(0),
                FormRow::Choice(1)
            ]
        );
    }
}

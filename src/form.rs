//! Field-level form state and validation.
//!
//! Each configured field runs its checks in a fixed order (required,
//! pattern, minimum length, maximum length, custom predicate) and stops at
//! the first failure. A field becomes touched on its first change or blur and
//! stays touched until [`FormState::reset_form`].

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::error::{AdminError, AdminResult};

pub const REQUIRED: &str = "This field is required";
pub const INVALID_FORMAT: &str = "Invalid format";
pub const INVALID_VALUE: &str = "Invalid value";

pub type Validator = Arc<dyn Fn(&str) -> Result<(), String> + Send + Sync>;

#[derive(Clone, Default)]
pub struct FieldRules {
    pub required: bool,
    pub pattern: Option<Regex>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub validate: Option<Validator>,
}

impl fmt::Debug for FieldRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRules")
            .field("required", &self.required)
            .field("pattern", &self.pattern.as_ref().map(|r| r.as_str()))
            .field("min_length", &self.min_length)
            .field("max_length", &self.max_length)
            .field("validate", &self.validate.is_some())
            .finish()
    }
}

impl FieldRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn min_length(mut self, n: usize) -> Self {
        self.min_length = Some(n);
        self
    }

    pub fn max_length(mut self, n: usize) -> Self {
        self.max_length = Some(n);
        self
    }

    /// Custom check returning its own message on failure.
    pub fn validate<F>(mut self, check: F) -> Self
    where
        F: Fn(&str) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validate = Some(Arc::new(check));
        self
    }

    /// Boolean check; `false` reports [`INVALID_VALUE`].
    pub fn predicate<F>(self, check: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.validate(move |v| {
            if check(v) {
                Ok(())
            } else {
                Err(INVALID_VALUE.to_string())
            }
        })
    }

    /// Empty string when `value` passes every check. Checks see the value
    /// trimmed, the same text a submitted form stores.
    pub fn check(&self, value: &str) -> String {
        let value = value.trim();
        if self.required && value.is_empty() {
            return REQUIRED.to_string();
        }
        if let Some(pattern) = &self.pattern {
            if !pattern.is_match(value) {
                return INVALID_FORMAT.to_string();
            }
        }
        let len = value.chars().count();
        if let Some(min) = self.min_length {
            if len < min {
                return format!("Minimum length is {min}");
            }
        }
        if let Some(max) = self.max_length {
            if len > max {
                return format!("Maximum length is {max}");
            }
        }
        if let Some(validate) = &self.validate {
            if let Err(message) = validate(value) {
                return message;
            }
        }
        String::new()
    }
}

#[derive(Clone, Debug)]
pub struct FormState {
    initial: BTreeMap<&'static str, String>,
    rules: Vec<(&'static str, FieldRules)>,
    values: BTreeMap<&'static str, String>,
    errors: BTreeMap<&'static str, String>,
    touched: BTreeSet<&'static str>,
}

impl FormState {
    pub fn new<V, S>(
        initial: V,
        rules: impl IntoIterator<Item = (&'static str, FieldRules)>,
    ) -> Self
    where
        V: IntoIterator<Item = (&'static str, S)>,
        S: Into<String>,
    {
        let initial: BTreeMap<_, _> = initial.into_iter().map(|(k, v)| (k, v.into())).collect();
        Self {
            values: initial.clone(),
            initial,
            rules: rules.into_iter().collect(),
            errors: BTreeMap::new(),
            touched: BTreeSet::new(),
        }
    }

    pub fn value(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    /// Current error for `name`, if it has a non-empty one.
    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors
            .get(name)
            .map(String::as_str)
            .filter(|e| !e.is_empty())
    }

    /// Whether `name` differs from its initial value.
    pub fn is_dirty(&self, name: &str) -> bool {
        self.initial.get(name).map(String::as_str).unwrap_or("") != self.value(name)
    }

    pub fn is_touched(&self, name: &str) -> bool {
        self.touched.contains(name)
    }

    pub fn validate_field(&self, name: &str, value: &str) -> String {
        self.rules
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, rules)| rules.check(value))
            .unwrap_or_default()
    }

    pub fn handle_change(&mut self, name: &'static str, value: impl Into<String>) {
        let value = value.into();
        let error = self.validate_field(name, &value);
        self.values.insert(name, value);
        self.errors.insert(name, error);
        self.touched.insert(name);
    }

    pub fn handle_blur(&mut self, name: &'static str) {
        let error = self.validate_field(name, self.value(name));
        self.errors.insert(name, error);
        self.touched.insert(name);
    }

    /// Validate every configured field, touched or not, and mark them all
    /// touched. Only failing fields keep an error.
    pub fn validate_form(&mut self) -> bool {
        let mut errors = BTreeMap::new();
        for (name, rules) in &self.rules {
            let error = rules.check(self.value(name));
            if !error.is_empty() {
                errors.insert(*name, error);
            }
        }
        let valid = errors.is_empty();
        self.errors = errors;
        self.touched = self.rules.iter().map(|(name, _)| *name).collect();
        valid
    }

    /// [`validate_form`](Self::validate_form) reported as the first failing
    /// field, in configuration order.
    pub fn check(&mut self) -> AdminResult<()> {
        if self.validate_form() {
            return Ok(());
        }
        let (field, message) = self
            .rules
            .iter()
            .find_map(|(name, _)| self.errors.get(*name).map(|e| (*name, e.clone())))
            .ok_or_else(|| AdminError::Internal("form invalid without errors".into()))?;
        Err(AdminError::Validation {
            field: field.to_string(),
            message,
        })
    }

    pub fn reset_form(&mut self) {
        self.values = self.initial.clone();
        self.errors.clear();
        self.touched.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login_form() -> FormState {
        FormState::new(
            [("email", ""), ("name", "Ann")],
            [
                ("email", FieldRules::new().required()),
                ("name", FieldRules::new().required().min_length(3)),
            ],
        )
    }

    #[test]
    fn required_field_reports_error_when_empty() {
        let form = login_form();
        assert_eq!(form.validate_field("email", ""), REQUIRED);
    }

    #[test]
    fn whitespace_only_value_is_treated_as_empty() {
        let rules = FieldRules::new().required().max_length(3);
        assert_eq!(rules.check("   "), REQUIRED);
        assert_eq!(rules.check("  abc  "), "");
    }

    #[test]
    fn min_length_reports_length_error() {
        let rules = FieldRules::new().min_length(3);
        assert_eq!(rules.check("ab"), "Minimum length is 3");
        assert_eq!(rules.check("abc"), "");
    }

    #[test]
    fn checks_run_in_fixed_order_and_short_circuit() {
        let rules = FieldRules::new()
            .required()
            .pattern(Regex::new(r"^[a-z]+$").unwrap())
            .max_length(4)
            .predicate(|v| v != "root");
        assert_eq!(rules.check(""), REQUIRED);
        assert_eq!(rules.check("AB"), INVALID_FORMAT);
        assert_eq!(rules.check("abcdef"), "Maximum length is 4");
        assert_eq!(rules.check("root"), INVALID_VALUE);
        assert_eq!(rules.check("ok"), "");
    }

    #[test]
    fn custom_validator_message_is_passed_through() {
        let rules = FieldRules::new().validate(|v| {
            if v.contains(' ') {
                Err("No spaces allowed".into())
            } else {
                Ok(())
            }
        });
        assert_eq!(rules.check("a b"), "No spaces allowed");
    }

    #[test]
    fn unconfigured_field_is_always_valid() {
        let form = login_form();
        assert_eq!(form.validate_field("nickname", ""), "");
    }

    #[test]
    fn change_and_blur_mark_touched() {
        let mut form = login_form();
        assert!(!form.is_touched("email"));
        form.handle_blur("email");
        assert!(form.is_touched("email"));
        assert_eq!(form.error("email"), Some(REQUIRED));

        form.handle_change("email", "ann@example.com");
        assert_eq!(form.value("email"), "ann@example.com");
        assert_eq!(form.error("email"), None);
    }

    #[test]
    fn validate_form_checks_untouched_fields_and_touches_all() {
        let mut form = login_form();
        assert!(!form.validate_form());
        assert_eq!(form.error("email"), Some(REQUIRED));
        assert_eq!(form.error("name"), None);
        assert!(form.is_touched("email"));
        assert!(form.is_touched("name"));
    }

    #[test]
    fn check_reports_first_failing_field() {
        let mut form = login_form();
        form.handle_change("name", "Al");
        let err = form.check().unwrap_err();
        assert_eq!(
            err,
            AdminError::Validation {
                field: "email".into(),
                message: REQUIRED.into()
            }
        );
    }

    #[test]
    fn dirty_tracks_difference_from_initial() {
        let mut form = login_form();
        assert!(!form.is_dirty("name"));
        form.handle_change("name", "Anna");
        assert!(form.is_dirty("name"));
        form.handle_change("name", "Ann");
        assert!(!form.is_dirty("name"));
    }

    #[test]
    fn reset_restores_initial_values() {
        let mut form = login_form();
        form.handle_change("name", "Bartholomew");
        form.validate_form();
        form.reset_form();
        assert_eq!(form.value("name"), "Ann");
        assert_eq!(form.error("email"), None);
        assert!(!form.is_touched("email"));
    }
}

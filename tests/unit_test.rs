// Unit tests for rbac-admin
// These tests work with the public API without modifying the main codebase

#[cfg(test)]
mod model_tests {
    use rbac_admin::model::{
        FieldValue, NewUser, Permission, PermissionField, Record, Role, RoleField, User, UserField,
        UserPatch, UserStatus, new_id,
    };
    use rbac_admin::store::seed;

    #[test]
    fn test_field_value_renders_lists_comma_separated() {
        let role = &seed::roles()[0];
        let value = role.value(RoleField::Permissions);
        assert_eq!(value.to_string(), "users:read, users:write");
        assert_eq!(value.search_text(), "users:read, users:write");
    }

    #[test]
    fn test_field_value_ordering_is_lexicographic() {
        assert!(FieldValue::Text("Alice".into()) < FieldValue::Text("alice".into()));
        assert!(FieldValue::List(vec!["a".into()]) < FieldValue::List(vec!["a".into(), "b".into()]));
    }

    #[test]
    fn test_user_status_toggle_and_display() {
        assert_eq!(UserStatus::default(), UserStatus::Active);
        assert_eq!(UserStatus::Active.toggled(), UserStatus::Inactive);
        assert_eq!(UserStatus::Inactive.to_string(), "inactive");
    }

    #[test]
    fn test_user_from_draft_dedups_roles_by_id() {
        let roles = seed::roles();
        let user = User::from_draft(
            new_id(),
            NewUser {
                name: "Ann".into(),
                email: "ann@example.com".into(),
                status: UserStatus::Active,
                roles: vec![roles[0].clone(), roles[1].clone(), roles[0].clone()],
            },
        );
        assert_eq!(user.role_names(), vec!["Admin", "User"]);
        assert_eq!(user.value(UserField::Roles), FieldValue::List(vec!["Admin".into(), "User".into()]));
    }

    #[test]
    fn test_user_patch_leaves_missing_fields() {
        let mut user = seed::users()[0].clone();
        user.apply_patch(UserPatch {
            email: Some("jd@example.com".into()),
            ..Default::default()
        });
        assert_eq!(user.name, "John Doe");
        assert_eq!(user.email, "jd@example.com");
        assert_eq!(user.roles.len(), 1);
    }

    #[test]
    fn test_record_identity_accessors() {
        let p = Permission {
            id: "9".into(),
            name: "audit:read".into(),
            description: "Read audit".into(),
        };
        assert_eq!(p.id(), "9");
        assert_eq!(p.name(), "audit:read");
        assert_eq!(p.value(PermissionField::Description), FieldValue::Text("Read audit".into()));
        assert_eq!(Permission::KIND, "permission");
        assert_eq!(Role::KIND, "role");
    }
}

#[cfg(test)]
mod search_tests {
    use rbac_admin::model::{Permission, PermissionField, User, UserField};
    use rbac_admin::search::Search;
    use rbac_admin::store::seed;

    fn names<T>(items: &[T], name: impl Fn(&T) -> &str) -> Vec<String> {
        items.iter().map(|i| name(i).to_string()).collect()
    }

    #[test]
    fn test_search_empty_query_returns_input_unchanged() {
        let users = seed::users();
        let mut search = Search::new([UserField::Name]);
        assert_eq!(search.apply(&users), users);
        search.set_query("   ");
        assert_eq!(search.apply(&users), users);
    }

    #[test]
    fn test_search_case_insensitive() {
        let users = seed::users();
        let mut search = Search::new([UserField::Name, UserField::Email]);
        search.set_query("JANE");
        assert_eq!(names(&search.apply(&users), |u: &User| u.name.as_str()), vec!["Jane Smith"]);
    }

    #[test]
    fn test_search_matches_any_configured_field() {
        let users = seed::users();
        let mut search = Search::new([UserField::Name, UserField::Roles]);
        search.set_query("admin");
        assert_eq!(names(&search.apply(&users), |u: &User| u.name.as_str()), vec!["John Doe"]);
        // Email is not configured, so an email-only match drops everything.
        search.set_query("example.com");
        assert!(search.apply(&users).is_empty());
    }

    #[test]
    fn test_search_keeps_relative_order() {
        let perms = seed::permissions();
        let mut search = Search::new([PermissionField::Name]);
        search.set_query("write");
        assert_eq!(
            names(&search.apply(&perms), |p: &Permission| p.name.as_str()),
            vec!["users:write", "roles:write"]
        );
    }

    #[test]
    fn test_search_special_characters_and_no_panic() {
        let perms = seed::permissions();
        let mut search = Search::new([PermissionField::Name, PermissionField::Description]);
        for q in ["*", "(", "[a-z]", "\\", "🙂", ":"] {
            search.set_query(q);
            let _ = search.apply(&perms);
        }
        search.set_query(":");
        assert_eq!(search.apply(&perms).len(), 4);
    }

    #[test]
    fn test_search_performance_large_dataset() {
        let perms: Vec<Permission> = (0..20_000)
            .map(|i| Permission {
                id: i.to_string(),
                name: format!("res{i}:read"),
                description: format!("Read resource {i}"),
            })
            .collect();
        let mut search = Search::new([PermissionField::Name]);
        search.set_query("res1999");
        let started = std::time::Instant::now();
        let found = search.apply(&perms);
        assert!(started.elapsed() < std::time::Duration::from_secs(2));
        assert_eq!(found.len(), 11);
    }

    #[test]
    fn test_search_edit_helpers() {
        let mut search = Search::<UserField>::new([UserField::Name]);
        search.push_char('j');
        search.push_char('o');
        assert_eq!(search.query(), "jo");
        search.pop_char();
        assert_eq!(search.query(), "j");
        search.clear();
        assert!(!search.is_active());
    }
}

#[cfg(test)]
mod sort_tests {
    use rbac_admin::model::{Permission, PermissionField, Role, RoleField};
    use rbac_admin::sort::{Sort, SortConfig, SortDirection};
    use rbac_admin::store::seed;

    fn perm(id: &str, name: &str) -> Permission {
        Permission {
            id: id.into(),
            name: name.into(),
            description: String::new(),
        }
    }

    #[test]
    fn test_sort_ascending_by_name() {
        let items = vec![perm("1", "b"), perm("2", "a")];
        let mut sort = Sort::new();
        sort.request(PermissionField::Name);
        let ids: Vec<_> = sort.apply(&items).into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[test]
    fn test_sort_request_cycles_direction() {
        let mut sort = Sort::new();
        assert_eq!(sort.config(), None);
        sort.request(PermissionField::Name);
        sort.request(PermissionField::Name);
        assert_eq!(
            sort.config(),
            Some(SortConfig {
                key: PermissionField::Name,
                direction: SortDirection::Descending
            })
        );
        sort.request(PermissionField::Name);
        assert_eq!(sort.config().map(|c| c.direction), Some(SortDirection::Ascending));
        sort.request(PermissionField::Description);
        assert_eq!(
            sort.config(),
            Some(SortConfig {
                key: PermissionField::Description,
                direction: SortDirection::Ascending
            })
        );
    }

    #[test]
    fn test_sort_is_stable_in_both_directions() {
        let items = vec![perm("1", "same"), perm("2", "other"), perm("3", "same")];
        let mut sort = Sort::new();
        sort.request(PermissionField::Name);
        let asc: Vec<_> = sort.apply(&items).into_iter().map(|p| p.id).collect();
        assert_eq!(asc, vec!["2", "1", "3"]);
        sort.request(PermissionField::Name);
        let desc: Vec<_> = sort.apply(&items).into_iter().map(|p| p.id).collect();
        assert_eq!(desc, vec!["1", "3", "2"]);
    }

    #[test]
    fn test_sort_by_list_field() {
        let roles = seed::roles();
        let mut sort = Sort::<RoleField>::new();
        sort.request(RoleField::Permissions);
        let names: Vec<_> = sort.apply(&roles).into_iter().map(|r: Role| r.name).collect();
        assert_eq!(names, vec!["User", "Admin"]);
    }

    #[test]
    fn test_sort_without_config_keeps_order() {
        let items = seed::permissions();
        let sort = Sort::<PermissionField>::new();
        assert_eq!(sort.apply(&items), items);
    }
}

#[cfg(test)]
mod form_tests {
    use rbac_admin::form::{FieldRules, FormState, INVALID_FORMAT, REQUIRED};
    use regex::Regex;

    fn form() -> FormState {
        FormState::new(
            [("name", ""), ("email", "")],
            [
                ("name", FieldRules::new().required().min_length(2).max_length(5)),
                (
                    "email",
                    FieldRules::new().pattern(Regex::new(r"^[^@\s]+@[^@\s]+$").unwrap()),
                ),
            ],
        )
    }

    #[test]
    fn test_validate_field_is_pure() {
        let f = form();
        assert_eq!(f.validate_field("name", ""), REQUIRED);
        assert_eq!(f.validate_field("name", "a"), "Minimum length is 2");
        assert_eq!(f.validate_field("name", "abcdef"), "Maximum length is 5");
        assert_eq!(f.validate_field("name", "abc"), "");
        assert!(!f.is_touched("name"));
    }

    #[test]
    fn test_optional_pattern_field_still_checks_empty_value() {
        let f = form();
        assert_eq!(f.validate_field("email", ""), INVALID_FORMAT);
        assert_eq!(f.validate_field("email", "a@b"), "");
    }

    #[test]
    fn test_lengths_count_characters() {
        let f = form();
        assert_eq!(f.validate_field("name", "ééééé"), "");
    }

    #[test]
    fn test_validate_form_collects_only_failures() {
        let mut f = form();
        f.handle_change("name", "Bo");
        assert!(!f.validate_form());
        assert_eq!(f.error("name"), None);
        assert_eq!(f.error("email"), Some(INVALID_FORMAT));
        f.handle_change("email", "bo@x");
        assert!(f.validate_form());
        assert!(f.check().is_ok());
    }
}

#[cfg(test)]
mod error_handling_tests {
    use rbac_admin::error::{AdminError, Context};

    #[test]
    fn test_context_error_chaining() {
        let res: Result<(), std::io::Error> = Err(std::io::Error::other("disk full"));
        let err = res.with_ctx(|| "write theme".to_string()).unwrap_err();
        assert_eq!(err.to_string(), "write theme: disk full");
    }

    #[test]
    fn test_nested_contexts() {
        let inner: Result<(), AdminError> = Err(AdminError::Internal("boom".into()));
        let outer = inner.with_ctx(|| "inner".to_string());
        let msg = match outer {
            Err(e) => e.to_string(),
            Ok(()) => String::new(),
        };
        assert_eq!(msg, "inner: internal error: boom");
    }

    #[test]
    fn test_error_messages_name_the_subject() {
        let err = AdminError::Conflict {
            entity: "role",
            name: "Admin".into(),
        };
        assert_eq!(err.to_string(), "role already exists: Admin");
        let err = AdminError::Validation {
            field: "email".into(),
            message: "Invalid format".into(),
        };
        assert_eq!(err.to_string(), "email: Invalid format");
        assert_eq!(AdminError::Transport("timeout".into()).to_string(), "transport error: timeout");
    }
}

#[cfg(test)]
mod app_state_tests {
    use rbac_admin::app::{ActiveTab, EntityKind, InputMode, ModalState, Notice, Theme};

    #[test]
    fn test_active_tab_cycle() {
        let mut tab = ActiveTab::Dashboard;
        for _ in 0..ActiveTab::ALL.len() {
            tab = tab.next();
        }
        assert_eq!(tab, ActiveTab::Dashboard);
        assert_eq!(ActiveTab::Dashboard.prev(), ActiveTab::Permissions);
        assert_eq!(ActiveTab::parse(" roles "), Some(ActiveTab::Roles));
        assert_eq!(ActiveTab::parse("groups"), None);
    }

    #[test]
    fn test_input_mode_enum() {
        assert_ne!(InputMode::Login, InputMode::Normal);
        assert_ne!(InputMode::Search, InputMode::Modal);
    }

    #[test]
    fn test_theme_creation() {
        let mocha = Theme::mocha();
        assert_ne!(format!("{:?}", mocha.success), format!("{:?}", mocha.failure));
        assert_ne!(format!("{:?}", mocha.highlight_fg), format!("{:?}", mocha.text));
    }

    #[test]
    fn test_notice_message() {
        assert_eq!(Notice::Success("saved".into()).message(), "saved");
        assert_eq!(Notice::Failure("nope".into()).message(), "nope");
    }

    #[test]
    fn test_modal_state_variants() {
        let modal = ModalState::DeleteConfirm {
            kind: EntityKind::Role,
            id: "1".into(),
            name: "Admin".into(),
            selected: 1,
        };
        assert!(matches!(modal, ModalState::DeleteConfirm { selected: 1, .. }));
        assert_eq!(EntityKind::Role.label(), "Role");
        let info = ModalState::Info {
            message: "hello".into(),
        };
        assert!(matches!(info, ModalState::Info { .. }));
    }
}

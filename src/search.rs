use crate::model::Record;

/// Case-insensitive substring filter over a chosen set of record fields.
///
/// Filtering never reorders and never touches the source slice. A blank or
/// whitespace-only query lets every item through.
#[derive(Clone, Debug)]
pub struct Search<F> {
    query: String,
    fields: Vec<F>,
}

impl<F: Copy + Eq> Search<F> {
    pub fn new(fields: impl Into<Vec<F>>) -> Self {
        Self {
            query: String::new(),
            fields: fields.into(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
    }

    pub fn pop_char(&mut self) {
        self.query.pop();
    }

    pub fn clear(&mut self) {
        self.query.clear();
    }

    pub fn fields(&self) -> &[F] {
        &self.fields
    }

    pub fn is_active(&self) -> bool {
        !self.query.trim().is_empty()
    }

    pub fn matches<R: Record<Field = F>>(&self, item: &R) -> bool {
        if !self.is_active() {
            return true;
        }
        let q = self.query.to_lowercase();
        self.fields
            .iter()
            .any(|&field| item.value(field).search_text().contains(&q))
    }

    pub fn apply<R: Record<Field = F>>(&self, items: &[R]) -> Vec<R> {
        if !self.is_active() {
            return items.to_vec();
        }
        items.iter().filter(|item| self.matches(*item)).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Role, User, UserField, UserStatus};

    fn mk_user(id: &str, name: &str, email: &str, roles: &[&str]) -> User {
        User {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            status: UserStatus::Active,
            roles: roles
                .iter()
                .enumerate()
                .map(|(i, r)| Role {
                    id: i.to_string(),
                    name: r.to_string(),
                    description: String::new(),
                    permissions: vec![],
                })
                .collect(),
        }
    }

    fn users() -> Vec<User> {
        vec![
            mk_user("1", "Alice Doe", "alice@corp.io", &["Admin"]),
            mk_user("2", "Bobby Tables", "bob@example.com", &["User"]),
            mk_user("3", "Carol", "carol@example.com", &["Auditor", "User"]),
        ]
    }

    #[test]
    fn filters_by_any_configured_field_ignoring_case() {
        let mut search = Search::new([UserField::Name, UserField::Email]);
        search.set_query("EXAMPLE");
        let hits = search.apply(&users());
        let ids: Vec<_> = hits.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3"]);
    }

    #[test]
    fn unconfigured_fields_are_ignored() {
        let mut search = Search::new([UserField::Name]);
        search.set_query("corp.io");
        assert!(search.apply(&users()).is_empty());
    }

    #[test]
    fn blank_query_returns_input_unchanged() {
        let all = users();
        let mut search = Search::new([UserField::Name]);
        assert_eq!(search.apply(&all), all);
        search.set_query("   ");
        assert_eq!(search.apply(&all), all);
    }

    #[test]
    fn list_fields_match_on_member_names() {
        let mut search = Search::new([UserField::Roles]);
        search.set_query("audit");
        let hits = search.apply(&users());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Carol");
    }

    #[test]
    fn every_kept_item_matches_and_every_dropped_item_does_not() {
        let all = users();
        let mut search = Search::new([UserField::Name, UserField::Email, UserField::Roles]);
        for q in ["a", "o", "user", "@", "zzz", "Doe"] {
            search.set_query(q);
            let kept = search.apply(&all);
            let needle = q.to_lowercase();
            for u in &all {
                let hit = [UserField::Name, UserField::Email, UserField::Roles]
                    .iter()
                    .any(|&f| u.value(f).search_text().contains(&needle));
                assert_eq!(kept.contains(u), hit, "query {q:?} user {}", u.name);
            }
        }
    }
}

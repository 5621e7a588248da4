//! Single-key sort state for list views.

use std::cmp::Ordering;

use crate::model::{FieldValue, Record};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SortConfig<F> {
    pub key: F,
    pub direction: SortDirection,
}

#[derive(Clone, Debug)]
pub struct Sort<F> {
    config: Option<SortConfig<F>>,
}

impl<F> Default for Sort<F> {
    fn default() -> Self {
        Self { config: None }
    }
}

impl<F: Copy + Eq> Sort<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> Option<SortConfig<F>> {
        self.config
    }

    /// Ascending on `key`, or descending if `key` is already ascending.
    pub fn request(&mut self, key: F) {
        let direction = match self.config {
            Some(cfg) if cfg.key == key && cfg.direction == SortDirection::Ascending => {
                SortDirection::Descending
            }
            _ => SortDirection::Ascending,
        };
        self.config = Some(SortConfig { key, direction });
    }

    pub fn apply<R: Record<Field = F>>(&self, items: &[R]) -> Vec<R> {
        let Some(cfg) = self.config else {
            return items.to_vec();
        };
        let mut keyed: Vec<(FieldValue, &R)> =
            items.iter().map(|item| (item.value(cfg.key), item)).collect();
        keyed.sort_by(|(a, _), (b, _)| compare(a, b, cfg.direction));
        keyed.into_iter().map(|(_, item)| item.clone()).collect()
    }
}

/// Equal values stay in input order; descending reverses only unequal pairs.
pub fn compare(a: &FieldValue, b: &FieldValue, direction: SortDirection) -> Ordering {
    let ord = a.cmp(b);
    match direction {
        SortDirection::Ascending => ord,
        SortDirection::Descending => ord.reverse(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Permission, PermissionField};

    fn perm(id: &str, name: &str, description: &str) -> Permission {
        Permission {
            id: id.into(),
            name: name.into(),
            description: description.into(),
        }
    }

    fn ids(items: &[Permission]) -> Vec<&str> {
        items.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn request_sets_ascending_then_flips() {
        let items = vec![perm("1", "b", ""), perm("2", "a", "")];
        let mut sort = Sort::new();
        assert_eq!(ids(&sort.apply(&items)), vec!["1", "2"]);

        sort.request(PermissionField::Name);
        assert_eq!(ids(&sort.apply(&items)), vec!["2", "1"]);

        sort.request(PermissionField::Name);
        assert_eq!(
            sort.config().map(|c| c.direction),
            Some(SortDirection::Descending)
        );
        assert_eq!(ids(&sort.apply(&items)), vec!["1", "2"]);
    }

    #[test]
    fn switching_key_resets_to_ascending() {
        let mut sort = Sort::new();
        sort.request(PermissionField::Name);
        sort.request(PermissionField::Name);
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
    fn equal_keys_keep_input_order_in_both_directions() {
        let items = vec![
            perm("1", "x", "same"),
            perm("2", "y", "same"),
            perm("3", "z", "other"),
        ];
        let mut sort = Sort::new();
        sort.request(PermissionField::Description);
        assert_eq!(ids(&sort.apply(&items)), vec!["3", "1", "2"]);
        sort.request(PermissionField::Description);
        assert_eq!(ids(&sort.apply(&items)), vec!["1", "2", "3"]);
    }

    #[test]
    fn sorting_does_not_mutate_input() {
        let items = vec![perm("1", "b", ""), perm("2", "a", "")];
        let mut sort = Sort::new();
        sort.request(PermissionField::Name);
        let _ = sort.apply(&items);
        assert_eq!(ids(&items), vec!["1", "2"]);
    }
}

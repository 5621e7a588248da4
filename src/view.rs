//! Derived list view: store snapshot, then search, then sort.
//!
//! The derived sequence is cached against the store version plus the current
//! query, field set and sort config, so a committed mutation always forces a
//! recompute.

use crate::model::Record;
use crate::search::Search;
use crate::sort::{Sort, SortConfig};
use crate::store::{Backend, EntityStore, StoreSnapshot};

struct Derived<R: Record> {
    version: u64,
    query: String,
    fields: Vec<R::Field>,
    sort: Option<SortConfig<R::Field>>,
    items: Vec<R>,
}

pub struct ListView<R: Record> {
    pub search: Search<R::Field>,
    pub sort: Sort<R::Field>,
    pub selected: usize,
    derived: Option<Derived<R>>,
}

impl<R: Record> ListView<R> {
    pub fn new(search_fields: impl Into<Vec<R::Field>>) -> Self {
        Self {
            search: Search::new(search_fields),
            sort: Sort::new(),
            selected: 0,
            derived: None,
        }
    }

    fn is_fresh(&self, version: u64) -> bool {
        match &self.derived {
            Some(d) => {
                d.version == version
                    && d.query == self.search.query()
                    && d.fields == self.search.fields()
                    && d.sort == self.sort.config()
            }
            None => false,
        }
    }

    /// Recompute the derived sequence if anything it depends on changed.
    pub fn refresh(&mut self, snapshot: &StoreSnapshot<R>) -> &[R] {
        if !self.is_fresh(snapshot.version) {
            let filtered = self.search.apply(&snapshot.items);
            let items = self.sort.apply(&filtered);
            self.derived = Some(Derived {
                version: snapshot.version,
                query: self.search.query().to_string(),
                fields: self.search.fields().to_vec(),
                sort: self.sort.config(),
                items,
            });
            self.clamp_selection();
        }
        self.items()
    }

    /// Like [`refresh`](Self::refresh), but skips cloning the store's
    /// collection when the cached sequence is still current.
    pub fn sync<B: Backend<R>>(&mut self, store: &EntityStore<R, B>) -> &[R] {
        if self.is_fresh(store.version()) {
            return self.items();
        }
        let snapshot = store.snapshot();
        self.refresh(&snapshot)
    }

    pub fn items(&self) -> &[R] {
        self.derived.as_ref().map(|d| d.items.as_slice()).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    pub fn selected_item(&self) -> Option<&R> {
        self.items().get(self.selected)
    }

    pub fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.len().saturating_sub(1));
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.len() {
            self.selected += 1;
        }
    }

    pub fn page_up(&mut self, rows_per_page: usize) {
        self.selected = self.selected.saturating_sub(rows_per_page.max(1));
    }

    pub fn page_down(&mut self, rows_per_page: usize) {
        let next = self.selected.saturating_add(rows_per_page.max(1));
        self.selected = next.min(self.len().saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Permission, PermissionField};
    use crate::store::seed;

    fn snapshot(items: Vec<Permission>, version: u64) -> StoreSnapshot<Permission> {
        StoreSnapshot {
            items,
            is_loading: false,
            last_error: None,
            version,
        }
    }

    #[test]
    fn searches_before_sorting() {
        let mut view = ListView::<Permission>::new([PermissionField::Name]);
        view.search.set_query("write");
        view.sort.request(PermissionField::Name);
        view.sort.request(PermissionField::Name);
        let names: Vec<_> = view
            .refresh(&snapshot(seed::permissions(), 1))
            .iter()
            .map(|p| p.name.clone())
            .collect();
        assert_eq!(names, vec!["users:write", "roles:write"]);
    }

    #[test]
    fn new_store_version_is_never_served_stale() {
        let mut view = ListView::<Permission>::new([PermissionField::Name]);
        assert_eq!(view.refresh(&snapshot(seed::permissions(), 1)).len(), 4);

        let mut fewer = seed::permissions();
        fewer.truncate(2);
        assert_eq!(view.refresh(&snapshot(fewer, 2)).len(), 2);
    }

    #[test]
    fn selection_is_clamped_when_list_shrinks() {
        let mut view = ListView::<Permission>::new([PermissionField::Name]);
        view.refresh(&snapshot(seed::permissions(), 1));
        view.page_down(10);
        assert_eq!(view.selected, 3);
        view.search.set_query("roles");
        view.refresh(&snapshot(seed::permissions(), 1));
        assert_eq!(view.selected, 1);
        assert_eq!(view.selected_item().map(|p| p.name.as_str()), Some("roles:write"));
    }
}

/// Recency-ordered channel history backing autocomplete

use crate::channel::{sanitize, ChannelName};
use crate::storage::{decode_history, encode_history, HistoryRepository};
use std::rc::Rc;

/// Capped, de-duplicated history; rank 0 is the most recently used entry
///
/// Other pages on the same origin share the stored list, so every read or
/// change starts from a fresh load. Repository failures never reach callers:
/// a failed load keeps the in-memory list (empty at startup) and a failed
/// save keeps the in-memory list as is.
pub struct HistoryStore {
    repo: Rc<dyn HistoryRepository>,
    entries: Vec<ChannelName>,
    cap: usize,
    seeded_path: Option<String>,
}

impl HistoryStore {
    pub fn load(repo: Rc<dyn HistoryRepository>, cap: usize) -> Self {
        let mut entries = read_entries(repo.as_ref()).unwrap_or_default();
        entries.truncate(cap);

        HistoryStore {
            repo,
            entries,
            cap,
            seeded_path: None,
        }
    }

    pub fn entries(&self) -> &[ChannelName] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Move (or insert) `raw` to rank 0. Returns false for empty input.
    pub fn add(&mut self, raw: &str) -> bool {
        let Some(name) = ChannelName::new(raw) else {
            return false;
        };

        self.refresh();
        self.entries.retain(|existing| *existing != name);
        self.entries.insert(0, name);
        self.entries.truncate(self.cap);
        self.persist();
        true
    }

    /// Drop `raw` from the history. Returns true if it was present.
    pub fn remove(&mut self, raw: &str) -> bool {
        let Some(name) = ChannelName::new(raw) else {
            return false;
        };

        self.refresh();
        let original_len = self.entries.len();
        self.entries.retain(|existing| *existing != name);
        let removed = self.entries.len() < original_len;
        if removed {
            self.persist();
        }
        removed
    }

    /// Entries starting with the sanitized prefix, in recency order
    pub fn filter(&mut self, prefix: &str) -> Vec<ChannelName> {
        self.refresh();
        let prefix = sanitize(prefix);
        if prefix.is_empty() {
            return self.entries.clone();
        }

        self.entries
            .iter()
            .filter(|name| name.starts_with(&prefix))
            .cloned()
            .collect()
    }

    /// Add every channel segment of `path`, once per distinct path value
    ///
    /// Returns false when this path was already the last one seeded.
    pub fn seed_from_path(&mut self, path: &str) -> bool {
        if self.seeded_path.as_deref() == Some(path) {
            return false;
        }
        self.seeded_path = Some(path.to_string());

        for segment in path.split('/').filter(|s| !s.is_empty()) {
            self.add(segment);
        }
        true
    }

    /// Pick up what other pages stored since the last read
    fn refresh(&mut self) {
        if let Some(mut entries) = read_entries(self.repo.as_ref()) {
            entries.truncate(self.cap);
            self.entries = entries;
        }
    }

    fn persist(&self) {
        let result = encode_history(&self.entries, self.cap).and_then(|payload| self.repo.save(&payload));
        if let Err(e) = result {
            log::info!("History not saved: {}", e);
        }
    }
}

/// The stored list; `None` when the repository itself failed
///
/// An absent or unparsable payload reads as an empty list.
fn read_entries(repo: &dyn HistoryRepository) -> Option<Vec<ChannelName>> {
    match repo.load() {
        Ok(Some(payload)) => Some(decode_history(&payload).unwrap_or_else(|e| {
            log::info!("Ignoring stored history: {}", e);
            Vec::new()
        })),
        Ok(None) => Some(Vec::new()),
        Err(e) => {
            log::info!("History unavailable: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryRepository;

    fn create_test_store(payload: Option<&str>) -> (HistoryStore, Rc<MemoryRepository>) {
        let repo = Rc::new(match payload {
            Some(p) => MemoryRepository::with_payload(p),
            None => MemoryRepository::new(),
        });
        let store = HistoryStore::load(repo.clone(), 200);
        (store, repo)
    }

    fn as_strs(names: &[ChannelName]) -> Vec<&str> {
        names.iter().map(|n| n.as_str()).collect()
    }

    #[test]
    fn test_add_moves_to_front_without_duplicates() {
        let (mut store, _) = create_test_store(None);

        store.add("foo");
        store.add("bar");
        store.add("foo");

        assert_eq!(as_strs(&store.filter("")), vec!["foo", "bar"]);
    }

    #[test]
    fn test_add_sanitizes_and_ignores_empty() {
        let (mut store, repo) = create_test_store(None);

        assert!(!store.add("  !!  "));
        assert!(store.is_empty());
        assert_eq!(repo.payload(), None);

        assert!(store.add("Foo_Bar!"));
        assert_eq!(as_strs(store.entries()), vec!["foo_bar"]);
    }

    #[test]
    fn test_add_persists_full_list() {
        let (mut store, repo) = create_test_store(None);

        store.add("abc");
        store.add("xyz");

        assert_eq!(repo.payload(), Some(r#"["xyz","abc"]"#.to_string()));
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let (mut store, repo) = create_test_store(None);

        for i in 0..250 {
            store.add(&format!("chan{}", i));
        }

        assert_eq!(store.len(), 200);
        assert_eq!(store.entries()[0].as_str(), "chan249");
        assert_eq!(store.entries()[199].as_str(), "chan50");
        assert!(store.filter("chan49").is_empty());

        let persisted = decode_history(&repo.payload().unwrap()).unwrap();
        assert_eq!(persisted.len(), 200);
    }

    #[test]
    fn test_remove() {
        let (mut store, repo) = create_test_store(Some(r#"["abc","abd","xyz"]"#));

        assert!(store.remove("ABD"));
        assert_eq!(as_strs(store.entries()), vec!["abc", "xyz"]);
        assert_eq!(repo.payload(), Some(r#"["abc","xyz"]"#.to_string()));

        assert!(!store.remove("nope"));
        assert!(!store.remove(""));
    }

    #[test]
    fn test_filter_by_prefix() {
        let (mut store, _) = create_test_store(Some(r#"["abc","abd","xyz"]"#));

        assert_eq!(as_strs(&store.filter("ab")), vec!["abc", "abd"]);
        assert_eq!(as_strs(&store.filter("")), vec!["abc", "abd", "xyz"]);
        assert_eq!(as_strs(&store.filter("  AB ")), vec!["abc", "abd"]);
        assert!(store.filter("q").is_empty());
    }

    #[test]
    fn test_seed_from_path_once_per_path() {
        let (mut store, _) = create_test_store(None);

        assert!(store.seed_from_path("/alpha/Beta//gamma"));
        assert_eq!(as_strs(store.entries()), vec!["gamma", "beta", "alpha"]);

        // User activity in between must not be undone by a repeat seed
        store.add("delta");
        assert!(!store.seed_from_path("/alpha/Beta//gamma"));
        assert_eq!(store.entries()[0].as_str(), "delta");

        assert!(store.seed_from_path("/alpha"));
        assert_eq!(store.entries()[0].as_str(), "alpha");
    }

    #[test]
    fn test_corrupt_payload_degrades_to_empty() {
        let (mut store, _) = create_test_store(Some("{broken"));
        assert!(store.is_empty());

        store.add("fresh");
        assert_eq!(as_strs(store.entries()), vec!["fresh"]);
    }

    #[test]
    fn test_storage_failures_are_swallowed() {
        let repo = Rc::new(MemoryRepository::new());
        repo.set_failing(true);

        let mut store = HistoryStore::load(repo.clone(), 200);
        assert!(store.is_empty());

        assert!(store.add("offline"));
        assert_eq!(as_strs(&store.filter("off")), vec!["offline"]);
        assert!(store.remove("offline"));
    }

    #[test]
    fn test_pages_sharing_storage_keep_each_others_entries() {
        let repo = Rc::new(MemoryRepository::with_payload(r#"["old"]"#));
        let mut first = HistoryStore::load(repo.clone(), 200);
        let mut second = HistoryStore::load(repo.clone(), 200);

        first.add("foo");
        second.add("bar");

        assert_eq!(repo.payload(), Some(r#"["bar","foo","old"]"#.to_string()));
        assert_eq!(as_strs(&first.filter("")), vec!["bar", "foo", "old"]);

        second.remove("foo");
        first.add("baz");
        assert_eq!(repo.payload(), Some(r#"["baz","bar","old"]"#.to_string()));
    }

    #[test]
    fn test_cleared_storage_is_picked_up() {
        let (mut store, repo) = create_test_store(Some(r#"["abc"]"#));

        repo.save("not json").unwrap();
        assert!(store.filter("").is_empty());

        store.add("xyz");
        assert_eq!(repo.payload(), Some(r#"["xyz"]"#.to_string()));
    }
}

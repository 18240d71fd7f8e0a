/// Persistence for the channel history (localStorage in the browser)

use crate::channel::ChannelName;
use std::collections::HashSet;

/// Raw load/save of the history payload under a fixed key
pub trait HistoryRepository {
    /// Returns `Ok(None)` when nothing has been stored yet
    fn load(&self) -> Result<Option<String>, String>;

    fn save(&self, payload: &str) -> Result<(), String>;
}

/// Decode a stored payload into sanitized, de-duplicated names
///
/// Entries that no longer sanitize to anything are dropped, and the
/// first occurrence of a duplicate wins so recency order is kept.
pub fn decode_history(payload: &str) -> Result<Vec<ChannelName>, String> {
    let raw: Vec<String> = serde_json::from_str(payload)
        .map_err(|e| format!("Failed to parse history: {}", e))?;

    let mut seen = HashSet::new();
    Ok(raw
        .iter()
        .filter_map(|entry| ChannelName::new(entry))
        .filter(|name| seen.insert(name.clone()))
        .collect())
}

/// Encode at most `cap` names, most recent first
pub fn encode_history(entries: &[ChannelName], cap: usize) -> Result<String, String> {
    let kept = &entries[..entries.len().min(cap)];
    serde_json::to_string(kept).map_err(|e| format!("Failed to serialize history: {}", e))
}

/// Browser localStorage, scoped to the page origin
pub struct LocalStorageRepository {
    key: String,
}

impl LocalStorageRepository {
    pub fn new(key: impl Into<String>) -> Self {
        LocalStorageRepository { key: key.into() }
    }

    fn storage() -> Result<web_sys::Storage, String> {
        let window = web_sys::window().ok_or_else(|| "window is unavailable".to_string())?;
        window
            .local_storage()
            .map_err(|e| format!("Failed to access local storage: {:?}", e))?
            .ok_or_else(|| "local storage is unavailable".to_string())
    }
}

impl HistoryRepository for LocalStorageRepository {
    fn load(&self) -> Result<Option<String>, String> {
        Self::storage()?
            .get_item(&self.key)
            .map_err(|e| format!("Failed to read {}: {:?}", self.key, e))
    }

    fn save(&self, payload: &str) -> Result<(), String> {
        Self::storage()?
            .set_item(&self.key, payload)
            .map_err(|e| format!("Failed to write {}: {:?}", self.key, e))
    }
}

#[cfg(test)]
use std::cell::{Cell, RefCell};

/// In-memory repository with a failure switch
#[cfg(test)]
#[derive(Default)]
pub struct MemoryRepository {
    payload: RefCell<Option<String>>,
    failing: Cell<bool>,
}

#[cfg(test)]
impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_payload(payload: &str) -> Self {
        MemoryRepository {
            payload: RefCell::new(Some(payload.to_string())),
            failing: Cell::new(false),
        }
    }

    /// Make every subsequent load/save fail
    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }

    pub fn payload(&self) -> Option<String> {
        self.payload.borrow().clone()
    }
}

#[cfg(test)]
impl HistoryRepository for MemoryRepository {
    fn load(&self) -> Result<Option<String>, String> {
        if self.failing.get() {
            return Err("storage unavailable".to_string());
        }
        Ok(self.payload.borrow().clone())
    }

    fn save(&self, payload: &str) -> Result<(), String> {
        if self.failing.get() {
            return Err("storage unavailable".to_string());
        }
        *self.payload.borrow_mut() = Some(payload.to_string());
        Ok(())
    }
}

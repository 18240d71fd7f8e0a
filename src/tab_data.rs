/// Channel tabs mirroring the host page's native tab list
use crate::channel::{channel_from_link_target, ChannelName};
use crate::history::HistoryStore;

/// Triggers the host's own tab control so its chat/video panels follow
pub trait NativeTabController {
    fn activate(&self, native_index: usize);
}

/// One entry in the carousel
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelTab {
    /// Position in the strip, which is also the channel's path segment index
    pub index: usize,
    /// Position of the native tab control this entry drives
    pub native_index: usize,
    pub name: ChannelName,
    pub active: bool,
}

impl ChannelTab {
    pub fn new(index: usize, native_index: usize, name: ChannelName) -> ChannelTab {
        ChannelTab {
            index,
            native_index,
            name,
            active: false,
        }
    }
}

/// Ordered tabs with exactly one active entry (when non-empty)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TabStrip {
    tabs: Vec<ChannelTab>,
}

impl TabStrip {
    /// Build from the native tabs' link targets, in page order
    ///
    /// Targets that do not yield a channel are skipped but keep their
    /// native position, so activation still reaches the right control.
    pub fn from_link_targets(targets: &[String], prefix: &str) -> TabStrip {
        let mut tabs: Vec<ChannelTab> = targets
            .iter()
            .enumerate()
            .filter_map(|(native_index, href)| {
                channel_from_link_target(href, prefix).map(|name| (native_index, name))
            })
            .enumerate()
            .map(|(index, (native_index, name))| ChannelTab::new(index, native_index, name))
            .collect();

        if let Some(first) = tabs.first_mut() {
            first.active = true;
        }

        TabStrip { tabs }
    }

    pub fn tabs(&self) -> &[ChannelTab] {
        &self.tabs
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ChannelTab> {
        self.tabs.get(index)
    }

    pub fn active_index(&self) -> Option<usize> {
        self.tabs.iter().position(|t| t.active)
    }

    /// Seed the history: tab names first, then the URL's channels on top
    pub fn seed_history(&self, history: &mut HistoryStore, current_path: &str) {
        for tab in &self.tabs {
            history.add(tab.name.as_str());
        }
        history.seed_from_path(current_path);
    }

    /// Make `index` the only active tab and sync the native control
    pub fn select(&mut self, index: usize, controller: &dyn NativeTabController) -> bool {
        let Some(native_index) = self.tabs.get(index).map(|t| t.native_index) else {
            return false;
        };

        for tab in &mut self.tabs {
            tab.active = tab.index == index;
        }
        controller.activate(native_index);
        true
    }
}

/// Next focus position when cycling through `len` strip buttons
///
/// Wraps at both ends; with nothing focused, forward starts at the first
/// button and backward at the last.
pub fn cycle_focus(current: Option<usize>, len: usize, backwards: bool) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let current = current.filter(|&i| i < len);
    Some(match (current, backwards) {
        (None, false) => 0,
        (None, true) => len - 1,
        (Some(i), false) => (i + 1) % len,
        (Some(0), true) => len - 1,
        (Some(i), true) => i - 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryRepository;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct RecordingController {
        activated: RefCell<Vec<usize>>,
    }

    impl NativeTabController for RecordingController {
        fn activate(&self, native_index: usize) {
            self.activated.borrow_mut().push(native_index);
        }
    }

    fn create_test_strip(targets: &[&str]) -> TabStrip {
        let targets: Vec<String> = targets.iter().map(|s| s.to_string()).collect();
        TabStrip::from_link_targets(&targets, "#chat-")
    }

    #[test]
    fn test_from_link_targets() {
        let strip = create_test_strip(&["#chat-Lirik", "#chat-xqc", "#chat-summit1g"]);

        let names: Vec<&str> = strip.tabs().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["lirik", "xqc", "summit1g"]);
        assert_eq!(strip.active_index(), Some(0));
        assert_eq!(strip.tabs().iter().filter(|t| t.active).count(), 1);
    }

    #[test]
    fn test_unusable_targets_keep_native_positions() {
        let strip = create_test_strip(&["#chat-a", "#chat-", "#chat-c"]);

        assert_eq!(strip.len(), 2);
        assert_eq!(strip.get(1).unwrap().index, 1);
        assert_eq!(strip.get(1).unwrap().native_index, 2);
    }

    #[test]
    fn test_empty_strip() {
        let strip = create_test_strip(&[]);
        assert!(strip.is_empty());
        assert_eq!(strip.active_index(), None);
    }

    #[test]
    fn test_select_activates_one_and_syncs_native() {
        let mut strip = create_test_strip(&["#chat-a", "#chat-", "#chat-c"]);
        let controller = RecordingController::default();

        assert!(strip.select(1, &controller));

        assert_eq!(strip.active_index(), Some(1));
        assert_eq!(strip.tabs().iter().filter(|t| t.active).count(), 1);
        assert_eq!(*controller.activated.borrow(), vec![2]);
    }

    #[test]
    fn test_select_out_of_range() {
        let mut strip = create_test_strip(&["#chat-a"]);
        let controller = RecordingController::default();

        assert!(!strip.select(4, &controller));
        assert_eq!(strip.active_index(), Some(0));
        assert!(controller.activated.borrow().is_empty());
    }

    #[test]
    fn test_seed_history_puts_url_first() {
        let strip = create_test_strip(&["#chat-a", "#chat-b"]);
        let mut history = HistoryStore::load(Rc::new(MemoryRepository::new()), 200);

        strip.seed_history(&mut history, "/b/c");

        let names: Vec<&str> = history.entries().iter().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_cycle_focus() {
        assert_eq!(cycle_focus(None, 3, false), Some(0));
        assert_eq!(cycle_focus(None, 3, true), Some(2));
        assert_eq!(cycle_focus(Some(2), 3, false), Some(0));
        assert_eq!(cycle_focus(Some(0), 3, true), Some(2));
        assert_eq!(cycle_focus(Some(1), 3, true), Some(0));
        assert_eq!(cycle_focus(Some(9), 3, false), Some(0));
        assert_eq!(cycle_focus(None, 0, false), None);
    }
}

/// Autocomplete suggestions drawn from the channel history

use crate::channel::ChannelName;
use crate::geometry::{Point, Rect, Size};
use crate::history::HistoryStore;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMove {
    Up,
    Down,
}

/// The rows of one open overlay plus its keyboard/pointer selection
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionList {
    rows: Vec<ChannelName>,
    active: Option<usize>,
}

impl SuggestionList {
    /// Filter the history for `input`; `None` when nothing matches
    ///
    /// The current page path is merged into the history first so every
    /// connected channel is suggestible.
    pub fn open(history: &mut HistoryStore, input: &str, current_path: &str) -> Option<SuggestionList> {
        history.seed_from_path(current_path);
        let rows = history.filter(input);
        if rows.is_empty() {
            return None;
        }
        Some(SuggestionList { rows, active: None })
    }

    pub fn rows(&self) -> &[ChannelName] {
        &self.rows
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn active_name(&self) -> Option<&ChannelName> {
        self.active.and_then(|i| self.rows.get(i))
    }

    pub fn hover(&mut self, index: usize) {
        if index < self.rows.len() {
            self.active = Some(index);
        }
    }

    /// Move the selection one row with wraparound
    ///
    /// With nothing selected, Up starts at the last row and Down at the first.
    pub fn move_active(&mut self, step: SelectionMove) {
        let len = self.rows.len();
        if len == 0 {
            return;
        }
        self.active = Some(match (self.active, step) {
            (None, SelectionMove::Up) => len - 1,
            (None, SelectionMove::Down) => 0,
            (Some(i), SelectionMove::Up) => (i + len - 1) % len,
            (Some(i), SelectionMove::Down) => (i + 1) % len,
        });
    }

    pub fn select_last(&mut self) {
        if !self.rows.is_empty() {
            self.active = Some(self.rows.len() - 1);
        }
    }

    fn remove_row(&mut self, index: usize) -> Option<ChannelName> {
        if index >= self.rows.len() {
            return None;
        }
        let removed = self.rows.remove(index);
        self.active = match self.active {
            Some(a) if a == index => None,
            Some(a) if a > index => Some(a - 1),
            other => other,
        };
        Some(removed)
    }
}

/// What became of the overlay after a row delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowRemoval {
    /// Rows remain; the overlay should be repositioned
    Remaining,
    /// That was the last row; the overlay is gone
    Closed,
    /// No such row
    Missing,
}

/// Holder of the one suggestion overlay that may exist at a time
#[derive(Debug, Default)]
pub struct OverlaySlot {
    current: Option<(Uuid, SuggestionList)>,
}

impl OverlaySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `list` for `owner`, evicting and returning any previous list
    pub fn install(&mut self, owner: Uuid, list: SuggestionList) -> Option<SuggestionList> {
        self.current.replace((owner, list)).map(|(_, previous)| previous)
    }

    pub fn close(&mut self) -> Option<SuggestionList> {
        self.current.take().map(|(_, list)| list)
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn owner(&self) -> Option<Uuid> {
        self.current.as_ref().map(|(owner, _)| *owner)
    }

    pub fn list(&self) -> Option<&SuggestionList> {
        self.current.as_ref().map(|(_, list)| list)
    }

    pub fn list_mut(&mut self) -> Option<&mut SuggestionList> {
        self.current.as_mut().map(|(_, list)| list)
    }

    /// Forget a row in both the history and the live overlay
    pub fn delete_row(&mut self, index: usize, history: &mut HistoryStore) -> RowRemoval {
        let Some(list) = self.list_mut() else {
            return RowRemoval::Missing;
        };
        let Some(removed) = list.remove_row(index) else {
            return RowRemoval::Missing;
        };
        history.remove(removed.as_str());

        if list.rows.is_empty() {
            self.close();
            RowRemoval::Closed
        } else {
            RowRemoval::Remaining
        }
    }
}

/// Overlay width: at least `min_width`, otherwise as wide as the anchor
pub fn overlay_width(anchor: &Rect, min_width: f64) -> f64 {
    anchor.width.max(min_width)
}

/// Position an overlay of `size` next to `anchor` inside `viewport`
///
/// Prefers below the anchor, flips above when it would overflow the bottom,
/// and clamps horizontally so it stays `inset` pixels from either edge.
pub fn place_overlay(anchor: &Rect, size: Size, viewport: Size, inset: f64) -> Point {
    let below = anchor.bottom() + inset;
    let y = if below + size.height > viewport.height - inset {
        (anchor.top - inset - size.height).max(inset)
    } else {
        below
    };

    let max_left = (viewport.width - inset - size.width).max(inset);
    let x = anchor.left.min(max_left).max(inset);

    Point { x, y }
}

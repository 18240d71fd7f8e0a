/// Inline add/rename editing of channel tabs
///
/// States: Closed → Adding | Renaming → Closed. At most one session is open;
/// opening another cancels the current one first. A session owns the single
/// suggestion overlay while it is open.

use crate::channel::ChannelName;
use crate::history::HistoryStore;
use crate::operations::ChannelPath;
use crate::suggest::{OverlaySlot, RowRemoval, SelectionMove, SuggestionList};
use url::Url;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub enum EditMode {
    /// The "+" control turned into a text field
    Add,
    /// The tab at `index` turned into a text field pre-filled with `original`
    Rename { index: usize, original: ChannelName },
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditorSession {
    pub id: Uuid,
    pub mode: EditMode,
    pub input: String,
    pub committed: bool,
}

/// Keys the editor intercepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKey {
    Tab,
    Enter,
    Escape,
    ArrowUp,
    ArrowDown,
    Other,
}

impl EditorKey {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_key(key: &str) -> EditorKey {
        match key {
            "Tab" => EditorKey::Tab,
            "Enter" => EditorKey::Enter,
            "Escape" => EditorKey::Escape,
            "ArrowUp" => EditorKey::ArrowUp,
            "ArrowDown" => EditorKey::ArrowDown,
            _ => EditorKey::Other,
        }
    }
}

/// What the caller should do after an editor event
#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    /// Not consumed; let the browser's default run
    Ignored,
    /// Consumed; suppress the default and re-render
    Handled,
    /// The session ended without a change; restore the original control
    Closed,
    /// The session committed; load this URL
    Navigate(Url),
}

/// Shared state an editor event may read or update
pub struct EditorContext<'a> {
    pub history: &'a mut HistoryStore,
    pub path: &'a ChannelPath,
}

#[derive(Debug, Default)]
pub struct InlineEditor {
    session: Option<EditorSession>,
    overlay: OverlaySlot,
}

impl InlineEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&EditorSession> {
        self.session.as_ref()
    }

    pub fn suggestions(&self) -> Option<&SuggestionList> {
        self.overlay.list()
    }

    pub fn is_adding(&self) -> bool {
        matches!(self.session.as_ref().map(|s| &s.mode), Some(EditMode::Add))
    }

    pub fn renaming_index(&self) -> Option<usize> {
        match self.session.as_ref().map(|s| &s.mode) {
            Some(EditMode::Rename { index, .. }) => Some(*index),
            _ => None,
        }
    }

    pub fn open_add(&mut self, ctx: &mut EditorContext) -> Uuid {
        self.open(EditMode::Add, String::new(), ctx)
    }

    pub fn open_rename(&mut self, index: usize, original: ChannelName, ctx: &mut EditorContext) -> Uuid {
        let input = original.to_string();
        self.open(EditMode::Rename { index, original }, input, ctx)
    }

    fn open(&mut self, mode: EditMode, input: String, ctx: &mut EditorContext) -> Uuid {
        // Evict first: the previous session and its overlay go together
        self.close();

        let id = Uuid::new_v4();
        log::debug!("Opening {:?} editor {}", mode, id);
        self.session = Some(EditorSession {
            id,
            mode,
            input,
            committed: false,
        });
        self.refresh_suggestions(ctx);
        id
    }

    /// Every keystroke re-filters the suggestions against the new value
    pub fn set_input(&mut self, value: &str, ctx: &mut EditorContext) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.input = value.to_string();
        self.refresh_suggestions(ctx);
    }

    pub fn refresh_suggestions(&mut self, ctx: &mut EditorContext) {
        self.overlay.close();
        let Some(session) = self.session.as_ref().filter(|s| !s.committed) else {
            return;
        };
        if let Some(list) = SuggestionList::open(ctx.history, &session.input, ctx.path.path()) {
            self.overlay.install(session.id, list);
        }
    }

    /// Drop the overlay but keep editing
    pub fn dismiss_suggestions(&mut self) {
        self.overlay.close();
    }

    /// Pointer-down somewhere on the page while a session may be open
    ///
    /// Presses on the field or its list keep the session; anything else
    /// cancels it.
    pub fn pointer_down(&mut self, inside_editor: bool) -> EditorAction {
        if inside_editor {
            return EditorAction::Ignored;
        }
        self.cancel()
    }

    /// The page scrolled or resized under the fixed-position list
    ///
    /// The list closes, the session stays. Scrolling the list itself is
    /// not a page move.
    pub fn viewport_moved(&mut self, inside_overlay: bool) -> EditorAction {
        if inside_overlay || self.overlay.close().is_none() {
            return EditorAction::Ignored;
        }
        EditorAction::Handled
    }

    pub fn key(&mut self, key: EditorKey, ctx: &mut EditorContext) -> EditorAction {
        if !self.is_live() {
            return EditorAction::Ignored;
        }

        match key {
            EditorKey::Tab => match self.overlay.list_mut() {
                Some(list) => {
                    list.select_last();
                    EditorAction::Handled
                }
                None => EditorAction::Ignored,
            },
            EditorKey::ArrowUp | EditorKey::ArrowDown => match self.overlay.list_mut() {
                Some(list) => {
                    let step = if key == EditorKey::ArrowUp {
                        SelectionMove::Up
                    } else {
                        SelectionMove::Down
                    };
                    list.move_active(step);
                    EditorAction::Handled
                }
                None => EditorAction::Ignored,
            },
            EditorKey::Enter => {
                // An active row is accepted first; keyboard acceptance commits
                self.fill_from_active();
                self.commit(ctx)
            }
            EditorKey::Escape => self.cancel(),
            EditorKey::Other => EditorAction::Ignored,
        }
    }

    pub fn hover_suggestion(&mut self, index: usize) {
        if let Some(list) = self.overlay.list_mut() {
            list.hover(index);
        }
    }

    /// Pointer pick: fill the field without committing
    pub fn pick_suggestion(&mut self, index: usize) -> EditorAction {
        if !self.is_live() {
            return EditorAction::Ignored;
        }
        let Some(name) = self.overlay.list().and_then(|l| l.rows().get(index)).cloned() else {
            return EditorAction::Ignored;
        };
        self.overlay.close();
        if let Some(session) = self.session.as_mut() {
            session.input = name.to_string();
        }
        EditorAction::Handled
    }

    pub fn delete_suggestion(&mut self, index: usize, ctx: &mut EditorContext) -> RowRemoval {
        self.overlay.delete_row(index, ctx.history)
    }

    /// Escape, outside pointer-down or blur: restore the original control
    pub fn cancel(&mut self) -> EditorAction {
        match self.session.as_ref() {
            None => EditorAction::Ignored,
            // The page is already navigating away
            Some(s) if s.committed => EditorAction::Ignored,
            Some(_) => {
                self.close();
                EditorAction::Closed
            }
        }
    }

    /// Submit the current value
    ///
    /// Empty input, or a rename to the same channel, cancels instead.
    pub fn commit(&mut self, ctx: &mut EditorContext) -> EditorAction {
        let Some(session) = self.session.as_ref().filter(|s| !s.committed) else {
            return EditorAction::Ignored;
        };
        let Some(name) = ChannelName::new(&session.input) else {
            return self.cancel();
        };

        let target = match &session.mode {
            EditMode::Add => Some(ctx.path.with_appended(&name)),
            EditMode::Rename { original, .. } if *original == name => None,
            EditMode::Rename { index, .. } => ctx.path.with_renamed(*index, &name),
        };
        let Some(target) = target else {
            return self.cancel();
        };

        ctx.history.add(name.as_str());
        self.overlay.close();
        if let Some(session) = self.session.as_mut() {
            session.input = name.to_string();
            session.committed = true;
        }
        log::info!("Navigating to {}", target);
        EditorAction::Navigate(target)
    }

    fn fill_from_active(&mut self) -> bool {
        let Some(name) = self.overlay.list().and_then(|l| l.active_name()).cloned() else {
            return false;
        };
        self.overlay.close();
        if let Some(session) = self.session.as_mut() {
            session.input = name.to_string();
        }
        true
    }

    fn is_live(&self) -> bool {
        self.session.as_ref().is_some_and(|s| !s.committed)
    }

    fn close(&mut self) {
        self.overlay.close();
        self.session = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryRepository;
    use std::rc::Rc;

    fn create_test_history(payload: &str) -> HistoryStore {
        HistoryStore::load(Rc::new(MemoryRepository::with_payload(payload)), 200)
    }

    fn create_test_path() -> ChannelPath {
        ChannelPath::parse("https://www.multitwitch.tv/lirik/xqc").unwrap()
    }

    fn name(raw: &str) -> ChannelName {
        ChannelName::new(raw).unwrap()
    }

    fn history_strs(history: &HistoryStore) -> Vec<String> {
        history.entries().iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_add_commit_sanitizes_and_appends() {
        let mut history = create_test_history("[]");
        let path = create_test_path();
        let mut ctx = EditorContext { history: &mut history, path: &path };
        let mut editor = InlineEditor::new();

        editor.open_add(&mut ctx);
        editor.set_input("Foo_Bar!", &mut ctx);
        let action = editor.key(EditorKey::Enter, &mut ctx);

        match action {
            EditorAction::Navigate(url) => assert_eq!(url.path(), "/lirik/xqc/foo_bar"),
            other => panic!("expected navigation, got {:?}", other),
        }
        assert_eq!(history.entries()[0].as_str(), "foo_bar");
    }

    #[test]
    fn test_add_existing_channel_navigates_without_new_segment() {
        let mut history = create_test_history("[]");
        let path = create_test_path();
        let mut ctx = EditorContext { history: &mut history, path: &path };
        let mut editor = InlineEditor::new();

        editor.open_add(&mut ctx);
        editor.set_input("XQC", &mut ctx);

        assert_eq!(
            editor.commit(&mut ctx),
            EditorAction::Navigate(Url::parse("https://www.multitwitch.tv/lirik/xqc").unwrap())
        );
    }

    #[test]
    fn test_add_empty_submission_cancels() {
        let mut history = create_test_history(r#"["abc"]"#);
        let path = create_test_path();
        let mut ctx = EditorContext { history: &mut history, path: &path };
        let mut editor = InlineEditor::new();

        editor.open_add(&mut ctx);
        editor.set_input("!!!", &mut ctx);

        assert_eq!(editor.key(EditorKey::Enter, &mut ctx), EditorAction::Closed);
        assert!(editor.session().is_none());
        assert!(editor.suggestions().is_none());
    }

    #[test]
    fn test_add_opens_suggestions_immediately() {
        let mut history = create_test_history(r#"["abc","abd"]"#);
        let path = create_test_path();
        let mut ctx = EditorContext { history: &mut history, path: &path };
        let mut editor = InlineEditor::new();

        editor.open_add(&mut ctx);

        // URL channels are merged in ahead of the stored ones
        let rows: Vec<&str> = editor.suggestions().unwrap().rows().iter().map(|n| n.as_str()).collect();
        assert_eq!(rows, vec!["xqc", "lirik", "abc", "abd"]);

        editor.set_input("ab", &mut ctx);
        assert_eq!(editor.suggestions().unwrap().rows().len(), 2);

        editor.set_input("zzz", &mut ctx);
        assert!(editor.suggestions().is_none());
        assert!(editor.session().is_some());
    }

    #[test]
    fn test_rename_to_same_name_is_noop() {
        let mut history = create_test_history(r#"["abc","lirik"]"#);
        let path = create_test_path();
        let mut ctx = EditorContext { history: &mut history, path: &path };
        let mut editor = InlineEditor::new();

        editor.open_rename(0, name("lirik"), &mut ctx);
        let before = history_strs(ctx.history);

        editor.set_input(" LIRIK ", &mut ctx);
        assert_eq!(editor.key(EditorKey::Enter, &mut ctx), EditorAction::Closed);
        assert_eq!(history_strs(&history), before);
    }

    #[test]
    fn test_rename_rewrites_segment() {
        let mut history = create_test_history("[]");
        let path = create_test_path();
        let mut ctx = EditorContext { history: &mut history, path: &path };
        let mut editor = InlineEditor::new();

        editor.open_rename(1, name("xqc"), &mut ctx);
        assert_eq!(editor.session().unwrap().input, "xqc");
        assert_eq!(editor.renaming_index(), Some(1));

        editor.set_input("Shroud", &mut ctx);
        let action = editor.commit(&mut ctx);

        assert_eq!(
            action,
            EditorAction::Navigate(Url::parse("https://www.multitwitch.tv/lirik/shroud").unwrap())
        );
        assert_eq!(history.entries()[0].as_str(), "shroud");
    }

    #[test]
    fn test_rename_out_of_range_is_noop() {
        let mut history = create_test_history("[]");
        let path = create_test_path();
        let mut ctx = EditorContext { history: &mut history, path: &path };
        let mut editor = InlineEditor::new();

        editor.open_rename(5, name("ghost"), &mut ctx);
        editor.set_input("other", &mut ctx);

        assert_eq!(editor.commit(&mut ctx), EditorAction::Closed);
        assert!(history.filter("other").is_empty());
    }

    #[test]
    fn test_second_session_replaces_first() {
        let mut history = create_test_history(r#"["abc"]"#);
        let path = create_test_path();
        let mut ctx = EditorContext { history: &mut history, path: &path };
        let mut editor = InlineEditor::new();

        let first = editor.open_add(&mut ctx);
        assert!(editor.suggestions().is_some());

        let second = editor.open_rename(0, name("lirik"), &mut ctx);

        assert_ne!(first, second);
        assert_eq!(editor.session().unwrap().id, second);
        assert!(!editor.is_adding());
        assert_eq!(editor.overlay.owner(), Some(second));
    }

    #[test]
    fn test_keyboard_accept_commits() {
        let mut history = create_test_history(r#"["abc","abd"]"#);
        let path = create_test_path();
        let mut ctx = EditorContext { history: &mut history, path: &path };
        let mut editor = InlineEditor::new();

        editor.open_add(&mut ctx);
        editor.set_input("ab", &mut ctx);
        assert_eq!(editor.key(EditorKey::ArrowDown, &mut ctx), EditorAction::Handled);
        assert_eq!(editor.key(EditorKey::ArrowDown, &mut ctx), EditorAction::Handled);

        match editor.key(EditorKey::Enter, &mut ctx) {
            EditorAction::Navigate(url) => assert_eq!(url.path(), "/lirik/xqc/abd"),
            other => panic!("expected navigation, got {:?}", other),
        }
        assert!(editor.suggestions().is_none());
    }

    #[test]
    fn test_tab_selects_last_suggestion() {
        let mut history = create_test_history(r#"["abc","abd"]"#);
        let path = create_test_path();
        let mut ctx = EditorContext { history: &mut history, path: &path };
        let mut editor = InlineEditor::new();

        editor.open_add(&mut ctx);
        editor.set_input("ab", &mut ctx);

        assert_eq!(editor.key(EditorKey::Tab, &mut ctx), EditorAction::Handled);
        assert_eq!(editor.suggestions().unwrap().active(), Some(1));

        editor.set_input("nothing", &mut ctx);
        assert_eq!(editor.key(EditorKey::Tab, &mut ctx), EditorAction::Ignored);
        assert_eq!(editor.key(EditorKey::ArrowUp, &mut ctx), EditorAction::Ignored);
    }

    #[test]
    fn test_pointer_pick_previews_without_commit() {
        let mut history = create_test_history(r#"["abc","abd"]"#);
        let path = create_test_path();
        let mut ctx = EditorContext { history: &mut history, path: &path };
        let mut editor = InlineEditor::new();

        editor.open_add(&mut ctx);
        editor.set_input("ab", &mut ctx);

        assert_eq!(editor.pick_suggestion(1), EditorAction::Handled);

        let session = editor.session().unwrap();
        assert_eq!(session.input, "abd");
        assert!(!session.committed);
        assert!(editor.suggestions().is_none());
    }

    #[test]
    fn test_escape_and_cancel() {
        let mut history = create_test_history(r#"["abc"]"#);
        let path = create_test_path();
        let mut ctx = EditorContext { history: &mut history, path: &path };
        let mut editor = InlineEditor::new();

        editor.open_add(&mut ctx);
        editor.set_input("draft", &mut ctx);

        assert_eq!(editor.key(EditorKey::Escape, &mut ctx), EditorAction::Closed);
        assert!(editor.session().is_none());
        assert_eq!(editor.cancel(), EditorAction::Ignored);
        assert!(history.filter("draft").is_empty());
    }

    #[test]
    fn test_committed_session_ignores_cancel() {
        let mut history = create_test_history("[]");
        let path = create_test_path();
        let mut ctx = EditorContext { history: &mut history, path: &path };
        let mut editor = InlineEditor::new();

        editor.open_rename(0, name("lirik"), &mut ctx);
        editor.set_input("pokimane", &mut ctx);
        assert!(matches!(editor.commit(&mut ctx), EditorAction::Navigate(_)));

        // Blur fires while the page unloads
        assert_eq!(editor.cancel(), EditorAction::Ignored);
        assert!(editor.session().unwrap().committed);
        assert_eq!(editor.key(EditorKey::Enter, &mut ctx), EditorAction::Ignored);
    }

    #[test]
    fn test_delete_suggestion() {
        let mut history = create_test_history(r#"["abc","abd"]"#);
        let path = create_test_path();
        let mut ctx = EditorContext { history: &mut history, path: &path };
        let mut editor = InlineEditor::new();

        editor.open_add(&mut ctx);
        editor.set_input("ab", &mut ctx);

        assert_eq!(editor.delete_suggestion(0, &mut ctx), RowRemoval::Remaining);
        assert_eq!(editor.delete_suggestion(0, &mut ctx), RowRemoval::Closed);
        assert!(editor.suggestions().is_none());
        assert!(editor.session().is_some());
        assert!(history.filter("ab").is_empty());
    }

    #[test]
    fn test_editor_key_mapping() {
        assert_eq!(EditorKey::from_key("Enter"), EditorKey::Enter);
        assert_eq!(EditorKey::from_key("ArrowDown"), EditorKey::ArrowDown);
        assert_eq!(EditorKey::from_key("a"), EditorKey::Other);
    }

    #[test]
    fn test_pointer_down_inside_keeps_session() {
        let mut history = create_test_history(r#"["abc"]"#);
        let path = create_test_path();
        let mut ctx = EditorContext { history: &mut history, path: &path };
        let mut editor = InlineEditor::new();

        editor.open_add(&mut ctx);
        assert_eq!(editor.pointer_down(true), EditorAction::Ignored);
        assert!(editor.session().is_some());
        assert!(editor.suggestions().is_some());

        assert_eq!(editor.pointer_down(false), EditorAction::Closed);
        assert!(editor.session().is_none());
        assert!(editor.suggestions().is_none());

        // Nothing left to cancel
        assert_eq!(editor.pointer_down(false), EditorAction::Ignored);
    }

    #[test]
    fn test_viewport_move_closes_list_but_keeps_session() {
        let mut history = create_test_history(r#"["abc"]"#);
        let path = create_test_path();
        let mut ctx = EditorContext { history: &mut history, path: &path };
        let mut editor = InlineEditor::new();

        editor.open_add(&mut ctx);
        editor.set_input("ab", &mut ctx);

        assert_eq!(editor.viewport_moved(true), EditorAction::Ignored);
        assert!(editor.suggestions().is_some());

        assert_eq!(editor.viewport_moved(false), EditorAction::Handled);
        assert!(editor.suggestions().is_none());
        assert_eq!(editor.session().unwrap().input, "ab");

        assert_eq!(editor.viewport_moved(false), EditorAction::Ignored);

        // Focusing the field again brings the list back
        editor.refresh_suggestions(&mut ctx);
        assert!(editor.suggestions().is_some());
    }
}

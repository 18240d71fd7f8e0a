/// The carousel component replacing the host's native tab bar

use crate::config::CarouselConfig;
use crate::deferred::DeferredReveal;
use crate::editor::{EditorAction, EditorContext, EditorKey, InlineEditor};
use crate::history::HistoryStore;
use crate::layout::recompute_layout;
use crate::operations::ChannelPath;
use crate::scroll::{Reveal, ScrollController, ScrollDirection};
use crate::storage::{HistoryRepository, LocalStorageRepository};
use crate::suggest::RowRemoval;
use crate::tab_data::{cycle_focus, TabStrip};
use crate::ui::components::{AddButton, ArrowButton, EdgeFade, EditField, TabButton};
use crate::ui::host::{
    self, element_rect, event_within, focus_in_text_entry, query_all, EventListener, HostPage,
    MutationWatch,
};
use crate::ui::suggest::SuggestOverlay;
use std::cell::RefCell;
use std::rc::Rc;
use uuid::Uuid;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, Event, HtmlElement, HtmlInputElement, KeyboardEvent};
use yew::platform::time::sleep;
use yew::prelude::*;

const OVERLAY_SELECTOR: &str = ".mtw-suggest";

/// Clicks inside these keep an edit session open
const EDIT_SELECTORS: [&str; 2] = [OVERLAY_SELECTOR, ".mtw-edit"];

#[derive(Properties, PartialEq)]
pub struct CarouselProps {
    pub host: HostPage,
    /// Element the carousel renders into; also sized by the layout pass
    pub root: HtmlElement,
    pub path: ChannelPath,
    pub config: Rc<CarouselConfig>,
}

/// Everything the carousel mutates, behind one `RefCell`
struct CarouselModel {
    strip: TabStrip,
    scroll: ScrollController,
    editor: InlineEditor,
    history: HistoryStore,
    path: ChannelPath,
    /// Width of the tab being renamed, so the field takes its place exactly
    rename_width: Option<f64>,
}

impl CarouselModel {
    fn new(host: &HostPage, path: ChannelPath, config: &CarouselConfig) -> Self {
        let repo: Rc<dyn HistoryRepository> =
            Rc::new(LocalStorageRepository::new(config.history_key.clone()));
        let mut history = HistoryStore::load(repo, config.history_cap);
        let strip = TabStrip::from_link_targets(&host.link_targets(), &config.link_prefix);
        strip.seed_history(&mut history, path.path());
        log::debug!("Carousel has {} tabs, {} remembered channels", strip.len(), history.len());

        CarouselModel {
            strip,
            scroll: ScrollController::new(config),
            editor: InlineEditor::new(),
            history,
            path,
            rename_width: None,
        }
    }

    fn with_editor<R>(&mut self, f: impl FnOnce(&mut InlineEditor, &mut EditorContext) -> R) -> R {
        let mut ctx = EditorContext {
            history: &mut self.history,
            path: &self.path,
        };
        f(&mut self.editor, &mut ctx)
    }
}

/// Shared handles captured by callbacks, listeners and timers
///
/// No method holds a model borrow across a call that can re-enter a
/// callback (focus, timers).
#[derive(Clone)]
struct Handles {
    model: Rc<RefCell<CarouselModel>>,
    update: UseForceUpdateHandle,
    reveal: Rc<DeferredReveal>,
    host: HostPage,
    root: HtmlElement,
    config: Rc<CarouselConfig>,
    viewport: NodeRef,
    track: NodeRef,
    input: NodeRef,
    /// Index 0 is the "+" control, tab `i` is at `i + 1`
    buttons: Rc<Vec<NodeRef>>,
}

impl Handles {
    fn button(&self, position: usize) -> Option<HtmlElement> {
        self.buttons.get(position).and_then(|r| r.cast::<HtmlElement>())
    }

    /// Re-measure the host and the track after any size-affecting change
    fn resync(&self) {
        if let Some(metrics) = self.host.measure(&self.root) {
            let layout = recompute_layout(&metrics, self.config.min_chat_height);
            self.host.apply_layout(&self.root, &layout);
        }
        self.measure_scroll();
    }

    fn measure_scroll(&self) {
        let (Some(viewport), Some(track)) = (
            self.viewport.cast::<HtmlElement>(),
            self.track.cast::<HtmlElement>(),
        ) else {
            return;
        };
        let changed = self
            .model
            .borrow_mut()
            .scroll
            .set_metrics(f64::from(track.scroll_width()), f64::from(viewport.client_width()));
        if changed {
            self.update.force_update();
        }
    }

    fn edit<R>(&self, f: impl FnOnce(&mut InlineEditor, &mut EditorContext) -> R) -> R {
        self.model.borrow_mut().with_editor(f)
    }

    fn finish(&self, action: EditorAction, event: Option<&Event>) {
        if action != EditorAction::Ignored {
            if let Some(event) = event {
                event.prevent_default();
            }
        }
        match action {
            EditorAction::Ignored => {}
            EditorAction::Handled | EditorAction::Closed => self.update.force_update(),
            EditorAction::Navigate(url) => {
                self.update.force_update();
                host::navigate(&url);
            }
        }
    }

    /// Scroll `element` clear of the arrows, then run `then`
    ///
    /// When the strip has to move, `then` waits for the transition; a newer
    /// request supersedes a pending one.
    fn reveal_then(&self, element: Option<HtmlElement>, then: impl FnOnce(&Handles) + 'static) {
        let span = match (element, self.track.cast::<Element>()) {
            (Some(element), Some(track)) => {
                Some(element_rect(&element).span_from(element_rect(&track).left))
            }
            _ => None,
        };

        let reveal = self.model.borrow_mut().scroll.ensure_visible(span);
        match reveal {
            Reveal::Immediate => {
                self.reveal.cancel();
                then(self);
            }
            Reveal::AfterTransition => {
                self.update.force_update();
                let token = self.reveal.schedule();
                let handles = self.clone();
                let delay = self.config.reveal_delay();
                spawn_local(async move {
                    sleep(delay).await;
                    if handles.reveal.take(token) {
                        then(&handles);
                    }
                });
            }
        }
    }

    fn select_tab(&self, index: usize) {
        let selected = self.model.borrow_mut().strip.select(index, &self.host);
        if selected {
            self.update.force_update();
        }
        if let Some(button) = self.button(index + 1) {
            let _ = button.focus();
        }
    }

    fn open_add(&self) {
        self.edit(|editor, ctx| editor.open_add(ctx));
        self.update.force_update();
    }

    fn open_rename(&self, index: usize, width: Option<f64>) {
        {
            let mut model = self.model.borrow_mut();
            let Some(original) = model.strip.get(index).map(|t| t.name.clone()) else {
                return;
            };
            model.rename_width = width;
            model.with_editor(|editor, ctx| editor.open_rename(index, original, ctx));
        }
        self.update.force_update();
    }

    fn remove_tab(&self, index: usize) {
        let target = self.model.borrow().path.with_removed(index);
        match target {
            Some(url) => host::navigate(&url),
            None => log::debug!("No path segment for tab {}", index),
        }
    }

    fn step(&self, direction: ScrollDirection) {
        self.model.borrow_mut().scroll.step(direction);
        self.update.force_update();
    }

    /// Sync the DOM value with the session, then focus (and select) it
    fn focus_input(&self, select: bool) {
        let Some(input) = self.input.cast::<HtmlInputElement>() else {
            return;
        };
        let value = self.model.borrow().editor.session().map(|s| s.input.clone());
        if let Some(value) = value {
            if input.value() != value {
                input.set_value(&value);
            }
        }
        let _ = input.focus();
        if select {
            input.select();
        }
    }

    /// Document-level keys: Tab cycling and arrow scrolling
    fn strip_key(&self, event: Event) {
        let Ok(event) = event.dyn_into::<KeyboardEvent>() else {
            return;
        };
        // Inputs run their own handlers
        if focus_in_text_entry(self.host.document()) {
            return;
        }

        match event.key().as_str() {
            "Tab" => {
                event.prevent_default();
                self.cycle_focus(event.shift_key());
            }
            "ArrowRight" | "ArrowLeft" => {
                let direction = if event.key() == "ArrowRight" {
                    ScrollDirection::Right
                } else {
                    ScrollDirection::Left
                };
                let possible = self.model.borrow().scroll.can_scroll(direction);
                if possible {
                    event.prevent_default();
                    self.step(direction);
                }
            }
            _ => {}
        }
    }

    fn cycle_focus(&self, backwards: bool) {
        let Some(track) = self.track.cast::<Element>() else {
            return;
        };
        let buttons = query_all(&track, "button");
        let active = self.host.document().active_element();
        let current = active.and_then(|a| buttons.iter().position(|b| *b == a));

        let Some(next) = cycle_focus(current, buttons.len(), backwards) else {
            return;
        };
        let Some(button) = buttons
            .into_iter()
            .nth(next)
            .and_then(|b| b.dyn_into::<HtmlElement>().ok())
        else {
            return;
        };
        let target = button.clone();
        self.reveal_then(Some(button), move |_| {
            let _ = target.focus();
        });
    }

    /// Listeners that live exactly as long as one edit session
    ///
    /// The caller drops them when the session closes.
    fn session_listeners(&self) -> Vec<EventListener> {
        let mut listeners = Vec::new();

        let handles = self.clone();
        listeners.push(EventListener::new(
            self.host.document(),
            "mousedown",
            true,
            move |e: Event| {
                let inside = event_within(&e, &EDIT_SELECTORS);
                let action = handles.model.borrow_mut().editor.pointer_down(inside);
                handles.finish(action, None);
            },
        ));

        // The list is fixed-positioned; moving the page detaches it from the input
        if let Some(window) = web_sys::window() {
            for event in ["scroll", "resize"] {
                let handles = self.clone();
                listeners.push(EventListener::new(&window, event, true, move |e: Event| {
                    let inside = event_within(&e, &[OVERLAY_SELECTOR]);
                    let action = handles.model.borrow_mut().editor.viewport_moved(inside);
                    handles.finish(action, None);
                }));
            }
        }

        listeners
    }
}

#[function_component(Carousel)]
pub fn carousel(props: &CarouselProps) -> Html {
    let model = {
        let host = props.host.clone();
        let path = props.path.clone();
        let config = props.config.clone();
        use_mut_ref(move || CarouselModel::new(&host, path, &config))
    };
    let update = use_force_update();
    let reveal = use_memo((), |_| DeferredReveal::new());
    let viewport = use_node_ref();
    let track = use_node_ref();
    let input = use_node_ref();
    let buttons = {
        let count = model.borrow().strip.len() + 1;
        use_memo((), move |_| (0..count).map(|_| NodeRef::default()).collect::<Vec<_>>())
    };

    let handles = Handles {
        model: model.clone(),
        update,
        reveal,
        host: props.host.clone(),
        root: props.root.clone(),
        config: props.config.clone(),
        viewport: viewport.clone(),
        track: track.clone(),
        input: input.clone(),
        buttons: buttons.clone(),
    };

    // Mount: host observers, document keys, initial layout
    {
        let handles = handles.clone();
        use_effect_with((), move |_| {
            let mut listeners = Vec::new();
            let mut watches = Vec::new();

            if let Some(window) = web_sys::window() {
                let resync = handles.clone();
                listeners.push(EventListener::new(&window, "resize", false, move |_| resync.resync()));
            }
            let keys = handles.clone();
            listeners.push(EventListener::new(
                handles.host.document(),
                "keydown",
                false,
                move |e| keys.strip_key(e),
            ));

            let resync = handles.clone();
            match MutationWatch::new(move || resync.resync()) {
                Ok(watch) => {
                    if let Some(chat) = handles.host.chat() {
                        watch.watch_style(chat);
                    }
                    watch.watch_all(&handles.root);
                    watches.push(watch);
                }
                Err(e) => log::warn!("{}", e),
            }

            handles.model.borrow_mut().scroll.scroll_to(0.0);
            handles.resync();

            move || {
                drop(watches);
                drop(listeners);
            }
        });
    }

    // Track and host sizes follow every render
    {
        let handles = handles.clone();
        use_effect(move || {
            handles.measure_scroll();
            || ()
        });
    }

    let (session_id, renaming, adding, input_value, rename_width) = {
        let model = model.borrow();
        let session = model.editor.session();
        (
            session.map(|s| s.id),
            model.editor.renaming_index(),
            model.editor.is_adding(),
            session.map(|s| s.input.clone()).unwrap_or_default(),
            model.rename_width,
        )
    };

    // Session: focus the field, watch for outside clicks and page movement
    {
        let handles = handles.clone();
        use_effect_with(session_id, move |session_id: &Option<Uuid>| {
            let listeners = match session_id {
                Some(_) => {
                    let renaming = handles.model.borrow().editor.renaming_index().is_some();
                    handles.focus_input(renaming);
                    handles.session_listeners()
                }
                None => Vec::new(),
            };
            move || drop(listeners)
        });
    }

    // Edit field handlers
    let on_input = {
        let handles = handles.clone();
        Callback::from(move |e: InputEvent| {
            let value = e.target_unchecked_into::<HtmlInputElement>().value();
            handles.edit(|editor, ctx| editor.set_input(&value, ctx));
            handles.update.force_update();
        })
    };
    let on_edit_key = {
        let handles = handles.clone();
        Callback::from(move |e: KeyboardEvent| {
            let key = EditorKey::from_key(&e.key());
            let action = handles.edit(|editor, ctx| editor.key(key, ctx));
            handles.finish(action, Some(&e));
        })
    };
    let on_edit_focus = {
        let handles = handles.clone();
        Callback::from(move |_: FocusEvent| {
            handles.edit(|editor, ctx| editor.refresh_suggestions(ctx));
            handles.update.force_update();
        })
    };
    let on_edit_blur = {
        let handles = handles.clone();
        Callback::from(move |_: FocusEvent| {
            let action = handles.model.borrow_mut().editor.cancel();
            handles.finish(action, None);
        })
    };

    let edit_field = |width: Option<f64>, placeholder: Option<AttrValue>, onblur: Option<Callback<FocusEvent>>| {
        html! {
            <EditField
                node_ref={input.clone()}
                value={AttrValue::from(input_value.clone())}
                {width}
                {placeholder}
                oninput={on_input.clone()}
                onkeydown={on_edit_key.clone()}
                onfocus={on_edit_focus.clone()}
                {onblur}
            />
        }
    };

    let add_control = if adding {
        edit_field(None, Some(AttrValue::from("channel")), Some(on_edit_blur.clone()))
    } else {
        let handles = handles.clone();
        let onclick = Callback::from(move |_: MouseEvent| {
            let add = handles.button(0);
            handles.reveal_then(add, |h| h.open_add());
        });
        let node_ref = buttons.first().cloned().unwrap_or_default();
        html! { <AddButton {node_ref} {onclick} /> }
    };

    let tabs = model.borrow().strip.tabs().to_vec();
    let tab_controls = tabs.into_iter().map(|tab| {
        let index = tab.index;
        if renaming == Some(index) {
            return edit_field(rename_width, None, Some(on_edit_blur.clone()));
        }

        let onclick = {
            let handles = handles.clone();
            Callback::from(move |_: MouseEvent| {
                let button = handles.button(index + 1);
                handles.reveal_then(button, move |h| h.select_tab(index));
            })
        };
        let ondblclick = {
            let handles = handles.clone();
            Callback::from(move |e: MouseEvent| {
                e.prevent_default();
                e.stop_propagation();
                let button = handles.button(index + 1);
                let width = button.as_ref().map(|b| f64::from(b.offset_width()));
                handles.reveal_then(button, move |h| h.open_rename(index, width));
            })
        };
        let onkeydown = {
            let handles = handles.clone();
            Callback::from(move |e: KeyboardEvent| {
                if matches!(e.key().as_str(), "Delete" | "Backspace") {
                    e.prevent_default();
                    handles.remove_tab(index);
                }
            })
        };
        let node_ref = buttons.get(index + 1).cloned().unwrap_or_default();

        html! {
            <TabButton
                label={AttrValue::from(tab.name.to_string())}
                active={tab.active}
                {node_ref}
                {onclick}
                {ondblclick}
                {onkeydown}
            />
        }
    });

    let (offset, affordances) = {
        let model = model.borrow();
        (model.scroll.offset(), model.scroll.affordances())
    };
    let arrow_width = props.config.arrow_width;
    let on_arrow = |direction: ScrollDirection| {
        let handles = handles.clone();
        Callback::from(move |_: MouseEvent| handles.step(direction))
    };

    // Suggestion overlay
    let overlay = {
        let model = model.borrow();
        match model.editor.suggestions() {
            Some(list) => {
                let on_hover = {
                    let handles = handles.clone();
                    Callback::from(move |index: usize| {
                        handles.model.borrow_mut().editor.hover_suggestion(index);
                        handles.update.force_update();
                    })
                };
                let on_pick = {
                    let handles = handles.clone();
                    Callback::from(move |index: usize| {
                        let action = handles.model.borrow_mut().editor.pick_suggestion(index);
                        handles.finish(action, None);
                        handles.focus_input(true);
                    })
                };
                let on_delete = {
                    let handles = handles.clone();
                    Callback::from(move |index: usize| {
                        let removal = handles.edit(|editor, ctx| editor.delete_suggestion(index, ctx));
                        if removal != RowRemoval::Missing {
                            handles.update.force_update();
                        }
                        handles.focus_input(false);
                    })
                };
                html! {
                    <SuggestOverlay
                        rows={list.rows().to_vec()}
                        active={list.active()}
                        anchor={input.clone()}
                        gap={props.config.overlay_gap}
                        min_width={props.config.overlay_min_width}
                        {on_hover}
                        {on_pick}
                        {on_delete}
                    />
                }
            }
            None => html! {},
        }
    };

    let track_style = format!(
        "display: flex; gap: 6px; align-items: center; padding: 0 6px; width: max-content; will-change: transform; transform: translateX(-{}px); transition: transform {}ms cubic-bezier(0.22, 1, 0.36, 1);",
        offset, props.config.transition_ms
    );

    html! {
        <div
            ref={viewport}
            style="overflow: hidden; flex: 1; position: relative; display: flex; align-items: stretch; min-width: 0;"
        >
            <div ref={track} style={track_style}>
                {add_control}
                {for tab_controls}
            </div>
            <EdgeFade side={ScrollDirection::Left} visible={affordances.left} width={arrow_width} />
            <EdgeFade side={ScrollDirection::Right} visible={affordances.right} width={arrow_width} />
            <ArrowButton
                side={ScrollDirection::Left}
                visible={affordances.left}
                width={arrow_width}
                onclick={on_arrow(ScrollDirection::Left)}
            />
            <ArrowButton
                side={ScrollDirection::Right}
                visible={affordances.right}
                width={arrow_width}
                onclick={on_arrow(ScrollDirection::Right)}
            />
            {overlay}
        </div>
    }
}


/// Bridge to the host page DOM: discovery, installation, measurement

use crate::config::CarouselConfig;
use crate::geometry::{Rect, Size};
use crate::layout::{ContainerMetrics, LayoutResult};
use crate::tab_data::NativeTabController;
use url::Url;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, EventTarget, HtmlElement, MutationObserver, MutationObserverInit, Node};

pub const ROOT_ID: &str = "custom-tab-selector";
const FILL_CSS_ID: &str = "cts-fill-chat-css";

/// CSS keeping the chat panels and their frames at the container's height
const FILL_CSS: &str = "
#chatbox, #chatbox.ui-widget-content { padding: 0 !important; box-sizing: border-box !important; }
#chatbox .ui-tabs-panel, #chatbox .stream_chat { height: 100% !important; padding: 0 !important; margin: 0 !important; box-sizing: border-box !important; }
#chatbox .ui-tabs-panel > iframe, #chatbox iframe { height: 100% !important; max-height: 100% !important; min-height: 0 !important; display: block !important; }
";

/// The host page elements the carousel reads and replaces
#[derive(Clone, PartialEq)]
pub struct HostPage {
    document: Document,
    tablist: HtmlElement,
    bottom_bar: Element,
    chat: Option<HtmlElement>,
    native_links: Vec<HtmlElement>,
}

impl HostPage {
    /// Locate the native tab list and bottom bar; `None` if either is missing
    pub fn find(config: &CarouselConfig) -> Option<HostPage> {
        let document = web_sys::window()?.document()?;
        let tablist = document
            .get_element_by_id(&config.tablist_id)?
            .dyn_into::<HtmlElement>()
            .ok()?;
        let bottom_bar = document.get_element_by_id(&config.bottom_bar_id)?;
        let chat = document
            .get_element_by_id(&config.chat_container_id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        let native_links = query_all(&tablist, "li a")
            .into_iter()
            .filter_map(|el| el.dyn_into::<HtmlElement>().ok())
            .collect();

        Some(HostPage {
            document,
            tablist,
            bottom_bar,
            chat,
            native_links,
        })
    }

    pub fn carousel_installed(&self) -> bool {
        self.document.get_element_by_id(ROOT_ID).is_some()
    }

    /// Link targets of the native tabs, in page order
    pub fn link_targets(&self) -> Vec<String> {
        self.native_links
            .iter()
            .map(|link| link.get_attribute("href").unwrap_or_default())
            .collect()
    }

    /// Create the carousel root right after the chat container
    pub fn install(&self) -> Result<HtmlElement, String> {
        self.inject_fill_css()?;

        let root = self
            .document
            .create_element("div")
            .map_err(|e| format!("Failed to create carousel root: {:?}", e))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| "Carousel root is not an HTML element".to_string())?;
        root.set_id(ROOT_ID);
        set_styles(
            &root,
            &[
                ("background", "#18181b"),
                ("border", "1px solid #464646ff"),
                ("border-radius", "4px"),
                ("padding", "4px 0"),
                ("display", "flex"),
                ("gap", "0px"),
                ("box-sizing", "border-box"),
                ("align-items", "stretch"),
                ("position", "relative"),
                ("float", "right"),
                ("clear", "right"),
                ("margin-right", "0"),
            ],
        );

        let anchor: &Node = match &self.chat {
            Some(chat) => chat,
            None => &self.tablist,
        };
        let parent = anchor
            .parent_node()
            .ok_or_else(|| "Chat container has no parent".to_string())?;
        parent
            .insert_before(&root, anchor.next_sibling().as_ref())
            .map_err(|e| format!("Failed to insert carousel: {:?}", e))?;

        Ok(root)
    }

    /// Hide the native tab bar and drop the bottom bar it came with
    pub fn retire_native_tabs(&self) {
        set_style(&self.tablist, "display", "none");
        self.bottom_bar.remove();
    }

    pub fn chat(&self) -> Option<&HtmlElement> {
        self.chat.as_ref()
    }

    pub fn measure(&self, root: &HtmlElement) -> Option<ContainerMetrics> {
        let chat = self.chat.as_ref()?;
        Some(ContainerMetrics {
            chat_width: f64::from(chat.offset_width()),
            chat_top: element_rect(chat).top,
            viewport_height: viewport_size(&self.document).height,
            strip_height: f64::from(root.offset_height()),
        })
    }

    /// Write the computed sizes, touching only values that changed
    pub fn apply_layout(&self, root: &HtmlElement, layout: &LayoutResult) {
        if let Some(width) = layout.strip_width {
            set_style(root, "width", &format!("{}px", width));
        }

        let (Some(chat), Some(height)) = (self.chat.as_ref(), layout.chat_height) else {
            return;
        };
        let height = format!("{}px", height);
        set_styles(
            chat,
            &[
                ("height", height.as_str()),
                ("padding", "0"),
                ("box-sizing", "border-box"),
            ],
        );
        for panel in query_all(chat, ".stream_chat, .ui-tabs-panel") {
            if let Ok(panel) = panel.dyn_into::<HtmlElement>() {
                set_styles(
                    &panel,
                    &[("height", "100%"), ("box-sizing", "border-box"), ("margin", "0"), ("padding", "0")],
                );
            }
        }
        for frame in query_all(chat, "iframe") {
            if let Ok(frame) = frame.dyn_into::<HtmlElement>() {
                set_styles(
                    &frame,
                    &[("height", "100%"), ("max-height", "100%"), ("min-height", "0"), ("display", "block")],
                );
            }
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    fn inject_fill_css(&self) -> Result<(), String> {
        if self.document.get_element_by_id(FILL_CSS_ID).is_some() {
            return Ok(());
        }
        let head = self
            .document
            .head()
            .ok_or_else(|| "Document has no head".to_string())?;
        let style = self
            .document
            .create_element("style")
            .map_err(|e| format!("Failed to create style: {:?}", e))?;
        style.set_id(FILL_CSS_ID);
        style.set_text_content(Some(FILL_CSS));
        head.append_child(&style)
            .map_err(|e| format!("Failed to inject style: {:?}", e))?;
        Ok(())
    }
}

impl NativeTabController for HostPage {
    fn activate(&self, native_index: usize) {
        match self.native_links.get(native_index) {
            Some(link) => link.click(),
            None => log::debug!("No native tab at {}", native_index),
        }
    }
}

/// The page's current href
pub fn current_href() -> Result<String, String> {
    let window = web_sys::window().ok_or_else(|| "window is unavailable".to_string())?;
    window
        .location()
        .href()
        .map_err(|e| format!("Failed to read location: {:?}", e))
}

/// Full navigation; the page re-renders the carousel on load
pub fn navigate(url: &Url) {
    let Some(window) = web_sys::window() else {
        return;
    };
    if let Err(e) = window.location().assign(url.as_str()) {
        log::warn!("Navigation to {} failed: {:?}", url, e);
    }
}

pub fn element_rect(element: &Element) -> Rect {
    let rect = element.get_bounding_client_rect();
    Rect::new(rect.x(), rect.y(), rect.width(), rect.height())
}

pub fn viewport_size(document: &Document) -> Size {
    let fallback = document.document_element();
    let dimension = |inner: Option<f64>, client: fn(&Element) -> i32| {
        inner
            .filter(|v| *v > 0.0)
            .or_else(|| fallback.as_ref().map(|el| f64::from(client(el))))
            .unwrap_or(0.0)
    };

    let window = web_sys::window();
    let inner_width = window.as_ref().and_then(|w| w.inner_width().ok()).and_then(|v| v.as_f64());
    let inner_height = window.as_ref().and_then(|w| w.inner_height().ok()).and_then(|v| v.as_f64());

    Size::new(
        dimension(inner_width, Element::client_width),
        dimension(inner_height, Element::client_height),
    )
}

/// True while the user is typing somewhere
pub fn focus_in_text_entry(document: &Document) -> bool {
    let Some(active) = document.active_element() else {
        return false;
    };
    matches!(active.tag_name().as_str(), "INPUT" | "TEXTAREA")
        || active.get_attribute("contenteditable").as_deref() == Some("true")
}

/// True if `target` sits inside an element matching any of `selectors`
pub fn event_within(event: &Event, selectors: &[&str]) -> bool {
    let Some(element) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
        return false;
    };
    selectors
        .iter()
        .any(|selector| matches!(element.closest(selector), Ok(Some(_))))
}

pub fn query_all(root: &Element, selector: &str) -> Vec<Element> {
    let Ok(nodes) = root.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn set_style(element: &HtmlElement, property: &str, value: &str) {
    let style = element.style();
    if style.get_property_value(property).ok().as_deref() == Some(value) {
        return;
    }
    let _ = style.set_property(property, value);
}

pub fn set_styles(element: &HtmlElement, styles: &[(&str, &str)]) {
    for (property, value) in styles {
        set_style(element, property, value);
    }
}

/// A DOM listener removed again when dropped
pub struct EventListener {
    target: EventTarget,
    event: &'static str,
    capture: bool,
    callback: Closure<dyn FnMut(Event)>,
}

impl EventListener {
    pub fn new(
        target: &EventTarget,
        event: &'static str,
        capture: bool,
        handler: impl FnMut(Event) + 'static,
    ) -> EventListener {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        if let Err(e) = target.add_event_listener_with_callback_and_bool(
            event,
            callback.as_ref().unchecked_ref(),
            capture,
        ) {
            log::warn!("Failed to listen for {}: {:?}", event, e);
        }
        EventListener {
            target: target.clone(),
            event,
            capture,
            callback,
        }
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        let _ = self.target.remove_event_listener_with_callback_and_bool(
            self.event,
            self.callback.as_ref().unchecked_ref(),
            self.capture,
        );
    }
}

/// A mutation observer disconnected when dropped
pub struct MutationWatch {
    observer: MutationObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, MutationObserver)>,
}

impl MutationWatch {
    pub fn new(handler: impl FnMut() + 'static) -> Result<MutationWatch, String> {
        let mut handler = handler;
        let callback = Closure::wrap(Box::new(move |_records: js_sys::Array, _observer: MutationObserver| {
            handler();
        }) as Box<dyn FnMut(js_sys::Array, MutationObserver)>);
        let observer = MutationObserver::new(callback.as_ref().unchecked_ref())
            .map_err(|e| format!("Failed to create mutation observer: {:?}", e))?;
        Ok(MutationWatch {
            observer,
            _callback: callback,
        })
    }

    /// Watch style changes anywhere under `node`, plus child list changes
    pub fn watch_style(&self, node: &Node) {
        let options = MutationObserverInit::new();
        options.set_attributes(true);
        options.set_attribute_filter(&js_sys::Array::of1(&JsValue::from_str("style")));
        options.set_subtree(true);
        options.set_child_list(true);
        self.observe(node, &options);
    }

    /// Watch every attribute and child list change under `node`
    pub fn watch_all(&self, node: &Node) {
        let options = MutationObserverInit::new();
        options.set_attributes(true);
        options.set_subtree(true);
        options.set_child_list(true);
        self.observe(node, &options);
    }

    fn observe(&self, node: &Node, options: &MutationObserverInit) {
        if let Err(e) = self.observer.observe_with_options(node, options) {
            log::warn!("Failed to observe layout changes: {:?}", e);
        }
    }
}

impl Drop for MutationWatch {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

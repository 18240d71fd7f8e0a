/// Floating suggestion list attached to the active edit field

use crate::channel::ChannelName;
use crate::geometry::Size;
use crate::suggest::{overlay_width, place_overlay};
use crate::ui::host::{element_rect, set_style, viewport_size};
use web_sys::HtmlElement;
use yew::prelude::*;

pub const OVERLAY_CLASS: &str = "mtw-suggest";
const CSS_ID: &str = "mtw-suggest-css";

const SUGGEST_CSS: &str = "
.mtw-suggest { position: fixed; background: #1f1f23; color: #fff; border: 1px solid #3a3a3a; border-radius: 6px; box-shadow: 0 10px 30px rgba(0,0,0,0.5); z-index: 2147483000; padding: 4px 0; min-width: 140px; max-height: 220px; overflow-y: auto; }
.mtw-suggest__item { display: flex; align-items: center; justify-content: space-between; gap: 8px; padding: 6px 8px; font-size: 12px; cursor: pointer; }
.mtw-suggest__item--active, .mtw-suggest__item:hover { background: rgba(255,255,255,0.08); }
.mtw-suggest__text { overflow: hidden; text-overflow: ellipsis; white-space: nowrap; }
.mtw-suggest__remove { opacity: 0; color: #ccc; border: none; background: transparent; cursor: pointer; font-size: 12px; }
.mtw-suggest__item:hover .mtw-suggest__remove { opacity: 1; }
";

#[derive(Properties, PartialEq)]
pub struct SuggestOverlayProps {
    pub rows: Vec<ChannelName>,
    pub active: Option<usize>,
    /// The input the list hugs
    pub anchor: NodeRef,
    pub gap: f64,
    pub min_width: f64,
    pub on_hover: Callback<usize>,
    pub on_pick: Callback<usize>,
    pub on_delete: Callback<usize>,
}

#[function_component(SuggestOverlay)]
pub fn suggest_overlay(props: &SuggestOverlayProps) -> Html {
    let list_ref = use_node_ref();

    use_effect_with((), |_| {
        ensure_css();
        || ()
    });

    // Position after every render; row deletes change the height
    {
        let list_ref = list_ref.clone();
        let anchor = props.anchor.clone();
        let gap = props.gap;
        let min_width = props.min_width;
        use_effect(move || {
            position(&list_ref, &anchor, gap, min_width);
            || ()
        });
    }

    let Some(body) = document_body() else {
        return html! {};
    };

    // Keep focus in the input and keep outside-click handlers quiet
    let swallow_mousedown = Callback::from(|e: MouseEvent| {
        e.prevent_default();
        e.stop_propagation();
    });

    let rows = props.rows.iter().enumerate().map(|(index, name)| {
        let class = if props.active == Some(index) {
            "mtw-suggest__item mtw-suggest__item--active"
        } else {
            "mtw-suggest__item"
        };
        let onclick = props.on_pick.reform(move |_: MouseEvent| index);
        let onmouseenter = props.on_hover.reform(move |_: MouseEvent| index);
        let on_delete = props.on_delete.clone();
        let onremove = Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            e.stop_propagation();
            on_delete.emit(index);
        });

        html! {
            <div key={name.to_string()} class={class} {onclick} {onmouseenter}>
                <div class="mtw-suggest__text">{name.to_string()}</div>
                <button class="mtw-suggest__remove" title="Remove" onclick={onremove}>{"×"}</button>
            </div>
        }
    });

    create_portal(
        html! {
            <div
                ref={list_ref}
                class={OVERLAY_CLASS}
                style="visibility: hidden; left: 0px; top: 0px;"
                onmousedown={swallow_mousedown}
            >
                {for rows}
            </div>
        },
        body.into(),
    )
}

fn document_body() -> Option<HtmlElement> {
    web_sys::window()?.document()?.body()
}

fn ensure_css() {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    if document.get_element_by_id(CSS_ID).is_some() {
        return;
    }
    let (Some(head), Ok(style)) = (document.head(), document.create_element("style")) else {
        return;
    };
    style.set_id(CSS_ID);
    style.set_text_content(Some(SUGGEST_CSS));
    let _ = head.append_child(&style);
}

fn position(list_ref: &NodeRef, anchor: &NodeRef, gap: f64, min_width: f64) {
    let (Some(list), Some(anchor)) = (list_ref.cast::<HtmlElement>(), anchor.cast::<HtmlElement>()) else {
        return;
    };
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };

    let anchor_rect = element_rect(&anchor);
    let width = overlay_width(&anchor_rect, min_width);
    // Width first so the measured height reflects wrapping
    set_style(&list, "width", &format!("{}px", width));

    let size = Size::new(f64::from(list.offset_width()), f64::from(list.offset_height()));
    let viewport = viewport_size(&document);
    let point = place_overlay(&anchor_rect, size, viewport, gap);

    set_style(&list, "top", &format!("{}px", point.y));
    set_style(&list, "left", &format!("{}px", point.x));
    set_style(&list, "visibility", "visible");
}

/// Reusable carousel controls

use crate::scroll::ScrollDirection;
use yew::prelude::*;

const SELECTED: &str = "#772ce8";
const IDLE: &str = "#404040";
const HOVER: &str = "#505050";

fn side_name(side: ScrollDirection) -> &'static str {
    match side {
        ScrollDirection::Left => "left",
        ScrollDirection::Right => "right",
    }
}

#[derive(Properties, PartialEq)]
pub struct ArrowButtonProps {
    pub side: ScrollDirection,
    pub visible: bool,
    pub width: f64,
    pub onclick: Callback<MouseEvent>,
}

#[function_component(ArrowButton)]
pub fn arrow_button(props: &ArrowButtonProps) -> Html {
    let side = side_name(props.side);
    let (label, path) = match props.side {
        ScrollDirection::Left => ("Scroll left", "M15 18l-6-6 6-6"),
        ScrollDirection::Right => ("Scroll right", "M9 6l6 6-6 6"),
    };
    let style = format!(
        "position: absolute; top: 0; bottom: 0; {}: 0; width: {w}px; min-width: {w}px; border: 0; background: transparent; border-radius: 4px; cursor: pointer; display: {}; z-index: 3; align-items: center; justify-content: center; padding: 0;",
        side,
        if props.visible { "flex" } else { "none" },
        w = props.width,
    );

    html! {
        <button aria-label={label} style={style} onclick={props.onclick.clone()} tabindex="-1">
            <svg width="100%" height="100%" viewBox="0 0 24 24" fill="none">
                <path d={path} stroke="#e6e6e6" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" />
            </svg>
        </button>
    }
}

#[derive(Properties, PartialEq)]
pub struct EdgeFadeProps {
    pub side: ScrollDirection,
    pub visible: bool,
    pub width: f64,
}

#[function_component(EdgeFade)]
pub fn edge_fade(props: &EdgeFadeProps) -> Html {
    let side = side_name(props.side);
    let towards = match props.side {
        ScrollDirection::Left => "right",
        ScrollDirection::Right => "left",
    };
    let style = format!(
        "position: absolute; top: 0; bottom: 0; {}: 0; width: {}px; pointer-events: none; z-index: 2; display: {}; background: linear-gradient(to {}, #18181b 50%, rgba(24,24,27,0));",
        side,
        props.width,
        if props.visible { "block" } else { "none" },
        towards,
    );

    html! { <div style={style}></div> }
}

#[derive(Properties, PartialEq)]
pub struct TabButtonProps {
    pub label: AttrValue,
    pub active: bool,
    pub node_ref: NodeRef,
    pub onclick: Callback<MouseEvent>,
    pub ondblclick: Callback<MouseEvent>,
    pub onkeydown: Callback<KeyboardEvent>,
}

#[function_component(TabButton)]
pub fn tab_button(props: &TabButtonProps) -> Html {
    let hovered = use_state(|| false);

    let background = if props.active {
        SELECTED
    } else if *hovered {
        HOVER
    } else {
        IDLE
    };
    let style = format!(
        "flex: 0 0 auto; padding: 6px 10px; border: none; border-radius: 4px; background: {}; color: white; font-size: 12px; font-weight: 600; font-family: Inter, Roobert, \"Helvetica Neue\", Helvetica, Arial, sans-serif; line-height: 1.5; cursor: pointer; transition: background-color 0.2s ease; white-space: nowrap; text-overflow: ellipsis; overflow: hidden;",
        background
    );

    let onmouseenter = {
        let hovered = hovered.clone();
        Callback::from(move |_: MouseEvent| hovered.set(true))
    };
    let onmouseleave = {
        let hovered = hovered.clone();
        Callback::from(move |_: MouseEvent| hovered.set(false))
    };

    html! {
        <button
            ref={props.node_ref.clone()}
            style={style}
            data-active={props.active.to_string()}
            onclick={props.onclick.clone()}
            ondblclick={props.ondblclick.clone()}
            onkeydown={props.onkeydown.clone()}
            {onmouseenter}
            {onmouseleave}
        >
            {props.label.clone()}
        </button>
    }
}

#[derive(Properties, PartialEq)]
pub struct AddButtonProps {
    pub node_ref: NodeRef,
    pub onclick: Callback<MouseEvent>,
}

#[function_component(AddButton)]
pub fn add_button(props: &AddButtonProps) -> Html {
    let hovered = use_state(|| false);
    let style = format!(
        "flex: 0 0 auto; width: 24px; height: 24px; padding: 0; border: none; border-radius: 4px; background: {}; color: #ffffff; font-size: 16px; font-weight: 700; line-height: 24px; text-align: center; cursor: pointer; user-select: none;",
        if *hovered { HOVER } else { IDLE }
    );

    let onmouseenter = {
        let hovered = hovered.clone();
        Callback::from(move |_: MouseEvent| hovered.set(true))
    };
    let onmouseleave = {
        let hovered = hovered.clone();
        Callback::from(move |_: MouseEvent| hovered.set(false))
    };

    html! {
        <button
            ref={props.node_ref.clone()}
            aria-label="Add channel"
            title="Add channel"
            style={style}
            onclick={props.onclick.clone()}
            {onmouseenter}
            {onmouseleave}
        >
            {"+"}
        </button>
    }
}

#[derive(Properties, PartialEq)]
pub struct EditFieldProps {
    pub node_ref: NodeRef,
    pub value: AttrValue,
    /// Width of the control being replaced, if known
    #[prop_or_default]
    pub width: Option<f64>,
    #[prop_or_default]
    pub placeholder: Option<AttrValue>,
    pub oninput: Callback<InputEvent>,
    pub onkeydown: Callback<KeyboardEvent>,
    pub onfocus: Callback<FocusEvent>,
    #[prop_or_default]
    pub onblur: Option<Callback<FocusEvent>>,
}

/// Text field standing in for the "+" control or a tab while editing
#[function_component(EditField)]
pub fn edit_field(props: &EditFieldProps) -> Html {
    let wrap_width = props
        .width
        .map(|w| format!(" width: {}px;", w))
        .unwrap_or_default();
    let input_width = props.width.map(|w| w - 12.0).unwrap_or(80.0);

    html! {
        <div
            class="mtw-edit"
            style={format!("flex: 0 0 auto; display: flex; align-items: center; height: 24px; background: #2a2a2a; border-radius: 4px; padding: 0 6px; box-sizing: border-box;{}", wrap_width)}
        >
            <input
                ref={props.node_ref.clone()}
                type="text"
                value={props.value.clone()}
                placeholder={props.placeholder.clone()}
                autocapitalize="none"
                autocomplete="off"
                spellcheck="false"
                style={format!("height: 20px; border: 0; outline: none; background: transparent; color: #fff; font-size: 12px; width: {}px;", input_width)}
                oninput={props.oninput.clone()}
                onkeydown={props.onkeydown.clone()}
                onfocus={props.onfocus.clone()}
                onblur={props.onblur.clone()}
            />
        </div>
    }
}

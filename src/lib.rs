/// Multitwitch channel carousel
/// Built with Rust + WASM + Yew

mod channel;
mod config;
mod deferred;
mod editor;
mod geometry;
mod history;
mod layout;
mod operations;
mod scroll;
mod storage;
mod suggest;
mod tab_data;
pub mod ui;

use config::CarouselConfig;
use history::HistoryStore;
use operations::ChannelPath;
use std::rc::Rc;
use storage::{HistoryRepository, LocalStorageRepository};
use ui::carousel::{Carousel, CarouselProps};
use ui::host::{self, HostPage};
use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Re-export the channel sanitizer for JavaScript access
#[wasm_bindgen]
pub fn sanitize_channel_name(raw: &str) -> String {
    channel::sanitize(raw)
}

/// The remembered channels, most recent first
#[wasm_bindgen]
pub fn channel_history() -> Result<JsValue, JsValue> {
    let config = CarouselConfig::default();
    let repo: Rc<dyn HistoryRepository> = Rc::new(LocalStorageRepository::new(config.history_key));
    let history = HistoryStore::load(repo, config.history_cap);
    serde_wasm_bindgen::to_value(history.entries())
        .map_err(|e| JsValue::from_str(&format!("Failed to export history: {}", e)))
}

/// Replace the native tab bar with the carousel, using the default settings
///
/// Returns false when the page has no tab bar or the carousel is already there.
#[wasm_bindgen]
pub fn start_carousel() -> bool {
    mount(CarouselConfig::default())
}

/// Like `start_carousel`, with settings overridden by a plain JS object
#[wasm_bindgen]
pub fn start_carousel_with_config(config: JsValue) -> Result<bool, JsValue> {
    let config: CarouselConfig = if config.is_undefined() || config.is_null() {
        CarouselConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&format!("Invalid carousel config: {}", e)))?
    };
    Ok(mount(config))
}

fn mount(config: CarouselConfig) -> bool {
    let Some(host) = HostPage::find(&config) else {
        log::info!("No native tab bar found, skipping");
        return false;
    };
    if host.carousel_installed() {
        log::info!("Custom tab selector already present");
        return false;
    }

    let path = match host::current_href().and_then(|href| ChannelPath::parse(&href)) {
        Ok(path) => path,
        Err(e) => {
            log::warn!("{}", e);
            return false;
        }
    };
    let root = match host.install() {
        Ok(root) => root,
        Err(e) => {
            log::warn!("Failed to install carousel: {}", e);
            return false;
        }
    };

    let props = CarouselProps {
        host: host.clone(),
        root: root.clone(),
        path,
        config: Rc::new(config),
    };
    yew::Renderer::<Carousel>::with_root_and_props(root.into(), props).render();

    host.retire_native_tabs();
    log::info!("Custom tab selector created");
    true
}

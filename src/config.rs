/// Tunables for the carousel, overridable from JavaScript
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    /// localStorage key holding the JSON history list
    pub history_key: String,
    pub history_cap: usize,

    /// Host page element ids
    pub tablist_id: String,
    pub bottom_bar_id: String,
    pub chat_container_id: String,
    /// Prefix stripped from native tab hrefs (`#chat-foo` → `foo`)
    pub link_prefix: String,

    pub arrow_width: f64,
    pub edge_margin: f64,
    pub reveal_padding: f64,
    pub scroll_step_ratio: f64,
    pub transition_ms: u32,
    pub reveal_delay_ms: u32,

    pub min_chat_height: f64,
    pub overlay_gap: f64,
    pub overlay_min_width: f64,
}

impl CarouselConfig {
    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.reveal_delay_ms))
    }
}

impl Default for CarouselConfig {
    fn default() -> Self {
        CarouselConfig {
            history_key: "mtw_channel_history".to_string(),
            history_cap: 200,
            tablist_id: "tablist".to_string(),
            bottom_bar_id: "bottom_right_bar".to_string(),
            chat_container_id: "chatbox".to_string(),
            link_prefix: "#chat-".to_string(),
            arrow_width: 20.0,
            edge_margin: 4.0,
            reveal_padding: 8.0,
            scroll_step_ratio: 0.8,
            transition_ms: 250,
            // slightly longer than the transition
            reveal_delay_ms: 260,
            min_chat_height: 200.0,
            overlay_gap: 4.0,
            overlay_min_width: 140.0,
        }
    }
}

/// Sizing of the carousel against the host's chat container

/// Measurements taken from the host page
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContainerMetrics {
    /// Chat container width including borders
    pub chat_width: f64,
    /// Chat container top, relative to the viewport
    pub chat_top: f64,
    pub viewport_height: f64,
    /// Current height of the carousel itself
    pub strip_height: f64,
}

/// Sizes to apply; `None` leaves the current value alone
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutResult {
    pub strip_width: Option<f64>,
    pub chat_height: Option<f64>,
}

/// Carousel as wide as the chat; chat fills the viewport below its top
/// edge minus the carousel, never shorter than `min_chat_height`
pub fn recompute_layout(metrics: &ContainerMetrics, min_chat_height: f64) -> LayoutResult {
    let strip_width = (metrics.chat_width.is_finite() && metrics.chat_width > 0.0)
        .then_some(metrics.chat_width);

    let available = (metrics.viewport_height - metrics.chat_top - metrics.strip_height).floor();
    let chat_height = available.is_finite().then(|| available.max(min_chat_height));

    LayoutResult {
        strip_width,
        chat_height,
    }
}

/// Carousel scroll offset, clamping and edge affordances

use crate::config::CarouselConfig;
use crate::geometry::Span;

/// Which edge arrows/fades are showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Affordances {
    pub left: bool,
    pub right: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Left,
    Right,
}

/// Outcome of `ensure_visible`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reveal {
    /// Nothing was in the way; act now
    Immediate,
    /// The track is shifting; act once the transition is over
    AfterTransition,
}

/// Owns the single scroll offset of the tab track
///
/// Every mutation goes through `clamp`, so the offset always satisfies
/// `0 <= offset <= max(0, track_width - viewport_width)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollController {
    offset: f64,
    track_width: f64,
    viewport_width: f64,
    arrow_width: f64,
    edge_margin: f64,
    reveal_padding: f64,
    step_ratio: f64,
}

impl ScrollController {
    pub fn new(config: &CarouselConfig) -> Self {
        ScrollController {
            offset: 0.0,
            track_width: 0.0,
            viewport_width: 0.0,
            arrow_width: config.arrow_width,
            edge_margin: config.edge_margin,
            reveal_padding: config.reveal_padding,
            step_ratio: config.scroll_step_ratio,
        }
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    pub fn max_offset(&self) -> f64 {
        (self.track_width - self.viewport_width).max(0.0)
    }

    /// Record fresh measurements and re-clamp
    ///
    /// Returns true if the offset or the affordances changed.
    pub fn set_metrics(&mut self, track_width: f64, viewport_width: f64) -> bool {
        let before = (self.offset, self.affordances());
        self.track_width = finite_or_zero(track_width);
        self.viewport_width = finite_or_zero(viewport_width);
        self.offset = self.clamp(self.offset);
        before != (self.offset, self.affordances())
    }

    pub fn scroll_to(&mut self, value: f64) {
        self.offset = self.clamp(value);
    }

    pub fn scroll_by(&mut self, delta: f64) {
        self.scroll_to(self.offset + delta);
    }

    /// Arrow clicks and arrow keys move by a fraction of the viewport
    pub fn step(&mut self, direction: ScrollDirection) {
        let step = self.viewport_width * self.step_ratio;
        match direction {
            ScrollDirection::Left => self.scroll_by(-step),
            ScrollDirection::Right => self.scroll_by(step),
        }
    }

    pub fn can_scroll(&self, direction: ScrollDirection) -> bool {
        let affordances = self.affordances();
        match direction {
            ScrollDirection::Left => affordances.left,
            ScrollDirection::Right => affordances.right,
        }
    }

    /// Arrow/fade visibility, with 1px of slack for rounding jitter
    pub fn affordances(&self) -> Affordances {
        Affordances {
            left: self.offset > 1.0,
            right: self.offset < self.max_offset() - 1.0,
        }
    }

    /// Scroll so `tab` (track coordinates) is not hidden behind an arrow
    ///
    /// `None` means the tab could not be measured; it is treated as
    /// unobstructed.
    pub fn ensure_visible(&mut self, tab: Option<Span>) -> Reveal {
        let Some(tab) = tab else {
            log::debug!("Tab geometry unavailable, revealing immediately");
            return Reveal::Immediate;
        };
        if !tab.start.is_finite() || !tab.end.is_finite() {
            return Reveal::Immediate;
        }

        let affordances = self.affordances();
        let left_arrow = if affordances.left { self.arrow_width } else { 0.0 };
        let right_arrow = if affordances.right { self.arrow_width } else { 0.0 };

        let left_edge = left_arrow + self.edge_margin;
        let right_edge = self.viewport_width - right_arrow - self.edge_margin;

        let visible_start = tab.start - self.offset;
        let visible_end = tab.end - self.offset;

        let target = if visible_start < left_edge {
            tab.start - self.arrow_width - self.edge_margin - self.reveal_padding
        } else if visible_end > right_edge {
            tab.end - self.viewport_width + self.arrow_width + self.edge_margin + self.reveal_padding
        } else {
            return Reveal::Immediate;
        };

        self.scroll_to(target);
        Reveal::AfterTransition
    }

    fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return 0.0;
        }
        value.clamp(0.0, self.max_offset())
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

//! Edge shadow state for the scrollable panel.

use serde::Serialize;

/// Sub-pixel slack when comparing scroll extents; browsers report
/// fractional `scrollLeft` on zoomed pages.
pub const EDGE_TOLERANCE: f32 = 1.0;

/// Whether the scrollable panel has content hidden on either side
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct EdgeShadows {
    /// Content is hidden behind the left frozen boundary
    pub scrolled_from_left: bool,
    /// Content continues past the right frozen boundary
    pub before_right_edge: bool,
}

impl EdgeShadows {
    pub fn compute(scroll_left: f32, scroll_width: f32, client_width: f32) -> Self {
        Self {
            scrolled_from_left: scroll_left > EDGE_TOLERANCE,
            before_right_edge: scroll_left + client_width < scroll_width - EDGE_TOLERANCE,
        }
    }
}

/// True when the content is wider than the visible area.
pub fn has_horizontal_overflow(scroll_width: f32, client_width: f32) -> bool {
    scroll_width - client_width > EDGE_TOLERANCE
}

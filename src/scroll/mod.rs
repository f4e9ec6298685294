//! Scroll synchronization for the three-panel layout.

mod edges;
mod sync;

pub use edges::{has_horizontal_overflow, EdgeShadows, EDGE_TOLERANCE};
pub use sync::{
    HorizontalPart, ScrollCommand, ScrollGroup, ScrollOutcome, ScrollSync, VerticalPanel,
};

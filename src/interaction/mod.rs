//! Pointer-driven column resize and reorder.
//!
//! A session owns a [`CaptureGuard`], so the host's global listeners are
//! removed on finish, cancel, or when the session is dropped mid-drag.

mod capture;
mod reorder;
mod resize;

pub use capture::{CaptureGuard, CountingCapture, PointerCapture};
pub use reorder::{move_id, ReorderSession};
pub use resize::ResizeSession;

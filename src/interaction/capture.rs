//! Scoped acquisition of global pointer listeners.

/// Host hook that installs and removes document-level pointer listeners
/// for the duration of a drag.
pub trait PointerCapture {
    fn acquire(&mut self);
    fn release(&mut self);
}

impl<T: PointerCapture + ?Sized> PointerCapture for &mut T {
    fn acquire(&mut self) {
        (**self).acquire();
    }

    fn release(&mut self) {
        (**self).release();
    }
}

/// Holds a capture for as long as it lives.
///
/// Listeners are released exactly once: on [`CaptureGuard::release`] or on
/// drop, whichever comes first.
pub struct CaptureGuard<C: PointerCapture> {
    capture: C,
    held: bool,
}

impl<C: PointerCapture> CaptureGuard<C> {
    pub fn acquire(mut capture: C) -> Self {
        capture.acquire();
        Self {
            capture,
            held: true,
        }
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    pub fn release(&mut self) {
        if self.held {
            self.held = false;
            self.capture.release();
        }
    }
}

impl<C: PointerCapture> Drop for CaptureGuard<C> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Capture that only counts balance; used where the host manages nothing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CountingCapture {
    pub acquired: usize,
    pub released: usize,
}

impl CountingCapture {
    pub fn is_balanced(&self) -> bool {
        self.acquired == self.released
    }
}

impl PointerCapture for CountingCapture {
    fn acquire(&mut self) {
        self.acquired += 1;
    }

    fn release(&mut self) {
        self.released += 1;
    }
}

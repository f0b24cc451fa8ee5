//! Synchronized state abstraction for platform-agnostic state access.
//!
//! The return-to-base controller is fed from the navigation task and read
//! from telemetry, so every access goes through `SharedState`. Embedded
//! builds use Embassy's critical-section Mutex; host tests use a RefCell.

/// Platform-agnostic synchronized state access.
///
/// - `EmbassyState<T>` for embedded targets (critical-section Mutex)
/// - `MockState<T>` for host testing (RefCell, single-threaded)
///
/// Closures run with the lock held; keep them short and do not log from
/// inside them.
pub trait SharedState<T> {
    /// Access state immutably.
    fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R;

    /// Access state mutably.
    fn with_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R;
}

// ============================================================================
// Embassy Implementation
// ============================================================================

#[cfg(feature = "embassy")]
use embassy_sync::blocking_mutex::{raw::CriticalSectionRawMutex, Mutex};

/// Embassy-based synchronized state using critical-section Mutex.
///
/// Safe to use from async tasks and interrupt handlers alike.
#[cfg(feature = "embassy")]
pub struct EmbassyState<T> {
    inner: Mutex<CriticalSectionRawMutex, core::cell::RefCell<T>>,
}

#[cfg(feature = "embassy")]
impl<T> EmbassyState<T> {
    /// Wrap `value` (const fn for static initialization)
    pub const fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(core::cell::RefCell::new(value)),
        }
    }
}

#[cfg(feature = "embassy")]
impl<T> SharedState<T> for EmbassyState<T> {
    fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        self.inner.lock(|cell| f(&cell.borrow()))
    }

    fn with_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }
}

// ============================================================================
// Mock Implementation (always available for testing)
// ============================================================================

/// RefCell-backed state for single-threaded host tests.
///
/// # Panics
///
/// Panics on a nested `with_mut` inside `with` (or vice versa). That is a
/// bug in the caller.
pub struct MockState<T> {
    inner: core::cell::RefCell<T>,
}

impl<T> MockState<T> {
    /// Wrap `value`
    pub fn new(value: T) -> Self {
        Self {
            inner: core::cell::RefCell::new(value),
        }
    }
}

impl<T> SharedState<T> for MockState<T> {
    fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.inner.borrow())
    }

    fn with_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        f(&mut self.inner.borrow_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtb_core::{Position, ReturnToBase, RtbMode};

    type Rtb = ReturnToBase<8>;

    #[test]
    fn test_mock_state_read() {
        let state = MockState::new(Rtb::default());
        assert_eq!(state.with(|rtb| rtb.mode()), RtbMode::Disabled);
        assert_eq!(state.with(|rtb| rtb.capacity()), 8);
    }

    #[test]
    fn test_mock_state_write_is_visible() {
        let state = MockState::new(Rtb::default());
        state.with_mut(|rtb| rtb.set_mode(RtbMode::Recording)).unwrap();
        state.with_mut(|rtb| {
            rtb.update(Position::new(0.0, 0.0), Default::default());
        });
        assert_eq!(state.with(|rtb| rtb.mode()), RtbMode::Recording);
        assert_eq!(state.with(|rtb| rtb.path_len()), 1);
    }

    #[test]
    #[should_panic(expected = "already borrowed")]
    fn test_mock_state_nested_borrow_panics() {
        let state = MockState::new(0u32);
        state.with(|_v| {
            let _ = state.inner.borrow_mut();
        });
    }
}

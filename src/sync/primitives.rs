//! Synchronization primitives for ISR-safe access.
//!
//! Low-level primitives shared by the serial and Ethernet drivers and their
//! interrupt handlers.

use core::cell::RefCell;
use critical_section::Mutex;

/// Cell providing interior mutability with critical section protection.
///
/// Combines `critical_section::Mutex` with `RefCell` for safe mutable access
/// from both normal code and interrupt handlers.
pub struct CriticalSectionCell<T> {
    inner: Mutex<RefCell<T>>,
}

impl<T> CriticalSectionCell<T> {
    /// Create a new cell (const, suitable for static initialization).
    pub const fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(value)),
        }
    }

    /// Execute a closure with exclusive mutable access.
    ///
    /// Interrupts are disabled for the duration of the closure.
    #[inline]
    pub fn with<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        critical_section::with(|cs| {
            let mut value = self.inner.borrow_ref_mut(cs);
            f(&mut value)
        })
    }

    /// Execute a closure with immutable access.
    #[inline]
    pub fn with_ref<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        critical_section::with(|cs| {
            let value = self.inner.borrow_ref(cs);
            f(&value)
        })
    }
}

// SAFETY: CriticalSectionCell uses critical sections to protect all access.
unsafe impl<T> Sync for CriticalSectionCell<T> {}

// =============================================================================
// Completion
// =============================================================================

/// Event bit: serial transmit ring drained a byte
pub const SEND_DONE: u32 = 1 << 0;
/// Event bit: serial receive ring gained a byte
pub const RECV_DONE: u32 = 1 << 1;
/// Event bit: DMA finished a frame
pub const TX_COMPLETE: u32 = 1 << 2;
/// Event bit: DMA reached a descriptor it does not own
pub const TX_BUFFER_UNAVAILABLE: u32 = 1 << 3;
/// Event bit: DMA aborted with a bus error
pub const TX_FAILED: u32 = 1 << 4;

#[derive(Debug, Default)]
struct CompletionState {
    armed: bool,
    generation: u32,
    pending: u32,
}

/// Edge-triggered event bits set from interrupt context and consumed by one
/// waiting task.
///
/// A waiter arms the completion for the duration of one blocking call via
/// [`arm`](Self::arm). Signals raised while nobody is armed are dropped, so a
/// stale completion from an earlier call can never satisfy a later one.
pub struct Completion {
    state: CriticalSectionCell<CompletionState>,
}

impl Completion {
    /// Create a disarmed completion (const, suitable for static initialization).
    pub const fn new() -> Self {
        Self {
            state: CriticalSectionCell::new(CompletionState {
                armed: false,
                generation: 0,
                pending: 0,
            }),
        }
    }

    /// Arm for one blocking call, discarding any pending bits.
    ///
    /// The completion disarms when the returned guard drops. A second
    /// `arm` replaces the first; the older guard then drops without effect.
    pub fn arm(&self) -> CompletionGuard<'_> {
        let generation = self.state.with(|s| {
            s.generation = s.generation.wrapping_add(1);
            s.armed = true;
            s.pending = 0;
            s.generation
        });
        CompletionGuard {
            completion: self,
            generation,
        }
    }

    /// Raise event bits. Returns `false` if no waiter is armed.
    ///
    /// Safe to call from interrupt context.
    pub fn signal(&self, bits: u32) -> bool {
        self.state.with(|s| {
            if s.armed {
                s.pending |= bits;
            }
            s.armed
        })
    }

    /// Consume and return the pending bits in `mask` (0 if none).
    pub fn take(&self, mask: u32) -> u32 {
        self.state.with(|s| {
            let hit = s.pending & mask;
            s.pending &= !hit;
            hit
        })
    }

    /// Pending bits without consuming them
    pub fn peek(&self) -> u32 {
        self.state.with_ref(|s| s.pending)
    }

    /// Check if a waiter is armed
    pub fn is_armed(&self) -> bool {
        self.state.with_ref(|s| s.armed)
    }
}

impl Default for Completion {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps a [`Completion`] armed; disarms on drop.
#[must_use = "the completion disarms as soon as the guard is dropped"]
pub struct CompletionGuard<'a> {
    completion: &'a Completion,
    generation: u32,
}

impl Drop for CompletionGuard<'_> {
    fn drop(&mut self) {
        let generation = self.generation;
        self.completion.state.with(|s| {
            if s.generation == generation {
                s.armed = false;
                s.pending = 0;
            }
        });
    }
}

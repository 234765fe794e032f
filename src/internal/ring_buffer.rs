//! Fixed-capacity byte ring buffer shared between interrupt and task context.
//!
//! The buffer itself takes no lock. Callers in task context must hold a
//! critical section (see [`CriticalSectionCell`](crate::sync::CriticalSectionCell))
//! because the interrupt handler mutates the same structure.
//!
//! Indices run freely and are reduced modulo `N` on access, so a full buffer
//! holds exactly `N` bytes.

/// Circular byte queue with overwrite-oldest semantics on [`push`](Self::push).
pub struct RingBuffer<const N: usize> {
    storage: [u8; N],
    /// Next write position (free-running)
    head: usize,
    /// Next read position (free-running)
    tail: usize,
}

impl<const N: usize> RingBuffer<N> {
    const CAPACITY_OK: () = assert!(N.is_power_of_two(), "ring capacity must be a power of two");

    /// Create an empty ring buffer.
    #[must_use]
    pub const fn new() -> Self {
        let () = Self::CAPACITY_OK;
        Self {
            storage: [0; N],
            head: 0,
            tail: 0,
        }
    }

    /// Capacity in bytes
    #[inline(always)]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of bytes currently stored
    #[inline(always)]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.head.wrapping_sub(self.tail)
    }

    /// True when no bytes are stored
    #[inline(always)]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    /// True when the next [`push`](Self::push) would overwrite
    #[inline(always)]
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.len() == N
    }

    /// Append a byte, dropping the oldest byte if the buffer is full.
    ///
    /// Returns `true` if a byte was overwritten.
    pub fn push(&mut self, byte: u8) -> bool {
        let overwritten = self.is_full();
        if overwritten {
            self.tail = self.tail.wrapping_add(1);
        }
        self.storage[self.head % N] = byte;
        self.head = self.head.wrapping_add(1);
        overwritten
    }

    /// Append a byte only if there is room.
    ///
    /// Returns `false` and leaves the buffer unchanged when full.
    pub fn try_push(&mut self, byte: u8) -> bool {
        if self.is_full() {
            return false;
        }
        self.storage[self.head % N] = byte;
        self.head = self.head.wrapping_add(1);
        true
    }

    /// Copy as many bytes from `data` as fit without overwriting.
    ///
    /// Returns the number of bytes accepted.
    pub fn extend_from_slice(&mut self, data: &[u8]) -> usize {
        let mut accepted = 0;
        for &byte in data {
            if !self.try_push(byte) {
                break;
            }
            accepted += 1;
        }
        accepted
    }

    /// Remove and return the oldest byte.
    pub fn pop(&mut self) -> Option<u8> {
        if self.is_empty() {
            return None;
        }
        let byte = self.storage[self.tail % N];
        self.tail = self.tail.wrapping_add(1);
        Some(byte)
    }

    /// Move up to `out.len()` bytes into `out` in FIFO order.
    ///
    /// Returns `min(len, out.len())`; zero when empty.
    pub fn pop_up_to(&mut self, out: &mut [u8]) -> usize {
        let count = self.len().min(out.len());
        for slot in &mut out[..count] {
            *slot = self.storage[self.tail % N];
            self.tail = self.tail.wrapping_add(1);
        }
        count
    }

    /// Discard all stored bytes.
    pub fn clear(&mut self) {
        self.tail = self.head;
    }
}

impl<const N: usize> Default for RingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================

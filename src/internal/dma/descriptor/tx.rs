//! TX DMA descriptor for frame transmission.

use super::VolatileCell;
use super::bits::{tdes0, tdes1};

/// TX DMA descriptor (normal 16-byte layout).
#[repr(C, align(4))]
pub struct TxDescriptor {
    /// TDES0: Status and control bits
    tdes0: VolatileCell<u32>,
    /// TDES1: Buffer sizes
    tdes1: VolatileCell<u32>,
    /// TDES2: Buffer 1 address
    buffer1_addr: VolatileCell<u32>,
    /// TDES3: Next descriptor address (chained mode)
    next_desc: VolatileCell<u32>,
}

impl TxDescriptor {
    /// Size of the descriptor in bytes
    pub const SIZE: usize = 16;

    /// Create a new zeroed TX descriptor.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tdes0: VolatileCell::new(0),
            tdes1: VolatileCell::new(0),
            buffer1_addr: VolatileCell::new(0),
            next_desc: VolatileCell::new(0),
        }
    }

    /// Initialize descriptor for chained mode, CPU-owned and empty.
    pub fn setup_chained(&self, next_desc: *const TxDescriptor) {
        self.buffer1_addr.set(0);
        self.next_desc.set(next_desc as u32);
        self.tdes0.set(tdes0::SECOND_ADDR_CHAINED);
        self.tdes1.set(0);
    }

    /// Check if descriptor is owned by DMA.
    #[inline(always)]
    #[must_use]
    pub fn is_owned(&self) -> bool {
        (self.tdes0.get() & tdes0::OWN) != 0
    }

    /// Give ownership to DMA for transmission.
    #[inline(always)]
    pub fn set_owned(&self) {
        self.tdes0.update(|v| v | tdes0::OWN);
    }

    /// Take ownership from DMA for CPU use.
    #[inline(always)]
    pub fn clear_owned(&self) {
        self.tdes0.update(|v| v & !tdes0::OWN);
    }

    /// Point the descriptor at `segment` and set the segment flags.
    ///
    /// `first` sets FS; `last` sets LS and IC. OWN is left clear. The
    /// caller must keep `segment` alive until the DMA hands the descriptor
    /// back.
    pub fn prepare(&self, segment: &[u8], first: bool, last: bool) {
        let mut flags = tdes0::SECOND_ADDR_CHAINED;

        if first {
            flags |= tdes0::FIRST_SEGMENT;
        }
        if last {
            flags |= tdes0::LAST_SEGMENT | tdes0::INTERRUPT_ON_COMPLETE;
        }

        self.buffer1_addr.set(segment.as_ptr() as u32);
        self.tdes1
            .set((segment.len() as u32) & tdes1::BUFFER1_SIZE_MASK);

        // Set flags (but not OWN yet)
        self.tdes0.set(flags);
    }

    /// First segment flag
    #[inline(always)]
    #[must_use]
    pub fn is_first(&self) -> bool {
        (self.tdes0.get() & tdes0::FIRST_SEGMENT) != 0
    }

    /// Last segment flag
    #[inline(always)]
    #[must_use]
    pub fn is_last(&self) -> bool {
        (self.tdes0.get() & tdes0::LAST_SEGMENT) != 0
    }

    /// Interrupt-on-completion flag
    #[inline(always)]
    #[must_use]
    pub fn interrupt_on_completion(&self) -> bool {
        (self.tdes0.get() & tdes0::INTERRUPT_ON_COMPLETE) != 0
    }

    /// Check if transmission had errors.
    #[inline(always)]
    #[must_use]
    pub fn has_error(&self) -> bool {
        (self.tdes0.get() & tdes0::ERR_SUMMARY) != 0
    }

    /// Get all error flags from TDES0.
    #[inline(always)]
    #[must_use]
    pub fn error_flags(&self) -> u32 {
        self.tdes0.get() & tdes0::ALL_ERRORS
    }

    /// Get buffer address.
    #[inline(always)]
    #[must_use]
    pub fn buffer_addr(&self) -> u32 {
        self.buffer1_addr.get()
    }

    /// Get buffer length.
    #[inline(always)]
    #[must_use]
    pub fn buffer_len(&self) -> usize {
        (self.tdes1.get() & tdes1::BUFFER1_SIZE_MASK) as usize
    }

    /// Get next descriptor address in chained mode.
    #[inline(always)]
    #[must_use]
    pub fn next_desc_addr(&self) -> u32 {
        self.next_desc.get()
    }

    /// Reset descriptor to CPU-owned and empty, keeping the chain link.
    pub fn reset(&self) {
        self.tdes0.set(tdes0::SECOND_ADDR_CHAINED);
        self.tdes1.set(0);
        self.buffer1_addr.set(0);
    }

    /// Get raw TDES0 value for debugging.
    #[inline(always)]
    #[must_use]
    pub fn raw_tdes0(&self) -> u32 {
        self.tdes0.get()
    }

    /// Overwrite TDES0, as the DMA does when it writes back status.
    #[cfg(test)]
    pub(crate) fn write_back_status(&self, value: u32) {
        self.tdes0.set(value);
    }
}

impl Default for TxDescriptor {
    fn default() -> Self {
        Self::new()
    }
}

// Safety: TxDescriptor uses volatile cells for all DMA-accessed fields
unsafe impl Sync for TxDescriptor {}
unsafe impl Send for TxDescriptor {}

/// Statically allocatable TX descriptor list.
///
/// Aligned to the Cortex-M7 cache line so the list never shares a line with
/// unrelated data.
///
/// ```ignore
/// static TX_DESCRIPTORS: TxDescriptors<6> = TxDescriptors::new();
/// ```
#[repr(C, align(32))]
pub struct TxDescriptors<const N: usize> {
    descriptors: [TxDescriptor; N],
}

impl<const N: usize> TxDescriptors<N> {
    /// Create a zeroed descriptor list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            descriptors: [const { TxDescriptor::new() }; N],
        }
    }

    /// Link every descriptor to its successor, the last back to the first.
    pub fn chain(&self) {
        for (i, desc) in self.descriptors.iter().enumerate() {
            let next = &self.descriptors[(i + 1) % N];
            desc.setup_chained(core::ptr::from_ref(next));
        }
    }

    /// Borrow the descriptor array
    #[inline(always)]
    pub const fn as_array(&self) -> &[TxDescriptor; N] {
        &self.descriptors
    }
}

impl<const N: usize> Default for TxDescriptors<N> {
    fn default() -> Self {
        Self::new()
    }
}

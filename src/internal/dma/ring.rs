//! Circular cursor over a borrowed descriptor list.

/// Circular descriptor ring with wraparound index.
///
/// The ring borrows its descriptors so the list can live in a `static`
/// while the DMA walks it.
pub struct DescriptorRing<'a, D, const N: usize> {
    /// Array of descriptors
    descriptors: &'a [D; N],
    /// Next descriptor to hand to the DMA
    current: usize,
}

impl<'a, D, const N: usize> DescriptorRing<'a, D, N> {
    /// Create a ring starting at the first descriptor
    #[must_use]
    pub const fn new(descriptors: &'a [D; N]) -> Self {
        Self {
            descriptors,
            current: 0,
        }
    }

    /// Get the current index
    #[inline(always)]
    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current
    }

    /// Advance the current index by one, wrapping around
    #[inline(always)]
    pub fn advance(&mut self) {
        self.current = (self.current + 1) % N;
    }

    /// Reset the current index to 0
    #[inline(always)]
    pub fn reset(&mut self) {
        self.current = 0;
    }

    /// Get a reference to the current descriptor
    #[inline(always)]
    pub fn current(&self) -> &'a D {
        &self.descriptors[self.current]
    }

    /// Get a reference to a descriptor at a specific index
    #[inline(always)]
    pub fn get(&self, index: usize) -> &'a D {
        &self.descriptors[index % N]
    }

    /// Get the base address as u32 (for DMA register)
    #[inline(always)]
    pub fn base_addr_u32(&self) -> u32 {
        self.descriptors.as_ptr() as u32
    }
}

// =============================================================================
// Tests
// =============================================================================

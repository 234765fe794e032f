//! Memory-mapped register access for the STM32F7 USART and ETH blocks
//!
//! Drivers never dereference addresses directly. They go through
//! [`RegisterBlock`], implemented for real hardware by [`Mmio`] and on the
//! host by the mocks in `crate::testing`. All hardware access is volatile.

pub mod eth;
pub mod usart;

/// A register identified by its byte offset from a peripheral base address.
pub trait RegisterOffset: Copy {
    /// Byte offset from the peripheral base
    fn offset(self) -> usize;
}

/// Word-wide access to a peripheral register file.
///
/// Methods take `&self` so a register block can be shared between task
/// context and an interrupt handler. Reads and writes are side-effecting.
pub trait RegisterBlock<R: RegisterOffset> {
    /// Read a register
    fn read(&self, reg: R) -> u32;

    /// Write a register
    fn write(&self, reg: R, value: u32);

    /// Read-modify-write a register
    #[inline(always)]
    fn modify<F>(&self, reg: R, f: F)
    where
        F: FnOnce(u32) -> u32,
    {
        let value = self.read(reg);
        self.write(reg, f(value));
    }

    /// Set bits in a register (read-modify-write)
    #[inline(always)]
    fn set_bits(&self, reg: R, bits: u32) {
        self.modify(reg, |v| v | bits);
    }

    /// Clear bits in a register (read-modify-write)
    #[inline(always)]
    fn clear_bits(&self, reg: R, bits: u32) {
        self.modify(reg, |v| v & !bits);
    }

    /// Check if all of `bits` are set
    #[inline(always)]
    fn is_set(&self, reg: R, bits: u32) -> bool {
        self.read(reg) & bits == bits
    }
}

impl<R: RegisterOffset, T: RegisterBlock<R> + ?Sized> RegisterBlock<R> for &T {
    #[inline(always)]
    fn read(&self, reg: R) -> u32 {
        (**self).read(reg)
    }

    #[inline(always)]
    fn write(&self, reg: R, value: u32) {
        (**self).write(reg, value);
    }
}

/// Register block at a fixed physical address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mmio {
    base: usize,
}

impl Mmio {
    /// Create an accessor for the peripheral at `base`.
    ///
    /// # Safety
    ///
    /// `base` must be the base address of a peripheral whose registers match
    /// the offsets used with this accessor, and no other code may program the
    /// same peripheral concurrently.
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    /// Peripheral base address
    pub const fn base(&self) -> usize {
        self.base
    }
}

impl<R: RegisterOffset> RegisterBlock<R> for Mmio {
    #[inline(always)]
    fn read(&self, reg: R) -> u32 {
        // SAFETY: `Mmio::new` requires a valid peripheral base address.
        unsafe { read_reg(self.base + reg.offset()) }
    }

    #[inline(always)]
    fn write(&self, reg: R, value: u32) {
        // SAFETY: `Mmio::new` requires a valid peripheral base address.
        unsafe { write_reg(self.base + reg.offset(), value) }
    }
}

/// Read a 32-bit register at the given address
///
/// # Safety
/// The caller must ensure the address is valid and properly aligned.
#[inline(always)]
pub unsafe fn read_reg(addr: usize) -> u32 {
    unsafe { core::ptr::read_volatile(addr as *const u32) }
}

/// Write a 32-bit value to a register at the given address
///
/// # Safety
/// The caller must ensure the address is valid and properly aligned.
#[inline(always)]
pub unsafe fn write_reg(addr: usize, value: u32) {
    unsafe { core::ptr::write_volatile(addr as *mut u32, value) }
}

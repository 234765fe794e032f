//! STM32F7 Peripheral Drivers
//!
//! A `no_std`, `no_alloc` driver layer for the STM32F7 USART and Ethernet
//! transmit path.
//!
//! The crate turns interrupt-driven hardware into task-friendly calls: byte
//! rings behind each USART, timeout-bounded blocking send/receive, a DMA
//! descriptor ring that sends one Ethernet frame per call, and indirect
//! access to the PHY's extended (MMD) registers.
//!
//! # Architecture
//!
//! 1. **Serial** ([`driver::serial`], [`driver::blocking`]): interrupt-side
//!    byte movement and the blocking adapter on top of it
//! 2. **Ethernet** ([`driver::eth`], [`driver::interrupt`]): transmit DMA,
//!    MAC bring-up and interrupt dispatch
//! 3. **Management** ([`hal`], [`phy`]): SMI/MDIO bus, MMD protocol and the
//!    LAN8742A PHY driver
//! 4. **Sync** ([`sync`]): critical-section cells, completions and wait
//!    strategies shared by all of the above
//!
//! ## Standard Compliance
//!
//! - **IEEE 802.3**: Clause 22 management registers, Clause 45 indirect access
//! - **Synopsys DWMAC**: normal (4-word) TX descriptors, DMA register layout
//! - **STM32F7-specific**: memory map, IRQ numbers, kernel clocks
//!
//! # Supported PHY Chips
//!
//! - [`Lan8742a`]: Microchip LAN8742A (RMII, Nucleo/Discovery boards)
//!
//! Additional PHY drivers can be added by implementing [`PhyDriver`].
//!
//! # Features
//!
//! - `defmt`: Enable defmt formatting for public types and driver logging
//! - `embedded-io`: `embedded_io::{Read, Write}` for [`BlockingSerial`]
//!
//! # Example
//!
//! ```ignore
//! use ph_stm32f7_periph::{BlockingSerial, ChannelId, SerialChannel, SerialDevice, SerialSignals};
//! use ph_stm32f7_periph::sync::{DelayWait, Timeout};
//! use ph_stm32f7_periph::unsafe_registers::{Mmio, USART1_BASE};
//!
//! static CONSOLE: SerialChannel<'static, Mmio> =
//!     SerialChannel::new(ChannelId::Usart1, unsafe { Mmio::new(USART1_BASE) });
//! static SIGNALS: SerialSignals = SerialSignals::new();
//!
//! #[interrupt]
//! fn USART1() {
//!     CONSOLE.on_interrupt();
//! }
//!
//! CONSOLE.init()?;
//! let mut console = BlockingSerial::new(&CONSOLE, &SIGNALS, DelayWait::new(delay));
//! console.open_device(SerialDevice::Console)?;
//! console.send(b"hello\r\n", Timeout::Millis(100))?;
//! ```
//!
//! # Memory Requirements
//!
//! With default configuration:
//! - Two 512-byte rings per serial channel
//! - Six 16-byte TX descriptors, which together with the frame buffers must
//!   sit in memory the DMA sees coherently

#![no_std]
#![deny(missing_docs)]
#![allow(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]

// =============================================================================
// Modules
// =============================================================================

pub mod driver;
pub mod hal;
pub mod phy;
pub mod sync;

// Internal implementation details (pub(crate) only)
mod internal;

pub mod integration;

// Test utilities (only available during testing)
#[cfg(test)]
pub mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use driver::blocking::{BlockingSerial, SerialDevice, SerialSignals};
pub use driver::config::{DataBits, Duplex, EthConfig, Parity, State, StopBits, UsartConfig};
pub use driver::error::{
    DmaError, DmaResult, Error, ErrorKind, IoError, IoResult, ParamError, ParamResult,
    ResourceError, ResourceResult, Result,
};
pub use driver::eth::{EthStats, EthTransport};
pub use driver::interrupt::{EthInterruptHandler, EthInterruptStatus};
pub use driver::serial::{
    ChannelId, LineErrors, SerialChannel, SerialEvent, SerialEventHandler, SerialStats,
};
pub use internal::dma::{TxDescriptor, TxDescriptors};
pub use internal::ring_buffer::RingBuffer;

/// Low-level register accessors for advanced use.
///
/// These are intentionally separated from the primary facade. Most users should
/// prefer the safe driver APIs instead of touching registers directly.
///
/// # Safety
///
/// Direct register access bypasses driver invariants. Use only if you fully
/// understand the STM32F7 USART and ETH blocks and accept responsibility for
/// correct sequencing and synchronization.
pub mod unsafe_registers {
    pub use crate::internal::register::eth::{ETH_BASE, ETH_IRQN, EthReg};
    pub use crate::internal::register::usart::{
        USART1_BASE, USART1_IRQN, USART2_BASE, USART2_IRQN, UsartReg,
    };
    pub use crate::internal::register::{
        Mmio, RegisterBlock, RegisterOffset, read_reg, write_reg,
    };
}

// Re-export PHY types
pub use phy::{Lan8742a, LedFunction, LedIndex, LinkStatus, PhyDriver, Speed};

/// Shared driver constants.
///
/// These are grouped into a dedicated module to keep the top-level facade
/// focused on driver types and integration points.
pub mod constants {
    pub use crate::internal::constants::{
        // MAC/PHY defaults
        DEFAULT_BAUD_RATE,
        DEFAULT_MAC_ADDR,
        DEFAULT_PHY_ADDR,
        // Retry budgets
        DMA_RESET_RETRIES,
        // Clocks
        ETH_HCLK_HZ,
        MAC_ADDR_LEN,
        // Buffer sizes
        MAX_SEGMENT,
        MDC_MAX_FREQ_HZ,
        MII_BUSY_RETRIES,
        PHY_RESET_RETRIES,
        SERIAL_BUFFER_SIZE,
        TX_DESCRIPTOR_COUNT,
        USART_IRQ_PRIORITY,
        USART1_KERNEL_CLK_HZ,
        USART2_KERNEL_CLK_HZ,
        // Timing
        WAIT_POLL_INTERVAL_US,
        WAIT_QUANTUM_MS,
    };
}

// =============================================================================
// Macro Helpers
// =============================================================================

/// Declare the static state of one serial channel.
///
/// Expands to a `SerialChannel` bound to the channel's MMIO block and the
/// `SerialSignals` its blocking adapter waits on.
///
/// # Examples
///
/// ```ignore
/// ph_stm32f7_periph::serial_static!(CONSOLE, CONSOLE_SIGNALS, Usart1);
///
/// #[interrupt]
/// fn USART1() {
///     CONSOLE.on_interrupt();
/// }
/// ```
#[macro_export]
macro_rules! serial_static {
    ($channel:ident, $signals:ident, $id:ident) => {
        static $channel: $crate::SerialChannel<'static, $crate::unsafe_registers::Mmio> =
            $crate::SerialChannel::new($crate::ChannelId::$id, {
                // SAFETY: the base address comes from the channel's own table entry.
                unsafe {
                    $crate::unsafe_registers::Mmio::new($crate::ChannelId::$id.base_address())
                }
            });
        static $signals: $crate::SerialSignals = $crate::SerialSignals::new();
    };
}

/// Declare static transmit descriptors and the completion the Ethernet
/// interrupt signals.
///
/// # Examples
///
/// ```ignore
/// ph_stm32f7_periph::eth_static!(TX_DESC, TX_DONE);
///
/// #[interrupt]
/// fn ETH() {
///     let regs = unsafe { Mmio::new(ETH_BASE) };
///     EthInterruptHandler::new(regs, &TX_DONE).on_interrupt();
/// }
/// ```
#[macro_export]
macro_rules! eth_static {
    ($desc:ident, $done:ident) => {
        $crate::eth_static!($desc, $done, $crate::constants::TX_DESCRIPTOR_COUNT);
    };
    ($desc:ident, $done:ident, $count:expr) => {
        static $desc: $crate::TxDescriptors<$count> = $crate::TxDescriptors::new();
        static $done: $crate::sync::Completion = $crate::sync::Completion::new();
    };
}

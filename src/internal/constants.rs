//! Centralized Constants
//!
//! This module provides a single source of truth for the compiled-in
//! configuration of the serial and Ethernet drivers.
//!
//! # Organization
//!
//! Constants are grouped by category:
//! - **Buffer sizes**: Ring buffer capacity, DMA segment limit
//! - **Retry budgets**: Busy-bit and reset polling bounds
//! - **Timing**: Blocking wait quantum
//! - **Clock frequencies**: USART kernel clocks, Ethernet HCLK
//! - **Defaults**: MAC address, PHY address, serial format
//!
//! # Note
//!
//! Hardware register bit definitions remain in their respective modules
//! (`register/usart.rs`, `register/eth.rs`, `dma/descriptor/bits.rs`) as they
//! are specific to those hardware blocks.

// =============================================================================
// Buffer Sizes
// =============================================================================

/// Capacity of each serial transmit and receive ring buffer (power of two)
pub const SERIAL_BUFFER_SIZE: usize = 512;

/// Largest buffer a single TX descriptor may describe
pub const MAX_SEGMENT: usize = 1504;

/// Number of TX descriptors in the ring
pub const TX_DESCRIPTOR_COUNT: usize = 6;

/// MAC address length in bytes
pub const MAC_ADDR_LEN: usize = 6;

// =============================================================================
// Retry Budgets
// =============================================================================

/// Polls of the SMI busy bit before an access is abandoned
pub const MII_BUSY_RETRIES: u32 = 10;

/// Polls of the DMA software reset bit before initialization proceeds anyway
pub const DMA_RESET_RETRIES: u32 = 1000;

/// Polls of the PHY soft reset bit
pub const PHY_RESET_RETRIES: u32 = 1000;

// =============================================================================
// Timing Constants
// =============================================================================

/// Wait quantum of the blocking serial adapter in milliseconds
pub const WAIT_QUANTUM_MS: u32 = 10;

/// Poll interval used by [`DelayWait`](crate::sync::DelayWait) in microseconds
pub const WAIT_POLL_INTERVAL_US: u32 = 100;

// =============================================================================
// Clock Frequencies
// =============================================================================

/// USART1 kernel clock (APB2) in Hz
pub const USART1_KERNEL_CLK_HZ: u32 = 108_000_000;

/// USART2 kernel clock (APB1) in Hz
pub const USART2_KERNEL_CLK_HZ: u32 = 54_000_000;

/// Ethernet HCLK in Hz
pub const ETH_HCLK_HZ: u32 = 216_000_000;

/// Maximum MDC clock frequency per IEEE 802.3 (2.5 MHz)
pub const MDC_MAX_FREQ_HZ: u32 = 2_500_000;

// =============================================================================
// Defaults
// =============================================================================

/// Default serial baud rate
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// NVIC priority of the USART interrupts
pub const USART_IRQ_PRIORITY: u8 = 5;

/// Default MAC address (locally administered)
pub const DEFAULT_MAC_ADDR: [u8; MAC_ADDR_LEN] = [0x02, 0x00, 0x00, 0x00, 0x00, 0x01];

/// Default PHY address on the SMI bus
pub const DEFAULT_PHY_ADDR: u8 = 0;

// =============================================================================
// Unit Tests
// =============================================================================

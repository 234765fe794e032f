//! Core driver components for the STM32F7 USART and Ethernet peripherals.
//!
//! - [`config`] - Configuration types and builder patterns
//! - [`error`] - Error types and result aliases
//! - [`serial`] - Interrupt-driven serial channel
//! - [`blocking`] - Timeout-bounded blocking serial adapter
//! - [`eth`] - Ethernet MAC bring-up and frame transmitter
//! - [`interrupt`] - Ethernet DMA interrupt dispatch
//!
//! # Example
//!
//! ```ignore
//! use ph_stm32f7_periph::driver::{EthConfig, EthTransport, Error};
//!
//! let config = EthConfig::new()
//!     .with_mac_address([0x02, 0x00, 0x00, 0x00, 0x00, 0x01])
//!     .with_loopback(false);
//! ```

// Submodules
pub mod blocking;
pub mod config;
pub mod error;
pub mod eth;
pub mod interrupt;
pub mod serial;

// Re-exports for convenience
pub use blocking::{BlockingSerial, SerialDevice, SerialSignals};
pub use config::{DataBits, Duplex, EthConfig, Parity, State, StopBits, UsartConfig};
pub use error::{
    DmaError, DmaResult, Error, ErrorKind, IoError, IoResult, ParamError, ParamResult,
    ResourceError, ResourceResult, Result,
};
pub use eth::{EthStats, EthTransport};
pub use interrupt::{EthInterruptHandler, EthInterruptStatus};
pub use serial::{ChannelId, LineErrors, SerialChannel, SerialEvent, SerialEventHandler, SerialStats};

//! Internal Implementation Details
//!
//! This module contains implementation details that are not part of the public API.
//! Types in this module may change without notice between minor versions.
//!
//! # Contents
//!
//! - [`register`]: Memory-mapped register access and the USART/ETH register maps
//! - [`constants`]: Compiled-in tunables
//! - [`dma`]: Transmit descriptors, their bit fields and the descriptor ring
//! - [`ring_buffer`]: Fixed-capacity overwrite-oldest byte ring
//!
//! # Stability
//!
//! **WARNING:** This module is `pub(crate)` only. The few types the drivers
//! expose are re-exported from the crate root and [`crate::unsafe_registers`].

pub(crate) mod constants;
pub(crate) mod dma;
pub(crate) mod register;
pub(crate) mod ring_buffer;

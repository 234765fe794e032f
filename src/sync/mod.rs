//! Synchronization and Concurrency Support
//!
//! This module provides the primitives that connect interrupt handlers to
//! blocking task code:
//!
//! - **Primitives** (`primitives`): Low-level synchronization types
//!   - [`CriticalSectionCell`] - ISR-safe interior mutability
//!   - [`Completion`] - Edge-triggered event bits armed per blocking call
//!
//! - **Waiting** (`wait`): Task-side suspension
//!   - [`SignalWait`] - Wait strategy trait (RTOS event flag, polling, ...)
//!   - [`DelayWait`] - Polling implementation over `embedded_hal::delay::DelayNs`
//!   - [`QuantumBudget`] - Deadline budget decremented by a fixed quantum
//!
//! # Example
//!
//! ```ignore
//! use ph_stm32f7_periph::sync::{Completion, DelayWait, SignalWait, Timeout, TX_COMPLETE};
//!
//! static TX_DONE: Completion = Completion::new();
//!
//! let _armed = TX_DONE.arm();
//! start_transfer();
//! let mut waiter = DelayWait::new(delay);
//! if waiter.wait(&TX_DONE, TX_COMPLETE, Timeout::Millis(100)).is_none() {
//!     // timed out
//! }
//!
//! #[interrupt]
//! fn ETH() {
//!     TX_DONE.signal(TX_COMPLETE);
//! }
//! ```

mod primitives;
mod wait;

pub use primitives::{
    Completion, CompletionGuard, CriticalSectionCell, RECV_DONE, SEND_DONE, TX_BUFFER_UNAVAILABLE,
    TX_COMPLETE, TX_FAILED,
};
pub use wait::{DelayWait, QuantumBudget, SignalWait, Timeout};

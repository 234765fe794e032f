//! Blocking waits on a [`Completion`].
//!
//! The driver never blocks on its own. Every suspension goes through
//! [`SignalWait`], so an RTOS port can park the task on a real event flag
//! while bare-metal code uses [`DelayWait`].

use embedded_hal::delay::DelayNs;

use super::Completion;
use crate::internal::constants::WAIT_POLL_INTERVAL_US;

/// How long a wait may last
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Timeout {
    /// Bounded wait in milliseconds; `Millis(0)` never waits
    Millis(u32),
    /// Wait until signaled
    #[default]
    Forever,
}

impl Timeout {
    /// Non-blocking timeout
    pub const NON_BLOCKING: Timeout = Timeout::Millis(0);

    /// True for `Millis(0)`
    #[inline]
    pub const fn is_non_blocking(&self) -> bool {
        matches!(self, Timeout::Millis(0))
    }
}

/// Suspend the calling task until event bits arrive.
pub trait SignalWait {
    /// Wait for any bit in `mask` to be signaled on `completion`.
    ///
    /// Consumes and returns the matching bits, or `None` if `timeout`
    /// elapsed first.
    fn wait(&mut self, completion: &Completion, mask: u32, timeout: Timeout) -> Option<u32>;
}

impl<T: SignalWait + ?Sized> SignalWait for &mut T {
    fn wait(&mut self, completion: &Completion, mask: u32, timeout: Timeout) -> Option<u32> {
        (**self).wait(completion, mask, timeout)
    }
}

/// Polling waiter built on an `embedded_hal` delay.
///
/// Checks the completion every poll interval. Suitable for bare-metal use
/// where the interrupt fires while the task spins in the delay.
#[derive(Debug)]
pub struct DelayWait<D: DelayNs> {
    delay: D,
    poll_interval_us: u32,
}

impl<D: DelayNs> DelayWait<D> {
    /// Create a waiter with the default poll interval
    pub fn new(delay: D) -> Self {
        Self {
            delay,
            poll_interval_us: WAIT_POLL_INTERVAL_US,
        }
    }

    /// Set the poll interval in microseconds (minimum 1)
    #[must_use]
    pub fn with_poll_interval_us(mut self, interval_us: u32) -> Self {
        self.poll_interval_us = interval_us.max(1);
        self
    }

    /// Release the delay provider
    pub fn into_inner(self) -> D {
        self.delay
    }
}

impl<D: DelayNs> SignalWait for DelayWait<D> {
    fn wait(&mut self, completion: &Completion, mask: u32, timeout: Timeout) -> Option<u32> {
        let limit_us = match timeout {
            Timeout::Millis(ms) => Some(u64::from(ms) * 1000),
            Timeout::Forever => None,
        };

        let mut elapsed_us = 0u64;
        loop {
            let bits = completion.take(mask);
            if bits != 0 {
                return Some(bits);
            }
            if limit_us.is_some_and(|limit| elapsed_us >= limit) {
                return None;
            }
            self.delay.delay_us(self.poll_interval_us);
            elapsed_us += u64::from(self.poll_interval_us);
        }
    }
}

/// Deadline budget consumed one wait quantum at a time.
///
/// Mirrors a timed wait with ± one quantum precision: after each quantum the
/// remaining budget is decremented, and the call gives up once it is
/// negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantumBudget {
    remaining_ms: Option<i64>,
    quantum_ms: u32,
}

impl QuantumBudget {
    /// Start a budget for `timeout`, spent in steps of `quantum_ms`
    pub const fn new(timeout: Timeout, quantum_ms: u32) -> Self {
        let remaining_ms = match timeout {
            Timeout::Millis(ms) => Some(ms as i64),
            Timeout::Forever => None,
        };
        Self {
            remaining_ms,
            quantum_ms,
        }
    }

    /// True if the caller must not wait (any more)
    pub const fn is_non_blocking(&self) -> bool {
        matches!(self.remaining_ms, Some(0))
    }

    /// Timeout for one wait step; an unbounded budget waits until signaled
    pub const fn quantum(&self) -> Timeout {
        match self.remaining_ms {
            Some(_) => Timeout::Millis(self.quantum_ms),
            None => Timeout::Forever,
        }
    }

    /// Charge one quantum. Returns `false` once the budget is exhausted.
    pub fn consume(&mut self) -> bool {
        match &mut self.remaining_ms {
            Some(remaining) => {
                *remaining -= i64::from(self.quantum_ms);
                *remaining >= 0
            }
            None => true,
        }
    }

    /// Remaining budget in milliseconds, `None` for an unbounded wait
    pub const fn remaining_ms(&self) -> Option<i64> {
        self.remaining_ms
    }
}

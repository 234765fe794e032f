//! Blocking, timeout-bounded serial I/O
//!
//! [`BlockingSerial`] turns the non-blocking [`SerialChannel`] calls into
//! synchronous ones. Each call arms a per-direction [`Completion`] for its
//! own duration, so a signal raised for an earlier call can never wake a
//! later one.
//!
//! Timeouts are spent one quantum at a time through [`QuantumBudget`]:
//! the deadline is honored to within one quantum. A timeout never fails the
//! call; it returns the (possibly short) count transferred so far.
//!
//! # Precondition
//!
//! At most one blocking call per direction per channel may be in flight.
//! Concurrent callers on the same direction must serialize externally.

use super::config::{State, UsartConfig};
use super::error::{ParamError, ResourceError, Result};
use super::serial::{ChannelId, SerialChannel, SerialEvent, SerialEventHandler};
use crate::internal::constants::{SERIAL_BUFFER_SIZE, WAIT_QUANTUM_MS};
use crate::internal::register::RegisterBlock;
use crate::internal::register::usart::UsartReg;
use crate::sync::{Completion, QuantumBudget, RECV_DONE, SEND_DONE, SignalWait, Timeout};

/// Completion pair fed by a channel's interrupt events
pub struct SerialSignals {
    tx: Completion,
    rx: Completion,
}

impl SerialSignals {
    /// Create disarmed completions (const, suitable for statics)
    pub const fn new() -> Self {
        Self {
            tx: Completion::new(),
            rx: Completion::new(),
        }
    }

    /// Transmit-side completion
    pub fn tx(&self) -> &Completion {
        &self.tx
    }

    /// Receive-side completion
    pub fn rx(&self) -> &Completion {
        &self.rx
    }
}

impl Default for SerialSignals {
    fn default() -> Self {
        Self::new()
    }
}

impl SerialEventHandler for SerialSignals {
    fn on_event(&self, _channel: ChannelId, event: SerialEvent) {
        match event {
            SerialEvent::SendComplete => {
                self.tx.signal(SEND_DONE);
            }
            SerialEvent::Received => {
                self.rx.signal(RECV_DONE);
            }
            SerialEvent::Error(_) => {}
        }
    }
}

/// Compiled-in serial devices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SerialDevice {
    /// Debug console
    Console,
}

impl SerialDevice {
    /// Channel the device is wired to
    pub const fn channel(self) -> ChannelId {
        match self {
            SerialDevice::Console => ChannelId::Usart1,
        }
    }

    /// Line settings of the device
    pub const fn config(self) -> UsartConfig {
        match self {
            SerialDevice::Console => UsartConfig::new(),
        }
    }
}

/// Blocking front end of one serial channel
pub struct BlockingSerial<'a, 'h, R, W, const N: usize = SERIAL_BUFFER_SIZE>
where
    R: RegisterBlock<UsartReg>,
    W: SignalWait,
{
    channel: &'a SerialChannel<'h, R, N>,
    signals: &'h SerialSignals,
    waiter: W,
    quantum_ms: u32,
    io_timeout: Timeout,
}

impl<'a, 'h, R, W, const N: usize> BlockingSerial<'a, 'h, R, W, N>
where
    R: RegisterBlock<UsartReg>,
    W: SignalWait,
{
    /// Bind a channel to its signals and a wait strategy
    pub fn new(channel: &'a SerialChannel<'h, R, N>, signals: &'h SerialSignals, waiter: W) -> Self {
        Self {
            channel,
            signals,
            waiter,
            quantum_ms: WAIT_QUANTUM_MS,
            io_timeout: Timeout::Forever,
        }
    }

    /// Set the wait quantum in milliseconds (minimum 1)
    #[must_use]
    pub fn with_quantum_ms(mut self, quantum_ms: u32) -> Self {
        self.quantum_ms = quantum_ms.max(1);
        self
    }

    /// Set the timeout used by the `embedded-io` traits
    #[must_use]
    pub fn with_io_timeout(mut self, timeout: Timeout) -> Self {
        self.io_timeout = timeout;
        self
    }

    /// Timeout used by the `embedded-io` traits
    pub fn io_timeout(&self) -> Timeout {
        self.io_timeout
    }

    /// Underlying channel
    pub fn channel(&self) -> &'a SerialChannel<'h, R, N> {
        self.channel
    }

    /// Wait strategy
    pub fn waiter(&self) -> &W {
        &self.waiter
    }

    /// Open the channel with `config`, routing its events to the signals
    pub fn open(&self, config: UsartConfig) -> Result<()> {
        self.channel.open(config, Some(self.signals))
    }

    /// Open the channel from the device table.
    ///
    /// # Errors
    ///
    /// `InvalidChannel` if `device` is not wired to this channel.
    pub fn open_device(&self, device: SerialDevice) -> Result<()> {
        if device.channel() != self.channel.id() {
            return Err(ParamError::InvalidChannel.into());
        }
        self.open(device.config())
    }

    /// Send all of `data`, waiting for ring space up to `timeout`.
    ///
    /// `Timeout::Millis(0)` enqueues what fits and returns without waiting.
    ///
    /// # Returns
    ///
    /// Bytes enqueued; fewer than `data.len()` if the timeout expired.
    ///
    /// # Errors
    ///
    /// `NotOpen` if the channel is not Open.
    pub fn send(&mut self, data: &[u8], timeout: Timeout) -> Result<usize> {
        let _armed = self.signals.tx.arm();
        let mut budget = QuantumBudget::new(timeout, self.quantum_ms);
        let mut sent = 0;

        loop {
            sent += self.channel.raw_send(&data[sent..])?;
            if sent == data.len() || budget.is_non_blocking() {
                return Ok(sent);
            }
            self.waiter
                .wait(&self.signals.tx, SEND_DONE, budget.quantum());
            if !budget.consume() {
                return Ok(sent);
            }
        }
    }

    /// Receive into `buf`, returning as soon as any bytes are available.
    ///
    /// `Timeout::Millis(0)` returns immediately with what is buffered.
    ///
    /// # Returns
    ///
    /// Bytes copied; 0 if the timeout expired with nothing received.
    ///
    /// # Errors
    ///
    /// `NotOpen` if the channel is not Open.
    pub fn recv(&mut self, buf: &mut [u8], timeout: Timeout) -> Result<usize> {
        let _armed = self.signals.rx.arm();
        let mut budget = QuantumBudget::new(timeout, self.quantum_ms);

        loop {
            let received = self.channel.raw_recv(buf)?;
            if received > 0 || buf.is_empty() || budget.is_non_blocking() {
                return Ok(received);
            }
            self.waiter
                .wait(&self.signals.rx, RECV_DONE, budget.quantum());
            if !budget.consume() {
                return Ok(0);
            }
        }
    }

    /// Wait until the transmit ring has been handed to the hardware.
    ///
    /// # Returns
    ///
    /// `true` once nothing is pending, `false` if the timeout expired first.
    ///
    /// # Errors
    ///
    /// `NotOpen` if the channel is not Open.
    pub fn flush(&mut self, timeout: Timeout) -> Result<bool> {
        if self.channel.state() != State::Open {
            return Err(ResourceError::NotOpen.into());
        }
        let _armed = self.signals.tx.arm();
        let mut budget = QuantumBudget::new(timeout, self.quantum_ms);

        loop {
            if self.channel.tx_pending() == 0 {
                return Ok(true);
            }
            if budget.is_non_blocking() {
                return Ok(false);
            }
            self.waiter
                .wait(&self.signals.tx, SEND_DONE, budget.quantum());
            if !budget.consume() {
                return Ok(self.channel.tx_pending() == 0);
            }
        }
    }
}

//! Interrupt-driven serial channel driver
//!
//! Each [`SerialChannel`] owns one USART register block and a pair of byte
//! rings. Task code enqueues with [`raw_send`](SerialChannel::raw_send) and
//! dequeues with [`raw_recv`](SerialChannel::raw_recv); the USART interrupt
//! moves bytes between the rings and the data registers through
//! [`on_interrupt`](SerialChannel::on_interrupt).
//!
//! Ring mutation happens inside a critical section on both sides. Events are
//! delivered to the installed [`SerialEventHandler`] after the critical
//! section is released.
//!
//! # Example
//!
//! ```ignore
//! static CONSOLE: SerialChannel<'static, Mmio> =
//!     SerialChannel::new(ChannelId::Usart1, unsafe { Mmio::new(USART1_BASE) });
//!
//! CONSOLE.init()?;
//! CONSOLE.open(UsartConfig::new(), Some(&SIGNALS))?;
//!
//! #[interrupt]
//! fn USART1() {
//!     CONSOLE.on_interrupt();
//! }
//! ```

use super::config::{State, UsartConfig};
use super::error::{ParamError, ResourceError, Result};
use crate::internal::constants::{
    SERIAL_BUFFER_SIZE, USART1_KERNEL_CLK_HZ, USART2_KERNEL_CLK_HZ, USART_IRQ_PRIORITY,
};
use crate::internal::register::RegisterBlock;
use crate::internal::register::usart::{
    USART1_BASE, USART1_IRQN, USART2_BASE, USART2_IRQN, UsartReg, cr1, cr3, icr, isr,
};
use crate::internal::ring_buffer::RingBuffer;
use crate::sync::CriticalSectionCell;

// =============================================================================
// Channel Identification
// =============================================================================

/// Serial channel identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelId {
    /// USART1 (console)
    Usart1,
    /// USART2
    Usart2,
}

impl TryFrom<u8> for ChannelId {
    type Error = ParamError;

    fn try_from(value: u8) -> core::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(ChannelId::Usart1),
            1 => Ok(ChannelId::Usart2),
            _ => Err(ParamError::InvalidChannel),
        }
    }
}

impl ChannelId {
    /// Number of channels
    pub const COUNT: usize = 2;

    /// Channel index (0-based)
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            ChannelId::Usart1 => 0,
            ChannelId::Usart2 => 1,
        }
    }

    /// Peripheral base address
    #[must_use]
    pub const fn base_address(self) -> usize {
        match self {
            ChannelId::Usart1 => USART1_BASE,
            ChannelId::Usart2 => USART2_BASE,
        }
    }

    /// NVIC interrupt number
    #[must_use]
    pub const fn irq_number(self) -> u16 {
        match self {
            ChannelId::Usart1 => USART1_IRQN,
            ChannelId::Usart2 => USART2_IRQN,
        }
    }

    /// NVIC priority
    #[must_use]
    pub const fn irq_priority(self) -> u8 {
        USART_IRQ_PRIORITY
    }

    /// Kernel clock feeding the baud rate generator
    #[must_use]
    pub const fn kernel_clock_hz(self) -> u32 {
        match self {
            ChannelId::Usart1 => USART1_KERNEL_CLK_HZ,
            ChannelId::Usart2 => USART2_KERNEL_CLK_HZ,
        }
    }
}

// =============================================================================
// Events
// =============================================================================

/// Line error flags latched by the USART
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineErrors {
    /// Parity error
    pub parity: bool,
    /// Framing error
    pub framing: bool,
    /// Noise detected
    pub noise: bool,
    /// Receive overrun
    pub overrun: bool,
}

impl LineErrors {
    /// Decode from the ISR register
    #[must_use]
    pub const fn from_isr(value: u32) -> Self {
        Self {
            parity: value & isr::PE != 0,
            framing: value & isr::FE != 0,
            noise: value & isr::NF != 0,
            overrun: value & isr::ORE != 0,
        }
    }

    /// ICR value that clears exactly these flags
    #[must_use]
    pub const fn clear_mask(&self) -> u32 {
        let mut mask = 0;
        if self.parity {
            mask |= icr::PECF;
        }
        if self.framing {
            mask |= icr::FECF;
        }
        if self.noise {
            mask |= icr::NCF;
        }
        if self.overrun {
            mask |= icr::ORECF;
        }
        mask
    }

    /// Check if any flag is set
    #[must_use]
    pub const fn any(&self) -> bool {
        self.parity || self.framing || self.noise || self.overrun
    }
}

/// Event raised from interrupt context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SerialEvent {
    /// A byte was moved into the receive ring
    Received,
    /// A byte was moved from the transmit ring to the hardware
    SendComplete,
    /// The USART reported line errors; no data moved
    Error(LineErrors),
}

/// Receiver of channel events.
///
/// Called from interrupt context with no critical section held.
/// Implementations must not block.
pub trait SerialEventHandler: Sync {
    /// Handle one event on `channel`
    fn on_event(&self, channel: ChannelId, event: SerialEvent);
}

/// Per-channel counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SerialStats {
    /// Bytes moved into the receive ring
    pub rx_bytes: u32,
    /// Bytes written to the transmit data register
    pub tx_bytes: u32,
    /// Received bytes lost to overwrite-oldest
    pub rx_overwritten: u32,
    /// Interrupts that reported line errors
    pub line_errors: u32,
}

// =============================================================================
// Channel Driver
// =============================================================================

struct ChannelInner<'a, const N: usize> {
    state: State,
    tx: RingBuffer<N>,
    rx: RingBuffer<N>,
    handler: Option<&'a dyn SerialEventHandler>,
    stats: SerialStats,
}

/// Events collected inside the critical section, dispatched after it.
#[derive(Default)]
struct PendingEvents {
    error: Option<LineErrors>,
    received: bool,
    sent: bool,
}

/// One USART channel with its transmit and receive rings.
///
/// `N` is the capacity of each ring and must be a power of two.
pub struct SerialChannel<'a, R, const N: usize = SERIAL_BUFFER_SIZE>
where
    R: RegisterBlock<UsartReg>,
{
    id: ChannelId,
    regs: R,
    inner: CriticalSectionCell<ChannelInner<'a, N>>,
}

impl<'a, R, const N: usize> SerialChannel<'a, R, N>
where
    R: RegisterBlock<UsartReg>,
{
    /// Create an uninitialized channel (const, suitable for statics)
    pub const fn new(id: ChannelId, regs: R) -> Self {
        Self {
            id,
            regs,
            inner: CriticalSectionCell::new(ChannelInner {
                state: State::Uninitialized,
                tx: RingBuffer::new(),
                rx: RingBuffer::new(),
                handler: None,
                stats: SerialStats {
                    rx_bytes: 0,
                    tx_bytes: 0,
                    rx_overwritten: 0,
                    line_errors: 0,
                },
            }),
        }
    }

    /// Channel identifier
    #[inline]
    pub const fn id(&self) -> ChannelId {
        self.id
    }

    /// Current lifecycle state
    pub fn state(&self) -> State {
        self.inner.with_ref(|inner| inner.state)
    }

    /// Snapshot of the channel counters
    pub fn stats(&self) -> SerialStats {
        self.inner.with_ref(|inner| inner.stats)
    }

    /// Bytes waiting in the transmit ring
    pub fn tx_pending(&self) -> usize {
        self.inner.with_ref(|inner| inner.tx.len())
    }

    /// Bytes waiting in the receive ring
    pub fn rx_available(&self) -> usize {
        self.inner.with_ref(|inner| inner.rx.len())
    }

    /// Bring the channel from Uninitialized to Closed.
    ///
    /// Calling it again on a Closed channel is a no-op.
    ///
    /// # Errors
    ///
    /// `NotClosed` if the channel is already Open.
    pub fn init(&self) -> Result<()> {
        self.inner.with(|inner| match inner.state {
            State::Open => Err(ResourceError::NotClosed.into()),
            State::Uninitialized | State::Closed => {
                inner.tx.clear();
                inner.rx.clear();
                inner.state = State::Closed;
                Ok(())
            }
        })
    }

    /// Program the USART and start interrupt-driven transfer.
    ///
    /// Parameters are validated before the state is checked.
    ///
    /// # Errors
    ///
    /// - `InvalidBaudRate` if the baud rate cannot be generated
    /// - `NotClosed` if the channel is not Closed
    pub fn open(
        &self,
        config: UsartConfig,
        handler: Option<&'a dyn SerialEventHandler>,
    ) -> Result<()> {
        let brr = config.brr(self.id.kernel_clock_hz())?;

        self.inner.with(|inner| -> Result<()> {
            if inner.state != State::Closed {
                return Err(ResourceError::NotClosed.into());
            }

            self.regs.clear_bits(UsartReg::Cr1, cr1::UE);
            self.regs.write(UsartReg::Brr, brr);
            self.regs.write(
                UsartReg::Cr1,
                config.cr1_bits() | cr1::PEIE | cr1::RXNEIE,
            );
            self.regs.write(UsartReg::Cr2, config.cr2_bits());
            self.regs.write(UsartReg::Cr3, cr3::EIE);
            self.regs.write(
                UsartReg::Icr,
                icr::PECF | icr::FECF | icr::NCF | icr::ORECF | icr::TCCF,
            );
            self.regs
                .set_bits(UsartReg::Cr1, cr1::UE | cr1::RE | cr1::TE);

            inner.handler = handler;
            inner.stats = SerialStats::default();
            inner.state = State::Open;
            Ok(())
        })?;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "serial {} open: baud={} brr={=u32:#x}",
            self.id,
            config.baud_rate,
            brr
        );

        Ok(())
    }

    /// Shut the channel down.
    ///
    /// Whether pending bytes should be drained or discarded is undecided,
    /// so the operation is refused and the channel is left untouched.
    ///
    /// # Errors
    ///
    /// Always `NotSupported`.
    pub fn close(&self) -> Result<()> {
        Err(ResourceError::NotSupported.into())
    }

    /// Enqueue as many bytes of `data` as fit in the transmit ring.
    ///
    /// Never overwrites queued bytes. Enables the transmit-empty interrupt
    /// when at least one byte was accepted.
    ///
    /// # Returns
    ///
    /// Number of bytes accepted, possibly fewer than `data.len()`.
    ///
    /// # Errors
    ///
    /// `NotOpen` if the channel is not Open.
    pub fn raw_send(&self, data: &[u8]) -> Result<usize> {
        self.inner.with(|inner| {
            if inner.state != State::Open {
                return Err(ResourceError::NotOpen.into());
            }
            let accepted = inner.tx.extend_from_slice(data);
            if accepted > 0 {
                self.regs.set_bits(UsartReg::Cr1, cr1::TXEIE);
            }
            Ok(accepted)
        })
    }

    /// Move up to `buf.len()` received bytes into `buf`.
    ///
    /// # Returns
    ///
    /// Number of bytes copied; 0 if the receive ring is empty.
    ///
    /// # Errors
    ///
    /// `NotOpen` if the channel is not Open.
    pub fn raw_recv(&self, buf: &mut [u8]) -> Result<usize> {
        self.inner.with(|inner| {
            if inner.state != State::Open {
                return Err(ResourceError::NotOpen.into());
            }
            Ok(inner.rx.pop_up_to(buf))
        })
    }

    /// USART interrupt service routine body.
    ///
    /// Line errors are cleared and reported without touching the data
    /// registers. Otherwise one received byte is pushed (overwriting the
    /// oldest byte when the ring is full) and one queued byte is written
    /// out; the transmit-empty interrupt is disabled once the ring drains.
    pub fn on_interrupt(&self) {
        let (handler, events) = self.inner.with(|inner| {
            let mut events = PendingEvents::default();
            if inner.state != State::Open {
                return (None, events);
            }

            let status = self.regs.read(UsartReg::Isr);
            let errors = LineErrors::from_isr(status);
            if errors.any() {
                self.regs.write(UsartReg::Icr, errors.clear_mask());
                inner.stats.line_errors = inner.stats.line_errors.wrapping_add(1);
                events.error = Some(errors);
                return (inner.handler, events);
            }

            if status & isr::RXNE != 0 {
                let byte = self.regs.read(UsartReg::Rdr) as u8;
                if inner.rx.push(byte) {
                    inner.stats.rx_overwritten = inner.stats.rx_overwritten.wrapping_add(1);
                }
                inner.stats.rx_bytes = inner.stats.rx_bytes.wrapping_add(1);
                events.received = true;
            }

            let control = self.regs.read(UsartReg::Cr1);
            if status & isr::TXE != 0 && control & cr1::TXEIE != 0 {
                if let Some(byte) = inner.tx.pop() {
                    self.regs.write(UsartReg::Tdr, u32::from(byte));
                    inner.stats.tx_bytes = inner.stats.tx_bytes.wrapping_add(1);
                    events.sent = true;
                }
                if inner.tx.is_empty() {
                    self.regs.clear_bits(UsartReg::Cr1, cr1::TXEIE);
                }
            }

            (inner.handler, events)
        });

        let Some(handler) = handler else {
            return;
        };
        if let Some(errors) = events.error {
            handler.on_event(self.id, SerialEvent::Error(errors));
        }
        if events.received {
            handler.on_event(self.id, SerialEvent::Received);
        }
        if events.sent {
            handler.on_event(self.id, SerialEvent::SendComplete);
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

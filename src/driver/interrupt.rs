//! Ethernet DMA interrupt dispatch.
//!
//! [`EthInterruptStatus`] decodes the DMA status register and
//! [`EthInterruptHandler`] turns it into completion signals for the task
//! blocked in [`EthTransport::transmit`](super::eth::EthTransport::transmit).

use crate::internal::register::RegisterBlock;
use crate::internal::register::eth::{EthReg, dmasr};
use crate::sync::{Completion, TX_BUFFER_UNAVAILABLE, TX_COMPLETE, TX_FAILED};

// =============================================================================
// Interrupt Status
// =============================================================================

/// Interrupt status flags parsed from the DMA status register.
///
/// # Example
///
/// ```ignore
/// let status = EthInterruptStatus::from_raw(raw);
/// if status.has_error() {
///     // Fatal bus error, abort the frame
/// }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EthInterruptStatus {
    /// TX complete - frame transmitted
    pub tx_complete: bool,
    /// TX process stopped
    pub tx_stopped: bool,
    /// TX buffer unavailable - DMA reached a descriptor it does not own
    pub tx_buf_unavailable: bool,
    /// TX underflow - TX FIFO ran empty mid-frame
    pub tx_underflow: bool,
    /// RX complete
    pub rx_complete: bool,
    /// Fatal bus error - DMA stopped on an AHB error
    pub fatal_bus_error: bool,
    /// Error bits field (EBS), non-zero after a bus error
    pub error_bits: u8,
    /// Normal interrupt summary
    pub normal_summary: bool,
    /// Abnormal interrupt summary
    pub abnormal_summary: bool,
}

impl EthInterruptStatus {
    /// Create from raw DMA status register value
    #[inline]
    pub fn from_raw(status: u32) -> Self {
        Self {
            tx_complete: (status & dmasr::TS) != 0,
            tx_stopped: (status & dmasr::TPSS) != 0,
            tx_buf_unavailable: (status & dmasr::TBUS) != 0,
            tx_underflow: (status & dmasr::TUS) != 0,
            rx_complete: (status & dmasr::RS) != 0,
            fatal_bus_error: (status & dmasr::FBES) != 0,
            error_bits: ((status & dmasr::EBS_MASK) >> dmasr::EBS_SHIFT) as u8,
            normal_summary: (status & dmasr::NIS) != 0,
            abnormal_summary: (status & dmasr::AIS) != 0,
        }
    }

    /// Write-1-to-clear value acknowledging every set flag.
    ///
    /// The error bits field is read-only and never included.
    #[inline]
    pub fn to_raw(&self) -> u32 {
        let mut val = 0u32;
        if self.tx_complete {
            val |= dmasr::TS;
        }
        if self.tx_stopped {
            val |= dmasr::TPSS;
        }
        if self.tx_buf_unavailable {
            val |= dmasr::TBUS;
        }
        if self.tx_underflow {
            val |= dmasr::TUS;
        }
        if self.rx_complete {
            val |= dmasr::RS;
        }
        if self.fatal_bus_error {
            val |= dmasr::FBES;
        }
        if self.normal_summary {
            val |= dmasr::NIS;
        }
        if self.abnormal_summary {
            val |= dmasr::AIS;
        }
        val
    }

    /// Check if any interrupt occurred (excluding summary bits)
    #[inline]
    pub fn any(&self) -> bool {
        self.tx_complete
            || self.tx_stopped
            || self.tx_buf_unavailable
            || self.tx_underflow
            || self.rx_complete
            || self.fatal_bus_error
    }

    /// Check if the engine reported a transfer-abort condition
    #[inline]
    pub fn has_error(&self) -> bool {
        self.fatal_bus_error || self.error_bits != 0
    }

    /// Completion bits to raise for this status.
    ///
    /// An error suppresses every success indication.
    #[inline]
    pub fn completion_bits(&self) -> u32 {
        if self.has_error() {
            return TX_FAILED;
        }
        let mut bits = 0;
        if self.tx_complete {
            bits |= TX_COMPLETE;
        }
        if self.tx_buf_unavailable {
            bits |= TX_BUFFER_UNAVAILABLE;
        }
        bits
    }
}

// =============================================================================
// Interrupt Handler
// =============================================================================

/// Ethernet interrupt service routine body.
///
/// ```ignore
/// static TX_DONE: Completion = Completion::new();
///
/// #[interrupt]
/// fn ETH() {
///     let regs = unsafe { Mmio::new(ETH_BASE) };
///     EthInterruptHandler::new(regs, &TX_DONE).on_interrupt();
/// }
/// ```
pub struct EthInterruptHandler<'a, R: RegisterBlock<EthReg>> {
    regs: R,
    completion: &'a Completion,
}

impl<'a, R: RegisterBlock<EthReg>> EthInterruptHandler<'a, R> {
    /// Bind the register block to the transmitter's completion
    pub const fn new(regs: R, completion: &'a Completion) -> Self {
        Self { regs, completion }
    }

    /// Acknowledge pending DMA status and signal the transmitter.
    ///
    /// # Returns
    ///
    /// The decoded status, for callers that want to log or count it.
    pub fn on_interrupt(&self) -> EthInterruptStatus {
        let status = EthInterruptStatus::from_raw(self.regs.read(EthReg::DmaSr));
        let ack = status.to_raw();
        if ack != 0 {
            self.regs.write(EthReg::DmaSr, ack);
        }

        let bits = status.completion_bits();
        if bits != 0 {
            self.completion.signal(bits);
        }
        status
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

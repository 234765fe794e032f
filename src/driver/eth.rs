//! Ethernet frame transmitter
//!
//! [`EthTransport`] owns the Ethernet register block and a chain of transmit
//! descriptors. [`transmit`](EthTransport::transmit) splits a frame into
//! segments of at most [`MAX_SEGMENT`] bytes, hands them to the DMA engine
//! in batches no larger than the ring, and blocks until the engine reports
//! completion or failure through [`EthInterruptHandler`].
//!
//! Frame buffers and the descriptor list must live in memory the DMA sees
//! coherently. No cache maintenance is done here.
//!
//! # Example
//!
//! ```ignore
//! static TX_DESC: TxDescriptors<TX_DESCRIPTOR_COUNT> = TxDescriptors::new();
//! static TX_DONE: Completion = Completion::new();
//!
//! let regs = unsafe { Mmio::new(ETH_BASE) };
//! let mut eth = EthTransport::new(regs, &TX_DESC, &TX_DONE, DelayWait::new(delay));
//! eth.open(EthConfig::new().with_mac_address(mac))?;
//! eth.transmit(&frame)?;
//! ```
//!
//! [`EthInterruptHandler`]: super::interrupt::EthInterruptHandler

use core::hint::spin_loop;
use core::sync::atomic::{Ordering, fence};

use super::config::{Duplex, EthConfig, State};
use super::error::{DmaError, ParamError, ResourceError, Result};
use crate::hal::mdio::MdioController;
use crate::internal::constants::{DMA_RESET_RETRIES, MAX_SEGMENT, TX_DESCRIPTOR_COUNT};
use crate::internal::dma::{DescriptorRing, TxDescriptor, TxDescriptors};
use crate::internal::register::RegisterBlock;
use crate::internal::register::eth::{
    EthReg, dmabmr, dmaier, dmaomr, dmasr, maccr, mmc_mask, mmccr, ptptscr,
};
use crate::sync::{Completion, SignalWait, TX_BUFFER_UNAVAILABLE, TX_COMPLETE, TX_FAILED, Timeout};

/// Transmit counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EthStats {
    /// Frames whose last segment completed
    pub frames_sent: u32,
    /// Descriptors the DMA engine handed back
    pub segments_sent: u32,
    /// Transfers aborted on a fatal bus error
    pub fatal_errors: u32,
    /// Frames the engine reported with an error summary
    pub frame_errors: u32,
    /// TDES0 error flags of the last failed frame
    pub last_error_flags: u32,
}

/// Ethernet MAC and transmit DMA driver.
///
/// # Type Parameters
///
/// * `R` - Register block, usually [`Mmio`](crate::internal::register::Mmio)
/// * `W` - Wait strategy used while the DMA engine works
/// * `N` - Number of transmit descriptors
pub struct EthTransport<'a, R, W, const N: usize = TX_DESCRIPTOR_COUNT>
where
    R: RegisterBlock<EthReg>,
    W: SignalWait,
{
    regs: R,
    descriptors: &'a TxDescriptors<N>,
    ring: DescriptorRing<'a, TxDescriptor, N>,
    completion: &'a Completion,
    waiter: W,
    state: State,
    config: EthConfig,
    stats: EthStats,
}

impl<'a, R, W, const N: usize> EthTransport<'a, R, W, N>
where
    R: RegisterBlock<EthReg>,
    W: SignalWait,
{
    /// Create a closed transmitter.
    ///
    /// `completion` must be the one the Ethernet interrupt handler signals.
    pub fn new(
        regs: R,
        descriptors: &'a TxDescriptors<N>,
        completion: &'a Completion,
        waiter: W,
    ) -> Self {
        Self {
            regs,
            descriptors,
            ring: DescriptorRing::new(descriptors.as_array()),
            completion,
            waiter,
            state: State::Closed,
            config: EthConfig::new(),
            stats: EthStats::default(),
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> State {
        self.state
    }

    /// Configuration applied by the last successful [`open`](Self::open)
    pub fn config(&self) -> &EthConfig {
        &self.config
    }

    /// Transmit counters
    pub fn stats(&self) -> EthStats {
        self.stats
    }

    /// Index of the descriptor the next frame starts at
    pub fn cursor(&self) -> usize {
        self.ring.current_index()
    }

    /// Access the wait strategy
    pub fn waiter(&self) -> &W {
        &self.waiter
    }

    /// MDIO controller sharing this transmitter's register block.
    ///
    /// The MDC divider follows the configured HCLK.
    pub fn mdio(&self) -> MdioController<&R> {
        MdioController::for_hclk(&self.regs, self.config.hclk_hz)
    }

    // =========================================================================
    // Open
    // =========================================================================

    /// Reset the DMA engine and bring up the MAC.
    ///
    /// # Errors
    ///
    /// - The configuration's own validation errors, before any register access
    /// - [`ResourceError::NotClosed`] if already open
    pub fn open(&mut self, config: EthConfig) -> Result<()> {
        config.validate()?;
        if self.state != State::Closed {
            return Err(ResourceError::NotClosed.into());
        }

        self.software_reset();

        self.descriptors.chain();
        self.ring.reset();
        self.regs.write(EthReg::DmaTdlar, self.ring.base_addr_u32());
        self.regs
            .write(EthReg::DmaBmr, dmabmr::FB | dmabmr::AAB | dmabmr::PBL_16);

        self.configure_mac(&config);
        self.configure_counters(&config);

        // Drop anything latched before the interrupt is enabled
        self.regs.write(EthReg::DmaSr, dmasr::W1C_MASK);
        self.regs.write(
            EthReg::DmaIer,
            dmaier::NISE | dmaier::AISE | dmaier::TIE | dmaier::TBUIE | dmaier::FBEIE,
        );
        self.regs.set_bits(EthReg::MacCr, maccr::TE | maccr::RE);

        self.config = config;
        self.state = State::Open;

        #[cfg(feature = "defmt")]
        defmt::info!(
            "ETH open: mac={:x} loopback={}",
            &self.config.mac_address[..],
            self.config.loopback
        );

        Ok(())
    }

    /// Soft-reset the DMA engine, waiting a bounded number of polls.
    ///
    /// A reset that never completes is logged and otherwise ignored; the
    /// engine usually still accepts configuration afterwards.
    fn software_reset(&self) {
        self.regs.set_bits(EthReg::DmaBmr, dmabmr::SR);

        for _ in 0..DMA_RESET_RETRIES {
            if !self.regs.is_set(EthReg::DmaBmr, dmabmr::SR) {
                return;
            }
            spin_loop();
        }

        #[cfg(feature = "defmt")]
        defmt::warn!("ETH DMA reset did not complete, continuing");
    }

    fn configure_mac(&self, config: &EthConfig) {
        let mut cr = maccr::CSTF | maccr::IPCO | maccr::APCS | maccr::FES;
        if config.loopback {
            cr |= maccr::LM | maccr::ROD;
        }
        if config.duplex == Duplex::Full {
            cr |= maccr::DM;
        }
        self.regs.write(EthReg::MacCr, cr);

        for reg in [
            EthReg::MacFfr,
            EthReg::MacHthr,
            EthReg::MacHtlr,
            EthReg::MacFcr,
            EthReg::MacVlantr,
            EthReg::MacPmtcsr,
        ] {
            self.regs.write(reg, 0);
        }

        let mac = &config.mac_address;
        self.regs.write(
            EthReg::MacA0hr,
            (u32::from(mac[5]) << 8) | u32::from(mac[4]),
        );
        self.regs.write(
            EthReg::MacA0lr,
            (u32::from(mac[3]) << 24)
                | (u32::from(mac[2]) << 16)
                | (u32::from(mac[1]) << 8)
                | u32::from(mac[0]),
        );
    }

    fn configure_counters(&self, config: &EthConfig) {
        if config.mmc_counters {
            self.regs.write(EthReg::MmcCr, mmccr::CR | mmccr::ROR);
            self.regs.write(EthReg::MmcRimr, mmc_mask::RX_ALL);
            self.regs.write(EthReg::MmcTimr, mmc_mask::TX_ALL);
        }
        if config.timestamping {
            self.regs.write(
                EthReg::PtpTscr,
                ptptscr::TSE
                    | ptptscr::TSSIPV4FE
                    | ptptscr::TSSEME
                    | ptptscr::TSSMRME
                    | ptptscr::TSPFFMAE,
            );
        }
    }

    // =========================================================================
    // Transmit
    // =========================================================================

    /// Send one frame and block until the DMA engine finishes it.
    ///
    /// The frame is split into segments of at most [`MAX_SEGMENT`] bytes.
    /// When it needs more segments than the ring holds, each full batch is
    /// submitted and the call waits for the engine to drain it before
    /// reusing the descriptors. The wait has no timeout.
    ///
    /// `frame` must stay in DMA-visible memory; it is borrowed for the whole
    /// call and no descriptor refers to it afterwards.
    ///
    /// # Errors
    ///
    /// - [`ParamError::EmptyBuffer`] for an empty frame
    /// - [`ResourceError::NotOpen`] before [`open`](Self::open)
    /// - [`DmaError::DescriptorBusy`] if the next descriptor is still owned
    ///   by the engine
    /// - [`DmaError::FatalBusError`] if the engine aborted; the ring is reset
    /// - [`DmaError::FrameError`] if the engine wrote back an error summary
    ///   for the frame; the ring stays usable
    pub fn transmit(&mut self, frame: &[u8]) -> Result<()> {
        if frame.is_empty() {
            return Err(ParamError::EmptyBuffer.into());
        }
        if self.state != State::Open {
            return Err(ResourceError::NotOpen.into());
        }
        if self.ring.current().is_owned() {
            return Err(DmaError::DescriptorBusy.into());
        }

        let completion = self.completion;
        let _armed = completion.arm();

        let total = frame.len().div_ceil(MAX_SEGMENT);
        let mut segments = frame.chunks(MAX_SEGMENT).enumerate().peekable();

        while segments.peek().is_some() {
            let start = self.ring.current_index();
            let mut batch = 0;

            while batch < N {
                let Some((index, segment)) = segments.next() else {
                    break;
                };
                self.ring
                    .current()
                    .prepare(segment, index == 0, index + 1 == total);
                self.ring.advance();
                batch += 1;
            }

            self.submit(start, batch);

            let last_batch = segments.peek().is_none();
            let mask = if last_batch {
                TX_COMPLETE | TX_FAILED
            } else {
                TX_BUFFER_UNAVAILABLE | TX_COMPLETE | TX_FAILED
            };

            self.wait_released(start, batch, mask)?;
            self.stats.segments_sent = self.stats.segments_sent.wrapping_add(batch as u32);
        }

        // Status is written back to the frame's last descriptor
        let last = self.ring.get(self.ring.current_index() + N - 1);
        if last.has_error() {
            self.stats.frame_errors = self.stats.frame_errors.wrapping_add(1);
            self.stats.last_error_flags = last.error_flags();

            #[cfg(feature = "defmt")]
            defmt::warn!("ETH frame error: flags={=u32:#x}", self.stats.last_error_flags);

            return Err(DmaError::FrameError.into());
        }

        self.stats.frames_sent = self.stats.frames_sent.wrapping_add(1);
        Ok(())
    }

    /// Hand `count` prepared descriptors starting at `start` to the engine.
    ///
    /// The batch's last descriptor is released last, then the engine is
    /// started and polled.
    fn submit(&self, start: usize, count: usize) {
        // Buffer fields must land before OWN, and OWN before the poll demand
        fence(Ordering::SeqCst);
        for offset in 0..count {
            self.ring.get(start + offset).set_owned();
        }
        fence(Ordering::SeqCst);

        self.regs.set_bits(EthReg::DmaOmr, dmaomr::ST);
        self.regs.write(EthReg::DmaTpdr, 0);
    }

    /// Block until the engine has handed back all `count` descriptors from
    /// `start`.
    ///
    /// A wake-up only prompts a recheck; descriptors still owned by the
    /// engine mean the batch has not drained and the task waits again.
    fn wait_released(&mut self, start: usize, count: usize, mask: u32) -> Result<()> {
        loop {
            let bits = self.wait_forever(mask);
            if bits & TX_FAILED != 0 {
                self.abort();
                return Err(DmaError::FatalBusError.into());
            }

            fence(Ordering::SeqCst);
            if (0..count).all(|offset| !self.ring.get(start + offset).is_owned()) {
                return Ok(());
            }
        }
    }

    fn wait_forever(&mut self, mask: u32) -> u32 {
        loop {
            if let Some(bits) = self.waiter.wait(self.completion, mask, Timeout::Forever) {
                return bits;
            }
        }
    }

    /// Stop the engine and return every descriptor to the CPU.
    fn abort(&mut self) {
        self.regs.clear_bits(EthReg::DmaOmr, dmaomr::ST);
        for desc in self.descriptors.as_array() {
            desc.reset();
        }
        self.ring.reset();
        self.regs.write(EthReg::DmaTdlar, self.ring.base_addr_u32());
        self.stats.fatal_errors = self.stats.fatal_errors.wrapping_add(1);

        #[cfg(feature = "defmt")]
        defmt::error!("ETH DMA fatal bus error, transmit ring reset");
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::driver::interrupt::EthInterruptHandler;
    use crate::hal::mdio::MdioBus;
    use crate::internal::dma::bits::tdes0;
    use crate::testing::{MockEthRegs, MockWaiter};
    use core::cell::RefCell;
    use std::vec;
    use std::vec::Vec;

    /// Snapshot of a descriptor as the engine consumed it
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Consumed {
        len: usize,
        first: bool,
        last: bool,
        ioc: bool,
    }

    /// Scripted deviations of the simulated engine, by 1-based wait number
    #[derive(Debug, Clone, Copy, Default)]
    struct Script {
        /// Raise TBUS without consuming any descriptor
        stale_tbu_on: Option<usize>,
        /// Abort with a fatal bus error without consuming any descriptor
        fail_on: Option<usize>,
        /// TDES0 bits written back to a frame's last descriptor
        write_back: u32,
    }

    /// Hook standing in for the DMA engine and its interrupt.
    ///
    /// Unless the script says otherwise, each call consumes every owned
    /// descriptor in ring order, raises the matching status and runs the
    /// interrupt handler.
    fn dma_engine<'a, const N: usize>(
        regs: &'a MockEthRegs,
        descs: &'a TxDescriptors<N>,
        completion: &'a Completion,
        consumed: &'a RefCell<Vec<Consumed>>,
        script: Script,
    ) -> impl FnMut() + 'a {
        let mut next = 0usize;
        let mut call = 0usize;
        move || {
            call += 1;
            let status = if script.fail_on == Some(call) {
                dmasr::FBES | dmasr::AIS | (1 << dmasr::EBS_SHIFT)
            } else if script.stale_tbu_on == Some(call) {
                dmasr::TBUS | dmasr::NIS
            } else {
                let ring = descs.as_array();
                let mut completed = false;
                while ring[next].is_owned() {
                    let desc = &ring[next];
                    consumed.borrow_mut().push(Consumed {
                        len: desc.buffer_len(),
                        first: desc.is_first(),
                        last: desc.is_last(),
                        ioc: desc.interrupt_on_completion(),
                    });
                    if desc.is_last() {
                        completed = true;
                        desc.write_back_status((desc.raw_tdes0() & !tdes0::OWN) | script.write_back);
                    } else {
                        desc.clear_owned();
                    }
                    next = (next + 1) % N;
                }
                if completed {
                    dmasr::TS | dmasr::TBUS | dmasr::NIS
                } else {
                    dmasr::TBUS | dmasr::NIS
                }
            };
            regs.raise_dma_status(status);
            EthInterruptHandler::new(regs, completion).on_interrupt();
        }
    }

    fn open_transport<'a, W: SignalWait, const N: usize>(
        regs: &'a MockEthRegs,
        descs: &'a TxDescriptors<N>,
        completion: &'a Completion,
        waiter: W,
    ) -> EthTransport<'a, &'a MockEthRegs, W, N> {
        let mut eth = EthTransport::new(regs, descs, completion, waiter);
        eth.open(EthConfig::new()).unwrap();
        eth
    }

    #[test]
    fn open_programs_dma_and_mac() {
        let regs = MockEthRegs::new();
        let descs: TxDescriptors<6> = TxDescriptors::new();
        let completion = Completion::new();
        let eth = open_transport(&regs, &descs, &completion, MockWaiter::idle());

        assert_eq!(eth.state(), State::Open);
        assert_eq!(
            regs.get(EthReg::DmaTdlar),
            descs.as_array().as_ptr() as u32
        );
        assert_eq!(
            regs.get(EthReg::DmaBmr),
            dmabmr::FB | dmabmr::AAB | dmabmr::PBL_16
        );

        let cr = regs.get(EthReg::MacCr);
        for bit in [maccr::LM, maccr::ROD, maccr::DM, maccr::TE, maccr::RE, maccr::CSTF] {
            assert_ne!(cr & bit, 0);
        }

        // 02:00:00:00:00:01
        assert_eq!(regs.get(EthReg::MacA0hr), 0x0100);
        assert_eq!(regs.get(EthReg::MacA0lr), 0x0000_0002);
        assert_eq!(regs.get(EthReg::MmcCr), mmccr::CR | mmccr::ROR);
        assert_ne!(regs.get(EthReg::PtpTscr) & ptptscr::TSE, 0);
        assert_eq!(
            regs.get(EthReg::DmaIer),
            dmaier::NISE | dmaier::AISE | dmaier::TIE | dmaier::TBUIE | dmaier::FBEIE
        );

        // Descriptors are chained into a ring
        let ring = descs.as_array();
        assert_eq!(ring[5].next_desc_addr(), &ring[0] as *const _ as u32);
    }

    #[test]
    fn open_without_loopback_or_counters() {
        let regs = MockEthRegs::new();
        let descs: TxDescriptors<4> = TxDescriptors::new();
        let completion = Completion::new();
        let mut eth = EthTransport::new(&regs, &descs, &completion, MockWaiter::idle());

        let config = EthConfig::new()
            .with_loopback(false)
            .with_duplex(Duplex::Half)
            .with_mmc_counters(false)
            .with_timestamping(false);
        eth.open(config).unwrap();

        let cr = regs.get(EthReg::MacCr);
        assert_eq!(cr & (maccr::LM | maccr::ROD | maccr::DM), 0);
        assert!(!regs.write_log().iter().any(|(reg, _)| *reg == EthReg::MmcCr));
        assert!(!regs.write_log().iter().any(|(reg, _)| *reg == EthReg::PtpTscr));
    }

    #[test]
    fn open_twice_is_rejected() {
        let regs = MockEthRegs::new();
        let descs: TxDescriptors<4> = TxDescriptors::new();
        let completion = Completion::new();
        let mut eth = open_transport(&regs, &descs, &completion, MockWaiter::idle());

        assert_eq!(
            eth.open(EthConfig::new()),
            Err(ResourceError::NotClosed.into())
        );
    }

    #[test]
    fn invalid_config_touches_nothing() {
        let regs = MockEthRegs::new();
        let descs: TxDescriptors<4> = TxDescriptors::new();
        let completion = Completion::new();
        let mut eth = EthTransport::new(&regs, &descs, &completion, MockWaiter::idle());

        let config = EthConfig::new().with_mac_address([0x01, 0, 0, 0, 0, 1]);
        assert_eq!(
            eth.open(config),
            Err(ParamError::InvalidMacAddress.into())
        );
        assert!(regs.write_log().is_empty());
        assert_eq!(eth.state(), State::Closed);
    }

    #[test]
    fn stuck_dma_reset_still_opens() {
        let regs = MockEthRegs::new();
        regs.set_dma_reset_stuck(true);
        let descs: TxDescriptors<4> = TxDescriptors::new();
        let completion = Completion::new();
        let mut eth = EthTransport::new(&regs, &descs, &completion, MockWaiter::idle());

        eth.open(EthConfig::new()).unwrap();
        assert_eq!(eth.state(), State::Open);
        // One read for the set, then the bounded poll
        assert_eq!(regs.dmabmr_reads(), 1 + DMA_RESET_RETRIES);
    }

    #[test]
    fn transmit_checks_arguments_first() {
        let regs = MockEthRegs::new();
        let descs: TxDescriptors<4> = TxDescriptors::new();
        let completion = Completion::new();
        let mut eth = EthTransport::new(&regs, &descs, &completion, MockWaiter::idle());

        assert_eq!(eth.transmit(&[]), Err(ParamError::EmptyBuffer.into()));
        assert_eq!(eth.transmit(&[0u8; 60]), Err(ResourceError::NotOpen.into()));
        assert_eq!(regs.tpdr_writes(), 0);
    }

    #[test]
    fn transmit_splits_frame_into_two_segments() {
        let regs = MockEthRegs::new();
        let descs: TxDescriptors<6> = TxDescriptors::new();
        let completion = Completion::new();
        let consumed = RefCell::new(Vec::new());
        let waiter = MockWaiter::new(dma_engine(&regs, &descs, &completion, &consumed, Script::default()));
        let mut eth = open_transport(&regs, &descs, &completion, waiter);

        let frame = vec![0xA5u8; 2000];
        eth.transmit(&frame).unwrap();

        assert_eq!(
            *consumed.borrow(),
            [
                Consumed { len: 1504, first: true, last: false, ioc: false },
                Consumed { len: 496, first: false, last: true, ioc: true },
            ]
        );
        let ring = descs.as_array();
        assert_eq!(ring[0].buffer_addr(), frame.as_ptr() as u32);
        assert_eq!(ring[1].buffer_addr(), frame[1504..].as_ptr() as u32);

        assert_eq!(eth.waiter().timeouts(), [Timeout::Forever]);
        assert_eq!(regs.tpdr_writes(), 1);
        assert_ne!(regs.get(EthReg::DmaOmr) & dmaomr::ST, 0);
        assert_eq!(eth.cursor(), 2);
        assert_eq!(
            eth.stats(),
            EthStats { frames_sent: 1, segments_sent: 2, ..EthStats::default() }
        );
    }

    #[test]
    fn single_segment_frame_carries_all_flags() {
        let regs = MockEthRegs::new();
        let descs: TxDescriptors<6> = TxDescriptors::new();
        let completion = Completion::new();
        let consumed = RefCell::new(Vec::new());
        let waiter = MockWaiter::new(dma_engine(&regs, &descs, &completion, &consumed, Script::default()));
        let mut eth = open_transport(&regs, &descs, &completion, waiter);

        eth.transmit(&[0u8; MAX_SEGMENT]).unwrap();

        assert_eq!(
            *consumed.borrow(),
            [Consumed { len: MAX_SEGMENT, first: true, last: true, ioc: true }]
        );
        assert_eq!(descs.as_array()[0].raw_tdes0() & tdes0::OWN, 0);
    }

    #[test]
    fn frame_larger_than_ring_is_sent_in_batches() {
        let regs = MockEthRegs::new();
        let descs: TxDescriptors<2> = TxDescriptors::new();
        let completion = Completion::new();
        let consumed = RefCell::new(Vec::new());
        let waiter = MockWaiter::new(dma_engine(&regs, &descs, &completion, &consumed, Script::default()));
        let mut eth = open_transport(&regs, &descs, &completion, waiter);

        // 1504 * 3 + 488
        eth.transmit(&[0u8; 5000]).unwrap();

        let lens: Vec<usize> = consumed.borrow().iter().map(|c| c.len).collect();
        assert_eq!(lens, [1504, 1504, 1504, 488]);
        let flags: Vec<(bool, bool)> = consumed.borrow().iter().map(|c| (c.first, c.last)).collect();
        assert_eq!(flags, [(true, false), (false, false), (false, false), (false, true)]);

        assert_eq!(eth.waiter().calls(), 2);
        assert_eq!(regs.tpdr_writes(), 2);
        assert_eq!(eth.stats().segments_sent, 4);
        assert_eq!(eth.stats().frames_sent, 1);
        assert_eq!(eth.cursor(), 0);
    }

    #[test]
    fn next_frame_starts_where_previous_ended() {
        let regs = MockEthRegs::new();
        let descs: TxDescriptors<6> = TxDescriptors::new();
        let completion = Completion::new();
        let consumed = RefCell::new(Vec::new());
        let waiter = MockWaiter::new(dma_engine(&regs, &descs, &completion, &consumed, Script::default()));
        let mut eth = open_transport(&regs, &descs, &completion, waiter);

        eth.transmit(&[1u8; 2000]).unwrap();
        eth.transmit(&[2u8; 64]).unwrap();

        assert_eq!(eth.cursor(), 3);
        let ring = descs.as_array();
        assert!(ring[2].is_first() && ring[2].is_last());
        assert_eq!(ring[2].buffer_len(), 64);
    }

    #[test]
    fn owned_descriptor_reports_busy() {
        let regs = MockEthRegs::new();
        let descs: TxDescriptors<4> = TxDescriptors::new();
        let completion = Completion::new();
        let mut eth = open_transport(&regs, &descs, &completion, MockWaiter::idle());

        descs.as_array()[0].set_owned();
        assert_eq!(
            eth.transmit(&[0u8; 60]),
            Err(DmaError::DescriptorBusy.into())
        );
        assert_eq!(regs.tpdr_writes(), 0);
        assert_eq!(eth.waiter().calls(), 0);
    }

    #[test]
    fn fatal_error_resets_ring() {
        let regs = MockEthRegs::new();
        let descs: TxDescriptors<6> = TxDescriptors::new();
        let completion = Completion::new();
        let consumed = RefCell::new(Vec::new());
        let waiter = MockWaiter::new(dma_engine(&regs, &descs, &completion, &consumed, Script { fail_on: Some(1), ..Script::default() }));
        let mut eth = open_transport(&regs, &descs, &completion, waiter);

        regs.clear_write_log();
        assert_eq!(
            eth.transmit(&[0u8; 3000]),
            Err(DmaError::FatalBusError.into())
        );

        assert_eq!(regs.get(EthReg::DmaOmr) & dmaomr::ST, 0);
        assert!(descs.as_array().iter().all(|d| !d.is_owned() && d.buffer_len() == 0));
        assert_eq!(eth.cursor(), 0);
        assert!(
            regs.write_log()
                .iter()
                .any(|&(reg, val)| reg == EthReg::DmaTdlar && val == descs.as_array().as_ptr() as u32)
        );
        assert_eq!(eth.stats().fatal_errors, 1);
        assert_eq!(eth.stats().frames_sent, 0);
        assert_eq!(eth.stats().segments_sent, 0);
        assert!(!completion.is_armed());
    }

    #[test]
    fn fatal_error_in_second_batch_aborts_frame() {
        let regs = MockEthRegs::new();
        let descs: TxDescriptors<2> = TxDescriptors::new();
        let completion = Completion::new();
        let consumed = RefCell::new(Vec::new());
        let script = Script { fail_on: Some(2), ..Script::default() };
        let waiter = MockWaiter::new(dma_engine(&regs, &descs, &completion, &consumed, script));
        let mut eth = open_transport(&regs, &descs, &completion, waiter);

        assert_eq!(
            eth.transmit(&[0u8; 5000]),
            Err(DmaError::FatalBusError.into())
        );

        // Only the first batch reached the wire
        assert_eq!(consumed.borrow().len(), 2);
        assert_eq!(regs.tpdr_writes(), 2);
        assert_eq!(eth.waiter().calls(), 2);

        assert_eq!(regs.get(EthReg::DmaOmr) & dmaomr::ST, 0);
        assert!(descs.as_array().iter().all(|d| !d.is_owned() && d.buffer_len() == 0));
        assert_eq!(eth.cursor(), 0);
        assert_eq!(
            eth.stats(),
            EthStats { segments_sent: 2, fatal_errors: 1, ..EthStats::default() }
        );
        assert!(!completion.is_armed());
    }

    #[test]
    fn early_buffer_unavailable_does_not_reuse_owned_slots() {
        let regs = MockEthRegs::new();
        let descs: TxDescriptors<2> = TxDescriptors::new();
        let completion = Completion::new();
        let consumed = RefCell::new(Vec::new());
        let script = Script { stale_tbu_on: Some(1), ..Script::default() };
        let waiter = MockWaiter::new(dma_engine(&regs, &descs, &completion, &consumed, script));
        let mut eth = open_transport(&regs, &descs, &completion, waiter);

        eth.transmit(&[0u8; 5000]).unwrap();

        assert_eq!(
            *consumed.borrow(),
            [
                Consumed { len: 1504, first: true, last: false, ioc: false },
                Consumed { len: 1504, first: false, last: false, ioc: false },
                Consumed { len: 1504, first: false, last: false, ioc: false },
                Consumed { len: 488, first: false, last: true, ioc: true },
            ]
        );
        // The early wake-up costs one extra wait, never a refill
        assert_eq!(eth.waiter().calls(), 3);
        assert_eq!(regs.tpdr_writes(), 2);
        assert_eq!(eth.stats().segments_sent, 4);
        assert_eq!(eth.stats().frames_sent, 1);
    }

    #[test]
    fn error_summary_write_back_fails_frame() {
        let regs = MockEthRegs::new();
        let descs: TxDescriptors<6> = TxDescriptors::new();
        let completion = Completion::new();
        let consumed = RefCell::new(Vec::new());
        let script = Script {
            write_back: tdes0::ERR_SUMMARY | tdes0::NO_CARRIER,
            ..Script::default()
        };
        let waiter = MockWaiter::new(dma_engine(&regs, &descs, &completion, &consumed, script));
        let mut eth = open_transport(&regs, &descs, &completion, waiter);

        assert_eq!(
            eth.transmit(&[0u8; 2000]),
            Err(DmaError::FrameError.into())
        );
        assert_eq!(
            eth.stats(),
            EthStats {
                segments_sent: 2,
                frame_errors: 1,
                last_error_flags: tdes0::NO_CARRIER,
                ..EthStats::default()
            }
        );
        // The ring is intact and the next frame starts after the failed one
        assert_eq!(eth.cursor(), 2);
        assert!(descs.as_array().iter().all(|d| !d.is_owned()));
        assert_eq!(regs.get(EthReg::DmaOmr) & dmaomr::ST, dmaomr::ST);
    }

    #[test]
    fn mdio_shares_register_block() {
        let regs = MockEthRegs::new();
        let descs: TxDescriptors<4> = TxDescriptors::new();
        let completion = Completion::new();
        let eth = open_transport(&regs, &descs, &completion, MockWaiter::idle());

        regs.set_phy_register(0, 2, 0x0007);
        let mut mdio = eth.mdio();
        assert_eq!(mdio.read(0, 2), Ok(0x0007));
    }
}

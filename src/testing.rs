//! Testing utilities and mock implementations
//!
//! Mock register files and wait strategies for exercising the drivers on
//! the host without hardware access.
//!
//! Only available when running `cargo test`.

// Note: The #[cfg(test)] attribute is applied in lib.rs where this module is declared
#![allow(missing_docs)]
#![allow(clippy::std_instead_of_core, clippy::std_instead_of_alloc)]

extern crate std;

use core::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::vec::Vec;

use crate::hal::mdio::phy_reg;
use crate::internal::register::RegisterBlock;
use crate::internal::register::eth::{EthReg, dmabmr, dmasr, macmiiar};
use crate::internal::register::usart::{UsartReg, isr};
use crate::sync::{Completion, SignalWait, Timeout};

// =============================================================================
// Mock USART
// =============================================================================

/// Mock USART register file
///
/// Models the side effects the driver relies on: reading RDR clears RXNE,
/// writing ICR clears the matching ISR flags, writes to TDR are captured.
/// TXE is always set.
#[derive(Debug)]
pub struct MockUsartRegs {
    values: RefCell<HashMap<UsartReg, u32>>,
    write_log: RefCell<Vec<(UsartReg, u32)>>,
    transmitted: RefCell<Vec<u8>>,
    rdr_reads: Cell<usize>,
}

impl Default for MockUsartRegs {
    fn default() -> Self {
        Self::new()
    }
}

impl MockUsartRegs {
    /// Create a mock with an empty transmit data register
    pub fn new() -> Self {
        let regs = Self {
            values: RefCell::new(HashMap::new()),
            write_log: RefCell::new(Vec::new()),
            transmitted: RefCell::new(Vec::new()),
            rdr_reads: Cell::new(0),
        };
        regs.set(UsartReg::Isr, isr::TXE | isr::TC);
        regs
    }

    /// Current register value
    pub fn get(&self, reg: UsartReg) -> u32 {
        self.values.borrow().get(&reg).copied().unwrap_or(0)
    }

    /// Set a register without logging or side effects
    pub fn set(&self, reg: UsartReg, value: u32) {
        self.values.borrow_mut().insert(reg, value);
    }

    /// Latch a received byte and raise RXNE
    pub fn inject_rx(&self, byte: u8) {
        self.set(UsartReg::Rdr, u32::from(byte));
        self.set_isr_bits(isr::RXNE);
    }

    /// Raise ISR flags
    pub fn set_isr_bits(&self, bits: u32) {
        let value = self.get(UsartReg::Isr) | bits;
        self.set(UsartReg::Isr, value);
    }

    /// Bytes written to TDR
    pub fn transmitted(&self) -> Vec<u8> {
        self.transmitted.borrow().clone()
    }

    /// Number of RDR reads
    pub fn rdr_reads(&self) -> usize {
        self.rdr_reads.get()
    }

    /// All driver writes in order
    pub fn write_log(&self) -> Vec<(UsartReg, u32)> {
        self.write_log.borrow().clone()
    }

    /// Forget logged writes
    pub fn clear_write_log(&self) {
        self.write_log.borrow_mut().clear();
    }
}

impl RegisterBlock<UsartReg> for MockUsartRegs {
    fn read(&self, reg: UsartReg) -> u32 {
        let value = self.get(reg);
        if reg == UsartReg::Rdr {
            self.rdr_reads.set(self.rdr_reads.get() + 1);
            let status = self.get(UsartReg::Isr) & !isr::RXNE;
            self.set(UsartReg::Isr, status);
        }
        value
    }

    fn write(&self, reg: UsartReg, value: u32) {
        self.write_log.borrow_mut().push((reg, value));
        match reg {
            UsartReg::Icr => {
                // ICR flags share bit positions with ISR
                let status = self.get(UsartReg::Isr) & !(value & (isr::ERRORS | isr::TC));
                self.set(UsartReg::Isr, status);
            }
            UsartReg::Tdr => self.transmitted.borrow_mut().push(value as u8),
            _ => self.set(reg, value),
        }
    }
}

// =============================================================================
// Mock Ethernet MAC/DMA with attached PHY
// =============================================================================

/// One completed clause-22 PHY access: (phy, reg, Some(written) or None for a read)
pub type PhyAccess = (u8, u8, Option<u16>);

#[derive(Debug, Default)]
struct PhyModel {
    registers: HashMap<(u8, u8), u16>,
    mmd_control: HashMap<u8, u16>,
    mmd_address: HashMap<(u8, u16), u16>,
    mmd_registers: HashMap<(u16, u16), u16>,
    log: Vec<PhyAccess>,
}

impl PhyModel {
    fn devad(&self, phy: u8) -> (u16, bool) {
        let control = self.mmd_control.get(&phy).copied().unwrap_or(0);
        (control & 0x1F, control >> 14 != 0)
    }

    fn read(&mut self, phy: u8, reg: u8) -> u16 {
        self.log.push((phy, reg, None));
        if reg == phy_reg::MMD_DATA {
            let (devad, data) = self.devad(phy);
            let addr = self.mmd_address.get(&(phy, devad)).copied().unwrap_or(0);
            if !data {
                return addr;
            }
            return self.mmd_registers.get(&(devad, addr)).copied().unwrap_or(0);
        }
        self.registers.get(&(phy, reg)).copied().unwrap_or(0)
    }

    fn write(&mut self, phy: u8, reg: u8, value: u16) {
        self.log.push((phy, reg, Some(value)));
        match reg {
            phy_reg::MMD_CTRL => {
                self.mmd_control.insert(phy, value);
            }
            phy_reg::MMD_DATA => {
                let (devad, data) = self.devad(phy);
                if data {
                    let addr = self.mmd_address.get(&(phy, devad)).copied().unwrap_or(0);
                    self.mmd_registers.insert((devad, addr), value);
                } else {
                    self.mmd_address.insert((phy, devad), value);
                }
            }
            // Soft reset self-clears
            phy_reg::BMCR => {
                self.registers.insert((phy, reg), value & !0x8000);
            }
            _ => {
                self.registers.insert((phy, reg), value);
            }
        }
    }
}

/// Mock Ethernet register file
///
/// - DMASR is write-1-to-clear
/// - DMABMR SR self-clears unless [`set_dma_reset_stuck`](Self::set_dma_reset_stuck)
/// - A MACMIIAR write with MB performs the clause-22 access against an
///   internal PHY model (including the MMD control/data latch) and clears
///   MB, unless [`set_smi_stuck_busy`](Self::set_smi_stuck_busy)
#[derive(Debug, Default)]
pub struct MockEthRegs {
    values: RefCell<HashMap<EthReg, u32>>,
    write_log: RefCell<Vec<(EthReg, u32)>>,
    phy: RefCell<PhyModel>,
    smi_stuck_busy: Cell<bool>,
    dma_reset_stuck: Cell<bool>,
    miiar_reads: Cell<u32>,
    miidr_reads: Cell<u32>,
    tpdr_writes: Cell<u32>,
    dmabmr_reads: Cell<u32>,
}

impl MockEthRegs {
    /// Create an idle mock
    pub fn new() -> Self {
        Self::default()
    }

    /// Current register value
    pub fn get(&self, reg: EthReg) -> u32 {
        self.values.borrow().get(&reg).copied().unwrap_or(0)
    }

    /// Set a register without logging or side effects
    pub fn set(&self, reg: EthReg, value: u32) {
        self.values.borrow_mut().insert(reg, value);
    }

    /// Raise DMA status bits as the engine would
    pub fn raise_dma_status(&self, bits: u32) {
        let value = self.get(EthReg::DmaSr) | bits;
        self.set(EthReg::DmaSr, value);
    }

    /// Keep MB set forever once an SMI operation starts
    pub fn set_smi_stuck_busy(&self, stuck: bool) {
        self.smi_stuck_busy.set(stuck);
    }

    /// Keep DMABMR SR set after a software reset
    pub fn set_dma_reset_stuck(&self, stuck: bool) {
        self.dma_reset_stuck.set(stuck);
    }

    /// Clause-22 register of the modeled PHY
    pub fn phy_register(&self, phy: u8, reg: u8) -> u16 {
        self.phy.borrow().registers.get(&(phy, reg)).copied().unwrap_or(0)
    }

    /// Preset a clause-22 register of the modeled PHY
    pub fn set_phy_register(&self, phy: u8, reg: u8, value: u16) {
        self.phy.borrow_mut().registers.insert((phy, reg), value);
    }

    /// MMD register of the modeled PHY
    pub fn mmd_register(&self, devad: u16, index: u16) -> Option<u16> {
        self.phy.borrow().mmd_registers.get(&(devad, index)).copied()
    }

    /// Preset an MMD register of the modeled PHY
    pub fn set_mmd_register(&self, devad: u16, index: u16, value: u16) {
        self.phy
            .borrow_mut()
            .mmd_registers
            .insert((devad, index), value);
    }

    /// Completed PHY accesses in order
    pub fn phy_log(&self) -> Vec<PhyAccess> {
        self.phy.borrow().log.clone()
    }

    /// Number of MACMIIAR reads
    pub fn miiar_reads(&self) -> u32 {
        self.miiar_reads.get()
    }

    /// Number of MACMIIDR reads
    pub fn miidr_reads(&self) -> u32 {
        self.miidr_reads.get()
    }

    /// Number of transmit poll demands
    pub fn tpdr_writes(&self) -> u32 {
        self.tpdr_writes.get()
    }

    /// Number of DMABMR reads
    pub fn dmabmr_reads(&self) -> u32 {
        self.dmabmr_reads.get()
    }

    /// All driver writes in order
    pub fn write_log(&self) -> Vec<(EthReg, u32)> {
        self.write_log.borrow().clone()
    }

    /// Forget logged writes
    pub fn clear_write_log(&self) {
        self.write_log.borrow_mut().clear();
    }

    fn start_smi(&self, miiar: u32) {
        if self.smi_stuck_busy.get() {
            self.set(EthReg::MacMiiar, miiar);
            return;
        }
        let phy = ((miiar & macmiiar::PA_MASK) >> macmiiar::PA_SHIFT) as u8;
        let reg = ((miiar & macmiiar::MR_MASK) >> macmiiar::MR_SHIFT) as u8;
        if miiar & macmiiar::MW != 0 {
            let value = self.get(EthReg::MacMiidr) as u16;
            self.phy.borrow_mut().write(phy, reg, value);
        } else {
            let value = self.phy.borrow_mut().read(phy, reg);
            self.set(EthReg::MacMiidr, u32::from(value));
        }
        self.set(EthReg::MacMiiar, miiar & !macmiiar::MB);
    }
}

impl RegisterBlock<EthReg> for MockEthRegs {
    fn read(&self, reg: EthReg) -> u32 {
        match reg {
            EthReg::MacMiiar => self.miiar_reads.set(self.miiar_reads.get() + 1),
            EthReg::MacMiidr => self.miidr_reads.set(self.miidr_reads.get() + 1),
            EthReg::DmaBmr => self.dmabmr_reads.set(self.dmabmr_reads.get() + 1),
            _ => {}
        }
        self.get(reg)
    }

    fn write(&self, reg: EthReg, value: u32) {
        self.write_log.borrow_mut().push((reg, value));
        match reg {
            EthReg::DmaSr => {
                let status = self.get(EthReg::DmaSr) & !(value & dmasr::W1C_MASK);
                self.set(EthReg::DmaSr, status);
            }
            EthReg::DmaBmr => {
                let stored = if self.dma_reset_stuck.get() {
                    value
                } else {
                    value & !dmabmr::SR
                };
                self.set(EthReg::DmaBmr, stored);
            }
            EthReg::DmaTpdr => {
                self.tpdr_writes.set(self.tpdr_writes.get() + 1);
                self.set(reg, value);
            }
            EthReg::MacMiiar if value & macmiiar::MB != 0 => self.start_smi(value),
            _ => self.set(reg, value),
        }
    }
}

// =============================================================================
// Mock Waiter
// =============================================================================

/// Wait strategy that runs a hook instead of sleeping
///
/// Each `wait` call records its timeout, runs the hook (typically an
/// interrupt handler simulating hardware progress) and then returns whatever
/// bits the completion holds.
pub struct MockWaiter<F: FnMut()> {
    hook: F,
    timeouts: Vec<Timeout>,
}

impl MockWaiter<fn()> {
    /// Waiter whose hook does nothing
    pub fn idle() -> Self {
        fn noop() {}
        MockWaiter::new(noop as fn())
    }
}

impl<F: FnMut()> MockWaiter<F> {
    /// Waiter running `hook` on every wait
    pub fn new(hook: F) -> Self {
        Self {
            hook,
            timeouts: Vec::new(),
        }
    }

    /// Number of wait calls
    pub fn calls(&self) -> usize {
        self.timeouts.len()
    }

    /// Timeouts passed to each wait call
    pub fn timeouts(&self) -> &[Timeout] {
        &self.timeouts
    }
}

impl<F: FnMut()> SignalWait for MockWaiter<F> {
    fn wait(&mut self, completion: &Completion, mask: u32, timeout: Timeout) -> Option<u32> {
        self.timeouts.push(timeout);
        (self.hook)();
        match completion.take(mask) {
            0 => None,
            bits => Some(bits),
        }
    }
}

// =============================================================================
// Mock Delay
// =============================================================================

/// Mock delay for testing without actual timing
///
/// Records delays for verification without actually waiting.
#[derive(Debug, Default)]
pub struct MockDelay {
    /// Total nanoseconds delayed
    total_ns: RefCell<u64>,
}

impl MockDelay {
    /// Create a new mock delay
    pub fn new() -> Self {
        Self::default()
    }

    /// Get total nanoseconds that were "delayed"
    pub fn total_ns(&self) -> u64 {
        *self.total_ns.borrow()
    }

    /// Get total milliseconds that were "delayed"
    pub fn total_ms(&self) -> u64 {
        self.total_ns() / 1_000_000
    }
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        *self.total_ns.borrow_mut() += u64::from(ns);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::internal::register::usart::icr;
    use crate::sync::SEND_DONE;

    #[test]
    fn usart_mock_side_effects() {
        let regs = MockUsartRegs::new();
        regs.inject_rx(0x41);
        regs.set_isr_bits(isr::PE);

        assert_eq!(regs.read(UsartReg::Rdr), 0x41);
        assert_eq!(regs.get(UsartReg::Isr) & isr::RXNE, 0);

        regs.write(UsartReg::Icr, icr::PECF);
        assert_eq!(regs.get(UsartReg::Isr) & isr::PE, 0);
        assert_eq!(regs.get(UsartReg::Isr) & isr::TXE, isr::TXE);

        regs.write(UsartReg::Tdr, u32::from(b'x'));
        assert_eq!(regs.transmitted(), b"x");
    }

    #[test]
    fn eth_mock_status_is_write_one_to_clear() {
        let regs = MockEthRegs::new();
        regs.raise_dma_status(dmasr::TS | dmasr::TBUS | dmasr::NIS);
        regs.write(EthReg::DmaSr, dmasr::TS);
        assert_eq!(regs.get(EthReg::DmaSr), dmasr::TBUS | dmasr::NIS);
    }

    #[test]
    fn eth_mock_models_phy() {
        let regs = MockEthRegs::new();
        regs.set(EthReg::MacMiidr, 0xABCD);
        regs.write(
            EthReg::MacMiiar,
            (1 << macmiiar::PA_SHIFT) | (4 << macmiiar::MR_SHIFT) | macmiiar::MW | macmiiar::MB,
        );
        assert_eq!(regs.phy_register(1, 4), 0xABCD);
        assert_eq!(regs.get(EthReg::MacMiiar) & macmiiar::MB, 0);
        assert_eq!(regs.phy_log(), [(1, 4, Some(0xABCD))]);
    }

    #[test]
    fn mock_waiter_runs_hook() {
        let completion = Completion::new();
        let _guard = completion.arm();
        let mut waiter = MockWaiter::new(|| {
            completion.signal(SEND_DONE);
        });

        assert_eq!(
            waiter.wait(&completion, SEND_DONE, Timeout::Millis(10)),
            Some(SEND_DONE)
        );
        assert_eq!(waiter.calls(), 1);
        assert_eq!(waiter.timeouts(), [Timeout::Millis(10)]);
    }

    #[test]
    fn mock_delay_tracking() {
        let mut delay = MockDelay::new();

        embedded_hal::delay::DelayNs::delay_ns(&mut delay, 1000);
        embedded_hal::delay::DelayNs::delay_ns(&mut delay, 2000);
        assert_eq!(delay.total_ns(), 3000);
        assert_eq!(delay.total_ms(), 0);

        embedded_hal::delay::DelayNs::delay_ns(&mut delay, 1_000_000);
        assert_eq!(delay.total_ms(), 1);
    }
}

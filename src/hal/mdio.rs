//! MDIO (Management Data Input/Output) HAL
//!
//! Clause-22 access to the Ethernet PHY through the MAC's SMI
//! (Station Management Interface) register pair: the address register
//! (`MACMIIAR`) starts an operation and carries the busy bit, the data
//! register (`MACMIIDR`) holds the 16-bit value.
//!
//! Busy polling is a bounded retry loop. If the busy bit is still set after
//! [`MII_BUSY_RETRIES`] reads the operation is abandoned with
//! [`IoError::Timeout`].

use crate::driver::error::{IoError, ParamError, Result};
use crate::internal::constants::MII_BUSY_RETRIES;
use crate::internal::register::RegisterBlock;
use crate::internal::register::eth::{EthReg, macmiiar};

// =============================================================================
// MDIO Constants
// =============================================================================

/// Maximum valid PHY address (5-bit field)
pub const MAX_PHY_ADDR: u8 = 31;

/// Maximum valid register address (5-bit field)
pub const MAX_REG_ADDR: u8 = 31;

/// MDC clock divider, selected from the AHB clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum MdcClockDivider {
    /// HCLK/42 (60-100 MHz)
    Div42 = 0,
    /// HCLK/62 (100-150 MHz)
    Div62 = 1,
    /// HCLK/16 (20-35 MHz)
    Div16 = 2,
    /// HCLK/26 (35-60 MHz)
    Div26 = 3,
    /// HCLK/102 (150-216 MHz)
    #[default]
    Div102 = 4,
}

impl MdcClockDivider {
    /// Get the appropriate divider for a given HCLK frequency
    ///
    /// The MDC clock must not exceed 2.5 MHz per IEEE 802.3.
    pub const fn from_hclk_hz(hclk_hz: u32) -> Self {
        if hclk_hz < 35_000_000 {
            Self::Div16
        } else if hclk_hz < 60_000_000 {
            Self::Div26
        } else if hclk_hz < 100_000_000 {
            Self::Div42
        } else if hclk_hz < 150_000_000 {
            Self::Div62
        } else {
            Self::Div102
        }
    }

    /// Get the divider value for register programming
    pub const fn to_reg_value(self) -> u32 {
        self as u32
    }

    /// HCLK division ratio
    pub const fn ratio(self) -> u32 {
        match self {
            Self::Div16 => 16,
            Self::Div26 => 26,
            Self::Div42 => 42,
            Self::Div62 => 62,
            Self::Div102 => 102,
        }
    }
}

// =============================================================================
// MDIO Bus Trait
// =============================================================================

/// Trait for MDIO bus operations
///
/// Implemented by [`MdioController`] for the on-chip SMI and by mocks in
/// tests, so PHY drivers and the MMD protocol stay backend-agnostic.
pub trait MdioBus {
    /// Read a PHY register
    fn read(&mut self, phy_addr: u8, reg_addr: u8) -> Result<u16>;

    /// Write a PHY register
    fn write(&mut self, phy_addr: u8, reg_addr: u8, value: u16) -> Result<()>;

    /// Check if the MDIO bus is busy
    fn is_busy(&self) -> bool;
}

impl<T: MdioBus + ?Sized> MdioBus for &mut T {
    fn read(&mut self, phy_addr: u8, reg_addr: u8) -> Result<u16> {
        (**self).read(phy_addr, reg_addr)
    }

    fn write(&mut self, phy_addr: u8, reg_addr: u8, value: u16) -> Result<()> {
        (**self).write(phy_addr, reg_addr, value)
    }

    fn is_busy(&self) -> bool {
        (**self).is_busy()
    }
}

// =============================================================================
// MDIO Controller
// =============================================================================

/// SMI controller on the Ethernet MAC
#[derive(Debug)]
pub struct MdioController<R: RegisterBlock<EthReg>> {
    regs: R,
    /// Clock divider setting
    clock_divider: MdcClockDivider,
    /// Busy-bit polls per phase
    retries: u32,
}

impl<R: RegisterBlock<EthReg>> MdioController<R> {
    /// Create a controller with the default divider and retry budget
    pub const fn new(regs: R) -> Self {
        Self {
            regs,
            clock_divider: MdcClockDivider::Div102,
            retries: MII_BUSY_RETRIES,
        }
    }

    /// Create a controller with the divider matching `hclk_hz`
    pub const fn for_hclk(regs: R, hclk_hz: u32) -> Self {
        Self {
            regs,
            clock_divider: MdcClockDivider::from_hclk_hz(hclk_hz),
            retries: MII_BUSY_RETRIES,
        }
    }

    /// Override the busy-bit retry budget (minimum 1)
    #[must_use]
    pub const fn with_retries(mut self, retries: u32) -> Self {
        self.retries = if retries == 0 { 1 } else { retries };
        self
    }

    /// Selected clock divider
    pub const fn clock_divider(&self) -> MdcClockDivider {
        self.clock_divider
    }

    /// Release the register block
    pub fn into_inner(self) -> R {
        self.regs
    }

    /// Poll the busy bit until it clears or the retry budget runs out
    fn wait_not_busy(&self) -> Result<()> {
        for _ in 0..self.retries {
            if self.regs.read(EthReg::MacMiiar) & macmiiar::MB == 0 {
                return Ok(());
            }
            core::hint::spin_loop();
        }
        Err(IoError::Timeout.into())
    }

    /// Build the MACMIIAR register value
    fn build_mii_addr(&self, phy_addr: u8, reg_addr: u8, is_write: bool) -> u32 {
        let mut addr = 0u32;

        // PHY address (bits 15:11)
        addr |= (u32::from(phy_addr) << macmiiar::PA_SHIFT) & macmiiar::PA_MASK;

        // Register address (bits 10:6)
        addr |= (u32::from(reg_addr) << macmiiar::MR_SHIFT) & macmiiar::MR_MASK;

        // Clock divider (bits 4:2)
        addr |= (self.clock_divider.to_reg_value() << macmiiar::CR_SHIFT) & macmiiar::CR_MASK;

        // Write flag (bit 1)
        if is_write {
            addr |= macmiiar::MW;
        }

        // Busy flag (bit 0) - triggers the operation
        addr | macmiiar::MB
    }
}

fn check_addresses(phy_addr: u8, reg_addr: u8) -> Result<()> {
    if phy_addr > MAX_PHY_ADDR {
        return Err(ParamError::InvalidPhyAddress.into());
    }
    if reg_addr > MAX_REG_ADDR {
        return Err(ParamError::InvalidRegister.into());
    }
    Ok(())
}

impl<R: RegisterBlock<EthReg>> MdioBus for MdioController<R> {
    fn read(&mut self, phy_addr: u8, reg_addr: u8) -> Result<u16> {
        check_addresses(phy_addr, reg_addr)?;

        // Wait for any pending operation
        self.wait_not_busy()?;

        // Writing the address register triggers the read
        let addr = self.build_mii_addr(phy_addr, reg_addr, false);
        self.regs.write(EthReg::MacMiiar, addr);

        self.wait_not_busy()?;

        let data = self.regs.read(EthReg::MacMiidr) & 0xFFFF;
        Ok(data as u16)
    }

    fn write(&mut self, phy_addr: u8, reg_addr: u8, value: u16) -> Result<()> {
        check_addresses(phy_addr, reg_addr)?;

        self.wait_not_busy()?;

        // Data first, then the address register triggers the write
        self.regs.write(EthReg::MacMiidr, u32::from(value));
        let addr = self.build_mii_addr(phy_addr, reg_addr, true);
        self.regs.write(EthReg::MacMiiar, addr);

        self.wait_not_busy()
    }

    fn is_busy(&self) -> bool {
        self.regs.read(EthReg::MacMiiar) & macmiiar::MB != 0
    }
}

// =============================================================================
// PHY Register Definitions (IEEE 802.3 standard registers)
// =============================================================================

/// Standard PHY register addresses (IEEE 802.3 Clause 22)
pub mod phy_reg {
    /// Basic Mode Control Register
    pub const BMCR: u8 = 0;
    /// Basic Mode Status Register
    pub const BMSR: u8 = 1;
    /// PHY Identifier 1
    pub const PHYIDR1: u8 = 2;
    /// PHY Identifier 2
    pub const PHYIDR2: u8 = 3;
    /// Auto-Negotiation Advertisement Register
    pub const ANAR: u8 = 4;
    /// Auto-Negotiation Link Partner Ability Register
    pub const ANLPAR: u8 = 5;
    /// Auto-Negotiation Expansion Register
    pub const ANER: u8 = 6;
    /// Auto-Negotiation Next Page Transmit Register
    pub const ANNPTR: u8 = 7;
    /// Auto-Negotiation Next Page Receive Register
    pub const ANNPRR: u8 = 8;
    /// MMD Access Control Register
    pub const MMD_CTRL: u8 = 13;
    /// MMD Access Data Register
    pub const MMD_DATA: u8 = 14;
    /// Extended Status Register
    pub const ESTATUS: u8 = 15;
}

/// BMCR (Basic Mode Control Register) bits
pub mod bmcr {
    /// Soft reset
    pub const RESET: u16 = 1 << 15;
    /// Loopback mode
    pub const LOOPBACK: u16 = 1 << 14;
    /// Speed select (100 Mbps if set)
    pub const SPEED_100: u16 = 1 << 13;
    /// Auto-negotiation enable
    pub const AN_ENABLE: u16 = 1 << 12;
    /// Power down
    pub const POWER_DOWN: u16 = 1 << 11;
    /// Isolate
    pub const ISOLATE: u16 = 1 << 10;
    /// Restart auto-negotiation
    pub const AN_RESTART: u16 = 1 << 9;
    /// Duplex mode (full duplex if set)
    pub const DUPLEX_FULL: u16 = 1 << 8;
}

/// BMSR (Basic Mode Status Register) bits
pub mod bmsr {
    /// 100BASE-T4 capable
    pub const T4_CAPABLE: u16 = 1 << 15;
    /// 100BASE-TX full duplex capable
    pub const TX_FD_CAPABLE: u16 = 1 << 14;
    /// 100BASE-TX half duplex capable
    pub const TX_HD_CAPABLE: u16 = 1 << 13;
    /// 10BASE-T full duplex capable
    pub const T10_FD_CAPABLE: u16 = 1 << 12;
    /// 10BASE-T half duplex capable
    pub const T10_HD_CAPABLE: u16 = 1 << 11;
    /// Extended status register present
    pub const ESTATUS: u16 = 1 << 8;
    /// MF preamble suppression
    pub const MF_PREAMBLE_SUPP: u16 = 1 << 6;
    /// Auto-negotiation complete
    pub const AN_COMPLETE: u16 = 1 << 5;
    /// Remote fault
    pub const REMOTE_FAULT: u16 = 1 << 4;
    /// Auto-negotiation ability
    pub const AN_ABILITY: u16 = 1 << 3;
    /// Link status
    pub const LINK_STATUS: u16 = 1 << 2;
    /// Jabber detect
    pub const JABBER_DETECT: u16 = 1 << 1;
    /// Extended capabilities
    pub const EXT_CAPABLE: u16 = 1 << 0;
}

/// ANAR (Auto-Negotiation Advertisement Register) bits
pub mod anar {
    /// Next page
    pub const NEXT_PAGE: u16 = 1 << 15;
    /// Acknowledge
    pub const ACK: u16 = 1 << 14;
    /// Remote fault
    pub const REMOTE_FAULT: u16 = 1 << 13;
    /// Pause capable
    pub const PAUSE: u16 = 1 << 10;
    /// 100BASE-T4
    pub const T4: u16 = 1 << 9;
    /// 100BASE-TX full duplex
    pub const TX_FD: u16 = 1 << 8;
    /// 100BASE-TX half duplex
    pub const TX_HD: u16 = 1 << 7;
    /// 10BASE-T full duplex
    pub const T10_FD: u16 = 1 << 6;
    /// 10BASE-T half duplex
    pub const T10_HD: u16 = 1 << 5;
    /// Selector field (IEEE 802.3)
    pub const SELECTOR: u16 = 0x001F;
    /// IEEE 802.3 selector value
    pub const SELECTOR_IEEE802_3: u16 = 0x0001;
}

// =============================================================================
// PHY Helper Functions
// =============================================================================

/// PHY status information
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhyStatus {
    /// Link is up
    pub link_up: bool,
    /// Auto-negotiation complete
    pub an_complete: bool,
    /// Speed (true = 100 Mbps, false = 10 Mbps)
    pub speed_100: bool,
    /// Duplex (true = full, false = half)
    pub full_duplex: bool,
}

/// Read PHY status from standard registers
pub fn read_phy_status<M: MdioBus>(mdio: &mut M, phy_addr: u8) -> Result<PhyStatus> {
    let bmsr = mdio.read(phy_addr, phy_reg::BMSR)?;
    let bmcr = mdio.read(phy_addr, phy_reg::BMCR)?;

    Ok(PhyStatus {
        link_up: (bmsr & bmsr::LINK_STATUS) != 0,
        an_complete: (bmsr & bmsr::AN_COMPLETE) != 0,
        speed_100: (bmcr & bmcr::SPEED_100) != 0,
        full_duplex: (bmcr & bmcr::DUPLEX_FULL) != 0,
    })
}

/// Perform a soft reset on the PHY
pub fn reset_phy<M: MdioBus>(mdio: &mut M, phy_addr: u8) -> Result<()> {
    mdio.write(phy_addr, phy_reg::BMCR, bmcr::RESET)
}

/// Read the PHY identifier
pub fn read_phy_id<M: MdioBus>(mdio: &mut M, phy_addr: u8) -> Result<u32> {
    let id1 = mdio.read(phy_addr, phy_reg::PHYIDR1)? as u32;
    let id2 = mdio.read(phy_addr, phy_reg::PHYIDR2)? as u32;
    Ok((id1 << 16) | id2)
}

/// Enable auto-negotiation on the PHY
pub fn enable_auto_negotiation<M: MdioBus>(mdio: &mut M, phy_addr: u8) -> Result<()> {
    let bmcr = mdio.read(phy_addr, phy_reg::BMCR)?;
    mdio.write(
        phy_addr,
        phy_reg::BMCR,
        (bmcr | bmcr::AN_ENABLE | bmcr::AN_RESTART) & !bmcr::ISOLATE,
    )
}

// =============================================================================
// Unit Tests
// =============================================================================

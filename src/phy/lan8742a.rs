//! LAN8742A PHY Driver
//!
//! Microchip LAN8742A 10/100 Ethernet PHY with RMII interface, as fitted to
//! STM32F7 Nucleo and Discovery boards.
//!
//! Besides the Clause 22 basics the driver exposes the vendor speed
//! indication register and the LED function select, which lives in the
//! wake-up control/status register of the PCS MMD and is reached through
//! the indirect register protocol.
//!
//! # Example
//!
//! ```ignore
//! let mut phy = Lan8742a::new(0);
//! let mut mdio = eth.mdio();
//! phy.init(&mut mdio)?;
//! phy.set_led_function(&mut mdio, LedIndex::Led1, LedFunction::LinkActivity)?;
//! if let Some(link) = phy.link_status(&mut mdio)? {
//!     // 100 Mbps full duplex, ...
//! }
//! ```

use super::generic::{LinkStatus, PhyDriver, ieee802_3};
use crate::driver::error::Result;
use crate::hal::mdio::{self, MdioBus};
use crate::hal::mmd::{self, lan8742a as mmd_regs};
use crate::internal::constants::PHY_RESET_RETRIES;

/// LAN8742A PHY identifier (PHYIDR1 << 16 | PHYIDR2), revision masked
pub const LAN8742A_PHY_ID: u32 = 0x0007_C130;
/// Mask dropping the 4-bit revision
pub const LAN8742A_PHY_ID_MASK: u32 = 0xFFFF_FFF0;

/// Vendor-specific register addresses
pub mod reg {
    /// Mode control/status
    pub const MCSR: u8 = 17;
    /// Special modes
    pub const SMR: u8 = 18;
    /// Symbol error counter
    pub const SECR: u8 = 26;
    /// Interrupt source flags
    pub const ISR: u8 = 29;
    /// Interrupt mask
    pub const IMR: u8 = 30;
    /// PHY special control/status
    pub const PSCSR: u8 = 31;
}

/// Interrupt source / mask bits (ISR, IMR)
pub mod isr {
    /// Wake-on-LAN event
    pub const WOL: u16 = 1 << 8;
    /// ENERGYON generated
    pub const ENERGYON: u16 = 1 << 7;
    /// Auto-negotiation complete
    pub const AN_COMPLETE: u16 = 1 << 6;
    /// Remote fault detected
    pub const REMOTE_FAULT: u16 = 1 << 5;
    /// Link down
    pub const LINK_DOWN: u16 = 1 << 4;
}

/// PHY special control/status (PSCSR) bits
pub mod pscsr {
    /// Auto-negotiation done
    pub const AUTODONE: u16 = 1 << 12;
    /// Speed indication mask
    pub const HCDSPEED_MASK: u16 = 0x7 << 2;
    /// 10BASE-T half duplex
    pub const HCDSPEED_10HD: u16 = 0x1 << 2;
    /// 10BASE-T full duplex
    pub const HCDSPEED_10FD: u16 = 0x5 << 2;
    /// 100BASE-TX half duplex
    pub const HCDSPEED_100HD: u16 = 0x2 << 2;
    /// 100BASE-TX full duplex
    pub const HCDSPEED_100FD: u16 = 0x6 << 2;
}

// =============================================================================
// LED Function Select
// =============================================================================

/// LED output pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedIndex {
    /// LED1 (WUCSR bits 14:13)
    Led1,
    /// LED2 (WUCSR bits 12:11)
    Led2,
}

impl LedIndex {
    const fn shift(self) -> u16 {
        match self {
            LedIndex::Led1 => mmd_regs::WUCSR_LED1_SHIFT,
            LedIndex::Led2 => mmd_regs::WUCSR_LED2_SHIFT,
        }
    }
}

/// Function driven onto an LED pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum LedFunction {
    /// Link/activity (reset default)
    #[default]
    LinkActivity = 0,
    /// nINT interrupt output
    Interrupt = 1,
    /// nPME power management event
    PowerManagementEvent = 2,
    /// Link speed
    LinkSpeed = 3,
}

impl LedFunction {
    /// Decode a two-bit field value
    pub const fn from_bits(bits: u16) -> Self {
        match bits & mmd_regs::WUCSR_LED_FIELD {
            0 => LedFunction::LinkActivity,
            1 => LedFunction::Interrupt,
            2 => LedFunction::PowerManagementEvent,
            _ => LedFunction::LinkSpeed,
        }
    }
}

// =============================================================================
// Driver
// =============================================================================

/// LAN8742A PHY driver
#[derive(Debug)]
pub struct Lan8742a {
    addr: u8,
}

impl Lan8742a {
    /// Create a new LAN8742A driver
    ///
    /// # Arguments
    /// * `addr` - PHY address (strapped to 0 on most boards)
    pub const fn new(addr: u8) -> Self {
        Self { addr }
    }

    /// Verify this is a LAN8742A by reading the PHY ID
    pub fn verify_id<M: MdioBus>(&self, mdio: &mut M) -> Result<bool> {
        let id = mdio::read_phy_id(mdio, self.addr)?;
        Ok((id & LAN8742A_PHY_ID_MASK) == LAN8742A_PHY_ID)
    }

    /// Get the revision number from PHY ID
    pub fn revision<M: MdioBus>(&self, mdio: &mut M) -> Result<u8> {
        let id = mdio::read_phy_id(mdio, self.addr)?;
        Ok((id & 0x0F) as u8)
    }

    /// Negotiated speed/duplex from the vendor status register.
    ///
    /// `None` until auto-negotiation is done or for a reserved encoding.
    pub fn read_speed_indication<M: MdioBus>(&self, mdio: &mut M) -> Result<Option<LinkStatus>> {
        let pscsr = mdio.read(self.addr, reg::PSCSR)?;

        if (pscsr & pscsr::AUTODONE) == 0 {
            return Ok(None);
        }

        let link = match pscsr & pscsr::HCDSPEED_MASK {
            pscsr::HCDSPEED_100FD => LinkStatus::fast_full(),
            pscsr::HCDSPEED_100HD => LinkStatus::fast_half(),
            pscsr::HCDSPEED_10FD => LinkStatus::slow_full(),
            pscsr::HCDSPEED_10HD => LinkStatus::slow_half(),
            _ => return Ok(None),
        };

        Ok(Some(link))
    }

    /// Route `function` to `led`, leaving the other LED and the wake-up
    /// bits untouched.
    ///
    /// # Errors
    ///
    /// `IoError::Timeout` if the management bus stays busy.
    pub fn set_led_function<M: MdioBus>(
        &mut self,
        mdio: &mut M,
        led: LedIndex,
        function: LedFunction,
    ) -> Result<()> {
        let shift = led.shift();
        let field = mmd_regs::WUCSR_LED_FIELD << shift;
        mmd::mmd_modify(mdio, &mmd_regs::MAP, self.addr, mmd_regs::WUCSR, |wucsr| {
            (wucsr & !field) | ((function as u16) << shift)
        })
    }

    /// Function currently routed to `led`
    pub fn led_function<M: MdioBus>(&self, mdio: &mut M, led: LedIndex) -> Result<LedFunction> {
        let wucsr = mmd::mmd_read(mdio, &mmd_regs::MAP, self.addr, mmd_regs::WUCSR)?;
        Ok(LedFunction::from_bits(wucsr >> led.shift()))
    }

    /// Read interrupt status (clears on read)
    pub fn read_interrupt_status<M: MdioBus>(&self, mdio: &mut M) -> Result<u16> {
        mdio.read(self.addr, reg::ISR)
    }

    /// Enable specific interrupt sources
    pub fn set_interrupt_mask<M: MdioBus>(&mut self, mdio: &mut M, mask: u16) -> Result<()> {
        mdio.write(self.addr, reg::IMR, mask)
    }
}

impl PhyDriver for Lan8742a {
    fn address(&self) -> u8 {
        self.addr
    }

    fn init<M: MdioBus>(&mut self, mdio: &mut M) -> Result<()> {
        self.soft_reset(mdio)?;
        mdio::enable_auto_negotiation(mdio, self.addr)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("LAN8742A {} initialized", self.addr);

        Ok(())
    }

    fn soft_reset<M: MdioBus>(&mut self, mdio: &mut M) -> Result<()> {
        ieee802_3::soft_reset(mdio, self.addr, PHY_RESET_RETRIES)
    }

    fn is_link_up<M: MdioBus>(&self, mdio: &mut M) -> Result<bool> {
        ieee802_3::is_link_up(mdio, self.addr)
    }

    fn link_status<M: MdioBus>(&self, mdio: &mut M) -> Result<Option<LinkStatus>> {
        if !self.is_link_up(mdio)? {
            return Ok(None);
        }
        match self.read_speed_indication(mdio)? {
            Some(link) => Ok(Some(link)),
            None => ieee802_3::link_status_from_bmcr(mdio, self.addr).map(Some),
        }
    }

    fn phy_id<M: MdioBus>(&self, mdio: &mut M) -> Result<u32> {
        mdio::read_phy_id(mdio, self.addr)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

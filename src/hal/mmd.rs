//! Indirect access to PHY MMD (MDIO Manageable Device) registers
//!
//! Registers of the extended MMD space are reached through the clause-22
//! control/data pair (registers 13 and 14) in four phases:
//!
//! | Phase | Register | Value |
//! |-------|----------|-------|
//! | A | 13 (control) | device address, function = address |
//! | B | 14 (data) | register index |
//! | C | 13 (control) | device address, function = data |
//! | D | 14 (data) | read or write the value |
//!
//! Each phase is one SMI operation and inherits its busy-bit retry budget.
//! A phase that times out aborts the access; later phases are not issued.
//!
//! Which device a register index lives in is resolved through a static
//! [`MmdRegisterMap`]. Lookup is by index and the first matching entry wins.

use super::mdio::{MdioBus, phy_reg};
use crate::driver::error::{ResourceError, Result};

/// MMD control register: function field shift
const FUNCTION_SHIFT: u16 = 14;

/// MMD control register: function = address
pub const FUNCTION_ADDRESS: u16 = 0b00 << FUNCTION_SHIFT;

/// MMD control register: function = data, no post increment
pub const FUNCTION_DATA: u16 = 0b01 << FUNCTION_SHIFT;

/// MMD control register: device address field
pub const DEVAD_MASK: u16 = 0x001F;

/// MMD device addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum MmdDevice {
    /// PCS (device 3)
    Pcs = 3,
    /// Vendor specific 2 (device 30)
    VendorSpecific = 30,
}

impl MmdDevice {
    /// Device address field value
    pub const fn devad(self) -> u16 {
        self as u16
    }
}

/// One register of the MMD space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MmdEntry {
    /// Register index within the device
    pub index: u16,
    /// Device holding the register
    pub device: MmdDevice,
}

impl MmdEntry {
    /// Create an entry
    pub const fn new(index: u16, device: MmdDevice) -> Self {
        Self { index, device }
    }
}

/// Build-time table of reachable MMD registers
#[derive(Debug, Clone, Copy)]
pub struct MmdRegisterMap {
    entries: &'static [MmdEntry],
}

impl MmdRegisterMap {
    /// Wrap a static table
    pub const fn new(entries: &'static [MmdEntry]) -> Self {
        Self { entries }
    }

    /// Resolve `index` to its entry. The first entry with a matching index
    /// wins when an index appears under more than one device.
    pub fn lookup(&self, index: u16) -> Option<&'static MmdEntry> {
        self.entries.iter().find(|entry| entry.index == index)
    }

    /// All entries in table order
    pub fn entries(&self) -> &'static [MmdEntry] {
        self.entries
    }
}

/// LAN8742A MMD registers
pub mod lan8742a {
    use super::{MmdDevice, MmdEntry, MmdRegisterMap};

    /// PCS devices in package 1
    pub const PCS_DEV_PKG1: u16 = 5;
    /// PCS devices in package 2
    pub const PCS_DEV_PKG2: u16 = 6;
    /// Wake-up control and status
    pub const WUCSR: u16 = 32784;
    /// Wake-up filter configuration A
    pub const WUF_CFGA: u16 = 32785;
    /// Wake-up filter configuration B
    pub const WUF_CFGB: u16 = 32786;
    /// Wake-up filter byte mask
    pub const WUF_MASK: u16 = 32801;
    /// MAC receive address A
    pub const MAC_RX_ADDRA: u16 = 32865;
    /// MAC receive address B
    pub const MAC_RX_ADDRB: u16 = 32866;
    /// MAC receive address C
    pub const MAC_RX_ADDRC: u16 = 32867;

    /// Vendor-specific identifier 1
    pub const VEND_ID1: u16 = 2;
    /// Vendor-specific identifier 2
    pub const VEND_ID2: u16 = 3;
    /// Vendor-specific devices in package 1
    pub const VEND_DEV_PKG1: u16 = 5;
    /// Vendor-specific devices in package 2
    pub const VEND_DEV_PKG2: u16 = 6;
    /// Vendor-specific status
    pub const VEND_STATUS: u16 = 8;
    /// Vendor-specific package identifier 1
    pub const VEND_PKG_ID1: u16 = 14;
    /// Vendor-specific package identifier 2
    pub const VEND_PKG_ID2: u16 = 15;
    /// Vendor-specific register 11
    pub const VEND_REG11: u16 = 11;
    /// Vendor-specific register 12
    pub const VEND_REG12: u16 = 12;

    /// WUCSR LED1 function select field (bits 14:13)
    pub const WUCSR_LED1_SHIFT: u16 = 13;
    /// WUCSR LED2 function select field (bits 12:11)
    pub const WUCSR_LED2_SHIFT: u16 = 11;
    /// Width mask of one LED function field
    pub const WUCSR_LED_FIELD: u16 = 0b11;

    const ENTRIES: &[MmdEntry] = &[
        MmdEntry::new(PCS_DEV_PKG1, MmdDevice::Pcs),
        MmdEntry::new(PCS_DEV_PKG2, MmdDevice::Pcs),
        MmdEntry::new(WUCSR, MmdDevice::Pcs),
        MmdEntry::new(WUF_CFGA, MmdDevice::Pcs),
        MmdEntry::new(WUF_CFGB, MmdDevice::Pcs),
        MmdEntry::new(WUF_MASK, MmdDevice::Pcs),
        MmdEntry::new(MAC_RX_ADDRA, MmdDevice::Pcs),
        MmdEntry::new(MAC_RX_ADDRB, MmdDevice::Pcs),
        MmdEntry::new(MAC_RX_ADDRC, MmdDevice::Pcs),
        MmdEntry::new(VEND_ID1, MmdDevice::VendorSpecific),
        MmdEntry::new(VEND_ID2, MmdDevice::VendorSpecific),
        MmdEntry::new(VEND_DEV_PKG1, MmdDevice::VendorSpecific),
        MmdEntry::new(VEND_DEV_PKG2, MmdDevice::VendorSpecific),
        MmdEntry::new(VEND_STATUS, MmdDevice::VendorSpecific),
        MmdEntry::new(VEND_REG11, MmdDevice::VendorSpecific),
        MmdEntry::new(VEND_REG12, MmdDevice::VendorSpecific),
        MmdEntry::new(VEND_PKG_ID1, MmdDevice::VendorSpecific),
        MmdEntry::new(VEND_PKG_ID2, MmdDevice::VendorSpecific),
    ];

    /// Register map of the LAN8742A
    pub const MAP: MmdRegisterMap = MmdRegisterMap::new(ENTRIES);
}

/// Issue phases A to C, leaving the data register pointed at `entry`
fn select<M: MdioBus>(mdio: &mut M, phy_addr: u8, entry: &MmdEntry) -> Result<()> {
    let devad = entry.device.devad() & DEVAD_MASK;
    mdio.write(phy_addr, phy_reg::MMD_CTRL, FUNCTION_ADDRESS | devad)?;
    mdio.write(phy_addr, phy_reg::MMD_DATA, entry.index)?;
    mdio.write(phy_addr, phy_reg::MMD_CTRL, FUNCTION_DATA | devad)
}

/// Read an MMD register by index.
///
/// # Errors
///
/// - `UnknownRegister` if `index` is not in `map`; no SMI access is made
/// - `Timeout` if any phase's busy bit never clears
pub fn mmd_read<M: MdioBus>(
    mdio: &mut M,
    map: &MmdRegisterMap,
    phy_addr: u8,
    index: u16,
) -> Result<u16> {
    let entry = map.lookup(index).ok_or(ResourceError::UnknownRegister)?;
    select(mdio, phy_addr, entry)?;
    mdio.read(phy_addr, phy_reg::MMD_DATA)
}

/// Write an MMD register by index.
///
/// # Errors
///
/// - `UnknownRegister` if `index` is not in `map`; no SMI access is made
/// - `Timeout` if any phase's busy bit never clears
pub fn mmd_write<M: MdioBus>(
    mdio: &mut M,
    map: &MmdRegisterMap,
    phy_addr: u8,
    index: u16,
    value: u16,
) -> Result<()> {
    let entry = map.lookup(index).ok_or(ResourceError::UnknownRegister)?;
    select(mdio, phy_addr, entry)?;
    mdio.write(phy_addr, phy_reg::MMD_DATA, value)
}

/// Read-modify-write an MMD register
pub fn mmd_modify<M, F>(
    mdio: &mut M,
    map: &MmdRegisterMap,
    phy_addr: u8,
    index: u16,
    f: F,
) -> Result<()>
where
    M: MdioBus,
    F: FnOnce(u16) -> u16,
{
    let value = mmd_read(mdio, map, phy_addr, index)?;
    mmd_write(mdio, map, phy_addr, index, f(value))
}

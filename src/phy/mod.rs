//! Ethernet PHY Drivers
//!
//! A generic PHY driver trait and the LAN8742A implementation used on
//! STM32F7 boards.
//!
//! The PHY layer talks to the chip only through the [`MdioBus`] trait, so a
//! driver works with any SMI controller and can be tested with the mock
//! register file.
//!
//! # Supported PHY Chips
//!
//! - [`Lan8742a`]: Microchip LAN8742A
//!
//! # Example
//!
//! ```ignore
//! use ph_stm32f7_periph::phy::{Lan8742a, PhyDriver};
//!
//! let mut mdio = eth.mdio();
//! let mut phy = Lan8742a::new(0);
//! phy.init(&mut mdio)?;
//!
//! while phy.link_status(&mut mdio)?.is_none() {}
//! ```
//!
//! [`MdioBus`]: crate::hal::mdio::MdioBus

pub mod generic;
pub mod lan8742a;

pub use generic::{LinkStatus, PhyDriver, Speed};
pub use lan8742a::{Lan8742a, LedFunction, LedIndex};

// Re-export IEEE 802.3 standard register definitions from mdio
pub use crate::hal::mdio::{anar, bmcr, bmsr, phy_reg};

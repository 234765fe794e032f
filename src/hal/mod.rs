//! Hardware Abstraction Layer
//!
//! Higher-level access to the PHY management interface.
//!
//! # Modules
//!
//! - [`mdio`]: Clause-22 MDIO/SMI bus with a busy-bit retry budget
//! - [`mmd`]: Indirect (MMD) register protocol over the clause-22 pair

pub mod mdio;
pub mod mmd;

// Re-export commonly used types
pub use mdio::{MdcClockDivider, MdioBus, MdioController, PhyStatus};
pub use mmd::{MmdDevice, MmdEntry, MmdRegisterMap, mmd_modify, mmd_read, mmd_write};

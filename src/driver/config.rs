//! Configuration types for the serial and Ethernet drivers

use super::error::{ParamError, ParamResult};
use crate::internal::constants::{
    DEFAULT_BAUD_RATE, DEFAULT_MAC_ADDR, DEFAULT_PHY_ADDR, ETH_HCLK_HZ, MAC_ADDR_LEN,
};
use crate::internal::register::usart::{cr1, cr2};

/// Smallest BRR value the oversampling-by-16 divider accepts
const BRR_MIN: u32 = 16;

/// Largest BRR value (16-bit register field)
const BRR_MAX: u32 = 0xFFFF;

/// Driver lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Not initialized
    #[default]
    Uninitialized,
    /// Initialized, hardware not programmed
    Closed,
    /// Hardware programmed and running
    Open,
}

// =============================================================================
// Serial Line Format
// =============================================================================

/// Number of data bits per character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    /// 8 data bits (encoding 0)
    #[default]
    Eight,
    /// 7 data bits (encoding 1)
    Seven,
}

impl TryFrom<u8> for DataBits {
    type Error = ParamError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(DataBits::Eight),
            1 => Ok(DataBits::Seven),
            _ => Err(ParamError::InvalidDataBits),
        }
    }
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    /// 1 stop bit (encoding 0)
    #[default]
    One,
    /// 2 stop bits (encoding 1)
    Two,
}

impl TryFrom<u8> for StopBits {
    type Error = ParamError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(StopBits::One),
            1 => Ok(StopBits::Two),
            _ => Err(ParamError::InvalidStopBits),
        }
    }
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    /// No parity (encoding 0)
    #[default]
    None,
    /// Even parity (encoding 1)
    Even,
    /// Odd parity (encoding 2)
    Odd,
}

impl TryFrom<u8> for Parity {
    type Error = ParamError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Parity::None),
            1 => Ok(Parity::Even),
            2 => Ok(Parity::Odd),
            _ => Err(ParamError::InvalidParity),
        }
    }
}

/// Serial line configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UsartConfig {
    /// Data bits per character
    pub data_bits: DataBits,
    /// Stop bits
    pub stop_bits: StopBits,
    /// Parity mode
    pub parity: Parity,
    /// Baud rate in bits per second
    pub baud_rate: u32,
}

impl Default for UsartConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl UsartConfig {
    /// 115200 baud, 8N1
    #[must_use]
    pub const fn new() -> Self {
        Self {
            data_bits: DataBits::Eight,
            stop_bits: StopBits::One,
            parity: Parity::None,
            baud_rate: DEFAULT_BAUD_RATE,
        }
    }

    /// Build a configuration from raw encodings, validating each field.
    ///
    /// Encodings: data bits 0 = eight, 1 = seven; stop bits 0 = one,
    /// 1 = two; parity 0 = none, 1 = even, 2 = odd.
    pub fn from_raw(data_bits: u8, stop_bits: u8, parity: u8) -> ParamResult<Self> {
        Ok(Self {
            data_bits: DataBits::try_from(data_bits)?,
            stop_bits: StopBits::try_from(stop_bits)?,
            parity: Parity::try_from(parity)?,
            baud_rate: DEFAULT_BAUD_RATE,
        })
    }

    /// Set data bits
    #[must_use]
    pub const fn with_data_bits(mut self, data_bits: DataBits) -> Self {
        self.data_bits = data_bits;
        self
    }

    /// Set stop bits
    #[must_use]
    pub const fn with_stop_bits(mut self, stop_bits: StopBits) -> Self {
        self.stop_bits = stop_bits;
        self
    }

    /// Set parity
    #[must_use]
    pub const fn with_parity(mut self, parity: Parity) -> Self {
        self.parity = parity;
        self
    }

    /// Set baud rate
    #[must_use]
    pub const fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Baud rate register value for a kernel clock, rounded to nearest.
    ///
    /// # Errors
    ///
    /// `InvalidBaudRate` if the divider falls outside 16..=0xFFFF.
    pub const fn brr(&self, kernel_clk_hz: u32) -> ParamResult<u32> {
        if self.baud_rate == 0 {
            return Err(ParamError::InvalidBaudRate);
        }
        let clk = kernel_clk_hz as u64;
        let baud = self.baud_rate as u64;
        let div = (clk + baud / 2) / baud;
        if div < BRR_MIN as u64 || div > BRR_MAX as u64 {
            return Err(ParamError::InvalidBaudRate);
        }
        Ok(div as u32)
    }

    /// CR1 word-length and parity bits.
    ///
    /// The frame length includes the parity bit: 7 bits → M1, 8 bits →
    /// neither, 9 bits → M0.
    pub const fn cr1_bits(&self) -> u32 {
        let has_parity = !matches!(self.parity, Parity::None);
        let data = match self.data_bits {
            DataBits::Seven => 7,
            DataBits::Eight => 8,
        };
        let word = if has_parity { data + 1 } else { data };

        let mut bits = match word {
            7 => cr1::M1,
            9 => cr1::M0,
            _ => 0,
        };
        match self.parity {
            Parity::None => {}
            Parity::Even => bits |= cr1::PCE,
            Parity::Odd => bits |= cr1::PCE | cr1::PS,
        }
        bits
    }

    /// CR2 stop-bit field
    pub const fn cr2_bits(&self) -> u32 {
        match self.stop_bits {
            StopBits::One => 0,
            StopBits::Two => cr2::STOP_2,
        }
    }
}

// =============================================================================
// Ethernet
// =============================================================================

/// Ethernet duplex mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Duplex {
    /// Half duplex
    Half,
    /// Full duplex
    #[default]
    Full,
}

/// Ethernet transport configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EthConfig {
    /// MAC address (6 bytes)
    pub mac_address: [u8; MAC_ADDR_LEN],
    /// Duplex mode
    pub duplex: Duplex,
    /// Internal MAC loopback with receive-own disabled
    pub loopback: bool,
    /// Reset and mask the MMC counters
    pub mmc_counters: bool,
    /// Enable PTP timestamping
    pub timestamping: bool,
    /// PHY address on the SMI bus (0-31)
    pub phy_address: u8,
    /// AHB clock feeding the MAC in Hz
    pub hclk_hz: u32,
}

impl Default for EthConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EthConfig {
    /// Create a new configuration with defaults
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mac_address: DEFAULT_MAC_ADDR,
            duplex: Duplex::Full,
            loopback: true,
            mmc_counters: true,
            timestamping: true,
            phy_address: DEFAULT_PHY_ADDR,
            hclk_hz: ETH_HCLK_HZ,
        }
    }

    /// Set MAC address
    #[must_use]
    pub const fn with_mac_address(mut self, mac: [u8; MAC_ADDR_LEN]) -> Self {
        self.mac_address = mac;
        self
    }

    /// Set duplex mode
    #[must_use]
    pub const fn with_duplex(mut self, duplex: Duplex) -> Self {
        self.duplex = duplex;
        self
    }

    /// Enable or disable internal loopback
    #[must_use]
    pub const fn with_loopback(mut self, enabled: bool) -> Self {
        self.loopback = enabled;
        self
    }

    /// Enable or disable MMC counter setup
    #[must_use]
    pub const fn with_mmc_counters(mut self, enabled: bool) -> Self {
        self.mmc_counters = enabled;
        self
    }

    /// Enable or disable PTP timestamping
    #[must_use]
    pub const fn with_timestamping(mut self, enabled: bool) -> Self {
        self.timestamping = enabled;
        self
    }

    /// Set PHY address
    #[must_use]
    pub const fn with_phy_address(mut self, addr: u8) -> Self {
        self.phy_address = addr;
        self
    }

    /// Set HCLK frequency
    #[must_use]
    pub const fn with_hclk_hz(mut self, hz: u32) -> Self {
        self.hclk_hz = hz;
        self
    }

    /// Check the configuration before any register is touched.
    ///
    /// # Errors
    ///
    /// - `InvalidMacAddress` for a multicast or all-zero address
    /// - `InvalidPhyAddress` for an address above 31
    pub const fn validate(&self) -> ParamResult<()> {
        let mac = &self.mac_address;
        if mac[0] & 0x01 != 0 {
            return Err(ParamError::InvalidMacAddress);
        }
        if mac[0] == 0 && mac[1] == 0 && mac[2] == 0 && mac[3] == 0 && mac[4] == 0 && mac[5] == 0
        {
            return Err(ParamError::InvalidMacAddress);
        }
        if self.phy_address > 31 {
            return Err(ParamError::InvalidPhyAddress);
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! STM32F7 Ethernet MAC, MMC, PTP and DMA register map
//!
//! The block is a Synopsys DWMAC; offsets are relative to [`ETH_BASE`].

use super::RegisterOffset;

/// Ethernet peripheral base address (AHB1)
pub const ETH_BASE: usize = 0x4002_8000;

/// Ethernet global interrupt number
pub const ETH_IRQN: u16 = 61;

/// ETH registers used by the transmitter and SMI controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EthReg {
    /// MAC configuration
    MacCr,
    /// MAC frame filter
    MacFfr,
    /// MAC hash table high
    MacHthr,
    /// MAC hash table low
    MacHtlr,
    /// MAC MII address (SMI control)
    MacMiiar,
    /// MAC MII data (SMI data)
    MacMiidr,
    /// MAC flow control
    MacFcr,
    /// MAC VLAN tag
    MacVlantr,
    /// MAC PMT control and status
    MacPmtcsr,
    /// MAC address 0 high
    MacA0hr,
    /// MAC address 0 low
    MacA0lr,
    /// MMC control
    MmcCr,
    /// MMC receive interrupt mask
    MmcRimr,
    /// MMC transmit interrupt mask
    MmcTimr,
    /// PTP time stamp control
    PtpTscr,
    /// DMA bus mode
    DmaBmr,
    /// DMA transmit poll demand
    DmaTpdr,
    /// DMA transmit descriptor list address
    DmaTdlar,
    /// DMA status
    DmaSr,
    /// DMA operation mode
    DmaOmr,
    /// DMA interrupt enable
    DmaIer,
}

impl RegisterOffset for EthReg {
    #[inline(always)]
    fn offset(self) -> usize {
        match self {
            EthReg::MacCr => 0x0000,
            EthReg::MacFfr => 0x0004,
            EthReg::MacHthr => 0x0008,
            EthReg::MacHtlr => 0x000C,
            EthReg::MacMiiar => 0x0010,
            EthReg::MacMiidr => 0x0014,
            EthReg::MacFcr => 0x0018,
            EthReg::MacVlantr => 0x001C,
            EthReg::MacPmtcsr => 0x002C,
            EthReg::MacA0hr => 0x0040,
            EthReg::MacA0lr => 0x0044,
            EthReg::MmcCr => 0x0100,
            EthReg::MmcRimr => 0x010C,
            EthReg::MmcTimr => 0x0110,
            EthReg::PtpTscr => 0x0700,
            EthReg::DmaBmr => 0x1000,
            EthReg::DmaTpdr => 0x1004,
            EthReg::DmaTdlar => 0x1010,
            EthReg::DmaSr => 0x1014,
            EthReg::DmaOmr => 0x1018,
            EthReg::DmaIer => 0x101C,
        }
    }
}

/// MACCR bits
pub mod maccr {
    /// Receiver enable
    pub const RE: u32 = 1 << 2;
    /// Transmitter enable
    pub const TE: u32 = 1 << 3;
    /// Automatic pad/CRC stripping
    pub const APCS: u32 = 1 << 7;
    /// IPv4 checksum offload
    pub const IPCO: u32 = 1 << 10;
    /// Duplex mode (full if set)
    pub const DM: u32 = 1 << 11;
    /// Loopback mode
    pub const LM: u32 = 1 << 12;
    /// Receive own disable
    pub const ROD: u32 = 1 << 13;
    /// Fast Ethernet speed (100 Mbps if set)
    pub const FES: u32 = 1 << 14;
    /// CRC stripping for type frames
    pub const CSTF: u32 = 1 << 25;
}

/// MACMIIAR bits
pub mod macmiiar {
    /// MII busy
    pub const MB: u32 = 1 << 0;
    /// MII write
    pub const MW: u32 = 1 << 1;
    /// Clock range shift
    pub const CR_SHIFT: u32 = 2;
    /// Clock range mask
    pub const CR_MASK: u32 = 0x7 << CR_SHIFT;
    /// MII register shift
    pub const MR_SHIFT: u32 = 6;
    /// MII register mask
    pub const MR_MASK: u32 = 0x1F << MR_SHIFT;
    /// PHY address shift
    pub const PA_SHIFT: u32 = 11;
    /// PHY address mask
    pub const PA_MASK: u32 = 0x1F << PA_SHIFT;
}

/// MMCCR bits
pub mod mmccr {
    /// Counter reset
    pub const CR: u32 = 1 << 0;
    /// Reset on read
    pub const ROR: u32 = 1 << 2;
}

/// MMC interrupt mask bits
pub mod mmc_mask {
    /// Received frames CRC error
    pub const RFCEM: u32 = 1 << 5;
    /// Received frames alignment error
    pub const RFAEM: u32 = 1 << 6;
    /// Received good unicast frames
    pub const RGUFM: u32 = 1 << 17;
    /// Transmitted good frames single collision
    pub const TGFSCM: u32 = 1 << 14;
    /// Transmitted good frames more than single collision
    pub const TGFMSCM: u32 = 1 << 15;
    /// Transmitted good frames
    pub const TGFM: u32 = 1 << 21;
    /// All maskable receive interrupts
    pub const RX_ALL: u32 = RFCEM | RFAEM | RGUFM;
    /// All maskable transmit interrupts
    pub const TX_ALL: u32 = TGFSCM | TGFMSCM | TGFM;
}

/// PTPTSCR bits
pub mod ptptscr {
    /// Time stamp enable
    pub const TSE: u32 = 1 << 0;
    /// Snapshot for IPv4 frames
    pub const TSSIPV4FE: u32 = 1 << 13;
    /// Snapshot for event messages
    pub const TSSEME: u32 = 1 << 14;
    /// Snapshot for master messages
    pub const TSSMRME: u32 = 1 << 15;
    /// Time stamp PTP frame filtering by MAC address
    pub const TSPFFMAE: u32 = 1 << 18;
}

/// DMABMR bits
pub mod dmabmr {
    /// Software reset
    pub const SR: u32 = 1 << 0;
    /// Programmable burst length shift
    pub const PBL_SHIFT: u32 = 8;
    /// Burst length of 16 beats
    pub const PBL_16: u32 = 16 << PBL_SHIFT;
    /// Fixed burst
    pub const FB: u32 = 1 << 16;
    /// Address-aligned beats
    pub const AAB: u32 = 1 << 25;
}

/// DMASR bits (write 1 to clear)
pub mod dmasr {
    /// Transmit status (frame transmitted)
    pub const TS: u32 = 1 << 0;
    /// Transmit process stopped
    pub const TPSS: u32 = 1 << 1;
    /// Transmit buffer unavailable
    pub const TBUS: u32 = 1 << 2;
    /// Transmit underflow
    pub const TUS: u32 = 1 << 5;
    /// Receive status
    pub const RS: u32 = 1 << 6;
    /// Fatal bus error
    pub const FBES: u32 = 1 << 13;
    /// Abnormal interrupt summary
    pub const AIS: u32 = 1 << 15;
    /// Normal interrupt summary
    pub const NIS: u32 = 1 << 16;
    /// Error bits shift
    pub const EBS_SHIFT: u32 = 23;
    /// Error bits mask (read only)
    pub const EBS_MASK: u32 = 0x7 << EBS_SHIFT;
    /// Bits that are cleared by writing 1
    pub const W1C_MASK: u32 = 0x0001_E7FF;
}

/// DMAOMR bits
pub mod dmaomr {
    /// Start/stop transmission
    pub const ST: u32 = 1 << 13;
}

/// DMAIER bits
pub mod dmaier {
    /// Transmit interrupt enable
    pub const TIE: u32 = 1 << 0;
    /// Transmit buffer unavailable interrupt enable
    pub const TBUIE: u32 = 1 << 2;
    /// Fatal bus error interrupt enable
    pub const FBEIE: u32 = 1 << 13;
    /// Abnormal interrupt summary enable
    pub const AISE: u32 = 1 << 15;
    /// Normal interrupt summary enable
    pub const NISE: u32 = 1 << 16;
}

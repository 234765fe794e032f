//! STM32F7 USART register map

use super::RegisterOffset;

/// USART1 base address (APB2)
pub const USART1_BASE: usize = 0x4001_1000;

/// USART2 base address (APB1)
pub const USART2_BASE: usize = 0x4000_4400;

/// USART1 global interrupt number
pub const USART1_IRQN: u16 = 37;

/// USART2 global interrupt number
pub const USART2_IRQN: u16 = 38;

/// USART registers used by the serial driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UsartReg {
    /// Control register 1
    Cr1,
    /// Control register 2
    Cr2,
    /// Control register 3
    Cr3,
    /// Baud rate register
    Brr,
    /// Interrupt and status register
    Isr,
    /// Interrupt flag clear register
    Icr,
    /// Receive data register
    Rdr,
    /// Transmit data register
    Tdr,
}

impl RegisterOffset for UsartReg {
    #[inline(always)]
    fn offset(self) -> usize {
        match self {
            UsartReg::Cr1 => 0x00,
            UsartReg::Cr2 => 0x04,
            UsartReg::Cr3 => 0x08,
            UsartReg::Brr => 0x0C,
            UsartReg::Isr => 0x1C,
            UsartReg::Icr => 0x20,
            UsartReg::Rdr => 0x24,
            UsartReg::Tdr => 0x28,
        }
    }
}

/// CR1 bits
pub mod cr1 {
    /// USART enable
    pub const UE: u32 = 1 << 0;
    /// Receiver enable
    pub const RE: u32 = 1 << 2;
    /// Transmitter enable
    pub const TE: u32 = 1 << 3;
    /// RXNE interrupt enable
    pub const RXNEIE: u32 = 1 << 5;
    /// Transmission complete interrupt enable
    pub const TCIE: u32 = 1 << 6;
    /// TXE interrupt enable
    pub const TXEIE: u32 = 1 << 7;
    /// Parity error interrupt enable
    pub const PEIE: u32 = 1 << 8;
    /// Parity selection (odd if set)
    pub const PS: u32 = 1 << 9;
    /// Parity control enable
    pub const PCE: u32 = 1 << 10;
    /// Word length bit 0
    pub const M0: u32 = 1 << 12;
    /// Word length bit 1
    pub const M1: u32 = 1 << 28;
}

/// CR2 bits
pub mod cr2 {
    /// Stop bits field shift
    pub const STOP_SHIFT: u32 = 12;
    /// Stop bits field mask
    pub const STOP_MASK: u32 = 0x3 << STOP_SHIFT;
    /// Two stop bits
    pub const STOP_2: u32 = 0x2 << STOP_SHIFT;
}

/// CR3 bits
pub mod cr3 {
    /// Error interrupt enable (framing, overrun, noise)
    pub const EIE: u32 = 1 << 0;
}

/// ISR bits
pub mod isr {
    /// Parity error
    pub const PE: u32 = 1 << 0;
    /// Framing error
    pub const FE: u32 = 1 << 1;
    /// Noise detected
    pub const NF: u32 = 1 << 2;
    /// Overrun error
    pub const ORE: u32 = 1 << 3;
    /// Read data register not empty
    pub const RXNE: u32 = 1 << 5;
    /// Transmission complete
    pub const TC: u32 = 1 << 6;
    /// Transmit data register empty
    pub const TXE: u32 = 1 << 7;
    /// All line error flags
    pub const ERRORS: u32 = PE | FE | NF | ORE;
}

/// ICR bits (write 1 to clear)
pub mod icr {
    /// Parity error clear
    pub const PECF: u32 = 1 << 0;
    /// Framing error clear
    pub const FECF: u32 = 1 << 1;
    /// Noise detected clear
    pub const NCF: u32 = 1 << 2;
    /// Overrun error clear
    pub const ORECF: u32 = 1 << 3;
    /// Transmission complete clear
    pub const TCCF: u32 = 1 << 6;
}

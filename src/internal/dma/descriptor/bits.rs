//! TX DMA descriptor bit field constants.
//!
//! Normal (4-word) descriptor layout of the STM32F7 Ethernet DMA.

// =============================================================================
// TDES0 (TX Descriptor Word 0) - Status and Control
// =============================================================================

/// TX Descriptor Word 0 bit field constants
pub mod tdes0 {
    /// Deferred Bit - frame transmission deferred (half-duplex)
    pub const DEFERRED: u32 = 1 << 0;
    /// Underflow Error - TX FIFO underflow during transmission
    pub const UNDERFLOW_ERR: u32 = 1 << 1;
    /// Excessive Deferral - transmission deferred for too long
    pub const EXCESSIVE_DEFERRAL: u32 = 1 << 2;
    /// Collision Count shift (4 bits)
    pub const COLLISION_COUNT_SHIFT: u32 = 3;
    /// Collision Count mask
    pub const COLLISION_COUNT_MASK: u32 = 0xF << 3;
    /// Excessive Collision - transmission aborted after 16 collisions
    pub const EXCESSIVE_COLLISION: u32 = 1 << 8;
    /// Late Collision - collision after 64 byte times
    pub const LATE_COLLISION: u32 = 1 << 9;
    /// No Carrier - carrier sense signal not asserted
    pub const NO_CARRIER: u32 = 1 << 10;
    /// Loss of Carrier - carrier lost during transmission
    pub const LOSS_OF_CARRIER: u32 = 1 << 11;
    /// IP Payload Error - checksum insertion failed for payload
    pub const IP_PAYLOAD_ERR: u32 = 1 << 12;
    /// Frame Flushed - frame flushed by software
    pub const FRAME_FLUSHED: u32 = 1 << 13;
    /// Jabber Timeout - transmitter jabber timer expired
    pub const JABBER_TIMEOUT: u32 = 1 << 14;
    /// Error Summary - logical OR of error bits
    pub const ERR_SUMMARY: u32 = 1 << 15;
    /// IP Header Error - checksum insertion failed for header
    pub const IP_HEADER_ERR: u32 = 1 << 16;
    /// Second Address Chained - TDES3 holds the next descriptor address
    pub const SECOND_ADDR_CHAINED: u32 = 1 << 20;
    /// Transmit End of Ring
    pub const TX_END_OF_RING: u32 = 1 << 21;
    /// First Segment - buffer holds the first segment of a frame
    pub const FIRST_SEGMENT: u32 = 1 << 28;
    /// Last Segment - buffer holds the last segment of a frame
    pub const LAST_SEGMENT: u32 = 1 << 29;
    /// Interrupt on Completion - set TS in DMASR when this frame is sent
    pub const INTERRUPT_ON_COMPLETE: u32 = 1 << 30;
    /// OWN - when set, descriptor owned by DMA; when clear, owned by CPU
    pub const OWN: u32 = 1 << 31;

    /// All possible TX error bits
    pub const ALL_ERRORS: u32 = UNDERFLOW_ERR
        | EXCESSIVE_DEFERRAL
        | EXCESSIVE_COLLISION
        | LATE_COLLISION
        | NO_CARRIER
        | LOSS_OF_CARRIER
        | IP_PAYLOAD_ERR
        | FRAME_FLUSHED
        | JABBER_TIMEOUT
        | IP_HEADER_ERR;
}

// =============================================================================
// TDES1 (TX Descriptor Word 1) - Buffer Sizes
// =============================================================================

/// TX Descriptor Word 1 bit field constants
pub mod tdes1 {
    /// TX Buffer 1 Size mask (13 bits)
    pub const BUFFER1_SIZE_MASK: u32 = 0x1FFF;
}

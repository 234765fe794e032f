//! Ethernet TX DMA
//!
//! - [`TxDescriptor`]: one buffer segment handed to the transfer engine
//! - [`TxDescriptors`]: statically allocated, cache-line aligned descriptor storage
//! - [`DescriptorRing`]: wraparound cursor over the descriptor storage
//!
//! Descriptors only ever point at caller-owned buffers; the driver copies no
//! payload.

mod descriptor;
mod ring;

pub use descriptor::bits;
pub use descriptor::{TxDescriptor, TxDescriptors};
pub use ring::DescriptorRing;

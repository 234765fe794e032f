//! Error types for the STM32F7 peripheral drivers
//!
//! Errors are organized by domain for better diagnostics:
//! - [`ParamError`]: Invalid arguments, always checked before any state or register access
//! - [`ResourceError`]: Operation attempted in the wrong state or on an unknown resource
//! - [`IoError`]: Hardware did not respond within its retry budget
//! - [`DmaError`]: Descriptor ring and transfer engine failures
//!
//! The unified [`Error`] enum wraps all domain errors and is returned
//! by most driver methods. [`Error::kind`] collapses it into the four
//! categories callers usually branch on.

// =============================================================================
// Parameter Errors
// =============================================================================

/// Invalid argument errors
///
/// These are detected before any state check or register access and are
/// never retried by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParamError {
    /// Channel id out of range
    InvalidChannel,
    /// Data bit encoding out of range
    InvalidDataBits,
    /// Stop bit encoding out of range
    InvalidStopBits,
    /// Parity encoding out of range
    InvalidParity,
    /// Baud rate cannot be generated from the channel kernel clock
    InvalidBaudRate,
    /// Empty buffer where data is required
    EmptyBuffer,
    /// Invalid PHY address (must be 0-31)
    InvalidPhyAddress,
    /// Invalid PHY register address (must be 0-31)
    InvalidRegister,
    /// MAC address is zero or multicast
    InvalidMacAddress,
}

impl core::fmt::Display for ParamError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ParamError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ParamError::InvalidChannel => "invalid channel",
            ParamError::InvalidDataBits => "invalid data bits",
            ParamError::InvalidStopBits => "invalid stop bits",
            ParamError::InvalidParity => "invalid parity",
            ParamError::InvalidBaudRate => "invalid baud rate",
            ParamError::EmptyBuffer => "empty buffer",
            ParamError::InvalidPhyAddress => "invalid PHY address",
            ParamError::InvalidRegister => "invalid PHY register",
            ParamError::InvalidMacAddress => "invalid MAC address",
        }
    }
}

// =============================================================================
// Resource Errors
// =============================================================================

/// Wrong-state and unknown-resource errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResourceError {
    /// Operation requires the Closed state
    NotClosed,
    /// Operation requires the Open state
    NotOpen,
    /// Indirect register index is not in the register map
    UnknownRegister,
    /// Operation is declared but not supported
    NotSupported,
}

impl core::fmt::Display for ResourceError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ResourceError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ResourceError::NotClosed => "not closed",
            ResourceError::NotOpen => "not open",
            ResourceError::UnknownRegister => "unknown indirect register",
            ResourceError::NotSupported => "operation not supported",
        }
    }
}

// =============================================================================
// I/O Errors
// =============================================================================

/// Hardware response errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IoError {
    /// Busy bit did not clear within the retry budget
    Timeout,
}

impl core::fmt::Display for IoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl IoError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            IoError::Timeout => "operation timed out",
        }
    }
}

// =============================================================================
// DMA Errors
// =============================================================================

/// Descriptor ring and transfer engine errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DmaError {
    /// Transfer engine reported an abort; the frame must be re-submitted
    FatalBusError,
    /// Descriptor is busy (owned by DMA hardware)
    DescriptorBusy,
    /// Engine wrote back an error summary for the frame
    FrameError,
}

impl core::fmt::Display for DmaError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DmaError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            DmaError::FatalBusError => "fatal DMA bus error",
            DmaError::DescriptorBusy => "descriptor busy",
            DmaError::FrameError => "frame transmit error",
        }
    }
}

// =============================================================================
// Unified Error Type
// =============================================================================

/// Coarse error category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorKind {
    /// Bad argument
    Parameter,
    /// Wrong state or unknown resource
    Resource,
    /// Hardware busy bit never cleared
    Timeout,
    /// Transfer aborted or rejected by the engine
    Fatal,
}

/// This enum wraps all domain-specific errors for unified error handling.
///
/// Match on the inner domain error for specific handling:
/// ```ignore
/// match result {
///     Err(Error::Param(ParamError::EmptyBuffer)) => { /* ... */ }
///     Err(Error::Resource(ResourceError::NotOpen)) => { /* ... */ }
///     Err(Error::Dma(DmaError::FatalBusError)) => { /* re-submit */ }
///     _ => {}
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Parameter error
    Param(ParamError),
    /// Resource error
    Resource(ResourceError),
    /// I/O error
    Io(IoError),
    /// DMA error
    Dma(DmaError),
}

impl Error {
    /// Category of this error
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Error::Param(_) => ErrorKind::Parameter,
            Error::Resource(_) => ErrorKind::Resource,
            Error::Io(IoError::Timeout) => ErrorKind::Timeout,
            Error::Dma(DmaError::FatalBusError | DmaError::FrameError) => ErrorKind::Fatal,
            Error::Dma(DmaError::DescriptorBusy) => ErrorKind::Resource,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Param(e) => write!(f, "param: {}", e.as_str()),
            Error::Resource(e) => write!(f, "resource: {}", e.as_str()),
            Error::Io(e) => write!(f, "io: {}", e.as_str()),
            Error::Dma(e) => write!(f, "dma: {}", e.as_str()),
        }
    }
}

impl core::error::Error for Error {}

// From impls for automatic conversion
impl From<ParamError> for Error {
    fn from(e: ParamError) -> Self {
        Error::Param(e)
    }
}

impl From<ResourceError> for Error {
    fn from(e: ResourceError) -> Self {
        Error::Resource(e)
    }
}

impl From<IoError> for Error {
    fn from(e: IoError) -> Self {
        Error::Io(e)
    }
}

impl From<DmaError> for Error {
    fn from(e: DmaError) -> Self {
        Error::Dma(e)
    }
}

/// Result type alias for driver operations
pub type Result<T> = core::result::Result<T, Error>;

/// Result type alias for parameter validation
pub type ParamResult<T> = core::result::Result<T, ParamError>;

/// Result type alias for state checks
pub type ResourceResult<T> = core::result::Result<T, ResourceError>;

/// Result type alias for I/O operations
pub type IoResult<T> = core::result::Result<T, IoError>;

/// Result type alias for DMA operations
pub type DmaResult<T> = core::result::Result<T, DmaError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    extern crate std;
    use std::format;

    use super::*;

    #[test]
    fn param_error_as_str_non_empty() {
        let variants = [
            ParamError::InvalidChannel,
            ParamError::InvalidDataBits,
            ParamError::InvalidStopBits,
            ParamError::InvalidParity,
            ParamError::InvalidBaudRate,
            ParamError::EmptyBuffer,
            ParamError::InvalidPhyAddress,
            ParamError::InvalidRegister,
            ParamError::InvalidMacAddress,
        ];

        for variant in variants {
            let s = variant.as_str();
            assert!(!s.is_empty(), "ParamError::{:?} has empty string", variant);
        }
    }

    #[test]
    fn resource_error_display() {
        let err = ResourceError::NotClosed;
        assert_eq!(format!("{}", err), "not closed");
    }

    #[test]
    fn error_from_domain_errors() {
        assert_eq!(
            Error::from(ParamError::EmptyBuffer),
            Error::Param(ParamError::EmptyBuffer)
        );
        assert_eq!(
            Error::from(ResourceError::NotOpen),
            Error::Resource(ResourceError::NotOpen)
        );
        assert_eq!(Error::from(IoError::Timeout), Error::Io(IoError::Timeout));
        assert_eq!(
            Error::from(DmaError::FatalBusError),
            Error::Dma(DmaError::FatalBusError)
        );
    }

    #[test]
    fn error_kind_mapping() {
        assert_eq!(
            Error::from(ParamError::InvalidChannel).kind(),
            ErrorKind::Parameter
        );
        assert_eq!(
            Error::from(ResourceError::UnknownRegister).kind(),
            ErrorKind::Resource
        );
        assert_eq!(Error::from(IoError::Timeout).kind(), ErrorKind::Timeout);
        assert_eq!(Error::from(DmaError::FatalBusError).kind(), ErrorKind::Fatal);
        assert_eq!(Error::from(DmaError::FrameError).kind(), ErrorKind::Fatal);
        assert_eq!(
            Error::from(DmaError::DescriptorBusy).kind(),
            ErrorKind::Resource
        );
    }

    #[test]
    fn error_display_prefixes_domain() {
        let display = format!("{}", Error::Dma(DmaError::FatalBusError));
        assert!(display.contains("dma"));
        assert!(display.contains("bus error"));

        let display = format!("{}", Error::Resource(ResourceError::NotOpen));
        assert!(display.starts_with("resource"));
    }

    #[test]
    fn result_type_works() {
        fn test_fn() -> Result<u32> {
            Err(ParamError::InvalidParity)?
        }

        assert_eq!(test_fn(), Err(Error::Param(ParamError::InvalidParity)));
    }
}

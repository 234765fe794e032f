//! External Stack Integrations
//!
//! - **embedded-io** (`embedded_io`): byte stream traits for the blocking
//!   serial adapter
//!   - Implements `embedded_io::{Read, Write}` for `BlockingSerial`
//!   - Maps driver errors onto `embedded_io::ErrorKind`
//!   - Requires `embedded-io` feature
//!
//! # Example
//!
//! ```ignore
//! use embedded_io::Write;
//!
//! console.write_all(b"link up\r\n")?;
//! ```

#[cfg(feature = "embedded-io")]
pub mod embedded_io;

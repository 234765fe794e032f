//! embedded-io Integration
#![cfg_attr(docsrs, doc(cfg(feature = "embedded-io")))]
//!
//! Implements [`embedded_io::Read`] and [`embedded_io::Write`] for
//! [`BlockingSerial`], so the console can be handed to any crate that
//! speaks the embedded-io byte stream traits (formatters, line editors,
//! protocol codecs).
//!
//! Every call uses the adapter's I/O timeout
//! ([`with_io_timeout`](BlockingSerial::with_io_timeout), `Forever` by
//! default). The traits forbid returning `Ok(0)` for a non-empty buffer, so
//! an expired timeout with nothing transferred becomes
//! [`IoError::Timeout`].
//!
//! # Example
//!
//! ```ignore
//! use embedded_io::Write;
//!
//! let mut console = BlockingSerial::new(&CONSOLE, &SIGNALS, waiter)
//!     .with_io_timeout(Timeout::Millis(100));
//! console.open_device(SerialDevice::Console)?;
//! console.write_all(b"boot\r\n")?;
//! ```

use crate::driver::blocking::BlockingSerial;
use crate::driver::error::{Error, IoError, ResourceError};
use crate::internal::register::RegisterBlock;
use crate::internal::register::usart::UsartReg;
use crate::sync::SignalWait;

use embedded_io::{ErrorKind, ErrorType, Read, Write};

impl embedded_io::Error for Error {
    fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(IoError::Timeout) => ErrorKind::TimedOut,
            Error::Param(_) => ErrorKind::InvalidInput,
            Error::Resource(ResourceError::NotOpen) => ErrorKind::NotConnected,
            _ => ErrorKind::Other,
        }
    }
}

impl<R, W, const N: usize> ErrorType for BlockingSerial<'_, '_, R, W, N>
where
    R: RegisterBlock<UsartReg>,
    W: SignalWait,
{
    type Error = Error;
}

impl<R, W, const N: usize> Read for BlockingSerial<'_, '_, R, W, N>
where
    R: RegisterBlock<UsartReg>,
    W: SignalWait,
{
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let timeout = self.io_timeout();
        let received = self.recv(buf, timeout)?;
        if received == 0 && !buf.is_empty() {
            return Err(IoError::Timeout.into());
        }
        Ok(received)
    }
}

impl<R, W, const N: usize> Write for BlockingSerial<'_, '_, R, W, N>
where
    R: RegisterBlock<UsartReg>,
    W: SignalWait,
{
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        let timeout = self.io_timeout();
        let sent = self.send(buf, timeout)?;
        if sent == 0 && !buf.is_empty() {
            return Err(IoError::Timeout.into());
        }
        Ok(sent)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        let timeout = self.io_timeout();
        if BlockingSerial::flush(self, timeout)? {
            Ok(())
        } else {
            Err(IoError::Timeout.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::blocking::SerialSignals;
    use crate::driver::error::ParamError;
    use crate::driver::config::UsartConfig;
    use crate::driver::serial::{ChannelId, SerialChannel};
    use crate::sync::Timeout;
    use crate::testing::{MockUsartRegs, MockWaiter};

    fn channel(regs: &MockUsartRegs) -> SerialChannel<'_, &MockUsartRegs, 8> {
        let channel = SerialChannel::new(ChannelId::Usart1, regs);
        channel.init().unwrap();
        channel
    }

    #[test]
    fn error_kinds() {
        assert_eq!(embedded_io::Error::kind(&Error::from(IoError::Timeout)), ErrorKind::TimedOut);
        assert_eq!(
            embedded_io::Error::kind(&Error::from(ParamError::InvalidBaudRate)),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            embedded_io::Error::kind(&Error::from(ResourceError::NotOpen)),
            ErrorKind::NotConnected
        );
        assert_eq!(
            embedded_io::Error::kind(&Error::from(ResourceError::NotSupported)),
            ErrorKind::Other
        );
    }

    #[test]
    fn write_all_drains_through_interrupts() {
        let regs = MockUsartRegs::new();
        let signals = SerialSignals::new();
        let channel = channel(&regs);
        let mut serial = BlockingSerial::new(&channel, &signals, MockWaiter::new(|| channel.on_interrupt()));
        serial.open(UsartConfig::new()).unwrap();

        serial.write_all(b"hello, world").unwrap();
        Write::flush(&mut serial).unwrap();
        assert_eq!(regs.transmitted(), b"hello, world");
    }

    #[test]
    fn read_times_out_instead_of_returning_zero() {
        let regs = MockUsartRegs::new();
        let signals = SerialSignals::new();
        let channel = channel(&regs);
        let mut serial = BlockingSerial::new(&channel, &signals, MockWaiter::idle())
            .with_io_timeout(Timeout::Millis(20));
        serial.open(UsartConfig::new()).unwrap();

        let mut buf = [0u8; 4];
        assert_eq!(serial.read(&mut buf), Err(Error::Io(IoError::Timeout)));
        assert_eq!(serial.read(&mut []), Ok(0));
    }

    #[test]
    fn read_returns_buffered_bytes() {
        let regs = MockUsartRegs::new();
        let signals = SerialSignals::new();
        let channel = channel(&regs);
        let mut serial = BlockingSerial::new(&channel, &signals, MockWaiter::idle());
        serial.open(UsartConfig::new()).unwrap();

        regs.inject_rx(b'o');
        channel.on_interrupt();
        regs.inject_rx(b'k');
        channel.on_interrupt();

        let mut buf = [0u8; 4];
        assert_eq!(serial.read(&mut buf), Ok(2));
        assert_eq!(&buf[..2], b"ok");
    }
}

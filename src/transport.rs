use std::io;
use std::path::Path;

use i2cdev::core::I2CTransfer;
use i2cdev::linux::{LinuxI2CBus, LinuxI2CMessage};

/// Abstracts the two raw primitives a DDC/CI [`crate::Device`] needs: send
/// a single outgoing message, and receive a single incoming message of a
/// known maximum length. Everything above this trait — framing, timing,
/// EDID, capability parsing — is transport-agnostic, which is what makes
/// the mock transport in `#[cfg(test)]` possible.
pub trait DdcTransport {
    /// Writes `bytes` as a single I2C message to `addr`.
    fn write(&mut self, addr: u8, bytes: &[u8]) -> io::Result<()>;

    /// Reads up to `buf.len()` bytes as a single I2C message from `addr`,
    /// returning the number of bytes actually placed in `buf`.
    fn read(&mut self, addr: u8, buf: &mut [u8]) -> io::Result<usize>;
}

/// [`DdcTransport`] over a Linux `i2c-dev` character device, using
/// `ioctl(fd, I2C_RDWR, ...)` via the `i2cdev` crate — the same syscall
/// path `libddc_device_i2c_write`/`_read` used in the original C.
pub struct LinuxI2cTransport {
    bus: LinuxI2CBus,
}

impl LinuxI2cTransport {
    /// Opens the I2C character device at `path` (e.g. `/dev/i2c-4`).
    pub fn from_path<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let bus = LinuxI2CBus::new(path).map_err(to_io_error)?;
        Ok(LinuxI2cTransport { bus })
    }
}

fn to_io_error<E: std::error::Error + Send + Sync + 'static>(err: E) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err)
}

impl DdcTransport for LinuxI2cTransport {
    fn write(&mut self, addr: u8, bytes: &[u8]) -> io::Result<()> {
        let mut messages = [LinuxI2CMessage::write(bytes).with_address(addr as u16)];
        self.bus.transfer(&mut messages).map_err(to_io_error)?;
        Ok(())
    }

    fn read(&mut self, addr: u8, buf: &mut [u8]) -> io::Result<usize> {
        let len = buf.len();
        let mut messages = [LinuxI2CMessage::read(buf).with_address(addr as u16)];
        self.bus.transfer(&mut messages).map_err(to_io_error)?;
        Ok(len)
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use super::DdcTransport;
    use std::collections::VecDeque;
    use std::io;

    #[derive(Debug, Clone)]
    pub(crate) enum Expectation {
        Write { addr: u8, expected: Vec<u8> },
        Read { addr: u8, reply: Vec<u8> },
    }

    /// Scripted transport for unit tests: asserts every call matches the
    /// next expectation in program order and fails loudly on mismatch, so
    /// a test failure points straight at the offending transaction.
    #[derive(Default)]
    pub(crate) struct MockTransport {
        expectations: VecDeque<Expectation>,
    }

    impl MockTransport {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn expect_write(mut self, addr: u8, expected: Vec<u8>) -> Self {
            self.expectations.push_back(Expectation::Write { addr, expected });
            self
        }

        pub(crate) fn expect_read(mut self, addr: u8, reply: Vec<u8>) -> Self {
            self.expectations.push_back(Expectation::Read { addr, reply });
            self
        }

        pub(crate) fn is_exhausted(&self) -> bool {
            self.expectations.is_empty()
        }
    }

    impl DdcTransport for MockTransport {
        fn write(&mut self, addr: u8, bytes: &[u8]) -> io::Result<()> {
            match self.expectations.pop_front() {
                Some(Expectation::Write { addr: expected_addr, expected }) if addr == expected_addr && bytes == expected.as_slice() => {
                    Ok(())
                }
                other => Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("unexpected write to {addr:#04x}: {bytes:02x?} (next expectation: {other:?})"),
                )),
            }
        }

        fn read(&mut self, addr: u8, buf: &mut [u8]) -> io::Result<usize> {
            match self.expectations.pop_front() {
                Some(Expectation::Read { addr: expected_addr, reply }) if addr == expected_addr => {
                    let len = reply.len().min(buf.len());
                    buf[..len].copy_from_slice(&reply[..len]);
                    Ok(len)
                }
                other => Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("unexpected read from {addr:#04x} (next expectation: {other:?})"),
                )),
            }
        }
    }
}

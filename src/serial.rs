//! Serial port transport for desktop using serialport crate

use crate::transport::{DconTransport, OpenError, PortOpener};
use std::time::Duration;

/// Line speed of DCON modules
pub const BAUD_RATE: u32 = 9600;

pub struct SerialTransport {
    port: Box<dyn serialport::SerialPort>,
}

impl SerialTransport {
    /// Open `port_name` at 9600 8N1 with exclusive access
    pub fn new(port_name: &str) -> Result<Self, serialport::Error> {
        let port = serialport::new(port_name, BAUD_RATE)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .flow_control(serialport::FlowControl::None)
            .timeout(Duration::from_millis(crate::transceiver::READ_TIMEOUT_MS as u64))
            .open()?;

        Ok(Self { port })
    }
}

impl DconTransport for SerialTransport {
    type Error = std::io::Error;

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        std::io::Write::write_all(&mut self.port, data)?;
        std::io::Write::flush(&mut self.port)?;
        Ok(data.len())
    }

    fn read(&mut self, buf: &mut [u8], timeout_ms: u32) -> Result<usize, Self::Error> {
        self.port
            .set_timeout(Duration::from_millis(timeout_ms as u64))
            .map_err(std::io::Error::other)?;
        match std::io::Read::read(&mut self.port, buf) {
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Ok(0),
            other => other,
        }
    }
}

/// Opens [`SerialTransport`]s, telling a busy device apart from other failures
#[derive(Debug, Default)]
pub struct SerialOpener;

impl PortOpener for SerialOpener {
    type Port = SerialTransport;

    fn open(&mut self, device: &str) -> Result<Self::Port, OpenError> {
        SerialTransport::new(device).map_err(|e| {
            if is_busy(&e) {
                OpenError::Busy
            } else {
                OpenError::Failed(e.to_string())
            }
        })
    }
}

/// serialport reports both EBUSY (exclusive tty held) and a contended port
/// lock as `ErrorKind::NoDevice`; a missing device is `Io(NotFound)`.
fn is_busy(err: &serialport::Error) -> bool {
    match err.kind() {
        serialport::ErrorKind::NoDevice => true,
        serialport::ErrorKind::Unknown => err.description.to_ascii_lowercase().contains("busy"),
        _ => false,
    }
}

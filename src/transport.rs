/// Trait for DCON communication backends.
/// Implement this trait for different transports (serial port, test doubles, etc.)
pub trait DconTransport {
    /// Error type for transport operations
    type Error: std::fmt::Debug;

    /// Write data to the transport
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Read data from the transport with a timeout in milliseconds.
    /// Returns `Ok(0)` when nothing arrived before the timeout.
    fn read(&mut self, buf: &mut [u8], timeout_ms: u32) -> Result<usize, Self::Error>;
}

/// Why opening a device failed
#[derive(Debug)]
pub enum OpenError {
    /// The device is held exclusively by someone else; worth retrying
    Busy,
    /// Anything else; not retried
    Failed(String),
}

/// Opens transports by device path
pub trait PortOpener {
    type Port: DconTransport;

    fn open(&mut self, device: &str) -> Result<Self::Port, OpenError>;
}

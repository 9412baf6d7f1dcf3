//! Send a single ASCII command to a DCON module and read back its checksummed reply.
//!
//! Frames look like `<payload><two hex checksum digits><CR>`, where the checksum
//! is the sum of the payload bytes modulo 256. A reply is complete once the
//! device stays quiet for one read timeout.
//!
//! # Features
//!
//! - `serial` - Serial port transport for desktop using serialport crate (default)
//!
//! # Example
//!
//! ```ignore
//! use dcon_util::{open_port, RetryPolicy, SerialOpener, Transceiver};
//!
//! let port = open_port(&mut SerialOpener, "/dev/ttyACM0", RetryPolicy::default(), |notice| {
//!     println!("{}", notice);
//! })?;
//! let mut module = Transceiver::new(port);
//! let reply = module.exec("$01M")?;
//! reply.write_report(&mut std::io::stdout())?;
//! ```

mod connect;
mod frame;
mod transceiver;
mod transport;
mod types;

#[cfg(feature = "serial")]
mod serial;

// Re-exports
pub use connect::{open_port, BusyNotice, RetryPolicy, BUSY_RETRY_INTERVAL};
pub use frame::{checksum, checksum_hex, encode_command, parse_reply, verify, SUFFIX_LEN, TERMINATOR};
pub use transceiver::{Transceiver, READ_TIMEOUT_MS};
pub use transport::{DconTransport, OpenError, PortOpener};
pub use types::{DconError, Reply, Verification};

#[cfg(feature = "serial")]
pub use serial::{SerialOpener, SerialTransport, BAUD_RATE};

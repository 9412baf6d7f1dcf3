use log::{debug, error, info, warn};

use crate::frame::{encode_command, parse_reply};
use crate::transport::DconTransport;
use crate::types::{escape_bytes, DconError, Reply, Verification};

/// Idle time after which a reply is considered complete
pub const READ_TIMEOUT_MS: u32 = 500;

const READ_CHUNK: usize = 64;

pub struct Transceiver<T: DconTransport> {
    transport: T,
}

impl<T: DconTransport> Transceiver<T> {
    /// Create a new transceiver over an opened transport
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Give back the underlying transport
    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Frame `command` and write it in one call.
    ///
    /// Nothing is written if the command is not ASCII.
    pub fn send(&mut self, command: &str) -> Result<(), DconError> {
        let frame = encode_command(command)?;
        info!("Sending {}", escape_bytes(&frame));

        let written = self.transport.write(&frame).map_err(|e| {
            error!("Write error: {:?}", e);
            DconError::Transport(format!("{:?}", e))
        })?;
        debug!("Wrote {} bytes", written);

        if written != frame.len() {
            return Err(DconError::Transport(format!(
                "short write: {} of {} bytes",
                written,
                frame.len()
            )));
        }
        Ok(())
    }

    /// Read until the device goes quiet for one read timeout
    pub fn receive(&mut self) -> Result<Vec<u8>, DconError> {
        let mut reply = Vec::new();
        let mut chunk = [0u8; READ_CHUNK];

        loop {
            match self.transport.read(&mut chunk, READ_TIMEOUT_MS) {
                Ok(0) => break,
                Ok(bytes_read) => {
                    debug!("Received {} bytes: {:02X?}", bytes_read, &chunk[..bytes_read]);
                    reply.extend_from_slice(&chunk[..bytes_read]);
                }
                Err(e) => {
                    error!("Read error: {:?}", e);
                    return Err(DconError::Transport(format!("{:?}", e)));
                }
            }
        }

        info!("Reply {}", escape_bytes(&reply));
        Ok(reply)
    }

    /// Send `command`, collect the reply and check its checksum.
    ///
    /// A checksum mismatch is reported in the returned [`Reply`], not treated
    /// as an error.
    pub fn exec(&mut self, command: &str) -> Result<Reply, DconError> {
        self.send(command)?;
        let raw = self.receive()?;
        let reply = parse_reply(&raw)?;

        if let Verification::Mismatch { computed, received } = reply.verification {
            warn!("Checksum mismatch: computed {:02X}, received {:02X}", computed, received);
        }
        Ok(reply)
    }
}

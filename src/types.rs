//! Types for DCON command exchanges

use std::io::Write;
use thiserror::Error;

/// Errors that can occur while talking to a DCON module
#[derive(Debug, Error)]
pub enum DconError {
    /// The device stayed busy for every attempt the retry policy allowed
    #[error("{device} is busy after {attempts} attempts")]
    PortBusy { device: String, attempts: u32 },
    /// Opening the device failed for a reason other than being busy
    #[error("failed to open {device}: {cause}")]
    PortOpenFailed { device: String, cause: String },
    /// The command contains a character outside 7-bit ASCII
    #[error("command is not ASCII: {character:?} at position {position}")]
    Encoding { position: usize, character: char },
    /// Transport layer error (read or write)
    #[error("transport error: {0}")]
    Transport(String),
    /// The reply is too short or its checksum field is not hex
    #[error("malformed reply: {0}")]
    MalformedReply(String),
}

/// Outcome of comparing a reply's checksum field against its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    Match,
    Mismatch { computed: u8, received: u8 },
}

impl Verification {
    pub fn is_match(&self) -> bool {
        matches!(self, Verification::Match)
    }
}

/// A reply split into its payload and checksum field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub payload: Vec<u8>,
    pub checksum: u8,
    pub verification: Verification,
}

impl Reply {
    /// Payload rendered as text, replacing any non-UTF-8 bytes
    pub fn payload_text(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }

    /// Write the user-facing result: a mismatch warning if any, then the payload
    pub fn write_report<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        if let Verification::Mismatch { computed, received } = self.verification {
            writeln!(out, "Checksum error: computed {:02X} != received {:02X}", computed, received)?;
        }
        writeln!(out, "{}", self.payload_text())
    }
}

/// Render bytes as text, escaping control characters such as the CR terminator
pub(crate) fn escape_bytes(bytes: &[u8]) -> String {
    bytes.escape_ascii().to_string()
}

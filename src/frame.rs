//! DCON ASCII framing: `<payload><two hex checksum digits><CR>`

use crate::types::{DconError, Reply, Verification};

/// Terminator appended to every outbound frame
pub const TERMINATOR: u8 = b'\r';

/// Length of the checksum field plus terminator at the end of a reply
pub const SUFFIX_LEN: usize = 3;

/// Sum of all bytes modulo 256
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
}

/// Checksum rendered as two uppercase hex digits
pub fn checksum_hex(bytes: &[u8]) -> [u8; 2] {
    const DIGITS: &[u8; 16] = b"0123456789ABCDEF";
    let sum = checksum(bytes);
    [DIGITS[(sum >> 4) as usize], DIGITS[(sum & 0x0F) as usize]]
}

/// Build the outbound frame for `command`.
///
/// Fails before producing anything if the command holds a non-ASCII character.
pub fn encode_command(command: &str) -> Result<Vec<u8>, DconError> {
    if let Some((position, character)) = command.char_indices().find(|(_, c)| !c.is_ascii()) {
        return Err(DconError::Encoding { position, character });
    }

    let payload = command.as_bytes();
    let mut frame = Vec::with_capacity(payload.len() + SUFFIX_LEN);
    frame.extend_from_slice(payload);
    frame.extend_from_slice(&checksum_hex(payload));
    frame.push(TERMINATOR);
    Ok(frame)
}

/// Whether `checksum` matches the checksum of `payload`
pub fn verify(payload: &[u8], checksum: u8) -> bool {
    self::checksum(payload) == checksum
}

/// Split a raw reply into payload and checksum and verify it.
///
/// The last byte is taken as the terminator whatever its value. A checksum
/// mismatch is not an error; it is recorded in the returned [`Reply`].
pub fn parse_reply(raw: &[u8]) -> Result<Reply, DconError> {
    if raw.len() < SUFFIX_LEN {
        return Err(DconError::MalformedReply(format!(
            "expected at least {} bytes, got {}",
            SUFFIX_LEN,
            raw.len()
        )));
    }

    let (payload, suffix) = raw.split_at(raw.len() - SUFFIX_LEN);
    let received = parse_hex_byte(&suffix[..2])?;
    let computed = checksum(payload);

    let verification = if verify(payload, received) {
        Verification::Match
    } else {
        Verification::Mismatch { computed, received }
    };

    Ok(Reply {
        payload: payload.to_vec(),
        checksum: received,
        verification,
    })
}

fn parse_hex_byte(digits: &[u8]) -> Result<u8, DconError> {
    let malformed = || {
        DconError::MalformedReply(format!(
            "checksum field {:?} is not hex",
            String::from_utf8_lossy(digits)
        ))
    };
    let text = std::str::from_utf8(digits).map_err(|_| malformed())?;
    if !text.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(malformed());
    }
    u8::from_str_radix(text, 16).map_err(|_| malformed())
}

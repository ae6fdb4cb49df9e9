//! Message construction: ASCII/hex parsing and SHA-256 single-block
//! padding (`§6` "Message padding", SPEC_FULL §3 "Message construction
//! (supplement)").
//!
//! This is a thin wrapper with no algorithmic content of its own — the
//! padding arithmetic mirrors `sha256::core::sha256`'s final-block
//! handling in this lineage, specialized to the single-block case the
//! circuit supports (messages of at most 55 bytes, so the `0x80` marker
//! and the 8-byte length field always fit in one 64-byte block).

use crate::error::{Error, Result};

/// The maximum message length the circuit accepts. A 56-byte message (or
/// longer) needs a second padded block to fit the length field, which
/// this single-block circuit has no way to express (`§1` non-goals).
pub const MAX_MESSAGE_BYTES: usize = 55;

/// A message padded into the circuit's sixteen 32-bit input words,
/// big-endian, ready to bind against `INPUT-W0..INPUT-W15`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaddedMessage {
    pub words: [u32; 16],
}

impl PaddedMessage {
    /// Pads `message` into a single 512-bit block: `msg || 0x80 ||
    /// zero-pad || length-in-bits (8-byte big-endian)`, packed into 16
    /// big-endian 32-bit words.
    pub fn pad(message: &[u8]) -> Result<Self> {
        if message.len() > MAX_MESSAGE_BYTES {
            return Err(Error::MessageTooLong { len: message.len() });
        }

        let mut block = [0u8; 64];
        block[..message.len()].copy_from_slice(message);
        block[message.len()] = 0x80;

        let bit_len = (message.len() as u64) << 3;
        block[56..64].copy_from_slice(&bit_len.to_be_bytes());

        let mut words = [0u32; 16];
        for (slot, chunk) in words.iter_mut().zip(block.chunks_exact(4)) {
            *slot = u32::from_be_bytes(chunk.try_into().unwrap());
        }

        Ok(PaddedMessage { words })
    }

    /// Pads the UTF-8 bytes of an ASCII/text message.
    pub fn from_text(text: &str) -> Result<Self> {
        Self::pad(text.as_bytes())
    }

    /// Pads a hex-encoded message payload.
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let bytes = hex::decode(hex_str.trim())?;
        Self::pad(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_message_pads_to_single_marker_and_zero_length() {
        let padded = PaddedMessage::pad(b"").unwrap();
        assert_eq!(padded.words[0], 0x8000_0000);
        assert_eq!(padded.words[15], 0);
    }

    #[test]
    fn message_length_is_encoded_in_bits_big_endian_in_last_word() {
        let padded = PaddedMessage::pad(b"abc").unwrap();
        // 3 bytes = 24 bits.
        assert_eq!(padded.words[15], 24);
    }

    #[test]
    fn fifty_five_byte_message_is_accepted() {
        let msg = vec![0x61u8; 55];
        assert!(PaddedMessage::pad(&msg).is_ok());
    }

    #[test]
    fn fifty_six_byte_message_is_rejected() {
        let msg = vec![0x61u8; 56];
        let err = PaddedMessage::pad(&msg).unwrap_err();
        assert!(matches!(err, Error::MessageTooLong { len: 56 }));
    }

    #[test]
    fn from_hex_decodes_before_padding() {
        let padded = PaddedMessage::from_hex("68656c6c6f").unwrap(); // "hello"
        let expected = PaddedMessage::from_text("hello").unwrap();
        assert_eq!(padded, expected);
    }

    #[test]
    fn from_hex_rejects_invalid_hex() {
        assert!(PaddedMessage::from_hex("not-hex").is_err());
    }
}

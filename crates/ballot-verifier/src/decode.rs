//! Human-readable rendering of raw payloads, for log lines only.
//!
//! Checks never compare decoded strings; see [`crate::ContractVerifier`].

/// Turns raw bytes into something a human can read.
pub trait Decoder: Send + Sync {
    /// Render `bytes` as a string
    fn decode(&self, bytes: &[u8]) -> String;
}

/// One character per byte, NUL bytes included.
#[derive(Debug, Clone, Copy, Default)]
pub struct AsciiDecoder;

impl Decoder for AsciiDecoder {
    fn decode(&self, bytes: &[u8]) -> String {
        bytes.iter().map(|&b| b as char).collect()
    }
}

/// Like [`AsciiDecoder`] but drops the trailing NUL padding of a fixed-size word.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaddedAsciiDecoder;

impl Decoder for PaddedAsciiDecoder {
    fn decode(&self, bytes: &[u8]) -> String {
        let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        AsciiDecoder.decode(&bytes[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EncodedValue;

    #[test]
    fn test_ascii_keeps_padding() {
        let decoded = AsciiDecoder.decode(b"Ana\0\0");
        assert_eq!(decoded, "Ana\0\0");
    }

    #[test]
    fn test_padded_ascii_strips_trailing_nuls() {
        let expected = EncodedValue::expected_winner_name();
        assert_eq!(PaddedAsciiDecoder.decode(expected.as_bytes()), "Manolo");
    }

    #[test]
    fn test_padded_ascii_keeps_inner_nuls() {
        assert_eq!(PaddedAsciiDecoder.decode(b"a\0b\0\0"), "a\0b");
        assert_eq!(PaddedAsciiDecoder.decode(&[0u8; 32]), "");
    }
}

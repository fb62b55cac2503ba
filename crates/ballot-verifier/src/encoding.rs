//! Raw call payloads and function selectors

use alloy_primitives::Bytes;
use std::{fmt, str::FromStr};
use tiny_keccak::{Hasher, Keccak};

/// Raw return value of `winnerName()` expected from the deployed Ballot.
///
/// "Manolo" as ASCII, NUL-padded to a 32-byte word. This is compared against
/// the raw `eth_call` result, which only matches because the accessor returns
/// `bytes32`. A `string` accessor would ABI-encode offset and length words first.
pub const EXPECTED_WINNER_NAME: &str =
    "0x4d616e6f6c6f0000000000000000000000000000000000000000000000000000";

/// Solidity signature of the winner name accessor
pub const WINNER_NAME_SIGNATURE: &str = "winnerName()";

/// Compute keccak256 hash
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}

/// First four bytes of the keccak256 of a function signature
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Decode a hex string with an optional `0x`/`0X` prefix.
pub fn decode_hex(s: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let digits = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
    hex::decode(digits)
}

/// Raw bytes returned by a contract accessor, before any decoding.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct EncodedValue(Bytes);

impl EncodedValue {
    /// Wrap raw bytes
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    /// Parse a hex literal, with or without `0x`
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        decode_hex(s).map(Self::new)
    }

    /// The expected `winnerName()` return value
    pub fn expected_winner_name() -> Self {
        Self::from_hex(EXPECTED_WINNER_NAME).unwrap_or_default()
    }

    /// Raw payload
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Payload length in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for an empty payload (`0x`)
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lowercase hex with `0x` prefix
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.0))
    }
}

impl fmt::Display for EncodedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for EncodedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncodedValue({})", self.to_hex())
    }
}

impl FromStr for EncodedValue {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<Vec<u8>> for EncodedValue {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl<const N: usize> From<[u8; N]> for EncodedValue {
    fn from(bytes: [u8; N]) -> Self {
        Self::new(bytes.to_vec())
    }
}

impl AsRef<[u8]> for EncodedValue {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

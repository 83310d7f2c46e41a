use std::fmt;
use std::str::FromStr;

use crate::hex;
use crate::HashError;

/// A commit identifier: the raw 20-byte hash naming one commit.
///
/// Ids are compared by value, never by identity; two `CommitId`s are the
/// same commit exactly when their 20 bytes are equal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommitId([u8; 20]);

impl CommitId {
    /// Number of raw bytes in an id.
    pub const LEN: usize = 20;

    /// The null id (all zeros).
    pub const NULL: Self = Self([0u8; 20]);

    /// Create an id from exactly 20 raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HashError> {
        if bytes.len() != Self::LEN {
            return Err(HashError::InvalidIdLength {
                expected: Self::LEN,
                actual: bytes.len(),
            });
        }
        let mut raw = [0u8; 20];
        raw.copy_from_slice(bytes);
        Ok(Self(raw))
    }

    /// Parse an id from a 40-character hex string (case-insensitive).
    pub fn from_hex(s: &str) -> Result<Self, HashError> {
        let mut raw = [0u8; 20];
        hex::decode(s, &mut raw)?;
        Ok(Self(raw))
    }

    /// The raw bytes of the id.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Check if this is the null (all-zeros) id.
    pub fn is_null(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }

    /// The lowercase hex representation.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl From<[u8; 20]> for CommitId {
    fn from(raw: [u8; 20]) -> Self {
        Self(raw)
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CommitId({})", &self.to_hex()[..8])
    }
}

impl FromStr for CommitId {
    type Err = HashError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

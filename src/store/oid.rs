//! Store-assigned document identifiers.
//!
//! An [`ObjectId`] is 12 bytes: a 4-byte big-endian timestamp in seconds, 5
//! bytes that are random per generator, and a 3-byte big-endian counter. Its
//! textual form is 24 hex digits; that is the only encoding clients see.

use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

const LEN: usize = 12;

/// Identifier of one stored document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; LEN]);

/// The text is not a 24 digit hex token.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ObjectIdError {
    #[error("expected {expected} hex characters, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

impl ObjectId {
    pub fn from_bytes(bytes: [u8; LEN]) -> Self {
        Self(bytes)
    }

    pub fn bytes(&self) -> [u8; LEN] {
        self.0
    }

    /// Parses the 24 digit hex form. Upper and lower case are both accepted.
    pub fn parse_str(s: &str) -> Result<Self, ObjectIdError> {
        if s.len() != LEN * 2 {
            return Err(ObjectIdError::InvalidLength {
                expected: LEN * 2,
                actual: s.len(),
            });
        }
        let mut bytes = [0u8; LEN];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }

    /// Lowercase 24 digit hex form.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Seconds since the Unix epoch embedded at generation time.
    pub fn timestamp(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = ObjectIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// Hands out unique [`ObjectId`]s. Owned by whoever assigns identifiers.
#[derive(Debug)]
pub struct ObjectIdGenerator {
    random: [u8; 5],
    counter: u32,
}

impl Default for ObjectIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectIdGenerator {
    pub fn new() -> Self {
        Self {
            random: rand::random(),
            counter: rand::random::<u32>() & 0x00ff_ffff,
        }
    }

    pub fn generate(&mut self) -> ObjectId {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs() as u32)
            .unwrap_or_default();
        let count = self.counter;
        self.counter = (self.counter + 1) & 0x00ff_ffff;

        let mut bytes = [0u8; LEN];
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(&self.random);
        bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);
        ObjectId(bytes)
    }
}

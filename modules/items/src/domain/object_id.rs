//! 12-byte document identifier with a 24-character lowercase hex form.
//!
//! Layout: 4-byte big-endian seconds since the Unix epoch, 5 bytes fixed per
//! process, 3-byte big-endian counter seeded randomly.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use thiserror::Error;

const COUNTER_MASK: u32 = 0x00FF_FFFF;

/// Length of the canonical text form.
pub const HEX_LEN: usize = 24;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ObjectIdError {
    #[error("expected {HEX_LEN} hex characters, got {0}")]
    InvalidLength(usize),
    #[error("invalid hex character")]
    InvalidHex,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; 12]);

impl ObjectId {
    /// Generates a fresh id. Ids generated by one process are strictly
    /// increasing within a second (until the 24-bit counter wraps).
    pub fn new() -> Self {
        let secs = u32::try_from(Utc::now().timestamp()).unwrap_or(0);
        let counter = next_counter();

        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(process_unique());
        bytes[9..].copy_from_slice(&counter.to_be_bytes()[1..]);
        Self(bytes)
    }

    pub const fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    /// Parses 24 hex characters in either case.
    pub fn parse_str(s: &str) -> Result<Self, ObjectIdError> {
        if s.len() != HEX_LEN {
            return Err(ObjectIdError::InvalidLength(s.len()));
        }
        let mut bytes = [0u8; 12];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| ObjectIdError::InvalidHex)?;
        Ok(Self(bytes))
    }

    /// Parses only the canonical form, i.e. text that re-renders to itself.
    pub fn parse_canonical(s: &str) -> Option<Self> {
        Self::parse_str(s).ok().filter(|id| id.to_hex() == s)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Creation second embedded in the id.
    pub fn timestamp(&self) -> DateTime<Utc> {
        let secs = u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]]);
        DateTime::from_timestamp(i64::from(secs), 0).unwrap_or_default()
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for ObjectId {
    type Err = ObjectIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}

/// True when `candidate` is a canonical ObjectId string: 24 lowercase hex
/// characters. Never fails; any other input, including uppercase hex, is
/// rejected.
pub fn is_valid(candidate: &str) -> bool {
    ObjectId::parse_canonical(candidate).is_some()
}

fn process_unique() -> &'static [u8; 5] {
    static PROCESS_UNIQUE: OnceLock<[u8; 5]> = OnceLock::new();
    PROCESS_UNIQUE.get_or_init(rand::random)
}

fn next_counter() -> u32 {
    static COUNTER: OnceLock<AtomicU32> = OnceLock::new();
    COUNTER
        .get_or_init(|| AtomicU32::new(rand::random::<u32>() & COUNTER_MASK))
        .fetch_add(1, Ordering::Relaxed)
        & COUNTER_MASK
}

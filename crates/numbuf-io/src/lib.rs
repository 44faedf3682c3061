//! Buffer I/O: tagged and positional codecs, framed streams and files.
//!
//! Both encodings carry the same record: the raw bytes, the three type
//! descriptor fields and the shape. Decoding always rebuilds the buffer
//! through the normal constructor, so a record whose shape disagrees with
//! its byte length is rejected as [`CodecError::CorruptStream`].

use std::fmt;
use std::str::FromStr;

use numbuf_core::{NumericBuffer, SampleRead};

pub mod positional;
mod record;
pub mod stream;
pub mod tagged;

pub use stream::{load, read_buffer, save, write_buffer};

pub type Result<T> = std::result::Result<T, CodecError>;

#[derive(thiserror::Error, Debug)]
pub enum CodecError {
    #[error("Corrupt stream: {0}")]
    CorruptStream(String),

    #[error("Encoding failed: {0}")]
    Encode(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Which of the two record encodings to use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Encoding {
    /// Keyed JSON object. Field order does not matter and unknown keys are
    /// ignored.
    #[default]
    Tagged,
    /// Fixed field order, compact binary.
    Positional,
}

impl Encoding {
    pub fn tag(self) -> u8 {
        match self {
            Encoding::Tagged => 1,
            Encoding::Positional => 2,
        }
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(Encoding::Tagged),
            2 => Some(Encoding::Positional),
            _ => None,
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Tagged => write!(f, "tagged"),
            Encoding::Positional => write!(f, "positional"),
        }
    }
}

impl FromStr for Encoding {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tagged" | "json" => Ok(Encoding::Tagged),
            "positional" | "bincode" => Ok(Encoding::Positional),
            other => Err(format!(
                "unknown encoding {other:?} (expected tagged or positional)"
            )),
        }
    }
}

/// Encode a buffer's record with `encoding`.
pub fn encode(buffer: &impl SampleRead, encoding: Encoding) -> Result<Vec<u8>> {
    match encoding {
        Encoding::Tagged => tagged::encode(buffer),
        Encoding::Positional => positional::encode(buffer),
    }
}

/// Decode a record produced by [`encode`] with the same `encoding`.
pub fn decode(bytes: &[u8], encoding: Encoding) -> Result<NumericBuffer> {
    match encoding {
        Encoding::Tagged => tagged::decode(bytes),
        Encoding::Positional => positional::decode(bytes),
    }
}

//! Typed, shaped, immutable numeric buffers.
//!
//! `numbuf-core` pairs a raw byte buffer with a [`TypeDescriptor`] (sample
//! format, width and byte order) and a [`Shape`]. Buffers are validated once
//! at construction and never change afterwards, so they can be read from any
//! number of threads without synchronization.
//!
//! # Buffer kinds
//!
//! - [`NumericBuffer`]: immutable, cheap to clone (storage is shared)
//! - [`MutableNumericBuffer`]: owns its bytes and allows in-place sample writes
//!
//! Both implement [`SampleRead`]; only the mutable kind implements
//! [`SampleWrite`].

pub mod buffer;
pub mod mutable;
pub mod registry;
pub mod types;
pub mod value;

pub use buffer::{NumericBuffer, SampleRead};
pub use mutable::{MutableNumericBuffer, SampleWrite};
pub use registry::TypeNameRegistry;
pub use types::{ByteOrder, SampleFormat, Shape, TypeDescriptor};
pub use value::{NativeSample, SampleValue};

pub type Result<T> = std::result::Result<T, BufferError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum BufferError {
    #[error("Shape mismatch: buffer holds {samples} samples, shape is {shape:?}")]
    ShapeMismatch { samples: usize, shape: Vec<usize> },

    #[error("Shape {shape:?} of {sample_bytes}-byte samples exceeds addressable memory")]
    TooLarge {
        shape: Vec<usize>,
        sample_bytes: usize,
    },

    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(SampleFormat),

    #[error("Unsupported sample width: {width} bytes for {format}")]
    UnsupportedWidth { format: SampleFormat, width: usize },

    #[error("Sample index {index} out of range for {samples} samples")]
    IndexOutOfRange { index: usize, samples: usize },

    #[error("Unknown type name: {0:?}")]
    UnknownTypeName(String),

    #[error("Value {value} does not fit sample type {dtype}")]
    ValueOutOfRange {
        value: SampleValue,
        dtype: TypeDescriptor,
    },
}

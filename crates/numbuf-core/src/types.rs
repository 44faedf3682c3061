//! Core type definitions: SampleFormat, ByteOrder, TypeDescriptor, Shape.

use std::fmt;

/// Numeric kind of a single sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SampleFormat {
    Undefined,
    Integer,
    UnsignedInteger,
    FloatingPoint,
    ComplexFloatingPoint,
}

impl SampleFormat {
    /// Stable integer tag used on the wire.
    pub fn tag(self) -> u8 {
        match self {
            SampleFormat::Undefined => 0,
            SampleFormat::Integer => 1,
            SampleFormat::UnsignedInteger => 2,
            SampleFormat::FloatingPoint => 3,
            SampleFormat::ComplexFloatingPoint => 4,
        }
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(SampleFormat::Undefined),
            1 => Some(SampleFormat::Integer),
            2 => Some(SampleFormat::UnsignedInteger),
            3 => Some(SampleFormat::FloatingPoint),
            4 => Some(SampleFormat::ComplexFloatingPoint),
            _ => None,
        }
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleFormat::Undefined => write!(f, "Undefined"),
            SampleFormat::Integer => write!(f, "Integer"),
            SampleFormat::UnsignedInteger => write!(f, "UnsignedInteger"),
            SampleFormat::FloatingPoint => write!(f, "FloatingPoint"),
            SampleFormat::ComplexFloatingPoint => write!(f, "ComplexFloatingPoint"),
        }
    }
}

/// Byte order of the samples in a buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    BigEndian,
    LittleEndian,
    /// Whatever the host uses. Resolved at read/write time.
    Native,
}

impl ByteOrder {
    /// Byte order of the host platform.
    pub fn native() -> Self {
        if cfg!(target_endian = "big") {
            ByteOrder::BigEndian
        } else {
            ByteOrder::LittleEndian
        }
    }

    /// Resolve `Native` to the concrete host order; explicit orders pass through.
    pub fn resolve(self) -> Self {
        match self {
            ByteOrder::Native => Self::native(),
            explicit => explicit,
        }
    }

    pub fn tag(self) -> u8 {
        match self {
            ByteOrder::BigEndian => 0,
            ByteOrder::LittleEndian => 1,
            ByteOrder::Native => 2,
        }
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(ByteOrder::BigEndian),
            1 => Some(ByteOrder::LittleEndian),
            2 => Some(ByteOrder::Native),
            _ => None,
        }
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ByteOrder::BigEndian => write!(f, "BE"),
            ByteOrder::LittleEndian => write!(f, "LE"),
            ByteOrder::Native => write!(f, "native"),
        }
    }
}

/// Describes one sample: its format, width in bytes and byte order.
///
/// Any combination is a valid descriptor. Combinations without a defined
/// interpretation (see [`TypeDescriptor::is_readable`]) only fail once a
/// sample is actually read or written.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    format: SampleFormat,
    sample_bytes: usize,
    byte_order: ByteOrder,
}

impl TypeDescriptor {
    pub const fn new(format: SampleFormat, sample_bytes: usize, byte_order: ByteOrder) -> Self {
        Self {
            format,
            sample_bytes,
            byte_order,
        }
    }

    /// Native-order signed integer of `sample_bytes` width.
    pub const fn int(sample_bytes: usize) -> Self {
        Self::new(SampleFormat::Integer, sample_bytes, ByteOrder::Native)
    }

    /// Native-order unsigned integer of `sample_bytes` width.
    pub const fn uint(sample_bytes: usize) -> Self {
        Self::new(SampleFormat::UnsignedInteger, sample_bytes, ByteOrder::Native)
    }

    /// Native-order IEEE-754 float of `sample_bytes` width.
    pub const fn float(sample_bytes: usize) -> Self {
        Self::new(SampleFormat::FloatingPoint, sample_bytes, ByteOrder::Native)
    }

    pub fn format(&self) -> SampleFormat {
        self.format
    }

    pub fn sample_bytes(&self) -> usize {
        self.sample_bytes
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Same format and width, different byte order.
    pub fn with_byte_order(self, byte_order: ByteOrder) -> Self {
        Self { byte_order, ..self }
    }

    /// Whether samples of this type can be read and written.
    pub fn is_readable(&self) -> bool {
        crate::value::lookup(self).is_ok()
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<{},{},{}>",
            self.format, self.sample_bytes, self.byte_order
        )
    }
}

/// Buffer shape (dimension extents).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Shape(pub Vec<usize>);

impl Shape {
    pub fn new(dims: impl Into<Vec<usize>>) -> Self {
        Self(dims.into())
    }

    /// Scalar (rank-0) shape.
    pub fn scalar() -> Self {
        Self(vec![])
    }

    /// Number of dimensions (rank).
    pub fn ndim(&self) -> usize {
        self.0.len()
    }

    /// Total number of elements, or `None` if the product overflows.
    pub fn numel(&self) -> Option<usize> {
        self.0.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
    }

    pub fn dims(&self) -> &[usize] {
        &self.0
    }
}

impl From<Vec<usize>> for Shape {
    fn from(dims: Vec<usize>) -> Self {
        Self(dims)
    }
}

impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Self {
        Self(dims.to_vec())
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, d) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{d}")?;
        }
        write!(f, ")")
    }
}

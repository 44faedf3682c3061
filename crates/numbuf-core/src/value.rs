//! Sample values and the `(format, width)` interpretation table.
//!
//! Reading a sample is a single table lookup: the buffer's type descriptor
//! selects a [`SampleKind`] which knows how to decode raw bytes into a
//! [`SampleValue`] and how to encode one back. Supporting a new width means
//! adding a row to [`SAMPLE_KINDS`].

use std::fmt;

use half::f16;

use crate::{BufferError, ByteOrder, Result, SampleFormat, TypeDescriptor};

/// One sample, tagged with the concrete type it was read as.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SampleValue {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F16(f16),
    F32(f32),
    F64(f64),
}

impl SampleValue {
    /// Widen to `f64`. Lossy for 64-bit integers beyond 2^53.
    pub fn as_f64(self) -> f64 {
        match self {
            SampleValue::I8(v) => v as f64,
            SampleValue::I16(v) => v as f64,
            SampleValue::I32(v) => v as f64,
            SampleValue::I64(v) => v as f64,
            SampleValue::U8(v) => v as f64,
            SampleValue::U16(v) => v as f64,
            SampleValue::U32(v) => v as f64,
            SampleValue::U64(v) => v as f64,
            SampleValue::F16(v) => v.to_f64(),
            SampleValue::F32(v) => v as f64,
            SampleValue::F64(v) => v,
        }
    }

    /// Exact integer value, or `None` for floating-point samples.
    pub fn as_i128(self) -> Option<i128> {
        match self {
            SampleValue::I8(v) => Some(v.into()),
            SampleValue::I16(v) => Some(v.into()),
            SampleValue::I32(v) => Some(v.into()),
            SampleValue::I64(v) => Some(v.into()),
            SampleValue::U8(v) => Some(v.into()),
            SampleValue::U16(v) => Some(v.into()),
            SampleValue::U32(v) => Some(v.into()),
            SampleValue::U64(v) => Some(v.into()),
            SampleValue::F16(_) | SampleValue::F32(_) | SampleValue::F64(_) => None,
        }
    }

    pub fn is_float(self) -> bool {
        self.as_i128().is_none()
    }
}

impl fmt::Display for SampleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleValue::I8(v) => write!(f, "{v}"),
            SampleValue::I16(v) => write!(f, "{v}"),
            SampleValue::I32(v) => write!(f, "{v}"),
            SampleValue::I64(v) => write!(f, "{v}"),
            SampleValue::U8(v) => write!(f, "{v}"),
            SampleValue::U16(v) => write!(f, "{v}"),
            SampleValue::U32(v) => write!(f, "{v}"),
            SampleValue::U64(v) => write!(f, "{v}"),
            SampleValue::F16(v) => write!(f, "{v}"),
            SampleValue::F32(v) => write!(f, "{v}"),
            SampleValue::F64(v) => write!(f, "{v}"),
        }
    }
}

/// Rust scalar types that can be packed into a buffer in host order.
pub trait NativeSample: Copy {
    const FORMAT: SampleFormat;

    /// Append this value's native-order bytes.
    fn extend_ne_bytes(self, out: &mut Vec<u8>);

    /// Descriptor matching `Self` in host byte order.
    fn dtype() -> TypeDescriptor {
        TypeDescriptor::new(Self::FORMAT, size_of::<Self>(), ByteOrder::Native)
    }
}

macro_rules! impl_native_sample {
    ($format:expr => $($ty:ty: $variant:ident),+) => {
        $(
            impl NativeSample for $ty {
                const FORMAT: SampleFormat = $format;

                fn extend_ne_bytes(self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_ne_bytes());
                }
            }

            impl From<$ty> for SampleValue {
                fn from(v: $ty) -> Self {
                    SampleValue::$variant(v)
                }
            }
        )+
    };
}

impl_native_sample!(SampleFormat::Integer => i8: I8, i16: I16, i32: I32, i64: I64);
impl_native_sample!(SampleFormat::UnsignedInteger => u8: U8, u16: U16, u32: U32, u64: U64);
impl_native_sample!(SampleFormat::FloatingPoint => f16: F16, f32: F32, f64: F64);

// ── Interpretation table ────────────────────────────────────────────────

type DecodeFn = fn(&[u8], ByteOrder) -> SampleValue;
type EncodeFn = fn(SampleValue, ByteOrder, &mut [u8]) -> bool;

/// How one `(format, width)` pair is read and written.
///
/// `decode` receives exactly `width` bytes and a resolved byte order.
/// `encode` returns `false` when the value cannot be represented.
pub(crate) struct SampleKind {
    pub format: SampleFormat,
    pub width: usize,
    pub decode: DecodeFn,
    pub encode: EncodeFn,
}

fn read_array<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut raw = [0u8; N];
    raw.copy_from_slice(&bytes[..N]);
    raw
}

macro_rules! int_codec {
    ($decode:ident, $encode:ident, $ty:ty, $variant:ident) => {
        fn $decode(bytes: &[u8], order: ByteOrder) -> SampleValue {
            let raw = read_array(bytes);
            SampleValue::$variant(match order {
                ByteOrder::BigEndian => <$ty>::from_be_bytes(raw),
                _ => <$ty>::from_le_bytes(raw),
            })
        }

        fn $encode(value: SampleValue, order: ByteOrder, out: &mut [u8]) -> bool {
            let Some(v) = value.as_i128().and_then(|v| <$ty>::try_from(v).ok()) else {
                return false;
            };
            let raw = match order {
                ByteOrder::BigEndian => v.to_be_bytes(),
                _ => v.to_le_bytes(),
            };
            out.copy_from_slice(&raw);
            true
        }
    };
}

macro_rules! float_codec {
    ($decode:ident, $encode:ident, $ty:ty, $variant:ident, $from_f64:path) => {
        fn $decode(bytes: &[u8], order: ByteOrder) -> SampleValue {
            let raw = read_array(bytes);
            SampleValue::$variant(match order {
                ByteOrder::BigEndian => <$ty>::from_be_bytes(raw),
                _ => <$ty>::from_le_bytes(raw),
            })
        }

        fn $encode(value: SampleValue, order: ByteOrder, out: &mut [u8]) -> bool {
            let v: $ty = match value {
                SampleValue::$variant(v) => v,
                other => $from_f64(other.as_f64()),
            };
            let raw = match order {
                ByteOrder::BigEndian => v.to_be_bytes(),
                _ => v.to_le_bytes(),
            };
            out.copy_from_slice(&raw);
            true
        }
    };
}

fn narrow_f32(v: f64) -> f32 {
    v as f32
}

int_codec!(decode_i8, encode_i8, i8, I8);
int_codec!(decode_i16, encode_i16, i16, I16);
int_codec!(decode_i32, encode_i32, i32, I32);
int_codec!(decode_i64, encode_i64, i64, I64);
int_codec!(decode_u8, encode_u8, u8, U8);
int_codec!(decode_u16, encode_u16, u16, U16);
int_codec!(decode_u32, encode_u32, u32, U32);
int_codec!(decode_u64, encode_u64, u64, U64);
float_codec!(decode_f16, encode_f16, f16, F16, f16::from_f64);
float_codec!(decode_f32, encode_f32, f32, F32, narrow_f32);
float_codec!(decode_f64, encode_f64, f64, F64, std::convert::identity);

macro_rules! kind {
    ($format:ident, $width:expr, $decode:ident, $encode:ident) => {
        SampleKind {
            format: SampleFormat::$format,
            width: $width,
            decode: $decode,
            encode: $encode,
        }
    };
}

pub(crate) static SAMPLE_KINDS: &[SampleKind] = &[
    kind!(Integer, 1, decode_i8, encode_i8),
    kind!(Integer, 2, decode_i16, encode_i16),
    kind!(Integer, 4, decode_i32, encode_i32),
    kind!(Integer, 8, decode_i64, encode_i64),
    kind!(UnsignedInteger, 1, decode_u8, encode_u8),
    kind!(UnsignedInteger, 2, decode_u16, encode_u16),
    kind!(UnsignedInteger, 4, decode_u32, encode_u32),
    kind!(UnsignedInteger, 8, decode_u64, encode_u64),
    kind!(FloatingPoint, 2, decode_f16, encode_f16),
    kind!(FloatingPoint, 4, decode_f32, encode_f32),
    kind!(FloatingPoint, 8, decode_f64, encode_f64),
];

/// Find the interpretation for a descriptor.
///
/// `Undefined` and `ComplexFloatingPoint` are refused outright; other
/// formats fail only for widths missing from the table.
pub(crate) fn lookup(dtype: &TypeDescriptor) -> Result<&'static SampleKind> {
    let format = dtype.format();
    if matches!(
        format,
        SampleFormat::Undefined | SampleFormat::ComplexFloatingPoint
    ) {
        return Err(BufferError::UnsupportedFormat(format));
    }
    let width = dtype.sample_bytes();
    SAMPLE_KINDS
        .iter()
        .find(|k| k.format == format && k.width == width)
        .ok_or(BufferError::UnsupportedWidth { format, width })
}

/// Widths with a defined interpretation for `format`.
pub fn supported_widths(format: SampleFormat) -> impl Iterator<Item = usize> {
    SAMPLE_KINDS
        .iter()
        .filter(move |k| k.format == format)
        .map(|k| k.width)
}

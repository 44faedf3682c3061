//! Buffers that allow in-place sample writes.
//!
//! Writes replace exactly `sample_bytes` bytes; length, type and shape are
//! fixed for the life of the buffer. There is no internal locking: hand out
//! `&mut` to one writer at a time.

use std::fmt;
use std::sync::Arc;

use crate::buffer::{NumericBuffer, SampleRead, resolve_shape};
use crate::value::{self, SampleValue};
use crate::{BufferError, Result, Shape, TypeDescriptor};

/// Write access on top of [`SampleRead`].
pub trait SampleWrite: SampleRead {
    /// Overwrite sample `index` with `value`, encoded per the buffer's type.
    ///
    /// Integer samples accept only integer values that fit the width.
    /// Floating-point samples accept any value and round to the width.
    fn set_sample(&mut self, index: usize, value: SampleValue) -> Result<()>;
}

#[derive(Clone, PartialEq, Eq)]
pub struct MutableNumericBuffer {
    data: Vec<u8>,
    dtype: TypeDescriptor,
    shape: Shape,
}

impl MutableNumericBuffer {
    /// Copy `bytes` into a new mutable buffer. Same validation as
    /// [`NumericBuffer::new`].
    pub fn new(bytes: &[u8], dtype: TypeDescriptor, shape: Option<Shape>) -> Result<Self> {
        let shape = resolve_shape(bytes.len(), &dtype, shape)?;
        Ok(Self::from_validated(bytes.to_vec(), dtype, shape))
    }

    /// A zero-filled buffer sized for `shape`.
    pub fn zeroed(dtype: TypeDescriptor, shape: Shape) -> Result<Self> {
        let len = shape
            .numel()
            .and_then(|n| n.checked_mul(dtype.sample_bytes()))
            .ok_or_else(|| BufferError::TooLarge {
                shape: shape.0.clone(),
                sample_bytes: dtype.sample_bytes(),
            })?;
        Self::new(&vec![0; len], dtype, Some(shape))
    }

    pub(crate) fn from_validated(data: Vec<u8>, dtype: TypeDescriptor, shape: Shape) -> Self {
        Self { data, dtype, shape }
    }

    /// Convert into an immutable buffer without copying again.
    pub fn freeze(self) -> NumericBuffer {
        NumericBuffer::from_validated(Arc::from(self.data), self.dtype, self.shape)
    }

    /// Immutable snapshot; later writes to `self` do not affect it.
    pub fn to_immutable(&self) -> NumericBuffer {
        self.clone().freeze()
    }

    /// Independent mutable copy.
    pub fn to_mutable(&self) -> MutableNumericBuffer {
        self.clone()
    }
}

impl SampleRead for MutableNumericBuffer {
    fn bytes(&self) -> &[u8] {
        &self.data
    }

    fn dtype(&self) -> TypeDescriptor {
        self.dtype
    }

    fn shape(&self) -> &Shape {
        &self.shape
    }
}

impl SampleWrite for MutableNumericBuffer {
    fn set_sample(&mut self, index: usize, value: SampleValue) -> Result<()> {
        let offset = self.sample_offset(index)?;
        let dtype = self.dtype;
        let kind = value::lookup(&dtype)?;
        let slot = &mut self.data[offset..offset + kind.width];
        if (kind.encode)(value, dtype.byte_order().resolve(), slot) {
            Ok(())
        } else {
            Err(BufferError::ValueOutOfRange { value, dtype })
        }
    }
}

impl fmt::Display for MutableNumericBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl fmt::Debug for MutableNumericBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutableNumericBuffer")
            .field("len", &self.data.len())
            .field("dtype", &self.dtype)
            .field("shape", &self.shape)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ByteOrder, SampleFormat};

    #[test]
    fn test_set_sample_round_trips() {
        let t = TypeDescriptor::int(2).with_byte_order(ByteOrder::BigEndian);
        let mut b = MutableNumericBuffer::zeroed(t, Shape::new(vec![2, 2])).unwrap();
        b.set_sample(3, SampleValue::I16(-300)).unwrap();
        assert_eq!(b.sample_value(3).unwrap(), SampleValue::I16(-300));
        assert_eq!(&b.bytes()[6..8], &(-300i16).to_be_bytes());
        assert_eq!(b.len(), 8);
        assert_eq!(b.shape(), &Shape::new(vec![2, 2]));
    }

    #[test]
    fn test_set_sample_converts_integers() {
        let mut b = MutableNumericBuffer::new(&[0; 4], TypeDescriptor::uint(4), None).unwrap();
        b.set_sample(0, SampleValue::I8(7)).unwrap();
        assert_eq!(b.sample_value(0).unwrap(), SampleValue::U32(7));
    }

    #[test]
    fn test_set_sample_rejects_unrepresentable() {
        let mut b = MutableNumericBuffer::new(&[0; 2], TypeDescriptor::uint(1), None).unwrap();
        let err = b.set_sample(0, SampleValue::I16(-1)).unwrap_err();
        assert!(matches!(err, BufferError::ValueOutOfRange { .. }));
        assert!(b.set_sample(1, SampleValue::F32(1.0)).is_err());
        assert_eq!(b.bytes(), &[0, 0]);
    }

    #[test]
    fn test_set_sample_float() {
        let mut b = MutableNumericBuffer::new(&[0; 4], TypeDescriptor::float(4), None).unwrap();
        b.set_sample(0, SampleValue::U8(3)).unwrap();
        assert_eq!(b.sample_value(0).unwrap(), SampleValue::F32(3.0));
    }

    #[test]
    fn test_set_sample_out_of_range_index() {
        let mut b = MutableNumericBuffer::new(&[0; 2], TypeDescriptor::uint(1), None).unwrap();
        assert_eq!(
            b.set_sample(2, SampleValue::U8(1)),
            Err(BufferError::IndexOutOfRange {
                index: 2,
                samples: 2
            })
        );
    }

    #[test]
    fn test_set_sample_unsupported_format() {
        let t = TypeDescriptor::new(SampleFormat::Undefined, 1, ByteOrder::Native);
        let mut b = MutableNumericBuffer::new(&[0; 2], t, None).unwrap();
        assert_eq!(
            b.set_sample(0, SampleValue::U8(1)),
            Err(BufferError::UnsupportedFormat(SampleFormat::Undefined))
        );
    }

    #[test]
    fn test_mutable_copy_is_independent() {
        let frozen = NumericBuffer::new(&[1, 2, 3], TypeDescriptor::uint(1), None).unwrap();
        let mut m = frozen.to_mutable();
        m.set_sample(0, SampleValue::U8(42)).unwrap();
        assert_eq!(frozen.sample_value(0).unwrap(), SampleValue::U8(1));
        assert_eq!(m.sample_value(0).unwrap(), SampleValue::U8(42));

        let snapshot = m.to_immutable();
        m.set_sample(1, SampleValue::U8(0)).unwrap();
        assert_eq!(snapshot.bytes(), &[42, 2, 3]);
    }

    #[test]
    fn test_freeze_preserves_state() {
        let mut m = MutableNumericBuffer::zeroed(TypeDescriptor::uint(1), Shape::new(vec![3])).unwrap();
        m.set_sample(2, SampleValue::U8(9)).unwrap();
        let frozen = m.freeze();
        assert_eq!(frozen.bytes(), &[0, 0, 9]);
        assert_eq!(frozen.shape(), &Shape::new(vec![3]));
    }

    #[test]
    fn test_zeroed_overflow_is_too_large() {
        let err = MutableNumericBuffer::zeroed(TypeDescriptor::uint(8), Shape::new(vec![usize::MAX / 4]))
            .unwrap_err();
        assert_eq!(
            err,
            BufferError::TooLarge {
                shape: vec![usize::MAX / 4],
                sample_bytes: 8
            }
        );
        assert!(matches!(
            MutableNumericBuffer::zeroed(TypeDescriptor::uint(1), Shape::new(vec![usize::MAX, 2])),
            Err(BufferError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_new_validates_shape() {
        let err = MutableNumericBuffer::new(&[0; 4], TypeDescriptor::uint(2), Some(Shape::new(vec![3])))
            .unwrap_err();
        assert!(matches!(err, BufferError::ShapeMismatch { samples: 2, .. }));
    }
}

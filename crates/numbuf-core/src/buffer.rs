//! Immutable typed buffers and the read-side trait shared by both buffer kinds.
//!
//! A [`NumericBuffer`] is validated once: the product of its shape must equal
//! `len / sample_bytes`. After that it never changes, so clones share the
//! same storage and concurrent readers need no locking.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::mutable::MutableNumericBuffer;
use crate::value::{self, NativeSample, SampleValue};
use crate::{BufferError, Result, Shape, TypeDescriptor};

/// Read access to a typed, shaped byte buffer.
pub trait SampleRead {
    /// Raw bytes, including any trailing bytes that do not form a whole sample.
    fn bytes(&self) -> &[u8];

    fn dtype(&self) -> TypeDescriptor;

    fn shape(&self) -> &Shape;

    /// Length of the byte buffer.
    fn len(&self) -> usize {
        self.bytes().len()
    }

    fn is_empty(&self) -> bool {
        self.bytes().is_empty()
    }

    /// `len / sample_bytes`, truncated.
    fn num_samples(&self) -> usize {
        sample_count(self.len(), &self.dtype())
    }

    /// Number of dimensions (rank).
    fn ndim(&self) -> usize {
        self.shape().ndim()
    }

    /// Byte offset of sample `index`. Fails before any arithmetic touches the
    /// buffer if `index` is not below [`num_samples`](Self::num_samples).
    fn sample_offset(&self, index: usize) -> Result<usize> {
        let samples = self.num_samples();
        if index >= samples {
            return Err(BufferError::IndexOutOfRange { index, samples });
        }
        Ok(index * self.dtype().sample_bytes())
    }

    /// The raw bytes of sample `index`.
    fn sample_bytes(&self, index: usize) -> Result<&[u8]> {
        let offset = self.sample_offset(index)?;
        Ok(&self.bytes()[offset..offset + self.dtype().sample_bytes()])
    }

    /// Read sample `index`, interpreted per the buffer's type descriptor.
    ///
    /// Honors the descriptor's byte order; `Native` reads in host order.
    fn sample_value(&self, index: usize) -> Result<SampleValue> {
        let raw = self.sample_bytes(index)?;
        let dtype = self.dtype();
        let kind = value::lookup(&dtype)?;
        Ok((kind.decode)(raw, dtype.byte_order().resolve()))
    }

    /// All samples in flat order.
    fn samples(&self) -> impl Iterator<Item = Result<SampleValue>> + '_ {
        (0..self.num_samples()).map(move |i| self.sample_value(i))
    }

    /// All samples widened to `f64`.
    fn to_f64_vec(&self) -> Result<Vec<f64>> {
        self.samples().map(|s| s.map(SampleValue::as_f64)).collect()
    }

    /// Diagnostic rendering: `[ 1 2 3 ] <Integer,4,LE,(3)>`.
    ///
    /// Samples that cannot be interpreted render as `?`. Not a wire format.
    fn describe(&self) -> String {
        let mut out = String::from("[");
        for sample in self.samples() {
            out.push(' ');
            match sample {
                Ok(v) => out.push_str(&v.to_string()),
                Err(_) => out.push('?'),
            }
        }
        let dtype = self.dtype();
        out.push_str(&format!(
            " ] <{},{},{},{}>",
            dtype.format(),
            dtype.sample_bytes(),
            dtype.byte_order(),
            self.shape()
        ));
        out
    }
}

pub(crate) fn sample_count(len: usize, dtype: &TypeDescriptor) -> usize {
    len.checked_div(dtype.sample_bytes()).unwrap_or(0)
}

/// Check an explicit shape against the byte length, or derive the 1-D default.
pub(crate) fn resolve_shape(len: usize, dtype: &TypeDescriptor, shape: Option<Shape>) -> Result<Shape> {
    let samples = sample_count(len, dtype);
    match shape {
        None => Ok(Shape::new(vec![samples])),
        Some(shape) if shape.numel() == Some(samples) => Ok(shape),
        Some(shape) => Err(BufferError::ShapeMismatch {
            samples,
            shape: shape.0,
        }),
    }
}

/// An immutable byte buffer annotated with a sample type and a shape.
#[derive(Clone, PartialEq, Eq)]
pub struct NumericBuffer {
    data: Arc<[u8]>,
    dtype: TypeDescriptor,
    shape: Shape,
}

impl NumericBuffer {
    // ── Constructors ────────────────────────────────────────────────────

    /// Copy `bytes` into a new buffer.
    ///
    /// Without a shape, the buffer is 1-D with one entry per whole sample.
    pub fn new(bytes: &[u8], dtype: TypeDescriptor, shape: Option<Shape>) -> Result<Self> {
        let shape = resolve_shape(bytes.len(), &dtype, shape)?;
        Ok(Self::from_validated(Arc::from(bytes), dtype, shape))
    }

    /// Like [`new`](Self::new) but takes ownership of the bytes.
    pub fn from_vec(bytes: Vec<u8>, dtype: TypeDescriptor, shape: Option<Shape>) -> Result<Self> {
        let shape = resolve_shape(bytes.len(), &dtype, shape)?;
        Ok(Self::from_validated(Arc::from(bytes), dtype, shape))
    }

    /// Pack typed samples in host byte order.
    pub fn from_samples<T: NativeSample>(samples: &[T], shape: Option<Shape>) -> Result<Self> {
        let mut bytes = Vec::with_capacity(std::mem::size_of_val(samples));
        for &s in samples {
            s.extend_ne_bytes(&mut bytes);
        }
        Self::from_vec(bytes, T::dtype(), shape)
    }

    pub(crate) fn from_validated(data: Arc<[u8]>, dtype: TypeDescriptor, shape: Shape) -> Self {
        debug!(
            len = data.len(),
            dtype = %dtype,
            shape = %shape,
            "Created numeric buffer"
        );
        Self { data, dtype, shape }
    }

    // ── Copies ──────────────────────────────────────────────────────────

    /// Immutable copy. Shares storage with `self`.
    pub fn to_immutable(&self) -> NumericBuffer {
        self.clone()
    }

    /// Mutable copy with its own bytes.
    pub fn to_mutable(&self) -> MutableNumericBuffer {
        MutableNumericBuffer::from_validated(self.data.to_vec(), self.dtype, self.shape.clone())
    }

    /// Whether both buffers point at the same storage.
    pub fn shares_storage_with(&self, other: &NumericBuffer) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl SampleRead for NumericBuffer {
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

impl fmt::Display for NumericBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl fmt::Debug for NumericBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NumericBuffer")
            .field("len", &self.data.len())
            .field("dtype", &self.dtype)
            .field("shape", &self.shape)
            .finish()
    }
}

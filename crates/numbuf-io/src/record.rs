//! The logical record both encodings serialize.

use serde::{Deserialize, Serialize};
use tracing::warn;

use numbuf_core::{ByteOrder, NumericBuffer, SampleFormat, SampleRead, Shape, TypeDescriptor};

use crate::{CodecError, Result};

/// Field order is the positional wire order. The renames are the keys of the
/// tagged form.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub(crate) struct Record {
    pub data: Vec<u8>,
    #[serde(rename = "dataType.dataTypeFormat")]
    pub format: u8,
    #[serde(rename = "dataType.sampleBytes")]
    pub sample_bytes: u64,
    #[serde(rename = "dataType.byteOrder")]
    pub byte_order: u8,
    pub shape: Vec<u64>,
}

impl Record {
    pub fn from_buffer(buffer: &impl SampleRead) -> Self {
        let dtype = buffer.dtype();
        Self {
            data: buffer.bytes().to_vec(),
            format: dtype.format().tag(),
            sample_bytes: dtype.sample_bytes() as u64,
            byte_order: dtype.byte_order().tag(),
            shape: buffer.shape().dims().iter().map(|&d| d as u64).collect(),
        }
    }

    /// Rebuild the buffer: type first, then shape, then bytes, then the
    /// shape/size check.
    pub fn into_buffer(self) -> Result<NumericBuffer> {
        let format = SampleFormat::from_tag(self.format)
            .ok_or_else(|| corrupt(format!("unknown sample format tag {}", self.format)))?;
        let byte_order = ByteOrder::from_tag(self.byte_order)
            .ok_or_else(|| corrupt(format!("unknown byte order tag {}", self.byte_order)))?;
        let sample_bytes = usize::try_from(self.sample_bytes)
            .map_err(|_| corrupt(format!("sample width {} too large", self.sample_bytes)))?;
        let dtype = TypeDescriptor::new(format, sample_bytes, byte_order);

        let dims = self
            .shape
            .iter()
            .map(|&d| usize::try_from(d).map_err(|_| corrupt(format!("dimension {d} too large"))))
            .collect::<Result<Vec<usize>>>()?;

        NumericBuffer::from_vec(self.data, dtype, Some(Shape::new(dims)))
            .map_err(|e| corrupt(e.to_string()))
    }
}

pub(crate) fn corrupt(reason: impl Into<String>) -> CodecError {
    let reason = reason.into();
    warn!(%reason, "Rejected buffer stream");
    CodecError::CorruptStream(reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> Record {
        Record {
            data: vec![1, 0, 2, 0],
            format: SampleFormat::UnsignedInteger.tag(),
            sample_bytes: 2,
            byte_order: ByteOrder::LittleEndian.tag(),
            shape: vec![2],
        }
    }

    #[test]
    fn test_record_round_trip() {
        let buffer = record().into_buffer().unwrap();
        assert_eq!(buffer.dtype().format(), SampleFormat::UnsignedInteger);
        assert_eq!(Record::from_buffer(&buffer), record());
    }

    #[test]
    fn test_bad_format_tag() {
        let r = Record {
            format: 9,
            ..record()
        };
        assert!(matches!(r.into_buffer(), Err(CodecError::CorruptStream(_))));
    }

    #[test]
    fn test_bad_byte_order_tag() {
        let r = Record {
            byte_order: 3,
            ..record()
        };
        assert!(matches!(r.into_buffer(), Err(CodecError::CorruptStream(_))));
    }

    #[test]
    fn test_shape_mismatch_is_corrupt() {
        let r = Record {
            shape: vec![3],
            ..record()
        };
        let err = r.into_buffer().unwrap_err();
        match err {
            CodecError::CorruptStream(reason) => assert!(reason.contains("Shape mismatch")),
            other => panic!("unexpected error: {other}"),
        }
    }
}

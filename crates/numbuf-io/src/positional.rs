//! Compact positional encoding (bincode, standard configuration).
//!
//! Fields are written in record order with no names: data, format,
//! sample width, byte order, shape. Lengths and integers use variable-length
//! encoding.

use bincode::config::{self, Config};
use tracing::debug;

use numbuf_core::{NumericBuffer, SampleRead};

use crate::record::{Record, corrupt};
use crate::{CodecError, Result};

/// Upper bound on bytes a single decode may claim.
pub const MAX_DECODE_BYTES: usize = 1 << 30;

fn decode_config() -> impl Config {
    config::standard().with_limit::<MAX_DECODE_BYTES>()
}

pub fn encode(buffer: &impl SampleRead) -> Result<Vec<u8>> {
    let bytes = bincode::serde::encode_to_vec(Record::from_buffer(buffer), config::standard())
        .map_err(|e| CodecError::Encode(e.to_string()))?;
    debug!(len = bytes.len(), "Encoded positional record");
    Ok(bytes)
}

pub fn decode(bytes: &[u8]) -> Result<NumericBuffer> {
    let (record, consumed): (Record, usize) =
        bincode::serde::decode_from_slice(bytes, decode_config()).map_err(|e| corrupt(e.to_string()))?;
    if consumed != bytes.len() {
        return Err(corrupt(format!(
            "{} trailing bytes after record",
            bytes.len() - consumed
        )));
    }
    debug!(len = bytes.len(), "Decoded positional record");
    record.into_buffer()
}

#[cfg(test)]
mod tests {
    use super::*;
    use numbuf_core::{ByteOrder, SampleFormat, Shape, TypeDescriptor};

    #[test]
    fn test_round_trip() {
        let b = NumericBuffer::from_samples(&[1.0f32, 2.5, -3.0, 4.0, 5.0, 6.0], Some(Shape::new(vec![3, 2])))
            .unwrap();
        let decoded = decode(&encode(&b).unwrap()).unwrap();
        assert_eq!(decoded, b);
    }

    #[test]
    fn test_field_order() {
        let t = TypeDescriptor::new(SampleFormat::UnsignedInteger, 1, ByteOrder::LittleEndian);
        let b = NumericBuffer::new(&[9, 8], t, None).unwrap();
        let bytes = encode(&b).unwrap();
        // len(data)=2, data, format=2, width=1, order=1, len(shape)=1, shape[0]=2
        assert_eq!(bytes, vec![2, 9, 8, 2, 1, 1, 1, 2]);
    }

    #[test]
    fn test_smaller_than_tagged() {
        let b = NumericBuffer::from_samples(&[1u16, 2, 3, 4], None).unwrap();
        assert!(encode(&b).unwrap().len() < crate::tagged::encode(&b).unwrap().len());
    }

    #[test]
    fn test_truncated_is_corrupt() {
        let b = NumericBuffer::from_samples(&[1u32, 2, 3], None).unwrap();
        let bytes = encode(&b).unwrap();
        for cut in 0..bytes.len() {
            assert!(
                matches!(decode(&bytes[..cut]), Err(CodecError::CorruptStream(_))),
                "prefix of length {cut} decoded"
            );
        }
    }

    #[test]
    fn test_trailing_bytes_are_corrupt() {
        let b = NumericBuffer::from_samples(&[1u8], None).unwrap();
        let mut bytes = encode(&b).unwrap();
        bytes.push(0);
        assert!(matches!(decode(&bytes), Err(CodecError::CorruptStream(_))));
    }

    #[test]
    fn test_invalid_format_tag_is_corrupt() {
        // data=[0], format=7, width=1, order=1, shape=[1]
        let bytes = [1, 0, 7, 1, 1, 1, 1];
        assert!(matches!(decode(&bytes), Err(CodecError::CorruptStream(_))));
    }

    #[test]
    fn test_shape_mismatch_is_corrupt() {
        // data=[0, 0], format=2, width=1, order=1, shape=[3]
        let bytes = [2, 0, 0, 2, 1, 1, 1, 3];
        assert!(matches!(decode(&bytes), Err(CodecError::CorruptStream(_))));
    }
}

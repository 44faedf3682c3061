//! Keyed JSON encoding.
//!
//! ```json
//! {"data":[1,2],"dataType.dataTypeFormat":2,"dataType.sampleBytes":1,
//!  "dataType.byteOrder":2,"shape":[2]}
//! ```
//!
//! Keys may appear in any order; unknown keys are skipped so newer writers
//! can add fields.

use tracing::debug;

use numbuf_core::{NumericBuffer, SampleRead};

use crate::record::{Record, corrupt};
use crate::{CodecError, Result};

pub fn encode(buffer: &impl SampleRead) -> Result<Vec<u8>> {
    let bytes = serde_json::to_vec(&Record::from_buffer(buffer))
        .map_err(|e| CodecError::Encode(e.to_string()))?;
    debug!(len = bytes.len(), "Encoded tagged record");
    Ok(bytes)
}

pub fn decode(bytes: &[u8]) -> Result<NumericBuffer> {
    let record: Record = serde_json::from_slice(bytes).map_err(|e| corrupt(e.to_string()))?;
    debug!(len = bytes.len(), "Decoded tagged record");
    record.into_buffer()
}

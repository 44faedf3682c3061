//! Framed streams and files.
//!
//! Frame layout:
//!
//! ```text
//! "NBUF" | version: u8 | encoding tag: u8 | payload length: u64 LE | payload
//! ```
//!
//! The encoding tag lets a reader pick the codec without being told.

use std::fs;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use tracing::debug;

use numbuf_core::{NumericBuffer, SampleRead};

use crate::record::corrupt;
use crate::{Encoding, Result, decode, encode};

pub const MAGIC: &[u8; 4] = b"NBUF";
pub const VERSION: u8 = 1;

const HEADER_LEN: usize = 4 + 1 + 1 + 8;

/// Write one framed buffer.
pub fn write_buffer<W: Write>(writer: &mut W, buffer: &impl SampleRead, encoding: Encoding) -> Result<()> {
    let payload = encode(buffer, encoding)?;
    let mut header = [0u8; HEADER_LEN];
    header[..4].copy_from_slice(MAGIC);
    header[4] = VERSION;
    header[5] = encoding.tag();
    header[6..].copy_from_slice(&(payload.len() as u64).to_le_bytes());
    writer.write_all(&header)?;
    writer.write_all(&payload)?;
    debug!(%encoding, payload = payload.len(), "Wrote framed buffer");
    Ok(())
}

/// Read one framed buffer, detecting its encoding from the header.
pub fn read_buffer<R: Read>(reader: &mut R) -> Result<NumericBuffer> {
    let mut header = [0u8; HEADER_LEN];
    read_exact_or_corrupt(reader, &mut header)?;

    if &header[..4] != MAGIC {
        return Err(corrupt("bad magic"));
    }
    if header[4] != VERSION {
        return Err(corrupt(format!("unsupported version {}", header[4])));
    }
    let encoding =
        Encoding::from_tag(header[5]).ok_or_else(|| corrupt(format!("unknown encoding tag {}", header[5])))?;

    let mut len_bytes = [0u8; 8];
    len_bytes.copy_from_slice(&header[6..]);
    let len = u64::from_le_bytes(len_bytes);

    let mut payload = Vec::new();
    reader.take(len).read_to_end(&mut payload)?;
    if payload.len() as u64 != len {
        return Err(corrupt(format!(
            "payload truncated: expected {len} bytes, got {}",
            payload.len()
        )));
    }
    debug!(%encoding, payload = payload.len(), "Read framed buffer");
    decode(&payload, encoding)
}

fn read_exact_or_corrupt<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<()> {
    match reader.read_exact(buf) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(corrupt("header truncated")),
        Err(e) => Err(e.into()),
    }
}

/// Save a framed buffer to `path`.
pub fn save(path: &Path, buffer: &impl SampleRead, encoding: Encoding) -> Result<()> {
    let mut writer = BufWriter::new(fs::File::create(path)?);
    write_buffer(&mut writer, buffer, encoding)?;
    writer.flush()?;
    Ok(())
}

/// Load a framed buffer from `path`.
pub fn load(path: &Path) -> Result<NumericBuffer> {
    let mut reader = BufReader::new(fs::File::open(path)?);
    read_buffer(&mut reader)
}

//! Binary blob layout
//!
//! A blob is a fixed header followed by the value's payload:
//!
//! ```text
//! offset  size  field
//! 0       4     magic "LSOB"
//! 4       1     format version (1)
//! 5       2     type tag length N (u16, little endian)
//! 7       N     type tag (UTF-8)
//! 7+N     2     schema version (u16, little endian)
//! 9+N     8     payload length L (u64, little endian)
//! 17+N    L     payload: bincode, fixed-width integers, little endian
//! ```
//!
//! Decoding rejects anything that does not match exactly: wrong magic,
//! unknown format version, another type tag or schema version, short
//! input and trailing bytes. Shared `Rc`/`Arc` values are written out by
//! value, so sharing is not preserved across a round trip.

use bincode::Options;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::SerializeError;

pub const MAGIC: [u8; 4] = *b"LSOB";
pub const FORMAT_VERSION: u8 = 1;

/// A type that can be stored as a blob.
///
/// `TYPE_TAG` names the type in the blob header; bump `SCHEMA_VERSION`
/// whenever the serialized shape of the type changes.
pub trait Persist: Serialize + DeserializeOwned {
    const TYPE_TAG: &'static str;
    const SCHEMA_VERSION: u16 = 1;
}

/// Immutable bytes of one serialized value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializedBlob(Vec<u8>);

impl SerializedBlob {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for SerializedBlob {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

fn payload_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
        .reject_trailing_bytes()
}

/// Serialize `value` into a blob
pub fn encode<T: Persist>(value: &T) -> Result<SerializedBlob, SerializeError> {
    let tag = T::TYPE_TAG.as_bytes();
    let tag_len = u16::try_from(tag.len()).map_err(|_| {
        SerializeError::Encode(Box::new(bincode::ErrorKind::Custom(format!(
            "type tag longer than {} bytes",
            u16::MAX
        ))))
    })?;
    let payload = payload_options()
        .serialize(value)
        .map_err(SerializeError::Encode)?;

    let mut bytes = Vec::with_capacity(17 + tag.len() + payload.len());
    bytes.extend_from_slice(&MAGIC);
    bytes.push(FORMAT_VERSION);
    bytes.extend_from_slice(&tag_len.to_le_bytes());
    bytes.extend_from_slice(tag);
    bytes.extend_from_slice(&T::SCHEMA_VERSION.to_le_bytes());
    bytes.extend_from_slice(&(payload.len() as u64).to_le_bytes());
    bytes.extend_from_slice(&payload);
    Ok(SerializedBlob(bytes))
}

/// Deserialize a blob produced by [`encode`] for the same type and schema
pub fn decode<T: Persist>(bytes: &[u8]) -> Result<T, SerializeError> {
    let mut reader = ByteReader::new(bytes);

    if reader.take(MAGIC.len())? != MAGIC {
        return Err(SerializeError::BadMagic);
    }

    let format = reader.u8()?;
    if format != FORMAT_VERSION {
        return Err(SerializeError::UnsupportedFormat(format));
    }

    let tag_len = usize::from(reader.u16()?);
    let tag = String::from_utf8_lossy(reader.take(tag_len)?);
    if tag != T::TYPE_TAG {
        return Err(SerializeError::TypeMismatch {
            expected: T::TYPE_TAG.to_string(),
            found: tag.into_owned(),
        });
    }

    let schema = reader.u16()?;
    if schema != T::SCHEMA_VERSION {
        return Err(SerializeError::SchemaMismatch {
            type_tag: T::TYPE_TAG.to_string(),
            expected: T::SCHEMA_VERSION,
            found: schema,
        });
    }

    let payload_len = reader.u64()?;
    let payload_len = usize::try_from(payload_len).map_err(|_| SerializeError::Truncated {
        needed: usize::MAX,
        available: bytes.len(),
    })?;
    let payload = reader.take(payload_len)?;

    if reader.remaining() > 0 {
        return Err(SerializeError::TrailingBytes(reader.remaining()));
    }

    payload_options()
        .with_limit(payload_len as u64)
        .deserialize(payload)
        .map_err(SerializeError::Decode)
}

struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], SerializeError> {
        if self.remaining() < n {
            return Err(SerializeError::Truncated {
                needed: self.pos.saturating_add(n),
                available: self.bytes.len(),
            });
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn u8(&mut self) -> Result<u8, SerializeError> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16, SerializeError> {
        let mut raw = [0u8; 2];
        raw.copy_from_slice(self.take(2)?);
        Ok(u16::from_le_bytes(raw))
    }

    fn u64(&mut self) -> Result<u64, SerializeError> {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(self.take(8)?);
        Ok(u64::from_le_bytes(raw))
    }
}

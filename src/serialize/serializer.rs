//! Serializer component
//!
//! Wraps the blob codec with the store's failure policy: corrupt or foreign
//! blobs are reported and come back as `None`, write failures are errors.

use log::{debug, info};
use std::path::Path;
use std::sync::Arc;

use crate::error::{SerializeError, StorageError, StoreError, report_error};
use crate::serialize::codec::{self, Persist, SerializedBlob};
use crate::serialize::text;
use crate::transfer::FileIo;
use crate::utils::logging::DiagnosticSink;

pub struct Serializer {
    files: Arc<FileIo>,
    sink: Arc<dyn DiagnosticSink>,
    tag: String,
}

impl Serializer {
    pub fn new(tag: impl Into<String>, files: Arc<FileIo>, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            files,
            sink,
            tag: tag.into(),
        }
    }

    fn report(&self, context: &str, err: SerializeError) {
        report_error(self.sink.as_ref(), &self.tag, context, &StoreError::from(err));
    }

    pub fn serialize<T: Persist>(&self, value: &T) -> Result<SerializedBlob, SerializeError> {
        codec::encode(value)
    }

    /// Decode a blob; `None` if it is truncated, corrupt or of another type/schema
    pub fn deserialize<T: Persist>(&self, bytes: &[u8]) -> Option<T> {
        match codec::decode(bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                self.report(&format!("Cannot decode {} blob", T::TYPE_TAG), e);
                None
            }
        }
    }

    /// Base64 of the serialized value, or `""` if it cannot be serialized
    pub fn to_text_safe<T: Persist>(&self, value: &T) -> String {
        match codec::encode(value) {
            Ok(blob) => text::encode_text(&blob),
            Err(e) => {
                self.report(&format!("Cannot serialize {}", T::TYPE_TAG), e);
                String::new()
            }
        }
    }

    /// Inverse of `to_text_safe`; `None` for empty or malformed text
    pub fn from_text_safe<T: Persist>(&self, text: &str) -> Option<T> {
        match text::decode_text(text) {
            Ok(blob) => self.deserialize(blob.as_bytes()),
            Err(SerializeError::EmptyInput) => {
                debug!("Empty text-safe input for {}", T::TYPE_TAG);
                None
            }
            Err(e) => {
                self.report(&format!("Malformed text for {}", T::TYPE_TAG), e);
                None
            }
        }
    }

    /// Serialize `value` into the file at `path`, replacing its content
    pub fn write_to_file<T: Persist>(
        &self,
        path: impl AsRef<Path>,
        value: &T,
    ) -> Result<(), StoreError> {
        let path = path.as_ref();
        let blob = self.serialize(value)?;
        self.files.write_bytes(path, blob.as_bytes())?;
        info!("Stored {} blob at {} ({} bytes)", T::TYPE_TAG, path.display(), blob.len());
        Ok(())
    }

    /// Read a value back from a file; `None` if the file is missing or its blob is unusable
    pub fn read_from_file<T: Persist>(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<Option<T>, StorageError> {
        Ok(self
            .files
            .read_bytes(path)?
            .and_then(|bytes| self.deserialize(&bytes)))
    }
}

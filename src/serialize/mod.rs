//! Object serialization
//!
//! Versioned binary blobs, their Base64 text form, and file-backed storage of both.

pub mod codec;
pub mod serializer;
pub mod text;

pub use codec::{FORMAT_VERSION, MAGIC, Persist, SerializedBlob, decode, encode};
pub use serializer::Serializer;
pub use text::{decode_text, encode_text};

//! Text-safe blob encoding
//!
//! Standard Base64 with padding. Whitespace and line breaks are ignored on the
//! way back in, so wrapped text (as some platforms emit) decodes too.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::error::SerializeError;
use crate::serialize::codec::SerializedBlob;

pub fn encode_text(blob: &SerializedBlob) -> String {
    STANDARD.encode(blob.as_bytes())
}

pub fn decode_text(text: &str) -> Result<SerializedBlob, SerializeError> {
    let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if compact.is_empty() {
        return Err(SerializeError::EmptyInput);
    }

    let bytes = STANDARD.decode(compact.as_bytes())?;
    if bytes.is_empty() {
        return Err(SerializeError::EmptyInput);
    }
    Ok(SerializedBlob::from_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_text() {
        let blob = SerializedBlob::from_bytes(b"any carnal pleasure".to_vec());
        let text = encode_text(&blob);
        assert_eq!(text, "YW55IGNhcm5hbCBwbGVhc3VyZQ==");
        assert_eq!(decode_text(&text).unwrap(), blob);
    }

    #[test]
    fn test_decode_ignores_line_breaks() {
        let wrapped = "YW55IGNhcm5h\nbCBwbGVhc3Vy\r\nZQ==\n";
        assert_eq!(
            decode_text(wrapped).unwrap().as_bytes(),
            b"any carnal pleasure"
        );
    }

    #[test]
    fn test_decode_rejects_empty_and_malformed() {
        assert!(matches!(decode_text(""), Err(SerializeError::EmptyInput)));
        assert!(matches!(decode_text(" \n"), Err(SerializeError::EmptyInput)));
        assert!(matches!(decode_text("@@@"), Err(SerializeError::Base64(_))));
    }
}

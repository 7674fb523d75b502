use std::io::{self, Read, Write};

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use serde_json::Value;

/// Decodes one inline query parameter: base64url text wrapping a
/// zlib-compressed UTF-8 JSON document.
///
/// The URL-safe alphabet is mapped back to the standard one (`-`→`+`,
/// `_`→`/`) and the text is re-padded to a multiple of four characters, so
/// payloads that lost their `=` padding in transit still decode.
pub fn decode_payload(param: &str) -> io::Result<Value> {
    let mut normalized: String = param
        .trim()
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    while normalized.len() % 4 != 0 {
        normalized.push('=');
    }

    let compressed = STANDARD
        .decode(normalized.as_bytes())
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, format!("bad base64: {err}")))?;

    let mut decoder = ZlibDecoder::new(compressed.as_slice());
    let mut json = Vec::new();
    decoder.read_to_end(&mut json)?;

    serde_json::from_slice(&json)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, format!("bad payload: {err}")))
}

/// Encodes a JSON document into the inline query-parameter form:
/// zlib-compress the serialized text, then base64url-encode it.
pub fn encode_payload(value: &Value) -> io::Result<String> {
    let json = serde_json::to_vec(value)?;
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&json)?;
    let compressed = encoder.finish()?;
    Ok(URL_SAFE.encode(compressed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn encode_then_decode_is_identity() {
        let value = json!([
            {"id": 0, "model_name": "m", "param_name": "a.0.w", "numel": "50", "shape": "2,25"},
            {"id": 1, "model_name": "m", "param_name": "a.1.w", "numel": "500", "shape": "2,250"},
        ]);
        let encoded = encode_payload(&value).expect("encode");
        let decoded = decode_payload(&encoded).expect("decode");
        assert_eq!(decoded, value);
    }

    #[test]
    fn decoding_tolerates_stripped_padding() {
        let value = json!({"model_name": "m", "hidden": 10});
        let encoded = encode_payload(&value).expect("encode");
        let stripped = encoded.trim_end_matches('=');
        let decoded = decode_payload(stripped).expect("decode without padding");
        assert_eq!(decoded, value);
    }

    #[test]
    fn garbage_input_is_an_error() {
        assert!(decode_payload("!!not base64!!").is_err());
        // Valid base64 that is not a zlib stream.
        assert!(decode_payload(&URL_SAFE.encode(b"plain text")).is_err());
    }
}

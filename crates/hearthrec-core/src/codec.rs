//! Payload compression.
//!
//! Game text is zlib-compressed before upload. The output must be
//! deterministic: duplicate detection fingerprints the compressed bytes.

use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;

use crate::error::{Error, Result};

/// Compress UTF-8 text into a transport payload.
pub fn compress(text: &str) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes())?;
    Ok(encoder.finish()?)
}

/// Inverse of [`compress`].
pub fn decompress(payload: &[u8]) -> Result<String> {
    let mut decoder = ZlibDecoder::new(payload);
    let mut bytes = Vec::new();
    decoder
        .read_to_end(&mut bytes)
        .map_err(|e| Error::Codec(format!("invalid payload: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| Error::Codec(format!("payload is not UTF-8: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_empty() {
        let payload = compress("").unwrap();
        assert!(!payload.is_empty());
        assert_eq!(decompress(&payload).unwrap(), "");
    }

    #[test]
    fn test_round_trip_game_text() {
        let text = "[Power] GameState.DebugPrintPower() - CREATE_GAME\n\
                    [Power] GameState.DebugPrintPower() - TAG_CHANGE Entity=GameEntity tag=STATE value=COMPLETE\n\
                    [Bob] ---RegisterFriendChallenge---\n";
        assert_eq!(decompress(&compress(text).unwrap()).unwrap(), text);
    }

    #[test]
    fn test_round_trip_multi_megabyte() {
        let line = "[Power] GameState.DebugPrintPower() -     TAG_CHANGE Entity=Player tag=RESOURCES value=7 ünïcødé\n";
        let text = line.repeat(40_000);
        assert!(text.len() > 3 * 1024 * 1024);

        let payload = compress(&text).unwrap();
        assert!(payload.len() < text.len());
        assert_eq!(decompress(&payload).unwrap(), text);
    }

    #[test]
    fn test_compression_is_deterministic() {
        let text = "CREATE_GAME\n...\n";
        assert_eq!(compress(text).unwrap(), compress(text).unwrap());
    }

    #[test]
    fn test_zlib_header() {
        let payload = compress("x").unwrap();
        assert_eq!(payload[0], 0x78);
    }

    #[test]
    fn test_decompress_garbage() {
        assert!(matches!(decompress(b"not zlib"), Err(Error::Codec(_))));
    }
}

use crate::ast;
use crate::ast::{CompressionMethod, Header, Movie, SwfSignature};
use crate::parsers::basic_data_types::{parse_le_ufixed8_p8, parse_rect};
use crate::parsers::tags::{parse_tag, ParsedTag};
use nom::number::complete::le_u16 as parse_le_u16;
use nom::IResult as NomResult;
use thiserror::Error;

/// A fatal parse condition. Anything not covered here is locally absorbed
/// with a diagnostic and a safe default during parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SwfParseError {
  #[error("not an SWF file: invalid signature")]
  InvalidSignature,
  #[error("unsupported SWF compression method: {0:?}")]
  UnsupportedCompression(CompressionMethod),
  #[error("invalid SWF header")]
  InvalidHeader,
  #[error("truncated SWF stream")]
  Truncated,
  #[error("invalid `{tag}` tag body")]
  InvalidTagBody { tag: &'static str },
  #[error("unsupported SWF feature: {0}")]
  UnsupportedFeature(&'static str),
  #[error("failed to inflate SWF payload: {0}")]
  InvalidPayload(String),
}

/// Parses the raw (never compressed) first 8 bytes of the file: the
/// 3-byte magic, the version byte and the uncompressed file length.
pub fn parse_swf_signature(input: &[u8]) -> Result<(&[u8], SwfSignature), SwfParseError> {
  if input.len() < 8 {
    return Err(SwfParseError::Truncated);
  }
  let compression_method = match &input[..3] {
    b"FWS" => CompressionMethod::None,
    b"CWS" => CompressionMethod::Deflate,
    b"ZWS" => CompressionMethod::Lzma,
    _ => return Err(SwfParseError::InvalidSignature),
  };
  let swf_version = input[3];
  let uncompressed_file_length = u32::from_le_bytes([input[4], input[5], input[6], input[7]]);

  Ok((
    &input[8..],
    SwfSignature {
      compression_method,
      swf_version,
      uncompressed_file_length,
    },
  ))
}

pub(crate) fn parse_header(input: &[u8], swf_version: u8) -> NomResult<&[u8], Header> {
  let (input, frame_size) = parse_rect(input)?;
  let (input, frame_rate) = parse_le_ufixed8_p8(input)?;
  let (input, frame_count) = parse_le_u16(input)?;
  Ok((
    input,
    Header {
      swf_version,
      frame_size,
      frame_rate,
      frame_count,
    },
  ))
}

#[cfg(feature = "deflate")]
pub(crate) fn decompress_zlib(bytes: &[u8]) -> Result<Vec<u8>, SwfParseError> {
  inflate::inflate_bytes_zlib(bytes).map_err(SwfParseError::InvalidPayload)
}

#[cfg(not(feature = "deflate"))]
pub(crate) fn decompress_zlib(_bytes: &[u8]) -> Result<Vec<u8>, SwfParseError> {
  Err(SwfParseError::UnsupportedFeature(
    "zlib payload: compile `swf-player` with the `deflate` feature",
  ))
}

/// Parses a fully loaded movie.
///
/// LZMA-compressed (`ZWS`) files are rejected with
/// `SwfParseError::UnsupportedCompression`.
pub fn parse_movie(input: &[u8]) -> Result<Movie, SwfParseError> {
  let (input, signature) = parse_swf_signature(input)?;
  match signature.compression_method {
    CompressionMethod::None => parse_movie_payload(input, signature.swf_version),
    CompressionMethod::Deflate => {
      let payload = decompress_zlib(input)?;
      parse_movie_payload(&payload, signature.swf_version)
    }
    CompressionMethod::Lzma => Err(SwfParseError::UnsupportedCompression(CompressionMethod::Lzma)),
  }
}

fn parse_movie_payload(input: &[u8], swf_version: u8) -> Result<Movie, SwfParseError> {
  let (input, header) = parse_header(input, swf_version).map_err(|_| SwfParseError::InvalidHeader)?;

  let mut tags: Vec<ast::Tag> = Vec::new();
  let mut input = input;
  while !input.is_empty() {
    let (next_input, parsed) = parse_tag(input, swf_version)?;
    input = next_input;
    match parsed {
      ParsedTag::Tag(tag) => tags.push(tag),
      ParsedTag::Skipped => {}
      ParsedTag::End => break,
    }
  }

  Ok(Movie { header, tags })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ast::{Rect, Twip};

  #[test]
  fn test_parse_swf_signature() {
    let (rest, signature) = parse_swf_signature(&b"FWS\x0f\x08\x00\x00\x00"[..]).unwrap();
    assert!(rest.is_empty());
    assert_eq!(
      signature,
      SwfSignature {
        compression_method: CompressionMethod::None,
        swf_version: 15,
        uncompressed_file_length: 8,
      }
    );

    let (_, signature) = parse_swf_signature(&b"CWS\x08\xac\x05\x00\x00"[..]).unwrap();
    assert_eq!(signature.compression_method, CompressionMethod::Deflate);
    assert_eq!(signature.swf_version, 8);
    assert_eq!(signature.uncompressed_file_length, 1452);
  }

  #[test]
  fn test_parse_swf_signature_invalid() {
    assert_eq!(
      parse_swf_signature(&b"GIF89a\x00\x00"[..]),
      Err(SwfParseError::InvalidSignature)
    );
    assert_eq!(parse_swf_signature(&b"FWS"[..]), Err(SwfParseError::Truncated));
  }

  #[test]
  fn test_parse_movie_lzma_rejected() {
    let input = b"ZWS\x0d\x00\x01\x00\x00rest";
    assert_eq!(
      parse_movie(&input[..]),
      Err(SwfParseError::UnsupportedCompression(CompressionMethod::Lzma))
    );
  }

  #[test]
  fn test_parse_minimal_movie() {
    // nbits=0 stage rect, 12 fps, 1 frame; ShowFrame then End.
    let mut input: Vec<u8> = b"FWS\x05".to_vec();
    input.extend_from_slice(&0u32.to_le_bytes());
    input.push(0x00); // rect
    input.extend_from_slice(&[0x00, 0x0c]); // frame rate 12.0
    input.extend_from_slice(&1u16.to_le_bytes()); // frame count
    input.extend_from_slice(&(1u16 << 6).to_le_bytes()); // ShowFrame
    input.extend_from_slice(&0u16.to_le_bytes()); // End

    let movie = parse_movie(&input).unwrap();
    assert_eq!(movie.header.swf_version, 5);
    assert_eq!(movie.header.frame_count, 1);
    assert_eq!(movie.header.frame_rate.to_f32(), 12.0);
    assert_eq!(
      movie.header.frame_size,
      Rect {
        x_min: Twip(0),
        x_max: Twip(0),
        y_min: Twip(0),
        y_max: Twip(0),
      }
    );
    assert_eq!(movie.tags, vec![ast::Tag::ShowFrame]);
  }
}

use crate::ast::tags::DefineBitmap;
use crate::parsers::movie::{decompress_zlib, SwfParseError};
use nom::number::complete::{le_u16 as parse_le_u16, le_u8 as parse_u8};
use nom::IResult as NomResult;

struct LosslessHead {
  id: u16,
  format: u8,
  width: u16,
  height: u16,
  color_count: usize,
}

fn parse_lossless_head(input: &[u8]) -> NomResult<&[u8], LosslessHead> {
  let (input, id) = parse_le_u16(input)?;
  let (input, format) = parse_u8(input)?;
  let (input, width) = parse_le_u16(input)?;
  let (input, height) = parse_le_u16(input)?;
  let (input, color_count) = if format == 3 {
    let (input, last_index) = parse_u8(input)?;
    (input, usize::from(last_index) + 1)
  } else {
    (input, 0)
  };
  Ok((
    input,
    LosslessHead {
      id,
      format,
      width,
      height,
      color_count,
    },
  ))
}

/// Parses a DefineBitsLossless/DefineBitsLossless2 tag body, inflating and
/// normalizing the pixmap to straight RGBA bytes.
///
/// Returns `None` (and logs) for pixel formats the decoder does not handle,
/// so playback can continue without the character.
pub(crate) fn parse_define_bits_lossless(input: &[u8], with_alpha: bool) -> Result<Option<DefineBitmap>, SwfParseError> {
  let tag = if with_alpha {
    "DefineBitsLossless2"
  } else {
    "DefineBitsLossless"
  };
  let (compressed, head) = parse_lossless_head(input).map_err(|_| SwfParseError::InvalidTagBody { tag })?;
  let pixels = decompress_zlib(compressed)?;

  let width = usize::from(head.width);
  let height = usize::from(head.height);

  let data = match head.format {
    3 => decode_color_mapped(&pixels, width, height, head.color_count, with_alpha),
    5 => decode_pix32(&pixels, width, height, with_alpha),
    other => {
      log::warn!("unsupported lossless bitmap format {} for character {}", other, head.id);
      return Ok(None);
    }
  };

  match data {
    Some(data) => Ok(Some(DefineBitmap {
      id: head.id,
      width: head.width,
      height: head.height,
      data,
    })),
    None => {
      log::warn!("truncated pixel data in lossless bitmap character {}", head.id);
      Ok(None)
    }
  }
}

/// 8-bit colormapped image: a color table followed by index rows padded to
/// 32-bit boundaries.
fn decode_color_mapped(
  pixels: &[u8],
  width: usize,
  height: usize,
  color_count: usize,
  with_alpha: bool,
) -> Option<Vec<u8>> {
  let entry_size = if with_alpha { 4 } else { 3 };
  let table_size = color_count * entry_size;
  let stride = (width + 3) & !3;
  if pixels.len() < table_size + stride * height {
    return None;
  }

  let mut table: Vec<[u8; 4]> = Vec::with_capacity(color_count);
  for entry in pixels[..table_size].chunks(entry_size) {
    let a = if with_alpha { entry[3] } else { 255 };
    table.push([entry[0], entry[1], entry[2], a]);
  }

  let mut data: Vec<u8> = Vec::with_capacity(width * height * 4);
  for y in 0..height {
    let row = &pixels[table_size + y * stride..];
    for x in 0..width {
      let color = table.get(usize::from(row[x])).copied().unwrap_or([0, 0, 0, 0]);
      data.extend_from_slice(&color);
    }
  }
  Some(data)
}

/// 32-bit image: PIX24 (reserved byte + RGB) for the v1 tag, ARGB for v2.
fn decode_pix32(pixels: &[u8], width: usize, height: usize, with_alpha: bool) -> Option<Vec<u8>> {
  if pixels.len() < width * height * 4 {
    return None;
  }

  let mut data: Vec<u8> = Vec::with_capacity(width * height * 4);
  for pixel in pixels[..width * height * 4].chunks(4) {
    let a = if with_alpha { pixel[0] } else { 255 };
    data.extend_from_slice(&[pixel[1], pixel[2], pixel[3], a]);
  }
  Some(data)
}

#[cfg(test)]
#[cfg(feature = "deflate")]
mod tests {
  use super::*;

  // A stored (uncompressed) zlib stream wrapping `data`.
  fn zlib_stored(data: &[u8]) -> Vec<u8> {
    let mut out = vec![0x78, 0x01];
    let len = data.len() as u16;
    out.push(0x01);
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(&(!len).to_le_bytes());
    out.extend_from_slice(data);
    let mut s1: u32 = 1;
    let mut s2: u32 = 0;
    for byte in data {
      s1 = (s1 + u32::from(*byte)) % 65521;
      s2 = (s2 + s1) % 65521;
    }
    out.extend_from_slice(&((s2 << 16) | s1).to_be_bytes());
    out
  }

  #[test]
  fn test_parse_lossless_color_mapped() {
    // 2x2 image, 2-entry color table (red, blue), rows padded to 4 bytes.
    let pixmap: Vec<u8> = vec![
      255, 0, 0, // table[0]
      0, 0, 255, // table[1]
      0, 1, 0, 0, // row 0 + padding
      1, 0, 0, 0, // row 1 + padding
    ];
    let mut body = vec![0x07, 0x00, 0x03, 0x02, 0x00, 0x02, 0x00, 0x01];
    body.extend_from_slice(&zlib_stored(&pixmap));

    let bitmap = parse_define_bits_lossless(&body, false).unwrap().unwrap();
    assert_eq!(bitmap.id, 7);
    assert_eq!((bitmap.width, bitmap.height), (2, 2));
    assert_eq!(
      bitmap.data,
      vec![
        255, 0, 0, 255, 0, 0, 255, 255, //
        0, 0, 255, 255, 255, 0, 0, 255,
      ]
    );
  }

  #[test]
  fn test_parse_lossless2_pix32() {
    // 1x2 image, ARGB pixels.
    let pixmap: Vec<u8> = vec![128, 10, 20, 30, 255, 40, 50, 60];
    let mut body = vec![0x08, 0x00, 0x05, 0x01, 0x00, 0x02, 0x00];
    body.extend_from_slice(&zlib_stored(&pixmap));

    let bitmap = parse_define_bits_lossless(&body, true).unwrap().unwrap();
    assert_eq!(bitmap.data, vec![10, 20, 30, 128, 40, 50, 60, 255]);
  }

  #[test]
  fn test_parse_lossless_unknown_format_skipped() {
    let mut body = vec![0x09, 0x00, 0x04, 0x01, 0x00, 0x01, 0x00];
    body.extend_from_slice(&zlib_stored(&[0, 0]));
    assert_eq!(parse_define_bits_lossless(&body, false).unwrap(), None);
  }
}

use crate::ast;
use crate::ast::fixed::{Sfixed16P16, Sfixed8P8, Ufixed8P8};
use nom::number::complete::{le_i16 as parse_le_i16, le_u16 as parse_le_u16, le_u8 as parse_u8};
use nom::{IResult as NomResult, Needed};

/// Parse the bit-encoded representation of a bool (1 bit)
pub fn parse_bool_bits((input_slice, bit_pos): (&[u8], usize)) -> NomResult<(&[u8], usize), bool> {
  if input_slice.is_empty() {
    Err(nom::Err::Incomplete(Needed::new(1)))
  } else {
    let res: bool = input_slice[0] & (1 << (7 - bit_pos)) > 0;
    if bit_pos == 7 {
      Ok(((&input_slice[1..], 0), res))
    } else {
      Ok(((input_slice, bit_pos + 1), res))
    }
  }
}

/// Parse a null-terminated sequence of bytes. The nul-byte is consumed but
/// not included in the result.
pub fn parse_c_string(input: &[u8]) -> NomResult<&[u8], String> {
  let raw = match memchr::memchr(0, input) {
    Some(idx) => &input[..idx],
    None => return Err(nom::Err::Incomplete(Needed::new(1))),
  };

  match std::str::from_utf8(raw) {
    Ok(checked) => Ok((&input[raw.len() + 1..], checked.to_string())),
    Err(_) => Err(nom::Err::Error(nom::error::Error::new(
      input,
      nom::error::ErrorKind::Verify,
    ))),
  }
}

/// Generates a bits parser reading an `u16` over `n` bits.
pub fn do_parse_u16_bits(n: usize) -> impl Fn((&[u8], usize)) -> NomResult<(&[u8], usize), u16> {
  move |input: (&[u8], usize)| nom::bits::streaming::take::<_, u16, _, _>(n)(input)
}

/// Parse the bit-encoded big-endian representation of an unsigned 16-bit integer
pub fn parse_u16_bits(input: (&[u8], usize), n: usize) -> NomResult<(&[u8], usize), u16> {
  do_parse_u16_bits(n)(input)
}

/// Generates a bits parser reading an `u32` over `n` bits.
pub fn do_parse_u32_bits(n: usize) -> impl Fn((&[u8], usize)) -> NomResult<(&[u8], usize), u32> {
  debug_assert!(n <= 32);
  move |input: (&[u8], usize)| nom::bits::streaming::take::<_, u32, _, _>(n)(input)
}

pub fn parse_u32_bits(input: (&[u8], usize), n: usize) -> NomResult<(&[u8], usize), u32> {
  do_parse_u32_bits(n)(input)
}

/// Generates a bits parser reading an `i16` over `n` bits, sign-extending
/// from bit `n - 1`.
pub fn do_parse_i16_bits(n: usize) -> impl Fn((&[u8], usize)) -> NomResult<(&[u8], usize), i16> {
  debug_assert!(n <= 16);
  move |input: (&[u8], usize)| {
    let (input, x) = nom::bits::streaming::take::<_, u16, _, _>(n)(input)?;
    let x = match n {
      0 => 0,
      16 => x as i16,
      _ => {
        if x >> (n - 1) > 0 {
          -1i16 << (n - 1) | (x as i16)
        } else {
          x as i16
        }
      }
    };
    Ok((input, x))
  }
}

pub fn parse_i16_bits(input: (&[u8], usize), n: usize) -> NomResult<(&[u8], usize), i16> {
  do_parse_i16_bits(n)(input)
}

/// Generates a bits parser reading an `i32` over `n` bits, sign-extending
/// from bit `n - 1`.
pub fn do_parse_i32_bits(n: usize) -> impl Fn((&[u8], usize)) -> NomResult<(&[u8], usize), i32> {
  debug_assert!(n <= 32);
  move |input: (&[u8], usize)| {
    let (input, x) = nom::bits::streaming::take::<_, u32, _, _>(n)(input)?;
    let x = match n {
      0 => 0,
      32 => x as i32,
      _ => {
        if x >> (n - 1) > 0 {
          -1i32 << (n - 1) | (x as i32)
        } else {
          x as i32
        }
      }
    };
    Ok((input, x))
  }
}

pub fn parse_i32_bits(input: (&[u8], usize), n: usize) -> NomResult<(&[u8], usize), i32> {
  do_parse_i32_bits(n)(input)
}

/// Parse the bit-encoded big-endian representation of a signed fixed-point
/// 16.16-bit number
pub fn parse_sfixed16_p16_bits(input: (&[u8], usize), n: usize) -> NomResult<(&[u8], usize), Sfixed16P16> {
  use nom::combinator::map;
  map(do_parse_i32_bits(n), Sfixed16P16::from_epsilons)(input)
}

/// Parse the bit-encoded big-endian representation of a signed fixed-point
/// 8.8-bit number
pub fn parse_sfixed8_p8_bits(input: (&[u8], usize), n: usize) -> NomResult<(&[u8], usize), Sfixed8P8> {
  use nom::combinator::map;
  map(do_parse_i16_bits(n), Sfixed8P8::from_epsilons)(input)
}

/// Parse the little-endian representation of an unsigned fixed-point 8.8-bit
/// number
pub fn parse_le_ufixed8_p8(input: &[u8]) -> NomResult<&[u8], Ufixed8P8> {
  use nom::combinator::map;
  map(parse_le_u16, Ufixed8P8::from_epsilons)(input)
}

/// Parse the little-endian representation of a signed fixed-point 8.8-bit
/// number
pub fn parse_le_sfixed8_p8(input: &[u8]) -> NomResult<&[u8], Sfixed8P8> {
  use nom::combinator::map;
  map(parse_le_i16, Sfixed8P8::from_epsilons)(input)
}

pub fn parse_rect(input: &[u8]) -> NomResult<&[u8], ast::Rect> {
  use nom::bits::bits;
  bits(parse_rect_bits)(input)
}

pub fn parse_rect_bits(input: (&[u8], usize)) -> NomResult<(&[u8], usize), ast::Rect> {
  use nom::combinator::map;

  let (input, n_bits) = map(do_parse_u16_bits(5), usize::from)(input)?;
  let (input, x_min) = parse_i32_bits(input, n_bits)?;
  let (input, x_max) = parse_i32_bits(input, n_bits)?;
  let (input, y_min) = parse_i32_bits(input, n_bits)?;
  let (input, y_max) = parse_i32_bits(input, n_bits)?;
  Ok((
    input,
    ast::Rect {
      x_min: ast::Twip(x_min),
      x_max: ast::Twip(x_max),
      y_min: ast::Twip(y_min),
      y_max: ast::Twip(y_max),
    },
  ))
}

pub fn parse_s_rgb8(input: &[u8]) -> NomResult<&[u8], ast::SRgb8> {
  let (input, r) = parse_u8(input)?;
  let (input, g) = parse_u8(input)?;
  let (input, b) = parse_u8(input)?;
  Ok((input, ast::SRgb8 { r, g, b }))
}

pub fn parse_straight_s_rgba8(input: &[u8]) -> NomResult<&[u8], ast::StraightSRgba8> {
  let (input, r) = parse_u8(input)?;
  let (input, g) = parse_u8(input)?;
  let (input, b) = parse_u8(input)?;
  let (input, a) = parse_u8(input)?;
  Ok((input, ast::StraightSRgba8 { r, g, b, a }))
}

pub fn parse_matrix(input: &[u8]) -> NomResult<&[u8], ast::Matrix> {
  use nom::bits::bits;
  bits(parse_matrix_bits)(input)
}

pub fn parse_matrix_bits(input: (&[u8], usize)) -> NomResult<(&[u8], usize), ast::Matrix> {
  let (input, has_scale) = parse_bool_bits(input)?;
  let (input, (scale_x, scale_y)) = if has_scale {
    let (input, scale_bits) = parse_u16_bits(input, 5)?;
    let (input, scale_x) = parse_sfixed16_p16_bits(input, scale_bits as usize)?;
    let (input, scale_y) = parse_sfixed16_p16_bits(input, scale_bits as usize)?;
    (input, (scale_x.to_f32(), scale_y.to_f32()))
  } else {
    (input, (1.0, 1.0))
  };
  let (input, has_rotation) = parse_bool_bits(input)?;
  let (input, (rotate_skew0, rotate_skew1)) = if has_rotation {
    let (input, skew_bits) = parse_u16_bits(input, 5)?;
    let (input, skew0) = parse_sfixed16_p16_bits(input, skew_bits as usize)?;
    let (input, skew1) = parse_sfixed16_p16_bits(input, skew_bits as usize)?;
    (input, (skew0.to_f32(), skew1.to_f32()))
  } else {
    (input, (0.0, 0.0))
  };
  let (input, translate_bits) = parse_u16_bits(input, 5)?;
  let (input, translate_x) = parse_i32_bits(input, translate_bits as usize)?;
  let (input, translate_y) = parse_i32_bits(input, translate_bits as usize)?;
  Ok((
    input,
    ast::Matrix {
      has_scale,
      scale_x,
      scale_y,
      has_rotation,
      rotate_skew0,
      rotate_skew1,
      translate_x: ast::Twip(translate_x),
      translate_y: ast::Twip(translate_y),
    },
  ))
}

/// Parses the alpha-less CXFORM record (PlaceObject v1), promoting it to a
/// `ColorTransformWithAlpha` with identity alpha terms.
pub fn parse_color_transform(input: &[u8]) -> NomResult<&[u8], ast::ColorTransformWithAlpha> {
  use nom::bits::bits;
  bits(parse_color_transform_bits)(input)
}

pub fn parse_color_transform_bits(input: (&[u8], usize)) -> NomResult<(&[u8], usize), ast::ColorTransformWithAlpha> {
  let (input, has_add) = parse_bool_bits(input)?;
  let (input, has_mult) = parse_bool_bits(input)?;
  let (input, n_bits) = parse_u16_bits(input, 4)?;
  let (input, mult) = if has_mult {
    let (input, r) = parse_sfixed8_p8_bits(input, n_bits as usize)?;
    let (input, g) = parse_sfixed8_p8_bits(input, n_bits as usize)?;
    let (input, b) = parse_sfixed8_p8_bits(input, n_bits as usize)?;
    (input, (r, g, b))
  } else {
    (input, (Sfixed8P8::ONE, Sfixed8P8::ONE, Sfixed8P8::ONE))
  };
  let (input, add) = if has_add {
    let (input, r) = parse_i16_bits(input, n_bits as usize)?;
    let (input, g) = parse_i16_bits(input, n_bits as usize)?;
    let (input, b) = parse_i16_bits(input, n_bits as usize)?;
    (input, (r, g, b))
  } else {
    (input, (0, 0, 0))
  };
  Ok((
    input,
    ast::ColorTransformWithAlpha {
      red_mult: mult.0,
      green_mult: mult.1,
      blue_mult: mult.2,
      alpha_mult: Sfixed8P8::ONE,
      red_add: add.0,
      green_add: add.1,
      blue_add: add.2,
      alpha_add: 0,
    },
  ))
}

pub fn parse_color_transform_with_alpha(input: &[u8]) -> NomResult<&[u8], ast::ColorTransformWithAlpha> {
  use nom::bits::bits;
  bits(parse_color_transform_with_alpha_bits)(input)
}

pub fn parse_color_transform_with_alpha_bits(
  input: (&[u8], usize),
) -> NomResult<(&[u8], usize), ast::ColorTransformWithAlpha> {
  let (input, has_add) = parse_bool_bits(input)?;
  let (input, has_mult) = parse_bool_bits(input)?;
  let (input, n_bits) = parse_u16_bits(input, 4)?;
  let (input, mult) = if has_mult {
    let (input, r) = parse_sfixed8_p8_bits(input, n_bits as usize)?;
    let (input, g) = parse_sfixed8_p8_bits(input, n_bits as usize)?;
    let (input, b) = parse_sfixed8_p8_bits(input, n_bits as usize)?;
    let (input, a) = parse_sfixed8_p8_bits(input, n_bits as usize)?;
    (input, (r, g, b, a))
  } else {
    (input, (Sfixed8P8::ONE, Sfixed8P8::ONE, Sfixed8P8::ONE, Sfixed8P8::ONE))
  };
  let (input, add) = if has_add {
    let (input, r) = parse_i16_bits(input, n_bits as usize)?;
    let (input, g) = parse_i16_bits(input, n_bits as usize)?;
    let (input, b) = parse_i16_bits(input, n_bits as usize)?;
    let (input, a) = parse_i16_bits(input, n_bits as usize)?;
    (input, (r, g, b, a))
  } else {
    (input, (0, 0, 0, 0))
  };
  Ok((
    input,
    ast::ColorTransformWithAlpha {
      red_mult: mult.0,
      green_mult: mult.1,
      blue_mult: mult.2,
      alpha_mult: mult.3,
      red_add: add.0,
      green_add: add.1,
      blue_add: add.2,
      alpha_add: add.3,
    },
  ))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_i16_bits() {
    {
      let input = vec![0b0000_0000, 0b0000_0000];
      assert_eq!(parse_i16_bits((&input[..], 0), 0), Ok(((&input[0..], 0), 0)));
    }
    {
      let input = vec![0b1000_0000, 0b0000_0000];
      assert_eq!(parse_i16_bits((&input[..], 0), 1), Ok(((&input[0..], 1), -1)));
    }
    {
      let input = vec![0b0100_0000, 0b0000_0000];
      assert_eq!(parse_i16_bits((&input[..], 0), 2), Ok(((&input[0..], 2), 1)));
    }
    {
      let input = vec![0b1000_0000, 0b0000_0000];
      assert_eq!(parse_i16_bits((&input[..], 0), 2), Ok(((&input[0..], 2), -2)));
    }
    {
      let input = vec![0b1100_0000, 0b0000_0000];
      assert_eq!(parse_i16_bits((&input[..], 0), 2), Ok(((&input[0..], 2), -1)));
    }
    {
      let input = vec![0b0111_1111, 0b1111_1110];
      assert_eq!(parse_i16_bits((&input[..], 0), 15), Ok(((&input[1..], 7), 16383)));
    }
    {
      let input = vec![0b1000_0000, 0b0000_0000];
      assert_eq!(parse_i16_bits((&input[..], 0), 15), Ok(((&input[1..], 7), -16384)));
    }
    {
      let input = vec![0b1111_1111, 0b1111_1111];
      assert_eq!(parse_i16_bits((&input[..], 0), 16), Ok(((&input[2..], 0), -1)));
    }
    {
      let input = vec![0b1000_0000, 0b0000_0000];
      assert_eq!(parse_i16_bits((&input[..], 0), 16), Ok(((&input[2..], 0), -32768)));
    }
  }

  #[test]
  fn test_parse_i32_bits() {
    {
      let input = vec![0b1000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000];
      assert_eq!(parse_i32_bits((&input[..], 0), 1), Ok(((&input[0..], 1), -1)));
    }
    {
      // 9-bit -200 (two's complement 1_0011_1000)
      let input = vec![0b1001_1100, 0b0000_0000];
      assert_eq!(parse_i32_bits((&input[..], 0), 9), Ok(((&input[1..], 1), -200)));
    }
    {
      let input = vec![0b0110_0100, 0b0000_0000];
      assert_eq!(parse_i32_bits((&input[..], 0), 9), Ok(((&input[1..], 1), 200)));
    }
    {
      let input = vec![0b1111_1111, 0b1111_1111, 0b1111_1111, 0b1111_1111];
      assert_eq!(parse_i32_bits((&input[..], 0), 32), Ok(((&input[4..], 0), -1)));
    }
    {
      let input = vec![0b0111_1111, 0b1111_1111, 0b1111_1111, 0b1111_1111];
      assert_eq!(parse_i32_bits((&input[..], 0), 32), Ok(((&input[4..], 0), 2147483647)));
    }
  }

  #[test]
  fn test_parse_u16_bits() {
    let input = vec![0b1010_1010, 0b1111_0000, 0b0011_0011];
    assert_eq!(parse_u16_bits((&input[..], 0), 5), Ok(((&input[0..], 5), 21)));
  }

  #[test]
  fn test_parse_bool_bits() {
    let input = vec![0b1010_0000];
    let ((rest, pos), first) = parse_bool_bits((&input[..], 0)).unwrap();
    assert!(first);
    let ((_, pos2), second) = parse_bool_bits((rest, pos)).unwrap();
    assert!(!second);
    assert_eq!(pos2, 2);
  }

  #[test]
  fn test_parse_rect() {
    {
      // 01011 00001111111 00100000100 00000001111 01000000010
      // nBits xMin        xMax        yMin        yMax
      let input = vec![
        0b0101_1000,
        0b0111_1111,
        0b0010_0000,
        0b1000_0000,
        0b0011_1101,
        0b0000_0001,
        0b0000_0000,
      ];
      assert_eq!(
        parse_rect(&input[..]),
        Ok((
          &[][..],
          ast::Rect {
            x_min: ast::Twip(127),
            x_max: ast::Twip(260),
            y_min: ast::Twip(15),
            y_max: ast::Twip(514),
          }
        ))
      );
    }
    {
      let input = vec![0b0000_0000];
      assert_eq!(parse_rect(&input[..]), Ok((&[][..], ast::Rect::default())));
    }
  }

  #[test]
  fn test_parse_matrix_identity() {
    // has_scale=0, has_rotation=0, translate_bits=00000
    let input = vec![0b0000_0000];
    assert_eq!(parse_matrix(&input[..]), Ok((&[][..], ast::Matrix::IDENTITY)));
  }

  #[test]
  fn test_parse_matrix_translate_only() {
    // 0 | 0 | 00110 | 010100 | 111100 | (padding)
    // translate_bits=6, x=20, y=-4
    let input = vec![0b0000_1100, 0b1010_0111, 0b1000_0000];
    let (_, matrix) = parse_matrix(&input[..]).unwrap();
    assert!(!matrix.has_scale);
    assert!(!matrix.has_rotation);
    assert_eq!(matrix.translate_x, ast::Twip(20));
    assert_eq!(matrix.translate_y, ast::Twip(-4));
    assert_eq!(matrix.scale_x, 1.0);
    assert_eq!(matrix.rotate_skew0, 0.0);
  }

  #[test]
  fn test_parse_c_string() {
    let input = b"name\x00rest";
    assert_eq!(parse_c_string(&input[..]), Ok((&b"rest"[..], String::from("name"))));
  }

  #[test]
  fn test_parse_le_ufixed8_p8() {
    let input = vec![0x80, 0x0c];
    let (_, rate) = parse_le_ufixed8_p8(&input[..]).unwrap();
    assert_eq!(rate.to_f32(), 12.5);
  }

  #[test]
  fn test_parse_color_transform_with_alpha_identity() {
    // has_add=0, has_mult=0, n_bits=0000
    let input = vec![0b0000_0000];
    assert_eq!(
      parse_color_transform_with_alpha(&input[..]),
      Ok((&[][..], ast::ColorTransformWithAlpha::IDENTITY))
    );
  }
}

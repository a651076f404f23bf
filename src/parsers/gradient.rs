use crate::ast;
use crate::ast::fill_styles::{ColorSpace, ColorStop, GradientSpread};
use crate::parsers::basic_data_types::{parse_s_rgb8, parse_straight_s_rgba8};
use nom::number::complete::le_u8 as parse_u8;
use nom::IResult as NomResult;

pub fn parse_color_stop(input: &[u8], with_alpha: bool) -> NomResult<&[u8], ColorStop> {
  use nom::combinator::map;

  let (input, ratio) = parse_u8(input)?;
  let (input, color) = if with_alpha {
    parse_straight_s_rgba8(input)?
  } else {
    map(parse_s_rgb8, ast::StraightSRgba8::from)(input)?
  };

  Ok((input, ColorStop { ratio, color }))
}

pub fn parse_gradient(input: &[u8], with_alpha: bool) -> NomResult<&[u8], ast::Gradient> {
  let (input, flags) = parse_u8(input)?;
  let spread_code = flags >> 6;
  let color_space_code = (flags & ((1 << 6) - 1)) >> 4;
  let color_count = flags & ((1 << 4) - 1);

  let spread = match spread_code {
    0 => GradientSpread::Pad,
    1 => GradientSpread::Reflect,
    2 => GradientSpread::Repeat,
    _ => {
      return Err(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Switch,
      )))
    }
  };

  let color_space = match color_space_code {
    0 => ColorSpace::SRgb,
    1 => ColorSpace::LinearRgb,
    _ => {
      return Err(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Switch,
      )))
    }
  };

  let (input, colors) = nom::multi::count(|i| parse_color_stop(i, with_alpha), color_count as usize)(input)?;

  Ok((
    input,
    ast::Gradient {
      spread,
      color_space,
      colors,
    },
  ))
}

use crate::ast;
use crate::ast::tags as tag_ast;
use crate::parsers::actions::parse_action_string;
use crate::parsers::basic_data_types::{parse_rect, parse_s_rgb8};
use crate::parsers::display::{
  parse_place_object, parse_place_object2, parse_remove_object, parse_remove_object2, place_object2_has_clip_actions,
};
use crate::parsers::image::parse_define_bits_lossless;
use crate::parsers::movie::SwfParseError;
use crate::parsers::shape::{parse_shape, ShapeVersion};
use nom::number::complete::{le_u16 as parse_le_u16, le_u32 as parse_le_u32, le_u8 as parse_u8};
use nom::IResult as NomResult;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct TagHeader {
  pub code: u16,
  pub length: u32,
}

/// Parses a tag record header: a 16-bit value packing a 10-bit code and a
/// 6-bit length, where a length of `0x3f` announces an extended 32-bit
/// length.
pub(crate) fn parse_tag_header(input: &[u8]) -> NomResult<&[u8], TagHeader> {
  let (input, code_and_length) = parse_le_u16(input)?;
  let code = code_and_length >> 6;
  let max_length = (1 << 6) - 1;
  let length = code_and_length & max_length;
  let (input, length) = if length < max_length {
    (input, u32::from(length))
  } else {
    debug_assert_eq!(length, max_length);
    parse_le_u32(input)?
  };

  Ok((input, TagHeader { code, length }))
}

/// The lowest SWF file version a tag code is meaningful in. Tags whose
/// minimum version exceeds the file's declared version are dropped at parse
/// time.
pub(crate) fn minimum_tag_version(code: u16) -> u8 {
  match code {
    22 => 2,          // DefineShape2
    20 => 2,          // DefineBitsLossless
    12 => 3,          // DoAction
    26 => 3,          // PlaceObject2
    28 => 3,          // RemoveObject2
    32 => 3,          // DefineShape3
    36 => 3,          // DefineBitsLossless2
    39 => 3,          // DefineSprite
    70 => 8,          // PlaceObject3
    83 => 8,          // DefineShape4
    _ => 1,
  }
}

pub(crate) enum ParsedTag {
  Tag(ast::Tag),
  Skipped,
  End,
}

/// Parses the tag at the start of `input`.
///
/// The declared length is authoritative: the tag body is cut to exactly that
/// many bytes and the remaining input starts right after it, whether or not
/// the body was understood. Unknown tag codes and version-gated tags are
/// logged and reported as `Skipped`.
pub(crate) fn parse_tag<'a>(input: &'a [u8], swf_version: u8) -> Result<(&'a [u8], ParsedTag), SwfParseError> {
  let (input, header) = parse_tag_header(input).map_err(|_| SwfParseError::Truncated)?;
  let length = header.length as usize;
  if input.len() < length {
    return Err(SwfParseError::Truncated);
  }
  let (body, input) = input.split_at(length);

  if header.code == 0 {
    return Ok((input, ParsedTag::End));
  }

  let minimum_version = minimum_tag_version(header.code);
  if minimum_version > swf_version {
    log::warn!(
      "dropping tag {}: requires SWF version {}, file declares {}",
      header.code,
      minimum_version,
      swf_version
    );
    return Ok((input, ParsedTag::Skipped));
  }

  let tag = parse_tag_body(body, header.code, swf_version)?;
  Ok((
    input,
    match tag {
      Some(tag) => ParsedTag::Tag(tag),
      None => ParsedTag::Skipped,
    },
  ))
}

fn parse_tag_body(body: &[u8], code: u16, swf_version: u8) -> Result<Option<ast::Tag>, SwfParseError> {
  match code {
    1 => Ok(Some(ast::Tag::ShowFrame)),
    2 => parse_define_shape(body, ShapeVersion::Shape1).map(Some),
    4 => map_nom(parse_place_object(body), "PlaceObject").map(|tag| Some(ast::Tag::PlaceObject(tag))),
    5 => map_nom(parse_remove_object(body), "RemoveObject").map(|tag| Some(ast::Tag::RemoveObject(tag))),
    9 => parse_set_background_color(body).map(Some),
    12 => parse_do_action(body).map(Some),
    20 => Ok(parse_define_bits_lossless(body, false)?.map(ast::Tag::DefineBitmap)),
    22 => parse_define_shape(body, ShapeVersion::Shape2).map(Some),
    26 => {
      if place_object2_has_clip_actions(body) {
        return Err(SwfParseError::UnsupportedFeature("PlaceObject2 clip actions"));
      }
      map_nom(parse_place_object2(body), "PlaceObject2").map(|tag| Some(ast::Tag::PlaceObject(tag)))
    }
    28 => map_nom(parse_remove_object2(body), "RemoveObject2").map(|tag| Some(ast::Tag::RemoveObject(tag))),
    32 => parse_define_shape(body, ShapeVersion::Shape3).map(Some),
    36 => Ok(parse_define_bits_lossless(body, true)?.map(ast::Tag::DefineBitmap)),
    39 => parse_define_sprite(body, swf_version).map(Some),
    70 => Err(SwfParseError::UnsupportedFeature("PlaceObject3")),
    83 => parse_define_shape(body, ShapeVersion::Shape4).map(Some),
    _ => {
      log::debug!("skipping unknown tag {} ({} bytes)", code, body.len());
      Ok(None)
    }
  }
}

fn map_nom<T>(result: NomResult<&[u8], T>, tag: &'static str) -> Result<T, SwfParseError> {
  match result {
    Ok((_, value)) => Ok(value),
    Err(_) => Err(SwfParseError::InvalidTagBody { tag }),
  }
}

fn parse_set_background_color(body: &[u8]) -> Result<ast::Tag, SwfParseError> {
  let color = map_nom(parse_s_rgb8(body), "SetBackgroundColor")?;
  Ok(ast::Tag::SetBackgroundColor(tag_ast::SetBackgroundColor { color }))
}

fn parse_do_action(body: &[u8]) -> Result<ast::Tag, SwfParseError> {
  let actions = map_nom(parse_action_string(body), "DoAction")?;
  Ok(ast::Tag::DoAction(tag_ast::DoAction { actions }))
}

fn parse_define_shape(body: &[u8], version: ShapeVersion) -> Result<ast::Tag, SwfParseError> {
  const TAG: &str = "DefineShape";
  let (body, id) = map_nom_in(parse_le_u16(body), TAG)?;
  let (body, bounds) = map_nom_in(parse_rect(body), TAG)?;
  let (body, edge_bounds, flags) = if version >= ShapeVersion::Shape4 {
    let (body, edge_bounds) = map_nom_in(parse_rect(body), TAG)?;
    let (body, flags) = map_nom_in(parse_u8(body), TAG)?;
    (body, Some(edge_bounds), flags)
  } else {
    (body, None, 0)
  };
  let (_, shape) = map_nom_in(parse_shape(body, version), TAG)?;

  Ok(ast::Tag::DefineShape(tag_ast::DefineShape {
    id,
    bounds,
    edge_bounds,
    has_scaling_lines: flags & (1 << 0) != 0,
    has_non_scaling_lines: flags & (1 << 1) != 0,
    has_fill_winding: flags & (1 << 2) != 0,
    shape,
  }))
}

fn parse_define_sprite(body: &[u8], swf_version: u8) -> Result<ast::Tag, SwfParseError> {
  const TAG: &str = "DefineSprite";
  let (body, id) = map_nom_in(parse_le_u16(body), TAG)?;
  let (body, frame_count) = map_nom_in(parse_le_u16(body), TAG)?;

  let mut tags: Vec<ast::Tag> = Vec::new();
  let mut input = body;
  while !input.is_empty() {
    let (next_input, parsed) = parse_tag(input, swf_version)?;
    input = next_input;
    match parsed {
      ParsedTag::Tag(tag) => tags.push(tag),
      ParsedTag::Skipped => {}
      ParsedTag::End => break,
    }
  }

  Ok(ast::Tag::DefineSprite(tag_ast::DefineSprite { id, frame_count, tags }))
}

fn map_nom_in<'a, T>(result: NomResult<&'a [u8], T>, tag: &'static str) -> Result<(&'a [u8], T), SwfParseError> {
  result.map_err(|_| SwfParseError::InvalidTagBody { tag })
}

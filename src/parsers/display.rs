use crate::ast::tags::{PlaceObject, RemoveObject};
use crate::parsers::basic_data_types::{
  parse_c_string, parse_color_transform, parse_color_transform_with_alpha, parse_matrix,
};
use nom::number::complete::{le_u16 as parse_le_u16, le_u8 as parse_u8};
use nom::IResult as NomResult;

/// Parses the PlaceObject (v1) tag body: character id, depth, matrix and an
/// optional trailing color transform.
pub fn parse_place_object(input: &[u8]) -> NomResult<&[u8], PlaceObject> {
  let (input, character_id) = parse_le_u16(input)?;
  let (input, depth) = parse_le_u16(input)?;
  let (input, matrix) = parse_matrix(input)?;
  let (input, color_transform) = if input.is_empty() {
    (input, None)
  } else {
    let (input, color_transform) = parse_color_transform(input)?;
    (input, Some(color_transform))
  };

  Ok((
    input,
    PlaceObject {
      is_move: false,
      depth,
      character_id: Some(character_id),
      matrix: Some(matrix),
      color_transform,
      ratio: None,
      name: None,
      clip_depth: None,
    },
  ))
}

/// Flag bits of the PlaceObject2 tag.
const PLACE_FLAG_MOVE: u8 = 1 << 0;
const PLACE_FLAG_HAS_CHARACTER: u8 = 1 << 1;
const PLACE_FLAG_HAS_MATRIX: u8 = 1 << 2;
const PLACE_FLAG_HAS_COLOR_TRANSFORM: u8 = 1 << 3;
const PLACE_FLAG_HAS_RATIO: u8 = 1 << 4;
const PLACE_FLAG_HAS_NAME: u8 = 1 << 5;
const PLACE_FLAG_HAS_CLIP_DEPTH: u8 = 1 << 6;
pub(crate) const PLACE_FLAG_HAS_CLIP_ACTIONS: u8 = 1 << 7;

/// Parses the PlaceObject2 tag body.
///
/// Clip actions are not supported; the caller checks the flag before calling
/// and fails the load with a typed error.
pub fn parse_place_object2(input: &[u8]) -> NomResult<&[u8], PlaceObject> {
  use nom::combinator::cond;

  let (input, flags) = parse_u8(input)?;
  let (input, depth) = parse_le_u16(input)?;
  let (input, character_id) = cond(flags & PLACE_FLAG_HAS_CHARACTER != 0, parse_le_u16)(input)?;
  let (input, matrix) = cond(flags & PLACE_FLAG_HAS_MATRIX != 0, parse_matrix)(input)?;
  let (input, color_transform) = cond(
    flags & PLACE_FLAG_HAS_COLOR_TRANSFORM != 0,
    parse_color_transform_with_alpha,
  )(input)?;
  let (input, ratio) = cond(flags & PLACE_FLAG_HAS_RATIO != 0, parse_le_u16)(input)?;
  let (input, name) = cond(flags & PLACE_FLAG_HAS_NAME != 0, parse_c_string)(input)?;
  let (input, clip_depth) = cond(flags & PLACE_FLAG_HAS_CLIP_DEPTH != 0, parse_le_u16)(input)?;

  Ok((
    input,
    PlaceObject {
      is_move: flags & PLACE_FLAG_MOVE != 0,
      depth,
      character_id,
      matrix,
      color_transform,
      ratio,
      name,
      clip_depth,
    },
  ))
}

pub(crate) fn place_object2_has_clip_actions(input: &[u8]) -> bool {
  input.first().map_or(false, |flags| flags & PLACE_FLAG_HAS_CLIP_ACTIONS != 0)
}

/// Parses the RemoveObject (v1) tag body: character id then depth.
pub fn parse_remove_object(input: &[u8]) -> NomResult<&[u8], RemoveObject> {
  let (input, character_id) = parse_le_u16(input)?;
  let (input, depth) = parse_le_u16(input)?;

  Ok((
    input,
    RemoveObject {
      depth,
      character_id: Some(character_id),
    },
  ))
}

/// Parses the RemoveObject2 tag body: depth only.
pub fn parse_remove_object2(input: &[u8]) -> NomResult<&[u8], RemoveObject> {
  let (input, depth) = parse_le_u16(input)?;

  Ok((
    input,
    RemoveObject {
      depth,
      character_id: None,
    },
  ))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ast::{Matrix, Twip};

  #[test]
  fn test_parse_place_object2_add() {
    // flags: has_character | has_matrix, depth 1, id 1, identity matrix
    let input = vec![0x06, 0x01, 0x00, 0x01, 0x00, 0x00];
    let (rest, place) = parse_place_object2(&input[..]).unwrap();
    assert!(rest.is_empty());
    assert!(!place.is_move);
    assert_eq!(place.depth, 1);
    assert_eq!(place.character_id, Some(1));
    assert_eq!(place.matrix, Some(Matrix::IDENTITY));
    assert!(place.color_transform.is_none());
    assert!(place.name.is_none());
  }

  #[test]
  fn test_parse_place_object2_move_matrix_only() {
    // flags: move | has_matrix, depth 3, matrix translate (20, -4)
    let input = vec![0x05, 0x03, 0x00, 0b0000_1100, 0b1010_0111, 0b1000_0000];
    let (_, place) = parse_place_object2(&input[..]).unwrap();
    assert!(place.is_move);
    assert_eq!(place.depth, 3);
    assert!(place.character_id.is_none());
    let matrix = place.matrix.unwrap();
    assert_eq!(matrix.translate_x, Twip(20));
    assert_eq!(matrix.translate_y, Twip(-4));
  }

  #[test]
  fn test_parse_place_object2_name() {
    // flags: has_character | has_name, depth 2, id 9, name "clip"
    let input = vec![0x22, 0x02, 0x00, 0x09, 0x00, b'c', b'l', b'i', b'p', 0x00];
    let (_, place) = parse_place_object2(&input[..]).unwrap();
    assert_eq!(place.character_id, Some(9));
    assert_eq!(place.name.as_deref(), Some("clip"));
  }

  #[test]
  fn test_parse_remove_object() {
    let input = vec![0x07, 0x00, 0x02, 0x00];
    let (_, remove) = parse_remove_object(&input[..]).unwrap();
    assert_eq!(remove.character_id, Some(7));
    assert_eq!(remove.depth, 2);
  }

  #[test]
  fn test_parse_remove_object2() {
    let input = vec![0x05, 0x00];
    let (_, remove) = parse_remove_object2(&input[..]).unwrap();
    assert_eq!(remove.character_id, None);
    assert_eq!(remove.depth, 5);
  }
}

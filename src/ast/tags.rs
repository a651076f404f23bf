use crate::ast::actions::Action;
use crate::ast::shape_records::Shape;
use crate::ast::{ColorTransformWithAlpha, Matrix, Rect, SRgb8};

/// One parsed tag. Tags are owned by the `Movie` or, for nested timelines,
/// by a `DefineSprite`.
///
/// The `End` marker terminates tag lists at parse time and is not
/// represented; unknown and version-gated tags are dropped during parsing.
#[derive(Clone, Debug, PartialEq)]
pub enum Tag {
  SetBackgroundColor(SetBackgroundColor),
  DefineShape(DefineShape),
  DefineBitmap(DefineBitmap),
  DefineSprite(DefineSprite),
  PlaceObject(PlaceObject),
  RemoveObject(RemoveObject),
  DoAction(DoAction),
  ShowFrame,
}

impl Tag {
  /// The character id introduced by this tag, if it is a definition tag.
  pub fn character_id(&self) -> Option<u16> {
    match self {
      Tag::DefineShape(tag) => Some(tag.id),
      Tag::DefineBitmap(tag) => Some(tag.id),
      Tag::DefineSprite(tag) => Some(tag.id),
      _ => None,
    }
  }

  /// Whether executing this tag mutates a display list.
  pub fn affects_display_list(&self) -> bool {
    matches!(self, Tag::PlaceObject(_) | Tag::RemoveObject(_))
  }

  /// Whether this tag belongs in a frame's effector list when partitioning
  /// a timeline.
  pub fn is_control(&self) -> bool {
    matches!(
      self,
      Tag::PlaceObject(_) | Tag::RemoveObject(_) | Tag::SetBackgroundColor(_)
    )
  }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SetBackgroundColor {
  pub color: SRgb8,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DefineShape {
  pub id: u16,
  pub bounds: Rect,
  /// DefineShape4 only.
  pub edge_bounds: Option<Rect>,
  pub has_fill_winding: bool,
  pub has_non_scaling_lines: bool,
  pub has_scaling_lines: bool,
  pub shape: Shape,
}

/// A lossless bitmap character, already inflated and normalized to straight
/// RGBA bytes in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DefineBitmap {
  pub id: u16,
  pub width: u16,
  pub height: u16,
  pub data: Vec<u8>,
}

/// A sprite: a nested timeline defined by its own tag list.
#[derive(Clone, Debug, PartialEq)]
pub struct DefineSprite {
  pub id: u16,
  pub frame_count: u16,
  pub tags: Vec<Tag>,
}

/// PlaceObject/PlaceObject2. `is_move` distinguishes updating the entry at
/// `depth` from pushing a new one.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaceObject {
  pub is_move: bool,
  pub depth: u16,
  pub character_id: Option<u16>,
  pub matrix: Option<Matrix>,
  pub color_transform: Option<ColorTransformWithAlpha>,
  pub ratio: Option<u16>,
  pub name: Option<String>,
  pub clip_depth: Option<u16>,
}

/// RemoveObject/RemoveObject2. `character_id` is only present in the v1 tag
/// and is verified (softly) against the entry at `depth`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RemoveObject {
  pub depth: u16,
  pub character_id: Option<u16>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DoAction {
  pub actions: Vec<Action>,
}

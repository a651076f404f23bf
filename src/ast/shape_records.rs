use crate::ast::fill_styles::{FillStyle, LineStyle};
use crate::ast::Point;

/// The style arrays a run of shape records draws against.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShapeStyles {
  pub fill: Vec<FillStyle>,
  pub line: Vec<LineStyle>,
}

/// A decoded SHAPEWITHSTYLE: the initial style arrays and the record stream.
/// The end marker is consumed at parse time and not represented.
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
  pub initial_styles: ShapeStyles,
  pub records: Vec<ShapeRecord>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ShapeRecord {
  Edge(Edge),
  StyleChange(StyleChange),
}

/// A single edge, straight or quadratic.
///
/// `delta` is the displacement from the current position to the edge's end
/// point. For curved edges, `control_delta` is the displacement to the
/// control point (so the anchor delta of the wire format is
/// `delta - control_delta`).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Edge {
  pub delta: Point,
  pub control_delta: Option<Point>,
}

/// A non-edge record: select styles, move the pen, or swap in new style
/// arrays. Style indices are kept raw: `0` means "no style", `n > 0` is a
/// 1-based index into the active style array.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleChange {
  pub move_to: Option<Point>,
  pub left_fill: Option<usize>,
  pub right_fill: Option<usize>,
  pub line_style: Option<usize>,
  pub new_styles: Option<ShapeStyles>,
}

//! The externally implemented rendering capabilities the engine draws
//! through. The engine never touches pixels itself: shapes are rasterized
//! once into backend surfaces at load time and placed per frame with a
//! transform.

use crate::ast::fill_styles::{FillStyle, LineStyle};
use crate::ast::{Matrix, Point, Rect, SRgb8};

/// A path-accumulating drawing context for rasterizing one shape.
///
/// The engine guarantees `flush` is called before every style change and at
/// the end of each figure's fill and stroke pass, and that `move_to`
/// precedes the first segment of every disjoint sub-path. Coordinates are in
/// twips; implementations convert to pixels at draw time.
///
/// `set_fill(None)`/`set_stroke(None)` select a fully transparent style:
/// such runs must still be committed, since hole regions are punched by
/// compositing them against previously flushed geometry. A bitmap fill
/// references a bitmap character id previously passed to
/// `RenderBackend::register_image`; implementations resolve it against their
/// own registrations and fall back to a visibly distinct placeholder when it
/// is missing.
pub trait RasterContext {
  fn set_fill(&mut self, style: Option<&FillStyle>);
  fn set_stroke(&mut self, style: Option<&LineStyle>);
  fn move_to(&mut self, point: Point);
  fn line_to(&mut self, point: Point);
  fn curve_to(&mut self, control: Point, anchor: Point);
  /// Commits the accumulated path with the current fill or stroke.
  fn flush(&mut self);
}

/// A renderer backend: owns the stage, registered images and rasterized
/// shape surfaces. Driven synchronously from the host's per-display-refresh
/// callback.
pub trait RenderBackend {
  /// An opaque handle to a registered image.
  type Image;
  /// An opaque handle to a rasterized shape surface.
  type Shape;
  /// The drawing context used between `begin_shape` and `end_shape`.
  type Raster: RasterContext;

  fn set_stage_size(&mut self, rect: &Rect);
  fn set_background_color(&mut self, color: SRgb8);

  /// Registers straight RGBA pixels for a bitmap character.
  fn register_image(&mut self, id: u16, width: u16, height: u16, rgba: &[u8]) -> Self::Image;

  /// Starts rasterizing the shape character `id` covering `bounds`.
  fn begin_shape(&mut self, id: u16, bounds: &Rect) -> Self::Raster;

  /// Finishes rasterization and returns the shape's surface handle.
  fn end_shape(&mut self, id: u16, raster: Self::Raster) -> Self::Shape;

  /// Paints a previously rasterized shape at a transform. Support for
  /// non-uniform scale or rotation is backend-dependent.
  fn place_shape(&mut self, shape: &Self::Shape, matrix: &Matrix);
}

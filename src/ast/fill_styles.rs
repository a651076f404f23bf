use crate::ast::{Matrix, Sfixed8P8, StraightSRgba8, Ufixed8P8};

#[derive(Clone, Debug, PartialEq)]
pub enum FillStyle {
  Solid(Solid),
  LinearGradient(LinearGradient),
  RadialGradient(RadialGradient),
  FocalGradient(FocalGradient),
  Bitmap(Bitmap),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Solid {
  pub color: StraightSRgba8,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LinearGradient {
  pub matrix: Matrix,
  pub gradient: Gradient,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RadialGradient {
  pub matrix: Matrix,
  pub gradient: Gradient,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FocalGradient {
  pub matrix: Matrix,
  pub gradient: Gradient,
  pub focal_point: Sfixed8P8,
}

/// A bitmap fill referencing a previously defined bitmap character.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bitmap {
  pub bitmap_id: u16,
  pub matrix: Matrix,
  pub repeating: bool,
  pub smoothed: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GradientSpread {
  Pad,
  Reflect,
  Repeat,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ColorSpace {
  SRgb,
  LinearRgb,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ColorStop {
  pub ratio: u8,
  pub color: StraightSRgba8,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gradient {
  pub spread: GradientSpread,
  pub color_space: ColorSpace,
  pub colors: Vec<ColorStop>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CapStyle {
  Round,
  None,
  Square,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum JoinStyle {
  Round,
  Bevel,
  Miter(MiterJoin),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MiterJoin {
  pub limit: Ufixed8P8,
}

/// A stroke style. The LINESTYLE record of DefineShape 1-3 maps onto this
/// with the extended fields at their defaults; DefineShape4 fills them from
/// the LINESTYLE2 record.
#[derive(Clone, Debug, PartialEq)]
pub struct LineStyle {
  pub width: u16,
  pub start_cap: CapStyle,
  pub end_cap: CapStyle,
  pub join: JoinStyle,
  pub no_h_scale: bool,
  pub no_v_scale: bool,
  pub no_close: bool,
  pub pixel_hinting: bool,
  pub fill: FillStyle,
}

impl LineStyle {
  /// The simple width+color stroke of DefineShape 1-3.
  pub fn solid(width: u16, color: StraightSRgba8) -> Self {
    LineStyle {
      width,
      start_cap: CapStyle::Round,
      end_cap: CapStyle::Round,
      join: JoinStyle::Round,
      no_h_scale: false,
      no_v_scale: false,
      no_close: false,
      pixel_hinting: false,
      fill: FillStyle::Solid(Solid { color }),
    }
  }
}

use std::ops::{Add, Sub};

pub mod actions;
pub mod fill_styles;
pub mod fixed;
pub mod shape_records;
pub mod tags;

pub use actions::Action;
pub use fill_styles::{FillStyle, Gradient, LineStyle};
pub use fixed::{Sfixed16P16, Sfixed8P8, Ufixed8P8};
pub use shape_records::{Shape, ShapeRecord, ShapeStyles};
pub use tags::Tag;

/// A distance expressed in twips (twentieths of a logical pixel), the native
/// SWF coordinate unit.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Twip(pub i32);

impl Twip {
  pub const ZERO: Self = Twip(0);

  /// Converts this distance to logical pixels (20 twips per pixel).
  pub fn to_px(self) -> f32 {
    self.0 as f32 / 20.0
  }
}

impl Add for Twip {
  type Output = Twip;

  fn add(self, other: Twip) -> Twip {
    Twip(self.0 + other.0)
  }
}

impl Sub for Twip {
  type Output = Twip;

  fn sub(self, other: Twip) -> Twip {
    Twip(self.0 - other.0)
  }
}

/// An XY twip pair, used both for absolute positions and deltas.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
  pub x: Twip,
  pub y: Twip,
}

impl Point {
  pub const ORIGIN: Self = Point {
    x: Twip::ZERO,
    y: Twip::ZERO,
  };

  pub const fn new(x: i32, y: i32) -> Self {
    Point {
      x: Twip(x),
      y: Twip(y),
    }
  }
}

impl Add for Point {
  type Output = Point;

  fn add(self, other: Point) -> Point {
    Point {
      x: self.x + other.x,
      y: self.y + other.y,
    }
  }
}

impl Sub for Point {
  type Output = Point;

  fn sub(self, other: Point) -> Point {
    Point {
      x: self.x - other.x,
      y: self.y - other.y,
    }
  }
}

/// An axis-aligned rectangle in twips.
///
/// The format does not enforce `x_min <= x_max` or `y_min <= y_max`, but
/// consumers assume it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Rect {
  pub x_min: Twip,
  pub x_max: Twip,
  pub y_min: Twip,
  pub y_max: Twip,
}

/// A 2x3 affine transform as stored in the MATRIX record.
///
/// `has_scale` and `has_rotation` track whether the corresponding pair was
/// explicitly present in the stream, as opposed to defaulted.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Matrix {
  pub has_scale: bool,
  pub scale_x: f32,
  pub scale_y: f32,
  pub has_rotation: bool,
  pub rotate_skew0: f32,
  pub rotate_skew1: f32,
  pub translate_x: Twip,
  pub translate_y: Twip,
}

impl Matrix {
  pub const IDENTITY: Self = Matrix {
    has_scale: false,
    scale_x: 1.0,
    scale_y: 1.0,
    has_rotation: false,
    rotate_skew0: 0.0,
    rotate_skew1: 0.0,
    translate_x: Twip::ZERO,
    translate_y: Twip::ZERO,
  };

  /// Combines two matrices componentwise: translation and skew terms add,
  /// scale terms multiply, presence flags OR.
  ///
  /// This is not full affine composition; it only matches for the restricted
  /// transform shapes SWF authoring tools emit (no interaction between the
  /// skew and scale terms is modeled).
  pub fn combine(&self, other: &Matrix) -> Matrix {
    Matrix {
      has_scale: self.has_scale || other.has_scale,
      scale_x: self.scale_x * other.scale_x,
      scale_y: self.scale_y * other.scale_y,
      has_rotation: self.has_rotation || other.has_rotation,
      rotate_skew0: self.rotate_skew0 + other.rotate_skew0,
      rotate_skew1: self.rotate_skew1 + other.rotate_skew1,
      translate_x: self.translate_x + other.translate_x,
      translate_y: self.translate_y + other.translate_y,
    }
  }
}

impl Default for Matrix {
  fn default() -> Self {
    Matrix::IDENTITY
  }
}

/// An opaque 24-bit sRGB color (RGB record).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SRgb8 {
  pub r: u8,
  pub g: u8,
  pub b: u8,
}

/// A straight (non-premultiplied) 32-bit sRGB color with alpha (RGBA record).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StraightSRgba8 {
  pub r: u8,
  pub g: u8,
  pub b: u8,
  pub a: u8,
}

impl From<SRgb8> for StraightSRgba8 {
  fn from(color: SRgb8) -> Self {
    StraightSRgba8 {
      r: color.r,
      g: color.g,
      b: color.b,
      a: 255,
    }
  }
}

/// The CXFORMWITHALPHA record: a per-channel 8.8 fixed-point multiply
/// followed by a signed add, clamped to `[0, 255]`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ColorTransformWithAlpha {
  pub red_mult: Sfixed8P8,
  pub green_mult: Sfixed8P8,
  pub blue_mult: Sfixed8P8,
  pub alpha_mult: Sfixed8P8,
  pub red_add: i16,
  pub green_add: i16,
  pub blue_add: i16,
  pub alpha_add: i16,
}

impl ColorTransformWithAlpha {
  pub const IDENTITY: Self = ColorTransformWithAlpha {
    red_mult: Sfixed8P8::ONE,
    green_mult: Sfixed8P8::ONE,
    blue_mult: Sfixed8P8::ONE,
    alpha_mult: Sfixed8P8::ONE,
    red_add: 0,
    green_add: 0,
    blue_add: 0,
    alpha_add: 0,
  };

  pub fn transform(&self, color: StraightSRgba8) -> StraightSRgba8 {
    fn channel(value: u8, mult: Sfixed8P8, add: i16) -> u8 {
      let multiplied = (i32::from(value) * i32::from(mult.epsilons())) / 256;
      (multiplied + i32::from(add)).clamp(0, 255) as u8
    }

    StraightSRgba8 {
      r: channel(color.r, self.red_mult, self.red_add),
      g: channel(color.g, self.green_mult, self.green_add),
      b: channel(color.b, self.blue_mult, self.blue_add),
      a: channel(color.a, self.alpha_mult, self.alpha_add),
    }
  }
}

impl Default for ColorTransformWithAlpha {
  fn default() -> Self {
    ColorTransformWithAlpha::IDENTITY
  }
}

/// How the payload following the first 8 bytes of the file is compressed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CompressionMethod {
  /// `FWS`: no compression.
  None,
  /// `CWS`: zlib-compressed payload.
  Deflate,
  /// `ZWS`: LZMA-compressed payload.
  Lzma,
}

/// The first 8 bytes of the file: magic, version and uncompressed length.
/// These are never compressed, even in `CWS`/`ZWS` files.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SwfSignature {
  pub compression_method: CompressionMethod,
  pub swf_version: u8,
  pub uncompressed_file_length: u32,
}

/// Header fields following the signature (stage rect, frame rate and count).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Header {
  pub swf_version: u8,
  pub frame_size: Rect,
  pub frame_rate: Ufixed8P8,
  pub frame_count: u16,
}

/// A fully parsed movie: header-derived metadata plus the ordered tag
/// sequence. Tags are only added during parsing.
#[derive(Clone, Debug, PartialEq)]
pub struct Movie {
  pub header: Header,
  pub tags: Vec<Tag>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_matrix_combine_identity() {
    let m = Matrix {
      has_scale: true,
      scale_x: 2.0,
      scale_y: 0.5,
      has_rotation: true,
      rotate_skew0: 0.25,
      rotate_skew1: -0.25,
      translate_x: Twip(100),
      translate_y: Twip(-40),
    };
    assert_eq!(Matrix::IDENTITY.combine(&m), m);
    assert_eq!(m.combine(&Matrix::IDENTITY), m);
  }

  #[test]
  fn test_matrix_combine_translations_add() {
    let a = Matrix {
      translate_x: Twip(20),
      translate_y: Twip(40),
      ..Matrix::IDENTITY
    };
    let b = Matrix {
      translate_x: Twip(-5),
      translate_y: Twip(10),
      ..Matrix::IDENTITY
    };
    let c = a.combine(&b);
    assert_eq!(c.translate_x, Twip(15));
    assert_eq!(c.translate_y, Twip(50));
    assert!(!c.has_scale);
    assert!(!c.has_rotation);
  }

  #[test]
  fn test_color_transform_clamps() {
    let brighten = ColorTransformWithAlpha {
      red_add: 300,
      blue_add: -300,
      ..ColorTransformWithAlpha::IDENTITY
    };
    let out = brighten.transform(StraightSRgba8 {
      r: 10,
      g: 10,
      b: 10,
      a: 255,
    });
    assert_eq!(out.r, 255);
    assert_eq!(out.g, 10);
    assert_eq!(out.b, 0);
    assert_eq!(out.a, 255);
  }

  #[test]
  fn test_color_transform_half_mult() {
    let dim = ColorTransformWithAlpha {
      red_mult: Sfixed8P8::from_epsilons(128),
      green_mult: Sfixed8P8::from_epsilons(128),
      blue_mult: Sfixed8P8::from_epsilons(128),
      ..ColorTransformWithAlpha::IDENTITY
    };
    let out = dim.transform(StraightSRgba8 {
      r: 200,
      g: 100,
      b: 50,
      a: 255,
    });
    assert_eq!((out.r, out.g, out.b, out.a), (100, 50, 25, 255));
  }

  #[test]
  fn test_twip_to_px() {
    assert_eq!(Twip(20).to_px(), 1.0);
    assert_eq!(Twip(-10).to_px(), -0.5);
  }
}

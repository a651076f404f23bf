//! Fixed-point numbers as used by the SWF format: a raw integer count of
//! "epsilons" (units of `2^-frac_bits`).

use std::fmt;

macro_rules! fixed_point_impl {
  ($name:ident, $epsilons:ty, $frac_bits:expr) => {
    #[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
    pub struct $name {
      epsilons: $epsilons,
    }

    impl $name {
      pub const ZERO: Self = Self { epsilons: 0 };
      pub const ONE: Self = Self {
        epsilons: 1 << $frac_bits,
      };

      pub const fn from_epsilons(epsilons: $epsilons) -> Self {
        Self { epsilons }
      }

      pub const fn epsilons(self) -> $epsilons {
        self.epsilons
      }

      pub fn to_f32(self) -> f32 {
        self.epsilons as f32 / (1u32 << $frac_bits) as f32
      }
    }

    impl fmt::Debug for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, concat!(stringify!($name), "({})"), self.to_f32())
      }
    }
  };
}

fixed_point_impl!(Sfixed8P8, i16, 8);
fixed_point_impl!(Sfixed16P16, i32, 16);
fixed_point_impl!(Ufixed8P8, u16, 8);

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_one() {
    assert_eq!(Sfixed16P16::ONE, Sfixed16P16::from_epsilons(65536));
    assert_eq!(Ufixed8P8::ONE, Ufixed8P8::from_epsilons(256));
    assert_eq!(Sfixed8P8::ONE.to_f32(), 1.0);
  }

  #[test]
  fn test_to_f32() {
    assert_eq!(Sfixed16P16::from_epsilons(1 << 15).to_f32(), 0.5);
    assert_eq!(Sfixed16P16::from_epsilons(-(1 << 16)).to_f32(), -1.0);
    assert_eq!(Ufixed8P8::from_epsilons(0x0c00).to_f32(), 12.0);
    assert_eq!(Ufixed8P8::from_epsilons(0x0c80).to_f32(), 12.5);
  }
}

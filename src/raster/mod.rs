pub(crate) mod builder;
pub(crate) mod command;
pub(crate) mod figure;

pub use builder::PathBuilder;
pub use command::{DrawCommand, EdgePath};
pub use figure::{Figure, StyleSelection};

use thiserror::Error;

/// A fatal condition while rebuilding shape geometry.
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
pub enum RasterError {
  /// A style change started a new shape group without declaring the style
  /// arrays the group draws against.
  #[error("shape record stream starts a new group without new styles")]
  MissingGroupStyles,
}

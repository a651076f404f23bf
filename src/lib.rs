//! A playback engine for the legacy SWF (Flash) format: parses the
//! compressed, bit-packed, tag-based container into a document model,
//! reconstructs vector shape geometry from delta-encoded edge records, and
//! drives a frame-based timeline over a depth-ordered display list,
//! delegating painting to a pluggable renderer backend.

pub mod ast;
pub mod backend;
pub mod display;
pub mod parsers {
  pub mod actions;
  pub mod basic_data_types;
  pub mod display;
  pub mod gradient;
  pub(crate) mod image;
  pub mod movie;
  pub mod shape;
  pub(crate) mod tags;
}
pub mod player;
pub mod raster;
pub mod timeline;

pub use backend::{RasterContext, RenderBackend};
pub use parsers::movie::{parse_movie, SwfParseError};
pub use player::{Character, Player, PlayerError, Sprite};
pub use raster::{PathBuilder, RasterError};
pub use timeline::Timeline;

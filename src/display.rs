//! The display list: the depth-ordered set of currently placed character
//! instances for one timeline, and the PlaceObject/RemoveObject effects
//! that mutate it.

use crate::ast::tags::{PlaceObject, RemoveObject};
use crate::ast::Matrix;

/// One placed character instance.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayObject {
  pub character_id: u16,
  pub depth: u16,
  pub matrix: Matrix,
}

/// The entries of a timeline's display list, kept sorted by ascending depth
/// (the draw order). Depth is a unique but not necessarily contiguous key.
#[derive(Clone, Debug, Default)]
pub struct DisplayList {
  entries: Vec<DisplayObject>,
}

impl DisplayList {
  pub fn new() -> DisplayList {
    DisplayList { entries: Vec::new() }
  }

  pub fn entries(&self) -> &[DisplayObject] {
    &self.entries
  }

  pub fn push(&mut self, object: DisplayObject) {
    self.entries.push(object);
    self.entries.sort_by_key(|entry| entry.depth);
  }

  pub fn clear(&mut self) {
    self.entries.clear();
  }

  pub fn get_at_depth(&self, depth: u16) -> Option<&DisplayObject> {
    self.entries.iter().find(|entry| entry.depth == depth)
  }

  fn get_at_depth_mut(&mut self, depth: u16) -> Option<&mut DisplayObject> {
    self.entries.iter_mut().find(|entry| entry.depth == depth)
  }

  pub fn remove_at_depth(&mut self, depth: u16) -> Option<DisplayObject> {
    let idx = self.entries.iter().position(|entry| entry.depth == depth)?;
    Some(self.entries.remove(idx))
  }

  /// Applies a PlaceObject effect:
  /// - character without move: push a new entry at the tag's depth;
  /// - character with move: swap the character at that depth, keeping the
  ///   matrix unless the tag supplies one;
  /// - move without character: update the matrix of the existing entry.
  ///
  /// A move targeting an empty depth is logged and ignored.
  pub fn place(&mut self, tag: &PlaceObject) {
    match (tag.character_id, tag.is_move) {
      (Some(character_id), false) => {
        self.push(DisplayObject {
          character_id,
          depth: tag.depth,
          matrix: tag.matrix.unwrap_or(Matrix::IDENTITY),
        });
      }
      (Some(character_id), true) => match self.get_at_depth_mut(tag.depth) {
        Some(entry) => {
          entry.character_id = character_id;
          if let Some(matrix) = tag.matrix {
            entry.matrix = matrix;
          }
        }
        None => log::warn!("PlaceObject move: no entry at depth {}", tag.depth),
      },
      (None, true) => match self.get_at_depth_mut(tag.depth) {
        Some(entry) => {
          if let Some(matrix) = tag.matrix {
            entry.matrix = matrix;
          }
        }
        None => log::warn!("PlaceObject move: no entry at depth {}", tag.depth),
      },
      (None, false) => log::warn!("PlaceObject with neither character nor move at depth {}", tag.depth),
    }
  }

  /// Applies a RemoveObject effect. A character-id mismatch (v1 tag) is
  /// logged and the entry removed anyway.
  pub fn remove(&mut self, tag: &RemoveObject) {
    if let (Some(expected), Some(entry)) = (tag.character_id, self.get_at_depth(tag.depth)) {
      if entry.character_id != expected {
        log::warn!(
          "RemoveObject at depth {}: expected character {}, found {}",
          tag.depth,
          expected,
          entry.character_id
        );
      }
    }
    if self.remove_at_depth(tag.depth).is_none() {
      log::warn!("RemoveObject: no entry at depth {}", tag.depth);
    }
  }
}

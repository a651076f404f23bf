use crate::ast::fill_styles::{FillStyle, LineStyle};
use crate::ast::Point;
use crate::raster::command::{DrawCommand, EdgePath};
use std::collections::{BTreeMap, HashMap};

/// The style indices currently selected while walking a record stream,
/// already rebased to zero (`None` = index 0 in the wire format, "no
/// style").
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StyleSelection {
  pub fill0: Option<usize>,
  pub fill1: Option<usize>,
  pub line: Option<usize>,
}

/// One stylistic grouping of a shape: per-fill-style and per-line-style edge
/// buckets sharing a pair of style arrays.
#[derive(Clone, Debug)]
pub struct Figure {
  pub fill_styles: Vec<FillStyle>,
  pub line_styles: Vec<LineStyle>,
  fill_paths: BTreeMap<usize, EdgePath>,
  line_paths: BTreeMap<usize, EdgePath>,
}

impl Figure {
  pub fn new(fill_styles: Vec<FillStyle>, line_styles: Vec<LineStyle>) -> Figure {
    Figure {
      fill_styles,
      line_styles,
      fill_paths: BTreeMap::new(),
      line_paths: BTreeMap::new(),
    }
  }

  /// Merges a sub-path into the buckets of every style it is drawn with.
  ///
  /// The left fill is treated as a right fill walked backward: the sub-path
  /// is reversed and its fill index rewritten before merging. The right fill
  /// and the line style take the path verbatim.
  pub fn add_path(&mut self, path: &EdgePath, selection: &StyleSelection) {
    if path.is_empty() {
      return;
    }

    if let Some(fill0) = selection.fill0 {
      let bucket = self.fill_paths.entry(fill0).or_default();
      for command in path.reversed(Some(fill0)) {
        bucket.push(command);
      }
    }

    if let Some(fill1) = selection.fill1 {
      self.fill_paths.entry(fill1).or_default().merge(path);
    }

    if let Some(line) = selection.line {
      self.line_paths.entry(line).or_default().merge(path);
    }
  }

  /// Reassembles each style bucket's fragmented edge list into maximal
  /// contiguous runs (see `stitch`).
  pub fn clean(&mut self) {
    for path in self.fill_paths.values_mut() {
      stitch(path);
    }
    for path in self.line_paths.values_mut() {
      stitch(path);
    }
  }

  /// All fill buckets concatenated in ascending style-index order.
  pub fn flatten_fills(&self) -> EdgePath {
    let mut result = EdgePath::new();
    for path in self.fill_paths.values() {
      result.merge(path);
    }
    result
  }

  /// All line buckets concatenated in ascending style-index order.
  pub fn flatten_lines(&self) -> EdgePath {
    let mut result = EdgePath::new();
    for path in self.line_paths.values() {
      result.merge(path);
    }
    result
  }

  #[cfg(test)]
  pub(crate) fn fill_path(&self, style: usize) -> Option<&EdgePath> {
    self.fill_paths.get(&style)
  }
}

/// Reorders a bucket's commands into directionally consistent chains.
///
/// The format stores edges in arbitrary, interleaved order and with
/// inconsistent winding. This walks the commands greedily: after each taken
/// command, it looks for one starting at the reached point; failing that,
/// one *ending* there is reversed in place so the walk can continue; failing
/// both, the chain is broken and a fresh run starts. Adjacency is exact twip
/// coordinate equality, as in the format itself.
fn stitch(path: &mut EdgePath) {
  if path.commands.is_empty() {
    return;
  }

  let mut pending = std::mem::take(&mut path.commands);
  let mut starts_at: HashMap<Point, Vec<DrawCommand>> = HashMap::new();
  let mut ends_at: HashMap<Point, Vec<DrawCommand>> = HashMap::new();
  for command in &pending {
    starts_at.entry(command.from).or_default().push(*command);
    ends_at.entry(command.to).or_default().push(*command);
  }

  let mut result: Vec<DrawCommand> = Vec::with_capacity(pending.len());
  let mut last: Option<DrawCommand> = None;

  while !pending.is_empty() {
    let mut idx = 0;
    while idx < pending.len() {
      if let Some(prev) = last {
        if prev.to != pending[idx].from {
          if let Some(next) = first_at(&starts_at, prev.to) {
            match pending.iter().position(|c| *c == next) {
              Some(found) => idx = found,
              None => {
                idx = 0;
                last = None;
              }
            }
          } else if let Some(tail) = first_at(&ends_at, prev.to) {
            match pending.iter().position(|c| *c == tail) {
              Some(found) => {
                let flipped = tail.reverse(tail.fill_style);
                remove_at(&mut starts_at, tail.from, &tail);
                remove_at(&mut ends_at, tail.to, &tail);
                starts_at.entry(flipped.from).or_default().push(flipped);
                ends_at.entry(flipped.to).or_default().push(flipped);
                pending[found] = flipped;
                idx = found;
              }
              None => {
                idx = 0;
                last = None;
              }
            }
          } else {
            idx = 0;
            last = None;
          }
          continue;
        }
      }

      let current = pending.remove(idx);
      remove_at(&mut starts_at, current.from, &current);
      remove_at(&mut ends_at, current.to, &current);
      result.push(current);
      last = Some(current);
    }
  }

  path.commands = result;
}

fn first_at(map: &HashMap<Point, Vec<DrawCommand>>, key: Point) -> Option<DrawCommand> {
  map.get(&key).and_then(|commands| commands.first()).copied()
}

fn remove_at(map: &mut HashMap<Point, Vec<DrawCommand>>, key: Point, command: &DrawCommand) {
  if let Some(commands) = map.get_mut(&key) {
    if let Some(idx) = commands.iter().position(|c| c == command) {
      commands.remove(idx);
    }
    if commands.is_empty() {
      map.remove(&key);
    }
  }
}

use crate::ast::Point;

/// One decoded edge, ready for rasterization: absolute endpoints plus the
/// style indices it is drawn with. Indices are zero-based into the owning
/// figure's style arrays; `None` means "no style".
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DrawCommand {
  pub from: Point,
  pub control: Option<Point>,
  pub to: Point,
  pub fill_style: Option<usize>,
  pub line_style: Option<usize>,
}

impl DrawCommand {
  pub fn is_straight(&self) -> bool {
    self.control.is_none()
  }

  /// Swaps `from` and `to` and reassigns the fill index. Used to turn a
  /// left-fill edge into an equivalent right-fill edge walked the opposite
  /// direction, and during stitching to flip a chain fragment in place.
  pub fn reverse(&self, fill_style: Option<usize>) -> DrawCommand {
    DrawCommand {
      from: self.to,
      control: self.control,
      to: self.from,
      fill_style,
      line_style: self.line_style,
    }
  }
}

/// An ordered sequence of draw commands.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EdgePath {
  pub commands: Vec<DrawCommand>,
}

impl EdgePath {
  pub fn new() -> EdgePath {
    EdgePath { commands: Vec::new() }
  }

  pub fn from_commands(commands: Vec<DrawCommand>) -> EdgePath {
    EdgePath { commands }
  }

  pub fn push(&mut self, command: DrawCommand) {
    self.commands.push(command);
  }

  pub fn merge(&mut self, other: &EdgePath) {
    self.commands.extend_from_slice(&other.commands);
  }

  /// The commands of this path reversed end to end, each with its fill index
  /// rewritten to `fill_style`.
  pub fn reversed(&self, fill_style: Option<usize>) -> impl Iterator<Item = DrawCommand> + '_ {
    self.commands.iter().rev().map(move |command| command.reverse(fill_style))
  }

  pub fn is_empty(&self) -> bool {
    self.commands.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn command(from: (i32, i32), to: (i32, i32)) -> DrawCommand {
    DrawCommand {
      from: Point::new(from.0, from.1),
      control: None,
      to: Point::new(to.0, to.1),
      fill_style: Some(0),
      line_style: None,
    }
  }

  #[test]
  fn test_reverse_swaps_endpoints() {
    let cmd = command((0, 0), (10, 0));
    let reversed = cmd.reverse(Some(2));
    assert_eq!(reversed.from, Point::new(10, 0));
    assert_eq!(reversed.to, Point::new(0, 0));
    assert_eq!(reversed.fill_style, Some(2));
    assert_eq!(reversed.line_style, None);
  }

  #[test]
  fn test_reversed_path_inverts_order() {
    let mut path = EdgePath::new();
    path.push(command((0, 0), (10, 0)));
    path.push(command((10, 0), (10, 10)));
    let reversed: Vec<DrawCommand> = path.reversed(Some(1)).collect();
    assert_eq!(reversed[0].from, Point::new(10, 10));
    assert_eq!(reversed[1].to, Point::new(0, 0));
    assert!(reversed.iter().all(|c| c.fill_style == Some(1)));
  }
}

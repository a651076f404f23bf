use crate::ast::shape_records::{Shape, ShapeRecord};
use crate::ast::Point;
use crate::backend::RasterContext;
use crate::raster::command::{DrawCommand, EdgePath};
use crate::raster::figure::{Figure, StyleSelection};
use crate::raster::RasterError;

/// Rebuilds closed, fillable/strokeable path sets from a shape's raw record
/// stream, then replays them into a drawing context.
pub struct PathBuilder {
  figures: Vec<Figure>,
}

impl PathBuilder {
  /// Walks the record stream once, maintaining the running pen position and
  /// the selected styles, flushing the current sub-path into the active
  /// figure on every style change.
  ///
  /// A style change that explicitly resets all three styles to zero starts
  /// a new disjoint figure; it must carry new style arrays.
  pub fn build(shape: &Shape) -> Result<PathBuilder, RasterError> {
    let mut figures: Vec<Figure> = Vec::new();
    let mut figure = Figure::new(shape.initial_styles.fill.clone(), shape.initial_styles.line.clone());
    let mut selection = StyleSelection::default();
    let mut sub_path = EdgePath::new();
    let mut pos = Point::ORIGIN;

    for record in &shape.records {
      match record {
        ShapeRecord::StyleChange(change) => {
          figure.add_path(&sub_path, &selection);
          sub_path = EdgePath::new();

          let starts_new_group =
            change.left_fill == Some(0) && change.right_fill == Some(0) && change.line_style == Some(0);
          if starts_new_group {
            figure.clean();
            let styles = change.new_styles.as_ref().ok_or(RasterError::MissingGroupStyles)?;
            let finished = std::mem::replace(
              &mut figure,
              Figure::new(styles.fill.clone(), styles.line.clone()),
            );
            figures.push(finished);
            selection = StyleSelection::default();
          } else {
            if let Some(left_fill) = change.left_fill {
              selection.fill0 = left_fill.checked_sub(1);
            }
            if let Some(right_fill) = change.right_fill {
              selection.fill1 = right_fill.checked_sub(1);
            }
            if let Some(line_style) = change.line_style {
              selection.line = line_style.checked_sub(1);
            }
          }

          if let Some(move_to) = change.move_to {
            pos = move_to;
          }
        }
        ShapeRecord::Edge(edge) => {
          let from = pos;
          let to = from + edge.delta;
          let control = edge.control_delta.map(|delta| from + delta);
          pos = to;

          sub_path.push(DrawCommand {
            from,
            control,
            to,
            fill_style: selection.fill1,
            line_style: selection.line,
          });
        }
      }
    }

    figure.add_path(&sub_path, &selection);
    figure.clean();
    figures.push(figure);

    Ok(PathBuilder { figures })
  }

  pub fn figures(&self) -> &[Figure] {
    &self.figures
  }

  /// Replays every figure into the drawing context: fills first, then
  /// strokes, each pass flushing per style run.
  pub fn rasterize<C: RasterContext>(&self, ctx: &mut C) {
    for figure in &self.figures {
      rasterize_fill(ctx, figure);
      rasterize_stroke(ctx, figure);
    }
  }
}

/// Walks a style-ordered edge stream, emitting a MoveTo whenever the pen is
/// not already at the next edge's start and flushing whenever the active
/// style index changes. A `None` style is set as a transparent fill rather
/// than skipped, so holes still punch through previously flushed regions.
fn rasterize_fill<C: RasterContext>(ctx: &mut C, figure: &Figure) {
  let path = figure.flatten_fills();
  if path.commands.is_empty() {
    return;
  }

  let mut pos: Option<Point> = None;
  let mut active: Option<Option<usize>> = None;

  for edge in &path.commands {
    if active != Some(edge.fill_style) {
      if active.is_some() {
        ctx.flush();
      }
      active = Some(edge.fill_style);
      let style = edge.fill_style.and_then(|idx| {
        let style = figure.fill_styles.get(idx);
        if style.is_none() {
          log::warn!("fill style index {} out of range ({} styles)", idx, figure.fill_styles.len());
        }
        style
      });
      ctx.set_fill(style);
      pos = None;
    }

    if pos != Some(edge.from) {
      ctx.move_to(edge.from);
    }
    match edge.control {
      Some(control) => ctx.curve_to(control, edge.to),
      None => ctx.line_to(edge.to),
    }
    pos = Some(edge.to);
  }

  ctx.flush();
}

fn rasterize_stroke<C: RasterContext>(ctx: &mut C, figure: &Figure) {
  let path = figure.flatten_lines();
  if path.commands.is_empty() {
    return;
  }

  let mut pos: Option<Point> = None;
  let mut active: Option<Option<usize>> = None;

  for edge in &path.commands {
    if active != Some(edge.line_style) {
      if active.is_some() {
        ctx.flush();
      }
      active = Some(edge.line_style);
      let style = edge.line_style.and_then(|idx| {
        let style = figure.line_styles.get(idx);
        if style.is_none() {
          log::warn!("line style index {} out of range ({} styles)", idx, figure.line_styles.len());
        }
        style
      });
      ctx.set_stroke(style);
      pos = None;
    }

    if pos != Some(edge.from) {
      ctx.move_to(edge.from);
    }
    match edge.control {
      Some(control) => ctx.curve_to(control, edge.to),
      None => ctx.line_to(edge.to),
    }
    pos = Some(edge.to);
  }

  ctx.flush();
}

use std::env;
use std::fs::File;
use std::io::prelude::*;

use swf_player::ast::{Matrix, Point, Rect, SRgb8};
use swf_player::{Player, RasterContext, RenderBackend};

/// A backend that draws nothing: paths are counted, placements logged.
#[derive(Default)]
struct HeadlessBackend {
  placed_shapes: usize,
}

struct HeadlessRaster {
  id: u16,
  segments: usize,
}

impl RasterContext for HeadlessRaster {
  fn set_fill(&mut self, _style: Option<&swf_player::ast::FillStyle>) {}
  fn set_stroke(&mut self, _style: Option<&swf_player::ast::LineStyle>) {}
  fn move_to(&mut self, _point: Point) {}

  fn line_to(&mut self, _point: Point) {
    self.segments += 1;
  }

  fn curve_to(&mut self, _control: Point, _anchor: Point) {
    self.segments += 1;
  }

  fn flush(&mut self) {}
}

impl RenderBackend for HeadlessBackend {
  type Image = ();
  type Shape = u16;
  type Raster = HeadlessRaster;

  fn set_stage_size(&mut self, rect: &Rect) {
    log::info!(
      "stage: {}x{} px",
      (rect.x_max - rect.x_min).to_px(),
      (rect.y_max - rect.y_min).to_px()
    );
  }

  fn set_background_color(&mut self, color: SRgb8) {
    log::info!("background: #{:02x}{:02x}{:02x}", color.r, color.g, color.b);
  }

  fn register_image(&mut self, id: u16, width: u16, height: u16, _rgba: &[u8]) -> Self::Image {
    log::info!("image {}: {}x{}", id, width, height);
  }

  fn begin_shape(&mut self, id: u16, _bounds: &Rect) -> Self::Raster {
    HeadlessRaster { id, segments: 0 }
  }

  fn end_shape(&mut self, id: u16, raster: Self::Raster) -> Self::Shape {
    log::info!("shape {}: {} segments", id, raster.segments);
    raster.id
  }

  fn place_shape(&mut self, shape: &Self::Shape, matrix: &Matrix) {
    log::debug!(
      "place shape {} at ({}, {})",
      shape,
      matrix.translate_x.to_px(),
      matrix.translate_y.to_px()
    );
    self.placed_shapes += 1;
  }
}

fn main() {
  env_logger::init();

  let args: Vec<String> = env::args().collect();
  if args.len() < 2 {
    eprintln!("Missing input path");
    std::process::exit(1);
  }

  let file_path = &args[1];
  let mut file = File::open(file_path).expect("File not found");
  let mut data: Vec<u8> = Vec::new();
  file.read_to_end(&mut data).expect("Unable to read file");

  let mut player = match Player::load(HeadlessBackend::default(), &data) {
    Ok(player) => player,
    Err(e) => {
      eprintln!("Failed to load movie: {}", e);
      std::process::exit(1);
    }
  };

  let header = player.movie().header;
  println!(
    "SWF v{}: {} declared frames at {} fps, {} characters, {} timeline frames",
    header.swf_version,
    header.frame_count,
    header.frame_rate.to_f32(),
    player.character_count(),
    player.timeline().frame_count()
  );

  // Drive a few headless refreshes so placements show up in the log.
  for _ in 0..8 {
    player.tick();
  }
  println!("placed {} shape instances", player.backend().placed_shapes);
}

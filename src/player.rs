//! The engine: loads a movie, registers its characters against a renderer
//! backend and drives the main timeline from the host's per-refresh
//! callback.

use crate::ast::tags::DefineSprite;
use crate::ast::{Matrix, Movie, Tag};
use crate::backend::RenderBackend;
use crate::display::DisplayList;
use crate::parsers::movie::{parse_movie, SwfParseError};
use crate::raster::{PathBuilder, RasterError};
use crate::timeline::Timeline;
use std::cell::{Ref, RefCell};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlayerError {
  #[error(transparent)]
  Parse(#[from] SwfParseError),
  #[error(transparent)]
  Raster(#[from] RasterError),
}

/// A sprite character: a nested timeline clocked independently of its
/// owner, at the document frame rate.
///
/// The timeline sits behind a `RefCell` because sprites are ticked while
/// the character dictionary is borrowed for drawing; playback is strictly
/// single-threaded.
#[derive(Debug)]
pub struct Sprite {
  id: u16,
  timeline: RefCell<Timeline>,
}

impl Sprite {
  pub fn new(tag: &DefineSprite, frame_rate: f32) -> Sprite {
    Sprite {
      id: tag.id,
      timeline: RefCell::new(Timeline::new(&tag.tags, frame_rate, usize::MAX)),
    }
  }

  pub fn id(&self) -> u16 {
    self.id
  }

  pub fn timeline(&self) -> Ref<'_, Timeline> {
    self.timeline.borrow()
  }
}

/// One registered character: a rasterized shape surface, a bitmap image
/// handle, or a sprite.
pub enum Character<B: RenderBackend> {
  Shape(B::Shape),
  Bitmap(B::Image),
  Sprite(Sprite),
}

/// The playback engine for one document.
pub struct Player<B: RenderBackend> {
  backend: B,
  movie: Movie,
  dictionary: HashMap<u16, Character<B>>,
  timeline: Timeline,
}

impl<B: RenderBackend> Player<B> {
  /// Parses `data`, builds the main timeline, registers every character
  /// definition with the backend and prepares the stage.
  ///
  /// Parsing and registration complete before playback starts; the
  /// dictionary is read-only afterwards.
  pub fn load(backend: B, data: &[u8]) -> Result<Player<B>, PlayerError> {
    let movie = parse_movie(data)?;
    let frame_rate = movie.header.frame_rate.to_f32();
    let timeline = Timeline::new(&movie.tags, frame_rate, usize::MAX);

    let mut player = Player {
      backend,
      movie,
      dictionary: HashMap::new(),
      timeline,
    };
    player.register_characters()?;
    player.prepare_stage();
    Ok(player)
  }

  fn register_characters(&mut self) -> Result<(), PlayerError> {
    let frame_rate = self.movie.header.frame_rate.to_f32();
    for tag in &self.movie.tags {
      let character = match tag {
        Tag::DefineShape(shape_tag) => {
          let builder = PathBuilder::build(&shape_tag.shape)?;
          let mut raster = self.backend.begin_shape(shape_tag.id, &shape_tag.bounds);
          builder.rasterize(&mut raster);
          Some((shape_tag.id, Character::Shape(self.backend.end_shape(shape_tag.id, raster))))
        }
        Tag::DefineBitmap(bitmap_tag) => {
          let image = self
            .backend
            .register_image(bitmap_tag.id, bitmap_tag.width, bitmap_tag.height, &bitmap_tag.data);
          Some((bitmap_tag.id, Character::Bitmap(image)))
        }
        Tag::DefineSprite(sprite_tag) => Some((sprite_tag.id, Character::Sprite(Sprite::new(sprite_tag, frame_rate)))),
        _ => None,
      };

      if let Some((id, character)) = character {
        if self.dictionary.insert(id, character).is_some() {
          log::warn!("character id {} redefined; keeping the last definition", id);
        }
      }
    }
    Ok(())
  }

  /// Sizes the stage to the declared frame rect and applies the first
  /// SetBackgroundColor tag, if any.
  fn prepare_stage(&mut self) {
    self.backend.set_stage_size(&self.movie.header.frame_size);
    let background = self.movie.tags.iter().find_map(|tag| match tag {
      Tag::SetBackgroundColor(tag) => Some(tag.color),
      _ => None,
    });
    if let Some(color) = background {
      self.backend.set_background_color(color);
    }
  }

  /// One host display refresh: advance the main timeline if its frame
  /// duration elapsed, then draw the display list (sprites tick their own
  /// timelines as they are drawn).
  pub fn tick(&mut self) {
    self.timeline.tick();
    draw_list(
      &mut self.backend,
      &self.dictionary,
      self.timeline.display_list(),
      &Matrix::IDENTITY,
    );
  }

  pub fn movie(&self) -> &Movie {
    &self.movie
  }

  pub fn timeline(&self) -> &Timeline {
    &self.timeline
  }

  pub fn timeline_mut(&mut self) -> &mut Timeline {
    &mut self.timeline
  }

  pub fn character(&self, id: u16) -> Option<&Character<B>> {
    self.dictionary.get(&id)
  }

  pub fn character_count(&self) -> usize {
    self.dictionary.len()
  }

  pub fn backend(&self) -> &B {
    &self.backend
  }

  pub fn backend_mut(&mut self) -> &mut B {
    &mut self.backend
  }
}

fn draw_list<B: RenderBackend>(
  backend: &mut B,
  dictionary: &HashMap<u16, Character<B>>,
  list: &DisplayList,
  base: &Matrix,
) {
  for entry in list.entries() {
    match dictionary.get(&entry.character_id) {
      Some(Character::Shape(surface)) => {
        backend.place_shape(surface, &base.combine(&entry.matrix));
      }
      Some(Character::Sprite(sprite)) => {
        match sprite.timeline.try_borrow_mut() {
          Ok(mut timeline) => timeline.tick(),
          Err(_) => {
            log::warn!("sprite {} is placed inside itself; skipping", entry.character_id);
            continue;
          }
        }
        let timeline = sprite.timeline.borrow();
        draw_list(backend, dictionary, timeline.display_list(), &base.combine(&entry.matrix));
      }
      Some(Character::Bitmap(_)) => {
        log::debug!(
          "character {} is a bitmap; bitmaps are painted through fills",
          entry.character_id
        );
      }
      None => log::warn!("missing character {} in display list", entry.character_id),
    }
  }
}

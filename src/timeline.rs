//! The frame engine: partitions a tag stream into ShowFrame-delimited
//! frames, advances them against a wall clock and executes the SWF3-era
//! action set.

use crate::ast::{Action, Tag};
use crate::display::DisplayList;
use std::time::{Duration, Instant};

/// A resettable monotonic clock with pause/resume, mirroring the stopwatch
/// driving frame advancement.
#[derive(Clone, Debug, Default)]
struct Stopwatch {
  accumulated: Duration,
  started_at: Option<Instant>,
}

impl Stopwatch {
  fn is_running(&self) -> bool {
    self.started_at.is_some()
  }

  fn start(&mut self) {
    if self.started_at.is_none() {
      self.started_at = Some(Instant::now());
    }
  }

  fn stop(&mut self) {
    if let Some(started_at) = self.started_at.take() {
      self.accumulated += started_at.elapsed();
    }
  }

  fn restart(&mut self) {
    self.accumulated = Duration::ZERO;
    self.started_at = Some(Instant::now());
  }

  fn reset(&mut self) {
    self.accumulated = Duration::ZERO;
    self.started_at = None;
  }

  fn elapsed(&self) -> Duration {
    match self.started_at {
      Some(started_at) => self.accumulated + started_at.elapsed(),
      None => self.accumulated,
    }
  }
}

/// One ShowFrame-delimited slice of a timeline: the display-list effector
/// tags and the flattened actions of its DoAction tags.
#[derive(Clone, Debug, Default)]
pub struct Frame {
  effectors: Vec<Tag>,
  actions: Vec<Action>,
  clears_display_list: bool,
}

impl Frame {
  pub fn effectors(&self) -> &[Tag] {
    &self.effectors
  }

  pub fn actions(&self) -> &[Action] {
    &self.actions
  }

  /// Applies this frame's display-list effects. Replays during a seek call
  /// this without running actions.
  fn execute_tags(&self, display_list: &mut DisplayList) {
    if self.clears_display_list {
      display_list.clear();
    }
    for tag in &self.effectors {
      match tag {
        Tag::PlaceObject(place) => display_list.place(place),
        Tag::RemoveObject(remove) => display_list.remove(remove),
        _ => {}
      }
    }
  }
}

/// A timeline: a frame sequence, its display list, and the playback clock.
/// The document owns one; every sprite character owns an independent one.
#[derive(Clone, Debug)]
pub struct Timeline {
  display_list: DisplayList,
  frames: Vec<Frame>,
  frame_rate: f32,
  loop_count: usize,
  frame_index: Option<usize>,
  loops: usize,
  paused: bool,
  clock: Stopwatch,
}

impl Timeline {
  /// Partitions `tags` into frames and enters frame 0.
  ///
  /// Control tags accumulate into the current frame; a DoAction's actions
  /// are flattened into its action list; ShowFrame closes the frame. Frame 0
  /// clears the display list whenever it is (re-)entered, so replays and
  /// loop restarts reconstruct state from empty.
  pub fn new(tags: &[Tag], frame_rate: f32, loop_count: usize) -> Timeline {
    let mut frames: Vec<Frame> = Vec::new();
    let mut frame = Frame {
      clears_display_list: true,
      ..Frame::default()
    };

    for tag in tags {
      match tag {
        Tag::DoAction(do_action) => frame.actions.extend_from_slice(&do_action.actions),
        Tag::ShowFrame => {
          frames.push(std::mem::take(&mut frame));
        }
        tag if tag.is_control() => frame.effectors.push(tag.clone()),
        _ => {}
      }
    }

    let mut timeline = Timeline {
      display_list: DisplayList::new(),
      frames,
      frame_rate,
      loop_count,
      frame_index: None,
      loops: 0,
      paused: false,
      clock: Stopwatch::default(),
    };
    timeline.advance_frame();
    timeline
  }

  pub fn display_list(&self) -> &DisplayList {
    &self.display_list
  }

  pub fn frames(&self) -> &[Frame] {
    &self.frames
  }

  pub fn frame_count(&self) -> usize {
    self.frames.len()
  }

  /// The current frame index, or `None` before the first frame is entered
  /// (only observable for an empty timeline).
  pub fn frame_index(&self) -> Option<usize> {
    self.frame_index
  }

  pub fn is_active(&self) -> bool {
    self.clock.is_running()
  }

  /// Starts or stops the playback clock; used by the Play/Stop actions.
  pub fn set_active(&mut self, active: bool) {
    self.paused = !active;
    if active {
      self.clock.start();
    } else {
      self.clock.stop();
    }
  }

  /// Seeks to `index`, running its effectors and actions and restarting the
  /// frame clock.
  ///
  /// A non-sequential seek (anything but "current + 1") first replays the
  /// effectors of frames `0..index` to deterministically reconstruct the
  /// accumulated display-list state; replayed frames' actions do not run.
  /// An out-of-range index is logged and ignored.
  pub fn set_frame(&mut self, index: usize) {
    if index >= self.frames.len() {
      log::warn!("seek to frame {} out of range ({} frames)", index, self.frames.len());
      return;
    }

    let sequential_next = self.frame_index.map_or(0, |current| current + 1);
    if index != sequential_next {
      for i in 0..index {
        Frame::execute_tags(&self.frames[i], &mut self.display_list);
      }
    }

    self.frame_index = Some(index);
    Frame::execute_tags(&self.frames[index], &mut self.display_list);
    self.run_actions(index);

    // The frame-duration clock starts over, but a Stop executed by this
    // frame's actions keeps the timeline stopped.
    self.clock.restart();
    if self.paused {
      self.clock.stop();
    }
  }

  /// Steps to the next frame, wrapping to 0 while the loop budget allows,
  /// and holding on the last frame (clock reset) once it is spent.
  pub fn advance_frame(&mut self) {
    if self.frames.is_empty() {
      return;
    }

    let mut next = self.frame_index.map_or(0, |current| current + 1);
    if next == self.frames.len() {
      if self.loops < self.loop_count {
        self.loops += 1;
        next = 0;
      } else {
        self.clock.reset();
        return;
      }
    }

    self.set_frame(next);
  }

  /// Advances at most one frame when the frame duration has elapsed. Time
  /// debt beyond one frame is not carried: under a stalled host, frames are
  /// dropped rather than replayed in a burst.
  pub fn tick(&mut self) {
    if self.paused {
      return;
    }
    if !self.clock.is_running() && self.loops < self.loop_count {
      self.clock.start();
    }
    if self.clock.elapsed().as_secs_f32() >= 1.0 / self.frame_rate {
      self.advance_frame();
    }
  }

  /// Runs a frame's actions linearly from PC 0. An action may reseek the
  /// timeline, skip following actions, or halt the rest of the list.
  fn run_actions(&mut self, index: usize) {
    if self.frames[index].actions.is_empty() {
      return;
    }

    // Cloned so a GotoFrame reseek cannot alias the list being executed.
    let actions = self.frames[index].actions.clone();
    let mut pc = 0;
    while pc < actions.len() {
      log::debug!("executing action {:?} at pc {}", actions[pc], pc);
      match actions[pc] {
        Action::Play => {
          self.set_active(true);
          // Play acts on the timeline that spawned it, which halts the
          // remainder of the frame's action list.
          break;
        }
        Action::Stop => self.set_active(false),
        Action::GotoFrame { frame } => self.set_frame(usize::from(frame)),
        Action::WaitForFrame { frame, skip_count } => {
          if self.frames.len() < usize::from(frame) {
            pc += usize::from(skip_count);
          }
        }
        Action::Unknown { code } => log::debug!("ignoring action 0x{:02x}", code),
      }
      pc += 1;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ast::tags::{DoAction, PlaceObject, RemoveObject};
  use crate::ast::Matrix;

  fn place(depth: u16, character_id: u16) -> Tag {
    Tag::PlaceObject(PlaceObject {
      is_move: false,
      depth,
      character_id: Some(character_id),
      matrix: Some(Matrix::IDENTITY),
      color_transform: None,
      ratio: None,
      name: None,
      clip_depth: None,
    })
  }

  fn remove(depth: u16) -> Tag {
    Tag::RemoveObject(RemoveObject {
      depth,
      character_id: None,
    })
  }

  fn actions(actions: Vec<Action>) -> Tag {
    Tag::DoAction(DoAction { actions })
  }

  // Six frames: each frame n places character n at depth n; frame 3 also
  // removes depth 1.
  fn six_frame_tags() -> Vec<Tag> {
    let mut tags: Vec<Tag> = Vec::new();
    for n in 0..6u16 {
      tags.push(place(n, n));
      if n == 3 {
        tags.push(remove(1));
      }
      tags.push(Tag::ShowFrame);
    }
    tags
  }

  fn depths(timeline: &Timeline) -> Vec<u16> {
    timeline.display_list().entries().iter().map(|e| e.depth).collect()
  }

  #[test]
  fn test_partition_counts_frames() {
    let timeline = Timeline::new(&six_frame_tags(), 12.0, 0);
    assert_eq!(timeline.frame_count(), 6);
    assert_eq!(timeline.frame_index(), Some(0));
    assert_eq!(timeline.frames()[0].effectors().len(), 1);
    assert_eq!(timeline.frames()[3].effectors().len(), 2);
  }

  #[test]
  fn test_do_action_flattens_into_frame() {
    let tags = vec![actions(vec![Action::Stop]), place(1, 1), Tag::ShowFrame];
    let timeline = Timeline::new(&tags, 12.0, 0);
    assert_eq!(timeline.frames()[0].actions(), &[Action::Stop]);
    assert_eq!(timeline.frames()[0].effectors().len(), 1);
  }

  #[test]
  fn test_seek_matches_sequential_advance() {
    let tags = six_frame_tags();
    let mut direct = Timeline::new(&tags, 12.0, 0);
    direct.set_frame(5);

    let mut stepped = Timeline::new(&tags, 12.0, 0);
    for _ in 0..5 {
      stepped.advance_frame();
    }

    assert_eq!(direct.frame_index(), stepped.frame_index());
    assert_eq!(direct.display_list().entries(), stepped.display_list().entries());
    // Frame 3 removed depth 1; frames 0..=5 placed 0..=5.
    assert_eq!(depths(&direct), vec![0, 2, 3, 4, 5]);
  }

  #[test]
  fn test_backward_seek_replays_from_zero() {
    let tags = six_frame_tags();
    let mut timeline = Timeline::new(&tags, 12.0, 0);
    timeline.set_frame(5);
    timeline.set_frame(2);
    assert_eq!(timeline.frame_index(), Some(2));
    assert_eq!(depths(&timeline), vec![0, 1, 2]);
  }

  #[test]
  fn test_loop_termination_holds_on_last_frame() {
    let tags = six_frame_tags();
    let mut timeline = Timeline::new(&tags, 12.0, 0);
    for _ in 0..5 {
      timeline.advance_frame();
    }
    assert_eq!(timeline.frame_index(), Some(5));
    // Loop budget of 0: further advances must hold, not wrap.
    timeline.advance_frame();
    assert_eq!(timeline.frame_index(), Some(5));
    assert!(!timeline.is_active());
    timeline.tick();
    assert_eq!(timeline.frame_index(), Some(5));
  }

  #[test]
  fn test_loop_restart_clears_display_list() {
    let tags = six_frame_tags();
    let mut timeline = Timeline::new(&tags, 12.0, 1);
    for _ in 0..5 {
      timeline.advance_frame();
    }
    assert_eq!(depths(&timeline), vec![0, 2, 3, 4, 5]);
    // One loop left: advancing wraps to frame 0 and starts from empty.
    timeline.advance_frame();
    assert_eq!(timeline.frame_index(), Some(0));
    assert_eq!(depths(&timeline), vec![0]);
  }

  #[test]
  fn test_stop_action_pauses_clock() {
    let tags = vec![place(1, 1), actions(vec![Action::Stop]), Tag::ShowFrame, Tag::ShowFrame];
    let mut timeline = Timeline::new(&tags, 12.0, 0);
    assert!(!timeline.is_active());
    // Paused: ticking never advances.
    timeline.tick();
    assert_eq!(timeline.frame_index(), Some(0));

    timeline.set_active(true);
    assert!(timeline.is_active());
  }

  #[test]
  fn test_goto_frame_action_seeks() {
    let mut tags = six_frame_tags();
    // Frame 0 jumps straight to frame 4.
    tags.insert(1, actions(vec![Action::GotoFrame { frame: 4 }]));
    let timeline = Timeline::new(&tags, 12.0, 0);
    assert_eq!(timeline.frame_index(), Some(4));
    assert_eq!(depths(&timeline), vec![0, 2, 3, 4]);
  }

  #[test]
  fn test_goto_frame_out_of_range_is_noop() {
    let tags = vec![place(1, 1), actions(vec![Action::GotoFrame { frame: 40 }]), Tag::ShowFrame];
    let timeline = Timeline::new(&tags, 12.0, 0);
    assert_eq!(timeline.frame_index(), Some(0));
  }

  #[test]
  fn test_wait_for_frame_loaded_continues() {
    let tags = vec![
      actions(vec![
        Action::WaitForFrame {
          frame: 1,
          skip_count: 1,
        },
        Action::Stop,
      ]),
      place(1, 1),
      Tag::ShowFrame,
    ];
    let timeline = Timeline::new(&tags, 12.0, 0);
    // Frame 1 is loaded, so the Stop is not skipped.
    assert!(!timeline.is_active());
  }

  #[test]
  fn test_wait_for_frame_unloaded_skips() {
    let tags = vec![
      actions(vec![
        Action::WaitForFrame {
          frame: 9,
          skip_count: 1,
        },
        Action::Stop,
      ]),
      place(1, 1),
      Tag::ShowFrame,
    ];
    let timeline = Timeline::new(&tags, 12.0, 0);
    // Frame 9 is not loaded: the Stop is skipped and the clock keeps
    // running.
    assert!(timeline.is_active());
  }

  #[test]
  fn test_play_action_halts_rest_of_list() {
    let tags = vec![actions(vec![Action::Play, Action::Stop]), place(1, 1), Tag::ShowFrame];
    let timeline = Timeline::new(&tags, 12.0, 0);
    // The Stop after Play must not run.
    assert!(timeline.is_active());
  }

  #[test]
  fn test_empty_timeline_is_inert() {
    let mut timeline = Timeline::new(&[], 12.0, 0);
    assert_eq!(timeline.frame_count(), 0);
    assert_eq!(timeline.frame_index(), None);
    timeline.tick();
    timeline.advance_frame();
    assert_eq!(timeline.frame_index(), None);
  }
}

/// One decoded SWF3-era action.
///
/// Opcodes outside the supported set are kept as `Unknown` placeholders so a
/// frame's action list preserves positions for `WaitForFrame` skips.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
  /// Start the clock of the timeline the action runs on.
  Play,
  /// Stop the clock of the timeline the action runs on.
  Stop,
  /// Seek to the given zero-based frame.
  GotoFrame { frame: u16 },
  /// If fewer than `frame` frames are loaded, skip the next `skip_count`
  /// actions. Always a no-op for fully loaded documents.
  WaitForFrame { frame: u16, skip_count: u8 },
  /// A recognized-but-unsupported or unknown opcode; executes as a no-op.
  Unknown { code: u8 },
}

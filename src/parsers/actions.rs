use crate::ast::Action;
use nom::number::complete::{le_u16 as parse_le_u16, le_u8 as parse_u8};
use nom::IResult as NomResult;

/// Parses one action record. Returns `None` for the `0x00` end-of-list
/// marker.
///
/// Opcodes at or above `0x80` carry a 16-bit payload length, present even
/// for recognized opcodes so unrecognized ones can be skipped by length.
pub fn parse_action(input: &[u8]) -> NomResult<&[u8], Option<Action>> {
  let (input, code) = parse_u8(input)?;
  if code == 0 {
    return Ok((input, None));
  }

  let (input, payload) = if code >= 0x80 {
    let (input, length) = parse_le_u16(input)?;
    nom::bytes::complete::take(length)(input)?
  } else {
    (input, &[][..])
  };

  let action = match code {
    0x06 => Action::Play,
    0x07 => Action::Stop,
    0x81 => {
      let (_, frame) = parse_le_u16(payload)?;
      Action::GotoFrame { frame }
    }
    0x8a => {
      let (payload, frame) = parse_le_u16(payload)?;
      let (_, skip_count) = parse_u8(payload)?;
      Action::WaitForFrame { frame, skip_count }
    }
    _ => {
      log::debug!("ignoring unknown action 0x{:02x} ({} payload bytes)", code, payload.len());
      Action::Unknown { code }
    }
  };

  Ok((input, Some(action)))
}

/// Parses actions until the `0x00` end marker or the end of input.
pub fn parse_action_string(input: &[u8]) -> NomResult<&[u8], Vec<Action>> {
  let mut result: Vec<Action> = Vec::new();
  let mut current_input = input;

  while !current_input.is_empty() {
    let (next_input, action) = parse_action(current_input)?;
    current_input = next_input;
    match action {
      Some(action) => result.push(action),
      None => break,
    }
  }

  Ok((current_input, result))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_action_play_stop() {
    let input = vec![0x06, 0x07, 0x00];
    let (rest, actions) = parse_action_string(&input[..]).unwrap();
    assert!(rest.is_empty());
    assert_eq!(actions, vec![Action::Play, Action::Stop]);
  }

  #[test]
  fn test_parse_action_goto_frame() {
    let input = vec![0x81, 0x02, 0x00, 0x05, 0x00, 0x00];
    let (_, actions) = parse_action_string(&input[..]).unwrap();
    assert_eq!(actions, vec![Action::GotoFrame { frame: 5 }]);
  }

  #[test]
  fn test_parse_action_wait_for_frame() {
    let input = vec![0x8a, 0x03, 0x00, 0x0a, 0x00, 0x02, 0x00];
    let (_, actions) = parse_action_string(&input[..]).unwrap();
    assert_eq!(
      actions,
      vec![Action::WaitForFrame {
        frame: 10,
        skip_count: 2
      }]
    );
  }

  #[test]
  fn test_parse_action_unknown_long_skips_payload() {
    // GetURL (0x83) with a 4-byte payload, followed by Play.
    let input = vec![0x83, 0x04, 0x00, 0xde, 0xad, 0xbe, 0xef, 0x06, 0x00];
    let (_, actions) = parse_action_string(&input[..]).unwrap();
    assert_eq!(actions, vec![Action::Unknown { code: 0x83 }, Action::Play]);
  }

  #[test]
  fn test_parse_action_unknown_short() {
    // NextFrame (0x04) has no payload.
    let input = vec![0x04, 0x00];
    let (_, actions) = parse_action_string(&input[..]).unwrap();
    assert_eq!(actions, vec![Action::Unknown { code: 0x04 }]);
  }
}

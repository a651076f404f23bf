#![no_main]
#[macro_use]
extern crate libfuzzer_sys;
extern crate swf_player;

fuzz_target!(|data: &[u8]| {
  let _ = swf_player::parse_movie(data);
});

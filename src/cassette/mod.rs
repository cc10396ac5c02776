//! Cassette format for recording and replaying service interactions.
//!
//! A cassette captures every `LlmClient` round trip of a run so the same run
//! can be reproduced offline (`CODEBRIEF_REPLAY`) or inspected after the fact.

pub mod format;
pub mod recorder;
pub mod replayer;

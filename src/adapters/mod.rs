//! Adapter implementations of the port traits.
//!
//! `live` talks to the real disk and service, `recording` wraps a live LLM
//! client and captures a cassette, `replaying` serves a captured cassette.

pub mod live;
pub mod recording;
pub mod replaying;

//! Synthesis invoker.
//!
//! This module turns a validated speech request into an audio artifact and
//! recovers every failure at the boundary into a user-facing outcome.

mod session;
mod synth;

pub use session::DeviceSession;
pub use synth::{GENERIC_FAILURE, SynthesisError, SynthesisOutcome, Synthesizer};

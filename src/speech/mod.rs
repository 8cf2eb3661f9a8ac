//! Request parameters collected from the user-facing forms.

mod request;

pub use request::{Language, MAX_TEXT_CHARS, RequestError, SpeechRequest, VoiceStyle};

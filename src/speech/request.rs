//! Speech request types and validation.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Upper bound on request text length, in characters.
pub const MAX_TEXT_CHARS: usize = 5_000;

/// Errors raised by request validation, before any engine call is made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("Text cannot be empty")]
    EmptyText,

    #[error("Text is too long: {length} characters (limit {limit})")]
    TextTooLong { length: usize, limit: usize },

    #[error("The cloned voice style requires a reference clip")]
    MissingReference,

    #[error("Reference clip not found: {0}")]
    ReferenceNotFound(String),
}

/// Languages the synthesis engine accepts.
///
/// The web form offers the `FORM` subset; the studio variant offers all of
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    French,
    English,
    Spanish,
    German,
    Italian,
    Portuguese,
    Dutch,
    Polish,
    Russian,
    Czech,
    Arabic,
    Mandarin,
    Hungarian,
    Korean,
    Japanese,
}

impl Language {
    /// Languages offered by the web form variant.
    pub const FORM: [Language; 7] = [
        Language::French,
        Language::English,
        Language::Spanish,
        Language::German,
        Language::Italian,
        Language::Portuguese,
        Language::Dutch,
    ];

    /// Every language the engine supports.
    pub const ALL: [Language; 15] = [
        Language::French,
        Language::English,
        Language::Spanish,
        Language::German,
        Language::Italian,
        Language::Portuguese,
        Language::Dutch,
        Language::Polish,
        Language::Russian,
        Language::Czech,
        Language::Arabic,
        Language::Mandarin,
        Language::Hungarian,
        Language::Korean,
        Language::Japanese,
    ];

    /// Returns the engine-side language code.
    pub fn code(&self) -> &'static str {
        match self {
            Language::French => "fr",
            Language::English => "en",
            Language::Spanish => "es",
            Language::German => "de",
            Language::Italian => "it",
            Language::Portuguese => "pt",
            Language::Dutch => "nl",
            Language::Polish => "pl",
            Language::Russian => "ru",
            Language::Czech => "cs",
            Language::Arabic => "ar",
            Language::Mandarin => "zh-cn",
            Language::Hungarian => "hu",
            Language::Korean => "ko",
            Language::Japanese => "ja",
        }
    }

    /// Returns the human-readable name shown in the form.
    pub fn label(&self) -> &'static str {
        match self {
            Language::French => "French",
            Language::English => "English",
            Language::Spanish => "Spanish",
            Language::German => "German",
            Language::Italian => "Italian",
            Language::Portuguese => "Portuguese",
            Language::Dutch => "Dutch",
            Language::Polish => "Polish",
            Language::Russian => "Russian",
            Language::Czech => "Czech",
            Language::Arabic => "Arabic",
            Language::Mandarin => "Chinese (Simplified)",
            Language::Hungarian => "Hungarian",
            Language::Korean => "Korean",
            Language::Japanese => "Japanese",
        }
    }

    /// Look up a language by its engine-side code.
    pub fn from_code(code: &str) -> Option<Language> {
        Language::ALL.into_iter().find(|l| l.code() == code)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Voice style modifier passed to the engine.
///
/// The web form offers standard/slow; the studio variant offers a preset
/// voice or cloning from a reference clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoiceStyle {
    Standard,
    Slow,
    Preset,
    Cloned,
}

impl VoiceStyle {
    /// Styles offered by the web form variant.
    pub const FORM: [VoiceStyle; 2] = [VoiceStyle::Standard, VoiceStyle::Slow];

    /// Styles offered by the studio variant.
    pub const STUDIO: [VoiceStyle; 2] = [VoiceStyle::Preset, VoiceStyle::Cloned];

    /// Returns the identifier used in file names and form values.
    pub fn as_str(&self) -> &'static str {
        match self {
            VoiceStyle::Standard => "standard",
            VoiceStyle::Slow => "slow",
            VoiceStyle::Preset => "preset",
            VoiceStyle::Cloned => "cloned",
        }
    }

    /// Returns the label shown in the form.
    pub fn label(&self) -> &'static str {
        match self {
            VoiceStyle::Standard => "Standard",
            VoiceStyle::Slow => "Slow",
            VoiceStyle::Preset => "Preset voice",
            VoiceStyle::Cloned => "Cloned voice",
        }
    }

    /// Whether this style asks the engine for a slower speaking rate.
    pub fn is_slow(&self) -> bool {
        matches!(self, VoiceStyle::Slow)
    }

    /// Whether this style clones a reference voice.
    pub fn clones_voice(&self) -> bool {
        matches!(self, VoiceStyle::Cloned)
    }

    /// Look up a style by its identifier.
    pub fn from_code(code: &str) -> Option<VoiceStyle> {
        match code {
            "standard" => Some(VoiceStyle::Standard),
            "slow" => Some(VoiceStyle::Slow),
            "preset" => Some(VoiceStyle::Preset),
            "cloned" => Some(VoiceStyle::Cloned),
            _ => None,
        }
    }
}

impl fmt::Display for VoiceStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One synthesis request as collected from the form or the command line.
#[derive(Debug, Clone)]
pub struct SpeechRequest {
    pub text: String,
    pub language: Language,
    pub style: VoiceStyle,
    /// Reference clip to clone, when the style asks for one.
    pub reference: Option<PathBuf>,
}

impl SpeechRequest {
    /// Create a request without a reference clip.
    pub fn new(text: impl Into<String>, language: Language, style: VoiceStyle) -> Self {
        Self {
            text: text.into(),
            language,
            style,
            reference: None,
        }
    }

    /// Attach a reference clip for voice cloning.
    pub fn with_reference(mut self, path: PathBuf) -> Self {
        self.reference = Some(path);
        self
    }

    /// Check the request before it is allowed near the engine.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.text.trim().is_empty() {
            return Err(RequestError::EmptyText);
        }

        let length = self.text.chars().count();
        if length > MAX_TEXT_CHARS {
            return Err(RequestError::TextTooLong {
                length,
                limit: MAX_TEXT_CHARS,
            });
        }

        if self.style.clones_voice() && self.reference.is_none() {
            return Err(RequestError::MissingReference);
        }

        if let Some(path) = &self.reference
            && !path.exists()
        {
            return Err(RequestError::ReferenceNotFound(path.display().to_string()));
        }

        Ok(())
    }
}

//! CLI argument parsing and validation.

mod args;

pub use args::{Args, EngineKind, StudioArgs, parse_language, parse_style};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::AudioFormat;
    use crate::speech::{Language, VoiceStyle};
    use clap::Parser;

    #[test]
    fn test_parse_language_valid() {
        assert_eq!(parse_language("fr"), Ok(Language::French));
        assert_eq!(parse_language("zh-cn"), Ok(Language::Mandarin));
    }

    #[test]
    fn test_parse_language_invalid() {
        let err = parse_language("tlh").unwrap_err();
        assert!(err.contains("tlh"));
        assert!(err.contains("fr"));
    }

    #[test]
    fn test_parse_style_valid() {
        assert_eq!(parse_style("slow"), Ok(VoiceStyle::Slow));
        assert_eq!(parse_style("cloned"), Ok(VoiceStyle::Cloned));
    }

    #[test]
    fn test_parse_style_invalid() {
        assert!(parse_style("whisper").is_err());
    }

    #[test]
    fn test_engine_kind_default_is_standard() {
        assert_eq!(EngineKind::default(), EngineKind::Standard);
    }

    #[test]
    fn test_engine_kind_identifiers() {
        assert_eq!(EngineKind::Standard.as_str(), "standard");
        assert_eq!(EngineKind::Xtts.as_str(), "xtts");
        assert_eq!(EngineKind::Xtts.name(), "XTTS v2");
    }

    #[test]
    fn test_engine_kind_ports() {
        assert_eq!(EngineKind::Standard.port(), 5002);
        assert_eq!(EngineKind::Xtts.port(), 5004);
    }

    #[test]
    fn test_engine_kind_formats() {
        assert_eq!(EngineKind::Standard.format(), AudioFormat::Mp3);
        assert_eq!(EngineKind::Xtts.format(), AudioFormat::Wav);
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["vocalia"]).unwrap();

        assert_eq!(args.engine, EngineKind::Standard);
        assert_eq!(args.host, "localhost");
        assert_eq!(args.listen.port(), 7860);
        assert_eq!(args.generate, None);
        assert_eq!(args.language, Language::French);
        assert_eq!(args.style, VoiceStyle::Standard);
    }

    #[test]
    fn test_args_one_shot_generate() {
        let args = Args::try_parse_from([
            "vocalia",
            "--generate",
            "Bonjour tout le monde",
            "--language",
            "fr",
            "--style",
            "slow",
            "--output",
            "bonjour.mp3",
        ])
        .unwrap();

        assert_eq!(args.generate.as_deref(), Some("Bonjour tout le monde"));
        assert_eq!(args.language, Language::French);
        assert_eq!(args.style, VoiceStyle::Slow);
        assert_eq!(args.output.to_str().unwrap(), "bonjour.mp3");
    }

    #[test]
    fn test_args_rejects_unknown_language() {
        let result = Args::try_parse_from(["vocalia", "--language", "xx"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_studio_args_defaults() {
        let args = StudioArgs::try_parse_from(["vocalia-studio"]).unwrap();

        assert_eq!(args.host, "localhost");
        assert_eq!(args.listen.port(), 7861);
        assert_eq!(args.reference_dir, None);
    }
}

//! # Configuration Files
//!
//! A [`PipelineConfig`] can be stored as JSON. Every field is optional:
//!
//! ```json
//! {
//!   "printer": { "name": "Kitchen", "width_dots": 384, "dots_per_mm": 8.0 },
//!   "trim": "auto",
//!   "offset_mm": -2.0,
//!   "method": "dither"
//! }
//! ```
//!
//! Command-line flags are applied on top of the loaded values.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::{Result, TopstartError};
use crate::pipeline::PipelineConfig;
use crate::render::dither::QuantizeMethod;
use crate::render::trim::TrimMode;

/// Read and validate a JSON pipeline config.
pub fn load<P: AsRef<Path>>(path: P) -> Result<PipelineConfig> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| {
        TopstartError::Config(format!("Failed to read {}: {}", path.display(), e))
    })?;
    let config = parse(&text)?;
    debug!(path = %path.display(), ?config, "Loaded config");
    Ok(config)
}

/// Parse and validate a JSON pipeline config.
///
/// An unknown `method` or `trim` name fails with
/// [`TopstartError::UnsupportedMode`], the same as on the command line.
/// Everything else wrong with the document is a [`TopstartError::Config`].
pub fn parse(text: &str) -> Result<PipelineConfig> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| TopstartError::Config(format!("Invalid config: {}", e)))?;

    if let Some(method) = value.get("method").and_then(Value::as_str) {
        method.parse::<QuantizeMethod>()?;
    }
    if let Some(trim) = value.get("trim").and_then(Value::as_str) {
        trim.parse::<TrimMode>()?;
    }

    let config: PipelineConfig = serde_json::from_value(value)
        .map_err(|e| TopstartError::Config(format!("Invalid config: {}", e)))?;
    config.validate()?;
    Ok(config)
}

/// Write `config` as pretty JSON.
pub fn save<P: AsRef<Path>>(path: P, config: &PipelineConfig) -> Result<()> {
    let json = serde_json::to_string_pretty(config)
        .map_err(|e| TopstartError::Config(format!("Failed to serialize config: {}", e)))?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(parse("{}").unwrap(), PipelineConfig::default());
    }

    #[test]
    fn test_partial_printer_override() {
        let config = parse(
            r#"{ "printer": { "name": "Kitchen", "max_chunk_rows": 128 }, "trim": "auto" }"#,
        )
        .unwrap();
        assert_eq!(config.printer.name, "Kitchen");
        assert_eq!(config.printer.max_chunk_rows, 128);
        assert_eq!(config.printer.width_dots, 384);
        assert_eq!(config.trim, TrimMode::Auto);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            parse(r#"{ "printer": { "dots_per_mm": 0.0 } }"#),
            Err(TopstartError::Config(_))
        ));
        assert!(matches!(
            parse(r#"{ "printer": { "width_dots": 0 } }"#),
            Err(TopstartError::Config(_))
        ));
        assert!(matches!(parse("not json"), Err(TopstartError::Config(_))));
        assert!(matches!(
            parse(r#"{ "method": 3 }"#),
            Err(TopstartError::Config(_))
        ));
    }

    #[test]
    fn test_unknown_mode_matches_command_line() {
        assert!(matches!(
            parse(r#"{ "method": "halftone" }"#),
            Err(TopstartError::UnsupportedMode(_))
        ));
        assert!(matches!(
            parse(r#"{ "trim": "sideways" }"#),
            Err(TopstartError::UnsupportedMode(_))
        ));

        let config = parse(r#"{ "method": "floyd_steinberg", "trim": "both" }"#).unwrap();
        assert_eq!(config.method, QuantizeMethod::Dither);
        assert_eq!(config.trim, TrimMode::Auto);
    }

    #[test]
    fn test_load_keeps_error_kind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("topstart.json");
        std::fs::write(&path, r#"{ "method": "halftone" }"#).unwrap();
        assert!(matches!(
            load(&path),
            Err(TopstartError::UnsupportedMode(_))
        ));

        std::fs::write(&path, r#"{ "offset_mm": "up" }"#).unwrap();
        assert!(matches!(load(&path), Err(TopstartError::Config(_))));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("topstart.json");

        let mut config = PipelineConfig::default();
        config.offset_mm = -2.5;
        config.method = QuantizeMethod::Dither;
        save(&path, &config).unwrap();

        assert_eq!(load(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, TopstartError::Config(_)));
    }
}

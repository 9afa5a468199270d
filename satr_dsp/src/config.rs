//! Typed configuration tree, deserialized from TOML.
//!
//! Mirrors §6 of the specification: an `[output]` table and a repeatable
//! `[[channel]]` array of tables (TOML's native idiom for what the original
//! config format expresses as `[channel N]` with an implicit index).
//! Validation is intentionally shallow: unknown keys are ignored by
//! `serde`'s default behavior, missing optional keys fall back to the
//! defaults documented here, and cross-field validation (e.g. "dual-fm
//! needs both `frequency1` and `frequency2`") happens once, at channel
//! construction time in `satr_dsp::channel`, not in this module.

use serde::Deserialize;

use crate::fir::Preemphasis;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {0}: {1}")]
    Read(String, std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("channel {0}: {1}")]
    Channel(usize, String),
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub output: OutputConfig,
    #[serde(rename = "channel", default)]
    pub channels: Vec<ChannelConfig>,
}

impl Config {
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read(path.display().to_string(), e))?;
        let config: Config = toml::from_str(&text)?;
        Ok(config)
    }
}

fn default_sample_rate() -> f64 {
    2_048_000.0
}

fn default_deviation() -> f64 {
    16_000_000.0
}

fn default_level() -> f64 {
    1.0
}

fn default_gain() -> f64 {
    0.0
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputType {
    File,
    Hackrf,
    Soapysdr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Uint8,
    Int8,
    Uint16,
    Int16,
    Int32,
    Float,
}

impl Default for DataType {
    fn default() -> Self {
        DataType::Int16
    }
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(rename = "type")]
    pub output_type: OutputType,
    pub output: String,
    #[serde(default = "default_sample_rate")]
    pub sample_rate: f64,
    #[serde(default)]
    pub frequency: f64,
    #[serde(default = "default_gain")]
    pub gain: f64,
    #[serde(default)]
    pub amp: bool,
    #[serde(default)]
    pub antenna: Option<String>,
    #[serde(default)]
    pub live: bool,
    #[serde(default)]
    pub data_type: DataType,
    #[serde(default = "default_deviation")]
    pub deviation: f64,
    #[serde(default = "default_level")]
    pub level: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChannelMode {
    Fm,
    DualFm,
    Adr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Rawaudio,
    Tone,
    Ffmpeg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdrMode {
    Mono,
    Dual,
    Joint,
    Stereo,
}

impl Default for AdrMode {
    fn default() -> Self {
        AdrMode::Stereo
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChannelConfig {
    pub mode: ChannelMode,
    #[serde(rename = "type")]
    pub source_type: SourceType,
    #[serde(default)]
    pub input: Option<String>,
    #[serde(default)]
    pub exec: bool,
    #[serde(default = "default_true")]
    pub stereo: bool,
    #[serde(default)]
    pub repeat: bool,
    #[serde(default = "default_preemphasis")]
    pub preemphasis: Preemphasis,
    #[serde(default)]
    pub frequency: f64,
    #[serde(default)]
    pub frequency1: f64,
    #[serde(default)]
    pub frequency2: f64,
    #[serde(default = "default_channel_deviation")]
    pub deviation: f64,
    #[serde(default = "default_level")]
    pub level: f64,
    #[serde(default)]
    pub adr_mode: AdrMode,
    #[serde(default)]
    pub scfcrc: bool,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tone_hz: f64,
    #[serde(default = "default_level")]
    pub tone_level: f64,
}

fn default_preemphasis() -> Preemphasis {
    Preemphasis::Us50
}

fn default_channel_deviation() -> f64 {
    75_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_minimal_file_sink_with_one_fm_channel() {
        let text = r#"
            [output]
            type = "file"
            output = "out.iq"

            [[channel]]
            mode = "fm"
            type = "tone"
            tone_hz = 1000.0
            frequency = 300000.0
        "#;

        let config: Config = toml::from_str(text).unwrap();
        assert_eq!(config.output.output_type, OutputType::File);
        assert_eq!(config.output.sample_rate, default_sample_rate());
        assert_eq!(config.channels.len(), 1);
        assert_eq!(config.channels[0].mode, ChannelMode::Fm);
        assert_eq!(config.channels[0].source_type, SourceType::Tone);
        assert!(config.channels[0].stereo);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let text = r#"
            [output]
            type = "file"
            output = "out.iq"
            unknown_key = 42
        "#;
        assert!(toml::from_str::<Config>(text).is_ok());
    }

    #[test]
    fn missing_config_file_is_a_read_error() {
        let err = Config::load(std::path::Path::new("/nonexistent/satradio.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read(_, _)));
    }
}

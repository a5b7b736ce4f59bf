//! Job document parser — handles both YAML and JSON documents.

use crate::error::{ConfigError, ConfigResult};
use crate::types::RawConfig;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

/// Serialization format of a job document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
}

impl ConfigFormat {
    /// `.json` → JSON, anything else (`.yaml`, `.yml`, no extension) → YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ConfigFormat::Json,
            _ => ConfigFormat::Yaml,
        }
    }

    fn name(self) -> &'static str {
        match self {
            ConfigFormat::Yaml => "YAML",
            ConfigFormat::Json => "JSON",
        }
    }
}

/// Parse a job document from a filesystem path.
///
/// The format is picked from the extension (see [`ConfigFormat::from_path`]).
pub fn parse_config_file(path: impl AsRef<Path>) -> ConfigResult<RawConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let file = File::open(path)
        .map_err(|e| ConfigError::Io(format!("opening {}: {}", path.display(), e)))?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    reader
        .read_to_end(&mut buf)
        .map_err(|e| ConfigError::Io(format!("reading {}: {}", path.display(), e)))?;

    let config = parse_config_bytes(&buf, ConfigFormat::from_path(path))?;
    debug!(
        "Parsed {}: {} image(s), {} plugin(s)",
        path.display(),
        config.images.len(),
        config.plugins.len()
    );
    Ok(config)
}

/// Parse a job document from raw bytes.
pub fn parse_config_bytes(bytes: &[u8], format: ConfigFormat) -> ConfigResult<RawConfig> {
    let parsed = match format {
        ConfigFormat::Json => serde_json::from_slice(bytes).map_err(|e| e.to_string()),
        ConfigFormat::Yaml => serde_yaml::from_slice(bytes).map_err(|e| e.to_string()),
    };
    parsed.map_err(|msg| ConfigError::Parse {
        format: format.name(),
        msg,
    })
}

/// Parse a job document from a string.
pub fn parse_config_str(text: &str, format: ConfigFormat) -> ConfigResult<RawConfig> {
    parse_config_bytes(text.as_bytes(), format)
}

//! Configuration management.
//!
//! Settings come from a TOML file, then environment variables override
//! individual values:
//!
//! ```toml
//! [dialect]
//! delimiter = ";"
//! comment = "#"
//! trim_leading_space = true
//! crlf = false
//!
//! [logging]
//! format = "json"
//! filter = "csvmap=debug"
//!
//! [[columns]]
//! name = "id"
//! kind = "u64"
//! ```
//!
//! | Variable | Overrides |
//! |----------|-----------|
//! | `CSVMAP_DELIMITER` | `dialect.delimiter` |
//! | `CSVMAP_COMMENT` | `dialect.comment` (empty clears it) |
//! | `CSVMAP_TRIM_LEADING_SPACE` | `dialect.trim_leading_space` |
//! | `CSVMAP_CRLF` | `dialect.crlf` |
//! | `CSVMAP_LOG` | `logging.filter` |

use crate::io::Dialect;
use crate::schema::{ColumnSpec, DynamicSchema};
use crate::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Main configuration for csvmap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvmapConfig {
    /// Text dialect for decoding and encoding.
    pub dialect: Dialect,
    /// Logging settings.
    pub logging: LoggingSettings,
    /// Columns of the runtime schema, if declared.
    pub columns: Vec<ColumnSpec>,
}

/// Logging section in config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoggingSettings {
    /// Output format: `pretty` or `json`.
    pub format: Option<String>,
    /// `EnvFilter` directive, e.g. `csvmap=debug`.
    pub filter: Option<String>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Dialect settings.
    pub dialect: Option<ConfigFileDialect>,
    /// Logging settings.
    pub logging: Option<LoggingSettings>,
    /// Runtime schema columns.
    pub columns: Option<Vec<ColumnSpec>>,
}

/// Dialect section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileDialect {
    /// Field separator, a single ASCII character or `tab`.
    pub delimiter: Option<String>,
    /// Comment character.
    pub comment: Option<String>,
    /// Trim leading whitespace of fields.
    pub trim_leading_space: Option<bool>,
    /// Write `\r\n` row terminators.
    pub crlf: Option<bool>,
}

impl CsvmapConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or a dialect value is
    /// unusable.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(contents).map_err(|e| Error::OperationFailed {
            operation: "parse_config_file".to_string(),
            cause: e.to_string(),
        })?;
        Self::from_config_file(file)
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
            operation: "read_config_file".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the platform config dir, then `~/.config/csvmap/`. Returns
    /// the default configuration if no usable file is found.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Self::default();
        };

        let candidates = [
            base_dirs.config_dir().join("csvmap").join("config.toml"),
            base_dirs
                .home_dir()
                .join(".config")
                .join("csvmap")
                .join("config.toml"),
        ];

        for path in candidates.iter().filter(|path| path.exists()) {
            match Self::load_from_file(path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Ignoring config file");
                },
            }
        }

        Self::default()
    }

    /// Converts a `ConfigFile` to `CsvmapConfig`.
    fn from_config_file(file: ConfigFile) -> Result<Self> {
        let mut config = Self::default();

        if let Some(dialect) = file.dialect {
            if let Some(delimiter) = dialect.delimiter {
                config.dialect.delimiter = parse_delimiter(&delimiter)?;
            }
            if let Some(comment) = dialect.comment {
                config.dialect.comment = parse_comment(&comment)?;
            }
            if let Some(v) = dialect.trim_leading_space {
                config.dialect.trim_leading_space = v;
            }
            if let Some(v) = dialect.crlf {
                config.dialect.crlf = v;
            }
        }
        if let Some(logging) = file.logging {
            config.logging = logging;
        }
        if let Some(columns) = file.columns {
            config.columns = columns;
        }

        config.dialect.validate()?;
        Ok(config)
    }

    /// Applies overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds an unusable value.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides looked up through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error if a value is unusable.
    pub fn apply_overrides_from(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<()> {
        if let Some(v) = lookup("CSVMAP_DELIMITER") {
            self.dialect.delimiter = parse_delimiter(&v)?;
        }
        if let Some(v) = lookup("CSVMAP_COMMENT") {
            self.dialect.comment = parse_comment(&v)?;
        }
        if let Some(v) = lookup("CSVMAP_TRIM_LEADING_SPACE") {
            self.dialect.trim_leading_space = parse_flag("CSVMAP_TRIM_LEADING_SPACE", &v)?;
        }
        if let Some(v) = lookup("CSVMAP_CRLF") {
            self.dialect.crlf = parse_flag("CSVMAP_CRLF", &v)?;
        }
        if let Some(v) = lookup("CSVMAP_LOG") {
            self.logging.filter = Some(v);
        }

        self.dialect.validate()
    }

    /// Sets the dialect.
    #[must_use]
    pub const fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Sets the runtime schema columns.
    #[must_use]
    pub fn with_columns(mut self, columns: Vec<ColumnSpec>) -> Self {
        self.columns = columns;
        self
    }

    /// Builds the runtime schema from the configured columns.
    ///
    /// Returns `None` when no columns are configured.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schema`] if a column is invalid.
    pub fn dynamic_schema(&self, name: &str) -> Result<Option<DynamicSchema>> {
        if self.columns.is_empty() {
            return Ok(None);
        }
        DynamicSchema::new(name, &self.columns).map(Some)
    }
}

/// Parses a delimiter setting: one ASCII character, or `tab`.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for anything else.
pub fn parse_delimiter(value: &str) -> Result<u8> {
    if value.eq_ignore_ascii_case("tab") || value == "\\t" {
        return Ok(b'\t');
    }
    match value.as_bytes() {
        [byte] if byte.is_ascii() => Ok(*byte),
        _ => Err(Error::InvalidInput(format!(
            "delimiter must be a single ASCII character, got '{value}'"
        ))),
    }
}

fn parse_comment(value: &str) -> Result<Option<u8>> {
    if value.is_empty() {
        return Ok(None);
    }
    parse_delimiter(value).map(Some)
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(Error::InvalidInput(format!(
            "{key} must be a boolean, got '{other}'"
        ))),
    }
}

//! Per-user settings read from `~/.ppaprc`.
//!
//! The file is optional and uses Java properties syntax: `key=value` lines,
//! `#` or `!` comments, and a trailing `\` to continue a value on the next
//! line. Values are taken verbatim, quotes included. Recognized keys are
//! `password`, `charset` and `ignore`.
//!
//! ```text
//! # ~/.ppaprc
//! password=correct horse battery staple
//! charset=utf-8
//! ignore=.*[.]tmp|[.]DS_Store
//! ```

use crate::PpapError;
use crate::Result;
use crate::filter::IgnorePattern;
use config::Config;
use config::ConfigError;
use config::File;
use config::FileStoredFormat;
use config::Format;
use config::Map;
use config::Value;
use encoding_rs::Encoding;
use java_properties::PropertiesIter;
use std::env;
use std::error::Error;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

/// Name of the settings file inside the home directory.
pub const SETTINGS_FILE_NAME: &str = ".ppaprc";

/// Charset used for entry names when none is configured.
pub const DEFAULT_CHARSET: &str = "windows-31j";

/// Key holding the archive password.
pub const KEY_PASSWORD: &str = "password";

/// Key holding the entry name charset.
pub const KEY_CHARSET: &str = "charset";

/// Key holding the ignore regular expression.
pub const KEY_IGNORE: &str = "ignore";

/// Where a setting value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// The caller-supplied default was used.
    Default,
    /// The value was read from the settings file.
    File,
}

/// A setting value tagged with its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setting<T> {
    /// The resolved value.
    pub value: T,
    /// Where the value came from.
    pub origin: Origin,
}

impl<T> Setting<T> {
    fn from_file(value: T) -> Self {
        Self {
            value,
            origin: Origin::File,
        }
    }

    fn fallback(value: T) -> Self {
        Self {
            value,
            origin: Origin::Default,
        }
    }

    /// Returns `true` if the value came from the settings file.
    #[must_use]
    pub fn is_from_file(&self) -> bool {
        self.origin == Origin::File
    }
}

/// Loaded settings.
///
/// When no settings file exists every lookup yields the default.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    source: Option<Config>,
}

impl Settings {
    /// Settings with no backing file.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads settings from `<home>/.ppaprc`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        match default_path() {
            Some(path) => Self::load_from(&path),
            None => {
                tracing::debug!("no home directory, using default settings");
                Ok(Self::empty())
            }
        }
    }

    /// Loads settings from an explicit path.
    ///
    /// A path that does not exist or is not a regular file yields empty
    /// settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "settings file absent");
            return Ok(Self::empty());
        }

        let text = fs::read_to_string(path).map_err(|e| ConfigError::Foreign(Box::new(e)))?;
        let source = Config::builder()
            .add_source(File::from_str(&text, PropertiesFormat))
            .build()?;
        tracing::debug!(path = %path.display(), "loaded settings file");

        Ok(Self {
            source: Some(source),
        })
    }

    /// Returns whether a settings file was loaded.
    #[must_use]
    pub fn has_file(&self) -> bool {
        self.source.is_some()
    }

    /// Looks up a raw string value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.source
            .as_ref()
            .and_then(|source| source.get_string(key).ok())
    }

    /// Looks up a value, falling back to `default`.
    #[must_use]
    pub fn lookup_or(&self, key: &str, default: &str) -> Setting<String> {
        self.get(key).map_or_else(
            || Setting::fallback(default.to_string()),
            Setting::from_file,
        )
    }

    /// The configured archive password, if any.
    #[must_use]
    pub fn password(&self) -> Option<String> {
        self.get(KEY_PASSWORD)
    }

    /// The text encoding for entry names.
    ///
    /// # Errors
    ///
    /// Returns `PpapError::UnknownCharset` if the label is not recognized.
    pub fn charset(&self) -> Result<Setting<&'static Encoding>> {
        let label = self.lookup_or(KEY_CHARSET, DEFAULT_CHARSET);
        let encoding = Encoding::for_label(label.value.trim().as_bytes()).ok_or_else(|| {
            PpapError::UnknownCharset {
                label: label.value.clone(),
            }
        })?;

        Ok(Setting {
            value: encoding,
            origin: label.origin,
        })
    }

    /// The compiled ignore pattern, if one is configured.
    ///
    /// An empty pattern means no filtering.
    ///
    /// # Errors
    ///
    /// Returns `PpapError::InvalidIgnorePattern` if the pattern does not
    /// compile.
    pub fn ignore_pattern(&self) -> Result<Option<IgnorePattern>> {
        match self.get(KEY_IGNORE) {
            Some(pattern) if !pattern.is_empty() => IgnorePattern::new(&pattern).map(Some),
            _ => Ok(None),
        }
    }
}

/// `config` file format for Java properties text.
#[derive(Debug, Clone, Copy)]
struct PropertiesFormat;

impl Format for PropertiesFormat {
    fn parse(
        &self,
        uri: Option<&String>,
        text: &str,
    ) -> std::result::Result<Map<String, Value>, Box<dyn Error + Send + Sync>> {
        let mut map = Map::new();
        PropertiesIter::new_with_encoding(text.as_bytes(), encoding_rs::UTF_8)
            .read_into(|key, value| {
                map.insert(key, Value::new(uri, value));
            })
            .map_err(|e| e.to_string())?;
        Ok(map)
    }
}

impl FileStoredFormat for PropertiesFormat {
    fn file_extensions(&self) -> &'static [&'static str] {
        &["properties"]
    }
}

/// Returns the default settings path, `<home>/.ppaprc`.
#[must_use]
pub fn default_path() -> Option<PathBuf> {
    home_dir().map(|home| home.join(SETTINGS_FILE_NAME))
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
}

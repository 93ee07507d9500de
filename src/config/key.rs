//! Encryption key resolution
//!
//! The key is looked up once at startup: first the environment variable, then
//! a field of the local JSON config file. Every failure on the file path is
//! downgraded to "no key" so the server always starts.

use std::fmt;
use std::path::{Path, PathBuf};

use super::types::KeyConfig;
use crate::error::KeyConfigError;
use crate::logger;

/// Where the resolved key came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    Environment(String),
    LocalFile(PathBuf),
    Absent,
}

impl fmt::Display for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Environment(var) => write!(f, "environment variable {var}"),
            Self::LocalFile(path) => write!(f, "local config {}", path.display()),
            Self::Absent => f.write_str("not configured"),
        }
    }
}

/// Result of key resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedKey {
    pub value: Option<String>,
    pub source: KeySource,
}

impl ResolvedKey {
    const fn absent() -> Self {
        Self {
            value: None,
            source: KeySource::Absent,
        }
    }
}

/// Resolve the key from the process environment and the local config file
pub fn resolve_from_env(settings: &KeyConfig) -> ResolvedKey {
    resolve(settings, |name| std::env::var(name).ok())
}

/// Resolve the key using `env` for variable lookups
///
/// Empty values count as unset, in the environment and in the file.
pub fn resolve(settings: &KeyConfig, env: impl Fn(&str) -> Option<String>) -> ResolvedKey {
    if let Some(value) = env(&settings.env_var).filter(|v| !v.is_empty()) {
        logger::log_info(&format!("Using {} from environment", settings.env_var));
        return ResolvedKey {
            value: Some(value),
            source: KeySource::Environment(settings.env_var.clone()),
        };
    }

    let path = Path::new(&settings.config_file);
    if !path.exists() {
        logger::log_warning(&format!(
            "{} not set. Create {} or set environment variable.",
            settings.env_var, settings.config_file
        ));
        return ResolvedKey::absent();
    }

    match load_from_file(path, &settings.field) {
        Ok(Some(value)) => {
            logger::log_info(&format!("Using local config for {}", settings.field));
            ResolvedKey {
                value: Some(value),
                source: KeySource::LocalFile(path.to_path_buf()),
            }
        }
        Ok(None) => {
            logger::log_warning(&format!(
                "{} has no usable '{}' field; encryption key endpoint disabled",
                settings.config_file, settings.field
            ));
            ResolvedKey::absent()
        }
        Err(e) => {
            logger::log_warning(&format!("Error loading local config: {e}"));
            ResolvedKey::absent()
        }
    }
}

/// Read `field` from the JSON object stored at `path`
///
/// Returns `Ok(None)` when the field is missing, null, or an empty string.
pub fn load_from_file(path: &Path, field: &str) -> Result<Option<String>, KeyConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| KeyConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let document: serde_json::Value =
        serde_json::from_str(&raw).map_err(|source| KeyConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let Some(object) = document.as_object() else {
        return Err(KeyConfigError::NotAnObject {
            path: path.to_path_buf(),
        });
    };

    match object.get(field) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) if s.is_empty() => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(KeyConfigError::InvalidField {
            path: path.to_path_buf(),
            field: field.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn settings_in(dir: &Path) -> KeyConfig {
        KeyConfig {
            config_file: dir.join("local_config.json").display().to_string(),
            ..KeyConfig::default()
        }
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_env_takes_priority_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(dir.path());
        fs::write(&settings.config_file, r#"{"VITE_ENCRYPTION_KEY": "xyz"}"#).unwrap();

        let key = resolve(&settings, |name| {
            (name == "VITE_ENCRYPTION_KEY").then(|| "abc123".to_string())
        });
        assert_eq!(key.value.as_deref(), Some("abc123"));
        assert_eq!(
            key.source,
            KeySource::Environment("VITE_ENCRYPTION_KEY".to_string())
        );
    }

    #[test]
    fn test_file_used_when_env_missing() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(dir.path());
        fs::write(&settings.config_file, r#"{"VITE_ENCRYPTION_KEY": "xyz"}"#).unwrap();

        let key = resolve(&settings, no_env);
        assert_eq!(key.value.as_deref(), Some("xyz"));
        assert!(matches!(key.source, KeySource::LocalFile(_)));
    }

    #[test]
    fn test_empty_env_falls_back_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(dir.path());
        fs::write(&settings.config_file, r#"{"VITE_ENCRYPTION_KEY": "xyz"}"#).unwrap();

        let key = resolve(&settings, |_| Some(String::new()));
        assert_eq!(key.value.as_deref(), Some("xyz"));
    }

    #[test]
    fn test_absent_when_nothing_configured() {
        let dir = tempfile::tempdir().unwrap();
        let key = resolve(&settings_in(dir.path()), no_env);
        assert_eq!(key, ResolvedKey::absent());
    }

    #[test]
    fn test_malformed_json_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(dir.path());
        fs::write(&settings.config_file, "{ not json").unwrap();

        assert_eq!(resolve(&settings, no_env), ResolvedKey::absent());
        assert!(matches!(
            load_from_file(Path::new(&settings.config_file), &settings.field),
            Err(KeyConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_non_object_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local_config.json");
        fs::write(&path, r#"["VITE_ENCRYPTION_KEY"]"#).unwrap();

        assert!(matches!(
            load_from_file(&path, "VITE_ENCRYPTION_KEY"),
            Err(KeyConfigError::NotAnObject { .. })
        ));
    }

    #[test]
    fn test_field_shapes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local_config.json");

        fs::write(&path, r#"{"OTHER": "x"}"#).unwrap();
        assert_eq!(load_from_file(&path, "VITE_ENCRYPTION_KEY").unwrap(), None);

        fs::write(&path, r#"{"VITE_ENCRYPTION_KEY": null}"#).unwrap();
        assert_eq!(load_from_file(&path, "VITE_ENCRYPTION_KEY").unwrap(), None);

        fs::write(&path, r#"{"VITE_ENCRYPTION_KEY": ""}"#).unwrap();
        assert_eq!(load_from_file(&path, "VITE_ENCRYPTION_KEY").unwrap(), None);

        fs::write(&path, r#"{"VITE_ENCRYPTION_KEY": 42}"#).unwrap();
        assert!(matches!(
            load_from_file(&path, "VITE_ENCRYPTION_KEY"),
            Err(KeyConfigError::InvalidField { .. })
        ));
    }

    #[test]
    fn test_unreadable_path_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory exists but cannot be read as a file
        assert!(matches!(
            load_from_file(dir.path(), "VITE_ENCRYPTION_KEY"),
            Err(KeyConfigError::Read { .. })
        ));
    }
}

//! Application configuration loading for CLI defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use social_hub_core::storage::{RetryPolicy, StorageSettings};

const MAX_QUOTA_BYTES: u64 = 100 * 1024 * 1024;

/// TOML-backed file configuration for social-hub defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    /// SQLite file used for persistence.
    pub database_path: Option<PathBuf>,
    /// Key prefix isolating this application's entries.
    pub namespace: Option<String>,
    /// Assumed storage capacity in bytes.
    pub quota_bytes: Option<u64>,
    /// Age in days after which loaded records are flagged stale.
    pub freshness_days: Option<u64>,
    /// Total save attempts, including the first.
    pub save_attempts: Option<u32>,
    /// Base delay between save attempts in milliseconds.
    pub retry_delay_ms: Option<u64>,
    /// Default verbosity mode.
    pub verbosity: Option<VerbositySetting>,
}

impl FileConfig {
    /// Validates config values against runtime constraints.
    pub fn validate(&self) -> Result<()> {
        if let Some(namespace) = &self.namespace
            && namespace.is_empty()
        {
            bail!("Invalid config value for `namespace`: must not be empty");
        }
        validate_range("quota_bytes", self.quota_bytes, 1, MAX_QUOTA_BYTES)?;
        validate_range("freshness_days", self.freshness_days, 1, 3650)?;
        validate_range("save_attempts", self.save_attempts.map(u64::from), 1, 10)?;
        validate_range("retry_delay_ms", self.retry_delay_ms, 0, 60_000)?;
        Ok(())
    }

    /// Overlays the configured values onto `base`.
    #[must_use]
    pub fn storage_settings(&self, base: StorageSettings) -> StorageSettings {
        let mut settings = base;
        if let Some(namespace) = &self.namespace {
            settings = settings.with_namespace(namespace.clone());
        }
        if let Some(quota) = self.quota_bytes.and_then(|q| usize::try_from(q).ok()) {
            settings = settings.with_quota_bytes(quota);
        }
        if let Some(days) = self.freshness_days {
            settings = settings.with_freshness(Duration::from_secs(days * 86_400));
        }
        if self.save_attempts.is_some() || self.retry_delay_ms.is_some() {
            let attempts = self
                .save_attempts
                .unwrap_or_else(|| settings.retry.max_attempts());
            let delay = self
                .retry_delay_ms
                .map_or_else(|| settings.retry.base_delay(), Duration::from_millis);
            settings = settings.with_retry(RetryPolicy::linear(attempts, delay));
        }
        settings
    }
}

fn validate_range(field: &str, value: Option<u64>, min: u64, max: u64) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(min..=max).contains(&value) {
        bail!("Invalid config value for `{field}`: {value}. Expected range: {min}..={max}");
    }
    Ok(())
}

/// Supported config verbosity labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbositySetting {
    Default,
    Verbose,
    Quiet,
    Debug,
}

impl VerbositySetting {
    /// Returns the stable string label for display output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Verbose => "verbose",
            Self::Quiet => "quiet",
            Self::Debug => "debug",
        }
    }

    /// Default tracing filter for this mode.
    #[must_use]
    pub fn filter(self) -> &'static str {
        match self {
            Self::Default => "info",
            Self::Verbose => "debug",
            Self::Quiet => "error",
            Self::Debug => "trace",
        }
    }
}

/// Loaded config metadata.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Resolved config path if a base directory is known.
    pub path: Option<PathBuf>,
    /// Parsed file config when a config file exists and was valid.
    pub config: Option<FileConfig>,
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/social-hub/config.toml`
/// 2. `$HOME/.config/social-hub/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Default database location, next to the config file.
#[must_use]
pub fn resolve_default_database_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("social-hub.db"))
}

fn config_dir() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg_config_home).join("social-hub"));
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(PathBuf::from(home).join(".config").join("social-hub"))
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from default path if present.
pub fn load_default_file_config() -> Result<LoadedConfig> {
    let path = resolve_default_config_path();
    let config = match path.as_deref() {
        Some(path_ref) if path_ref.exists() => Some(load_file_config(path_ref)?),
        _ => None,
    };
    Ok(LoadedConfig { path, config })
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }
        let line_no = line_index + 1;

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!("Invalid config syntax on line {line_no}: expected key = value");
        };

        let key = raw_key.trim();
        let value = raw_value.trim();

        match key {
            "database_path" => {
                let parsed = parse_string_literal(value)
                    .with_context(|| format!("Invalid `database_path` value on line {line_no}"))?;
                cfg.database_path = Some(PathBuf::from(parsed));
            }
            "namespace" => {
                let parsed = parse_string_literal(value)
                    .with_context(|| format!("Invalid `namespace` value on line {line_no}"))?;
                cfg.namespace = Some(parsed);
            }
            "quota_bytes" => {
                let parsed = parse_integer_u64(value)
                    .with_context(|| format!("Invalid `quota_bytes` value on line {line_no}"))?;
                cfg.quota_bytes = Some(parsed);
            }
            "freshness_days" => {
                let parsed = parse_integer_u64(value)
                    .with_context(|| format!("Invalid `freshness_days` value on line {line_no}"))?;
                cfg.freshness_days = Some(parsed);
            }
            "save_attempts" => {
                let parsed = parse_integer_u64(value)
                    .with_context(|| format!("Invalid `save_attempts` value on line {line_no}"))?;
                let n = u32::try_from(parsed)
                    .map_err(|_| anyhow::anyhow!("save_attempts out of range for u32"))?;
                cfg.save_attempts = Some(n);
            }
            "retry_delay_ms" => {
                let parsed = parse_integer_u64(value)
                    .with_context(|| format!("Invalid `retry_delay_ms` value on line {line_no}"))?;
                cfg.retry_delay_ms = Some(parsed);
            }
            "verbosity" => {
                let parsed = parse_string_literal(value)
                    .with_context(|| format!("Invalid `verbosity` value on line {line_no}"))?;
                cfg.verbosity = Some(parse_verbosity(&parsed).with_context(|| {
                    format!("Invalid `verbosity` value '{parsed}' on line {line_no}")
                })?);
            }
            unknown => {
                bail!("Unknown configuration key: '{unknown}' on line {line_no}");
            }
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(raw_value: &str) -> Result<String> {
    if raw_value.len() < 2 || !raw_value.starts_with('"') || !raw_value.ends_with('"') {
        bail!("Expected double-quoted string");
    }
    Ok(raw_value[1..raw_value.len() - 1].to_string())
}

fn parse_integer_u64(raw_value: &str) -> Result<u64> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected integer value");
    }
    let value = token.parse::<i128>()?;
    if value < 0 {
        bail!("Expected non-negative integer");
    }
    u64::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range for u64"))
}

fn parse_verbosity(value: &str) -> Result<VerbositySetting> {
    match value {
        "default" => Ok(VerbositySetting::Default),
        "verbose" => Ok(VerbositySetting::Verbose),
        "quiet" => Ok(VerbositySetting::Quiet),
        "debug" => Ok(VerbositySetting::Debug),
        _ => bail!("Expected one of: default, verbose, quiet, debug"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_partial_fields() {
        let cfg = parse_config_str(
            r#"
quota_bytes = 1048576
verbosity = "verbose"
"#,
        )
        .expect("partial config should parse");
        assert_eq!(cfg.quota_bytes, Some(1_048_576));
        assert_eq!(cfg.verbosity, Some(VerbositySetting::Verbose));
        assert!(cfg.database_path.is_none());
    }

    #[test]
    fn test_parse_config_strings() {
        let cfg = parse_config_str(
            r#"
database_path = "/tmp/hub.db"
namespace = "hub_" # prefix
"#,
        )
        .expect("string config should parse");
        assert_eq!(cfg.database_path, Some(PathBuf::from("/tmp/hub.db")));
        assert_eq!(cfg.namespace.as_deref(), Some("hub_"));
    }

    #[test]
    fn test_parse_config_rejects_empty_namespace() {
        let err = parse_config_str(r#"namespace = """#).expect_err("empty namespace expected");
        assert!(err.to_string().contains("namespace"));
    }

    #[test]
    fn test_parse_config_rejects_out_of_range_values() {
        for (input, field) in [
            ("quota_bytes = 0", "quota_bytes"),
            ("freshness_days = 3651", "freshness_days"),
            ("save_attempts = 11", "save_attempts"),
            ("retry_delay_ms = 60001", "retry_delay_ms"),
        ] {
            let err = parse_config_str(input).expect_err("range error expected");
            assert!(err.to_string().contains(field), "{input}: {err}");
        }
    }

    #[test]
    fn test_parse_config_rejects_trailing_tokens() {
        let err = parse_config_str("save_attempts = 4 trailing")
            .expect_err("expected trailing token error");
        assert!(err.to_string().contains("save_attempts"));
    }

    #[test]
    fn test_parse_config_rejects_unknown_keys_with_line() {
        let err = parse_config_str("\nunknown_key = 123").expect_err("unknown key error expected");
        let msg = err.to_string();
        assert!(msg.contains("Unknown configuration key"));
        assert!(msg.contains("unknown_key"));
        assert!(msg.contains("line 2"));
    }

    #[test]
    fn test_parse_config_rejects_missing_equals() {
        let err = parse_config_str("quota_bytes").expect_err("syntax error expected");
        assert!(err.to_string().contains("expected key = value"));
    }

    #[test]
    fn test_storage_settings_overlay() {
        let cfg = parse_config_str(
            r#"
namespace = "t_"
quota_bytes = 2048
freshness_days = 7
retry_delay_ms = 10
"#,
        )
        .expect("config should parse");
        let settings = cfg.storage_settings(StorageSettings::default());
        assert_eq!(settings.namespace, "t_");
        assert_eq!(settings.quota_bytes, 2048);
        assert_eq!(settings.freshness, Duration::from_secs(7 * 86_400));
        assert_eq!(settings.retry.max_attempts(), 3);
        assert_eq!(settings.retry.base_delay(), Duration::from_millis(10));
    }

    #[test]
    fn test_storage_settings_untouched_without_values() {
        let settings = FileConfig::default().storage_settings(StorageSettings::default());
        assert_eq!(settings, StorageSettings::default());
    }

    #[test]
    fn test_verbosity_labels() {
        assert_eq!(VerbositySetting::Quiet.as_str(), "quiet");
        assert_eq!(VerbositySetting::Debug.filter(), "trace");
    }
}

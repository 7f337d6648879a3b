use std::{collections::HashMap, fs, io, path::Path, time::Duration};

use anyhow::Context;
use tracing::warn;

pub const DEFAULT_BASE_URL: &str = "https://jarn-nai-backend-nextjs.vercel.app/api";
pub const DEFAULT_CONFIG_FILE: &str = "jarn.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            request_timeout_secs: 30,
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

/// Defaults, then the TOML file, then the environment.
///
/// An explicitly requested file must exist; the default `jarn.toml` is optional.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let (path, required) = match config_path {
        Some(path) => (path, true),
        None => (Path::new(DEFAULT_CONFIG_FILE), false),
    };
    match fs::read_to_string(path) {
        Ok(raw) => apply_file_overrides(&mut settings, &raw)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))?,
        Err(err) if err.kind() == io::ErrorKind::NotFound && !required => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()))
        }
    }

    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());
    Ok(settings)
}

fn apply_file_overrides(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg = toml::from_str::<HashMap<String, toml::Value>>(raw)?;

    if let Some(v) = file_cfg.get("base_url").and_then(toml::Value::as_str) {
        settings.base_url = v.to_string();
    }
    if let Some(v) = file_cfg.get("request_timeout_secs") {
        let parsed = match v {
            toml::Value::Integer(n) => u64::try_from(*n).ok(),
            toml::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        match parsed {
            Some(secs) => settings.request_timeout_secs = secs,
            None => anyhow::bail!("request_timeout_secs must be a non-negative integer"),
        }
    }
    Ok(())
}

fn apply_env_overrides(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("JARN_BASE_URL") {
        settings.base_url = v;
    }
    if let Some(v) = var("APP__BASE_URL") {
        settings.base_url = v;
    }

    if let Some(v) = var("APP__REQUEST_TIMEOUT_SECS") {
        match v.trim().parse::<u64>() {
            Ok(parsed) => settings.request_timeout_secs = parsed,
            Err(err) => warn!(value = %v, "ignoring APP__REQUEST_TIMEOUT_SECS: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        env,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    #[test]
    fn file_overrides_defaults() {
        let mut settings = Settings::default();
        apply_file_overrides(
            &mut settings,
            "base_url = \"http://127.0.0.1:3000\"\nrequest_timeout_secs = 5\n",
        )
        .expect("parse");
        assert_eq!(settings.base_url, "http://127.0.0.1:3000");
        assert_eq!(settings.request_timeout_secs, 5);
    }

    #[test]
    fn rejects_negative_timeout_in_file() {
        let mut settings = Settings::default();
        let err = apply_file_overrides(&mut settings, "request_timeout_secs = -3\n")
            .expect_err("negative timeout");
        assert!(err.to_string().contains("request_timeout_secs"));
    }

    #[test]
    fn app_prefixed_env_wins_over_short_name() {
        let mut settings = Settings::default();
        apply_env_overrides(&mut settings, |name| match name {
            "JARN_BASE_URL" => Some("http://short".to_string()),
            "APP__BASE_URL" => Some("http://prefixed".to_string()),
            "APP__REQUEST_TIMEOUT_SECS" => Some("not-a-number".to_string()),
            _ => None,
        });
        assert_eq!(settings.base_url, "http://prefixed");
        assert_eq!(settings.request_timeout_secs, 30);
    }

    #[test]
    fn explicit_missing_config_file_is_an_error() {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let path = env::temp_dir().join(format!("jarn_missing_{suffix}.toml"));
        let err = load_settings(Some(&path)).expect_err("missing file");
        assert!(err.to_string().contains("failed to read config file"));
    }

    #[test]
    fn loads_explicit_config_file() {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let path = env::temp_dir().join(format!("jarn_config_{suffix}.toml"));
        fs::write(&path, "request_timeout_secs = \"12\"\n").expect("write config");

        let settings = load_settings(Some(&path)).expect("load");
        assert_eq!(settings.request_timeout_secs, 12);

        fs::remove_file(path).expect("cleanup");
    }
}

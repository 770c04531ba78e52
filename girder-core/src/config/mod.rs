mod loader;
pub mod value;

use std::collections::HashMap;
use std::path::Path;

pub use value::{ConfigValue, FromConfigValue};

/// Environment variable selecting the active profile.
pub const PROFILE_ENV: &str = "GIRDER_PROFILE";

#[derive(Debug)]
pub enum ConfigError {
    /// The requested key is absent.
    NotFound(String),
    /// The value exists but cannot be read as the requested type.
    TypeMismatch { key: String, expected: &'static str },
    /// A config file could not be read or parsed.
    Load(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotFound(key) => write!(f, "Config key not found: {key}"),
            ConfigError::TypeMismatch { key, expected } => {
                write!(f, "Config type mismatch for '{key}': expected {expected}")
            }
            ConfigError::Load(msg) => write!(f, "Config load error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Flat, dot-keyed application configuration.
///
/// Sources, lowest priority first:
/// 1. `application.yaml`
/// 2. `application-{profile}.yaml`
/// 3. `.env.{profile}` over `.env` (neither overwrites variables already set)
/// 4. process environment, `SERVER_PREFIX` overriding `server.prefix`
///
/// The profile comes from `GIRDER_PROFILE`, else the argument.
#[derive(Debug, Clone)]
pub struct GirderConfig {
    values: HashMap<String, ConfigValue>,
    profile: String,
}

impl GirderConfig {
    /// Load from the current working directory.
    pub fn load(profile: &str) -> Result<Self, ConfigError> {
        Self::load_from_dir(Path::new("."), profile)
    }

    /// Load from the YAML and `.env` files found in `dir`.
    pub fn load_from_dir(dir: &Path, profile: &str) -> Result<Self, ConfigError> {
        let profile = std::env::var(PROFILE_ENV).unwrap_or_else(|_| profile.to_string());

        let mut values = HashMap::new();
        loader::load_yaml_file(&dir.join("application.yaml"), &mut values)?;
        loader::load_yaml_file(&dir.join(format!("application-{profile}.yaml")), &mut values)?;

        // dotenvy never overwrites, so the profile file goes first to win.
        let _ = dotenvy::from_path(dir.join(format!(".env.{profile}")));
        let _ = dotenvy::from_path(dir.join(".env"));

        for (env_key, env_val) in std::env::vars() {
            values.insert(loader::env_key_to_config_key(&env_key), ConfigValue::String(env_val));
        }

        tracing::debug!(profile = %profile, keys = values.len(), "configuration loaded");
        Ok(Self { values, profile })
    }

    /// Config from a YAML document, without files or environment overlay.
    pub fn from_yaml_str(yaml: &str, profile: &str) -> Result<Self, ConfigError> {
        let mut values = HashMap::new();
        loader::load_yaml_str(yaml, &mut values)?;
        Ok(Self {
            values,
            profile: profile.to_string(),
        })
    }

    pub fn empty() -> Self {
        Self {
            values: HashMap::new(),
            profile: "test".to_string(),
        }
    }

    pub fn set(&mut self, key: &str, value: ConfigValue) {
        self.values.insert(key.to_string(), value);
    }

    pub fn get<V: FromConfigValue>(&self, key: &str) -> Result<V, ConfigError> {
        let value = self
            .values
            .get(key)
            .ok_or_else(|| ConfigError::NotFound(key.to_string()))?;
        V::from_config_value(value, key)
    }

    /// Like [`get`](Self::get), falling back to `default` on any error.
    pub fn get_or<V: FromConfigValue>(&self, key: &str, default: V) -> V {
        self.get(key).unwrap_or(default)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }
}

use std::collections::HashMap;
use std::path::Path;

use serde_yaml::Value;

use super::value::ConfigValue;
use super::ConfigError;

/// Merge a YAML file into `values`. A missing file contributes nothing.
pub(crate) fn load_yaml_file(
    path: &Path,
    values: &mut HashMap<String, ConfigValue>,
) -> Result<(), ConfigError> {
    if !path.exists() {
        return Ok(());
    }
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Load(format!("{}: {e}", path.display())))?;
    load_yaml_str(&content, values)
        .map_err(|e| ConfigError::Load(format!("{}: {e}", path.display())))
}

pub(crate) fn load_yaml_str(
    content: &str,
    values: &mut HashMap<String, ConfigValue>,
) -> Result<(), ConfigError> {
    let yaml: Value = serde_yaml::from_str(content).map_err(|e| ConfigError::Load(e.to_string()))?;
    flatten("", &yaml, values);
    Ok(())
}

/// `DATABASE_MIGRATIONS_LOCATION` -> `database.migrations.location`
pub(crate) fn env_key_to_config_key(env_key: &str) -> String {
    env_key.to_lowercase().replace('_', ".")
}

fn yaml_key(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => format!("{other:?}"),
    }
}

fn join_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Flatten nested mappings into dot keys. Sequences are kept whole under
/// their key and also indexed (`key.0`, `key.1`, ...).
fn flatten(prefix: &str, value: &Value, out: &mut HashMap<String, ConfigValue>) {
    match value {
        Value::Mapping(map) => {
            for (k, v) in map {
                flatten(&join_key(prefix, &yaml_key(k)), v, out);
            }
        }
        Value::Sequence(items) if !prefix.is_empty() => {
            out.insert(
                prefix.to_string(),
                ConfigValue::List(items.iter().map(ConfigValue::from_yaml).collect()),
            );
            for (i, item) in items.iter().enumerate() {
                flatten(&format!("{prefix}.{i}"), item, out);
            }
        }
        Value::Sequence(_) => {}
        leaf if !prefix.is_empty() => {
            out.insert(prefix.to_string(), ConfigValue::from_yaml(leaf));
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_to_dotted_lowercase() {
        assert_eq!(env_key_to_config_key("SERVER_PREFIX"), "server.prefix");
        assert_eq!(
            env_key_to_config_key("DATABASE_MIGRATIONS_LOCATION"),
            "database.migrations.location"
        );
    }

    #[test]
    fn nested_mappings_flatten_to_dot_keys() {
        let mut values = HashMap::new();
        load_yaml_str("server:\n  prefix: /api\n  ports: [80, 443]\n", &mut values).unwrap();
        assert!(matches!(values.get("server.prefix"), Some(ConfigValue::String(s)) if s == "/api"));
        assert!(matches!(values.get("server.ports"), Some(ConfigValue::List(l)) if l.len() == 2));
        assert!(matches!(values.get("server.ports.1"), Some(ConfigValue::Integer(443))));
    }
}

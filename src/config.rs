use std::env;
use std::string::String;

/// Attribute keys converted to tags when no TAG_KEYS override is configured.
pub const DEFAULT_TAG_KEYS: &str = "name, namespace, displayName, resourceDisplayName, unit";

#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: String,
    pub api_key: String,
    pub forwarding_enabled: bool,
    // Ordered, de-duplicated; tag output follows this order.
    pub tag_keys: Vec<String>,
}

impl Config {
    pub fn load_from_env() -> Result<Config, String> {
        let endpoint =
            env::var("API_ENDPOINT").unwrap_or_else(|_| "not-configured".to_string());
        let api_key = env::var("API_KEY").unwrap_or_else(|_| "not-configured".to_string());

        // Strict boolean literal only; anything else is a configuration error.
        let forwarding_enabled = env::var("FORWARDING_ENABLED")
            .unwrap_or_else(|_| "false".to_string())
            .to_lowercase()
            .parse::<bool>()
            .map_err(|e| format!("FORWARDING_ENABLED is not a boolean literal - {}", e))?;

        let tag_keys =
            parse_tag_keys(&env::var("TAG_KEYS").unwrap_or_else(|_| DEFAULT_TAG_KEYS.to_string()));

        Ok(Config {
            endpoint,
            api_key,
            forwarding_enabled,
            tag_keys,
        })
    }
}

fn parse_tag_keys(raw: &str) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for key in raw.split(',').map(str::trim) {
        if key.is_empty() || keys.iter().any(|k| k == key) {
            continue;
        }
        keys.push(key.to_string());
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_from_env_defaults() {
        temp_env::with_vars(
            [
                ("API_ENDPOINT", None::<&str>),
                ("API_KEY", None),
                ("FORWARDING_ENABLED", None),
                ("TAG_KEYS", None),
            ],
            || {
                let config = Config::load_from_env().unwrap();
                assert_eq!(config.endpoint, "not-configured");
                assert_eq!(config.api_key, "not-configured");
                assert!(!config.forwarding_enabled);
                assert_eq!(
                    config.tag_keys,
                    vec!["name", "namespace", "displayName", "resourceDisplayName", "unit"]
                );
            },
        );
    }

    #[test]
    fn load_from_env_overrides() {
        temp_env::with_vars(
            [
                ("API_ENDPOINT", Some("https://api.moogsoft.example/metrics")),
                ("API_KEY", Some("secret")),
                ("FORWARDING_ENABLED", Some("True")),
                ("TAG_KEYS", Some("unit, namespace")),
            ],
            || {
                let config = Config::load_from_env().unwrap();
                assert_eq!(config.endpoint, "https://api.moogsoft.example/metrics");
                assert_eq!(config.api_key, "secret");
                assert!(config.forwarding_enabled);
                assert_eq!(config.tag_keys, vec!["unit", "namespace"]);
            },
        );
    }

    #[test]
    fn forwarding_flag_rejects_non_boolean_literals() {
        temp_env::with_vars([("FORWARDING_ENABLED", Some("1"))], || {
            let err = Config::load_from_env().unwrap_err();
            assert!(err.contains("FORWARDING_ENABLED"));
        });
    }

    #[test]
    fn tag_keys_are_trimmed_and_deduplicated_in_order() {
        assert_eq!(
            parse_tag_keys(" unit , name ,unit,, namespace "),
            vec!["unit", "name", "namespace"]
        );
        assert!(parse_tag_keys("  ,  ,").is_empty());
    }
}

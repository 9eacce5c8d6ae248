use resapp_core::KeyValueMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub connector: ConnectorSpec,
    pub logging: LoggingConfig,
}

/// Which connector to drive and the data the host hands it at each stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorSpec {
    /// Registered connector type (e.g. "noop", "logfile")
    #[serde(rename = "type")]
    pub connector_type: String,

    /// Connector-specific configuration
    pub config: Value,

    /// Input parameters passed to initialize
    #[serde(default)]
    pub params: KeyValueMap,

    /// Input files passed to initialize (name -> absolute path)
    #[serde(default)]
    pub files: KeyValueMap,

    /// Analytic instance metadata passed to send_instance_info
    #[serde(default)]
    pub instance_info: KeyValueMap,

    /// Sample result used by the CLI's run command
    #[serde(default)]
    pub result: ResultSpec,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultSpec {
    #[serde(default)]
    pub data: KeyValueMap,

    #[serde(default)]
    pub images: KeyValueMap,

    #[serde(default)]
    pub videos: KeyValueMap,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON formatted logs
    pub json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            connector: ConnectorSpec {
                connector_type: "noop".to_string(),
                config: serde_json::json!({}),
                params: KeyValueMap::new(),
                files: KeyValueMap::new(),
                instance_info: KeyValueMap::new(),
                result: ResultSpec::default(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                json: false,
            },
        }
    }
}

impl AppConfig {
    /// Layered load: built-in defaults, then `default.yaml` from the config
    /// directory, then environment variables (`RESAPP_LOGGING__LEVEL=debug`).
    pub fn load(config_dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let config_dir = config_dir.as_ref();
        let s = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?)
            .add_source(
                config::File::with_name(&config_dir.join("default.yaml").to_string_lossy())
                    .required(false),
            )
            .add_source(config::Environment::with_prefix("RESAPP").separator("__"))
            .build()?;

        let config = s.try_deserialize()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_connector_spec() {
        let yaml = r#"
connector:
  type: logfile
  config:
    output_dir: /var/lib/resapp/results
    file_prefix: cam01
  params:
    Access token: secret
  instance_info:
    Analytic Id: "10"
    Analytic Name: People Counter
  result:
    data:
      count: "4"
logging:
  level: debug
  json: false
"#;
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.connector.connector_type, "logfile");
        assert_eq!(config.connector.config["file_prefix"], "cam01");
        assert_eq!(config.connector.params["Access token"], "secret");
        assert_eq!(config.connector.instance_info["Analytic Id"], "10");
        assert_eq!(config.connector.result.data["count"], "4");
        assert!(config.connector.files.is_empty());
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn defaults_to_the_noop_connector() {
        let config = AppConfig::default();
        assert_eq!(config.connector.connector_type, "noop");
        assert_eq!(config.logging.level, "info");
    }
}

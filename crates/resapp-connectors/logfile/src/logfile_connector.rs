use async_trait::async_trait;
use chrono::Utc;
use resapp_core::{
    ConnectorStatus, InputFileSpec, InputParamSpec, InstanceInfoField, KeyValueMap,
    LifecycleState, ResultConnector, Stage, StageReport,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

pub const PARAM_OUTPUT_DIR: &str = "Output directory";
pub const PARAM_ACCESS_TOKEN: &str = "Access token";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogFileConfig {
    /// Directory result files are written to. The host may override it with
    /// the "Output directory" input parameter.
    pub output_dir: String,

    /// Prefix for the instance and result file names.
    pub file_prefix: String,

    /// Token the host must supply as the "Access token" parameter. When
    /// unset, authentication is a no-op.
    #[serde(default)]
    pub access_token: Option<String>,
}

impl Default for LogFileConfig {
    fn default() -> Self {
        Self {
            output_dir: "results".to_string(),
            file_prefix: "analytic".to_string(),
            access_token: None,
        }
    }
}

/// Connector that forwards analytic results to files on disk: instance
/// metadata as a JSON document, results as JSON lines. A network-free sink
/// useful for archiving and for exercising the lifecycle contract.
pub struct LogFileConnector {
    config: LogFileConfig,
    state: LifecycleState,
    output_dir: Option<PathBuf>,
    supplied_token: Option<String>,
}

impl LogFileConnector {
    pub fn new(config: LogFileConfig) -> Self {
        Self {
            config,
            state: LifecycleState::new(),
            output_dir: None,
            supplied_token: None,
        }
    }

    fn results_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}-results.jsonl", self.config.file_prefix))
    }

    fn instance_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}-instance.json", self.config.file_prefix))
    }
}

#[async_trait]
impl ResultConnector for LogFileConnector {
    async fn initialize(&mut self, params: &KeyValueMap, files: &KeyValueMap) -> StageReport {
        let dir = params
            .get(PARAM_OUTPUT_DIR)
            .cloned()
            .unwrap_or_else(|| self.config.output_dir.clone());
        let dir = PathBuf::from(dir);

        // Input files are optional for this sink, but any the host hands
        // over must at least exist.
        for (name, path) in files {
            if !Path::new(path).exists() {
                return StageReport::fail(
                    Stage::Init,
                    format!("input file '{}' not found at {}", name, path),
                );
            }
        }

        if let Err(e) = tokio::fs::create_dir_all(&dir).await {
            return StageReport::fail(
                Stage::Init,
                format!("cannot create output directory {}: {}", dir.display(), e),
            );
        }

        self.supplied_token = params.get(PARAM_ACCESS_TOKEN).cloned();
        info!(dir = %dir.display(), "log file connector initialized");
        self.output_dir = Some(dir);
        self.state.complete(Stage::Init);
        StageReport::ok(Stage::Init, "Connector plugin successfully initialized")
    }

    async fn authenticate(&mut self) -> StageReport {
        if let Some(report) = self.state.guard(Stage::Auth) {
            return report;
        }

        if let Some(expected) = &self.config.access_token {
            match &self.supplied_token {
                Some(token) if token == expected => {}
                _ => {
                    warn!("access token missing or rejected");
                    return StageReport::fail(
                        Stage::Auth,
                        format!("access token missing or rejected; supply it as the '{}' parameter", PARAM_ACCESS_TOKEN),
                    );
                }
            }
        }

        self.state.complete(Stage::Auth);
        StageReport::ok(Stage::Auth, "Successfully authenticated")
    }

    async fn send_instance_info(&mut self, info: &KeyValueMap) -> StageReport {
        if let Some(report) = self.state.guard(Stage::SendInstanceInfo) {
            return report;
        }

        for field in self.required_instance_info() {
            if field.required && !info.contains_key(&field.name) {
                return StageReport::fail(
                    Stage::SendInstanceInfo,
                    format!("missing instance info field '{}'", field.name),
                );
            }
        }

        // output_dir is set whenever the status has passed Initialized
        let dir = match &self.output_dir {
            Some(dir) => dir.clone(),
            None => {
                return StageReport::fail(Stage::SendInstanceInfo, "connector not initialized")
            }
        };
        let path = self.instance_path(&dir);
        let document = json!({
            "received_at": Utc::now().to_rfc3339(),
            "instance": info,
        });
        let body = match serde_json::to_vec_pretty(&document) {
            Ok(body) => body,
            Err(e) => {
                return StageReport::fail(
                    Stage::SendInstanceInfo,
                    format!("cannot encode instance info: {}", e),
                )
            }
        };
        if let Err(e) = tokio::fs::write(&path, body).await {
            return StageReport::fail(
                Stage::SendInstanceInfo,
                format!("cannot write {}: {}", path.display(), e),
            );
        }

        debug!(path = %path.display(), fields = info.len(), "instance info written");
        self.state.complete(Stage::SendInstanceInfo);
        StageReport::ok(
            Stage::SendInstanceInfo,
            format!("instance details written to {}", path.display()),
        )
    }

    async fn send_results(
        &mut self,
        data: &KeyValueMap,
        images: &KeyValueMap,
        videos: &KeyValueMap,
    ) -> StageReport {
        if let Some(report) = self.state.guard(Stage::SendResults) {
            return report;
        }

        let dir = match &self.output_dir {
            Some(dir) => dir.clone(),
            None => return StageReport::fail(Stage::SendResults, "connector not initialized"),
        };
        let path = self.results_path(&dir);
        let record = json!({
            "timestamp": Utc::now().to_rfc3339(),
            "data": data,
            "images": images,
            "videos": videos,
        });
        let mut line = record.to_string();
        line.push('\n');

        let file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await;
        let mut file = match file {
            Ok(file) => file,
            Err(e) => {
                return StageReport::fail(
                    Stage::SendResults,
                    format!("cannot open {}: {}", path.display(), e),
                )
            }
        };
        if let Err(e) = file.write_all(line.as_bytes()).await {
            return StageReport::fail(
                Stage::SendResults,
                format!("cannot append to {}: {}", path.display(), e),
            );
        }

        debug!(path = %path.display(), "result appended");
        self.state.complete(Stage::SendResults);
        StageReport::ok(Stage::SendResults, "Successfully sent analytic results")
    }

    fn status(&self) -> ConnectorStatus {
        self.state.status()
    }

    fn required_instance_info(&self) -> Vec<InstanceInfoField> {
        vec![
            InstanceInfoField::new("Analytic Id", "10", true),
            InstanceInfoField::new("Analytic Name", "People Counter", true),
            InstanceInfoField::new("Camera Stream", "rtsp://camera-01/stream", false),
        ]
    }

    fn required_input_files(&self) -> Vec<InputFileSpec> {
        // Everything this sink needs arrives as parameters.
        Vec::new()
    }

    fn required_input_params(&self) -> Vec<InputParamSpec> {
        vec![
            InputParamSpec::new(
                PARAM_OUTPUT_DIR,
                false,
                "Directory result files are written to; overrides the configured default",
            ),
            InputParamSpec::new(
                PARAM_ACCESS_TOKEN,
                false,
                "Token checked during authenticate; required when the connector is configured with one",
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resapp_core::ResultCode;
    use std::collections::HashMap;
    use uuid::Uuid;

    fn temp_config() -> (LogFileConfig, PathBuf) {
        let dir = std::env::temp_dir().join(format!("resapp-logfile-{}", Uuid::new_v4()));
        let config = LogFileConfig {
            output_dir: dir.to_string_lossy().into_owned(),
            file_prefix: "test".to_string(),
            access_token: None,
        };
        (config, dir)
    }

    fn kv(pairs: &[(&str, &str)]) -> KeyValueMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn required_info(connector: &LogFileConnector) -> KeyValueMap {
        connector
            .required_instance_info()
            .into_iter()
            .filter(|f| f.required)
            .map(|f| (f.name, f.example))
            .collect()
    }

    #[tokio::test]
    async fn full_lifecycle_writes_instance_and_result_files() {
        let (config, dir) = temp_config();
        let mut connector = LogFileConnector::new(config);
        let empty = kv(&[]);

        assert!(connector.initialize(&empty, &empty).await.is_ok());
        assert!(connector.authenticate().await.is_ok());
        let info = required_info(&connector);
        assert!(connector.send_instance_info(&info).await.is_ok());

        let data = kv(&[("count", "4"), ("zone", "entrance")]);
        let images = kv(&[("frame-1.jpg", "/tmp/frame-1.jpg")]);
        assert!(connector.send_results(&data, &images, &empty).await.is_ok());
        assert!(connector.send_results(&data, &empty, &empty).await.is_ok());
        assert_eq!(connector.status(), ConnectorStatus::SendingResults);

        let instance = std::fs::read_to_string(dir.join("test-instance.json")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&instance).unwrap();
        assert_eq!(parsed["instance"]["Analytic Id"], "10");

        let results = std::fs::read_to_string(dir.join("test-results.jsonl")).unwrap();
        assert_eq!(results.lines().count(), 2);
        let first: serde_json::Value = serde_json::from_str(results.lines().next().unwrap()).unwrap();
        assert_eq!(first["data"]["count"], "4");
        assert_eq!(first["images"]["frame-1.jpg"], "/tmp/frame-1.jpg");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn missing_input_file_fails_initialize_without_mutation() {
        let (config, dir) = temp_config();
        let mut connector = LogFileConnector::new(config);
        let files = kv(&[("Results schema", "/nonexistent/schema.json")]);

        let report = connector.initialize(&kv(&[]), &files).await;
        assert_eq!(report.code, ResultCode::InitFail);
        assert_eq!(connector.status(), ConnectorStatus::NotInitialized);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn wrong_access_token_fails_authenticate_without_mutation() {
        let (mut config, dir) = temp_config();
        config.access_token = Some("secret".to_string());
        let mut connector = LogFileConnector::new(config);

        let params = kv(&[(PARAM_ACCESS_TOKEN, "wrong")]);
        assert!(connector.initialize(&params, &kv(&[])).await.is_ok());
        let report = connector.authenticate().await;
        assert_eq!(report.code, ResultCode::AuthFail);
        assert_eq!(connector.status(), ConnectorStatus::Initialized);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn matching_access_token_authenticates() {
        let (mut config, dir) = temp_config();
        config.access_token = Some("secret".to_string());
        let mut connector = LogFileConnector::new(config);

        let params = kv(&[(PARAM_ACCESS_TOKEN, "secret")]);
        connector.initialize(&params, &kv(&[])).await;
        assert!(connector.authenticate().await.is_ok());
        assert_eq!(connector.status(), ConnectorStatus::AuthDone);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn missing_required_instance_field_fails_without_mutation() {
        let (config, dir) = temp_config();
        let mut connector = LogFileConnector::new(config);
        let empty = kv(&[]);

        connector.initialize(&empty, &empty).await;
        connector.authenticate().await;
        let report = connector
            .send_instance_info(&kv(&[("Analytic Id", "10")]))
            .await;
        assert_eq!(report.code, ResultCode::SendInstanceDetailsFail);
        assert!(report.message.contains("Analytic Name"));
        assert_eq!(connector.status(), ConnectorStatus::AuthDone);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn out_of_order_calls_fail_with_stage_codes() {
        let (config, dir) = temp_config();
        let mut connector = LogFileConnector::new(config);
        let empty = kv(&[]);

        assert_eq!(connector.authenticate().await.code, ResultCode::AuthFail);
        assert_eq!(
            connector.send_instance_info(&empty).await.code,
            ResultCode::SendInstanceDetailsFail
        );
        assert_eq!(
            connector.send_results(&empty, &empty, &empty).await.code,
            ResultCode::SendResultFail
        );
        assert_eq!(connector.status(), ConnectorStatus::NotInitialized);

        std::fs::remove_dir_all(&dir).ok();
    }
}

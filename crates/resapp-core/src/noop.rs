use crate::{
    ConnectorFactory, ConnectorStatus, KeyValueMap, LifecycleState, ResultConnector, Result,
    Stage, StageReport,
};
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

/// Connector with canned successes at every stage and the sample describe
/// declarations. Serves as the template for real plugins and as a stand-in
/// in tests and dry runs: it enforces the full call-ordering contract but
/// talks to no remote application.
#[derive(Debug, Default)]
pub struct NoopConnector {
    state: LifecycleState,
}

impl NoopConnector {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResultConnector for NoopConnector {
    async fn initialize(&mut self, params: &KeyValueMap, files: &KeyValueMap) -> StageReport {
        debug!(params = params.len(), files = files.len(), "noop initialize");
        self.state.complete(Stage::Init);
        StageReport::ok(Stage::Init, "Connector plugin successfully initialized")
    }

    async fn authenticate(&mut self) -> StageReport {
        if let Some(report) = self.state.guard(Stage::Auth) {
            return report;
        }
        self.state.complete(Stage::Auth);
        StageReport::ok(Stage::Auth, "Successfully authenticated")
    }

    async fn send_instance_info(&mut self, info: &KeyValueMap) -> StageReport {
        if let Some(report) = self.state.guard(Stage::SendInstanceInfo) {
            return report;
        }
        debug!(fields = info.len(), "noop instance info");
        self.state.complete(Stage::SendInstanceInfo);
        StageReport::ok(
            Stage::SendInstanceInfo,
            "Successfully sent analytic instance details",
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
        debug!(
            data = data.len(),
            images = images.len(),
            videos = videos.len(),
            "noop results"
        );
        self.state.complete(Stage::SendResults);
        StageReport::ok(Stage::SendResults, "Successfully sent analytic results")
    }

    fn status(&self) -> ConnectorStatus {
        self.state.status()
    }
}

pub struct NoopConnectorFactory;

impl ConnectorFactory for NoopConnectorFactory {
    fn name(&self) -> &str {
        "noop"
    }

    fn create(&self, _config: Value) -> Result<Box<dyn ResultConnector>> {
        Ok(Box::new(NoopConnector::new()))
    }
}

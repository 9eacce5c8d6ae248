use crate::{ConnectorStatus, Error, KeyValueMap, ResultConnector, Result, StageReport};
use tracing::{error, info};
use uuid::Uuid;

/// Drives one connector through its lifecycle on behalf of the host.
///
/// `open` runs the ordered handshake (initialize, authenticate, instance
/// info), stopping at the first failed stage; `forward` pushes successive
/// results through the opened connector. FAIL reports from the connector are
/// surfaced as [`Error::Stage`] so hosts can use `?`.
pub struct ForwardingSession {
    id: Uuid,
    connector: Box<dyn ResultConnector>,
    results_forwarded: u64,
}

/// Snapshot of a session's progress.
#[derive(Debug, Clone)]
pub struct SessionStatus {
    pub connector_status: ConnectorStatus,
    pub results_forwarded: u64,
}

impl ForwardingSession {
    pub fn new(connector: Box<dyn ResultConnector>) -> Self {
        Self {
            id: Uuid::new_v4(),
            connector,
            results_forwarded: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Run initialize, authenticate and send_instance_info in order.
    pub async fn open(
        &mut self,
        params: &KeyValueMap,
        files: &KeyValueMap,
        instance_info: &KeyValueMap,
    ) -> Result<()> {
        info!(session = %self.id, "opening connector session");

        let report = self.connector.initialize(params, files).await;
        self.check(report)?;

        let report = self.connector.authenticate().await;
        self.check(report)?;

        let report = self.connector.send_instance_info(instance_info).await;
        self.check(report)?;

        info!(session = %self.id, "connector session open");
        Ok(())
    }

    /// Forward one analytic result. Repeatable once the session is open.
    pub async fn forward(
        &mut self,
        data: &KeyValueMap,
        images: &KeyValueMap,
        videos: &KeyValueMap,
    ) -> Result<()> {
        let report = self.connector.send_results(data, images, videos).await;
        self.check(report)?;
        self.results_forwarded += 1;
        info!(
            session = %self.id,
            forwarded = self.results_forwarded,
            "result forwarded"
        );
        Ok(())
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            connector_status: self.connector.status(),
            results_forwarded: self.results_forwarded,
        }
    }

    fn check(&self, report: StageReport) -> Result<()> {
        if report.is_ok() {
            info!(session = %self.id, code = %report.code, "{}", report.message);
            Ok(())
        } else {
            error!(session = %self.id, code = %report.code, "{}", report.message);
            Err(Error::Stage {
                code: report.code,
                message: report.message,
            })
        }
    }
}

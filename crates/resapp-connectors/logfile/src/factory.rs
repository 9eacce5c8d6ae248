use crate::{LogFileConfig, LogFileConnector};
use resapp_core::{ConnectorFactory, ResultConnector, Result};
use serde_json::Value;

pub struct LogFileConnectorFactory;

impl ConnectorFactory for LogFileConnectorFactory {
    fn name(&self) -> &str {
        "logfile"
    }

    fn create(&self, config: Value) -> Result<Box<dyn ResultConnector>> {
        let config: LogFileConfig = serde_json::from_value(config)?;
        Ok(Box::new(LogFileConnector::new(config)))
    }
}

use crate::{ResultConnector, Result};
use serde_json::Value;

/// Factory trait for creating result connectors.
///
/// The construct half of the plugin ABI boundary: the host obtains an opaque
/// connector through `create` and releases it by dropping the box. One
/// connector instance is created per analytic instance.
pub trait ConnectorFactory: Send + Sync {
    /// Type identifier for this connector, e.g. "logfile".
    fn name(&self) -> &str;

    /// Create a new connector instance from plugin-specific configuration.
    fn create(&self, config: Value) -> Result<Box<dyn ResultConnector>>;
}

impl std::fmt::Debug for dyn ConnectorFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectorFactory")
            .field("name", &self.name())
            .finish()
    }
}

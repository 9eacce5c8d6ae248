mod factory;
mod logfile_connector;

pub use factory::LogFileConnectorFactory;
pub use logfile_connector::{LogFileConfig, LogFileConnector, PARAM_ACCESS_TOKEN, PARAM_OUTPUT_DIR};

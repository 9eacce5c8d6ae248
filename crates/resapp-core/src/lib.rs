mod codes;
mod connector;
mod descriptor;
mod error;
mod factory;
mod noop;
mod registry;
mod session;
mod status;

pub use codes::{ResultCode, Stage, StageReport};
pub use connector::{KeyValueMap, ResultConnector};
pub use descriptor::{
    input_files_xml, input_params_xml, instance_info_xml, InputFileSpec, InputParamSpec,
    InstanceInfoField,
};
pub use error::{Error, Result};
pub use factory::ConnectorFactory;
pub use noop::{NoopConnector, NoopConnectorFactory};
pub use registry::Registry;
pub use session::{ForwardingSession, SessionStatus};
pub use status::{ConnectorStatus, LifecycleState};

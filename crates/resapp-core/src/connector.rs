use crate::{
    ConnectorStatus, InputFileSpec, InputParamSpec, InstanceInfoField, StageReport,
};
use async_trait::async_trait;
use std::collections::HashMap;

/// String-keyed map used uniformly for input parameters, input files
/// (name to absolute path), instance info, result data and result media
/// (filename to path).
pub type KeyValueMap = HashMap<String, String>;

/// Capability trait for result connector plugins.
///
/// A connector forwards analytic results to one remote results-receiving
/// application. The host drives a fixed lifecycle per analytic instance:
/// `initialize`, `authenticate`, `send_instance_info`, then `send_results`
/// once per result. Each call returns a [`StageReport`] carrying the stage's
/// OK or FAIL code plus a message; failures are reported by value, never as
/// an error type, and must leave the connector status unchanged.
///
/// A connector instance is driven by a single caller; the `&mut self`
/// receivers enforce serialized access.
#[async_trait]
pub trait ResultConnector: Send + Sync {
    /// Performs connector setup, typically reading the supplied parameters
    /// and configuration files. `params` keys correspond to the names
    /// declared by [`required_input_params`](Self::required_input_params);
    /// `files` maps declared file names to absolute paths.
    ///
    /// No preconditions. On success the status becomes
    /// [`ConnectorStatus::Initialized`].
    async fn initialize(&mut self, params: &KeyValueMap, files: &KeyValueMap) -> StageReport;

    /// Authenticates with the remote application. Credentials should have
    /// been captured during `initialize`. Connectors for remote applications
    /// that need no authentication still implement this and advance to
    /// [`ConnectorStatus::AuthDone`].
    ///
    /// Fails with `AUTH_FAIL` when called before a successful `initialize`.
    async fn authenticate(&mut self) -> StageReport;

    /// Sends analytic instance metadata to the remote application. `info`
    /// keys correspond to the names declared by
    /// [`required_instance_info`](Self::required_instance_info).
    ///
    /// Fails with `SEND_ANALYTIC_INST_DETAILS_FAIL` unless the status is
    /// exactly [`ConnectorStatus::AuthDone`].
    async fn send_instance_info(&mut self, info: &KeyValueMap) -> StageReport;

    /// Transmits one analytic result: text fields in `data` plus produced
    /// media as filename-to-path maps. May be called repeatedly once
    /// instance info has been sent; the status stays at
    /// [`ConnectorStatus::SendingResults`].
    async fn send_results(
        &mut self,
        data: &KeyValueMap,
        images: &KeyValueMap,
        videos: &KeyValueMap,
    ) -> StageReport;

    /// Current lifecycle status.
    fn status(&self) -> ConnectorStatus;

    /// Declares the instance-info fields this connector expects. Pure; used
    /// by the host to build configuration UIs and to validate input before
    /// `send_instance_info`.
    fn required_instance_info(&self) -> Vec<InstanceInfoField> {
        vec![
            InstanceInfoField::new("Instance Id", "10", true),
            InstanceInfoField::new("Instance Name", "Test Analytic Instance", true),
        ]
    }

    /// Declares the files the host must supply to `initialize`.
    fn required_input_files(&self) -> Vec<InputFileSpec> {
        vec![
            InputFileSpec::new(
                "Configuration file",
                true,
                "Host and port details required to reach the remote application, \
                 in JSON format. A sample config.json ships with the plugin archive.",
            ),
            InputFileSpec::new(
                "SSL certificate",
                true,
                "The remote application communicates over TLS; provide its \
                 certificate file.",
            ),
        ]
    }

    /// Declares the string parameters the host must supply to `initialize`.
    fn required_input_params(&self) -> Vec<InputParamSpec> {
        vec![
            InputParamSpec::new("Host URL", true, "URL of the remote results application host"),
            InputParamSpec::new("Port number", false, "Port of the remote results application host"),
        ]
    }
}

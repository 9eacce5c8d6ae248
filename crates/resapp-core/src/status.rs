use crate::{StageReport, Stage};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a connector, tracking how far through the lifecycle it has
/// progressed. A connector holds exactly one value at a time; successful
/// stages overwrite it, failed stages leave it untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorStatus {
    #[default]
    NotInitialized,
    Initialized,
    /// An authentication attempt was made and rejected. Set by plugin
    /// implementations, never by the framework itself.
    AuthNotDone,
    AuthDone,
    /// Instance info was sent and rejected. Set by plugin implementations.
    InstanceInfoNotSent,
    InstanceInfoSent,
    SendingResults,
}

impl ConnectorStatus {
    /// Whether `stage` may be attempted from this status.
    ///
    /// The workflow is strictly linear with one looping tail:
    /// `SendingResults` permits further `SendResults` calls so a connector
    /// can forward successive results without re-running the handshake.
    pub fn permits(&self, stage: Stage) -> bool {
        match stage {
            Stage::Init => true,
            Stage::Auth => *self != ConnectorStatus::NotInitialized,
            Stage::SendInstanceInfo => *self == ConnectorStatus::AuthDone,
            Stage::SendResults => matches!(
                self,
                ConnectorStatus::InstanceInfoSent | ConnectorStatus::SendingResults
            ),
        }
    }

    /// The status a connector holds after `stage` completes successfully.
    pub fn completed(stage: Stage) -> ConnectorStatus {
        match stage {
            Stage::Init => ConnectorStatus::Initialized,
            Stage::Auth => ConnectorStatus::AuthDone,
            Stage::SendInstanceInfo => ConnectorStatus::InstanceInfoSent,
            Stage::SendResults => ConnectorStatus::SendingResults,
        }
    }
}

impl fmt::Display for ConnectorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectorStatus::NotInitialized => "not_initialized",
            ConnectorStatus::Initialized => "initialized",
            ConnectorStatus::AuthNotDone => "auth_not_done",
            ConnectorStatus::AuthDone => "auth_done",
            ConnectorStatus::InstanceInfoNotSent => "instance_info_not_sent",
            ConnectorStatus::InstanceInfoSent => "instance_info_sent",
            ConnectorStatus::SendingResults => "sending_results",
        };
        f.write_str(s)
    }
}

/// Status field plus validated transitions, for embedding in connector
/// implementations. Constructed at `NotInitialized`.
#[derive(Debug, Clone, Default)]
pub struct LifecycleState {
    status: ConnectorStatus,
}

impl LifecycleState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> ConnectorStatus {
        self.status
    }

    /// Checks that `stage` is permitted from the current status. Returns a
    /// ready-made failure report when it is not; the status is not mutated.
    pub fn guard(&self, stage: Stage) -> Option<StageReport> {
        if self.status.permits(stage) {
            None
        } else {
            Some(StageReport::fail(
                stage,
                format!(
                    "{} refused: connector status is {}",
                    stage, self.status
                ),
            ))
        }
    }

    /// Records the successful completion of `stage`.
    pub fn complete(&mut self, stage: Stage) {
        self.status = ConnectorStatus::completed(stage);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_permits_only_init() {
        let state = LifecycleState::new();
        assert_eq!(state.status(), ConnectorStatus::NotInitialized);
        assert!(state.guard(Stage::Init).is_none());
        assert!(state.guard(Stage::Auth).is_some());
        assert!(state.guard(Stage::SendInstanceInfo).is_some());
        assert!(state.guard(Stage::SendResults).is_some());
    }

    #[test]
    fn ordered_completion_walks_the_lifecycle() {
        let mut state = LifecycleState::new();
        for stage in [
            Stage::Init,
            Stage::Auth,
            Stage::SendInstanceInfo,
            Stage::SendResults,
        ] {
            assert!(state.guard(stage).is_none(), "{stage} should be permitted");
            state.complete(stage);
        }
        assert_eq!(state.status(), ConnectorStatus::SendingResults);
    }

    #[test]
    fn sending_results_is_a_repeatable_tail_state() {
        let status = ConnectorStatus::SendingResults;
        assert!(status.permits(Stage::SendResults));
        assert_eq!(
            ConnectorStatus::completed(Stage::SendResults),
            ConnectorStatus::SendingResults
        );
    }

    #[test]
    fn instance_info_requires_auth_done_exactly() {
        assert!(!ConnectorStatus::Initialized.permits(Stage::SendInstanceInfo));
        assert!(!ConnectorStatus::AuthNotDone.permits(Stage::SendInstanceInfo));
        assert!(ConnectorStatus::AuthDone.permits(Stage::SendInstanceInfo));
        assert!(!ConnectorStatus::SendingResults.permits(Stage::SendInstanceInfo));
    }

    #[test]
    fn guard_reports_the_failing_stage_code() {
        let state = LifecycleState::new();
        let report = state.guard(Stage::Auth).unwrap();
        assert_eq!(report.code, crate::ResultCode::AuthFail);
        assert!(report.message.contains("not_initialized"));
    }
}

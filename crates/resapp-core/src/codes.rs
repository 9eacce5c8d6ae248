use serde::{Deserialize, Serialize};
use std::fmt;

/// The four gated lifecycle stages, in call order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Init,
    Auth,
    SendInstanceInfo,
    SendResults,
}

impl Stage {
    pub fn ok(self) -> ResultCode {
        match self {
            Stage::Init => ResultCode::InitOk,
            Stage::Auth => ResultCode::AuthOk,
            Stage::SendInstanceInfo => ResultCode::SendInstanceDetailsOk,
            Stage::SendResults => ResultCode::SendResultOk,
        }
    }

    pub fn fail(self) -> ResultCode {
        match self {
            Stage::Init => ResultCode::InitFail,
            Stage::Auth => ResultCode::AuthFail,
            Stage::SendInstanceInfo => ResultCode::SendInstanceDetailsFail,
            Stage::SendResults => ResultCode::SendResultFail,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Init => "initialize",
            Stage::Auth => "authenticate",
            Stage::SendInstanceInfo => "send_instance_info",
            Stage::SendResults => "send_results",
        };
        f.write_str(s)
    }
}

/// Closed result enumeration returned by every lifecycle call: one OK/FAIL
/// pair per stage, no sub-codes. A sequencing violation and a remote
/// rejection carry the same FAIL code; only the message differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultCode {
    InitOk,
    InitFail,
    AuthOk,
    AuthFail,
    SendInstanceDetailsOk,
    SendInstanceDetailsFail,
    SendResultOk,
    SendResultFail,
}

impl ResultCode {
    pub fn is_ok(&self) -> bool {
        matches!(
            self,
            ResultCode::InitOk
                | ResultCode::AuthOk
                | ResultCode::SendInstanceDetailsOk
                | ResultCode::SendResultOk
        )
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResultCode::InitOk => "INIT_OK",
            ResultCode::InitFail => "INIT_FAIL",
            ResultCode::AuthOk => "AUTH_OK",
            ResultCode::AuthFail => "AUTH_FAIL",
            ResultCode::SendInstanceDetailsOk => "SEND_ANALYTIC_INST_DETAILS_OK",
            ResultCode::SendInstanceDetailsFail => "SEND_ANALYTIC_INST_DETAILS_FAIL",
            ResultCode::SendResultOk => "SEND_ANALYTIC_RESULT_OK",
            ResultCode::SendResultFail => "SEND_ANALYTIC_RESULT_FAIL",
        };
        f.write_str(s)
    }
}

/// Outcome of a lifecycle call: a result code plus a human-readable message.
/// Reported by value across the plugin boundary, never as a panic or `Err`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageReport {
    pub code: ResultCode,
    pub message: String,
}

impl StageReport {
    pub fn ok(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            code: stage.ok(),
            message: message.into(),
        }
    }

    pub fn fail(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            code: stage.fail(),
            message: message.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_stage_has_a_distinct_code_pair() {
        let stages = [
            Stage::Init,
            Stage::Auth,
            Stage::SendInstanceInfo,
            Stage::SendResults,
        ];
        let mut codes: Vec<ResultCode> = Vec::new();
        for stage in stages {
            assert!(stage.ok().is_ok());
            assert!(!stage.fail().is_ok());
            codes.push(stage.ok());
            codes.push(stage.fail());
        }
        codes.dedup();
        assert_eq!(codes.len(), 8);
    }

    #[test]
    fn report_constructors_match_stage() {
        let report = StageReport::fail(Stage::SendResults, "remote rejected payload");
        assert_eq!(report.code, ResultCode::SendResultFail);
        assert!(!report.is_ok());
        assert_eq!(report.code.to_string(), "SEND_ANALYTIC_RESULT_FAIL");
    }
}

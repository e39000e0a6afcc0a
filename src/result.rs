//! Mapping of process outcomes into the result document the host reads.

use serde::Serialize;

use crate::params::{InvocationParams, MODULE_NAME};
use crate::process::CommandResult;

/// Message attached to a nonzero dracut exit.
pub const FAILED_MSG: &str = "Dracut command failed";

/// Outcome of one dracut run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub changed: bool,
    pub stdout: String,
    pub stderr: String,
    pub failed: bool,
    /// Exit code, -1 when killed by a signal.
    pub rc: i32,
}

impl ExecutionResult {
    /// Exit status 0 means the image was (re)built; anything else is a failure.
    pub fn from_output(output: &CommandResult) -> Self {
        Self::from_parts(output.code(), &output.stdout, &output.stderr, output.success())
    }

    fn from_parts(rc: i32, stdout: &str, stderr: &str, success: bool) -> Self {
        Self {
            changed: success,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            failed: !success,
            rc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    pub module_args: InvocationParams,
}

/// JSON document printed on stdout for the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModuleResponse {
    pub changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmd: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rc: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invocation: Option<Invocation>,
}

impl ModuleResponse {
    /// Report a finished dracut run.
    pub fn from_execution(result: ExecutionResult, cmd: Vec<String>) -> Self {
        Self {
            changed: result.changed,
            failed: result.failed.then_some(true),
            msg: result.failed.then(|| FAILED_MSG.to_string()),
            cmd: Some(cmd),
            rc: Some(result.rc),
            stdout: Some(result.stdout),
            stderr: Some(result.stderr),
            ..Default::default()
        }
    }

    /// Report a failure that happened before or instead of a dracut exit.
    pub fn failure(msg: impl Into<String>) -> Self {
        Self {
            changed: false,
            failed: Some(true),
            msg: Some(msg.into()),
            stdout: Some(String::new()),
            stderr: Some(String::new()),
            ..Default::default()
        }
    }

    /// Check mode was requested; nothing ran.
    pub fn check_mode_skipped() -> Self {
        Self {
            changed: false,
            skipped: Some(true),
            msg: Some(format!(
                "remote module ({}) does not support check mode",
                MODULE_NAME
            )),
            ..Default::default()
        }
    }

    pub fn with_invocation(mut self, params: &InvocationParams) -> Self {
        self.invocation = Some(Invocation {
            module_args: params.clone(),
        });
        self
    }

    pub fn is_failed(&self) -> bool {
        self.failed.unwrap_or(false)
    }

    /// Process exit code for this response.
    pub fn exit_code(&self) -> i32 {
        if self.is_failed() {
            1
        } else {
            0
        }
    }
}

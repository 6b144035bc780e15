use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Why a command did not succeed. Kept on the single `CommandFailed` error so
/// callers can tell a missing binary from a command that ran and failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FailureCause {
    Exited { code: i32 },
    Signaled,
    Spawn { message: String },
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureCause::Exited { code } => write!(f, "exit code: {}", code),
            FailureCause::Signaled => write!(f, "terminated by signal"),
            FailureCause::Spawn { message } => write!(f, "could not start: {}", message),
        }
    }
}

#[derive(Debug, Error)]
#[error("`{command}` failed ({cause})\n{output}")]
pub struct CommandFailed {
    pub command: String,
    pub cause: FailureCause,
    pub output: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_command_cause_and_output() {
        let err = CommandFailed {
            command: "false".to_string(),
            cause: FailureCause::Exited { code: 1 },
            output: "boom".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("`false` failed"));
        assert!(text.contains("exit code: 1"));
        assert!(text.ends_with("boom"));
    }

    #[test]
    fn spawn_cause_mentions_start_failure() {
        let cause = FailureCause::Spawn {
            message: "No such file or directory".to_string(),
        };
        assert_eq!(
            cause.to_string(),
            "could not start: No such file or directory"
        );
    }
}

#![cfg(test)]

use crate::error::FailureCause;
use crate::runner::CommandResult;

pub const MISSING_BINARY: &str = "definitely-not-a-real-binary-3f9a";

pub fn ok_result(command: &str, output: &str) -> CommandResult {
    CommandResult {
        command: command.to_string(),
        succeeded: true,
        exit_code: Some(0),
        output: output.to_string(),
        error_text: None,
        cause: None,
    }
}

pub fn failed_result(command: &str, error: &str) -> CommandResult {
    CommandResult {
        command: command.to_string(),
        succeeded: false,
        exit_code: Some(1),
        output: String::new(),
        error_text: Some(error.to_string()),
        cause: Some(FailureCause::Exited { code: 1 }),
    }
}

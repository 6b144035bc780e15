use anyhow::{bail, Result};
use serde::Serialize;

use crate::config::ResolvedConfig;
use crate::runner::{CommandResult, OutputMode, ShellSpec};

pub struct RunInputs {
    pub cmd: Vec<String>,
    pub shell: bool,
    pub combined: bool,
}

#[derive(Debug, Serialize)]
pub struct RunResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shell: Option<String>,
    #[serde(flatten)]
    pub result: CommandResult,
}

pub fn shell_warning(shell: &ShellSpec) -> String {
    format!(
        "warning: command lines are passed to `{}` and are subject to shell expansion",
        shell.display()
    )
}

pub fn cmd_run(inputs: RunInputs, config: &ResolvedConfig) -> Result<RunResult> {
    if inputs.cmd.is_empty() {
        bail!("no command specified");
    }

    let mode = if inputs.combined {
        OutputMode::Combined
    } else {
        OutputMode::Stdout
    };
    let runner = config.runner(mode);

    if inputs.shell || config.shell_enabled {
        eprintln!("{}", shell_warning(runner.shell()));
        let result = runner.run(&inputs.cmd.join(" "));
        return Ok(RunResult {
            shell: Some(runner.shell().display()),
            result,
        });
    }

    Ok(RunResult {
        shell: None,
        result: runner.run_argv(&inputs.cmd),
    })
}

pub fn format_run_human(result: &RunResult) -> String {
    let text = result.result.display_text().trim_end_matches('\n');
    if result.result.succeeded {
        text.to_string()
    } else {
        format!("error: {}", text)
    }
}

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::commands::shell_warning;
use crate::config::ResolvedConfig;
use crate::runner::{Invocation, OutputMode};
use crate::transcript::Transcript;

pub const QUIT: &str = ":quit";
pub const CLEAR: &str = ":clear";

pub struct TerminalInputs {
    pub shell: bool,
    pub save: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct TerminalResult {
    pub commands_run: usize,
    pub failures: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_to: Option<PathBuf>,
    pub transcript: Transcript,
}

/// Reads command lines from `input` until EOF or `:quit`, running each with
/// stderr merged into stdout. New transcript entries are written to `out` as
/// soon as each command finishes.
pub fn cmd_terminal<R: BufRead, W: Write>(
    inputs: TerminalInputs,
    config: &ResolvedConfig,
    mut input: R,
    mut out: W,
) -> Result<TerminalResult> {
    let runner = config.runner(OutputMode::Combined);
    let use_shell = inputs.shell || config.shell_enabled;
    if use_shell {
        eprintln!("{}", shell_warning(runner.shell()));
    }

    let mut transcript = Transcript::new();
    let mut commands_run = 0;
    let mut failures = 0;

    let mut buf = Vec::new();
    loop {
        buf.clear();
        let read = input
            .read_until(b'\n', &mut buf)
            .context("failed to read command line")?;
        if read == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim();
        match line {
            "" => continue,
            QUIT => break,
            CLEAR => {
                transcript.clear();
                continue;
            }
            _ => {}
        }

        let mark = transcript.len();
        transcript.push_command(line);

        let invocation = if use_shell {
            Invocation::Shell(line.to_string())
        } else {
            Invocation::Argv(line.split_whitespace().map(str::to_string).collect())
        };
        let result = runner.execute(&invocation);
        commands_run += 1;
        if !result.succeeded {
            failures += 1;
        }
        transcript.push_result(&result);

        writeln!(out, "{}", transcript.render_from(mark)).context("failed to write output")?;
        out.flush().context("failed to write output")?;
    }

    if let Some(path) = &inputs.save {
        let mut rendered = transcript.render();
        if !transcript.is_empty() {
            rendered.push('\n');
        }
        std::fs::write(path, rendered)
            .with_context(|| format!("failed to save transcript to {}", path.display()))?;
    }

    Ok(TerminalResult {
        commands_run,
        failures,
        saved_to: inputs.save,
        transcript,
    })
}

pub fn format_terminal_human(result: &TerminalResult) -> String {
    let mut lines = Vec::new();
    if result.failures > 0 {
        lines.push(format!(
            "{} of {} commands failed",
            result.failures, result.commands_run
        ));
    }
    if let Some(path) = &result.saved_to {
        lines.push(format!("Transcript saved to {}", path.display()));
    }
    lines.join("\n")
}

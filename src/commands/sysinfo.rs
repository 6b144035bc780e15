use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::ResolvedConfig;
use crate::runner::{CommandRunner, OutputMode};

pub const LOAD_FAILED: &str = "failed to load system information";

/// One line of the summary: run `argv`, optionally keep only the first line
/// containing `needle`, and prefix the trimmed value with `label`.
#[derive(Debug, Clone)]
pub struct Probe {
    pub label: &'static str,
    pub argv: Vec<String>,
    pub needle: Option<&'static str>,
}

pub fn default_probes() -> Vec<Probe> {
    vec![
        Probe {
            label: "System: ",
            argv: vec!["uname".to_string(), "-a".to_string()],
            needle: None,
        },
        Probe {
            label: "",
            argv: vec!["lscpu".to_string()],
            needle: Some("Model name"),
        },
        Probe {
            label: "Memory: ",
            argv: vec!["free".to_string(), "-h".to_string()],
            needle: Some("Mem"),
        },
    ]
}

#[derive(Debug, Serialize)]
pub struct SysinfoResult {
    pub items: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn first_line_containing<'a>(text: &'a str, needle: &str) -> Option<&'a str> {
    text.lines().find(|line| line.contains(needle))
}

fn probe_value(runner: &CommandRunner, probe: &Probe) -> Result<String> {
    let output = runner.run_argv(&probe.argv).into_output()?;
    let value = match probe.needle {
        None => output.trim(),
        Some(needle) => first_line_containing(&output, needle)
            .with_context(|| {
                format!(
                    "no line containing {:?} in output of `{}`",
                    needle,
                    probe.argv.join(" ")
                )
            })?
            .trim(),
    };
    Ok(format!("{}{}", probe.label, value))
}

/// Runs probes in order and stops at the first failure, which replaces the
/// rest of the summary with a single error item.
pub fn collect(runner: &CommandRunner, probes: &[Probe]) -> SysinfoResult {
    let mut items = Vec::new();
    for probe in probes {
        match probe_value(runner, probe) {
            Ok(item) => items.push(item),
            Err(e) => {
                tracing::debug!(error = %format!("{:#}", e), "system probe failed");
                items.push(LOAD_FAILED.to_string());
                return SysinfoResult {
                    items,
                    error: Some(format!("{:#}", e)),
                };
            }
        }
    }
    SysinfoResult { items, error: None }
}

pub fn cmd_sysinfo(config: &ResolvedConfig) -> SysinfoResult {
    collect(&config.runner(OutputMode::Stdout), &default_probes())
}

pub fn format_sysinfo_human(result: &SysinfoResult) -> String {
    result.items.join("\n")
}

use anyhow::{bail, Result};
use serde::Serialize;

use crate::cli::NetTool;
use crate::config::{NetworkConfig, ResolvedConfig, MAX_PING_COUNT};
use crate::runner::{CommandResult, OutputMode};
use crate::transcript::Transcript;

#[derive(Debug, Serialize)]
pub struct NetResult {
    pub sections: Vec<NetSection>,
}

impl NetResult {
    pub fn has_failures(&self) -> bool {
        self.sections.iter().any(|s| !s.result.succeeded)
    }
}

#[derive(Debug, Serialize)]
pub struct NetSection {
    pub title: String,
    pub result: CommandResult,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedCommand {
    pub title: String,
    pub argv: Vec<String>,
}

/// Hosts go straight into ping's argv, so only characters that appear in
/// names and addresses are accepted, and nothing that reads as a flag.
pub fn validate_host(host: &str) -> Result<()> {
    if host.is_empty() {
        bail!("host must not be empty");
    }
    if host.starts_with('-') {
        bail!("host must not start with '-': {:?}", host);
    }
    if let Some(bad) = host
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | ':' | '_' | '%')))
    {
        bail!("invalid character {:?} in host {:?}", bad, host);
    }
    Ok(())
}

pub fn ping_argv(host: &str, count: u32) -> Vec<String> {
    let count_flag = if cfg!(windows) { "-n" } else { "-c" };
    vec![
        "ping".to_string(),
        count_flag.to_string(),
        count.to_string(),
        host.to_string(),
    ]
}

pub fn plan(tool: &NetTool, network: &NetworkConfig) -> Result<Vec<PlannedCommand>> {
    let interfaces = PlannedCommand {
        title: "Network interfaces".to_string(),
        argv: network.interfaces.clone(),
    };
    let connections = PlannedCommand {
        title: "Active connections".to_string(),
        argv: network.connections.clone(),
    };
    let ports = PlannedCommand {
        title: "Open ports".to_string(),
        argv: network.ports.clone(),
    };

    let planned = match tool {
        NetTool::Interfaces => vec![interfaces],
        NetTool::Connections => vec![connections],
        NetTool::Ports => vec![ports],
        NetTool::All => vec![interfaces, connections, ports],
        NetTool::Ping { host, count } => {
            validate_host(host)?;
            let count = count.unwrap_or(network.ping_count);
            if count == 0 || count > MAX_PING_COUNT {
                bail!("--count must be between 1 and {}", MAX_PING_COUNT);
            }
            vec![PlannedCommand {
                title: format!("Ping results: {}", host),
                argv: ping_argv(host, count),
            }]
        }
    };
    Ok(planned)
}

pub fn cmd_net(tool: Option<NetTool>, config: &ResolvedConfig) -> Result<NetResult> {
    let tool = tool.unwrap_or(NetTool::Interfaces);
    let planned = plan(&tool, &config.network)?;
    let runner = config.runner(OutputMode::Stdout);

    let sections = planned
        .into_iter()
        .map(|p| NetSection {
            result: runner.run_argv(&p.argv),
            title: p.title,
        })
        .collect();

    Ok(NetResult { sections })
}

pub fn format_net_human(result: &NetResult) -> String {
    let mut transcript = Transcript::new();
    for section in &result.sections {
        transcript.push_section(&section.title, &section.result);
    }
    transcript.render()
}

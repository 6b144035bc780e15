use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "shell-panel",
    version,
    about = "Run system utilities and show their raw output"
)]
pub struct Cli {
    #[arg(long, global = true)]
    pub json: bool,

    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Write a config file with the defaults
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
        /// Print config path and exit
        #[arg(long)]
        show_path: bool,
    },
    /// Run one command and print its output
    Run {
        /// Interpret the words as a shell command line (subject to shell expansion)
        #[arg(long)]
        shell: bool,
        /// Capture stderr interleaved with stdout
        #[arg(long)]
        combined: bool,
        /// Command and arguments to run
        #[arg(last = true, required = true)]
        cmd: Vec<String>,
    },
    /// Read command lines from stdin and keep a transcript of the session
    Terminal {
        /// Interpret each line as a shell command line (subject to shell expansion)
        #[arg(long)]
        shell: bool,
        /// Write the rendered transcript to this file on exit
        #[arg(long)]
        save: Option<String>,
    },
    /// Network diagnostics
    Net {
        #[command(subcommand)]
        tool: Option<NetTool>,
    },
    /// Show system, CPU and memory summary
    Sysinfo,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum NetTool {
    /// List network interfaces
    Interfaces,
    /// Show active connections
    Connections,
    /// Show listening ports
    Ports,
    /// Ping a host
    Ping {
        /// Host name or address
        host: String,
        /// Number of echo requests (defaults to network.ping_count)
        #[arg(long, short)]
        count: Option<u32>,
    },
    /// Run interfaces, connections and ports in turn
    All,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn run_collects_trailing_words() {
        let cli = Cli::try_parse_from(["shell-panel", "run", "--", "ls", "-la", "/tmp"]).unwrap();
        match cli.command {
            Command::Run { shell, cmd, .. } => {
                assert!(!shell);
                assert_eq!(cmd, vec!["ls", "-la", "/tmp"]);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn net_without_tool_parses() {
        let cli = Cli::try_parse_from(["shell-panel", "net"]).unwrap();
        assert!(matches!(cli.command, Command::Net { tool: None }));
    }

    #[test]
    fn ping_count_flag() {
        let cli = Cli::try_parse_from([
            "shell-panel",
            "--json",
            "net",
            "ping",
            "example.com",
            "-c",
            "2",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Command::Net {
                tool: Some(NetTool::Ping { host, count }),
            } => {
                assert_eq!(host, "example.com");
                assert_eq!(count, Some(2));
            }
            _ => panic!("expected net ping"),
        }
    }

    #[test]
    fn verbose_counts() {
        let cli = Cli::try_parse_from(["shell-panel", "-vv", "sysinfo"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}

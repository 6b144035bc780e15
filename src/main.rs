mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod paths;
mod runner;
mod testutil;
mod transcript;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Init { force, show_path } => {
            let config_path = config::default_config_path()?;
            if show_path {
                println!("{}", config_path.display());
                return Ok(());
            }
            let result = commands::cmd_init(&config_path, force)?;
            output(&result, cli.json, commands::format_init_human)?;
        }
        Command::Run {
            shell,
            combined,
            cmd,
        } => {
            let config = config::load_default_config()?;
            let inputs = commands::RunInputs {
                cmd,
                shell,
                combined,
            };
            let result = commands::cmd_run(inputs, &config)?;
            let failed = !result.result.succeeded;
            output(&result, cli.json, commands::format_run_human)?;
            if failed {
                std::process::exit(1);
            }
        }
        Command::Terminal { shell, save } => {
            let config = config::load_default_config()?;
            let inputs = commands::TerminalInputs {
                shell,
                save: save.map(|p| paths::expand_tilde(&p)),
            };
            let stdin = std::io::stdin().lock();
            let result = if cli.json {
                commands::cmd_terminal(inputs, &config, stdin, std::io::sink())?
            } else {
                commands::cmd_terminal(inputs, &config, stdin, std::io::stdout())?
            };
            output(&result, cli.json, commands::format_terminal_human)?;
        }
        Command::Net { tool } => {
            let config = config::load_default_config()?;
            let result = commands::cmd_net(tool, &config)?;
            let failed = result.has_failures();
            output(&result, cli.json, commands::format_net_human)?;
            if failed {
                std::process::exit(1);
            }
        }
        Command::Sysinfo => {
            let config = config::load_default_config()?;
            let result = commands::cmd_sysinfo(&config);
            let failed = result.error.is_some();
            output(&result, cli.json, commands::format_sysinfo_human)?;
            if let Some(err) = &result.error {
                eprintln!("error: {}", err);
            }
            if failed {
                std::process::exit(1);
            }
        }
    }
    Ok(())
}

fn output<T: serde::Serialize>(result: &T, json: bool, human_fn: fn(&T) -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        let text = human_fn(result);
        if !text.is_empty() {
            println!("{}", text);
        }
    }
    Ok(())
}

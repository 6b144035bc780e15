use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "SHELL_PANEL_LOG";

/// `SHELL_PANEL_LOG` wins when set; otherwise verbosity picks warn/debug/trace.
pub fn directives(verbose: u8, env: Option<&str>) -> String {
    if let Some(directives) = env.filter(|d| !d.trim().is_empty()) {
        return directives.to_string();
    }
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    format!("shell_panel={}", level)
}

pub fn init(verbose: u8) {
    let env = std::env::var(LOG_ENV).ok();
    let filter = EnvFilter::new(directives(verbose, env.as_deref()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

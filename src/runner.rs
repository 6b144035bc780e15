use serde::{Deserialize, Serialize};
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use tracing::debug;

use crate::error::{CommandFailed, FailureCause};

pub const NO_COMMAND: &str = "no command specified";

/// How the child's output streams are captured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// Capture stdout. Stderr is kept apart and only surfaced on failure.
    #[default]
    Stdout,
    /// Stderr is written into the same pipe as stdout, interleaved.
    Combined,
}

/// The shell used for free-text command lines: `<program> <flag> <line>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellSpec {
    pub program: String,
    pub flag: String,
}

impl Default for ShellSpec {
    fn default() -> Self {
        if cfg!(windows) {
            Self {
                program: "cmd".to_string(),
                flag: "/C".to_string(),
            }
        } else {
            Self {
                program: "sh".to_string(),
                flag: "-c".to_string(),
            }
        }
    }
}

impl ShellSpec {
    pub fn display(&self) -> String {
        format!("{} {}", self.program, self.flag)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// A command line handed to the shell. Subject to full shell expansion.
    Shell(String),
    /// A program and its arguments, run without a shell.
    Argv(Vec<String>),
}

impl Invocation {
    pub fn label(&self) -> String {
        match self {
            Invocation::Shell(line) => line.clone(),
            Invocation::Argv(argv) => argv.join(" "),
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            Invocation::Shell(line) => line.trim().is_empty(),
            Invocation::Argv(argv) => argv.first().is_none_or(|p| p.is_empty()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandResult {
    pub command: String,
    pub succeeded: bool,
    pub exit_code: Option<i32>,
    pub output: String,
    pub error_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<FailureCause>,
}

impl CommandResult {
    fn not_started(command: String, message: String) -> Self {
        Self {
            command,
            succeeded: false,
            exit_code: None,
            output: String::new(),
            error_text: Some(message.clone()),
            cause: Some(FailureCause::Spawn { message }),
        }
    }

    fn from_captured(command: String, captured: Captured) -> Self {
        let output = String::from_utf8_lossy(&captured.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&captured.stderr);

        if captured.status.success() {
            if !stderr.is_empty() {
                debug!(
                    command = %command,
                    stderr = %stderr.trim_end(),
                    "ignoring stderr of successful command"
                );
            }
            return Self {
                command,
                succeeded: true,
                exit_code: captured.status.code(),
                output,
                error_text: None,
                cause: None,
            };
        }

        let cause = match captured.status.code() {
            Some(code) => FailureCause::Exited { code },
            None => FailureCause::Signaled,
        };
        let error_text = join_streams(&output, &stderr);

        Self {
            command,
            succeeded: false,
            exit_code: captured.status.code(),
            output,
            error_text: Some(error_text),
            cause: Some(cause),
        }
    }

    /// Text a caller should display: the output on success, the error text otherwise.
    pub fn display_text(&self) -> &str {
        match &self.error_text {
            Some(text) if !self.succeeded => text,
            _ => &self.output,
        }
    }

    pub fn into_output(self) -> Result<String, CommandFailed> {
        debug_assert_eq!(
            self.succeeded,
            self.cause.is_none(),
            "a failure cause is recorded exactly when the command failed"
        );
        match self.cause {
            None => Ok(self.output),
            Some(cause) => Err(CommandFailed {
                command: self.command,
                cause,
                output: self.error_text.unwrap_or_default(),
            }),
        }
    }
}

/// Runs one command per call, blocking until the child exits. There is no
/// timeout: a child that never terminates blocks the caller indefinitely.
#[derive(Debug, Clone, Default)]
pub struct CommandRunner {
    shell: ShellSpec,
    mode: OutputMode,
    working_dir: Option<PathBuf>,
}

impl CommandRunner {
    pub fn new(shell: ShellSpec) -> Self {
        Self {
            shell,
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: OutputMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn shell(&self) -> &ShellSpec {
        &self.shell
    }

    /// Runs `command` through the shell.
    pub fn run(&self, command: &str) -> CommandResult {
        self.execute(&Invocation::Shell(command.to_string()))
    }

    pub fn run_argv<S: AsRef<str>>(&self, argv: &[S]) -> CommandResult {
        let argv = argv.iter().map(|s| s.as_ref().to_string()).collect();
        self.execute(&Invocation::Argv(argv))
    }

    pub fn execute(&self, invocation: &Invocation) -> CommandResult {
        let label = invocation.label();
        if invocation.is_empty() {
            return CommandResult::not_started(label, NO_COMMAND.to_string());
        }

        let cmd = self.build(invocation);
        debug!(command = %label, mode = ?self.mode, "spawning");

        let captured = match self.mode {
            OutputMode::Stdout => capture_separate(cmd),
            OutputMode::Combined => capture_combined(cmd),
        };

        match captured {
            Ok(captured) => {
                debug!(command = %label, code = ?captured.status.code(), "exited");
                CommandResult::from_captured(label, captured)
            }
            Err(e) => {
                debug!(command = %label, error = %e, "failed to start");
                let message = match invocation {
                    Invocation::Shell(_) => {
                        format!("failed to start shell {}: {}", self.shell.program, e)
                    }
                    Invocation::Argv(_) => format!("failed to run {}: {}", label, e),
                };
                CommandResult::not_started(label, message)
            }
        }
    }

    fn build(&self, invocation: &Invocation) -> Command {
        let mut cmd = match invocation {
            Invocation::Shell(line) => {
                let mut c = Command::new(&self.shell.program);
                c.arg(&self.shell.flag).arg(line);
                c
            }
            Invocation::Argv(argv) => {
                let mut c = Command::new(&argv[0]);
                c.args(&argv[1..]);
                c
            }
        };
        cmd.stdin(Stdio::null());
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

struct Captured {
    status: ExitStatus,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

fn capture_separate(mut cmd: Command) -> io::Result<Captured> {
    let output = cmd.stdout(Stdio::piped()).stderr(Stdio::piped()).output()?;
    Ok(Captured {
        status: output.status,
        stdout: output.stdout,
        stderr: output.stderr,
    })
}

fn capture_combined(mut cmd: Command) -> io::Result<Captured> {
    let (mut reader, writer) = io::pipe()?;
    cmd.stdout(writer.try_clone()?).stderr(writer);
    let mut child = cmd.spawn()?;
    // `cmd` holds the parent's write ends; the reader sees EOF only once they are closed.
    drop(cmd);

    let mut stdout = Vec::new();
    let read = reader.read_to_end(&mut stdout);
    let status = child.wait()?;
    read?;

    Ok(Captured {
        status,
        stdout,
        stderr: Vec::new(),
    })
}

fn join_streams(stdout: &str, stderr: &str) -> String {
    if stderr.is_empty() {
        stdout.to_string()
    } else if stdout.is_empty() {
        stderr.to_string()
    } else if stdout.ends_with('\n') {
        format!("{}{}", stdout, stderr)
    } else {
        format!("{}\n{}", stdout, stderr)
    }
}

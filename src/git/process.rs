//! Bounded subprocess execution and outcome classification
//!
//! Every external invocation goes through the `CommandRunner` seam so the
//! rest of the crate never touches process primitives directly, and tests
//! can substitute a scripted fake.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use tracing::debug;
use wait_timeout::ChildExt;

use super::error::{GitError, Result};

/// Bounded wait for every invocation; exceeding it is fatal, not retried.
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for collecting output from the pipe reader threads
const OUTPUT_COLLECTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Classified outcome of one external invocation.
///
/// Exit code 0 maps to `Success` (trimmed stdout), 1 to `Failed` (trimmed
/// stdout) and 128 to `Fatal` (trimmed stderr). No other outcome is
/// representable; anything else surfaces as `GitError::UnexpectedExit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Success(String),
    Failed(String),
    Fatal(String),
}

impl CommandOutcome {
    /// Unwrap the `Success` text, or raise the typed error for the outcome.
    pub fn require_success(self, command: &str) -> Result<String> {
        match self {
            CommandOutcome::Success(output) => Ok(output),
            CommandOutcome::Failed(output) => Err(GitError::CommandFailed {
                command: command.to_string(),
                output,
            }),
            CommandOutcome::Fatal(output) => Err(GitError::Fatal {
                command: command.to_string(),
                output,
            }),
        }
    }
}

/// The narrow process seam the driver runs on.
pub trait CommandRunner {
    fn run(&self, args: &[&str], cwd: &Path) -> Result<CommandOutcome>;
}

/// Real runner: spawns the git binary with null stdin and piped outputs.
pub struct GitProcess {
    program: PathBuf,
}

impl GitProcess {
    /// Locate the git binary on PATH.
    pub fn new() -> Result<Self> {
        let program = which::which("git")?;
        Ok(Self { program })
    }

    /// Run an arbitrary program through the same execution contract.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run_with_timeout(
        &self,
        args: &[&str],
        cwd: &Path,
        timeout: Duration,
    ) -> Result<CommandOutcome> {
        let command = args.join(" ");
        debug!(command = %command, cwd = %cwd.display(), "running");

        // Null stdin doubles as the empty input stream mktree expects.
        let mut child = Command::new(&self.program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| GitError::Spawn {
                command: command.clone(),
                source,
            })?;

        // Drain the pipes concurrently with waiting: a child that fills a
        // pipe buffer before we read it would otherwise block forever.
        let stdout_rx = drain(child.stdout.take());
        let stderr_rx = drain(child.stderr.take());

        let status = child
            .wait_timeout(timeout)
            .map_err(|source| GitError::Spawn {
                command: command.clone(),
                source,
            })?;

        let Some(status) = status else {
            kill(&mut child);
            return Err(GitError::Timeout {
                command,
                timeout: timeout.as_secs(),
            });
        };

        let stdout = collect(stdout_rx);
        let stderr = collect(stderr_rx);

        match status.code() {
            Some(0) => Ok(CommandOutcome::Success(stdout)),
            Some(1) => Ok(CommandOutcome::Failed(stdout)),
            Some(128) => Ok(CommandOutcome::Fatal(stderr)),
            code => Err(GitError::UnexpectedExit {
                command,
                code,
                stdout,
                stderr,
            }),
        }
    }
}

impl CommandRunner for GitProcess {
    fn run(&self, args: &[&str], cwd: &Path) -> Result<CommandOutcome> {
        self.run_with_timeout(args, cwd, COMMAND_TIMEOUT)
    }
}

fn drain<R: Read + Send + 'static>(stream: Option<R>) -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    match stream {
        Some(mut stream) => {
            thread::spawn(move || {
                let mut buf = Vec::new();
                let _ = stream.read_to_end(&mut buf);
                let _ = tx.send(String::from_utf8_lossy(&buf).trim().to_string());
            });
        }
        None => {
            let _ = tx.send(String::new());
        }
    }
    rx
}

fn collect(rx: mpsc::Receiver<String>) -> String {
    rx.recv_timeout(OUTPUT_COLLECTION_TIMEOUT).unwrap_or_default()
}

fn kill(child: &mut Child) {
    // The process may already have exited; reap it either way.
    let _ = child.kill();
    let _ = child.wait();
}

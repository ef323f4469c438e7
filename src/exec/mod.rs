//! External command execution.
//!
//! Every subprocess airsweep runs — version queries, package-manager
//! queries, registry utility calls, vendor uninstallers — goes through the
//! [`CommandRunner`] trait so discovery and removal logic can be exercised
//! in tests without touching a real system. [`SystemRunner`] is the
//! production implementation; [`mock::ScriptedRunner`] is the test double.

pub mod mock;

use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use crate::error::{Result, SweepError};

/// Result of executing an external command.
#[derive(Debug, Clone, Default)]
pub struct ExecResult {
    /// Exit code (None if killed by signal or timeout).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Whether the command succeeded (exit code 0).
    pub success: bool,

    /// Whether the command was killed after exceeding its budget.
    pub timed_out: bool,
}

impl ExecResult {
    /// Create a success result with the given output.
    pub fn ok(stdout: &str) -> Self {
        Self {
            exit_code: Some(0),
            stdout: stdout.to_string(),
            success: true,
            ..Default::default()
        }
    }

    /// Create a success result whose output went to stderr.
    ///
    /// `java -version` is the usual offender.
    pub fn ok_stderr(stderr: &str) -> Self {
        Self {
            exit_code: Some(0),
            stderr: stderr.to_string(),
            success: true,
            ..Default::default()
        }
    }

    /// Create a failure result with the given exit code.
    pub fn failed(code: i32) -> Self {
        Self {
            exit_code: Some(code),
            ..Default::default()
        }
    }

    /// Create a timed-out result.
    pub fn expired() -> Self {
        Self {
            timed_out: true,
            ..Default::default()
        }
    }

    /// First non-empty line of stdout, falling back to stderr.
    ///
    /// Some tools print their banner to stderr; take whichever stream has
    /// content first.
    pub fn first_line(&self) -> Option<&str> {
        self.stdout
            .lines()
            .chain(self.stderr.lines())
            .map(str::trim)
            .find(|l| !l.is_empty())
    }
}

/// Interface for running external commands.
pub trait CommandRunner {
    /// Run `program` with `args`, capturing output.
    ///
    /// A launch failure is an error; a non-zero exit is a normal
    /// [`ExecResult`] with `success == false`. When `timeout` elapses the
    /// child is killed and the result has `timed_out` set.
    fn run(&self, program: &str, args: &[&str], timeout: Option<Duration>) -> Result<ExecResult>;

    /// Run a command and report only whether it exited successfully.
    fn run_ok(&self, program: &str, args: &[&str]) -> bool {
        self.run(program, args, None)
            .map(|r| r.success)
            .unwrap_or(false)
    }
}

/// Production runner backed by `std::process::Command`.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

/// Render a command line for error messages.
fn render(program: &str, args: &[&str]) -> String {
    let mut line = String::from(program);
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str], timeout: Option<Duration>) -> Result<ExecResult> {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|_| SweepError::CommandFailed {
            command: render(program, args),
            code: None,
        })?;

        // Drain the pipes on reader threads so a chatty child can't fill
        // the pipe buffer and block before the deadline check runs.
        let stdout_handle = child.stdout.take().map(|out| {
            std::thread::spawn(move || {
                use std::io::Read;
                let mut out = out;
                let mut buf = Vec::new();
                let _ = out.read_to_end(&mut buf);
                String::from_utf8_lossy(&buf).to_string()
            })
        });
        let stderr_handle = child.stderr.take().map(|err| {
            std::thread::spawn(move || {
                use std::io::Read;
                let mut err = err;
                let mut buf = Vec::new();
                let _ = err.read_to_end(&mut buf);
                String::from_utf8_lossy(&buf).to_string()
            })
        });

        let deadline = timeout.map(|t| Instant::now() + t);
        let status = loop {
            match child.try_wait()? {
                Some(status) => break Some(status),
                None => {
                    if let Some(deadline) = deadline {
                        if Instant::now() >= deadline {
                            let _ = child.kill();
                            let _ = child.wait();
                            break None;
                        }
                    }
                    std::thread::sleep(Duration::from_millis(25));
                }
            }
        };

        let stdout = stdout_handle
            .and_then(|h| h.join().ok())
            .unwrap_or_default();
        let stderr = stderr_handle
            .and_then(|h| h.join().ok())
            .unwrap_or_default();

        match status {
            Some(status) => Ok(ExecResult {
                exit_code: status.code(),
                success: status.success(),
                stdout,
                stderr,
                timed_out: false,
            }),
            None => {
                tracing::warn!(command = %render(program, args), "command timed out");
                Ok(ExecResult {
                    exit_code: None,
                    success: false,
                    stdout,
                    stderr,
                    timed_out: true,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_successful_command() {
        let runner = SystemRunner::new();
        let cmd = if cfg!(target_os = "windows") {
            ("cmd", vec!["/C", "echo hello"])
        } else {
            ("echo", vec!["hello"])
        };

        let result = runner.run(cmd.0, &cmd.1, None).unwrap();

        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert!(result.stdout.contains("hello"));
    }

    #[test]
    fn run_failing_command_is_not_an_error() {
        let runner = SystemRunner::new();
        let cmd = if cfg!(target_os = "windows") {
            ("cmd", vec!["/C", "exit 3"])
        } else {
            ("sh", vec!["-c", "exit 3"])
        };

        let result = runner.run(cmd.0, &cmd.1, None).unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
    }

    #[test]
    fn run_missing_program_is_an_error() {
        let runner = SystemRunner::new();
        let result = runner.run("definitely-not-a-real-binary-xyz", &[], None);
        assert!(matches!(result, Err(SweepError::CommandFailed { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn run_kills_command_past_deadline() {
        let runner = SystemRunner::new();
        let start = Instant::now();
        let result = runner
            .run("sleep", &["30"], Some(Duration::from_millis(200)))
            .unwrap();

        assert!(result.timed_out);
        assert!(!result.success);
        assert!(start.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn run_ok_reports_exit_status() {
        let runner = SystemRunner::new();
        if cfg!(target_os = "windows") {
            assert!(runner.run_ok("cmd", &["/C", "exit 0"]));
            assert!(!runner.run_ok("cmd", &["/C", "exit 1"]));
        } else {
            assert!(runner.run_ok("true", &[]));
            assert!(!runner.run_ok("false", &[]));
        }
    }

    #[test]
    fn first_line_prefers_stdout() {
        let result = ExecResult {
            stdout: "\nPython 3.11.4\n".into(),
            stderr: "noise".into(),
            ..Default::default()
        };
        assert_eq!(result.first_line(), Some("Python 3.11.4"));
    }

    #[test]
    fn first_line_falls_back_to_stderr() {
        let result = ExecResult::ok_stderr("openjdk version \"17.0.2\" 2022-01-18\nmore");
        assert_eq!(
            result.first_line(),
            Some("openjdk version \"17.0.2\" 2022-01-18")
        );
    }

    #[test]
    fn first_line_empty_output_is_none() {
        assert_eq!(ExecResult::failed(1).first_line(), None);
    }
}

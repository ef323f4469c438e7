//! Scripted command runner for tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use super::{CommandRunner, ExecResult};
use crate::error::{Result, SweepError};

/// A [`CommandRunner`] that replays canned results.
///
/// Commands are keyed by the rendered command line (`program` followed by
/// each argument, space-separated). Unscripted commands fail the same way a
/// missing binary does, and every invocation is recorded for assertion.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    responses: HashMap<String, ExecResult>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a result for a command line.
    pub fn script(mut self, command_line: &str, result: ExecResult) -> Self {
        self.responses.insert(command_line.to_string(), result);
        self
    }

    /// Command lines observed so far, in invocation order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Whether a command line was invoked.
    pub fn invoked(&self, command_line: &str) -> bool {
        self.calls().iter().any(|c| c == command_line)
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, program: &str, args: &[&str], _timeout: Option<Duration>) -> Result<ExecResult> {
        let mut line = String::from(program);
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(line.clone());
        }
        match self.responses.get(&line) {
            Some(result) => Ok(result.clone()),
            None => Err(SweepError::CommandFailed {
                command: line,
                code: None,
            }),
        }
    }
}

//! External command execution.
//!
//! `Command` is a plain value (program name plus arguments) so pages can
//! display exactly what will run before anything runs. Resolution of the
//! program name to a concrete path happens inside the runner, which is a
//! trait so the wizard can be driven by a recording fake in tests.

use crate::errors::RollbackError;
use std::borrow::Cow;
use std::env;
use std::fmt;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::process::{self, Stdio};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub program: String,
    pub args: Vec<String>,
}

impl Command {
    pub fn new<I, S>(program: &str, args: I) -> Command
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Command {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", shell_quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", shell_quote(arg))?;
        }
        Ok(())
    }
}

/// Quote a string for display in a shell-like command line.
fn shell_quote(s: &str) -> Cow<'_, str> {
    let safe = !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/' | '@' | ':'));
    if safe {
        Cow::Borrowed(s)
    } else {
        Cow::Owned(format!("'{}'", s.replace('\'', "'\\''")))
    }
}

pub trait CommandRunner {
    /// Run a command to completion and return its captured stdout.
    fn run(&self, command: &Command) -> Result<String, RollbackError>;

    /// Launch a command without waiting for it (used only for reboot).
    fn spawn_detached(&self, command: &Command) -> Result<(), RollbackError>;
}

/// Runner backed by real processes, resolving programs on PATH.
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &Command) -> Result<String, RollbackError> {
        let program = resolve(&command.program)?;
        log::info!("running: {}", command);
        let output = process::Command::new(program)
            .args(&command.args)
            .output()
            .map_err(|source| RollbackError::LaunchFailed {
                command: command.to_string(),
                source,
            })?;
        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim_end().to_string();
            log::error!("command failed ({}): {}", output.status, command);
            Err(RollbackError::CommandFailed {
                command: command.to_string(),
                stderr,
            })
        }
    }

    fn spawn_detached(&self, command: &Command) -> Result<(), RollbackError> {
        let program = resolve(&command.program)?;
        log::info!("launching detached: {}", command);
        process::Command::new(program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| RollbackError::LaunchFailed {
                command: command.to_string(),
                source,
            })?;
        Ok(())
    }
}

/// Resolve a program name against PATH. Names containing a slash are
/// taken as paths and only checked for existence.
fn resolve(program: &str) -> Result<PathBuf, RollbackError> {
    if program.contains('/') {
        let path = PathBuf::from(program);
        if is_executable(&path) {
            return Ok(path);
        }
        return Err(RollbackError::ExecutableNotFound(program.to_string()));
    }
    if let Some(paths) = env::var_os("PATH") {
        for dir in env::split_paths(&paths) {
            let candidate = dir.join(program);
            if is_executable(&candidate) {
                return Ok(candidate);
            }
        }
    }
    Err(RollbackError::ExecutableNotFound(program.to_string()))
}

fn is_executable(path: &std::path::Path) -> bool {
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

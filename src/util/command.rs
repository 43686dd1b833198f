use std::process::Command;

use tracing::info;

use crate::error::{BorgvaultError, Result};
use crate::types::RunMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Inherit stdio so the external tool talks to the terminal.
    Stream,
    /// Capture stdout and stderr silently.
    Capture,
}

#[derive(Debug, Clone)]
pub struct ExecOutcome {
    pub code: i32,
    pub stdout: String,
}

impl ExecOutcome {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

pub fn describe_command(cmd: &Command) -> String {
    let program = cmd.get_program().to_string_lossy();
    let args: Vec<String> = cmd
        .get_args()
        .map(|a| a.to_string_lossy().to_string())
        .collect();
    match cmd.get_current_dir() {
        Some(dir) => format!("{} {} (in {})", program, args.join(" "), dir.display()),
        None => format!("{} {}", program, args.join(" ")),
    }
}

/// Runs one external command. The diagnostic line is emitted in every mode;
/// retry policy belongs to callers.
pub fn run_command(cmd: &mut Command, output: OutputMode, run_mode: RunMode) -> Result<ExecOutcome> {
    info!("calling {}", describe_command(cmd));
    if run_mode.dry_run {
        return Ok(ExecOutcome {
            code: 0,
            stdout: String::new(),
        });
    }
    match output {
        OutputMode::Stream => {
            let status = cmd.status().map_err(|e| {
                BorgvaultError::message(format!(
                    "{}: {}",
                    cmd.get_program().to_string_lossy(),
                    e
                ))
            })?;
            Ok(ExecOutcome {
                code: status.code().unwrap_or(1),
                stdout: String::new(),
            })
        }
        OutputMode::Capture => {
            let out = cmd.output().map_err(|e| {
                BorgvaultError::message(format!(
                    "{}: {}",
                    cmd.get_program().to_string_lossy(),
                    e
                ))
            })?;
            Ok(ExecOutcome {
                code: out.status.code().unwrap_or(1),
                stdout: String::from_utf8_lossy(&out.stdout).to_string(),
            })
        }
    }
}

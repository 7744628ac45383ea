//! External process invocation for the release drivers.

use std::process::Command;

use colored::Colorize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecError {
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("command failed ({status}): {command}\n{stderr}")]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },
}

/// Process runner configured once at startup and passed explicitly to every
/// driver; there is no global verbosity or platform state.
#[derive(Debug, Clone, Copy)]
pub struct Shell {
    verbose: bool,
}

impl Shell {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Run `program` with `args`, returning trimmed stdout. Non-zero exit
    /// becomes [`ExecError::Failed`] with the captured stderr; nothing is
    /// retried here.
    pub fn run(&self, program: &str, args: &[&str]) -> Result<String, ExecError> {
        let command_line = render(program, args);
        if self.verbose {
            eprintln!("{}", command_line.dimmed());
        }

        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| ExecError::Spawn {
                program: program.to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(ExecError::Failed {
                command: command_line,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

fn render(program: &str, args: &[&str]) -> String {
    let mut line = String::from(program);
    for arg in args {
        line.push(' ');
        if arg.contains(' ') {
            line.push('"');
            line.push_str(arg);
            line.push('"');
        } else {
            line.push_str(arg);
        }
    }
    line
}

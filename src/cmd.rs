//! Command execution abstraction.
//!
//! Trait-based wrapper over `std::process::Command` so the BIRD reload path
//! can be unit-tested with a mock instead of a live daemon.

use anyhow::Result;
use std::process::{Command, Stdio};

#[cfg(test)]
use mockall::automock;

/// Output from a finished command.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
}

/// Runs external commands. Mockable in tests.
#[cfg_attr(test, automock)]
pub trait CommandRunner: Send + Sync {
    fn run(&self, cmd: &str, args: &[String]) -> Result<CommandOutput>;
}

/// Production runner using real system commands.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, cmd: &str, args: &[String]) -> Result<CommandOutput> {
        let output = Command::new(cmd)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
        })
    }
}

/// Convert a slice of `&str` args to the owned form the trait takes.
pub fn args_of(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

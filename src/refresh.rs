//! Asset refresh hosts
//!
//! After files land in the project the editor has to re-import them. Outside
//! Unity there is nothing to notify unless the project configures a command
//! (for example a batch-mode editor invocation).

use std::path::Path;
use std::process::Command;

use crate::error::{DeskyError, Result};

/// Notifies the host that installed files changed
pub trait AssetRefresher {
    fn refresh(&self, project_root: &Path) -> Result<()>;
}

/// Used when no refresh command is configured
pub struct NoopRefresher;

impl AssetRefresher for NoopRefresher {
    fn refresh(&self, project_root: &Path) -> Result<()> {
        tracing::debug!(project = %project_root.display(), "no refresh command configured");
        Ok(())
    }
}

/// Runs a shell command in the project root
pub struct CommandRefresher {
    command: String,
}

impl CommandRefresher {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    fn shell(&self) -> Command {
        if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", self.command.as_str()]);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.args(["-c", self.command.as_str()]);
            cmd
        }
    }
}

impl AssetRefresher for CommandRefresher {
    fn refresh(&self, project_root: &Path) -> Result<()> {
        tracing::info!(command = %self.command, "running asset refresh");

        let output = self
            .shell()
            .current_dir(project_root)
            .env("DESKYMODE_PROJECT", project_root)
            .output()
            .map_err(|e| DeskyError::RefreshFailed {
                command: self.command.clone(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = if stderr.trim().is_empty() {
                output.status.to_string()
            } else {
                format!("{}: {}", output.status, stderr.trim())
            };
            return Err(DeskyError::RefreshFailed {
                command: self.command.clone(),
                reason,
            });
        }

        Ok(())
    }
}

/// Pick the refresher for an optional configured command
pub fn from_command(command: Option<&str>) -> Box<dyn AssetRefresher> {
    match command {
        Some(command) if !command.trim().is_empty() => Box::new(CommandRefresher::new(command)),
        _ => Box::new(NoopRefresher),
    }
}

/// Counts refreshes instead of running anything
#[cfg(test)]
#[derive(Default)]
pub struct CountingRefresher {
    count: std::cell::Cell<usize>,
}

#[cfg(test)]
impl CountingRefresher {
    pub fn count(&self) -> usize {
        self.count.get()
    }
}

#[cfg(test)]
impl AssetRefresher for CountingRefresher {
    fn refresh(&self, _project_root: &Path) -> Result<()> {
        self.count.set(self.count.get() + 1);
        Ok(())
    }
}

//! Command-based hooks that execute shell commands.

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use log::debug;
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command;

use super::{Hook, HookEvent};

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Runs a shell command in the project root.
///
/// The command sees `PLUGSYNC_HOOK_CLASS` and `PLUGSYNC_HOOK_EVENT` in its
/// environment. A non-zero exit status or a timeout fails the hook.
pub struct CommandHook {
    command: String,
    working_dir: PathBuf,
    timeout_secs: u64,
}

impl CommandHook {
    pub fn new(command: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            working_dir: working_dir.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    fn shell(&self) -> Command {
        #[cfg(windows)]
        {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(&self.command);
            cmd
        }
        #[cfg(not(windows))]
        {
            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(&self.command);
            cmd
        }
    }
}

#[async_trait]
impl Hook for CommandHook {
    async fn call(&self, class: &str, event: HookEvent) -> Result<()> {
        debug!("Executing hook command for {}::{}: {}", class, event, self.command);

        let mut child = self
            .shell()
            .current_dir(&self.working_dir)
            .env("PLUGSYNC_HOOK_CLASS", class)
            .env("PLUGSYNC_HOOK_EVENT", event.method_name())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to start hook command `{}`", self.command))?;

        let status = match tokio::time::timeout(
            Duration::from_secs(self.timeout_secs),
            child.wait(),
        )
        .await
        {
            Ok(status) => status?,
            Err(_) => bail!(
                "Hook command `{}` timed out after {}s",
                self.command,
                self.timeout_secs
            ),
        };

        if !status.success() {
            bail!("Hook command `{}` exited with {}", self.command, status);
        }
        Ok(())
    }
}

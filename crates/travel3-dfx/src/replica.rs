//! Supervised local replica.
//!
//! `dfx start` runs as a child of this process instead of daemonizing, so
//! the replica cannot outlive a deployment: [`Replica::stop`] shuts it down
//! on the normal path and the child is killed on drop otherwise.

use std::process::Stdio;
use std::time::Duration;

use crate::context::{DfxConfig, DfxContext};
use crate::error::DfxError;

/// Replica startup settings.
#[derive(Debug, Clone)]
pub struct ReplicaConfig {
    /// Wipe `.dfx` and start from empty state.
    pub clean: bool,
    /// Health polls before giving up (default: 30).
    pub max_attempts: u32,
    /// Delay between polls (default: 1s).
    pub poll_interval: Duration,
}

impl Default for ReplicaConfig {
    fn default() -> Self {
        Self {
            clean: false,
            max_attempts: 30,
            poll_interval: Duration::from_secs(1),
        }
    }
}

/// A running `dfx start` child.
pub struct Replica {
    child: tokio::process::Child,
    dfx: DfxContext,
}

impl Replica {
    /// Start the replica and wait until `dfx ping` answers.
    pub async fn start(dfx: &DfxConfig, config: &ReplicaConfig) -> Result<Self, DfxError> {
        let ctx = DfxContext::new(DfxConfig {
            dry_run: false,
            ..dfx.clone()
        });

        if config.clean {
            // A replica left over from an earlier run holds the state directory.
            if let Err(e) = ctx.stop().await {
                tracing::debug!(error = %e, "no running replica to stop");
            }
            let state_dir = dfx.project_root.join(".dfx");
            match tokio::fs::remove_dir_all(&state_dir).await {
                Ok(()) => tracing::info!(path = %state_dir.display(), "removed replica state"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(DfxError::Io(e)),
            }
        }

        let mut args = vec!["start"];
        if config.clean {
            args.push("--clean");
        }

        let mut child = tokio::process::Command::new(&dfx.binary)
            .args(&args)
            .current_dir(&dfx.project_root)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => DfxError::NotFound(dfx.binary.clone()),
                _ => DfxError::Io(e),
            })?;

        tracing::info!(pid = ?child.id(), clean = config.clean, "replica starting");

        for attempt in 1..=config.max_attempts {
            if let Some(status) = child.try_wait()? {
                return Err(DfxError::Replica(format!(
                    "dfx start exited before the replica was ready ({status})"
                )));
            }
            if ctx.ping().await {
                tracing::info!(attempt, "replica ready");
                return Ok(Self { child, dfx: ctx });
            }
            tracing::debug!(attempt, "replica not ready yet");
            tokio::time::sleep(config.poll_interval).await;
        }

        if let Err(e) = child.kill().await {
            tracing::warn!(error = %e, "failed to kill replica");
        }
        Err(DfxError::Replica(format!(
            "replica not ready after {} attempts",
            config.max_attempts
        )))
    }

    /// Stop the replica with `dfx stop`, then reap the child.
    pub async fn stop(mut self) -> Result<(), DfxError> {
        if let Err(e) = self.dfx.stop().await {
            tracing::warn!(error = %e, "dfx stop failed, killing replica");
        }
        if self.child.try_wait()?.is_none() {
            self.child.kill().await?;
        }
        tracing::info!("replica stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> ReplicaConfig {
        ReplicaConfig {
            clean: false,
            max_attempts: 50,
            poll_interval: Duration::from_millis(20),
        }
    }

    #[tokio::test]
    async fn missing_binary_is_not_found() {
        let dfx = DfxConfig {
            binary: "/nonexistent/travel3/dfx".to_string(),
            ..DfxConfig::default()
        };
        let err = Replica::start(&dfx, &fast()).await.err().unwrap();
        assert!(matches!(err, DfxError::NotFound(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn replica_that_never_answers_fails() {
        // `false` exits at once and every ping fails.
        let dfx = DfxConfig {
            binary: "false".to_string(),
            ..DfxConfig::default()
        };
        let err = Replica::start(&dfx, &fast()).await.err().unwrap();
        assert!(matches!(err, DfxError::Replica(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn clean_start_removes_state_dir() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join(".dfx");
        std::fs::create_dir_all(state.join("local")).unwrap();

        let dfx = DfxConfig {
            binary: "false".to_string(),
            project_root: dir.path().to_path_buf(),
            ..DfxConfig::default()
        };
        let config = ReplicaConfig {
            clean: true,
            ..fast()
        };
        assert!(Replica::start(&dfx, &config).await.is_err());
        assert!(!state.exists());
    }
}

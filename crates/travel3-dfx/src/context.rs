//! `dfx` invocations.
//!
//! Every command runs as a direct child process with its arguments passed
//! verbatim, so Candid text never goes through a shell.

use std::path::PathBuf;
use std::time::Duration;

use candid::Principal;
use travel3::{shell_line, Args};

use crate::cli::{CallOutput, CanisterCli};
use crate::error::DfxError;

/// How to reach `dfx`.
#[derive(Debug, Clone)]
pub struct DfxConfig {
    /// Path or name of the `dfx` binary (default: `dfx`).
    pub binary: String,
    /// Network passed to `canister` and `build` commands (default: `local`).
    pub network: String,
    /// Directory holding `dfx.json` (default: current directory).
    pub project_root: PathBuf,
    /// Per-command timeout in seconds (default: 300).
    pub timeout_secs: u64,
    /// Print commands instead of running them.
    pub dry_run: bool,
}

impl Default for DfxConfig {
    fn default() -> Self {
        Self {
            binary: "dfx".to_string(),
            network: "local".to_string(),
            project_root: PathBuf::from("."),
            timeout_secs: 300,
            dry_run: false,
        }
    }
}

/// Captured output of a successful command.
#[derive(Debug, Clone, Default)]
pub struct DfxOutput {
    pub stdout: String,
}

/// Runs `dfx` commands for one project.
pub struct DfxContext {
    config: DfxConfig,
}

impl DfxContext {
    pub fn new(config: DfxConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DfxConfig {
        &self.config
    }

    /// Full argument list for a command, with the network flag where dfx takes one.
    pub fn command_args(&self, args: &[&str]) -> Vec<String> {
        let mut full: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        if matches!(args.first(), Some(&"canister") | Some(&"build")) {
            full.push("--network".to_string());
            full.push(self.config.network.clone());
        }
        full
    }

    /// The command line as it would be typed into a shell.
    pub fn preview(&self, args: &[&str]) -> String {
        shell_line(&self.config.binary, &self.command_args(args))
    }

    /// Run a command, or print it in dry-run mode.
    pub async fn run(&self, args: &[&str]) -> Result<DfxOutput, DfxError> {
        if self.config.dry_run {
            println!("{}", self.preview(args));
            return Ok(DfxOutput::default());
        }
        self.execute(args).await
    }

    /// Run a command even in dry-run mode. Only for read-only commands.
    async fn execute(&self, args: &[&str]) -> Result<DfxOutput, DfxError> {
        let full = self.command_args(args);
        let command = shell_line(&self.config.binary, &full);
        tracing::debug!(command = %command, "running dfx");

        let result = tokio::time::timeout(
            Duration::from_secs(self.config.timeout_secs),
            tokio::process::Command::new(&self.config.binary)
                .args(&full)
                .current_dir(&self.config.project_root)
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| DfxError::Timeout {
            command: command.clone(),
            secs: self.config.timeout_secs,
        })?
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DfxError::NotFound(self.config.binary.clone()),
            _ => DfxError::Io(e),
        })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            tracing::debug!(command = %command, stderr = %stderr, "dfx command failed");
            return Err(DfxError::Failed {
                command,
                code: result.status.code(),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(DfxOutput {
            stdout: String::from_utf8_lossy(&result.stdout).to_string(),
        })
    }

    /// `dfx ping <network>`; true once the replica answers.
    pub async fn ping(&self) -> bool {
        self.execute(&["ping", &self.config.network]).await.is_ok()
    }

    /// `dfx stop`.
    pub async fn stop(&self) -> Result<(), DfxError> {
        self.execute(&["stop"]).await.map(|_| ())
    }
}

impl CanisterCli for DfxContext {
    async fn create(&self, canister: &str) -> Result<(), DfxError> {
        self.run(&["canister", "create", canister]).await?;
        tracing::info!(canister, "canister created");
        Ok(())
    }

    async fn build(&self) -> Result<(), DfxError> {
        self.run(&["build"]).await?;
        tracing::info!("canisters built");
        Ok(())
    }

    async fn install(&self, canister: &str, args: &Args) -> Result<(), DfxError> {
        let argument = args.to_string();
        self.run(&["canister", "install", canister, "--argument", &argument])
            .await?;
        tracing::info!(canister, "canister installed");
        Ok(())
    }

    async fn call(&self, canister: &str, method: &str, args: &Args) -> Result<CallOutput, DfxError> {
        let argument = args.to_string();
        let output = self
            .run(&["canister", "call", canister, method, &argument])
            .await?;
        Ok(CallOutput::new(output.stdout.trim()))
    }

    async fn principal(&self) -> Result<Principal, DfxError> {
        let text = match self.execute(&["identity", "get-principal"]).await {
            Ok(output) => output.stdout.trim().to_string(),
            Err(e) if self.config.dry_run => {
                tracing::warn!(error = %e, "no dfx identity, previewing with anonymous principal");
                return Ok(Principal::anonymous());
            }
            Err(e) => return Err(e),
        };
        if text.is_empty() {
            return Err(DfxError::EmptyPrincipal);
        }
        Principal::from_text(&text).map_err(|e| DfxError::InvalidPrincipal {
            text,
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use travel3::Value;

    fn context(binary: &str) -> DfxContext {
        DfxContext::new(DfxConfig {
            binary: binary.to_string(),
            network: "ic".to_string(),
            timeout_secs: 10,
            ..DfxConfig::default()
        })
    }

    #[test]
    fn network_flag_only_for_canister_and_build() {
        let ctx = context("dfx");
        assert_eq!(
            ctx.command_args(&["canister", "create", "b"]),
            vec!["canister", "create", "b", "--network", "ic"]
        );
        assert_eq!(ctx.command_args(&["build"]), vec!["build", "--network", "ic"]);
        assert_eq!(
            ctx.command_args(&["identity", "get-principal"]),
            vec!["identity", "get-principal"]
        );
    }

    #[test]
    fn preview_quotes_candid_argument() {
        let ctx = context("/usr/local/bin/dfx");
        let line = ctx.preview(&["canister", "call", "b", "mint", "(principal \"aaaaa-aa\")"]);
        assert_eq!(
            line,
            "/usr/local/bin/dfx canister call b mint '(principal \"aaaaa-aa\")' --network ic"
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn arguments_are_passed_verbatim() {
        // `echo` prints its arguments back, standing in for dfx.
        let ctx = context("echo");
        let args = Args::new([Value::text("it's \"quoted\" $(x)")]);
        let out = ctx.call("b", "mint", &args).await.unwrap();
        assert_eq!(
            out.raw,
            "canister call b mint (\"it's \\\"quoted\\\" $(x)\") --network ic"
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn principal_output_must_parse() {
        // `echo` prints "identity get-principal", which is no principal.
        let ctx = context("echo");
        match ctx.principal().await {
            Err(e @ DfxError::InvalidPrincipal { .. }) => {
                assert!(e.to_string().contains("identity get-principal"));
                assert!(e.is_fatal());
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_zero_exit_is_failed() {
        let ctx = context("false");
        match ctx.build().await {
            Err(DfxError::Failed { command, code, .. }) => {
                assert_eq!(command, "false build --network ic");
                assert_eq!(code, Some(1));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn empty_principal_is_fatal() {
        // `true` succeeds with no output.
        let ctx = context("true");
        let err = ctx.principal().await.unwrap_err();
        assert!(matches!(err, DfxError::EmptyPrincipal));
        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn missing_binary_is_not_found() {
        let ctx = context("/nonexistent/travel3/dfx");
        let err = ctx.create("b").await.unwrap_err();
        assert!(matches!(err, DfxError::NotFound(_)));
        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn dry_run_runs_nothing() {
        let ctx = DfxContext::new(DfxConfig {
            binary: "/nonexistent/travel3/dfx".to_string(),
            dry_run: true,
            ..DfxConfig::default()
        });
        ctx.create("b").await.unwrap();
        let out = ctx.call("b", "mint", &Args::default()).await.unwrap();
        assert!(out.raw.is_empty());
        // identity lookup still runs and falls back to the anonymous principal
        assert_eq!(ctx.principal().await.unwrap(), Principal::anonymous());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn slow_command_times_out() {
        let ctx = DfxContext::new(DfxConfig {
            binary: "sleep".to_string(),
            timeout_secs: 1,
            ..DfxConfig::default()
        });
        let err = ctx.execute(&["5"]).await.unwrap_err();
        assert!(matches!(err, DfxError::Timeout { secs: 1, .. }));
    }
}

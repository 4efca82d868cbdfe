//! Deployment configuration from command-line flags and environment variables.

use std::path::PathBuf;
use std::time::Duration;

use candid::Principal;
use clap::{Parser, ValueEnum};
use travel3::constants::{
    BACKEND_CANISTER, DEFAULT_COLLECTION_DESCRIPTION, DEFAULT_COLLECTION_NAME,
    DEFAULT_COLLECTION_SYMBOL, DEFAULT_LOGO_URL, FRONTEND_CANISTER,
};
use travel3::{CollectionInit, PlaceSource};
use travel3_dfx::{DfxConfig, ReplicaConfig};

/// What to do when one place's calls fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FailurePolicy {
    /// Log the failure and move on to the next place.
    Continue,
    /// Stop the batch at the first failure.
    Abort,
}

/// Settings for one deployment run.
#[derive(Debug, Clone)]
pub struct DeployConfig {
    pub frontend_canister: String,
    pub backend_canister: String,
    pub network: String,
    pub collection: CollectionInit,
    pub source: PlaceSource,
    /// Owner principal; `None` reads it from the active dfx identity.
    pub owner: Option<Principal>,
    pub failure_policy: FailurePolicy,
    /// Pause after each mint before the follow-up calls.
    pub settle_delay: Duration,
    /// Start and supervise a local replica for the run.
    pub replica: Option<ReplicaConfig>,
    /// Where to write the JSON run report.
    pub report_path: Option<PathBuf>,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            frontend_canister: FRONTEND_CANISTER.to_string(),
            backend_canister: BACKEND_CANISTER.to_string(),
            network: "local".to_string(),
            collection: CollectionInit::default(),
            source: PlaceSource::Builtin,
            owner: None,
            failure_policy: FailurePolicy::Continue,
            settle_delay: Duration::from_secs(2),
            replica: None,
            report_path: None,
        }
    }
}

/// Create, install and mint the Travel3 historic places collection.
#[derive(Debug, Parser)]
#[command(name = "travel3-deploy", version, about)]
pub struct Cli {
    /// Path to the dfx binary.
    #[arg(long, env = "DFX_PATH", default_value = "dfx")]
    pub dfx: String,

    /// dfx network for canister commands.
    #[arg(long, env = "DFX_NETWORK", default_value = "local")]
    pub network: String,

    /// Directory containing dfx.json.
    #[arg(long, env = "TRAVEL3_PROJECT_ROOT", default_value = ".")]
    pub project_root: PathBuf,

    /// Per-command timeout in seconds.
    #[arg(long, env = "DFX_TIMEOUT_SECS", default_value_t = 300)]
    pub timeout_secs: u64,

    /// JSON file of places to mint (default: the built-in collection).
    #[arg(long, env = "TRAVEL3_PLACES")]
    pub places: Option<PathBuf>,

    #[arg(long, env = "TRAVEL3_FRONTEND_CANISTER", default_value = FRONTEND_CANISTER)]
    pub frontend: String,

    #[arg(long, env = "TRAVEL3_BACKEND_CANISTER", default_value = BACKEND_CANISTER)]
    pub backend: String,

    /// Owner principal (default: `dfx identity get-principal`).
    #[arg(long, env = "TRAVEL3_OWNER", value_parser = parse_principal)]
    pub owner: Option<Principal>,

    #[arg(long, env = "TRAVEL3_LOGO_URL", default_value = DEFAULT_LOGO_URL)]
    pub logo_url: String,

    #[arg(long, env = "TRAVEL3_COLLECTION_NAME", default_value = DEFAULT_COLLECTION_NAME)]
    pub collection_name: String,

    #[arg(long, env = "TRAVEL3_COLLECTION_SYMBOL", default_value = DEFAULT_COLLECTION_SYMBOL)]
    pub symbol: String,

    #[arg(
        long,
        env = "TRAVEL3_COLLECTION_DESCRIPTION",
        default_value = DEFAULT_COLLECTION_DESCRIPTION
    )]
    pub collection_description: String,

    /// Behavior when a mint or set-location call fails.
    #[arg(long, value_enum, env = "TRAVEL3_FAILURE_POLICY", default_value_t = FailurePolicy::Continue)]
    pub on_failure: FailurePolicy,

    /// Pause after each mint, in milliseconds.
    #[arg(long, env = "TRAVEL3_SETTLE_DELAY_MS", default_value_t = 2000)]
    pub settle_delay_ms: u64,

    /// Start a local replica for the run and stop it afterwards.
    #[arg(long)]
    pub start_replica: bool,

    /// Wipe replica state before starting it.
    #[arg(long, requires = "start_replica")]
    pub clean: bool,

    /// Readiness polls, one per second, before giving up on the replica.
    #[arg(long, default_value_t = 30)]
    pub replica_attempts: u32,

    /// Print the dfx commands instead of running them.
    #[arg(long)]
    pub dry_run: bool,

    /// Write a JSON report of the run to this path.
    #[arg(long, env = "TRAVEL3_REPORT")]
    pub report: Option<PathBuf>,
}

impl Cli {
    /// Split the flags into runner and pipeline settings.
    pub fn into_configs(self) -> (DfxConfig, DeployConfig) {
        let dfx = DfxConfig {
            binary: self.dfx,
            network: self.network.clone(),
            project_root: self.project_root,
            timeout_secs: self.timeout_secs,
            dry_run: self.dry_run,
        };

        let replica = self.start_replica.then(|| ReplicaConfig {
            clean: self.clean,
            max_attempts: self.replica_attempts,
            ..ReplicaConfig::default()
        });

        let deploy = DeployConfig {
            frontend_canister: self.frontend,
            backend_canister: self.backend,
            network: self.network,
            collection: CollectionInit {
                logo_url: self.logo_url,
                name: self.collection_name,
                symbol: self.symbol,
                description: self.collection_description,
            },
            source: PlaceSource::from_path(self.places),
            owner: self.owner,
            failure_policy: self.on_failure,
            // no settling needed when nothing runs
            settle_delay: if self.dry_run {
                Duration::ZERO
            } else {
                Duration::from_millis(self.settle_delay_ms)
            },
            replica,
            report_path: self.report,
        };

        (dfx, deploy)
    }
}

fn parse_principal(s: &str) -> Result<Principal, String> {
    Principal::from_text(s.trim()).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_deployment() {
        let cli = Cli::try_parse_from(["travel3-deploy"]).unwrap();
        let (dfx, deploy) = cli.into_configs();
        assert_eq!(dfx.binary, "dfx");
        assert_eq!(dfx.network, "local");
        assert!(!dfx.dry_run);
        assert_eq!(deploy.backend_canister, "Travel3Nft_backend");
        assert_eq!(deploy.frontend_canister, "Travel3Nft_frontend");
        assert_eq!(deploy.collection, CollectionInit::default());
        assert_eq!(deploy.source, PlaceSource::Builtin);
        assert_eq!(deploy.failure_policy, FailurePolicy::Continue);
        assert_eq!(deploy.settle_delay, Duration::from_secs(2));
        assert!(deploy.replica.is_none());
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "travel3-deploy",
            "--dfx",
            "/usr/local/bin/dfx",
            "--network",
            "ic",
            "--places",
            "places.json",
            "--on-failure",
            "abort",
            "--settle-delay-ms",
            "0",
            "--start-replica",
            "--clean",
            "--owner",
            "aaaaa-aa",
        ])
        .unwrap();
        let (dfx, deploy) = cli.into_configs();
        assert_eq!(dfx.binary, "/usr/local/bin/dfx");
        assert_eq!(deploy.network, "ic");
        assert_eq!(deploy.source, PlaceSource::JsonFile(PathBuf::from("places.json")));
        assert_eq!(deploy.failure_policy, FailurePolicy::Abort);
        assert_eq!(deploy.settle_delay, Duration::ZERO);
        assert_eq!(deploy.owner, Some(Principal::management_canister()));
        assert!(deploy.replica.unwrap().clean);
    }

    #[test]
    fn malformed_owner_is_rejected() {
        let err = Cli::try_parse_from(["travel3-deploy", "--owner", "not-a-principal"]).unwrap_err();
        assert!(err.to_string().contains("not-a-principal"));
    }

    #[test]
    fn clean_requires_start_replica() {
        assert!(Cli::try_parse_from(["travel3-deploy", "--clean"]).is_err());
    }

    #[test]
    fn dry_run_skips_settle_delay() {
        let cli = Cli::try_parse_from(["travel3-deploy", "--dry-run"]).unwrap();
        let (dfx, deploy) = cli.into_configs();
        assert!(dfx.dry_run);
        assert_eq!(deploy.settle_delay, Duration::ZERO);
    }
}

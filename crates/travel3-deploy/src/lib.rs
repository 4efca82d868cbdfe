//! Travel3 deployment: create and install the canisters, then mint the
//! historic places collection.
//!
//! [`Deployer`] runs the sequence against any [`travel3_dfx::CanisterCli`];
//! [`deploy`] wires it to the real `dfx` binary and an optional supervised
//! replica.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;

pub use config::{Cli, DeployConfig, FailurePolicy};
pub use error::{DeployError, ItemError};
pub use pipeline::Deployer;
pub use report::{DeployReport, OutcomeStatus, PlaceOutcome};

use travel3_dfx::{DfxConfig, DfxContext, Replica};

/// Run a deployment with `dfx`, stopping the replica on every exit path.
///
/// Ctrl-C interrupts the run; the command in flight is killed with it and
/// the places already processed are kept in the error's report.
pub async fn deploy(dfx: DfxConfig, config: DeployConfig) -> Result<DeployReport, DeployError> {
    let replica = match (&config.replica, dfx.dry_run) {
        (Some(replica_config), false) => Some(
            Replica::start(&dfx, replica_config)
                .await
                .map_err(DeployError::step("start replica"))?,
        ),
        (Some(_), true) => {
            tracing::info!("dry run, not starting a replica");
            None
        }
        (None, _) => None,
    };

    let deployer = Deployer::new(DfxContext::new(dfx), config);
    let result = deployer.run_until(interrupted()).await;

    if let Some(replica) = replica {
        if let Err(e) = replica.stop().await {
            tracing::warn!(error = %e, "failed to stop replica");
        }
    }
    result
}

/// Completes on Ctrl-C. Never completes if the handler cannot be installed.
async fn interrupted() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::warn!("interrupted, shutting down"),
        Err(e) => {
            tracing::warn!(error = %e, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await
        }
    }
}

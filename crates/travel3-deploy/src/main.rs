use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use travel3_deploy::{deploy, Cli, DeployReport};

/// Exit code when the batch finished but some places failed.
const EXIT_PARTIAL: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let (dfx, config) = cli.into_configs();
    let report_path = config.report_path.clone();

    tracing::info!(
        dfx = %dfx.binary,
        network = %dfx.network,
        source = %config.source,
        policy = ?config.failure_policy,
        dry_run = dfx.dry_run,
        "starting deployment"
    );

    match deploy(dfx, config).await {
        Ok(report) => {
            write_report(report_path.as_deref(), &report);
            if report.is_success() {
                tracing::info!(minted = report.places.len(), "deployment completed");
                ExitCode::SUCCESS
            } else {
                tracing::warn!("deployment completed with failed places");
                ExitCode::from(EXIT_PARTIAL)
            }
        }
        Err(e) => {
            if let Some(report) = e.report() {
                write_report(report_path.as_deref(), report);
            }
            tracing::error!(error = %e, "deployment failed");
            ExitCode::FAILURE
        }
    }
}

fn write_report(path: Option<&std::path::Path>, report: &DeployReport) {
    let Some(path) = path else {
        return;
    };
    match report.write_json(path) {
        Ok(()) => tracing::info!(path = %path.display(), "report written"),
        Err(e) => tracing::error!(path = %path.display(), error = %e, "failed to write report"),
    }
}

//! The deployment sequence.
//!
//! Create both canisters, build, install the backend with the collection
//! settings, then mint each place and register its asset locations.
//! Setup failures end the run; per-place failures follow the configured
//! [`FailurePolicy`].
//!
//! Follow-up calls address the token the canister assigned at mint. When
//! `mint` reports no index, tokens are assumed to be numbered from zero in
//! order of successful mints.

use std::future::Future;

use candid::Principal;
use travel3::constants::{
    METHOD_MINT, METHOD_SET_DECRYPTION_KEY, METHOD_SET_DOCUMENT_LOCATION,
    METHOD_SET_IMAGE_LOCATION,
};
use travel3::{
    content_sources, decryption_args, location_args, mint_args, source_args, token_metadata, Args,
    AssetLocation, PlaceRecord,
};
use travel3_dfx::{CallOutput, CanisterCli};

use crate::config::{DeployConfig, FailurePolicy};
use crate::error::{DeployError, ItemError};
use crate::report::{DeployReport, OutcomeStatus};

/// Runs a deployment against a canister CLI.
pub struct Deployer<C> {
    cli: C,
    config: DeployConfig,
}

impl<C: CanisterCli> Deployer<C> {
    pub fn new(cli: C, config: DeployConfig) -> Self {
        Self { cli, config }
    }

    pub fn cli(&self) -> &C {
        &self.cli
    }

    /// Run the full sequence and report what happened to each place.
    pub async fn run(&self) -> Result<DeployReport, DeployError> {
        self.run_until(std::future::pending()).await
    }

    /// Like [`Deployer::run`], but stop as soon as `shutdown` completes.
    ///
    /// The command in flight is dropped, which kills its process. Places
    /// already processed are returned in [`DeployError::Interrupted`].
    pub async fn run_until(
        &self,
        shutdown: impl Future<Output = ()>,
    ) -> Result<DeployReport, DeployError> {
        tokio::pin!(shutdown);

        // Fail on bad input before touching any canister.
        let places = self.config.source.load()?;
        tracing::info!(source = %self.config.source, count = places.len(), "places loaded");

        let owner = tokio::select! {
            biased;
            _ = &mut shutdown => return Err(DeployError::Interrupted { report: None }),
            owner = self.prepare() => owner?,
        };

        let mut report = DeployReport::new(owner.to_text(), &self.config.network);
        let mut next_token = 0;
        for (index, place) in places.iter().enumerate() {
            let (token, result) = tokio::select! {
                biased;
                _ = &mut shutdown => {
                    tracing::warn!(index, "interrupted before place");
                    return Err(DeployError::Interrupted {
                        report: Some(Box::new(report)),
                    });
                }
                outcome = self.deploy_place(index, place, owner, next_token) => outcome,
            };
            if let Some(token) = token {
                next_token = token + 1;
            }
            report.record(index, place, token, result.as_ref().err());

            match result {
                Ok(()) => tracing::info!(index, token = ?token, name = %place.name, "place minted"),
                Err(e) => {
                    tracing::warn!(index, name = %place.name, error = %e, "place failed");
                    if e.is_fatal() || self.config.failure_policy == FailurePolicy::Abort {
                        return Err(DeployError::Aborted {
                            index,
                            source: e,
                            report: Box::new(report),
                        });
                    }
                }
            }
        }

        tracing::info!(
            minted = report.count(OutcomeStatus::Minted),
            partial = report.count(OutcomeStatus::Partial),
            failed = report.count(OutcomeStatus::Failed),
            "minting complete"
        );
        Ok(report)
    }

    /// Create, build and install. Returns the owner principal.
    async fn prepare(&self) -> Result<Principal, DeployError> {
        self.cli
            .create(&self.config.frontend_canister)
            .await
            .map_err(DeployError::step("create frontend canister"))?;
        self.cli
            .create(&self.config.backend_canister)
            .await
            .map_err(DeployError::step("create backend canister"))?;
        self.cli
            .build()
            .await
            .map_err(DeployError::step("build"))?;

        let owner = match self.config.owner {
            Some(owner) => owner,
            None => self
                .cli
                .principal()
                .await
                .map_err(DeployError::step("get identity principal"))?,
        };
        tracing::info!(principal = %owner, "using owner principal");

        self.cli
            .install(
                &self.config.backend_canister,
                &self.config.collection.to_args(owner),
            )
            .await
            .map_err(DeployError::step("install backend canister"))?;
        Ok(owner)
    }

    /// Mint one place, then register its assets on the minted token.
    /// Returns the token, if minted, alongside the first failure.
    async fn deploy_place(
        &self,
        index: usize,
        place: &PlaceRecord,
        owner: Principal,
        expected: u64,
    ) -> (Option<u64>, Result<(), ItemError>) {
        match self.mint(index, place, owner, expected).await {
            Ok(token) => (Some(token), self.register_assets(token, place).await),
            Err(e) => (None, Err(e)),
        }
    }

    async fn mint(
        &self,
        index: usize,
        place: &PlaceRecord,
        owner: Principal,
        expected: u64,
    ) -> Result<u64, ItemError> {
        let metadata = token_metadata(place, index)?;
        tracing::info!(index, token = %metadata.token_identifier, name = %place.name, "minting place");

        let output = self
            .call(METHOD_MINT, &mint_args(owner, &metadata))
            .await?;
        let token = match output.token_index() {
            Some(token) => {
                if token != expected {
                    tracing::warn!(index, token, expected, "canister assigned an unexpected token index");
                }
                token
            }
            None => expected,
        };

        if !self.config.settle_delay.is_zero() {
            tokio::time::sleep(self.config.settle_delay).await;
        }
        Ok(token)
    }

    async fn register_assets(&self, token: u64, place: &PlaceRecord) -> Result<(), ItemError> {
        self.call(
            METHOD_SET_IMAGE_LOCATION,
            &location_args(token, &AssetLocation::icp(&place.image_url)),
        )
        .await?;
        self.call(
            METHOD_SET_DOCUMENT_LOCATION,
            &location_args(token, &AssetLocation::icp(&place.document_url)),
        )
        .await?;

        for (method, source) in content_sources(place) {
            self.call(method, &source_args(token, source)).await?;
        }

        if let Some(key) = &place.decryption {
            self.call(METHOD_SET_DECRYPTION_KEY, &decryption_args(token, key))
                .await?;
            tracing::debug!(token, "decryption key registered");
        }
        Ok(())
    }

    async fn call(&self, method: &'static str, args: &Args) -> Result<CallOutput, ItemError> {
        let output = self
            .cli
            .call(&self.config.backend_canister, method, args)
            .await
            .map_err(|source| ItemError::Call { method, source })?;
        if let Some(reason) = output.error_tag() {
            return Err(ItemError::Rejected { method, reason });
        }
        tracing::debug!(method, output = %output.raw, "call returned");
        Ok(output)
    }
}

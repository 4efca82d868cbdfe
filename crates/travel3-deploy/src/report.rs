//! Per-place outcome of a deployment run.

use std::path::Path;

use serde::Serialize;
use travel3::{token_identifier, PlaceRecord};

use crate::error::ItemError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    /// Minted and every follow-up call succeeded.
    Minted,
    /// Minted, but a follow-up call failed.
    Partial,
    /// Not minted.
    Failed,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOutcome {
    pub index: usize,
    pub name: String,
    pub token_identifier: String,
    /// Token index the canister assigned, if the mint went through.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<u64>,
    pub status: OutcomeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployReport {
    pub owner: String,
    pub network: String,
    pub places: Vec<PlaceOutcome>,
}

impl DeployReport {
    pub fn new(owner: impl Into<String>, network: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            network: network.into(),
            places: Vec::new(),
        }
    }

    /// Record a place. `token` is set when the mint succeeded, `error` when
    /// any call for the place failed.
    pub fn record(
        &mut self,
        index: usize,
        place: &PlaceRecord,
        token: Option<u64>,
        error: Option<&ItemError>,
    ) {
        let status = match (token, error) {
            (_, None) => OutcomeStatus::Minted,
            (Some(_), Some(_)) => OutcomeStatus::Partial,
            (None, Some(_)) => OutcomeStatus::Failed,
        };
        self.places.push(PlaceOutcome {
            index,
            name: place.name.clone(),
            token_identifier: token_identifier(index),
            token,
            status,
            error: error.map(ToString::to_string),
        });
    }

    pub fn count(&self, status: OutcomeStatus) -> usize {
        self.places.iter().filter(|p| p.status == status).count()
    }

    /// True when every place was fully minted.
    pub fn is_success(&self) -> bool {
        self.places
            .iter()
            .all(|p| p.status == OutcomeStatus::Minted)
    }

    /// Write the report as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }
}

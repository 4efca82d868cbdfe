//! dfx CLI runner for Travel3 deployments.
//!
//! Wraps the external `dfx` binary: [`DfxContext`] implements the
//! [`CanisterCli`] seam the deployment pipeline is written against, and
//! [`Replica`] supervises a local replica for the duration of a run.

pub mod cli;
pub mod context;
pub mod error;
pub mod replica;

pub use cli::{CallOutput, CanisterCli};
pub use context::{DfxConfig, DfxContext, DfxOutput};
pub use error::DfxError;
pub use replica::{Replica, ReplicaConfig};

//! The canister CLI seam.

use std::future::Future;

use candid::types::value::{IDLArgs, IDLValue, VariantValue};
use candid::types::Label;
use candid::Principal;
use travel3::Args;

use crate::error::DfxError;

/// Operations a deployment needs from the canister CLI.
///
/// [`crate::DfxContext`] shells out to `dfx`; tests substitute a recorder.
pub trait CanisterCli: Send + Sync {
    /// `dfx canister create <canister>`.
    fn create(&self, canister: &str) -> impl Future<Output = Result<(), DfxError>> + Send;

    /// `dfx build`.
    fn build(&self) -> impl Future<Output = Result<(), DfxError>> + Send;

    /// `dfx canister install <canister> --argument <args>`.
    fn install(
        &self,
        canister: &str,
        args: &Args,
    ) -> impl Future<Output = Result<(), DfxError>> + Send;

    /// `dfx canister call <canister> <method> <args>`.
    fn call(
        &self,
        canister: &str,
        method: &str,
        args: &Args,
    ) -> impl Future<Output = Result<CallOutput, DfxError>> + Send;

    /// `dfx identity get-principal`, parsed.
    fn principal(&self) -> impl Future<Output = Result<Principal, DfxError>> + Send;
}

/// Text printed by a canister call, e.g. `(variant { Ok = 0 : nat })`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallOutput {
    pub raw: String,
}

impl CallOutput {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// Parse the output as Candid arguments.
    pub fn parsed(&self) -> Result<IDLArgs, candid_parser::Error> {
        candid_parser::parse_idl_args(self.raw.trim())
    }

    /// `Some(tag)` when the call returned `variant { Err = ... }` or an
    /// `Err`-prefixed tag; canisters report failures this way with exit code 0.
    pub fn error_tag(&self) -> Option<String> {
        let args = match self.parsed() {
            Ok(args) => args,
            Err(e) => {
                if self.raw.trim().is_empty() {
                    return None;
                }
                tracing::warn!(error = %e, output = %self.raw, "unreadable call output");
                // still catch a rejection the parser could not read
                return self
                    .raw
                    .contains("variant { Err")
                    .then(|| "Err".to_string());
            }
        };
        let IDLValue::Variant(VariantValue(field, _)) = args.args.first()? else {
            return None;
        };
        let tag = label_name(&field.id);
        if !tag.starts_with("Err") {
            return None;
        }
        Some(match &field.val {
            IDLValue::Variant(VariantValue(inner, _)) => format!("{tag}: {}", label_name(&inner.id)),
            IDLValue::Text(msg) => format!("{tag}: {msg}"),
            _ => tag,
        })
    }

    /// Token index returned by `mint`, as `(n : nat)` or `(variant { Ok = n : nat })`.
    pub fn token_index(&self) -> Option<u64> {
        let args = self.parsed().ok()?;
        match args.args.first()? {
            IDLValue::Variant(VariantValue(field, _)) if label_name(&field.id) == "Ok" => {
                as_u64(&field.val)
            }
            value => as_u64(value),
        }
    }
}

fn label_name(label: &Label) -> String {
    match label {
        Label::Named(name) => name.clone(),
        Label::Id(id) | Label::Unnamed(id) => id.to_string(),
    }
}

fn as_u64(value: &IDLValue) -> Option<u64> {
    match value {
        IDLValue::Nat(n) => n.0.to_string().parse().ok(),
        IDLValue::Nat64(n) => Some(*n),
        IDLValue::Nat32(n) => Some(u64::from(*n)),
        IDLValue::Nat16(n) => Some(u64::from(*n)),
        IDLValue::Nat8(n) => Some(u64::from(*n)),
        // unannotated literal
        IDLValue::Number(s) => s.replace('_', "").parse().ok(),
        _ => None,
    }
}

//! Candid text arguments for the Travel3 historic places NFT canister.
//!
//! The backend canister takes structured arguments on the command line of
//! `dfx canister call`. This crate builds those arguments as a small value
//! tree that renders itself, so escaping is handled in one place instead of
//! by string concatenation.
//!
//! # Quick example
//!
//! ```
//! use travel3::{builtin_places, token_argument};
//!
//! let places = builtin_places();
//! let arg = token_argument(&places[0], 0).unwrap();
//! assert!(arg.starts_with("opt record { tokenIdentifier = \"place_0\";"));
//! ```

// Value grammar
pub mod value;

// Domain records
pub mod collection;
pub mod constants;
pub mod error;
pub mod metadata;
pub mod place;
pub mod source;

// Command previews
pub mod shell;

pub use collection::CollectionInit;
pub use error::{MetadataError, SourceError};
pub use metadata::{
    content_sources, decryption_args, location_args, mint_args, source_args, token_argument,
    token_identifier, token_metadata, AssetLocation, PlaceAttributes, TokenMetadata,
};
pub use place::{builtin_places, DecryptionKey, PlaceRecord};
pub use shell::{shell_line, shell_quote};
pub use source::PlaceSource;
pub use value::{escape_text, Args, Value};

//! Constructor arguments of the backend canister.

use candid::Principal;

use crate::constants::{
    DEFAULT_COLLECTION_DESCRIPTION, DEFAULT_COLLECTION_NAME, DEFAULT_COLLECTION_SYMBOL,
    DEFAULT_LOGO_URL,
};
use crate::value::{Args, Value};

/// Collection-level settings installed with the backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectionInit {
    pub logo_url: String,
    pub name: String,
    pub symbol: String,
    pub description: String,
}

impl Default for CollectionInit {
    fn default() -> Self {
        Self {
            logo_url: DEFAULT_LOGO_URL.to_string(),
            name: DEFAULT_COLLECTION_NAME.to_string(),
            symbol: DEFAULT_COLLECTION_SYMBOL.to_string(),
            description: DEFAULT_COLLECTION_DESCRIPTION.to_string(),
        }
    }
}

impl CollectionInit {
    /// `(logo, name, symbol, description, principal owner, null)`.
    ///
    /// The trailing `null` leaves the optional max supply unset.
    pub fn to_args(&self, owner: Principal) -> Args {
        Args::new([
            Value::text(&self.logo_url),
            Value::text(&self.name),
            Value::text(&self.symbol),
            Value::text(&self.description),
            Value::principal(owner),
            Value::Null,
        ])
    }
}

//! Token metadata passed to the backend's `mint` method.

use candid::Principal;

use crate::constants::{
    CATEGORY, COLLECTION, CULTURAL_SIGNIFICANCE, DOCUMENT_MIME, HISTORICAL_PERIOD, IMAGE_MIME,
    METHOD_SET_DOCUMENT_SRC, METHOD_SET_PHOTO_SRC, METHOD_SET_THUMBNAIL_SRC, TOKEN_ID_PREFIX,
};
use crate::error::MetadataError;
use crate::place::{DecryptionKey, PlaceRecord};
use crate::value::{Args, Value};

/// Where an asset is stored: an ICP asset URL and an optional IPFS CID.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetLocation {
    pub icp: String,
    pub ipfs: String,
}

impl AssetLocation {
    /// An asset served from ICP only.
    pub fn icp(url: impl Into<String>) -> Self {
        Self {
            icp: url.into(),
            ipfs: String::new(),
        }
    }

    pub fn to_value(&self) -> Value {
        Value::record([
            ("icp", Value::text(&self.icp)),
            ("ipfs", Value::text(&self.ipfs)),
        ])
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaceAttributes {
    pub name: String,
    pub location: String,
    pub coordinates: String,
    pub collection: String,
    pub year: String,
    pub category: String,
    pub historical_period: String,
    pub cultural_significance: String,
    pub architectural_style: Option<String>,
}

impl PlaceAttributes {
    pub fn to_value(&self) -> Value {
        let style = match &self.architectural_style {
            Some(s) => Value::opt(Value::text(s)),
            None => Value::Null,
        };
        Value::record([
            ("name", Value::text(&self.name)),
            ("location", Value::text(&self.location)),
            ("coordinates", Value::text(&self.coordinates)),
            ("collection", Value::text(&self.collection)),
            ("year", Value::text(&self.year)),
            ("category", Value::text(&self.category)),
            ("historicalPeriod", Value::text(&self.historical_period)),
            ("culturalSignificance", Value::text(&self.cultural_significance)),
            ("architecturalStyle", style),
        ])
    }
}

/// The `metadata` parameter of `mint`. Built fresh for each place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenMetadata {
    pub token_identifier: String,
    pub main_image_type: String,
    pub main_image_location: AssetLocation,
    pub document_type: String,
    pub document_location: AssetLocation,
    pub thumbnail_type: String,
    pub thumbnail_location: AssetLocation,
    pub additional_images_type: String,
    pub additional_images_location: Vec<AssetLocation>,
    pub attributes: PlaceAttributes,
}

impl TokenMetadata {
    /// Render as `opt record { ... }`, the shape `mint` expects.
    pub fn to_value(&self) -> Value {
        Value::opt(Value::record([
            ("tokenIdentifier", Value::text(&self.token_identifier)),
            ("mainImageType", Value::text(&self.main_image_type)),
            ("mainImageLocation", self.main_image_location.to_value()),
            ("documentType", Value::text(&self.document_type)),
            ("documentLocation", self.document_location.to_value()),
            ("thumbnailType", Value::text(&self.thumbnail_type)),
            ("thumbnailLocation", self.thumbnail_location.to_value()),
            ("additionalImagesType", Value::text(&self.additional_images_type)),
            (
                "additionalImagesLocation",
                Value::Vec(
                    self.additional_images_location
                        .iter()
                        .map(AssetLocation::to_value)
                        .collect(),
                ),
            ),
            ("attributes", self.attributes.to_value()),
        ]))
    }
}

/// Token identifier for the place at `index`.
pub fn token_identifier(index: usize) -> String {
    format!("{TOKEN_ID_PREFIX}{index}")
}

/// Build the metadata for the place minted at `index`.
pub fn token_metadata(place: &PlaceRecord, index: usize) -> Result<TokenMetadata, MetadataError> {
    place.validate(index)?;

    let image = AssetLocation::icp(&place.image_url);
    Ok(TokenMetadata {
        token_identifier: token_identifier(index),
        main_image_type: IMAGE_MIME.to_string(),
        main_image_location: image,
        document_type: DOCUMENT_MIME.to_string(),
        document_location: AssetLocation::icp(&place.document_url),
        thumbnail_type: IMAGE_MIME.to_string(),
        thumbnail_location: AssetLocation::icp(place.thumbnail()),
        additional_images_type: IMAGE_MIME.to_string(),
        additional_images_location: Vec::new(),
        attributes: PlaceAttributes {
            name: place.name.clone(),
            location: place.location.clone(),
            coordinates: String::new(),
            collection: COLLECTION.to_string(),
            year: place.year.clone(),
            category: CATEGORY.to_string(),
            historical_period: HISTORICAL_PERIOD.to_string(),
            cultural_significance: CULTURAL_SIGNIFICANCE.to_string(),
            architectural_style: None,
        },
    })
}

/// Serialize the place at `index` into the Candid text of its `metadata` argument.
pub fn token_argument(place: &PlaceRecord, index: usize) -> Result<String, MetadataError> {
    Ok(token_metadata(place, index)?.to_value().to_string())
}

/// `(principal owner, opt record { ... })` for `mint`.
pub fn mint_args(owner: Principal, metadata: &TokenMetadata) -> Args {
    Args::new([Value::principal(owner), metadata.to_value()])
}

// Follow-up calls address the token index the canister assigned at mint.

/// `(token : nat, record { icp; ipfs })` for `setImageLocation` / `setDocumentLocation`.
pub fn location_args(token: u64, location: &AssetLocation) -> Args {
    Args::new([Value::Nat(token.into()), location.to_value()])
}

/// `(token : nat, source)` for `setThumbnailSrc` / `setPhotoSrc` / `setDocumentSrc`.
pub fn source_args(token: u64, source: &str) -> Args {
    Args::new([Value::Nat(token.into()), Value::text(source)])
}

/// `(token : nat, iv, privateKey)` for `setDecryptionKey`.
pub fn decryption_args(token: u64, key: &DecryptionKey) -> Args {
    Args::new([
        Value::Nat(token.into()),
        Value::text(&key.iv),
        Value::text(&key.private_key),
    ])
}

/// Content sources set on a place as `(method, source)`, in call order.
pub fn content_sources(place: &PlaceRecord) -> Vec<(&'static str, &str)> {
    [
        (METHOD_SET_THUMBNAIL_SRC, place.thumbnail_src.as_deref()),
        (METHOD_SET_PHOTO_SRC, place.photo_src.as_deref()),
        (METHOD_SET_DOCUMENT_SRC, place.document_src.as_deref()),
    ]
    .into_iter()
    .filter_map(|(method, source)| source.map(|s| (method, s)))
    .collect()
}

/// Prefix of every minted token identifier; the place index is appended.
pub const TOKEN_ID_PREFIX: &str = "place_";

/// MIME type stored for the main image, thumbnail and additional images.
pub const IMAGE_MIME: &str = "image/jpeg";

/// MIME type stored for the place document.
pub const DOCUMENT_MIME: &str = "application/pdf";

/// Fixed classification tags attached to every place.
pub const COLLECTION: &str = "Historic Places";
pub const CATEGORY: &str = "Landmark";
pub const HISTORICAL_PERIOD: &str = "Ancient";
pub const CULTURAL_SIGNIFICANCE: &str = "High";

/// Canister names from `dfx.json`.
pub const BACKEND_CANISTER: &str = "Travel3Nft_backend";
pub const FRONTEND_CANISTER: &str = "Travel3Nft_frontend";

/// Backend methods invoked during a deployment.
pub const METHOD_MINT: &str = "mint";
pub const METHOD_SET_IMAGE_LOCATION: &str = "setImageLocation";
pub const METHOD_SET_DOCUMENT_LOCATION: &str = "setDocumentLocation";
pub const METHOD_SET_THUMBNAIL_SRC: &str = "setThumbnailSrc";
pub const METHOD_SET_PHOTO_SRC: &str = "setPhotoSrc";
pub const METHOD_SET_DOCUMENT_SRC: &str = "setDocumentSrc";
pub const METHOD_SET_DECRYPTION_KEY: &str = "setDecryptionKey";

/// Collection defaults passed to the backend's constructor.
pub const DEFAULT_LOGO_URL: &str = "https://travel3.io/logo.png";
pub const DEFAULT_COLLECTION_NAME: &str = "Travel3";
pub const DEFAULT_COLLECTION_SYMBOL: &str = "TRAVEL3";
pub const DEFAULT_COLLECTION_DESCRIPTION: &str = "Historic Places NFT Collection on ICP";

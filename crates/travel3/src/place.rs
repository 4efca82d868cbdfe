//! Historic place records, one per NFT to mint.

use serde::{Deserialize, Serialize};

use crate::error::MetadataError;

/// A place to mint. Field order in a source determines the token index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceRecord {
    pub name: String,
    pub location: String,
    pub year: String,
    pub description: String,
    pub image_url: String,
    pub document_url: String,
    /// Thumbnail URL. When absent the main image doubles as the thumbnail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// Encrypted content sources, each registered after minting when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_src: Option<String>,
    /// Content decryption key registered after minting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decryption: Option<DecryptionKey>,
}

/// AES key material for encrypted place content. NEVER log `private_key`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecryptionKey {
    pub iv: String,
    pub private_key: String,
}

impl std::fmt::Debug for DecryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecryptionKey")
            .field("iv", &self.iv)
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

impl PlaceRecord {
    /// Build a record from the six required fields.
    pub fn new(
        name: impl Into<String>,
        location: impl Into<String>,
        year: impl Into<String>,
        description: impl Into<String>,
        image_url: impl Into<String>,
        document_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            year: year.into(),
            description: description.into(),
            image_url: image_url.into(),
            document_url: document_url.into(),
            thumbnail_url: None,
            thumbnail_src: None,
            photo_src: None,
            document_src: None,
            decryption: None,
        }
    }

    /// URL stored in `thumbnailLocation`.
    pub fn thumbnail(&self) -> &str {
        self.thumbnail_url
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(self.image_url.as_str())
    }

    /// Reject records with an empty required field.
    pub fn validate(&self, index: usize) -> Result<(), MetadataError> {
        let required = [
            ("name", &self.name),
            ("location", &self.location),
            ("year", &self.year),
            ("description", &self.description),
            ("imageUrl", &self.image_url),
            ("documentUrl", &self.document_url),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(MetadataError::MissingField { index, field });
            }
        }
        let sources = [
            ("thumbnailSrc", &self.thumbnail_src),
            ("photoSrc", &self.photo_src),
            ("documentSrc", &self.document_src),
        ];
        for (field, value) in sources {
            if value.as_deref().is_some_and(|s| s.trim().is_empty()) {
                return Err(MetadataError::MissingField { index, field });
            }
        }
        if let Some(key) = &self.decryption {
            if key.iv.trim().is_empty() {
                return Err(MetadataError::MissingField {
                    index,
                    field: "decryption.iv",
                });
            }
            if key.private_key.trim().is_empty() {
                return Err(MetadataError::MissingField {
                    index,
                    field: "decryption.privateKey",
                });
            }
        }
        Ok(())
    }
}

/// The three places shipped with the collection.
pub fn builtin_places() -> Vec<PlaceRecord> {
    vec![
        PlaceRecord::new(
            "Colosseum",
            "Rome, Italy",
            "70-80 AD",
            "An oval amphitheatre in the centre of Rome, the largest ancient amphitheatre ever built.",
            "https://travel3.io/images/colosseum.jpg",
            "https://travel3.io/docs/colosseum.pdf",
        ),
        PlaceRecord::new(
            "Machu Picchu",
            "Cusco Region, Peru",
            "1450 AD",
            "A 15th-century Inca citadel situated on a mountain ridge above the Sacred Valley.",
            "https://travel3.io/images/machu_picchu.jpg",
            "https://travel3.io/docs/machu_picchu.pdf",
        ),
        PlaceRecord::new(
            "Pyramids of Giza",
            "Giza, Egypt",
            "2560 BC",
            "The oldest and largest of the three pyramids in the Giza pyramid complex.",
            "https://travel3.io/images/pyramids.jpg",
            "https://travel3.io/docs/pyramids.pdf",
        ),
    ]
}

// src/domain/listing.rs

use base64::Engine;
use chrono::{DateTime, Utc};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::errors::ServerError;

/// A single property-for-sale-or-rent record, as stored and served.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: i64,
    pub area: i64,
    pub region: String,
    pub transaction_type: TransactionType,
    pub property_type: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    #[default]
    Sale,
    Rent,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Sale => "sale",
            TransactionType::Rent => "rent",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sale" => Some(TransactionType::Sale),
            "rent" => Some(TransactionType::Rent),
            _ => None,
        }
    }
}

/// Create/update payload: every editable field, nothing else.
/// Fields default so that an absent field shows up in `validate`
/// by name instead of failing JSON deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingForm {
    pub title: String,
    pub description: String,
    pub price: i64,
    pub area: i64,
    pub region: String,
    pub transaction_type: TransactionType,
    pub property_type: String,
    pub images: Vec<String>,
}

impl ListingForm {
    /// Checks required fields and collects the names of the ones that
    /// are missing or out of range.
    pub fn validate(&self) -> Result<(), ServerError> {
        let mut invalid = Vec::new();

        if self.title.trim().is_empty() {
            invalid.push("title".to_string());
        }
        if self.description.trim().is_empty() {
            invalid.push("description".to_string());
        }
        if self.price <= 0 {
            invalid.push("price".to_string());
        }
        if self.area <= 0 {
            invalid.push("area".to_string());
        }
        if self.region.trim().is_empty() {
            invalid.push("region".to_string());
        }
        if self.property_type.trim().is_empty() {
            invalid.push("property_type".to_string());
        }

        if invalid.is_empty() {
            Ok(())
        } else {
            Err(ServerError::Validation(invalid))
        }
    }

    /// Builds a full record from this form. `created_at == updated_at`
    /// on a fresh record.
    pub fn into_listing(self, id: String, now: DateTime<Utc>) -> Listing {
        Listing {
            id,
            title: self.title,
            description: self.description,
            price: self.price,
            area: self.area,
            region: self.region,
            transaction_type: self.transaction_type,
            property_type: self.property_type,
            images: self.images,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Fresh listing id: millisecond timestamp plus a short random suffix so
/// two listings created in the same millisecond can't collide.
pub fn fresh_listing_id(now: DateTime<Utc>) -> String {
    let mut raw = [0u8; 6];
    OsRng.fill_bytes(&mut raw);
    let suffix = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(raw);
    format!("{}-{}", now.timestamp_millis(), suffix)
}

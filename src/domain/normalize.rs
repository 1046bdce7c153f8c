// src/domain/normalize.rs
//
// Read-time normalization for legacy-shaped records: region aliasing,
// property-type migration, and image reference filtering. Each transform
// is idempotent, so records written under the current schema pass
// through unchanged.

use url::Url;

use crate::domain::listing::Listing;

/// Canonical region labels. Free text is tolerated everywhere; this list
/// is what the UI offers.
pub const REGIONS: &[&str] = &[
    "호치민",
    "하노이",
    "다낭",
    "하이퐁",
    "나트랑",
    "푸꾸옥",
    "기타",
];

/// The coarse property-type enumeration, authoritative for new writes.
pub const PROPERTY_TYPES: &[&str] = &["Apartment", "House_Villa", "Office_Shop", "Land_Other"];

/// Legacy fine-grained property types that `migrate_property_type`
/// collapses into the coarse set.
pub const LEGACY_PROPERTY_TYPES: &[&str] =
    &["Apartment", "House", "Villa", "Office", "Shop", "Land", "Other"];

/// What to do when a listing has no valid images left after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnMissingImages {
    /// Leave the record imageless; the UI renders an explicit empty state.
    #[default]
    Empty,
    /// Substitute the category-default stock image.
    Placeholder,
}

/// Maps a legacy region label to its canonical form. Fixed table;
/// unknown labels pass through unchanged.
pub fn canonical_region(region: &str) -> &str {
    match region {
        "호치민시" => "호치민",
        other => other,
    }
}

/// Maps a legacy fine-grained property type to its coarse category.
/// Coarse values map to themselves; unmapped values pass through.
pub fn migrate_property_type(property_type: &str) -> &str {
    match property_type {
        "House" | "Villa" => "House_Villa",
        "Office" | "Shop" => "Office_Shop",
        "Land" | "Other" => "Land_Other",
        other => other,
    }
}

/// An image reference is valid if it is an absolute HTTP(S) URL or an
/// inline-encoded image payload. Anything else, in particular `blob:`
/// object URLs, is meaningless outside the browser session that minted
/// it and must not be persisted or served.
pub fn is_valid_image_ref(image: &str) -> bool {
    if image.starts_with("data:image/") {
        return true;
    }
    match Url::parse(image) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Category-default stock image, used only in `Placeholder` mode.
fn placeholder_image(property_type: &str) -> &'static str {
    match property_type {
        "Apartment" => "https://images.unsplash.com/photo-1545324418-cc1a3fa10c00?w=500",
        "House_Villa" => "https://images.unsplash.com/photo-1613977257363-707ba9348227?w=500",
        "Office_Shop" => "https://images.unsplash.com/photo-1486406146926-c627a92ad1ab?w=500",
        _ => "https://images.unsplash.com/photo-1560518883-ce09059eeffa?w=500",
    }
}

/// Applies every read-time normalization to a stored record.
pub fn normalize_listing(mut listing: Listing, on_missing: OnMissingImages) -> Listing {
    listing.region = canonical_region(&listing.region).to_string();
    listing.property_type = migrate_property_type(&listing.property_type).to_string();
    listing.images.retain(|image| is_valid_image_ref(image));

    if listing.images.is_empty() && on_missing == OnMissingImages::Placeholder {
        listing.images = vec![placeholder_image(&listing.property_type).to_string()];
    }

    listing
}

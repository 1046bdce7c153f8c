// src/domain/filter.rs
//
// The search/filter engine: a pure function from (collection, filter set)
// to the matching subset in display order. Absent fields impose no
// constraint; malformed numeric inputs are treated as absent (fail open).

use std::borrow::Cow;

use crate::domain::listing::Listing;

/// Optional-field query object narrowing a listing search.
/// All predicates AND together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilters {
    pub search: Option<String>,
    pub region: Option<String>,
    /// Kept as the raw query value: exact-match equality, so an unknown
    /// value matches nothing rather than being ignored.
    pub transaction_type: Option<String>,
    pub property_type: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub min_area: Option<i64>,
    pub max_area: Option<i64>,
}

impl SearchFilters {
    /// Builds a filter set from decoded query pairs. Empty values and
    /// unparseable numbers are ignored rather than rejected, so a bad
    /// query never becomes an error.
    pub fn from_query_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Cow<'a, str>, Cow<'a, str>)>,
    {
        let mut filters = SearchFilters::default();

        for (key, value) in pairs {
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                "search" => filters.search = Some(value.into_owned()),
                "region" => filters.region = Some(value.into_owned()),
                "transaction_type" => filters.transaction_type = Some(value.into_owned()),
                "property_type" => filters.property_type = Some(value.into_owned()),
                "minPrice" => filters.min_price = value.parse().ok(),
                "maxPrice" => filters.max_price = value.parse().ok(),
                "minArea" => filters.min_area = value.parse().ok(),
                "maxArea" => filters.max_area = value.parse().ok(),
                _ => {}
            }
        }

        filters
    }

    /// True when every present predicate holds for the listing.
    pub fn matches(&self, listing: &Listing) -> bool {
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let in_title = listing.title.to_lowercase().contains(&needle);
            let in_description = listing.description.to_lowercase().contains(&needle);
            if !in_title && !in_description {
                return false;
            }
        }
        if let Some(region) = &self.region {
            if listing.region != *region {
                return false;
            }
        }
        if let Some(transaction_type) = &self.transaction_type {
            if listing.transaction_type.as_str() != transaction_type {
                return false;
            }
        }
        if let Some(property_type) = &self.property_type {
            if listing.property_type != *property_type {
                return false;
            }
        }
        if let Some(min_price) = self.min_price {
            if listing.price < min_price {
                return false;
            }
        }
        if let Some(max_price) = self.max_price {
            if listing.price > max_price {
                return false;
            }
        }
        if let Some(min_area) = self.min_area {
            if listing.area < min_area {
                return false;
            }
        }
        if let Some(max_area) = self.max_area {
            if listing.area > max_area {
                return false;
            }
        }
        true
    }
}

/// Applies the filter set and orders the result newest-first.
/// The sort is stable, so listings created at the same instant keep
/// their original insertion order.
pub fn filter_listings(listings: Vec<Listing>, filters: &SearchFilters) -> Vec<Listing> {
    let mut matched: Vec<Listing> = listings
        .into_iter()
        .filter(|listing| filters.matches(listing))
        .collect();

    matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    matched
}

// src/repo/memory.rs
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::domain::listing::{fresh_listing_id, Listing, ListingForm};
use crate::errors::ServerError;
use crate::repo::ListingRepository;

/// In-memory adapter. Used by tests and single-process deployments that
/// don't need a database file.
///
/// An optional capacity models a quota-limited store: when full, `create`
/// prunes the oldest record, retries the insert once, and only then
/// reports a storage error.
pub struct MemoryListings {
    inner: Mutex<Vec<Listing>>,
    capacity: Option<usize>,
}

impl MemoryListings {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Vec::new()),
            capacity: None,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Vec::new()),
            capacity: Some(capacity),
        }
    }

    pub fn seeded(listings: Vec<Listing>) -> Self {
        Self {
            inner: Mutex::new(listings),
            capacity: None,
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<Listing>>, ServerError> {
        self.inner.lock().map_err(|_| ServerError::InternalError)
    }

    /// Drops the record with the oldest `created_at`. Returns whether
    /// anything was pruned.
    fn prune_oldest(store: &mut Vec<Listing>) -> bool {
        let oldest = store
            .iter()
            .enumerate()
            .min_by_key(|(_, l)| l.created_at)
            .map(|(i, _)| i);
        match oldest {
            Some(index) => {
                let removed = store.remove(index);
                log::warn!(
                    "listing store full, pruned oldest record {} (created {})",
                    removed.id,
                    removed.created_at
                );
                true
            }
            None => false,
        }
    }
}

impl Default for MemoryListings {
    fn default() -> Self {
        Self::new()
    }
}

impl ListingRepository for MemoryListings {
    fn list(&self) -> Result<Vec<Listing>, ServerError> {
        Ok(self.lock()?.clone())
    }

    fn get(&self, id: &str) -> Result<Option<Listing>, ServerError> {
        Ok(self.lock()?.iter().find(|l| l.id == id).cloned())
    }

    fn create(&self, form: ListingForm, now: DateTime<Utc>) -> Result<Listing, ServerError> {
        let listing = form.into_listing(fresh_listing_id(now), now);
        let mut store = self.lock()?;

        if let Some(capacity) = self.capacity {
            if store.len() >= capacity {
                // Quota policy: prune once, retry once, then give up.
                if !Self::prune_oldest(&mut store) || store.len() >= capacity {
                    return Err(ServerError::DbError(
                        "listing store is full".to_string(),
                    ));
                }
            }
        }

        store.push(listing.clone());
        Ok(listing)
    }

    fn update(
        &self,
        id: &str,
        form: &ListingForm,
        now: DateTime<Utc>,
    ) -> Result<Option<Listing>, ServerError> {
        let mut store = self.lock()?;
        let Some(existing) = store.iter_mut().find(|l| l.id == id) else {
            return Ok(None);
        };

        if existing.updated_at > now {
            log::warn!(
                "concurrent write on listing {id}: stored updated_at {} is newer than this request; last writer wins",
                existing.updated_at
            );
        }

        existing.title = form.title.clone();
        existing.description = form.description.clone();
        existing.price = form.price;
        existing.area = form.area;
        existing.region = form.region.clone();
        existing.transaction_type = form.transaction_type;
        existing.property_type = form.property_type.clone();
        existing.images = form.images.clone();
        existing.updated_at = now;

        Ok(Some(existing.clone()))
    }

    fn delete(&self, id: &str) -> Result<bool, ServerError> {
        let mut store = self.lock()?;
        let before = store.len();
        store.retain(|l| l.id != id);
        Ok(store.len() < before)
    }
}

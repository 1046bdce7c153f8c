// src/repo/mod.rs
//
// Storage-agnostic listing repository. The router only ever sees this
// trait; which adapter backs it is a deployment decision made once in
// `main`, never branched on elsewhere.

pub mod memory;

use chrono::{DateTime, Utc};

use crate::db::connection::Database;
use crate::db::listings;
use crate::domain::listing::{fresh_listing_id, Listing, ListingForm};
use crate::errors::ServerError;

pub trait ListingRepository: Send + Sync {
    /// Unfiltered full scan. Ordering is the filter engine's job.
    fn list(&self) -> Result<Vec<Listing>, ServerError>;

    fn get(&self, id: &str) -> Result<Option<Listing>, ServerError>;

    /// Assigns a fresh id and sets `created_at = updated_at = now`.
    fn create(&self, form: ListingForm, now: DateTime<Utc>) -> Result<Listing, ServerError>;

    /// Replaces the editable fields, refreshing `updated_at`.
    /// `None` when the id is unknown.
    fn update(
        &self,
        id: &str,
        form: &ListingForm,
        now: DateTime<Utc>,
    ) -> Result<Option<Listing>, ServerError>;

    /// `false` when the id is unknown.
    fn delete(&self, id: &str) -> Result<bool, ServerError>;
}

/// The SQLite-backed deployment adapter.
pub struct SqliteListings {
    db: Database,
}

impl SqliteListings {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl ListingRepository for SqliteListings {
    fn list(&self) -> Result<Vec<Listing>, ServerError> {
        self.db.with_conn(|conn| listings::list_listings(conn))
    }

    fn get(&self, id: &str) -> Result<Option<Listing>, ServerError> {
        self.db.with_conn(|conn| listings::get_listing(conn, id))
    }

    fn create(&self, form: ListingForm, now: DateTime<Utc>) -> Result<Listing, ServerError> {
        let listing = form.into_listing(fresh_listing_id(now), now);
        self.db
            .with_conn(|conn| listings::insert_listing(conn, &listing))?;
        Ok(listing)
    }

    fn update(
        &self,
        id: &str,
        form: &ListingForm,
        now: DateTime<Utc>,
    ) -> Result<Option<Listing>, ServerError> {
        self.db
            .with_conn(|conn| listings::update_listing(conn, id, form, now))
    }

    fn delete(&self, id: &str) -> Result<bool, ServerError> {
        self.db.with_conn(|conn| listings::delete_listing(conn, id))
    }
}

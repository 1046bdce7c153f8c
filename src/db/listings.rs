// src/db/listings.rs
use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::domain::listing::{Listing, ListingForm, TransactionType};
use crate::errors::ServerError;

fn row_to_listing(row: &Row) -> rusqlite::Result<Listing> {
    let transaction_type: String = row.get(6)?;
    let images_json: String = row.get(8)?;

    Ok(Listing {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        price: row.get(3)?,
        area: row.get(4)?,
        region: row.get(5)?,
        // Tolerate unknown stored values instead of failing the whole read.
        transaction_type: TransactionType::parse(&transaction_type).unwrap_or_default(),
        property_type: row.get(7)?,
        images: serde_json::from_str(&images_json).unwrap_or_default(),
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

const LISTING_COLUMNS: &str = "id, title, description, price, area, region, \
     transaction_type, property_type, images, created_at, updated_at";

/// Full scan in insertion order. Display ordering is the filter engine's job.
pub fn list_listings(conn: &Connection) -> Result<Vec<Listing>, ServerError> {
    let mut stmt = conn
        .prepare(&format!(
            "select {LISTING_COLUMNS} from listings order by rowid"
        ))
        .map_err(|e| ServerError::DbError(format!("prepare list failed: {e}")))?;

    let rows = stmt
        .query_map([], row_to_listing)
        .map_err(|e| ServerError::DbError(format!("list listings failed: {e}")))?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(|e| ServerError::DbError(format!("read listing row failed: {e}")))?);
    }
    Ok(out)
}

pub fn get_listing(conn: &Connection, id: &str) -> Result<Option<Listing>, ServerError> {
    conn.query_row(
        &format!("select {LISTING_COLUMNS} from listings where id = ?"),
        params![id],
        row_to_listing,
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("select listing failed: {e}")))
}

pub fn insert_listing(conn: &Connection, listing: &Listing) -> Result<(), ServerError> {
    let images_json = serde_json::to_string(&listing.images)
        .map_err(|e| ServerError::DbError(format!("encode images failed: {e}")))?;

    conn.execute(
        "insert into listings (id, title, description, price, area, region,
             transaction_type, property_type, images, created_at, updated_at)
         values (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            listing.id,
            listing.title,
            listing.description,
            listing.price,
            listing.area,
            listing.region,
            listing.transaction_type.as_str(),
            listing.property_type,
            images_json,
            listing.created_at,
            listing.updated_at,
        ],
    )
    .map_err(|e| ServerError::DbError(format!("insert listing failed: {e}")))?;
    Ok(())
}

/// Replaces the editable fields of a listing, refreshing `updated_at` and
/// leaving `id`/`created_at` untouched. Returns the updated record, or
/// `None` when the id is unknown. Writes are last-writer-wins; a record
/// already touched after `now` was taken gets overwritten with a warning.
pub fn update_listing(
    conn: &Connection,
    id: &str,
    form: &ListingForm,
    now: DateTime<Utc>,
) -> Result<Option<Listing>, ServerError> {
    let Some(existing) = get_listing(conn, id)? else {
        return Ok(None);
    };

    if existing.updated_at > now {
        log::warn!(
            "concurrent write on listing {id}: stored updated_at {} is newer than this request; last writer wins",
            existing.updated_at
        );
    }

    let images_json = serde_json::to_string(&form.images)
        .map_err(|e| ServerError::DbError(format!("encode images failed: {e}")))?;

    conn.execute(
        "update listings set title = ?, description = ?, price = ?, area = ?,
             region = ?, transaction_type = ?, property_type = ?, images = ?,
             updated_at = ?
         where id = ?",
        params![
            form.title,
            form.description,
            form.price,
            form.area,
            form.region,
            form.transaction_type.as_str(),
            form.property_type,
            images_json,
            now,
            id,
        ],
    )
    .map_err(|e| ServerError::DbError(format!("update listing failed: {e}")))?;

    Ok(Some(Listing {
        id: existing.id,
        title: form.title.clone(),
        description: form.description.clone(),
        price: form.price,
        area: form.area,
        region: form.region.clone(),
        transaction_type: form.transaction_type,
        property_type: form.property_type.clone(),
        images: form.images.clone(),
        created_at: existing.created_at,
        updated_at: now,
    }))
}

/// Removes a listing. `false` means the id was unknown, which callers
/// report as not-found rather than a failure.
pub fn delete_listing(conn: &Connection, id: &str) -> Result<bool, ServerError> {
    let deleted = conn
        .execute("delete from listings where id = ?", params![id])
        .map_err(|e| ServerError::DbError(format!("delete listing failed: {e}")))?;
    Ok(deleted == 1)
}

pub fn count_listings(conn: &Connection) -> Result<i64, ServerError> {
    conn.query_row("select count(*) from listings", [], |r| r.get(0))
        .map_err(|e| ServerError::DbError(format!("count listings failed: {e}")))
}

/// The three historical demo listings. Note listing 2 and 3 still carry
/// legacy fine-grained property types; read-time normalization handles them.
pub fn demo_listings() -> Vec<Listing> {
    vec![
        Listing {
            id: "1".to_string(),
            title: "호치민 1구역 럭셔리 아파트".to_string(),
            description: "호치민 시내 중심가에 위치한 고급 아파트입니다. 완벽한 시설과 보안을 제공합니다."
                .to_string(),
            price: 2_500_000_000,
            area: 85,
            region: "호치민".to_string(),
            transaction_type: TransactionType::Sale,
            property_type: "Apartment".to_string(),
            images: vec![
                "https://images.unsplash.com/photo-1545324418-cc1a3fa10c00?w=500".to_string(),
            ],
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        },
        Listing {
            id: "2".to_string(),
            title: "하노이 2구역 오피스 빌딩".to_string(),
            description: "하노이 비즈니스 중심가의 현대적인 오피스 빌딩입니다.".to_string(),
            price: 5_000_000_000,
            area: 200,
            region: "하노이".to_string(),
            transaction_type: TransactionType::Sale,
            property_type: "Office".to_string(),
            images: vec![
                "https://images.unsplash.com/photo-1486406146926-c627a92ad1ab?w=500".to_string(),
            ],
            created_at: Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
        },
        Listing {
            id: "3".to_string(),
            title: "다낭 해변가 빌라".to_string(),
            description: "다낭 해변가에 위치한 럭셔리 빌라(Luxury Villa)입니다. 바다 전망을 즐길 수 있습니다."
                .to_string(),
            price: 15_000_000,
            area: 150,
            region: "다낭".to_string(),
            transaction_type: TransactionType::Rent,
            property_type: "Villa".to_string(),
            images: vec![
                "https://images.unsplash.com/photo-1613977257363-707ba9348227?w=500".to_string(),
            ],
            created_at: Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap(),
        },
    ]
}

/// Inserts the demo listings once into an empty table so a fresh
/// deployment has something to show.
pub fn seed_demo_listings(conn: &Connection) -> Result<usize, ServerError> {
    if count_listings(conn)? > 0 {
        return Ok(0);
    }

    let seeds = demo_listings();
    for listing in &seeds {
        insert_listing(conn, listing)?;
    }
    Ok(seeds.len())
}

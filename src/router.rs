// src/router.rs
use astra::{Body, Request};
use chrono::Utc;
use serde::Deserialize;
use std::io::Read;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::auth::gate::AdminGate;
use crate::config::AppConfig;
use crate::db::connection::Database;
use crate::domain::filter::{filter_listings, SearchFilters};
use crate::domain::listing::{Listing, ListingForm};
use crate::domain::normalize::{
    canonical_region, is_valid_image_ref, migrate_property_type, normalize_listing,
};
use crate::errors::{ResultResp, ServerError};
use crate::repo::ListingRepository;
use crate::responses;

/// Everything a request handler needs, constructed once at process start
/// and cloned into each server worker.
#[derive(Clone)]
pub struct App {
    /// Session store. Logically independent from the listing repository
    /// even when both live in the same SQLite file.
    pub db: Database,
    pub repo: Arc<dyn ListingRepository>,
    pub gate: AdminGate,
    pub config: AppConfig,
}

#[derive(Deserialize)]
struct LoginRequest {
    username: Option<String>,
    password: Option<String>,
}

pub fn handle(req: Request, app: &App) -> ResultResp {
    let (parts, body) = req.into_parts();
    let method = parts.method.as_str();
    let segments: Vec<&str> = parts
        .uri
        .path()
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();

    let bearer = parts
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match (method, segments.as_slice()) {
        ("GET", ["listings"]) => list_listings(app, parts.uri.query()),
        ("GET", ["listings", id]) => get_listing(app, id),
        ("POST", ["listings"]) => {
            require_admin(app, bearer)?;
            create_listing(app, body)
        }
        ("PUT", ["listings", id]) => {
            require_admin(app, bearer)?;
            update_listing(app, id, body)
        }
        ("DELETE", ["listings", id]) => {
            require_admin(app, bearer)?;
            delete_listing(app, id)
        }
        ("POST", ["admin", "login"]) => login(app, body),
        ("POST", ["admin", "logout"]) => logout(app, bearer),
        _ => Err(ServerError::NotFound),
    }
}

fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

fn require_admin(app: &App, token: Option<&str>) -> Result<(), ServerError> {
    if app.gate.is_authenticated(&app.db, token, now_unix())? {
        Ok(())
    } else {
        Err(ServerError::Unauthorized)
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(mut body: Body) -> Result<T, ServerError> {
    let mut raw = String::new();
    body.reader()
        .read_to_string(&mut raw)
        .map_err(|e| ServerError::BadRequest(format!("unreadable body: {e}")))?;
    serde_json::from_str(&raw).map_err(|e| ServerError::BadRequest(format!("invalid JSON: {e}")))
}

/// Write-side normalization: region alias, property-type migration to
/// the coarse enumeration, and dropping invalid image refs, so legacy
/// shapes never enter storage through this server.
fn normalized_form(mut form: ListingForm) -> ListingForm {
    form.region = canonical_region(&form.region).to_string();
    form.property_type = migrate_property_type(&form.property_type).to_string();
    form.images.retain(|image| is_valid_image_ref(image));
    form
}

fn load_normalized(app: &App) -> Result<Vec<Listing>, ServerError> {
    let on_missing = app.config.on_missing_images;
    Ok(app
        .repo
        .list()?
        .into_iter()
        .map(|listing| normalize_listing(listing, on_missing))
        .collect())
}

fn list_listings(app: &App, query: Option<&str>) -> ResultResp {
    let filters = match query {
        Some(q) => SearchFilters::from_query_pairs(url::form_urlencoded::parse(q.as_bytes())),
        None => SearchFilters::default(),
    };

    let listings = load_normalized(app)?;
    responses::ok(filter_listings(listings, &filters))
}

fn get_listing(app: &App, id: &str) -> ResultResp {
    match app.repo.get(id)? {
        Some(listing) => responses::ok(normalize_listing(listing, app.config.on_missing_images)),
        None => Err(ServerError::NotFound),
    }
}

fn create_listing(app: &App, body: Body) -> ResultResp {
    let form = normalized_form(read_json::<ListingForm>(body)?);
    form.validate()?;

    let listing = app.repo.create(form, Utc::now())?;
    log::info!("created listing {}", listing.id);
    responses::created(listing, "Property created successfully")
}

fn update_listing(app: &App, id: &str, body: Body) -> ResultResp {
    let form = normalized_form(read_json::<ListingForm>(body)?);
    form.validate()?;

    match app.repo.update(id, &form, Utc::now())? {
        Some(listing) => {
            log::info!("updated listing {id}");
            responses::ok_mutation(listing, "Property updated successfully")
        }
        None => Err(ServerError::NotFound),
    }
}

fn delete_listing(app: &App, id: &str) -> ResultResp {
    if app.repo.delete(id)? {
        log::info!("deleted listing {id}");
        responses::message("Property deleted successfully")
    } else {
        Err(ServerError::NotFound)
    }
}

fn login(app: &App, body: Body) -> ResultResp {
    let request = read_json::<LoginRequest>(body)?;
    let (Some(username), Some(password)) = (request.username, request.password) else {
        return Err(ServerError::BadRequest(
            "Username and password are required".to_string(),
        ));
    };

    match app.gate.login(&app.db, &username, &password, now_unix())? {
        Some(token) => {
            responses::ok_mutation(serde_json::json!({ "token": token }), "Login successful")
        }
        None => Err(ServerError::Unauthorized),
    }
}

fn logout(app: &App, token: Option<&str>) -> ResultResp {
    let Some(token) = token else {
        return Err(ServerError::Unauthorized);
    };
    app.gate.logout(&app.db, token, now_unix())?;
    responses::message("Logged out")
}

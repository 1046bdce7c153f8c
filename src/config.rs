// src/config.rs
use std::env;

use crate::auth::gate::AdminCredentials;
use crate::domain::normalize::OnMissingImages;

/// Which repository adapter backs the catalog. One adapter per
/// deployment; nothing downstream ever branches on this again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreKind {
    #[default]
    Sqlite,
    Memory,
}

/// Environment-driven configuration. Every variable has a default, so
/// `load` never fails.
#[derive(Clone)]
pub struct AppConfig {
    pub addr: String,
    pub db_path: String,
    pub store: StoreKind,
    pub admin: AdminCredentials,
    pub on_missing_images: OnMissingImages,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:3000".to_string(),
            db_path: "vn_estate.sqlite3".to_string(),
            store: StoreKind::Sqlite,
            admin: AdminCredentials::default(),
            on_missing_images: OnMissingImages::Empty,
        }
    }
}

impl AppConfig {
    pub fn load() -> Self {
        let defaults = Self::default();

        let admin = AdminCredentials {
            username: env::var("VN_ESTATE_ADMIN_USER").unwrap_or(defaults.admin.username),
            password: env::var("VN_ESTATE_ADMIN_PASS").unwrap_or(defaults.admin.password),
        };

        let on_missing_images = match env::var("VN_ESTATE_MISSING_IMAGES").as_deref() {
            Ok("placeholder") => OnMissingImages::Placeholder,
            _ => defaults.on_missing_images,
        };

        let store = match env::var("VN_ESTATE_STORE").as_deref() {
            Ok("memory") => StoreKind::Memory,
            _ => defaults.store,
        };

        Self {
            addr: env::var("VN_ESTATE_ADDR").unwrap_or(defaults.addr),
            db_path: env::var("VN_ESTATE_DB").unwrap_or(defaults.db_path),
            store,
            admin,
            on_missing_images,
        }
    }
}

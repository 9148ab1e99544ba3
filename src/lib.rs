pub mod app;
pub mod config;
pub mod domain;
pub mod http;
pub mod infra;

use crate::infra::{db::Db, uploads::UploadStore};

#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub uploads: UploadStore,
    pub paseto_key: [u8; 32],
    pub token_ttl_hours: u64,
    pub upload_max_bytes: i64,
}

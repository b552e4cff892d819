use crate::config::StorageConfig;
use crate::services::{AdminService, PingService, QueryService};
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub ping_service: Arc<PingService>,
    pub query_service: Arc<QueryService>,
    pub admin_service: Arc<AdminService>,
}

impl AppState {
    pub fn build(pool: SqlitePool, storage: &StorageConfig) -> Self {
        Self {
            ping_service: Arc::new(PingService::new(pool.clone())),
            query_service: Arc::new(QueryService::new(pool.clone())),
            admin_service: Arc::new(AdminService::new(pool, storage.get_vacuum_on_clear())),
        }
    }
}

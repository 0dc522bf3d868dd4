use std::sync::Arc;

use common::context::Context;

use crate::config::AppConfig;
use crate::file_store::FileStore;

pub struct GlobalState {
    pub config: AppConfig,
    pub ctx: Context,
    pub db: Arc<sqlx::PgPool>,
    pub file_store: FileStore,
}

impl GlobalState {
    pub fn new(config: AppConfig, db: Arc<sqlx::PgPool>, ctx: Context) -> Self {
        let file_store = FileStore::new(config.uploads.root.clone());

        Self {
            config,
            ctx,
            db,
            file_store,
        }
    }
}

pub mod draft_store;
pub mod file_store;
pub mod memory_store;
pub mod pg_store;
pub mod pool;

use std::sync::Arc;

use tracing::info;

use crate::config::{Config, StoreKind};
use crate::error::Result;

pub use draft_store::{CommitOutcome, DraftStore, StoredDraft};
pub use file_store::FileDraftStore;
pub use memory_store::MemoryDraftStore;
pub use pg_store::PgDraftStore;

/// Opens the draft store selected by `DRAFT_STORE`.
pub async fn open_store(config: &Config) -> Result<Arc<dyn DraftStore>> {
    let store: Arc<dyn DraftStore> = match config.draft_store {
        StoreKind::Memory => Arc::new(MemoryDraftStore::new()),
        StoreKind::File => Arc::new(FileDraftStore::open(&config.draft_dir).await?),
        StoreKind::Postgres => {
            let pool = pool::create_pool(config).await?;
            let store = PgDraftStore::new(pool);
            store.migrate().await?;
            Arc::new(store)
        }
    };
    info!(kind = ?config.draft_store, "draft store ready");
    Ok(store)
}

pub mod cli;
pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod models;
pub mod services;
pub mod telemetry;
pub mod utils;

use std::sync::Arc;

use crate::config::Config;
use crate::database::{open_store, DraftStore};
use crate::error::Result;
use crate::services::{
    curriculum_service::CurriculumService, draft_service::DraftService,
    review_service::ReviewService,
};
use crate::utils::id::IdGenerator;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub ids: IdGenerator,
    pub curriculum: CurriculumService,
    pub review: ReviewService,
    pub drafts: DraftService,
}

impl AppState {
    /// Wires every service to one identifier generator and one store.
    pub fn new(config: &Config, store: Arc<dyn DraftStore>) -> Self {
        let ids = IdGenerator::new();
        let curriculum = CurriculumService::new(ids.clone());
        let review = ReviewService::new(config.review.clone());
        let drafts = DraftService::new(store, curriculum.clone(), review.clone());

        Self {
            config: config.clone(),
            ids,
            curriculum,
            review,
            drafts,
        }
    }

    pub async fn from_config(config: &Config) -> Result<Self> {
        let store = open_store(config).await?;
        Ok(Self::new(config, store))
    }
}

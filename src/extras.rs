use std::sync::Arc;

use serde_json::Value;

use crate::db::extras_repository::ExtrasRepository;
use crate::db::models::YT_CAROUSEL_TITLE;
use crate::error::AppError;

/// Access to the featured-video carousel list.
///
/// The carousel lives in a singleton extras entry that is provisioned
/// outside this service; it is read and overwritten here, never created.
#[derive(Clone)]
pub struct ExtrasService {
    extras: Arc<dyn ExtrasRepository>,
}

impl ExtrasService {
    pub fn new(extras: Arc<dyn ExtrasRepository>) -> Self {
        Self { extras }
    }

    /// The carousel items, or `None` when the singleton entry does not exist.
    pub async fn get_list(&self) -> Result<Option<Vec<Value>>, AppError> {
        Ok(self
            .extras
            .find_by_title(YT_CAROUSEL_TITLE)
            .await?
            .map(|entry| entry.list))
    }

    /// Replace the whole carousel list.
    pub async fn replace_list(&self, list: Option<Vec<Value>>) -> Result<(), AppError> {
        let Some(list) = list else {
            return Err(AppError::Validation("Missing new list.".into()));
        };
        let len = list.len();

        let outcome = self.extras.replace_list(YT_CAROUSEL_TITLE, list).await?;
        if outcome.matched == 0 {
            tracing::warn!("Carousel entry '{}' does not exist", YT_CAROUSEL_TITLE);
            return Err(AppError::UpdateMismatch {
                matched: outcome.matched,
                modified: outcome.modified,
            });
        }
        outcome.require_modified()?;

        tracing::info!(items = len, "Replaced carousel list");
        Ok(())
    }
}

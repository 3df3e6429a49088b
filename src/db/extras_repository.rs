use async_trait::async_trait;
use serde_json::Value;

use crate::db::models::{ExtrasEntry, UpdateOutcome};
use crate::error::AppError;

/// Repository trait for the `extras` collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExtrasRepository: Send + Sync {
    /// Find the entry with the given title.
    async fn find_by_title(&self, title: &str) -> Result<Option<ExtrasEntry>, AppError>;

    /// Overwrite the `list` of an existing entry. Never creates one.
    async fn replace_list(&self, title: &str, list: Vec<Value>) -> Result<UpdateOutcome, AppError>;
}

/// MongoDB implementation of the ExtrasRepository.
#[cfg(feature = "mongo")]
pub struct MongoExtrasRepository {
    collection: mongodb::Collection<mongodb::bson::Document>,
}

#[cfg(feature = "mongo")]
impl MongoExtrasRepository {
    pub fn new(db: &mongodb::Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection(collection_name),
        }
    }
}

#[cfg(feature = "mongo")]
#[async_trait]
impl ExtrasRepository for MongoExtrasRepository {
    async fn find_by_title(&self, title: &str) -> Result<Option<ExtrasEntry>, AppError> {
        use mongodb::bson::doc;

        self.collection
            .find_one(doc! { "title": title })
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .map(crate::db::models::extras_from_document)
            .transpose()
    }

    async fn replace_list(&self, title: &str, list: Vec<Value>) -> Result<UpdateOutcome, AppError> {
        use mongodb::bson::{doc, Bson};
        use mongodb::options::UpdateOptions;

        let items = list
            .iter()
            .map(crate::db::models::json_to_bson)
            .collect::<Result<Vec<Bson>, _>>()?;

        let options = UpdateOptions::builder().upsert(false).build();

        let result = self
            .collection
            .update_one(doc! { "title": title }, doc! { "$set": { "list": items } })
            .with_options(options)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(UpdateOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }
}

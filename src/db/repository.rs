use async_trait::async_trait;

use crate::db::models::{Blog, BlogId, NewBlog, UpdateOutcome};
use crate::error::AppError;

/// Repository trait for blog documents.
///
/// This trait allows swapping the database layer in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlogRepository: Send + Sync {
    /// Insert a new blog. The store assigns its id.
    async fn insert(&self, blog: NewBlog) -> Result<Blog, AppError>;

    /// Find a blog by id, whatever its status.
    async fn find_by_id(&self, id: BlogId) -> Result<Option<Blog>, AppError>;

    /// Every blog in store iteration order.
    async fn find_all(&self) -> Result<Vec<Blog>, AppError>;

    /// Overwrite the `status` and `tags` of one blog, without upsert.
    async fn update_status_and_tags(
        &self,
        id: BlogId,
        status: bool,
        tags: Vec<String>,
    ) -> Result<UpdateOutcome, AppError>;

    /// Remove a blog. Returns the number of deleted documents.
    async fn delete_by_id(&self, id: BlogId) -> Result<u64, AppError>;
}

/// MongoDB implementation of the BlogRepository.
///
/// Only available when the `mongo` feature is enabled.
#[cfg(feature = "mongo")]
pub struct MongoBlogRepository {
    collection: mongodb::Collection<mongodb::bson::Document>,
}

#[cfg(feature = "mongo")]
impl MongoBlogRepository {
    pub fn new(db: &mongodb::Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection(collection_name),
        }
    }
}

#[cfg(feature = "mongo")]
#[async_trait]
impl BlogRepository for MongoBlogRepository {
    async fn insert(&self, blog: NewBlog) -> Result<Blog, AppError> {
        let document = crate::db::models::new_blog_to_document(&blog)?;

        let result = self
            .collection
            .insert_one(document)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let oid = result.inserted_id.as_object_id().ok_or_else(|| {
            AppError::Database(format!(
                "insert returned a non-ObjectId id: {}",
                result.inserted_id
            ))
        })?;

        Ok(blog.into_blog(BlogId::from(oid)))
    }

    async fn find_by_id(&self, id: BlogId) -> Result<Option<Blog>, AppError> {
        use mongodb::bson::doc;

        self.collection
            .find_one(doc! { "_id": id.object_id() })
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .map(crate::db::models::blog_from_document)
            .transpose()
    }

    async fn find_all(&self) -> Result<Vec<Blog>, AppError> {
        use futures::TryStreamExt;
        use mongodb::bson::doc;

        let mut cursor = self
            .collection
            .find(doc! {})
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut blogs = Vec::new();
        while let Some(document) = cursor
            .try_next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            blogs.push(crate::db::models::blog_from_document(document)?);
        }

        Ok(blogs)
    }

    async fn update_status_and_tags(
        &self,
        id: BlogId,
        status: bool,
        tags: Vec<String>,
    ) -> Result<UpdateOutcome, AppError> {
        use mongodb::bson::doc;
        use mongodb::options::UpdateOptions;

        let options = UpdateOptions::builder().upsert(false).build();

        let result = self
            .collection
            .update_one(
                doc! { "_id": id.object_id() },
                doc! { "$set": { "status": status, "tags": tags } },
            )
            .with_options(options)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(UpdateOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn delete_by_id(&self, id: BlogId) -> Result<u64, AppError> {
        use mongodb::bson::doc;

        let result = self
            .collection
            .delete_one(doc! { "_id": id.object_id() })
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.deleted_count)
    }
}

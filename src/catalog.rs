use std::sync::Arc;

use serde_json::Value;

use crate::db::models::{Blog, BlogId, NewBlog};
use crate::db::repository::BlogRepository;
use crate::error::AppError;
use crate::models::tag::Tag;

/// Maximum number of posts returned by [`CatalogService::get_recent`].
pub const RECENT_LIMIT: usize = 5;

const BLOG_NOT_FOUND: &str = "Blog does not exist.";

/// Blog catalog operations: creation, lookup, filtering, search and curation.
///
/// Reads for the public only ever see published posts (`status == true`);
/// `list_all` is the administrative view that includes hidden ones.
#[derive(Clone)]
pub struct CatalogService {
    blogs: Arc<dyn BlogRepository>,
    clock: fn() -> i64,
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

impl CatalogService {
    pub fn new(blogs: Arc<dyn BlogRepository>) -> Self {
        Self {
            blogs,
            clock: now_millis,
        }
    }

    /// Replace the wall clock used to stamp new posts.
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    /// Store a new published post built from arbitrary author-supplied details.
    pub async fn create(&self, details: Option<Value>) -> Result<Blog, AppError> {
        let details = match details {
            Some(Value::Object(map)) if !map.is_empty() => map,
            _ => {
                return Err(AppError::Validation(
                    "Missing fields for creating blog.".into(),
                ))
            }
        };

        let new_blog = NewBlog::from_details(details, (self.clock)());
        let blog = self.blogs.insert(new_blog).await?;
        tracing::info!(blog_id = %blog.id, "Created blog");
        Ok(blog)
    }

    /// Fetch a published post. Hidden and absent posts are reported alike.
    pub async fn get_by_id(&self, id: &str) -> Result<Blog, AppError> {
        let Ok(id) = id.parse::<BlogId>() else {
            return Err(AppError::NotFound(BLOG_NOT_FOUND.into()));
        };

        match self.blogs.find_by_id(id).await? {
            Some(blog) if blog.is_visible() => Ok(blog),
            _ => Err(AppError::NotFound(BLOG_NOT_FOUND.into())),
        }
    }

    /// The most recently created published posts, newest first.
    pub async fn get_recent(&self) -> Result<Vec<Blog>, AppError> {
        let mut blogs = self.published().await?;
        newest_first(&mut blogs);
        blogs.truncate(RECENT_LIMIT);
        Ok(blogs)
    }

    /// Published posts carrying `tag`, newest first.
    ///
    /// `tag` must belong to the fixed vocabulary; it is checked before the store is read.
    pub async fn get_by_tag(&self, tag: &str) -> Result<Vec<Blog>, AppError> {
        let tag: Tag = tag
            .parse()
            .map_err(|_| AppError::Validation("Use Correct tag.".into()))?;

        let mut blogs: Vec<Blog> = self
            .published()
            .await?
            .into_iter()
            .filter(|blog| blog.has_tag(tag.as_str()))
            .collect();
        newest_first(&mut blogs);
        Ok(blogs)
    }

    /// Every post regardless of status, newest first.
    pub async fn list_all(&self) -> Result<Vec<Blog>, AppError> {
        let mut blogs = self.blogs.find_all().await?;
        newest_first(&mut blogs);
        Ok(blogs)
    }

    /// Overwrite the status and tags of a post.
    ///
    /// The store must report that it modified every document it matched, so
    /// an update that changes nothing is rejected.
    pub async fn update(
        &self,
        id: Option<&str>,
        status: Option<bool>,
        tags: Option<Vec<String>>,
    ) -> Result<(), AppError> {
        let (Some(id), Some(status), Some(tags)) = (id.filter(|id| !id.is_empty()), status, tags)
        else {
            return Err(AppError::Validation(
                "Missing fields for updating blog.".into(),
            ));
        };

        let Ok(id) = id.parse::<BlogId>() else {
            return Err(AppError::NotFound(BLOG_NOT_FOUND.into()));
        };

        if self.blogs.find_by_id(id).await?.is_none() {
            return Err(AppError::NotFound(BLOG_NOT_FOUND.into()));
        }

        self.blogs
            .update_status_and_tags(id, status, tags)
            .await?
            .require_modified()?;

        tracing::info!(blog_id = %id, status, "Updated blog");
        Ok(())
    }

    /// Remove a post permanently.
    pub async fn delete(&self, id: Option<&str>) -> Result<(), AppError> {
        let Some(id) = id.filter(|id| !id.is_empty()) else {
            return Err(AppError::Validation(
                "Missing fields for deleting blog.".into(),
            ));
        };

        let Ok(id) = id.parse::<BlogId>() else {
            return Err(AppError::NotFound(BLOG_NOT_FOUND.into()));
        };

        if self.blogs.delete_by_id(id).await? != 1 {
            return Err(AppError::NotFound(BLOG_NOT_FOUND.into()));
        }

        tracing::info!(blog_id = %id, "Deleted blog");
        Ok(())
    }

    /// Published posts whose heading, sub-heading or text sections contain
    /// `query` verbatim, newest first.
    pub async fn search(&self, query: Option<&str>) -> Result<Vec<Blog>, AppError> {
        let Some(query) = query.filter(|q| !q.is_empty()) else {
            return Err(AppError::Validation("Missing query.".into()));
        };

        let mut blogs: Vec<Blog> = self
            .published()
            .await?
            .into_iter()
            .filter(|blog| blog.mentions(query))
            .collect();
        newest_first(&mut blogs);
        Ok(blogs)
    }

    async fn published(&self) -> Result<Vec<Blog>, AppError> {
        let mut blogs = self.blogs.find_all().await?;
        blogs.retain(Blog::is_visible);
        Ok(blogs)
    }
}

/// Stable sort by `createdAt`, most recent first.
fn newest_first(blogs: &mut [Blog]) {
    blogs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::db::extras_repository::ExtrasRepository;
use crate::db::models::{Blog, BlogId, ExtrasEntry, NewBlog, UpdateOutcome};
use crate::db::repository::BlogRepository;
use crate::error::AppError;

/// In-process blog store.
///
/// Keeps insertion order as iteration order and reports matched/modified
/// counts the way MongoDB does for `$set` updates.
#[derive(Default)]
pub struct InMemoryBlogRepository {
    blogs: Mutex<Vec<Blog>>,
}

impl InMemoryBlogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an already-identified blog as-is.
    pub fn seed(&self, blog: Blog) -> Result<(), AppError> {
        let mut blogs = self.lock()?;
        blogs.retain(|b| b.id != blog.id);
        blogs.push(blog);
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<Blog>>, AppError> {
        self.blogs
            .lock()
            .map_err(|_| AppError::Database("blog store lock poisoned".into()))
    }
}

#[async_trait]
impl BlogRepository for InMemoryBlogRepository {
    async fn insert(&self, blog: NewBlog) -> Result<Blog, AppError> {
        let blog = blog.into_blog(BlogId::new());
        self.lock()?.push(blog.clone());
        Ok(blog)
    }

    async fn find_by_id(&self, id: BlogId) -> Result<Option<Blog>, AppError> {
        Ok(self.lock()?.iter().find(|b| b.id == id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Blog>, AppError> {
        Ok(self.lock()?.clone())
    }

    async fn update_status_and_tags(
        &self,
        id: BlogId,
        status: bool,
        tags: Vec<String>,
    ) -> Result<UpdateOutcome, AppError> {
        let mut blogs = self.lock()?;
        let Some(blog) = blogs.iter_mut().find(|b| b.id == id) else {
            return Ok(UpdateOutcome::default());
        };

        let unchanged = blog.status == status && blog.tags.as_deref() == Some(tags.as_slice());
        blog.status = status;
        blog.tags = Some(tags);

        Ok(UpdateOutcome {
            matched: 1,
            modified: if unchanged { 0 } else { 1 },
        })
    }

    async fn delete_by_id(&self, id: BlogId) -> Result<u64, AppError> {
        let mut blogs = self.lock()?;
        let before = blogs.len();
        blogs.retain(|b| b.id != id);
        Ok((before - blogs.len()) as u64)
    }
}

/// In-process extras store.
#[derive(Default)]
pub struct InMemoryExtrasRepository {
    entries: Mutex<Vec<ExtrasEntry>>,
}

impl InMemoryExtrasRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `entry`.
    pub fn with_entry(entry: ExtrasEntry) -> Self {
        Self {
            entries: Mutex::new(vec![entry]),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<ExtrasEntry>>, AppError> {
        self.entries
            .lock()
            .map_err(|_| AppError::Database("extras store lock poisoned".into()))
    }
}

#[async_trait]
impl ExtrasRepository for InMemoryExtrasRepository {
    async fn find_by_title(&self, title: &str) -> Result<Option<ExtrasEntry>, AppError> {
        Ok(self.lock()?.iter().find(|e| e.title == title).cloned())
    }

    async fn replace_list(&self, title: &str, list: Vec<Value>) -> Result<UpdateOutcome, AppError> {
        let mut entries = self.lock()?;
        let Some(entry) = entries.iter_mut().find(|e| e.title == title) else {
            return Ok(UpdateOutcome::default());
        };

        let unchanged = entry.list == list;
        entry.list = list;

        Ok(UpdateOutcome {
            matched: 1,
            modified: if unchanged { 0 } else { 1 },
        })
    }
}

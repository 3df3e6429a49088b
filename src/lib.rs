pub mod app;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod extras;
pub mod models {
    pub mod tag;
}
pub mod db {
    pub mod extras_repository;
    pub mod memory;
    pub mod models;
    pub mod repository;
}
pub mod api {
    pub mod blogs;
    pub mod errors;
    pub mod extras;
}

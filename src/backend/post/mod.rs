//! Post Module
//!
//! Board posts: create, list (newest or most replied, with search), read,
//! edit and delete. Mounted under `/api/post`.

pub mod db;
pub mod handlers;

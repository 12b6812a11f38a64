//! Reple Module
//!
//! Replies to board posts. Mounted under `/api/reple`.

pub mod db;
pub mod handlers;

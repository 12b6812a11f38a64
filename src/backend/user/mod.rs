//! User Module
//!
//! Board profiles: registration, display-name availability and profile
//! photo. Mounted under `/api/user`.

pub mod db;
pub mod handlers;

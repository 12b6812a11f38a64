//! Geocoding Module
//!
//! Address ↔ coordinate lookups proxied to an external provider, so the
//! provider key never reaches the browser.
//!
//! - **`client`** - HTTP client and response normalisation
//! - **`handlers`** - `/api/geocode` routes

pub mod client;
pub mod handlers;

pub use client::{GeocodeClient, GeocodeError, Place};
pub use handlers::{handle_forward_geocode, handle_reverse_geocode};

/**
 * Geocoding Handlers
 *
 * - `GET /api/geocode?address=..`
 * - `GET /api/geocode/reverse?lat=..&lng=..`
 */

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::backend::error::conversion::bad_request;
use crate::backend::error::{ApiQuery, BackendError};
use crate::backend::geocode::client::{GeocodeClient, Place};

#[derive(Debug, Deserialize)]
pub struct ForwardQuery {
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub struct ReverseQuery {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GeocodeResponse {
    pub success: bool,
    pub places: Vec<Place>,
}

pub async fn handle_forward_geocode(
    State(client): State<GeocodeClient>,
    ApiQuery(query): ApiQuery<ForwardQuery>,
) -> Result<Json<GeocodeResponse>, BackendError> {
    let address = query.address.trim();
    if address.is_empty() {
        return Err(bad_request("address must not be empty"));
    }

    let places = client.forward(address).await?;
    Ok(Json(GeocodeResponse {
        success: true,
        places,
    }))
}

pub async fn handle_reverse_geocode(
    State(client): State<GeocodeClient>,
    ApiQuery(query): ApiQuery<ReverseQuery>,
) -> Result<Json<GeocodeResponse>, BackendError> {
    if !(-90.0..=90.0).contains(&query.lat) || !(-180.0..=180.0).contains(&query.lng) {
        return Err(bad_request("lat/lng out of range"));
    }

    let places = client.reverse(query.lat, query.lng).await?;
    Ok(Json(GeocodeResponse {
        success: true,
        places,
    }))
}

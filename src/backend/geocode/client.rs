/**
 * Geocoding Client
 *
 * Thin wrapper over the Kakao Local REST API.
 *
 * - forward: `GET {base}/v2/local/search/address.json?query=..`
 * - reverse: `GET {base}/v2/local/geo/coord2address.json?x={lng}&y={lat}`
 *
 * Both answer `{"documents": [...]}`. Forward documents carry the address
 * and the coordinates as decimal strings (`x` is longitude, `y` latitude);
 * reverse documents carry a lot address and an optional road address, and
 * no coordinates, so results reuse the queried point.
 */

use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::server::config::GeocodeConfig;

const FORWARD_PATH: &str = "/v2/local/search/address.json";
const REVERSE_PATH: &str = "/v2/local/geo/coord2address.json";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// One normalised lookup result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub address: String,
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("Geocoding is not configured: no API key")]
    MissingApiKey,

    #[error("Geocoding request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Geocoding provider answered {status}")]
    Upstream { status: u16 },

    #[error("Unexpected geocoding response: {0}")]
    Decode(String),
}

#[derive(Debug, Deserialize)]
struct Documents<T> {
    documents: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct AddressDocument {
    address_name: String,
    x: String,
    y: String,
}

#[derive(Debug, Deserialize)]
struct RegionAddress {
    address_name: String,
}

#[derive(Debug, Deserialize)]
struct CoordDocument {
    address: Option<RegionAddress>,
    road_address: Option<RegionAddress>,
}

/// Client for the geocoding provider
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct GeocodeClient {
    http: reqwest::Client,
    config: GeocodeConfig,
}

impl GeocodeClient {
    pub fn new(config: GeocodeConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// Look up places matching a free-form address
    pub async fn forward(&self, address: &str) -> Result<Vec<Place>, GeocodeError> {
        let documents: Vec<AddressDocument> = self
            .get(FORWARD_PATH, &[("query", address.to_string())])
            .await?;

        documents
            .into_iter()
            .map(|doc| {
                Ok(Place {
                    lat: parse_coordinate("y", &doc.y)?,
                    lng: parse_coordinate("x", &doc.x)?,
                    address: doc.address_name,
                })
            })
            .collect()
    }

    /// Look up the address at a coordinate
    ///
    /// The road address is preferred when the provider has one.
    pub async fn reverse(&self, lat: f64, lng: f64) -> Result<Vec<Place>, GeocodeError> {
        let documents: Vec<CoordDocument> = self
            .get(REVERSE_PATH, &[("x", lng.to_string()), ("y", lat.to_string())])
            .await?;

        Ok(documents
            .into_iter()
            .filter_map(|doc| doc.road_address.or(doc.address))
            .map(|region| Place {
                address: region.address_name,
                lat,
                lng,
            })
            .collect())
    }

    async fn get<T>(&self, path: &str, query: &[(&str, String)]) -> Result<Vec<T>, GeocodeError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let api_key = self.config.api_key.as_deref().ok_or(GeocodeError::MissingApiKey)?;
        let url = format!("{}{}", self.config.base_url, path);

        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, format!("{} {}", self.config.auth_scheme, api_key))
            .query(query)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("[Geocode] {} answered {}", path, status);
            return Err(GeocodeError::Upstream {
                status: status.as_u16(),
            });
        }

        let body: Documents<T> = response
            .json()
            .await
            .map_err(|e| GeocodeError::Decode(e.to_string()))?;
        Ok(body.documents)
    }
}

fn parse_coordinate(field: &str, value: &str) -> Result<f64, GeocodeError> {
    value
        .parse()
        .map_err(|_| GeocodeError::Decode(format!("{} is not a number: {:?}", field, value)))
}

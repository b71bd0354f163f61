//! Zip code elevation lookup over HTTP.
//!
//! Two requests: zippopotam.us resolves the zip to a place and coordinates,
//! then open-elevation returns ground elevation in meters.

use std::time::Duration;

use drex_core::elevation::{is_valid_zip, ElevationError, ElevationProvider, SiteLocation};
use drex_core::units::{Feet, Meters};
use serde::Deserialize;

const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");
const ZIP_URL: &str = "https://api.zippopotam.us/us";
const ELEVATION_URL: &str = "https://api.open-elevation.com/api/v1/lookup";

#[derive(Deserialize)]
struct ZipResponse {
    places: Vec<ZipPlace>,
}

#[derive(Deserialize)]
struct ZipPlace {
    #[serde(rename = "place name")]
    place_name: String,
    #[serde(rename = "state abbreviation")]
    state: String,
    // zippopotam returns coordinates as strings
    latitude: String,
    longitude: String,
}

#[derive(Deserialize)]
struct ElevationResponse {
    results: Vec<ElevationPoint>,
}

#[derive(Deserialize)]
struct ElevationPoint {
    elevation: f64,
}

/// Blocking HTTP provider with a per-request timeout.
pub struct HttpElevation {
    client: reqwest::blocking::Client,
}

impl HttpElevation {
    pub fn new(timeout: Duration) -> Result<Self, ElevationError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(format!("Drex/{}", CURRENT_VERSION))
            .timeout(timeout)
            .build()
            .map_err(|e| ElevationError::Request(format!("Failed to create HTTP client: {}", e)))?;
        Ok(HttpElevation { client })
    }

    fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str, zip_code: &str) -> Result<T, ElevationError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| ElevationError::Request(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ElevationError::NotFound(zip_code.to_string()));
        }
        if !response.status().is_success() {
            return Err(ElevationError::BadResponse(format!("{} returned {}", url, response.status())));
        }

        response
            .json()
            .map_err(|e| ElevationError::BadResponse(format!("Failed to parse response: {}", e)))
    }
}

impl ElevationProvider for HttpElevation {
    fn lookup(&self, zip_code: &str) -> Result<SiteLocation, ElevationError> {
        if !is_valid_zip(zip_code) {
            return Err(ElevationError::InvalidZip(zip_code.to_string()));
        }

        let zip: ZipResponse = self.get_json(&format!("{}/{}", ZIP_URL, zip_code), zip_code)?;
        let place = zip
            .places
            .into_iter()
            .next()
            .ok_or_else(|| ElevationError::NotFound(zip_code.to_string()))?;

        let lat: f64 = place
            .latitude
            .trim()
            .parse()
            .map_err(|_| ElevationError::BadResponse(format!("latitude '{}'", place.latitude)))?;
        let lon: f64 = place
            .longitude
            .trim()
            .parse()
            .map_err(|_| ElevationError::BadResponse(format!("longitude '{}'", place.longitude)))?;

        let url = format!("{}?locations={},{}", ELEVATION_URL, lat, lon);
        let elevation: ElevationResponse = self.get_json(&url, zip_code)?;
        let meters = elevation
            .results
            .first()
            .map(|p| p.elevation)
            .ok_or_else(|| ElevationError::BadResponse("no elevation results".to_string()))?;

        Ok(SiteLocation::new(place.place_name, place.state, meters_to_feet(meters)))
    }
}

/// Meters to whole feet.
pub fn meters_to_feet(meters: f64) -> f64 {
    Feet::from(Meters(meters)).0.round()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meters_to_feet() {
        assert_eq!(meters_to_feet(1609.0), 5279.0);
        assert_eq!(meters_to_feet(0.0), 0.0);
    }

    #[test]
    fn test_zip_response_parsing() {
        let json = r#"{"post code": "80202", "places": [{"place name": "Denver", "longitude": "-104.9942", "state": "Colorado", "state abbreviation": "CO", "latitude": "39.7491"}]}"#;
        let zip: ZipResponse = serde_json::from_str(json).unwrap();
        assert_eq!(zip.places[0].place_name, "Denver");
        assert_eq!(zip.places[0].state, "CO");
        assert_eq!(zip.places[0].latitude, "39.7491");
    }

    #[test]
    fn test_invalid_zip_skips_network() {
        let provider = HttpElevation::new(Duration::from_millis(1)).unwrap();
        assert_eq!(provider.lookup("8020"), Err(ElevationError::InvalidZip("8020".to_string())));
    }
}

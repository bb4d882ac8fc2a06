//! Back-office catalog API client.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use super::error::CatalogError;

/// Wrapper for the locations response.
#[derive(Debug, Deserialize)]
pub struct LocationsResponse {
    pub locations: Vec<LocationDto>,
}

/// A boarding/alighting point as listed by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LocationDto {
    pub id: String,
    pub name: String,
    pub city: String,
}

/// Wrapper for the buses response.
#[derive(Debug, Deserialize)]
pub struct BusesResponse {
    pub buses: Vec<BusDto>,
}

/// An assignable bus.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusDto {
    pub id: String,
    pub plate_number: String,
    pub operator_id: String,
    #[serde(default)]
    pub seat_count: Option<u32>,
}

/// Configuration for the catalog client.
#[derive(Debug, Clone)]
pub struct CatalogClientConfig {
    /// API key for x-apikey header authentication
    pub api_key: String,
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl CatalogClientConfig {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            timeout_secs: 30,
        }
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Client for the location and bus catalog.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(config: CatalogClientConfig) -> Result<Self, CatalogError> {
        let mut headers = HeaderMap::new();

        let api_key_header =
            HeaderValue::from_str(&config.api_key).map_err(|_| CatalogError::Api {
                status: 0,
                message: "Invalid API key format".to_string(),
            })?;
        headers.insert(HeaderName::from_static("x-apikey"), api_key_header);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch every location in the catalog.
    pub async fn fetch_locations(&self) -> Result<Vec<LocationDto>, CatalogError> {
        let url = format!("{}/locations", self.base_url);
        let response: LocationsResponse = self.get_json(&url, &[]).await?;
        Ok(response.locations)
    }

    /// Fetch assignable buses, optionally for a single operator.
    pub async fn fetch_buses(&self, operator: Option<&str>) -> Result<Vec<BusDto>, CatalogError> {
        let url = format!("{}/buses", self.base_url);
        let query: Vec<(&str, &str)> = operator.map(|op| ("operator", op)).into_iter().collect();
        let response: BusesResponse = self.get_json(&url, &query).await?;
        Ok(response.buses)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, CatalogError> {
        let response = self.http.get(url).query(query).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(CatalogError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| CatalogError::Json {
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = CatalogClientConfig::new("key", "http://catalog.local");
        assert_eq!(config.base_url, "http://catalog.local");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.with_timeout_secs(5).timeout_secs, 5);
    }

    #[test]
    fn client_strips_trailing_slash() {
        let client = CatalogClient::new(CatalogClientConfig::new("key", "http://catalog.local/"))
            .unwrap();
        assert_eq!(client.base_url, "http://catalog.local");
    }

    #[test]
    fn rejects_unprintable_api_key() {
        let result = CatalogClient::new(CatalogClientConfig::new("bad\nkey", "http://x"));
        assert!(matches!(result, Err(CatalogError::Api { status: 0, .. })));
    }

    #[test]
    fn bus_dto_uses_camel_case() {
        let json = r#"{"id":"b1","plateNumber":"KDA 123A","operatorId":"op-9"}"#;
        let bus: BusDto = serde_json::from_str(json).unwrap();
        assert_eq!(bus.plate_number, "KDA 123A");
        assert_eq!(bus.operator_id, "op-9");
        assert_eq!(bus.seat_count, None);
    }
}

use super::{Conditions, Coordinates, WeatherService};
use crate::error::UpstreamError;
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;

pub const DEFAULT_GEOCODING_URL: &str = "https://api.openweathermap.org/geo/1.0/direct";
pub const DEFAULT_CONDITIONS_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

const GEOCODING: &str = "geocoding";
const CONDITIONS: &str = "current conditions";

#[derive(Debug, Deserialize)]
struct GeocodingEntry {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    main: MainReadings,
    weather: Vec<WeatherEntry>,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct WeatherEntry {
    description: String,
}

/// OpenWeatherMap geocoding + current weather. Temperatures come back in
/// Kelvin because no `units` parameter is sent.
pub struct OpenWeatherMap {
    client: reqwest::Client,
    api_key: String,
    geocoding_url: String,
    conditions_url: String,
}

impl OpenWeatherMap {
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .connect_timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key: api_key.into(),
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            conditions_url: DEFAULT_CONDITIONS_URL.to_string(),
        }
    }

    pub fn with_geocoding_url(mut self, url: impl Into<String>) -> Self {
        self.geocoding_url = url.into();
        self
    }

    pub fn with_conditions_url(mut self, url: impl Into<String>) -> Self {
        self.conditions_url = url.into();
        self
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        service: &'static str,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, UpstreamError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|source| UpstreamError::Http { service, source })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| UpstreamError::Http { service, source })?;

        if !status.is_success() {
            return Err(UpstreamError::Status {
                service,
                status: status.as_u16(),
                body,
            });
        }

        decode(service, &body)
    }
}

fn decode<T: DeserializeOwned>(service: &'static str, body: &str) -> Result<T, UpstreamError> {
    serde_json::from_str(body).map_err(|e| UpstreamError::Malformed {
        service,
        detail: e.to_string(),
    })
}

/// The geocoder matches on the city name alone ("Paris, France" -> "Paris").
fn geocoding_query(place: &str) -> &str {
    place.split(',').next().unwrap_or(place).trim()
}

fn first_coordinates(place: &str, entries: Vec<GeocodingEntry>) -> Result<Coordinates, UpstreamError> {
    entries
        .into_iter()
        .next()
        .map(|e| Coordinates {
            lat: e.lat,
            lon: e.lon,
        })
        .ok_or_else(|| UpstreamError::LocationNotFound(place.to_string()))
}

fn into_conditions(current: CurrentWeather) -> Result<Conditions, UpstreamError> {
    let description = current
        .weather
        .into_iter()
        .next()
        .map(|w| w.description)
        .ok_or_else(|| UpstreamError::Malformed {
            service: CONDITIONS,
            detail: "empty 'weather' list".to_string(),
        })?;

    Ok(Conditions {
        temperature_kelvin: current.main.temp,
        description,
    })
}

#[async_trait]
impl WeatherService for OpenWeatherMap {
    async fn geocode(&self, place: &str) -> Result<Coordinates, UpstreamError> {
        let query = geocoding_query(place);
        tracing::debug!(place, query, "Geocoding location");

        let entries: Vec<GeocodingEntry> = self
            .get_json(
                GEOCODING,
                &self.geocoding_url,
                &[("q", query.to_string()), ("limit", "1".to_string())],
            )
            .await?;

        first_coordinates(place, entries)
    }

    async fn current_conditions(&self, at: Coordinates) -> Result<Conditions, UpstreamError> {
        tracing::debug!(lat = at.lat, lon = at.lon, "Fetching current conditions");

        let current: CurrentWeather = self
            .get_json(
                CONDITIONS,
                &self.conditions_url,
                &[("lat", at.lat.to_string()), ("lon", at.lon.to_string())],
            )
            .await?;

        into_conditions(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZOCCA: &str = r#"{
        "coord": {"lon": 10.99, "lat": 44.34},
        "weather": [{"id": 501, "main": "Rain", "description": "moderate rain", "icon": "10d"}],
        "main": {"temp": 298.48, "feels_like": 298.74, "humidity": 64},
        "name": "Zocca",
        "cod": 200
    }"#;

    #[test]
    fn geocoding_uses_city_segment() {
        assert_eq!(geocoding_query("Paris, France"), "Paris");
        assert_eq!(geocoding_query(" Tokyo "), "Tokyo");
    }

    #[test]
    fn decodes_geocoding_response() {
        let entries: Vec<GeocodingEntry> = decode(
            GEOCODING,
            r#"[{"name": "Paris", "lat": 48.85, "lon": 2.35, "country": "FR"}]"#,
        )
        .unwrap();
        let coords = first_coordinates("Paris, France", entries).unwrap();
        assert_eq!(coords, Coordinates { lat: 48.85, lon: 2.35 });
    }

    #[test]
    fn empty_geocoding_result_is_not_found() {
        let entries: Vec<GeocodingEntry> = decode(GEOCODING, "[]").unwrap();
        let err = first_coordinates("Atlantis", entries).unwrap_err();
        assert!(matches!(err, UpstreamError::LocationNotFound(place) if place == "Atlantis"));
    }

    #[test]
    fn decodes_current_conditions() {
        let current: CurrentWeather = decode(CONDITIONS, ZOCCA).unwrap();
        let conditions = into_conditions(current).unwrap();
        assert_eq!(conditions.temperature_kelvin, 298.48);
        assert_eq!(conditions.description, "moderate rain");
    }

    #[test]
    fn missing_fields_are_malformed() {
        let err = decode::<CurrentWeather>(CONDITIONS, r#"{"weather": []}"#).unwrap_err();
        assert!(matches!(err, UpstreamError::Malformed { .. }));

        let current: CurrentWeather =
            decode(CONDITIONS, r#"{"main": {"temp": 280.0}, "weather": []}"#).unwrap();
        assert!(into_conditions(current).is_err());
    }
}

use async_trait::async_trait;
use common::Coordinate;
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::service::{ self, RemoteServiceError };

#[async_trait]
pub trait PositionSource: Send + Sync {
    /// Where the station is right now. Every call is a fresh request.
    async fn fetch_position(&self) -> Result<Coordinate, RemoteServiceError>;
}

/// open-notify.org `iss-now` endpoint.
pub struct OpenNotify {
    client: Client,
    url: Url,
}

impl OpenNotify {
    pub fn new(client: Client, url: Url) -> Self {
        OpenNotify { client, url }
    }
}

#[async_trait]
impl PositionSource for OpenNotify {
    async fn fetch_position(&self) -> Result<Coordinate, RemoteServiceError> {
        let payload = service::get(&self.client, self.url.clone()).await?;
        let position = parse(&payload)?;
        debug!("station is at {position}");
        Ok(position)
    }
}

#[derive(Deserialize)]
struct Payload {
    iss_position: Position,
}

#[derive(Deserialize)]
struct Position {
    latitude: String,
    longitude: String,
}

pub fn parse(payload: &str) -> Result<Coordinate, RemoteServiceError> {
    let Payload { iss_position: Position { latitude, longitude } } = serde_json::from_str(payload)?;
    Ok(Coordinate::new(
        parse_degrees("latitude", &latitude)?,
        parse_degrees("longitude", &longitude)?,
    ))
}

fn parse_degrees(field: &'static str, value: &str) -> Result<f64, RemoteServiceError> {
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        Ok(_) => Err(RemoteServiceError::Value { field, value: value.into(), reason: "not finite".into() }),
        Err(e) => Err(RemoteServiceError::Value { field, value: value.into(), reason: e.to_string() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_open_notify_payload() {
        let payload = r#"{"timestamp": 1704110400, "message": "success", "iss_position": {"latitude": "50.0", "longitude": "-97.0"}}"#;
        assert_eq!(parse(payload).unwrap(), Coordinate::new(50.0, -97.0));
    }

    #[test]
    fn missing_latitude() {
        let payload = r#"{"message": "success", "iss_position": {"longitude": "-97.0"}}"#;
        assert!(matches!(parse(payload), Err(RemoteServiceError::Payload(_))));
    }

    #[test]
    fn missing_position() {
        assert!(matches!(parse(r#"{"message": "success"}"#), Err(RemoteServiceError::Payload(_))));
        assert!(matches!(parse("<html>502</html>"), Err(RemoteServiceError::Payload(_))));
    }

    #[test]
    fn unparseable_longitude() {
        let payload = r#"{"iss_position": {"latitude": "50.0", "longitude": "west"}}"#;
        match parse(payload) {
            Err(RemoteServiceError::Value { field, value, .. }) => {
                assert_eq!(field, "longitude");
                assert_eq!(value, "west");
            },
            other => panic!("expected a value error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_nan() {
        let payload = r#"{"iss_position": {"latitude": "NaN", "longitude": "0"}}"#;
        assert!(matches!(parse(payload), Err(RemoteServiceError::Value { field: "latitude", .. })));
    }
}

use async_trait::async_trait;
use chrono::{ DateTime, Local, Timelike, Utc };
use common::{ night::NightPredicate, time::to_local_hour, Coordinate };
use log::{ debug, info };
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::config::darkness::ClockSource;
use crate::service::{ self, RemoteServiceError };

/// Sunrise and sunset of the current day, as whole UTC hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SunTimes {
    pub sunrise: u32,
    pub sunset: u32,
}

#[async_trait]
pub trait SunTimesSource: Send + Sync {
    async fn sun_times(&self, observer: &Coordinate) -> Result<SunTimes, RemoteServiceError>;
}

/// sunrise-sunset.org `json` endpoint.
pub struct SunriseSunset {
    client: Client,
    url: Url,
}

impl SunriseSunset {
    pub fn new(client: Client, url: Url) -> Self {
        SunriseSunset { client, url }
    }
}

fn query_url(base: &Url, observer: &Coordinate) -> Url {
    let mut url = base.clone();
    url.query_pairs_mut()
        .append_pair("lat", &observer.latitude.to_string())
        .append_pair("lng", &observer.longitude.to_string())
        .append_pair("formatted", "0");
    url
}

#[async_trait]
impl SunTimesSource for SunriseSunset {
    async fn sun_times(&self, observer: &Coordinate) -> Result<SunTimes, RemoteServiceError> {
        let payload = service::get(&self.client, query_url(&self.url, observer)).await?;
        parse(&payload)
    }
}

#[derive(Deserialize)]
struct Payload {
    results: Results,
}

#[derive(Deserialize)]
struct Results {
    sunrise: String,
    sunset: String,
}

pub fn parse(payload: &str) -> Result<SunTimes, RemoteServiceError> {
    let value: serde_json::Value = serde_json::from_str(payload)?;
    if let Some(status) = value.get("status").and_then(serde_json::Value::as_str) {
        if status != "OK" {
            return Err(RemoteServiceError::Service(status.into()));
        }
    }
    let Payload { results: Results { sunrise, sunset } } = serde_json::from_value(value)?;
    Ok(SunTimes {
        sunrise: utc_hour("sunrise", &sunrise)?,
        sunset: utc_hour("sunset", &sunset)?,
    })
}

/// Hour of an RFC 3339 timestamp in UTC. Minutes and seconds are dropped.
fn utc_hour(field: &'static str, value: &str) -> Result<u32, RemoteServiceError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc).hour())
        .map_err(|e| RemoteServiceError::Value { field, value: value.into(), reason: e.to_string() })
}

pub trait Clock: Send + Sync {
    fn local_hour(&self) -> u32;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn local_hour(&self) -> u32 {
        Local::now().hour()
    }
}

pub struct OffsetClock {
    pub offset: i32,
}

impl Clock for OffsetClock {
    fn local_hour(&self) -> u32 {
        to_local_hour(Utc::now().hour(), self.offset)
    }
}

pub fn clock(source: ClockSource, offset: i32) -> Box<dyn Clock> {
    match source {
        ClockSource::System => Box::new(SystemClock),
        ClockSource::Offset => Box::new(OffsetClock { offset }),
    }
}

pub async fn is_night(
    source: &dyn SunTimesSource,
    clock: &dyn Clock,
    observer: &Coordinate,
    offset: i32,
    predicate: NightPredicate,
) -> Result<bool, RemoteServiceError> {
    let SunTimes { sunrise, sunset } = source.sun_times(observer).await?;
    debug!("sunrise at {sunrise}h utc, sunset at {sunset}h utc");

    let sunrise = to_local_hour(sunrise, offset);
    let sunset = to_local_hour(sunset, offset);
    let now = clock.local_hour();
    let night = predicate.holds(now, sunrise, sunset);

    info!("it is {now}h. sunrise {sunrise}h, sunset {sunset}h. {predicate:?} rule says {}.",
        if night { "night" } else { "day" });
    Ok(night)
}

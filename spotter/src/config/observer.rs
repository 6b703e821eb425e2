use common::Coordinate;
use serde::{ Deserialize, Deserializer, de::Unexpected };

#[derive(Debug, Deserialize)]
pub struct Observer {
    #[serde(deserialize_with = "deserialize_latitude")]
    pub latitude: f64,

    #[serde(deserialize_with = "deserialize_longitude")]
    pub longitude: f64,

    /// Hours added to UTC to get the observer's wall clock.
    #[serde(deserialize_with = "deserialize_utc_offset")]
    pub utc_offset: i32,

    /// Half the side of the box, in degrees, the station has to be in.
    #[serde(deserialize_with = "deserialize_threshold")]
    pub threshold: f64,
}

impl Observer {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

fn deserialize_latitude<'de, D>(d: D) -> Result<f64, D::Error> where D: Deserializer<'de> {
    let value = f64::deserialize(d)?;
    if value.is_finite() && (-90.0..=90.0).contains(&value) { Ok(value) }
    else { Err(serde::de::Error::invalid_value(Unexpected::Float(value), &"to be -90.0 <= x <= 90.0. (observer.latitude)")) }
}

fn deserialize_longitude<'de, D>(d: D) -> Result<f64, D::Error> where D: Deserializer<'de> {
    let value = f64::deserialize(d)?;
    if value.is_finite() && (-180.0..=180.0).contains(&value) { Ok(value) }
    else { Err(serde::de::Error::invalid_value(Unexpected::Float(value), &"to be -180.0 <= x <= 180.0. (observer.longitude)")) }
}

// the hour conversion wraps only once
fn deserialize_utc_offset<'de, D>(d: D) -> Result<i32, D::Error> where D: Deserializer<'de> {
    let value = i32::deserialize(d)?;
    if (-23..=23).contains(&value) { Ok(value) }
    else { Err(serde::de::Error::invalid_value(Unexpected::Signed(value as i64), &"to be -23 <= x <= 23. (observer.utc_offset)")) }
}

fn deserialize_threshold<'de, D>(d: D) -> Result<f64, D::Error> where D: Deserializer<'de> {
    let value = f64::deserialize(d)?;
    if value.is_finite() && value > 0.0 { Ok(value) }
    else { Err(serde::de::Error::invalid_value(Unexpected::Float(value), &"greater than 0. (observer.threshold)")) }
}

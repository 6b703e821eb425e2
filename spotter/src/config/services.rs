use std::time::Duration;

use serde::{ Deserialize, Deserializer, de::Unexpected };
use url::Url;

#[derive(Debug, Deserialize)]
pub struct Services {
    #[serde(deserialize_with = "deserialize_url")]
    pub position_url: Url,

    #[serde(deserialize_with = "deserialize_url")]
    pub sun_url: Url,

    #[serde(deserialize_with = "super::deserialize_timeout")]
    pub timeout: Duration,
}

fn deserialize_url<'de, D>(d: D) -> Result<Url, D::Error> where D: Deserializer<'de> {
    let s = String::deserialize(d)?;
    match Url::parse(&s) {
        Ok(u) => Ok(u),
        Err(e) => Err(serde::de::Error::invalid_value(Unexpected::Str(&s), &format!("to be valid url. (services) {e}").as_str())),
    }
}

use std::time::Duration;

use serde::{ Deserialize, Deserializer, de::Unexpected };

#[derive(Debug, Deserialize)]
pub struct Mail {
    #[serde(deserialize_with = "deserialize_relay")]
    pub relay: String,

    pub port: u16,

    pub subject: String,

    #[serde(deserialize_with = "super::deserialize_timeout")]
    pub timeout: Duration,
}

fn deserialize_relay<'de, D>(d: D) -> Result<String, D::Error> where D: Deserializer<'de> {
    let s = String::deserialize(d)?;
    if s.trim().is_empty() {
        Err(serde::de::Error::invalid_value(Unexpected::Str(&s), &"to be a host name. (mail.relay)"))
    } else { Ok(s) }
}

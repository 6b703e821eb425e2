use std::str::FromStr;

use log::LevelFilter;
use serde::{ Deserialize, Deserializer, de::Unexpected };

/// Where and how verbosely a spotter run is recorded. Every run appends to
/// `<dir>/spotter.log`; the file is rolled once it passes `file_size_mib`
/// and `file_count` old files are kept.
#[derive(Debug, Deserialize)]
pub struct Logging {
    #[serde(deserialize_with = "deserialize_level")]
    pub level: LevelFilter,
    pub dir: String,
    #[serde(deserialize_with = "deserialize_file_size")]
    pub file_size_mib: u64,
    #[serde(deserialize_with = "deserialize_file_count")]
    pub file_count: u32,
}

impl Logging {
    pub fn file_size_bytes(&self) -> u64 {
        self.file_size_mib.saturating_mul(1024 * 1024)
    }
}

fn deserialize_level<'de, D>(d: D) -> Result<LevelFilter, D::Error> where D: Deserializer<'de> {
    let s = String::deserialize(d)?;
    LevelFilter::from_str(s.trim()).map_err(|_| {
        serde::de::Error::invalid_value(Unexpected::Str(&s), &"a log level from off to trace. (logging.level)")
    })
}

fn deserialize_file_size<'de, D>(d: D) -> Result<u64, D::Error> where D: Deserializer<'de> {
    match u64::deserialize(d)? {
        0 => Err(serde::de::Error::invalid_value(Unexpected::Unsigned(0), &"at least one MiB per log file. (logging.file_size_mib)")),
        v => Ok(v),
    }
}

fn deserialize_file_count<'de, D>(d: D) -> Result<u32, D::Error> where D: Deserializer<'de> {
    match u32::deserialize(d)? {
        0 => Err(serde::de::Error::invalid_value(Unexpected::Unsigned(0), &"at least one rolled log file to keep. (logging.file_count)")),
        v => Ok(v),
    }
}

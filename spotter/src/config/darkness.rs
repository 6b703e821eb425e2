use common::night::NightPredicate;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Darkness {
    pub predicate: NightPredicate,
    pub clock: ClockSource,
}

/// Where the current local hour comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockSource {
    /// Hour of the host's local clock.
    System,
    /// Current UTC hour shifted by `observer.utc_offset`.
    Offset,
}

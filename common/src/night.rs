use serde::{ Serialize, Deserialize };

/// Rule deciding whether a local hour counts as night, given the local
/// sunrise and sunset hours of the same day.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NightPredicate {
    /// `now >= sunrise || now >= sunset`.
    ///
    /// This is true for every hour from sunrise until midnight, daytime
    /// included.
    #[default]
    Literal,
    /// `now >= sunset || now < sunrise`.
    Between,
}

impl NightPredicate {
    pub fn holds(&self, now: u32, sunrise: u32, sunset: u32) -> bool {
        match self {
            NightPredicate::Literal => now >= sunrise || now >= sunset,
            NightPredicate::Between => now >= sunset || now < sunrise,
        }
    }
}

use crate::config::ConfigurationError;

pub const SENDER: &str = "EMAIL";
pub const PASSWORD: &str = "PASSWORD";
pub const RECIPIENT: &str = "RECIPIENT_EMAIL";

/// Mail account used to send the notification and the address it goes to.
#[derive(Clone)]
pub struct Credentials {
    pub sender: String,
    pub password: String,
    pub recipient: String,
}

impl Credentials {
    /// Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Credentials, ConfigurationError> where F: Fn(&str) -> Option<String> {
        let get = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigurationError::MissingCredential(name))
        };
        Ok(Credentials {
            sender: get(SENDER)?,
            password: get(PASSWORD)?,
            recipient: get(RECIPIENT)?,
        })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("sender", &self.sender)
            .field("password", &"<redacted>")
            .field("recipient", &self.recipient)
            .finish()
    }
}

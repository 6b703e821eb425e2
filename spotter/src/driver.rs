use common::{ night::NightPredicate, proximity::is_near, Coordinate };
use log::info;
use thiserror::Error;

use crate::config::{ Config, ConfigurationError };
use crate::credentials::Credentials;
use crate::darkness::{ self, Clock, SunTimesSource, SunriseSunset };
use crate::notify::{ self, DeliveryError, Notifier };
use crate::position::{ OpenNotify, PositionSource };
use crate::service::{ self, RemoteServiceError };

#[derive(Error, Debug)]
pub enum RunError {
    #[error("remote service failed. {0}")]
    Remote(#[from] RemoteServiceError),

    #[error("notification failed. {0}")]
    Delivery(#[from] DeliveryError),
}

#[derive(Error, Debug)]
pub enum StartupError {
    #[error("{0}")]
    Configuration(#[from] ConfigurationError),

    #[error("{0}")]
    Remote(#[from] RemoteServiceError),
}

/// Reads the credentials through `lookup` and only then hands them to
/// `connect`, which is the first step allowed to set up network clients.
pub fn startup<L, C>(config: &Config, lookup: L, connect: C) -> Result<Driver, StartupError>
where
    L: Fn(&str) -> Option<String>,
    C: FnOnce(&Config, Credentials) -> Result<Driver, RemoteServiceError>,
{
    let credentials = Credentials::from_lookup(lookup)?;
    Ok(connect(config, credentials)?)
}

/// What a single pass ended with, and where the station was.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    NotNear(Coordinate),
    NotDark(Coordinate),
    Notified(Coordinate),
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::NotNear(p) => write!(f, "station at {p} is too far away. no mail sent."),
            Outcome::NotDark(p) => write!(f, "station at {p} is near but it is not night. no mail sent."),
            Outcome::Notified(p) => write!(f, "station at {p} is overhead. mail sent."),
        }
    }
}

pub struct Driver {
    observer: Coordinate,
    threshold: f64,
    utc_offset: i32,
    predicate: NightPredicate,
    credentials: Credentials,

    position: Box<dyn PositionSource>,
    sun: Box<dyn SunTimesSource>,
    clock: Box<dyn Clock>,
    notifier: Box<dyn Notifier>,
}

impl Driver {
    /// Driver talking to the configured services.
    pub fn build(config: &Config, credentials: Credentials) -> Result<Driver, RemoteServiceError> {
        let client = service::client(config.services.timeout)?;
        Ok(Driver::new(
            config,
            credentials,
            Box::new(OpenNotify::new(client.clone(), config.services.position_url.clone())),
            Box::new(SunriseSunset::new(client, config.services.sun_url.clone())),
            darkness::clock(config.darkness.clock, config.observer.utc_offset),
            notify::build(&config.mail),
        ))
    }

    pub fn new(
        config: &Config,
        credentials: Credentials,
        position: Box<dyn PositionSource>,
        sun: Box<dyn SunTimesSource>,
        clock: Box<dyn Clock>,
        notifier: Box<dyn Notifier>,
    ) -> Driver {
        Driver {
            observer: config.observer.coordinate(),
            threshold: config.observer.threshold,
            utc_offset: config.observer.utc_offset,
            predicate: config.darkness.predicate,
            credentials,
            position,
            sun,
            clock,
            notifier,
        }
    }

    /// Fetches the position once and reuses it for the mail body. The sun
    /// service is only asked when the station is near.
    pub async fn run(&self) -> Result<Outcome, RunError> {
        let station = self.position.fetch_position().await?;

        if !is_near(&self.observer, &station, self.threshold) {
            return Ok(Outcome::NotNear(station));
        }
        info!("station at {station} is within {t}° of {observer}", t = self.threshold, observer = self.observer);

        let night = darkness::is_night(
            self.sun.as_ref(),
            self.clock.as_ref(),
            &self.observer,
            self.utc_offset,
            self.predicate,
        ).await?;
        if !night {
            return Ok(Outcome::NotDark(station));
        }

        self.notifier.notify(&station, &self.credentials).await?;
        Ok(Outcome::Notified(station))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{ atomic::{ AtomicUsize, Ordering }, Arc, Mutex };

    use async_trait::async_trait;
    use lettre::message::Mailbox;

    use super::*;
    use crate::config;
    use crate::darkness::SunTimes;
    use crate::position;

    const NEAR: &str = r#"{"message": "success", "iss_position": {"latitude": "50.0", "longitude": "-97.0"}}"#;
    const FAR: &str = r#"{"message": "success", "iss_position": {"latitude": "-12.3", "longitude": "101.7"}}"#;
    const NO_LATITUDE: &str = r#"{"message": "success", "iss_position": {"longitude": "-97.0"}}"#;
    const SUN: &str = r#"{"results": {"sunrise": "2024-01-01T13:00:00+00:00", "sunset": "2024-01-01T22:00:00+00:00"}, "status": "OK"}"#;

    #[derive(Default)]
    struct Calls {
        position: AtomicUsize,
        sun: AtomicUsize,
        notified: Mutex<Vec<Coordinate>>,
    }

    struct Position(&'static str, Arc<Calls>);

    #[async_trait]
    impl PositionSource for Position {
        async fn fetch_position(&self) -> Result<Coordinate, RemoteServiceError> {
            self.1.position.fetch_add(1, Ordering::SeqCst);
            position::parse(self.0)
        }
    }

    struct Sun(&'static str, Arc<Calls>);

    #[async_trait]
    impl SunTimesSource for Sun {
        async fn sun_times(&self, _observer: &Coordinate) -> Result<SunTimes, RemoteServiceError> {
            self.1.sun.fetch_add(1, Ordering::SeqCst);
            darkness::parse(self.0)
        }
    }

    struct At(u32);

    impl Clock for At {
        fn local_hour(&self) -> u32 { self.0 }
    }

    struct Outbox(Arc<Calls>);

    #[async_trait]
    impl Notifier for Outbox {
        async fn notify(&self, position: &Coordinate, _credentials: &Credentials) -> Result<(), DeliveryError> {
            self.0.notified.lock().unwrap().push(*position);
            Ok(())
        }
    }

    struct Rejecting;

    #[async_trait]
    impl Notifier for Rejecting {
        async fn notify(&self, _position: &Coordinate, _credentials: &Credentials) -> Result<(), DeliveryError> {
            Err(DeliveryError::Address("nobody".parse::<Mailbox>().unwrap_err()))
        }
    }

    fn credentials() -> Credentials {
        Credentials { sender: "me@example.com".into(), password: "hunter2".into(), recipient: "you@example.com".into() }
    }

    fn with_mocks(config: &Config, credentials: Credentials, calls: &Arc<Calls>) -> Driver {
        Driver::new(
            config,
            credentials,
            Box::new(Position(NEAR, calls.clone())),
            Box::new(Sun(SUN, calls.clone())),
            Box::new(At(10)),
            Box::new(Outbox(calls.clone())),
        )
    }

    fn environment(pairs: &[(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        let pairs = pairs.to_vec();
        move |name| pairs.iter().find(|(k, _)| *k == name).map(|(_, v)| v.to_string())
    }

    #[test]
    fn missing_recipient_stops_startup_before_connecting() {
        let config = config::from_toml("").unwrap();
        let connected = AtomicUsize::new(0);
        let lookup = environment(&[("EMAIL", "me@example.com"), ("PASSWORD", "hunter2")]);

        let result = startup(&config, lookup, |config, credentials| {
            connected.fetch_add(1, Ordering::SeqCst);
            Ok(with_mocks(config, credentials, &Arc::new(Calls::default())))
        });

        match result {
            Err(StartupError::Configuration(ConfigurationError::MissingCredential(name))) => assert_eq!(name, "RECIPIENT_EMAIL"),
            Err(e) => panic!("expected missing recipient, got {e}"),
            Ok(_) => panic!("expected missing recipient, got a driver"),
        }
        assert_eq!(connected.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn startup_hands_credentials_to_connect() {
        let config = config::from_toml("").unwrap();
        let calls = Arc::new(Calls::default());
        let lookup = environment(&[("EMAIL", "me@example.com"), ("PASSWORD", "hunter2"), ("RECIPIENT_EMAIL", "you@example.com")]);

        let driver = startup(&config, lookup, |config, credentials| {
            assert_eq!(credentials.recipient, "you@example.com");
            Ok(with_mocks(config, credentials, &calls))
        }).unwrap();

        assert!(matches!(driver.run().await, Ok(Outcome::Notified(_))));
    }

    fn driver(overrides: &str, position: &'static str, hour: u32, calls: &Arc<Calls>) -> Driver {
        let config = config::from_toml(overrides).unwrap();
        Driver::new(
            &config,
            credentials(),
            Box::new(Position(position, calls.clone())),
            Box::new(Sun(SUN, calls.clone())),
            Box::new(At(hour)),
            Box::new(Outbox(calls.clone())),
        )
    }

    #[tokio::test]
    async fn notifies_with_the_position_it_decided_on() {
        let calls = Arc::new(Calls::default());
        let outcome = driver("", NEAR, 10, &calls).run().await.unwrap();

        assert_eq!(outcome, Outcome::Notified(Coordinate::new(50.0, -97.0)));
        assert_eq!(calls.position.load(Ordering::SeqCst), 1);
        assert_eq!(*calls.notified.lock().unwrap(), vec![Coordinate::new(50.0, -97.0)]);
    }

    #[tokio::test]
    async fn far_away_skips_the_sun_service() {
        let calls = Arc::new(Calls::default());
        let outcome = driver("", FAR, 22, &calls).run().await.unwrap();

        assert_eq!(outcome, Outcome::NotNear(Coordinate::new(-12.3, 101.7)));
        assert_eq!(calls.sun.load(Ordering::SeqCst), 0);
        assert!(calls.notified.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn daytime_under_between_rule() {
        let calls = Arc::new(Calls::default());
        let outcome = driver("[darkness]\npredicate = \"between\"", NEAR, 10, &calls).run().await.unwrap();

        assert_eq!(outcome, Outcome::NotDark(Coordinate::new(50.0, -97.0)));
        assert_eq!(calls.sun.load(Ordering::SeqCst), 1);
        assert!(calls.notified.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn before_sunrise_under_literal_rule() {
        let calls = Arc::new(Calls::default());
        let outcome = driver("", NEAR, 3, &calls).run().await.unwrap();

        assert_eq!(outcome, Outcome::NotDark(Coordinate::new(50.0, -97.0)));
    }

    #[tokio::test]
    async fn threshold_is_configurable() {
        let calls = Arc::new(Calls::default());
        let outcome = driver("[observer]\nthreshold = 0.05", NEAR, 10, &calls).run().await.unwrap();

        assert!(matches!(outcome, Outcome::NotNear(_)));
    }

    #[tokio::test]
    async fn malformed_position_sends_nothing() {
        let calls = Arc::new(Calls::default());
        let result = driver("", NO_LATITUDE, 10, &calls).run().await;

        assert!(matches!(result, Err(RunError::Remote(RemoteServiceError::Payload(_)))));
        assert_eq!(calls.sun.load(Ordering::SeqCst), 0);
        assert!(calls.notified.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn sun_service_failure_propagates() {
        let calls = Arc::new(Calls::default());
        let config = config::from_toml("").unwrap();
        let driver = Driver::new(
            &config,
            credentials(),
            Box::new(Position(NEAR, calls.clone())),
            Box::new(Sun(r#"{"status": "INVALID_REQUEST"}"#, calls.clone())),
            Box::new(At(10)),
            Box::new(Outbox(calls.clone())),
        );

        assert!(matches!(driver.run().await, Err(RunError::Remote(RemoteServiceError::Service(_)))));
        assert!(calls.notified.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn delivery_failure_propagates() {
        let calls = Arc::new(Calls::default());
        let config = config::from_toml("").unwrap();
        let driver = Driver::new(
            &config,
            credentials(),
            Box::new(Position(NEAR, calls.clone())),
            Box::new(Sun(SUN, calls.clone())),
            Box::new(At(10)),
            Box::new(Rejecting),
        );

        assert!(matches!(driver.run().await, Err(RunError::Delivery(_))));
    }
}

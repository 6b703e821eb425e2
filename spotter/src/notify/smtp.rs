use std::time::Duration;

use async_trait::async_trait;
use common::Coordinate;
use lettre::{
    transport::smtp::authentication::Credentials as SmtpCredentials,
    AsyncSmtpTransport, AsyncTransport, Tokio1Executor,
};
use log::{ debug, info };

use super::{ compose, DeliveryError, Notifier };
use crate::config::mail::Mail;
use crate::credentials::Credentials;

/// STARTTLS relay. A new session is opened and closed for every message.
pub struct Smtp {
    relay: String,
    port: u16,
    subject: String,
    timeout: Duration,
}

impl Smtp {
    pub fn new(cnf: &Mail) -> Self {
        Smtp {
            relay: cnf.relay.clone(),
            port: cnf.port,
            subject: cnf.subject.clone(),
            timeout: cnf.timeout,
        }
    }
}

#[async_trait]
impl Notifier for Smtp {
    async fn notify(&self, position: &Coordinate, credentials: &Credentials) -> Result<(), DeliveryError> {
        let message = compose(&self.subject, position, credentials)?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.relay)?
            .port(self.port)
            .timeout(Some(self.timeout))
            .credentials(SmtpCredentials::new(credentials.sender.clone(), credentials.password.clone()))
            .build();

        debug!("sending to {recipient} via {relay}:{port}", recipient = credentials.recipient, relay = self.relay, port = self.port);
        let response = transport.send(message).await?;
        info!("mail to {recipient} accepted. {code}", recipient = credentials.recipient, code = response.code());
        Ok(())
    }
}

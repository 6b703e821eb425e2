mod smtp;

use async_trait::async_trait;
use common::Coordinate;
use lettre::{ message::{ header::ContentType, Mailbox }, Message };
use thiserror::Error;

use crate::config::mail::Mail;
use crate::credentials::Credentials;

pub use smtp::Smtp;

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("invalid address. {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("unable to build message. {0}")]
    Message(#[from] lettre::error::Error),

    #[error("smtp session failed. {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

pub fn build(cnf: &Mail) -> Box<dyn Notifier> {
    Box::new(Smtp::new(cnf))
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, position: &Coordinate, credentials: &Credentials) -> Result<(), DeliveryError>;
}

pub fn body(position: &Coordinate) -> String {
    format!("Go outside and spot the International Space Station. It's currently at Latitude: {} and Longitude: {}.",
        position.latitude, position.longitude)
}

pub fn compose(subject: &str, position: &Coordinate, credentials: &Credentials) -> Result<Message, DeliveryError> {
    let message = Message::builder()
        .from(credentials.sender.parse::<Mailbox>()?)
        .to(credentials.recipient.parse::<Mailbox>()?)
        .subject(subject)
        .header(ContentType::TEXT_PLAIN)
        .body(body(position))?;
    Ok(message)
}

use std::time::Duration;

use log::debug;
use reqwest::{ Client, StatusCode };
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum RemoteServiceError {
    #[error("unable to build http client. {0}")]
    Client(reqwest::Error),

    #[error("request failed. {0}")]
    Request(#[from] reqwest::Error),

    #[error("{url} answered with {status}.")]
    Status { url: Url, status: StatusCode },

    #[error("unexpected payload. {0}")]
    Payload(#[from] serde_json::Error),

    #[error("unable to parse {field} {value:?}. {reason}")]
    Value { field: &'static str, value: String, reason: String },

    #[error("service reported status {0:?}.")]
    Service(String),
}

pub fn client(timeout: Duration) -> Result<Client, RemoteServiceError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(RemoteServiceError::Client)
}

/// One GET, body returned as text. Anything but 2xx is an error.
pub async fn get(client: &Client, url: Url) -> Result<String, RemoteServiceError> {
    debug!("GET {url}");
    let response = client.get(url.clone()).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(RemoteServiceError::Status { url, status });
    }
    Ok(response.text().await?)
}

//! Shared HTTP plumbing for the remote collaborators.

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ApiSettings;
use crate::error::{ClientError, ClientResult};

const USER_AGENT: &str = concat!("skycart/", env!("CARGO_PKG_VERSION"));

/// Builds the single `reqwest::Client` every collaborator shares.
pub fn build_client(settings: &ApiSettings) -> ClientResult<Client> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(settings.timeout())
        .build()?;
    Ok(client)
}

/// Joins a base URL and a path without doubling the slash.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Fails with `UnexpectedStatus` unless the response is 2xx.
pub(crate) fn ensure_success(response: Response) -> ClientResult<Response> {
    let status = response.status();
    debug!(status = %status, url = %response.url(), "Received HTTP response");

    if !status.is_success() {
        warn!(status = %status, url = %response.url(), "Remote returned error status");
        return Err(ClientError::UnexpectedStatus {
            url: response.url().to_string(),
            status: status.as_u16(),
        });
    }
    Ok(response)
}

/// Reads the body of a successful response as JSON.
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let bytes = ensure_success(response)?.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("http://localhost:3000/", "/products"),
            "http://localhost:3000/products"
        );
        assert_eq!(
            join_url("http://localhost:3000", "products/7"),
            "http://localhost:3000/products/7"
        );
    }

    #[test]
    fn test_build_client() {
        assert!(build_client(&ApiSettings::default()).is_ok());
    }
}

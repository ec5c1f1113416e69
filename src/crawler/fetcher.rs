//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester, including:
//! - Building the HTTP client (an explicit value threaded through the
//!   pipeline, never ambient state)
//! - GET requests with redirect-as-failure detection
//! - Error classification into transient and resource failures
//! - Retrying page fetches under a [`RetryPolicy`]

use crate::crawler::retry::{with_retry, RetryPolicy};
use crate::FetchError;
use reqwest::{redirect::Policy, Client, Response};
use std::time::Duration;
use url::Url;

/// Builds the HTTP client used for every request of a run
///
/// Redirects are handled manually: the catalog answers with a redirect
/// when a resource does not exist at the requested identifier, so a
/// redirect must surface as a failure instead of being followed.
///
/// # Arguments
///
/// * `user_agent` - The User-Agent header value
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::none()) // Redirects signal "no such resource"
        .gzip(true)
        .brotli(true)
        .build()
}

/// Issues a single GET request and classifies the outcome
///
/// A 200-class response is the only acceptable outcome:
///
/// | Outcome | Classification |
/// |---------|----------------|
/// | Connection refused, reset, timeout | `FetchError::Transient` (retryable) |
/// | 3xx status | `FetchError::Redirect` (terminal) |
/// | Any other non-2xx status | `FetchError::Status` (terminal) |
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
///
/// # Returns
///
/// The successful response, body not yet consumed
pub async fn fetch_response(client: &Client, url: &Url) -> Result<Response, FetchError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|source| FetchError::Transient {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();

    if status.is_redirection() {
        return Err(FetchError::Redirect {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(response)
}

/// Fetches a page body as text, retrying transient failures
///
/// Body-read failures count as transient: the connection dropped midway,
/// and a fresh attempt may complete.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `policy` - Retry policy for transient failures
/// * `url` - The URL to fetch
///
/// # Returns
///
/// * `Ok(String)` - The decoded page body
/// * `Err(FetchError)` - Terminal failure for this request
pub async fn fetch_page(
    client: &Client,
    policy: &RetryPolicy,
    url: &Url,
) -> Result<String, FetchError> {
    with_retry(policy, || async move {
        let response = fetch_response(client, url).await?;
        response.text().await.map_err(|source| FetchError::Transient {
            url: url.to_string(),
            source,
        })
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_build_http_client() {
        let client = build_http_client("TestHarvester/1.0");
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_fetch_response_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
            .mount(&server)
            .await;

        let client = build_http_client("TestHarvester/1.0").unwrap();
        let url = Url::parse(&format!("{}/page", server.uri())).unwrap();

        let response = fetch_response(&client, &url).await.unwrap();
        assert_eq!(response.text().await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_fetch_response_redirect_is_terminal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/moved"))
            .respond_with(ResponseTemplate::new(302).insert_header("Location", "/elsewhere"))
            .mount(&server)
            .await;

        let client = build_http_client("TestHarvester/1.0").unwrap();
        let url = Url::parse(&format!("{}/moved", server.uri())).unwrap();

        let err = fetch_response(&client, &url).await.unwrap_err();
        assert!(matches!(err, FetchError::Redirect { status: 302, .. }));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_fetch_response_error_status_is_terminal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = build_http_client("TestHarvester/1.0").unwrap();
        let url = Url::parse(&format!("{}/gone", server.uri())).unwrap();

        let err = fetch_response(&client, &url).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_connection_failure_is_transient() {
        // Nothing listens on port 1; the connection is refused immediately
        let client = build_http_client("TestHarvester/1.0").unwrap();
        let url = Url::parse("http://127.0.0.1:1/").unwrap();

        let err = fetch_response(&client, &url).await.unwrap_err();
        assert!(err.is_transient());
    }
}

//! HTTP client construction and link verification
//!
//! Verification protocol per URL:
//!
//! 1. HEAD with redirect-following and the probe timeout
//! 2. On any error, exactly one GET under the same timeout and redirect policy
//! 3. If the GET errors as well, the failure is classified as timeout,
//!    client error, or unknown error
//!
//! Many servers reject HEAD but answer GET. No result is cached: a URL
//! discovered twice is probed twice.

use crate::config::UserAgentConfig;
use crate::crawler::status::{ProbeFailure, ProbeOutcome};
use reqwest::{redirect::Policy, Client, ClientBuilder, Method};
use std::time::Duration;

/// Maximum number of redirects followed by any request
pub const MAX_REDIRECTS: usize = 10;

/// Returns a client builder carrying the shared request settings
///
/// Used for both the verification client and the rendering session client.
pub fn client_builder(config: &UserAgentConfig) -> ClientBuilder {
    Client::builder()
        .user_agent(config.header_value())
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
}

/// Builds the HTTP client used to verify links
///
/// # Example
///
/// ```no_run
/// use kb_linkcheck::config::UserAgentConfig;
/// use kb_linkcheck::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "KbAudit".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    client_builder(config).build()
}

/// Probes a URL with HEAD, falling back to a single GET
///
/// Never fails: transport problems come back as [`ProbeOutcome::Failed`].
pub async fn verify_link(client: &Client, url: &str, timeout: Duration) -> ProbeOutcome {
    match probe(client, Method::HEAD, url, timeout).await {
        Ok(status) => ProbeOutcome::Status(status),
        Err(head_error) => {
            tracing::debug!("HEAD {} failed ({}), retrying with GET", url, head_error);

            match probe(client, Method::GET, url, timeout).await {
                Ok(status) => ProbeOutcome::Status(status),
                Err(get_error) => {
                    tracing::debug!("GET {} failed: {}", url, get_error);
                    ProbeOutcome::Failed(classify_failure(&get_error))
                }
            }
        }
    }
}

/// Sends one request and returns the final status after redirects
async fn probe(
    client: &Client,
    method: Method,
    url: &str,
    timeout: Duration,
) -> Result<u16, reqwest::Error> {
    let response = client.request(method, url).timeout(timeout).send().await?;
    Ok(response.status().as_u16())
}

/// Maps a transport error to the failure kind recorded in the ledger
fn classify_failure(error: &reqwest::Error) -> ProbeFailure {
    if error.is_timeout() {
        ProbeFailure::Timeout
    } else if error.is_connect()
        || error.is_request()
        || error.is_redirect()
        || error.is_builder()
        || error.is_body()
        || error.is_decode()
    {
        ProbeFailure::ClientError
    } else {
        ProbeFailure::UnknownError
    }
}

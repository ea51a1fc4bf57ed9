//! HTTP client factory shared by the backend clients.

use reqwest::Client;
use std::time::Duration;

/// Connect timeout (TCP handshake + TLS).
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Build the backend client.
///
/// Requests have no overall deadline unless `request_timeout` is set; a
/// single attempt is made per call and nothing is retried.
pub fn build_client(request_timeout: Option<Duration>) -> Result<Client, reqwest::Error> {
    let builder = Client::builder().connect_timeout(DEFAULT_CONNECT_TIMEOUT);
    let builder = match request_timeout {
        Some(timeout) => builder.timeout(timeout),
        None => builder,
    };
    builder.build()
}

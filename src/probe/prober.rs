//! A single time-bounded probe.
//!
//! The timeout is an explicit race: the request future against a timer,
//! first to complete wins. Dropping the losing side closes its connection,
//! so a timed-out probe never leaves a socket dangling.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::probe::Credentials;

/// Hard per-probe timeout.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Terminal result of one probe. Every probe produces exactly one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The request completed (and, for authenticated probes, returned a
    /// success status).
    Reachable,
    /// The request failed; the reason is shown to the operator verbatim.
    Unreachable(String),
}

/// Probe one endpoint with a GET request.
///
/// Unauthenticated probes never inspect the response; success is "the
/// transport completed". Authenticated probes read the status code, and a
/// non-success status collapses into [`ProbeOutcome::Unreachable`] with the
/// code in the message.
pub async fn probe(client: &Client, url: &str, credentials: &Credentials) -> ProbeOutcome {
    let headers = credentials.headers();
    let authenticated = !headers.is_empty();

    let request = client.get(url).headers(headers).send();

    let outcome = tokio::select! {
        result = request => match result {
            Ok(response) => {
                if authenticated && !response.status().is_success() {
                    ProbeOutcome::Unreachable(format!("HTTP status {}", response.status()))
                } else {
                    ProbeOutcome::Reachable
                }
            }
            Err(err) => ProbeOutcome::Unreachable(transport_message(&err)),
        },
        _ = tokio::time::sleep(PROBE_TIMEOUT) => {
            ProbeOutcome::Unreachable("Request timed out".to_string())
        }
    };

    debug!(%url, ?outcome, "probe finished");
    outcome
}

/// Flatten a reqwest error chain into the most specific message available.
fn transport_message(err: &reqwest::Error) -> String {
    let mut source: &dyn std::error::Error = err;
    while let Some(inner) = source.source() {
        source = inner;
    }
    source.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn probe_to_closed_port_is_unreachable() {
        // Port 1 is never listening.
        let client = Client::new();
        let outcome = probe(&client, "http://127.0.0.1:1/", &Credentials::None).await;

        match outcome {
            ProbeOutcome::Unreachable(reason) => assert!(!reason.is_empty()),
            ProbeOutcome::Reachable => panic!("closed port reported reachable"),
        }
    }

    #[tokio::test]
    async fn probe_to_invalid_url_is_unreachable() {
        let client = Client::new();
        let outcome = probe(&client, "not a url", &Credentials::None).await;
        assert!(matches!(outcome, ProbeOutcome::Unreachable(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn silent_server_times_out_with_exact_message() {
        // A listener that accepts connections but never answers.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut sockets = Vec::new();
            loop {
                if let Ok((socket, _)) = listener.accept().await {
                    sockets.push(socket);
                }
            }
        });

        let client = Client::new();
        let outcome = probe(&client, &format!("http://{addr}/"), &Credentials::None).await;

        assert_eq!(
            outcome,
            ProbeOutcome::Unreachable("Request timed out".to_string())
        );
    }
}

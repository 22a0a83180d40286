use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use log::{error, info, warn};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use crate::record::PingRecord;
use crate::store::RecordStore;

/// Why a poll cycle produced no data. Every variant is logged and treated as
/// a no-op for that cycle; the previously published records stay visible.
#[derive(Debug)]
pub enum FetchError {
    /// The request could not complete.
    Network(String),
    /// The backend answered with a non-success status.
    Status(u16),
    /// The body was not valid JSON or not an array of records.
    Parse(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Network(msg) => write!(f, "network error: {msg}"),
            FetchError::Status(code) => write!(f, "unexpected status: HTTP {code}"),
            FetchError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {}

/// Parses a response body as the backend's array-of-records shape. A body
/// that is JSON but not an array (null, object, scalar) fails like any other
/// malformed body.
pub fn parse_records(body: &str) -> Result<Vec<PingRecord>, FetchError> {
    serde_json::from_str::<Vec<PingRecord>>(body).map_err(|e| FetchError::Parse(e.to_string()))
}

/// Performs one GET against the endpoint and parses the body.
pub async fn fetch_records(
    client: &wreq::Client,
    endpoint: &str,
) -> Result<Vec<PingRecord>, FetchError> {
    let response = client
        .get(endpoint)
        .send()
        .await
        .map_err(|e| FetchError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }

    let body = response
        .text()
        .await
        .map_err(|e| FetchError::Network(e.to_string()))?;
    parse_records(&body)
}

/// The refresh loop: one fetch cycle immediately, then one per tick.
///
/// Cycles are serialized; the next tick is not taken until the current fetch
/// resolves. Cancellation drops an in-flight fetch, so nothing is published
/// after it fires. A failed cycle leaves the store untouched.
pub async fn poll_loop<F, Fut>(
    store: Arc<RecordStore>,
    interval: Duration,
    cancel: CancellationToken,
    mut fetch: F,
) where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Vec<PingRecord>, FetchError>>,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let cycle = store.begin_cycle();
        let outcome = tokio::select! {
            _ = cancel.cancelled() => break,
            outcome = fetch() => outcome,
        };

        match outcome {
            Ok(records) => {
                if !store.publish(cycle, records) {
                    warn!("cycle {cycle}: response arrived after a newer one, discarded");
                }
            }
            Err(e) => {
                warn!("cycle {cycle} failed ({e}), keeping previous data");
            }
        }
    }
}

/// Owns the background refresh loop. Running until `stop`; stopping is
/// one-way and terminal for this instance — the UI starts a fresh `Poller`
/// against the same store when the endpoint changes.
pub struct Poller {
    cancel: CancellationToken,
    handle: Option<thread::JoinHandle<()>>,
}

impl Poller {
    /// Spawns the loop on its own thread with its own runtime. The first
    /// fetch happens immediately, then once per `interval`.
    pub fn start(endpoint: String, interval: Duration, store: Arc<RecordStore>) -> Self {
        let cancel = CancellationToken::new();
        let loop_cancel = cancel.clone();

        let handle = thread::spawn(move || {
            let rt = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    error!("failed to start poller runtime: {e}");
                    return;
                }
            };
            rt.block_on(async move {
                info!("polling {endpoint} every {} ms", interval.as_millis());
                let client = wreq::Client::new();
                poll_loop(store, interval, loop_cancel, move || {
                    let client = client.clone();
                    let endpoint = endpoint.clone();
                    async move { fetch_records(&client, &endpoint).await }
                })
                .await;
                info!("poller stopped");
            });
        });

        Self {
            cancel,
            handle: Some(handle),
        }
    }

    /// Cancels the loop. An in-flight request is dropped and its result
    /// discarded; the thread is detached rather than joined so a hung
    /// request cannot stall teardown. Idempotent.
    pub fn stop(&mut self) {
        self.cancel.cancel();
        self.handle.take();
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_array_of_records() {
        let records = parse_records(
            r#"[{"ip":"1.1.1.1","duration":1500,"time_attempt":"2024-01-01T00:00:00Z"}]"#,
        )
        .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].ip, "1.1.1.1");
    }

    #[test]
    fn parses_empty_array() {
        assert!(parse_records("[]").unwrap().is_empty());
    }

    #[test]
    fn non_array_bodies_are_parse_failures() {
        for body in ["null", "{}", "42", "\"pings\"", "[{\"ip\":", "not json"] {
            match parse_records(body) {
                Err(FetchError::Parse(_)) => {}
                other => panic!("expected parse failure for {body:?}, got {other:?}"),
            }
        }
    }
}

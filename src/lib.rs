//! # counter-client
//!
//! `counter-client` emits keyed counter observations over a datagram socket,
//! either a local Unix domain socket or a UDP endpoint. Each observation is a
//! fixed 16-byte big-endian record:
//!
//! | Offset | Size | Field   | Type |
//! |--------|------|---------|------|
//! | 0      | 4    | command | u32  |
//! | 4      | 4    | key     | u32  |
//! | 8      | 8    | value   | i64  |
//!
//! The only command is `send_value = 0`. Delivery is fire-and-forget: there is
//! no acknowledgment, retry, batching or ordering guarantee. Errors are returned
//! to the caller and never logged, so ignoring them means losing observations.
//!
//! ## Usage
//! ```rust,no_run
//! use counter_client::{CounterClient, Destination};
//!
//! let client = CounterClient::new("127.0.0.1:8125".parse::<Destination>()?)?;
//! client.send_value(42u32, -7i64)?;
//! client.close()?;
//! # Ok::<(), counter_client::Error>(())
//! ```
//!
//! ## `metrics` integration
//! [`CounterRecorder`] implements the `metrics` crate's `Recorder` trait on top
//! of a client, so `metrics::counter!` calls become counter records. Metric
//! names map to keys through [`CounterRecorder::with_key`], or are used directly
//! when they are decimal numbers. Problems are reported through an error
//! callback so the user's project can keep its own version of `log` or
//! `tracing`.
//!
//! ```rust,no_run
//! use counter_client::{CounterClient, CounterRecorder, Destination};
//! use std::sync::Arc;
//!
//! let client = CounterClient::new(Destination::local("/var/run/counter.sock"))?;
//! let recorder = CounterRecorder::new(Arc::new(client), |err| eprintln!("Error: {}", err))
//!     .with_key("requests", 1);
//! if counter_client::metrics::set_global_recorder(recorder).is_err() {
//!     eprintln!("a global recorder is already installed");
//! }
//! counter_client::metrics::counter!("requests").increment(1);
//! # Ok::<(), counter_client::Error>(())
//! ```
//!
//! ## Modules
//! - `addr`: destination descriptors and parsing.
//! - `client`: the datagram client.
//! - `cmd`: the wire record.
//! - `handles`: `metrics` counter handles backed by the client.
//! - `state`: metric name to key table.
//! - `transport`: the socket seam.

// let the library user have the same version of metrics as this crate.
pub use metrics;

mod addr;
mod client;
mod cmd;
mod error;
mod handles;
mod state;
mod transport;

pub use addr::Destination;
pub use client::CounterClient;
pub use cmd::{Command, CounterRecord, RECORD_LEN};
pub use error::{Error, Result};
pub use transport::{ClientOptions, DatagramTransport, Transport};

use handles::*;
use state::*;

use metrics::{Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit};
use std::sync::Arc;

pub struct CounterRecorder<F> {
    client: Arc<CounterClient>,
    keys: KeyTable,
    err_cb: F,
}

impl<F> CounterRecorder<F>
where
    F: Fn(&str) + Copy + Send + Sync + 'static,
{
    pub fn new(client: Arc<CounterClient>, err_cb: F) -> Self {
        Self {
            client,
            keys: KeyTable::new(),
            err_cb,
        }
    }

    /// Sends the counter named `name` under wire key `key`.
    pub fn with_key(mut self, name: impl Into<String>, key: u32) -> Self {
        self.keys.insert(name.into(), key);
        self
    }

    pub fn client(&self) -> &Arc<CounterClient> {
        &self.client
    }
}

impl<F> Recorder for CounterRecorder<F>
where
    F: Fn(&str) + Copy + Send + Sync + 'static,
{
    fn describe_counter(&self, _name: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn describe_gauge(&self, _name: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn describe_histogram(&self, _name: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn register_counter(&self, key: &Key, _meta: &Metadata<'_>) -> Counter {
        let name = key.name().to_string();
        let Some(key) = self.keys.resolve(&name) else {
            (self.err_cb)(&format!("No counter key configured for {}", name));
            return Counter::noop();
        };
        let handle = CounterHandle {
            name,
            key,
            client: Arc::clone(&self.client),
            err_cb: self.err_cb,
        };
        Counter::from_arc(Arc::new(handle))
    }

    // gauges and histograms have no wire representation
    fn register_gauge(&self, _key: &Key, _meta: &Metadata<'_>) -> Gauge {
        Gauge::noop()
    }

    fn register_histogram(&self, _key: &Key, _meta: &Metadata<'_>) -> Histogram {
        Histogram::noop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::RecordingTransport;

    fn recorder(
        transport: &RecordingTransport,
    ) -> CounterRecorder<impl Fn(&str) + Copy + Send + Sync + 'static> {
        let client = Arc::new(CounterClient::from_transport(transport.clone()));
        CounterRecorder::new(client, |err| panic!("unexpected error: {}", err))
    }

    #[test]
    fn test_named_counter_sends_configured_key() {
        let transport = RecordingTransport::default();
        let recorder = recorder(&transport).with_key("requests", 7);

        metrics::with_local_recorder(&recorder, || {
            metrics::counter!("requests").increment(3);
            metrics::counter!("requests").absolute(10);
        });

        assert_eq!(
            transport.records(),
            vec![CounterRecord::new(7, 3), CounterRecord::new(7, 10)]
        );
    }

    #[test]
    fn test_numeric_counter_name_is_the_key() {
        let transport = RecordingTransport::default();
        let recorder = recorder(&transport);

        metrics::with_local_recorder(&recorder, || {
            metrics::counter!("1001").increment(1);
        });

        assert_eq!(transport.records(), vec![CounterRecord::new(1001, 1)]);
    }

    #[test]
    fn test_gauges_and_histograms_send_nothing() {
        let transport = RecordingTransport::default();
        let recorder = recorder(&transport);

        metrics::with_local_recorder(&recorder, || {
            metrics::gauge!("1").set(5.0);
            metrics::histogram!("2").record(1.5);
        });

        assert!(transport.records().is_empty());
    }

    #[test]
    fn test_unknown_counter_name_reports_error() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        static ERRORS: AtomicUsize = AtomicUsize::new(0);

        let transport = RecordingTransport::default();
        let client = Arc::new(CounterClient::from_transport(transport.clone()));
        let recorder = CounterRecorder::new(client, |_err| {
            ERRORS.fetch_add(1, Ordering::SeqCst);
        });

        metrics::with_local_recorder(&recorder, || {
            metrics::counter!("requests").increment(1);
        });

        assert_eq!(ERRORS.load(Ordering::SeqCst), 1);
        assert!(transport.records().is_empty());
    }

    #[test]
    fn test_send_failures_reach_error_callback() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        static ERRORS: AtomicUsize = AtomicUsize::new(0);

        let transport = RecordingTransport::default();
        let client = Arc::new(CounterClient::from_transport(transport.clone()));
        let recorder = CounterRecorder::new(client, |_err| {
            ERRORS.fetch_add(1, Ordering::SeqCst);
        })
        .with_key("requests", 1);

        metrics::with_local_recorder(&recorder, || {
            let counter = metrics::counter!("requests");
            // does not fit the signed value field
            counter.increment(u64::MAX);
            recorder.client().close().unwrap();
            counter.increment(1);
        });

        assert_eq!(ERRORS.load(Ordering::SeqCst), 2);
        assert!(transport.records().is_empty());
    }
}

use crate::addr::Destination;
use crate::cmd::{CounterRecord, RECORD_LEN};
use crate::error::{Error, Result};
use crate::transport::{ClientOptions, DatagramTransport, Transport};
use std::io;
use std::sync::{Mutex, MutexGuard};

/// Sends counter records to a single datagram destination.
///
/// Delivery is fire-and-forget: a successful [`send_value`](Self::send_value)
/// means the datagram was handed to the OS, not that anyone received it. There
/// is no retry and no buffering, so a caller that ignores returned errors
/// silently loses those observations.
///
/// The client is `Send + Sync`. Concurrent senders are serialized around each
/// transmission, so every call emits one whole record.
pub struct CounterClient {
    destination: Option<Destination>,
    transport: Mutex<Option<Box<dyn Transport>>>,
}

impl CounterClient {
    /// Opens a datagram socket for `destination`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAddress`] if the destination is malformed or cannot be
    /// resolved, [`Error::SocketCreation`] if the socket cannot be opened.
    pub fn new(destination: Destination) -> Result<Self> {
        Self::with_options(destination, ClientOptions::default())
    }

    /// Like [`new`](Self::new), applying `options` to the opened socket.
    pub fn with_options(destination: Destination, options: ClientOptions) -> Result<Self> {
        let transport = DatagramTransport::open(&destination, &options)?;
        Ok(Self {
            destination: Some(destination),
            transport: Mutex::new(Some(Box::new(transport))),
        })
    }

    /// Wraps an already configured transport.
    pub fn from_transport<T: Transport + 'static>(transport: T) -> Self {
        Self {
            destination: None,
            transport: Mutex::new(Some(Box::new(transport))),
        }
    }

    /// The destination this client was constructed for, if it was built from one.
    pub fn destination(&self) -> Option<&Destination> {
        self.destination.as_ref()
    }

    /// Description of the peer records are sent to, or `None` once closed.
    pub fn peer(&self) -> Option<String> {
        self.lock().as_ref().map(|t| t.peer())
    }

    /// Encodes `(key, value)` and sends it as one datagram.
    ///
    /// `key` must fit in a `u32` and `value` in an `i64`, otherwise nothing is
    /// sent and [`Error::Encoding`] is returned.
    ///
    /// # Errors
    ///
    /// [`Error::Closed`] after [`close`](Self::close), [`Error::Transmission`]
    /// if the transport fails or writes a short datagram.
    pub fn send_value<K, V>(&self, key: K, value: V) -> Result<()>
    where
        K: TryInto<u32>,
        V: TryInto<i64>,
    {
        let record = CounterRecord::try_new(key, value)?;
        self.send_record(&record)
    }

    /// Sends an already built record; errors as for [`send_value`](Self::send_value).
    pub fn send_record(&self, record: &CounterRecord) -> Result<()> {
        let encoded = record.encode();
        let mut guard = self.lock();
        let transport = guard.as_mut().ok_or(Error::Closed)?;
        let sent = transport
            .send(&encoded)
            .map_err(|source| Error::Transmission { source })?;
        if sent != RECORD_LEN {
            return Err(Error::Transmission {
                source: io::Error::new(
                    io::ErrorKind::WriteZero,
                    format!("sent {sent} of {RECORD_LEN} bytes"),
                ),
            });
        }
        Ok(())
    }

    /// Releases the socket. Later sends fail with [`Error::Closed`]; closing
    /// again is a no-op.
    pub fn close(&self) -> Result<()> {
        let transport = self.lock().take();
        drop(transport);
        Ok(())
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.lock().is_none()
    }

    // The guarded state is just the socket handle, which is never left
    // half-updated, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, Option<Box<dyn Transport>>> {
        self.transport
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for CounterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CounterClient")
            .field("destination", &self.destination)
            .field("peer", &self.peer())
            .finish()
    }
}

#![allow(dead_code)]

use counter_client::{CounterRecord, RECORD_LEN};
use std::net::UdpSocket;
use std::thread::JoinHandle;
use std::time::Duration;

#[cfg(unix)]
use std::os::unix::net::UnixDatagram;
#[cfg(unix)]
use std::path::Path;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

pub fn init_logging() {
    // every test binary shares one logger; later calls are no-ops
    let _ = simple_logger::init_with_level(log::Level::Debug);
}

/// Receives up to `expected` datagrams on a background thread and returns
/// them raw, so callers can check both length and content.
pub struct Receiver {
    handle: JoinHandle<Vec<Vec<u8>>>,
}

impl Receiver {
    pub fn udp(expected: usize) -> (Self, u16) {
        let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
        socket.set_read_timeout(Some(RECV_TIMEOUT)).unwrap();
        let port = socket.local_addr().unwrap().port();
        let handle = std::thread::spawn(move || {
            // larger than a record so short or oversized datagrams are visible
            let mut buf = [0u8; 64];
            let mut datagrams = Vec::with_capacity(expected);
            while datagrams.len() < expected {
                match socket.recv_from(&mut buf) {
                    Ok((n, _)) => datagrams.push(buf[..n].to_vec()),
                    Err(_) => break,
                }
            }
            datagrams
        });
        (Self { handle }, port)
    }

    #[cfg(unix)]
    pub fn unix(path: &Path, expected: usize) -> Self {
        let socket = UnixDatagram::bind(path).unwrap();
        socket.set_read_timeout(Some(RECV_TIMEOUT)).unwrap();
        let handle = std::thread::spawn(move || {
            let mut buf = [0u8; 64];
            let mut datagrams = Vec::with_capacity(expected);
            while datagrams.len() < expected {
                match socket.recv(&mut buf) {
                    Ok(n) => datagrams.push(buf[..n].to_vec()),
                    Err(_) => break,
                }
            }
            datagrams
        });
        Self { handle }
    }

    pub fn join(self) -> Vec<Vec<u8>> {
        self.handle.join().expect("Receiver thread panicked")
    }

    /// Joins and decodes, asserting every datagram is exactly one record.
    pub fn records(self) -> Vec<CounterRecord> {
        self.join()
            .iter()
            .map(|d| {
                assert_eq!(d.len(), RECORD_LEN, "datagram is not a single record");
                CounterRecord::decode(d).unwrap()
            })
            .collect()
    }
}

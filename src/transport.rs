//! Datagram transports.
//!
//! [`Transport`] is the only thing the client needs from a socket: send one
//! datagram to a fixed peer. [`DatagramTransport`] implements it over a UDP
//! socket or a Unix datagram socket.

use crate::addr::Destination;
use crate::error::{Error, Result};
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};
use std::time::Duration;

#[cfg(unix)]
use std::os::unix::net::UnixDatagram;
#[cfg(unix)]
use std::path::PathBuf;

/// A connectionless sink for encoded records.
pub trait Transport: Send {
    /// Sends `buf` as a single datagram to the transport's peer and returns
    /// the number of bytes written.
    fn send(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// Human-readable peer description.
    fn peer(&self) -> String;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientOptions {
    /// Upper bound on a single blocking send. Must be non-zero when set.
    pub send_timeout: Option<Duration>,
}

impl ClientOptions {
    pub fn with_send_timeout(mut self, timeout: Duration) -> Self {
        self.send_timeout = Some(timeout);
        self
    }
}

#[derive(Debug)]
pub enum DatagramTransport {
    Udp {
        socket: UdpSocket,
        peer: SocketAddr,
    },
    #[cfg(unix)]
    Unix {
        socket: UnixDatagram,
        path: PathBuf,
    },
}

impl DatagramTransport {
    /// Opens a socket of the family implied by `destination`.
    ///
    /// Network destinations are resolved once here; the socket is bound to the
    /// unspecified address of the resolved family on an ephemeral port. Local
    /// destinations get an unbound Unix datagram socket. No peer is connected.
    pub fn open(destination: &Destination, options: &ClientOptions) -> Result<Self> {
        destination.validate()?;
        match destination {
            Destination::Network { .. } => {
                let peer = destination.resolve()?;
                let local: SocketAddr = if peer.is_ipv4() {
                    (Ipv4Addr::UNSPECIFIED, 0).into()
                } else {
                    (Ipv6Addr::UNSPECIFIED, 0).into()
                };
                let socket = UdpSocket::bind(local).map_err(socket_creation)?;
                socket
                    .set_write_timeout(options.send_timeout)
                    .map_err(socket_creation)?;
                Ok(Self::Udp { socket, peer })
            }
            Destination::Local { .. } => Self::open_local(destination, options),
        }
    }

    #[cfg(unix)]
    fn open_local(destination: &Destination, options: &ClientOptions) -> Result<Self> {
        let path = destination
            .path()
            .ok_or_else(|| Error::invalid_address(destination, "not a local destination"))?
            .to_path_buf();
        let socket = UnixDatagram::unbound().map_err(socket_creation)?;
        socket
            .set_write_timeout(options.send_timeout)
            .map_err(socket_creation)?;
        Ok(Self::Unix { socket, path })
    }

    #[cfg(not(unix))]
    fn open_local(_destination: &Destination, _options: &ClientOptions) -> Result<Self> {
        Err(socket_creation(io::Error::new(
            io::ErrorKind::Unsupported,
            "unix domain sockets are not available on this platform",
        )))
    }
}

impl Transport for DatagramTransport {
    fn send(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Udp { socket, peer } => socket.send_to(buf, *peer),
            #[cfg(unix)]
            Self::Unix { socket, path } => socket.send_to(buf, path.as_path()),
        }
    }

    fn peer(&self) -> String {
        match self {
            Self::Udp { peer, .. } => peer.to_string(),
            #[cfg(unix)]
            Self::Unix { path, .. } => format!("unix:{}", path.display()),
        }
    }
}

fn socket_creation(source: io::Error) -> Error {
    Error::SocketCreation { source }
}

//! Destination descriptors.
//!
//! A destination is either a filesystem path naming a local Unix datagram
//! socket, or a host/port pair naming a UDP endpoint. The string form accepted
//! by [`Destination::from_str`] is:
//!
//! - `unix:<path>`, or any path starting with `/`, `./` or `../`
//! - `udp://<host>:<port>`, `<host>:<port>` or `[<ipv6>]:<port>`

use crate::error::{Error, Result};
use std::fmt;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Destination {
    Local { path: PathBuf },
    Network { host: String, port: u16 },
}

impl Destination {
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self::Local { path: path.into() }
    }

    pub fn network(host: impl Into<String>, port: u16) -> Self {
        Self::Network {
            host: host.into(),
            port,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local { .. })
    }

    /// Checks the shape of the destination without touching the network.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Local { path } => {
                if path.as_os_str().is_empty() {
                    return Err(Error::invalid_address(self, "socket path is empty"));
                }
                // rejects interior NULs and paths over the sockaddr_un limit
                #[cfg(unix)]
                std::os::unix::net::SocketAddr::from_pathname(path)
                    .map_err(|e| Error::invalid_address(self, format!("unusable socket path: {e}")))?;
                Ok(())
            }
            Self::Network { host, port } => {
                if host.trim().is_empty() {
                    return Err(Error::invalid_address(self, "host is empty"));
                }
                if *port == 0 {
                    return Err(Error::invalid_address(self, "port 0 cannot receive datagrams"));
                }
                Ok(())
            }
        }
    }

    /// Resolves a network destination to the first address the resolver
    /// returns. The address family of the result selects the socket family.
    pub(crate) fn resolve(&self) -> Result<SocketAddr> {
        let Self::Network { host, port } = self else {
            return Err(Error::invalid_address(self, "not a network destination"));
        };
        // Bracketed IPv6 literals come in from the string form.
        let host = host.trim_start_matches('[').trim_end_matches(']');
        (host, *port)
            .to_socket_addrs()
            .map_err(|e| Error::invalid_address(self, format!("cannot resolve host: {e}")))?
            .next()
            .ok_or_else(|| Error::invalid_address(self, "host resolved to no addresses"))
    }

    #[cfg(unix)]
    pub(crate) fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Local { path } => Some(path),
            Self::Network { .. } => None,
        }
    }
}

impl FromStr for Destination {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(path) = s.strip_prefix("unix:") {
            let dest = Self::local(path);
            dest.validate()?;
            return Ok(dest);
        }
        if s.starts_with('/') || s.starts_with("./") || s.starts_with("../") {
            let dest = Self::local(s);
            dest.validate()?;
            return Ok(dest);
        }

        let hostport = s.strip_prefix("udp://").unwrap_or(s);
        let Some((host, port)) = hostport.rsplit_once(':') else {
            return Err(Error::invalid_address(s, "expected a socket path or host:port"));
        };
        // An unbracketed IPv6 literal would split on its last group.
        if host.contains(':') && !(host.starts_with('[') && host.ends_with(']')) {
            return Err(Error::invalid_address(s, "IPv6 hosts must be bracketed"));
        }
        let port = port
            .parse::<u16>()
            .map_err(|e| Error::invalid_address(s, format!("invalid port: {e}")))?;

        let dest = Self::network(host.trim_start_matches('[').trim_end_matches(']'), port);
        dest.validate()?;
        Ok(dest)
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local { path } => write!(f, "unix:{}", path.display()),
            Self::Network { host, port } if host.contains(':') => write!(f, "[{host}]:{port}"),
            Self::Network { host, port } => write!(f, "{host}:{port}"),
        }
    }
}

//! Network Primitives
//!
//! The blocking sockets surface the connection manager drives: hostname
//! resolution plus a TCP socket that is created, configured and connected
//! as separate steps.

use std::io::{self, Read};
use std::net::{Shutdown, SocketAddr, ToSocketAddrs};
use std::time::Duration;

use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use tracing::debug;

/// A TCP socket as seen by the connection manager
pub trait SuplSocket {
    /// Configure the receive timeout (`SO_RCVTIMEO`)
    fn set_read_timeout(&mut self, timeout: Duration) -> io::Result<()>;

    /// Connect to `addr`, blocking until the handshake completes, fails,
    /// or the optional `timeout` elapses
    fn connect(&mut self, addr: SocketAddr, timeout: Option<Duration>) -> io::Result<()>;

    /// Single send call; the count may be short of `buf.len()`
    fn send(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// Single receive call bounded by the read timeout
    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Release the socket
    fn close(self) -> io::Result<()>;
}

/// Address resolution and socket factory
pub trait Network {
    type Socket: SuplSocket;

    /// Resolve `host` to candidate addresses in resolver order. Both IPv4
    /// and IPv6 results are accepted; port fields are left to the caller.
    fn resolve(&mut self, host: &str) -> io::Result<Vec<SocketAddr>>;

    /// Create an unconnected TCP socket for the family of `addr`
    fn socket(&mut self, addr: &SocketAddr) -> io::Result<Self::Socket>;
}

/// Host operating system sockets
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemNetwork;

impl Network for SystemNetwork {
    type Socket = SystemSocket;

    fn resolve(&mut self, host: &str) -> io::Result<Vec<SocketAddr>> {
        let addrs: Vec<SocketAddr> = (host, 0u16).to_socket_addrs()?.collect();
        debug!("Resolved {} to {} candidate(s)", host, addrs.len());
        Ok(addrs)
    }

    fn socket(&mut self, addr: &SocketAddr) -> io::Result<SystemSocket> {
        let inner = Socket::new(Domain::for_address(*addr), Type::STREAM, Some(Protocol::TCP))?;
        Ok(SystemSocket { inner })
    }
}

/// `socket2` backed TCP socket
#[derive(Debug)]
pub struct SystemSocket {
    inner: Socket,
}

impl SystemSocket {
    /// Borrow the underlying socket
    pub fn as_socket(&self) -> &Socket {
        &self.inner
    }
}

impl SuplSocket for SystemSocket {
    fn set_read_timeout(&mut self, timeout: Duration) -> io::Result<()> {
        self.inner.set_read_timeout(Some(timeout))
    }

    fn connect(&mut self, addr: SocketAddr, timeout: Option<Duration>) -> io::Result<()> {
        let addr = SockAddr::from(addr);
        match timeout {
            Some(timeout) => self.inner.connect_timeout(&addr, timeout),
            None => self.inner.connect(&addr),
        }
    }

    fn send(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.send(buf)
    }

    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (&self.inner).read(buf)
    }

    fn close(self) -> io::Result<()> {
        // The descriptor itself is released on drop; shutdown is the part
        // that can report a failure back.
        match self.inner.shutdown(Shutdown::Both) {
            Err(e) if e.kind() != io::ErrorKind::NotConnected => Err(e),
            _ => Ok(()),
        }
    }
}

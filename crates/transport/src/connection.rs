//! Blocking connection to a single device
//!
//! One UDP socket per connection. `write` performs (or reuses) a handshake,
//! encrypts and frames the payload, and sends it as one datagram. `read`
//! receives one datagram, validates the frame, and decrypts the body.
//!
//! The connection does no request/response correlation and no
//! retransmission: callers pair each `write` with a `read` and retry on
//! timeout if they want to. `&mut self` on every I/O method keeps a
//! round trip from interleaving with another on the same connection.

use crate::config::ConnectionConfig;
use crate::deadline::{Deadlines, remaining};
use crate::error::ConnectionError;
use miio_crypto::{DeviceKeys, Token};
use miio_protocol::{
    Handshake, HandshakeCache, HandshakeResult, encode_frame, validate_frame,
};
use std::fmt;
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::Instant;
use tracing::{debug, trace, warn};

/// Default miIO UDP port
pub const DEFAULT_PORT: u16 = 54321;

pub type Result<T> = std::result::Result<T, ConnectionError>;

/// Encrypted, framed connection to a device
pub struct Connection {
    socket: Option<UdpSocket>,
    token: Token,
    keys: DeviceKeys,
    config: ConnectionConfig,
    cache: HandshakeCache,
    deadlines: Deadlines,
    recv_buf: Vec<u8>,
}

impl Connection {
    /// Connect to `addr` with a 32-hex-character token
    ///
    /// ```no_run
    /// use miio_transport::Connection;
    ///
    /// let mut conn = Connection::connect("192.168.0.3:54321", "a0b1c2d3e4f5a0b1c2d3e4f5a0b1c2d3")?;
    /// conn.write(br#"{"id":1,"method":"miIO.info","params":[]}"#)?;
    /// let mut buf = [0u8; 4096];
    /// let n = conn.read(&mut buf)?;
    /// # Ok::<(), miio_transport::ConnectionError>(())
    /// ```
    pub fn connect<A: ToSocketAddrs>(addr: A, token_hex: &str) -> Result<Self> {
        Self::connect_with_config(addr, token_hex, ConnectionConfig::default())
    }

    /// Connect with explicit settings
    pub fn connect_with_config<A: ToSocketAddrs>(
        addr: A,
        token_hex: &str,
        config: ConnectionConfig,
    ) -> Result<Self> {
        // Token first: a bad token never opens a socket
        let token = Token::from_hex(token_hex)?;

        let remote = addr
            .to_socket_addrs()
            .map_err(ConnectionError::Transport)?
            .next()
            .ok_or_else(|| {
                ConnectionError::Transport(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "address resolved to nothing",
                ))
            })?;

        let local: SocketAddr = if remote.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };

        let socket = UdpSocket::bind(local).map_err(ConnectionError::Transport)?;
        socket.connect(remote).map_err(ConnectionError::Transport)?;

        Ok(Self::from_socket(socket, token, config))
    }

    /// Wrap an already connected socket
    pub fn from_socket(socket: UdpSocket, token: Token, config: ConnectionConfig) -> Self {
        debug!(
            "Connection opened: local={:?} remote={:?}",
            socket.local_addr().ok(),
            socket.peer_addr().ok()
        );

        Self {
            socket: Some(socket),
            keys: DeviceKeys::derive(&token),
            token,
            cache: HandshakeCache::new(config.cache_ttl()),
            deadlines: Deadlines::default(),
            recv_buf: vec![0u8; config.effective_read_buffer_size()],
            config,
        }
    }

    /// Encrypt `plaintext` and send it as one frame
    ///
    /// Returns the number of plaintext bytes consumed, which is always
    /// all of them. If the handshake fails nothing is sent.
    pub fn write(&mut self, plaintext: &[u8]) -> Result<usize> {
        self.socket()?;

        let session = self.session()?;
        let body = self.keys.encrypt(plaintext);
        let frame = encode_frame(&self.token, session.device_id, session.stamp, &body)?;

        self.send(&frame)?;
        trace!(
            "Sent frame: {} bytes ({} plaintext) stamp={}",
            frame.len(),
            plaintext.len(),
            session.stamp
        );

        Ok(plaintext.len())
    }

    /// Receive one frame and decrypt its body into `buf`
    ///
    /// Fails with `BufferTooSmall` rather than truncating when the
    /// plaintext does not fit.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let n = self.recv(self.deadlines.read)?;
        trace!("Received datagram: {} bytes", n);

        let frame = validate_frame(&self.token, &self.recv_buf[..n]).inspect_err(|e| {
            warn!("Rejected inbound frame: {}", e);
        })?;
        let plaintext = self.keys.decrypt(frame.body)?;

        if plaintext.len() > buf.len() {
            return Err(ConnectionError::BufferTooSmall {
                needed: plaintext.len(),
                capacity: buf.len(),
            });
        }

        buf[..plaintext.len()].copy_from_slice(&plaintext);
        Ok(plaintext.len())
    }

    /// Run a fresh handshake, bypassing and then refreshing the cache
    pub fn handshake(&mut self) -> Result<HandshakeResult> {
        let mut handshake = Handshake::new();
        let probe = handshake.start()?;

        let exchange = self
            .send(probe)
            .and_then(|()| self.recv(self.deadlines.handshake()));
        let n = match exchange {
            Ok(n) => n,
            Err(e) => {
                handshake.fail();
                debug!("Handshake failed: {}", e);
                return Err(e);
            }
        };

        let result = handshake.receive(&self.recv_buf[..n])?;
        self.cache.store(result, Instant::now());

        debug!(
            "Handshake complete: device_id={:#010x} stamp={}",
            result.device_id, result.stamp
        );
        Ok(result)
    }

    /// Forget any cached handshake; the next write handshakes again
    pub fn invalidate_handshake(&mut self) {
        self.cache.invalidate();
    }

    /// Release the socket. Every later operation fails with `Closed`.
    pub fn close(&mut self) -> Result<()> {
        match self.socket.take() {
            Some(_) => {
                debug!("Connection closed");
                Ok(())
            }
            None => Err(ConnectionError::Closed),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.socket.is_none()
    }

    /// Set both read and write deadlines. `None` disables the timeout.
    ///
    /// A deadline is absolute: it applies to every later call until it is
    /// changed, and once passed every call fails with `DeadlineExceeded`.
    pub fn set_deadline(&mut self, deadline: Option<Instant>) -> Result<()> {
        self.socket()?;
        self.deadlines.read = deadline;
        self.deadlines.write = deadline;
        Ok(())
    }

    pub fn set_read_deadline(&mut self, deadline: Option<Instant>) -> Result<()> {
        self.socket()?;
        self.deadlines.read = deadline;
        Ok(())
    }

    pub fn set_write_deadline(&mut self, deadline: Option<Instant>) -> Result<()> {
        self.socket()?;
        self.deadlines.write = deadline;
        Ok(())
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.socket()?.local_addr().map_err(ConnectionError::Transport)
    }

    pub fn peer_addr(&self) -> Result<SocketAddr> {
        self.socket()?.peer_addr().map_err(ConnectionError::Transport)
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    fn socket(&self) -> Result<&UdpSocket> {
        self.socket.as_ref().ok_or(ConnectionError::Closed)
    }

    fn session(&mut self) -> Result<HandshakeResult> {
        match self.cache.get(Instant::now()) {
            Some(cached) => {
                trace!("Reusing handshake: stamp={}", cached.stamp);
                Ok(cached)
            }
            None => self.handshake(),
        }
    }

    fn send(&self, datagram: &[u8]) -> Result<()> {
        let socket = self.socket()?;
        socket.set_write_timeout(remaining(self.deadlines.write, Instant::now())?)?;

        let sent = socket.send(datagram)?;
        if sent != datagram.len() {
            return Err(ConnectionError::Transport(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("datagram truncated: sent {} of {} bytes", sent, datagram.len()),
            )));
        }
        Ok(())
    }

    fn recv(&mut self, deadline: Option<Instant>) -> Result<usize> {
        let socket = self.socket.as_ref().ok_or(ConnectionError::Closed)?;
        socket.set_read_timeout(remaining(deadline, Instant::now())?)?;

        Ok(socket.recv(&mut self.recv_buf)?)
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("peer", &self.socket.as_ref().and_then(|s| s.peer_addr().ok()))
            .field("config", &self.config)
            .field("deadlines", &self.deadlines)
            .finish_non_exhaustive()
    }
}

impl io::Read for Connection {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Connection::read(self, buf).map_err(io::Error::from)
    }
}

impl io::Write for Connection {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Connection::write(self, buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

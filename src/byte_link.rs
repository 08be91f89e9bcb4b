use serialport::SerialPort;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

/// Port the Red Pitaya SCPI server listens on.
pub const DEFAULT_SCPI_PORT: u16 = 5000;

#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serial port error: {0}")]
    SerialPort(#[from] serialport::Error),

    #[error("Link is not open")]
    NotOpen,

    #[error("Could not resolve address {address}")]
    UnresolvedAddress { address: String },
}

/// A blocking byte channel to the instrument.
///
/// `read` returns an empty buffer once the peer has closed the channel and
/// fails once the link's own timeout elapses without data.
/// `write` reports how many bytes actually went out; implementations are
/// expected to push the whole buffer before returning.
pub trait ByteLink: Send {
    fn open(&mut self) -> Result<(), LinkError>;

    fn close(&mut self) -> Result<(), LinkError>;

    fn read(&mut self, max_bytes: usize) -> Result<Vec<u8>, LinkError>;

    fn write(&mut self, bytes: &[u8]) -> Result<usize, LinkError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TcpAddress {
    pub host: String,
    pub port: u16,
}

impl TcpAddress {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    fn resolve(&self) -> Result<SocketAddr, LinkError> {
        (self.host.as_str(), self.port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| LinkError::UnresolvedAddress {
                address: format!("{}:{}", self.host, self.port),
            })
    }
}

impl Default for TcpAddress {
    fn default() -> Self {
        Self::new("rp-f0060c.local", DEFAULT_SCPI_PORT)
    }
}

/// Byte link over a TCP socket.
#[derive(Debug)]
pub struct TcpLink {
    address: TcpAddress,
    timeout: Option<Duration>,
    stream: Option<TcpStream>,
}

impl TcpLink {
    pub fn new(address: TcpAddress, timeout: Option<Duration>) -> Self {
        Self {
            address,
            timeout,
            stream: None,
        }
    }

    pub fn address(&self) -> &TcpAddress {
        &self.address
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn stream(&mut self) -> Result<&mut TcpStream, LinkError> {
        self.stream.as_mut().ok_or(LinkError::NotOpen)
    }
}

impl ByteLink for TcpLink {
    fn open(&mut self) -> Result<(), LinkError> {
        let addr = self.address.resolve()?;
        log::debug!("Connecting to {} ({})", self.address.host, addr);

        let stream = match self.timeout {
            Some(timeout) => TcpStream::connect_timeout(&addr, timeout)?,
            None => TcpStream::connect(addr)?,
        };
        stream.set_read_timeout(self.timeout)?;
        stream.set_write_timeout(self.timeout)?;
        stream.set_nodelay(true)?;

        self.stream = Some(stream);
        Ok(())
    }

    fn close(&mut self) -> Result<(), LinkError> {
        if let Some(stream) = self.stream.take() {
            log::debug!("Closing connection to {}", self.address.host);
            match stream.shutdown(std::net::Shutdown::Both) {
                Err(e) if e.kind() == std::io::ErrorKind::NotConnected => {}
                result => result?,
            }
        }
        Ok(())
    }

    fn read(&mut self, max_bytes: usize) -> Result<Vec<u8>, LinkError> {
        read_chunk(self.stream()?, max_bytes)
    }

    fn write(&mut self, bytes: &[u8]) -> Result<usize, LinkError> {
        self.stream()?.write_all(bytes)?;
        Ok(bytes.len())
    }
}

/// Byte link over a serial port, for instruments reachable through a
/// USB/RS-232 console rather than the network.
pub struct SerialLink {
    path: String,
    baud_rate: u32,
    timeout: Duration,
    serial: Option<Box<dyn SerialPort>>,
}

impl SerialLink {
    pub fn new(path: &str, baud_rate: u32, timeout: Duration) -> Self {
        Self {
            path: path.to_string(),
            baud_rate,
            timeout,
            serial: None,
        }
    }

    fn serial(&mut self) -> Result<&mut Box<dyn SerialPort>, LinkError> {
        self.serial.as_mut().ok_or(LinkError::NotOpen)
    }
}

impl std::fmt::Debug for SerialLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialLink")
            .field("path", &self.path)
            .field("baud_rate", &self.baud_rate)
            .field("open", &self.serial.is_some())
            .finish()
    }
}

impl ByteLink for SerialLink {
    fn open(&mut self) -> Result<(), LinkError> {
        log::debug!("Opening serial port {} at {} baud", self.path, self.baud_rate);
        let serial = serialport::new(&self.path, self.baud_rate)
            .timeout(self.timeout)
            .open()?;
        serial.clear(serialport::ClearBuffer::All)?;
        self.serial = Some(serial);
        Ok(())
    }

    fn close(&mut self) -> Result<(), LinkError> {
        if self.serial.take().is_some() {
            log::debug!("Closed serial port {}", self.path);
        }
        Ok(())
    }

    fn read(&mut self, max_bytes: usize) -> Result<Vec<u8>, LinkError> {
        read_chunk(self.serial()?, max_bytes)
    }

    fn write(&mut self, bytes: &[u8]) -> Result<usize, LinkError> {
        self.serial()?.write_all(bytes)?;
        Ok(bytes.len())
    }
}

/// One read of at most `max_bytes`; a port timeout surfaces as `LinkError::Io`.
fn read_chunk(port: &mut impl Read, max_bytes: usize) -> Result<Vec<u8>, LinkError> {
    let mut buffer = vec![0u8; max_bytes];
    let n = port.read(&mut buffer)?;
    buffer.truncate(n);
    Ok(buffer)
}

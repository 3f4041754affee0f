//! Byte sources for the relay loop.
//!
//! The relay reads a blocking [`std::io::Read`]; this module decides what sits
//! behind it:
//!
//! - **Listen** – bind a TCP port and accept exactly one connection.  The
//!   device side pipes its input node into it, for example
//!   `cat /dev/input/event1 | nc <host> 12345`.  If the port is taken the next
//!   ones are tried, up to `port_attempts`.
//! - **File** – replay a capture of raw frames.
//! - **Stdin** – read frames piped into the process.
//!
//! Binding and accepting use Tokio so Ctrl-C can interrupt a wait for the
//! device.  The accepted socket is then switched back to blocking mode and
//! handed over as a plain `std::net::TcpStream`.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{debug, info};

/// First port tried when listening.
pub const DEFAULT_LISTEN_PORT: u16 = 12345;

/// How many consecutive ports are tried before giving up.
pub const DEFAULT_PORT_ATTEMPTS: u16 = 16;

/// A blocking byte stream owned by the relay loop.
pub type ByteSource = Box<dyn Read + Send>;

/// Error type for opening a byte source.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Every port in the fallback range was in use.
    #[error("no free port on {ip} in {first}..={last}: {source}")]
    PortsExhausted {
        ip: IpAddr,
        first: u16,
        last: u16,
        #[source]
        source: io::Error,
    },

    /// Binding failed for a reason other than the port being taken.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    /// Accepting or preparing the inbound connection failed.
    #[error("failed to accept device connection: {0}")]
    Accept(#[source] io::Error),

    /// A capture file could not be opened.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Where frames come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    /// Accept one TCP connection on `addr`, trying later ports if it is busy.
    Listen { addr: SocketAddr, port_attempts: u16 },
    /// Read a capture file.
    File(PathBuf),
    /// Read standard input.
    Stdin,
}

impl SourceSpec {
    /// Interprets an `--input` argument: `-` is stdin, anything else a path.
    pub fn from_input(arg: &str) -> Self {
        if arg == "-" {
            SourceSpec::Stdin
        } else {
            SourceSpec::File(PathBuf::from(arg))
        }
    }
}

impl Default for SourceSpec {
    fn default() -> Self {
        SourceSpec::Listen {
            addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_LISTEN_PORT),
            port_attempts: DEFAULT_PORT_ATTEMPTS,
        }
    }
}

impl std::fmt::Display for SourceSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceSpec::Listen { addr, .. } => write!(f, "tcp://{addr}"),
            SourceSpec::File(path) => write!(f, "file {}", path.display()),
            SourceSpec::Stdin => f.write_str("stdin"),
        }
    }
}

/// An open byte source plus a description of where it came from.
pub struct OpenedSource {
    pub reader: ByteSource,
    /// Peer address for TCP, path for files, `"stdin"` otherwise.
    pub origin: String,
}

impl std::fmt::Debug for OpenedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenedSource")
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Opens the byte source described by `spec`.
///
/// For [`SourceSpec::Listen`] this waits until the device connects.
///
/// # Errors
///
/// Returns a [`TransportError`] if binding, accepting, or opening fails.
pub async fn open_source(spec: &SourceSpec) -> Result<OpenedSource, TransportError> {
    match spec {
        SourceSpec::Listen {
            addr,
            port_attempts,
        } => {
            let listener = bind_with_fallback(*addr, *port_attempts).await?;
            let local = listener.local_addr().map_err(TransportError::Accept)?;
            info!("listening on {local}; waiting for the device stream");

            let (stream, peer) = accept_one(&listener).await?;
            info!("device connected from {peer}");
            Ok(OpenedSource {
                reader: Box::new(stream),
                origin: peer.to_string(),
            })
        }
        SourceSpec::File(path) => Ok(OpenedSource {
            reader: open_file(path)?,
            origin: path.display().to_string(),
        }),
        SourceSpec::Stdin => Ok(OpenedSource {
            reader: open_stdin(),
            origin: "stdin".to_string(),
        }),
    }
}

/// Binds `addr`, moving to the next port while the current one is in use.
///
/// At most `attempts` ports are tried (at least one).  Port 0 asks the OS for
/// an ephemeral port and is never retried.
///
/// # Errors
///
/// Returns [`TransportError::PortsExhausted`] if every port was taken and
/// [`TransportError::Bind`] for any other bind failure.
pub async fn bind_with_fallback(
    addr: SocketAddr,
    attempts: u16,
) -> Result<TcpListener, TransportError> {
    let first = addr.port();
    let attempts = if first == 0 { 1 } else { attempts.max(1) };
    let mut last_err = None;
    let mut last_port = first;

    for offset in 0..attempts {
        let Some(port) = first.checked_add(offset) else {
            break;
        };
        let candidate = SocketAddr::new(addr.ip(), port);
        last_port = port;

        match TcpListener::bind(candidate).await {
            Ok(listener) => return Ok(listener),
            Err(e) if e.kind() == io::ErrorKind::AddrInUse => {
                debug!("port {port} in use, trying the next one");
                last_err = Some(e);
            }
            Err(source) => {
                return Err(TransportError::Bind {
                    addr: candidate,
                    source,
                })
            }
        }
    }

    Err(TransportError::PortsExhausted {
        ip: addr.ip(),
        first,
        last: last_port,
        source: last_err.unwrap_or_else(|| io::Error::from(io::ErrorKind::AddrInUse)),
    })
}

/// Accepts one connection and returns it as a blocking std stream.
///
/// # Errors
///
/// Returns [`TransportError::Accept`] if accepting or the blocking-mode switch
/// fails.
pub async fn accept_one(
    listener: &TcpListener,
) -> Result<(std::net::TcpStream, SocketAddr), TransportError> {
    let (stream, peer) = listener.accept().await.map_err(TransportError::Accept)?;
    let stream = stream.into_std().map_err(TransportError::Accept)?;
    // Tokio sockets are non-blocking; the relay loop expects blocking reads.
    stream.set_nonblocking(false).map_err(TransportError::Accept)?;
    Ok((stream, peer))
}

/// Opens a capture file for buffered reading.
///
/// # Errors
///
/// Returns [`TransportError::Open`] if the file cannot be opened.
pub fn open_file(path: &Path) -> Result<ByteSource, TransportError> {
    let file = File::open(path).map_err(|source| TransportError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Box::new(BufReader::new(file)))
}

/// Standard input as a byte source.
pub fn open_stdin() -> ByteSource {
    Box::new(io::stdin())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! One request/response exchange over a fresh TCP connection.

use std::io::{self, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};

use super::{FetchError, HttpOptions, Response, ResponseBuffer, Target};
use crate::control::CancelToken;

/// Resolve `target` and connect to the first address that accepts.
pub(crate) fn connect(target: &Target, opts: &HttpOptions) -> Result<TcpStream, FetchError> {
    let addrs: Vec<SocketAddr> = (target.host(), target.port())
        .to_socket_addrs()
        .map_err(|source| FetchError::DnsResolutionFailed {
            host: target.host().to_string(),
            source,
        })?
        .collect();

    let mut last_err = FetchError::DnsResolutionFailed {
        host: target.host().to_string(),
        source: io::Error::new(io::ErrorKind::NotFound, "no addresses"),
    };
    for addr in addrs {
        let attempt = match opts.connect_timeout {
            Some(t) => TcpStream::connect_timeout(&addr, t),
            None => TcpStream::connect(addr),
        };
        let configured = attempt.and_then(|stream| {
            stream.set_read_timeout(opts.io_timeout)?;
            stream.set_write_timeout(opts.io_timeout)?;
            Ok(stream)
        });
        match configured {
            Ok(stream) => {
                tracing::trace!("connected to {}", addr);
                return Ok(stream);
            }
            Err(source) => {
                tracing::debug!("connect to {} failed: {}", addr, source);
                last_err = FetchError::ConnectionFailed {
                    addr: addr.to_string(),
                    source,
                };
            }
        }
    }
    Err(last_err)
}

/// Send `request` and read the response until the server closes the connection.
pub(crate) fn exchange(
    target: &Target,
    request: &str,
    opts: &HttpOptions,
    cancel: &CancelToken,
) -> Result<Response, FetchError> {
    if cancel.is_cancelled() {
        return Err(FetchError::Cancelled);
    }
    let mut stream = connect(target, opts)?;
    stream
        .write_all(request.as_bytes())
        .map_err(FetchError::WriteFailed)?;

    let mut buf = ResponseBuffer::new();
    let received = buf.fill_from(&mut stream, cancel)?;
    tracing::trace!("received {} bytes from {}", received, target);
    Ok(Response::from(buf))
}

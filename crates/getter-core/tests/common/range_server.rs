//! Minimal HTTP/1.0 server that supports HEAD and Range GET for integration tests.
//!
//! Serves a single static body and closes the connection after every response.
//! Options simulate servers that ignore ranges, omit Content-Length, throttle
//! or cut bodies short.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct RangeServerOptions {
    /// If false, GET ignores Range and always returns 200 with the full body.
    pub support_ranges: bool,
    /// If false, HEAD responses carry no Content-Length.
    pub send_content_length: bool,
    /// HEAD reports this Content-Length instead of the real body size.
    pub advertised_length: Option<u64>,
    /// The first N GET requests are answered with 503.
    pub fail_first_gets: usize,
    /// If true, ranged GETs send only the first half of the requested slice.
    pub truncate_bodies: bool,
    /// Sleep this long before answering a GET.
    pub get_delay: Option<Duration>,
}

impl Default for RangeServerOptions {
    fn default() -> Self {
        Self {
            support_ranges: true,
            send_content_length: true,
            advertised_length: None,
            fail_first_gets: 0,
            truncate_bodies: false,
            get_delay: None,
        }
    }
}

pub struct RangeServer {
    /// `127.0.0.1:<port>/file.bin`
    pub url: String,
    gets: Arc<AtomicUsize>,
    heads: Arc<AtomicUsize>,
}

impl RangeServer {
    /// Number of GET requests received so far.
    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    /// Number of HEAD requests received so far.
    pub fn heads(&self) -> usize {
        self.heads.load(Ordering::SeqCst)
    }
}

/// Starts a server in a background thread serving `body`. Runs until the process exits.
pub fn start(body: Vec<u8>) -> RangeServer {
    start_with_options(body, RangeServerOptions::default())
}

pub fn start_with_options(body: Vec<u8>, opts: RangeServerOptions) -> RangeServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body);
    let gets = Arc::new(AtomicUsize::new(0));
    let heads = Arc::new(AtomicUsize::new(0));
    {
        let gets = Arc::clone(&gets);
        let heads = Arc::clone(&heads);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let body = Arc::clone(&body);
                let gets = Arc::clone(&gets);
                let heads = Arc::clone(&heads);
                thread::spawn(move || handle(stream, &body, opts, &gets, &heads));
            }
        });
    }
    RangeServer {
        url: format!("127.0.0.1:{}/file.bin", port),
        gets,
        heads,
    }
}

/// Reads until the blank line that ends the request headers.
fn read_request(stream: &mut TcpStream) -> Option<String> {
    let mut data = Vec::new();
    let mut buf = [0u8; 1024];
    while !data.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return None,
            Ok(n) => data.extend_from_slice(&buf[..n]),
        }
    }
    String::from_utf8(data).ok()
}

fn handle(
    mut stream: TcpStream,
    body: &[u8],
    opts: RangeServerOptions,
    gets: &AtomicUsize,
    heads: &AtomicUsize,
) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let request = match read_request(&mut stream) {
        Some(r) => r,
        None => return,
    };
    let (method, range) = parse_request(&request);
    let total = body.len() as u64;

    if method.eq_ignore_ascii_case("HEAD") {
        heads.fetch_add(1, Ordering::SeqCst);
        let length = if opts.send_content_length {
            format!(
                "Content-Length: {}\r\n",
                opts.advertised_length.unwrap_or(total)
            )
        } else {
            String::new()
        };
        let accept = if opts.support_ranges {
            "Accept-Ranges: bytes\r\n"
        } else {
            ""
        };
        let response = format!("HTTP/1.0 200 OK\r\n{}{}\r\n", length, accept);
        let _ = stream.write_all(response.as_bytes());
        return;
    }

    if method.eq_ignore_ascii_case("GET") {
        let seen = gets.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = opts.get_delay {
            thread::sleep(delay);
        }
        if seen < opts.fail_first_gets {
            let _ = stream.write_all(b"HTTP/1.0 503 Service Unavailable\r\n\r\n");
            return;
        }
        match range.filter(|_| opts.support_ranges) {
            Some((start, end_incl)) => {
                let end_incl = end_incl.min(total.saturating_sub(1));
                if start > end_incl {
                    let response = format!(
                        "HTTP/1.0 416 Range Not Satisfiable\r\nContent-Range: bytes */{}\r\n\r\n",
                        total
                    );
                    let _ = stream.write_all(response.as_bytes());
                    return;
                }
                let slice = &body[start as usize..=end_incl as usize];
                let sent = if opts.truncate_bodies {
                    &slice[..slice.len() / 2]
                } else {
                    slice
                };
                let response = format!(
                    "HTTP/1.0 206 Partial Content\r\nContent-Length: {}\r\nContent-Range: bytes {}-{}/{}\r\n\r\n",
                    slice.len(),
                    start,
                    end_incl,
                    total
                );
                let _ = stream.write_all(response.as_bytes());
                let _ = stream.write_all(sent);
            }
            None => {
                let response = format!("HTTP/1.0 200 OK\r\nContent-Length: {}\r\n\r\n", total);
                let _ = stream.write_all(response.as_bytes());
                let _ = stream.write_all(body);
            }
        }
        return;
    }

    let _ = stream.write_all(b"HTTP/1.0 405 Method Not Allowed\r\n\r\n");
}

/// Returns (method, optional (start, end_inclusive) for Range: bytes=X-Y).
fn parse_request(request: &str) -> (&str, Option<(u64, u64)>) {
    let mut method = "";
    let mut range = None;
    for line in request.lines() {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        if method.is_empty() {
            method = line.split_whitespace().next().unwrap_or("");
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("range") {
                let value = value.trim();
                if let Some(spec) = value.strip_prefix("bytes=") {
                    if let Some((a, b)) = spec.split_once('-') {
                        let start = a.trim().parse::<u64>().unwrap_or(0);
                        let end = b.trim().parse::<u64>().unwrap_or(u64::MAX);
                        range = Some((start, end));
                    }
                }
            }
        }
    }
    (method, range)
}

/// A local port nobody is listening on.
pub fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    listener.local_addr().unwrap().port()
}

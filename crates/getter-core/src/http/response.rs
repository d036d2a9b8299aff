//! Raw HTTP response: header/body split and the few headers we care about.

use super::ResponseBuffer;
use crate::session::ByteRange;

const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";
const CONTENT_LENGTH: &[u8] = b"content-length:";

/// Index of the first `\r\n\r\n` in `raw`, if any.
pub fn find_header_end(raw: &[u8]) -> Option<usize> {
    raw.windows(HEADER_TERMINATOR.len())
        .position(|w| w == HEADER_TERMINATOR)
}

/// Body view of a raw response: everything after the first `\r\n\r\n`.
///
/// When no terminator exists the whole input is returned unchanged; such a
/// response is treated as bodiless/malformed rather than as an error. The
/// returned slice borrows `raw`, nothing is copied.
pub fn extract_body(raw: &[u8]) -> &[u8] {
    match find_header_end(raw) {
        Some(pos) => &raw[pos + HEADER_TERMINATOR.len()..],
        None => raw,
    }
}

/// Header section (status line and header lines) of a raw response.
fn head(raw: &[u8]) -> &[u8] {
    match find_header_end(raw) {
        Some(pos) => &raw[..pos],
        None => raw,
    }
}

/// Lines of the header section, CRLF (or bare LF) separated.
fn head_lines(raw: &[u8]) -> impl Iterator<Item = &[u8]> {
    head(raw)
        .split(|b| *b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
}

/// Size announced by a `Content-Length:` header line.
///
/// The value is the run of ASCII digits following the colon (after optional
/// blanks). Returns `None` when the header is absent or has no digits.
pub fn parse_content_length(raw: &[u8]) -> Option<u64> {
    let line = head_lines(raw).find(|line| {
        line.len() >= CONTENT_LENGTH.len()
            && line[..CONTENT_LENGTH.len()].eq_ignore_ascii_case(CONTENT_LENGTH)
    })?;
    let value = &line[CONTENT_LENGTH.len()..];
    let digits = value
        .iter()
        .skip_while(|b| **b == b' ' || **b == b'\t')
        .take_while(|b| b.is_ascii_digit());

    let mut size: Option<u64> = None;
    for d in digits {
        let acc = size.unwrap_or(0);
        size = Some(acc.checked_mul(10)?.checked_add(u64::from(d - b'0'))?);
    }
    size
}

/// Status code from an `HTTP/x.y NNN reason` status line.
pub fn parse_status_code(raw: &[u8]) -> Option<u16> {
    let line = head_lines(raw).next()?;
    let line = std::str::from_utf8(line).ok()?;
    let mut parts = line.split_whitespace();
    if !parts.next()?.starts_with("HTTP/") {
        return None;
    }
    let code = parts.next()?;
    if code.len() != 3 {
        return None;
    }
    code.parse().ok()
}

/// Value of the first header named `name` (case-insensitive), trimmed.
pub fn header_value<'a>(raw: &'a [u8], name: &str) -> Option<&'a str> {
    head_lines(raw).skip(1).find_map(|line| {
        let line = std::str::from_utf8(line).ok()?;
        let (key, value) = line.split_once(':')?;
        key.trim()
            .eq_ignore_ascii_case(name)
            .then(|| value.trim())
    })
}

/// Parsed `Content-Range: bytes <start>-<end>/<total|*>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentRange {
    pub range: ByteRange,
    pub total: Option<u64>,
}

impl ContentRange {
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        let spec = value
            .get(..6)
            .filter(|unit| unit.eq_ignore_ascii_case("bytes "))
            .map(|_| value[6..].trim())?;
        let (span, total) = spec.split_once('/')?;
        let (start, end) = span.split_once('-')?;
        let start: u64 = start.trim().parse().ok()?;
        let end: u64 = end.trim().parse().ok()?;
        if end < start {
            return None;
        }
        let total = match total.trim() {
            "*" => None,
            t => Some(t.parse().ok()?),
        };
        Some(Self {
            range: ByteRange::new(start, end),
            total,
        })
    }
}

/// A complete response read off the socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    buf: ResponseBuffer,
}

impl Response {
    /// Full raw bytes (headers and body).
    pub fn raw(&self) -> &[u8] {
        self.buf.as_bytes()
    }

    /// Total bytes received.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Zero-copy body view; see [`extract_body`].
    pub fn body(&self) -> &[u8] {
        extract_body(self.raw())
    }

    pub fn has_header_terminator(&self) -> bool {
        find_header_end(self.raw()).is_some()
    }

    pub fn status_code(&self) -> Option<u16> {
        parse_status_code(self.raw())
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        header_value(self.raw(), name)
    }

    pub fn content_length(&self) -> Option<u64> {
        parse_content_length(self.raw())
    }

    pub fn content_range(&self) -> Option<ContentRange> {
        self.header("content-range").and_then(ContentRange::parse)
    }
}

impl From<ResponseBuffer> for Response {
    fn from(buf: ResponseBuffer) -> Self {
        Self { buf }
    }
}

impl From<Vec<u8>> for Response {
    fn from(raw: Vec<u8>) -> Self {
        Self {
            buf: ResponseBuffer::from(raw),
        }
    }
}

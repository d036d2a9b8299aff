//! Download target: host, port and path split out of a user-supplied URL.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Port used when the URL does not name one.
pub const DEFAULT_PORT: u16 = 80;

#[derive(Debug, Error)]
pub enum TargetError {
    #[error("could not split url into host/path: {0}")]
    MissingPath(String),
    #[error("url has no host: {0}")]
    MissingHost(String),
    #[error("invalid port in {0}")]
    InvalidPort(String),
    #[error("unsupported scheme {0:?} (only plain http is supported)")]
    UnsupportedScheme(String),
    #[error("invalid url")]
    InvalidUrl(#[from] url::ParseError),
}

/// Where a resource lives. `path` is stored without its leading `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    host: String,
    port: u16,
    path: String,
}

impl Target {
    pub fn new(host: impl Into<String>, port: u16, path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            host: host.into(),
            port,
            path: path.trim_start_matches('/').to_string(),
        }
    }

    /// Parse `host[:port]/path` (split on the first `/`) or `http://host[:port]/path`.
    pub fn parse(input: &str) -> Result<Self, TargetError> {
        let input = input.trim();
        if input.contains("://") {
            return Self::parse_with_scheme(input);
        }

        let (authority, path) = input
            .split_once('/')
            .ok_or_else(|| TargetError::MissingPath(input.to_string()))?;
        let (host, port) = match authority.rsplit_once(':') {
            Some((host, port)) => {
                let port = port
                    .parse::<u16>()
                    .map_err(|_| TargetError::InvalidPort(input.to_string()))?;
                (host, port)
            }
            None => (authority, DEFAULT_PORT),
        };
        if host.is_empty() {
            return Err(TargetError::MissingHost(input.to_string()));
        }
        Ok(Self::new(host, port, path))
    }

    fn parse_with_scheme(input: &str) -> Result<Self, TargetError> {
        let url = url::Url::parse(input)?;
        if url.scheme() != "http" {
            return Err(TargetError::UnsupportedScheme(url.scheme().to_string()));
        }
        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| TargetError::MissingHost(input.to_string()))?;
        let port = url.port_or_known_default().unwrap_or(DEFAULT_PORT);
        let mut path = url.path().to_string();
        if let Some(query) = url.query() {
            path.push('?');
            path.push_str(query);
        }
        Ok(Self::new(host, port, path))
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Path without the leading `/` (may be empty).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Last non-empty path segment, ignoring any query string.
    pub fn file_name(&self) -> Option<&str> {
        let path = self.path.split(['?', '#']).next().unwrap_or("");
        path.rsplit('/').find(|s| !s.is_empty())
    }
}

impl FromStr for Target {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Target::parse(s)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.port == DEFAULT_PORT {
            write!(f, "{}/{}", self.host, self.path)
        } else {
            write!(f, "{}:{}/{}", self.host, self.port, self.path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_first_slash() {
        let t = Target::parse("www.example.com/files/archive.tar").unwrap();
        assert_eq!(t.host(), "www.example.com");
        assert_eq!(t.port(), 80);
        assert_eq!(t.path(), "files/archive.tar");
        assert_eq!(t.file_name(), Some("archive.tar"));
    }

    #[test]
    fn explicit_port() {
        let t = Target::parse("127.0.0.1:8080/data.bin").unwrap();
        assert_eq!(t.host(), "127.0.0.1");
        assert_eq!(t.port(), 8080);
        assert_eq!(t.to_string(), "127.0.0.1:8080/data.bin");
    }

    #[test]
    fn missing_slash_is_an_error() {
        assert!(matches!(
            Target::parse("example.com"),
            Err(TargetError::MissingPath(_))
        ));
    }

    #[test]
    fn empty_path_is_allowed() {
        let t = Target::parse("example.com/").unwrap();
        assert_eq!(t.path(), "");
        assert_eq!(t.file_name(), None);
    }

    #[test]
    fn bad_port_and_empty_host() {
        assert!(matches!(
            Target::parse("example.com:http/x"),
            Err(TargetError::InvalidPort(_))
        ));
        assert!(matches!(
            Target::parse("/index.html"),
            Err(TargetError::MissingHost(_))
        ));
    }

    #[test]
    fn http_scheme_accepted() {
        let t: Target = "http://example.com:8000/a/b.iso?x=1".parse().unwrap();
        assert_eq!(t.host(), "example.com");
        assert_eq!(t.port(), 8000);
        assert_eq!(t.path(), "a/b.iso?x=1");
        assert_eq!(t.file_name(), Some("b.iso"));

        let default_port = Target::parse("http://example.com/x").unwrap();
        assert_eq!(default_port.port(), 80);
    }

    #[test]
    fn https_rejected() {
        assert!(matches!(
            Target::parse("https://example.com/x"),
            Err(TargetError::UnsupportedScheme(s)) if s == "https"
        ));
    }
}

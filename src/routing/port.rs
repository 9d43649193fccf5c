//! Backend port extraction.
//!
//! # Responsibilities
//! - Parse the host form `<port>(-dot-|.)<hostname>[:suffix|/suffix]`
//! - Parse the path form `/_proxy/<port>` followed by `/` or end of input
//! - Locate the `/_proxy/<port>` segment so the rewriter can strip it
//!
//! # Design Decisions
//! - Hand-written scanners instead of regex; both grammars are tiny
//! - Absent input is `NotFound`, never an error
//! - Digit runs outside `1..=65535` are malformed and yield `NotFound`
//! - Hostname comparison is byte-exact; `MyHost` does not name `myhost`

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

/// Path marker preceding an embedded port.
pub const PROXY_MARKER: &str = "/_proxy/";

/// Separators accepted between the port and the hostname in the host form.
const HOST_SEPARATORS: [&str; 2] = ["-dot-", "."];

/// A validated backend port (`1..=65535`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BackendPort(u16);

impl BackendPort {
    /// Wrap a port number. Port 0 is not addressable and is rejected.
    pub fn new(port: u16) -> Option<Self> {
        (port != 0).then_some(Self(port))
    }

    /// Raw port number.
    pub fn get(self) -> u16 {
        self.0
    }

    /// `http://localhost:<port>`
    pub fn localhost_url(self) -> String {
        format!("http://localhost:{}", self.0)
    }
}

impl fmt::Display for BackendPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BackendPort {
    type Err = InvalidPort;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidPort(s.to_string()));
        }
        s.parse::<u16>()
            .ok()
            .and_then(BackendPort::new)
            .ok_or_else(|| InvalidPort(s.to_string()))
    }
}

impl TryFrom<u32> for BackendPort {
    type Error = InvalidPort;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        u16::try_from(value)
            .ok()
            .and_then(BackendPort::new)
            .ok_or_else(|| InvalidPort(value.to_string()))
    }
}

/// A digit string that is not a usable port.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid backend port: {0:?}")]
pub struct InvalidPort(pub String);

/// Outcome of a port lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortMatch {
    Found(BackendPort),
    NotFound,
}

impl From<Option<BackendPort>> for PortMatch {
    fn from(port: Option<BackendPort>) -> Self {
        port.map_or(PortMatch::NotFound, PortMatch::Found)
    }
}

/// Extract the port embedded in a `Host` header value.
///
/// The remainder after the separator, minus any `:` or `/` suffix, must be
/// this server's own `hostname`; arbitrary hosts cannot name a port.
pub fn port_from_host(host: Option<&str>, hostname: &str) -> PortMatch {
    let Some(host) = host else {
        return PortMatch::NotFound;
    };

    let digits_end = host
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(host.len());
    if digits_end == 0 {
        return PortMatch::NotFound;
    }
    let (digits, tail) = host.split_at(digits_end);

    let Some(rest) = HOST_SEPARATORS
        .iter()
        .find_map(|sep| tail.strip_prefix(*sep))
    else {
        return PortMatch::NotFound;
    };

    let trimmed = rest.split([':', '/']).next().unwrap_or(rest);
    if hostname.is_empty() || trimmed != hostname {
        return PortMatch::NotFound;
    }

    digits.parse::<BackendPort>().ok().into()
}

/// Extract the port from the first `/_proxy/<port>` segment in `url`.
pub fn port_from_path(url: Option<&str>) -> PortMatch {
    url.and_then(find_proxy_segment)
        .map(|(_, port)| port)
        .into()
}

/// Locate the first well-formed `/_proxy/<port>` segment.
///
/// The returned range covers the marker, the digits and the trailing `/`
/// when present.
pub fn find_proxy_segment(url: &str) -> Option<(Range<usize>, BackendPort)> {
    let mut from = 0;
    while let Some(offset) = url[from..].find(PROXY_MARKER) {
        let start = from + offset;
        let digits_start = start + PROXY_MARKER.len();
        let after = &url[digits_start..];
        let digits_len = after
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(after.len());

        let terminator = after[digits_len..].chars().next();
        if digits_len > 0 && matches!(terminator, None | Some('/')) {
            if let Ok(port) = after[..digits_len].parse::<BackendPort>() {
                let end = digits_start + digits_len + usize::from(terminator.is_some());
                return Some((start..end, port));
            }
        }

        // Occurrences may overlap: "/_proxy/_proxy/80"
        from = start + 1;
    }
    None
}

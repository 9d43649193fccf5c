//! Forward target selection and URL rewriting.
//!
//! # Responsibilities
//! - Pick the upstream base URL for an eligible request
//! - Strip the `/_proxy/<port>` marker and prefix the application base path
//! - Mount streaming requests under the extra base-path namespace
//!
//! # Design Decisions
//! - Host-addressed requests are forwarded verbatim; their paths carry no marker
//! - Only the path part of the URL is rewritten; the query string is untouched
//! - A missing port here is a caller bug, reported as `RoutingError`

use thiserror::Error;

use crate::config::RoutingSettings;
use crate::http::request::RequestView;
use crate::routing::classifier::{request_port, PortSource, STREAMING_PREFIX};
use crate::routing::port::{find_proxy_segment, port_from_host, BackendPort, PortMatch};

/// Routing failures that should never happen for an eligible request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    #[error("no backend port could be resolved for {url:?}")]
    UnresolvedPort { url: String },
}

/// Where and how an eligible request is forwarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardTarget {
    pub port: BackendPort,
    pub source: PortSource,
    /// `http://localhost:<port>`, plus the base path for streaming requests.
    pub base_url: String,
    /// Path and query sent upstream, appended to `base_url`.
    pub rewritten_path: String,
}

impl ForwardTarget {
    /// Absolute upstream URI: `base_url` joined with `rewritten_path`.
    pub fn upstream_uri(&self) -> String {
        join_url(&self.base_url, &self.rewritten_path)
    }
}

/// Compute the forward target for a request already judged eligible.
pub fn compute_target(
    request: &RequestView<'_>,
    settings: &RoutingSettings,
) -> Result<ForwardTarget, RoutingError> {
    if let PortMatch::Found(port) = port_from_host(request.host, settings.hostname()) {
        return Ok(ForwardTarget {
            port,
            source: PortSource::Host,
            base_url: port.localhost_url(),
            rewritten_path: request.url.to_string(),
        });
    }

    let (source, port) =
        request_port(request, settings).ok_or_else(|| RoutingError::UnresolvedPort {
            url: request.url.to_string(),
        })?;

    let stripped = strip_proxy_segment(request.url);
    let rewritten_path = prefix_base_path(settings.base_path(), &stripped);

    let mut base_url = port.localhost_url();
    if stripped.starts_with(STREAMING_PREFIX) {
        base_url.push_str(settings.base_path());
    }

    Ok(ForwardTarget {
        port,
        source,
        base_url,
        rewritten_path,
    })
}

/// Replace the first `/_proxy/<port>` segment of the path with `/`.
///
/// The path is not normalized: a bare `/_proxy/<port>` keeps its trailing
/// `/` and `//` runs pass through to the backend unchanged.
pub fn strip_proxy_segment(url: &str) -> String {
    let (path, query) = match url.find('?') {
        Some(idx) => url.split_at(idx),
        None => (url, ""),
    };

    let mut out = match find_proxy_segment(path) {
        Some((range, _)) => {
            let mut s = String::with_capacity(path.len());
            s.push_str(&path[..range.start]);
            s.push('/');
            s.push_str(&path[range.end..]);
            s
        }
        None => path.to_string(),
    };
    if !out.starts_with('/') {
        out.insert(0, '/');
    }
    out.push_str(query);
    out
}

/// `base_path` is normalized ("" or "/x"); `path` starts with '/'.
fn prefix_base_path(base_path: &str, path: &str) -> String {
    format!("{}{}", base_path, path)
}

/// Join a target URL and a request path, collapsing the slash between them.
fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(base: &str, streaming: Option<u16>) -> RoutingSettings {
        RoutingSettings::new(base, streaming.and_then(BackendPort::new), "myhost").unwrap()
    }

    #[test]
    fn test_host_port_forwards_unchanged() {
        let req = RequestView::new(Some("10-dot-myhost"), "/_proxy/20/foo?a=b", None);
        let target = compute_target(&req, &settings("/base", None)).unwrap();
        assert_eq!(target.port.get(), 10);
        assert_eq!(target.source, PortSource::Host);
        assert_eq!(target.base_url, "http://localhost:10");
        assert_eq!(target.rewritten_path, "/_proxy/20/foo?a=b");
        assert_eq!(target.upstream_uri(), "http://localhost:10/_proxy/20/foo?a=b");
    }

    #[test]
    fn test_path_rewrite_with_base() {
        let req = RequestView::new(None, "/_proxy/8080/notebooks/x.ipynb", None);
        let target = compute_target(&req, &settings("/base", None)).unwrap();
        assert_eq!(target.rewritten_path, "/base/notebooks/x.ipynb");
        assert_eq!(target.base_url, "http://localhost:8080");
        assert_eq!(target.upstream_uri(), "http://localhost:8080/base/notebooks/x.ipynb");
    }

    #[test]
    fn test_streaming_double_prefix() {
        let req = RequestView::new(None, "/_proxy/8080/socket.io/?x=1", None);
        let target = compute_target(&req, &settings("/base", None)).unwrap();
        assert_eq!(target.rewritten_path, "/base/socket.io/?x=1");
        assert_eq!(target.base_url, "http://localhost:8080/base");
        assert_eq!(
            target.upstream_uri(),
            "http://localhost:8080/base/base/socket.io/?x=1"
        );
    }

    #[test]
    fn test_streaming_default_port() {
        let req = RequestView::new(None, "/socket.io/?EIO=3&transport=polling", None);
        let target = compute_target(&req, &settings("/base", Some(8081))).unwrap();
        assert_eq!(target.source, PortSource::StreamingDefault);
        assert_eq!(target.rewritten_path, "/base/socket.io/?EIO=3&transport=polling");
        assert_eq!(target.base_url, "http://localhost:8081/base");
    }

    #[test]
    fn test_root_base_path() {
        let req = RequestView::new(None, "/_proxy/8080/socket.io/", None);
        let target = compute_target(&req, &settings("/", None)).unwrap();
        assert_eq!(target.rewritten_path, "/socket.io/");
        assert_eq!(target.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_referer_port_keeps_path() {
        let req = RequestView::new(
            Some("example.com"),
            "/static/app.js?v=2",
            Some("http://example.com/_proxy/5000/index.html"),
        );
        let target = compute_target(&req, &settings("/base", None)).unwrap();
        assert_eq!(target.source, PortSource::Referer);
        assert_eq!(target.rewritten_path, "/base/static/app.js?v=2");
        assert_eq!(target.base_url, "http://localhost:5000");
    }

    #[test]
    fn test_rewrite_does_not_normalize() {
        let bare = RequestView::new(None, "/_proxy/8080", None);
        let target = compute_target(&bare, &settings("/base", None)).unwrap();
        assert_eq!(target.rewritten_path, "/base/");

        let doubled = RequestView::new(None, "/_proxy/8080//a//b", None);
        let target = compute_target(&doubled, &settings("/base", None)).unwrap();
        assert_eq!(target.rewritten_path, "/base//a//b");
    }

    #[test]
    fn test_unresolved_port_is_an_error() {
        let req = RequestView::new(None, "/tree", None);
        assert_eq!(
            compute_target(&req, &settings("/base", None)),
            Err(RoutingError::UnresolvedPort { url: "/tree".into() })
        );
    }

    #[test]
    fn test_strip_proxy_segment() {
        assert_eq!(strip_proxy_segment("/_proxy/8080/a/b"), "/a/b");
        assert_eq!(strip_proxy_segment("/_proxy/8080"), "/");
        assert_eq!(strip_proxy_segment("/_proxy/8080?x=1"), "/?x=1");
        assert_eq!(strip_proxy_segment("/app/_proxy/8080/b"), "/app/b");
        assert_eq!(strip_proxy_segment("/a?next=/_proxy/1/"), "/a?next=/_proxy/1/");
        assert_eq!(strip_proxy_segment("/plain"), "/plain");
    }
}

//! Minimal line-based text protocol: request-line parsing and CRLF response
//! formatting. Deliberately not a compliant HTTP implementation; it covers
//! exactly the `METHOD SP TARGET SP VERSION` request line plus the fixed
//! response shape the routes need.

use std::sync::Arc;

use crate::stats::ServerStats;

/// Parsed request line. `query` is everything after the first `?` in the
/// target, without the `?` itself.
#[derive(Debug, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub version: String,
}

/// Parse the request line out of a raw request head (everything up to the
/// blank line). Headers after the first line are ignored. Returns `None`
/// for a malformed line; the caller closes the connection without a reply.
pub fn parse_request(head: &str) -> Option<Request> {
    let line = head.split("\r\n").next().unwrap_or(head);
    let mut parts = line.split_whitespace();
    let method = parts.next()?;
    let target = parts.next()?;
    let version = parts.next()?;

    let (path, query) = match target.split_once('?') {
        Some((path, query)) => (path, Some(query.to_string())),
        None => (target, None),
    };

    Some(Request {
        method: method.to_string(),
        path: path.to_string(),
        query,
        version: version.to_string(),
    })
}

/// A response ready to be written to the wire.
pub struct Response {
    pub status: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

impl Response {
    pub fn new(status: &'static str, content_type: &'static str, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type,
            body: body.into(),
        }
    }

    /// Serialize as `HTTP/1.1 <status>` + Content-Type, Content-Length,
    /// `Connection: close`, blank line, body.
    pub fn to_bytes(&self) -> Vec<u8> {
        let header = format!(
            "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            self.status,
            self.content_type,
            self.body.len()
        );
        let mut out = header.into_bytes();
        out.extend_from_slice(self.body.as_bytes());
        out
    }
}

/// Dispatch a parsed request to its route, bumping the shared counters.
pub fn route(req: &Request, stats: &Arc<ServerStats>) -> Response {
    stats.inc_total_requests();
    match req.path.as_str() {
        "/" => Response::new(
            "200 OK",
            "text/html",
            "<html><body>\
             <h1>conveyor</h1>\
             <p>Routes:</p>\
             <ul>\
             <li><a href=\"/hello\">/hello</a></li>\
             <li><a href=\"/time\">/time</a></li>\
             <li><a href=\"/stats\">/stats</a></li>\
             </ul>\
             </body></html>",
        ),
        "/hello" => {
            stats.inc_hello_requests();
            Response::new(
                "200 OK",
                "application/json",
                "{\"msg\":\"hello from the worker pool\"}",
            )
        }
        "/time" => {
            let now = crate::protocol::timestamp_us() / 1_000_000;
            Response::new(
                "200 OK",
                "application/json",
                format!("{{\"server_time\":{now}}}"),
            )
        }
        "/stats" => {
            let snap = stats.snapshot();
            Response::new(
                "200 OK",
                "application/json",
                format!(
                    "{{\"total_requests\":{},\"hello_requests\":{},\"not_found\":{}}}",
                    snap.total_requests, snap.hello_requests, snap.not_found
                ),
            )
        }
        _ => {
            stats.inc_not_found();
            Response::new("404 Not Found", "text/plain", "404 NOT FOUND")
        }
    }
}

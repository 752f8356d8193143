//! Pluggable per-connection logic run by the workers.
//!
//! Handlers read one request and write one response; errors stay local to
//! the connection. The worker drops the stream afterwards regardless of the
//! outcome, so a handler never has to close anything itself.

use std::io::{self, Read, Write};
use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{MAX_HEAD_BYTES, RECV_TIMEOUT};
use crate::http;
use crate::protocol;
use crate::stats::ServerStats;

pub trait ConnectionHandler: Send + Sync {
    /// Service one connection. An `Err` means the connection got no (or a
    /// partial) response; it must not affect any other connection.
    fn handle(&self, stream: &mut TcpStream) -> io::Result<()>;
}

/// Binary squaring protocol: read a 4-byte big-endian `i32`, reply with its
/// square and a microsecond timestamp. A short request is a protocol error
/// and gets no response.
pub struct SquareHandler {
    pub simulate_load: bool,
}

impl SquareHandler {
    pub fn new(simulate_load: bool) -> Self {
        Self { simulate_load }
    }

    /// Burn some CPU and sleep 10-100 ms, approximating a real backend.
    fn simulated_load(&self) {
        let mut x = 0.0f64;
        for i in 0..100_000u32 {
            x += f64::from(i).sqrt();
        }
        std::hint::black_box(x);
        let jitter_ms = u64::from(protocol::timestamp_us() as u32 % 90) + 10;
        std::thread::sleep(Duration::from_millis(jitter_ms));
    }
}

impl ConnectionHandler for SquareHandler {
    fn handle(&self, stream: &mut TcpStream) -> io::Result<()> {
        stream.set_read_timeout(Some(RECV_TIMEOUT))?;

        let mut request = [0u8; protocol::REQUEST_LEN];
        stream.read_exact(&mut request)?;
        let number = protocol::decode_request(request);

        if self.simulate_load {
            self.simulated_load();
        }

        let response = protocol::encode_response(protocol::square(number), protocol::timestamp_us());
        stream.write_all(&response)?;
        Ok(())
    }
}

/// Line-based text protocol: parse the request line, route it, write one
/// CRLF-framed response, close.
pub struct HttpHandler {
    stats: Arc<ServerStats>,
}

impl HttpHandler {
    pub fn new(stats: Arc<ServerStats>) -> Self {
        Self { stats }
    }
}

/// Read until the first CRLFCRLF or end-of-stream, capped at
/// `MAX_HEAD_BYTES`. Headers past the request line are read but unused.
fn read_request_head(stream: &mut TcpStream) -> io::Result<String> {
    let mut head = Vec::with_capacity(512);
    let mut chunk = [0u8; 512];
    loop {
        let n = stream.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        head.extend_from_slice(&chunk[..n]);
        if head.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
        if head.len() >= MAX_HEAD_BYTES {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "request head too large",
            ));
        }
    }
    String::from_utf8(head).map_err(|_| {
        io::Error::new(io::ErrorKind::InvalidData, "request head is not UTF-8")
    })
}

impl ConnectionHandler for HttpHandler {
    fn handle(&self, stream: &mut TcpStream) -> io::Result<()> {
        stream.set_read_timeout(Some(RECV_TIMEOUT))?;

        let head = read_request_head(stream)?;
        let request = http::parse_request(&head).ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidData, "malformed request line")
        })?;
        let response = http::route(&request, &self.stats);
        stream.write_all(&response.to_bytes())?;
        Ok(())
    }
}

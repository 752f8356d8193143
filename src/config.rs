//! Server sizing and operational configuration.

use std::time::Duration;

/// Default port for the binary squaring protocol.
pub const DEFAULT_PORT: u16 = 5051;

/// Worker threads draining the job queue.
pub const DEFAULT_WORKERS: usize = 8;

/// Job queue capacity; the acceptor blocks when this many connections wait.
pub const DEFAULT_QUEUE_CAPACITY: usize = 128;

/// Listen backlog handed to the kernel.
pub const DEFAULT_BACKLOG: i32 = 50;

/// Per-connection receive timeout. A connection that sends nothing for this
/// long is closed without a response; the timeout never reaches the queue.
pub const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Upper bound on the request head read by the text-protocol handler.
pub const MAX_HEAD_BYTES: usize = 4096;

// Compile-time sanity checks
const _: () = assert!(DEFAULT_QUEUE_CAPACITY > 0, "queue capacity must be non-zero");
const _: () = assert!(DEFAULT_WORKERS > 0, "need at least one worker");
const _: () = assert!(DEFAULT_BACKLOG > 0, "backlog must be positive");

/// Everything the server needs to bind and size itself. Port 0 binds an
/// ephemeral port (used by the integration tests).
#[derive(Clone, Copy, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub workers: usize,
    pub queue_capacity: usize,
    pub backlog: i32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            workers: DEFAULT_WORKERS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            backlog: DEFAULT_BACKLOG,
        }
    }
}

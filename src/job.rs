//! Ownership token for one accepted connection.

use std::net::{SocketAddr, TcpStream};

/// One accepted connection as it moves from the acceptor through the queue
/// to a worker. Move-only: whoever holds the `Job` owns the socket, and
/// dropping it closes the descriptor exactly once.
#[derive(Debug)]
pub struct Job {
    pub stream: TcpStream,
    pub peer: SocketAddr,
}

impl Job {
    pub fn new(stream: TcpStream, peer: SocketAddr) -> Self {
        Self { stream, peer }
    }
}

//! Listener ownership and connection admission.

use std::io;
use std::net::TcpListener;
use std::sync::Arc;

use socket2::{Domain, Protocol, Socket, Type};

use crate::job::Job;
use crate::queue::{BoundedQueue, QueueClosed};
use crate::shutdown::ShutdownToken;
use crate::stats::ServerStats;

/// Build the listening socket. Port 0 asks the kernel for an ephemeral port.
pub fn create_listener(port: u16, backlog: i32) -> io::Result<TcpListener> {
    let socket = Socket::new(Domain::IPV4, Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;

    let addr = std::net::SocketAddrV4::new(std::net::Ipv4Addr::UNSPECIFIED, port);
    socket.bind(&addr.into())?;
    socket.listen(backlog)?;
    Ok(socket.into())
}

/// Single accept loop feeding the job queue.
pub struct Acceptor {
    pub listener: TcpListener,
    pub queue: Arc<BoundedQueue<Job>>,
    pub token: ShutdownToken,
    pub stats: Arc<ServerStats>,
}

impl Acceptor {
    /// Accept until shutdown. Interrupted accepts retry silently; any other
    /// accept error is logged and the loop continues, so one failed accept
    /// never takes the server down. The listener is closed before this
    /// returns, ahead of the queue being closed by the caller.
    pub fn run(self) {
        loop {
            match self.listener.accept() {
                Ok((stream, peer)) => {
                    if self.token.is_stopping() {
                        // connection raced the shutdown; nobody will serve it
                        drop(stream);
                        break;
                    }
                    self.stats.inc_accepted();
                    match self.queue.push(Job::new(stream, peer)) {
                        Ok(()) => {}
                        Err(QueueClosed(job)) => {
                            drop(job);
                            break;
                        }
                    }
                }
                Err(_) if self.token.is_stopping() => break,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    eprintln!("acceptor: accept failed: {e}");
                    continue;
                }
            }
        }
        self.token.clear_listener();
        // listener drops here, closing the descriptor
    }
}

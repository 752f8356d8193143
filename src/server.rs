//! Wires the acceptor, queue, and worker pool together and owns the
//! shutdown sequence.

use std::io;
use std::net::SocketAddr;
use std::os::unix::io::AsRawFd;
use std::sync::Arc;

use crate::acceptor::{Acceptor, create_listener};
use crate::config::ServerConfig;
use crate::handler::ConnectionHandler;
use crate::job::Job;
use crate::queue::BoundedQueue;
use crate::shutdown::ShutdownToken;
use crate::stats::ServerStats;
use crate::worker::WorkerPool;

/// A bound server with its workers already running. `run` consumes the
/// server and returns once shutdown has fully completed.
pub struct Server {
    acceptor: Acceptor,
    pool: WorkerPool,
    queue: Arc<BoundedQueue<Job>>,
    token: ShutdownToken,
    local_addr: SocketAddr,
}

impl Server {
    /// Bind the listener and spawn the worker pool. A bind/listen or spawn
    /// failure is fatal; there is nothing to roll back at this point.
    pub fn bind(
        config: ServerConfig,
        handler: Arc<dyn ConnectionHandler>,
        stats: Arc<ServerStats>,
    ) -> io::Result<Self> {
        let listener = create_listener(config.port, config.backlog)?;
        let local_addr = listener.local_addr()?;

        let token = ShutdownToken::new();
        token.register_listener(listener.as_raw_fd());

        let queue = Arc::new(BoundedQueue::new(config.queue_capacity));
        let pool = WorkerPool::spawn(
            config.workers,
            Arc::clone(&queue),
            handler,
            Arc::clone(&stats),
        )?;

        Ok(Self {
            acceptor: Acceptor {
                listener,
                queue: Arc::clone(&queue),
                token: token.clone(),
                stats,
            },
            pool,
            queue,
            token,
            local_addr,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Handle that can request shutdown from any thread (signal thread,
    /// test harness, admin endpoint).
    pub fn shutdown_token(&self) -> ShutdownToken {
        self.token.clone()
    }

    /// Run the accept loop on the calling thread until shutdown, then close
    /// the queue, drain it through the workers, and join them. Order is
    /// fixed: listener closes before the queue, the queue closes before the
    /// join, and queue storage outlives every worker via the `Arc`.
    pub fn run(self) -> io::Result<()> {
        self.acceptor.run();
        self.token.trigger();
        self.queue.close();
        self.pool.join();
        Ok(())
    }
}

//! Fixed-size pool of worker threads draining the job queue.

use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::handler::ConnectionHandler;
use crate::job::Job;
use crate::queue::BoundedQueue;
use crate::stats::ServerStats;

/// `W` long-lived threads, each looping pop -> handle -> close. Workers
/// never talk to each other; the queue is the only coordination point.
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    pub fn spawn(
        workers: usize,
        queue: Arc<BoundedQueue<Job>>,
        handler: Arc<dyn ConnectionHandler>,
        stats: Arc<ServerStats>,
    ) -> io::Result<Self> {
        assert!(workers > 0, "need at least one worker");
        let mut handles = Vec::with_capacity(workers);
        for id in 0..workers {
            let queue = Arc::clone(&queue);
            let handler = Arc::clone(&handler);
            let stats = Arc::clone(&stats);
            let handle = thread::Builder::new()
                .name(format!("worker-{id}"))
                .spawn(move || worker_loop(id, &queue, &*handler, &stats))?;
            handles.push(handle);
        }
        Ok(Self { handles })
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Wait for every worker to observe the queue's terminal sentinel.
    pub fn join(self) {
        for handle in self.handles {
            if handle.join().is_err() {
                eprintln!("worker thread panicked outside the handler boundary");
            }
        }
    }
}

fn worker_loop(
    id: usize,
    queue: &BoundedQueue<Job>,
    handler: &dyn ConnectionHandler,
    stats: &ServerStats,
) {
    // `None` is the only exit condition: queue empty and closed.
    while let Some(mut job) = queue.pop() {
        let peer = job.peer;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| handler.handle(&mut job.stream)));
        match outcome {
            Ok(Ok(())) => stats.inc_handled(),
            Ok(Err(_)) => {
                // connection-local failure: closed without a reply
                stats.inc_handler_errors();
            }
            Err(_) => {
                stats.inc_handler_errors();
                eprintln!("worker-{id}: handler panicked serving {peer}");
            }
        }
        // job drops here, closing the connection exactly once
    }
}

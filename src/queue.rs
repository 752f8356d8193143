//! Bounded FIFO handoff between the acceptor and the worker pool.
//!
//! One mutex guards the deque plus the `closed` flag; two condvars carry the
//! "became non-full" and "became non-empty or closed" transitions. `close`
//! broadcasts on both so no thread stays parked across shutdown.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

/// Error returned when pushing into a closed queue. Carries the rejected
/// item back so the caller keeps ownership and can release it (for a
/// connection: drop it, closing the socket).
#[derive(Debug)]
pub struct QueueClosed<T>(pub T);

struct Inner<T> {
    items: VecDeque<T>,
    closed: bool,
}

/// Fixed-capacity thread-safe FIFO with a one-shot close.
///
/// `push` blocks while full, `pop` blocks while empty; both wake as soon as
/// the queue is closed. After close, already-queued items remain poppable
/// (at-least-once delivery of admitted work); once drained, every `pop`
/// returns `None` forever. `None` is the single authoritative exit signal
/// for a worker, distinct from a transient empty queue.
pub struct BoundedQueue<T> {
    inner: Mutex<Inner<T>>,
    capacity: usize,
    not_full: Condvar,
    not_empty: Condvar,
}

impl<T> BoundedQueue<T> {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "queue capacity must be non-zero");
        Self {
            inner: Mutex::new(Inner {
                items: VecDeque::with_capacity(capacity),
                closed: false,
            }),
            capacity,
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Insert at the tail, blocking while the queue is full.
    ///
    /// Returns `Err(QueueClosed(item))` if the queue is closed before space
    /// frees up; the item is handed back untouched.
    pub fn push(&self, item: T) -> Result<(), QueueClosed<T>> {
        let mut inner = self.inner.lock().unwrap();
        while inner.items.len() == self.capacity && !inner.closed {
            inner = self.not_full.wait(inner).unwrap();
        }
        if inner.closed {
            return Err(QueueClosed(item));
        }
        inner.items.push_back(item);
        drop(inner);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Remove from the head, blocking while the queue is empty and open.
    ///
    /// Returns `None` only when the queue is both empty and closed.
    pub fn pop(&self) -> Option<T> {
        let mut inner = self.inner.lock().unwrap();
        while inner.items.is_empty() && !inner.closed {
            inner = self.not_empty.wait(inner).unwrap();
        }
        match inner.items.pop_front() {
            Some(item) => {
                drop(inner);
                self.not_full.notify_one();
                Some(item)
            }
            // empty and closed: terminal
            None => None,
        }
    }

    /// Close the queue, waking every thread blocked in `push` or `pop`.
    /// Idempotent. Queued items stay retrievable until drained.
    pub fn close(&self) {
        let mut inner = self.inner.lock().unwrap();
        if inner.closed {
            return;
        }
        inner.closed = true;
        drop(inner);
        self.not_full.notify_all();
        self.not_empty.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.inner.lock().unwrap().closed
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

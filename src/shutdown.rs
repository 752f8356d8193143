//! Explicit cancellation token for the accept loop.
//!
//! Triggering the token flips the one-way `running -> stopping` flag and
//! shuts down the listening socket so a blocked `accept` returns at once.
//! All remaining shutdown work (closing the queue, joining workers) happens
//! on ordinary threads, never in signal context.

use std::os::unix::io::RawFd;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

struct TokenInner {
    stopping: AtomicBool,
    // Mutex, not an atomic: trigger must hold the descriptor across its
    // shutdown(2) call so the acceptor cannot clear and drop the listener
    // in between, leaving the syscall aimed at a closed or recycled fd.
    listen_fd: Mutex<Option<RawFd>>,
}

#[derive(Clone)]
pub struct ShutdownToken {
    inner: Arc<TokenInner>,
}

impl ShutdownToken {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(TokenInner {
                stopping: AtomicBool::new(false),
                listen_fd: Mutex::new(None),
            }),
        }
    }

    pub(crate) fn register_listener(&self, fd: RawFd) {
        *self.inner.listen_fd.lock().unwrap() = Some(fd);
    }

    /// Must be called before the listener is dropped. Takes the same lock
    /// as `trigger`'s syscall, so once this returns no trigger can touch
    /// the descriptor again.
    pub(crate) fn clear_listener(&self) {
        *self.inner.listen_fd.lock().unwrap() = None;
    }

    /// Request shutdown. First call wins; later calls are no-ops.
    ///
    /// `shutdown(2)` rather than `close(2)` on the listening socket: the
    /// acceptor still owns the descriptor and will close it when it drops
    /// the listener, keeping every fd closed exactly once.
    pub fn trigger(&self) {
        if self.inner.stopping.swap(true, Ordering::SeqCst) {
            return;
        }
        let fd = self.inner.listen_fd.lock().unwrap();
        if let Some(fd) = *fd {
            unsafe {
                libc::shutdown(fd, libc::SHUT_RD);
            }
        }
    }

    pub fn is_stopping(&self) -> bool {
        self.inner.stopping.load(Ordering::SeqCst)
    }
}

impl Default for ShutdownToken {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{TcpListener, TcpStream};
    use std::os::unix::io::AsRawFd;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn trigger_is_one_way_and_idempotent() {
        let token = ShutdownToken::new();
        assert!(!token.is_stopping());
        token.trigger();
        assert!(token.is_stopping());
        token.trigger();
        assert!(token.is_stopping());
    }

    #[test]
    fn clones_share_state() {
        let token = ShutdownToken::new();
        let clone = token.clone();
        token.trigger();
        assert!(clone.is_stopping());
    }

    #[test]
    fn trigger_unblocks_a_parked_accept() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let token = ShutdownToken::new();
        token.register_listener(listener.as_raw_fd());

        let acceptor = thread::spawn(move || listener.accept());
        thread::sleep(Duration::from_millis(50));
        token.trigger();
        assert!(acceptor.join().unwrap().is_err());
    }

    #[test]
    fn trigger_after_clear_leaves_descriptor_alone() {
        // The acceptor clears the registration before dropping the listener;
        // a trigger landing after that must not touch the descriptor, which
        // by then may be closed or recycled by an unrelated socket.
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let token = ShutdownToken::new();
        token.register_listener(listener.as_raw_fd());
        token.clear_listener();
        token.trigger();

        // the listener still accepts: trigger made no syscall on its fd
        let addr = listener.local_addr().unwrap();
        let client = TcpStream::connect(addr).unwrap();
        let (_conn, _) = listener.accept().unwrap();
        drop(client);
    }
}

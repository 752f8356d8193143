//! Library crate for conveyor: a bounded-queue, fixed-worker-pool TCP
//! server with graceful shutdown.
//!
//! The **binary** (`main.rs`) wires signal handling and CLI flags around
//! [`server::Server`]; everything else is plain library code so the queue,
//! pool, and handlers are testable without a live process.

pub mod acceptor;
pub mod config;
pub mod handler;
pub mod http;
pub mod job;
pub mod protocol;
pub mod queue;
pub mod server;
pub mod shutdown;
pub mod stats;
pub mod worker;

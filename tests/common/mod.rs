#![allow(dead_code)]

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::thread;

use conveyor::config::ServerConfig;
use conveyor::handler::ConnectionHandler;
use conveyor::server::Server;
use conveyor::shutdown::ShutdownToken;
use conveyor::stats::ServerStats;

pub struct RunningServer {
    pub addr: SocketAddr,
    pub token: ShutdownToken,
    handle: thread::JoinHandle<io::Result<()>>,
}

impl RunningServer {
    /// Trigger shutdown and wait for the full protocol to finish.
    pub fn stop(self) {
        self.token.trigger();
        self.handle
            .join()
            .expect("server thread panicked")
            .expect("server returned an error");
    }
}

/// Bind an ephemeral port, spawn the accept loop on its own thread, and
/// hand back the pieces a test needs.
pub fn start(handler: Arc<dyn ConnectionHandler>, stats: Arc<ServerStats>) -> RunningServer {
    let config = ServerConfig {
        port: 0,
        workers: 4,
        queue_capacity: 16,
        ..ServerConfig::default()
    };
    let server = Server::bind(config, handler, stats).expect("failed to bind test server");
    // the listener binds 0.0.0.0; connect via loopback
    let addr = SocketAddr::from(([127, 0, 0, 1], server.local_addr().port()));
    let token = server.shutdown_token();
    let handle = thread::Builder::new()
        .name("test-server".into())
        .spawn(move || server.run())
        .expect("failed to spawn server thread");
    RunningServer { addr, token, handle }
}

use std::sync::Arc;

use clap::{Parser, ValueEnum};

use conveyor::config::{DEFAULT_BACKLOG, DEFAULT_PORT, DEFAULT_QUEUE_CAPACITY, DEFAULT_WORKERS, ServerConfig};
use conveyor::handler::{ConnectionHandler, HttpHandler, SquareHandler};
use conveyor::server::Server;
use conveyor::stats::{self, ServerStats};

#[derive(Clone, Copy, ValueEnum)]
enum Proto {
    /// 4-byte big-endian integer in, square + timestamp out
    Square,
    /// Line-based text protocol with /, /hello, /time, /stats routes
    Http,
}

#[derive(Parser)]
#[command(about = "Bounded-queue worker-pool TCP server")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Worker threads
    #[arg(short, long, default_value_t = DEFAULT_WORKERS)]
    workers: usize,

    /// Job queue capacity (acceptor blocks when full)
    #[arg(short = 'q', long, default_value_t = DEFAULT_QUEUE_CAPACITY)]
    queue_capacity: usize,

    /// Listen backlog
    #[arg(long, default_value_t = DEFAULT_BACKLOG)]
    backlog: i32,

    /// Connection handler to run
    #[arg(long, value_enum, default_value_t = Proto::Square)]
    proto: Proto,

    /// Simulate backend load (square handler only)
    #[arg(long)]
    simulate_load: bool,
}

fn main() {
    let args = Args::parse();

    let stats = ServerStats::new();
    let handler: Arc<dyn ConnectionHandler> = match args.proto {
        Proto::Square => Arc::new(SquareHandler::new(args.simulate_load)),
        Proto::Http => Arc::new(HttpHandler::new(Arc::clone(&stats))),
    };

    let config = ServerConfig {
        port: args.port,
        workers: args.workers,
        queue_capacity: args.queue_capacity,
        backlog: args.backlog,
    };

    let server = Server::bind(config, handler, Arc::clone(&stats)).expect("failed to bind server");
    let token = server.shutdown_token();

    ctrlc::set_handler(move || {
        if token.is_stopping() {
            eprintln!("second signal, forcing exit");
            std::process::exit(1);
        }
        eprintln!("shutdown requested, draining queued connections");
        token.trigger();
    })
    .expect("failed to install signal handler");

    stats::spawn_reporter(Arc::clone(&stats));

    eprintln!(
        "conveyor: listening on {} ({} workers, queue capacity {})",
        server.local_addr(),
        args.workers,
        args.queue_capacity
    );

    server.run().expect("server failed");
    eprintln!("conveyor: stopped cleanly");
}

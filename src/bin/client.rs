use std::io::{Read, Write};
use std::net::TcpStream;
use std::thread;
use std::time::Instant;

use clap::{Parser, Subcommand};

use conveyor::protocol;

#[derive(Parser)]
#[command(about = "Test client for the conveyor server")]
struct Args {
    /// Server port
    #[arg(short, long, default_value_t = conveyor::config::DEFAULT_PORT)]
    port: u16,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Send one number over the binary protocol and print the reply (default)
    Square {
        #[arg(default_value_t = 7)]
        number: i32,
    },
    /// Send one text-protocol request and print the raw response
    Http {
        #[arg(default_value = "/hello")]
        path: String,
    },
    /// Hammer the binary protocol from concurrent connections
    Bench {
        /// Number of concurrent connections
        #[arg(short, long, default_value_t = 4)]
        connections: usize,
        /// Requests per connection
        #[arg(short, long, default_value_t = 1000)]
        requests: usize,
    },
}

fn square_once(addr: &str, number: i32) -> (i32, u64) {
    let mut stream = TcpStream::connect(addr).expect("failed to connect");
    stream
        .write_all(&number.to_be_bytes())
        .expect("failed to send request");

    let mut response = [0u8; protocol::RESPONSE_LEN];
    stream
        .read_exact(&mut response)
        .expect("failed to read response");

    let square = i32::from_be_bytes(response[..4].try_into().unwrap());
    let ts = u64::from_be_bytes(response[4..].try_into().unwrap());
    (square, ts)
}

fn square_cmd(addr: &str, number: i32) {
    let start = Instant::now();
    let (square, ts) = square_once(addr, number);
    println!(
        "{number}^2 = {square} (server ts {ts} us, round-trip {:?})",
        start.elapsed()
    );
}

fn http_cmd(addr: &str, path: &str) {
    let mut stream = TcpStream::connect(addr).expect("failed to connect");
    let request = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\n\r\n");
    stream
        .write_all(request.as_bytes())
        .expect("failed to send request");

    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .expect("failed to read response");
    print!("{response}");
}

fn bench_cmd(addr: &str, connections: usize, requests: usize) {
    let start = Instant::now();
    let handles: Vec<_> = (0..connections)
        .map(|c| {
            let addr = addr.to_string();
            thread::spawn(move || {
                for i in 0..requests {
                    let n = (c * requests + i) as i32 % 46_000;
                    let (square, _) = square_once(&addr, n);
                    assert_eq!(square, n * n, "bad square for {n}");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("bench connection failed");
    }

    let total = connections * requests;
    let elapsed = start.elapsed();
    println!(
        "{total} requests over {connections} connections in {elapsed:?} ({:.0} req/s)",
        total as f64 / elapsed.as_secs_f64()
    );
}

fn main() {
    let args = Args::parse();
    let addr = format!("127.0.0.1:{}", args.port);

    match args.command.unwrap_or(Command::Square { number: 7 }) {
        Command::Square { number } => square_cmd(&addr, number),
        Command::Http { path } => http_cmd(&addr, &path),
        Command::Bench {
            connections,
            requests,
        } => bench_cmd(&addr, connections, requests),
    }
}

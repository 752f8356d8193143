//! End-to-end tests for the binary squaring protocol over real sockets.

mod common;

use std::io::{Read, Write};
use std::net::{Shutdown, TcpStream};
use std::sync::Arc;
use std::thread;

use conveyor::handler::SquareHandler;
use conveyor::protocol;
use conveyor::stats::ServerStats;

fn request_square(addr: std::net::SocketAddr, number: i32) -> (i32, u64) {
    let mut stream = TcpStream::connect(addr).expect("connect failed");
    stream.write_all(&number.to_be_bytes()).expect("send failed");
    let mut response = [0u8; protocol::RESPONSE_LEN];
    stream.read_exact(&mut response).expect("read failed");
    (
        i32::from_be_bytes(response[..4].try_into().unwrap()),
        u64::from_be_bytes(response[4..].try_into().unwrap()),
    )
}

#[test]
fn squares_seven_with_positive_timestamp() {
    let stats = ServerStats::new();
    let server = common::start(Arc::new(SquareHandler::new(false)), Arc::clone(&stats));

    let (square, ts) = request_square(server.addr, 7);
    assert_eq!(square, 49);
    assert!(ts > 0);

    server.stop();
    let snap = stats.snapshot();
    assert_eq!(snap.accepted, 1);
    assert_eq!(snap.handled, 1);
}

#[test]
fn squares_negative_numbers() {
    let stats = ServerStats::new();
    let server = common::start(Arc::new(SquareHandler::new(false)), stats);

    let (square, _) = request_square(server.addr, -12);
    assert_eq!(square, 144);

    server.stop();
}

#[test]
fn short_request_gets_no_response() {
    let stats = ServerStats::new();
    let server = common::start(Arc::new(SquareHandler::new(false)), Arc::clone(&stats));

    let mut stream = TcpStream::connect(server.addr).expect("connect failed");
    stream.write_all(&[0, 7]).expect("send failed");
    stream.shutdown(Shutdown::Write).expect("shutdown failed");

    // protocol error: the server closes without replying
    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).expect("read failed");
    assert!(buf.is_empty());

    server.stop();
    assert_eq!(stats.snapshot().handler_errors, 1);
}

#[test]
fn serves_concurrent_connections() {
    let stats = ServerStats::new();
    let server = common::start(Arc::new(SquareHandler::new(false)), Arc::clone(&stats));
    let addr = server.addr;

    let handles: Vec<_> = (0..8)
        .map(|n| {
            thread::spawn(move || {
                for i in 0..20 {
                    let value = n * 100 + i;
                    let (square, _) = request_square(addr, value);
                    assert_eq!(square, value * value);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    server.stop();
    let snap = stats.snapshot();
    assert_eq!(snap.accepted, 160);
    assert_eq!(snap.handled, 160);
}

#[test]
fn shutdown_completes_and_stops_accepting() {
    let stats = ServerStats::new();
    let server = common::start(Arc::new(SquareHandler::new(false)), stats);
    let addr = server.addr;

    let (square, _) = request_square(addr, 9);
    assert_eq!(square, 81);

    // stop() returns only after workers have joined; a connection made
    // afterwards must never be served
    server.stop();
    match TcpStream::connect(addr) {
        Ok(mut stream) => {
            let _ = stream.write_all(&7i32.to_be_bytes());
            let mut buf = Vec::new();
            let n = stream.read_to_end(&mut buf).unwrap_or(0);
            assert_eq!(n, 0, "served a connection after shutdown");
        }
        Err(_) => {} // refused: listener is gone
    }
}

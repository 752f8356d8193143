//! Binary squaring protocol: 4-byte big-endian `i32` in, 12 bytes out
//! (big-endian `i32` square, then big-endian `u64` microsecond timestamp).
//!
//! A request of any other length is a protocol error; the connection is
//! closed without a response. Framing is enforced by the handler with
//! `read_exact`, so this module only deals in fixed-size arrays.

use std::time::{SystemTime, UNIX_EPOCH};

pub const REQUEST_LEN: usize = 4;
pub const RESPONSE_LEN: usize = 12;

pub fn decode_request(buf: [u8; REQUEST_LEN]) -> i32 {
    i32::from_be_bytes(buf)
}

/// Square with wrapping semantics so a hostile operand cannot abort a worker.
pub fn square(n: i32) -> i32 {
    n.wrapping_mul(n)
}

pub fn encode_response(result: i32, timestamp_us: u64) -> [u8; RESPONSE_LEN] {
    let mut buf = [0u8; RESPONSE_LEN];
    buf[..4].copy_from_slice(&result.to_be_bytes());
    buf[4..].copy_from_slice(&timestamp_us.to_be_bytes());
    buf
}

/// Microseconds since the Unix epoch. Always > 0 on a sane clock.
pub fn timestamp_us() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_big_endian() {
        assert_eq!(decode_request([0, 0, 0, 7]), 7);
        assert_eq!(decode_request([0xff, 0xff, 0xff, 0xff]), -1);
        assert_eq!(decode_request([0, 0, 0x01, 0x00]), 256);
    }

    #[test]
    fn square_handles_negative_and_overflow() {
        assert_eq!(square(7), 49);
        assert_eq!(square(-9), 81);
        // i32::MAX^2 wraps instead of aborting
        let _ = square(i32::MAX);
    }

    #[test]
    fn response_layout() {
        let buf = encode_response(49, 1_000_000);
        assert_eq!(&buf[..4], &49i32.to_be_bytes());
        assert_eq!(&buf[4..], &1_000_000u64.to_be_bytes());
    }

    #[test]
    fn timestamp_is_positive() {
        assert!(timestamp_us() > 0);
    }
}

//! Minimal SNTP (RFC 4330) client used by [`crate::clock::SystemClock`].

use chrono::{DateTime, Utc};
use std::io;
use std::net::UdpSocket;
use std::time::Duration;
use thiserror::Error;

const NTP_PORT: u16 = 123;
const PACKET_LEN: usize = 48;
/// Seconds between 1900-01-01 (NTP era 0) and 1970-01-01.
const NTP_UNIX_OFFSET: u64 = 2_208_988_800;
const REPLY_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Error, Debug)]
pub enum NtpError {
    #[error("NTP socket: {0}")]
    Io(#[from] io::Error),

    #[error("short NTP reply ({0} bytes)")]
    ShortReply(usize),

    #[error("NTP reply carries no usable timestamp")]
    InvalidTimestamp,
}

/// Ask `server` for the current time.
pub fn query(server: &str) -> Result<DateTime<Utc>, NtpError> {
    let socket = UdpSocket::bind(("0.0.0.0", 0))?;
    socket.set_read_timeout(Some(REPLY_TIMEOUT))?;
    socket.set_write_timeout(Some(REPLY_TIMEOUT))?;
    socket.connect((server, NTP_PORT))?;

    socket.send(&request_packet())?;

    let mut reply = [0u8; PACKET_LEN];
    let len = socket.recv(&mut reply)?;
    if len < PACKET_LEN {
        return Err(NtpError::ShortReply(len));
    }
    decode_transmit_time(&reply)
}

/// Client request: LI = 0, version 3, mode 3 (client).
fn request_packet() -> [u8; PACKET_LEN] {
    let mut packet = [0u8; PACKET_LEN];
    packet[0] = 0x1B;
    packet
}

/// Extract the server transmit timestamp (bytes 40..48).
fn decode_transmit_time(reply: &[u8; PACKET_LEN]) -> Result<DateTime<Utc>, NtpError> {
    let seconds = u32::from_be_bytes([reply[40], reply[41], reply[42], reply[43]]) as u64;
    let fraction = u32::from_be_bytes([reply[44], reply[45], reply[46], reply[47]]) as u64;

    let unix_seconds = seconds
        .checked_sub(NTP_UNIX_OFFSET)
        .ok_or(NtpError::InvalidTimestamp)?;
    let nanos = ((fraction * 1_000_000_000) >> 32) as u32;

    DateTime::from_timestamp(unix_seconds as i64, nanos).ok_or(NtpError::InvalidTimestamp)
}

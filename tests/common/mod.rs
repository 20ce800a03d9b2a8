// tests/common/mod.rs
//
// Throwaway HTTP/1.1 server on 127.0.0.1 (std-only). Answers a fixed list of
// responses, one connection each, and hands back what it was sent.
//
#![allow(dead_code)]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};

pub const FIXTURE: &str = include_str!("../fixtures/broadband_stats.html");

/// Line the fixture produces with default tags and timing off.
pub const FIXTURE_LINE: &str = "net,host=router,region=home \
    tx_bytes=1893415223i,tx_pkts=4187902i,tx_err=12i,tx_err_pct=0.01,\
    rx_bytes=27446190852i,rx_pkts=19604331i,rx_err=0i,rx_err_pct=0";

#[derive(Debug, Clone)]
pub struct Captured {
    pub request_line: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Captured {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

fn read_request(stream: &TcpStream) -> Captured {
    let mut reader = BufReader::new(stream.try_clone().unwrap());

    let mut request_line = String::new();
    reader.read_line(&mut request_line).unwrap();

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        let line = line.trim_end();
        if line.is_empty() { break; }
        if let Some((k, v)) = line.split_once(':') {
            headers.push((k.trim().to_string(), v.trim().to_string()));
        }
    }

    let len: usize = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse().ok())
        .unwrap_or(0);
    let mut body = vec![0u8; len];
    reader.read_exact(&mut body).unwrap();

    Captured {
        request_line: request_line.trim_end().to_string(),
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    }
}

/// Status that makes the server read the request and hang up without answering.
pub const HANG_UP: u16 = 0;

/// Serve `responses` in order, one per connection. Returns `host:port`
/// and a handle yielding the captured requests.
pub fn serve(responses: Vec<(u16, String)>) -> (String, JoinHandle<Vec<Captured>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for (status, body) in responses {
            let (mut stream, _) = listener.accept().unwrap();
            seen.push(read_request(&stream));
            if status == HANG_UP {
                drop(stream);
                continue;
            }

            let mut resp = format!("HTTP/1.1 {} {}\r\nConnection: close\r\n", status, reason(status));
            if status != 204 {
                resp.push_str(&format!(
                    "Content-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\n",
                    body.len()
                ));
            }
            resp.push_str("\r\n");
            resp.push_str(&body);
            stream.write_all(resp.as_bytes()).unwrap();
            stream.flush().unwrap();
        }
        seen
    });
    (addr, handle)
}

/// A bound port that never answers. `connections()` reports how many
/// clients knocked.
pub struct Silent {
    listener: TcpListener,
    pub addr: String,
}

impl Silent {
    pub fn bind() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        Self { listener, addr }
    }

    pub fn connections(&self) -> usize {
        let mut n = 0;
        while self.listener.accept().is_ok() { n += 1; }
        n
    }
}

/// A port nothing listens on: connections are refused.
pub fn refused_addr() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().to_string()
}

/// Keeps every line in memory.
#[derive(Default)]
pub struct MemorySink {
    pub lines: Vec<String>,
}

impl router_bw::influx::Sink for MemorySink {
    fn write(&mut self, line: &str) -> Result<(), router_bw::ScrapeError> {
        self.lines.push(line.to_string());
        Ok(())
    }
}

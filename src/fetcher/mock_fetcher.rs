use std::cell::RefCell;
use std::io::{self, Cursor, Read};
use std::time::Duration;

use super::{Fetcher, Response};

pub struct MockFetcher {
    responses: RefCell<Vec<Response>>,
    requests: RefCell<Vec<(String, Duration)>>,
}

impl Fetcher for MockFetcher {
    fn fetch(&self, url: &str, timeout: Duration) -> Response {
        self.requests.borrow_mut().push((url.to_string(), timeout));

        let mut responses = self.responses.borrow_mut();

        if responses.is_empty() {
            Response::network_error("no scripted response left")
        } else {
            responses.remove(0)
        }
    }
}

impl MockFetcher {
    pub fn new(responses: Vec<Response>) -> Self {
        Self {
            responses: RefCell::new(responses),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests
            .borrow()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }

    pub fn timeouts(&self) -> Vec<Duration> {
        self.requests
            .borrow()
            .iter()
            .map(|(_, timeout)| *timeout)
            .collect()
    }
}

pub fn html(markup: &str) -> Response {
    Response::ok(
        Box::new(Cursor::new(markup.as_bytes().to_vec())),
        Some(String::from("text/html; charset=utf-8")),
    )
}

pub fn bytes(content: &[u8], mime: Option<&str>) -> Response {
    Response::ok(
        Box::new(Cursor::new(content.to_vec())),
        mime.map(str::to_string),
    )
}

/// Yields `content`, then fails like a connection dropped mid-transfer.
pub fn truncated(content: &[u8], mime: &str) -> Response {
    let body = Cursor::new(content.to_vec()).chain(BrokenBody);

    Response::ok(Box::new(body), Some(mime.to_string()))
}

struct BrokenBody;

impl Read for BrokenBody {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::TimedOut, "connection timed out"))
    }
}

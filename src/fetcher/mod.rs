mod ureq_fetcher;

use std::fmt;
use std::io::Read;
use std::time::Duration;

pub use ureq_fetcher::UReqFetcher;

#[cfg(test)]
mod mock_fetcher;

#[cfg(test)]
pub use mock_fetcher::{bytes, html, truncated, MockFetcher};

pub type Body = Box<dyn Read + Send + Sync + 'static>;

pub enum Response {
    Ok { mime: Option<String>, body: Body },
    Status(u16),
    NetworkError(String),
}

impl Response {
    pub fn ok(body: Body, mime: Option<String>) -> Self {
        Self::Ok { mime, body }
    }

    pub fn status(code: u16) -> Self {
        Self::Status(code)
    }

    pub fn network_error(reason: impl Into<String>) -> Self {
        Self::NetworkError(reason.into())
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok { mime, .. } => f.debug_struct("Ok").field("mime", mime).finish(),
            Self::Status(code) => f.debug_tuple("Status").field(code).finish(),
            Self::NetworkError(reason) => f.debug_tuple("NetworkError").field(reason).finish(),
        }
    }
}

/// Blocking HTTP GET. Anything outside 2xx must come back as `Response::Status`.
pub trait Fetcher {
    fn fetch(&self, url: &str, timeout: Duration) -> Response;
}

impl<T: Fetcher + ?Sized> Fetcher for &T {
    fn fetch(&self, url: &str, timeout: Duration) -> Response {
        (**self).fetch(url, timeout)
    }
}

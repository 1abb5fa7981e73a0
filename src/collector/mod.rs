mod extract;

use std::io::Read;
use std::thread;
use std::time::Duration;

use log::{debug, error, info};
use thiserror::Error;
use url::Url;

use crate::config::SearchConfig;
use crate::fetcher::{Fetcher, Response, UReqFetcher};

pub use extract::{upscale_url, HtmlImageExtractor, ImageSourceExtractor};

pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

impl<T: Sleeper + ?Sized> Sleeper for &T {
    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }
}

pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        thread::sleep(duration)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum CollectError {
    #[error("invalid search endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("search request returned HTTP {0}")]
    Status(u16),
    #[error("search request failed: {0}")]
    Network(String),
    #[error("could not read results page: {0}")]
    InvalidBody(String),
}

/// What one collection run produced.
#[derive(Debug, PartialEq)]
pub enum Collection {
    Complete(Vec<String>),
    /// A request failed; `urls` holds what earlier pages yielded.
    Partial {
        urls: Vec<String>,
        error: CollectError,
    },
    Empty,
}

impl Collection {
    pub fn urls(&self) -> &[String] {
        match self {
            Self::Complete(urls) | Self::Partial { urls, .. } => urls,
            Self::Empty => &[],
        }
    }

    pub fn into_urls(self) -> Vec<String> {
        match self {
            Self::Complete(urls) | Self::Partial { urls, .. } => urls,
            Self::Empty => Vec::new(),
        }
    }
}

pub struct Collector<F, S = ThreadSleeper, E = HtmlImageExtractor>
where
    F: Fetcher,
    S: Sleeper,
    E: ImageSourceExtractor,
{
    config: SearchConfig,
    fetcher: F,
    sleeper: S,
    extractor: E,
}

impl<F, S, E> Collector<F, S, E>
where
    F: Fetcher,
    S: Sleeper,
    E: ImageSourceExtractor,
{
    pub fn with_parts(config: SearchConfig, fetcher: F, sleeper: S, extractor: E) -> Self {
        Collector {
            config,
            fetcher,
            sleeper,
            extractor,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn collect(&self, keyword: &str) -> Collection {
        let target = self.config.target_count;
        let limit = target.saturating_add(self.config.overshoot);
        let mut urls: Vec<String> = Vec::new();
        let mut round: usize = 0;

        while urls.len() < target {
            let offset = match round
                .checked_mul(self.config.page_size)
                .and_then(|start| start.checked_add(1))
            {
                Some(offset) if offset <= limit => offset,
                _ => {
                    debug!("Round {} passed the target of {}, stopping", round, target);
                    break;
                }
            };

            if round > 0 {
                let delay = self.config.delay.pick(&mut rand::thread_rng());
                info!("Waiting {:.2}s before next request...", delay.as_secs_f64());
                self.sleeper.sleep(delay);
            }

            let page = match self.fetch_page(keyword, offset) {
                Ok(page) => page,
                Err(error) => {
                    error!("Request failed: {}", error);
                    return Collection::Partial { urls, error };
                }
            };

            let sources = self.extractor.extract(&page);

            if sources.is_empty() {
                info!("No more images found.");
                break;
            }

            let room = target - urls.len();
            urls.extend(sources.iter().take(room).map(|src| upscale_url(src)));

            round += 1;
        }

        if urls.is_empty() {
            Collection::Empty
        } else {
            Collection::Complete(urls)
        }
    }

    fn page_url(&self, keyword: &str, offset: usize) -> Result<Url, CollectError> {
        let first = offset.to_string();
        let count = self.config.page_size.to_string();

        Url::parse_with_params(
            &self.config.endpoint,
            &[
                ("q", keyword),
                ("first", first.as_str()),
                ("count", count.as_str()),
                ("mmasync", "1"),
            ],
        )
        .map_err(|e| CollectError::InvalidEndpoint(e.to_string()))
    }

    fn fetch_page(&self, keyword: &str, offset: usize) -> Result<String, CollectError> {
        let url = self.page_url(keyword, offset)?;

        info!("Fetching page: {}", url);

        match self.fetcher.fetch(url.as_str(), self.config.timeout) {
            Response::Ok { mut body, .. } => {
                let mut page = Vec::new();
                body.read_to_end(&mut page)
                    .map_err(|e| CollectError::InvalidBody(e.to_string()))?;
                Ok(String::from_utf8_lossy(&page).into_owned())
            }
            Response::Status(code) => Err(CollectError::Status(code)),
            Response::NetworkError(reason) => Err(CollectError::Network(reason)),
        }
    }
}

impl<F: Fetcher> Collector<F> {
    pub fn with_fetcher(config: SearchConfig, fetcher: F) -> Self {
        Collector::with_parts(config, fetcher, ThreadSleeper, HtmlImageExtractor::new())
    }
}

impl Collector<UReqFetcher> {
    pub fn new(config: SearchConfig) -> Self {
        Collector::with_fetcher(config, UReqFetcher::new())
    }
}

mod collector;
mod config;
mod downloader;
mod fetcher;

pub use collector::{
    upscale_url, CollectError, Collection, Collector, HtmlImageExtractor, ImageSourceExtractor,
    Sleeper, ThreadSleeper,
};
pub use config::{
    DelayRange, DownloadConfig, SearchConfig, DEFAULT_ENDPOINT, DEFAULT_OUTPUT_DIR,
    DEFAULT_USER_AGENT,
};
pub use downloader::{
    extension_for, file_name, target_dir, Download, DownloadError, DownloadReport, Downloader,
    Outcome, SkipReason,
};
pub use fetcher::{Body, Fetcher, Response, UReqFetcher};

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};
use thiserror::Error;
use url::Url;

use crate::config::DownloadConfig;
use crate::fetcher::{Fetcher, Response, UReqFetcher};

const DEFAULT_EXTENSION: &str = "jpg";

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("could not create {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error, PartialEq)]
pub enum SkipReason {
    #[error("invalid url")]
    InvalidUrl,
    #[error("HTTP {0}")]
    Status(u16),
    #[error("network error: {0}")]
    NetworkError(String),
    #[error("not an image ({0})")]
    NotAnImage(String),
    #[error("read failed: {0}")]
    Read(String),
    #[error("write failed: {0}")]
    Write(String),
}

#[derive(Debug, PartialEq)]
pub enum Outcome {
    Saved(PathBuf),
    Skipped(SkipReason),
}

#[derive(Debug, PartialEq)]
pub struct Download {
    pub index: usize,
    pub source: String,
    pub outcome: Outcome,
}

#[derive(Debug, Default)]
pub struct DownloadReport {
    pub folder: PathBuf,
    pub downloads: Vec<Download>,
}

impl DownloadReport {
    pub fn saved(&self) -> impl Iterator<Item = &Path> {
        self.downloads.iter().filter_map(|d| match &d.outcome {
            Outcome::Saved(path) => Some(path.as_path()),
            Outcome::Skipped(_) => None,
        })
    }

    pub fn saved_count(&self) -> usize {
        self.saved().count()
    }

    pub fn skipped_count(&self) -> usize {
        self.downloads.len() - self.saved_count()
    }
}

pub struct Downloader<T: Fetcher> {
    fetcher: T,
    config: DownloadConfig,
}

impl<T> Downloader<T>
where
    T: Fetcher,
{
    pub fn with_fetcher(config: DownloadConfig, fetcher: T) -> Self {
        Downloader { fetcher, config }
    }

    /// Fetches every url in order into `output_dir/<keyword>/image_NNN.<ext>`.
    /// Only a missing target directory is an error; a bad url is logged and skipped.
    pub fn download(&self, urls: &[String], keyword: &str) -> Result<DownloadReport, DownloadError> {
        let folder = target_dir(&self.config.output_dir, keyword);

        fs::create_dir_all(&folder).map_err(|source| DownloadError::CreateDir {
            path: folder.clone(),
            source,
        })?;

        let total = urls.len();
        let downloads = urls
            .iter()
            .enumerate()
            .map(|(i, url)| {
                let index = i + 1;
                info!("[{}/{}] {}", index, total, preview(url));

                let outcome = match self.fetch_one(&folder, index, url) {
                    Ok(path) => Outcome::Saved(path),
                    Err(reason) => {
                        warn!("Skipping {}: {}", url, reason);
                        Outcome::Skipped(reason)
                    }
                };

                Download {
                    index,
                    source: url.clone(),
                    outcome,
                }
            })
            .collect();

        let report = DownloadReport { folder, downloads };

        info!(
            "Downloaded {} of {} images to {:?}",
            report.saved_count(),
            total,
            report.folder
        );

        Ok(report)
    }

    fn fetch_one(&self, folder: &Path, index: usize, url: &str) -> Result<PathBuf, SkipReason> {
        let url = Url::parse(url).map_err(|_| SkipReason::InvalidUrl)?;

        let (mime, mut body) = match self.fetcher.fetch(url.as_str(), self.config.timeout) {
            Response::Ok { mime, body } => (mime.unwrap_or_default().to_lowercase(), body),
            Response::Status(code) => return Err(SkipReason::Status(code)),
            Response::NetworkError(reason) => return Err(SkipReason::NetworkError(reason)),
        };

        if !mime.contains("image") {
            return Err(SkipReason::NotAnImage(mime));
        }

        let path = folder.join(file_name(index, &extension_for(&mime)));

        let mut file = File::create(&path).map_err(|e| SkipReason::Write(e.to_string()))?;

        if let Err(reason) = stream_into(&mut body, &mut file) {
            drop(file);
            if let Err(e) = fs::remove_file(&path) {
                warn!("Could not remove partial file {:?}: {}", path, e);
            }
            return Err(reason);
        }

        Ok(path)
    }
}

fn stream_into(body: &mut impl Read, file: &mut impl Write) -> Result<(), SkipReason> {
    let mut buffer = [0u8; 8192];

    loop {
        let read = match body.read(&mut buffer) {
            Ok(0) => break,
            Ok(read) => read,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(SkipReason::Read(e.to_string())),
        };

        file.write_all(&buffer[..read])
            .map_err(|e| SkipReason::Write(e.to_string()))?;
    }

    file.flush().map_err(|e| SkipReason::Write(e.to_string()))
}

impl Downloader<UReqFetcher> {
    pub fn new(config: DownloadConfig) -> Self {
        Downloader::with_fetcher(config, UReqFetcher::new())
    }
}

pub fn target_dir(output_dir: &Path, keyword: &str) -> PathBuf {
    output_dir.join(keyword.replace(' ', "_"))
}

pub fn file_name(index: usize, extension: &str) -> String {
    format!("image_{:03}.{}", index, extension)
}

/// Subtype of a content type, parameters dropped. `image/png; q=1` gives `png`.
pub fn extension_for(content_type: &str) -> String {
    let essence = content_type.split(';').next().unwrap_or_default().trim();

    match essence.split_once('/') {
        Some((_, subtype)) if !subtype.trim().is_empty() => subtype.trim().to_lowercase(),
        _ => String::from(DEFAULT_EXTENSION),
    }
}

fn preview(url: &str) -> String {
    if url.chars().count() > 60 {
        format!("{}...", url.chars().take(60).collect::<String>())
    } else {
        url.to_string()
    }
}

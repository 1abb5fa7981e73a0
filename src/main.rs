use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use log::{error, info, warn};

use image_search_downloader::{
    Collection, Collector, DelayRange, DownloadConfig, Downloader, SearchConfig, DEFAULT_OUTPUT_DIR,
};

const FALLBACK_KEYWORD: &str = "mountain landscape";

#[derive(Parser, Debug)]
#[command(author, version, about = "Download images from a web image search", long_about = None)]
struct Args {
    /// Search keyword; prompted for when missing
    keyword: Option<String>,

    /// Number of image URLs to collect
    #[arg(long, default_value_t = 30)]
    count: usize,

    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// Seconds to wait between result pages, lower bound
    #[arg(long, default_value_t = 1.5)]
    min_delay: f64,

    #[arg(long, default_value_t = 2.5)]
    max_delay: f64,

    #[arg(long, default_value_t = 35)]
    page_size: usize,

    #[arg(long, default_value_t = 5)]
    overshoot: usize,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let keyword = match args.keyword.as_deref() {
        Some(keyword) => normalize_keyword(keyword),
        None => normalize_keyword(&prompt_keyword()?),
    };

    info!("Searching images for '{}'", keyword);

    let search = SearchConfig {
        target_count: args.count,
        page_size: args.page_size.max(1),
        overshoot: args.overshoot,
        delay: DelayRange::from_secs_f64(args.min_delay, args.max_delay),
        ..SearchConfig::default()
    };

    let collection = Collector::new(search).collect(&keyword);

    let urls = match collection {
        Collection::Empty => {
            error!("No images found for '{}'", keyword);
            return Ok(());
        }
        Collection::Partial { urls, error } if urls.is_empty() => {
            error!("No images found for '{}': {}", keyword, error);
            return Ok(());
        }
        Collection::Partial { urls, error } => {
            warn!("Collection stopped early: {}", error);
            urls
        }
        Collection::Complete(urls) => urls,
    };

    info!("Found {} images", urls.len());

    let downloader = Downloader::new(DownloadConfig {
        output_dir: args.output,
        ..DownloadConfig::default()
    });

    let report = downloader.download(&urls, &keyword)?;

    println!(
        "Done: {} of {} images saved to {}",
        report.saved_count(),
        urls.len(),
        report.folder.display()
    );

    Ok(())
}

fn prompt_keyword() -> io::Result<String> {
    print!("Search keyword (e.g. '{}'): ", FALLBACK_KEYWORD);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;

    Ok(line)
}

fn normalize_keyword(input: &str) -> String {
    let keyword = input.trim();

    if keyword.is_empty() {
        String::from(FALLBACK_KEYWORD)
    } else {
        keyword.to_string()
    }
}

use std::sync::OnceLock;

use itertools::Itertools;
use regex::Regex;
use scraper::{Html, Selector};

const IMAGE_SOURCE_PATTERN: &str = r"(?i)^https://[^&]*\.(?:jpg|jpeg|png|gif|webp)";

const LISTING_MARKER: &str = "form=li";

const SIZE_PARAM_PATTERN: &str = r"size=\w+";

/// Pulls candidate image URLs out of a results page.
pub trait ImageSourceExtractor {
    fn extract(&self, markup: &str) -> Vec<String>;
}

impl<T: ImageSourceExtractor + ?Sized> ImageSourceExtractor for &T {
    fn extract(&self, markup: &str) -> Vec<String> {
        (**self).extract(markup)
    }
}

/// `src` of every `<img>` pointing at an https image file, in document order.
pub struct HtmlImageExtractor {
    selector: Selector,
    source: Regex,
}

impl ImageSourceExtractor for HtmlImageExtractor {
    fn extract(&self, markup: &str) -> Vec<String> {
        let document = Html::parse_document(markup);

        document
            .select(&self.selector)
            .filter_map(|img| img.value().attr("src"))
            .filter(|src| !src.starts_with("data:"))
            .filter(|src| self.source.is_match(src))
            .map(str::to_string)
            .collect_vec()
    }
}

impl HtmlImageExtractor {
    pub fn new() -> Self {
        let selector = Selector::parse("img[src]")
            .unwrap_or_else(|e| panic!("Error parsing img selector: {:?}", e));

        let source = Regex::new(IMAGE_SOURCE_PATTERN)
            .unwrap_or_else(|e| panic!("Error compiling image source pattern: {}", e));

        HtmlImageExtractor { selector, source }
    }
}

impl Default for HtmlImageExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Listing thumbnails carry a `size=` parameter; ask for the original instead.
pub fn upscale_url(url: &str) -> String {
    if !url.contains(LISTING_MARKER) {
        return url.to_string();
    }

    size_param().replace_all(url, "size=o").into_owned()
}

fn size_param() -> &'static Regex {
    static SIZE_PARAM: OnceLock<Regex> = OnceLock::new();

    SIZE_PARAM.get_or_init(|| {
        Regex::new(SIZE_PARAM_PATTERN)
            .unwrap_or_else(|e| panic!("Error compiling size pattern: {}", e))
    })
}

use std::path::PathBuf;
use std::time::Duration;

use rand::Rng;

pub const DEFAULT_ENDPOINT: &str = "https://www.bing.com/images/async";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub const DEFAULT_OUTPUT_DIR: &str = "bing_images";

/// Inclusive range of seconds to wait between two result pages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayRange {
    min: Duration,
    max: Duration,
}

impl DelayRange {
    /// Bounds given in the wrong order are swapped.
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Negative bounds clamp to zero. Bounds `Duration` cannot hold give the default range.
    pub fn from_secs_f64(min: f64, max: f64) -> Self {
        let min = Duration::try_from_secs_f64(min.max(0.0));
        let max = Duration::try_from_secs_f64(max.max(0.0));

        match (min, max) {
            (Ok(min), Ok(max)) => Self::new(min, max),
            _ => Self::default(),
        }
    }

    pub fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    pub fn contains(&self, delay: Duration) -> bool {
        self.min <= delay && delay <= self.max
    }

    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let secs = rng.gen_range(self.min.as_secs_f64()..=self.max.as_secs_f64());

        Duration::from_secs_f64(secs).clamp(self.min, self.max)
    }
}

impl Default for DelayRange {
    fn default() -> Self {
        Self::new(Duration::from_millis(1500), Duration::from_millis(2500))
    }
}

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub endpoint: String,
    pub target_count: usize,
    /// Items the endpoint returns per page; the offset advances by this much each round.
    pub page_size: usize,
    /// How far past `target_count` the offset may go before collection stops.
    pub overshoot: usize,
    pub timeout: Duration,
    pub delay: DelayRange,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: String::from(DEFAULT_ENDPOINT),
            target_count: 30,
            page_size: 35,
            overshoot: 5,
            timeout: Duration::from_secs(10),
            delay: DelayRange::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DownloadConfig {
    pub output_dir: PathBuf,
    pub timeout: Duration,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            timeout: Duration::from_secs(15),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_delay_range_swaps_bounds() {
        let range = DelayRange::from_secs_f64(3.0, 1.0);

        assert_eq!(range.min(), Duration::from_secs(1));
        assert_eq!(range.max(), Duration::from_secs(3));
    }

    #[test]
    fn test_delay_pick_stays_in_range() {
        let range = DelayRange::from_secs_f64(1.5, 2.5);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..100 {
            assert!(range.contains(range.pick(&mut rng)));
        }
    }

    #[test]
    fn test_unrepresentable_delay_falls_back_to_default() {
        assert_eq!(DelayRange::from_secs_f64(f64::INFINITY, 2.0), DelayRange::default());
        assert_eq!(DelayRange::from_secs_f64(1.0, 1e300), DelayRange::default());
    }

    #[test]
    fn test_negative_delay_clamps_to_zero() {
        let range = DelayRange::from_secs_f64(-4.0, 1.0);

        assert_eq!(range.min(), Duration::ZERO);
        assert_eq!(range.max(), Duration::from_secs(1));
    }

    #[test]
    fn test_empty_delay_range() {
        let range = DelayRange::none();
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(range.pick(&mut rng), Duration::ZERO);
    }
}

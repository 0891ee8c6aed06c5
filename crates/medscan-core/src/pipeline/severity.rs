//! Severity estimation from caption keywords, with a random fallback.
//!
//! The fallback stands in for a real severity model. It draws from an
//! injectable [`SeveritySource`] so tests and reproducible runs can pin it.

use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;
use std::sync::Mutex;

use crate::types::Severity;

/// Severity keywords in precedence order. The first keyword found wins.
pub const SEVERITY_KEYWORDS: &[(&str, u8)] = &[
    ("mild", 20),
    ("moderate", 50),
    ("severe", 80),
    ("critical", 95),
];

/// Range drawn from when no keyword matches.
pub const FALLBACK_RANGE: RangeInclusive<u8> = 30..=90;

/// Source of fallback severity values.
pub trait SeveritySource: Send + Sync {
    /// Draw a value uniformly from `range`.
    fn sample(&self, range: RangeInclusive<u8>) -> u8;
}

/// Unseeded thread-local RNG.
#[derive(Debug, Default)]
pub struct ThreadRngSource;

impl SeveritySource for ThreadRngSource {
    fn sample(&self, range: RangeInclusive<u8>) -> u8 {
        rand::thread_rng().gen_range(range)
    }
}

/// Deterministic RNG seeded from config.
pub struct SeededSource {
    rng: Mutex<rand::rngs::StdRng>,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(rand::rngs::StdRng::seed_from_u64(seed)),
        }
    }
}

impl SeveritySource for SeededSource {
    fn sample(&self, range: RangeInclusive<u8>) -> u8 {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.gen_range(range)
    }
}

/// Build the configured source: seeded when a seed is given, otherwise thread RNG.
pub fn source_from_seed(seed: Option<u64>) -> Box<dyn SeveritySource> {
    match seed {
        Some(seed) => {
            tracing::debug!("Severity fallback seeded with {seed}");
            Box::new(SeededSource::new(seed))
        }
        None => Box::new(ThreadRngSource),
    }
}

/// Look up the severity keyword table only.
pub fn keyword_severity(caption: &str) -> Option<Severity> {
    let caption = caption.to_lowercase();
    SEVERITY_KEYWORDS
        .iter()
        .find(|(kw, _)| caption.contains(kw))
        .map(|(_, value)| Severity::new(*value))
}

/// Estimate severity: keyword table first, then the fallback source.
pub fn determine_severity(caption: &str, source: &dyn SeveritySource) -> Severity {
    keyword_severity(caption).unwrap_or_else(|| Severity::new(source.sample(FALLBACK_RANGE)))
}

//! Route number generation.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::RouteNumber;

/// Hands out sequential route numbers for new add-route forms.
#[derive(Debug)]
pub struct RouteNumberGenerator {
    prefix: String,
    next: AtomicU64,
}

impl RouteNumberGenerator {
    /// Start numbering at `first` with the given prefix.
    pub fn new(prefix: impl Into<String>, first: u64) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(first),
        }
    }

    /// The next unused route number.
    pub fn next_number(&self) -> RouteNumber {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        RouteNumber::sequential(&self.prefix, n)
    }
}

impl Default for RouteNumberGenerator {
    fn default() -> Self {
        Self::new("RT", 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_sequential() {
        let generator = RouteNumberGenerator::default();
        assert_eq!(generator.next_number().as_str(), "RT-000001");
        assert_eq!(generator.next_number().as_str(), "RT-000002");
    }

    #[test]
    fn custom_prefix_and_start() {
        let generator = RouteNumberGenerator::new("EXP", 500);
        assert_eq!(generator.next_number().as_str(), "EXP-000500");
    }
}

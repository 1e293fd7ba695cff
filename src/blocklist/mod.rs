//! Host/path blocklist.
//!
//! # Data Flow
//! ```text
//! blocklist.patterns (static config)
//!     → pattern.rs (compile each glob into anchored matchers)
//!     → Blocklist (frozen, shared via Arc)
//!
//! Per request:
//!     (hostname, pathname) → Blocklist::is_blocked → bool
//! ```
//!
//! # Design Decisions
//! - Patterns compiled once at startup, immutable afterwards
//! - Result is a logical OR over all patterns; order only affects speed
//! - Hostnames compared lowercase, paths case-sensitive

pub mod defaults;
pub mod pattern;

pub use defaults::DEFAULT_PATTERNS;
pub use pattern::CompiledPattern;

/// A compiled, read-only set of blocklist patterns.
#[derive(Debug, Clone, Default)]
pub struct Blocklist {
    patterns: Vec<CompiledPattern>,
}

impl Blocklist {
    /// Compile a list of raw patterns.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .map(|p| CompiledPattern::new(p.as_ref()))
                .collect(),
        }
    }

    /// Check whether a request to `hostname` at `pathname` is blocked.
    #[inline]
    pub fn is_blocked(&self, hostname: &str, pathname: &str) -> bool {
        self.matching_pattern(hostname, pathname).is_some()
    }

    /// Return the first pattern that blocks the given host and path.
    pub fn matching_pattern(&self, hostname: &str, pathname: &str) -> Option<&CompiledPattern> {
        let host = hostname.to_ascii_lowercase();
        let host = host.trim_end_matches('.');
        self.patterns.iter().find(|p| p.matches(host, pathname))
    }

    /// Number of compiled patterns.
    #[inline]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_blocklist_allows_everything() {
        let blocklist = Blocklist::default();

        assert!(blocklist.is_empty());
        assert!(!blocklist.is_blocked("ads.doubleclick.net", "/pixel"));
    }

    #[test]
    fn test_blocks_on_any_matching_pattern() {
        let blocklist = Blocklist::new([".doubleclick.net", "youtube.com/pagead/*"]);

        assert_eq!(blocklist.len(), 2);
        assert!(blocklist.is_blocked("ads.doubleclick.net", "/pixel"));
        assert!(blocklist.is_blocked("youtube.com", "/pagead/x"));
        assert!(!blocklist.is_blocked("youtube.com", "/watch"));
    }

    #[test]
    fn test_hostname_is_case_insensitive() {
        let blocklist = Blocklist::new(["*.Example.COM"]);

        assert!(blocklist.is_blocked("ADS.example.com", "/"));
        assert!(blocklist.is_blocked("ads.example.com.", "/"));
    }

    #[test]
    fn test_path_is_case_sensitive() {
        let blocklist = Blocklist::new(["*/ads/*"]);

        assert!(blocklist.is_blocked("site.test", "/ads/x"));
        assert!(!blocklist.is_blocked("site.test", "/ADS/x"));
    }

    #[test]
    fn test_host_only_patterns_ignore_pathname() {
        let blocklist = Blocklist::new([".outbrain.com", "ads.pubmatic.com"]);

        for path in ["/", "/index.html", "/deep/nested/path", "/ads/x"] {
            assert!(blocklist.is_blocked("widgets.outbrain.com", path));
            assert!(blocklist.is_blocked("ads.pubmatic.com", path));
            assert!(!blocklist.is_blocked("example.com", path));
        }
    }

    #[test]
    fn test_pattern_order_does_not_change_the_result() {
        let forward = Blocklist::new(["*/ads/*", ".criteo.com", "youtube.com/pagead/*"]);
        let reverse = Blocklist::new(["youtube.com/pagead/*", ".criteo.com", "*/ads/*"]);

        let inputs = [
            ("static.criteo.com", "/x"),
            ("youtube.com", "/pagead/1"),
            ("news.site", "/ads/1"),
            ("news.site", "/story"),
        ];
        for (host, path) in inputs {
            assert_eq!(forward.is_blocked(host, path), reverse.is_blocked(host, path));
        }
    }

    #[test]
    fn test_matching_pattern_reports_source() {
        let blocklist = Blocklist::new(["analytics.twitter.com/*"]);

        let hit = blocklist.matching_pattern("analytics.twitter.com", "/jot");
        assert_eq!(hit.map(CompiledPattern::source), Some("analytics.twitter.com/*"));

        // A single `*` stays inside one path segment.
        assert!(blocklist.matching_pattern("analytics.twitter.com", "/i/jot").is_none());
        assert!(!blocklist.is_blocked("analytics.twitter.com", "/i/jot"));
    }

    #[test]
    fn test_default_patterns_block_known_trackers() {
        let blocklist = Blocklist::new(DEFAULT_PATTERNS);

        assert!(blocklist.is_blocked("youtube.com", "/api/stats/ads/123"));
        assert!(blocklist.is_blocked("aax.amazon-adsystem.com", "/e/dtb/bid"));
        assert!(blocklist.is_blocked("cdn.taboola.com", "/libtrc/loader.js"));
        assert!(blocklist.is_blocked("www.example.com", "/promo/summer"));
        assert!(!blocklist.is_blocked("youtube.com", "/watch"));
        assert!(!blocklist.is_blocked("docs.rs", "/regex/latest/regex/"));
    }
}

//! Glob pattern compilation.
//!
//! # Pattern dialects
//! - Host-only: `ads.example.com`, `*.tracker.net`, `.doubleclick.net`
//! - Host+path: `youtube.com/api/stats/ads/*`, split on the first `/`
//!
//! # Wildcards
//! - `*` matches a run of characters inside one host label or one path segment
//! - `**` matches any run of characters, separators included
//! - A leading `.` on a host matches the domain itself and every subdomain
//! - A lone `*` host matches any host, with or without a path; an empty host
//!   in a host+path pattern does too
//! - A leading `#` is stripped; a leading `*` is an ordinary wildcard
//!
//! Every compiled segment is anchored to the whole input.

use regex::Regex;

/// Single-wildcard expansion for host patterns (one DNS label).
const HOST_WILDCARD: &str = r"[^.]*";

/// Single-wildcard expansion for path patterns (one path segment).
const PATH_WILDCARD: &str = r"[^/]*";

/// One compiled half of a pattern.
#[derive(Debug, Clone)]
enum Segment {
    /// Matches every input.
    Any,
    /// Matches nothing. Used when the generated expression was rejected.
    Never,
    /// Anchored expression.
    Glob(Regex),
}

impl Segment {
    fn anchored(body: &str, source: &str) -> Self {
        match Regex::new(&format!("^{body}$")) {
            Ok(re) => Segment::Glob(re),
            Err(e) => {
                tracing::warn!(pattern = %source, error = %e, "Pattern failed to compile, it will never match");
                Segment::Never
            }
        }
    }

    fn matches(&self, input: &str) -> bool {
        match self {
            Segment::Any => true,
            Segment::Never => false,
            Segment::Glob(re) => re.is_match(input),
        }
    }
}

/// A blocklist pattern compiled into host and optional path matchers.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    host: Segment,
    path: Option<Segment>,
}

impl CompiledPattern {
    /// Compile a raw pattern string.
    ///
    /// Compilation never fails. A pattern that cannot be expressed degrades
    /// to a matcher that does not match.
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim();
        // `#` is a legacy marker, not a comment. A leading `*` stays a wildcard.
        let pattern = trimmed.strip_prefix('#').unwrap_or(trimmed);

        let (host, path) = match pattern.split_once('/') {
            Some((host, path)) => (compile_host(host, raw), Some(compile_path(path, raw))),
            None if pattern.is_empty() => (Segment::Never, None),
            None => (compile_host(pattern, raw), None),
        };

        Self {
            source: raw.to_string(),
            host,
            path,
        }
    }

    /// The pattern as it appeared in configuration.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether the pattern constrains the path as well as the host.
    pub fn has_path(&self) -> bool {
        self.path.is_some()
    }

    /// Test a lowercase hostname and a pathname against this pattern.
    pub fn matches(&self, hostname: &str, pathname: &str) -> bool {
        self.host.matches(hostname)
            && self
                .path
                .as_ref()
                .map_or(true, |path| path.matches(pathname))
    }
}

fn compile_host(host: &str, source: &str) -> Segment {
    let host = host.to_ascii_lowercase();
    match host.as_str() {
        "" | "*" => Segment::Any,
        _ => {
            let body = match host.strip_prefix('.') {
                Some(domain) => format!(r"(?:.*\.)?{}", glob_to_regex(domain, HOST_WILDCARD)),
                None => glob_to_regex(&host, HOST_WILDCARD),
            };
            Segment::anchored(&body, source)
        }
    }
}

fn compile_path(path: &str, source: &str) -> Segment {
    Segment::anchored(&glob_to_regex(&format!("/{path}"), PATH_WILDCARD), source)
}

/// Translate a glob into an unanchored expression.
///
/// Literal text is escaped. `**` has to be split out before `*`, otherwise
/// it would expand into two single wildcards.
fn glob_to_regex(glob: &str, single_wildcard: &str) -> String {
    glob.split("**")
        .map(|run| {
            run.split('*')
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(single_wildcard)
        })
        .collect::<Vec<_>>()
        .join(".*")
}

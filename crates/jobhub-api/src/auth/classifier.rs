//! Public/protected route classification.
//!
//! The table is an ordered list of rules; the first rule whose pattern matches
//! the request path decides. Paths no rule matches are protected.

use crate::config::ConfigError;

/// How a rule's path is compared against the request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathMatch {
    /// The normalized path equals the pattern.
    Exact(String),
    /// The path equals the pattern or continues it with a `/` segment boundary.
    Prefix(String),
}

impl PathMatch {
    fn matches(&self, path: &str) -> bool {
        match self {
            PathMatch::Exact(pattern) => path == pattern,
            PathMatch::Prefix(prefix) if prefix == "/" => true,
            PathMatch::Prefix(prefix) => match path.strip_prefix(prefix.as_str()) {
                Some(rest) => rest.is_empty() || rest.starts_with('/'),
                None => false,
            },
        }
    }
}

/// A single route table entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRule {
    pub matcher: PathMatch,
    pub public: bool,
}

impl RouteRule {
    pub fn public_exact(path: impl Into<String>) -> Self {
        Self {
            matcher: PathMatch::Exact(normalize(&path.into()).to_string()),
            public: true,
        }
    }

    pub fn public_prefix(path: impl Into<String>) -> Self {
        Self {
            matcher: PathMatch::Prefix(normalize(&path.into()).to_string()),
            public: true,
        }
    }

    pub fn protected_exact(path: impl Into<String>) -> Self {
        Self {
            matcher: PathMatch::Exact(normalize(&path.into()).to_string()),
            public: false,
        }
    }

    pub fn protected_prefix(path: impl Into<String>) -> Self {
        Self {
            matcher: PathMatch::Prefix(normalize(&path.into()).to_string()),
            public: false,
        }
    }

    /// Parse one rule from its textual form.
    ///
    /// `/a/b` is a public exact rule, `/a/**` a public prefix rule, and a
    /// leading `!` marks the rule protected.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let raw = raw.trim();
        let (public, path) = match raw.strip_prefix('!') {
            Some(rest) => (false, rest.trim()),
            None => (true, raw),
        };
        if !path.starts_with('/') {
            return Err(ConfigError::InvalidRouteRule(raw.to_string()));
        }
        let rule = match path.strip_suffix("/**") {
            Some(prefix) if public => Self::public_prefix(prefix),
            Some(prefix) => Self::protected_prefix(prefix),
            None if public => Self::public_exact(path),
            None => Self::protected_exact(path),
        };
        Ok(rule)
    }

    /// Parse a comma-separated rule list, preserving order.
    pub fn parse_list(raw: &str) -> Result<Vec<Self>, ConfigError> {
        raw.split(',')
            .filter(|entry| !entry.trim().is_empty())
            .map(Self::parse)
            .collect()
    }

    pub fn matches(&self, path: &str) -> bool {
        self.matcher.matches(normalize(path))
    }
}

/// Classifies request paths as public or protected.
#[derive(Debug, Clone)]
pub struct RouteClassifier {
    rules: Vec<RouteRule>,
}

impl RouteClassifier {
    pub fn new(rules: Vec<RouteRule>) -> Self {
        Self { rules }
    }

    /// The marketplace route table: auth, company and job-post browsing,
    /// statistics and recommendations are public. `/api/v1/companies/me`
    /// sits ahead of the company browsing prefix so it stays protected.
    pub fn marketplace_defaults() -> Self {
        Self::new(vec![
            RouteRule::public_exact("/health"),
            RouteRule::public_exact("/healthz"),
            RouteRule::public_exact("/ready"),
            RouteRule::public_exact("/metrics"),
            RouteRule::public_prefix("/api/v1/auth"),
            RouteRule::protected_exact("/api/v1/companies/me"),
            RouteRule::public_prefix("/api/v1/companies"),
            RouteRule::public_prefix("/api/v1/job-posts"),
            RouteRule::public_prefix("/api/v1/statistics"),
            RouteRule::public_prefix("/api/v1/recommendations"),
        ])
    }

    /// First matching rule wins; unmatched paths are protected.
    pub fn is_public(&self, path: &str) -> bool {
        self.rules
            .iter()
            .find(|rule| rule.matches(path))
            .map(|rule| rule.public)
            .unwrap_or(false)
    }

    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }
}

impl Default for RouteClassifier {
    fn default() -> Self {
        Self::marketplace_defaults()
    }
}

/// Strip trailing slashes so `/a/b/` and `/a/b` classify the same way.
fn normalize(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_public_routes() {
        let classifier = RouteClassifier::marketplace_defaults();
        for path in [
            "/health",
            "/api/v1/auth/login",
            "/api/v1/auth/register",
            "/api/v1/companies",
            "/api/v1/companies/42",
            "/api/v1/job-posts",
            "/api/v1/job-posts/7/details",
            "/api/v1/statistics",
            "/api/v1/recommendations/seekers/1",
        ] {
            assert!(classifier.is_public(path), "{path} should be public");
        }
    }

    #[test]
    fn test_default_protected_routes() {
        let classifier = RouteClassifier::marketplace_defaults();
        for path in [
            "/api/v1/companies/me",
            "/api/v1/companies/me/",
            "/api/v1/me",
            "/api/v1/seekers/me",
            "/api/v1/chats",
            "/",
            "/unknown",
        ] {
            assert!(!classifier.is_public(path), "{path} should be protected");
        }
    }

    #[test]
    fn test_prefix_respects_segment_boundary() {
        let classifier = RouteClassifier::marketplace_defaults();
        assert!(!classifier.is_public("/api/v1/job-postsadmin"));
        assert!(!classifier.is_public("/api/v1/authz"));
        assert!(!classifier.is_public("/healthcheck"));
    }

    #[test]
    fn test_first_match_wins() {
        let classifier = RouteClassifier::new(vec![
            RouteRule::public_prefix("/a"),
            RouteRule::protected_prefix("/a/b"),
        ]);
        assert!(classifier.is_public("/a/b/c"));

        let classifier = RouteClassifier::new(vec![
            RouteRule::protected_prefix("/a/b"),
            RouteRule::public_prefix("/a"),
        ]);
        assert!(!classifier.is_public("/a/b/c"));
        assert!(classifier.is_public("/a/c"));
    }

    #[test]
    fn test_root_prefix_matches_everything() {
        let classifier = RouteClassifier::new(vec![RouteRule::parse("/**").unwrap()]);
        assert!(classifier.is_public("/"));
        assert!(classifier.is_public("/anything/at/all"));
    }

    #[test]
    fn test_empty_table_protects_everything() {
        let classifier = RouteClassifier::new(Vec::new());
        assert!(!classifier.is_public("/health"));
    }

    #[test]
    fn test_parse_rules() {
        assert_eq!(
            RouteRule::parse("/api/v1/job-posts/**").unwrap(),
            RouteRule::public_prefix("/api/v1/job-posts")
        );
        assert_eq!(
            RouteRule::parse("!/api/v1/companies/me").unwrap(),
            RouteRule::protected_exact("/api/v1/companies/me")
        );
        assert_eq!(
            RouteRule::parse(" ! /private/** ").unwrap(),
            RouteRule::protected_prefix("/private")
        );
        assert!(RouteRule::parse("api/v1").is_err());
    }

    #[test]
    fn test_parse_list_preserves_order() {
        let rules = RouteRule::parse_list("!/a/b, /a/**,,").unwrap();
        assert_eq!(
            rules,
            vec![RouteRule::protected_exact("/a/b"), RouteRule::public_prefix("/a")]
        );
    }
}

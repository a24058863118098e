//! Include/exclude filtering of candidate URLs
//!
//! Patterns come in two flavors and are normalized once at configuration
//! load, never per candidate check. They are matched against the
//! candidate's path relative to the start URL (see
//! [`crate::url::relative_path`]).

use crate::url::{canonical_base_id, relative_path};
use regex::Regex;
use serde::Deserialize;
use url::Url;

/// A filter pattern: a plain substring or a compiled regular expression.
///
/// In TOML/JSON config a pattern is either a bare string (`"private"`) or a
/// table with a `regex` key (`{ regex = "^blog/" }`).
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Matches when the candidate's relative path contains the string.
    Literal(String),
    /// Matches when the regex matches the candidate's relative path.
    Compiled(Regex),
}

impl Pattern {
    pub fn literal(text: impl Into<String>) -> Self {
        Pattern::Literal(text.into())
    }

    pub fn compiled(source: &str) -> Result<Self, regex::Error> {
        Regex::new(source).map(Pattern::Compiled)
    }

    /// Tests the pattern against a candidate's relative path.
    pub fn matches(&self, relative: &str) -> bool {
        match self {
            Pattern::Literal(text) => relative.contains(text.as_str()),
            Pattern::Compiled(regex) => regex.is_match(relative),
        }
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Spec {
            Literal(String),
            Compiled { regex: String },
        }

        match Spec::deserialize(deserializer)? {
            Spec::Literal(text) => Ok(Pattern::Literal(text)),
            Spec::Compiled { regex } => Regex::new(&regex)
                .map(Pattern::Compiled)
                .map_err(serde::de::Error::custom),
        }
    }
}

/// Applies the exclude-then-include filtering policy to candidate URLs.
///
/// A candidate matching any `exclude` pattern is dropped unconditionally. A
/// survivor must then match at least one `include` pattern, unless `include`
/// is empty, in which case every non-excluded candidate passes. The start
/// URL itself always passes, even though its relative path is empty.
#[derive(Debug, Clone)]
pub struct UrlFilter {
    start_url: Url,
    start_id: String,
    exclude: Vec<Pattern>,
    include: Vec<Pattern>,
}

impl UrlFilter {
    pub fn new(start_url: Url, exclude: Vec<Pattern>, include: Vec<Pattern>) -> Self {
        let start_id = canonical_base_id(&start_url);
        Self {
            start_url,
            start_id,
            exclude,
            include,
        }
    }

    /// Returns true when the candidate survives exclude/include filtering.
    pub fn allows(&self, candidate: &Url) -> bool {
        if canonical_base_id(candidate) == self.start_id {
            return true;
        }

        let relative = relative_path(&self.start_url, candidate);

        if self.exclude.iter().any(|p| p.matches(&relative)) {
            return false;
        }

        self.include.is_empty() || self.include.iter().any(|p| p.matches(&relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn filter(exclude: Vec<Pattern>, include: Vec<Pattern>) -> UrlFilter {
        UrlFilter::new(url("https://example.com/"), exclude, include)
    }

    #[test]
    fn test_literal_pattern_is_substring_match() {
        let p = Pattern::literal("private");
        assert!(p.matches("private/page.html"));
        assert!(p.matches("a/private/b"));
        assert!(!p.matches("public/page.html"));
    }

    #[test]
    fn test_compiled_pattern_is_regex_match() {
        let p = Pattern::compiled("^blog/\\d+$").unwrap();
        assert!(p.matches("blog/42"));
        assert!(!p.matches("blog/about"));
    }

    #[test]
    fn test_compiled_pattern_rejects_bad_regex() {
        assert!(Pattern::compiled("(unclosed").is_err());
    }

    #[test]
    fn test_empty_filters_allow_everything() {
        let f = filter(vec![], vec![]);
        assert!(f.allows(&url("https://example.com/anything")));
    }

    #[test]
    fn test_exclude_drops_candidate() {
        let f = filter(vec![Pattern::literal("admin")], vec![]);
        assert!(!f.allows(&url("https://example.com/admin/panel")));
        assert!(f.allows(&url("https://example.com/about")));
    }

    #[test]
    fn test_exclude_wins_over_include() {
        let f = filter(
            vec![Pattern::literal("admin")],
            vec![Pattern::literal("admin")],
        );
        assert!(!f.allows(&url("https://example.com/admin")));
    }

    #[test]
    fn test_include_requires_a_match() {
        let f = filter(vec![], vec![Pattern::literal("docs")]);
        assert!(f.allows(&url("https://example.com/docs/intro")));
        assert!(!f.allows(&url("https://example.com/blog/post")));
    }

    #[test]
    fn test_start_url_always_passes_inclusion() {
        // The start URL's relative path is empty, which no include pattern
        // could match, yet it must still pass.
        let f = filter(vec![], vec![Pattern::literal("docs")]);
        assert!(f.allows(&url("https://example.com/")));
    }

    #[test]
    fn test_start_url_passes_with_query_variants() {
        let f = filter(vec![], vec![Pattern::literal("docs")]);
        assert!(f.allows(&url("https://example.com/?utm=1")));
    }

    #[test]
    fn test_regex_include_from_deserialization() {
        #[derive(Deserialize)]
        struct Wrapper {
            include: Vec<Pattern>,
        }

        let wrapper: Wrapper =
            toml::from_str("include = [\"plain\", { regex = \"^x/\" }]").unwrap();
        assert_eq!(wrapper.include.len(), 2);
        assert!(wrapper.include[0].matches("some/plain/path"));
        assert!(wrapper.include[1].matches("x/y"));
    }

    #[test]
    fn test_bad_regex_fails_deserialization() {
        #[derive(Deserialize)]
        struct Wrapper {
            #[allow(dead_code)]
            include: Vec<Pattern>,
        }

        let result: Result<Wrapper, _> = toml::from_str("include = [{ regex = \"(\" }]");
        assert!(result.is_err());
    }
}

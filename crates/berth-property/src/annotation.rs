//! Annotation keywords and the table that recognizes them
//!
//! The set of recognized annotation keywords is an explicit immutable
//! configuration value ([`AnnotationTable`]) handed to the parser, not
//! process-wide state. [`ParserOptions`] bundles the table with the keyword
//! matching mode and the duplicate-annotation policy.

use std::fmt::{self, Display, Formatter};

/// One recognized declaration annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Annotation {
    /// `@required` flag: a deployment must supply a value
    Required,
    /// `@comment <text>`: free-text documentation
    Comment,
    /// `@default <value>`: fallback value
    Default,
    /// `@pattern <regex>`: validation pattern, stored verbatim
    Pattern,
    /// `@password` flag: sensitive value
    Password,
}

impl Annotation {
    /// Canonical keyword of this annotation
    #[inline]
    #[must_use]
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Comment => "comment",
            Self::Default => "default",
            Self::Pattern => "pattern",
            Self::Password => "password",
        }
    }

    /// Whether this annotation is a bare flag (no payload)
    #[inline]
    #[must_use]
    pub fn is_flag(&self) -> bool {
        matches!(self, Self::Required | Self::Password)
    }
}

impl Display for Annotation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

/// How a segment's leading word is matched against keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeywordMatching {
    /// The leading word must equal the keyword, case-insensitively
    #[default]
    Exact,
    /// Compatibility mode: a segment beginning with the keyword matches,
    /// so `defaultXYZ` is accepted as `default`
    LegacyPrefix,
}

/// Policy for a keyword repeated within one declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Reject the declaration with a structured error
    #[default]
    Reject,
    /// Compatibility mode: the last occurrence wins
    LastWins,
}

/// Table of recognized annotation keywords
///
/// Keywords are looked up in registration order; the defaults cover the five
/// annotations of the declaration grammar.
#[derive(Debug, Clone)]
pub struct AnnotationTable {
    entries: Vec<(String, Annotation)>,
}

impl AnnotationTable {
    /// Create an empty table
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Create a table with the built-in keywords
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        for annotation in [
            Annotation::Required,
            Annotation::Comment,
            Annotation::Default,
            Annotation::Pattern,
            Annotation::Password,
        ] {
            table.register(annotation.keyword(), annotation);
        }
        table
    }

    /// Register a keyword (or alias) for an annotation
    pub fn register(&mut self, keyword: &str, annotation: Annotation) {
        self.entries
            .push((keyword.to_ascii_lowercase(), annotation));
    }

    /// Resolve the annotation a segment starts with, if any
    ///
    /// In [`KeywordMatching::Exact`] mode the segment's leading word (up to
    /// the first whitespace) must equal a keyword; in
    /// [`KeywordMatching::LegacyPrefix`] mode any segment beginning with a
    /// keyword matches.
    #[must_use]
    pub fn recognize(&self, segment: &str, matching: KeywordMatching) -> Option<Annotation> {
        let lowered = segment.to_ascii_lowercase();
        match matching {
            KeywordMatching::Exact => {
                let leading = lowered.split_whitespace().next().unwrap_or("");
                self.entries
                    .iter()
                    .find(|(keyword, _)| keyword == leading)
                    .map(|(_, annotation)| *annotation)
            }
            KeywordMatching::LegacyPrefix => self
                .entries
                .iter()
                .find(|(keyword, _)| lowered.starts_with(keyword.as_str()))
                .map(|(_, annotation)| *annotation),
        }
    }

    /// Registered keywords, in registration order
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(keyword, _)| keyword.as_str())
    }

    /// Number of registered keywords
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for AnnotationTable {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Parser configuration
#[derive(Debug, Clone, Default)]
pub struct ParserOptions {
    /// Recognized annotation keywords
    pub table: AnnotationTable,
    /// Keyword matching mode
    pub keyword_matching: KeywordMatching,
    /// Policy for repeated annotations
    pub duplicate_policy: DuplicatePolicy,
}

impl ParserOptions {
    /// Create default options (built-in table, exact matching, reject duplicates)
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a keyword matching mode
    #[inline]
    #[must_use]
    pub fn with_keyword_matching(mut self, matching: KeywordMatching) -> Self {
        self.keyword_matching = matching;
        self
    }

    /// With a duplicate-annotation policy
    #[inline]
    #[must_use]
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    /// With a custom annotation table
    #[inline]
    #[must_use]
    pub fn with_table(mut self, table: AnnotationTable) -> Self {
        self.table = table;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_with_defaults_knows_all_keywords() {
        let table = AnnotationTable::with_defaults();
        assert_eq!(table.len(), 5);
        for keyword in ["required", "comment", "default", "pattern", "password"] {
            assert!(
                table.recognize(keyword, KeywordMatching::Exact).is_some(),
                "keyword '{keyword}' not recognized"
            );
        }
    }

    #[test]
    fn recognize_exact_matches_leading_word() {
        let table = AnnotationTable::with_defaults();
        assert_eq!(
            table.recognize("default 8080", KeywordMatching::Exact),
            Some(Annotation::Default)
        );
        assert_eq!(
            table.recognize("DEFAULT 8080", KeywordMatching::Exact),
            Some(Annotation::Default)
        );
    }

    #[test]
    fn recognize_exact_rejects_prefix() {
        let table = AnnotationTable::with_defaults();
        assert_eq!(
            table.recognize("defaultXYZ 8080", KeywordMatching::Exact),
            None
        );
    }

    #[test]
    fn recognize_legacy_prefix_accepts_prefix() {
        let table = AnnotationTable::with_defaults();
        assert_eq!(
            table.recognize("defaultXYZ 8080", KeywordMatching::LegacyPrefix),
            Some(Annotation::Default)
        );
    }

    #[test]
    fn recognize_unknown_is_none() {
        let table = AnnotationTable::with_defaults();
        assert_eq!(table.recognize("frobnicate", KeywordMatching::Exact), None);
        assert_eq!(
            table.recognize("frobnicate", KeywordMatching::LegacyPrefix),
            None
        );
    }

    #[test]
    fn table_accepts_custom_alias() {
        let mut table = AnnotationTable::with_defaults();
        table.register("mandatory", Annotation::Required);
        assert_eq!(
            table.recognize("mandatory", KeywordMatching::Exact),
            Some(Annotation::Required)
        );
    }

    #[test]
    fn annotation_flags() {
        assert!(Annotation::Required.is_flag());
        assert!(Annotation::Password.is_flag());
        assert!(!Annotation::Comment.is_flag());
        assert!(!Annotation::Default.is_flag());
        assert!(!Annotation::Pattern.is_flag());
    }
}

//! Declaration parser
//!
//! Turns a raw textual property declaration into a [`Property`] descriptor:
//!
//! ```text
//! property_name[|@annotation[ annotation_value][ @annotation[ annotation_value]]*]
//! ```
//!
//! Parsing is total and best-effort: blank input yields `None`, malformed
//! annotation segments are skipped, and the only structured failure is a
//! repeated annotation under the [`DuplicatePolicy::Reject`] policy. The
//! produced descriptor is *not* validated here; validation runs when the
//! descriptor is admitted into a property set.

use crate::annotation::{Annotation, DuplicatePolicy, ParserOptions};
use berth_model::Property;

/// Configured declaration parser
#[derive(Debug, Clone, Default)]
pub struct PropertyParser {
    options: ParserOptions,
}

impl PropertyParser {
    /// Create a parser with the given options
    #[inline]
    #[must_use]
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    /// Parser options in effect
    #[inline]
    #[must_use]
    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Parse a declaration string into a property descriptor
    ///
    /// Returns `Ok(None)` for blank input. The name is everything before the
    /// first `|`, trimmed; the suffix is split on `@` into annotation
    /// segments. A first segment that starts with no recognized keyword is
    /// taken as an implicit comment; every other unrecognized segment is
    /// skipped.
    ///
    /// # Errors
    /// Returns [`ParseError::AmbiguousAnnotation`] when an annotation keyword
    /// repeats and the duplicate policy is [`DuplicatePolicy::Reject`]. The
    /// implicit leading comment counts as one `comment` occurrence.
    pub fn parse(&self, declaration: &str) -> Result<Option<Property>, ParseError> {
        if declaration.trim().is_empty() {
            return Ok(None);
        }

        let (name_part, suffix) = match declaration.split_once('|') {
            Some((name, suffix)) => (name, Some(suffix)),
            None => (declaration, None),
        };
        let mut property = Property::new(name_part.trim());

        let Some(suffix) = suffix else {
            return Ok(Some(property));
        };

        let mut segments: Vec<&str> = suffix.split('@').collect();
        // Splitting "@required..." yields a leading empty segment
        if segments.first() == Some(&"") {
            segments.remove(0);
        }

        let mut seen: Vec<Annotation> = Vec::new();
        let mut rest = segments.as_slice();

        if let Some(first) = segments.first() {
            if self
                .options
                .table
                .recognize(first, self.options.keyword_matching)
                .is_none()
            {
                property.comment = strip_surrounding_quotes(first.trim()).to_string();
                seen.push(Annotation::Comment);
                rest = &segments[1..];
            }
        }

        for segment in rest {
            let Some(annotation) = self
                .options
                .table
                .recognize(segment, self.options.keyword_matching)
            else {
                continue;
            };

            if seen.contains(&annotation) {
                match self.options.duplicate_policy {
                    DuplicatePolicy::Reject => {
                        return Err(ParseError::AmbiguousAnnotation {
                            name: property.name.clone(),
                            annotation,
                        });
                    }
                    DuplicatePolicy::LastWins => {}
                }
            } else {
                seen.push(annotation);
            }

            match annotation {
                Annotation::Required => property.is_required = true,
                Annotation::Password => property.is_password = true,
                Annotation::Comment => property.comment = annotation_value(segment),
                Annotation::Default => property.default_value = annotation_value(segment),
                Annotation::Pattern => property.pattern = annotation_value(segment),
            }
        }

        Ok(Some(property))
    }

    /// Emit the canonical declaration for a descriptor
    ///
    /// Canonical ordering:
    /// `name|@comment "…"@default "…"@pattern "…"@required @password`, with
    /// absent annotations omitted. For descriptors whose values are free of
    /// the grammar's meta characters, `parse` inverts this exactly.
    #[must_use]
    pub fn to_declaration(property: &Property) -> String {
        let mut annotations: Vec<String> = Vec::new();
        if !property.comment.is_empty() {
            annotations.push(format!("@comment \"{}\"", property.comment));
        }
        if !property.default_value.is_empty() {
            annotations.push(format!("@default \"{}\"", property.default_value));
        }
        if !property.pattern.is_empty() {
            annotations.push(format!("@pattern \"{}\"", property.pattern));
        }
        if property.is_required {
            annotations.push("@required".to_string());
        }
        if property.is_password {
            annotations.push("@password".to_string());
        }

        if annotations.is_empty() {
            property.name.clone()
        } else {
            format!("{}|{}", property.name, annotations.join(" "))
        }
    }
}

/// Value of a payload-carrying annotation segment
///
/// Everything after the segment's first space, trimmed, with one layer of
/// surrounding double quotes stripped. A segment without payload yields the
/// empty string.
fn annotation_value(segment: &str) -> String {
    match segment.find(' ') {
        Some(index) => strip_surrounding_quotes(segment[index + 1..].trim()).to_string(),
        None => String::new(),
    }
}

fn strip_surrounding_quotes(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        value[1..value.len() - 1].trim()
    } else {
        value
    }
}

/// Errors produced by the declaration parser
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// An annotation keyword appeared more than once in one declaration
    #[error("ambiguous declaration for '{name}': annotation '@{annotation}' repeats")]
    AmbiguousAnnotation {
        /// Property name as parsed
        name: String,
        /// Repeated annotation
        annotation: Annotation,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::KeywordMatching;
    use berth_model::PropertyError;
    use proptest::prelude::*;

    fn parser() -> PropertyParser {
        PropertyParser::default()
    }

    fn parse_ok(declaration: &str) -> Property {
        parser().parse(declaration).unwrap().unwrap()
    }

    #[test]
    fn blank_input_is_absent() {
        assert_eq!(parser().parse("").unwrap(), None);
        assert_eq!(parser().parse("   ").unwrap(), None);
    }

    #[test]
    fn name_only() {
        let property = parse_ok("port");
        assert_eq!(property.name, "port");
        assert!(!property.is_required);
        assert!(property.comment.is_empty());
        assert!(property.default_value.is_empty());
    }

    #[test]
    fn name_is_trimmed() {
        assert_eq!(parse_ok("  port  |@required").name, "port");
    }

    #[test]
    fn required_flag() {
        let property = parse_ok("port|@required");
        assert!(property.is_required);
        assert!(property.default_value.is_empty());
        assert!(property.validate().is_ok());
    }

    #[test]
    fn lenient_parse_required_with_default_fails_validation() {
        let property = parse_ok("port|@required @default 8080");
        assert!(property.is_required);
        assert_eq!(property.default_value, "8080");
        assert_eq!(
            property.validate(),
            Err(PropertyError::RequiredWithDefault {
                name: "port".to_string()
            })
        );
    }

    #[test]
    fn quoted_values_lose_one_quote_layer() {
        let property = parse_ok(r#"timeout|@pattern "[0-9]+" @default "30""#);
        assert_eq!(property.pattern, "[0-9]+");
        assert_eq!(property.default_value, "30");
    }

    #[test]
    fn unquoted_values_kept_verbatim() {
        assert_eq!(parse_ok("port|@default 8080").default_value, "8080");
    }

    #[test]
    fn implicit_leading_comment() {
        let property = parse_ok(r#"port|A nice comment@default "8080""#);
        assert_eq!(property.comment, "A nice comment");
        assert_eq!(property.default_value, "8080");
    }

    #[test]
    fn implicit_comment_may_be_quoted() {
        assert_eq!(parse_ok(r#"port|"spaced  out""#).comment, "spaced  out");
    }

    #[test]
    fn explicit_comment_keeps_payload() {
        assert_eq!(
            parse_ok("port|@comment listening port").comment,
            "listening port"
        );
    }

    #[test]
    fn keywords_match_case_insensitively() {
        let property = parse_ok("port|@REQUIRED @Default 8080");
        assert!(property.is_required);
        assert_eq!(property.default_value, "8080");
    }

    #[test]
    fn flag_payload_is_ignored() {
        let property = parse_ok("port|@comment doc @required yes please");
        assert!(property.is_required);
        assert_eq!(property.comment, "doc");
    }

    #[test]
    fn payload_annotation_without_value_is_empty() {
        assert_eq!(parse_ok("port|@comment doc @default").default_value, "");
    }

    #[test]
    fn unrecognized_inner_segment_is_skipped() {
        let property = parse_ok("port|@comment doc @frobnicate 1 @required");
        assert!(property.is_required);
        assert_eq!(property.comment, "doc");
    }

    #[test]
    fn unrecognized_first_segment_becomes_comment_in_exact_mode() {
        // In exact mode "requiredXYZ" is no keyword, so the first-segment
        // implicit-comment rule captures it.
        let property = parse_ok("port|@requiredXYZ");
        assert!(!property.is_required);
        assert_eq!(property.comment, "requiredXYZ");
    }

    #[test]
    fn legacy_prefix_mode_accepts_keyword_prefix() {
        let legacy = PropertyParser::new(
            ParserOptions::new().with_keyword_matching(KeywordMatching::LegacyPrefix),
        );
        let property = legacy.parse("port|@requiredXYZ").unwrap().unwrap();
        assert!(property.is_required);
        assert!(property.comment.is_empty());
    }

    #[test]
    fn duplicate_annotation_rejected_by_default() {
        let result = parser().parse("port|@default 1 @default 2");
        assert_eq!(
            result,
            Err(ParseError::AmbiguousAnnotation {
                name: "port".to_string(),
                annotation: Annotation::Default,
            })
        );
    }

    #[test]
    fn duplicate_annotation_last_wins_mode() {
        let lenient = PropertyParser::new(
            ParserOptions::new().with_duplicate_policy(DuplicatePolicy::LastWins),
        );
        let property = lenient.parse("port|@default 1 @default 2").unwrap().unwrap();
        assert_eq!(property.default_value, "2");
    }

    #[test]
    fn implicit_comment_counts_as_comment_occurrence() {
        let result = parser().parse("port|doc text @comment more");
        assert!(matches!(
            result,
            Err(ParseError::AmbiguousAnnotation {
                annotation: Annotation::Comment,
                ..
            })
        ));

        let lenient = PropertyParser::new(
            ParserOptions::new().with_duplicate_policy(DuplicatePolicy::LastWins),
        );
        let property = lenient.parse("port|doc text @comment more").unwrap().unwrap();
        assert_eq!(property.comment, "more");
    }

    #[test]
    fn later_pipes_belong_to_the_annotation_suffix() {
        let property = parse_ok("port|plain|text");
        assert_eq!(property.name, "port");
        assert_eq!(property.comment, "plain|text");
    }

    #[test]
    fn canonical_declaration_examples() {
        let mut property = Property::new("port");
        assert_eq!(PropertyParser::to_declaration(&property), "port");

        property.is_required = true;
        property.pattern = "[0-9]+".to_string();
        assert_eq!(
            PropertyParser::to_declaration(&property),
            r#"port|@pattern "[0-9]+" @required"#
        );
    }

    fn name_strategy() -> impl Strategy<Value = String> {
        "[a-zA-Z][a-zA-Z0-9_.-]{0,12}"
    }

    fn value_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(String::new()),
            "[a-zA-Z0-9][a-zA-Z0-9_./:-]{0,12}",
        ]
    }

    proptest! {
        // Round-trip: parse(to_declaration(p)) == p for descriptors whose
        // values avoid the grammar's meta characters.
        #[test]
        fn canonical_declaration_roundtrips(
            name in name_strategy(),
            comment in value_strategy(),
            default_value in value_strategy(),
            pattern in value_strategy(),
            is_required in any::<bool>(),
            is_password in any::<bool>(),
        ) {
            let property = Property {
                name,
                is_required,
                comment,
                default_value,
                pattern,
                is_password,
            };
            let declaration = PropertyParser::to_declaration(&property);
            let reparsed = parser().parse(&declaration).unwrap().unwrap();
            prop_assert_eq!(reparsed, property);
        }
    }
}

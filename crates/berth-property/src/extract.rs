//! Property extraction from template bodies
//!
//! Templates reference properties through `{{ … }}` tags; each tag body is a
//! declaration in the micro-language. Extraction scans a template (or a whole
//! module's template set), parses every tag and merges the descriptors into a
//! [`PropertySet`]. Re-declaring a name across templates is legitimate; the
//! first occurrence wins. Any parse or validation failure aborts the
//! extraction, so an invalid descriptor is never admitted.

use crate::parser::{ParseError, PropertyParser};
use berth_model::{PropertyError, PropertySet, Template};

const TAG_OPEN: &str = "{{";
const TAG_CLOSE: &str = "}}";

/// Extract the declared properties of one template body
///
/// # Errors
/// - [`ExtractError::UnterminatedTag`] for a `{{` with no matching `}}`
/// - [`ExtractError::Parse`] for a declaration the parser rejects
/// - [`ExtractError::Property`] for a descriptor failing validation
pub fn extract_properties(
    content: &str,
    parser: &PropertyParser,
) -> Result<PropertySet, ExtractError> {
    let mut set = PropertySet::new();
    collect_into(&mut set, content, parser)?;
    Ok(set)
}

/// Derive a module's property model from its full template set
///
/// Templates are scanned in order; the first declaration of a name
/// (case-insensitive) wins across the whole set.
///
/// # Errors
/// Same failure modes as [`extract_properties`].
pub fn module_model(
    templates: &[Template],
    parser: &PropertyParser,
) -> Result<PropertySet, ExtractError> {
    let mut set = PropertySet::new();
    for template in templates {
        collect_into(&mut set, &template.content, parser)?;
    }
    Ok(set)
}

fn collect_into(
    set: &mut PropertySet,
    content: &str,
    parser: &PropertyParser,
) -> Result<(), ExtractError> {
    let mut cursor = 0;
    while let Some(open) = content[cursor..].find(TAG_OPEN) {
        let start = cursor + open + TAG_OPEN.len();
        let Some(close) = content[start..].find(TAG_CLOSE) else {
            return Err(ExtractError::UnterminatedTag {
                position: cursor + open,
            });
        };
        let declaration = &content[start..start + close];
        if let Some(property) = parser.parse(declaration)? {
            set.insert_first_wins(property)?;
        }
        cursor = start + close + TAG_CLOSE.len();
    }
    Ok(())
}

/// Errors produced by template extraction
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    /// A `{{` tag never closes
    #[error("unterminated property tag at byte {position}")]
    UnterminatedTag {
        /// Byte offset of the opening delimiter
        position: usize,
    },

    /// The tag body is not a parseable declaration
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The parsed descriptor failed validation
    #[error(transparent)]
    Property(#[from] PropertyError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> PropertyParser {
        PropertyParser::default()
    }

    #[test]
    fn extracts_declarations_in_order() {
        let content = "listen {{port|@required}} on {{host|@default localhost}}\n";
        let set = extract_properties(content, &parser()).unwrap();

        let names: Vec<&str> = set.names().collect();
        assert_eq!(names, vec!["port", "host"]);
        assert!(set.value("port").unwrap().is_required);
        assert_eq!(set.value("host").unwrap().default_value, "localhost");
    }

    #[test]
    fn repeated_name_keeps_first_descriptor() {
        let content = "{{port|@comment first}} ... {{PORT|@comment second}}";
        let set = extract_properties(content, &parser()).unwrap();

        assert_eq!(set.len(), 1);
        assert_eq!(set.value("port").unwrap().comment, "first");
    }

    #[test]
    fn blank_tag_is_skipped() {
        let set = extract_properties("{{}} {{  }} {{port}}", &parser()).unwrap();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn no_tags_yields_empty_set() {
        let set = extract_properties("static content only", &parser()).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn unterminated_tag_is_an_error() {
        let result = extract_properties("ok {{port}} broken {{host", &parser());
        assert_eq!(result, Err(ExtractError::UnterminatedTag { position: 19 }));
    }

    #[test]
    fn invalid_descriptor_aborts_extraction() {
        let result = extract_properties("{{port|@required @default 8080}}", &parser());
        assert!(matches!(
            result,
            Err(ExtractError::Property(PropertyError::RequiredWithDefault { .. }))
        ));
    }

    #[test]
    fn ambiguous_declaration_aborts_extraction() {
        let result = extract_properties("{{port|@default 1 @default 2}}", &parser());
        assert!(matches!(result, Err(ExtractError::Parse(_))));
    }

    #[test]
    fn module_model_merges_across_templates() {
        let templates = vec![
            Template::new(
                "server",
                "server.conf",
                "/etc",
                "{{port|@default 8080}} {{host}}",
            ),
            Template::new(
                "logging",
                "logging.conf",
                "/etc",
                "{{level|@default info}} {{port|@default 9090}}",
            ),
        ];
        let set = module_model(&templates, &parser()).unwrap();

        let names: Vec<&str> = set.names().collect();
        assert_eq!(names, vec!["port", "host", "level"]);
        assert_eq!(set.value("port").unwrap().default_value, "8080");
    }
}

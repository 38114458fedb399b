//! Berth Property Micro-Language
//!
//! Parsing of template property declarations into validated descriptors.
//!
//! # Core Concepts
//!
//! - [`PropertyParser`]: declaration string → [`berth_model::Property`],
//!   total and best-effort
//! - [`AnnotationTable`] / [`ParserOptions`]: the recognized keyword set as
//!   an explicit configuration value, with an exact-matching default and a
//!   legacy prefix-matching compatibility mode
//! - [`extract_properties`] / [`module_model`]: `{{ … }}` template scanning
//!   into a property set
//!
//! # Example
//!
//! ```rust
//! use berth_property::PropertyParser;
//!
//! let parser = PropertyParser::default();
//! let property = parser
//!     .parse(r#"timeout|@required @pattern "[0-9]+""#)
//!     .expect("unambiguous")
//!     .expect("non-blank");
//! assert!(property.is_required);
//! assert_eq!(property.pattern, "[0-9]+");
//! ```

#![warn(unreachable_pub)]

mod annotation;
mod extract;
mod parser;

pub use annotation::{Annotation, AnnotationTable, DuplicatePolicy, KeywordMatching, ParserOptions};
pub use extract::{extract_properties, module_model, ExtractError};
pub use parser::{ParseError, PropertyParser};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

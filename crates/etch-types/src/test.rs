//! Test utilities and mock objects for etch-types.
//!
//! This module provides utilities for testing etch-types functionality,
//! including mock fields, symbols, registries and definitions.
//!
//! # Example
//!
//! ```
//! use etch_types::test::{mock_definitions, mock_field, mock_symbol};
//!
//! let definitions = mock_definitions(&[("Side", "'top' | 'bottom'")]);
//! let symbol = mock_symbol("Popover.Positioner", &[("side", mock_field("Side"))]);
//! assert_eq!(symbol.props.len(), 1);
//! assert!(definitions.contains("Side"));
//! ```

use crate::analysis::Definitions;
use crate::enhance::{EnhanceConfig, ExportedSymbol, FormattedField};
use crate::registry::NameRegistry;
use crate::styled::TypeScriptHighlighter;

/// Create a registry with a small set of namespaced component exports.
///
/// Covers `Accordion.Root`, `Accordion.Root.Props`, `Accordion.Root.State`,
/// `Accordion.Item` and `Accordion.Item.State`.
pub fn mock_registry() -> NameRegistry {
    NameRegistry::from_exports([
        "Accordion.Root",
        "Accordion.Root.Props",
        "Accordion.Root.State",
        "Accordion.Item",
        "Accordion.Item.State",
    ])
}

/// Create a config with default widths and a two-thread pool.
pub fn mock_config() -> EnhanceConfig {
    EnhanceConfig {
        max_concurrency: 2,
        ..EnhanceConfig::default()
    }
}

/// Create a required field with the given type text.
pub fn mock_field(type_text: &str) -> FormattedField {
    FormattedField::new(type_text)
}

/// Create an optional field with the given type text.
pub fn mock_optional_field(type_text: &str) -> FormattedField {
    FormattedField::new(type_text).optional()
}

/// Create definitions rendered from `(name, text)` pairs.
pub fn mock_definitions(entries: &[(&str, &str)]) -> Definitions {
    let mut definitions = Definitions::new();
    for (name, text) in entries {
        definitions.insert_text(*name, text, &TypeScriptHighlighter);
    }
    definitions
}

/// Create a symbol with the given props and no parameters or return value.
pub fn mock_symbol(name: &str, props: &[(&str, FormattedField)]) -> ExportedSymbol {
    ExportedSymbol {
        name: name.to_string(),
        props: props
            .iter()
            .map(|(prop, field)| (prop.to_string(), field.clone()))
            .collect(),
        ..ExportedSymbol::default()
    }
}

/// Common type nodes.
pub mod types {
    use crate::types::{QualifiedName, TypeNode};

    /// Create a union of string literals
    pub fn string_literals(values: &[&str]) -> TypeNode {
        TypeNode::union(values.iter().map(|v| TypeNode::string_literal(*v)).collect())
    }

    /// Create an optional type (T | undefined)
    pub fn optional(inner: TypeNode) -> TypeNode {
        TypeNode::union(vec![inner, TypeNode::undefined()])
    }

    /// Create a reference to a dotted name
    pub fn reference(dotted: &str) -> TypeNode {
        TypeNode::external(QualifiedName::from_dotted(dotted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_mock_registry() {
        let registry = mock_registry();
        assert_eq!(registry.len(), 5);
        assert_eq!(registry.dotted_name("AccordionItemState"), Some("Accordion.Item.State"));
    }

    #[test]
    fn test_mock_field() {
        let field = mock_optional_field("string | undefined");
        assert!(field.optional);
        assert_eq!(field.type_text, "string | undefined");
        assert!(!mock_field("string").optional);
    }

    #[test]
    fn test_mock_symbol_keeps_prop_order() {
        let symbol = mock_symbol("Root", &[("b", mock_field("B")), ("a", mock_field("A"))]);
        assert_eq!(symbol.props.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert!(symbol.return_value.is_none());
    }

    #[test]
    fn test_mock_types() {
        let node = types::optional(types::string_literals(&["a", "b"]));
        assert!(node.includes_undefined());
        assert_eq!(types::reference("Accordion.Root").alias(), None);
    }
}

//! Type references inside rendered trees, and their expansion

use super::short_label::{label_text, name_label, LabelNames};
use crate::enhance::FormattedField;
use crate::format::inline::property_key;
use crate::styled::{render_with, Highlighter, RenderMode, StyleRole, StyledNode, StyledTree};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use tracing::debug;

/// A (possibly dotted) type name found in a styled tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeReference {
    /// Dotted name, e.g. `Accordion.Root.Props`
    pub qualified_name: String,
    /// Children of the container making up the reference
    pub span_range: Range<usize>,
    /// Child-index path from the root to the container
    pub container_path: Vec<usize>,
}

/// Rendered definitions of named types, keyed by dotted name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Definitions {
    entries: IndexMap<String, StyledTree>,
}

impl Definitions {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rendered definition
    pub fn insert(&mut self, name: impl Into<String>, tree: StyledTree) {
        self.entries.insert(name.into(), tree);
    }

    /// Render `text` inline and add it as the definition of `name`
    pub fn insert_text(&mut self, name: impl Into<String>, text: &str, highlighter: &dyn Highlighter) {
        self.insert(name, render_with(highlighter, text, RenderMode::Inline));
    }

    /// Add an object-type definition built from a set of fields
    ///
    /// Optional fields are written `key?: T` without their `| undefined`.
    pub fn insert_object<'f, I>(&mut self, name: impl Into<String>, fields: I, highlighter: &dyn Highlighter)
    where
        I: IntoIterator<Item = (&'f str, &'f FormattedField)>,
    {
        let text = object_text(fields);
        self.insert_text(name, &text, highlighter);
    }

    /// Definition of `name`
    pub fn get(&self, name: &str) -> Option<&StyledTree> {
        self.entries.get(name)
    }

    /// Whether `name` has a definition
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of definitions
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no definitions
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn object_text<'f, I>(fields: I) -> String
where
    I: IntoIterator<Item = (&'f str, &'f FormattedField)>,
{
    let members: Vec<String> = fields
        .into_iter()
        .map(|(name, field)| {
            let key = property_key(name);
            if field.optional {
                format!("{}?: {}", key, label_text(&field.type_text, true))
            } else {
                format!("{}: {}", key, field.type_text)
            }
        })
        .collect();

    if members.is_empty() {
        "{}".to_string()
    } else {
        format!("{{ {} }}", members.join("; "))
    }
}

fn entity_text(node: &StyledNode) -> Option<String> {
    match node {
        StyledNode::Element(element) if element.role == Some(StyleRole::Entity) => {
            Some(element.text_content())
        }
        _ => None,
    }
}

fn is_dot(node: &StyledNode) -> bool {
    matches!(node.role(), None | Some(StyleRole::Punctuation)) && node.text_content() == "."
}

/// All type references in document order
///
/// `Entity . Entity` runs merge into one dotted reference.
pub fn collect(tree: &StyledTree) -> Vec<TypeReference> {
    let mut references = Vec::new();
    let mut path = Vec::new();
    collect_in(&tree.root.children, &mut path, &mut references);
    references
}

fn collect_in(children: &[StyledNode], path: &mut Vec<usize>, out: &mut Vec<TypeReference>) {
    let mut index = 0;
    while index < children.len() {
        if let Some(first) = entity_text(&children[index]) {
            let mut name = first;
            let mut end = index;
            while let (Some(dot), Some(next)) = (children.get(end + 1), children.get(end + 2)) {
                match entity_text(next) {
                    Some(segment) if is_dot(dot) => {
                        name.push('.');
                        name.push_str(&segment);
                        end += 2;
                    }
                    _ => break,
                }
            }
            out.push(TypeReference {
                qualified_name: name,
                span_range: index..end + 1,
                container_path: path.clone(),
            });
            index = end + 1;
            continue;
        }

        if let StyledNode::Element(element) = &children[index] {
            path.push(index);
            collect_in(&element.children, path, out);
            path.pop();
        }
        index += 1;
    }
}

/// Copy of `tree` with every defined reference replaced by its definition
///
/// Substituted content is not expanded again.
pub fn expand(tree: &StyledTree, definitions: &Definitions) -> StyledTree {
    let mut expanded = tree.clone();
    let references = collect(tree);

    // Later spans first, so earlier ranges and paths stay valid.
    for reference in references.iter().rev() {
        let Some(definition) = definitions.get(&reference.qualified_name) else {
            continue;
        };
        if let Some(container) = expanded.root.element_at_mut(&reference.container_path) {
            debug!(reference = %reference.qualified_name, "expanding type reference");
            container
                .children
                .splice(reference.span_range.clone(), definition.content_nodes());
        }
    }

    expanded
}

/// Whether a field's type is worth expanding into a detailed view
pub fn should_expand(field_name: &str, tree: &StyledTree, definitions: &Definitions) -> bool {
    name_label(field_name, &LabelNames::default()).is_some()
        || collect(tree)
            .iter()
            .any(|reference| definitions.contains(&reference.qualified_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styled::{render, TypeScriptHighlighter};
    use pretty_assertions::assert_eq;

    fn inline(text: &str) -> StyledTree {
        render(text, RenderMode::Inline)
    }

    fn definitions(entries: &[(&str, &str)]) -> Definitions {
        let mut definitions = Definitions::new();
        for (name, text) in entries {
            definitions.insert_text(*name, text, &TypeScriptHighlighter);
        }
        definitions
    }

    #[test]
    fn test_collect_merges_dotted_runs() {
        let references = collect(&inline("Accordion.Root.Props | Foo<Bar>"));
        let names: Vec<&str> = references.iter().map(|r| r.qualified_name.as_str()).collect();
        assert_eq!(names, vec!["Accordion.Root.Props", "Foo", "Bar"]);
        assert_eq!(references[0].span_range, 0..5);
        assert_eq!(references[0].container_path, vec![0]);
    }

    #[test]
    fn test_expand_replaces_defined_references() {
        let definitions = definitions(&[("Accordion.Root.ChangeEventDetails", "{ reason: string }")]);
        let tree = inline("(details: Accordion.Root.ChangeEventDetails) => void");
        assert_eq!(
            expand(&tree, &definitions).plain_text(),
            "(details: { reason: string }) => void"
        );
    }

    #[test]
    fn test_expand_is_one_level_deep() {
        let definitions = definitions(&[("Outer", "Inner | null"), ("Inner", "string")]);
        assert_eq!(expand(&inline("Outer"), &definitions).plain_text(), "Inner | null");
    }

    #[test]
    fn test_expand_handles_repeated_references() {
        let definitions = definitions(&[("Side", "'top' | 'bottom'")]);
        assert_eq!(
            expand(&inline("[Side, Align, Side]"), &definitions).plain_text(),
            "['top' | 'bottom', Align, 'top' | 'bottom']"
        );
    }

    #[test]
    fn test_undefined_references_are_left_alone() {
        let tree = inline("Foo.Bar | null");
        assert_eq!(expand(&tree, &Definitions::new()), tree);
    }

    #[test]
    fn test_should_expand() {
        let definitions = definitions(&[("Side", "'top' | 'bottom'")]);
        assert!(should_expand("side", &inline("Side | undefined"), &definitions));
        assert!(should_expand("onChange", &inline("string"), &definitions));
        assert!(!should_expand("align", &inline("Align"), &definitions));
    }

    #[test]
    fn test_insert_object_from_fields() {
        let fields = vec![
            ("open".to_string(), FormattedField::new("boolean")),
            ("data-side".to_string(), FormattedField::new("Side | undefined").optional()),
        ];
        let mut definitions = Definitions::new();
        definitions.insert_object(
            "Popover.Root.State",
            fields.iter().map(|(name, field)| (name.as_str(), field)),
            &TypeScriptHighlighter,
        );
        assert_eq!(
            definitions.get("Popover.Root.State").map(StyledTree::plain_text),
            Some("{ open: boolean; \"data-side\"?: Side }".to_string())
        );
    }
}

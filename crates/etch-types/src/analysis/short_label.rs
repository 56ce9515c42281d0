//! Compact labels for long or callable field types
//!
//! Callbacks collapse to `function` and long unions to `Union`; the full type
//! is still available in the field's `type`.

use super::classify::TypeShape;
use crate::styled::StyledTree;
use crate::types::TypeNode;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref HANDLER_NAME: Regex = Regex::new(r"^(on|get)[A-Z]").unwrap();
}

/// Label given to long unions
pub const UNION_LABEL: &str = "Union";

/// Label given to callables
pub const FUNCTION_LABEL: &str = "function";

/// Minimum plain-text length of a union before it is labelled
const UNION_LABEL_MIN_LENGTH: usize = 30;

const OPTIONAL_SUFFIX: &str = " | undefined";

/// Type names used in the labels of the `style` and `render` props
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct LabelNames {
    /// Type accepted by `style` besides a function
    pub style_props_type: String,
    /// Type accepted by `render` besides a function
    pub element_type: String,
}

impl Default for LabelNames {
    fn default() -> Self {
        Self {
            style_props_type: "React.CSSProperties".to_string(),
            element_type: "ReactElement".to_string(),
        }
    }
}

/// Label fixed by the field name alone, before the type is looked at
pub fn name_label(field_name: &str, names: &LabelNames) -> Option<String> {
    if HANDLER_NAME.is_match(field_name) {
        return Some(FUNCTION_LABEL.to_string());
    }
    match field_name {
        "className" => Some(format!("string | {}", FUNCTION_LABEL)),
        "style" => Some(format!("{} | {}", names.style_props_type, FUNCTION_LABEL)),
        "render" => Some(format!("{} | {}", names.element_type, FUNCTION_LABEL)),
        _ => None,
    }
}

/// Text used for labelling: optional fields drop their trailing `| undefined`
pub fn label_text(text: &str, optional: bool) -> &str {
    if optional {
        text.strip_suffix(OPTIONAL_SUFFIX).unwrap_or(text)
    } else {
        text
    }
}

/// Short label for a field, classifying the rendered tree
pub fn short_label(
    field_name: &str,
    tree: &StyledTree,
    optional: bool,
    names: &LabelNames,
) -> Option<String> {
    let plain = tree.plain_text();
    let text = label_text(&plain, optional);
    derive(field_name, text, TypeShape::from_styled_text(tree, text), names)
}

/// Short label for a field whose type node is still available
pub fn short_label_for_node(
    field_name: &str,
    node: &TypeNode,
    type_text: &str,
    optional: bool,
    names: &LabelNames,
) -> Option<String> {
    let text = label_text(type_text, optional);
    derive(field_name, text, TypeShape::from_node(node, optional), names)
}

fn derive(field_name: &str, text: &str, shape: TypeShape, names: &LabelNames) -> Option<String> {
    if let Some(label) = name_label(field_name, names) {
        return Some(label);
    }

    if field_name.ends_with("Ref") || field_name == "children" {
        return None;
    }

    if shape.is_union {
        if shape.separators >= 2 && text.chars().count() > UNION_LABEL_MIN_LENGTH {
            return Some(UNION_LABEL.to_string());
        }
        return None;
    }

    if shape.is_function {
        return Some(FUNCTION_LABEL.to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::format_type;
    use crate::registry::NameRegistry;
    use crate::styled::{render, RenderMode};
    use crate::test::types;
    use crate::types::SignatureParameter;
    use pretty_assertions::assert_eq;

    fn label(name: &str, text: &str, optional: bool) -> Option<String> {
        short_label(name, &render(text, RenderMode::Inline), optional, &LabelNames::default())
    }

    const LONG_UNION: &str = "'top' | 'bottom' | 'left' | 'right'";

    #[test]
    fn test_handler_names_are_functions() {
        assert_eq!(label("onOpenChange", "string", false), Some("function".to_string()));
        assert_eq!(label("getLabel", "string", false), Some("function".to_string()));
        assert_eq!(label("online", "boolean", false), None);
    }

    #[test]
    fn test_fixed_names() {
        assert_eq!(
            label("className", "string | ((state: State) => string)", true),
            Some("string | function".to_string())
        );
        assert_eq!(
            label("style", "CSSProperties", true),
            Some("React.CSSProperties | function".to_string())
        );
        assert_eq!(
            label("render", "ReactElement", true),
            Some("ReactElement | function".to_string())
        );
    }

    #[test]
    fn test_refs_and_children_have_no_label() {
        assert_eq!(label("inputRef", LONG_UNION, false), None);
        assert_eq!(label("children", "(state: State) => ReactNode", false), None);
    }

    #[test]
    fn test_long_unions() {
        assert_eq!(label("side", LONG_UNION, false), Some("Union".to_string()));
        // two members is a single separator
        assert_eq!(label("side", "'top-start-aligned' | 'bottom-end-aligned'", false), None);
        // short text
        assert_eq!(label("side", "'a' | 'b' | 'c'", false), None);
    }

    #[test]
    fn test_optional_suffix_is_ignored() {
        let text = "'top' | 'bottom' | 'left' | undefined";
        assert_eq!(text.chars().count(), 37);
        // the stripped text is too short to label
        assert_eq!(label("side", text, true), None);
        assert_eq!(label("side", text, false), Some("Union".to_string()));
        assert_eq!(
            label("format", "((value: number) => string) | undefined", true),
            Some("function".to_string())
        );
    }

    #[test]
    fn test_plain_types_have_no_label() {
        assert_eq!(label("disabled", "boolean", false), None);
        assert_eq!(label("value", "{ a: string }", false), None);
    }

    #[test]
    fn test_node_based_label() {
        let node = TypeNode::union(vec![
            TypeNode::function(vec![SignatureParameter::new("value", TypeNode::number())], TypeNode::string()),
            TypeNode::undefined(),
        ]);
        assert_eq!(
            short_label_for_node(
                "format",
                &node,
                "((value: number) => string) | undefined",
                true,
                &LabelNames::default()
            ),
            Some("function".to_string())
        );
    }

    #[test]
    fn test_node_and_text_labels_agree_on_constrained_unions() {
        let node = TypeNode::union(vec![
            TypeNode::string(),
            TypeNode::TypeParameter {
                name: "T".into(),
                constraint: Some(Box::new(types::string_literals(&["alpha", "beta", "gamma"]))),
            },
        ]);
        let text = format_type(&node, false, false, &NameRegistry::new(), None);
        assert_eq!(text, r#"string | "alpha" | "beta" | "gamma""#);
        assert_eq!(label("variant", &text, false), Some("Union".to_string()));
        assert_eq!(
            short_label_for_node("variant", &node, &text, false, &LabelNames::default()),
            Some("Union".to_string())
        );
    }

    #[test]
    fn test_custom_label_names() {
        let names = LabelNames {
            style_props_type: "StyleProp".to_string(),
            element_type: "JSX.Element".to_string(),
        };
        assert_eq!(name_label("style", &names), Some("StyleProp | function".to_string()));
        assert_eq!(name_label("render", &names), Some("JSX.Element | function".to_string()));
    }
}

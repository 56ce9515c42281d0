//! Structural classification of rendered types

use crate::format::inline::{union_members, InlineFormatter, SYNTHETIC_ALIAS};
use crate::registry::NameRegistry;
use crate::styled::{StyleRole, StyledTree};
use crate::types::TypeNode;
use indexmap::IndexMap;

/// Bracket nesting tracker for type text
///
/// Counts `()`, `{}`, `[]` and `<>`. The `>` of `=>` is not a closing
/// bracket, and nothing inside a string literal is counted.
#[derive(Debug, Clone, Default)]
pub struct BracketDepth {
    depth: i32,
    quote: Option<char>,
    escaped: bool,
    previous: Option<char>,
}

impl BracketDepth {
    /// Whether the scanner is outside every bracket and string
    pub fn is_top_level(&self) -> bool {
        self.depth <= 0 && self.quote.is_none()
    }

    /// Consume one character
    pub fn advance(&mut self, c: char) {
        if let Some(quote) = self.quote {
            if self.escaped {
                self.escaped = false;
            } else if c == '\\' {
                self.escaped = true;
            } else if c == quote {
                self.quote = None;
            }
            self.previous = Some(c);
            return;
        }

        match c {
            '"' | '\'' | '`' => self.quote = Some(c),
            '(' | '{' | '[' | '<' => self.depth += 1,
            ')' | '}' | ']' => self.depth -= 1,
            '>' if self.previous != Some('=') => self.depth -= 1,
            _ => {}
        }
        self.previous = Some(c);
    }

    /// Consume a run of text
    pub fn feed(&mut self, text: &str) {
        for c in text.chars() {
            self.advance(c);
        }
    }
}

/// Number of `|` separators outside any bracket or string
pub fn count_top_level_pipes(text: &str) -> usize {
    let mut depth = BracketDepth::default();
    let mut count = 0;
    for c in text.chars() {
        if c == '|' && depth.is_top_level() {
            count += 1;
        }
        depth.advance(c);
    }
    count
}

/// Coarse shape of a type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeShape {
    pub is_union: bool,
    pub is_function: bool,
    pub is_object: bool,
    pub is_array: bool,
    pub is_tuple: bool,
    /// Top-level union separators
    pub separators: usize,
}

impl TypeShape {
    /// Classify rendered text given the text of its keyword spans
    pub fn classify<I, S>(text: &str, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let trimmed = text.trim();
        let separators = count_top_level_pipes(trimmed);
        let is_array = trimmed.ends_with("[]");
        Self {
            is_union: separators > 0,
            is_function: keywords.into_iter().any(|k| k.as_ref().contains("=>")),
            is_object: trimmed.starts_with('{') && trimmed.ends_with('}'),
            is_array,
            is_tuple: !is_array && trimmed.starts_with('[') && trimmed.ends_with(']'),
            separators,
        }
    }

    /// Classify a styled tree from its plain text and keyword spans
    pub fn from_styled(tree: &StyledTree) -> Self {
        Self::from_styled_text(tree, &tree.plain_text())
    }

    /// Classify `text` (the tree's plain text, possibly trimmed) using the tree's keyword spans
    pub fn from_styled_text(tree: &StyledTree, text: &str) -> Self {
        let keywords = tree
            .spans_with_role(StyleRole::Keyword)
            .into_iter()
            .map(|span| span.text_content());
        Self::classify(text, keywords)
    }

    /// Classify a node by the shape its inline rendering takes
    ///
    /// Aliased nodes render as a name and so have no shape. With
    /// `strip_undefined`, `undefined` members of a union are ignored.
    /// Union members are flattened and deduplicated the way inline
    /// formatting does, so the separator count matches the rendered text.
    pub fn from_node(node: &TypeNode, strip_undefined: bool) -> Self {
        match node {
            TypeNode::Union {
                members,
                alias: None,
            } => {
                let registry = NameRegistry::new();
                let formatter = InlineFormatter::new(&registry);
                let mut leaves: IndexMap<String, &TypeNode> = IndexMap::new();
                for member in union_members(members) {
                    if strip_undefined && member.is_undefined() {
                        continue;
                    }
                    leaves.entry(formatter.format_member(member)).or_insert(member);
                }

                if leaves.len() == 1 {
                    return leaves
                        .values()
                        .next()
                        .map_or_else(Self::default, |single| Self::from_node(single, false));
                }
                let text: Vec<&str> = leaves.keys().map(String::as_str).collect();
                let separators = count_top_level_pipes(&text.join(" | "));
                Self {
                    is_union: separators > 0,
                    separators,
                    ..Self::default()
                }
            }
            TypeNode::Function { alias, .. }
                if alias
                    .as_ref()
                    .map_or(true, |a| SYNTHETIC_ALIAS.is_match(&a.simple_name)) =>
            {
                Self {
                    is_function: true,
                    ..Self::default()
                }
            }
            TypeNode::Object { alias: None, .. } => Self {
                is_object: true,
                ..Self::default()
            },
            TypeNode::Array { .. } => Self {
                is_array: true,
                ..Self::default()
            },
            TypeNode::Tuple { alias: None, .. } => Self {
                is_tuple: true,
                ..Self::default()
            },
            TypeNode::TypeParameter {
                constraint: Some(constraint),
                ..
            } => Self::from_node(constraint, strip_undefined),
            _ => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::format_type;
    use crate::styled::{render, RenderMode};
    use crate::test::types;
    use crate::types::{QualifiedName, SignatureParameter};
    use pretty_assertions::assert_eq;

    fn shape(text: &str) -> TypeShape {
        TypeShape::from_styled(&render(text, RenderMode::Inline))
    }

    #[test]
    fn test_bracket_depth_ignores_arrows_and_strings() {
        let mut depth = BracketDepth::default();
        depth.feed("(a: string) => void");
        assert!(depth.is_top_level());
        depth.feed("'(<'");
        assert!(depth.is_top_level());
        depth.feed("Foo<");
        assert!(!depth.is_top_level());
    }

    #[test]
    fn test_count_top_level_pipes() {
        assert_eq!(count_top_level_pipes("a | b | c"), 2);
        assert_eq!(count_top_level_pipes("{ a: 'x' | 'y' } | Foo<A | B>"), 1);
        assert_eq!(count_top_level_pipes("'a|b'"), 0);
        assert_eq!(count_top_level_pipes("(() => a | b)[]"), 0);
    }

    #[test]
    fn test_classify_text() {
        assert_eq!(
            shape("'a' | 'b'"),
            TypeShape {
                is_union: true,
                separators: 1,
                ..TypeShape::default()
            }
        );
        assert!(shape("(value: string) => void").is_function);
        assert!(!shape("'=>'").is_function);
        assert!(shape("{ a: string }").is_object);
        assert!(shape("string[]").is_array);
        assert!(!shape("string[]").is_tuple);
        assert!(shape("[string, number]").is_tuple);
    }

    #[test]
    fn test_classify_node() {
        let union = TypeNode::union(vec![TypeNode::string(), TypeNode::number(), TypeNode::undefined()]);
        assert_eq!(TypeShape::from_node(&union, false).separators, 2);
        assert_eq!(TypeShape::from_node(&union, true).separators, 1);

        let callback = TypeNode::union(vec![
            TypeNode::function(vec![SignatureParameter::new("open", TypeNode::boolean())], TypeNode::void()),
            TypeNode::undefined(),
        ]);
        let stripped = TypeShape::from_node(&callback, true);
        assert!(stripped.is_function);
        assert!(!stripped.is_union);

        let aliased = TypeNode::union(vec![TypeNode::string(), TypeNode::number()])
            .aliased(QualifiedName::new("Side"));
        assert_eq!(TypeShape::from_node(&aliased, false), TypeShape::default());
    }

    #[test]
    fn test_node_and_text_separators_agree() {
        let registry = NameRegistry::new();
        let nodes = vec![
            TypeNode::union(vec![
                TypeNode::string(),
                TypeNode::TypeParameter {
                    name: "T".into(),
                    constraint: Some(Box::new(types::string_literals(&["alpha", "beta", "gamma"]))),
                },
            ]),
            TypeNode::union(vec![
                TypeNode::string(),
                TypeNode::union(vec![TypeNode::number(), TypeNode::string()]),
                TypeNode::named("Side"),
                TypeNode::named("Side"),
            ]),
        ];
        for node in &nodes {
            let text = format_type(node, false, false, &registry, None);
            assert_eq!(TypeShape::from_node(node, false).separators, shape(&text).separators);
        }
        assert_eq!(TypeShape::from_node(&nodes[0], false).separators, 3);
        assert_eq!(TypeShape::from_node(&nodes[1], false).separators, 2);
    }
}

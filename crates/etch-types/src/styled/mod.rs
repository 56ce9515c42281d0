//! Syntax-highlighted type trees
//!
//! A [`StyledTree`] is the rendered form of a piece of type text: nested
//! elements tagged with a [`StyleRole`], with raw text at the leaves. Only
//! text extraction and span splicing interpret the structure; everything else
//! treats it as opaque output for HTML, JSON, or a terminal.

pub mod highlight;
pub mod reflow;
pub mod terminal;

pub use highlight::{render, render_with, Highlighter, TypeScriptHighlighter};
pub use reflow::reflow_union;

use html_escape::{encode_double_quoted_attribute, encode_text};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Style role of a highlighted token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StyleRole {
    /// Type keywords and operators
    Keyword,
    /// Type names
    Entity,
    /// String literals
    String,
    /// Numbers, booleans, `null`, `undefined`
    Constant,
    /// Property and parameter names
    Parameter,
    /// Brackets and separators
    Punctuation,
}

impl StyleRole {
    /// CSS class emitted for the role
    pub fn class_name(&self) -> &'static str {
        match self {
            StyleRole::Keyword => "pl-k",
            StyleRole::Entity => "pl-en",
            StyleRole::String => "pl-s",
            StyleRole::Constant => "pl-c1",
            StyleRole::Parameter => "pl-v",
            StyleRole::Punctuation => "pl-p",
        }
    }
}

/// Element tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementTag {
    Pre,
    Code,
    Span,
    Br,
}

impl ElementTag {
    fn as_str(&self) -> &'static str {
        match self {
            ElementTag::Pre => "pre",
            ElementTag::Code => "code",
            ElementTag::Span => "span",
            ElementTag::Br => "br",
        }
    }
}

/// Element of a styled tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyledElement {
    pub tag: ElementTag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<StyleRole>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<StyledNode>,
}

/// Node of a styled tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StyledNode {
    Element(StyledElement),
    Text { value: String },
}

/// How a tree was rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RenderMode {
    /// One highlighted span inside `code`
    Inline,
    /// `pre > code` listing, one span per line
    Detailed,
}

/// Rendered, syntax-highlighted type text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyledTree {
    pub mode: RenderMode,
    pub root: StyledElement,
}

impl StyledElement {
    /// Element with no role or properties
    pub fn new(tag: ElementTag, children: Vec<StyledNode>) -> Self {
        Self {
            tag,
            role: None,
            properties: IndexMap::new(),
            children,
        }
    }

    /// Highlighted token span
    pub fn token(role: StyleRole, text: impl Into<String>) -> Self {
        Self {
            tag: ElementTag::Span,
            role: Some(role),
            properties: IndexMap::new(),
            children: vec![StyledNode::text(text)],
        }
    }

    /// Line break
    pub fn line_break() -> Self {
        Self::new(ElementTag::Br, Vec::new())
    }

    /// Add a property
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Concatenated text of all descendants; `br` reads as a newline
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.push_text(&mut out);
        out
    }

    fn push_text(&self, out: &mut String) {
        if self.tag == ElementTag::Br {
            out.push('\n');
            return;
        }
        for child in &self.children {
            match child {
                StyledNode::Element(element) => element.push_text(out),
                StyledNode::Text { value } => out.push_str(value),
            }
        }
    }

    /// Descendant element at a child-index path
    pub fn element_at(&self, path: &[usize]) -> Option<&StyledElement> {
        path.iter().try_fold(self, |element, &index| match element.children.get(index) {
            Some(StyledNode::Element(child)) => Some(child),
            _ => None,
        })
    }

    /// Mutable descendant element at a child-index path
    pub fn element_at_mut(&mut self, path: &[usize]) -> Option<&mut StyledElement> {
        let mut element = self;
        for &index in path {
            element = match element.children.get_mut(index) {
                Some(StyledNode::Element(child)) => child,
                _ => return None,
            };
        }
        Some(element)
    }

    fn write_html(&self, out: &mut String) {
        let tag = self.tag.as_str();
        out.push('<');
        out.push_str(tag);
        if let Some(role) = self.role {
            out.push_str(" class=\"");
            out.push_str(role.class_name());
            out.push('"');
        }
        for (key, value) in &self.properties {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&encode_double_quoted_attribute(value));
            out.push('"');
        }
        out.push('>');
        if self.tag == ElementTag::Br {
            return;
        }
        for child in &self.children {
            match child {
                StyledNode::Element(element) => element.write_html(out),
                StyledNode::Text { value } => out.push_str(&encode_text(value)),
            }
        }
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }
}

impl StyledNode {
    /// Raw text node
    pub fn text(value: impl Into<String>) -> Self {
        StyledNode::Text {
            value: value.into(),
        }
    }

    /// Concatenated text of the node
    pub fn text_content(&self) -> String {
        match self {
            StyledNode::Element(element) => element.text_content(),
            StyledNode::Text { value } => value.clone(),
        }
    }

    /// Role of the node, if it is a highlighted element
    pub fn role(&self) -> Option<StyleRole> {
        match self {
            StyledNode::Element(element) => element.role,
            StyledNode::Text { .. } => None,
        }
    }
}

impl From<StyledElement> for StyledNode {
    fn from(element: StyledElement) -> Self {
        StyledNode::Element(element)
    }
}

impl StyledTree {
    /// Plain text of the whole tree
    pub fn plain_text(&self) -> String {
        self.root.text_content()
    }

    /// The top-level highlighted span of an inline tree
    pub fn line_span(&self) -> Option<&StyledElement> {
        match self.mode {
            RenderMode::Inline => self.root.element_at(&[0]),
            RenderMode::Detailed => None,
        }
    }

    /// Mutable top-level span of an inline tree
    pub fn line_span_mut(&mut self) -> Option<&mut StyledElement> {
        match self.mode {
            RenderMode::Inline => self.root.element_at_mut(&[0]),
            RenderMode::Detailed => None,
        }
    }

    /// Token nodes to splice in when this tree is used as a definition
    pub fn content_nodes(&self) -> Vec<StyledNode> {
        match self.mode {
            RenderMode::Inline => self
                .line_span()
                .map(|span| span.children.clone())
                .unwrap_or_default(),
            RenderMode::Detailed => {
                let lines = self
                    .root
                    .element_at(&[0])
                    .map(|code| code.children.as_slice())
                    .unwrap_or_default();
                lines
                    .iter()
                    .flat_map(|node| match node {
                        StyledNode::Element(line) => line.children.clone(),
                        StyledNode::Text { .. } => vec![node.clone()],
                    })
                    .collect()
            }
        }
    }

    /// All elements carrying `role`, in document order
    pub fn spans_with_role(&self, role: StyleRole) -> Vec<&StyledElement> {
        fn walk<'t>(element: &'t StyledElement, role: StyleRole, out: &mut Vec<&'t StyledElement>) {
            if element.role == Some(role) {
                out.push(element);
            }
            for child in &element.children {
                if let StyledNode::Element(child) = child {
                    walk(child, role, out);
                }
            }
        }

        let mut out = Vec::new();
        walk(&self.root, role, &mut out);
        out
    }

    /// Render as HTML
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.root.write_html(&mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> StyledTree {
        StyledTree {
            mode: RenderMode::Inline,
            root: StyledElement::new(
                ElementTag::Code,
                vec![StyledElement::new(
                    ElementTag::Span,
                    vec![
                        StyledElement::token(StyleRole::Entity, "Array").into(),
                        StyledElement::token(StyleRole::Punctuation, "<").into(),
                        StyledElement::token(StyleRole::String, "\"a&b\"").into(),
                        StyledElement::token(StyleRole::Punctuation, ">").into(),
                    ],
                )
                .into()],
            ),
        }
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(sample().plain_text(), "Array<\"a&b\">");
    }

    #[test]
    fn test_to_html_escapes_text() {
        assert_eq!(
            sample().to_html(),
            "<code><span><span class=\"pl-en\">Array</span><span class=\"pl-p\">&lt;</span>\
             <span class=\"pl-s\">\"a&amp;b\"</span><span class=\"pl-p\">&gt;</span></span></code>"
        );
    }

    #[test]
    fn test_line_break_reads_as_newline() {
        let element = StyledElement::new(
            ElementTag::Span,
            vec![
                StyledNode::text("a"),
                StyledElement::line_break().into(),
                StyledNode::text("b"),
            ],
        );
        assert_eq!(element.text_content(), "a\nb");
    }

    #[test]
    fn test_element_paths() {
        let mut tree = sample();
        assert_eq!(
            tree.root.element_at(&[0, 2]).map(StyledElement::text_content),
            Some("\"a&b\"".to_string())
        );
        assert!(tree.root.element_at(&[0, 9]).is_none());
        if let Some(span) = tree.line_span_mut() {
            span.children.truncate(1);
        }
        assert_eq!(tree.plain_text(), "Array");
    }

    #[test]
    fn test_serializes_as_tagged_json() {
        let json = serde_json::to_value(StyledNode::text("x")).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "text", "value": "x" }));
        let tree = sample();
        let round = serde_json::from_str::<StyledTree>(&serde_json::to_string(&tree).unwrap())
            .unwrap();
        assert_eq!(round, tree);
    }
}

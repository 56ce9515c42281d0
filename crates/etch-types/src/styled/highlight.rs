//! TypeScript type-expression highlighting

use super::{ElementTag, RenderMode, StyleRole, StyledElement, StyledNode, StyledTree};

/// Turns type text into highlighted token nodes
pub trait Highlighter: Send + Sync {
    /// Tokenize `text`; concatenating the nodes' text yields `text` again
    fn highlight(&self, text: &str) -> Vec<StyledNode>;
}

/// Highlighter for TypeScript type expressions
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeScriptHighlighter;

const KEYWORDS: &[&str] = &[
    "abstract", "any", "asserts", "bigint", "boolean", "const", "extends", "in", "infer", "is",
    "keyof", "never", "new", "number", "object", "out", "readonly", "string", "symbol", "type",
    "typeof", "unique", "unknown", "void",
];

const CONSTANTS: &[&str] = &["false", "null", "this", "true", "undefined"];

/// Tokens after which an identifier followed by `:` names a property or parameter
const NAME_POSITIONS: &[&str] = &["{", "(", ",", ";", "readonly", "..."];

#[derive(Default)]
struct TokenSink {
    nodes: Vec<StyledNode>,
    last_significant: Option<String>,
}

impl TokenSink {
    fn raw(&mut self, text: &str) {
        if let Some(StyledNode::Text { value }) = self.nodes.last_mut() {
            value.push_str(text);
        } else {
            self.nodes.push(StyledNode::text(text));
        }
        if !text.trim().is_empty() {
            self.last_significant = Some(text.trim().to_string());
        }
    }

    fn token(&mut self, role: StyleRole, text: String) {
        self.last_significant = Some(text.clone());
        self.nodes.push(StyledElement::token(role, text).into());
    }

    fn in_name_position(&self) -> bool {
        match &self.last_significant {
            None => true,
            Some(last) => NAME_POSITIONS.contains(&last.as_str()),
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Whether the next non-whitespace characters are `:` or `?:`
fn followed_by_colon(chars: &[char], from: usize) -> bool {
    let mut rest = chars[from..].iter().filter(|c| !c.is_whitespace());
    match rest.next() {
        Some(':') => true,
        Some('?') => rest.next() == Some(&':'),
        _ => false,
    }
}

impl Highlighter for TypeScriptHighlighter {
    fn highlight(&self, text: &str) -> Vec<StyledNode> {
        let chars: Vec<char> = text.chars().collect();
        let len = chars.len();
        let slice = |start: usize, end: usize| chars[start..end].iter().collect::<String>();
        let mut sink = TokenSink::default();
        let mut i = 0;

        while i < len {
            let c = chars[i];
            let next = chars.get(i + 1).copied();

            if c.is_whitespace() {
                let start = i;
                while i < len && chars[i].is_whitespace() {
                    i += 1;
                }
                sink.raw(&slice(start, i));
                continue;
            }

            if c == '"' || c == '\'' || c == '`' {
                let start = i;
                i += 1;
                while i < len {
                    if chars[i] == '\\' {
                        i += 2;
                        continue;
                    }
                    i += 1;
                    if chars[i - 1] == c {
                        break;
                    }
                }
                sink.token(StyleRole::String, slice(start, i.min(len)));
                i = i.min(len);
                continue;
            }

            if c.is_ascii_digit() || (c == '-' && next.is_some_and(|n| n.is_ascii_digit())) {
                let start = i;
                i += 1;
                while i < len && (chars[i].is_ascii_alphanumeric() || chars[i] == '.' || chars[i] == '_') {
                    i += 1;
                }
                sink.token(StyleRole::Constant, slice(start, i));
                continue;
            }

            if is_ident_start(c) {
                let start = i;
                while i < len && is_ident_part(chars[i]) {
                    i += 1;
                }
                let word = slice(start, i);
                let role = if sink.in_name_position() && followed_by_colon(&chars, i) {
                    StyleRole::Parameter
                } else if CONSTANTS.contains(&word.as_str()) {
                    StyleRole::Constant
                } else if KEYWORDS.contains(&word.as_str()) {
                    StyleRole::Keyword
                } else {
                    StyleRole::Entity
                };
                sink.token(role, word);
                continue;
            }

            match c {
                '=' if next == Some('>') => {
                    sink.token(StyleRole::Keyword, "=>".to_string());
                    i += 2;
                }
                '.' if next == Some('.') && chars.get(i + 2) == Some(&'.') => {
                    sink.token(StyleRole::Keyword, "...".to_string());
                    i += 3;
                }
                '|' | '&' | '?' | '=' => {
                    sink.token(StyleRole::Keyword, c.to_string());
                    i += 1;
                }
                '(' | ')' | '{' | '}' | '[' | ']' | '<' | '>' | ',' | ';' | ':' => {
                    sink.token(StyleRole::Punctuation, c.to_string());
                    i += 1;
                }
                _ => {
                    sink.raw(&c.to_string());
                    i += 1;
                }
            }
        }

        sink.nodes
    }
}

/// Render type text with the default highlighter
pub fn render(text: &str, mode: RenderMode) -> StyledTree {
    render_with(&TypeScriptHighlighter, text, mode)
}

/// Render type text with a caller-supplied highlighter
pub fn render_with(highlighter: &dyn Highlighter, text: &str, mode: RenderMode) -> StyledTree {
    let tokens = highlighter.highlight(text);

    let root = match mode {
        RenderMode::Inline => StyledElement::new(
            ElementTag::Code,
            vec![StyledElement::new(ElementTag::Span, tokens).into()],
        ),
        RenderMode::Detailed => {
            let lines = split_lines(tokens);
            let digits = lines.len().to_string().len();
            let mut children = Vec::with_capacity(lines.len() * 2);
            for (index, line) in lines.into_iter().enumerate() {
                if index > 0 {
                    children.push(StyledNode::text("\n"));
                }
                children.push(
                    StyledElement::new(ElementTag::Span, line)
                        .with_property("class", "line")
                        .with_property("data-line", (index + 1).to_string())
                        .into(),
                );
            }
            StyledElement::new(
                ElementTag::Pre,
                vec![StyledElement::new(ElementTag::Code, children).into()],
            )
            .with_property("data-line-numbers", "")
            .with_property("data-line-numbers-max-digits", digits.to_string())
        }
    };

    StyledTree { mode, root }
}

/// Split a token stream at the newlines inside raw text nodes
fn split_lines(tokens: Vec<StyledNode>) -> Vec<Vec<StyledNode>> {
    let mut lines = vec![Vec::new()];
    for token in tokens {
        match token {
            StyledNode::Text { value } if value.contains('\n') => {
                let mut parts = value.split('\n');
                if let Some(first) = parts.next() {
                    if !first.is_empty() {
                        push_current(&mut lines, StyledNode::text(first));
                    }
                }
                for part in parts {
                    lines.push(Vec::new());
                    if !part.is_empty() {
                        push_current(&mut lines, StyledNode::text(part));
                    }
                }
            }
            other => push_current(&mut lines, other),
        }
    }
    lines
}

fn push_current(lines: &mut [Vec<StyledNode>], node: StyledNode) {
    if let Some(line) = lines.last_mut() {
        line.push(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn roles(text: &str) -> Vec<(Option<StyleRole>, String)> {
        TypeScriptHighlighter
            .highlight(text)
            .iter()
            .map(|node| (node.role(), node.text_content()))
            .collect()
    }

    #[test]
    fn test_highlight_preserves_text() {
        let text = "{ \"data-state\"?: 'open' | 'closed'; count: -1 } & Foo.Bar<T>[]";
        let joined: String = TypeScriptHighlighter
            .highlight(text)
            .iter()
            .map(StyledNode::text_content)
            .collect();
        assert_eq!(joined, text);
    }

    #[test]
    fn test_highlight_roles() {
        use StyleRole::*;
        assert_eq!(
            roles("(event: Event) => void | null"),
            vec![
                (Some(Punctuation), "(".to_string()),
                (Some(Parameter), "event".to_string()),
                (Some(Punctuation), ":".to_string()),
                (None, " ".to_string()),
                (Some(Entity), "Event".to_string()),
                (Some(Punctuation), ")".to_string()),
                (None, " ".to_string()),
                (Some(Keyword), "=>".to_string()),
                (None, " ".to_string()),
                (Some(Keyword), "void".to_string()),
                (None, " ".to_string()),
                (Some(Keyword), "|".to_string()),
                (None, " ".to_string()),
                (Some(Constant), "null".to_string()),
            ]
        );
    }

    #[test]
    fn test_dotted_names_keep_raw_dots() {
        use StyleRole::*;
        assert_eq!(
            roles("Accordion.Root.Props"),
            vec![
                (Some(Entity), "Accordion".to_string()),
                (None, ".".to_string()),
                (Some(Entity), "Root".to_string()),
                (None, ".".to_string()),
                (Some(Entity), "Props".to_string()),
            ]
        );
    }

    #[test]
    fn test_property_names_and_conditional_branches() {
        use StyleRole::*;
        let tokens = roles("{ type?: string }");
        assert_eq!(tokens[2], (Some(Parameter), "type".to_string()));
        assert_eq!(tokens[3], (Some(Keyword), "?".to_string()));

        let tokens = roles("T extends U ? string : number");
        assert!(tokens.contains(&(Some(Keyword), "string".to_string())));
        assert!(!tokens.iter().any(|(role, _)| *role == Some(Parameter)));
    }

    #[test]
    fn test_unterminated_string_runs_to_end() {
        assert_eq!(
            roles("'open"),
            vec![(Some(StyleRole::String), "'open".to_string())]
        );
    }

    #[test]
    fn test_render_inline() {
        let tree = render("string", RenderMode::Inline);
        assert_eq!(tree.to_html(), "<code><span><span class=\"pl-k\">string</span></span></code>");
        assert_eq!(tree.content_nodes().len(), 1);
    }

    #[test]
    fn test_render_detailed_lines() {
        let tree = render("{\n  a: string;\n}", RenderMode::Detailed);
        assert_eq!(tree.plain_text(), "{\n  a: string;\n}");
        assert_eq!(
            tree.root.properties.get("data-line-numbers-max-digits"),
            Some(&"1".to_string())
        );
        let code = tree.root.element_at(&[0]).unwrap();
        let lines: Vec<_> = code
            .children
            .iter()
            .filter_map(|node| match node {
                StyledNode::Element(line) => line.properties.get("data-line").cloned(),
                StyledNode::Text { .. } => None,
            })
            .collect();
        assert_eq!(lines, vec!["1", "2", "3"]);
    }
}

//! Splitting long unions across lines
//!
//! A union wider than the target width is re-emitted one member per line,
//! each line starting with a highlighted `| ` marker.

use super::{StyleRole, StyledElement, StyledNode, StyledTree};
use crate::analysis::classify::BracketDepth;

/// Reflow the top-level union of an inline tree
///
/// Returns the tree unchanged unless `original_text` contains `|`, is longer
/// than `width`, and has at least one top-level separator.
pub fn reflow_union(tree: &StyledTree, original_text: &str, width: usize) -> StyledTree {
    if !original_text.contains('|') || original_text.chars().count() <= width {
        return tree.clone();
    }

    let Some(span) = tree.line_span() else {
        return tree.clone();
    };

    let mut depth = BracketDepth::default();
    let mut groups: Vec<Vec<StyledNode>> = vec![Vec::new()];
    for (index, child) in span.children.iter().enumerate() {
        let text = child.text_content();
        if index > 0 && text.trim() == "|" && depth.is_top_level() {
            groups.push(Vec::new());
            continue;
        }
        depth.feed(&text);
        if let Some(group) = groups.last_mut() {
            group.push(child.clone());
        }
    }

    if groups.len() < 2 {
        return tree.clone();
    }

    let mut children = Vec::new();
    for (index, group) in groups.into_iter().enumerate() {
        if index > 0 {
            children.push(StyledElement::line_break().into());
        }
        children.push(marker());
        children.extend(trim_group(group, index == 0));
    }

    let mut reflowed = tree.clone();
    if let Some(span) = reflowed.line_span_mut() {
        span.children = children;
    }
    reflowed
}

fn marker() -> StyledNode {
    StyledElement::token(StyleRole::Keyword, "| ").into()
}

fn is_blank(node: &StyledNode) -> bool {
    matches!(node, StyledNode::Text { value } if value.trim().is_empty())
}

/// Drop whitespace at both edges, and a leading `|` of the first group
fn trim_group(mut group: Vec<StyledNode>, first: bool) -> Vec<StyledNode> {
    while group.last().is_some_and(is_blank) {
        group.pop();
    }
    let mut start = 0;
    while start < group.len() {
        let node = &group[start];
        if is_blank(node) || (first && node.text_content().trim() == "|") {
            start += 1;
        } else {
            break;
        }
    }
    group.split_off(start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styled::{render, RenderMode};
    use pretty_assertions::assert_eq;

    fn reflow(text: &str, width: usize) -> StyledTree {
        reflow_union(&render(text, RenderMode::Inline), text, width)
    }

    #[test]
    fn test_short_text_is_unchanged() {
        let text = "'a' | 'b'";
        assert_eq!(reflow(text, 40), render(text, RenderMode::Inline));
    }

    #[test]
    fn test_text_exactly_at_width_is_unchanged() {
        let text = "'a' | 'b' | 'c'";
        assert_eq!(text.chars().count(), 15);
        assert_eq!(reflow(text, 15), render(text, RenderMode::Inline));
        assert_eq!(reflow(text, 14).plain_text(), "| 'a'\n| 'b'\n| 'c'");
    }

    #[test]
    fn test_text_without_pipes_is_unchanged() {
        let text = "Record<string, { open: boolean; reason: string }>";
        assert_eq!(reflow(text, 10), render(text, RenderMode::Inline));
    }

    #[test]
    fn test_splits_at_top_level_pipes_only() {
        let text = "{ side: 'top' | 'bottom' } | Foo<A | B> | (() => void)";
        assert_eq!(
            reflow(text, 20).plain_text(),
            "| { side: 'top' | 'bottom' }\n| Foo<A | B>\n| (() => void)"
        );
    }

    #[test]
    fn test_markers_are_keywords_and_breaks_are_elements() {
        let tree = reflow("'alpha' | 'beta' | 'gamma'", 10);
        let span = tree.line_span().unwrap();
        assert_eq!(span.children[0].role(), Some(StyleRole::Keyword));
        assert_eq!(span.children[0].text_content(), "| ");
        assert!(span.children.iter().any(
            |node| matches!(node, StyledNode::Element(e) if e.tag == crate::styled::ElementTag::Br)
        ));
        assert_eq!(tree.plain_text(), "| 'alpha'\n| 'beta'\n| 'gamma'");
    }

    #[test]
    fn test_pipes_inside_strings_do_not_split() {
        let text = "'a | b' | 'c | d' | 'e'";
        assert_eq!(reflow(text, 5).plain_text(), "| 'a | b'\n| 'c | d'\n| 'e'");
    }
}

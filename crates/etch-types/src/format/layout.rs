//! Width-aware layout documents
//!
//! A small Wadler-style document algebra: groups print flat when their
//! contents (and whatever follows up to the next possible break) fit in the
//! remaining width, and break every line of the group otherwise.

/// Layout document
#[derive(Debug, Clone, PartialEq)]
pub enum Doc {
    /// Literal text, never broken
    Text(String),
    /// A space when flat, a newline when broken
    Line,
    /// Nothing when flat, a newline when broken
    SoftLine,
    /// Contents printed flat if they fit
    Group(Box<Doc>),
    /// Contents indented by one level when broken
    Indent(Box<Doc>),
    /// Different contents depending on the enclosing group's mode
    IfBreak { broken: Box<Doc>, flat: Box<Doc> },
    /// Sequence
    Concat(Vec<Doc>),
}

/// Indentation per nesting level
const INDENT_WIDTH: usize = 2;

impl Doc {
    /// Literal text
    pub fn text(text: impl Into<String>) -> Self {
        Doc::Text(text.into())
    }

    /// Sequence of documents
    pub fn concat(parts: Vec<Doc>) -> Self {
        Doc::Concat(parts)
    }

    /// Group
    pub fn group(inner: Doc) -> Self {
        Doc::Group(Box::new(inner))
    }

    /// Indented block
    pub fn indent(inner: Doc) -> Self {
        Doc::Indent(Box::new(inner))
    }

    /// Text emitted only when the enclosing group breaks
    pub fn if_break(text: &str) -> Self {
        Doc::IfBreak {
            broken: Box::new(Doc::text(text)),
            flat: Box::new(Doc::text("")),
        }
    }

    /// Interleave `docs` with copies of `separator`
    pub fn join(docs: Vec<Doc>, separator: Doc) -> Self {
        let mut parts = Vec::with_capacity(docs.len() * 2);
        for (index, doc) in docs.into_iter().enumerate() {
            if index > 0 {
                parts.push(separator.clone());
            }
            parts.push(doc);
        }
        Doc::Concat(parts)
    }

    /// Width of the document printed entirely flat
    pub fn flat_width(&self) -> usize {
        match self {
            Doc::Text(text) => text.chars().count(),
            Doc::Line => 1,
            Doc::SoftLine => 0,
            Doc::Group(inner) | Doc::Indent(inner) => inner.flat_width(),
            Doc::IfBreak { flat, .. } => flat.flat_width(),
            Doc::Concat(parts) => parts.iter().map(Doc::flat_width).sum(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Flat,
    Break,
}

type Command<'d> = (usize, Mode, &'d Doc);

/// Print a document at the given width
pub fn print(doc: &Doc, width: usize) -> String {
    let mut out = String::new();
    let mut column = 0usize;
    let mut stack: Vec<Command<'_>> = vec![(0, Mode::Break, doc)];

    while let Some((indent, mode, doc)) = stack.pop() {
        match doc {
            Doc::Text(text) => {
                out.push_str(text);
                column += text.chars().count();
            }
            Doc::Line | Doc::SoftLine => match mode {
                Mode::Flat => {
                    if matches!(doc, Doc::Line) {
                        out.push(' ');
                        column += 1;
                    }
                }
                Mode::Break => {
                    let trimmed = out.trim_end_matches(' ').len();
                    out.truncate(trimmed);
                    out.push('\n');
                    out.push_str(&" ".repeat(indent));
                    column = indent;
                }
            },
            Doc::Group(inner) => {
                let next_mode = match mode {
                    Mode::Flat => Mode::Flat,
                    Mode::Break => {
                        let remaining = width as isize - column as isize;
                        if fits((indent, Mode::Flat, inner), &stack, remaining) {
                            Mode::Flat
                        } else {
                            Mode::Break
                        }
                    }
                };
                stack.push((indent, next_mode, inner));
            }
            Doc::Indent(inner) => stack.push((indent + INDENT_WIDTH, mode, inner)),
            Doc::IfBreak { broken, flat } => {
                let chosen = if mode == Mode::Break { broken } else { flat };
                stack.push((indent, mode, chosen));
            }
            Doc::Concat(parts) => {
                for part in parts.iter().rev() {
                    stack.push((indent, mode, part));
                }
            }
        }
    }

    out
}

/// Whether `next`, followed by the pending commands, fits before the next break
fn fits(next: Command<'_>, rest: &[Command<'_>], mut remaining: isize) -> bool {
    let mut pending: Vec<(Mode, &Doc)> = vec![(next.1, next.2)];
    let mut rest_index = rest.len();

    loop {
        if remaining < 0 {
            return false;
        }
        let (mode, doc) = match pending.pop() {
            Some(command) => command,
            None => {
                if rest_index == 0 {
                    return true;
                }
                rest_index -= 1;
                let (_, mode, doc) = rest[rest_index];
                (mode, doc)
            }
        };

        match doc {
            Doc::Text(text) => remaining -= text.chars().count() as isize,
            Doc::Line | Doc::SoftLine => {
                if mode == Mode::Break {
                    return true;
                }
                if matches!(doc, Doc::Line) {
                    remaining -= 1;
                }
            }
            Doc::Group(inner) | Doc::Indent(inner) => pending.push((mode, inner)),
            Doc::IfBreak { broken, flat } => {
                pending.push((mode, if mode == Mode::Break { broken } else { flat }));
            }
            Doc::Concat(parts) => {
                for part in parts.iter().rev() {
                    pending.push((mode, part));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn list(items: &[&str]) -> Doc {
        Doc::group(Doc::concat(vec![
            Doc::text("["),
            Doc::indent(Doc::concat(vec![
                Doc::SoftLine,
                Doc::join(
                    items.iter().map(|i| Doc::text(*i)).collect(),
                    Doc::concat(vec![Doc::text(","), Doc::Line]),
                ),
                Doc::if_break(","),
            ])),
            Doc::SoftLine,
            Doc::text("]"),
        ]))
    }

    #[test]
    fn test_group_stays_flat_when_it_fits() {
        let doc = list(&["alpha", "beta"]);
        assert_eq!(doc.flat_width(), 13);
        assert_eq!(print(&doc, 20), "[alpha, beta]");
    }

    #[test]
    fn test_group_breaks_when_too_wide() {
        let doc = list(&["alpha", "beta"]);
        assert_eq!(print(&doc, 10), "[\n  alpha,\n  beta,\n]");
    }

    #[test]
    fn test_trailing_text_counts_toward_fit() {
        let doc = Doc::concat(vec![list(&["a", "b"]), Doc::text(" // trailing")]);
        assert_eq!(print(&doc, 8), "[\n  a,\n  b,\n] // trailing");
        assert_eq!(print(&doc, 40), "[a, b] // trailing");
    }

    #[test]
    fn test_nested_groups_break_independently() {
        let doc = list(&["x"]);
        let outer = Doc::group(Doc::concat(vec![
            Doc::text("outer("),
            Doc::indent(Doc::concat(vec![Doc::SoftLine, doc, Doc::text(", "), Doc::text("yyyy")])),
            Doc::SoftLine,
            Doc::text(")"),
        ]));
        assert_eq!(print(&outer, 12), "outer(\n  [x], yyyy\n)");
    }
}

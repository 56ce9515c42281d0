//! Width-constrained pretty printing of type text
//!
//! Type text is wrapped as `type _ = <text>;`, parsed, and laid out at
//! the requested width. Printing runs twice so that the output is a fixed
//! point of the printer. Any failure leaves the input untouched.

use super::{layout, swc};
use crate::diagnostics::EtchResult;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::warn;

lazy_static! {
    static ref ALIAS_PREFIX: Regex = Regex::new(r"^type\s+[^\s=<]+(<[^=]*>)?\s*=[ \t]*").unwrap();
}

/// Placeholder alias used when the caller does not name the declaration
const PLACEHOLDER_ALIAS: &str = "_";

/// Pluggable declaration printer
pub trait TypePrinter: Send + Sync {
    /// Format a complete `type X = ...;` declaration at the given width
    fn print(&self, source: &str, print_width: usize) -> EtchResult<String>;
}

/// [`TypePrinter`] backed by deno_ast parsing and the layout engine
#[derive(Debug, Clone, Copy, Default)]
pub struct SwcTypePrinter;

impl TypePrinter for SwcTypePrinter {
    fn print(&self, source: &str, print_width: usize) -> EtchResult<String> {
        let parsed = swc::parse_declaration(source)?;
        let alias = swc::first_type_alias(&parsed)?;
        let doc = swc::alias_doc(alias)?;
        Ok(layout::print(&doc, print_width))
    }
}

/// Pretty-print type text with the default printer
pub fn pretty_format(text: &str, alias: Option<&str>, print_width: usize) -> String {
    pretty_format_with(&SwcTypePrinter, text, alias, print_width)
}

/// Pretty-print type text with a caller-supplied printer
///
/// The `type X = ` prefix is kept only when `alias` is given and the result
/// spans several lines. Never fails: if the printer rejects the text, it is
/// returned unchanged.
pub fn pretty_format_with(
    printer: &dyn TypePrinter,
    text: &str,
    alias: Option<&str>,
    print_width: usize,
) -> String {
    // dotted names are not valid declaration names, so the alias is applied after printing
    let source = format!("type {} = {};", PLACEHOLDER_ALIAS, text);

    let formatted = printer
        .print(&source, print_width)
        .and_then(|first| printer.print(&first, print_width));

    match formatted {
        Ok(output) => strip_declaration(&output, alias),
        Err(e) => {
            warn!(error = %e, "type formatting failed, keeping original text");
            text.to_string()
        }
    }
}

fn strip_declaration(output: &str, alias: Option<&str>) -> String {
    let trimmed = output.trim_end();
    let trimmed = trimmed.strip_suffix(';').unwrap_or(trimmed);
    let body = ALIAS_PREFIX.replace(trimmed, "");

    match alias {
        Some(alias) if trimmed.contains('\n') => {
            let separator = if body.starts_with('\n') { "" } else { " " };
            format!("type {} ={}{}", alias, separator, body)
        }
        _ => dedent(body.trim_start_matches('\n')),
    }
}

/// Remove the common leading indentation of all non-blank lines
pub fn dedent(text: &str) -> String {
    let indent = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start_matches(' ').len())
        .min()
        .unwrap_or(0);

    if indent == 0 {
        return text.to_string();
    }

    text.lines()
        .map(|line| line.get(indent..).unwrap_or_else(|| line.trim_start()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::EtchError;
    use pretty_assertions::assert_eq;

    const SIDES: &str = r#""top" | "bottom" | "left" | "right" | "inline-start""#;

    #[test]
    fn test_short_types_are_unchanged() {
        assert_eq!(pretty_format("string | number", None, 80), "string | number");
        assert_eq!(
            pretty_format("(event: { detail: string }) => void", None, 100),
            "(event: { detail: string }) => void"
        );
    }

    #[test]
    fn test_long_union_breaks_with_leading_pipes() {
        assert_eq!(
            pretty_format(SIDES, None, 40),
            "| \"top\"\n| \"bottom\"\n| \"left\"\n| \"right\"\n| \"inline-start\""
        );
    }

    #[test]
    fn test_alias_is_kept_for_multiline_output() {
        assert_eq!(
            pretty_format(SIDES, Some("Side"), 40),
            "type Side =\n  | \"top\"\n  | \"bottom\"\n  | \"left\"\n  | \"right\"\n  | \"inline-start\""
        );
        assert_eq!(pretty_format("boolean", Some("Flag"), 40), "boolean");
    }

    #[test]
    fn test_dotted_alias_is_kept_for_multiline_output() {
        assert_eq!(
            pretty_format(SIDES, Some("Popover.Positioner.Side"), 40),
            "type Popover.Positioner.Side =\n  | \"top\"\n  | \"bottom\"\n  | \"left\"\n  | \"right\"\n  | \"inline-start\""
        );
        assert_eq!(
            pretty_format("{ open: boolean; reason: string }", Some("Popover.Root.State"), 30),
            "type Popover.Root.State = {\n  open: boolean;\n  reason: string;\n}"
        );
        assert_eq!(pretty_format("boolean", Some("Switch.Root.Checked"), 40), "boolean");
    }

    #[test]
    fn test_object_breaks_one_member_per_line() {
        assert_eq!(
            pretty_format("{ open: boolean; reason: string }", None, 30),
            "{\n  open: boolean;\n  reason: string;\n}"
        );
    }

    #[test]
    fn test_nested_union_in_property_breaks_under_key() {
        let text = "{ side: 'top' | 'bottom' | 'left' | 'right'; align: Align }";
        assert_eq!(
            pretty_format(text, None, 30),
            "{\n  side:\n    | \"top\"\n    | \"bottom\"\n    | \"left\"\n    | \"right\";\n  align: Align;\n}"
        );
    }

    #[test]
    fn test_function_parameters_break_with_trailing_comma() {
        let text = "(event: ChangeEvent, details: ChangeEventDetails) => void";
        assert_eq!(
            pretty_format(text, None, 40),
            "(\n  event: ChangeEvent,\n  details: ChangeEventDetails,\n) => void"
        );
    }

    #[test]
    fn test_output_is_a_fixed_point() {
        let once = pretty_format(SIDES, None, 40);
        assert_eq!(pretty_format(&once, None, 40), once);
    }

    #[test]
    fn test_unparseable_text_is_returned_unchanged() {
        assert_eq!(pretty_format("string |", None, 40), "string |");
        assert_eq!(
            pretty_format("{ [K in Keys]: string }", None, 10),
            "{ [K in Keys]: string }"
        );
    }

    struct FailingPrinter;

    impl TypePrinter for FailingPrinter {
        fn print(&self, _source: &str, _print_width: usize) -> EtchResult<String> {
            Err(EtchError::unsupported("everything"))
        }
    }

    #[test]
    fn test_printer_failure_falls_back() {
        assert_eq!(
            pretty_format_with(&FailingPrinter, SIDES, None, 10),
            SIDES
        );
    }

    #[test]
    fn test_dedent() {
        assert_eq!(dedent("  | a\n  | b"), "| a\n| b");
        assert_eq!(dedent("{\n  a: string;\n}"), "{\n  a: string;\n}");
    }
}

//! Type text formatting
//!
//! [`inline`] turns a [`TypeNode`](crate::types::TypeNode) into single-line
//! type text, [`pretty`] re-lays that text out at a print width.

pub mod inline;
pub mod layout;
pub mod pretty;
mod swc;

pub use inline::{format_field_type, format_type, FormatOptions, InlineFormatter};
pub use pretty::{pretty_format, pretty_format_with, SwcTypePrinter, TypePrinter};

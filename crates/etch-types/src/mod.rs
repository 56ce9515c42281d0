//! etch-types: TypeScript type formatting for Forge documentation
//!
//! This crate turns extracted type information into what API reference pages
//! render for every prop, parameter and return value:
//! - Canonical single-line type text from a [`TypeNode`] tree, with flat
//!   re-exported names resolved to their dotted namespace spelling
//! - Width-constrained pretty printing of type text (deno_ast/SWC parse)
//! - Syntax-highlighted [`StyledTree`]s, inline or as a numbered listing
//! - Short labels (`Union`, `function`) for long or callable types
//! - Detailed types with referenced definitions expanded one level
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐
//! │   TypeNode   │   │ NameRegistry │
//! └──────┬───────┘   └──────┬───────┘
//!        └────────┬─────────┘
//!                 ▼
//!        ┌─────────────────┐
//!        │ inline type text│
//!        └────────┬────────┘
//!                 ▼
//!        ┌─────────────────┐    ┌─────────────┐
//!        │  TypeEnhancer   │◄───│ Definitions │
//!        └────────┬────────┘    └─────────────┘
//!     ┌───────────┼────────────┬──────────────┐
//!     ▼           ▼            ▼              ▼
//!   type      shortType     default     detailedType
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use etch_types::{Definitions, EnhanceConfig, FormattedField, TypeEnhancer};
//!
//! let definitions = Definitions::new();
//! let enhancer = TypeEnhancer::new(EnhanceConfig::default(), &definitions);
//! let field = enhancer.enhance_field("side", &FormattedField::new("'top' | 'bottom'"));
//! println!("{}", field.type_tree.to_html());
//! ```

// Core types
pub mod diagnostics;
pub mod registry;
pub mod types;

// Formatting and rendering
pub mod analysis;
pub mod enhance;
pub mod format;
pub mod styled;

pub mod test;

// Re-exports for convenience
pub use analysis::{Definitions, LabelNames, TypeReference, TypeShape};
pub use diagnostics::{EtchError, EtchResult};
pub use enhance::{
    EnhanceConfig, EnhancedField, EnhancedReturnValue, EnhancedSymbol, ExportedSymbol,
    FormattedField, ReturnValue, TypeEnhancer,
};
pub use format::{format_field_type, format_type, pretty_format, InlineFormatter, TypePrinter};
pub use registry::NameRegistry;
pub use styled::{render, reflow_union, Highlighter, RenderMode, StyleRole, StyledTree};
pub use types::{LiteralValue, QualifiedName, TypeNode};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

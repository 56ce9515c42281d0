//! Field enhancement
//!
//! Takes the formatted type text of every prop, parameter, and return value
//! and produces the highlighted trees the documentation pages render: the
//! inline `type`, an optional short label, the default value, and an
//! expanded detailed type when referenced definitions add information.

pub mod config;

pub use config::EnhanceConfig;

use crate::analysis::short_label::UNION_LABEL;
use crate::analysis::{expand, short_label, short_label_for_node, should_expand, Definitions};
use crate::diagnostics::EtchResult;
use crate::format::{format_field_type, pretty_format_with, SwcTypePrinter, TypePrinter};
use crate::registry::NameRegistry;
use crate::styled::{
    reflow_union, render_with, Highlighter, RenderMode, StyledTree, TypeScriptHighlighter,
};
use crate::types::TypeNode;
use indexmap::IndexMap;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Field name used for a single return value
pub const RETURN_VALUE_NAME: &str = "returnValue";

/// Formatted but not yet highlighted field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedField {
    /// Inline type text
    pub type_text: String,
    /// Label to use instead of deriving one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_type_text: Option<String>,
    /// Detailed type text to use instead of expanding references
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detailed_type_text: Option<String>,
    /// Default value text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_text: Option<String>,
    #[serde(default)]
    pub optional: bool,
    /// Type node the text was formatted from, when still available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<TypeNode>,
}

impl FormattedField {
    /// Field with the given type text
    pub fn new(type_text: impl Into<String>) -> Self {
        Self {
            type_text: type_text.into(),
            ..Self::default()
        }
    }

    /// Format a field from its type node
    pub fn from_node(node: TypeNode, optional: bool, registry: &NameRegistry) -> Self {
        Self {
            type_text: format_field_type(&node, optional, registry),
            optional,
            node: Some(node),
            ..Self::default()
        }
    }

    /// Mark the field optional
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Set the default value text
    pub fn with_default(mut self, default_text: impl Into<String>) -> Self {
        self.default_text = Some(default_text.into());
        self
    }
}

/// Highlighted field, ready for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedField {
    pub type_text: String,
    #[serde(rename = "type")]
    pub type_tree: StyledTree,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_type: Option<StyledTree>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_type_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<StyledTree>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detailed_type: Option<StyledTree>,
    #[serde(default)]
    pub optional: bool,
}

/// Return value of an exported function or hook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReturnValue {
    Single(FormattedField),
    Object(IndexMap<String, FormattedField>),
}

/// Enhanced return value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnhancedReturnValue {
    Single(EnhancedField),
    Object(IndexMap<String, EnhancedField>),
}

/// A documented export with formatted fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedSymbol {
    pub name: String,
    #[serde(default)]
    pub props: IndexMap<String, FormattedField>,
    #[serde(default)]
    pub parameters: IndexMap<String, FormattedField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_value: Option<ReturnValue>,
}

/// A documented export with enhanced fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedSymbol {
    pub name: String,
    pub props: IndexMap<String, EnhancedField>,
    pub parameters: IndexMap<String, EnhancedField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_value: Option<EnhancedReturnValue>,
}

impl ExportedSymbol {
    /// Every field in enhancement order: props, parameters, return value
    fn fields(&self) -> Vec<(&str, &FormattedField)> {
        let mut fields: Vec<(&str, &FormattedField)> = self
            .props
            .iter()
            .chain(self.parameters.iter())
            .map(|(name, field)| (name.as_str(), field))
            .collect();
        match &self.return_value {
            Some(ReturnValue::Single(field)) => fields.push((RETURN_VALUE_NAME, field)),
            Some(ReturnValue::Object(object)) => {
                fields.extend(object.iter().map(|(name, field)| (name.as_str(), field)))
            }
            None => {}
        }
        fields
    }
}

/// Produces enhanced fields against shared definitions
pub struct TypeEnhancer<'d> {
    config: EnhanceConfig,
    definitions: &'d Definitions,
    highlighter: Arc<dyn Highlighter>,
    printer: Arc<dyn TypePrinter>,
}

impl<'d> TypeEnhancer<'d> {
    /// Create an enhancer with the default highlighter and printer
    pub fn new(config: EnhanceConfig, definitions: &'d Definitions) -> Self {
        Self {
            config,
            definitions,
            highlighter: Arc::new(TypeScriptHighlighter),
            printer: Arc::new(SwcTypePrinter),
        }
    }

    /// Replace the highlighter
    pub fn with_highlighter(mut self, highlighter: impl Highlighter + 'static) -> Self {
        self.highlighter = Arc::new(highlighter);
        self
    }

    /// Replace the pretty printer
    pub fn with_printer(mut self, printer: impl TypePrinter + 'static) -> Self {
        self.printer = Arc::new(printer);
        self
    }

    /// Active configuration
    pub fn config(&self) -> &EnhanceConfig {
        &self.config
    }

    fn render(&self, text: &str, mode: RenderMode) -> StyledTree {
        render_with(self.highlighter.as_ref(), text, mode)
    }

    fn pretty(&self, text: &str) -> String {
        pretty_format_with(
            self.printer.as_ref(),
            text,
            None,
            self.config.detailed_type_print_width,
        )
    }

    /// Enhance one field
    pub fn enhance_field(&self, name: &str, field: &FormattedField) -> EnhancedField {
        let type_tree = self.render(&field.type_text, RenderMode::Inline);

        let short_type_text = field.short_type_text.clone().or_else(|| match &field.node {
            Some(node) => short_label_for_node(
                name,
                node,
                &field.type_text,
                field.optional,
                &self.config.labels,
            ),
            None => short_label(name, &type_tree, field.optional, &self.config.labels),
        });

        let detailed_type = self.detailed_type(name, field, &type_tree);

        let display_tree = if short_type_text.as_deref() == Some(UNION_LABEL) {
            reflow_union(
                &type_tree,
                &field.type_text,
                self.config.short_type_union_print_width,
            )
        } else {
            type_tree
        };

        let default = field.default_text.as_deref().map(|text| {
            reflow_union(
                &self.render(text, RenderMode::Inline),
                text,
                self.config.default_value_union_print_width,
            )
        });

        EnhancedField {
            type_text: field.type_text.clone(),
            type_tree: display_tree,
            short_type: short_type_text
                .as_deref()
                .map(|text| self.render(text, RenderMode::Inline)),
            short_type_text,
            default,
            detailed_type,
            optional: field.optional,
        }
    }

    fn detailed_type(
        &self,
        name: &str,
        field: &FormattedField,
        type_tree: &StyledTree,
    ) -> Option<StyledTree> {
        if let Some(text) = &field.detailed_type_text {
            return Some(self.render(&self.pretty(text), RenderMode::Detailed));
        }

        if !should_expand(name, type_tree, self.definitions) {
            return None;
        }

        let expanded_text = expand(type_tree, self.definitions).plain_text();
        if expanded_text == type_tree.plain_text() {
            debug!(field = name, "expansion adds nothing, skipping detailed type");
            return None;
        }

        Some(self.render(&self.pretty(&expanded_text), RenderMode::Detailed))
    }

    /// Enhance every field of a symbol
    pub fn enhance_symbol(&self, symbol: &ExportedSymbol) -> EnhancedSymbol {
        assemble(symbol, |name, field| self.enhance_field(name, field))
    }

    /// Enhance every symbol of every variant on a bounded worker pool
    ///
    /// One task runs per field; the output keeps the input order.
    pub fn enhance_variants(
        &self,
        variants: &IndexMap<String, Vec<ExportedSymbol>>,
    ) -> EtchResult<IndexMap<String, Vec<EnhancedSymbol>>> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(self.config.max_concurrency)
            .build()?;

        let tasks: Vec<(&str, &FormattedField)> = variants
            .values()
            .flatten()
            .flat_map(ExportedSymbol::fields)
            .collect();
        debug!(
            tasks = tasks.len(),
            threads = self.config.max_concurrency,
            "enhancing fields"
        );

        let enhanced: Vec<EnhancedField> = pool.install(|| {
            tasks
                .par_iter()
                .map(|(name, field)| self.enhance_field(name, field))
                .collect()
        });

        let mut results = enhanced.into_iter();
        Ok(variants
            .iter()
            .map(|(variant, symbols)| {
                let symbols = symbols
                    .iter()
                    .map(|symbol| {
                        assemble(symbol, |name, field| {
                            results
                                .next()
                                .unwrap_or_else(|| self.enhance_field(name, field))
                        })
                    })
                    .collect();
                (variant.clone(), symbols)
            })
            .collect())
    }
}

/// Rebuild a symbol's shape, enhancing fields in [`ExportedSymbol::fields`] order
fn assemble<F>(symbol: &ExportedSymbol, mut enhance: F) -> EnhancedSymbol
where
    F: FnMut(&str, &FormattedField) -> EnhancedField,
{
    let mut enhance_map = |fields: &IndexMap<String, FormattedField>| {
        fields
            .iter()
            .map(|(name, field)| (name.clone(), enhance(name.as_str(), field)))
            .collect::<IndexMap<_, _>>()
    };

    let props = enhance_map(&symbol.props);
    let parameters = enhance_map(&symbol.parameters);
    let return_value = match &symbol.return_value {
        Some(ReturnValue::Object(object)) => Some(EnhancedReturnValue::Object(enhance_map(object))),
        Some(ReturnValue::Single(field)) => Some(EnhancedReturnValue::Single(enhance(
            RETURN_VALUE_NAME,
            field,
        ))),
        None => None,
    };

    EnhancedSymbol {
        name: symbol.name.clone(),
        props,
        parameters,
        return_value,
    }
}

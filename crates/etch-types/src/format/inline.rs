//! Inline type formatting
//!
//! Renders a [`TypeNode`] tree into canonical single-line TypeScript text.
//! Named aliases are preferred over their expansion, except for the alias
//! being documented itself (`self_name`), which must expand so that
//! `type Foo = Foo | Bar` never renders as `Foo`.

use crate::analysis::classify::count_top_level_pipes;
use crate::registry::NameRegistry;
use crate::types::{CallSignature, IndexSignature, ObjectProperty, QualifiedName, TypeNode};
use indexmap::IndexSet;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Property names that can be written without quotes
    pub(crate) static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap();

    /// Alias names generated by the extractor for anonymous function types
    pub(crate) static ref SYNTHETIC_ALIAS: Regex = Regex::new(r"^__").unwrap();
}

/// Options for the node being formatted
///
/// Only the top-level node sees these; nested nodes format with defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions<'s> {
    /// Drop `undefined` members from a top-level union
    pub remove_undefined: bool,
    /// Expand aliased object and function types instead of printing the alias
    pub expand_objects: bool,
    /// Name of the alias being documented, which must always expand
    pub self_name: Option<&'s str>,
}

impl<'s> FormatOptions<'s> {
    /// Options that drop `undefined`
    pub fn without_undefined() -> Self {
        Self {
            remove_undefined: true,
            ..Self::default()
        }
    }

    /// Options for formatting the definition of `name`
    pub fn for_definition(name: &'s str) -> Self {
        Self {
            expand_objects: true,
            self_name: Some(name),
            ..Self::default()
        }
    }
}

/// Formats type nodes against a name registry
#[derive(Debug, Clone, Copy)]
pub struct InlineFormatter<'r> {
    registry: &'r NameRegistry,
}

impl<'r> InlineFormatter<'r> {
    /// Create a formatter reading names from `registry`
    pub fn new(registry: &'r NameRegistry) -> Self {
        Self { registry }
    }

    /// Format a node with the given top-level options
    pub fn format(&self, node: &TypeNode, options: FormatOptions<'_>) -> String {
        match node {
            TypeNode::Intrinsic { name } => name.clone(),
            TypeNode::Literal { value } => value.to_typescript(),
            TypeNode::External { name } => self.format_reference(name),
            TypeNode::Union { members, alias } => match self.preferred_alias(alias, options) {
                Some(alias) => self.format_reference(alias),
                None => self.format_union(members, options.remove_undefined),
            },
            TypeNode::Intersection { members, alias } => {
                match self.preferred_alias(alias, options) {
                    Some(alias) => self.format_reference(alias),
                    None => self.format_intersection(members),
                }
            }
            TypeNode::Object {
                properties,
                index_signature,
                alias,
            } => match self.preferred_alias(alias, options).filter(|_| !options.expand_objects) {
                Some(alias) => self.format_reference(alias),
                None => self.format_object(properties, index_signature.as_ref()),
            },
            TypeNode::Array { element } => {
                let element = self.format_nested(element);
                if element.contains(char::is_whitespace) {
                    format!("({})[]", element)
                } else {
                    format!("{}[]", element)
                }
            }
            TypeNode::Tuple { members, alias } => match self.preferred_alias(alias, options) {
                Some(alias) => self.format_reference(alias),
                None => {
                    let members: Vec<String> =
                        members.iter().map(|m| self.format_nested(m)).collect();
                    format!("[{}]", members.join(", "))
                }
            },
            TypeNode::Function { signatures, alias } => {
                let alias = self
                    .preferred_alias(alias, options)
                    .filter(|_| !options.expand_objects)
                    .filter(|alias| !SYNTHETIC_ALIAS.is_match(&alias.simple_name));
                match alias {
                    Some(alias) => self.format_reference(alias),
                    None => self.format_signatures(signatures),
                }
            }
            TypeNode::TypeParameter { name, constraint } => match constraint {
                Some(constraint) => self.format_nested(constraint),
                None => name.clone(),
            },
            TypeNode::Enum { name, .. } => match name {
                Some(name) => self.format_reference(name),
                None => "unknown".to_string(),
            },
            TypeNode::Unknown => "unknown".to_string(),
        }
    }

    fn format_nested(&self, node: &TypeNode) -> String {
        self.format(node, FormatOptions::default())
    }

    /// The alias to print instead of expanding, unless it names the type being documented
    fn preferred_alias<'n>(
        &self,
        alias: &'n Option<QualifiedName>,
        options: FormatOptions<'_>,
    ) -> Option<&'n QualifiedName> {
        let alias = alias.as_ref()?;
        match options.self_name {
            Some(self_name) if self.names_match(alias, self_name) => None,
            _ => Some(alias),
        }
    }

    fn names_match(&self, alias: &QualifiedName, name: &str) -> bool {
        alias.simple_name == name
            || alias.dotted() == name
            || self.registry.resolve_name(alias) == name
    }

    /// Resolve a reference and re-attach its non-default type arguments
    pub fn format_reference(&self, name: &QualifiedName) -> String {
        let resolved = self.registry.resolve_name(name);
        let base = resolved.split('<').next().unwrap_or(&resolved);
        if base.rsplit('.').next() == Some("ReactElement") {
            return base.to_string();
        }

        let all_defaults = name.type_arguments.iter().all(|argument| {
            argument
                .declared_default
                .as_ref()
                .is_some_and(|default| self.format_nested(default) == self.format_nested(&argument.value))
        });
        if name.type_arguments.is_empty() || all_defaults {
            return resolved;
        }

        let arguments: Vec<String> = name
            .type_arguments
            .iter()
            .map(|argument| self.format_nested(&argument.value))
            .collect();
        format!("{}<{}>", resolved, arguments.join(", "))
    }

    fn format_union(&self, members: &[TypeNode], remove_undefined: bool) -> String {
        let mut flattened = union_members(members);

        let had_undefined = flattened.iter().any(|m| m.is_undefined());
        if remove_undefined {
            flattened.retain(|m| !m.is_undefined());
        }

        let rendered: IndexSet<String> = flattened
            .iter()
            .map(|member| self.format_member(member))
            .collect();

        if rendered.is_empty() {
            return if had_undefined { "undefined" } else { "never" }.to_string();
        }

        let mut ordered: Vec<String> = rendered.into_iter().collect();
        ordered.sort_by_key(|text| trailing_rank(text));
        ordered.join(" | ")
    }

    /// Text of one union member, as it appears between the `|` separators
    pub(crate) fn format_member(&self, member: &TypeNode) -> String {
        wrap_function(member, self.format_nested(member))
    }

    fn format_intersection(&self, members: &[TypeNode]) -> String {
        let rendered: Vec<String> = members
            .iter()
            .map(|member| {
                let text = wrap_function(member, self.format_nested(member));
                // `&` binds tighter than `|`
                if count_top_level_pipes(&text) > 0 {
                    format!("({})", text)
                } else {
                    text
                }
            })
            .filter(|text| text != "{}")
            .collect();

        match rendered.len() {
            0 => "{}".to_string(),
            1 => rendered.into_iter().next().unwrap_or_default(),
            _ => rendered.join(" & "),
        }
    }

    fn format_object(
        &self,
        properties: &[ObjectProperty],
        index_signature: Option<&IndexSignature>,
    ) -> String {
        if properties.is_empty() && index_signature.is_none() {
            return "{}".to_string();
        }

        let mut entries: Vec<String> = properties
            .iter()
            .map(|property| {
                let key = property_key(&property.name);
                if property.optional {
                    let value = self.format(&property.value, FormatOptions::without_undefined());
                    format!("{}?: {}", key, value)
                } else {
                    format!("{}: {}", key, self.format_nested(&property.value))
                }
            })
            .collect();

        if let Some(index) = index_signature {
            entries.push(format!(
                "[{}: {}]: {}",
                index.key_name,
                self.format_nested(&index.key),
                self.format_nested(&index.value)
            ));
        }

        format!("{{ {} }}", entries.join("; "))
    }

    fn format_signatures(&self, signatures: &[CallSignature]) -> String {
        match signatures {
            [] => "unknown".to_string(),
            [single] => self.format_signature(single),
            overloads => overloads
                .iter()
                .map(|signature| format!("({})", self.format_signature(signature)))
                .collect::<Vec<_>>()
                .join(" | "),
        }
    }

    fn format_signature(&self, signature: &CallSignature) -> String {
        let parameters = &signature.parameters;

        // A parameter may use `?` only if every later one may too.
        let mut trailing_optional = vec![false; parameters.len()];
        let mut rest_optional = true;
        for (index, parameter) in parameters.iter().enumerate().rev() {
            let optional =
                parameter.rest || parameter.optional || parameter.value.includes_undefined();
            rest_optional = rest_optional && optional;
            trailing_optional[index] = rest_optional;
        }

        let rendered: Vec<String> = parameters
            .iter()
            .zip(trailing_optional)
            .map(|(parameter, trailing)| {
                if parameter.rest {
                    return format!("...{}: {}", parameter.name, self.format_nested(&parameter.value));
                }
                let optional = parameter.optional || parameter.value.includes_undefined();
                if optional && trailing {
                    let value = self.format(&parameter.value, FormatOptions::without_undefined());
                    format!("{}?: {}", parameter.name, value)
                } else if optional && !parameter.value.includes_undefined() {
                    let value = wrap_function(&parameter.value, self.format_nested(&parameter.value));
                    format!("{}: {} | undefined", parameter.name, value)
                } else {
                    format!("{}: {}", parameter.name, self.format_nested(&parameter.value))
                }
            })
            .collect();

        format!(
            "({}) => {}",
            rendered.join(", "),
            self.format_nested(&signature.return_type)
        )
    }
}

/// Format a node with the standalone signature used across the crate
pub fn format_type(
    node: &TypeNode,
    remove_undefined: bool,
    expand_objects: bool,
    registry: &NameRegistry,
    self_name: Option<&str>,
) -> String {
    InlineFormatter::new(registry).format(
        node,
        FormatOptions {
            remove_undefined,
            expand_objects,
            self_name,
        },
    )
}

/// Type text of a property or parameter, with `| undefined` for optional fields
pub fn format_field_type(node: &TypeNode, optional: bool, registry: &NameRegistry) -> String {
    let text = format_type(node, optional, false, registry, None);
    if !optional || text == "undefined" {
        return text;
    }
    format!("{} | undefined", wrap_function(node, text))
}

/// Members of a union with nested anonymous unions and constrained type
/// parameters flattened one level
pub(crate) fn union_members(members: &[TypeNode]) -> Vec<&TypeNode> {
    let mut flattened: Vec<&TypeNode> = Vec::with_capacity(members.len());
    for member in members {
        match member {
            TypeNode::Union {
                members: inner,
                alias: None,
            } => flattened.extend(inner),
            TypeNode::TypeParameter {
                constraint: Some(constraint),
                ..
            } => match constraint.as_ref() {
                TypeNode::Union { members: inner, .. } => flattened.extend(inner),
                _ => flattened.push(member),
            },
            _ => flattened.push(member),
        }
    }
    flattened
}

/// Parenthesize an inline function type so it can sit inside a union
fn wrap_function(node: &TypeNode, text: String) -> String {
    match node {
        TypeNode::Function { signatures, .. } if signatures.len() == 1 && text.contains("=>") => {
            format!("({})", text)
        }
        _ => text,
    }
}

/// Sort key pushing `any`, `null` and `undefined` behind every other member
fn trailing_rank(text: &str) -> u8 {
    match text {
        "any" => 1,
        "null" => 2,
        "undefined" => 3,
        _ => 0,
    }
}

/// Property name, quoted when it is not a plain identifier
pub(crate) fn property_key(name: &str) -> String {
    if IDENTIFIER.is_match(name) {
        name.to_string()
    } else {
        serde_json::to_string(name).unwrap_or_else(|_| format!("\"{}\"", name))
    }
}

//! Qualified name resolution
//!
//! Exported names reach the formatter in two spellings: flat
//! (`AccordionRootProps`, how the compiler sees a re-exported alias) and
//! dotted (`Accordion.Root.Props`, how the public namespace exposes it).
//! `NameRegistry` maps between the two and `resolve` picks the dotted
//! spelling wherever one is known.

use crate::types::QualifiedName;
use indexmap::IndexMap;

/// Bidirectional map between flat and dotted exported names
///
/// Built once per compilation unit and shared read-only between formatting
/// tasks.
#[derive(Debug, Clone, Default)]
pub struct NameRegistry {
    flat_to_dotted: IndexMap<String, String>,
    dotted_to_flat: IndexMap<String, String>,
    /// Flat keys ordered by length, longest first, for prefix matching
    prefix_order: Vec<String>,
}

impl NameRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from every exported name containing a namespace separator
    pub fn from_exports<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registry = Self::new();
        for name in names {
            let dotted = name.as_ref();
            if dotted.contains('.') {
                registry.insert(dotted.replace('.', ""), dotted);
            }
        }
        registry
    }

    /// Register a flat name and its dotted spelling
    pub fn insert(&mut self, flat: impl Into<String>, dotted: impl Into<String>) {
        let flat = flat.into();
        let dotted = dotted.into();
        self.dotted_to_flat.insert(dotted.clone(), flat.clone());
        if self.flat_to_dotted.insert(flat.clone(), dotted).is_none() {
            self.prefix_order.push(flat);
            // stable: equal lengths keep insertion order
            self.prefix_order.sort_by(|a, b| b.len().cmp(&a.len()));
        }
    }

    /// Dotted spelling for a flat name
    pub fn dotted_name(&self, flat: &str) -> Option<&str> {
        self.flat_to_dotted.get(flat).map(String::as_str)
    }

    /// Flat spelling for a dotted name
    pub fn flat_name(&self, dotted: &str) -> Option<&str> {
        self.dotted_to_flat.get(dotted).map(String::as_str)
    }

    /// Number of registered names
    pub fn len(&self) -> usize {
        self.flat_to_dotted.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.flat_to_dotted.is_empty()
    }

    /// Resolve a qualified name to its canonical spelling, without type arguments
    pub fn resolve_name(&self, name: &QualifiedName) -> String {
        let flat = name.flat();

        if let Some(dotted) = self.dotted_name(&flat) {
            return dotted.to_string();
        }

        if let Some(open) = flat.find('<') {
            let (base, generics) = flat.split_at(open);
            if let Some(dotted) = self.dotted_name(base) {
                return format!("{}{}", dotted, generics);
            }
        }

        if let Some(dotted) = self
            .dotted_to_flat
            .keys()
            .find(|dotted| dotted.replace('.', "") == flat)
        {
            return dotted.clone();
        }

        if let Some(rebuilt) = self.substitute_namespace(name) {
            return rebuilt;
        }

        if let Some(resolved) = self.resolve_prefix(&name.simple_name) {
            return resolved;
        }

        name.dotted()
    }

    /// Rebuild a dotted path when one of the namespace segments is itself a flat name
    fn substitute_namespace(&self, name: &QualifiedName) -> Option<String> {
        if !name
            .namespace_path
            .iter()
            .any(|segment| self.flat_to_dotted.contains_key(segment))
        {
            return None;
        }

        let mut segments: Vec<&str> = name
            .namespace_path
            .iter()
            .map(|segment| self.dotted_name(segment).unwrap_or(segment))
            .collect();
        segments.push(&name.simple_name);
        Some(segments.join("."))
    }

    /// Longest registered flat name that prefixes `flat`, with the remainder appended
    fn resolve_prefix(&self, flat: &str) -> Option<String> {
        self.prefix_order.iter().find_map(|key| {
            let remainder = flat.strip_prefix(key.as_str())?;
            if remainder.is_empty() {
                return None;
            }
            let dotted = self.flat_to_dotted.get(key)?;
            Some(format!("{}.{}", dotted, remainder))
        })
    }
}

//! Type model
//!
//! This module provides `TypeNode`, the tree handed over by the extraction
//! step. Nodes are immutable once built; every formatting pass reads them
//! through shared references.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A type name together with its enclosing namespaces and generic arguments
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualifiedName {
    /// Last name segment (e.g., "Props"), or a flat exported name
    pub simple_name: String,

    /// Enclosing namespaces, outermost first (e.g., ["Accordion", "Root"])
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub namespace_path: Vec<String>,

    /// Generic arguments of this instantiation
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_arguments: Vec<TypeArgument>,
}

impl QualifiedName {
    /// Create a name without namespace or arguments
    pub fn new(simple_name: impl Into<String>) -> Self {
        Self {
            simple_name: simple_name.into(),
            namespace_path: vec![],
            type_arguments: vec![],
        }
    }

    /// Create a name from a dotted path ("Accordion.Root.Props")
    pub fn from_dotted(dotted: &str) -> Self {
        let mut segments: Vec<String> = dotted.split('.').map(String::from).collect();
        let simple_name = segments.pop().unwrap_or_default();
        Self {
            simple_name,
            namespace_path: segments,
            type_arguments: vec![],
        }
    }

    /// Set the namespace path
    pub fn in_namespace<I, S>(mut self, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.namespace_path = path.into_iter().map(Into::into).collect();
        self
    }

    /// Add a generic argument
    pub fn with_argument(mut self, argument: TypeArgument) -> Self {
        self.type_arguments.push(argument);
        self
    }

    /// Namespace segments and simple name joined with dots
    pub fn dotted(&self) -> String {
        if self.namespace_path.is_empty() {
            self.simple_name.clone()
        } else {
            format!("{}.{}", self.namespace_path.join("."), self.simple_name)
        }
    }

    /// Namespace segments and simple name concatenated without separators
    pub fn flat(&self) -> String {
        let mut flat = self.namespace_path.concat();
        flat.push_str(&self.simple_name);
        flat
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dotted())
    }
}

/// A generic argument and the default declared for its parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeArgument {
    /// The argument supplied at this use site
    pub value: TypeNode,

    /// Default of the corresponding type parameter, if declared
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declared_default: Option<TypeNode>,
}

impl TypeArgument {
    /// An argument whose parameter has no default
    pub fn new(value: TypeNode) -> Self {
        Self {
            value,
            declared_default: None,
        }
    }

    /// An argument whose parameter declares a default
    pub fn with_default(value: TypeNode, default: TypeNode) -> Self {
        Self {
            value,
            declared_default: Some(default),
        }
    }
}

/// Literal type values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type", content = "value")]
pub enum LiteralValue {
    /// String literal (e.g., "hello")
    String(String),
    /// Number literal (e.g., 42)
    Number(f64),
    /// Boolean literal (true/false)
    Boolean(bool),
    /// BigInt literal digits (e.g., "42" for 42n)
    BigInt(String),
}

impl LiteralValue {
    /// Convert to TypeScript representation
    pub fn to_typescript(&self) -> String {
        match self {
            LiteralValue::String(s) => {
                serde_json::to_string(s).unwrap_or_else(|_| format!("\"{}\"", s))
            }
            LiteralValue::Number(n) => n.to_string(),
            LiteralValue::Boolean(b) => b.to_string(),
            LiteralValue::BigInt(digits) => format!("{}n", digits),
        }
    }
}

/// Property of an object type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectProperty {
    /// Property name as written in source
    pub name: String,
    /// Property type
    pub value: TypeNode,
    /// Whether declared with `?`
    #[serde(default)]
    pub optional: bool,
}

/// Index signature of an object type (`[key: K]: V`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSignature {
    /// Name of the key parameter
    pub key_name: String,
    /// Key type
    pub key: Box<TypeNode>,
    /// Value type
    pub value: Box<TypeNode>,
}

/// One call signature of a function type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallSignature {
    /// Parameters in declaration order
    #[serde(default)]
    pub parameters: Vec<SignatureParameter>,
    /// Return type
    pub return_type: Box<TypeNode>,
}

/// Parameter of a call signature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureParameter {
    /// Parameter name
    pub name: String,
    /// Parameter type
    pub value: TypeNode,
    /// Whether declared with `?`
    #[serde(default)]
    pub optional: bool,
    /// Whether this is a rest parameter (`...args`)
    #[serde(default)]
    pub rest: bool,
}

/// Member of an enum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumMember {
    /// Member name
    pub name: String,
    /// Initializer value, if constant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<LiteralValue>,
}

/// A type, as produced by the extraction step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum TypeNode {
    /// Built-in type (string, number, undefined, ...)
    Intrinsic { name: String },

    /// Literal type ("a", 1, true)
    Literal { value: LiteralValue },

    /// Named type declared elsewhere
    External { name: QualifiedName },

    /// Union type (A | B | C)
    Union {
        members: Vec<TypeNode>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alias: Option<QualifiedName>,
    },

    /// Intersection type (A & B & C)
    Intersection {
        members: Vec<TypeNode>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alias: Option<QualifiedName>,
    },

    /// Object type ({ a: T; [k: K]: V })
    Object {
        #[serde(default)]
        properties: Vec<ObjectProperty>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        index_signature: Option<IndexSignature>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alias: Option<QualifiedName>,
    },

    /// Array type (T[])
    Array { element: Box<TypeNode> },

    /// Tuple type ([A, B])
    Tuple {
        members: Vec<TypeNode>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alias: Option<QualifiedName>,
    },

    /// Function type, one entry per overload
    Function {
        signatures: Vec<CallSignature>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alias: Option<QualifiedName>,
    },

    /// Type parameter reference (T in generic context)
    TypeParameter {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        constraint: Option<Box<TypeNode>>,
    },

    /// Enum type
    Enum {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<QualifiedName>,
        #[serde(default)]
        members: Vec<EnumMember>,
    },

    /// Any kind the extractor emitted that this model does not know
    #[serde(other)]
    Unknown,
}

impl TypeNode {
    /// Create an intrinsic type
    pub fn intrinsic(name: impl Into<String>) -> Self {
        TypeNode::Intrinsic { name: name.into() }
    }

    /// Create a string type
    pub fn string() -> Self {
        Self::intrinsic("string")
    }

    /// Create a number type
    pub fn number() -> Self {
        Self::intrinsic("number")
    }

    /// Create a boolean type
    pub fn boolean() -> Self {
        Self::intrinsic("boolean")
    }

    /// Create a void type
    pub fn void() -> Self {
        Self::intrinsic("void")
    }

    /// Create an undefined type
    pub fn undefined() -> Self {
        Self::intrinsic("undefined")
    }

    /// Create a null type
    pub fn null() -> Self {
        Self::intrinsic("null")
    }

    /// Create an any type
    pub fn any() -> Self {
        Self::intrinsic("any")
    }

    /// Create a string literal type
    pub fn string_literal(value: impl Into<String>) -> Self {
        TypeNode::Literal {
            value: LiteralValue::String(value.into()),
        }
    }

    /// Create a number literal type
    pub fn number_literal(value: f64) -> Self {
        TypeNode::Literal {
            value: LiteralValue::Number(value),
        }
    }

    /// Create a reference to a named type
    pub fn external(name: QualifiedName) -> Self {
        TypeNode::External { name }
    }

    /// Create a reference from a plain name
    pub fn named(name: &str) -> Self {
        Self::external(QualifiedName::from_dotted(name))
    }

    /// Create an anonymous union
    pub fn union(members: Vec<TypeNode>) -> Self {
        TypeNode::Union {
            members,
            alias: None,
        }
    }

    /// Create an anonymous intersection
    pub fn intersection(members: Vec<TypeNode>) -> Self {
        TypeNode::Intersection {
            members,
            alias: None,
        }
    }

    /// Create an anonymous object type
    pub fn object(properties: Vec<ObjectProperty>) -> Self {
        TypeNode::Object {
            properties,
            index_signature: None,
            alias: None,
        }
    }

    /// Create an array type
    pub fn array(element: TypeNode) -> Self {
        TypeNode::Array {
            element: Box::new(element),
        }
    }

    /// Create an anonymous tuple type
    pub fn tuple(members: Vec<TypeNode>) -> Self {
        TypeNode::Tuple {
            members,
            alias: None,
        }
    }

    /// Create an anonymous function type with a single signature
    pub fn function(parameters: Vec<SignatureParameter>, return_type: TypeNode) -> Self {
        TypeNode::Function {
            signatures: vec![CallSignature {
                parameters,
                return_type: Box::new(return_type),
            }],
            alias: None,
        }
    }

    /// Attach an alias name to a node that can carry one
    ///
    /// Nodes without an alias slot are returned unchanged.
    pub fn aliased(mut self, name: QualifiedName) -> Self {
        match &mut self {
            TypeNode::Union { alias, .. }
            | TypeNode::Intersection { alias, .. }
            | TypeNode::Object { alias, .. }
            | TypeNode::Tuple { alias, .. }
            | TypeNode::Function { alias, .. } => *alias = Some(name),
            _ => {}
        }
        self
    }

    /// The alias carried by this node, if any
    pub fn alias(&self) -> Option<&QualifiedName> {
        match self {
            TypeNode::Union { alias, .. }
            | TypeNode::Intersection { alias, .. }
            | TypeNode::Object { alias, .. }
            | TypeNode::Tuple { alias, .. }
            | TypeNode::Function { alias, .. } => alias.as_ref(),
            _ => None,
        }
    }

    /// Whether this is the `undefined` intrinsic
    pub fn is_undefined(&self) -> bool {
        matches!(self, TypeNode::Intrinsic { name } if name == "undefined")
    }

    /// Whether this type admits `undefined` (itself or as a union member)
    pub fn includes_undefined(&self) -> bool {
        match self {
            TypeNode::Union { members, .. } => members.iter().any(TypeNode::includes_undefined),
            other => other.is_undefined(),
        }
    }
}

impl ObjectProperty {
    /// Create a required property
    pub fn new(name: impl Into<String>, value: TypeNode) -> Self {
        Self {
            name: name.into(),
            value,
            optional: false,
        }
    }

    /// Create an optional property
    pub fn optional(name: impl Into<String>, value: TypeNode) -> Self {
        Self {
            name: name.into(),
            value,
            optional: true,
        }
    }
}

impl SignatureParameter {
    /// Create a required parameter
    pub fn new(name: impl Into<String>, value: TypeNode) -> Self {
        Self {
            name: name.into(),
            value,
            optional: false,
            rest: false,
        }
    }

    /// Create an optional parameter
    pub fn optional(name: impl Into<String>, value: TypeNode) -> Self {
        Self {
            optional: true,
            ..Self::new(name, value)
        }
    }

    /// Create a rest parameter
    pub fn rest(name: impl Into<String>, value: TypeNode) -> Self {
        Self {
            rest: true,
            ..Self::new(name, value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_qualified_name_forms() {
        let name = QualifiedName::from_dotted("Accordion.Root.Props");
        assert_eq!(name.simple_name, "Props");
        assert_eq!(name.namespace_path, vec!["Accordion", "Root"]);
        assert_eq!(name.dotted(), "Accordion.Root.Props");
        assert_eq!(name.flat(), "AccordionRootProps");
    }

    #[test]
    fn test_literal_to_typescript() {
        assert_eq!(LiteralValue::String("a\"b".into()).to_typescript(), r#""a\"b""#);
        assert_eq!(LiteralValue::Number(42.0).to_typescript(), "42");
        assert_eq!(LiteralValue::Number(0.5).to_typescript(), "0.5");
        assert_eq!(LiteralValue::BigInt("10".into()).to_typescript(), "10n");
    }

    #[test]
    fn test_includes_undefined() {
        let ty = TypeNode::union(vec![TypeNode::string(), TypeNode::undefined()]);
        assert!(ty.includes_undefined());
        assert!(!TypeNode::string().includes_undefined());
    }

    #[test]
    fn test_unknown_kind_deserializes() {
        let node: TypeNode =
            serde_json::from_str(r#"{ "kind": "conditional", "check": {} }"#).unwrap();
        assert_eq!(node, TypeNode::Unknown);

        let node: TypeNode =
            serde_json::from_str(r#"{ "kind": "intrinsic", "name": "string" }"#).unwrap();
        assert_eq!(node, TypeNode::string());
    }

    #[test]
    fn test_aliased_only_sets_alias_slots() {
        let union = TypeNode::union(vec![]).aliased(QualifiedName::new("Side"));
        assert_eq!(union.alias().map(|a| a.dotted()), Some("Side".to_string()));

        let array = TypeNode::array(TypeNode::string()).aliased(QualifiedName::new("X"));
        assert!(array.alias().is_none());
    }
}

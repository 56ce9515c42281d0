//! SWC/deno_ast lowering of type declarations into layout documents
//!
//! The parser is deno_ast (which wraps SWC). Only the type-level subset of
//! TypeScript is lowered; constructs without a layout rule are reported as
//! [`EtchError::Unsupported`] so callers can fall back to the raw text.

use super::layout::Doc;
use crate::diagnostics::{EtchError, EtchResult};
use deno_ast::swc::ast as swc_ast;
use deno_ast::{MediaType, ParseParams, ParsedSource};

/// Specifier used for every in-memory declaration
const TYPE_SPECIFIER: &str = "file:///type.ts";

/// Parse a TypeScript module held in memory
pub fn parse_declaration(source: &str) -> EtchResult<ParsedSource> {
    let specifier = deno_ast::ModuleSpecifier::parse(TYPE_SPECIFIER)
        .map_err(|e| EtchError::InvalidSpecifier(format!("{}: {}", TYPE_SPECIFIER, e)))?;

    let parsed = deno_ast::parse_module(ParseParams {
        specifier,
        text: source.into(),
        media_type: MediaType::TypeScript,
        capture_tokens: false,
        scope_analysis: false,
        maybe_syntax: None,
    })
    .map_err(|e| EtchError::TypeScriptParse(format!("{}", e)))?;

    // recovered errors still mean the text is not a valid type
    if let Some(diagnostic) = parsed.diagnostics().first() {
        return Err(EtchError::TypeScriptParse(format!("{}", diagnostic)));
    }

    Ok(parsed)
}

/// First type alias declared in a parsed module
pub fn first_type_alias(parsed: &ParsedSource) -> EtchResult<&swc_ast::TsTypeAliasDecl> {
    let module = match parsed.program_ref() {
        deno_ast::ProgramRef::Module(m) => m,
        deno_ast::ProgramRef::Script(_) => {
            return Err(EtchError::MissingDeclaration("expected a module".to_string()))
        }
    };

    module
        .body
        .iter()
        .find_map(|item| match item {
            swc_ast::ModuleItem::Stmt(swc_ast::Stmt::Decl(swc_ast::Decl::TsTypeAlias(alias))) => {
                Some(alias.as_ref())
            }
            swc_ast::ModuleItem::ModuleDecl(swc_ast::ModuleDecl::ExportDecl(export)) => {
                match &export.decl {
                    swc_ast::Decl::TsTypeAlias(alias) => Some(alias.as_ref()),
                    _ => None,
                }
            }
            _ => None,
        })
        .ok_or_else(|| EtchError::MissingDeclaration("type alias".to_string()))
}

/// Layout for `type Name<Params> = Type;`
pub fn alias_doc(alias: &swc_ast::TsTypeAliasDecl) -> EtchResult<Doc> {
    let mut head = format!("type {}", alias.id.sym);
    if let Some(params) = &alias.type_params {
        head.push_str(&type_params_text(params)?);
    }
    head.push_str(" =");

    Ok(Doc::concat(vec![
        Doc::text(head),
        after_operator(&alias.type_ann, Doc::Line)?,
        Doc::text(";"),
    ]))
}

/// A type following `=` or `:`; unions break with a leading `|`
fn after_operator(ty: &swc_ast::TsType, separator: Doc) -> EtchResult<Doc> {
    match ty {
        swc_ast::TsType::TsUnionOrIntersectionType(
            swc_ast::TsUnionOrIntersectionType::TsUnionType(union),
        ) => union_doc(&union.types, separator),
        _ => {
            let leading = if separator == Doc::Line { " " } else { "" };
            Ok(Doc::concat(vec![Doc::text(leading), type_doc(ty)?]))
        }
    }
}

fn union_doc(members: &[Box<swc_ast::TsType>], separator: Doc) -> EtchResult<Doc> {
    let members = members
        .iter()
        .map(|m| type_doc(m))
        .collect::<EtchResult<Vec<_>>>()?;

    Ok(Doc::group(Doc::indent(Doc::concat(vec![
        separator,
        Doc::if_break("| "),
        Doc::join(members, Doc::concat(vec![Doc::Line, Doc::text("| ")])),
    ]))))
}

/// Layout for a type in any position
pub fn type_doc(ty: &swc_ast::TsType) -> EtchResult<Doc> {
    match ty {
        swc_ast::TsType::TsKeywordType(kw) => Ok(Doc::text(keyword_text(kw.kind))),
        swc_ast::TsType::TsThisType(_) => Ok(Doc::text("this")),
        swc_ast::TsType::TsTypeRef(type_ref) => {
            let name = entity_name(&type_ref.type_name);
            match &type_ref.type_params {
                Some(args) => Ok(Doc::concat(vec![Doc::text(name), type_args_doc(args)?])),
                None => Ok(Doc::text(name)),
            }
        }
        swc_ast::TsType::TsArrayType(arr) => {
            Ok(Doc::concat(vec![type_doc(&arr.elem_type)?, Doc::text("[]")]))
        }
        swc_ast::TsType::TsTupleType(tuple) => {
            let elements = tuple
                .elem_types
                .iter()
                .map(tuple_element_doc)
                .collect::<EtchResult<Vec<_>>>()?;
            Ok(bracketed("[", elements, "]"))
        }
        swc_ast::TsType::TsUnionOrIntersectionType(union_inter) => match union_inter {
            swc_ast::TsUnionOrIntersectionType::TsUnionType(u) => {
                union_doc(&u.types, Doc::SoftLine)
            }
            swc_ast::TsUnionOrIntersectionType::TsIntersectionType(i) => {
                let mut members = i.types.iter();
                let first = match members.next() {
                    Some(first) => type_doc(first)?,
                    None => return Ok(Doc::text("unknown")),
                };
                let mut parts = vec![first];
                for member in members {
                    parts.push(Doc::text(" &"));
                    parts.push(Doc::indent(Doc::concat(vec![Doc::Line, type_doc(member)?])));
                }
                Ok(Doc::group(Doc::concat(parts)))
            }
        },
        swc_ast::TsType::TsLitType(lit) => literal_text(&lit.lit).map(Doc::text),
        swc_ast::TsType::TsFnOrConstructorType(fn_type) => match fn_type {
            swc_ast::TsFnOrConstructorType::TsFnType(f) => signature_doc(
                "",
                f.type_params.as_deref(),
                &f.params,
                " => ",
                &f.type_ann.type_ann,
            ),
            swc_ast::TsFnOrConstructorType::TsConstructorType(c) => {
                let prefix = if c.is_abstract { "abstract new " } else { "new " };
                signature_doc(
                    prefix,
                    c.type_params.as_deref(),
                    &c.params,
                    " => ",
                    &c.type_ann.type_ann,
                )
            }
        },
        swc_ast::TsType::TsTypeLit(lit) => {
            let members = lit
                .members
                .iter()
                .map(type_element_doc)
                .collect::<EtchResult<Vec<_>>>()?;
            Ok(object_doc(members))
        }
        swc_ast::TsType::TsParenthesizedType(paren) => Ok(Doc::concat(vec![
            Doc::text("("),
            type_doc(&paren.type_ann)?,
            Doc::text(")"),
        ])),
        swc_ast::TsType::TsOptionalType(opt) => {
            Ok(Doc::concat(vec![type_doc(&opt.type_ann)?, Doc::text("?")]))
        }
        swc_ast::TsType::TsRestType(rest) => {
            Ok(Doc::concat(vec![Doc::text("..."), type_doc(&rest.type_ann)?]))
        }
        swc_ast::TsType::TsTypeQuery(query) => {
            let name = match &query.expr_name {
                swc_ast::TsTypeQueryExpr::TsEntityName(entity) => entity_name(entity),
                swc_ast::TsTypeQueryExpr::Import(_) => {
                    return Err(EtchError::unsupported("typeof import"))
                }
            };
            let mut parts = vec![Doc::text(format!("typeof {}", name))];
            if let Some(args) = &query.type_args {
                parts.push(type_args_doc(args)?);
            }
            Ok(Doc::concat(parts))
        }
        swc_ast::TsType::TsConditionalType(cond) => Ok(Doc::group(Doc::concat(vec![
            type_doc(&cond.check_type)?,
            Doc::text(" extends "),
            type_doc(&cond.extends_type)?,
            Doc::indent(Doc::concat(vec![
                Doc::Line,
                Doc::text("? "),
                type_doc(&cond.true_type)?,
                Doc::Line,
                Doc::text(": "),
                type_doc(&cond.false_type)?,
            ])),
        ]))),
        swc_ast::TsType::TsInferType(infer) => {
            let mut parts = vec![Doc::text(format!("infer {}", infer.type_param.name.sym))];
            if let Some(constraint) = &infer.type_param.constraint {
                parts.push(Doc::text(" extends "));
                parts.push(type_doc(constraint)?);
            }
            Ok(Doc::concat(parts))
        }
        swc_ast::TsType::TsTypeOperator(op) => {
            let operator = match op.op {
                swc_ast::TsTypeOperatorOp::KeyOf => "keyof ",
                swc_ast::TsTypeOperatorOp::Unique => "unique ",
                swc_ast::TsTypeOperatorOp::ReadOnly => "readonly ",
            };
            Ok(Doc::concat(vec![Doc::text(operator), type_doc(&op.type_ann)?]))
        }
        swc_ast::TsType::TsIndexedAccessType(indexed) => Ok(Doc::concat(vec![
            type_doc(&indexed.obj_type)?,
            Doc::text("["),
            type_doc(&indexed.index_type)?,
            Doc::text("]"),
        ])),
        swc_ast::TsType::TsMappedType(_) => Err(EtchError::unsupported("mapped type")),
        swc_ast::TsType::TsImportType(_) => Err(EtchError::unsupported("import type")),
        swc_ast::TsType::TsTypePredicate(_) => Err(EtchError::unsupported("type predicate")),
    }
}

fn keyword_text(kind: swc_ast::TsKeywordTypeKind) -> &'static str {
    match kind {
        swc_ast::TsKeywordTypeKind::TsStringKeyword => "string",
        swc_ast::TsKeywordTypeKind::TsNumberKeyword => "number",
        swc_ast::TsKeywordTypeKind::TsBooleanKeyword => "boolean",
        swc_ast::TsKeywordTypeKind::TsVoidKeyword => "void",
        swc_ast::TsKeywordTypeKind::TsNullKeyword => "null",
        swc_ast::TsKeywordTypeKind::TsUndefinedKeyword => "undefined",
        swc_ast::TsKeywordTypeKind::TsNeverKeyword => "never",
        swc_ast::TsKeywordTypeKind::TsUnknownKeyword => "unknown",
        swc_ast::TsKeywordTypeKind::TsAnyKeyword => "any",
        swc_ast::TsKeywordTypeKind::TsObjectKeyword => "object",
        swc_ast::TsKeywordTypeKind::TsSymbolKeyword => "symbol",
        swc_ast::TsKeywordTypeKind::TsBigIntKeyword => "bigint",
        swc_ast::TsKeywordTypeKind::TsIntrinsicKeyword => "intrinsic",
    }
}

fn literal_text(lit: &swc_ast::TsLit) -> EtchResult<String> {
    match lit {
        swc_ast::TsLit::Str(s) => {
            let value = String::from_utf8_lossy(s.value.as_bytes()).to_string();
            Ok(serde_json::to_string(&value)?)
        }
        swc_ast::TsLit::Number(n) => Ok(match &n.raw {
            Some(raw) => raw.to_string(),
            None => n.value.to_string(),
        }),
        swc_ast::TsLit::Bool(b) => Ok(b.value.to_string()),
        swc_ast::TsLit::BigInt(b) => Ok(format!("{}n", b.value)),
        swc_ast::TsLit::Tpl(_) => Err(EtchError::unsupported("template literal type")),
    }
}

/// Format a qualified name (e.g., Namespace.Type)
fn entity_name(name: &swc_ast::TsEntityName) -> String {
    match name {
        swc_ast::TsEntityName::Ident(i) => i.sym.to_string(),
        swc_ast::TsEntityName::TsQualifiedName(q) => {
            format!("{}.{}", entity_name(&q.left), q.right.sym)
        }
    }
}

/// `open` items `close`, one item per line with a trailing comma when broken
fn bracketed(open: &str, items: Vec<Doc>, close: &str) -> Doc {
    if items.is_empty() {
        return Doc::text(format!("{}{}", open, close));
    }
    Doc::group(Doc::concat(vec![
        Doc::text(open),
        Doc::indent(Doc::concat(vec![
            Doc::SoftLine,
            Doc::join(items, Doc::concat(vec![Doc::text(","), Doc::Line])),
            Doc::if_break(","),
        ])),
        Doc::SoftLine,
        Doc::text(close),
    ]))
}

fn type_args_doc(args: &swc_ast::TsTypeParamInstantiation) -> EtchResult<Doc> {
    let args = args
        .params
        .iter()
        .map(|p| type_doc(p))
        .collect::<EtchResult<Vec<_>>>()?;
    Ok(bracketed("<", args, ">"))
}

/// Type parameter declarations are kept on one line
fn type_params_text(params: &swc_ast::TsTypeParamDecl) -> EtchResult<String> {
    let mut rendered = Vec::with_capacity(params.params.len());
    for param in &params.params {
        let mut text = String::new();
        if param.is_const {
            text.push_str("const ");
        }
        if param.is_in {
            text.push_str("in ");
        }
        if param.is_out {
            text.push_str("out ");
        }
        text.push_str(&param.name.sym);
        if let Some(constraint) = &param.constraint {
            text.push_str(" extends ");
            text.push_str(&super::layout::print(&type_doc(constraint)?, usize::MAX));
        }
        if let Some(default) = &param.default {
            text.push_str(" = ");
            text.push_str(&super::layout::print(&type_doc(default)?, usize::MAX));
        }
        rendered.push(text);
    }
    Ok(format!("<{}>", rendered.join(", ")))
}

fn tuple_element_doc(element: &swc_ast::TsTupleElement) -> EtchResult<Doc> {
    let ty = type_doc(&element.ty)?;
    match &element.label {
        None => Ok(ty),
        Some(swc_ast::Pat::Ident(i)) => {
            let optional = if i.optional { "?" } else { "" };
            Ok(Doc::concat(vec![
                Doc::text(format!("{}{}: ", i.sym, optional)),
                ty,
            ]))
        }
        Some(swc_ast::Pat::Rest(rest)) => match rest.arg.as_ref() {
            swc_ast::Pat::Ident(i) => Ok(Doc::concat(vec![
                Doc::text(format!("...{}: ", i.sym)),
                ty,
            ])),
            _ => Err(EtchError::unsupported("tuple label pattern")),
        },
        Some(_) => Err(EtchError::unsupported("tuple label pattern")),
    }
}

/// `prefix<T>(params) => return`, or `: return` for members
fn signature_doc(
    prefix: &str,
    type_params: Option<&swc_ast::TsTypeParamDecl>,
    params: &[swc_ast::TsFnParam],
    arrow: &str,
    return_type: &swc_ast::TsType,
) -> EtchResult<Doc> {
    let mut head = prefix.to_string();
    if let Some(type_params) = type_params {
        head.push_str(&type_params_text(type_params)?);
    }
    Ok(Doc::concat(vec![
        Doc::text(head),
        params_doc(params)?,
        Doc::text(arrow),
        type_doc(return_type)?,
    ]))
}

fn params_doc(params: &[swc_ast::TsFnParam]) -> EtchResult<Doc> {
    let params = params
        .iter()
        .map(param_doc)
        .collect::<EtchResult<Vec<_>>>()?;
    Ok(bracketed("(", params, ")"))
}

fn param_doc(param: &swc_ast::TsFnParam) -> EtchResult<Doc> {
    let (label, type_ann) = match param {
        swc_ast::TsFnParam::Ident(i) => {
            let optional = if i.optional { "?" } else { "" };
            (format!("{}{}", i.sym, optional), i.type_ann.as_ref())
        }
        swc_ast::TsFnParam::Rest(r) => match r.arg.as_ref() {
            swc_ast::Pat::Ident(i) => (
                format!("...{}", i.sym),
                r.type_ann.as_ref().or(i.type_ann.as_ref()),
            ),
            _ => return Err(EtchError::unsupported("destructured rest parameter")),
        },
        swc_ast::TsFnParam::Array(_) | swc_ast::TsFnParam::Object(_) => {
            return Err(EtchError::unsupported("destructured parameter"))
        }
    };

    match type_ann {
        Some(ann) => Ok(Doc::concat(vec![
            Doc::text(format!("{}:", label)),
            after_operator(&ann.type_ann, Doc::Line)?,
        ])),
        None => Ok(Doc::text(label)),
    }
}

/// `{ a: T; b: U }` flat, one member per line when broken
fn object_doc(members: Vec<Doc>) -> Doc {
    if members.is_empty() {
        return Doc::text("{}");
    }
    Doc::group(Doc::concat(vec![
        Doc::text("{"),
        Doc::indent(Doc::concat(vec![
            Doc::Line,
            Doc::join(members, Doc::concat(vec![Doc::text(";"), Doc::Line])),
            Doc::if_break(";"),
        ])),
        Doc::Line,
        Doc::text("}"),
    ]))
}

fn property_key(key: &swc_ast::Expr, computed: bool) -> EtchResult<String> {
    if computed {
        return Err(EtchError::unsupported("computed property key"));
    }
    match key {
        swc_ast::Expr::Ident(i) => Ok(i.sym.to_string()),
        swc_ast::Expr::Lit(swc_ast::Lit::Str(s)) => {
            let value = String::from_utf8_lossy(s.value.as_bytes()).to_string();
            Ok(serde_json::to_string(&value)?)
        }
        swc_ast::Expr::Lit(swc_ast::Lit::Num(n)) => Ok(match &n.raw {
            Some(raw) => raw.to_string(),
            None => n.value.to_string(),
        }),
        _ => Err(EtchError::unsupported("property key")),
    }
}

fn type_element_doc(member: &swc_ast::TsTypeElement) -> EtchResult<Doc> {
    match member {
        swc_ast::TsTypeElement::TsPropertySignature(prop) => {
            let mut label = String::new();
            if prop.readonly {
                label.push_str("readonly ");
            }
            label.push_str(&property_key(&prop.key, prop.computed)?);
            if prop.optional {
                label.push('?');
            }
            match &prop.type_ann {
                Some(ann) => Ok(Doc::concat(vec![
                    Doc::text(format!("{}:", label)),
                    after_operator(&ann.type_ann, Doc::Line)?,
                ])),
                None => Ok(Doc::text(label)),
            }
        }
        swc_ast::TsTypeElement::TsMethodSignature(method) => {
            let mut label = property_key(&method.key, method.computed)?;
            if method.optional {
                label.push('?');
            }
            let return_type = method
                .type_ann
                .as_ref()
                .ok_or_else(|| EtchError::unsupported("method without return type"))?;
            signature_doc(
                &label,
                method.type_params.as_deref(),
                &method.params,
                ": ",
                &return_type.type_ann,
            )
        }
        swc_ast::TsTypeElement::TsCallSignatureDecl(call) => {
            let return_type = call
                .type_ann
                .as_ref()
                .ok_or_else(|| EtchError::unsupported("call signature without return type"))?;
            signature_doc(
                "",
                call.type_params.as_deref(),
                &call.params,
                ": ",
                &return_type.type_ann,
            )
        }
        swc_ast::TsTypeElement::TsConstructSignatureDecl(ctor) => {
            let return_type = ctor
                .type_ann
                .as_ref()
                .ok_or_else(|| EtchError::unsupported("construct signature without return type"))?;
            signature_doc(
                "new ",
                ctor.type_params.as_deref(),
                &ctor.params,
                ": ",
                &return_type.type_ann,
            )
        }
        swc_ast::TsTypeElement::TsIndexSignature(index) => {
            let params = index
                .params
                .iter()
                .map(param_doc)
                .collect::<EtchResult<Vec<_>>>()?;
            let value = index
                .type_ann
                .as_ref()
                .ok_or_else(|| EtchError::unsupported("index signature without value type"))?;
            let prefix = if index.readonly { "readonly [" } else { "[" };
            Ok(Doc::concat(vec![
                Doc::text(prefix),
                Doc::join(params, Doc::text(", ")),
                Doc::text("]:"),
                after_operator(&value.type_ann, Doc::Line)?,
            ]))
        }
        swc_ast::TsTypeElement::TsGetterSignature(_)
        | swc_ast::TsTypeElement::TsSetterSignature(_) => {
            Err(EtchError::unsupported("accessor signature"))
        }
    }
}

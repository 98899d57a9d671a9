//! Python normalizer.

use crate::language::Language;
use crate::syntax::SyntaxNode;
use crate::unified::{
    Binding, ClassKind, ParamList, UnifiedClass, UnifiedExport, UnifiedFunction, UnifiedImport,
    UnifiedParam,
};

use super::context::NormalizeScope;
use super::grammar::{ArgShape, ChainStep, Grammar, ObjectEntry};
use super::helpers::{
    body_lines, clean_type, collapse_whitespace, preceding_decorators, qualify, unquote, walk_preorder,
};
use super::LanguageNormalizer;

const SEP: &str = ".";

pub struct PyGrammar;

impl Grammar for PyGrammar {
    fn path_separator(&self) -> &'static str {
        SEP
    }

    fn chain_link_kinds(&self) -> &'static [&'static str] {
        &["call", "attribute"]
    }

    fn suspend_kinds(&self) -> &'static [&'static str] {
        &["await"]
    }

    fn comment_kinds(&self) -> &'static [&'static str] {
        &["comment"]
    }

    fn decorator_kinds(&self) -> &'static [&'static str] {
        &["decorator"]
    }

    fn classify_chain<'t>(&self, node: SyntaxNode<'t>) -> ChainStep<'t> {
        match node.kind() {
            "call" => {
                let Some(callee) = node.field("function") else {
                    return ChainStep::Opaque;
                };
                let arguments = node.field("arguments");
                match callee.kind() {
                    "attribute" => match (callee.field("attribute"), callee.field("object")) {
                        (Some(name), Some(receiver)) => ChainStep::MethodCall {
                            name,
                            arguments,
                            receiver,
                        },
                        _ => ChainStep::Invoke { callee, arguments },
                    },
                    "identifier" => ChainStep::FreeCall {
                        name: callee,
                        arguments,
                    },
                    _ => ChainStep::Invoke { callee, arguments },
                }
            }
            "attribute" => match (node.field("attribute"), node.field("object")) {
                (Some(name), Some(base)) => ChainStep::Field { name, base },
                _ => ChainStep::Opaque,
            },
            "subscript" => match node.field("value") {
                Some(inner) => ChainStep::Transparent { inner },
                None => ChainStep::Opaque,
            },
            "await" => match node.first_named_child() {
                Some(operand) => ChainStep::Suspend {
                    marker: "await",
                    operand,
                },
                None => ChainStep::Opaque,
            },
            "parenthesized_expression" => match node.first_named_child() {
                Some(inner) => ChainStep::Transparent { inner },
                None => ChainStep::Opaque,
            },
            "identifier" => ChainStep::Terminal,
            _ => ChainStep::Opaque,
        }
    }

    fn classify_arg<'t>(&self, node: SyntaxNode<'t>) -> ArgShape<'t> {
        match node.kind() {
            "string" if node.has_child_kind("interpolation") => ArgShape::Opaque,
            "string" => ArgShape::Str(unquote(node.text())),
            "concatenated_string" => {
                let parts = node.named_children();
                if parts.iter().any(|p| p.has_child_kind("interpolation")) {
                    ArgShape::Opaque
                } else {
                    ArgShape::Str(parts.iter().map(|p| unquote(p.text())).collect())
                }
            }
            "integer" | "float" => ArgShape::Num(node.text()),
            "unary_operator" => {
                let negative = node.field_text("operator") == Some("-");
                let numeric = node
                    .field("argument")
                    .is_some_and(|a| matches!(a.kind(), "integer" | "float"));
                if negative && numeric {
                    ArgShape::Num(node.text())
                } else {
                    ArgShape::Opaque
                }
            }
            "true" => ArgShape::Bool(true),
            "false" => ArgShape::Bool(false),
            "none" => ArgShape::Null,
            "identifier" => ArgShape::Ident(node.text()),
            "dictionary" => ArgShape::Object(
                node.named_children()
                    .into_iter()
                    .filter(|c| !self.is_comment(c.kind()))
                    .map(dict_entry)
                    .collect(),
            ),
            "list" | "tuple" | "set" => ArgShape::Array(
                node.named_children()
                    .into_iter()
                    .filter(|c| !self.is_comment(c.kind()))
                    .collect(),
            ),
            "keyword_argument" => match (node.field_text("name"), node.field("value")) {
                (Some(name), Some(value)) => ArgShape::Keyword { name, value },
                _ => ArgShape::Opaque,
            },
            "parenthesized_expression" => match node.first_named_child() {
                Some(inner) => ArgShape::Wrapped(inner),
                None => ArgShape::Opaque,
            },
            _ => ArgShape::Opaque,
        }
    }

    fn argument_nodes<'t>(&self, args: SyntaxNode<'t>) -> Vec<SyntaxNode<'t>> {
        // `f(x for x in xs)` passes the bare generator as the only argument.
        if args.kind() == "generator_expression" {
            return vec![args];
        }
        args.named_children()
            .into_iter()
            .filter(|n| !self.is_comment(n.kind()))
            .collect()
    }
}

fn dict_entry(entry: SyntaxNode<'_>) -> ObjectEntry<'_> {
    if entry.kind() != "pair" {
        return ObjectEntry::Opaque { node: entry };
    }
    let (Some(key), Some(value)) = (entry.field("key"), entry.field("value")) else {
        return ObjectEntry::Opaque { node: entry };
    };
    let key = match key.kind() {
        "string" if !key.has_child_kind("interpolation") => unquote(key.text()),
        "identifier" | "integer" | "float" | "true" | "false" => key.text().to_string(),
        _ => return ObjectEntry::Opaque { node: entry },
    };
    ObjectEntry::Pair { key, value }
}

// ---- Declarations ----

/// Public by naming convention: no leading underscore, or a dunder.
fn is_public_name(name: &str) -> bool {
    !name.starts_with('_') || (name.len() > 4 && name.starts_with("__") && name.ends_with("__"))
}

/// The definition inside a `decorated_definition`, or the node itself.
fn unwrap_decorated(node: SyntaxNode<'_>) -> SyntaxNode<'_> {
    if node.kind() == "decorated_definition" {
        node.field("definition").unwrap_or(node)
    } else {
        node
    }
}

fn parameters_of(function: SyntaxNode<'_>) -> ParamList {
    let mut params = ParamList::new();
    let Some(list) = function.field("parameters") else {
        return params;
    };
    for param in list.named_children() {
        match param.kind() {
            "identifier" => params.push(UnifiedParam::named(param.text())),
            "typed_parameter" => {
                let Some(inner) = param.first_named_child() else { continue };
                let mut p = splat_or_named(inner);
                p.type_annotation = param.field("type").map(|t| clean_type(t.text()));
                params.push(p);
            }
            "default_parameter" | "typed_default_parameter" => {
                let name = param.field_text("name").unwrap_or_default();
                let mut p = UnifiedParam::named(name);
                p.type_annotation = param.field("type").map(|t| clean_type(t.text()));
                p.default_value = param.field_text("value").map(collapse_whitespace);
                p.is_optional = true;
                params.push(p);
            }
            "list_splat_pattern" | "dictionary_splat_pattern" => params.push(splat_or_named(param)),
            _ => {}
        }
    }
    params
}

fn splat_or_named(node: SyntaxNode<'_>) -> UnifiedParam {
    match node.kind() {
        "list_splat_pattern" | "dictionary_splat_pattern" => {
            let name = node
                .first_named_child()
                .map(|n| n.text())
                .unwrap_or_else(|| node.text().trim_start_matches('*'));
            let mut p = UnifiedParam::named(name);
            p.is_rest = true;
            p
        }
        _ => UnifiedParam::named(node.text()),
    }
}

#[derive(Default)]
struct Decls {
    functions: Vec<UnifiedFunction>,
    classes: Vec<UnifiedClass>,
}

pub struct PythonNormalizer;

impl PythonNormalizer {
    /// Declarations under `root`. Plain statements and expressions are
    /// walked iteratively; only nested declarations recurse.
    fn visit(
        &self,
        root: SyntaxNode<'_>,
        prefix: &[String],
        decls: &mut Decls,
        scope: &mut NormalizeScope<'_>,
        depth: usize,
    ) {
        if !scope.enter_scope(prefix.len()) {
            return;
        }
        walk_preorder(root, depth, scope, |node, depth, scope| match node.kind() {
            "function_definition" => {
                self.visit_function(node, prefix, None, decls, scope, depth);
                false
            }
            "class_definition" => {
                self.visit_class(node, prefix, decls, scope, depth);
                false
            }
            _ => true,
        });
    }

    fn visit_function(
        &self,
        node: SyntaxNode<'_>,
        prefix: &[String],
        class_name: Option<&str>,
        decls: &mut Decls,
        scope: &mut NormalizeScope<'_>,
        depth: usize,
    ) -> Option<String> {
        let Some(name) = node.field_text("name") else {
            scope.stats.skipped_declarations += 1;
            return None;
        };
        let parameters = parameters_of(node);
        let decorators = preceding_decorators(&PyGrammar, node);
        let is_method = class_name.is_some();
        let is_staticmethod = decorators.iter().any(|d| d.trim_start_matches('@').trim() == "staticmethod");
        let has_receiver = parameters
            .first()
            .is_some_and(|p| matches!(p.name.as_str(), "self" | "cls"));
        let body = node.field("body");
        let (body_start_line, body_end_line) = body_lines(body);

        decls.functions.push(UnifiedFunction {
            name: name.to_string(),
            qualified_name: qualify(prefix, name, SEP),
            file: scope.file.to_string(),
            start: node.start(),
            end: node.end(),
            parameters,
            return_type: node.field("return_type").map(|t| clean_type(t.text())),
            is_method,
            is_static: is_method && (is_staticmethod || !has_receiver),
            is_exported: is_public_name(name),
            is_constructor: is_method && name == "__init__",
            is_async: node.has_child_kind("async"),
            class_name: class_name.map(str::to_string),
            decorators,
            body_start_line,
            body_end_line,
        });

        if let Some(body) = body {
            let mut inner = prefix.to_vec();
            inner.push(name.to_string());
            for child in body.named_children() {
                self.visit(child, &inner, decls, scope, depth + 1);
            }
        }
        Some(name.to_string())
    }

    fn visit_class(
        &self,
        node: SyntaxNode<'_>,
        prefix: &[String],
        decls: &mut Decls,
        scope: &mut NormalizeScope<'_>,
        depth: usize,
    ) {
        let Some(name) = node.field_text("name") else {
            scope.stats.skipped_declarations += 1;
            return;
        };
        let base_classes = node
            .field("superclasses")
            .map(|list| {
                list.named_children()
                    .into_iter()
                    .filter(|b| !matches!(b.kind(), "keyword_argument" | "comment"))
                    .map(|b| collapse_whitespace(b.text()))
                    .collect()
            })
            .unwrap_or_default();

        let mut inner = prefix.to_vec();
        inner.push(name.to_string());
        let mut methods = Vec::new();
        if let Some(body) = node.field("body") {
            for member in body.named_children() {
                let definition = unwrap_decorated(member);
                if definition.kind() == "function_definition" {
                    if let Some(method) = self.visit_function(definition, &inner, Some(name), decls, scope, depth + 1)
                    {
                        methods.push(method);
                    }
                } else {
                    self.visit(member, &inner, decls, scope, depth + 1);
                }
            }
        }

        decls.classes.push(UnifiedClass {
            name: name.to_string(),
            kind: ClassKind::Class,
            file: scope.file.to_string(),
            start_line: node.start().line,
            end_line: node.end().line,
            base_classes,
            methods,
            is_exported: is_public_name(name),
        });
    }
}

// ---- Imports / exports ----

fn first_component(dotted: &str) -> &str {
    dotted.split('.').next().unwrap_or(dotted)
}

fn import_from_bindings(statement: SyntaxNode<'_>) -> Vec<Binding> {
    if statement.has_child_kind("wildcard_import") {
        return vec![Binding::namespace("*")];
    }
    statement
        .fields("name")
        .into_iter()
        .filter_map(|name| match name.kind() {
            "aliased_import" => Some(Binding::named(name.field_text("name")?, name.field_text("alias")?)),
            _ => Some(Binding::same(name.text())),
        })
        .collect()
}

fn imports_of(statement: SyntaxNode<'_>, is_type_only: bool, out: &mut Vec<UnifiedImport>) {
    let line = statement.line();
    match statement.kind() {
        "import_statement" => {
            for name in statement.fields("name") {
                let (source, local) = match name.kind() {
                    "aliased_import" => {
                        let Some(source) = name.field_text("name") else { continue };
                        let local = name.field_text("alias").unwrap_or_else(|| first_component(source));
                        (source, local)
                    }
                    _ => (name.text(), first_component(name.text())),
                };
                out.push(UnifiedImport {
                    source: source.to_string(),
                    bindings: vec![Binding::named(source, local)],
                    line,
                    is_type_only,
                });
            }
        }
        "import_from_statement" => {
            let Some(module) = statement.field_text("module_name") else { return };
            out.push(UnifiedImport {
                source: module.to_string(),
                bindings: import_from_bindings(statement),
                line,
                is_type_only,
            });
        }
        "future_import_statement" => out.push(UnifiedImport {
            source: "__future__".to_string(),
            bindings: import_from_bindings(statement),
            line,
            is_type_only: false,
        }),
        _ => {}
    }
}

fn is_type_checking_block(node: SyntaxNode<'_>) -> bool {
    node.kind() == "if_statement"
        && node
            .field_text("condition")
            .is_some_and(|c| matches!(c.trim(), "TYPE_CHECKING" | "typing.TYPE_CHECKING"))
}

/// Strings in a top-level `__all__ = [...]` (or `+=`), if present.
fn dunder_all(root: SyntaxNode<'_>) -> Option<(u32, Vec<String>)> {
    let mut found: Option<(u32, Vec<String>)> = None;
    for statement in root.named_children() {
        if statement.kind() != "expression_statement" {
            continue;
        }
        let Some(assignment) = statement.first_named_child() else { continue };
        if !matches!(assignment.kind(), "assignment" | "augmented_assignment") {
            continue;
        }
        if assignment.field_text("left") != Some("__all__") {
            continue;
        }
        let Some(right) = assignment.field("right") else { continue };
        let names = right
            .named_children()
            .into_iter()
            .filter(|n| n.kind() == "string")
            .map(|n| unquote(n.text()));
        let entry = found.get_or_insert_with(|| (statement.line(), Vec::new()));
        if assignment.kind() == "assignment" {
            entry.1.clear();
        }
        entry.1.extend(names);
    }
    found
}

impl LanguageNormalizer for PythonNormalizer {
    fn language(&self) -> Language {
        Language::Python
    }

    fn grammar(&self) -> &dyn Grammar {
        &PyGrammar
    }

    fn extract_declarations(
        &self,
        root: SyntaxNode<'_>,
        scope: &mut NormalizeScope<'_>,
    ) -> (Vec<UnifiedFunction>, Vec<UnifiedClass>) {
        let mut decls = Decls::default();
        self.visit(root, &[], &mut decls, scope, 0);
        (decls.functions, decls.classes)
    }

    fn extract_imports(&self, root: SyntaxNode<'_>, _scope: &mut NormalizeScope<'_>) -> Vec<UnifiedImport> {
        let mut imports = Vec::new();
        for statement in root.named_children() {
            if is_type_checking_block(statement) {
                if let Some(block) = statement.field("consequence") {
                    for inner in block.named_children() {
                        imports_of(inner, true, &mut imports);
                    }
                }
            } else {
                imports_of(statement, false, &mut imports);
            }
        }
        imports
    }

    fn extract_exports(&self, root: SyntaxNode<'_>, _scope: &mut NormalizeScope<'_>) -> Vec<UnifiedExport> {
        if let Some((line, names)) = dunder_all(root) {
            return vec![UnifiedExport {
                source: None,
                bindings: names.into_iter().map(Binding::same).collect(),
                line,
                is_type_only: false,
            }];
        }

        root.named_children()
            .into_iter()
            .filter_map(|statement| {
                let definition = unwrap_decorated(statement);
                if !matches!(definition.kind(), "function_definition" | "class_definition") {
                    return None;
                }
                let name = definition.field_text("name")?;
                is_public_name(name).then(|| UnifiedExport {
                    source: None,
                    bindings: vec![Binding::same(name)],
                    line: statement.line(),
                    is_type_only: false,
                })
            })
            .collect()
    }
}

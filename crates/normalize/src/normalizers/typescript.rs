//! TypeScript/JavaScript normalizer.
//!
//! Both grammars share node kinds for everything extracted here, so one
//! normalizer serves both; only the reported [`Language`] differs.

use crate::language::Language;
use crate::syntax::SyntaxNode;
use crate::unified::{
    Binding, ClassKind, ParamList, UnifiedClass, UnifiedExport, UnifiedFunction, UnifiedImport,
    UnifiedParam,
};

use super::context::NormalizeScope;
use super::grammar::{ArgShape, ChainStep, Grammar, ObjectEntry};
use super::helpers::{
    base_type_name, body_lines, child_decorators, clean_type, collapse_whitespace,
    preceding_decorators, qualify, unquote, walk_preorder,
};
use super::LanguageNormalizer;

const SEP: &str = ".";

const FUNCTION_VALUES: &[&str] = &[
    "arrow_function",
    "function_expression",
    "function",
    "generator_function",
];

pub struct TsGrammar;

impl Grammar for TsGrammar {
    fn path_separator(&self) -> &'static str {
        SEP
    }

    fn chain_link_kinds(&self) -> &'static [&'static str] {
        &["call_expression", "member_expression"]
    }

    fn suspend_kinds(&self) -> &'static [&'static str] {
        &["await_expression"]
    }

    fn comment_kinds(&self) -> &'static [&'static str] {
        &["comment", "html_comment"]
    }

    fn decorator_kinds(&self) -> &'static [&'static str] {
        &["decorator"]
    }

    fn classify_chain<'t>(&self, node: SyntaxNode<'t>) -> ChainStep<'t> {
        match node.kind() {
            "call_expression" => {
                let Some(callee) = node.field("function") else {
                    return ChainStep::Opaque;
                };
                let arguments = node.field("arguments");
                match callee.kind() {
                    "member_expression" => match (callee.field("property"), callee.field("object")) {
                        (Some(name), Some(receiver)) => ChainStep::MethodCall {
                            name,
                            arguments,
                            receiver,
                        },
                        _ => ChainStep::Invoke { callee, arguments },
                    },
                    "identifier" | "import" | "super" => ChainStep::FreeCall {
                        name: callee,
                        arguments,
                    },
                    _ => ChainStep::Invoke { callee, arguments },
                }
            }
            "member_expression" => match (node.field("property"), node.field("object")) {
                (Some(name), Some(base)) => ChainStep::Field { name, base },
                _ => ChainStep::Opaque,
            },
            "subscript_expression" => match node.field("object") {
                Some(inner) => ChainStep::Transparent { inner },
                None => ChainStep::Opaque,
            },
            "await_expression" => match node.first_named_child() {
                Some(operand) => ChainStep::Suspend {
                    marker: "await",
                    operand,
                },
                None => ChainStep::Opaque,
            },
            "parenthesized_expression" | "non_null_expression" | "as_expression"
            | "satisfies_expression" => match node.first_named_child() {
                Some(inner) => ChainStep::Transparent { inner },
                None => ChainStep::Opaque,
            },
            "identifier" | "this" | "super" => ChainStep::Terminal,
            _ => ChainStep::Opaque,
        }
    }

    fn classify_arg<'t>(&self, node: SyntaxNode<'t>) -> ArgShape<'t> {
        match node.kind() {
            "string" => ArgShape::Str(unquote(node.text())),
            "template_string" if node.has_child_kind("template_substitution") => ArgShape::Opaque,
            "template_string" => ArgShape::Str(unquote(node.text())),
            "number" => ArgShape::Num(node.text()),
            "unary_expression" => {
                let negative = node.field_text("operator") == Some("-");
                let numeric = node.field("argument").is_some_and(|a| a.kind() == "number");
                if negative && numeric {
                    ArgShape::Num(node.text())
                } else {
                    ArgShape::Opaque
                }
            }
            "true" => ArgShape::Bool(true),
            "false" => ArgShape::Bool(false),
            "null" | "undefined" => ArgShape::Null,
            "identifier" if node.text() == "undefined" => ArgShape::Null,
            "identifier" | "this" => ArgShape::Ident(node.text()),
            "object" => ArgShape::Object(
                node.named_children()
                    .into_iter()
                    .filter(|c| !self.is_comment(c.kind()))
                    .map(object_entry)
                    .collect(),
            ),
            "array" => ArgShape::Array(
                node.named_children()
                    .into_iter()
                    .filter(|c| !self.is_comment(c.kind()))
                    .collect(),
            ),
            "parenthesized_expression" | "non_null_expression" | "as_expression"
            | "satisfies_expression" => match node.first_named_child() {
                Some(inner) => ArgShape::Wrapped(inner),
                None => ArgShape::Opaque,
            },
            _ => ArgShape::Opaque,
        }
    }

    fn argument_nodes<'t>(&self, args: SyntaxNode<'t>) -> Vec<SyntaxNode<'t>> {
        // Tagged templates pass the template itself as the argument list.
        if args.kind() == "template_string" {
            return vec![args];
        }
        args.named_children()
            .into_iter()
            .filter(|n| !self.is_comment(n.kind()))
            .collect()
    }
}

fn object_entry(entry: SyntaxNode<'_>) -> ObjectEntry<'_> {
    match entry.kind() {
        "pair" => {
            let (Some(key), Some(value)) = (entry.field("key"), entry.field("value")) else {
                return ObjectEntry::Opaque { node: entry };
            };
            let key = match key.kind() {
                "property_identifier" | "identifier" | "number" | "private_property_identifier" => {
                    key.text().to_string()
                }
                "string" => unquote(key.text()),
                _ => return ObjectEntry::Opaque { node: entry },
            };
            ObjectEntry::Pair { key, value }
        }
        "shorthand_property_identifier" => ObjectEntry::Shorthand {
            name: entry.text(),
            node: entry,
        },
        _ => ObjectEntry::Opaque { node: entry },
    }
}

// ---- Declarations ----

#[derive(Default)]
struct Decls {
    functions: Vec<UnifiedFunction>,
    classes: Vec<UnifiedClass>,
}

/// Where a function is declared.
struct Owner<'o> {
    class_name: &'o str,
    prefix: &'o [String],
}

fn is_export_wrapped(node: SyntaxNode<'_>) -> bool {
    node.parent().is_some_and(|p| p.kind() == "export_statement")
}

/// Direct decorators, preceding sibling decorators, and decorators on a
/// wrapping `export` statement, in source order.
fn decorators_of(node: SyntaxNode<'_>) -> Vec<String> {
    let mut decorators = preceding_decorators(&TsGrammar, node);
    if let Some(parent) = node.parent().filter(|p| p.kind() == "export_statement") {
        decorators.extend(child_decorators(&TsGrammar, parent));
    }
    decorators.extend(child_decorators(&TsGrammar, node));
    decorators
}

fn parameters_of(node: SyntaxNode<'_>) -> ParamList {
    let mut params = ParamList::new();
    if let Some(single) = node.field("parameter") {
        params.push(UnifiedParam::named(single.text()));
        return params;
    }
    let Some(list) = node.field("parameters") else {
        return params;
    };
    for param in list.named_children() {
        match param.kind() {
            "required_parameter" | "optional_parameter" => {
                let Some(pattern) = param.field("pattern") else { continue };
                let mut p = if pattern.kind() == "rest_pattern" {
                    let mut p = UnifiedParam::named(rest_name(pattern));
                    p.is_rest = true;
                    p
                } else {
                    UnifiedParam::named(collapse_whitespace(pattern.text()))
                };
                p.type_annotation = param.field("type").map(|t| clean_type(t.text()));
                p.default_value = param.field_text("value").map(str::to_string);
                p.is_optional = param.kind() == "optional_parameter" || p.default_value.is_some();
                params.push(p);
            }
            "identifier" | "object_pattern" | "array_pattern" => {
                params.push(UnifiedParam::named(collapse_whitespace(param.text())));
            }
            "assignment_pattern" => {
                let name = param.field_text("left").unwrap_or_default();
                let mut p = UnifiedParam::named(collapse_whitespace(name));
                p.default_value = param.field_text("right").map(str::to_string);
                p.is_optional = true;
                params.push(p);
            }
            "rest_pattern" => {
                let mut p = UnifiedParam::named(rest_name(param));
                p.is_rest = true;
                params.push(p);
            }
            _ => {}
        }
    }
    params
}

fn rest_name(pattern: SyntaxNode<'_>) -> String {
    pattern
        .first_named_child()
        .map(|n| n.text().to_string())
        .unwrap_or_else(|| pattern.text().trim_start_matches("...").to_string())
}

fn is_private_member(node: SyntaxNode<'_>, name: &str) -> bool {
    if name.starts_with('#') {
        return true;
    }
    node.named_children().iter().any(|c| {
        c.kind() == "accessibility_modifier" && matches!(c.text().trim(), "private" | "protected")
    })
}

pub struct TypeScriptNormalizer {
    language: Language,
}

impl TypeScriptNormalizer {
    pub const fn new(language: Language) -> Self {
        Self { language }
    }

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
        walk_preorder(root, depth, scope, |node, depth, scope| {
            self.visit_declaration(node, prefix, decls, scope, depth)
        });
    }

    /// Handle one node if it declares something. Returns whether the walk
    /// should descend into its children.
    fn visit_declaration(
        &self,
        node: SyntaxNode<'_>,
        prefix: &[String],
        decls: &mut Decls,
        scope: &mut NormalizeScope<'_>,
        depth: usize,
    ) -> bool {
        match node.kind() {
            "function_declaration" | "generator_function_declaration" => {
                let Some(name) = node.field_text("name") else {
                    scope.stats.skipped_declarations += 1;
                    return false;
                };
                let function = self.build_function(node, node, name, prefix, None, is_export_wrapped(node), scope);
                decls.functions.push(function);
                self.visit_body(node, prefix, name, decls, scope, depth);
            }
            "variable_declarator" => {
                let declaration = node.parent().unwrap_or(node);
                let exported = is_export_wrapped(declaration);
                match (node.field("name"), node.field("value")) {
                    (Some(name), Some(value))
                        if name.kind() == "identifier" && FUNCTION_VALUES.contains(&value.kind()) =>
                    {
                        let function =
                            self.build_function(value, declaration, name.text(), prefix, None, exported, scope);
                        decls.functions.push(function);
                        self.visit_body(value, prefix, name.text(), decls, scope, depth);
                    }
                    (Some(name), Some(value)) if value.kind() == "class" => {
                        self.visit_class(value, Some(name.text()), prefix, exported, decls, scope, depth);
                    }
                    _ => return true,
                }
            }
            "class_declaration" | "abstract_class_declaration" | "class" => {
                self.visit_class(node, None, prefix, is_export_wrapped(node), decls, scope, depth);
            }
            "interface_declaration" => self.visit_interface(node, prefix, decls, scope),
            "enum_declaration" => {
                let Some(name) = node.field_text("name") else {
                    scope.stats.skipped_declarations += 1;
                    return false;
                };
                decls.classes.push(UnifiedClass {
                    name: name.to_string(),
                    kind: ClassKind::Enum,
                    file: scope.file.to_string(),
                    start_line: node.start().line,
                    end_line: node.end().line,
                    base_classes: Vec::new(),
                    methods: Vec::new(),
                    is_exported: is_export_wrapped(node),
                });
            }
            _ => return true,
        }
        false
    }

    /// Nested declarations inside a function body, scoped under its name.
    fn visit_body(
        &self,
        function: SyntaxNode<'_>,
        prefix: &[String],
        name: &str,
        decls: &mut Decls,
        scope: &mut NormalizeScope<'_>,
        depth: usize,
    ) {
        if let Some(body) = function.field("body") {
            let mut inner = prefix.to_vec();
            inner.push(name.to_string());
            self.visit(body, &inner, decls, scope, depth + 1);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn visit_class(
        &self,
        node: SyntaxNode<'_>,
        bound_name: Option<&str>,
        prefix: &[String],
        exported: bool,
        decls: &mut Decls,
        scope: &mut NormalizeScope<'_>,
        depth: usize,
    ) {
        let Some(name) = node.field_text("name").or(bound_name) else {
            scope.stats.skipped_declarations += 1;
            return;
        };

        let mut base_classes = Vec::new();
        if let Some(heritage) = node.child_of_kind(&["class_heritage"]) {
            for clause in heritage.named_children() {
                match clause.kind() {
                    "extends_clause" => base_classes.extend(
                        clause
                            .fields("value")
                            .into_iter()
                            .map(|v| base_type_name(v.text())),
                    ),
                    "implements_clause" => base_classes.extend(
                        clause
                            .named_children()
                            .into_iter()
                            .filter(|t| !TsGrammar.is_comment(t.kind()))
                            .map(|t| base_type_name(t.text())),
                    ),
                    // JavaScript: `extends <expression>` directly.
                    kind if !TsGrammar.is_comment(kind) => base_classes.push(base_type_name(clause.text())),
                    _ => {}
                }
            }
        }

        let mut member_prefix = prefix.to_vec();
        member_prefix.push(name.to_string());
        let owner = Owner {
            class_name: name,
            prefix: &member_prefix,
        };

        let mut methods = Vec::new();
        if let Some(body) = node.field("body") {
            for member in body.named_children() {
                let (function_node, name_node) = match member.kind() {
                    "method_definition" | "abstract_method_signature" | "method_signature" => {
                        (member, member.field("name"))
                    }
                    "public_field_definition" | "field_definition" => {
                        let value = member.field("value").filter(|v| FUNCTION_VALUES.contains(&v.kind()));
                        match value {
                            Some(value) => (value, member.field("name").or_else(|| member.field("property"))),
                            None => continue,
                        }
                    }
                    _ => continue,
                };
                let Some(member_name) = name_node.map(|n| n.text()) else {
                    scope.stats.skipped_declarations += 1;
                    continue;
                };
                let is_exported = !is_private_member(member, member_name);
                let function =
                    self.build_function(function_node, member, member_name, prefix, Some(&owner), is_exported, scope);
                methods.push(function.name.clone());
                decls.functions.push(function);
                self.visit_body(function_node, &member_prefix, member_name, decls, scope, depth + 1);
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
            is_exported: exported,
        });
    }

    fn visit_interface(
        &self,
        node: SyntaxNode<'_>,
        prefix: &[String],
        decls: &mut Decls,
        scope: &mut NormalizeScope<'_>,
    ) {
        let Some(name) = node.field_text("name") else {
            scope.stats.skipped_declarations += 1;
            return;
        };
        let base_classes = node
            .child_of_kind(&["extends_type_clause"])
            .map(|clause| {
                clause
                    .named_children()
                    .into_iter()
                    .filter(|t| !TsGrammar.is_comment(t.kind()))
                    .map(|t| base_type_name(t.text()))
                    .collect()
            })
            .unwrap_or_default();

        let mut member_prefix = prefix.to_vec();
        member_prefix.push(name.to_string());
        let owner = Owner {
            class_name: name,
            prefix: &member_prefix,
        };
        let mut methods = Vec::new();
        if let Some(body) = node.field("body") {
            for member in body.named_children() {
                if member.kind() != "method_signature" {
                    continue;
                }
                let Some(member_name) = member.field_text("name") else {
                    scope.stats.skipped_declarations += 1;
                    continue;
                };
                let function = self.build_function(member, member, member_name, prefix, Some(&owner), true, scope);
                methods.push(function.name.clone());
                decls.functions.push(function);
            }
        }

        decls.classes.push(UnifiedClass {
            name: name.to_string(),
            kind: ClassKind::Interface,
            file: scope.file.to_string(),
            start_line: node.start().line,
            end_line: node.end().line,
            base_classes,
            methods,
            is_exported: is_export_wrapped(node),
        });
    }

    /// `function_node` carries parameters and body; `decl_node` is the
    /// statement or member that carries modifiers, decorators and the span.
    #[allow(clippy::too_many_arguments)]
    fn build_function(
        &self,
        function_node: SyntaxNode<'_>,
        decl_node: SyntaxNode<'_>,
        name: &str,
        prefix: &[String],
        owner: Option<&Owner<'_>>,
        is_exported: bool,
        scope: &mut NormalizeScope<'_>,
    ) -> UnifiedFunction {
        let qualified_prefix = owner.map(|o| o.prefix).unwrap_or(prefix);
        let is_method = owner.is_some();
        let is_async = function_node.has_child_kind("async") || decl_node.has_child_kind("async");
        let (body_start_line, body_end_line) = body_lines(function_node.field("body"));

        UnifiedFunction {
            name: name.to_string(),
            qualified_name: qualify(qualified_prefix, name, SEP),
            file: scope.file.to_string(),
            start: decl_node.start(),
            end: decl_node.end(),
            parameters: parameters_of(function_node),
            return_type: function_node.field("return_type").map(|t| clean_type(t.text())),
            is_method,
            is_static: is_method && decl_node.has_child_kind("static"),
            is_exported,
            is_constructor: is_method && name == "constructor",
            is_async,
            class_name: owner.map(|o| o.class_name.to_string()),
            decorators: decorators_of(decl_node),
            body_start_line,
            body_end_line,
        }
    }
}

// ---- Imports / exports ----

fn import_bindings(clause: SyntaxNode<'_>) -> Vec<Binding> {
    let mut bindings = Vec::new();
    for part in clause.named_children() {
        match part.kind() {
            "identifier" => bindings.push(Binding::default_binding(part.text())),
            "namespace_import" => {
                if let Some(local) = part.first_named_child() {
                    bindings.push(Binding::namespace(local.text()));
                }
            }
            "named_imports" => {
                for specifier in part.named_children() {
                    if specifier.kind() != "import_specifier" {
                        continue;
                    }
                    let Some(imported) = specifier.field_text("name") else { continue };
                    let imported = module_export_name(imported);
                    let local = specifier.field_text("alias").map(module_export_name);
                    let local = local.unwrap_or_else(|| imported.clone());
                    bindings.push(Binding::named(imported, local));
                }
            }
            _ => {}
        }
    }
    bindings
}

/// Export/import names may be string literals (`export { a as "b c" }`).
fn module_export_name(text: &str) -> String {
    if text.starts_with(['"', '\'']) {
        unquote(text)
    } else {
        text.to_string()
    }
}

/// `require('m')` call, returning the module specifier.
fn require_source(node: SyntaxNode<'_>) -> Option<String> {
    if node.kind() != "call_expression" || node.field_text("function") != Some("require") {
        return None;
    }
    let first = node.field("arguments")?.named_children().into_iter().next()?;
    (first.kind() == "string").then(|| unquote(first.text()))
}

fn require_imports(statement: SyntaxNode<'_>) -> Vec<UnifiedImport> {
    let mut imports = Vec::new();
    for declarator in statement.named_children() {
        if declarator.kind() != "variable_declarator" {
            continue;
        }
        let (Some(name), Some(value)) = (declarator.field("name"), declarator.field("value")) else {
            continue;
        };
        let Some(source) = require_source(value) else { continue };
        let bindings = match name.kind() {
            "identifier" => vec![Binding::default_binding(name.text())],
            "object_pattern" => name
                .named_children()
                .into_iter()
                .filter_map(|p| match p.kind() {
                    "shorthand_property_identifier_pattern" => Some(Binding::same(p.text())),
                    "pair_pattern" => Some(Binding::named(p.field_text("key")?, p.field_text("value")?)),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };
        imports.push(UnifiedImport {
            source,
            bindings,
            line: statement.line(),
            is_type_only: false,
        });
    }
    imports
}

/// Names declared by an exported declaration.
fn declared_names(declaration: SyntaxNode<'_>) -> Vec<String> {
    match declaration.kind() {
        "lexical_declaration" | "variable_declaration" => declaration
            .named_children()
            .into_iter()
            .filter(|d| d.kind() == "variable_declarator")
            .filter_map(|d| d.field("name"))
            .map(|n| n.text().to_string())
            .collect(),
        _ => declaration
            .field_text("name")
            .map(|n| vec![n.to_string()])
            .unwrap_or_default(),
    }
}

fn export_from_statement(statement: SyntaxNode<'_>) -> Option<UnifiedExport> {
    let source = statement.field_text("source").map(unquote);
    let mut is_type_only = statement.has_child_kind("type");
    let mut bindings = Vec::new();

    if statement.has_child_kind("default") {
        let target = statement.field("declaration").or_else(|| statement.field("value"));
        let imported = target
            .and_then(|t| match t.kind() {
                "identifier" => Some(t.text().to_string()),
                _ => t.field_text("name").map(str::to_string),
            })
            .unwrap_or_else(|| "default".to_string());
        bindings.push(Binding {
            imported,
            local: "default".to_string(),
            is_default: true,
            is_namespace: false,
        });
    } else if let Some(declaration) = statement.field("declaration") {
        is_type_only |= matches!(declaration.kind(), "interface_declaration" | "type_alias_declaration");
        bindings.extend(declared_names(declaration).into_iter().map(Binding::same));
    } else if let Some(clause) = statement.child_of_kind(&["export_clause"]) {
        for specifier in clause.named_children() {
            if specifier.kind() != "export_specifier" {
                continue;
            }
            let Some(name) = specifier.field_text("name") else { continue };
            let name = module_export_name(name);
            let alias = specifier.field_text("alias").map(module_export_name);
            let alias = alias.unwrap_or_else(|| name.clone());
            bindings.push(Binding::named(name, alias));
        }
    } else if let Some(ns) = statement.child_of_kind(&["namespace_export"]) {
        let local = ns
            .first_named_child()
            .map(|n| module_export_name(n.text()))
            .unwrap_or_else(|| "*".to_string());
        bindings.push(Binding::namespace(local));
    } else if statement.has_child_kind("*") {
        bindings.push(Binding::namespace("*"));
    } else {
        return None;
    }

    Some(UnifiedExport {
        source,
        bindings,
        line: statement.line(),
        is_type_only,
    })
}

/// `module.exports = ...` and `exports.name = ...`.
fn commonjs_export(statement: SyntaxNode<'_>) -> Option<UnifiedExport> {
    let assignment = statement.first_named_child()?;
    if assignment.kind() != "assignment_expression" {
        return None;
    }
    let target = assignment.field("left")?;
    let value = assignment.field("right")?;
    let target_text = target.text();

    let bindings = if target_text == "module.exports" {
        if value.kind() == "object" {
            value
                .named_children()
                .into_iter()
                .filter_map(|entry| match entry.kind() {
                    "shorthand_property_identifier" => Some(Binding::same(entry.text())),
                    "pair" => Some(Binding::named(entry.field_text("value")?, entry.field_text("key")?)),
                    _ => None,
                })
                .collect()
        } else {
            let imported = if value.kind() == "identifier" { value.text() } else { "default" };
            vec![Binding {
                imported: imported.to_string(),
                local: "default".to_string(),
                is_default: true,
                is_namespace: false,
            }]
        }
    } else if let Some(name) = target_text
        .strip_prefix("exports.")
        .or_else(|| target_text.strip_prefix("module.exports."))
    {
        vec![Binding::same(name)]
    } else {
        return None;
    };

    Some(UnifiedExport {
        source: None,
        bindings,
        line: statement.line(),
        is_type_only: false,
    })
}

impl LanguageNormalizer for TypeScriptNormalizer {
    fn language(&self) -> Language {
        self.language
    }

    fn grammar(&self) -> &dyn Grammar {
        &TsGrammar
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
            match statement.kind() {
                "import_statement" => {
                    let is_type_only = statement.has_child_kind("type");
                    if let Some(require) = statement.child_of_kind(&["import_require_clause"]) {
                        let (Some(local), Some(source)) =
                            (require.first_named_child(), require.field_text("source"))
                        else {
                            continue;
                        };
                        imports.push(UnifiedImport {
                            source: unquote(source),
                            bindings: vec![Binding::default_binding(local.text())],
                            line: statement.line(),
                            is_type_only,
                        });
                        continue;
                    }
                    let Some(source) = statement.field_text("source") else { continue };
                    let bindings = statement
                        .child_of_kind(&["import_clause"])
                        .map(import_bindings)
                        .unwrap_or_default();
                    imports.push(UnifiedImport {
                        source: unquote(source),
                        bindings,
                        line: statement.line(),
                        is_type_only,
                    });
                }
                "lexical_declaration" | "variable_declaration" => {
                    imports.extend(require_imports(statement));
                }
                "expression_statement" => {
                    if let Some(source) = statement.first_named_child().and_then(require_source) {
                        imports.push(UnifiedImport {
                            source,
                            bindings: Vec::new(),
                            line: statement.line(),
                            is_type_only: false,
                        });
                    }
                }
                _ => {}
            }
        }
        imports
    }

    fn extract_exports(&self, root: SyntaxNode<'_>, _scope: &mut NormalizeScope<'_>) -> Vec<UnifiedExport> {
        root.named_children()
            .into_iter()
            .filter_map(|statement| match statement.kind() {
                "export_statement" => export_from_statement(statement),
                "expression_statement" => commonjs_export(statement),
                _ => None,
            })
            .collect()
    }
}

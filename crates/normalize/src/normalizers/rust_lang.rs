//! Rust normalizer.

use crate::language::Language;
use crate::syntax::SyntaxNode;
use crate::unified::{
    Binding, ClassKind, ParamList, UnifiedClass, UnifiedExport, UnifiedFunction, UnifiedImport,
    UnifiedParam,
};

use super::context::NormalizeScope;
use super::grammar::{ArgShape, ChainStep, Grammar, ObjectEntry};
use super::helpers::{
    base_type_name, body_lines, clean_type, preceding_decorators, qualify, strip_whitespace,
    unquote, walk_preorder,
};
use super::LanguageNormalizer;

const SEP: &str = "::";

pub struct RustGrammar;

impl RustGrammar {
    fn callee_step<'t>(
        &self,
        callee: SyntaxNode<'t>,
        arguments: Option<SyntaxNode<'t>>,
    ) -> ChainStep<'t> {
        match callee.kind() {
            "identifier" => ChainStep::FreeCall {
                name: callee,
                arguments,
            },
            "field_expression" => match (callee.field("field"), callee.field("value")) {
                (Some(name), Some(receiver)) => ChainStep::MethodCall {
                    name,
                    arguments,
                    receiver,
                },
                _ => ChainStep::Invoke { callee, arguments },
            },
            "scoped_identifier" => match callee.field("name") {
                Some(name) => ChainStep::PathCall {
                    path: callee.field("path"),
                    name,
                    arguments,
                },
                None => ChainStep::Invoke { callee, arguments },
            },
            // `parse::<u32>()`, `iter.collect::<Vec<_>>()`
            "generic_function" => match callee.field("function") {
                Some(inner) => self.callee_step(inner, arguments),
                None => ChainStep::Invoke { callee, arguments },
            },
            _ => ChainStep::Invoke { callee, arguments },
        }
    }
}

impl Grammar for RustGrammar {
    fn path_separator(&self) -> &'static str {
        SEP
    }

    fn chain_link_kinds(&self) -> &'static [&'static str] {
        &["call_expression", "field_expression", "macro_invocation"]
    }

    fn suspend_kinds(&self) -> &'static [&'static str] {
        &["await_expression", "try_expression"]
    }

    fn comment_kinds(&self) -> &'static [&'static str] {
        &["line_comment", "block_comment"]
    }

    fn decorator_kinds(&self) -> &'static [&'static str] {
        &["attribute_item"]
    }

    fn classify_chain<'t>(&self, node: SyntaxNode<'t>) -> ChainStep<'t> {
        match node.kind() {
            "call_expression" => match node.field("function") {
                Some(callee) => self.callee_step(callee, node.field("arguments")),
                None => ChainStep::Opaque,
            },
            "field_expression" => match (node.field("field"), node.field("value")) {
                (Some(name), Some(base)) => ChainStep::Field { name, base },
                _ => ChainStep::Opaque,
            },
            "macro_invocation" => match node.field("macro") {
                Some(m) if m.kind() == "scoped_identifier" => match m.field("name") {
                    Some(name) => ChainStep::MacroCall {
                        path: m.field("path"),
                        name,
                    },
                    None => ChainStep::Opaque,
                },
                Some(name) => ChainStep::MacroCall { path: None, name },
                None => ChainStep::Opaque,
            },
            "await_expression" => suspend(node, "await"),
            "try_expression" => suspend(node, "?"),
            "index_expression" | "parenthesized_expression" => match node.first_named_child() {
                Some(inner) => ChainStep::Transparent { inner },
                None => ChainStep::Opaque,
            },
            "identifier" | "self" | "scoped_identifier" | "crate" | "super" => ChainStep::Terminal,
            _ => ChainStep::Opaque,
        }
    }

    fn classify_arg<'t>(&self, node: SyntaxNode<'t>) -> ArgShape<'t> {
        match node.kind() {
            "string_literal" | "raw_string_literal" | "char_literal" => {
                ArgShape::Str(unquote(node.text()))
            }
            "integer_literal" | "float_literal" | "negative_literal" => ArgShape::Num(node.text()),
            "unary_expression" => {
                let numeric = node
                    .first_named_child()
                    .is_some_and(|n| matches!(n.kind(), "integer_literal" | "float_literal"));
                if numeric && node.text().trim_start().starts_with('-') {
                    ArgShape::Num(node.text())
                } else {
                    ArgShape::Opaque
                }
            }
            "boolean_literal" => ArgShape::Bool(node.text() == "true"),
            "identifier" if node.text() == "None" => ArgShape::Null,
            "identifier" | "self" | "scoped_identifier" => ArgShape::Ident(node.text()),
            "struct_expression" => match node.field("body") {
                Some(body) => ArgShape::Object(
                    body.named_children()
                        .into_iter()
                        .filter(|c| !self.is_comment(c.kind()))
                        .map(struct_field_entry)
                        .collect(),
                ),
                None => ArgShape::Opaque,
            },
            // `[0; 16]` repeats rather than lists.
            "array_expression" if node.has_child_kind(";") => ArgShape::Opaque,
            "array_expression" | "tuple_expression" => ArgShape::Array(
                node.named_children()
                    .into_iter()
                    .filter(|c| !self.is_comment(c.kind()) && c.kind() != "attribute_item")
                    .collect(),
            ),
            "reference_expression" => match node.field("value") {
                Some(inner) => ArgShape::Wrapped(inner),
                None => ArgShape::Opaque,
            },
            "parenthesized_expression" => match node.first_named_child() {
                Some(inner) => ArgShape::Wrapped(inner),
                None => ArgShape::Opaque,
            },
            _ => ArgShape::Opaque,
        }
    }

    fn argument_nodes<'t>(&self, args: SyntaxNode<'t>) -> Vec<SyntaxNode<'t>> {
        args.named_children()
            .into_iter()
            .filter(|n| !self.is_comment(n.kind()) && n.kind() != "attribute_item")
            .collect()
    }
}

fn suspend<'t>(node: SyntaxNode<'t>, marker: &'static str) -> ChainStep<'t> {
    match node.first_named_child() {
        Some(operand) => ChainStep::Suspend { marker, operand },
        None => ChainStep::Opaque,
    }
}

fn struct_field_entry(field: SyntaxNode<'_>) -> ObjectEntry<'_> {
    match field.kind() {
        "field_initializer" => match (field.field("field"), field.field("value")) {
            (Some(key), Some(value)) => ObjectEntry::Pair {
                key: key.text().to_string(),
                value,
            },
            _ => ObjectEntry::Opaque { node: field },
        },
        "shorthand_field_initializer" => match field.first_named_child() {
            Some(name) => ObjectEntry::Shorthand {
                name: name.text(),
                node: field,
            },
            None => ObjectEntry::Opaque { node: field },
        },
        _ => ObjectEntry::Opaque { node: field },
    }
}

// ---- Declarations ----

/// The impl or trait a function is declared in.
struct Owner {
    class_name: String,
    qualified_prefix: Vec<String>,
    /// Trait impls and trait bodies carry no visibility of their own.
    exported: Option<bool>,
}

struct ImplInfo {
    /// Self type as written, generics removed.
    type_name: String,
    /// Self type resolved against the enclosing module path.
    target: String,
    trait_name: Option<String>,
    methods: Vec<String>,
}

#[derive(Default)]
struct Decls {
    functions: Vec<UnifiedFunction>,
    classes: Vec<UnifiedClass>,
    impls: Vec<ImplInfo>,
    /// Index into `classes` and module-qualified path of each struct or enum.
    type_paths: Vec<(usize, String)>,
}

fn is_pub(node: SyntaxNode<'_>) -> bool {
    node.named_children()
        .iter()
        .any(|c| c.kind() == "visibility_modifier" && strip_whitespace(c.text()) == "pub")
}

fn last_segment(path: &str) -> &str {
    path.rsplit(SEP).next().unwrap_or(path)
}

/// Resolve a type path written at `prefix` to a path from the file root.
/// `crate::`, `self::` and `super::` are honoured; anything else is relative.
fn resolve_type_path(prefix: &[String], path: &str) -> String {
    let mut segments = path.split(SEP).peekable();
    let mut resolved: Vec<&str> = prefix.iter().map(String::as_str).collect();
    match segments.peek() {
        Some(&"crate") => {
            resolved.clear();
            segments.next();
        }
        Some(&"self") => {
            segments.next();
        }
        _ => {}
    }
    while segments.peek() == Some(&"super") {
        resolved.pop();
        segments.next();
    }
    resolved.extend(segments);
    resolved.join(SEP)
}

pub struct RustNormalizer;

impl RustNormalizer {
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
            "function_item" | "function_signature_item" => {
                let Some(function) = self.build_function(node, prefix, None, scope) else {
                    return false;
                };
                let mut inner = prefix.to_vec();
                inner.push(function.name.clone());
                decls.functions.push(function);
                if let Some(body) = node.field("body") {
                    self.visit_children(body, &inner, decls, scope, depth + 1);
                }
            }
            "impl_item" => self.visit_impl(node, prefix, decls, scope, depth),
            "trait_item" => self.visit_trait(node, prefix, decls, scope, depth),
            "struct_item" | "enum_item" | "union_item" => {
                let Some(name) = node.field_text("name") else {
                    scope.stats.skipped_declarations += 1;
                    return false;
                };
                let kind = if node.kind() == "enum_item" {
                    ClassKind::Enum
                } else {
                    ClassKind::Struct
                };
                decls.type_paths.push((decls.classes.len(), qualify(prefix, name, SEP)));
                decls.classes.push(UnifiedClass {
                    name: name.to_string(),
                    kind,
                    file: scope.file.to_string(),
                    start_line: node.start().line,
                    end_line: node.end().line,
                    base_classes: Vec::new(),
                    methods: Vec::new(),
                    is_exported: is_pub(node),
                });
            }
            "mod_item" => {
                let (Some(name), Some(body)) = (node.field_text("name"), node.field("body")) else {
                    return false;
                };
                let mut inner = prefix.to_vec();
                inner.push(name.to_string());
                self.visit_children(body, &inner, decls, scope, depth + 1);
            }
            _ => return true,
        }
        false
    }

    fn visit_children(
        &self,
        node: SyntaxNode<'_>,
        prefix: &[String],
        decls: &mut Decls,
        scope: &mut NormalizeScope<'_>,
        depth: usize,
    ) {
        for child in node.named_children() {
            self.visit(child, prefix, decls, scope, depth);
        }
    }

    fn visit_impl(
        &self,
        node: SyntaxNode<'_>,
        prefix: &[String],
        decls: &mut Decls,
        scope: &mut NormalizeScope<'_>,
        depth: usize,
    ) {
        let Some(self_type) = node.field("type") else {
            scope.stats.skipped_declarations += 1;
            return;
        };
        let type_name = base_type_name(self_type.text());
        let target = resolve_type_path(prefix, &type_name);
        let trait_name = node.field("trait").map(|t| base_type_name(t.text()));

        let (class_name, scoped) = match &trait_name {
            Some(t) => (format!("{t} for {type_name}"), format!("<{type_name} as {t}>")),
            None => (type_name.clone(), type_name.clone()),
        };
        let mut qualified_prefix = prefix.to_vec();
        qualified_prefix.push(scoped);
        let owner = Owner {
            class_name,
            qualified_prefix,
            exported: trait_name.as_ref().map(|_| true),
        };

        let mut methods = Vec::new();
        if let Some(body) = node.field("body") {
            self.visit_members(body, &owner, &mut methods, decls, scope, depth + 1);
        }
        decls.impls.push(ImplInfo {
            type_name,
            target,
            trait_name,
            methods,
        });
    }

    fn visit_trait(
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
        let exported = is_pub(node);
        let base_classes = node
            .field("bounds")
            .map(|bounds| {
                bounds
                    .named_children()
                    .into_iter()
                    .filter(|b| !matches!(b.kind(), "lifetime" | "line_comment" | "block_comment"))
                    .map(|b| base_type_name(b.text()))
                    .filter(|b| !b.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let mut qualified_prefix = prefix.to_vec();
        qualified_prefix.push(name.to_string());
        let owner = Owner {
            class_name: name.to_string(),
            qualified_prefix,
            exported: Some(exported),
        };
        let mut methods = Vec::new();
        if let Some(body) = node.field("body") {
            self.visit_members(body, &owner, &mut methods, decls, scope, depth + 1);
        }

        decls.classes.push(UnifiedClass {
            name: name.to_string(),
            kind: ClassKind::Trait,
            file: scope.file.to_string(),
            start_line: node.start().line,
            end_line: node.end().line,
            base_classes,
            methods,
            is_exported: exported,
        });
    }

    /// Functions declared directly in an impl or trait body.
    fn visit_members(
        &self,
        body: SyntaxNode<'_>,
        owner: &Owner,
        methods: &mut Vec<String>,
        decls: &mut Decls,
        scope: &mut NormalizeScope<'_>,
        depth: usize,
    ) {
        if !scope.enter(depth) {
            return;
        }
        for member in body.named_children() {
            if !matches!(member.kind(), "function_item" | "function_signature_item") {
                continue;
            }
            let Some(function) = self.build_function(member, &owner.qualified_prefix, Some(owner), scope)
            else {
                continue;
            };
            methods.push(function.name.clone());
            let mut inner = owner.qualified_prefix.clone();
            inner.push(function.name.clone());
            decls.functions.push(function);
            if let Some(fn_body) = member.field("body") {
                self.visit_children(fn_body, &inner, decls, scope, depth + 1);
            }
        }
    }

    fn build_function(
        &self,
        node: SyntaxNode<'_>,
        prefix: &[String],
        owner: Option<&Owner>,
        scope: &mut NormalizeScope<'_>,
    ) -> Option<UnifiedFunction> {
        let Some(name) = node.field_text("name") else {
            scope.stats.skipped_declarations += 1;
            return None;
        };

        let mut parameters = ParamList::new();
        let mut has_receiver = false;
        if let Some(params) = node.field("parameters") {
            for param in params.named_children() {
                match param.kind() {
                    "self_parameter" => {
                        has_receiver = true;
                        let text = strip_whitespace(param.text());
                        let mut p = UnifiedParam::named("self");
                        if text != "self" {
                            p.type_annotation = Some(param.text().trim().to_string());
                        }
                        parameters.push(p);
                    }
                    "parameter" => {
                        let pattern = param.field_text("pattern").unwrap_or("_").trim();
                        let pattern = pattern.strip_prefix("mut ").unwrap_or(pattern).trim();
                        if pattern == "self" {
                            has_receiver = true;
                        }
                        let mut p = UnifiedParam::named(pattern);
                        p.type_annotation = param.field("type").map(|t| clean_type(t.text()));
                        parameters.push(p);
                    }
                    "variadic_parameter" => {
                        let mut p = UnifiedParam::named("...");
                        p.is_rest = true;
                        parameters.push(p);
                    }
                    _ => {}
                }
            }
        }

        let is_async = node
            .named_children()
            .iter()
            .any(|c| c.kind() == "function_modifiers" && c.has_child_kind("async"));
        let body = node.field("body");
        let (body_start_line, body_end_line) = body_lines(body);

        let is_method = owner.is_some();
        let is_exported = match owner.and_then(|o| o.exported) {
            Some(exported) => exported,
            None => is_pub(node),
        };

        Some(UnifiedFunction {
            name: name.to_string(),
            qualified_name: qualify(prefix, name, SEP),
            file: scope.file.to_string(),
            start: node.start(),
            end: node.end(),
            parameters,
            return_type: node.field("return_type").map(|t| clean_type(t.text())),
            is_method,
            is_static: is_method && !has_receiver,
            is_exported,
            is_constructor: is_method && !has_receiver && name == "new",
            is_async,
            class_name: owner.map(|o| o.class_name.clone()),
            decorators: preceding_decorators(&RustGrammar, node),
            body_start_line,
            body_end_line,
        })
    }
}

// ---- Imports / exports ----

/// One leaf of a flattened `use` tree: full path plus its binding.
fn flatten_use_tree(root: SyntaxNode<'_>, out: &mut Vec<(String, Binding)>) {
    let mut stack = vec![(root, String::new())];
    while let Some((node, prefix)) = stack.pop() {
        match node.kind() {
            "use_as_clause" => {
                let Some(path) = node.field("path") else { continue };
                let (source, imported) = resolve_use_path(&prefix, path.text());
                let local = node
                    .field_text("alias")
                    .map(str::to_string)
                    .unwrap_or_else(|| imported.clone());
                out.push((source, Binding::named(imported, local)));
            }
            "use_wildcard" => {
                let path = node
                    .named_children()
                    .into_iter()
                    .find(|c| !matches!(c.kind(), "line_comment" | "block_comment"))
                    .map(|p| strip_whitespace(p.text()))
                    .unwrap_or_default();
                out.push((join_path(&prefix, &path), Binding::namespace("*")));
            }
            "scoped_use_list" => {
                let path = node
                    .field("path")
                    .map(|p| strip_whitespace(p.text()))
                    .unwrap_or_default();
                if let Some(list) = node.field("list") {
                    stack.push((list, join_path(&prefix, &path)));
                }
            }
            "use_list" => {
                stack.extend(node.named_children().into_iter().rev().map(|child| (child, prefix.clone())));
            }
            "identifier" | "scoped_identifier" | "self" | "crate" | "super" | "metavariable" => {
                let (source, imported) = resolve_use_path(&prefix, node.text());
                out.push((source, Binding::same(imported)));
            }
            _ => {}
        }
    }
}

/// `self` inside a list binds the parent path.
fn resolve_use_path(prefix: &str, path: &str) -> (String, String) {
    let path = strip_whitespace(path);
    if path == "self" && !prefix.is_empty() {
        return (prefix.to_string(), last_segment(prefix).to_string());
    }
    let full = join_path(prefix, &path);
    let imported = last_segment(&full).to_string();
    (full, imported)
}

fn join_path(prefix: &str, path: &str) -> String {
    match (prefix.is_empty(), path.is_empty()) {
        (true, _) => path.to_string(),
        (false, true) => prefix.to_string(),
        (false, false) => format!("{prefix}{SEP}{path}"),
    }
}

/// Group flattened leaves by source path, keeping first-seen order.
fn group_by_source(leaves: Vec<(String, Binding)>) -> Vec<(String, Vec<Binding>)> {
    let mut grouped: Vec<(String, Vec<Binding>)> = Vec::new();
    for (source, binding) in leaves {
        match grouped.iter_mut().find(|(s, _)| *s == source) {
            Some((_, bindings)) => bindings.push(binding),
            None => grouped.push((source, vec![binding])),
        }
    }
    grouped
}

fn use_leaves(node: SyntaxNode<'_>) -> Vec<(String, Binding)> {
    let mut leaves = Vec::new();
    if let Some(argument) = node.field("argument") {
        flatten_use_tree(argument, &mut leaves);
    }
    leaves
}

const EXPORTABLE_ITEMS: &[&str] = &[
    "function_item",
    "function_signature_item",
    "struct_item",
    "enum_item",
    "union_item",
    "trait_item",
    "type_item",
    "const_item",
    "static_item",
    "mod_item",
];

impl LanguageNormalizer for RustNormalizer {
    fn language(&self) -> Language {
        Language::Rust
    }

    fn grammar(&self) -> &dyn Grammar {
        &RustGrammar
    }

    fn extract_declarations(
        &self,
        root: SyntaxNode<'_>,
        scope: &mut NormalizeScope<'_>,
    ) -> (Vec<UnifiedFunction>, Vec<UnifiedClass>) {
        let mut decls = Decls::default();
        self.visit_children(root, &[], &mut decls, scope, 0);
        let Decls {
            functions,
            mut classes,
            impls,
            type_paths,
        } = decls;

        // Same-file impls contribute methods and implemented traits. An impl
        // whose self type resolves to a local path only joins that type; an
        // unresolved one joins by name when the name is unambiguous.
        for (index, path) in &type_paths {
            let name = last_segment(path);
            let unique_name = type_paths
                .iter()
                .filter(|(_, other)| last_segment(other) == name)
                .count()
                == 1;
            let joins = |info: &ImplInfo| {
                if info.target == *path {
                    return true;
                }
                unique_name
                    && last_segment(&info.type_name) == name
                    && !type_paths.iter().any(|(_, other)| *other == info.target)
            };
            let Some(class) = classes.get_mut(*index) else {
                continue;
            };
            for info in impls.iter().filter(|i| joins(i)) {
                match &info.trait_name {
                    Some(t) if !class.base_classes.contains(t) => class.base_classes.push(t.clone()),
                    Some(_) => {}
                    None => class.methods.extend(info.methods.iter().cloned()),
                }
            }
        }
        (functions, classes)
    }

    fn extract_imports(&self, root: SyntaxNode<'_>, _scope: &mut NormalizeScope<'_>) -> Vec<UnifiedImport> {
        let mut imports = Vec::new();
        for item in root.named_children() {
            match item.kind() {
                "use_declaration" => {
                    for (source, bindings) in group_by_source(use_leaves(item)) {
                        imports.push(UnifiedImport {
                            source,
                            bindings,
                            line: item.line(),
                            is_type_only: false,
                        });
                    }
                }
                "extern_crate_declaration" => {
                    let Some(name) = item.field_text("name") else { continue };
                    let local = item.field_text("alias").unwrap_or(name);
                    imports.push(UnifiedImport {
                        source: name.to_string(),
                        bindings: vec![Binding::named(name, local)],
                        line: item.line(),
                        is_type_only: false,
                    });
                }
                _ => {}
            }
        }
        imports
    }

    fn extract_exports(&self, root: SyntaxNode<'_>, _scope: &mut NormalizeScope<'_>) -> Vec<UnifiedExport> {
        let mut exports = Vec::new();
        for item in root.named_children() {
            let kind = item.kind();
            if kind == "use_declaration" && is_pub(item) {
                for (source, bindings) in group_by_source(use_leaves(item)) {
                    exports.push(UnifiedExport {
                        source: Some(source),
                        bindings,
                        line: item.line(),
                        is_type_only: false,
                    });
                }
            } else if EXPORTABLE_ITEMS.contains(&kind) && is_pub(item) {
                if let Some(name) = item.field_text("name") {
                    exports.push(UnifiedExport {
                        source: None,
                        bindings: vec![Binding::same(name)],
                        line: item.line(),
                        is_type_only: false,
                    });
                }
            } else if kind == "macro_definition" {
                let exported = preceding_decorators(&RustGrammar, item)
                    .iter()
                    .any(|a| strip_whitespace(a) == "#[macro_export]");
                if let (true, Some(name)) = (exported, item.field_text("name")) {
                    exports.push(UnifiedExport {
                        source: None,
                        bindings: vec![Binding::same(name)],
                        line: item.line(),
                        is_type_only: false,
                    });
                }
            }
        }
        exports
    }
}

//! Tree-walking and text helpers shared by every language normalizer.

use crate::syntax::SyntaxNode;

use super::context::NormalizeScope;
use super::grammar::Grammar;

/// Strip string delimiters and prefixes from a literal.
///
/// Handles `"..."`, `'...'`, backticks, Python triple quotes and `r`/`b`/`u`
/// prefixes, and Rust raw strings (`r#"..."#`). Escapes are kept as written.
pub fn unquote(text: &str) -> String {
    let trimmed = text.trim();
    let body = trimmed.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    let body = body.trim_start_matches('#');
    let hashes = trimmed.len() - trimmed.trim_end_matches('#').len();
    let body = &body[..body.len().saturating_sub(hashes)];

    for quote in ["\"\"\"", "'''", "\"", "'", "`"] {
        if body.len() >= quote.len() * 2 && body.starts_with(quote) && body.ends_with(quote) {
            return body[quote.len()..body.len() - quote.len()].to_string();
        }
    }
    body.to_string()
}

/// Parse a numeric literal as written in any supported language.
///
/// Accepts digit separators, a leading minus, `0x`/`0o`/`0b` radixes, Rust
/// type suffixes and the JavaScript BigInt `n`. Returns `None` for anything
/// else (imaginary literals, malformed text).
pub fn parse_number(text: &str) -> Option<f64> {
    let cleaned: String = text.chars().filter(|c| *c != '_' && !c.is_whitespace()).collect();
    let (negative, digits) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.as_str()),
    };
    let lower = digits.to_ascii_lowercase();

    let radix = [("0x", 16), ("0o", 8), ("0b", 2)]
        .into_iter()
        .find(|(prefix, _)| lower.starts_with(prefix));
    let value = if let Some((prefix, radix)) = radix {
        let body = strip_integer_suffix(&lower[prefix.len()..]);
        u64::from_str_radix(body, radix).ok()? as f64
    } else {
        let body = strip_float_suffix(strip_integer_suffix(&lower));
        body.parse::<f64>().ok()?
    };

    Some(if negative { -value } else { value })
}

const INTEGER_SUFFIXES: &[&str] = &[
    "i128", "u128", "isize", "usize", "i64", "u64", "i32", "u32", "i16", "u16", "i8", "u8",
];

fn strip_integer_suffix(text: &str) -> &str {
    for suffix in INTEGER_SUFFIXES {
        if let Some(body) = text.strip_suffix(suffix) {
            if !body.is_empty() {
                return body;
            }
        }
    }
    text.strip_suffix('n').filter(|b| !b.is_empty()).unwrap_or(text)
}

fn strip_float_suffix(text: &str) -> &str {
    ["f32", "f64"]
        .into_iter()
        .find_map(|s| text.strip_suffix(s).filter(|b| !b.is_empty()))
        .unwrap_or(text)
}

/// Contiguous decorator/attribute siblings directly before `node`, in
/// source order. Comments between them are skipped; anything else stops
/// the scan.
pub fn preceding_decorators(grammar: &dyn Grammar, node: SyntaxNode<'_>) -> Vec<String> {
    let mut found = Vec::new();
    let mut current = node.prev_sibling();
    while let Some(sibling) = current {
        let kind = sibling.kind();
        if grammar.is_decorator(kind) {
            found.push(sibling.text().trim().to_string());
        } else if !grammar.is_comment(kind) {
            break;
        }
        current = sibling.prev_sibling();
    }
    found.reverse();
    found
}

/// Decorator nodes that are direct children of `node`.
pub fn child_decorators(grammar: &dyn Grammar, node: SyntaxNode<'_>) -> Vec<String> {
    node.named_children()
        .into_iter()
        .filter(|c| grammar.is_decorator(c.kind()))
        .map(|c| c.text().trim().to_string())
        .collect()
}

/// Join a scope prefix and a name with the language's separator.
pub fn qualify(prefix: &[String], name: &str, separator: &str) -> String {
    if prefix.is_empty() {
        return name.to_string();
    }
    let mut qualified = prefix.join(separator);
    qualified.push_str(separator);
    qualified.push_str(name);
    qualified
}

/// Drop the leading `:` or `->` a grammar leaves on type annotations.
pub fn clean_type(text: &str) -> String {
    let trimmed = text.trim();
    let trimmed = trimmed
        .strip_prefix("->")
        .or_else(|| trimmed.strip_prefix(':'))
        .unwrap_or(trimmed);
    collapse_whitespace(trimmed.trim())
}

/// Collapse runs of whitespace (including newlines) into single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove all whitespace, for path-like text such as `a :: b`.
pub fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Base type name with generics and references removed: `&mut Foo<T>` gives
/// `Foo`, `crate::a::Bar` stays `crate::a::Bar`.
pub fn base_type_name(text: &str) -> String {
    let mut rest = text.trim();
    loop {
        let before = rest;
        rest = rest.trim_start_matches('&').trim_start();
        if rest.starts_with('\'') {
            let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            rest = rest[end..].trim_start();
        }
        for keyword in ["mut", "dyn", "impl"] {
            if let Some(after) = rest.strip_prefix(keyword) {
                if after.starts_with(char::is_whitespace) {
                    rest = after.trim_start();
                }
            }
        }
        if rest == before {
            break;
        }
    }
    let text = strip_whitespace(rest);
    let end = text.find('<').unwrap_or(text.len());
    text[..end].to_string()
}

/// Pre-order walk over named nodes using an explicit stack, so tree depth
/// never turns into call-stack depth. `visit` returns whether the node's
/// children should be walked. Nodes past `max_tree_depth` are skipped and
/// counted by [`NormalizeScope::enter`].
pub fn walk_preorder<'t>(
    root: SyntaxNode<'t>,
    depth: usize,
    scope: &mut NormalizeScope<'_>,
    mut visit: impl FnMut(SyntaxNode<'t>, usize, &mut NormalizeScope<'_>) -> bool,
) {
    let mut stack = vec![(root, depth)];
    while let Some((node, depth)) = stack.pop() {
        if !scope.enter(depth) {
            continue;
        }
        if visit(node, depth, scope) {
            stack.extend(node.named_children().into_iter().rev().map(|child| (child, depth + 1)));
        }
    }
}

/// First and last line of a body node.
pub fn body_lines(body: Option<SyntaxNode<'_>>) -> (Option<u32>, Option<u32>) {
    match body {
        Some(b) => (Some(b.start().line), Some(b.end().line)),
        None => (None, None),
    }
}

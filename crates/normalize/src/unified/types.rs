//! Unified IR: the language-agnostic records every normalizer produces.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A source location. `line` is 1-based, `column` is a 0-based byte column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct SourcePosition {
    pub line: u32,
    pub column: u32,
}

impl SourcePosition {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Convert a tree-sitter `(row, column)` point.
    pub fn from_row_column(row: usize, column: usize) -> Self {
        Self {
            line: u32::try_from(row).unwrap_or(u32::MAX - 1) + 1,
            column: u32::try_from(column).unwrap_or(u32::MAX),
        }
    }
}

// ---- Arguments ----

/// Label carried by `Unknown` for `null`/`None`/`nil`/`undefined`.
pub const NULL_LABEL: &str = "null";

/// Shape of a normalized call argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ArgKind {
    String { value: String },
    Number { value: f64 },
    Boolean { value: bool },
    Identifier { name: String },
    Object { properties: BTreeMap<String, NormalizedArg> },
    Array { elements: Vec<NormalizedArg> },
    Unknown { label: Option<String> },
}

/// One call argument, with the position and source text it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedArg {
    #[serde(flatten)]
    pub kind: ArgKind,
    pub position: SourcePosition,
    pub text: String,
}

impl NormalizedArg {
    pub fn unknown(position: SourcePosition, text: impl Into<String>) -> Self {
        Self {
            kind: ArgKind::Unknown { label: None },
            position,
            text: text.into(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self.kind, ArgKind::Unknown { .. })
    }

    /// Variant name as it appears in the serialized `type` tag.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            ArgKind::String { .. } => "string",
            ArgKind::Number { .. } => "number",
            ArgKind::Boolean { .. } => "boolean",
            ArgKind::Identifier { .. } => "identifier",
            ArgKind::Object { .. } => "object",
            ArgKind::Array { .. } => "array",
            ArgKind::Unknown { .. } => "unknown",
        }
    }
}

// ---- Call chains ----

/// One link of a call chain: a method call, a field access, or a
/// suspension marker (`await`, `?`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallChainSegment {
    pub name: String,
    pub is_call: bool,
    pub args: Vec<NormalizedArg>,
    pub position: SourcePosition,
}

impl CallChainSegment {
    pub fn call(name: impl Into<String>, args: Vec<NormalizedArg>, position: SourcePosition) -> Self {
        Self {
            name: name.into(),
            is_call: true,
            args,
            position,
        }
    }

    pub fn access(name: impl Into<String>, position: SourcePosition) -> Self {
        Self {
            name: name.into(),
            is_call: false,
            args: Vec::new(),
            position,
        }
    }
}

/// A chained call expression such as `db.users.find(id).await?`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedCallChain {
    /// Base expression; empty when the chain starts from a bare call.
    pub receiver: String,
    /// Left-to-right as written. Never empty.
    pub segments: Vec<CallChainSegment>,
    pub raw: String,
    pub file: String,
    pub start: SourcePosition,
    pub end: SourcePosition,
}

impl UnifiedCallChain {
    pub fn has_call(&self) -> bool {
        self.segments.iter().any(|s| s.is_call)
    }

    /// Segment names joined with `.`, e.g. `find.await.?`.
    pub fn signature(&self) -> String {
        let names: Vec<&str> = self.segments.iter().map(|s| s.name.as_str()).collect();
        names.join(".")
    }
}

// ---- Declarations ----

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedParam {
    pub name: String,
    pub type_annotation: Option<String>,
    pub default_value: Option<String>,
    pub is_rest: bool,
    pub is_optional: bool,
}

impl UnifiedParam {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

pub type ParamList = SmallVec<[UnifiedParam; 4]>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedFunction {
    pub name: String,
    pub qualified_name: String,
    pub file: String,
    pub start: SourcePosition,
    pub end: SourcePosition,
    pub parameters: ParamList,
    pub return_type: Option<String>,
    pub is_method: bool,
    pub is_static: bool,
    pub is_exported: bool,
    pub is_constructor: bool,
    pub is_async: bool,
    pub class_name: Option<String>,
    pub decorators: Vec<String>,
    pub body_start_line: Option<u32>,
    pub body_end_line: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    Class,
    Struct,
    Enum,
    Trait,
    Interface,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedClass {
    pub name: String,
    pub kind: ClassKind,
    pub file: String,
    pub start_line: u32,
    pub end_line: u32,
    pub base_classes: Vec<String>,
    pub methods: Vec<String>,
    pub is_exported: bool,
}

// ---- Imports / exports ----

/// One name brought in (or sent out) by an import/export statement.
///
/// For imports `imported` is the name in the source module and `local` the
/// name it is bound to here. For exports `imported` is the in-module name and
/// `local` the name it is exported as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Binding {
    pub imported: String,
    pub local: String,
    pub is_default: bool,
    pub is_namespace: bool,
}

impl Binding {
    pub fn named(imported: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            imported: imported.into(),
            local: local.into(),
            is_default: false,
            is_namespace: false,
        }
    }

    pub fn same(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::named(name.clone(), name)
    }

    pub fn default_binding(local: impl Into<String>) -> Self {
        Self {
            imported: "default".to_string(),
            local: local.into(),
            is_default: true,
            is_namespace: false,
        }
    }

    /// The single entry every wildcard import/export carries.
    pub fn namespace(local: impl Into<String>) -> Self {
        Self {
            imported: "*".to_string(),
            local: local.into(),
            is_default: false,
            is_namespace: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedImport {
    pub source: String,
    pub bindings: Vec<Binding>,
    pub line: u32,
    pub is_type_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedExport {
    /// Set for re-exports.
    pub source: Option<String>,
    pub bindings: Vec<Binding>,
    pub line: u32,
    pub is_type_only: bool,
}

// ---- Per-file result ----

/// Count of degraded extractions in one normalization pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackStats {
    pub unknown_args: u32,
    pub opaque_receivers: u32,
    pub depth_limited_chains: u32,
    pub depth_limited_args: u32,
    pub skipped_declarations: u32,
    pub truncated_subtrees: u32,
}

impl FallbackStats {
    pub fn total(&self) -> u32 {
        self.unknown_args
            + self.opaque_receivers
            + self.depth_limited_chains
            + self.depth_limited_args
            + self.skipped_declarations
            + self.truncated_subtrees
    }

    pub fn is_clean(&self) -> bool {
        self.total() == 0
    }

    pub fn merge(&mut self, other: &FallbackStats) {
        self.unknown_args += other.unknown_args;
        self.opaque_receivers += other.opaque_receivers;
        self.depth_limited_chains += other.depth_limited_chains;
        self.depth_limited_args += other.depth_limited_args;
        self.skipped_declarations += other.skipped_declarations;
        self.truncated_subtrees += other.truncated_subtrees;
    }
}

/// Everything one normalizer pass produces for a single file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedFile {
    pub call_chains: Vec<UnifiedCallChain>,
    pub functions: Vec<UnifiedFunction>,
    pub classes: Vec<UnifiedClass>,
    pub imports: Vec<UnifiedImport>,
    pub exports: Vec<UnifiedExport>,
    pub fallbacks: FallbackStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_are_one_based_lines() {
        assert_eq!(SourcePosition::from_row_column(0, 4), SourcePosition::new(1, 4));
    }

    #[test]
    fn args_serialize_with_type_tag() {
        let arg = NormalizedArg {
            kind: ArgKind::Number { value: 1.0 },
            position: SourcePosition::new(1, 2),
            text: "1".to_string(),
        };
        let json = serde_json::to_value(&arg).unwrap();
        assert_eq!(json["type"], "number");
        assert_eq!(json["value"], 1.0);
        assert_eq!(json["text"], "1");
        let back: NormalizedArg = serde_json::from_value(json).unwrap();
        assert_eq!(back, arg);
    }

    #[test]
    fn chain_fields_are_camel_case() {
        let chain = UnifiedCallChain {
            receiver: "a".to_string(),
            segments: vec![CallChainSegment::call("b", vec![], SourcePosition::new(1, 2))],
            raw: "a.b()".to_string(),
            file: "x.ts".to_string(),
            start: SourcePosition::new(1, 0),
            end: SourcePosition::new(1, 5),
        };
        let json = serde_json::to_value(&chain).unwrap();
        assert_eq!(json["segments"][0]["isCall"], true);
        assert!(chain.has_call());
        assert_eq!(chain.signature(), "b");
    }

    #[test]
    fn fallback_stats_merge() {
        let mut a = FallbackStats { unknown_args: 2, ..Default::default() };
        let b = FallbackStats { truncated_subtrees: 1, opaque_receivers: 3, ..Default::default() };
        a.merge(&b);
        assert_eq!(a.total(), 6);
        assert!(!a.is_clean());
        assert!(FallbackStats::default().is_clean());
    }
}

//! Language normalizers: per-language tree-sitter trees to the unified IR.

pub mod args;
pub mod chains;
pub mod context;
pub mod grammar;
pub mod helpers;
pub mod python;
pub mod rust_lang;
pub mod typescript;

use drift_normalize_core::NormalizerConfig;

use crate::language::Language;
use crate::syntax::SyntaxNode;
use crate::unified::{
    NormalizedArg, NormalizedFile, UnifiedCallChain, UnifiedClass, UnifiedExport, UnifiedFunction,
    UnifiedImport,
};

pub use context::NormalizeScope;
pub use grammar::Grammar;
pub use python::PythonNormalizer;
pub use rust_lang::RustNormalizer;
pub use typescript::TypeScriptNormalizer;

/// One language's normalizer.
///
/// Implementors supply the node-kind [`Grammar`] and the declaration and
/// import/export extractors; argument normalization and chain walking are
/// shared. Implementations must be stateless: all mutable state lives in
/// the [`NormalizeScope`] passed to each call.
pub trait LanguageNormalizer: Send + Sync {
    fn language(&self) -> Language;

    fn grammar(&self) -> &dyn Grammar;

    /// Functions and classes in one pass, since method lists and impl
    /// associations need both.
    fn extract_declarations(
        &self,
        root: SyntaxNode<'_>,
        scope: &mut NormalizeScope<'_>,
    ) -> (Vec<UnifiedFunction>, Vec<UnifiedClass>);

    /// Top-level imports, one [`UnifiedImport`] per resolved source path.
    ///
    /// Compound forms are flattened to that granularity: each leaf of a Rust
    /// `use` tree gets its own import keyed by its full path, while names
    /// pulled from one module in one statement (`import { a, b } from 'm'`,
    /// `from m import a, b`) share an import and appear as its bindings.
    /// Python `import a, b` yields one import per module.
    fn extract_imports(&self, root: SyntaxNode<'_>, scope: &mut NormalizeScope<'_>) -> Vec<UnifiedImport>;

    fn extract_exports(&self, root: SyntaxNode<'_>, scope: &mut NormalizeScope<'_>) -> Vec<UnifiedExport>;

    fn normalize_argument(&self, node: SyntaxNode<'_>, scope: &mut NormalizeScope<'_>) -> NormalizedArg {
        args::normalize_argument(self.grammar(), node, scope)
    }

    fn normalize_arguments(
        &self,
        args_node: SyntaxNode<'_>,
        scope: &mut NormalizeScope<'_>,
    ) -> Vec<NormalizedArg> {
        args::normalize_arguments(self.grammar(), args_node, scope)
    }

    fn extract_call_chain(
        &self,
        node: SyntaxNode<'_>,
        scope: &mut NormalizeScope<'_>,
    ) -> Option<UnifiedCallChain> {
        chains::extract_call_chain(self.grammar(), node, scope)
    }

    fn extract_call_chains(
        &self,
        root: SyntaxNode<'_>,
        scope: &mut NormalizeScope<'_>,
    ) -> Vec<UnifiedCallChain> {
        chains::extract_call_chains(self.grammar(), root, scope)
    }

    fn extract_functions(&self, root: SyntaxNode<'_>, scope: &mut NormalizeScope<'_>) -> Vec<UnifiedFunction> {
        self.extract_declarations(root, scope).0
    }

    fn extract_classes(&self, root: SyntaxNode<'_>, scope: &mut NormalizeScope<'_>) -> Vec<UnifiedClass> {
        self.extract_declarations(root, scope).1
    }

    /// Produce the full IR for one file.
    fn normalize(&self, root: SyntaxNode<'_>, file: &str, config: &NormalizerConfig) -> NormalizedFile {
        let mut scope = NormalizeScope::new(file, config);
        let call_chains = self.extract_call_chains(root, &mut scope);
        let (functions, classes) = self.extract_declarations(root, &mut scope);
        let imports = self.extract_imports(root, &mut scope);
        let exports = self.extract_exports(root, &mut scope);
        NormalizedFile {
            call_chains,
            functions,
            classes,
            imports,
            exports,
            fallbacks: scope.stats,
        }
    }
}

/// Create all normalizers.
pub fn create_all_normalizers() -> Vec<Box<dyn LanguageNormalizer>> {
    vec![
        Box::new(RustNormalizer),
        Box::new(TypeScriptNormalizer::new(Language::TypeScript)),
        Box::new(TypeScriptNormalizer::new(Language::JavaScript)),
        Box::new(PythonNormalizer),
    ]
}

/// Get the normalizer for a given language. TypeScript and JavaScript share
/// one implementation.
pub fn normalizer_for(language: Language) -> &'static dyn LanguageNormalizer {
    static RUST: RustNormalizer = RustNormalizer;
    static TYPESCRIPT: TypeScriptNormalizer = TypeScriptNormalizer::new(Language::TypeScript);
    static JAVASCRIPT: TypeScriptNormalizer = TypeScriptNormalizer::new(Language::JavaScript);
    static PYTHON: PythonNormalizer = PythonNormalizer;
    match language {
        Language::Rust => &RUST,
        Language::TypeScript => &TYPESCRIPT,
        Language::JavaScript => &JAVASCRIPT,
        Language::Python => &PYTHON,
    }
}

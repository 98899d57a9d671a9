//! ParserManager: routes sources to the right tree-sitter grammar.

use std::path::Path;

use drift_normalize_core::ParseError;
use tree_sitter::{Parser, Tree};

use crate::language::Language;

/// Parser front-end.
///
/// `tree_sitter::Parser` is stateful and `!Sync`, so a fresh parser is
/// created for every call. The manager itself holds only the set of
/// enabled languages and can be shared freely across threads.
#[derive(Debug, Clone)]
pub struct ParserManager {
    enabled: Vec<Language>,
}

impl ParserManager {
    /// A manager with every supported language enabled.
    pub fn new() -> Self {
        Self {
            enabled: Language::all().to_vec(),
        }
    }

    /// A manager restricted to the given languages. Empty means all.
    pub fn with_languages(languages: &[Language]) -> Self {
        if languages.is_empty() {
            return Self::new();
        }
        Self {
            enabled: languages.to_vec(),
        }
    }

    pub fn is_enabled(&self, lang: Language) -> bool {
        self.enabled.contains(&lang)
    }

    /// Detect the language of a path, honouring the enabled set.
    pub fn detect_language(&self, path: &Path) -> Result<Language, ParseError> {
        let ext = path.extension().and_then(|e| e.to_str());
        Language::from_extension(ext)
            .filter(|lang| self.is_enabled(*lang))
            .ok_or_else(|| ParseError::UnsupportedLanguage {
                extension: ext.unwrap_or("unknown").to_string(),
            })
    }

    /// Parse source text with a known language. `ext` selects a dialect
    /// (`tsx`) where one grammar crate ships several.
    pub fn parse_source(
        &self,
        source: &str,
        lang: Language,
        ext: Option<&str>,
    ) -> Result<Tree, ParseError> {
        self.parse_inner(source, lang, ext, Path::new("<memory>"))
    }

    /// Detect the language from `path` and parse.
    pub fn parse(&self, source: &str, path: &Path) -> Result<(Language, Tree), ParseError> {
        let lang = self.detect_language(path)?;
        let ext = path.extension().and_then(|e| e.to_str());
        let tree = self.parse_inner(source, lang, ext, path)?;
        Ok((lang, tree))
    }

    fn parse_inner(
        &self,
        source: &str,
        lang: Language,
        ext: Option<&str>,
        path: &Path,
    ) -> Result<Tree, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&lang.ts_language_for_ext(ext))
            .map_err(|_| ParseError::GrammarNotFound {
                language: lang.name().to_string(),
            })?;

        parser
            .parse(source, None)
            .ok_or_else(|| ParseError::TreeSitterError {
                path: path.to_path_buf(),
                message: "tree-sitter returned no tree".to_string(),
            })
    }
}

impl Default for ParserManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_language() {
        let manager = ParserManager::new();
        let cases = [
            ("a.rs", "fn main() {}"),
            ("a.ts", "const x: number = 1;"),
            ("a.tsx", "const el = <div>{x}</div>;"),
            ("a.js", "function f() {}"),
            ("a.py", "def f():\n    pass\n"),
        ];
        for (file, source) in cases {
            let (_, tree) = manager.parse(source, Path::new(file)).unwrap();
            assert!(!tree.root_node().has_error(), "{file} failed to parse cleanly");
        }
    }

    #[test]
    fn disabled_and_unknown_languages_are_unsupported() {
        let manager = ParserManager::with_languages(&[Language::Python]);
        let err = manager.parse("fn main() {}", Path::new("a.rs")).unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedLanguage { ref extension } if extension == "rs"));
        assert!(manager.detect_language(Path::new("a.rb")).is_err());
        assert!(manager.detect_language(Path::new("a.py")).is_ok());
    }
}

//! Unified Provider: picks the normalizer per file and aggregates results
//! project-wide.

pub mod cache;
pub mod walker;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use drift_normalize_core::{ConfigError, DriftConfig, DriftErrorCode, ParseError};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::language::Language;
use crate::normalizers::normalizer_for;
use crate::parsers::ParserManager;
use crate::syntax::SyntaxNode;
use crate::unified::{
    FallbackStats, UnifiedCallChain, UnifiedClass, UnifiedExport, UnifiedFunction, UnifiedImport,
};

pub use cache::{hash_content, IrCache};
pub use walker::{walk_directory, DiscoveredFile, DEFAULT_IGNORES};

/// The unified IR of one file, tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileIr {
    pub file: String,
    pub language: Language,
    pub content_hash: u64,
    pub call_chains: Vec<UnifiedCallChain>,
    pub functions: Vec<UnifiedFunction>,
    pub classes: Vec<UnifiedClass>,
    pub imports: Vec<UnifiedImport>,
    pub exports: Vec<UnifiedExport>,
    pub fallbacks: FallbackStats,
    /// tree-sitter recovered from syntax errors somewhere in the file.
    pub has_parse_errors: bool,
}

impl FileIr {
    pub fn empty(file: impl Into<String>, language: Language, content_hash: u64) -> Self {
        Self {
            file: file.into(),
            language,
            content_hash,
            call_chains: Vec::new(),
            functions: Vec::new(),
            classes: Vec::new(),
            imports: Vec::new(),
            exports: Vec::new(),
            fallbacks: FallbackStats::default(),
            has_parse_errors: false,
        }
    }
}

/// A file that could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileFailure {
    pub file: String,
    pub error_code: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStats {
    pub files_normalized: usize,
    pub files_failed: usize,
    pub files_skipped: usize,
    pub call_chains: usize,
    pub functions: usize,
    pub classes: usize,
    pub imports: usize,
    pub exports: usize,
    pub fallbacks: FallbackStats,
    pub duration_ms: u64,
}

/// Normalization results for a set of files, sorted by path.
#[derive(Debug, Clone, Default)]
pub struct ProjectIr {
    pub files: Vec<Arc<FileIr>>,
    pub failures: Vec<FileFailure>,
    pub stats: ProjectStats,
}

pub struct UnifiedProvider {
    config: DriftConfig,
    parsers: ParserManager,
    cache: IrCache,
    pool: Option<rayon::ThreadPool>,
}

impl UnifiedProvider {
    pub fn new(config: DriftConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut languages = Vec::with_capacity(config.provider.languages.len());
        for name in &config.provider.languages {
            let lang = Language::from_name(name).ok_or_else(|| ConfigError::Invalid {
                field: "provider.languages".to_string(),
                message: format!("unknown language {name:?}"),
            })?;
            languages.push(lang);
        }

        let threads = config.provider.effective_threads();
        let pool = if threads > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| ConfigError::Invalid {
                    field: "provider.threads".to_string(),
                    message: e.to_string(),
                })?;
            Some(pool)
        } else {
            None
        };

        Ok(Self {
            parsers: ParserManager::with_languages(&languages),
            cache: IrCache::new(config.provider.effective_cache_capacity()),
            pool,
            config,
        })
    }

    pub fn config(&self) -> &DriftConfig {
        &self.config
    }

    pub fn cache(&self) -> &IrCache {
        &self.cache
    }

    /// Normalize in-memory source. The language comes from `path`.
    pub fn normalize_source(&self, path: &Path, source: &str) -> Result<Arc<FileIr>, ParseError> {
        let content_hash = hash_content(source.as_bytes());
        if let Some(cached) = self.cache.get(path, content_hash) {
            tracing::trace!(file = %path.display(), "ir cache hit");
            return Ok(cached);
        }

        let (language, tree) = self.parsers.parse(source, path)?;
        let root = SyntaxNode::new(tree.root_node(), source);
        let file = path.to_string_lossy();
        let normalized = normalizer_for(language).normalize(root, &file, &self.config.normalizer);

        let fallbacks = normalized.fallbacks;
        if self.config.normalizer.strict && !fallbacks.is_clean() {
            tracing::warn!(
                file = %file,
                %language,
                unknown_args = fallbacks.unknown_args,
                opaque_receivers = fallbacks.opaque_receivers,
                depth_limited_chains = fallbacks.depth_limited_chains,
                depth_limited_args = fallbacks.depth_limited_args,
                skipped_declarations = fallbacks.skipped_declarations,
                truncated_subtrees = fallbacks.truncated_subtrees,
                "normalization fell back"
            );
        }
        tracing::debug!(
            file = %file,
            %language,
            call_chains = normalized.call_chains.len(),
            functions = normalized.functions.len(),
            classes = normalized.classes.len(),
            imports = normalized.imports.len(),
            exports = normalized.exports.len(),
            fallbacks = fallbacks.total(),
            "file normalized"
        );

        let ir = Arc::new(FileIr {
            file: file.into_owned(),
            language,
            content_hash,
            call_chains: normalized.call_chains,
            functions: normalized.functions,
            classes: normalized.classes,
            imports: normalized.imports,
            exports: normalized.exports,
            fallbacks,
            has_parse_errors: tree.root_node().has_error(),
        });
        self.cache.insert(path, content_hash, Arc::clone(&ir));
        Ok(ir)
    }

    /// Read and normalize one file, enforcing the size limit.
    pub fn normalize_file(&self, path: &Path) -> Result<Arc<FileIr>, ParseError> {
        self.parsers.detect_language(path)?;

        let limit = self.config.provider.effective_max_file_size();
        let io_err = |source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        };
        let size = std::fs::metadata(path).map_err(io_err)?.len();
        if size > limit {
            return Err(ParseError::FileTooLarge {
                path: path.to_path_buf(),
                size,
                limit,
            });
        }
        let source = std::fs::read_to_string(path).map_err(io_err)?;
        self.normalize_source(path, &source)
    }

    /// Normalize in-memory sources in parallel.
    pub fn normalize_files(&self, sources: &[(PathBuf, String)]) -> ProjectIr {
        let start = Instant::now();
        let results: Vec<(&Path, Result<Arc<FileIr>, ParseError>)> = self.install(|| {
            sources
                .par_iter()
                .map(|(path, source)| (path.as_path(), self.normalize_source(path, source)))
                .collect()
        });
        Self::collect(results, start)
    }

    /// Discover and normalize every supported file under `root`.
    pub fn normalize_directory(&self, root: &Path) -> Result<ProjectIr, ConfigError> {
        let start = Instant::now();
        let files = walk_directory(root, &self.config.provider, &self.parsers)?;
        tracing::debug!(root = %root.display(), files = files.len(), "discovery complete");

        let results: Vec<(&Path, Result<Arc<FileIr>, ParseError>)> = self.install(|| {
            files
                .par_iter()
                .map(|f| (f.path.as_path(), self.normalize_file(&f.path)))
                .collect()
        });
        Ok(Self::collect(results, start))
    }

    fn install<R: Send>(&self, op: impl FnOnce() -> R + Send) -> R {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }

    fn collect(results: Vec<(&Path, Result<Arc<FileIr>, ParseError>)>, start: Instant) -> ProjectIr {
        let mut project = ProjectIr::default();
        for (path, result) in results {
            match result {
                Ok(ir) => {
                    let stats = &mut project.stats;
                    stats.files_normalized += 1;
                    stats.call_chains += ir.call_chains.len();
                    stats.functions += ir.functions.len();
                    stats.classes += ir.classes.len();
                    stats.imports += ir.imports.len();
                    stats.exports += ir.exports.len();
                    stats.fallbacks.merge(&ir.fallbacks);
                    project.files.push(ir);
                }
                Err(e) if e.is_skip() => {
                    tracing::trace!(file = %path.display(), reason = %e, "file skipped");
                    project.stats.files_skipped += 1;
                }
                Err(e) => {
                    tracing::warn!(file = %path.display(), error = %e, "file failed to normalize");
                    project.stats.files_failed += 1;
                    project.failures.push(FileFailure {
                        file: path.to_string_lossy().into_owned(),
                        error_code: e.error_code().to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }
        project.files.sort_by(|a, b| a.file.cmp(&b.file));
        project.failures.sort_by(|a, b| a.file.cmp(&b.file));
        project.stats.duration_ms = start.elapsed().as_millis() as u64;
        project
    }
}

//! Parallel file discovery using the `ignore` crate's `WalkParallel`.
//!
//! Honours `.gitignore`, hierarchical `.driftignore` files (gitignore
//! syntax), the default ignore list and `provider.extra_ignore`. Only files
//! with a supported, enabled language and within the size limit are kept.

use std::path::{Path, PathBuf};

use crossbeam_channel as channel;
use drift_normalize_core::{ConfigError, ProviderConfig};

use crate::language::Language;
use crate::parsers::ParserManager;

/// Directories skipped in every walk.
pub const DEFAULT_IGNORES: &[&str] = &[
    "node_modules",
    ".git",
    "dist",
    "build",
    "target",
    ".next",
    "__pycache__",
    ".pytest_cache",
    "coverage",
    "vendor",
    ".venv",
    "venv",
    ".tox",
    ".mypy_cache",
];

/// A file selected for normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    pub path: PathBuf,
    pub size: u64,
    pub language: Language,
}

fn ignore_overrides(root: &Path, config: &ProviderConfig) -> Result<ignore::overrides::Override, ConfigError> {
    let mut overrides = ignore::overrides::OverrideBuilder::new(root);
    let invalid = |pattern: &str, e: ignore::Error| ConfigError::Invalid {
        field: "provider.extra_ignore".to_string(),
        message: format!("bad pattern {pattern:?}: {e}"),
    };
    for &pattern in DEFAULT_IGNORES {
        overrides
            .add(&format!("!{pattern}/**"))
            .and_then(|o| o.add(&format!("!{pattern}")))
            .map_err(|e| invalid(pattern, e))?;
    }
    for pattern in &config.extra_ignore {
        overrides
            .add(&format!("!{pattern}"))
            .map_err(|e| invalid(pattern.as_str(), e))?;
    }
    overrides.build().map_err(|e| ConfigError::Invalid {
        field: "provider.extra_ignore".to_string(),
        message: e.to_string(),
    })
}

/// Walk `root` in parallel. Returns files sorted by path.
pub fn walk_directory(
    root: &Path,
    config: &ProviderConfig,
    parsers: &ParserManager,
) -> Result<Vec<DiscoveredFile>, ConfigError> {
    let (tx, rx) = channel::unbounded();

    let mut builder = ignore::WalkBuilder::new(root);
    builder
        .hidden(false)
        .git_ignore(true)
        .git_global(false)
        .git_exclude(true)
        .require_git(false)
        .add_custom_ignore_filename(".driftignore")
        .max_filesize(Some(config.effective_max_file_size()))
        .follow_links(config.effective_follow_symlinks())
        .overrides(ignore_overrides(root, config)?);

    let threads = config.effective_threads();
    if threads > 0 {
        builder.threads(threads);
    }

    builder.build_parallel().run(|| {
        let tx = tx.clone();
        let parsers = parsers.clone();
        Box::new(move |entry| {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!(error = %e, "walk error, entry skipped");
                    return ignore::WalkState::Continue;
                }
            };
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                return ignore::WalkState::Continue;
            }
            let Ok(language) = parsers.detect_language(entry.path()) else {
                return ignore::WalkState::Continue;
            };
            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            if tx
                .send(DiscoveredFile {
                    path: entry.into_path(),
                    size,
                    language,
                })
                .is_err()
            {
                return ignore::WalkState::Quit;
            }
            ignore::WalkState::Continue
        })
    });

    drop(tx);
    let mut files: Vec<DiscoveredFile> = rx.into_iter().collect();
    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn skips_ignored_and_unsupported_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        fs::create_dir_all(root.join("generated")).unwrap();
        fs::write(root.join("src/lib.rs"), "fn a() {}").unwrap();
        fs::write(root.join("src/app.ts"), "f();").unwrap();
        fs::write(root.join("README.md"), "# hi").unwrap();
        fs::write(root.join("node_modules/pkg/index.js"), "x();").unwrap();
        fs::write(root.join("generated/out.py"), "x()").unwrap();
        fs::write(root.join(".driftignore"), "generated/\n").unwrap();

        let files = walk_directory(root, &ProviderConfig::default(), &ParserManager::new()).unwrap();
        let rel: Vec<PathBuf> = files
            .iter()
            .map(|f| f.path.strip_prefix(root).unwrap().to_path_buf())
            .collect();
        assert_eq!(rel, vec![PathBuf::from("src/app.ts"), PathBuf::from("src/lib.rs")]);
        assert_eq!(files[1].language, Language::Rust);
    }

    #[test]
    fn extra_ignore_and_language_filter() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("a.py"), "x()").unwrap();
        fs::write(root.join("b_test.py"), "x()").unwrap();
        fs::write(root.join("c.rs"), "fn c() {}").unwrap();

        let config = ProviderConfig {
            extra_ignore: vec!["*_test.py".to_string()],
            ..Default::default()
        };
        let parsers = ParserManager::with_languages(&[Language::Python]);
        let files = walk_directory(root, &config, &parsers).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].path.ends_with("a.py"));
    }
}

//! Directory parsing: one `ParsedFile` per `.go` file, grouped by package.
//!
//! Mirrors what `go/parser.ParseDir` hands back. Only the directory itself is
//! scanned, never subdirectories, and the result is rebuilt on every call.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::debug;
use walkdir::WalkDir;

use super::facts::ParsedFile;
use super::go::GoParser;
use crate::error::ExtractError;

/// Options controlling which files of a directory are parsed.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Glob patterns matched against file names (e.g. `*_test.go`).
    pub exclude: Vec<String>,
}

impl ScanOptions {
    fn exclude_set(&self) -> Result<GlobSet, ExtractError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.exclude {
            let glob = Glob::new(pattern).map_err(|source| ExtractError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?;
            builder.add(glob);
        }
        builder.build().map_err(|source| ExtractError::InvalidPattern {
            pattern: self.exclude.join(","),
            source,
        })
    }
}

/// Parsed files of one directory, keyed by package name.
///
/// Packages iterate in name order; files within a package in path order.
#[derive(Debug, Clone, Default)]
pub struct PackageSet {
    packages: BTreeMap<String, Vec<ParsedFile>>,
}

impl PackageSet {
    /// Group already-parsed files by their package clause.
    pub fn from_files(files: impl IntoIterator<Item = ParsedFile>) -> Self {
        let mut packages: BTreeMap<String, Vec<ParsedFile>> = BTreeMap::new();
        for file in files {
            packages.entry(file.package.clone()).or_default().push(file);
        }
        for files in packages.values_mut() {
            files.sort_by(|a, b| a.path.cmp(&b.path));
        }
        Self { packages }
    }

    /// Iterate over `(package name, files)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ParsedFile])> {
        self.packages
            .iter()
            .map(|(name, files)| (name.as_str(), files.as_slice()))
    }

    /// Iterate over every file paired with its package name.
    pub fn files(&self) -> impl Iterator<Item = (&str, &ParsedFile)> {
        self.iter()
            .flat_map(|(name, files)| files.iter().map(move |f| (name, f)))
    }

    pub fn package_names(&self) -> Vec<&str> {
        self.packages.keys().map(String::as_str).collect()
    }
}

/// Collect the `.go` files directly inside `dir`, sorted by name.
fn collect_files(dir: &Path, exclude: &GlobSet) -> Result<Vec<PathBuf>, ExtractError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| ExtractError::ReadDir {
            path: dir.to_path_buf(),
            source: e.into(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("go") {
            continue;
        }
        if exclude.is_match(entry.file_name()) {
            debug!(file = %path.display(), "excluded by pattern");
            continue;
        }
        files.push(path.to_path_buf());
    }

    Ok(files)
}

/// Parse every `.go` file in `dir` and group the results by package.
///
/// Any unreadable or syntactically invalid file fails the whole call.
pub fn parse_directory(dir: &Path, options: &ScanOptions) -> Result<PackageSet, ExtractError> {
    if !dir.is_dir() {
        return Err(ExtractError::ReadDir {
            path: dir.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
        });
    }

    let exclude = options.exclude_set()?;
    let parser = GoParser::shared();

    let mut parsed = Vec::new();
    for path in collect_files(dir, &exclude)? {
        parsed.push(parser.parse_file(&path)?);
    }

    debug!(dir = %dir.display(), files = parsed.len(), "parsed directory");
    Ok(PackageSet::from_files(parsed))
}

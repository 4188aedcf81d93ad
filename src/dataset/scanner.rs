//! Dataset file discovery.
//!
//! A unified scanner that respects configuration for extensions,
//! excludes, file size and file count limits.

use super::{DataFormat, DatasetError};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Configuration for dataset scanning.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// File extensions to include (e.g., ["csv", "json"])
    pub extensions: Vec<String>,
    /// Names to exclude (e.g., ["archive", "tmp"])
    pub excludes: Vec<String>,
    /// Maximum file size in bytes
    pub max_file_size: u64,
    /// Maximum number of files to load
    pub max_files: Option<usize>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["csv".to_string(), "json".to_string()],
            excludes: vec!["target".to_string(), "node_modules".to_string()],
            max_file_size: 64 * 1024 * 1024, // 64MB
            max_files: None,
        }
    }
}

impl From<&crate::config::DatasetConfig> for ScanConfig {
    fn from(config: &crate::config::DatasetConfig) -> Self {
        Self {
            extensions: config.extensions.clone(),
            excludes: config.excludes.clone(),
            max_file_size: config.max_file_size,
            max_files: Some(config.max_files),
        }
    }
}

/// Scanner for discovering dataset files under a root path.
pub struct DatasetScanner {
    config: ScanConfig,
    root: PathBuf,
}

impl DatasetScanner {
    /// Create a new dataset scanner.
    pub fn new(root: PathBuf, config: ScanConfig) -> Self {
        Self { config, root }
    }

    /// Find all dataset files, sorted by path.
    ///
    /// A root that is itself a file is returned as-is if its format is
    /// supported.
    pub fn scan(&self) -> Result<Vec<PathBuf>, DatasetError> {
        if self.root.is_file() {
            DataFormat::from_path(&self.root)?;
            return Ok(vec![self.root.clone()]);
        }

        if !self.root.is_dir() {
            return Err(DatasetError::NoFiles(self.root.display().to_string()));
        }

        let mut files: Vec<PathBuf> = WalkDir::new(&self.root)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !self.is_excluded(entry))
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file() && self.matches(entry.path()))
            .map(|entry| entry.into_path())
            .collect();

        files.sort();

        if let Some(max) = self.config.max_files {
            if files.len() > max {
                debug!("Limiting dataset files from {} to {}", files.len(), max);
                files.truncate(max);
            }
        }

        if files.is_empty() {
            return Err(DatasetError::NoFiles(self.root.display().to_string()));
        }

        Ok(files)
    }

    /// Check if a file matches scan criteria.
    pub fn matches(&self, path: &Path) -> bool {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if !self.config.extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext)) {
            return false;
        }

        match std::fs::metadata(path) {
            Ok(metadata) if metadata.len() <= self.config.max_file_size => true,
            Ok(metadata) => {
                warn!(
                    "Skipping {} ({} bytes exceeds limit)",
                    path.display(),
                    metadata.len()
                );
                false
            }
            Err(_) => false,
        }
    }

    /// Hidden entries and explicit excludes are skipped.
    fn is_excluded(&self, entry: &DirEntry) -> bool {
        let name = entry.file_name().to_string_lossy();
        name.starts_with('.') || self.config.excludes.iter().any(|pattern| name == pattern.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_scan_filters_and_sorts() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "b.csv", "country\n");
        write(temp_dir.path(), "a.json", "[]");
        write(temp_dir.path(), "notes.txt", "ignore me");
        write(temp_dir.path(), "nested/c.csv", "country\n");
        write(temp_dir.path(), ".hidden/d.csv", "country\n");
        write(temp_dir.path(), "archive/e.csv", "country\n");

        let config = ScanConfig {
            excludes: vec!["archive".to_string()],
            ..Default::default()
        };
        let scanner = DatasetScanner::new(temp_dir.path().to_path_buf(), config);
        let files = scanner.scan().unwrap();

        let names: Vec<String> = files
            .iter()
            .map(|p| {
                p.strip_prefix(temp_dir.path())
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();
        assert_eq!(names, vec!["a.json", "b.csv", "nested/c.csv"]);
    }

    #[test]
    fn test_scan_respects_limits() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "a.csv", "country\n");
        write(temp_dir.path(), "b.csv", "country\n");
        write(temp_dir.path(), "big.csv", &"x".repeat(2048));

        let config = ScanConfig {
            max_file_size: 1024,
            max_files: Some(1),
            ..Default::default()
        };
        let scanner = DatasetScanner::new(temp_dir.path().to_path_buf(), config);
        let files = scanner.scan().unwrap();

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("a.csv"));
    }

    #[test]
    fn test_scan_single_file() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "data.csv", "country\n");
        write(temp_dir.path(), "data.xlsx", "binary");

        let scanner = DatasetScanner::new(temp_dir.path().join("data.csv"), ScanConfig::default());
        assert_eq!(scanner.scan().unwrap().len(), 1);

        let scanner = DatasetScanner::new(temp_dir.path().join("data.xlsx"), ScanConfig::default());
        assert!(matches!(
            scanner.scan(),
            Err(DatasetError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_scan_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let scanner = DatasetScanner::new(temp_dir.path().to_path_buf(), ScanConfig::default());
        assert!(matches!(scanner.scan(), Err(DatasetError::NoFiles(_))));
    }
}

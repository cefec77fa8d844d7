//! Template resource resolution.
//!
//! # Responsibilities
//! - Resolve a logical template name to a readable byte stream
//! - Search the root folder and all sub folders for file-backed templates
//! - Remember resolved paths for the lifetime of the provider
//!
//! # Design Decisions
//! - A configured root folder overrides the caller's root hint
//! - Absolute names are used as-is
//! - Directory walks are sorted so the first match is deterministic

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// A source of template streams.
pub trait TemplateProvider: Send + Sync {
    /// Open the template `name`, searching under `root` when the provider needs a hint.
    fn open(&self, name: &str, root: &Path) -> Result<Box<dyn BufRead + Send>>;
}

/// Templates stored as files beneath a root folder.
#[derive(Debug, Default)]
pub struct FileTemplateProvider {
    root_folder: Option<PathBuf>,
    located: DashMap<String, PathBuf>,
}

impl FileTemplateProvider {
    pub fn new(root_folder: Option<PathBuf>) -> Self {
        Self {
            root_folder,
            located: DashMap::new(),
        }
    }

    /// Locate the file for `name`: the first file, in sorted walk order, whose path ends
    /// with `name`.
    pub fn locate(&self, name: &str, root: &Path) -> Result<PathBuf> {
        let root = self.root_folder.as_deref().unwrap_or(root);
        if name.is_empty() {
            return Err(Error::TemplateNotFound {
                name: String::new(),
                root: root.to_path_buf(),
            });
        }

        let candidate = Path::new(name);
        if candidate.is_absolute() {
            return Ok(candidate.to_path_buf());
        }
        if let Some(path) = self.located.get(name) {
            return Ok(path.value().clone());
        }

        let found = WalkDir::new(root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .find(|entry| entry.file_type().is_file() && entry.path().ends_with(candidate))
            .map(|entry| entry.into_path());

        match found {
            Some(path) => {
                tracing::debug!(template = %name, path = %path.display(), "Located template");
                self.located.insert(name.to_string(), path.clone());
                Ok(path)
            }
            None => Err(Error::TemplateNotFound {
                name: name.to_string(),
                root: root.to_path_buf(),
            }),
        }
    }

    /// Number of remembered name → path resolutions.
    pub fn cached_locations(&self) -> usize {
        self.located.len()
    }
}

impl TemplateProvider for FileTemplateProvider {
    fn open(&self, name: &str, root: &Path) -> Result<Box<dyn BufRead + Send>> {
        let path = self.locate(name, root)?;
        let file = File::open(&path).map_err(|source| Error::TemplateRead {
            name: name.to_string(),
            source,
        })?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Templates held in memory, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct MemoryTemplateProvider {
    templates: HashMap<String, Arc<[u8]>>,
}

impl MemoryTemplateProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) {
        let bytes: Arc<[u8]> = Arc::from(text.into().into_bytes());
        self.templates.insert(name.into(), bytes);
    }

    pub fn with(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(name, text);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }
}

impl TemplateProvider for MemoryTemplateProvider {
    fn open(&self, name: &str, root: &Path) -> Result<Box<dyn BufRead + Send>> {
        match self.templates.get(name) {
            Some(bytes) => Ok(Box::new(Cursor::new(Arc::clone(bytes)))),
            None => Err(Error::TemplateNotFound {
                name: name.to_string(),
                root: root.to_path_buf(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Read;

    fn read_all(mut reader: Box<dyn BufRead + Send>) -> String {
        let mut text = String::new();
        reader.read_to_string(&mut text).unwrap();
        text
    }

    #[test]
    fn test_locates_templates_in_sub_folders() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("views/partials")).unwrap();
        fs::write(dir.path().join("views/partials/header.html"), "<header/>").unwrap();

        let provider = FileTemplateProvider::new(None);
        let reader = provider.open("header.html", dir.path()).unwrap();
        assert_eq!(read_all(reader), "<header/>");

        let reader = provider.open("partials/header.html", dir.path()).unwrap();
        assert_eq!(read_all(reader), "<header/>");
    }

    #[test]
    fn test_resolutions_are_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.html");
        fs::write(&path, "v1").unwrap();

        let provider = FileTemplateProvider::new(None);
        assert_eq!(provider.locate("page.html", dir.path()).unwrap(), path);
        assert_eq!(provider.cached_locations(), 1);

        // A cached name no longer needs the original root.
        let elsewhere = tempfile::tempdir().unwrap();
        assert_eq!(provider.locate("page.html", elsewhere.path()).unwrap(), path);
        assert_eq!(provider.cached_locations(), 1);
    }

    #[test]
    fn test_root_folder_overrides_hint() {
        let templates = tempfile::tempdir().unwrap();
        fs::write(templates.path().join("home.html"), "home").unwrap();
        let hint = tempfile::tempdir().unwrap();

        let provider = FileTemplateProvider::new(Some(templates.path().to_path_buf()));
        let reader = provider.open("home.html", hint.path()).unwrap();
        assert_eq!(read_all(reader), "home");
    }

    #[test]
    fn test_missing_template_reports_root() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FileTemplateProvider::new(None);
        let err = provider.open("absent.html", dir.path()).err().unwrap();

        match &err {
            Error::TemplateNotFound { name, root } => {
                assert_eq!(name, "absent.html");
                assert_eq!(root, dir.path());
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains(&dir.path().display().to_string()));
        assert_eq!(provider.cached_locations(), 0);
    }

    #[test]
    fn test_absolute_names_bypass_search() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("direct.html");
        fs::write(&path, "direct").unwrap();

        let provider = FileTemplateProvider::new(None);
        let name = path.to_str().unwrap();
        let reader = provider.open(name, Path::new("/nonexistent")).unwrap();
        assert_eq!(read_all(reader), "direct");
    }

    #[test]
    fn test_memory_provider() {
        let provider = MemoryTemplateProvider::new().with("a.html", "<a>@x@</a>");
        assert!(provider.contains("a.html"));
        assert_eq!(read_all(provider.open("a.html", Path::new(".")).unwrap()), "<a>@x@</a>");
        assert!(matches!(
            provider.open("b.html", Path::new("/srv")),
            Err(Error::TemplateNotFound { .. })
        ));
    }
}

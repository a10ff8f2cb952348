//! Scripted in-memory catalog for engine unit tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::catalog::{
    Catalog, CatalogError, FileRecord, ItemMetadata, SearchRequest, SearchResult,
};
use crate::download::flat_file_name;

/// Scripted result of one `download_files` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DownloadScript {
    Write,
    PathConflict,
    Transfer,
    Io,
}

#[derive(Default)]
pub(crate) struct FakeCatalog {
    pub(crate) results: Vec<SearchResult>,
    pub(crate) failing_pages: HashSet<u32>,
    pub(crate) items: HashMap<String, ItemMetadata>,
    pub(crate) download_script: Mutex<VecDeque<DownloadScript>>,
    pub(crate) searches: Mutex<Vec<SearchRequest>>,
    pub(crate) item_fetches: Mutex<Vec<String>>,
    pub(crate) download_dirs: Mutex<Vec<PathBuf>>,
}

impl FakeCatalog {
    pub(crate) fn with_item(mut self, identifier: &str, title: &str, files: Vec<FileRecord>) -> Self {
        self.items.insert(
            identifier.to_string(),
            ItemMetadata {
                identifier: identifier.to_string(),
                title: title.to_string(),
                collection: None,
                files,
            },
        );
        self.results.push(SearchResult::new(title, identifier));
        self
    }

    pub(crate) fn with_download_script(self, script: &[DownloadScript]) -> Self {
        self.download_script
            .lock()
            .unwrap()
            .extend(script.iter().copied());
        self
    }

    pub(crate) fn search_count(&self) -> usize {
        self.searches.lock().unwrap().len()
    }

    pub(crate) fn download_dirs(&self) -> Vec<PathBuf> {
        self.download_dirs.lock().unwrap().clone()
    }
}

pub(crate) fn pdf(name: &str, bytes: u64) -> FileRecord {
    FileRecord::new(name, "Text PDF", Some(bytes))
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchResult>, CatalogError> {
        self.searches.lock().unwrap().push(request.clone());
        if self.failing_pages.contains(&request.page) {
            return Err(CatalogError::unavailable("search", "HTTP 503"));
        }
        Ok(self.results.clone())
    }

    async fn get_item(&self, identifier: &str) -> Result<ItemMetadata, CatalogError> {
        self.item_fetches.lock().unwrap().push(identifier.to_string());
        self.items
            .get(identifier)
            .cloned()
            .ok_or_else(|| CatalogError::item_not_found(identifier))
    }

    async fn download_files(
        &self,
        item: &ItemMetadata,
        target_dir: &Path,
        formats: &[String],
    ) -> Result<Vec<PathBuf>, CatalogError> {
        self.download_dirs
            .lock()
            .unwrap()
            .push(target_dir.to_path_buf());
        let step = self
            .download_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(DownloadScript::Write);

        match step {
            DownloadScript::PathConflict => Err(CatalogError::path_conflict(
                target_dir,
                std::io::Error::new(std::io::ErrorKind::NotADirectory, "not a directory"),
            )),
            DownloadScript::Transfer => Err(CatalogError::transfer_status(
                format!("http://fake/download/{}", item.identifier),
                500,
            )),
            DownloadScript::Io => Err(CatalogError::from_fs(
                target_dir,
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            )),
            DownloadScript::Write => {
                std::fs::create_dir_all(target_dir).unwrap();
                let mut written = Vec::new();
                for file in item.files.iter().filter(|f| formats.contains(&f.format)) {
                    let path = target_dir.join(flat_file_name(&file.name));
                    std::fs::write(&path, b"%PDF-1.4").unwrap();
                    written.push(path);
                }
                Ok(written)
            }
        }
    }
}

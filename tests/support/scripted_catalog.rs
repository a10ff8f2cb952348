//! In-memory catalog with one distinct item per topic page.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use archivar_core::catalog::{
    Catalog, CatalogError, FileRecord, ItemMetadata, SearchRequest, SearchResult,
};
use async_trait::async_trait;

#[derive(Default)]
pub struct ScriptedCatalog {
    pages: HashMap<(String, u32), Vec<SearchResult>>,
    items: HashMap<String, ItemMetadata>,
    failing_downloads: HashSet<String>,
    searches: Mutex<Vec<SearchRequest>>,
    downloads: Mutex<Vec<String>>,
}

impl ScriptedCatalog {
    /// Fills pages `1..=pages` of `topic` with one item each, identified `<topic>-p<page>`.
    pub fn with_topic(mut self, topic: &str, pages: u32) -> Self {
        for page in 1..=pages {
            let identifier = format!("{topic}-p{page}");
            let title = format!("{topic} Page {page}");
            self.items.insert(
                identifier.clone(),
                ItemMetadata {
                    identifier: identifier.clone(),
                    title: title.clone(),
                    collection: None,
                    files: vec![FileRecord::new(
                        format!("{identifier}.pdf"),
                        "Text PDF",
                        Some(2048),
                    )],
                },
            );
            self.pages
                .insert((topic.to_string(), page), vec![SearchResult::new(title, identifier)]);
        }
        self
    }

    /// Makes every transfer for `identifier` fail with HTTP 500.
    pub fn fail_download(mut self, identifier: &str) -> Self {
        self.failing_downloads.insert(identifier.to_string());
        self
    }

    pub fn searches(&self) -> Vec<SearchRequest> {
        self.searches.lock().unwrap().clone()
    }

    /// Pages requested for queries on `topic`, in request order.
    pub fn pages_for(&self, topic: &str) -> Vec<u32> {
        let prefix = format!("title:({topic})");
        self.searches()
            .iter()
            .filter(|request| request.query.starts_with(&prefix))
            .map(|request| request.page)
            .collect()
    }

    pub fn downloads(&self) -> Vec<String> {
        self.downloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl Catalog for ScriptedCatalog {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchResult>, CatalogError> {
        self.searches.lock().unwrap().push(request.clone());
        let results = self
            .pages
            .iter()
            .find(|((topic, page), _)| {
                *page == request.page && request.query.starts_with(&format!("title:({topic})"))
            })
            .map(|(_, results)| results.clone())
            .unwrap_or_default();
        Ok(results)
    }

    async fn get_item(&self, identifier: &str) -> Result<ItemMetadata, CatalogError> {
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
        self.downloads
            .lock()
            .unwrap()
            .push(item.identifier.clone());
        if self.failing_downloads.contains(&item.identifier) {
            return Err(CatalogError::transfer_status(
                format!("http://catalog.test/download/{}", item.identifier),
                500,
            ));
        }

        let mut written = Vec::new();
        for file in item.files.iter().filter(|f| formats.contains(&f.format)) {
            let path = target_dir.join(&file.name);
            std::fs::write(&path, b"%PDF-1.4").map_err(|e| CatalogError::from_fs(&path, e))?;
            written.push(path);
        }
        Ok(written)
    }
}

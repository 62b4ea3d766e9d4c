use crate::core::ingest::IngestEngine;
use crate::domain::model::{export_file_name, CandidateBatch, IngestionResult};
use crate::domain::ports::{DomainStore, IngestObserver, Storage};
use crate::utils::error::{Result, SubbudError};
use chrono::NaiveDate;
use std::sync::Arc;

pub struct ProjectService<S: DomainStore + 'static, F: Storage> {
    store: Arc<S>,
    files: F,
    engine: IngestEngine<S>,
}

impl<S: DomainStore + 'static, F: Storage> ProjectService<S, F> {
    pub fn new(store: Arc<S>, files: F, workers: usize) -> Self {
        let engine = IngestEngine::with_workers(Arc::clone(&store), workers);
        Self {
            store,
            files,
            engine,
        }
    }

    /// Read a newline-delimited file and ingest it. A missing or unreadable
    /// file is reported the same way as a file without domains.
    pub async fn add_from_file(
        &self,
        project: &str,
        path: &str,
        observer: &dyn IngestObserver,
    ) -> Result<IngestionResult> {
        let data = match self.files.read_file(path).await {
            Ok(data) => data,
            Err(SubbudError::IoError(e)) => {
                return Err(SubbudError::EmptyInput {
                    source_name: format!("'{}' ({})", path, e),
                })
            }
            Err(e) => return Err(e),
        };

        let content = String::from_utf8(data).map_err(|e| SubbudError::EmptyInput {
            source_name: format!("'{}' (not valid UTF-8: {})", path, e),
        })?;

        let batch = CandidateBatch::from_text(&content);
        if batch.is_empty() {
            return Err(SubbudError::EmptyInput {
                source_name: format!("'{}'", path),
            });
        }

        tracing::debug!("Read {} distinct domains from {}", batch.len(), path);
        self.engine.ingest_batch(project, &batch, observer).await
    }

    /// Sorted members of a project.
    pub async fn members(&self, project: &str) -> Result<Vec<String>> {
        let mut domains: Vec<String> = self.store.members_of(project).await?.into_iter().collect();
        domains.sort();
        Ok(domains)
    }

    pub async fn list(&self) -> Result<Vec<String>> {
        self.store.list_project_keys().await
    }

    pub async fn delete(&self, project: &str) -> Result<bool> {
        let existed = self.store.delete_project(project).await?;
        if existed {
            tracing::debug!("Deleted project '{}'", project);
        } else {
            tracing::debug!("Project '{}' not found, nothing deleted", project);
        }
        Ok(existed)
    }

    /// Write `<date>_<project>.txt`, one domain per line, overwriting any
    /// previous export. Returns `None` without writing when the project is
    /// empty.
    pub async fn save(&self, project: &str, date: NaiveDate) -> Result<Option<String>> {
        let domains = self.members(project).await?;
        if domains.is_empty() {
            return Ok(None);
        }

        let mut content = String::with_capacity(domains.iter().map(|d| d.len() + 1).sum());
        for domain in &domains {
            content.push_str(domain);
            content.push('\n');
        }

        let file_name = export_file_name(project, date);
        let written = self.files.write_file(&file_name, content.as_bytes()).await?;
        tracing::debug!("Exported {} domains to {}", domains.len(), written);
        Ok(Some(written))
    }
}

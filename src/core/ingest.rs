use crate::domain::model::{CandidateBatch, IngestionResult};
use crate::domain::ports::{DomainStore, IngestObserver, NoopObserver};
use crate::utils::error::{Result, SubbudError};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Deduplicating bulk insert.
///
/// Diffs a candidate batch against the stored set, then commits each novel
/// domain as its own `add_all` call on a bounded pool of tasks. A failed
/// commit is logged and left out of `added` without aborting the rest.
/// The engine keeps no state between calls.
pub struct IngestEngine<S: DomainStore + 'static> {
    store: Arc<S>,
    workers: usize,
}

impl<S: DomainStore + 'static> IngestEngine<S> {
    /// Pool sized to the number of CPUs.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_workers(store, num_cpus::get())
    }

    pub fn with_workers(store: Arc<S>, workers: usize) -> Self {
        Self {
            store,
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub async fn ingest<I, T>(&self, project: &str, candidates: I) -> Result<IngestionResult>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let batch = CandidateBatch::new(candidates);
        self.ingest_batch(project, &batch, &NoopObserver).await
    }

    pub async fn ingest_batch(
        &self,
        project: &str,
        batch: &CandidateBatch,
        observer: &dyn IngestObserver,
    ) -> Result<IngestionResult> {
        if batch.is_empty() {
            return Err(SubbudError::EmptyInput {
                source_name: format!("candidate batch for '{}'", project),
            });
        }

        let existing = self.store.members_of(project).await?;
        let novel: Vec<String> = batch.novel(&existing).cloned().collect();
        let total = batch.len();

        tracing::debug!(
            "Project '{}': {} candidates, {} stored, {} novel",
            project,
            total,
            existing.len(),
            novel.len()
        );

        if novel.is_empty() {
            return Ok(IngestionResult::new(project, total, 0, Vec::new()));
        }

        let (added, failed) = self.commit_all(project, novel, observer).await;
        let result = IngestionResult::new(project, total, added.len(), failed);

        tracing::debug!(
            "Project '{}': added {}, duplicates {} ({:.2}%)",
            project,
            result.added,
            result.duplicates,
            result.duplicate_percentage
        );
        Ok(result)
    }

    /// Fan out one commit per domain, join them all, and return the
    /// committed and failed domains. Never fails as a whole.
    async fn commit_all(
        &self,
        project: &str,
        novel: Vec<String>,
        observer: &dyn IngestObserver,
    ) -> (Vec<String>, Vec<String>) {
        let total = novel.len();
        let permits = Arc::new(Semaphore::new(self.workers));
        let project: Arc<str> = Arc::from(project);
        let mut pending: HashSet<String> = novel.iter().cloned().collect();
        let mut tasks = JoinSet::new();

        for domain in novel {
            let store = Arc::clone(&self.store);
            let permits = Arc::clone(&permits);
            let project = Arc::clone(&project);

            tasks.spawn(async move {
                let outcome = match permits.acquire_owned().await {
                    Ok(_permit) => store
                        .add_all(&project, std::slice::from_ref(&domain))
                        .await
                        .map_err(|e| SubbudError::Commit {
                            domain: domain.clone(),
                            message: e.to_string(),
                        }),
                    Err(e) => Err(SubbudError::Commit {
                        domain: domain.clone(),
                        message: format!("worker pool closed: {}", e),
                    }),
                };
                (domain, outcome)
            });
        }

        let mut added = Vec::with_capacity(total);
        let mut failed = Vec::new();
        let mut settled = 0;

        while let Some(joined) = tasks.join_next().await {
            settled += 1;
            match joined {
                Ok((domain, Ok(()))) => {
                    pending.remove(&domain);
                    observer.on_commit(&domain, true, settled, total);
                    added.push(domain);
                }
                Ok((domain, Err(e))) => {
                    tracing::warn!("❌ {}", e);
                    pending.remove(&domain);
                    observer.on_commit(&domain, false, settled, total);
                    failed.push(domain);
                }
                Err(e) => {
                    tracing::warn!("❌ Commit task for project '{}' aborted: {}", project, e);
                }
            }
        }

        // 崩潰的任務無法回報網域名稱，剩下未結算的都算失敗
        failed.extend(pending);
        failed.sort();

        (added, failed)
    }
}

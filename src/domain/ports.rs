use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashSet;

/// Capability over a remote set-per-key store.
///
/// Implementations must be safe to call concurrently for the same project;
/// insertion of a single element is atomic and idempotent, but nothing is
/// atomic across calls.
#[async_trait]
pub trait DomainStore: Send + Sync {
    /// Full membership of a project. Unknown projects yield an empty set.
    async fn members_of(&self, project: &str) -> Result<HashSet<String>>;

    /// Add every element to the project's set. Re-adding is a no-op.
    async fn add_all(&self, project: &str, domains: &[String]) -> Result<()>;

    /// All project keys, minus those under the reserved prefix.
    async fn list_project_keys(&self) -> Result<Vec<String>>;

    /// Remove a project. Returns whether it existed.
    async fn delete_project(&self, project: &str) -> Result<bool>;
}

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait StoreSettings: Send + Sync {
    fn host(&self) -> &str;
    fn port(&self) -> u16;
    fn db(&self) -> i64;
    fn tls(&self) -> bool;
    fn username(&self) -> Option<&str>;
    fn password(&self) -> Option<&str>;
    fn connect_timeout_secs(&self) -> u64;
    fn reserved_prefix(&self) -> &str;
}

/// Progress hook, called once per settled commit in completion order.
pub trait IngestObserver: Send + Sync {
    fn on_commit(&self, domain: &str, succeeded: bool, settled: usize, total: usize);
}

/// Observer that ignores every event.
pub struct NoopObserver;

impl IngestObserver for NoopObserver {
    fn on_commit(&self, _domain: &str, _succeeded: bool, _settled: usize, _total: usize) {}
}

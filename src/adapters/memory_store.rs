use crate::domain::model::visible_project_keys;
use crate::domain::ports::DomainStore;
use crate::utils::error::{Result, SubbudError};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

#[derive(Default)]
struct State {
    sets: HashMap<String, HashSet<String>>,
    failing: HashSet<String>,
    unavailable: bool,
}

/// In-process set store. Clones share the same state.
///
/// Besides plain set semantics it can inject faults: named domains that
/// always fail to commit, a fully unavailable store, and a per-call
/// latency that makes commits overlap.
#[derive(Clone)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
    reserved_prefix: String,
    latency: Option<Duration>,
    add_calls: Arc<AtomicUsize>,
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_reserved_prefix("_")
    }

    pub fn with_reserved_prefix(prefix: &str) -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
            reserved_prefix: prefix.to_string(),
            latency: None,
            add_calls: Arc::new(AtomicUsize::new(0)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make every `add_all` containing `domain` fail with a store error.
    pub async fn fail_on(&self, domain: &str) {
        self.state.lock().await.failing.insert(domain.to_string());
    }

    pub async fn set_unavailable(&self, unavailable: bool) {
        self.state.lock().await.unavailable = unavailable;
    }

    /// Seed a project directly, bypassing the call counters.
    pub async fn seed<I, T>(&self, project: &str, domains: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut state = self.state.lock().await;
        let set = state.sets.entry(project.to_string()).or_default();
        set.extend(domains.into_iter().map(Into::into));
    }

    pub fn add_calls(&self) -> usize {
        self.add_calls.load(Ordering::SeqCst)
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn unavailable_error() -> SubbudError {
        SubbudError::StoreUnavailable {
            message: "connection refused".to_string(),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DomainStore for MemoryStore {
    async fn members_of(&self, project: &str) -> Result<HashSet<String>> {
        let state = self.state.lock().await;
        if state.unavailable {
            return Err(Self::unavailable_error());
        }
        Ok(state.sets.get(project).cloned().unwrap_or_default())
    }

    async fn add_all(&self, project: &str, domains: &[String]) -> Result<()> {
        self.add_calls.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let outcome = {
            let mut state = self.state.lock().await;
            if state.unavailable {
                Err(Self::unavailable_error())
            } else if let Some(bad) = domains.iter().find(|d| state.failing.contains(*d)) {
                Err(SubbudError::Store {
                    message: format!("injected failure for '{}'", bad),
                })
            } else {
                if !domains.is_empty() {
                    let set = state.sets.entry(project.to_string()).or_default();
                    set.extend(domains.iter().cloned());
                }
                Ok(())
            }
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        outcome
    }

    async fn list_project_keys(&self) -> Result<Vec<String>> {
        let state = self.state.lock().await;
        if state.unavailable {
            return Err(Self::unavailable_error());
        }

        let keys = state
            .sets
            .iter()
            .filter(|(_, set)| !set.is_empty())
            .map(|(key, _)| key.clone());
        Ok(visible_project_keys(keys, &self.reserved_prefix))
    }

    async fn delete_project(&self, project: &str) -> Result<bool> {
        let mut state = self.state.lock().await;
        if state.unavailable {
            return Err(Self::unavailable_error());
        }
        Ok(state.sets.remove(project).is_some_and(|set| !set.is_empty()))
    }
}

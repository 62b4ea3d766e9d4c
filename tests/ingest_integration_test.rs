use anyhow::Result;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use subbud::core::DomainStore;
use subbud::{IngestEngine, MemoryStore};

fn domains(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{}{}.example.com", prefix, i)).collect()
}

#[tokio::test]
async fn test_counts_always_cover_distinct_candidates() -> Result<()> {
    let store = MemoryStore::new();
    store.seed("acme", ["a.com", "c.com"]).await;
    store.fail_on("e.com").await;
    let engine = IngestEngine::with_workers(Arc::new(store.clone()), 3);

    let candidates = ["a.com", "b.com", "b.com", "", "c.com", "d.com", "e.com", "  a.com"];
    let result = engine.ingest("acme", candidates).await?;

    // a, b, c, d, e
    assert_eq!(result.total(), 5);
    assert_eq!(result.added + result.duplicates, 5);
    assert_eq!(result.added, 2);
    assert_eq!(result.failed, vec!["e.com".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_repeat_ingest_is_idempotent() -> Result<()> {
    let store = MemoryStore::new();
    let engine = IngestEngine::with_workers(Arc::new(store.clone()), 4);
    let batch = domains("host", 25);

    let first = engine.ingest("acme", &batch).await?;
    assert_eq!(first.added, 25);
    assert_eq!(first.duplicates, 0);

    let calls_after_first = store.add_calls();
    let second = engine.ingest("acme", &batch).await?;
    assert_eq!(second.added, 0);
    assert_eq!(second.duplicates, 25);
    assert_eq!(second.duplicate_percentage, 100.0);
    assert_eq!(store.add_calls(), calls_after_first);
    Ok(())
}

#[tokio::test]
async fn test_membership_bounded_by_before_and_batch() -> Result<()> {
    let store = MemoryStore::new();
    store.seed("acme", ["keep.com", "x.com"]).await;
    store.fail_on("y.com").await;
    let engine = IngestEngine::with_workers(Arc::new(store.clone()), 2);

    let before = store.members_of("acme").await?;
    let batch = vec!["x.com".to_string(), "y.com".to_string(), "z.com".to_string()];
    engine.ingest("acme", &batch).await?;
    let after = store.members_of("acme").await?;

    assert!(after.is_superset(&before));
    let upper: HashSet<String> = before.iter().cloned().chain(batch).collect();
    assert!(after.is_subset(&upper));
    assert!(!after.contains("y.com"));
    Ok(())
}

#[tokio::test]
async fn test_concurrent_ingests_with_disjoint_batches() -> Result<()> {
    let store = MemoryStore::new().with_latency(Duration::from_millis(2));
    let engine = Arc::new(IngestEngine::with_workers(Arc::new(store.clone()), 4));

    let batches: Vec<Vec<String>> = (0..6).map(|i| domains(&format!("b{}-", i), 15)).collect();
    let mut handles = Vec::new();
    for batch in batches.clone() {
        let engine = Arc::clone(&engine);
        handles.push(tokio::spawn(async move { engine.ingest("shared", batch).await }));
    }

    for handle in handles {
        let result = handle.await??;
        assert_eq!(result.added, 15);
    }

    let expected: HashSet<String> = batches.into_iter().flatten().collect();
    assert_eq!(store.members_of("shared").await?, expected);
    Ok(())
}

#[tokio::test]
async fn test_delete_then_members_empty() -> Result<()> {
    let store = MemoryStore::new();
    let engine = IngestEngine::with_workers(Arc::new(store.clone()), 2);
    engine.ingest("acme", ["a.com", "b.com"]).await?;

    assert!(store.delete_project("acme").await?);
    assert!(store.members_of("acme").await?.is_empty());
    assert!(!store.delete_project("acme").await?);
    assert!(!store.delete_project("never-existed").await?);
    Ok(())
}

#[tokio::test]
async fn test_projects_created_on_first_insert() -> Result<()> {
    let store = MemoryStore::new();
    let engine = IngestEngine::with_workers(Arc::new(store.clone()), 2);
    assert!(store.list_project_keys().await?.is_empty());

    engine.ingest("beta", ["b.com"]).await?;
    engine.ingest("alpha", ["a.com"]).await?;
    store.seed("_subbud:meta", ["v1"]).await;

    assert_eq!(store.list_project_keys().await?, vec!["alpha", "beta"]);
    Ok(())
}

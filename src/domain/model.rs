use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Raw candidate lines after trimming, blank removal and exact-duplicate
/// collapse. Keeps first-seen order so dispatch order is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateBatch {
    domains: Vec<String>,
}

impl CandidateBatch {
    pub fn new<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut domains = Vec::new();

        for entry in raw {
            let domain = entry.as_ref().trim();
            if domain.is_empty() {
                continue;
            }
            if seen.insert(domain.to_string()) {
                domains.push(domain.to_string());
            }
        }

        Self { domains }
    }

    /// 解析以換行分隔的純文字內容
    pub fn from_text(content: &str) -> Self {
        Self::new(content.lines())
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    /// Candidates not already present in `existing`, in batch order.
    pub fn novel<'a>(&'a self, existing: &'a HashSet<String>) -> impl Iterator<Item = &'a String> {
        self.domains.iter().filter(move |d| !existing.contains(*d))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestionResult {
    pub project: String,
    pub added: usize,
    pub duplicates: usize,
    pub duplicate_percentage: f64,
    /// Novel domains whose commit failed. They are already folded into
    /// `duplicates`, so the percentage overstates real duplication.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<String>,
}

impl IngestionResult {
    pub fn new(project: &str, total: usize, added: usize, failed: Vec<String>) -> Self {
        let duplicates = total.saturating_sub(added);
        let duplicate_percentage = if total == 0 {
            0.0
        } else {
            duplicates as f64 / total as f64 * 100.0
        };

        Self {
            project: project.to_string(),
            added,
            duplicates,
            duplicate_percentage,
            failed,
        }
    }

    pub fn total(&self) -> usize {
        self.added + self.duplicates
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// `<YYYY-MM-DD>_<project>.txt`
pub fn export_file_name(project: &str, date: NaiveDate) -> String {
    format!("{}_{}.txt", date.format("%Y-%m-%d"), project)
}

/// Drop keys under the reserved prefix, then sort and dedup what is left.
/// An empty prefix reserves nothing.
pub fn visible_project_keys<I>(keys: I, reserved_prefix: &str) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut visible: Vec<String> = keys
        .into_iter()
        .filter(|key| reserved_prefix.is_empty() || !key.starts_with(reserved_prefix))
        .collect();
    visible.sort();
    visible.dedup();
    visible
}

use crate::domain::model::IngestionResult;
use crate::utils::error::Result;

pub fn render_summary(result: &IngestionResult) -> String {
    let mut lines = Vec::new();

    if result.added == 0 && !result.has_failures() {
        lines.push("✅ No new domains found.".to_string());
    } else {
        lines.push("✅ Domain Addition Complete".to_string());
    }
    lines.push(format!(
        "✨ Added {} new domains to '{}' project.",
        result.added, result.project
    ));
    lines.push(format!("🔍 Duplicates detected: {}", result.duplicates));
    lines.push(format!(
        "🔄 Percentage of duplicates: {:.2}%",
        result.duplicate_percentage
    ));

    if result.has_failures() {
        lines.push(format!(
            "⚠️  {} domains failed to commit and are counted as duplicates above.",
            result.failed.len()
        ));
    }

    lines.join("\n")
}

pub fn render_summary_json(result: &IngestionResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

pub fn render_members(project: &str, domains: &[String]) -> String {
    if domains.is_empty() {
        return "❌ No domains found for this project.".to_string();
    }

    let mut out = format!(
        "✅ {} domains found for the '{}' project:",
        domains.len(),
        project
    );
    for domain in domains {
        out.push('\n');
        out.push_str(domain);
    }
    out
}

pub fn render_projects(projects: &[String]) -> String {
    if projects.is_empty() {
        return "❌ No projects found.".to_string();
    }

    let mut out = "📋 Available projects:".to_string();
    for project in projects {
        out.push('\n');
        out.push_str(project);
    }
    out
}

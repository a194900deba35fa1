use mission_core::{AppViewModel, FilterModel, Job, Language, LogEntry, Severity, Stats, Status};

use super::constants::{
    language_label, HELP_LINES, PROGRESS_BAR_WIDTH, ROLE_CATEGORIES, STRICT_MODE_NOTE,
};

/// Remembers what has already been printed so each view change only emits
/// the parts that differ.
#[derive(Debug, Default)]
pub struct RenderCursor {
    printed_logs: u64,
    status: Option<(Status, bool)>,
    stats: Option<Stats>,
    jobs: Option<Vec<Job>>,
    filters: Option<FilterModel>,
}

pub fn render(view: &AppViewModel, cursor: &mut RenderCursor) -> Vec<String> {
    let mut lines = Vec::new();

    let status_key = (view.status.clone(), view.launching);
    if cursor.status.as_ref() != Some(&status_key) {
        lines.push(status_line(view));
        cursor.status = Some(status_key);
    }

    lines.extend(new_log_lines(view, cursor));

    if cursor.filters.as_ref() != Some(&view.filters) {
        lines.extend(filter_lines(&view.filters));
        cursor.filters = Some(view.filters.clone());
    }

    if cursor.stats != Some(view.stats) {
        lines.push(format!(
            "Database: {} jobs from {} scans",
            view.stats.total_jobs, view.stats.total_scans
        ));
        cursor.stats = Some(view.stats);
    }

    if cursor.jobs.as_ref() != Some(&view.recent_jobs) {
        lines.extend(job_lines(&view.recent_jobs));
        cursor.jobs = Some(view.recent_jobs.clone());
    }

    lines
}

fn status_line(view: &AppViewModel) -> String {
    let status = &view.status;
    let mut line = if status.active {
        format!(
            "[ACTIVE {:>3}%] {} {}",
            status.progress,
            progress_bar(status.progress),
            status.message
        )
    } else {
        format!("[IDLE] {}", status.message)
    };
    if !status.current_role.is_empty() && status.active {
        line.push_str(&format!(" | role: {}", status.current_role));
    }
    if status.job_count > 0 {
        line.push_str(&format!(" | leads: {}", status.job_count));
    }
    if view.launching {
        line.push_str(" | launching...");
    }
    if view.can_export {
        line.push_str(" | report ready, type `export`");
    }
    line
}

fn progress_bar(progress: u8) -> String {
    let filled = usize::from(progress.min(100)) * PROGRESS_BAR_WIDTH / 100;
    format!(
        "{}{}",
        "#".repeat(filled),
        "-".repeat(PROGRESS_BAR_WIDTH - filled)
    )
}

fn new_log_lines(view: &AppViewModel, cursor: &mut RenderCursor) -> Vec<String> {
    let unseen = view.logs_appended.saturating_sub(cursor.printed_logs);
    cursor.printed_logs = view.logs_appended;
    let unseen = usize::try_from(unseen).unwrap_or(usize::MAX).min(view.logs.len());
    view.logs[view.logs.len() - unseen..]
        .iter()
        .map(log_line)
        .collect()
}

fn log_line(entry: &LogEntry) -> String {
    let tag = match entry.severity() {
        Severity::Info => "INFO",
        Severity::Success => "DONE",
        Severity::Error => "FAIL",
        Severity::System => "SYS ",
    };
    format!("{} {} {}", entry.time(), tag, entry.message())
}

fn filter_lines(filters: &FilterModel) -> Vec<String> {
    let roles = if filters.has_roles() {
        filters.roles().join(", ")
    } else {
        "(none)".to_string()
    };
    let mut lines = vec![format!(
        "Filters: roles [{}] | location {} | language {}",
        roles,
        filters.location(),
        language_label(filters.language())
    )];
    if filters.language() == Language::English {
        lines.push(format!("  {STRICT_MODE_NOTE}"));
    }
    lines
}

fn job_lines(jobs: &[Job]) -> Vec<String> {
    if jobs.is_empty() {
        return vec!["Recent leads: none yet".to_string()];
    }
    let mut lines = vec!["Recent leads:".to_string()];
    for job in jobs {
        let emails = job.email_list();
        let contact = match emails.first() {
            Some(first) if emails.len() > 1 => format!("{first} (+{})", emails.len() - 1),
            Some(first) => first.to_string(),
            None => "no contact".to_string(),
        };
        lines.push(format!(
            "  {} @ {} | {} | {} | {} | {}",
            job.title, job.company, job.location, contact, job.source, job.link
        ));
    }
    lines
}

pub fn help_lines() -> Vec<String> {
    HELP_LINES.iter().map(|line| line.to_string()).collect()
}

pub fn role_catalog_lines(filters: &FilterModel) -> Vec<String> {
    let mut lines = Vec::new();
    for (category, roles) in ROLE_CATEGORIES {
        lines.push(format!("{category}:"));
        for role in *roles {
            let mark = if filters.contains(role) { "x" } else { " " };
            lines.push(format!("  [{mark}] {role}"));
        }
    }
    lines
}

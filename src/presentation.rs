//! Plain-text rendering of the listing read model.
//!
//! Nothing here touches controller state; every function takes a snapshot or a
//! record and returns a string for the terminal.

use chrono::{DateTime, NaiveDateTime, Utc};
use std::fmt::Write;

use crate::query::ReadModel;
use crate::workflows::WorkflowRecord;

const DISPLAY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Server timestamps arrive as RFC 3339, `YYYY-MM-DD HH:MM:SS`, or epoch milliseconds.
/// Anything else is shown as sent.
pub fn format_timestamp(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return "-".to_string();
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.with_timezone(&Utc).format(DISPLAY_TIME_FORMAT).to_string();
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, DISPLAY_TIME_FORMAT) {
        return parsed.format(DISPLAY_TIME_FORMAT).to_string();
    }
    if let Some(parsed) = raw.parse::<i64>().ok().and_then(DateTime::from_timestamp_millis) {
        return parsed.format(DISPLAY_TIME_FORMAT).to_string();
    }
    raw.to_string()
}

/// "25 workflows in total, page 3 of 3", or "Loading" while a fetch is in flight.
pub fn summary_line(model: &ReadModel) -> String {
    if model.is_loading {
        return "Loading".to_string();
    }
    let noun = if model.total > 1 { "workflows" } else { "workflow" };
    format!(
        "{} {} in total, page {} of {}",
        model.total, noun, model.page, model.page_count
    )
}

pub fn pagination_line(model: &ReadModel) -> String {
    let prev = if model.can_go_prev { "[p] Prev" } else { " -  Prev" };
    let next = if model.can_go_next { "Next [n]" } else { "Next  - " };
    format!("{prev}   {next}")
}

fn filter_line(model: &ReadModel) -> String {
    let keyword = if model.keyword.is_empty() {
        "-"
    } else {
        model.keyword.as_str()
    };
    format!("Workflow ID: {keyword}   Status: {}", model.status_filter)
}

pub fn render_table(items: &[WorkflowRecord]) -> String {
    let mut out = String::new();
    let headers = [
        "#", "Workflow ID", "Workflow Name", "Status", "Total", "Running", "Failed", "Updated at",
        "Created at",
    ];
    let rows: Vec<[String; 9]> = items
        .iter()
        .enumerate()
        .map(|(i, record)| {
            [
                (i + 1).to_string(),
                record.id.clone(),
                record.name.clone(),
                record.status.to_string(),
                record.total_instances.to_string(),
                record.running_instances.to_string(),
                record.failed_instances.to_string(),
                format_timestamp(&record.updated_at),
                format_timestamp(&record.created_at),
            ]
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let write_row = |out: &mut String, cells: &[&str]| {
        let line: Vec<String> = cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect();
        let _ = writeln!(out, "{}", line.join("  ").trim_end());
    };

    write_row(&mut out, &headers[..]);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("  "));
    for row in &rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        write_row(&mut out, &cells);
    }
    out
}

/// Full listing screen: filters, table, summary and pagination.
pub fn render_listing(model: &ReadModel) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", filter_line(model));
    let _ = writeln!(out);
    if model.items.is_empty() && !model.is_loading {
        let _ = writeln!(out, "📋 No workflows on this page");
    } else {
        out.push_str(&render_table(&model.items));
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", summary_line(model));
    let _ = writeln!(out, "{}", pagination_line(model));
    out
}

pub fn render_details(record: &WorkflowRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "🔎 Workflow {}", record.id);
    let _ = writeln!(out, "   Name:       {}", record.name);
    let _ = writeln!(out, "   Status:     {}", record.status);
    let _ = writeln!(
        out,
        "   Instances:  {} total, {} running, {} failed",
        record.total_instances, record.running_instances, record.failed_instances
    );
    let _ = writeln!(out, "   Created at: {}", format_timestamp(&record.created_at));
    let _ = write!(out, "   Updated at: {}", format_timestamp(&record.updated_at));
    out
}

pub fn delete_confirmation_prompt(record: &WorkflowRecord) -> String {
    if record.name.is_empty() {
        format!("🗑️  Delete workflow {}? Are you sure? [y/N] ", record.id)
    } else {
        format!(
            "🗑️  Delete workflow {} ({})? Are you sure? [y/N] ",
            record.id, record.name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::{StatusFilter, WorkflowStatus};

    fn model(total: u64, page: u32, page_count: u32) -> ReadModel {
        ReadModel {
            items: Vec::new(),
            total,
            page,
            page_count,
            is_loading: false,
            keyword: String::new(),
            status_filter: StatusFilter::Any,
            can_go_prev: page > 1,
            can_go_next: page < page_count,
        }
    }

    #[test]
    fn test_summary_pluralization() {
        assert_eq!(summary_line(&model(25, 3, 3)), "25 workflows in total, page 3 of 3");
        assert_eq!(summary_line(&model(1, 1, 1)), "1 workflow in total, page 1 of 1");
        assert_eq!(summary_line(&model(0, 1, 1)), "0 workflow in total, page 1 of 1");
    }

    #[test]
    fn test_summary_while_loading() {
        let mut m = model(25, 1, 3);
        m.is_loading = true;
        assert_eq!(summary_line(&m), "Loading");
    }

    #[test]
    fn test_pagination_line_reflects_bounds() {
        assert_eq!(pagination_line(&model(0, 1, 1)), " -  Prev   Next  - ");
        assert_eq!(pagination_line(&model(25, 2, 3)), "[p] Prev   Next [n]");
    }

    #[test]
    fn test_timestamp_formats() {
        assert_eq!(format_timestamp("2024-01-02T03:04:05Z"), "2024-01-02 03:04:05");
        assert_eq!(format_timestamp("2024-01-02 03:04:05"), "2024-01-02 03:04:05");
        assert_eq!(format_timestamp("0"), "1970-01-01 00:00:00");
        assert_eq!(format_timestamp("yesterday"), "yesterday");
        assert_eq!(format_timestamp(""), "-");
    }

    #[test]
    fn test_table_shows_raw_unknown_status() {
        let mut record = WorkflowRecord::reference("wf-7");
        record.status = WorkflowStatus::Unknown(3);
        let table = render_table(&[record]);
        let row = table.lines().nth(2).unwrap();
        assert!(row.contains("wf-7"));
        assert!(row.split_whitespace().any(|cell| cell == "3"));
    }

    #[test]
    fn test_empty_listing_message() {
        let rendered = render_listing(&model(0, 1, 1));
        assert!(rendered.contains("No workflows on this page"));
        assert!(rendered.contains("Status: any"));
    }
}

//! Paginated complaint report
//!
//! Renders records as a fixed-width text table. Every page repeats the title
//! and column header and ends with a page footer; pages are separated by a
//! form feed so printers and pagers break them correctly.

use crate::models::{ComplaintRecord, Status};
use chrono::NaiveDate;

pub const REPORT_TITLE: &str = "Complaint Resolution Report";

/// Table rows per page
pub const ROWS_PER_PAGE: usize = 25;

const PAGE_BREAK: char = '\u{000C}';

/// (header, width) per column; cells longer than the width are truncated
const COLUMNS: &[(&str, usize)] = &[
    ("ID", 6),
    ("Customer", 18),
    ("Account No.", 14),
    ("Category", 15),
    ("Status", 11),
    ("Action Taken", 40),
];

/// Render the full report
pub fn render_report(records: &[ComplaintRecord], generated_on: NaiveDate) -> String {
    let resolved = records.iter().filter(|r| r.status == Status::Resolved).count();
    let page_count = records.len().div_ceil(ROWS_PER_PAGE).max(1);

    let mut out = String::new();
    for page in 0..page_count {
        if page > 0 {
            out.push(PAGE_BREAK);
        }

        push_page_header(&mut out, generated_on);
        if page == 0 {
            out.push_str(&format!(
                "Total Records: {} | Resolved Cases: {}\n\n",
                records.len(),
                resolved
            ));
        }

        push_table_header(&mut out);
        let start = page * ROWS_PER_PAGE;
        let end = (start + ROWS_PER_PAGE).min(records.len());
        for record in &records[start..end] {
            push_row(&mut out, record);
        }

        let footer = format!("Page {} of {}", page + 1, page_count);
        out.push_str(&format!("\n{:^width$}\n", footer, width = table_width()));
    }
    out
}

fn table_width() -> usize {
    COLUMNS.iter().map(|(_, w)| w + 3).sum::<usize>() + 1
}

fn push_page_header(out: &mut String, generated_on: NaiveDate) {
    let width = table_width();
    out.push_str(&format!("{:^width$}\n", REPORT_TITLE, width = width));
    out.push_str(&format!(
        "{:^width$}\n\n",
        format!("Generated on: {}", generated_on.format("%d-%b-%Y")),
        width = width
    ));
}

fn push_separator(out: &mut String) {
    out.push('+');
    for (_, width) in COLUMNS {
        out.push_str(&"-".repeat(width + 2));
        out.push('+');
    }
    out.push('\n');
}

fn push_cells(out: &mut String, cells: &[String]) {
    out.push('|');
    for (cell, (_, width)) in cells.iter().zip(COLUMNS) {
        out.push_str(&format!(" {:<width$} |", truncate(cell, *width), width = *width));
    }
    out.push('\n');
}

fn push_table_header(out: &mut String) {
    push_separator(out);
    let headers: Vec<String> = COLUMNS.iter().map(|(h, _)| h.to_string()).collect();
    push_cells(out, &headers);
    push_separator(out);
}

fn push_row(out: &mut String, record: &ComplaintRecord) {
    let cells = [
        record.id.to_string(),
        record.customer_name().to_string(),
        record
            .customer
            .account_number
            .clone()
            .unwrap_or_else(|| "N/A".to_string()),
        record.category.clone(),
        record.status.to_string(),
        record.action.clone(),
    ];
    push_cells(out, &cells);
    push_separator(out);
}

/// Truncate to at most `max` characters
fn truncate(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CustomerDetails, Priority, Sentiment, Urgency};

    fn record(id: i64, status: Status) -> ComplaintRecord {
        ComplaintRecord {
            id,
            complaint: "text".to_string(),
            category: "Customer Service Escalations".to_string(),
            sentiment: Sentiment::Negative,
            urgency: Urgency::Medium,
            priority: Priority::P2,
            action: "Assign to senior customer support team and call back within a day".to_string(),
            status,
            date_logged: NaiveDate::from_ymd_opt(2024, 1, 5)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            customer: CustomerDetails {
                customer_name: Some("Bartholomew Fitzgerald-Smythe".to_string()),
                ..Default::default()
            },
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
    }

    #[test]
    fn test_header_and_summary_line() {
        let records = vec![record(1, Status::Resolved), record(2, Status::Open)];
        let report = render_report(&records, day());

        assert!(report.contains(REPORT_TITLE));
        assert!(report.contains("Generated on: 29-Feb-2024"));
        assert!(report.contains("Total Records: 2 | Resolved Cases: 1"));
        assert!(report.contains("Page 1 of 1"));
        assert!(!report.contains(PAGE_BREAK));
    }

    #[test]
    fn test_long_cells_are_truncated() {
        let report = render_report(&[record(7, Status::Open)], day());
        assert!(report.contains("Bartholomew Fitzge "));
        assert!(!report.contains("Fitzgerald"));
        assert!(report.contains("| Customer Servic |"));
        assert!(!report.contains("Escalations"));
        assert!(report.contains("N/A"));
    }

    #[test]
    fn test_paginates() {
        let records: Vec<ComplaintRecord> = (1..=ROWS_PER_PAGE as i64 + 1)
            .map(|id| record(id, Status::Open))
            .collect();
        let report = render_report(&records, day());

        assert_eq!(report.matches(PAGE_BREAK).count(), 1);
        assert!(report.contains("Page 2 of 2"));
        assert_eq!(report.matches(REPORT_TITLE).count(), 2);
        assert_eq!(report.matches("Total Records").count(), 1);
    }

    #[test]
    fn test_empty_report_has_one_page() {
        let report = render_report(&[], day());
        assert!(report.contains("Total Records: 0 | Resolved Cases: 0"));
        assert!(report.contains("Page 1 of 1"));
    }
}

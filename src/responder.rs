//! Rule-based query responder (the complaint chatbot)
//!
//! Resolution order, first match wins:
//! 1. summary / overview / stats / report
//! 2. "how many" / "total"
//! 3. critical / urgent / high priority / p1
//! 4. account number lookup
//! 5. customer name lookup
//! 6. category keyword lookup
//! 7. help text

use crate::keywords::KeywordConfig;
use crate::models::{ComplaintRecord, Priority, DEFAULT_CATEGORY};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const SUMMARY_TRIGGERS: &[&str] = &["summary", "overview", "stats", "report"];
const COUNT_TRIGGERS: &[&str] = &["how many", "total"];
const CRITICAL_TRIGGERS: &[&str] = &["critical", "urgent", "high priority", "p1"];

/// Account numbers must be longer than this many digits
const MIN_ACCOUNT_DIGITS: usize = 4;
/// Customer names must be longer than this to be matched inside a query
const MIN_NAME_LEN: usize = 3;

const NO_DATA_MESSAGE: &str = "I have no data to analyze yet. Please upload a file.";
const HELP_MESSAGE: &str = "I can help! You can ask for a **'Summary'**, **'Critical cases'**, \
search for a customer **Name** or an **Account Number**, or specific issues like **'Fraud'**.";

/// Answer produced by the responder
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponderResult {
    /// Natural-language answer only
    Text { message: String },
    /// Message plus the records it refers to
    Records {
        message: String,
        records: Vec<ComplaintRecord>,
    },
}

impl ResponderResult {
    fn text(message: impl Into<String>) -> Self {
        ResponderResult::Text {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ResponderResult::Text { message } | ResponderResult::Records { message, .. } => message,
        }
    }

    /// Matched records, empty for text answers
    pub fn records(&self) -> &[ComplaintRecord] {
        match self {
            ResponderResult::Text { .. } => &[],
            ResponderResult::Records { records, .. } => records,
        }
    }
}

/// Aggregate view of a record set
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub total: usize,
    pub critical: usize,
    /// Count per category, most frequent first (ties by name)
    pub by_category: Vec<(String, usize)>,
}

impl Summary {
    pub fn from_records(records: &[ComplaintRecord]) -> Self {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for record in records {
            *counts.entry(record.category.as_str()).or_insert(0) += 1;
        }

        let mut by_category: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(category, count)| (category.to_string(), count))
            .collect();
        by_category.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Self {
            total: records.len(),
            critical: records.iter().filter(|r| r.priority == Priority::P1).count(),
            by_category,
        }
    }

    /// Most frequent category and its count
    pub fn top_category(&self) -> Option<(&str, usize)> {
        self.by_category.first().map(|(c, n)| (c.as_str(), *n))
    }
}

/// Rule-based chatbot over the stored complaints
pub struct QueryResponder;

impl QueryResponder {
    pub fn respond(
        query: &str,
        records: &[ComplaintRecord],
        keywords: &KeywordConfig,
    ) -> ResponderResult {
        let query = query.trim().to_lowercase();

        if records.is_empty() {
            return ResponderResult::text(NO_DATA_MESSAGE);
        }

        if contains_any(&query, SUMMARY_TRIGGERS) {
            return summary_response(records);
        }

        if contains_any(&query, COUNT_TRIGGERS) {
            return count_response(&query, records, keywords);
        }

        if contains_any(&query, CRITICAL_TRIGGERS) {
            return critical_response(records);
        }

        if let Some(account) = find_account_number(&query) {
            return account_response(account, records);
        }

        if let Some(name) = find_customer_name(&query, records) {
            return customer_response(name, records);
        }

        for (category, word) in keywords.pairs() {
            if query.contains(word) {
                return category_response(category, word, records);
            }
        }

        ResponderResult::text(HELP_MESSAGE)
    }
}

fn contains_any(query: &str, triggers: &[&str]) -> bool {
    triggers.iter().any(|t| query.contains(*t))
}

fn summary_response(records: &[ComplaintRecord]) -> ResponderResult {
    let summary = Summary::from_records(records);
    let (top_category, top_count) = summary.top_category().unwrap_or((DEFAULT_CATEGORY, 0));

    let mut message = format!(
        "Here is the current situation summary:\n\n\
         **Total Complaints:** {}\n\
         **Top Issue:** '{}' with {} cases.\n\
         **Critical Attention Needed:** {} cases require immediate action.\n\n\
         **By Category:**\n",
        summary.total, top_category, top_count, summary.critical
    );
    for (category, count) in &summary.by_category {
        message.push_str(&format!("- {}: {}\n", category, count));
    }
    message.push_str("\nWould you like to see the 'Critical' cases?");

    ResponderResult::text(message)
}

fn count_response(
    query: &str,
    records: &[ComplaintRecord],
    keywords: &KeywordConfig,
) -> ResponderResult {
    for category in keywords.category_names() {
        if query.contains(&category.to_lowercase()) {
            let count = records.iter().filter(|r| r.category == category).count();
            return ResponderResult::text(format!(
                "There are **{}** complaints related to **{}**.",
                count, category
            ));
        }
    }

    ResponderResult::text(format!(
        "I have a total of **{}** complaints in the system.",
        records.len()
    ))
}

fn critical_response(records: &[ComplaintRecord]) -> ResponderResult {
    let matches: Vec<ComplaintRecord> = records
        .iter()
        .filter(|r| r.priority == Priority::P1)
        .cloned()
        .collect();

    if matches.is_empty() {
        return ResponderResult::text(
            "Good news! There are currently **0 Critical** cases in the system.",
        );
    }

    ResponderResult::Records {
        message: format!(
            "🚨 I found **{} Critical (P1)** cases that need immediate attention:",
            matches.len()
        ),
        records: matches,
    }
}

/// First token that looks like an account number
fn find_account_number(query: &str) -> Option<String> {
    query
        .split_whitespace()
        .map(|word| word.replace(['?', '#'], ""))
        .find(|word| word.len() > MIN_ACCOUNT_DIGITS && word.chars().all(|c| c.is_ascii_digit()))
}

/// Stored account numbers may carry a float suffix from spreadsheet exports
pub fn normalize_account_number(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed.strip_suffix(".0").unwrap_or(trimmed)
}

fn account_response(account: String, records: &[ComplaintRecord]) -> ResponderResult {
    let matches: Vec<ComplaintRecord> = records
        .iter()
        .filter(|r| {
            r.customer
                .account_number
                .as_deref()
                .map(normalize_account_number)
                == Some(account.as_str())
        })
        .cloned()
        .collect();

    if matches.is_empty() {
        return ResponderResult::text(format!(
            "I checked the database, but I couldn't find Account #{}.",
            account
        ));
    }

    ResponderResult::Records {
        message: format!(
            "✅ Found **{}** record(s) for Account **#{}**:",
            matches.len(),
            account
        ),
        records: matches,
    }
}

fn find_customer_name<'a>(query: &str, records: &'a [ComplaintRecord]) -> Option<&'a str> {
    records
        .iter()
        .map(ComplaintRecord::customer_name)
        .find(|name| name.chars().count() > MIN_NAME_LEN && query.contains(&name.to_lowercase()))
}

fn customer_response(name: &str, records: &[ComplaintRecord]) -> ResponderResult {
    let wanted = name.to_lowercase();
    let matches: Vec<ComplaintRecord> = records
        .iter()
        .filter(|r| r.customer_name().to_lowercase() == wanted)
        .cloned()
        .collect();

    ResponderResult::Records {
        message: format!("👤 Found **{}** complaint(s) from **{}**:", matches.len(), name),
        records: matches,
    }
}

fn category_response(
    category: &str,
    keyword: &str,
    records: &[ComplaintRecord],
) -> ResponderResult {
    let matches: Vec<ComplaintRecord> = records
        .iter()
        .filter(|r| r.category == category)
        .cloned()
        .collect();

    if matches.is_empty() {
        return ResponderResult::text(format!(
            "I understood you are looking for '{}', but there are no complaints in that category right now.",
            category
        ));
    }

    ResponderResult::Records {
        message: format!(
            "📂 I found **{}** cases related to **{}** (keyword matched: '{}'):",
            matches.len(),
            category,
            keyword
        ),
        records: matches,
    }
}

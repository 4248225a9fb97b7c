//! Core data models for complaint triage

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TriageError;

/// Category assigned when no keyword matches
pub const DEFAULT_CATEGORY: &str = "General";

/// Storage format of `date_logged`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

//
// ================= Enums =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Urgency {
    Low,
    Medium,
    High,
}

/// Priority tier, P1 (critical) through P4 (low)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Priority {
    #[serde(rename = "P1 - Critical")]
    P1,
    #[serde(rename = "P2 - High")]
    P2,
    #[serde(rename = "P3 - Medium")]
    P3,
    #[serde(rename = "P4 - Low")]
    P4,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Status {
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
    Escalated,
}

impl Priority {
    pub fn label(&self) -> &'static str {
        match self {
            Priority::P1 => "P1 - Critical",
            Priority::P2 => "P2 - High",
            Priority::P3 => "P3 - Medium",
            Priority::P4 => "P4 - Low",
        }
    }
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::Open => "Open",
            Status::InProgress => "In Progress",
            Status::Resolved => "Resolved",
            Status::Escalated => "Escalated",
        }
    }

    /// Statuses that trigger a customer notification
    pub fn notifies_customer(&self) -> bool {
        matches!(self, Status::Resolved | Status::Escalated)
    }
}

//
// ================= Classification =================
//

/// Output of the classifier for a single complaint text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassificationResult {
    pub category: String,
    pub sentiment: Sentiment,
    pub urgency: Urgency,
    pub priority: Priority,
    pub action: String,
}

//
// ================= Complaints =================
//

/// Optional customer details attached to an uploaded complaint
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CustomerDetails {
    pub customer_name: Option<String>,
    pub account_number: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// A classified complaint that has not been persisted yet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplaintSubmission {
    pub complaint: String,
    #[serde(flatten)]
    pub classification: ClassificationResult,
    #[serde(flatten)]
    pub customer: CustomerDetails,
}

/// A persisted, classified complaint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComplaintRecord {
    pub id: i64,
    pub complaint: String,
    pub category: String,
    pub sentiment: Sentiment,
    pub urgency: Urgency,
    pub priority: Priority,
    pub action: String,
    pub status: Status,
    pub date_logged: NaiveDateTime,
    #[serde(flatten)]
    pub customer: CustomerDetails,
}

impl ComplaintRecord {
    /// Build the stored form of a submission
    pub fn from_submission(
        id: i64,
        submission: ComplaintSubmission,
        date_logged: NaiveDateTime,
    ) -> Self {
        let ClassificationResult {
            category,
            sentiment,
            urgency,
            priority,
            action,
        } = submission.classification;

        Self {
            id,
            complaint: submission.complaint,
            category,
            sentiment,
            urgency,
            priority,
            action,
            status: Status::Open,
            date_logged,
            customer: submission.customer,
        }
    }

    pub fn customer_name(&self) -> &str {
        self.customer.customer_name.as_deref().unwrap_or("Unknown")
    }
}

//
// ================= Reporting =================
//

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Metrics {
    pub total: usize,
    pub critical: usize,
    pub resolved: usize,
}

impl Metrics {
    pub fn from_records(records: &[ComplaintRecord]) -> Self {
        Self {
            total: records.len(),
            critical: records.iter().filter(|r| r.priority == Priority::P1).count(),
            resolved: records.iter().filter(|r| r.status == Status::Resolved).count(),
        }
    }
}

//
// ================= Users =================
//

/// Operator account as stored (password is a bcrypt hash)
#[derive(Debug, Clone)]
pub struct User {
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
}

/// Identity returned after a successful login
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthenticatedUser {
    pub email: String,
    pub name: String,
}

//
// ================= Display / Parsing =================
//

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Sentiment::Positive => "Positive",
            Sentiment::Neutral => "Neutral",
            Sentiment::Negative => "Negative",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Urgency::Low => "Low",
            Urgency::Medium => "Medium",
            Urgency::High => "High",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Sentiment {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(Sentiment::Positive),
            "neutral" => Ok(Sentiment::Neutral),
            "negative" => Ok(Sentiment::Negative),
            other => Err(TriageError::InvalidRequest(format!("unknown sentiment '{}'", other))),
        }
    }
}

impl FromStr for Urgency {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Urgency::Low),
            "medium" => Ok(Urgency::Medium),
            "high" => Ok(Urgency::High),
            other => Err(TriageError::InvalidRequest(format!("unknown urgency '{}'", other))),
        }
    }
}

impl FromStr for Priority {
    type Err = TriageError;

    /// Accepts the full label ("P1 - Critical") or the bare tier ("p1")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        let tier = lowered.split_whitespace().next().unwrap_or("");
        match tier {
            "p1" => Ok(Priority::P1),
            "p2" => Ok(Priority::P2),
            "p3" => Ok(Priority::P3),
            "p4" => Ok(Priority::P4),
            _ => Err(TriageError::InvalidRequest(format!("unknown priority '{}'", s))),
        }
    }
}

impl FromStr for Status {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', '-'], " ").as_str() {
            "open" => Ok(Status::Open),
            "in progress" => Ok(Status::InProgress),
            "resolved" => Ok(Status::Resolved),
            "escalated" => Ok(Status::Escalated),
            _ => Err(TriageError::InvalidRequest(format!("unknown status '{}'", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_labels_roundtrip_through_serde() {
        let json = serde_json::to_string(&Priority::P1).unwrap();
        assert_eq!(json, "\"P1 - Critical\"");

        let parsed: Priority = serde_json::from_str("\"P4 - Low\"").unwrap();
        assert_eq!(parsed, Priority::P4);
    }

    #[test]
    fn test_status_parsing_variants() {
        assert_eq!("In Progress".parse::<Status>().unwrap(), Status::InProgress);
        assert_eq!("in_progress".parse::<Status>().unwrap(), Status::InProgress);
        assert_eq!("RESOLVED".parse::<Status>().unwrap(), Status::Resolved);
        assert!("closed".parse::<Status>().is_err());
    }

    #[test]
    fn test_priority_parses_tier_prefix() {
        assert_eq!("P2 - High".parse::<Priority>().unwrap(), Priority::P2);
        assert_eq!("p3".parse::<Priority>().unwrap(), Priority::P3);
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn test_only_final_statuses_notify() {
        assert!(Status::Resolved.notifies_customer());
        assert!(Status::Escalated.notifies_customer());
        assert!(!Status::Open.notifies_customer());
        assert!(!Status::InProgress.notifies_customer());
    }
}

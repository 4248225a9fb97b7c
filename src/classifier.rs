//! Complaint Classifier
//!
//! Maps a raw complaint text to category, sentiment, urgency, priority and a
//! recommended action:
//! - Category: first configured category with a matching trigger word
//! - Sentiment: VADER compound score
//! - Urgency: fixed urgent / delay word lists
//! - Priority + action: fixed decision table

use crate::keywords::KeywordConfig;
use crate::models::{ClassificationResult, Priority, Sentiment, Urgency, DEFAULT_CATEGORY};
use crate::sentiment::SentimentAnalyzer;
use tracing::debug;

/// Static keyword lists — zero allocation
const URGENT_KEYWORDS: &[&str] = &["fraud", "scam", "unauthorized", "blocked", "urgent", "hacked"];

const DELAY_KEYWORDS: &[&str] = &["delay", "issue", "pending", "failed"];

/// Category that always routes to P1
const FRAUD_CATEGORY: &str = "Fraud";

const ACTION_ESCALATE: &str = "Immediate escalation to fraud/security team";
const ACTION_SENIOR: &str = "Assign to senior customer support team";
const ACTION_STANDARD: &str = "Standard support handling";
const ACTION_AUTO: &str = "Auto-response or FAQ handling";

/// Complaint classifier
pub struct ComplaintClassifier;

impl ComplaintClassifier {
    /// Classify a complaint against the given keyword snapshot
    pub fn classify(text: &str, keywords: &KeywordConfig) -> ClassificationResult {
        let cleaned = clean_text(text);

        if cleaned.trim().is_empty() {
            return ClassificationResult {
                category: DEFAULT_CATEGORY.to_string(),
                sentiment: Sentiment::Neutral,
                urgency: Urgency::Low,
                priority: Priority::P4,
                action: ACTION_AUTO.to_string(),
            };
        }

        let category = match_category(&cleaned, keywords);
        let sentiment = SentimentAnalyzer::analyze(&cleaned);
        let urgency = detect_urgency(&cleaned);
        let (priority, action) = prioritize(category, sentiment, urgency);

        debug!(
            category,
            %sentiment,
            %urgency,
            %priority,
            "Classified complaint"
        );

        ClassificationResult {
            category: category.to_string(),
            sentiment,
            urgency,
            priority,
            action: action.to_string(),
        }
    }
}

/// Lowercase and keep only ASCII letters, digits and whitespace
pub fn clean_text(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect()
}

/// First category (in config order) with any trigger word in the text
fn match_category<'a>(cleaned: &str, keywords: &'a KeywordConfig) -> &'a str {
    keywords
        .iter()
        .find(|entry| entry.words.iter().any(|w| cleaned.contains(w.as_str())))
        .map(|entry| entry.category.as_str())
        .unwrap_or(DEFAULT_CATEGORY)
}

fn detect_urgency(cleaned: &str) -> Urgency {
    if URGENT_KEYWORDS.iter().any(|kw| cleaned.contains(*kw)) {
        Urgency::High
    } else if DELAY_KEYWORDS.iter().any(|kw| cleaned.contains(*kw)) {
        Urgency::Medium
    } else {
        Urgency::Low
    }
}

/// Decision table, first matching row wins
pub fn prioritize(
    category: &str,
    sentiment: Sentiment,
    urgency: Urgency,
) -> (Priority, &'static str) {
    if category == FRAUD_CATEGORY || urgency == Urgency::High {
        (Priority::P1, ACTION_ESCALATE)
    } else if sentiment == Sentiment::Negative && urgency == Urgency::Medium {
        (Priority::P2, ACTION_SENIOR)
    } else if sentiment == Sentiment::Neutral {
        (Priority::P3, ACTION_STANDARD)
    } else {
        (Priority::P4, ACTION_AUTO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin() -> KeywordConfig {
        KeywordConfig::builtin()
    }

    #[test]
    fn test_clean_text_keeps_digits() {
        assert_eq!(
            clean_text("EMI of Rs.5000 — DEDUCTED twice!!"),
            "emi of rs5000  deducted twice"
        );
    }

    #[test]
    fn test_fraud_keywords_are_critical() {
        let cases = vec![
            "There is an unauthorized transaction on my account",
            "I think this was a scam call about my loan",
            "someone tried to hack my credit card",
            "Possible fraud, my card limit was changed",
        ];

        for c in cases {
            let result = ComplaintClassifier::classify(c, &builtin());
            assert_eq!(result.category, "Fraud", "text: {}", c);
            assert_eq!(result.priority, Priority::P1, "text: {}", c);
            assert_eq!(result.action, ACTION_ESCALATE);
        }
    }

    #[test]
    fn test_unmatched_text_is_general() {
        let result = ComplaintClassifier::classify("Please update my postal address", &builtin());
        assert_eq!(result.category, DEFAULT_CATEGORY);
        assert_eq!(result.sentiment, Sentiment::Positive);
        assert_eq!(result.urgency, Urgency::Low);
        assert_eq!(result.priority, Priority::P4);
        assert_eq!(result.action, ACTION_AUTO);
    }

    #[test]
    fn test_neutral_text_gets_standard_handling() {
        let result = ComplaintClassifier::classify("cheque book request", &builtin());
        assert_eq!(result.sentiment, Sentiment::Neutral);
        assert_eq!(result.priority, Priority::P3);
        assert_eq!(result.action, ACTION_STANDARD);
    }

    #[test]
    fn test_first_category_in_order_wins() {
        let config = KeywordConfig::from_pairs(vec![("Account", "balance"), ("Loan", "emi")]);
        let result = ComplaintClassifier::classify("emi deducted from my balance", &config);
        assert_eq!(result.category, "Account");

        let reversed = KeywordConfig::from_pairs(vec![("Loan", "emi"), ("Account", "balance")]);
        let result = ComplaintClassifier::classify("emi deducted from my balance", &reversed);
        assert_eq!(result.category, "Loan");
    }

    #[test]
    fn test_negative_delay_goes_to_senior_support() {
        let result = ComplaintClassifier::classify(
            "My loan repayment is pending and this is terrible",
            &builtin(),
        );
        assert_eq!(result.category, "Loan");
        assert_eq!(result.urgency, Urgency::Medium);
        assert_eq!(result.sentiment, Sentiment::Negative);
        assert_eq!(result.priority, Priority::P2);
        assert_eq!(result.action, ACTION_SENIOR);
    }

    #[test]
    fn test_positive_feedback_is_auto_response() {
        let result = ComplaintClassifier::classify("Thanks, the new card app is great", &builtin());
        assert_eq!(result.category, "Credit Card");
        assert_eq!(result.sentiment, Sentiment::Positive);
        assert_eq!(result.priority, Priority::P4);
        assert_eq!(result.action, ACTION_AUTO);
    }

    #[test]
    fn test_blocked_is_high_urgency_outside_fraud() {
        let result = ComplaintClassifier::classify("my debit card got blocked", &builtin());
        assert_eq!(result.category, "Credit Card");
        assert_eq!(result.urgency, Urgency::High);
        assert_eq!(result.priority, Priority::P1);
    }

    #[test]
    fn test_empty_input_defaults() {
        for text in ["", "   ", "?!..."] {
            let result = ComplaintClassifier::classify(text, &builtin());
            assert_eq!(result.category, DEFAULT_CATEGORY);
            assert_eq!(result.sentiment, Sentiment::Neutral);
            assert_eq!(result.urgency, Urgency::Low);
            assert_eq!(result.priority, Priority::P4);
        }
    }

    #[test]
    fn test_new_keyword_moves_text_out_of_general() {
        let mut config = builtin();
        let text = "Question about my mortgage";
        assert_eq!(ComplaintClassifier::classify(text, &config).category, DEFAULT_CATEGORY);

        assert!(config.add_keyword("Loan", "mortgage"));
        assert_eq!(ComplaintClassifier::classify(text, &config).category, "Loan");
    }

    #[test]
    fn test_decision_table_rows() {
        assert_eq!(prioritize("Fraud", Sentiment::Positive, Urgency::Low).0, Priority::P1);
        assert_eq!(prioritize("Loan", Sentiment::Positive, Urgency::High).0, Priority::P1);
        assert_eq!(prioritize("Loan", Sentiment::Negative, Urgency::Medium).0, Priority::P2);
        assert_eq!(prioritize("Loan", Sentiment::Negative, Urgency::Low).0, Priority::P4);
        assert_eq!(prioritize("Loan", Sentiment::Neutral, Urgency::Medium).0, Priority::P3);
        assert_eq!(prioritize("Loan", Sentiment::Positive, Urgency::Medium).0, Priority::P4);
    }
}

//! Keyword configuration
//!
//! Ordered mapping from category name to its trigger words. Category order is
//! the order in which categories were first added, and it decides which
//! category wins when a text matches several.

use serde::{Deserialize, Serialize};

/// Built-in categories, in match order
const DEFAULT_KEYWORDS: &[(&str, &[&str])] = &[
    ("Fraud", &["fraud", "scam", "unauthorized", "hack"]),
    ("Loan", &["loan", "emi", "interest", "repayment"]),
    ("Credit Card", &["card", "credit", "debit", "limit"]),
    ("Account", &["account", "balance", "statement", "transfer"]),
    ("Customer Service", &["service", "support", "response", "delay"]),
];

/// Trigger words for one category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryKeywords {
    pub category: String,
    pub words: Vec<String>,
}

/// Category → trigger words, insertion ordered
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct KeywordConfig {
    categories: Vec<CategoryKeywords>,
}

impl KeywordConfig {
    /// Empty configuration (everything classifies as General)
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in banking categories
    pub fn builtin() -> Self {
        Self::from_pairs(
            DEFAULT_KEYWORDS
                .iter()
                .flat_map(|(category, words)| words.iter().map(move |w| (*category, *w))),
        )
    }

    /// Build from (category, word) pairs, keeping first-seen order
    pub fn from_pairs<I, C, W>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (C, W)>,
        C: AsRef<str>,
        W: AsRef<str>,
    {
        let mut config = Self::empty();
        for (category, word) in pairs {
            config.add_keyword(category.as_ref(), word.as_ref());
        }
        config
    }

    /// Add a word to a category, creating the category at the end if needed.
    ///
    /// Words are stored lowercased. Returns `false` if the word was already
    /// present in that category or is blank.
    pub fn add_keyword(&mut self, category: &str, word: &str) -> bool {
        let category = category.trim();
        let word = normalize_word(word);
        if category.is_empty() || word.is_empty() {
            return false;
        }

        match self.categories.iter_mut().find(|c| c.category == category) {
            Some(entry) => {
                if entry.words.iter().any(|w| *w == word) {
                    return false;
                }
                entry.words.push(word);
            }
            None => self.categories.push(CategoryKeywords {
                category: category.to_string(),
                words: vec![word],
            }),
        }
        true
    }

    /// Categories in match order
    pub fn iter(&self) -> impl Iterator<Item = &CategoryKeywords> {
        self.categories.iter()
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.category.as_str())
    }

    pub fn words(&self, category: &str) -> Option<&[String]> {
        self.categories
            .iter()
            .find(|c| c.category == category)
            .map(|c| c.words.as_slice())
    }

    /// Flattened (category, word) pairs in match order
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.categories
            .iter()
            .flat_map(|c| c.words.iter().map(move |w| (c.category.as_str(), w.as_str())))
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }
}

/// Lowercase and trim a trigger word
pub fn normalize_word(word: &str) -> String {
    word.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_puts_fraud_first() {
        let config = KeywordConfig::builtin();
        let names: Vec<&str> = config.category_names().collect();
        assert_eq!(
            names,
            vec!["Fraud", "Loan", "Credit Card", "Account", "Customer Service"]
        );
        assert_eq!(config.words("Loan").unwrap()[1], "emi");
    }

    #[test]
    fn test_add_keyword_lowercases_and_dedupes() {
        let mut config = KeywordConfig::empty();
        assert!(config.add_keyword("Loan", "Mortgage"));
        assert!(!config.add_keyword("Loan", "mortgage "));
        assert!(!config.add_keyword("Loan", "   "));
        assert_eq!(config.words("Loan").unwrap(), &["mortgage".to_string()]);
    }

    #[test]
    fn test_from_pairs_keeps_first_seen_order() {
        let config = KeywordConfig::from_pairs(vec![
            ("Account", "balance"),
            ("Fraud", "scam"),
            ("Account", "deposit"),
        ]);

        let pairs: Vec<(&str, &str)> = config.pairs().collect();
        assert_eq!(
            pairs,
            vec![("Account", "balance"), ("Account", "deposit"), ("Fraud", "scam")]
        );
    }

    #[test]
    fn test_serializes_as_ordered_list() {
        let config = KeywordConfig::from_pairs(vec![("Loan", "emi")]);
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json, serde_json::json!([{"category": "Loan", "words": ["emi"]}]));
    }
}

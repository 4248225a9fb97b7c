//! CSV complaint ingest
//!
//! Parses an uploaded complaint sheet and classifies every row with the
//! current keyword snapshot.

use crate::classifier::ComplaintClassifier;
use crate::error::TriageError;
use crate::keywords::KeywordConfig;
use crate::models::{ComplaintSubmission, CustomerDetails};
use crate::responder::normalize_account_number;
use crate::Result;
use sha2::{Digest, Sha256};

pub const COMPLAINT_COLUMN: &str = "complaint";
pub const NAME_COLUMN: &str = "Customer Name";
pub const EMAIL_COLUMN: &str = "Email";
pub const PHONE_COLUMN: &str = "Phone";
pub const ACCOUNT_COLUMN: &str = "Account Number";

const REQUIRED_COLUMNS: &[&str] = &[COMPLAINT_COLUMN, NAME_COLUMN, EMAIL_COLUMN];

/// Column positions resolved from the header row
struct Columns {
    complaint: usize,
    name: usize,
    email: usize,
    phone: Option<usize>,
    account: Option<usize>,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self> {
        let position = |name: &str| headers.iter().position(|h| h.trim() == name);

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|c| position(*c).is_none())
            .collect();

        match (position(COMPLAINT_COLUMN), position(NAME_COLUMN), position(EMAIL_COLUMN)) {
            (Some(complaint), Some(name), Some(email)) => Ok(Self {
                complaint,
                name,
                email,
                phone: position(PHONE_COLUMN),
                account: position(ACCOUNT_COLUMN),
            }),
            _ => Err(TriageError::InvalidUpload(format!(
                "CSV must contain columns: {:?} (missing: {:?})",
                REQUIRED_COLUMNS, missing
            ))),
        }
    }
}

/// Parse CSV bytes into classified submissions
pub fn parse_complaints(
    bytes: &[u8],
    keywords: &KeywordConfig,
) -> Result<Vec<ComplaintSubmission>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Fields)
        .from_reader(bytes);

    let columns = Columns::resolve(reader.headers()?)?;

    let mut submissions = Vec::new();
    for row in reader.records() {
        let row = row?;
        let cell = |index: usize| row.get(index).map(str::trim).unwrap_or("");
        let optional = |index: Option<usize>| {
            index
                .map(cell)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        let complaint = cell(columns.complaint).to_string();
        let classification = ComplaintClassifier::classify(&complaint, keywords);

        submissions.push(ComplaintSubmission {
            complaint,
            classification,
            customer: CustomerDetails {
                customer_name: optional(Some(columns.name)),
                account_number: optional(columns.account)
                    .map(|acc| normalize_account_number(&acc).to_string()),
                email: optional(Some(columns.email)),
                phone: optional(columns.phone),
            },
        });
    }

    Ok(submissions)
}

/// SHA-256 of the raw upload, hex encoded
pub fn fingerprint(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

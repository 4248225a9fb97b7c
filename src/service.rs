//! Triage service - the application core
//!
//! UPLOAD → CLASSIFY → PERSIST → QUERY / RESOLVE → NOTIFY
//!
//! Holds the current keyword snapshot. Every call works against one
//! immutable `Arc<KeywordConfig>`; the snapshot only changes through
//! `reload_keywords` (which `add_keyword` calls after a successful insert).

use crate::auth;
use crate::classifier::ComplaintClassifier;
use crate::config::AppConfig;
use crate::error::TriageError;
use crate::ingest;
use crate::keywords::KeywordConfig;
use crate::models::{
    AuthenticatedUser, ClassificationResult, ComplaintRecord, Metrics, Status, User,
};
use crate::notify::{LogNotifier, Notifier, RelayNotifier, StatusNotification};
use crate::report;
use crate::responder::{QueryResponder, ResponderResult};
use crate::store::{SqliteStore, Store};
use crate::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Records echoed back after an upload
const UPLOAD_SAMPLE_SIZE: usize = 3;

/// Outcome of a CSV upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestSummary {
    pub message: String,
    pub total_new_complaints: usize,
    pub fingerprint: String,
    pub sample_output: Vec<ComplaintRecord>,
}

pub struct TriageService {
    store: Arc<dyn Store>,
    notifier: Arc<dyn Notifier>,
    keywords: RwLock<Arc<KeywordConfig>>,
    bcrypt_cost: u32,
}

impl TriageService {
    /// Build the service and load the initial keyword snapshot from the store
    pub async fn new(
        store: Arc<dyn Store>,
        notifier: Arc<dyn Notifier>,
        bcrypt_cost: u32,
    ) -> Result<Self> {
        let keywords = store.load_keywords().await?;
        info!(
            categories = keywords.len(),
            notifier = notifier.name(),
            "Triage service initialized"
        );

        Ok(Self {
            store,
            notifier,
            keywords: RwLock::new(Arc::new(keywords)),
            bcrypt_cost,
        })
    }

    /// SQLite store plus the notifier the configuration asks for
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let store: Arc<dyn Store> = Arc::new(SqliteStore::connect(&config.database_url).await?);

        let notifier: Arc<dyn Notifier> = match &config.mail_relay_url {
            Some(url) => Arc::new(RelayNotifier::new(url.clone(), config.mail_sender.clone())?),
            None => Arc::new(LogNotifier::new(config.mail_sender.clone())),
        };

        Self::new(store, notifier, config.bcrypt_cost).await
    }

    // =============================
    // Keywords
    // =============================

    /// Current keyword snapshot
    pub fn keywords(&self) -> Arc<KeywordConfig> {
        self.keywords
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Replace the snapshot with the stored configuration
    pub async fn reload_keywords(&self) -> Result<Arc<KeywordConfig>> {
        let fresh = Arc::new(self.store.load_keywords().await?);
        *self
            .keywords
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = fresh.clone();

        debug!(categories = fresh.len(), "Keyword snapshot reloaded");
        Ok(fresh)
    }

    /// Returns `false` when the keyword already exists
    pub async fn add_keyword(&self, category: &str, word: &str) -> Result<bool> {
        if category.trim().is_empty() || word.trim().is_empty() {
            return Err(TriageError::InvalidRequest(
                "category and word must not be empty".to_string(),
            ));
        }

        let added = self.store.add_keyword(category, word).await?;
        if added {
            self.reload_keywords().await?;
            info!(category = category.trim(), word = %word.trim().to_lowercase(), "Keyword added");
        }
        Ok(added)
    }

    // =============================
    // Classification & Ingest
    // =============================

    pub fn classify(&self, text: &str) -> ClassificationResult {
        ComplaintClassifier::classify(text, &self.keywords())
    }

    /// Parse, classify and persist an uploaded CSV sheet
    pub async fn analyze_upload(&self, bytes: &[u8]) -> Result<IngestSummary> {
        let start = Instant::now();
        let fingerprint = ingest::fingerprint(bytes);

        let submissions = ingest::parse_complaints(bytes, &self.keywords())?;
        let created = self.store.append(submissions).await?;

        info!(
            fingerprint = %fingerprint,
            records = created.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Complaints analyzed and saved"
        );

        Ok(IngestSummary {
            message: "Complaints analyzed and saved successfully".to_string(),
            total_new_complaints: created.len(),
            fingerprint,
            sample_output: created.into_iter().take(UPLOAD_SAMPLE_SIZE).collect(),
        })
    }

    // =============================
    // Chatbot & Reporting
    // =============================

    /// Answer a chatbot query against the latest stored records
    pub async fn chat(&self, query: &str) -> Result<ResponderResult> {
        let records = self.store.load_all().await?;
        let result = QueryResponder::respond(query, &records, &self.keywords());
        debug!(query, matched = result.records().len(), "Chat query answered");
        Ok(result)
    }

    pub async fn metrics(&self) -> Result<Metrics> {
        self.store.metrics().await
    }

    pub async fn all_complaints(&self) -> Result<Vec<ComplaintRecord>> {
        self.store.load_all().await
    }

    pub async fn report(&self, generated_on: NaiveDate) -> Result<String> {
        let records = self.store.load_all().await?;
        Ok(report::render_report(&records, generated_on))
    }

    // =============================
    // Resolution
    // =============================

    /// Update status and action; tells the customer when the ticket is
    /// Resolved or Escalated. Notification failures are logged only.
    pub async fn update_complaint(
        &self,
        id: i64,
        status: Status,
        action: &str,
    ) -> Result<ComplaintRecord> {
        if !self.store.update_status(id, status, action).await? {
            return Err(TriageError::NotFound(format!("complaint #{}", id)));
        }

        let record = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| TriageError::NotFound(format!("complaint #{}", id)))?;

        info!(id, %status, "Complaint updated");

        if status.notifies_customer() {
            self.notify_customer(&record).await;
        }

        Ok(record)
    }

    async fn notify_customer(&self, record: &ComplaintRecord) {
        let Some(email) = record.customer.email.as_deref().filter(|e| !e.trim().is_empty()) else {
            debug!(id = record.id, "No customer email, skipping notification");
            return;
        };

        let notification = StatusNotification {
            to_email: email.to_string(),
            customer_name: record.customer_name().to_string(),
            complaint_id: record.id,
            status: record.status,
            action_note: record.action.clone(),
        };

        if let Err(error) = self.notifier.notify(&notification).await {
            warn!(
                id = record.id,
                notifier = self.notifier.name(),
                "Customer notification failed: {}",
                error
            );
        }
    }

    // =============================
    // Operators
    // =============================

    /// Returns `false` when the email is already registered
    pub async fn register(&self, email: &str, password: &str, full_name: &str) -> Result<bool> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || password.is_empty() {
            return Err(TriageError::InvalidRequest(
                "email and password are required".to_string(),
            ));
        }

        let password_hash = auth::hash_password(password, self.bcrypt_cost)?;
        let created = self
            .store
            .create_user(User {
                email: email.clone(),
                password_hash,
                full_name: full_name.trim().to_string(),
            })
            .await?;

        if created {
            info!(email = %email, "Operator registered");
        }
        Ok(created)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthenticatedUser> {
        let email = email.trim().to_lowercase();
        let user = self.store.find_user(&email).await?;

        match user {
            Some(user) if auth::verify_password(password, &user.password_hash) => {
                Ok(AuthenticatedUser {
                    email: user.email,
                    name: user.full_name,
                })
            }
            _ => Err(TriageError::AuthError("Invalid credentials".to_string())),
        }
    }
}

//! In-memory store for development and tests

use super::{ComplaintStore, UserStore};
use crate::keywords::KeywordConfig;
use crate::models::{ComplaintRecord, ComplaintSubmission, Status, User};
use crate::Result;
use chrono::{Local, Timelike};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct InMemoryStore {
    complaints: Arc<RwLock<BTreeMap<i64, ComplaintRecord>>>,
    next_id: Arc<RwLock<i64>>,
    keywords: Arc<RwLock<KeywordConfig>>,
    users: Arc<RwLock<HashMap<String, User>>>, // email → user
}

impl InMemoryStore {
    /// Store seeded with the built-in keyword configuration
    pub fn new() -> Self {
        Self::with_keywords(KeywordConfig::builtin())
    }

    pub fn with_keywords(keywords: KeywordConfig) -> Self {
        Self {
            complaints: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: Arc::new(RwLock::new(1)),
            keywords: Arc::new(RwLock::new(keywords)),
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ComplaintStore for InMemoryStore {

    async fn append(&self, submissions: Vec<ComplaintSubmission>) -> Result<Vec<ComplaintRecord>> {
        // Match the stored precision of the SQLite backend
        let logged_at = {
            let now = Local::now().naive_local();
            now.with_nanosecond(0).unwrap_or(now)
        };

        let mut next_id = self.next_id.write().await;
        let mut complaints = self.complaints.write().await;

        let mut created = Vec::with_capacity(submissions.len());
        for submission in submissions {
            let record = ComplaintRecord::from_submission(*next_id, submission, logged_at);
            *next_id += 1;
            complaints.insert(record.id, record.clone());
            created.push(record);
        }

        Ok(created)
    }

    async fn load_all(&self) -> Result<Vec<ComplaintRecord>> {
        let complaints = self.complaints.read().await;
        Ok(complaints.values().cloned().collect())
    }

    async fn get(&self, id: i64) -> Result<Option<ComplaintRecord>> {
        let complaints = self.complaints.read().await;
        Ok(complaints.get(&id).cloned())
    }

    async fn update_status(&self, id: i64, status: Status, action: &str) -> Result<bool> {
        let mut complaints = self.complaints.write().await;

        match complaints.get_mut(&id) {
            Some(record) => {
                record.status = status;
                record.action = action.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn load_keywords(&self) -> Result<KeywordConfig> {
        Ok(self.keywords.read().await.clone())
    }

    async fn add_keyword(&self, category: &str, word: &str) -> Result<bool> {
        let mut keywords = self.keywords.write().await;
        Ok(keywords.add_keyword(category, word))
    }
}

#[async_trait::async_trait]
impl UserStore for InMemoryStore {

    async fn create_user(&self, user: User) -> Result<bool> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.email) {
            return Ok(false);
        }
        users.insert(user.email.clone(), user);
        Ok(true)
    }

    async fn find_user(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(email).cloned())
    }
}
